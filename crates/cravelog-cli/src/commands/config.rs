use clap::Subcommand;
use cravelog_core::Config;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print one setting
    Get {
        /// Dot-separated key: calendar.timezone, unlock.weekday, unlock.hour, unlock.minute
        key: String,
    },
    /// Change one setting; the whole config is validated before saving
    Set {
        /// Dot-separated key
        key: String,
        /// IANA timezone, weekday name (Mon or Monday), or a number
        value: String,
    },
    /// Print every setting as `key = value`
    List,
    /// Restore the default timezone and unlock schedule
    Reset,
}

/// Reject keys that are not settings, naming the valid ones.
fn check_key(config: &Config, key: &str) -> Result<(), String> {
    let keys = config.keys();
    if keys.iter().any(|k| k == key) {
        Ok(())
    } else {
        Err(format!("unknown key: {key} (valid keys: {})", keys.join(", ")))
    }
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            check_key(&config, &key)?;
            if let Some(value) = config.get(&key) {
                println!("{value}");
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            check_key(&config, &key)?;
            config.set(&key, &value)?;
            tracing::info!(%key, %value, "config updated");
            println!("{key} = {value}");
        }
        ConfigAction::List => {
            let config = Config::load()?;
            for key in config.keys() {
                if let Some(value) = config.get(&key) {
                    println!("{key} = {value}");
                }
            }
        }
        ConfigAction::Reset => {
            Config::default().save()?;
            println!("config reset to defaults");
        }
    }
    Ok(())
}
