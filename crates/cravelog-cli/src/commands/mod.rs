pub mod config;
pub mod digest;
