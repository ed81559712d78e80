//! Persisted boolean flags used by the digest unlock flow.

use std::collections::HashSet;

use crate::error::StoreError;

/// A key-value store that only ever records `true`.
///
/// Absent keys read as `false`. Flags are never cleared by the digest code.
pub trait FlagStore {
    fn flag(&self, key: &str) -> Result<bool, StoreError>;

    /// Record `key` as set. Setting an already-set key is a no-op.
    fn set_flag(&mut self, key: &str) -> Result<(), StoreError>;
}

/// In-memory flag store for tests and dry runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryFlagStore {
    flags: HashSet<String>,
}

impl MemoryFlagStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}

impl FlagStore for MemoryFlagStore {
    fn flag(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.flags.contains(key))
    }

    fn set_flag(&mut self, key: &str) -> Result<(), StoreError> {
        self.flags.insert(key.to_string());
        Ok(())
    }
}

impl<S: FlagStore + ?Sized> FlagStore for &mut S {
    fn flag(&self, key: &str) -> Result<bool, StoreError> {
        (**self).flag(key)
    }

    fn set_flag(&mut self, key: &str) -> Result<(), StoreError> {
        (**self).set_flag(key)
    }
}
