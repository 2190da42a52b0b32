//! Transient storage: a flat, per-execution word-to-word map with no
//! address dimension. There is exactly one logical contract per execution
//! since `CALL`/`CREATE` are out of scope, so unlike mainnet `TLOAD`/
//! `TSTORE` there is nothing to key on besides the slot itself. Nothing
//! here persists across `exec` calls.

use std::collections::HashMap;

use alloy::primitives::U256;

#[derive(Debug, Clone, Default)]
pub struct TransientStorage {
    pub data: HashMap<U256, U256>,
}

impl TransientStorage {
    pub fn new() -> Self {
        TransientStorage::default()
    }

    /// Returns the zero word for a key that has never been stored.
    pub fn t_load(&self, key: U256) -> U256 {
        self.data.get(&key).copied().unwrap_or(U256::ZERO)
    }

    pub fn t_store(&mut self, key: U256, value: U256) {
        self.data.insert(key, value);
    }
}
