//! Price provider trait definition.

use std::collections::HashMap;

use crate::history::{DataError, PriceHistory};

/// Anything that can produce the price history of a symbol.
pub trait PriceProvider {
    fn history(&self, symbol: &str) -> Result<PriceHistory, DataError>;
}

/// A fixed set of histories held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryProvider {
    histories: HashMap<String, PriceHistory>,
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, symbol: impl Into<String>, history: PriceHistory) {
        self.histories.insert(symbol.into(), history);
    }
}

impl PriceProvider for MemoryProvider {
    fn history(&self, symbol: &str) -> Result<PriceHistory, DataError> {
        self.histories
            .get(symbol)
            .cloned()
            .ok_or_else(|| DataError::NotFound(symbol.to_string()))
    }
}
