//! Data plumbing for charter.
//!
//! - [`PriceProvider`] / [`CsvProvider`] - read-only price history per symbol
//! - [`Persistence`] / [`MemoryStore`] / [`JsonFileStore`] - per-symbol
//!   annotation sets and indicator configuration

pub mod csv;
pub mod history;
pub mod source;
pub mod store;
pub mod validation;

pub use self::csv::CsvProvider;
pub use history::{DataError, PriceHistory};
pub use source::{MemoryProvider, PriceProvider};
pub use store::{JsonFileStore, KeyValueStore, MemoryStore, Persistence, StoreError};
pub use validation::validate_bar;
