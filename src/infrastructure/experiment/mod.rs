//! Infrastructure layer for experiment assignment
//!
//! Bucketing and catalog implementations.

mod consistent_hashing;
mod in_memory_catalog;
mod timeout_catalog;

pub use consistent_hashing::ConsistentHasher;
pub use in_memory_catalog::InMemoryExperimentCatalog;
pub use timeout_catalog::TimeoutCatalog;
