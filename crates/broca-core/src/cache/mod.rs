//! Cache de fingerprints ("Cryo") y sus backends.

pub mod cryo;
pub mod stats;
pub mod store;

pub use cryo::{CachePolicy, Cryo};
pub use stats::CacheStats;
pub use store::{CacheStore, DiskStore, EntryKey, MemoryStore};
