//! Client-local key-value persistence for Vitrine.
//!
//! Failure caches persist through the [`KeyValueStore`] port rather than
//! touching any particular storage mechanism. The port mirrors browser local
//! storage: string keys, string values, synchronous calls.
//!
//! # Backends
//!
//! - [`MemoryStore`]: mutex-guarded map, optional byte quota, for tests and
//!   embedded use
//! - [`FileSystemStore`]: one JSON file per key under a base directory
//!
//! # Example
//!
//! ```rust
//! use vitrine_storage::{KeyValueStore, MemoryStore};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = MemoryStore::new();
//! store.set("failedNewsImages", "{}")?;
//! assert_eq!(store.get("failedNewsImages")?.as_deref(), Some("{}"));
//! store.remove("failedNewsImages")?;
//! assert_eq!(store.get("failedNewsImages")?, None);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod filesystem;
mod memory;
mod store;

pub use filesystem::FileSystemStore;
pub use memory::MemoryStore;
pub use store::KeyValueStore;
pub use vitrine_error::{StorageError, StorageErrorKind};
