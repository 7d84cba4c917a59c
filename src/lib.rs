//! # dhtable
//!
//! An open-addressing hash table over byte-string keys and values.
//!
//! Collisions are resolved with double hashing: two polynomial string hashes with distinct
//! prime bases pick the first slot and the step of the probe sequence. The slot array always
//! has a prime length, so every probe sequence visits each slot exactly once before repeating.
//! Deleted entries are replaced by tombstones, and the table grows and shrinks with its load
//! factor.
//!
//! The table is single-threaded: mutation takes `&mut self`, and callers that need sharing
//! wrap it in a lock.
//!
//! ## Basic Usage
//!
//! ```rust
//! use dhtable::Table;
//!
//! // Create a table with room for at least 8 entries (11 slots)
//! let mut table = Table::with_capacity(8);
//!
//! // Insert values
//! table.insert("cat", "1");
//! table.insert("dog", "2");
//!
//! // Retrieve values
//! assert_eq!(table.search("cat"), Some(&b"1"[..]));
//! assert_eq!(table.search("fox"), None);
//!
//! // Update values
//! assert_eq!(table.insert("cat", "10"), Some(b"1".to_vec()));
//! assert_eq!(table.len(), 2);
//!
//! // Remove values
//! table.delete("dog");
//! assert_eq!(table.search("dog"), None);
//! ```
//!
//! ## Handling allocation failure
//!
//! ```rust
//! use dhtable::{Table, TableConfig, TableError};
//!
//! let config = TableConfig::new().with_base_capacity(usize::MAX);
//! assert!(matches!(Table::try_with_config(config), Err(TableError::CapacityOverflow(_))));
//! ```

/// Table sizing and resize policy
mod config;
/// Errors of the fallible API
mod error;
/// Polynomial string hashing
pub mod hash;
/// Primality helpers for sizing the slot array
pub mod prime;
/// Double-hashing probe sequences
pub mod probe;
/// The hash table itself
mod table;
/// Utility functions and traits for the table
mod utils;

pub use config::{DEFAULT_BASE_CAPACITY, DEFAULT_GROW_THRESHOLD, DEFAULT_SHRINK_THRESHOLD, TableConfig};
pub use error::TableError;
pub use table::{Iter, Table};
pub use utils::{TableExtensions, from_iter_with_config};
