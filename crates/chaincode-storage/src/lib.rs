//! Ledger state access for the order chaincode.
//!
//! This module abstracts the key-value state of the ledger behind the
//! [`LedgerStore`] trait. The chaincode only ever reads and writes single
//! keys; consistency, replication and durability belong to the backend.

use async_trait::async_trait;
use chaincode_types::ImplementationRegistry;
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod file;
	pub mod memory;
}

/// Errors that can occur during ledger state operations.
///
/// A missing key is not an error; see [`LedgerStore::get_state`].
#[derive(Debug, Error)]
pub enum StorageError {
	/// Error that occurs in the storage backend.
	#[error("Backend error: {0}")]
	Backend(String),
	/// Error that occurs during configuration validation.
	#[error("Configuration error: {0}")]
	Configuration(String),
}

/// Key-value primitives of the ledger state.
///
/// Every call is a single unit of work. Implementations must not batch or
/// defer writes across calls.
#[async_trait]
pub trait LedgerStore: Send + Sync {
	/// Returns the bytes stored under `key`, or `None` if nothing is stored.
	async fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;

	/// Stores `value` under `key`, replacing any previous value.
	async fn put_state(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError>;
}

/// Type alias for storage factory functions.
///
/// Every backend provides a factory with this signature, taking the backend's
/// table from `storage.implementations.<name>`.
pub type StorageFactory = fn(&toml::Value) -> Result<Box<dyn LedgerStore>, StorageError>;

/// Registry trait for storage implementations.
pub trait StorageRegistry: ImplementationRegistry<Factory = StorageFactory> {}

/// Get all registered storage implementations.
///
/// Returns `(name, factory)` pairs for every available backend.
pub fn get_all_implementations() -> Vec<(&'static str, StorageFactory)> {
	use implementations::{file, memory};

	vec![
		(file::Registry::NAME, file::Registry::factory()),
		(memory::Registry::NAME, memory::Registry::factory()),
	]
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_all_implementations_registered() {
		let names: Vec<_> = get_all_implementations()
			.into_iter()
			.map(|(name, _)| name)
			.collect();
		assert_eq!(names, vec!["file", "memory"]);
	}

	#[tokio::test]
	async fn test_factories_build_working_stores() {
		let factories = get_all_implementations();
		let (_, memory_factory) = factories
			.iter()
			.find(|(name, _)| *name == "memory")
			.unwrap();

		let store = memory_factory(&toml::Value::Table(toml::Table::new())).unwrap();
		store.put_state("k", b"v".to_vec()).await.unwrap();
		assert_eq!(store.get_state("k").await.unwrap(), Some(b"v".to_vec()));
	}
}
