//! In-memory ledger state.
//!
//! Holds state in a `HashMap` for the lifetime of the process. Used in
//! tests and local development where nothing needs to survive a restart.

use crate::{LedgerStore, StorageError, StorageFactory, StorageRegistry};
use async_trait::async_trait;
use chaincode_types::{ConfigSchema, ImplementationRegistry, Schema, SchemaError};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory ledger state.
///
/// Clones share the same underlying map.
#[derive(Clone)]
pub struct MemoryStorage {
	/// The in-memory store protected by a read-write lock.
	store: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl MemoryStorage {
	/// Creates a new, empty MemoryStorage instance.
	pub fn new() -> Self {
		Self {
			store: Arc::new(RwLock::new(HashMap::new())),
		}
	}

	/// Number of keys currently stored.
	pub async fn len(&self) -> usize {
		self.store.read().await.len()
	}

	pub async fn is_empty(&self) -> bool {
		self.store.read().await.is_empty()
	}

	/// All stored keys, sorted.
	pub async fn keys(&self) -> Vec<String> {
		let mut keys: Vec<_> = self.store.read().await.keys().cloned().collect();
		keys.sort();
		keys
	}
}

impl Default for MemoryStorage {
	fn default() -> Self {
		Self::new()
	}
}

#[async_trait]
impl LedgerStore for MemoryStorage {
	async fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
		let store = self.store.read().await;
		Ok(store.get(key).cloned())
	}

	async fn put_state(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError> {
		let mut store = self.store.write().await;
		store.insert(key.to_string(), value);
		Ok(())
	}
}

/// Configuration schema for MemoryStorage.
pub struct MemoryStorageSchema;

impl ConfigSchema for MemoryStorageSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), SchemaError> {
		// No fields; only checks that the section is a table.
		Schema::new(vec![], vec![]).validate(config)
	}
}

/// Factory function to create a memory storage backend from configuration.
///
/// Configuration parameters:
/// - None
pub fn create_storage(config: &toml::Value) -> Result<Box<dyn LedgerStore>, StorageError> {
	MemoryStorageSchema
		.validate(config)
		.map_err(|e| StorageError::Configuration(e.to_string()))?;

	Ok(Box::new(MemoryStorage::new()))
}

/// Registry for the memory storage implementation.
pub struct Registry;

impl ImplementationRegistry for Registry {
	const NAME: &'static str = "memory";
	type Factory = StorageFactory;

	fn factory() -> Self::Factory {
		create_storage
	}
}

impl StorageRegistry for Registry {}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn test_basic_operations() {
		let storage = MemoryStorage::new();

		let key = "test_key";
		let value = b"test_value".to_vec();
		storage.put_state(key, value.clone()).await.unwrap();

		let retrieved = storage.get_state(key).await.unwrap();
		assert_eq!(retrieved, Some(value));
		assert_eq!(storage.len().await, 1);
		assert_eq!(storage.keys().await, vec![key.to_string()]);
	}

	#[tokio::test]
	async fn test_missing_key() {
		let storage = MemoryStorage::new();
		assert_eq!(storage.get_state("missing").await.unwrap(), None);
		assert!(storage.is_empty().await);
	}

	#[tokio::test]
	async fn test_overwrite() {
		let storage = MemoryStorage::new();

		let key = "overwrite_key";
		storage.put_state(key, b"value1".to_vec()).await.unwrap();
		storage.put_state(key, b"value2".to_vec()).await.unwrap();

		let retrieved = storage.get_state(key).await.unwrap();
		assert_eq!(retrieved, Some(b"value2".to_vec()));
		assert_eq!(storage.len().await, 1);
	}

	#[tokio::test]
	async fn test_clones_share_state() {
		let storage = MemoryStorage::new();
		let view = storage.clone();

		storage.put_state("k", b"v".to_vec()).await.unwrap();
		assert_eq!(view.get_state("k").await.unwrap(), Some(b"v".to_vec()));
	}

	#[test]
	fn test_factory_rejects_non_table() {
		let result = create_storage(&toml::Value::String("memory".into()));
		assert!(matches!(result, Err(StorageError::Configuration(_))));
	}
}
