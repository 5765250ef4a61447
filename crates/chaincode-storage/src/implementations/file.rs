//! File-backed ledger state.
//!
//! Each key is stored in its own file under a base directory. Composite keys
//! contain NUL separators, so file names are the hex encoding of the key.
//! Long hex names are split into nested directories of at most
//! [`SEGMENT_LEN`] characters each, with the last segment as the file name.

use crate::{LedgerStore, StorageError, StorageFactory, StorageRegistry};
use async_trait::async_trait;
use chaincode_types::{
	ConfigSchema, Field, FieldType, ImplementationRegistry, Schema, SchemaError,
};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

/// Default directory for state files.
const DEFAULT_STORAGE_PATH: &str = "./data/ledger";

/// Longest hex segment per path component. Leaves room for the `.bin` and
/// temp-file suffixes under the common 255-byte file name limit.
const SEGMENT_LEN: usize = 200;

#[allow(clippy::doc_nested_refdefs)]
/// Fixed-size header written in front of every value.
///
/// Binary layout (8 bytes total):
/// - [0-3]: Magic bytes "OCST"
/// - [4-5]: Version (u16, little-endian)
/// - [6-7]: Reserved
#[derive(Debug, Clone, PartialEq, Eq)]
struct FileHeader {
	version: u16,
}

impl FileHeader {
	const MAGIC: &'static [u8; 4] = b"OCST";
	const VERSION: u16 = 1;
	const SIZE: usize = 8;

	fn current() -> Self {
		Self {
			version: Self::VERSION,
		}
	}

	fn serialize(&self) -> [u8; Self::SIZE] {
		let mut bytes = [0u8; Self::SIZE];
		bytes[0..4].copy_from_slice(Self::MAGIC);
		bytes[4..6].copy_from_slice(&self.version.to_le_bytes());
		bytes
	}

	fn deserialize(bytes: &[u8]) -> Result<Self, StorageError> {
		if bytes.len() < Self::SIZE {
			return Err(StorageError::Backend("File too small for header".into()));
		}

		if &bytes[0..4] != Self::MAGIC {
			return Err(StorageError::Backend("Unrecognized file format".into()));
		}

		let version = u16::from_le_bytes([bytes[4], bytes[5]]);
		if version > Self::VERSION {
			return Err(StorageError::Backend(format!(
				"Unsupported file version: {}",
				version
			)));
		}

		Ok(Self { version })
	}
}

/// File-based ledger state.
pub struct FileStorage {
	/// Base directory path for storing files.
	base_path: PathBuf,
	/// Flush file contents to disk before renaming into place.
	sync: bool,
}

impl FileStorage {
	pub fn new(base_path: PathBuf, sync: bool) -> Self {
		Self { base_path, sync }
	}

	/// Converts a key to the path of its state file.
	///
	/// Directory segments are exactly `SEGMENT_LEN` characters and carry no
	/// extension, so no file path is a prefix of another key's path.
	fn get_file_path(&self, key: &str) -> PathBuf {
		let encoded = hex::encode(key.as_bytes());
		let mut path = self.base_path.clone();

		let mut rest = encoded.as_str();
		while rest.len() > SEGMENT_LEN {
			let (segment, tail) = rest.split_at(SEGMENT_LEN);
			path.push(segment);
			rest = tail;
		}
		path.push(format!("{}.bin", rest));
		path
	}

	async fn write_file(&self, path: &Path, data: &[u8]) -> Result<(), StorageError> {
		let mut file = fs::File::create(path)
			.await
			.map_err(|e| StorageError::Backend(e.to_string()))?;
		file.write_all(data)
			.await
			.map_err(|e| StorageError::Backend(e.to_string()))?;
		file.flush()
			.await
			.map_err(|e| StorageError::Backend(e.to_string()))?;
		if self.sync {
			file.sync_all()
				.await
				.map_err(|e| StorageError::Backend(e.to_string()))?;
		}
		Ok(())
	}
}

#[async_trait]
impl LedgerStore for FileStorage {
	async fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
		let path = self.get_file_path(key);

		let data = match fs::read(&path).await {
			Ok(data) => data,
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
			Err(e) => return Err(StorageError::Backend(e.to_string())),
		};

		FileHeader::deserialize(&data).map_err(|e| {
			tracing::warn!(path = %path.display(), error = %e, "Unreadable state file");
			e
		})?;

		Ok(Some(data[FileHeader::SIZE..].to_vec()))
	}

	async fn put_state(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError> {
		let path = self.get_file_path(key);
		let dir = path.parent().unwrap_or(&self.base_path);

		fs::create_dir_all(dir)
			.await
			.map_err(|e| StorageError::Backend(e.to_string()))?;

		let mut file_data = Vec::with_capacity(FileHeader::SIZE + value.len());
		file_data.extend_from_slice(&FileHeader::current().serialize());
		file_data.extend_from_slice(&value);

		// Write to a temp file then rename, so readers never see a partial value.
		// Each write gets its own temp file; concurrent writers to one key race
		// only on the rename, and the last rename wins.
		let temp_path = path.with_extension(format!("{}.tmp", Uuid::new_v4().simple()));
		let written = match self.write_file(&temp_path, &file_data).await {
			Ok(()) => fs::rename(&temp_path, &path)
				.await
				.map_err(|e| StorageError::Backend(e.to_string())),
			Err(e) => Err(e),
		};
		if written.is_err() {
			let _ = fs::remove_file(&temp_path).await;
		}
		written?;

		tracing::debug!(path = %path.display(), bytes = value.len(), "Wrote state file");
		Ok(())
	}
}

/// Configuration schema for FileStorage.
pub struct FileStorageSchema;

impl ConfigSchema for FileStorageSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), SchemaError> {
		let schema = Schema::new(
			vec![],
			vec![
				Field::new("storage_path", FieldType::String).with_validator(|value| {
					match value.as_str() {
						Some(path) if !path.trim().is_empty() => Ok(()),
						_ => Err("storage_path cannot be empty".to_string()),
					}
				}),
				Field::new("sync", FieldType::Boolean),
			],
		);

		schema.validate(config)
	}
}

/// Factory function to create a file storage backend from configuration.
///
/// Configuration parameters:
/// - `storage_path`: Base directory for state files (default: "./data/ledger")
/// - `sync`: Flush each write to disk before it becomes visible (default: false)
pub fn create_storage(config: &toml::Value) -> Result<Box<dyn LedgerStore>, StorageError> {
	FileStorageSchema
		.validate(config)
		.map_err(|e| StorageError::Configuration(e.to_string()))?;

	let storage_path = config
		.get("storage_path")
		.and_then(|v| v.as_str())
		.unwrap_or(DEFAULT_STORAGE_PATH);
	let sync = config
		.get("sync")
		.and_then(|v| v.as_bool())
		.unwrap_or(false);

	Ok(Box::new(FileStorage::new(PathBuf::from(storage_path), sync)))
}

/// Registry for the file storage implementation.
pub struct Registry;

impl ImplementationRegistry for Registry {
	const NAME: &'static str = "file";
	type Factory = StorageFactory;

	fn factory() -> Self::Factory {
		create_storage
	}
}

impl StorageRegistry for Registry {}
