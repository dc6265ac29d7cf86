//! Storage abstraction layer for Pilum.
//!
//! The index never touches the filesystem directly; it talks to a
//! [`Storage`] backend, a flat namespace of named byte files. File and memory
//! backends can be swapped without touching higher-level code.
//!
//! - **Storage trait**: Unified interface for all storage backends
//! - **StorageConfig enum**: Type-safe configuration for supported backends
//! - **StorageFactory**: Helper for constructing concrete storage instances
//! - **SegmentStore**: The append-only segment store the index commits into
//!
//! # Example
//!
//! ```
//! use std::io::{Read, Write};
//! use pilum::storage::{StorageConfig, StorageFactory};
//! use pilum::storage::memory::MemoryStorageConfig;
//!
//! # fn main() -> pilum::error::Result<()> {
//! let storage = StorageFactory::create(StorageConfig::Memory(MemoryStorageConfig::default()))?;
//!
//! let mut output = storage.create_output("index.bin")?;
//! output.write_all(b"test data")?;
//! output.close()?;
//!
//! let mut input = storage.open_input("index.bin")?;
//! let mut buffer = Vec::new();
//! input.read_to_end(&mut buffer)?;
//! assert_eq!(buffer, b"test data");
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::io::{Read, Seek, Write};
use std::sync::Arc;

use thiserror::Error;

use crate::error::{PilumError, Result};

pub mod file;
pub mod memory;
pub mod segment;
pub mod structured;

/// A trait for storage backends that can store and retrieve named files.
pub trait Storage: Send + Sync + fmt::Debug {
    /// Open an existing file for reading.
    fn open_input(&self, name: &str) -> Result<Box<dyn StorageInput>>;

    /// Create a file for writing, truncating any existing file.
    ///
    /// The contents become visible under `name` once the output is closed.
    fn create_output(&self, name: &str) -> Result<Box<dyn StorageOutput>>;

    /// Check if a file exists.
    fn file_exists(&self, name: &str) -> bool;

    /// Delete a file. Deleting a missing file is not an error.
    fn delete_file(&self, name: &str) -> Result<()>;

    /// List all file names, sorted.
    fn list_files(&self) -> Result<Vec<String>>;

    /// Get the size of a file in bytes.
    fn file_size(&self, name: &str) -> Result<u64>;

    /// Rename a file, replacing any file already called `new_name`.
    ///
    /// Used for atomic publication: write to a temporary file, then rename it
    /// to the final name so readers never see partial data.
    fn rename_file(&self, old_name: &str, new_name: &str) -> Result<()>;

    /// Create a uniquely named temporary file for writing.
    fn create_temp_output(&self, prefix: &str) -> Result<(String, Box<dyn StorageOutput>)>;

    /// Flush any pending backend state to durable storage.
    fn sync(&self) -> Result<()>;
}

/// A readable file handle.
pub trait StorageInput: Read + Seek + Send + fmt::Debug {
    /// Total size of the file in bytes.
    fn size(&self) -> Result<u64>;

    /// Release the handle.
    fn close(&mut self) -> Result<()>;
}

/// A writable file handle.
pub trait StorageOutput: Write + Send + fmt::Debug {
    /// Flush buffers and, where the backend supports it, sync to disk.
    fn flush_and_sync(&mut self) -> Result<()>;

    /// Number of bytes written so far.
    fn position(&self) -> Result<u64>;

    /// Finish the file and make it visible under its name.
    fn close(&mut self) -> Result<()>;
}

/// Configuration of a storage backend.
#[derive(Debug, Clone)]
pub enum StorageConfig {
    /// Directory on disk.
    File(file::FileStorageConfig),

    /// In-process memory.
    Memory(memory::MemoryStorageConfig),
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig::Memory(memory::MemoryStorageConfig::default())
    }
}

/// Factory for creating storage instances from a [`StorageConfig`].
pub struct StorageFactory;

impl StorageFactory {
    /// Create a storage backend.
    pub fn create(config: StorageConfig) -> Result<Arc<dyn Storage>> {
        match config {
            StorageConfig::Memory(mem_config) => {
                Ok(Arc::new(memory::MemoryStorage::new(mem_config)))
            }
            StorageConfig::File(file_config) => {
                let path = file_config.path.clone();
                Ok(Arc::new(file::FileStorage::new(&path, file_config)?))
            }
        }
    }
}

/// Errors reported by storage backends.
#[derive(Error, Debug, Clone)]
pub enum StorageError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Checksum mismatch: {0}")]
    ChecksumMismatch(String),

    #[error("Corrupt data: {0}")]
    Corrupt(String),
}

impl From<StorageError> for PilumError {
    fn from(err: StorageError) -> Self {
        PilumError::storage(err.to_string())
    }
}
