//! Append-only segment store.
//!
//! A [`SegmentStore`] hands out opaque [`SegmentHandle`]s for byte blobs
//! written into a [`Storage`] backend. Each blob is written to a temporary
//! file and synced, then renamed into place. The rename is the commit point:
//! a write that fails at any step leaves no segment visible to
//! [`SegmentStore::list`].

use std::fmt;
use std::io::Read;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::Result;
use crate::storage::{Storage, StorageOutput};

const SEGMENT_PREFIX: &str = "segment_";
const SEGMENT_EXTENSION: &str = ".seg";

/// Identifier of one written segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SegmentHandle(u64);

impl SegmentHandle {
    pub fn new(id: u64) -> Self {
        SegmentHandle(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }

    /// The file name this segment is stored under.
    pub fn file_name(&self) -> String {
        format!("{SEGMENT_PREFIX}{:06}{SEGMENT_EXTENSION}", self.0)
    }

    /// Parse a segment file name back into a handle.
    pub fn from_file_name(name: &str) -> Option<Self> {
        name.strip_prefix(SEGMENT_PREFIX)?
            .strip_suffix(SEGMENT_EXTENSION)?
            .parse()
            .ok()
            .map(SegmentHandle)
    }
}

impl fmt::Display for SegmentHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "segment#{}", self.0)
    }
}

/// Durable append-only store of segment blobs.
#[derive(Debug)]
pub struct SegmentStore {
    storage: Arc<dyn Storage>,
    next_id: AtomicU64,
}

impl SegmentStore {
    /// Open a segment store over `storage`, continuing after the highest existing handle.
    pub fn new(storage: Arc<dyn Storage>) -> Result<Self> {
        let store = SegmentStore {
            storage,
            next_id: AtomicU64::new(0),
        };

        let next = store.list()?.last().map(|h| h.id() + 1).unwrap_or(0);
        store.next_id.store(next, Ordering::SeqCst);

        Ok(store)
    }

    /// The storage backend segments are written to.
    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    /// Durably write `bytes` as a new segment.
    pub fn write(&self, bytes: &[u8]) -> Result<SegmentHandle> {
        let (temp_name, mut output) = self.storage.create_temp_output("segment")?;

        if let Err(e) = Self::write_all(output.as_mut(), bytes) {
            drop(output);
            let _ = self.storage.delete_file(&temp_name);
            return Err(e);
        }

        let handle = SegmentHandle(self.next_id.fetch_add(1, Ordering::SeqCst));
        let file_name = handle.file_name();
        if let Err(e) = self.storage.rename_file(&temp_name, &file_name) {
            let _ = self.storage.delete_file(&temp_name);
            return Err(e);
        }

        if let Err(e) = self.storage.sync() {
            if let Err(cleanup) = self.storage.delete_file(&file_name) {
                log::warn!("could not remove unsynced {handle}: {cleanup}");
            }
            return Err(e);
        }

        log::debug!("wrote {handle} ({} bytes)", bytes.len());
        Ok(handle)
    }

    /// Read back the bytes of a segment.
    pub fn read(&self, handle: SegmentHandle) -> Result<Vec<u8>> {
        let mut input = self.storage.open_input(&handle.file_name())?;
        let mut bytes = Vec::with_capacity(input.size()? as usize);
        input.read_to_end(&mut bytes)?;
        input.close()?;
        Ok(bytes)
    }

    /// All segment handles, in ascending order.
    pub fn list(&self) -> Result<Vec<SegmentHandle>> {
        let mut handles: Vec<SegmentHandle> = self
            .storage
            .list_files()?
            .iter()
            .filter_map(|name| SegmentHandle::from_file_name(name))
            .collect();
        handles.sort();
        Ok(handles)
    }

    /// Delete every segment. Used when an index is recreated.
    pub fn clear(&self) -> Result<()> {
        for handle in self.list()? {
            self.storage.delete_file(&handle.file_name())?;
        }
        self.next_id.store(0, Ordering::SeqCst);
        Ok(())
    }

    fn write_all(output: &mut dyn StorageOutput, bytes: &[u8]) -> Result<()> {
        output.write_all(bytes)?;
        output.flush_and_sync()?;
        output.close()
    }
}
