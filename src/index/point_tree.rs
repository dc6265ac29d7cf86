//! Ordered numeric point structure for range queries.
//!
//! A flattened, one-dimensional take on a BKD tree: entries are kept sorted by
//! `(value, doc_id)` and range bounds are located by binary search.

use std::cmp::Ordering;
use std::io::{Read, Write};

use crate::error::Result;
use crate::storage::StorageError;
use crate::storage::structured::{StructReader, StructWriter};

/// One indexed numeric value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericEntry {
    pub value: f64,
    pub doc_id: u64,
}

impl NumericEntry {
    pub fn new(value: f64, doc_id: u64) -> Self {
        NumericEntry { value, doc_id }
    }

    fn cmp_key(&self, other: &Self) -> Ordering {
        self.value
            .total_cmp(&other.value)
            .then_with(|| self.doc_id.cmp(&other.doc_id))
    }
}

/// Sorted numeric entries of one field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NumericPointTree {
    entries: Vec<NumericEntry>,
}

impl NumericPointTree {
    /// Build a tree from unsorted entries.
    pub fn new(mut entries: Vec<NumericEntry>) -> Self {
        entries.sort_by(NumericEntry::cmp_key);
        NumericPointTree { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[NumericEntry] {
        &self.entries
    }

    pub fn min_value(&self) -> Option<f64> {
        self.entries.first().map(|e| e.value)
    }

    pub fn max_value(&self) -> Option<f64> {
        self.entries.last().map(|e| e.value)
    }

    /// Entries whose value lies in `[low, high]`, ordered by value then doc id.
    ///
    /// An inverted or NaN bound selects nothing.
    pub fn range(&self, low: f64, high: f64) -> &[NumericEntry] {
        if low.is_nan() || high.is_nan() || low > high {
            return &[];
        }

        // Compare with `<`/`<=` so that -0.0 and 0.0 fall in the same range.
        let start = self.entries.partition_point(|e| e.value < low);
        let end = self.entries.partition_point(|e| e.value <= high);
        if start >= end {
            return &[];
        }
        &self.entries[start..end]
    }

    /// Distinct doc ids with a value in `[low, high]`, ascending.
    pub fn range_search(&self, low: f64, high: f64) -> Vec<u64> {
        let mut doc_ids: Vec<u64> = self.range(low, high).iter().map(|e| e.doc_id).collect();
        doc_ids.sort_unstable();
        doc_ids.dedup();
        doc_ids
    }

    pub fn encode<W: Write>(&self, writer: &mut StructWriter<W>) -> Result<()> {
        writer.write_varint(self.entries.len() as u64)?;
        for entry in &self.entries {
            writer.write_f64(entry.value)?;
            writer.write_varint(entry.doc_id)?;
        }
        Ok(())
    }

    pub fn decode<R: Read>(reader: &mut StructReader<R>) -> Result<Self> {
        let count = reader.read_len()?;
        let mut entries = Vec::with_capacity(count.min(1 << 16));
        for _ in 0..count {
            let value = reader.read_f64()?;
            if value.is_nan() {
                return Err(StorageError::Corrupt("NaN in numeric points".into()).into());
            }
            entries.push(NumericEntry::new(value, reader.read_varint()?));
        }

        if !entries.is_sorted_by(|a, b| a.cmp_key(b).is_le()) {
            return Err(StorageError::Corrupt("numeric points out of order".into()).into());
        }

        Ok(NumericPointTree { entries })
    }
}
