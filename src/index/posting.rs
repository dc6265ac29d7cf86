//! Posting lists and the per-segment inverted index.
//!
//! Term dictionaries are kept in `BTreeMap`s so a segment always encodes its
//! terms in the same order.

use std::collections::BTreeMap;
use std::io::{Read, Write};

use ahash::AHashMap;

use crate::error::Result;
use crate::storage::StorageError;
use crate::storage::structured::{StructReader, StructWriter};

/// A single posting in a posting list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Posting {
    /// Document ID.
    pub doc_id: u64,
    /// Term frequency in the document.
    pub frequency: u32,
}

impl Posting {
    pub fn new(doc_id: u64) -> Self {
        Posting {
            doc_id,
            frequency: 1,
        }
    }

    pub fn with_frequency(doc_id: u64, frequency: u32) -> Self {
        Posting { doc_id, frequency }
    }
}

/// The postings of one term, ordered by doc id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostingList {
    postings: Vec<Posting>,
    total_frequency: u64,
}

impl PostingList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a posting, merging frequencies if the document is already listed.
    pub fn add_posting(&mut self, posting: Posting) {
        self.total_frequency += posting.frequency as u64;

        match self
            .postings
            .binary_search_by_key(&posting.doc_id, |p| p.doc_id)
        {
            Ok(pos) => self.postings[pos].frequency += posting.frequency,
            Err(pos) => self.postings.insert(pos, posting),
        }
    }

    pub fn len(&self) -> usize {
        self.postings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }

    /// Number of documents containing the term.
    pub fn doc_frequency(&self) -> u64 {
        self.postings.len() as u64
    }

    /// Sum of the term's frequencies over all documents.
    pub fn total_frequency(&self) -> u64 {
        self.total_frequency
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Posting> {
        self.postings.iter()
    }

    pub fn postings(&self) -> &[Posting] {
        &self.postings
    }

    /// Encode the postings with delta-compressed doc ids.
    pub fn encode<W: Write>(&self, writer: &mut StructWriter<W>) -> Result<()> {
        writer.write_varint(self.postings.len() as u64)?;

        let mut prev_doc_id = 0u64;
        for posting in &self.postings {
            writer.write_varint(posting.doc_id - prev_doc_id)?;
            writer.write_varint(posting.frequency as u64)?;
            prev_doc_id = posting.doc_id;
        }

        Ok(())
    }

    pub fn decode<R: Read>(reader: &mut StructReader<R>) -> Result<Self> {
        let count = reader.read_len()?;
        let mut list = PostingList::new();
        list.postings.reserve(count.min(1 << 16));

        let mut prev_doc_id = 0u64;
        for index in 0..count {
            let delta = reader.read_varint()?;
            if index > 0 && delta == 0 {
                return Err(StorageError::Corrupt("duplicate doc id in postings".into()).into());
            }
            let doc_id = prev_doc_id
                .checked_add(delta)
                .ok_or_else(|| StorageError::Corrupt("doc id overflow in postings".into()))?;
            let frequency = u32::try_from(reader.read_varint()?)
                .map_err(|_| StorageError::Corrupt("term frequency out of range".into()))?;

            list.total_frequency += frequency as u64;
            list.postings.push(Posting { doc_id, frequency });
            prev_doc_id = doc_id;
        }

        Ok(list)
    }
}

impl<'a> IntoIterator for &'a PostingList {
    type Item = &'a Posting;
    type IntoIter = std::slice::Iter<'a, Posting>;

    fn into_iter(self) -> Self::IntoIter {
        self.postings.iter()
    }
}

/// Term dictionaries of every text and keyword field in a segment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvertedIndex {
    fields: AHashMap<String, BTreeMap<String, PostingList>>,
}

impl InvertedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `frequency` occurrences of `term` in `field` for `doc_id`.
    pub fn add(&mut self, field: &str, term: &str, doc_id: u64, frequency: u32) {
        let terms = match self.fields.get_mut(field) {
            Some(terms) => terms,
            None => self.fields.entry(field.to_string()).or_default(),
        };

        terms
            .entry(term.to_string())
            .or_default()
            .add_posting(Posting::with_frequency(doc_id, frequency));
    }

    /// The posting list for a term, if the term occurs.
    pub fn postings(&self, field: &str, term: &str) -> Option<&PostingList> {
        self.fields.get(field)?.get(term)
    }

    /// Check if any term was indexed for a field.
    pub fn has_field(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Number of distinct terms in a field.
    pub fn term_count(&self, field: &str) -> usize {
        self.fields.get(field).map_or(0, BTreeMap::len)
    }

    /// Number of distinct (field, term) pairs.
    pub fn total_terms(&self) -> usize {
        self.fields.values().map(BTreeMap::len).sum()
    }

    /// Terms of a field in lexicographic order.
    pub fn terms(&self, field: &str) -> impl Iterator<Item = &str> {
        self.fields
            .get(field)
            .into_iter()
            .flat_map(|terms| terms.keys().map(String::as_str))
    }

    pub fn encode<W: Write>(&self, writer: &mut StructWriter<W>) -> Result<()> {
        let mut field_names: Vec<&String> = self.fields.keys().collect();
        field_names.sort();

        writer.write_varint(field_names.len() as u64)?;
        for name in field_names {
            let terms = &self.fields[name];
            writer.write_string(name)?;
            writer.write_varint(terms.len() as u64)?;
            for (term, list) in terms {
                writer.write_string(term)?;
                list.encode(writer)?;
            }
        }

        Ok(())
    }

    pub fn decode<R: Read>(reader: &mut StructReader<R>) -> Result<Self> {
        let field_count = reader.read_len()?;
        let mut fields = AHashMap::with_capacity(field_count.min(1024));

        for _ in 0..field_count {
            let name = reader.read_string()?;
            let term_count = reader.read_len()?;
            let mut terms = BTreeMap::new();
            for _ in 0..term_count {
                let term = reader.read_string()?;
                terms.insert(term, PostingList::decode(reader)?);
            }
            fields.insert(name, terms);
        }

        Ok(InvertedIndex { fields })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_posting_list_keeps_doc_order() {
        let mut list = PostingList::new();
        list.add_posting(Posting::with_frequency(5, 2));
        list.add_posting(Posting::new(1));
        list.add_posting(Posting::with_frequency(5, 1));

        let doc_ids: Vec<u64> = list.iter().map(|p| p.doc_id).collect();
        assert_eq!(doc_ids, vec![1, 5]);
        assert_eq!(list.postings()[1].frequency, 3);
        assert_eq!(list.doc_frequency(), 2);
        assert_eq!(list.total_frequency(), 4);
    }

    #[test]
    fn test_inverted_index_lookup() {
        let mut index = InvertedIndex::new();
        index.add("body", "rust", 0, 2);
        index.add("body", "search", 0, 1);
        index.add("body", "rust", 3, 1);
        index.add("tag", "lang", 3, 1);

        assert_eq!(index.postings("body", "rust").unwrap().len(), 2);
        assert!(index.postings("body", "java").is_none());
        assert!(index.postings("title", "rust").is_none());
        assert_eq!(index.terms("body").collect::<Vec<_>>(), vec!["rust", "search"]);
        assert_eq!(index.total_terms(), 3);
    }

    #[test]
    fn test_encode_decode() {
        let mut index = InvertedIndex::new();
        index.add("body", "alpha", 2, 1);
        index.add("body", "alpha", 9, 4);
        index.add("tag", "beta", 9, 1);

        let mut writer = StructWriter::new(Vec::new());
        index.encode(&mut writer).unwrap();
        let bytes = writer.finish().unwrap();

        let mut reader = StructReader::new(bytes.as_slice());
        let decoded = InvertedIndex::decode(&mut reader).unwrap();
        reader.verify_checksum().unwrap();
        assert_eq!(decoded, index);
    }
}
