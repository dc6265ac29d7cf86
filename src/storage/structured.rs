//! Structured binary I/O for index files.
//!
//! [`StructWriter`] and [`StructReader`] read and write little-endian
//! primitives, LEB128 varints and length-prefixed strings while folding every
//! byte into a running CRC32. The writer appends the checksum as a 4-byte
//! trailer; the reader recomputes it and refuses data whose trailer does not
//! match.
//!
//! ```
//! use pilum::storage::structured::{StructReader, StructWriter};
//!
//! let mut writer = StructWriter::new(Vec::new());
//! writer.write_varint(42).unwrap();
//! writer.write_string("hello").unwrap();
//! let bytes = writer.finish().unwrap();
//!
//! let mut reader = StructReader::new(bytes.as_slice());
//! assert_eq!(reader.read_varint().unwrap(), 42);
//! assert_eq!(reader.read_string().unwrap(), "hello");
//! reader.verify_checksum().unwrap();
//! ```

use std::io::{Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use crc32fast::Hasher;

use crate::error::Result;
use crate::storage::StorageError;
use crate::util::varint::{MAX_VARINT_LEN, decode_u64, encode_u64};

/// Checksummed binary writer.
pub struct StructWriter<W: Write> {
    writer: W,
    hasher: Hasher,
    position: u64,
}

impl<W: Write> StructWriter<W> {
    pub fn new(writer: W) -> Self {
        StructWriter {
            writer,
            hasher: Hasher::new(),
            position: 0,
        }
    }

    pub fn write_u8(&mut self, value: u8) -> Result<()> {
        self.writer.write_u8(value)?;
        self.track(&[value]);
        Ok(())
    }

    pub fn write_u32(&mut self, value: u32) -> Result<()> {
        self.writer.write_u32::<LittleEndian>(value)?;
        self.track(&value.to_le_bytes());
        Ok(())
    }

    pub fn write_u64(&mut self, value: u64) -> Result<()> {
        self.writer.write_u64::<LittleEndian>(value)?;
        self.track(&value.to_le_bytes());
        Ok(())
    }

    pub fn write_varint(&mut self, value: u64) -> Result<()> {
        let encoded = encode_u64(value);
        self.write_raw(&encoded)
    }

    /// Write an `f64` as its IEEE-754 bit pattern, so every value round-trips exactly.
    pub fn write_f64(&mut self, value: f64) -> Result<()> {
        self.writer.write_f64::<LittleEndian>(value)?;
        self.track(&value.to_le_bytes());
        Ok(())
    }

    pub fn write_string(&mut self, value: &str) -> Result<()> {
        self.write_bytes(value.as_bytes())
    }

    /// Write a length-prefixed byte slice.
    pub fn write_bytes(&mut self, value: &[u8]) -> Result<()> {
        self.write_varint(value.len() as u64)?;
        self.write_raw(value)
    }

    pub fn write_raw(&mut self, value: &[u8]) -> Result<()> {
        self.writer.write_all(value)?;
        self.track(value);
        Ok(())
    }

    /// Write a strictly increasing sequence as a count followed by gaps.
    pub fn write_delta_u64s(&mut self, values: &[u64]) -> Result<()> {
        self.write_varint(values.len() as u64)?;

        let mut previous = 0u64;
        for &value in values {
            self.write_varint(value.wrapping_sub(previous))?;
            previous = value;
        }

        Ok(())
    }

    /// Bytes written so far, excluding the trailer.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Append the checksum trailer, flush, and hand the sink back.
    pub fn finish(mut self) -> Result<W> {
        let checksum = self.hasher.clone().finalize();
        self.writer.write_u32::<LittleEndian>(checksum)?;
        self.writer.flush()?;
        Ok(self.writer)
    }

    fn track(&mut self, data: &[u8]) {
        self.hasher.update(data);
        self.position += data.len() as u64;
    }
}

/// Checksummed binary reader, the counterpart of [`StructWriter`].
pub struct StructReader<R: Read> {
    reader: R,
    hasher: Hasher,
    position: u64,
}

impl<R: Read> StructReader<R> {
    pub fn new(reader: R) -> Self {
        StructReader {
            reader,
            hasher: Hasher::new(),
            position: 0,
        }
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        let value = self.reader.read_u8()?;
        self.track(&[value]);
        Ok(value)
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        let value = self.reader.read_u32::<LittleEndian>()?;
        self.track(&value.to_le_bytes());
        Ok(value)
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        let value = self.reader.read_u64::<LittleEndian>()?;
        self.track(&value.to_le_bytes());
        Ok(value)
    }

    pub fn read_varint(&mut self) -> Result<u64> {
        let mut bytes = Vec::with_capacity(MAX_VARINT_LEN);
        loop {
            let byte = self.reader.read_u8()?;
            bytes.push(byte);
            if byte & 0x80 == 0 || bytes.len() > MAX_VARINT_LEN {
                break;
            }
        }

        let (value, _) = decode_u64(&bytes)?;
        self.track(&bytes);
        Ok(value)
    }

    /// Read a varint that must fit in `usize`, such as a length or count.
    pub fn read_len(&mut self) -> Result<usize> {
        let value = self.read_varint()?;
        usize::try_from(value)
            .map_err(|_| StorageError::Corrupt(format!("length {value} out of range")).into())
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        let value = self.reader.read_f64::<LittleEndian>()?;
        self.track(&value.to_le_bytes());
        Ok(value)
    }

    pub fn read_string(&mut self) -> Result<String> {
        let bytes = self.read_bytes()?;
        String::from_utf8(bytes)
            .map_err(|e| StorageError::Corrupt(format!("Invalid UTF-8: {e}")).into())
    }

    /// Read a length-prefixed byte slice.
    pub fn read_bytes(&mut self) -> Result<Vec<u8>> {
        let length = self.read_len()?;
        self.read_raw(length)
    }

    pub fn read_raw(&mut self, length: usize) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        (&mut self.reader)
            .take(length as u64)
            .read_to_end(&mut bytes)?;
        if bytes.len() != length {
            return Err(StorageError::Corrupt(format!(
                "expected {length} bytes, found {}",
                bytes.len()
            ))
            .into());
        }
        self.track(&bytes);
        Ok(bytes)
    }

    pub fn read_delta_u64s(&mut self) -> Result<Vec<u64>> {
        let length = self.read_len()?;
        let mut values = Vec::with_capacity(length.min(1 << 16));

        let mut previous = 0u64;
        for _ in 0..length {
            let value = previous.wrapping_add(self.read_varint()?);
            values.push(value);
            previous = value;
        }

        Ok(values)
    }

    /// Bytes consumed so far, excluding the trailer.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Read the trailer and compare it with the checksum of everything read.
    pub fn verify_checksum(&mut self) -> Result<()> {
        let stored = self.reader.read_u32::<LittleEndian>()?;
        let computed = self.hasher.clone().finalize();
        if stored != computed {
            return Err(StorageError::ChecksumMismatch(format!(
                "stored {stored:#010x}, computed {computed:#010x}"
            ))
            .into());
        }
        Ok(())
    }

    fn track(&mut self, data: &[u8]) {
        self.hasher.update(data);
        self.position += data.len() as u64;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitives() {
        let mut writer = StructWriter::new(Vec::new());
        writer.write_u8(7).unwrap();
        writer.write_u32(0xDEADBEEF).unwrap();
        writer.write_u64(u64::MAX).unwrap();
        writer.write_f64(102.3).unwrap();
        writer.write_f64(-0.0).unwrap();
        writer.write_bytes(&[1, 2, 3]).unwrap();
        assert_eq!(writer.position(), 1 + 4 + 8 + 8 + 8 + 4);
        let bytes = writer.finish().unwrap();

        let mut reader = StructReader::new(bytes.as_slice());
        assert_eq!(reader.read_u8().unwrap(), 7);
        assert_eq!(reader.read_u32().unwrap(), 0xDEADBEEF);
        assert_eq!(reader.read_u64().unwrap(), u64::MAX);
        assert_eq!(reader.read_f64().unwrap(), 102.3);
        assert!(reader.read_f64().unwrap().is_sign_negative());
        assert_eq!(reader.read_bytes().unwrap(), vec![1, 2, 3]);
        reader.verify_checksum().unwrap();
    }

    #[test]
    fn test_delta_sequence() {
        let values = vec![0, 3, 4, 1000, 1 << 40];
        let mut writer = StructWriter::new(Vec::new());
        writer.write_delta_u64s(&values).unwrap();
        let bytes = writer.finish().unwrap();

        let mut reader = StructReader::new(bytes.as_slice());
        assert_eq!(reader.read_delta_u64s().unwrap(), values);
        reader.verify_checksum().unwrap();
    }

    #[test]
    fn test_checksum_covers_every_write() {
        let mut writer = StructWriter::new(Vec::new());
        writer.write_string("first").unwrap();
        writer.write_string("second").unwrap();
        let mut bytes = writer.finish().unwrap();

        // Corrupt the first payload, not the last one.
        bytes[1] ^= 0x20;

        let mut reader = StructReader::new(bytes.as_slice());
        reader.read_string().unwrap();
        reader.read_string().unwrap();
        let err = reader.verify_checksum().unwrap_err();
        assert!(err.to_string().contains("Checksum mismatch"));
    }

    #[test]
    fn test_truncated_input() {
        let mut writer = StructWriter::new(Vec::new());
        writer.write_string("hello world").unwrap();
        let bytes = writer.finish().unwrap();

        let mut reader = StructReader::new(&bytes[..5]);
        assert!(reader.read_string().is_err());
    }
}
