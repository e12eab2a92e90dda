//! Bounds-checked little-endian reads over a byte slice
//!
//! Every read checks the remaining length first and reports
//! [`FormatError::Truncated`] tagged with the section being decoded.

use byteorder::{ByteOrder, LittleEndian};

use crate::error::FormatError;

/// Result type for parsing operations
pub type ParseResult<T> = Result<T, FormatError>;

/// Trait for reading binary data from a byte slice
pub trait ByteReader {
    /// Read a single unsigned 8-bit integer
    fn read_u8(&mut self) -> ParseResult<u8>;

    /// Read a signed 16-bit integer in little-endian format
    fn read_i16_le(&mut self) -> ParseResult<i16>;

    /// Read an unsigned 16-bit integer in little-endian format
    fn read_u16_le(&mut self) -> ParseResult<u16>;

    /// Read a signed 32-bit integer in little-endian format
    fn read_i32_le(&mut self) -> ParseResult<i32>;

    /// Read a 32-bit float in little-endian format
    fn read_f32_le(&mut self) -> ParseResult<f32>;

    /// Read exactly `buf.len()` bytes into a pre-allocated buffer
    fn read_into(&mut self, buf: &mut [u8]) -> ParseResult<()>;
}

/// A cursor for reading binary data from a byte slice
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    data: &'a [u8],
    position: usize,
    section: &'static str,
}

impl<'a> Cursor<'a> {
    /// Create a cursor at `offset`, tagging errors with `section`
    pub fn at(data: &'a [u8], offset: usize, section: &'static str) -> Self {
        Self {
            data,
            position: offset,
            section,
        }
    }

    /// Current read position
    pub fn position(&self) -> usize {
        self.position
    }

    /// Fail unless `needed` more bytes are available
    pub fn ensure(&self, needed: usize) -> ParseResult<()> {
        let end = self.position.checked_add(needed);
        match end {
            Some(end) if end <= self.data.len() => Ok(()),
            _ => Err(FormatError::Truncated {
                section: self.section,
                offset: self.position,
                needed,
                available: self.data.len(),
            }),
        }
    }

    fn take(&mut self, n: usize) -> ParseResult<&'a [u8]> {
        self.ensure(n)?;
        let bytes = &self.data[self.position..self.position + n];
        self.position += n;
        Ok(bytes)
    }
}

impl ByteReader for Cursor<'_> {
    fn read_u8(&mut self) -> ParseResult<u8> {
        Ok(self.take(1)?[0])
    }

    fn read_i16_le(&mut self) -> ParseResult<i16> {
        Ok(LittleEndian::read_i16(self.take(2)?))
    }

    fn read_u16_le(&mut self) -> ParseResult<u16> {
        Ok(LittleEndian::read_u16(self.take(2)?))
    }

    fn read_i32_le(&mut self) -> ParseResult<i32> {
        Ok(LittleEndian::read_i32(self.take(4)?))
    }

    fn read_f32_le(&mut self) -> ParseResult<f32> {
        Ok(LittleEndian::read_f32(self.take(4)?))
    }

    fn read_into(&mut self, buf: &mut [u8]) -> ParseResult<()> {
        buf.copy_from_slice(self.take(buf.len())?);
        Ok(())
    }
}

/// Read three little-endian floats
pub fn read_vec3(reader: &mut impl ByteReader) -> ParseResult<glam::Vec3> {
    let x = reader.read_f32_le()?;
    let y = reader.read_f32_le()?;
    let z = reader.read_f32_le()?;
    Ok(glam::Vec3::new(x, y, z))
}

/// Read a fixed-width, null-terminated name and trim it at the first null
///
/// The bytes are kept as stored; names are not required to be UTF-8.
pub fn read_fixed_name<const N: usize>(reader: &mut impl ByteReader) -> ParseResult<Vec<u8>> {
    let mut raw = [0u8; N];
    reader.read_into(&mut raw)?;
    let end = raw.iter().position(|&b| b == 0).unwrap_or(N);
    Ok(raw[..end].to_vec())
}
