//! Provide [`ByteBuf`], the cursor-based byte stream.
//!
//! # Format
//!
//! - **Fixed-size primitives**: integers and floats are big-endian, `bool` is
//!   a single `0`/`1` byte.
//! - **VarInt**: lengths, element counts and enum ordinals use LEB128 over the
//!   unsigned bit pattern of an `i32`, at most 5 bytes.
//! - **Strings/bytes**: VarInt length followed by the UTF-8 (or raw) bytes.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use crate::SerialError;

/// Maximum number of bytes of an encoded VarInt.
const MAX_VAR_INT_BYTES: usize = 5;

/// A growable byte buffer with an append-only writer and a forward-only reader.
///
/// Writes always append at the end; reads consume from the reader index.
///
/// # Examples
///
/// ```
/// use drawer_serial::buf::ByteBuf;
///
/// let mut buf = ByteBuf::new();
/// buf.write_var_int(300);
/// buf.write_string("hi").unwrap();
///
/// assert_eq!(buf.read_var_int().unwrap(), 300);
/// assert_eq!(buf.read_string().unwrap(), "hi");
/// assert_eq!(buf.readable_bytes(), 0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ByteBuf {
    data: Vec<u8>,
    reader_index: usize,
}

impl ByteBuf {
    #[inline]
    pub const fn new() -> Self {
        Self {
            data: Vec::new(),
            reader_index: 0,
        }
    }

    /// Wraps existing bytes, ready to be read from the start.
    #[inline]
    pub fn wrap(data: Vec<u8>) -> Self {
        Self {
            data,
            reader_index: 0,
        }
    }

    #[inline]
    pub const fn reader_index(&self) -> usize {
        self.reader_index
    }

    /// Index where the next write lands, i.e. the total length.
    #[inline]
    pub fn writer_index(&self) -> usize {
        self.data.len()
    }

    /// Number of bytes left to read.
    #[inline]
    pub fn readable_bytes(&self) -> usize {
        self.data.len() - self.reader_index
    }

    /// All written bytes, including the ones already read.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    #[inline]
    pub fn into_inner(self) -> Vec<u8> {
        self.data
    }

    // -------------------------------------------------------------------------
    // Write

    #[inline]
    pub fn write_u8(&mut self, v: u8) {
        self.data.push(v);
    }

    #[inline]
    pub fn write_bool(&mut self, v: bool) {
        self.write_u8(u8::from(v));
    }

    #[inline]
    pub fn write_byte(&mut self, v: i8) {
        self.data.extend_from_slice(&v.to_be_bytes());
    }

    #[inline]
    pub fn write_short(&mut self, v: i16) {
        self.data.extend_from_slice(&v.to_be_bytes());
    }

    #[inline]
    pub fn write_int(&mut self, v: i32) {
        self.data.extend_from_slice(&v.to_be_bytes());
    }

    #[inline]
    pub fn write_long(&mut self, v: i64) {
        self.data.extend_from_slice(&v.to_be_bytes());
    }

    #[inline]
    pub fn write_float(&mut self, v: f32) {
        self.data.extend_from_slice(&v.to_be_bytes());
    }

    #[inline]
    pub fn write_double(&mut self, v: f64) {
        self.data.extend_from_slice(&v.to_be_bytes());
    }

    /// Writes an `i32` as LEB128 over its unsigned bit pattern.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn write_var_int(&mut self, v: i32) {
        let mut value = v as u32;
        while value >= 0x80 {
            self.data.push((value as u8) | 0x80);
            value >>= 7;
        }
        self.data.push(value as u8);
    }

    /// Writes a VarInt length followed by the raw bytes.
    ///
    /// Fails, writing nothing, if `v` is longer than `i32::MAX` bytes.
    pub fn write_byte_array(&mut self, v: &[u8]) -> Result<(), SerialError> {
        self.write_var_int(length_to_var_int(v.len())?);
        self.data.extend_from_slice(v);
        Ok(())
    }

    /// Writes a VarInt length followed by the UTF-8 bytes.
    #[inline]
    pub fn write_string(&mut self, v: &str) -> Result<(), SerialError> {
        self.write_byte_array(v.as_bytes())
    }

    // -------------------------------------------------------------------------
    // Read

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], SerialError> {
        let bytes = self.read_raw(N)?;
        let mut array = [0; N];
        array.copy_from_slice(bytes);
        Ok(array)
    }

    /// Consumes exactly `len` bytes.
    pub fn read_raw(&mut self, len: usize) -> Result<&[u8], SerialError> {
        let remaining = self.readable_bytes();
        if remaining < len {
            return Err(SerialError::EndOfStream {
                needed: len,
                remaining,
            });
        }
        let start = self.reader_index;
        self.reader_index += len;
        Ok(&self.data[start..self.reader_index])
    }

    #[inline]
    pub fn read_u8(&mut self) -> Result<u8, SerialError> {
        Ok(self.read_array::<1>()?[0])
    }

    /// Reads a `0`/`1` byte, any other value is a structural mismatch.
    pub fn read_bool(&mut self) -> Result<bool, SerialError> {
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(SerialError::mismatch(format!(
                "invalid boolean byte {other:#04x}"
            ))),
        }
    }

    #[inline]
    pub fn read_byte(&mut self) -> Result<i8, SerialError> {
        self.read_array().map(i8::from_be_bytes)
    }

    #[inline]
    pub fn read_short(&mut self) -> Result<i16, SerialError> {
        self.read_array().map(i16::from_be_bytes)
    }

    #[inline]
    pub fn read_int(&mut self) -> Result<i32, SerialError> {
        self.read_array().map(i32::from_be_bytes)
    }

    #[inline]
    pub fn read_long(&mut self) -> Result<i64, SerialError> {
        self.read_array().map(i64::from_be_bytes)
    }

    #[inline]
    pub fn read_float(&mut self) -> Result<f32, SerialError> {
        self.read_array().map(f32::from_be_bytes)
    }

    #[inline]
    pub fn read_double(&mut self) -> Result<f64, SerialError> {
        self.read_array().map(f64::from_be_bytes)
    }

    #[allow(clippy::cast_possible_wrap)]
    pub fn read_var_int(&mut self) -> Result<i32, SerialError> {
        let mut value: u32 = 0;
        for i in 0..MAX_VAR_INT_BYTES {
            let byte = self.read_u8()?;
            value |= u32::from(byte & 0x7F) << (7 * i);
            if byte & 0x80 == 0 {
                return Ok(value as i32);
            }
        }
        Err(SerialError::mismatch("VarInt is longer than 5 bytes"))
    }

    /// Reads a VarInt that must be a valid length.
    pub fn read_length(&mut self) -> Result<usize, SerialError> {
        let len = self.read_var_int()?;
        usize::try_from(len)
            .map_err(|_| SerialError::mismatch(format!("negative length {len}")))
    }

    pub fn read_byte_array(&mut self) -> Result<Vec<u8>, SerialError> {
        let len = self.read_length()?;
        self.read_raw(len).map(<[u8]>::to_vec)
    }

    pub fn read_string(&mut self) -> Result<String, SerialError> {
        let bytes = self.read_byte_array()?;
        String::from_utf8(bytes)
            .map_err(|e| SerialError::mismatch(format!("invalid UTF-8 string: {e}")))
    }
}

/// Converts a collection length into its VarInt form.
pub(crate) fn length_to_var_int(len: usize) -> Result<i32, SerialError> {
    i32::try_from(len)
        .map_err(|_| SerialError::mismatch(format!("length {len} exceeds the VarInt range")))
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::{ByteBuf, length_to_var_int};
    use crate::SerialError;

    #[test]
    fn var_int_layout() {
        let cases: [(i32, &[u8]); 5] = [
            (0, &[0x00]),
            (1, &[0x01]),
            (127, &[0x7F]),
            (300, &[0xAC, 0x02]),
            (-1, &[0xFF, 0xFF, 0xFF, 0xFF, 0x0F]),
        ];

        for (value, bytes) in cases {
            let mut buf = ByteBuf::new();
            buf.write_var_int(value);
            assert_eq!(buf.as_slice(), bytes, "encoding {value}");
            assert_eq!(buf.read_var_int().unwrap(), value);
        }
    }

    #[test]
    fn big_endian_scalars() {
        let mut buf = ByteBuf::new();
        buf.write_int(0x0102_0304);
        buf.write_short(-2);
        assert_eq!(buf.as_slice(), &[1, 2, 3, 4, 0xFF, 0xFE]);
        assert_eq!(buf.read_int().unwrap(), 0x0102_0304);
        assert_eq!(buf.read_short().unwrap(), -2);
    }

    #[test]
    fn truncated_stream() {
        let mut buf = ByteBuf::wrap(vec![0, 0]);
        assert_eq!(
            buf.read_int(),
            Err(SerialError::EndOfStream {
                needed: 4,
                remaining: 2
            })
        );
    }

    #[test]
    fn length_out_of_var_int_range() {
        assert_eq!(length_to_var_int(i32::MAX as usize), Ok(i32::MAX));
        let err = length_to_var_int(i32::MAX as usize + 1).unwrap_err();
        assert!(err.is_structural());
    }

    #[test]
    fn overlong_var_int() {
        let mut buf = ByteBuf::wrap(vec![0x80; 6]);
        assert!(buf.read_var_int().unwrap_err().is_structural());
    }

    #[test]
    fn invalid_utf8_and_bool() {
        let mut buf = ByteBuf::wrap(vec![2, 0xC3, 0x28]);
        assert!(buf.read_string().unwrap_err().is_structural());

        let mut buf = ByteBuf::wrap(vec![7]);
        assert!(buf.read_bool().unwrap_err().is_structural());
    }
}
