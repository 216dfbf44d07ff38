use alloc::string::String;
use alloc::vec::Vec;

use super::{Decoder, Encoder, check_ordinal};
use crate::SerialError;
use crate::buf::{ByteBuf, length_to_var_int};
use crate::info::EnumInfo;

// -----------------------------------------------------------------------------
// BufEncoder

/// Appends primitives to a [`ByteBuf`].
///
/// Structures and elements produce no bytes, nullability marks are one byte
/// (`0` absent, `1` present), list counts and enum ordinals are VarInts.
pub struct BufEncoder<'a> {
    buf: &'a mut ByteBuf,
}

impl<'a> BufEncoder<'a> {
    #[inline]
    pub fn new(buf: &'a mut ByteBuf) -> Self {
        Self { buf }
    }
}

impl Encoder for BufEncoder<'_> {
    fn encode_bool(&mut self, v: bool) -> Result<(), SerialError> {
        self.buf.write_bool(v);
        Ok(())
    }

    fn encode_byte(&mut self, v: i8) -> Result<(), SerialError> {
        self.buf.write_byte(v);
        Ok(())
    }

    fn encode_short(&mut self, v: i16) -> Result<(), SerialError> {
        self.buf.write_short(v);
        Ok(())
    }

    fn encode_int(&mut self, v: i32) -> Result<(), SerialError> {
        self.buf.write_int(v);
        Ok(())
    }

    fn encode_long(&mut self, v: i64) -> Result<(), SerialError> {
        self.buf.write_long(v);
        Ok(())
    }

    fn encode_float(&mut self, v: f32) -> Result<(), SerialError> {
        self.buf.write_float(v);
        Ok(())
    }

    fn encode_double(&mut self, v: f64) -> Result<(), SerialError> {
        self.buf.write_double(v);
        Ok(())
    }

    fn encode_string(&mut self, v: &str) -> Result<(), SerialError> {
        self.buf.write_string(v)
    }

    fn encode_bytes(&mut self, v: &[u8]) -> Result<(), SerialError> {
        self.buf.write_byte_array(v)
    }

    #[allow(clippy::cast_possible_wrap)]
    fn encode_enum(&mut self, _info: &EnumInfo, index: u32) -> Result<(), SerialError> {
        self.buf.write_var_int(index as i32);
        Ok(())
    }

    fn encode_null(&mut self) -> Result<(), SerialError> {
        self.buf.write_bool(false);
        Ok(())
    }

    fn encode_not_null_mark(&mut self) -> Result<(), SerialError> {
        self.buf.write_bool(true);
        Ok(())
    }

    #[inline]
    fn begin_structure(&mut self, _name: &str, _len: usize) -> Result<(), SerialError> {
        Ok(())
    }

    #[inline]
    fn begin_element(&mut self, _name: &str, _index: usize) -> Result<(), SerialError> {
        Ok(())
    }

    #[inline]
    fn end_structure(&mut self) -> Result<(), SerialError> {
        Ok(())
    }

    fn begin_list(&mut self, len: usize) -> Result<(), SerialError> {
        self.buf.write_var_int(length_to_var_int(len)?);
        Ok(())
    }

    #[inline]
    fn end_list(&mut self) -> Result<(), SerialError> {
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// BufDecoder

/// Consumes primitives from a [`ByteBuf`], in the order [`BufEncoder`]
/// wrote them.
///
/// The stream is not self-describing: reading with a descriptor other than
/// the one used for writing either fails or yields wrong values. Element
/// counts larger than the remaining bytes are rejected, except for elements
/// encoded with no bytes at all (structures without fields).
pub struct BufDecoder<'a> {
    buf: &'a mut ByteBuf,
}

impl<'a> BufDecoder<'a> {
    #[inline]
    pub fn new(buf: &'a mut ByteBuf) -> Self {
        Self { buf }
    }
}

impl Decoder for BufDecoder<'_> {
    fn decode_bool(&mut self) -> Result<bool, SerialError> {
        self.buf.read_bool()
    }

    fn decode_byte(&mut self) -> Result<i8, SerialError> {
        self.buf.read_byte()
    }

    fn decode_short(&mut self) -> Result<i16, SerialError> {
        self.buf.read_short()
    }

    fn decode_int(&mut self) -> Result<i32, SerialError> {
        self.buf.read_int()
    }

    fn decode_long(&mut self) -> Result<i64, SerialError> {
        self.buf.read_long()
    }

    fn decode_float(&mut self) -> Result<f32, SerialError> {
        self.buf.read_float()
    }

    fn decode_double(&mut self) -> Result<f64, SerialError> {
        self.buf.read_double()
    }

    fn decode_string(&mut self) -> Result<String, SerialError> {
        self.buf.read_string()
    }

    fn decode_bytes(&mut self) -> Result<Vec<u8>, SerialError> {
        self.buf.read_byte_array()
    }

    fn decode_enum(&mut self, info: &EnumInfo) -> Result<u32, SerialError> {
        let index = self.buf.read_length()?;
        check_ordinal(info, index)
    }

    fn decode_not_null_mark(&mut self) -> Result<bool, SerialError> {
        self.buf.read_bool()
    }

    #[inline]
    fn begin_structure(&mut self, _name: &str, _len: usize) -> Result<(), SerialError> {
        Ok(())
    }

    #[inline]
    fn begin_element(&mut self, _name: &str, _index: usize) -> Result<bool, SerialError> {
        Ok(true)
    }

    #[inline]
    fn end_structure(&mut self) -> Result<(), SerialError> {
        Ok(())
    }

    fn begin_list(&mut self) -> Result<usize, SerialError> {
        self.buf.read_length()
    }

    #[inline]
    fn end_list(&mut self) -> Result<(), SerialError> {
        Ok(())
    }

    #[inline]
    fn remaining(&self) -> Option<usize> {
        Some(self.buf.readable_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::{BufDecoder, BufEncoder};
    use crate::buf::ByteBuf;
    use crate::codec::{Decoder, Encoder};
    use crate::info::EnumInfo;

    #[test]
    fn marks_and_counts_layout() {
        let info = EnumInfo::new("Side", ["Left", "Right"]);
        let mut buf = ByteBuf::new();
        {
            let mut enc = BufEncoder::new(&mut buf);
            enc.encode_not_null_mark().unwrap();
            enc.begin_list(2).unwrap();
            enc.encode_enum(&info, 1).unwrap();
            enc.encode_null().unwrap();
            enc.end_list().unwrap();
        }
        assert_eq!(buf.as_slice(), &[1, 2, 1, 0]);

        let mut dec = BufDecoder::new(&mut buf);
        assert!(dec.decode_not_null_mark().unwrap());
        assert_eq!(dec.begin_list().unwrap(), 2);
        assert_eq!(dec.decode_enum(&info).unwrap(), 1);
        assert!(!dec.decode_not_null_mark().unwrap());
    }

    #[test]
    fn ordinal_out_of_range() {
        let info = EnumInfo::new("Side", ["Left", "Right"]);
        let mut buf = ByteBuf::new();
        buf.write_var_int(5);

        let err = BufDecoder::new(&mut buf).decode_enum(&info).unwrap_err();
        assert!(err.is_structural());
    }
}
