//! Provide the primitive operations shared by both representations.
//!
//! ## Menu
//!
//! - [`Encoder`] / [`Decoder`]: The primitive calls the walker drives.
//! - [`TagEncoder`] / [`TagDecoder`]: Realize them over the tag tree.
//! - [`BufEncoder`] / [`BufDecoder`]: Realize them over a [`ByteBuf`].
//!
//! A structure is a `begin_structure` call, then one `begin_element` call
//! before each element, then `end_structure`. A list is `begin_list` with
//! the element count, the elements, then `end_list`. Implementations of the
//! byte stream are positional and ignore names; implementations of the tag
//! tree key each element by its name.
//!
//! [`ByteBuf`]: crate::buf::ByteBuf

// -----------------------------------------------------------------------------
// Modules

mod buf;
mod tag;

// -----------------------------------------------------------------------------
// Exports

pub use buf::{BufDecoder, BufEncoder};
pub use tag::{TagDecoder, TagEncoder};

use alloc::string::String;
use alloc::vec::Vec;

use crate::SerialError;
use crate::info::EnumInfo;

// -----------------------------------------------------------------------------
// Encoder

/// A sink of primitive values.
///
/// Every method may fail with [`SerialError`]; the walker never retries.
pub trait Encoder {
    fn encode_bool(&mut self, v: bool) -> Result<(), SerialError>;

    fn encode_byte(&mut self, v: i8) -> Result<(), SerialError>;

    fn encode_short(&mut self, v: i16) -> Result<(), SerialError>;

    fn encode_int(&mut self, v: i32) -> Result<(), SerialError>;

    fn encode_long(&mut self, v: i64) -> Result<(), SerialError>;

    fn encode_float(&mut self, v: f32) -> Result<(), SerialError>;

    fn encode_double(&mut self, v: f64) -> Result<(), SerialError>;

    fn encode_string(&mut self, v: &str) -> Result<(), SerialError>;

    fn encode_bytes(&mut self, v: &[u8]) -> Result<(), SerialError>;

    /// Encodes a unit variant of `info`, `index` is already bounds checked.
    fn encode_enum(&mut self, info: &EnumInfo, index: u32) -> Result<(), SerialError>;

    /// Encodes the null mark, which stands for the whole value.
    fn encode_null(&mut self) -> Result<(), SerialError>;

    /// Encodes the mark preceding a present value of a nullable descriptor.
    fn encode_not_null_mark(&mut self) -> Result<(), SerialError>;

    fn begin_structure(&mut self, name: &str, len: usize) -> Result<(), SerialError>;

    /// Announces the element of the current structure encoded next.
    fn begin_element(&mut self, name: &str, index: usize) -> Result<(), SerialError>;

    fn end_structure(&mut self) -> Result<(), SerialError>;

    fn begin_list(&mut self, len: usize) -> Result<(), SerialError>;

    fn end_list(&mut self) -> Result<(), SerialError>;
}

// -----------------------------------------------------------------------------
// Decoder

/// A source of primitive values, symmetric to [`Encoder`].
pub trait Decoder {
    fn decode_bool(&mut self) -> Result<bool, SerialError>;

    fn decode_byte(&mut self) -> Result<i8, SerialError>;

    fn decode_short(&mut self) -> Result<i16, SerialError>;

    fn decode_int(&mut self) -> Result<i32, SerialError>;

    fn decode_long(&mut self) -> Result<i64, SerialError>;

    fn decode_float(&mut self) -> Result<f32, SerialError>;

    fn decode_double(&mut self) -> Result<f64, SerialError>;

    fn decode_string(&mut self) -> Result<String, SerialError>;

    fn decode_bytes(&mut self) -> Result<Vec<u8>, SerialError>;

    /// Decodes a unit variant of `info`, the returned ordinal is in bounds.
    fn decode_enum(&mut self, info: &EnumInfo) -> Result<u32, SerialError>;

    /// Decodes the nullability mark.
    ///
    /// Returns `false` (and consumes the null mark) if the value is absent,
    /// `true` if a payload follows.
    fn decode_not_null_mark(&mut self) -> Result<bool, SerialError>;

    fn begin_structure(&mut self, name: &str, len: usize) -> Result<(), SerialError>;

    /// Moves to the element of the current structure decoded next.
    ///
    /// Returns `false` if the representation has no such element.
    fn begin_element(&mut self, name: &str, index: usize) -> Result<bool, SerialError>;

    fn end_structure(&mut self) -> Result<(), SerialError>;

    /// Returns the number of elements of the list.
    fn begin_list(&mut self) -> Result<usize, SerialError>;

    fn end_list(&mut self) -> Result<(), SerialError>;

    /// Returns the number of bytes left, for positional representations.
    ///
    /// Used to reject element counts that the rest of the input cannot hold.
    #[inline]
    fn remaining(&self) -> Option<usize> {
        None
    }
}

/// Converts an ordinal decoded from a representation, checking its bounds.
pub(crate) fn check_ordinal(info: &EnumInfo, index: usize) -> Result<u32, SerialError> {
    match u32::try_from(index) {
        Ok(ordinal) if index < info.variant_len() => Ok(ordinal),
        _ => Err(SerialError::mismatch(alloc::format!(
            "ordinal {index} is out of range for enum `{}` with {} variants",
            info.name(),
            info.variant_len()
        ))),
    }
}
