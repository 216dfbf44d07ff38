//! Provide the entry points binding a root value to its container.
//!
//! - Tag tree: [`put`] inserts a value under a slot key of a [`TagCompound`],
//!   [`get_from`] reads it back. See [`TagBinding`] for explicit keys and
//!   contexts.
//! - Byte stream: [`write`] appends a value to a [`ByteBuf`], [`read_from`]
//!   consumes it. See [`BufBinding`] for explicit contexts.
//!
//! ## Nullability
//!
//! The two representations treat absent values differently:
//!
//! | call                   | tag tree                             | byte stream                 |
//! |------------------------|--------------------------------------|-----------------------------|
//! | write null, nullable   | no-op, no entry                      | null mark (`0`)             |
//! | write null, not null   | [`SerialError::NonNullable`]         | [`SerialError::NonNullable`], nothing written |
//! | read absent, nullable  | null                                 | null                        |
//! | read absent, not null  | decode from an empty compound        | [`SerialError::NonNullable`] |
//!
//! A stream value always starts with its mark (`1` present), whatever the
//! nullability of the descriptor.

// -----------------------------------------------------------------------------
// Modules

#[cfg(test)]
mod tests;

use alloc::string::ToString;

use crate::buf::ByteBuf;
use crate::codec::{BufDecoder, BufEncoder, TagDecoder, TagEncoder};
use crate::context::SerialContext;
use crate::info::Descriptor;
use crate::tag::{Tag, TagCompound};
use crate::value::Value;
use crate::walker::{DecodeDriver, EncodeDriver};
use crate::{Serial, SerialError};

/// The context of calls without an explicit one.
static EMPTY_CONTEXT: SerialContext = SerialContext::empty();

fn non_nullable(descriptor: &Descriptor) -> SerialError {
    SerialError::NonNullable {
        name: descriptor.name().to_string(),
    }
}

// -----------------------------------------------------------------------------
// TagBinding

/// Binds values to the slots of a [`TagCompound`].
///
/// The slot key defaults to the descriptor name, the context to an empty one.
///
/// # Examples
///
/// ```
/// use drawer_serial::binding::TagBinding;
/// use drawer_serial::tag::TagCompound;
///
/// let mut compound = TagCompound::new();
/// TagBinding::new().with_key("spawn").put(&7_i32, &mut compound).unwrap();
/// TagBinding::new().with_key("home").put(&9_i32, &mut compound).unwrap();
///
/// let home: i32 = TagBinding::new().with_key("home").get_from(&compound).unwrap();
/// assert_eq!(home, 9);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TagBinding<'a> {
    key: Option<&'a str>,
    context: &'a SerialContext,
}

impl Default for TagBinding<'_> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> TagBinding<'a> {
    #[inline]
    pub fn new() -> Self {
        Self {
            key: None,
            context: &EMPTY_CONTEXT,
        }
    }

    /// Uses `key` instead of the descriptor name.
    ///
    /// Required to store two values of the same type in one compound.
    #[inline]
    pub fn with_key(self, key: &'a str) -> Self {
        Self {
            key: Some(key),
            ..self
        }
    }

    /// Resolves polymorphic values with `context`.
    #[inline]
    pub fn with_context(self, context: &'a SerialContext) -> Self {
        Self { context, ..self }
    }

    fn key_for<'d>(&self, descriptor: &'d Descriptor) -> &'d str
    where
        'a: 'd,
    {
        self.key.unwrap_or(descriptor.name())
    }

    /// Inserts `value` under the slot key.
    ///
    /// See [`put_value`](Self::put_value).
    #[inline]
    pub fn put<T: Serial>(&self, value: &T, compound: &mut TagCompound) -> Result<(), SerialError> {
        self.put_value(&T::descriptor(), &value.to_value(), compound)
    }

    /// Inserts `value`, described by `descriptor`, under the slot key.
    ///
    /// A null value with a nullable descriptor inserts nothing, so it reads
    /// back as an absent key.
    ///
    /// # Errors
    ///
    /// - [`SerialError::DuplicateSlot`]: the key is already present.
    /// - [`SerialError::NonNullable`]: a null value met a non-nullable descriptor.
    /// - Any encoding error, see [`EncodeDriver::encode`].
    ///
    /// The compound is left untouched on failure.
    pub fn put_value(
        &self,
        descriptor: &Descriptor,
        value: &Value,
        compound: &mut TagCompound,
    ) -> Result<(), SerialError> {
        let key = self.key_for(descriptor);
        log::trace!("put `{}` under key `{key}`", descriptor.name());

        if compound.contains(key) {
            return Err(SerialError::DuplicateSlot {
                key: key.to_string(),
                name: descriptor.name().to_string(),
            });
        }

        if value.is_null() {
            return if descriptor.is_nullable() {
                Ok(())
            } else {
                Err(non_nullable(descriptor))
            };
        }

        let mut encoder = TagEncoder::new();
        EncodeDriver::new(self.context).encode(descriptor, value, &mut encoder)?;
        compound.put(key, encoder.finish()?);
        Ok(())
    }

    /// Reads the value stored under the slot key.
    ///
    /// See [`get_value`](Self::get_value).
    #[inline]
    pub fn get_from<T: Serial>(&self, compound: &TagCompound) -> Result<T, SerialError> {
        T::from_value(self.get_value(&T::descriptor(), compound)?)
    }

    /// Reads the value stored under the slot key, described by `descriptor`.
    ///
    /// An absent key yields [`Value::Null`] for a nullable descriptor.
    /// Otherwise the value is decoded from an empty compound, which only
    /// succeeds for shapes that an empty compound satisfies (such as a
    /// structure of nullable fields).
    ///
    /// # Errors
    ///
    /// Any decoding error, see [`DecodeDriver::decode`].
    pub fn get_value(
        &self,
        descriptor: &Descriptor,
        compound: &TagCompound,
    ) -> Result<Value, SerialError> {
        let key = self.key_for(descriptor);
        log::trace!("get `{}` from key `{key}`", descriptor.name());

        let mut driver = DecodeDriver::new(self.context);
        match compound.get(key) {
            Some(tag) => driver.decode(descriptor, &mut TagDecoder::new(tag)),
            None if descriptor.is_nullable() => Ok(Value::Null),
            None => {
                log::warn!(
                    "key `{key}` is absent, decoding non-nullable `{}` from an empty compound",
                    descriptor.name()
                );
                let empty = Tag::Compound(TagCompound::new());
                driver.decode(descriptor, &mut TagDecoder::new(&empty))
            }
        }
    }
}

// -----------------------------------------------------------------------------
// BufBinding

/// Appends values to, and consumes values from, a [`ByteBuf`].
///
/// The stream is positional: values must be read in the order, and with the
/// descriptors, they were written.
///
/// # Examples
///
/// ```
/// use drawer_serial::binding::BufBinding;
/// use drawer_serial::buf::ByteBuf;
///
/// let mut buf = ByteBuf::new();
/// BufBinding::new().write(&Some(3_i64), &mut buf).unwrap();
/// BufBinding::new().write(&None::<i64>, &mut buf).unwrap();
///
/// assert_eq!(BufBinding::new().read_from::<Option<i64>>(&mut buf).unwrap(), Some(3));
/// assert_eq!(BufBinding::new().read_from::<Option<i64>>(&mut buf).unwrap(), None);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct BufBinding<'a> {
    context: &'a SerialContext,
}

impl Default for BufBinding<'_> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> BufBinding<'a> {
    #[inline]
    pub fn new() -> Self {
        Self {
            context: &EMPTY_CONTEXT,
        }
    }

    /// Resolves polymorphic values with `context`.
    #[inline]
    pub fn with_context(self, context: &'a SerialContext) -> Self {
        Self { context }
    }

    /// Appends `value` to the stream.
    ///
    /// See [`write_value`](Self::write_value).
    #[inline]
    pub fn write<T: Serial>(&self, value: &T, buf: &mut ByteBuf) -> Result<(), SerialError> {
        self.write_value(&T::descriptor(), &value.to_value(), buf)
    }

    /// Appends the mark of `value`, then its payload if present.
    ///
    /// # Errors
    ///
    /// - [`SerialError::NonNullable`]: a null value met a non-nullable
    ///   descriptor, nothing is written.
    /// - Any encoding error, see [`EncodeDriver::encode`]. The bytes written
    ///   before the failure stay in the buffer.
    pub fn write_value(
        &self,
        descriptor: &Descriptor,
        value: &Value,
        buf: &mut ByteBuf,
    ) -> Result<(), SerialError> {
        log::trace!("write `{}` at byte {}", descriptor.name(), buf.writer_index());

        if value.is_null() {
            if !descriptor.is_nullable() {
                return Err(non_nullable(descriptor));
            }
            buf.write_bool(false);
            return Ok(());
        }

        buf.write_bool(true);
        EncodeDriver::new(self.context).encode(
            &descriptor.non_null(),
            value,
            &mut BufEncoder::new(buf),
        )
    }

    /// Consumes a value from the stream.
    ///
    /// See [`read_value`](Self::read_value).
    #[inline]
    pub fn read_from<T: Serial>(&self, buf: &mut ByteBuf) -> Result<T, SerialError> {
        T::from_value(self.read_value(&T::descriptor(), buf)?)
    }

    /// Consumes the mark of a value, then its payload if present.
    ///
    /// # Errors
    ///
    /// - [`SerialError::NonNullable`]: the mark is absent and the descriptor
    ///   is not nullable.
    /// - [`SerialError::Mismatch`]: the mark is neither `0` nor `1`.
    /// - Any decoding error, see [`DecodeDriver::decode`].
    pub fn read_value(&self, descriptor: &Descriptor, buf: &mut ByteBuf) -> Result<Value, SerialError> {
        log::trace!("read `{}` at byte {}", descriptor.name(), buf.reader_index());

        match buf.read_u8()? {
            1 => DecodeDriver::new(self.context)
                .decode(&descriptor.non_null(), &mut BufDecoder::new(buf)),
            0 if descriptor.is_nullable() => Ok(Value::Null),
            0 => Err(non_nullable(descriptor)),
            mark => Err(SerialError::mismatch(alloc::format!(
                "invalid nullability mark {mark:#04x} for `{}`",
                descriptor.name()
            ))),
        }
    }
}

// -----------------------------------------------------------------------------
// Shortcuts

/// Inserts `value` under its descriptor name, with an empty context.
///
/// See [`TagBinding::put_value`].
///
/// # Examples
///
/// ```
/// use drawer_serial::tag::TagCompound;
///
/// let mut compound = TagCompound::new();
/// drawer_serial::put(&String::from("hello"), &mut compound).unwrap();
///
/// // The default key is the descriptor name: a second `String` collides.
/// assert!(drawer_serial::put(&String::from("again"), &mut compound).is_err());
/// assert_eq!(drawer_serial::get_from::<String>(&compound).unwrap(), "hello");
/// ```
#[inline]
pub fn put<T: Serial>(value: &T, compound: &mut TagCompound) -> Result<(), SerialError> {
    TagBinding::new().put(value, compound)
}

/// Reads the value stored under its descriptor name, with an empty context.
///
/// See [`TagBinding::get_value`].
#[inline]
pub fn get_from<T: Serial>(compound: &TagCompound) -> Result<T, SerialError> {
    TagBinding::new().get_from(compound)
}

/// Appends `value` to the stream, with an empty context.
///
/// See [`BufBinding::write_value`].
#[inline]
pub fn write<T: Serial>(value: &T, buf: &mut ByteBuf) -> Result<(), SerialError> {
    BufBinding::new().write(value, buf)
}

/// Consumes a value from the stream, with an empty context.
///
/// See [`BufBinding::read_value`].
#[inline]
pub fn read_from<T: Serial>(buf: &mut ByteBuf) -> Result<T, SerialError> {
    BufBinding::new().read_from(buf)
}
