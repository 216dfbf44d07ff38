use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use super::info_stack::InfoStack;
use super::resolve_tag;
use crate::SerialError;
use crate::codec::Decoder;
use crate::context::SerialContext;
use crate::info::{Descriptor, MapInfo, PolymorphicInfo, PrimitiveKind, SerialInfo};
use crate::value::{StructValue, Value};

/// Upper bound of the capacity reserved from a decoded count, which may be
/// garbage in a desynchronized stream.
const PREALLOC_LIMIT: usize = 4096;

/// Returns `true` if every encoding of `descriptor` takes at least one byte
/// in the byte stream.
///
/// Only structures whose fields are all such zero-sized structures (e.g. a
/// structure without fields) can be encoded with no bytes.
fn consumes_bytes(descriptor: &Descriptor) -> bool {
    if descriptor.is_nullable() {
        return true;
    }
    match descriptor.info() {
        SerialInfo::Struct(info) => info.iter().any(|field| consumes_bytes(field.descriptor())),
        _ => true,
    }
}

/// Rejects a decoded count of byte-consuming elements that exceeds the
/// remaining input, as read from a desynchronized stream.
fn check_count<D: Decoder>(decoder: &D, len: usize, consumes: bool) -> Result<(), SerialError> {
    match decoder.remaining() {
        Some(remaining) if consumes && len > remaining => Err(SerialError::EndOfStream {
            needed: len,
            remaining,
        }),
        _ => Ok(()),
    }
}

fn missing_element(structure: &str, element: &str) -> SerialError {
    SerialError::mismatch(format!("missing element `{element}` of `{structure}`"))
}

// -----------------------------------------------------------------------------
// DecodeDriver

/// Drives a [`Decoder`] to rebuild a value from its descriptor.
///
/// # Examples
///
/// ```
/// use drawer_serial::Serial;
/// use drawer_serial::codec::TagDecoder;
/// use drawer_serial::context::SerialContext;
/// use drawer_serial::tag::Tag;
/// use drawer_serial::walker::DecodeDriver;
///
/// let tag = Tag::List(vec![Tag::Int(1), Tag::Int(2)]);
/// let context = SerialContext::empty();
/// let value = DecodeDriver::new(&context)
///     .decode(&<Vec<i32>>::descriptor(), &mut TagDecoder::new(&tag))
///     .unwrap();
///
/// assert_eq!(<Vec<i32>>::from_value(value).unwrap(), [1, 2]);
/// ```
pub struct DecodeDriver<'a> {
    context: &'a SerialContext,
    stack: InfoStack,
}

impl<'a> DecodeDriver<'a> {
    #[inline]
    pub const fn new(context: &'a SerialContext) -> Self {
        Self {
            context,
            stack: InfoStack::new(),
        }
    }

    /// Decodes a value as described by `descriptor`.
    ///
    /// A structure element missing from the representation decodes as
    /// [`Value::Null`] if its descriptor is nullable.
    ///
    /// # Errors
    ///
    /// - [`SerialError::UnregisteredTag`]: a polymorphic tag could not be resolved.
    /// - [`SerialError::Mismatch`] or [`SerialError::EndOfStream`]: the
    ///   representation does not have the described shape.
    pub fn decode<D: Decoder>(
        &mut self,
        descriptor: &Descriptor,
        decoder: &mut D,
    ) -> Result<Value, SerialError> {
        self.walk(descriptor, decoder)
            .map_err(|err| self.stack.annotate(err))
    }

    fn walk<D: Decoder>(
        &mut self,
        descriptor: &Descriptor,
        decoder: &mut D,
    ) -> Result<Value, SerialError> {
        if descriptor.is_nullable() && !decoder.decode_not_null_mark()? {
            return Ok(Value::Null);
        }

        self.stack.push(descriptor);
        let value = self.walk_payload(descriptor, decoder)?;
        self.stack.pop();
        Ok(value)
    }

    fn walk_payload<D: Decoder>(
        &mut self,
        descriptor: &Descriptor,
        decoder: &mut D,
    ) -> Result<Value, SerialError> {
        match descriptor.info() {
            SerialInfo::Primitive(info) => decode_primitive(info.kind(), decoder),
            SerialInfo::Enum(info) => decoder.decode_enum(info).map(Value::Enum),
            SerialInfo::List(info) => {
                let len = decoder.begin_list()?;
                check_count(decoder, len, consumes_bytes(info.element()))?;
                let mut items = Vec::with_capacity(len.min(PREALLOC_LIMIT));
                for _ in 0..len {
                    items.push(self.walk(info.element(), decoder)?);
                }
                decoder.end_list()?;
                Ok(Value::List(items))
            }
            SerialInfo::Map(info) => {
                let len = decoder.begin_list()?;
                let consumes = consumes_bytes(info.key()) || consumes_bytes(info.value());
                check_count(decoder, len, consumes)?;
                let mut entries = Vec::with_capacity(len.min(PREALLOC_LIMIT));
                for _ in 0..len {
                    decoder.begin_structure(info.name(), 2)?;
                    if !decoder.begin_element(MapInfo::KEY, 0)? {
                        return Err(missing_element(info.name(), MapInfo::KEY));
                    }
                    let key = self.walk(info.key(), decoder)?;
                    if !decoder.begin_element(MapInfo::VALUE, 1)? {
                        return Err(missing_element(info.name(), MapInfo::VALUE));
                    }
                    let value = self.walk(info.value(), decoder)?;
                    decoder.end_structure()?;
                    entries.push((key, value));
                }
                decoder.end_list()?;
                Ok(Value::Map(entries))
            }
            SerialInfo::Struct(info) => {
                decoder.begin_structure(info.name(), info.field_len())?;
                let mut fields = Vec::with_capacity(info.field_len());
                for (index, field) in info.iter().enumerate() {
                    let value = if decoder.begin_element(field.name(), index)? {
                        self.walk(field.descriptor(), decoder)?
                    } else if field.descriptor().is_nullable() {
                        Value::Null
                    } else {
                        return Err(missing_element(info.name(), field.name()));
                    };
                    fields.push(value);
                }
                decoder.end_structure()?;
                Ok(StructValue::new(String::from(info.name()), fields).into())
            }
            SerialInfo::Polymorphic(info) => self.walk_polymorphic(info, decoder),
        }
    }

    fn walk_polymorphic<D: Decoder>(
        &mut self,
        info: &PolymorphicInfo,
        decoder: &mut D,
    ) -> Result<Value, SerialError> {
        decoder.begin_structure(info.name(), 2)?;
        if !decoder.begin_element(PolymorphicInfo::TYPE, 0)? {
            return Err(missing_element(info.name(), PolymorphicInfo::TYPE));
        }
        let tag = decoder.decode_string()?;

        let context = self.context;
        let concrete = resolve_tag(info, context, &tag)?;

        if !decoder.begin_element(PolymorphicInfo::VALUE, 1)? {
            return Err(missing_element(info.name(), PolymorphicInfo::VALUE));
        }
        let value = self.walk(concrete, decoder)?;
        decoder.end_structure()?;
        Ok(value)
    }
}

fn decode_primitive<D: Decoder>(kind: PrimitiveKind, decoder: &mut D) -> Result<Value, SerialError> {
    Ok(match kind {
        PrimitiveKind::Bool => Value::Bool(decoder.decode_bool()?),
        PrimitiveKind::Byte => Value::Byte(decoder.decode_byte()?),
        PrimitiveKind::Short => Value::Short(decoder.decode_short()?),
        PrimitiveKind::Int => Value::Int(decoder.decode_int()?),
        PrimitiveKind::Long => Value::Long(decoder.decode_long()?),
        PrimitiveKind::Float => Value::Float(decoder.decode_float()?),
        PrimitiveKind::Double => Value::Double(decoder.decode_double()?),
        PrimitiveKind::String => Value::String(decoder.decode_string()?),
        PrimitiveKind::Bytes => Value::Bytes(decoder.decode_bytes()?),
    })
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;
    use alloc::vec;

    use super::DecodeDriver;
    use crate::SerialError;
    use crate::codec::TagDecoder;
    use crate::context::SerialContext;
    use crate::info::{Descriptor, NamedField, PolymorphicInfo, PrimitiveKind, StructInfo};
    use crate::tag::{Tag, TagCompound};
    use crate::value::{StructValue, Value};

    fn named() -> Descriptor {
        Descriptor::new(StructInfo::new(
            "Named",
            [
                NamedField::new("id", Descriptor::primitive(PrimitiveKind::Int)),
                NamedField::new("name", Descriptor::primitive(PrimitiveKind::String).nullable()),
            ],
        ))
    }

    fn decode(descriptor: &Descriptor, tag: &Tag) -> Result<Value, SerialError> {
        let context = SerialContext::empty();
        DecodeDriver::new(&context).decode(descriptor, &mut TagDecoder::new(tag))
    }

    #[test]
    fn missing_nullable_field_is_null() {
        let tag = Tag::Compound([("id", Tag::Int(3))].into_iter().collect());
        assert_eq!(
            decode(&named(), &tag).unwrap(),
            StructValue::new("Named", vec![Value::Int(3), Value::Null]).into()
        );
    }

    #[test]
    fn missing_required_field() {
        let tag = Tag::Compound(TagCompound::new());
        let err = decode(&named(), &tag).unwrap_err();
        assert!(err.is_structural());
        assert!(err.to_string().contains("missing element `id` of `Named`"));
    }

    #[test]
    fn unknown_polymorphic_tag() {
        let shape = Descriptor::new(PolymorphicInfo::open("Shape"));
        let tag = Tag::Compound(
            [
                ("type", Tag::String("hexagon".to_string())),
                ("value", Tag::Compound(TagCompound::new())),
            ]
            .into_iter()
            .collect(),
        );

        assert_eq!(
            decode(&shape, &tag),
            Err(SerialError::UnregisteredTag {
                base: "Shape".to_string(),
                tag: "hexagon".to_string()
            })
        );
    }
}
