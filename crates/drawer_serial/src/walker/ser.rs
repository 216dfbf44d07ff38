use alloc::format;
use alloc::string::ToString;

use super::info_stack::InfoStack;
use super::resolve_type;
use crate::SerialError;
use crate::codec::Encoder;
use crate::context::SerialContext;
use crate::info::{Descriptor, MapInfo, PolymorphicInfo, PrimitiveKind, SerialInfo};
use crate::value::Value;

fn mismatch(descriptor: &Descriptor, found: &Value) -> SerialError {
    SerialError::mismatch(format!(
        "expected {} `{}`, found {}",
        descriptor.kind(),
        descriptor.name(),
        found.variant_name()
    ))
}

// -----------------------------------------------------------------------------
// EncodeDriver

/// Drives an [`Encoder`] with the primitive calls of a value.
///
/// # Examples
///
/// ```
/// use drawer_serial::Serial;
/// use drawer_serial::codec::TagEncoder;
/// use drawer_serial::context::SerialContext;
/// use drawer_serial::tag::Tag;
/// use drawer_serial::value::Value;
/// use drawer_serial::walker::EncodeDriver;
///
/// let context = SerialContext::empty();
/// let mut encoder = TagEncoder::new();
/// EncodeDriver::new(&context)
///     .encode(&<Vec<i32>>::descriptor(), &vec![1, 2].to_value(), &mut encoder)
///     .unwrap();
///
/// assert_eq!(encoder.finish().unwrap(), Tag::List(vec![Tag::Int(1), Tag::Int(2)]));
/// ```
pub struct EncodeDriver<'a> {
    context: &'a SerialContext,
    stack: InfoStack,
}

impl<'a> EncodeDriver<'a> {
    #[inline]
    pub const fn new(context: &'a SerialContext) -> Self {
        Self {
            context,
            stack: InfoStack::new(),
        }
    }

    /// Encodes `value` as described by `descriptor`.
    ///
    /// # Errors
    ///
    /// - [`SerialError::NonNullable`]: a null value met a non-nullable descriptor.
    /// - [`SerialError::UnregisteredType`]: a polymorphic value could not be resolved.
    /// - [`SerialError::Mismatch`]: the value does not have the described shape.
    ///
    /// On failure the encoder may hold a partial output.
    pub fn encode<E: Encoder>(
        &mut self,
        descriptor: &Descriptor,
        value: &Value,
        encoder: &mut E,
    ) -> Result<(), SerialError> {
        self.walk(descriptor, value, encoder)
            .map_err(|err| self.stack.annotate(err))
    }

    fn walk<E: Encoder>(
        &mut self,
        descriptor: &Descriptor,
        value: &Value,
        encoder: &mut E,
    ) -> Result<(), SerialError> {
        if value.is_null() {
            return if descriptor.is_nullable() {
                encoder.encode_null()
            } else {
                Err(SerialError::NonNullable {
                    name: descriptor.name().to_string(),
                })
            };
        }

        if descriptor.is_nullable() {
            encoder.encode_not_null_mark()?;
        }

        // Popped on success only, so a failure keeps the path.
        self.stack.push(descriptor);
        self.walk_payload(descriptor, value, encoder)?;
        self.stack.pop();
        Ok(())
    }

    fn walk_payload<E: Encoder>(
        &mut self,
        descriptor: &Descriptor,
        value: &Value,
        encoder: &mut E,
    ) -> Result<(), SerialError> {
        match (descriptor.info(), value) {
            (SerialInfo::Primitive(info), value) => {
                encode_primitive(info.kind(), value, encoder)
                    .unwrap_or_else(|| Err(mismatch(descriptor, value)))
            }
            (SerialInfo::Enum(info), Value::Enum(index)) => {
                if (*index as usize) < info.variant_len() {
                    encoder.encode_enum(info, *index)
                } else {
                    Err(SerialError::mismatch(format!(
                        "ordinal {index} is out of range for enum `{}` with {} variants",
                        info.name(),
                        info.variant_len()
                    )))
                }
            }
            (SerialInfo::List(info), Value::List(items)) => {
                encoder.begin_list(items.len())?;
                for item in items {
                    self.walk(info.element(), item, encoder)?;
                }
                encoder.end_list()
            }
            (SerialInfo::Map(info), Value::Map(entries)) => {
                encoder.begin_list(entries.len())?;
                for (key, value) in entries {
                    encoder.begin_structure(info.name(), 2)?;
                    encoder.begin_element(MapInfo::KEY, 0)?;
                    self.walk(info.key(), key, encoder)?;
                    encoder.begin_element(MapInfo::VALUE, 1)?;
                    self.walk(info.value(), value, encoder)?;
                    encoder.end_structure()?;
                }
                encoder.end_list()
            }
            (SerialInfo::Struct(info), Value::Struct(struct_value)) => {
                if struct_value.field_len() != info.field_len() {
                    return Err(SerialError::mismatch(format!(
                        "struct `{}` has {} fields, but `{}` carries {}",
                        info.name(),
                        info.field_len(),
                        struct_value.type_name(),
                        struct_value.field_len()
                    )));
                }

                encoder.begin_structure(info.name(), info.field_len())?;
                for (index, (field, value)) in info.iter().zip(struct_value.fields()).enumerate() {
                    encoder.begin_element(field.name(), index)?;
                    self.walk(field.descriptor(), value, encoder)?;
                }
                encoder.end_structure()
            }
            (SerialInfo::Polymorphic(info), value) => self.walk_polymorphic(info, value, encoder),
            (_, value) => Err(mismatch(descriptor, value)),
        }
    }

    fn walk_polymorphic<E: Encoder>(
        &mut self,
        info: &PolymorphicInfo,
        value: &Value,
        encoder: &mut E,
    ) -> Result<(), SerialError> {
        let Some(type_name) = value.runtime_type() else {
            return Err(SerialError::mismatch(format!(
                "a value of polymorphic base `{}` must be a structure, found {}",
                info.name(),
                value.variant_name()
            )));
        };
        let context = self.context;
        let (tag, concrete) = resolve_type(info, context, type_name)?;

        encoder.begin_structure(info.name(), 2)?;
        encoder.begin_element(PolymorphicInfo::TYPE, 0)?;
        encoder.encode_string(tag)?;
        encoder.begin_element(PolymorphicInfo::VALUE, 1)?;
        self.walk(concrete, value, encoder)?;
        encoder.end_structure()
    }
}

/// Returns `None` if `value` is not of the `kind` variant.
fn encode_primitive<E: Encoder>(
    kind: PrimitiveKind,
    value: &Value,
    encoder: &mut E,
) -> Option<Result<(), SerialError>> {
    let result = match (kind, value) {
        (PrimitiveKind::Bool, Value::Bool(v)) => encoder.encode_bool(*v),
        (PrimitiveKind::Byte, Value::Byte(v)) => encoder.encode_byte(*v),
        (PrimitiveKind::Short, Value::Short(v)) => encoder.encode_short(*v),
        (PrimitiveKind::Int, Value::Int(v)) => encoder.encode_int(*v),
        (PrimitiveKind::Long, Value::Long(v)) => encoder.encode_long(*v),
        (PrimitiveKind::Float, Value::Float(v)) => encoder.encode_float(*v),
        (PrimitiveKind::Double, Value::Double(v)) => encoder.encode_double(*v),
        (PrimitiveKind::String, Value::String(v)) => encoder.encode_string(v),
        (PrimitiveKind::Bytes, Value::Bytes(v)) => encoder.encode_bytes(v),
        _ => return None,
    };
    Some(result)
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;
    use alloc::vec;

    use super::EncodeDriver;
    use crate::SerialError;
    use crate::codec::TagEncoder;
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

    fn encode(descriptor: &Descriptor, value: &Value) -> Result<Tag, SerialError> {
        let context = SerialContext::empty();
        let mut encoder = TagEncoder::new();
        EncodeDriver::new(&context).encode(descriptor, value, &mut encoder)?;
        encoder.finish()
    }

    #[test]
    fn null_field_is_written_as_mark() {
        let value = StructValue::new("Named", vec![Value::Int(7), Value::Null]).into();
        let tag = encode(&named(), &value).unwrap();

        let expected: TagCompound = [("id", Tag::Int(7)), ("name", Tag::End)].into_iter().collect();
        assert_eq!(tag, Tag::Compound(expected));
    }

    #[test]
    fn null_for_non_nullable_field() {
        let value = StructValue::new("Named", vec![Value::Null, Value::Null]).into();
        assert_eq!(
            encode(&named(), &value),
            Err(SerialError::NonNullable {
                name: "i32".to_string()
            })
        );
    }

    #[test]
    fn wrong_arity_and_kind() {
        let short = StructValue::new("Named", vec![Value::Int(7)]).into();
        assert!(encode(&named(), &short).unwrap_err().is_structural());

        let wrong = StructValue::new("Named", vec![Value::Long(7), Value::Null]).into();
        let err = encode(&named(), &wrong).unwrap_err();
        assert!(err.is_structural());
        #[cfg(all(debug_assertions, feature = "debug"))]
        assert!(err.to_string().contains("`Named`\n -> `i32`"));
    }

    #[test]
    fn unresolved_polymorphic_value() {
        let shape = Descriptor::new(PolymorphicInfo::open("Shape"));
        let circle = StructValue::new("Circle", vec![]).into();

        assert_eq!(
            encode(&shape, &circle),
            Err(SerialError::UnregisteredType {
                base: "Shape".to_string(),
                type_name: "Circle".to_string()
            })
        );
        assert!(encode(&shape, &Value::Int(1)).unwrap_err().is_structural());
    }
}
