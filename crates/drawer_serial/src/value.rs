//! Provide [`Value`], the dynamic value tree walked by the codecs.

use alloc::borrow::Cow;
use alloc::format;
use alloc::string::String;
use alloc::vec::{self, Vec};

use crate::{Serial, SerialError};

// -----------------------------------------------------------------------------
// Value

/// A dynamically typed value.
///
/// The walker pairs a `Value` with a [`Descriptor`] and fails with a
/// structural mismatch when the two disagree. Typed Rust values reach this
/// representation through [`Serial`].
///
/// [`Descriptor`]: crate::info::Descriptor
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// The absent value, only accepted by nullable descriptors.
    #[default]
    Null,
    Bool(bool),
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
    Bytes(Vec<u8>),
    /// A unit enum variant, by ordinal.
    Enum(u32),
    List(Vec<Value>),
    /// Map entries in insertion order.
    Map(Vec<(Value, Value)>),
    Struct(StructValue),
}

impl Value {
    #[inline]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Short name of the variant, for error messages.
    pub const fn variant_name(&self) -> &'static str {
        match self {
            Self::Null => "Null",
            Self::Bool(_) => "Bool",
            Self::Byte(_) => "Byte",
            Self::Short(_) => "Short",
            Self::Int(_) => "Int",
            Self::Long(_) => "Long",
            Self::Float(_) => "Float",
            Self::Double(_) => "Double",
            Self::String(_) => "String",
            Self::Bytes(_) => "Bytes",
            Self::Enum(_) => "Enum",
            Self::List(_) => "List",
            Self::Map(_) => "Map",
            Self::Struct(_) => "Struct",
        }
    }

    /// Returns the name of the runtime type, used to resolve polymorphic values.
    ///
    /// Only structures carry a runtime type.
    pub fn runtime_type(&self) -> Option<&str> {
        match self {
            Self::Struct(s) => Some(s.type_name()),
            _ => None,
        }
    }

    /// Unwraps a structure of the given runtime type.
    pub fn into_struct(self, type_name: &str) -> Result<StructValue, SerialError> {
        match self {
            Self::Struct(s) if s.type_name() == type_name => Ok(s),
            Self::Struct(s) => Err(SerialError::mismatch(format!(
                "expected struct `{type_name}`, found struct `{}`",
                s.type_name()
            ))),
            other => Err(SerialError::mismatch(format!(
                "expected struct `{type_name}`, found {}",
                other.variant_name()
            ))),
        }
    }
}

macro_rules! impl_from_scalar {
    ($($ty:ty => $variant:ident),* $(,)?) => {$(
        impl From<$ty> for Value {
            #[inline]
            fn from(v: $ty) -> Self {
                Self::$variant(v)
            }
        }
    )*};
}

impl_from_scalar! {
    bool => Bool,
    i8 => Byte,
    i16 => Short,
    i32 => Int,
    i64 => Long,
    f32 => Float,
    f64 => Double,
    String => String,
    StructValue => Struct,
}

impl From<&str> for Value {
    #[inline]
    fn from(v: &str) -> Self {
        Self::String(v.into())
    }
}

// -----------------------------------------------------------------------------
// StructValue

/// The value of a structure: its runtime type name and its field values in
/// declaration order.
///
/// Field names live in the descriptor, so a `StructValue` is positional.
#[derive(Debug, Clone, PartialEq)]
pub struct StructValue {
    type_name: Cow<'static, str>,
    fields: Vec<Value>,
}

impl StructValue {
    pub fn new(type_name: impl Into<Cow<'static, str>>, fields: Vec<Value>) -> Self {
        Self {
            type_name: type_name.into(),
            fields,
        }
    }

    #[inline]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    #[inline]
    pub fn fields(&self) -> &[Value] {
        &self.fields
    }

    #[inline]
    pub fn field_len(&self) -> usize {
        self.fields.len()
    }

    /// Consumes the structure, yielding its fields in declaration order.
    pub fn into_fields(self) -> Fields {
        Fields {
            type_name: self.type_name,
            index: 0,
            iter: self.fields.into_iter(),
        }
    }
}

/// Sequential typed access to the fields of a [`StructValue`].
///
/// # Examples
///
/// ```
/// use drawer_serial::value::{StructValue, Value};
///
/// let value = StructValue::new("Point", vec![Value::Int(1), Value::Int(2)]);
/// let mut fields = value.into_fields();
///
/// let x: i32 = fields.next_field().unwrap();
/// let y: i32 = fields.next_field().unwrap();
/// assert_eq!((x, y), (1, 2));
/// assert!(fields.next_field::<i32>().is_err());
/// ```
pub struct Fields {
    type_name: Cow<'static, str>,
    index: usize,
    iter: vec::IntoIter<Value>,
}

impl Fields {
    /// Converts the next field into `T`.
    pub fn next_field<T: Serial>(&mut self) -> Result<T, SerialError> {
        let Some(value) = self.iter.next() else {
            return Err(SerialError::mismatch(format!(
                "struct `{}` has no field at index {}",
                self.type_name, self.index
            )));
        };
        self.index += 1;
        T::from_value(value)
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::{StructValue, Value};

    #[test]
    fn runtime_type_only_for_structs() {
        let s = Value::from(StructValue::new("Circle", vec![Value::Double(1.0)]));
        assert_eq!(s.runtime_type(), Some("Circle"));
        assert_eq!(Value::Int(3).runtime_type(), None);
    }

    #[test]
    fn into_struct_checks_type_name() {
        let s = Value::from(StructValue::new("Circle", vec![]));
        assert!(s.clone().into_struct("Circle").is_ok());
        assert!(s.into_struct("Square").unwrap_err().is_structural());
        assert!(Value::Null.into_struct("Circle").is_err());
    }
}
