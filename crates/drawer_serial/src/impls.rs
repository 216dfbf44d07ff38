//! [`Serial`] implementations for common types.
//!
//! ## Implemented Menu
//!
//! - basic: `bool`, `i8`, `i16`, `i32`, `i64`, `f32`, `f64`
//! - alloc: `String`, `Vec<T>`, `Box<T>`, `BTreeMap<K, V>`
//! - std: `HashMap<K, V, S>`
//! - core: `Option<T>` (the nullable form of `T`, nested options stay distinct)
//! - [`ByteArray`]: a byte string stored natively by both representations.

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::format;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use core::hash::{BuildHasher, Hash};
use std::collections::HashMap;

use crate::info::{
    Descriptor, DescriptorCell, ListInfo, MapInfo, NamedField, PrimitiveKind, StructInfo,
};
use crate::value::{StructValue, Value};
use crate::{Serial, SerialError};

fn expected<T>(name: &str, found: &Value) -> Result<T, SerialError> {
    Err(SerialError::mismatch(format!(
        "expected {name}, found {}",
        found.variant_name()
    )))
}

// -----------------------------------------------------------------------------
// Scalars

macro_rules! impl_serial_scalar {
    ($($ty:ty => $variant:ident($kind:ident)),* $(,)?) => {$(
        impl Serial for $ty {
            fn descriptor() -> Descriptor {
                static CELL: DescriptorCell = DescriptorCell::new();
                CELL.get_or_init(|| Descriptor::primitive(PrimitiveKind::$kind)).clone()
            }

            #[inline]
            fn to_value(&self) -> Value {
                Value::$variant(self.clone())
            }

            fn from_value(value: Value) -> Result<Self, SerialError> {
                match value {
                    Value::$variant(v) => Ok(v),
                    other => expected(PrimitiveKind::$kind.default_name(), &other),
                }
            }
        }
    )*};
}

impl_serial_scalar! {
    bool => Bool(Bool),
    i8 => Byte(Byte),
    i16 => Short(Short),
    i32 => Int(Int),
    i64 => Long(Long),
    f32 => Float(Float),
    f64 => Double(Double),
    String => String(String),
}

/// A byte string, stored as a byte array tag or a length-prefixed run of bytes.
///
/// `Vec<u8>` is a list of bytes instead, element by element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ByteArray(pub Vec<u8>);

impl Serial for ByteArray {
    fn descriptor() -> Descriptor {
        static CELL: DescriptorCell = DescriptorCell::new();
        CELL.get_or_init(|| Descriptor::primitive(PrimitiveKind::Bytes))
            .clone()
    }

    fn to_value(&self) -> Value {
        Value::Bytes(self.0.clone())
    }

    fn from_value(value: Value) -> Result<Self, SerialError> {
        match value {
            Value::Bytes(v) => Ok(Self(v)),
            other => expected("ByteArray", &other),
        }
    }
}

// -----------------------------------------------------------------------------
// Wrappers

/// Name of the structure wrapping a present value whose own descriptor is
/// already nullable, e.g. the `Some` of `Some(None)`.
fn presence_name(inner: &Descriptor) -> String {
    format!("Option<{}>", inner.name())
}

/// Element name of the wrapped value.
const PRESENT: &str = "some";

impl<T: Serial> Serial for Option<T> {
    /// The nullable form of `T`'s descriptor.
    ///
    /// If `T` is nullable itself, a present value is wrapped in a structure
    /// of one `some` element, so `Some(None)` and `None` stay distinct.
    fn descriptor() -> Descriptor {
        let inner = T::descriptor();
        if inner.is_nullable() {
            let name = presence_name(&inner);
            Descriptor::new(StructInfo::new(name, [NamedField::new(PRESENT, inner)])).nullable()
        } else {
            inner.nullable()
        }
    }

    fn to_value(&self) -> Value {
        let Some(v) = self else {
            return Value::Null;
        };
        let inner = T::descriptor();
        if inner.is_nullable() {
            StructValue::new(presence_name(&inner), vec![v.to_value()]).into()
        } else {
            v.to_value()
        }
    }

    fn from_value(value: Value) -> Result<Self, SerialError> {
        if value.is_null() {
            return Ok(None);
        }
        let inner = T::descriptor();
        if inner.is_nullable() {
            let mut fields = value.into_struct(&presence_name(&inner))?.into_fields();
            fields.next_field().map(Some)
        } else {
            T::from_value(value).map(Some)
        }
    }
}

impl<T: Serial> Serial for Box<T> {
    #[inline]
    fn descriptor() -> Descriptor {
        T::descriptor()
    }

    #[inline]
    fn to_value(&self) -> Value {
        T::to_value(self)
    }

    fn from_value(value: Value) -> Result<Self, SerialError> {
        T::from_value(value).map(Box::new)
    }
}

// -----------------------------------------------------------------------------
// Collections

impl<T: Serial> Serial for Vec<T> {
    fn descriptor() -> Descriptor {
        Descriptor::new(ListInfo::new(T::descriptor()))
    }

    fn to_value(&self) -> Value {
        Value::List(self.iter().map(T::to_value).collect())
    }

    fn from_value(value: Value) -> Result<Self, SerialError> {
        match value {
            Value::List(items) => items.into_iter().map(T::from_value).collect(),
            other => expected("List", &other),
        }
    }
}

impl<K: Serial + Ord, V: Serial> Serial for BTreeMap<K, V> {
    fn descriptor() -> Descriptor {
        Descriptor::new(MapInfo::new(K::descriptor(), V::descriptor()))
    }

    fn to_value(&self) -> Value {
        Value::Map(
            self.iter()
                .map(|(k, v)| (k.to_value(), v.to_value()))
                .collect(),
        )
    }

    fn from_value(value: Value) -> Result<Self, SerialError> {
        match value {
            Value::Map(entries) => entries
                .into_iter()
                .map(|(k, v)| Ok((K::from_value(k)?, V::from_value(v)?)))
                .collect(),
            other => expected("Map", &other),
        }
    }
}

impl<K, V, S> Serial for HashMap<K, V, S>
where
    K: Serial + Eq + Hash,
    V: Serial,
    S: BuildHasher + Default,
{
    fn descriptor() -> Descriptor {
        Descriptor::new(MapInfo::new(K::descriptor(), V::descriptor()))
    }

    fn to_value(&self) -> Value {
        Value::Map(
            self.iter()
                .map(|(k, v)| (k.to_value(), v.to_value()))
                .collect(),
        )
    }

    fn from_value(value: Value) -> Result<Self, SerialError> {
        match value {
            Value::Map(entries) => entries
                .into_iter()
                .map(|(k, v)| Ok((K::from_value(k)?, V::from_value(v)?)))
                .collect(),
            other => expected("Map", &other),
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::collections::BTreeMap;
    use alloc::string::{String, ToString};
    use alloc::vec;
    use alloc::vec::Vec;

    use super::ByteArray;
    use crate::Serial;
    use crate::info::{PrimitiveKind, SerialKind};
    use crate::value::Value;

    #[test]
    fn scalar_descriptors_are_cached() {
        let a = i32::descriptor();
        let b = i32::descriptor();
        assert_eq!(a, b);
        assert_eq!(a.name(), "i32");
        assert_eq!(
            a.info().as_primitive().unwrap().kind(),
            PrimitiveKind::Int
        );
    }

    #[test]
    fn option_is_nullable_form() {
        let d = <Option<String>>::descriptor();
        assert!(d.is_nullable());
        assert_eq!(d.non_null(), String::descriptor());

        assert_eq!(None::<String>.to_value(), Value::Null);
        assert_eq!(
            <Option<String>>::from_value(Value::from("x")).unwrap(),
            Some("x".to_string())
        );
    }

    #[test]
    fn nested_option_wraps_present_value() {
        let d = <Option<Option<i32>>>::descriptor();
        assert!(d.is_nullable());
        assert_eq!(d.kind(), SerialKind::Struct);
        assert_eq!(d.name(), "Option<i32>");

        assert_eq!(None::<Option<i32>>.to_value(), Value::Null);
        assert_ne!(Some(None::<i32>).to_value(), Value::Null);
        for v in [None, Some(None), Some(Some(4_i32))] {
            assert_eq!(<Option<Option<i32>>>::from_value(v.to_value()).unwrap(), v);
        }
    }

    #[test]
    fn collections() {
        let list = vec![1_i64, 2, 3];
        assert_eq!(Vec::<i64>::descriptor().kind(), SerialKind::List);
        assert_eq!(Vec::<i64>::from_value(list.to_value()).unwrap(), list);

        let mut map = BTreeMap::new();
        map.insert("a".to_string(), 1_i32);
        map.insert("b".to_string(), 2_i32);
        assert_eq!(
            BTreeMap::<String, i32>::descriptor().name(),
            "Map<String, i32>"
        );
        assert_eq!(
            BTreeMap::<String, i32>::from_value(map.to_value()).unwrap(),
            map
        );

        let bytes = ByteArray(vec![0, 1, 255]);
        assert_eq!(ByteArray::from_value(bytes.to_value()).unwrap(), bytes);
    }

    #[test]
    fn wrong_variant_is_mismatch() {
        let err = i32::from_value(Value::from("nope")).unwrap_err();
        assert!(err.is_structural());
    }
}
