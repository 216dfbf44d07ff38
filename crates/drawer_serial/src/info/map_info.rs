use alloc::borrow::Cow;
use alloc::format;

use crate::info::Descriptor;

/// A container for map-like (e.g. `HashMap<K, V>`) info.
///
/// Entries are walked as two-element structures, `key` then `value`.
#[derive(Debug, Clone, PartialEq)]
pub struct MapInfo {
    name: Cow<'static, str>,
    key: Descriptor,
    value: Descriptor,
}

impl MapInfo {
    /// Element name of an entry's key.
    pub const KEY: &'static str = "key";
    /// Element name of an entry's value.
    pub const VALUE: &'static str = "value";

    /// Creates a map named `Map<key, value>`.
    pub fn new(key: Descriptor, value: Descriptor) -> Self {
        Self {
            name: Cow::Owned(format!("Map<{}, {}>", key.name(), value.name())),
            key,
            value,
        }
    }

    pub fn with_name(self, name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            ..self
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn key(&self) -> &Descriptor {
        &self.key
    }

    #[inline]
    pub fn value(&self) -> &Descriptor {
        &self.value
    }
}
