use alloc::borrow::Cow;
use alloc::format;

use crate::info::Descriptor;

/// A container for list-like (e.g. `Vec<T>`) info.
#[derive(Debug, Clone, PartialEq)]
pub struct ListInfo {
    name: Cow<'static, str>,
    element: Descriptor,
}

impl ListInfo {
    /// Creates a list named `List<element>`.
    pub fn new(element: Descriptor) -> Self {
        Self {
            name: Cow::Owned(format!("List<{}>", element.name())),
            element,
        }
    }

    pub fn with_name(self, name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            element: self.element,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the descriptor of every element.
    #[inline]
    pub fn element(&self) -> &Descriptor {
        &self.element
    }
}
