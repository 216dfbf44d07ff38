use alloc::borrow::Cow;
use alloc::boxed::Box;

use drawer_utils::hash::HashMap;

use crate::info::Descriptor;

// -----------------------------------------------------------------------------
// NamedField

/// A named field of a structure and the descriptor of its value.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedField {
    name: Cow<'static, str>,
    descriptor: Descriptor,
}

impl NamedField {
    pub fn new(name: impl Into<Cow<'static, str>>, descriptor: Descriptor) -> Self {
        Self {
            name: name.into(),
            descriptor,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }
}

// -----------------------------------------------------------------------------
// StructInfo

/// A container for named structure info.
///
/// # Examples
///
/// ```
/// use drawer_serial::info::{Descriptor, NamedField, PrimitiveKind, StructInfo};
///
/// let info = StructInfo::new("Player", [
///     NamedField::new("name", Descriptor::primitive(PrimitiveKind::String)),
///     NamedField::new("level", Descriptor::primitive(PrimitiveKind::Int)),
/// ]);
///
/// assert_eq!(info.field_len(), 2);
/// assert_eq!(info.index_of("level"), Some(1));
/// assert_eq!(info.field_at(0).unwrap().name(), "name");
/// ```
#[derive(Debug, Clone)]
pub struct StructInfo {
    name: Cow<'static, str>,
    fields: Box<[NamedField]>,
    indices: HashMap<Cow<'static, str>, usize>,
}

impl StructInfo {
    /// Create a new [`StructInfo`].
    ///
    /// The order of internal fields is fixed, depends on the input order.
    /// A repeated field name shadows the earlier one in [`field`](Self::field)
    /// lookups, and fails to encode into the tag tree, where elements are
    /// keyed by name.
    pub fn new(
        name: impl Into<Cow<'static, str>>,
        fields: impl IntoIterator<Item = NamedField>,
    ) -> Self {
        let fields: Box<[NamedField]> = fields.into_iter().collect();
        let indices = fields
            .iter()
            .enumerate()
            .map(|(index, field)| (field.name.clone(), index))
            .collect();

        Self {
            name: name.into(),
            fields,
            indices,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the [`NamedField`] for the given `name`, if present.
    pub fn field(&self, name: &str) -> Option<&NamedField> {
        self.fields.get(*self.indices.get(name)?)
    }

    /// Returns the [`NamedField`] at the given index, if present.
    #[inline]
    pub fn field_at(&self, index: usize) -> Option<&NamedField> {
        self.fields.get(index)
    }

    /// Returns the index for the given field `name`, if present.
    #[inline]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.indices.get(name).copied()
    }

    /// Returns an iterator over the fields in **declaration order**.
    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &NamedField> {
        self.fields.iter()
    }

    #[inline]
    pub fn field_len(&self) -> usize {
        self.fields.len()
    }
}

impl PartialEq for StructInfo {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.fields == other.fields
    }
}
