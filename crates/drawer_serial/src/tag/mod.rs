//! Provide the tag tree: the hierarchical key/value representation.
//!
//! - [`Tag`]: A node of the tree, a scalar, a list or a nested [`TagCompound`].
//! - [`TagCompound`]: A string-keyed container of tags, the slot container of
//!   the binding layer.
//!
//! Both implement `serde` traits, so a tree can be dumped to (or loaded from)
//! any serde format for inspection.

// -----------------------------------------------------------------------------
// Modules

mod compound;
mod serde;

// -----------------------------------------------------------------------------
// Exports

pub use compound::TagCompound;

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

// -----------------------------------------------------------------------------
// Tag

/// A node of the tag tree.
///
/// [`Tag::End`] never appears as data: the tag-tree codec stores it in place
/// of a null value, as the nullability mark.
#[derive(Debug, Clone, PartialEq)]
pub enum Tag {
    End,
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    ByteArray(Vec<u8>),
    String(String),
    List(Vec<Tag>),
    Compound(TagCompound),
}

impl Tag {
    /// Returns the kind of this tag.
    pub const fn tag_type(&self) -> TagType {
        match self {
            Self::End => TagType::End,
            Self::Byte(_) => TagType::Byte,
            Self::Short(_) => TagType::Short,
            Self::Int(_) => TagType::Int,
            Self::Long(_) => TagType::Long,
            Self::Float(_) => TagType::Float,
            Self::Double(_) => TagType::Double,
            Self::ByteArray(_) => TagType::ByteArray,
            Self::String(_) => TagType::String,
            Self::List(_) => TagType::List,
            Self::Compound(_) => TagType::Compound,
        }
    }

    #[inline]
    pub fn as_compound(&self) -> Option<&TagCompound> {
        match self {
            Self::Compound(c) => Some(c),
            _ => None,
        }
    }
}

impl From<TagCompound> for Tag {
    #[inline]
    fn from(value: TagCompound) -> Self {
        Self::Compound(value)
    }
}

// -----------------------------------------------------------------------------
// TagType

/// The kind of a [`Tag`], with the numeric ids of the NBT format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TagType {
    End = 0,
    Byte = 1,
    Short = 2,
    Int = 3,
    Long = 4,
    Float = 5,
    Double = 6,
    ByteArray = 7,
    String = 8,
    List = 9,
    Compound = 10,
}

impl fmt::Display for TagType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::End => f.pad("End"),
            Self::Byte => f.pad("Byte"),
            Self::Short => f.pad("Short"),
            Self::Int => f.pad("Int"),
            Self::Long => f.pad("Long"),
            Self::Float => f.pad("Float"),
            Self::Double => f.pad("Double"),
            Self::ByteArray => f.pad("ByteArray"),
            Self::String => f.pad("String"),
            Self::List => f.pad("List"),
            Self::Compound => f.pad("Compound"),
        }
    }
}
