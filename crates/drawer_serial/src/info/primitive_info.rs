use alloc::borrow::Cow;
use core::fmt;

// -----------------------------------------------------------------------------
// PrimitiveKind

/// The scalar kinds both representations can store natively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Bool,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    String,
    Bytes,
}

impl PrimitiveKind {
    /// The name used by [`PrimitiveInfo::new`].
    pub const fn default_name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Byte => "i8",
            Self::Short => "i16",
            Self::Int => "i32",
            Self::Long => "i64",
            Self::Float => "f32",
            Self::Double => "f64",
            Self::String => "String",
            Self::Bytes => "ByteArray",
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.default_name())
    }
}

// -----------------------------------------------------------------------------
// PrimitiveInfo

/// A container for scalar type info.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimitiveInfo {
    name: Cow<'static, str>,
    kind: PrimitiveKind,
}

impl PrimitiveInfo {
    /// Creates a [`PrimitiveInfo`] named after its kind, e.g. `"i32"`.
    #[inline]
    pub const fn new(kind: PrimitiveKind) -> Self {
        Self {
            name: Cow::Borrowed(kind.default_name()),
            kind,
        }
    }

    /// Replaces the name, for newtypes stored as a bare scalar.
    pub fn with_name(self, name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            kind: self.kind,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub const fn kind(&self) -> PrimitiveKind {
        self.kind
    }
}
