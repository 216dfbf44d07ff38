use alloc::sync::Arc;
use core::{error, fmt};

use crate::info::{EnumInfo, ListInfo, MapInfo};
use crate::info::{PolymorphicInfo, PrimitiveInfo, PrimitiveKind, StructInfo};

// -----------------------------------------------------------------------------
// SerialKind

/// An enumeration of the "kinds" of a serializable type.
///
/// A [`SerialKind`] is obtained via [`Descriptor::kind`] or [`SerialInfo::kind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SerialKind {
    Primitive,
    Enum,
    List,
    Map,
    Struct,
    Polymorphic,
}

impl fmt::Display for SerialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive => f.pad("Primitive"),
            Self::Enum => f.pad("Enum"),
            Self::List => f.pad("List"),
            Self::Map => f.pad("Map"),
            Self::Struct => f.pad("Struct"),
            Self::Polymorphic => f.pad("Polymorphic"),
        }
    }
}

/// Error returned when a [`SerialInfo`] value is not the expected [`SerialKind`].
#[derive(Debug)]
pub struct SerialKindError {
    pub expected: SerialKind,
    pub received: SerialKind,
}

impl fmt::Display for SerialKindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "serial kind mismatch: expected {}, received {}",
            self.expected, self.received
        )
    }
}

impl error::Error for SerialKindError {}

// -----------------------------------------------------------------------------
// SerialInfo

/// The shape of a serializable type.
///
/// Which can be convert to internal info, for example [`StructInfo`] and [`ListInfo`],
/// then you can get more infomation like fields and element descriptors.
///
/// A `SerialInfo` never carries nullability, see [`Descriptor`].
#[derive(Debug, Clone, PartialEq)]
pub enum SerialInfo {
    Primitive(PrimitiveInfo),
    Enum(EnumInfo),
    List(ListInfo),
    Map(MapInfo),
    Struct(StructInfo),
    Polymorphic(PolymorphicInfo),
}

// Helper macro that implements type-safe accessor methods like `as_struct`.
macro_rules! impl_cast_method {
    ($name:ident : $kind:ident => $info:ident) => {
        /// Convert [`SerialInfo`] to specific shape information.
        pub const fn $name(&self) -> Result<&$info, SerialKindError> {
            match self {
                Self::$kind(info) => Ok(info),
                _ => Err(SerialKindError {
                    expected: SerialKind::$kind,
                    received: self.kind(),
                }),
            }
        }
    };
}

impl SerialInfo {
    impl_cast_method!(as_primitive: Primitive => PrimitiveInfo);
    impl_cast_method!(as_enum: Enum => EnumInfo);
    impl_cast_method!(as_list: List => ListInfo);
    impl_cast_method!(as_map: Map => MapInfo);
    impl_cast_method!(as_struct: Struct => StructInfo);
    impl_cast_method!(as_polymorphic: Polymorphic => PolymorphicInfo);

    /// Returns the stable name of the shape.
    pub fn name(&self) -> &str {
        match self {
            Self::Primitive(info) => info.name(),
            Self::Enum(info) => info.name(),
            Self::List(info) => info.name(),
            Self::Map(info) => info.name(),
            Self::Struct(info) => info.name(),
            Self::Polymorphic(info) => info.name(),
        }
    }

    /// Returns the [`SerialKind`] for this `SerialInfo` (a fast discriminator).
    pub const fn kind(&self) -> SerialKind {
        match self {
            Self::Primitive(_) => SerialKind::Primitive,
            Self::Enum(_) => SerialKind::Enum,
            Self::List(_) => SerialKind::List,
            Self::Map(_) => SerialKind::Map,
            Self::Struct(_) => SerialKind::Struct,
            Self::Polymorphic(_) => SerialKind::Polymorphic,
        }
    }
}

// -----------------------------------------------------------------------------
// Descriptor

/// Structural metadata of a serializable type: a shared [`SerialInfo`]
/// plus the nullability of this particular use of it.
///
/// Descriptors are built once and are cheap to clone, the shape is shared
/// behind an [`Arc`]. They are immutable and can be used from any thread.
///
/// # Examples
///
/// ```
/// use drawer_serial::info::{Descriptor, NamedField, PrimitiveKind, SerialKind, StructInfo};
///
/// let point = Descriptor::new(StructInfo::new("Point", [
///     NamedField::new("x", Descriptor::primitive(PrimitiveKind::Int)),
///     NamedField::new("y", Descriptor::primitive(PrimitiveKind::Int)),
/// ]));
///
/// assert_eq!(point.name(), "Point");
/// assert_eq!(point.kind(), SerialKind::Struct);
/// assert!(!point.is_nullable());
/// assert!(point.nullable().is_nullable());
/// assert_eq!(point.nullable().name(), "Point");
/// ```
#[derive(Clone)]
pub struct Descriptor {
    info: Arc<SerialInfo>,
    nullable: bool,
}

impl Descriptor {
    /// Creates a non-nullable descriptor from a shape.
    pub fn new(info: impl Into<SerialInfo>) -> Self {
        Self {
            info: Arc::new(info.into()),
            nullable: false,
        }
    }

    /// Creates a non-nullable primitive descriptor with the default name of `kind`.
    #[inline]
    pub fn primitive(kind: PrimitiveKind) -> Self {
        Self::new(PrimitiveInfo::new(kind))
    }

    /// Returns the nullable form of this descriptor.
    ///
    /// The shape is shared and the name is unchanged, so the default slot key
    /// of a nullable descriptor is the same as the non-nullable one.
    #[inline]
    pub fn nullable(&self) -> Self {
        Self {
            info: Arc::clone(&self.info),
            nullable: true,
        }
    }

    /// Returns the non-nullable form of this descriptor.
    #[inline]
    pub fn non_null(&self) -> Self {
        Self {
            info: Arc::clone(&self.info),
            nullable: false,
        }
    }

    /// Returns `true` if the descriptor accepts null values.
    #[inline]
    pub const fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// Returns the stable name, also the default slot key.
    #[inline]
    pub fn name(&self) -> &str {
        self.info.name()
    }

    #[inline]
    pub fn kind(&self) -> SerialKind {
        self.info.kind()
    }

    /// Returns the shape of the descriptor.
    #[inline]
    pub fn info(&self) -> &SerialInfo {
        &self.info
    }
}

impl PartialEq for Descriptor {
    fn eq(&self, other: &Self) -> bool {
        self.nullable == other.nullable
            && (Arc::ptr_eq(&self.info, &other.info) || self.info == other.info)
    }
}

impl fmt::Debug for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.nullable {
            write!(f, "{:?}?", self.info)
        } else {
            fmt::Debug::fmt(&*self.info, f)
        }
    }
}

macro_rules! impl_into_serial_info {
    ($($info:ident => $kind:ident),* $(,)?) => {$(
        impl From<$info> for SerialInfo {
            #[inline]
            fn from(info: $info) -> Self {
                Self::$kind(info)
            }
        }
    )*};
}

impl_into_serial_info! {
    PrimitiveInfo => Primitive,
    EnumInfo => Enum,
    ListInfo => List,
    MapInfo => Map,
    StructInfo => Struct,
    PolymorphicInfo => Polymorphic,
}
