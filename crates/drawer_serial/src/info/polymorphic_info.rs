use alloc::borrow::Cow;
use alloc::boxed::Box;

use crate::info::Descriptor;

// -----------------------------------------------------------------------------
// Subclass

/// A concrete subtype of a polymorphic base and its stable type tag.
#[derive(Debug, Clone, PartialEq)]
pub struct Subclass {
    tag: Cow<'static, str>,
    descriptor: Descriptor,
}

impl Subclass {
    /// Creates a subclass tagged with the descriptor's own name.
    pub fn new(descriptor: Descriptor) -> Self {
        Self {
            tag: Cow::Owned(descriptor.name().into()),
            descriptor,
        }
    }

    pub fn with_tag(tag: impl Into<Cow<'static, str>>, descriptor: Descriptor) -> Self {
        Self {
            tag: tag.into(),
            descriptor,
        }
    }

    #[inline]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    #[inline]
    pub fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }
}

// -----------------------------------------------------------------------------
// PolymorphicInfo

/// A container for polymorphic base info.
///
/// A value of a polymorphic base is written as a two-element structure:
/// the string tag under [`TYPE`](Self::TYPE) and the payload, walked with the
/// concrete descriptor, under [`VALUE`](Self::VALUE).
///
/// Concrete subtypes are looked up among the subclasses sealed into this info
/// first, then in the [`SerialContext`] of the call. An open base (no sealed
/// subclasses) relies on the context alone.
///
/// [`SerialContext`]: crate::context::SerialContext
///
/// # Examples
///
/// ```
/// use drawer_serial::info::{Descriptor, PolymorphicInfo, StructInfo, Subclass};
///
/// let circle = Descriptor::new(StructInfo::new("Circle", []));
/// let shape = PolymorphicInfo::sealed("Shape", [Subclass::with_tag("circle", circle)]);
///
/// assert_eq!(shape.subclass_by_tag("circle").unwrap().descriptor().name(), "Circle");
/// assert_eq!(shape.subclass_by_type("Circle").unwrap().tag(), "circle");
/// assert!(PolymorphicInfo::open("Entity").is_open());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PolymorphicInfo {
    name: Cow<'static, str>,
    subclasses: Box<[Subclass]>,
}

impl PolymorphicInfo {
    /// Element name of the type tag.
    pub const TYPE: &'static str = "type";
    /// Element name of the payload.
    pub const VALUE: &'static str = "value";

    /// Creates a base whose subtypes are only known to a context.
    pub fn open(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            subclasses: Box::new([]),
        }
    }

    /// Creates a base with a closed set of subtypes.
    pub fn sealed(
        name: impl Into<Cow<'static, str>>,
        subclasses: impl IntoIterator<Item = Subclass>,
    ) -> Self {
        Self {
            name: name.into(),
            subclasses: subclasses.into_iter().collect(),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.subclasses.is_empty()
    }

    /// Returns an iterator over the sealed subclasses.
    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Subclass> {
        self.subclasses.iter()
    }

    /// Finds a sealed subclass by its type tag.
    pub fn subclass_by_tag(&self, tag: &str) -> Option<&Subclass> {
        self.subclasses.iter().find(|s| s.tag() == tag)
    }

    /// Finds a sealed subclass by the runtime type name of a value.
    pub fn subclass_by_type(&self, type_name: &str) -> Option<&Subclass> {
        self.subclasses
            .iter()
            .find(|s| s.descriptor().name() == type_name)
    }
}
