use std::sync::OnceLock;

use crate::info::Descriptor;

/// Container for static storage of a non-generic type's [`Descriptor`].
///
/// Internally, there is an [`OnceLock`], almost no additional expenses.
/// This is usually used to implement [`Serial::descriptor`].
///
/// Generic types build their descriptor on every call instead, composing
/// the (cached) descriptors of their parameters.
///
/// ## Example
///
/// ```
/// use drawer_serial::info::{Descriptor, DescriptorCell, NamedField, PrimitiveKind, StructInfo};
///
/// fn point_descriptor() -> &'static Descriptor {
///     static CELL: DescriptorCell = DescriptorCell::new();
///     CELL.get_or_init(|| Descriptor::new(StructInfo::new("Point", [
///         NamedField::new("x", Descriptor::primitive(PrimitiveKind::Int)),
///         NamedField::new("y", Descriptor::primitive(PrimitiveKind::Int)),
///     ])))
/// }
///
/// assert!(core::ptr::eq(point_descriptor(), point_descriptor()));
/// ```
///
/// [`Serial::descriptor`]: crate::Serial::descriptor
pub struct DescriptorCell(OnceLock<Descriptor>);

impl DescriptorCell {
    /// Creates an empty cell.
    #[inline]
    pub const fn new() -> Self {
        Self(OnceLock::new())
    }

    /// Returns the stored descriptor, building it on first access.
    #[inline]
    pub fn get_or_init(&self, f: impl FnOnce() -> Descriptor) -> &Descriptor {
        self.0.get_or_init(f)
    }
}
