use crate::SerialError;
use crate::info::Descriptor;
use crate::value::Value;

/// A type that can be encoded by its descriptor.
///
/// This is the bridge between typed Rust values and the descriptor-driven
/// codecs: [`descriptor`](Serial::descriptor) names the shape, and the value is
/// moved in and out of the dynamic [`Value`] representation the walker
/// traverses.
///
/// Nullability is expressed with `Option<T>`, whose descriptor is the
/// nullable form of `T`'s.
///
/// # Manually Impl
///
/// ```
/// use drawer_serial::{Serial, SerialError};
/// use drawer_serial::info::{Descriptor, DescriptorCell, NamedField, StructInfo};
/// use drawer_serial::value::{StructValue, Value};
///
/// #[derive(Debug, PartialEq)]
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// impl Serial for Point {
///     fn descriptor() -> Descriptor {
///         static CELL: DescriptorCell = DescriptorCell::new();
///         CELL.get_or_init(|| Descriptor::new(StructInfo::new("Point", [
///             NamedField::new("x", i32::descriptor()),
///             NamedField::new("y", i32::descriptor()),
///         ]))).clone()
///     }
///
///     fn to_value(&self) -> Value {
///         StructValue::new("Point", vec![self.x.to_value(), self.y.to_value()]).into()
///     }
///
///     fn from_value(value: Value) -> Result<Self, SerialError> {
///         let mut fields = value.into_struct("Point")?.into_fields();
///         Ok(Point {
///             x: fields.next_field()?,
///             y: fields.next_field()?,
///         })
///     }
/// }
///
/// let p = Point { x: 1, y: -2 };
/// assert_eq!(Point::from_value(p.to_value()).unwrap(), p);
/// ```
pub trait Serial: Sized {
    /// Returns the descriptor of this type.
    fn descriptor() -> Descriptor;

    /// Converts this value into its dynamic form.
    fn to_value(&self) -> Value;

    /// Rebuilds a value from its dynamic form.
    ///
    /// # Errors
    ///
    /// Returns [`SerialError::Mismatch`] if `value` does not have the shape
    /// of this type.
    fn from_value(value: Value) -> Result<Self, SerialError>;
}
