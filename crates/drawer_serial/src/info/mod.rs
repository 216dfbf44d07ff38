//! Provide the descriptor model: the structural metadata that drives encoding.
//!
//! ## Menu
//!
//! - [`Descriptor`]: A shared [`SerialInfo`] plus nullability, cheap to clone.
//!     - `name`: the stable identifier, also the default slot key.
//!     - `is_nullable`: whether null values are accepted.
//!
//! - [`SerialInfo`]: A enum representing the shape of a type, the inner is one of following:
//!     - [`PrimitiveInfo`]: For scalars (see [`PrimitiveKind`]), e.g. `i32`, `String`.
//!     - [`EnumInfo`]: For unit-only enums, including variant names.
//!     - [`ListInfo`]: For list-like (e.g. `Vec<T>`) info, including element descriptor.
//!     - [`MapInfo`]: For map-like (e.g. `HashMap<K, V>`) info, including key and value descriptors.
//!     - [`StructInfo`]: For named structures, including fields in declaration order.
//!     - [`PolymorphicInfo`]: For polymorphic bases, including optional sealed [`Subclass`]es.
//!
//! - [`NamedField`]: A field name and its descriptor.
//!
//! - [`SerialKind`]: representing the kind of a shape, for example `Struct`, `List`.
//!
//! - [`DescriptorCell`]: Used to cache the descriptor of a non-generic type.

// -----------------------------------------------------------------------------
// Modules

mod cell;
mod descriptor;
mod enum_info;
mod list_info;
mod map_info;
mod polymorphic_info;
mod primitive_info;
mod struct_info;

// -----------------------------------------------------------------------------
// Exports

pub use cell::DescriptorCell;
pub use descriptor::{Descriptor, SerialInfo, SerialKind, SerialKindError};
pub use enum_info::EnumInfo;
pub use list_info::ListInfo;
pub use map_info::MapInfo;
pub use polymorphic_info::{PolymorphicInfo, Subclass};
pub use primitive_info::{PrimitiveInfo, PrimitiveKind};
pub use struct_info::{NamedField, StructInfo};
