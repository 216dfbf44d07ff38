//! Provide the descriptor walker, shared by both representations.
//!
//! - [`EncodeDriver`]: Walks a [`Value`] along its [`Descriptor`], driving an [`Encoder`].
//! - [`DecodeDriver`]: Walks a [`Descriptor`], driving a [`Decoder`] to rebuild the [`Value`].
//!
//! ## Rules
//!
//! - Nullable descriptors: the nullability mark comes first, then the payload
//!   if the value is present. A non-nullable descriptor never accepts
//!   [`Value::Null`].
//! - Structures: every field, in declaration order, as an element named after
//!   the field.
//! - Lists: element count, then the elements.
//! - Maps: entry count, then each entry as a structure of a `key` element
//!   and a `value` element.
//! - Enums: the ordinal, which the representation may store by name.
//! - Polymorphic values: a structure of a `type` element (the string tag) and a
//!   `value` element (the payload, walked with the concrete descriptor). The
//!   concrete descriptor is looked up among the sealed subclasses first, then
//!   in the [`SerialContext`].
//!
//! [`Encoder`]: crate::codec::Encoder
//! [`Decoder`]: crate::codec::Decoder
//! [`Value`]: crate::value::Value
//! [`Value::Null`]: crate::value::Value::Null
//! [`Descriptor`]: crate::info::Descriptor

// -----------------------------------------------------------------------------
// Modules

mod de;
mod info_stack;
mod ser;

// -----------------------------------------------------------------------------
// Exports

pub use de::DecodeDriver;
pub use ser::EncodeDriver;

use alloc::string::ToString;

use crate::SerialError;
use crate::context::SerialContext;
use crate::info::{Descriptor, PolymorphicInfo};

// -----------------------------------------------------------------------------
// Polymorphic resolution

/// Resolves the tag and concrete descriptor of a runtime type.
fn resolve_type<'a>(
    info: &'a PolymorphicInfo,
    context: &'a SerialContext,
    type_name: &str,
) -> Result<(&'a str, &'a Descriptor), SerialError> {
    let resolved = match info.subclass_by_type(type_name) {
        Some(subclass) => Some((subclass.tag(), subclass.descriptor())),
        None => context
            .tag_of(info.name(), type_name)
            .and_then(|tag| Some((tag, context.descriptor_of(info.name(), tag)?))),
    };

    match resolved {
        Some((tag, concrete)) => {
            log::debug!(
                "resolved `{type_name}` as `{tag}` under polymorphic base `{}`",
                info.name()
            );
            Ok((tag, concrete))
        }
        None => Err(SerialError::UnregisteredType {
            base: info.name().to_string(),
            type_name: type_name.to_string(),
        }),
    }
}

/// Resolves the concrete descriptor of a decoded tag.
fn resolve_tag<'a>(
    info: &'a PolymorphicInfo,
    context: &'a SerialContext,
    tag: &str,
) -> Result<&'a Descriptor, SerialError> {
    let resolved = match info.subclass_by_tag(tag) {
        Some(subclass) => Some(subclass.descriptor()),
        None => context.descriptor_of(info.name(), tag),
    };

    match resolved {
        Some(concrete) => {
            log::debug!(
                "resolved tag `{tag}` as `{}` under polymorphic base `{}`",
                concrete.name(),
                info.name()
            );
            Ok(concrete)
        }
        None => Err(SerialError::UnregisteredTag {
            base: info.name().to_string(),
            tag: tag.to_string(),
        }),
    }
}
