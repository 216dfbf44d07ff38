use alloc::string::String;

use thiserror::Error;

// -----------------------------------------------------------------------------
// SerialError

/// Errors produced while binding, encoding or decoding values.
///
/// No variant is ever recovered from internally: every failure is reported
/// to the caller of the binding call that triggered it.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum SerialError {
    /// A slot key is already occupied in the target compound.
    #[error(
        "a '{name}' appears twice in the compound under key `{key}`; \
        if you are serializing two objects of the same type you must specify a key, \
        and never reuse the same key twice"
    )]
    DuplicateSlot { key: String, name: String },

    /// A null value met a descriptor that is not nullable.
    #[error(
        "`{name}` is not nullable but a null value was encountered; \
        use the nullable descriptor (or `Option<T>`) to handle absent values"
    )]
    NonNullable { name: String },

    /// No polymorphic registration for the runtime type of a value.
    #[error("no polymorphic registration for type `{type_name}` under base `{base}`")]
    UnregisteredType { base: String, type_name: String },

    /// No polymorphic registration for a decoded type tag.
    #[error("no polymorphic registration for tag `{tag}` under base `{base}`")]
    UnregisteredTag { base: String, tag: String },

    /// The payload does not have the shape the descriptor expects.
    #[error("structural mismatch: {0}")]
    Mismatch(String),

    /// The stream ended before a value could be read completely.
    #[error("unexpected end of stream: needed {needed} bytes, {remaining} remaining")]
    EndOfStream { needed: usize, remaining: usize },
}

impl SerialError {
    /// Creates a [`SerialError::Mismatch`] from any message.
    #[inline]
    pub fn mismatch(msg: impl Into<String>) -> Self {
        Self::Mismatch(msg.into())
    }

    /// Returns `true` for errors caused by a payload that does not match its descriptor.
    pub const fn is_structural(&self) -> bool {
        matches!(self, Self::Mismatch(_) | Self::EndOfStream { .. })
    }

    /// Returns `true` for a missing polymorphic registration, by type or by tag.
    pub const fn is_unregistered(&self) -> bool {
        matches!(
            self,
            Self::UnregisteredType { .. } | Self::UnregisteredTag { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::SerialError;

    #[test]
    fn duplicate_slot_message_names_key() {
        let err = SerialError::DuplicateSlot {
            key: "pos".to_string(),
            name: "Point".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("`pos`"));
        assert!(msg.contains("must specify a key"));
    }

    #[test]
    fn categories() {
        assert!(SerialError::mismatch("x").is_structural());
        assert!(
            SerialError::EndOfStream {
                needed: 4,
                remaining: 1
            }
            .is_structural()
        );
        assert!(
            SerialError::UnregisteredTag {
                base: "Shape".to_string(),
                tag: "circle".to_string()
            }
            .is_unregistered()
        );
        assert!(
            !SerialError::NonNullable {
                name: "i32".to_string()
            }
            .is_structural()
        );
    }
}
