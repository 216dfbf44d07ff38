use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::slice;

use super::{Decoder, Encoder, check_ordinal};
use crate::SerialError;
use crate::info::EnumInfo;
use crate::tag::{Tag, TagCompound, TagType};

// -----------------------------------------------------------------------------
// TagEncoder

enum OpenTag {
    Compound {
        compound: TagCompound,
        key: Option<String>,
    },
    List(Vec<Tag>),
}

/// Builds a [`Tag`] from primitive calls.
///
/// Structures become compounds keyed by element name, lists become list tags.
/// The null mark is [`Tag::End`], a present value is its own mark, and
/// booleans are stored as a `Byte` of `0` or `1`.
///
/// # Examples
///
/// ```
/// use drawer_serial::codec::{Encoder, TagEncoder};
/// use drawer_serial::tag::Tag;
///
/// let mut enc = TagEncoder::new();
/// enc.begin_structure("Point", 2).unwrap();
/// enc.begin_element("x", 0).unwrap();
/// enc.encode_int(1).unwrap();
/// enc.begin_element("y", 1).unwrap();
/// enc.encode_int(2).unwrap();
/// enc.end_structure().unwrap();
///
/// let tag = enc.finish().unwrap();
/// let compound = tag.as_compound().unwrap();
/// assert_eq!(compound.get("y"), Some(&Tag::Int(2)));
/// ```
#[derive(Default)]
pub struct TagEncoder {
    stack: Vec<OpenTag>,
    root: Option<Tag>,
}

impl TagEncoder {
    #[inline]
    pub const fn new() -> Self {
        Self {
            stack: Vec::new(),
            root: None,
        }
    }

    /// Returns the finished tag.
    ///
    /// Fails if a container is still open or nothing was encoded.
    pub fn finish(self) -> Result<Tag, SerialError> {
        if !self.stack.is_empty() {
            return Err(SerialError::mismatch(format!(
                "{} container(s) left open",
                self.stack.len()
            )));
        }
        self.root
            .ok_or_else(|| SerialError::mismatch("no value was encoded"))
    }

    fn emit(&mut self, tag: Tag) -> Result<(), SerialError> {
        match self.stack.last_mut() {
            None if self.root.is_some() => Err(SerialError::mismatch(
                "a second root value was encoded",
            )),
            None => {
                self.root = Some(tag);
                Ok(())
            }
            Some(OpenTag::Compound { compound, key }) => match key.take() {
                Some(key) if compound.contains(&key) => Err(SerialError::mismatch(format!(
                    "element `{key}` encoded twice in the same structure"
                ))),
                Some(key) => {
                    compound.put(key, tag);
                    Ok(())
                }
                None => Err(SerialError::mismatch(format!(
                    "{} tag encoded in a compound without an element name",
                    tag.tag_type()
                ))),
            },
            Some(OpenTag::List(items)) => {
                items.push(tag);
                Ok(())
            }
        }
    }
}

impl Encoder for TagEncoder {
    fn encode_bool(&mut self, v: bool) -> Result<(), SerialError> {
        self.emit(Tag::Byte(i8::from(v)))
    }

    fn encode_byte(&mut self, v: i8) -> Result<(), SerialError> {
        self.emit(Tag::Byte(v))
    }

    fn encode_short(&mut self, v: i16) -> Result<(), SerialError> {
        self.emit(Tag::Short(v))
    }

    fn encode_int(&mut self, v: i32) -> Result<(), SerialError> {
        self.emit(Tag::Int(v))
    }

    fn encode_long(&mut self, v: i64) -> Result<(), SerialError> {
        self.emit(Tag::Long(v))
    }

    fn encode_float(&mut self, v: f32) -> Result<(), SerialError> {
        self.emit(Tag::Float(v))
    }

    fn encode_double(&mut self, v: f64) -> Result<(), SerialError> {
        self.emit(Tag::Double(v))
    }

    fn encode_string(&mut self, v: &str) -> Result<(), SerialError> {
        self.emit(Tag::String(v.to_string()))
    }

    fn encode_bytes(&mut self, v: &[u8]) -> Result<(), SerialError> {
        self.emit(Tag::ByteArray(v.to_vec()))
    }

    fn encode_enum(&mut self, info: &EnumInfo, index: u32) -> Result<(), SerialError> {
        match info.variant(index as usize) {
            // Variants are stored by name, which must identify the ordinal.
            Some(name) if info.index_of(name) != Some(index as usize) => {
                Err(SerialError::mismatch(format!(
                    "variant `{name}` of enum `{}` is declared more than once",
                    info.name()
                )))
            }
            Some(name) => self.emit(Tag::String(name.to_string())),
            None => Err(SerialError::mismatch(format!(
                "ordinal {index} is out of range for enum `{}`",
                info.name()
            ))),
        }
    }

    fn encode_null(&mut self) -> Result<(), SerialError> {
        self.emit(Tag::End)
    }

    #[inline]
    fn encode_not_null_mark(&mut self) -> Result<(), SerialError> {
        Ok(())
    }

    fn begin_structure(&mut self, _name: &str, _len: usize) -> Result<(), SerialError> {
        self.stack.push(OpenTag::Compound {
            compound: TagCompound::new(),
            key: None,
        });
        Ok(())
    }

    fn begin_element(&mut self, name: &str, _index: usize) -> Result<(), SerialError> {
        match self.stack.last_mut() {
            Some(OpenTag::Compound { key, .. }) => {
                *key = Some(name.to_string());
                Ok(())
            }
            _ => Err(SerialError::mismatch(format!(
                "element `{name}` begun outside of a structure"
            ))),
        }
    }

    fn end_structure(&mut self) -> Result<(), SerialError> {
        match self.stack.pop() {
            Some(OpenTag::Compound { compound, .. }) => self.emit(Tag::Compound(compound)),
            _ => Err(SerialError::mismatch("unbalanced end of structure")),
        }
    }

    fn begin_list(&mut self, len: usize) -> Result<(), SerialError> {
        self.stack.push(OpenTag::List(Vec::with_capacity(len)));
        Ok(())
    }

    fn end_list(&mut self) -> Result<(), SerialError> {
        match self.stack.pop() {
            Some(OpenTag::List(items)) => self.emit(Tag::List(items)),
            _ => Err(SerialError::mismatch("unbalanced end of list")),
        }
    }
}

// -----------------------------------------------------------------------------
// TagDecoder

enum Frame<'a> {
    Compound(&'a TagCompound),
    List(slice::Iter<'a, Tag>),
}

/// Reads primitive values out of a borrowed [`Tag`].
///
/// The tag is never modified.
pub struct TagDecoder<'a> {
    stack: Vec<Frame<'a>>,
    // The tag read by the next primitive call.
    current: Option<&'a Tag>,
}

impl<'a> TagDecoder<'a> {
    #[inline]
    pub fn new(root: &'a Tag) -> Self {
        Self {
            stack: Vec::new(),
            current: Some(root),
        }
    }

    fn peek(&mut self) -> Result<&'a Tag, SerialError> {
        if self.current.is_none() {
            if let Some(Frame::List(iter)) = self.stack.last_mut() {
                self.current = iter.next();
            }
        }
        self.current
            .ok_or_else(|| SerialError::mismatch("no tag left to decode"))
    }

    fn next_tag(&mut self) -> Result<&'a Tag, SerialError> {
        let tag = self.peek()?;
        self.current = None;
        Ok(tag)
    }
}

fn unexpected<T>(expected: TagType, found: &Tag) -> Result<T, SerialError> {
    Err(SerialError::mismatch(format!(
        "expected {expected} tag, found {}",
        found.tag_type()
    )))
}

macro_rules! decode_scalar {
    ($name:ident -> $ty:ty, $variant:ident) => {
        fn $name(&mut self) -> Result<$ty, SerialError> {
            match self.next_tag()? {
                Tag::$variant(v) => Ok(*v),
                other => unexpected(TagType::$variant, other),
            }
        }
    };
    ($name:ident -> $ty:ty, $variant:ident, clone) => {
        fn $name(&mut self) -> Result<$ty, SerialError> {
            match self.next_tag()? {
                Tag::$variant(v) => Ok(v.clone()),
                other => unexpected(TagType::$variant, other),
            }
        }
    };
}

impl Decoder for TagDecoder<'_> {
    decode_scalar!(decode_byte -> i8, Byte);
    decode_scalar!(decode_short -> i16, Short);
    decode_scalar!(decode_int -> i32, Int);
    decode_scalar!(decode_long -> i64, Long);
    decode_scalar!(decode_float -> f32, Float);
    decode_scalar!(decode_double -> f64, Double);
    decode_scalar!(decode_string -> String, String, clone);
    decode_scalar!(decode_bytes -> Vec<u8>, ByteArray, clone);

    fn decode_bool(&mut self) -> Result<bool, SerialError> {
        match self.next_tag()? {
            Tag::Byte(v) => Ok(*v != 0),
            other => unexpected(TagType::Byte, other),
        }
    }

    fn decode_enum(&mut self, info: &EnumInfo) -> Result<u32, SerialError> {
        match self.next_tag()? {
            Tag::String(name) => match info.index_of(name) {
                Some(index) => check_ordinal(info, index),
                None => Err(SerialError::mismatch(format!(
                    "`{name}` is not a variant of enum `{}`",
                    info.name()
                ))),
            },
            other => unexpected(TagType::String, other),
        }
    }

    fn decode_not_null_mark(&mut self) -> Result<bool, SerialError> {
        if let Tag::End = self.peek()? {
            self.current = None;
            Ok(false)
        } else {
            Ok(true)
        }
    }

    fn begin_structure(&mut self, _name: &str, _len: usize) -> Result<(), SerialError> {
        match self.next_tag()? {
            Tag::Compound(compound) => {
                self.stack.push(Frame::Compound(compound));
                Ok(())
            }
            other => unexpected(TagType::Compound, other),
        }
    }

    fn begin_element(&mut self, name: &str, _index: usize) -> Result<bool, SerialError> {
        let compound = match self.stack.last() {
            Some(Frame::Compound(compound)) => *compound,
            _ => {
                return Err(SerialError::mismatch(format!(
                    "element `{name}` begun outside of a structure"
                )));
            }
        };
        self.current = compound.get(name);
        Ok(self.current.is_some())
    }

    fn end_structure(&mut self) -> Result<(), SerialError> {
        match self.stack.pop() {
            Some(Frame::Compound(_)) => {
                self.current = None;
                Ok(())
            }
            _ => Err(SerialError::mismatch("unbalanced end of structure")),
        }
    }

    fn begin_list(&mut self) -> Result<usize, SerialError> {
        match self.next_tag()? {
            Tag::List(items) => {
                self.stack.push(Frame::List(items.iter()));
                Ok(items.len())
            }
            other => unexpected(TagType::List, other),
        }
    }

    fn end_list(&mut self) -> Result<(), SerialError> {
        match self.stack.pop() {
            Some(Frame::List(_)) => {
                self.current = None;
                Ok(())
            }
            _ => Err(SerialError::mismatch("unbalanced end of list")),
        }
    }
}
