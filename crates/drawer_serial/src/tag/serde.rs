use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use serde_core::de::{self, MapAccess, SeqAccess, Visitor};
use serde_core::ser::{SerializeMap, SerializeSeq};
use serde_core::{Deserialize, Deserializer, Serialize, Serializer};

use crate::tag::{Tag, TagCompound};

// -----------------------------------------------------------------------------
// Serialize

impl Serialize for Tag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Tag::End => serializer.serialize_unit(),
            Tag::Byte(v) => serializer.serialize_i8(*v),
            Tag::Short(v) => serializer.serialize_i16(*v),
            Tag::Int(v) => serializer.serialize_i32(*v),
            Tag::Long(v) => serializer.serialize_i64(*v),
            Tag::Float(v) => serializer.serialize_f32(*v),
            Tag::Double(v) => serializer.serialize_f64(*v),
            Tag::ByteArray(v) => serializer.serialize_bytes(v),
            Tag::String(v) => serializer.serialize_str(v),
            Tag::List(items) => {
                let mut state = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    state.serialize_element(item)?;
                }
                state.end()
            }
            Tag::Compound(compound) => compound.serialize(serializer),
        }
    }
}

impl Serialize for TagCompound {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_map(Some(self.len()))?;
        for (key, tag) in self.iter() {
            state.serialize_entry(key, tag)?;
        }
        state.end()
    }
}

// -----------------------------------------------------------------------------
// Deserialize

/// Builds tags from any self-describing format.
///
/// Formats without fixed-width integers (e.g. JSON) produce `Long` and
/// `Double` for every number.
struct TagVisitor;

impl<'de> Visitor<'de> for TagVisitor {
    type Value = Tag;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a tag tree")
    }

    fn visit_unit<E: de::Error>(self) -> Result<Tag, E> {
        Ok(Tag::End)
    }

    fn visit_none<E: de::Error>(self) -> Result<Tag, E> {
        Ok(Tag::End)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Tag, D::Error> {
        deserializer.deserialize_any(self)
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Tag, E> {
        Ok(Tag::Byte(i8::from(v)))
    }

    fn visit_i8<E: de::Error>(self, v: i8) -> Result<Tag, E> {
        Ok(Tag::Byte(v))
    }

    fn visit_i16<E: de::Error>(self, v: i16) -> Result<Tag, E> {
        Ok(Tag::Short(v))
    }

    fn visit_i32<E: de::Error>(self, v: i32) -> Result<Tag, E> {
        Ok(Tag::Int(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Tag, E> {
        Ok(Tag::Long(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Tag, E> {
        i64::try_from(v)
            .map(Tag::Long)
            .map_err(|_| E::custom("integer out of range for a long tag"))
    }

    fn visit_f32<E: de::Error>(self, v: f32) -> Result<Tag, E> {
        Ok(Tag::Float(v))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Tag, E> {
        Ok(Tag::Double(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Tag, E> {
        Ok(Tag::String(v.into()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Tag, E> {
        Ok(Tag::String(v))
    }

    fn visit_bytes<E: de::Error>(self, v: &[u8]) -> Result<Tag, E> {
        Ok(Tag::ByteArray(v.into()))
    }

    fn visit_byte_buf<E: de::Error>(self, v: Vec<u8>) -> Result<Tag, E> {
        Ok(Tag::ByteArray(v))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Tag, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(Tag::List(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<Tag, A::Error> {
        CompoundVisitor.visit_map(map).map(Tag::Compound)
    }
}

struct CompoundVisitor;

impl<'de> Visitor<'de> for CompoundVisitor {
    type Value = TagCompound;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a compound tag")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<TagCompound, A::Error> {
        let mut compound = TagCompound::new();
        while let Some((key, tag)) = map.next_entry::<String, Tag>()? {
            compound.put(key, tag);
        }
        Ok(compound)
    }
}

impl<'de> Deserialize<'de> for Tag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(TagVisitor)
    }
}

impl<'de> Deserialize<'de> for TagCompound {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(CompoundVisitor)
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;
    use alloc::vec;

    use crate::tag::{Tag, TagCompound};

    fn sample() -> TagCompound {
        let mut inner = TagCompound::new();
        inner.put("name", Tag::String("steve".to_string()));
        inner.put("hp", Tag::Int(20));

        let mut root = TagCompound::new();
        root.put("player", Tag::Compound(inner));
        root.put("scores", Tag::List(vec![Tag::Long(1), Tag::Long(2)]));
        root
    }

    #[test]
    fn json_dump() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert_eq!(
            json,
            r#"{"player":{"hp":20,"name":"steve"},"scores":[1,2]}"#
        );
    }

    #[test]
    fn json_load_widens_numbers() {
        let tag: Tag = serde_json::from_str(r#"{"a":[1,2.5],"b":null}"#).unwrap();
        let compound = tag.as_compound().unwrap();

        assert_eq!(
            compound.get("a"),
            Some(&Tag::List(vec![Tag::Long(1), Tag::Double(2.5)]))
        );
        assert_eq!(compound.get("b"), Some(&Tag::End));
    }

    #[test]
    fn ron_round_trip_of_strings_and_compounds() {
        let mut compound = TagCompound::new();
        compound.put("motd", Tag::String("hello".to_string()));

        let text = ron::to_string(&compound).unwrap();
        let back: TagCompound = ron::from_str(&text).unwrap();
        assert_eq!(back, compound);
    }

    #[derive(::serde::Serialize, ::serde::Deserialize, Debug, PartialEq)]
    struct Snapshot {
        label: alloc::string::String,
        root: TagCompound,
    }

    #[test]
    fn embedded_in_derived_types() {
        let mut root = TagCompound::new();
        root.put(
            "lines",
            Tag::List(vec![Tag::String("a".to_string()), Tag::String("b".to_string())]),
        );
        let snapshot = Snapshot {
            label: "spawn".to_string(),
            root,
        };

        let text = ron::to_string(&snapshot).unwrap();
        assert_eq!(ron::from_str::<Snapshot>(&text).unwrap(), snapshot);
    }
}
