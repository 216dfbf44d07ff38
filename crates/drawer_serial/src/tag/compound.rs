use alloc::collections::BTreeMap;
use alloc::string::String;

use crate::tag::Tag;

/// A string-keyed container of [`Tag`]s.
///
/// Keys are kept sorted, so two compounds with the same entries are equal and
/// iterate in the same order regardless of insertion order.
///
/// `put` replaces silently, as a raw container should; the collision check of
/// slot keys belongs to the binding layer.
///
/// # Examples
///
/// ```
/// use drawer_serial::tag::{Tag, TagCompound};
///
/// let mut compound = TagCompound::new();
/// compound.put("level", Tag::Int(3));
///
/// assert!(compound.contains("level"));
/// assert_eq!(compound.get("level"), Some(&Tag::Int(3)));
/// assert_eq!(compound.get("name"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagCompound {
    entries: BTreeMap<String, Tag>,
}

impl TagCompound {
    #[inline]
    pub const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    #[inline]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    #[inline]
    pub fn get(&self, key: &str) -> Option<&Tag> {
        self.entries.get(key)
    }

    #[inline]
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Tag> {
        self.entries.get_mut(key)
    }

    /// Inserts a tag, returning the one previously stored under `key`.
    #[inline]
    pub fn put(&mut self, key: impl Into<String>, tag: Tag) -> Option<Tag> {
        self.entries.insert(key.into(), tag)
    }

    #[inline]
    pub fn remove(&mut self, key: &str) -> Option<Tag> {
        self.entries.remove(key)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns an iterator over the entries in key order.
    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&str, &Tag)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>> FromIterator<(K, Tag)> for TagCompound {
    fn from_iter<I: IntoIterator<Item = (K, Tag)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

impl<K: Into<String>> Extend<(K, Tag)> for TagCompound {
    fn extend<I: IntoIterator<Item = (K, Tag)>>(&mut self, iter: I) {
        self.entries
            .extend(iter.into_iter().map(|(k, v)| (k.into(), v)));
    }
}

#[cfg(test)]
mod tests {
    use super::TagCompound;
    use crate::tag::Tag;

    #[test]
    fn put_replaces_and_returns_previous() {
        let mut compound = TagCompound::new();
        assert_eq!(compound.put("a", Tag::Byte(1)), None);
        assert_eq!(compound.put("a", Tag::Byte(2)), Some(Tag::Byte(1)));
        assert_eq!(compound.len(), 1);
    }

    #[test]
    fn equality_ignores_insertion_order() {
        let a: TagCompound = [("x", Tag::Int(1)), ("y", Tag::Int(2))].into_iter().collect();
        let b: TagCompound = [("y", Tag::Int(2)), ("x", Tag::Int(1))].into_iter().collect();
        assert_eq!(a, b);
        assert_eq!(a.iter().map(|(k, _)| k).collect::<alloc::vec::Vec<_>>(), ["x", "y"]);
    }
}
