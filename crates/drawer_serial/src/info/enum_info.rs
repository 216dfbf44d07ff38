use alloc::borrow::Cow;
use alloc::boxed::Box;

/// A container for unit-only enum info.
///
/// Variants are identified by their declaration index (ordinal). The tag tree
/// stores the variant name, the byte stream stores the ordinal.
///
/// # Examples
///
/// ```
/// use drawer_serial::info::EnumInfo;
///
/// let info = EnumInfo::new("Direction", ["North", "East", "South", "West"]);
///
/// assert_eq!(info.variant_len(), 4);
/// assert_eq!(info.variant(2), Some("South"));
/// assert_eq!(info.index_of("West"), Some(3));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumInfo {
    name: Cow<'static, str>,
    variants: Box<[Cow<'static, str>]>,
}

impl EnumInfo {
    /// Create a new [`EnumInfo`], variant order is the input order.
    ///
    /// Only the first of repeated variant names can be encoded into the tag
    /// tree, which stores variants by name.
    pub fn new<V: Into<Cow<'static, str>>>(
        name: impl Into<Cow<'static, str>>,
        variants: impl IntoIterator<Item = V>,
    ) -> Self {
        Self {
            name: name.into(),
            variants: variants.into_iter().map(Into::into).collect(),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the variant name at the given ordinal, if present.
    pub fn variant(&self, index: usize) -> Option<&str> {
        self.variants.get(index).map(|v| &**v)
    }

    /// Returns the ordinal of the given variant name.
    ///
    /// This is O(N) complexity.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.variants.iter().position(|v| v == name)
    }

    #[inline]
    pub fn variant_len(&self) -> usize {
        self.variants.len()
    }

    /// Returns an iterator over the variant names in declaration order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &str> {
        self.variants.iter().map(|v| &**v)
    }
}
