//! Provide hash containers based on `hashbrown`.
//!
//! The hasher is `foldhash` with a fixed seed, so iteration order and hash
//! results only depend on the inserted keys. Containers can be created in
//! `const` context, which allows static empty instances.

use core::hash::BuildHasher;

use foldhash::fast::{FixedState, FoldHasher};

// -----------------------------------------------------------------------------
// FixedHasher

/// A fixed hash seed.
const FIXED_HASH_STATE: FixedState = FixedState::with_seed(0xD3A7_E5C1_9B04_62F8);

/// A hasher whose results only depend on the input.
///
/// A type alias for [`foldhash::fast::FoldHasher`].
pub type FixedHasher = FoldHasher<'static>;

/// Hash state based upon a random but fixed seed.
///
/// # Examples
///
/// ```
/// use core::hash::{BuildHasher, Hash, Hasher};
/// use drawer_utils::hash::FixedHashState;
///
/// let mut a = FixedHashState.build_hasher();
/// let mut b = FixedHashState.build_hasher();
/// "slot".hash(&mut a);
/// "slot".hash(&mut b);
///
/// assert_eq!(a.finish(), b.finish());
/// ```
#[derive(Copy, Clone, Default, Debug)]
pub struct FixedHashState;

impl BuildHasher for FixedHashState {
    type Hasher = FixedHasher;

    #[inline(always)]
    fn build_hasher(&self) -> Self::Hasher {
        FIXED_HASH_STATE.build_hasher()
    }
}

// -----------------------------------------------------------------------------
// Containers

/// A [`hashbrown::HashMap`] using [`FixedHashState`].
///
/// Use [`HashMap::with_hasher`] with [`FixedHashState`] to create one in `const` context.
pub type HashMap<K, V> = hashbrown::HashMap<K, V, FixedHashState>;

/// A [`hashbrown::HashSet`] using [`FixedHashState`].
pub type HashSet<T> = hashbrown::HashSet<T, FixedHashState>;

// -----------------------------------------------------------------------------
// Re-export crates

pub use foldhash;
pub use hashbrown;

#[cfg(test)]
mod tests {
    use super::{FixedHashState, HashMap, HashSet};

    #[test]
    fn const_construction() {
        static EMPTY: HashMap<&str, u32> = HashMap::with_hasher(FixedHashState);
        assert!(EMPTY.is_empty());
    }

    #[test]
    fn map_and_set() {
        let mut map: HashMap<&str, u32> = HashMap::default();
        map.insert("a", 1);
        map.insert("b", 2);
        assert_eq!(map.get("a"), Some(&1));

        let mut set: HashSet<&str> = HashSet::default();
        assert!(set.insert("a"));
        assert!(!set.insert("a"));
    }
}
