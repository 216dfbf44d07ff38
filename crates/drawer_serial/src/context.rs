//! Provide [`SerialContext`], the registry resolving polymorphic values.
//!
//! ## auto_register
//!
//! See [`SerialContext::auto_register`].
//!
//! We use [`inventory`] crate to implement static registration, entries are
//! submitted with [`submit_polymorphic!`](crate::submit_polymorphic).
//! Without the `auto_register` feature, `auto_register` does nothing and
//! returns `false`.
//!
//! [`inventory`]: https://docs.rs/inventory

use alloc::borrow::ToOwned;
use alloc::string::String;
use core::fmt;

use drawer_utils::hash::{FixedHashState, HashMap};

use crate::Serial;
use crate::info::Descriptor;

// -----------------------------------------------------------------------------
// BaseTable

/// Registrations of one polymorphic base.
#[derive(Clone)]
struct BaseTable {
    by_tag: HashMap<String, Descriptor>,
    by_type: HashMap<String, String>,
}

impl BaseTable {
    const fn new() -> Self {
        Self {
            by_tag: HashMap::with_hasher(FixedHashState),
            by_type: HashMap::with_hasher(FixedHashState),
        }
    }
}

// -----------------------------------------------------------------------------
// SerialContext

/// A registry mapping the concrete types of polymorphic bases to stable type
/// tags, and the tags back to concrete descriptors.
///
/// Bases and concrete types are identified by their descriptor names. Each
/// base has its own tag namespace.
///
/// A context is built before use and only borrowed by the binding calls, so
/// it never changes during an encode or decode. The default context is empty:
/// every open polymorphic value fails to resolve.
///
/// # Examples
///
/// ```
/// use drawer_serial::context::SerialContext;
/// use drawer_serial::info::{Descriptor, StructInfo};
///
/// let circle = Descriptor::new(StructInfo::new("Circle", []));
///
/// let mut context = SerialContext::empty();
/// assert!(context.register_with_tag("Shape", "circle", circle.clone()));
/// // First registration wins.
/// assert!(!context.register_with_tag("Shape", "circle", circle));
///
/// assert_eq!(context.tag_of("Shape", "Circle"), Some("circle"));
/// assert_eq!(context.descriptor_of("Shape", "circle").unwrap().name(), "Circle");
/// assert_eq!(context.tag_of("Entity", "Circle"), None);
/// ```
#[derive(Clone)]
pub struct SerialContext {
    bases: HashMap<String, BaseTable>,
}

impl Default for SerialContext {
    #[inline]
    fn default() -> Self {
        Self::empty()
    }
}

impl SerialContext {
    /// Creates an empty context, usable in `const` and `static` items.
    #[inline]
    pub const fn empty() -> Self {
        Self {
            bases: HashMap::with_hasher(FixedHashState),
        }
    }

    /// Registers `concrete` under `base`, tagged with its own name.
    ///
    /// See [`register_with_tag`](Self::register_with_tag).
    #[inline]
    pub fn register(&mut self, base: &str, concrete: Descriptor) -> bool {
        let tag = concrete.name().to_owned();
        self.register_with_tag(base, &tag, concrete)
    }

    /// Registers `concrete` under `base` with an explicit type tag.
    ///
    /// Returns `false` and keeps the first registration if `tag`, or the
    /// concrete type, is already registered under `base`.
    pub fn register_with_tag(&mut self, base: &str, tag: &str, concrete: Descriptor) -> bool {
        let table = self
            .bases
            .entry_ref(base)
            .or_insert_with(BaseTable::new);

        if table.by_tag.contains_key(tag) || table.by_type.contains_key(concrete.name()) {
            log::warn!(
                "ignored polymorphic registration of `{}` as `{tag}` under `{base}`: already registered",
                concrete.name(),
            );
            return false;
        }

        table.by_type.insert(concrete.name().to_owned(), tag.to_owned());
        table.by_tag.insert(tag.to_owned(), concrete);
        true
    }

    /// Registers the typed `T` under the typed base `B`.
    #[inline]
    pub fn register_type<B: Serial, T: Serial>(&mut self) -> bool {
        self.register(B::descriptor().name(), T::descriptor())
    }

    /// Returns the tag of the concrete type named `type_name` under `base`.
    pub fn tag_of(&self, base: &str, type_name: &str) -> Option<&str> {
        self.bases.get(base)?.by_type.get(type_name).map(String::as_str)
    }

    /// Returns the concrete descriptor registered as `tag` under `base`.
    pub fn descriptor_of(&self, base: &str, tag: &str) -> Option<&Descriptor> {
        self.bases.get(base)?.by_tag.get(tag)
    }

    /// Returns `true` if nothing is registered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bases.values().all(|table| table.by_tag.is_empty())
    }

    /// Registers every entry submitted with [`submit_polymorphic!`].
    ///
    /// This method is equivalent to calling [`register`](Self::register) (or
    /// [`register_with_tag`](Self::register_with_tag)) for each entry, so
    /// repeated calls do not insert duplicates.
    ///
    /// ## Feature Dependency
    ///
    /// This method requires the `auto_register` feature. When disabled, it
    /// always do nothing and returns `false`.
    ///
    /// [`submit_polymorphic!`]: crate::submit_polymorphic
    #[cfg_attr(not(feature = "auto_register"), inline(always))]
    pub fn auto_register(&mut self) -> bool {
        #[cfg(feature = "auto_register")]
        {
            for entry in inventory::iter::<PolymorphicRegistration> {
                let base = (entry.base)();
                let concrete = (entry.concrete)();
                let tag = entry.tag.unwrap_or(concrete.name()).to_owned();
                // Already collected by an earlier call.
                if self.tag_of(base.name(), concrete.name()) == Some(tag.as_str()) {
                    continue;
                }
                self.register_with_tag(base.name(), &tag, concrete);
            }
            true
        }
        #[cfg(not(feature = "auto_register"))]
        {
            false
        }
    }
}

impl fmt::Debug for SerialContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (base, table) in &self.bases {
            map.entry(base, &table.by_type);
        }
        map.finish()
    }
}

// -----------------------------------------------------------------------------
// PolymorphicRegistration

/// A statically submitted registration, collected by
/// [`SerialContext::auto_register`].
///
/// Usually created by [`submit_polymorphic!`](crate::submit_polymorphic).
pub struct PolymorphicRegistration {
    base: fn() -> Descriptor,
    concrete: fn() -> Descriptor,
    tag: Option<&'static str>,
}

impl PolymorphicRegistration {
    /// Creates a registration, `None` tags the concrete type with its name.
    pub const fn new(
        base: fn() -> Descriptor,
        concrete: fn() -> Descriptor,
        tag: Option<&'static str>,
    ) -> Self {
        Self {
            base,
            concrete,
            tag,
        }
    }
}

#[cfg(feature = "auto_register")]
inventory::collect!(PolymorphicRegistration);

/// Submits a polymorphic registration for [`SerialContext::auto_register`].
///
/// Without the `auto_register` feature, this expands to nothing.
///
/// ```ignore
/// drawer_serial::submit_polymorphic!(Shape => Circle);
/// drawer_serial::submit_polymorphic!(Shape => Square as "square");
/// ```
#[cfg(feature = "auto_register")]
#[macro_export]
macro_rules! submit_polymorphic {
    ($base:ty => $concrete:ty as $tag:literal) => {
        $crate::__macro_exports::inventory::submit! {
            $crate::context::PolymorphicRegistration::new(
                <$base as $crate::Serial>::descriptor,
                <$concrete as $crate::Serial>::descriptor,
                ::core::option::Option::Some($tag),
            )
        }
    };
    ($base:ty => $concrete:ty) => {
        $crate::__macro_exports::inventory::submit! {
            $crate::context::PolymorphicRegistration::new(
                <$base as $crate::Serial>::descriptor,
                <$concrete as $crate::Serial>::descriptor,
                ::core::option::Option::None,
            )
        }
    };
}

/// Submits a polymorphic registration for [`SerialContext::auto_register`].
///
/// Without the `auto_register` feature, this expands to nothing.
#[cfg(not(feature = "auto_register"))]
#[macro_export]
macro_rules! submit_polymorphic {
    ($base:ty => $concrete:ty as $tag:literal) => {};
    ($base:ty => $concrete:ty) => {};
}

#[cfg(test)]
mod tests {
    use super::SerialContext;
    use crate::info::{Descriptor, StructInfo};

    fn unit(name: &'static str) -> Descriptor {
        Descriptor::new(StructInfo::new(name, []))
    }

    #[test]
    fn bases_have_separate_namespaces() {
        let mut context = SerialContext::empty();
        assert!(context.is_empty());

        assert!(context.register("Shape", unit("Circle")));
        assert!(context.register("Entity", unit("Circle")));
        assert!(!context.is_empty());

        assert_eq!(context.tag_of("Shape", "Circle"), Some("Circle"));
        assert_eq!(context.tag_of("Entity", "Circle"), Some("Circle"));
    }

    #[test]
    fn duplicates_keep_first_registration() {
        let mut context = SerialContext::default();
        assert!(context.register_with_tag("Shape", "round", unit("Circle")));

        // Same tag, other type.
        assert!(!context.register_with_tag("Shape", "round", unit("Oval")));
        // Same type, other tag.
        assert!(!context.register_with_tag("Shape", "circle", unit("Circle")));

        assert_eq!(context.descriptor_of("Shape", "round").unwrap().name(), "Circle");
        assert_eq!(context.descriptor_of("Shape", "circle"), None);
        assert_eq!(context.tag_of("Shape", "Oval"), None);
    }

    #[test]
    fn static_empty_context() {
        static EMPTY: SerialContext = SerialContext::empty();
        assert!(EMPTY.descriptor_of("Shape", "circle").is_none());
    }
}
