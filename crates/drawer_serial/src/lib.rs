//! Descriptor-driven serialization into a tag tree and a byte stream.
//!
//! A type describes its shape once, as a [`Descriptor`](info::Descriptor), and
//! the same walker encodes it into either representation:
//!
//! - [`tag`]: a hierarchical key/value tree, values bound to named slots of a
//!   [`TagCompound`](tag::TagCompound) by [`put`] and [`get_from`].
//! - [`buf`]: a flat positional byte stream, values appended to a
//!   [`ByteBuf`](buf::ByteBuf) by [`write`] and consumed by [`read_from`].
//!
//! Polymorphic values are resolved with a [`SerialContext`](context::SerialContext).
//!
//! # Examples
//!
//! ```
//! use drawer_serial::buf::ByteBuf;
//! use drawer_serial::tag::TagCompound;
//!
//! let scores = vec![Some(3_i32), None, Some(7)];
//!
//! let mut compound = TagCompound::new();
//! drawer_serial::put(&scores, &mut compound).unwrap();
//! assert_eq!(drawer_serial::get_from::<Vec<Option<i32>>>(&compound).unwrap(), scores);
//!
//! let mut buf = ByteBuf::new();
//! drawer_serial::write(&scores, &mut buf).unwrap();
//! assert_eq!(drawer_serial::read_from::<Vec<Option<i32>>>(&mut buf).unwrap(), scores);
//! ```
//!
//! # Features
//!
//! - `debug` (default): structural errors carry the path of descriptors being
//!   walked, in debug builds.
//! - `auto_register` (default): [`SerialContext::auto_register`] collects the
//!   registrations submitted with [`submit_polymorphic!`].
//!
//! [`SerialContext::auto_register`]: context::SerialContext::auto_register
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// -----------------------------------------------------------------------------
// no_std support

extern crate std;

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod error;
mod serial;

pub mod binding;
pub mod buf;
pub mod codec;
pub mod context;
pub mod impls;
pub mod info;
pub mod tag;
pub mod value;
pub mod walker;

// -----------------------------------------------------------------------------
// Top-Level exports

#[doc(hidden)]
pub mod __macro_exports {
    #[cfg(feature = "auto_register")]
    pub use inventory;
}

pub use binding::{get_from, put, read_from, write};
pub use error::SerialError;
pub use serial::Serial;
