//! Descriptor-driven serialization of typed values into a tag tree and a
//! byte stream.
//!
//! - [`serial`]: descriptors, the walker, both codecs and the binding layer.
//! - [`utils`]: shared hash containers.
//!
//! See [`serial`] for an overview.
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

pub use drawer_serial as serial;
pub use drawer_utils as utils;
