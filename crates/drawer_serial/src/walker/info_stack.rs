#[cfg(all(debug_assertions, feature = "debug"))]
use alloc::vec::Vec;
use core::fmt::{Debug, Formatter};

use crate::SerialError;
use crate::info::Descriptor;

/// Helper struct for tracking the descriptors being walked.
///
/// Structural errors are annotated with the path of descriptor names when
/// the `debug` feature is on in debug builds. Otherwise every method is a
/// no-op.
#[derive(Default)]
pub(super) struct InfoStack {
    #[cfg(all(debug_assertions, feature = "debug"))]
    stack: Vec<Descriptor>,
}

#[cfg(all(debug_assertions, feature = "debug"))]
impl InfoStack {
    pub const fn new() -> Self {
        Self { stack: Vec::new() }
    }

    #[inline]
    pub fn push(&mut self, descriptor: &Descriptor) {
        self.stack.push(descriptor.clone());
    }

    #[inline]
    pub fn pop(&mut self) {
        self.stack.pop();
    }

    /// Appends the current path to a structural mismatch, then clears the stack.
    pub fn annotate(&mut self, err: SerialError) -> SerialError {
        let err = match err {
            SerialError::Mismatch(msg) if !self.stack.is_empty() => {
                SerialError::Mismatch(alloc::format!("{msg} (stack:\n{self:?})"))
            }
            err => err,
        };
        self.stack.clear();
        err
    }
}

#[cfg(not(all(debug_assertions, feature = "debug")))]
impl InfoStack {
    pub const fn new() -> Self {
        Self {}
    }

    #[inline(always)]
    pub fn push(&mut self, _descriptor: &Descriptor) {}

    #[inline(always)]
    pub fn pop(&mut self) {}

    #[inline(always)]
    pub fn annotate(&mut self, err: SerialError) -> SerialError {
        err
    }
}

impl Debug for InfoStack {
    #[cfg(all(debug_assertions, feature = "debug"))]
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        let mut iter = self.stack.iter();

        if let Some(first) = iter.next() {
            writeln!(f, "`{}`", first.name())?;
        }

        for descriptor in iter {
            writeln!(f, " -> `{}`", descriptor.name())?;
        }

        Ok(())
    }

    #[cfg(not(all(debug_assertions, feature = "debug")))]
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.write_str("InfoStack")
    }
}
