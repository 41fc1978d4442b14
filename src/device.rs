//! Uniform metadata and value access for sensors published to a host.
//!
//! A host lists a device's values by index, reads their names and declared types, and asks for
//! a value by index.  Values come back typed; [`render_value`] turns a result into the text a
//! string-based host expects, with [`NONE`] standing in for any failure.

use core::fmt::{self, Write};
use heapless::String;

/// Text reported in place of a value that could not be read.
pub const NONE: &str = "none";

/// Capacity of [`render_value`] output.
pub const RENDERED_LEN: usize = 12;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum Value {
    Integer(u32),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Integer(value) => write!(f, "{value}"),
        }
    }
}

pub trait Device {
    type Error;

    const NAME: &'static str;
    const TYPE: &'static str;
    const VERSION: &'static str;
    const VALUE_NAMES: &'static [&'static str];
    const VALUE_TYPES: &'static [&'static str];

    fn num_values() -> usize {
        Self::VALUE_NAMES.len()
    }

    fn name_at_index(index: usize) -> Option<&'static str> {
        Self::VALUE_NAMES.get(index).copied()
    }

    fn type_at_index(index: usize) -> Option<&'static str> {
        Self::VALUE_TYPES.get(index).copied()
    }

    fn is_active(&self) -> bool;

    /// Reads the value published at `index`.
    ///
    /// # Errors
    ///
    /// Device dependent; covers at least an inactive device and an unknown index.
    fn value_at_index(&mut self, index: usize) -> Result<Value, Self::Error>;
}

/// Formats a value read for a host, or [`NONE`] if it could not be read.
#[must_use]
pub fn render_value<E>(result: &Result<Value, E>) -> String<RENDERED_LEN> {
    let mut text = String::new();
    let written = match result {
        Ok(value) => write!(text, "{value}"),
        Err(_) => text.push_str(NONE).map_err(|()| fmt::Error),
    };
    // every u32 fits
    debug_assert!(written.is_ok());
    text
}
