//! Shared foundational types used across the Kiln hardware compiler.
//!
//! Provides clock frequencies in whole Hertz and content fingerprints for
//! generated hardware artifacts.

#![warn(missing_docs)]

pub mod frequency;
pub mod hash;

pub use frequency::{Frequency, ParseFrequencyError};
pub use hash::ContentHash;
