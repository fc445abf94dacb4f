//! Shared foundational types used across the xbit bitstream toolkit.
//!
//! This crate provides the unsigned-word abstraction shared by every
//! architecture, bit-field get/set primitives over those words, zero-copy
//! big-endian word views over byte buffers, and the device family
//! identifier.

#![warn(missing_docs)]

pub mod big_endian;
pub mod bit_ops;
pub mod family;
pub mod word;

pub use big_endian::{words_to_bytes, BigEndianView, BigEndianViewMut};
pub use bit_ops::{bit_field_get, bit_field_set, bit_mask, bit_mask_range};
pub use family::{ArchitectureKind, ParseArchitectureError};
pub use word::Word;
