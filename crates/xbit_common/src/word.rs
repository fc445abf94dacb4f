//! The unsigned word abstraction.
//!
//! Configuration data is a sequence of fixed-width unsigned words: 16-bit for
//! Spartan-6, 32-bit for the 7-series and UltraScale families. [`Word`] lets
//! bit-field and byte-order code be written once for every width.

use std::fmt::{Debug, LowerHex};
use std::ops::{BitAnd, BitOr, BitXor, Not, Shl, Shr};

/// A fixed-width unsigned integer usable as a configuration word.
pub trait Word:
    Copy
    + Eq
    + Ord
    + Default
    + Debug
    + LowerHex
    + BitAnd<Output = Self>
    + BitOr<Output = Self>
    + BitXor<Output = Self>
    + Not<Output = Self>
    + Shl<u32, Output = Self>
    + Shr<u32, Output = Self>
    + 'static
{
    /// Width of the word in bits.
    const BITS: u32;
    /// Width of the word in bytes.
    const BYTES: usize;
    /// The all-zero word.
    const ZERO: Self;
    /// The word with only bit 0 set.
    const ONE: Self;

    /// Decodes a word from exactly [`Self::BYTES`] big-endian bytes.
    fn from_be_slice(bytes: &[u8]) -> Self;

    /// Encodes the word into exactly [`Self::BYTES`] big-endian bytes.
    fn write_be_slice(self, out: &mut [u8]);

    /// Widens the word to `u64`.
    fn to_u64(self) -> u64;

    /// Narrows a `u64` to this width, dropping the high bits.
    fn truncate_from_u64(value: u64) -> Self;
}

macro_rules! impl_word {
    ($($ty:ty),*) => {
        $(
            impl Word for $ty {
                const BITS: u32 = <$ty>::BITS;
                const BYTES: usize = std::mem::size_of::<$ty>();
                const ZERO: Self = 0;
                const ONE: Self = 1;

                fn from_be_slice(bytes: &[u8]) -> Self {
                    let mut buf = [0u8; std::mem::size_of::<$ty>()];
                    buf.copy_from_slice(bytes);
                    <$ty>::from_be_bytes(buf)
                }

                fn write_be_slice(self, out: &mut [u8]) {
                    out.copy_from_slice(&self.to_be_bytes());
                }

                fn to_u64(self) -> u64 {
                    self as u64
                }

                fn truncate_from_u64(value: u64) -> Self {
                    value as $ty
                }
            }
        )*
    };
}

impl_word!(u8, u16, u32, u64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widths() {
        assert_eq!(<u16 as Word>::BITS, 16);
        assert_eq!(<u16 as Word>::BYTES, 2);
        assert_eq!(<u32 as Word>::BYTES, 4);
        assert_eq!(<u64 as Word>::BITS, 64);
    }

    #[test]
    fn big_endian_bytes() {
        assert_eq!(u32::from_be_slice(&[0xAA, 0x99, 0x55, 0x66]), 0xAA99_5566);
        let mut out = [0u8; 2];
        0xAA99u16.write_be_slice(&mut out);
        assert_eq!(out, [0xAA, 0x99]);
    }

    #[test]
    fn truncation() {
        assert_eq!(u16::truncate_from_u64(0x1_2345), 0x2345);
        assert_eq!(0xFFFF_FFFFu32.to_u64(), 0xFFFF_FFFF);
    }
}
