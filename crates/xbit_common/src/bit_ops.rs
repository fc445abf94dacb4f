//! Bit-field primitives over unsigned words.
//!
//! Bit positions are numbered from 0 (least significant). Ranges are
//! inclusive on both ends and written `top, bottom`, matching the way the
//! configuration user guides document register layouts (e.g. `[31:29]`).

use crate::word::Word;

/// Returns a word with only `bit` set.
///
/// # Panics
///
/// Panics if `bit` is not below the width of `W`.
pub fn bit_mask<W: Word>(bit: u32) -> W {
    assert!(bit < W::BITS, "bit {bit} out of range for {}-bit word", W::BITS);
    W::ONE << bit
}

/// Returns a word with bits `top..=bottom` set.
///
/// # Panics
///
/// Panics if `top < bottom` or `top` is not below the width of `W`.
pub fn bit_mask_range<W: Word>(top: u32, bottom: u32) -> W {
    assert!(top >= bottom, "inverted bit range [{top}:{bottom}]");
    assert!(top < W::BITS, "bit {top} out of range for {}-bit word", W::BITS);
    (!W::ZERO >> (W::BITS - 1 - (top - bottom))) << bottom
}

/// Extracts bits `top..=bottom` of `value`, shifted down to bit 0.
pub fn bit_field_get<W: Word>(value: W, top: u32, bottom: u32) -> W {
    (value & bit_mask_range::<W>(top, bottom)) >> bottom
}

/// Replaces bits `top..=bottom` of `value` with `field_value`.
///
/// `field_value` is truncated to the width of the range before it is
/// inserted; bits that do not fit are silently dropped. Callers rely on
/// this when writing oversized values into narrow fields.
pub fn bit_field_set<W: Word>(value: W, top: u32, bottom: u32, field_value: W) -> W {
    let mask = bit_mask_range::<W>(top, bottom);
    (value & !mask) | ((field_value << bottom) & mask)
}
