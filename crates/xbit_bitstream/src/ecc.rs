//! Per-frame ECC words.
//!
//! 7-series frames carry a 13-bit Hamming code in the low bits of word
//! 0x32. UltraScale and UltraScale+ frames carry a 48-bit code split over
//! two words near the middle of the frame. Spartan-6 frames carry none.

/// Word of a 7-series frame holding the ECC bits.
pub const SERIES7_ECC_WORD: usize = 0x32;

/// Mask of the ECC bits within [`SERIES7_ECC_WORD`].
const SERIES7_ECC_MASK: u32 = 0x1FFF;

/// Index of the last word of a 7-series frame; parity is folded in there.
const SERIES7_LAST_WORD: u32 = 0x64;

/// First of the two ECC words in an UltraScale frame.
pub const ULTRASCALE_ECC_WORD: usize = 60;

/// First of the two ECC words in an UltraScale+ frame.
pub const ULTRASCALE_PLUS_ECC_WORD: usize = 45;

/// Folds word `index` of a 7-series frame into the running ECC value.
pub fn icap_ecc(index: u32, word: u32, ecc: u32) -> u32 {
    let base = index * 32
        + if index > 0x25 {
            0x1360
        } else if index > 0x6 {
            0x1340
        } else {
            0x1320
        };
    let word = if index as usize == SERIES7_ECC_WORD {
        word & !SERIES7_ECC_MASK
    } else {
        word
    };

    let mut ecc = ecc;
    for bit in 0..32 {
        if word & (1 << bit) != 0 {
            ecc ^= base + bit;
        }
    }

    if index == SERIES7_LAST_WORD {
        let mut parity = ecc & 0xFFF;
        parity ^= parity >> 8;
        parity ^= parity >> 4;
        parity ^= parity >> 2;
        parity ^= parity >> 1;
        ecc ^= (parity & 1) << 12;
    }
    ecc
}

/// ECC value of a whole 7-series frame.
pub fn series7_frame_ecc(frame: &[u32]) -> u32 {
    frame
        .iter()
        .enumerate()
        .fold(0, |ecc, (index, &word)| icap_ecc(index as u32, word, ecc))
}

/// Recomputes and stores the ECC bits of a 7-series frame.
pub fn update_series7_ecc(frame: &mut [u32]) {
    if frame.len() <= SERIES7_ECC_WORD {
        log::warn!("frame of {} words is too short for ECC", frame.len());
        return;
    }
    let ecc = series7_frame_ecc(frame);
    frame[SERIES7_ECC_WORD] = (frame[SERIES7_ECC_WORD] & !SERIES7_ECC_MASK) | (ecc & SERIES7_ECC_MASK);
}

/// Syndrome contribution of one set bit in an UltraScale-family frame.
fn ultrascale_bit_syndrome(word: usize, bit: u32, words_per_frame: usize) -> u64 {
    let nibble = u64::from(bit / 4);
    let nibble_bit = bit % 4;
    let mut offset = (((word + 255 - (words_per_frame - 1)) as u64) << 3) | nibble;

    // Odd parity over the 11 offset bits goes in bit 11.
    offset ^= 1 << 11;
    for i in 0..11 {
        if offset & (1 << i) != 0 {
            offset ^= 1 << 11;
        }
    }

    let mut expanded = 0u64;
    for i in 0..12 {
        if offset & (1 << i) != 0 {
            expanded |= 1 << (4 * i);
        }
    }
    expanded << nibble_bit
}

/// Recomputes and stores the 48-bit ECC of an UltraScale-family frame.
/// Bits 47:32 go in the low half of `frame[ecc_word]`, bits 31:0 fill
/// `frame[ecc_word + 1]`.
pub fn update_ultrascale_ecc(frame: &mut [u32], ecc_word: usize) {
    if frame.len() <= ecc_word + 1 {
        log::warn!("frame of {} words is too short for ECC", frame.len());
        return;
    }
    let words_per_frame = frame.len();
    let mut ecc = 0u64;
    for (index, &word) in frame.iter().enumerate() {
        let word = if index == ecc_word {
            word & 0xFFFF_0000
        } else if index == ecc_word + 1 {
            0
        } else {
            word
        };
        for bit in 0..32 {
            if word & (1 << bit) != 0 {
                ecc ^= ultrascale_bit_syndrome(index, bit, words_per_frame);
            }
        }
    }
    frame[ecc_word] = (frame[ecc_word] & 0xFFFF_0000) | ((ecc >> 32) as u32 & 0xFFFF);
    frame[ecc_word + 1] = ecc as u32;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn series7_word_vectors() {
        assert_eq!(icap_ecc(0, 0, 0), 0);
        assert_eq!(icap_ecc(0, 1, 0), 0x1320);
        assert_eq!(icap_ecc(7, 1, 0), 0x1420);
        assert_eq!(icap_ecc(0x26, 1, 0), 0x1820);
        assert_eq!(icap_ecc(0x32, !0, 0), 0x19AC);
        assert_eq!(icap_ecc(0x64, 0, 1), 0x1001);
    }

    #[test]
    fn series7_frame_update() {
        let mut frame = vec![0u32; 101];
        frame[0] = 1;
        update_series7_ecc(&mut frame);
        assert_eq!(frame[SERIES7_ECC_WORD], 0x320);

        let mut ones = vec![!0u32; 101];
        update_series7_ecc(&mut ones);
        assert_eq!(ones[SERIES7_ECC_WORD], 0xFFFF_E000 | 0x19AC);
    }

    #[test]
    fn series7_update_is_idempotent() {
        let mut frame: Vec<u32> = (0..101u32).map(|i| i.wrapping_mul(0x9E37_79B9)).collect();
        update_series7_ecc(&mut frame);
        let once = frame.clone();
        update_series7_ecc(&mut frame);
        assert_eq!(frame, once);
    }

    #[test]
    fn zero_frame_has_zero_ecc() {
        let mut frame = vec![0u32; 93];
        update_ultrascale_ecc(&mut frame, ULTRASCALE_PLUS_ECC_WORD);
        assert!(frame.iter().all(|&w| w == 0));
    }

    #[test]
    fn ultrascale_plus_single_bit() {
        let mut frame = vec![0u32; 93];
        frame[0] = 1;
        update_ultrascale_ecc(&mut frame, ULTRASCALE_PLUS_ECC_WORD);
        assert_eq!(frame[45], 0x1101);
        assert_eq!(frame[46], 0x0001_1000);

        let mut frame = vec![0u32; 93];
        frame[10] = 1 << 5;
        update_ultrascale_ecc(&mut frame, ULTRASCALE_PLUS_ECC_WORD);
        assert_eq!(frame[45], 0x2202);
        assert_eq!(frame[46], 0x0220_2002);
    }

    #[test]
    fn ultrascale_single_bit() {
        let mut frame = vec![0u32; 123];
        frame[0] = 1;
        update_ultrascale_ecc(&mut frame, ULTRASCALE_ECC_WORD);
        assert_eq!(frame[60], 0x100);
        assert_eq!(frame[61], 0x0010_1000);
    }

    #[test]
    fn ultrascale_preserves_upper_half_of_ecc_word() {
        let mut frame = vec![0u32; 93];
        frame[45] = 0xABCD_0000;
        let mut reference = frame.clone();
        update_ultrascale_ecc(&mut frame, ULTRASCALE_PLUS_ECC_WORD);
        assert_eq!(frame[45] & 0xFFFF_0000, 0xABCD_0000);
        update_ultrascale_ecc(&mut reference, ULTRASCALE_PLUS_ECC_WORD);
        update_ultrascale_ecc(&mut reference, ULTRASCALE_PLUS_ECC_WORD);
        assert_eq!(frame, reference);
    }

    #[test]
    fn short_frames_are_left_alone() {
        let mut frame = vec![7u32; 10];
        update_series7_ecc(&mut frame);
        update_ultrascale_ecc(&mut frame, ULTRASCALE_ECC_WORD);
        assert!(frame.iter().all(|&w| w == 7));
    }
}
