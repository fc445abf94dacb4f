//! Zero-copy big-endian word views over byte buffers.
//!
//! A bitstream file is a byte buffer; the configuration logic consumes it as
//! a sequence of big-endian words of the architecture's width. The views
//! here reinterpret a byte slice as such a sequence without copying. Trailing
//! bytes that do not fill a whole word are not part of the view.

use crate::word::Word;
use std::marker::PhantomData;

/// A read-only big-endian view of a byte slice as words of type `W`.
#[derive(Debug, Clone, Copy)]
pub struct BigEndianView<'a, W: Word> {
    bytes: &'a [u8],
    _word: PhantomData<W>,
}

impl<'a, W: Word> BigEndianView<'a, W> {
    /// Creates a view over `bytes`.
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            _word: PhantomData,
        }
    }

    /// Returns the number of whole words in the view.
    pub fn len(&self) -> usize {
        self.bytes.len() / W::BYTES
    }

    /// Returns `true` if the view holds no whole word.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the word at `index`, decoded from big-endian order.
    pub fn get(&self, index: usize) -> Option<W> {
        if index >= self.len() {
            return None;
        }
        let start = index * W::BYTES;
        Some(W::from_be_slice(&self.bytes[start..start + W::BYTES]))
    }

    /// Returns an iterator over the decoded words.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = W> + 'a {
        self.bytes
            .chunks_exact(W::BYTES)
            .map(|chunk| W::from_be_slice(chunk))
    }
}

/// A mutable big-endian view of a byte slice as words of type `W`.
///
/// Writes re-encode the word into its big-endian bytes in place.
#[derive(Debug)]
pub struct BigEndianViewMut<'a, W: Word> {
    bytes: &'a mut [u8],
    _word: PhantomData<W>,
}

impl<'a, W: Word> BigEndianViewMut<'a, W> {
    /// Creates a mutable view over `bytes`.
    pub fn new(bytes: &'a mut [u8]) -> Self {
        Self {
            bytes,
            _word: PhantomData,
        }
    }

    /// Returns the number of whole words in the view.
    pub fn len(&self) -> usize {
        self.bytes.len() / W::BYTES
    }

    /// Returns `true` if the view holds no whole word.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the word at `index`, decoded from big-endian order.
    pub fn get(&self, index: usize) -> Option<W> {
        BigEndianView::<W>::new(self.bytes).get(index)
    }

    /// Overwrites the word at `index`. Returns `false` if out of range.
    pub fn set(&mut self, index: usize, word: W) -> bool {
        if index >= self.len() {
            return false;
        }
        let start = index * W::BYTES;
        word.write_be_slice(&mut self.bytes[start..start + W::BYTES]);
        true
    }

    /// Returns a read-only view of the same bytes.
    pub fn as_view(&self) -> BigEndianView<'_, W> {
        BigEndianView::new(self.bytes)
    }
}

/// Serializes `words` into a freshly allocated big-endian byte buffer.
pub fn words_to_bytes<W: Word>(words: impl IntoIterator<Item = W>) -> Vec<u8> {
    let mut out = Vec::new();
    for word in words {
        let start = out.len();
        out.resize(start + W::BYTES, 0);
        word.write_be_slice(&mut out[start..]);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_drops_trailing_bytes() {
        let bytes = [1u8, 2, 3, 4, 5, 6, 7];
        assert_eq!(BigEndianView::<u32>::new(&bytes).len(), 1);
        assert_eq!(BigEndianView::<u16>::new(&bytes).len(), 3);
        assert!(BigEndianView::<u32>::new(&bytes[..3]).is_empty());
    }

    #[test]
    fn get_decodes_big_endian() {
        let bytes = [0xAA, 0x99, 0x55, 0x66, 0x20, 0x00, 0x00, 0x00];
        let view = BigEndianView::<u32>::new(&bytes);
        assert_eq!(view.get(0), Some(0xAA99_5566));
        assert_eq!(view.get(1), Some(0x2000_0000));
        assert_eq!(view.get(2), None);

        let view16 = BigEndianView::<u16>::new(&bytes);
        assert_eq!(view16.get(1), Some(0x5566));
    }

    #[test]
    fn iter_matches_get() {
        let bytes = [0u8, 1, 0, 2, 0, 3];
        let words: Vec<u16> = BigEndianView::<u16>::new(&bytes).iter().collect();
        assert_eq!(words, vec![1, 2, 3]);
    }

    #[test]
    fn set_then_get() {
        let mut bytes = [0u8; 8];
        let mut view = BigEndianViewMut::<u32>::new(&mut bytes);
        assert!(view.set(1, 0xDEAD_BEEF));
        assert!(!view.set(2, 1));
        assert_eq!(view.get(1), Some(0xDEAD_BEEF));
        assert_eq!(bytes, [0, 0, 0, 0, 0xDE, 0xAD, 0xBE, 0xEF]);
    }

    #[test]
    fn write_back_reproduces_bytes() {
        let bytes: Vec<u8> = (0u8..16).collect();
        let words: Vec<u32> = BigEndianView::<u32>::new(&bytes).iter().collect();
        let mut copy = vec![0u8; bytes.len()];
        let mut view = BigEndianViewMut::<u32>::new(&mut copy);
        for (i, w) in words.iter().enumerate() {
            view.set(i, *w);
        }
        assert_eq!(copy, bytes);
        assert_eq!(words_to_bytes(words), bytes);
    }
}
