//! Bitstream reader: locates the sync word and decodes packets lazily.

use crate::arch::{Architecture, PacketFormat};
use crate::packet::ConfigurationPacket;
use std::iter::FusedIterator;
use std::marker::PhantomData;
use xbit_common::BigEndianView;

/// The byte pattern that marks the start of the packet stream.
pub const SYNC_WORD: [u8; 4] = [0xAA, 0x99, 0x55, 0x66];

/// A decoded packet stream for architecture `A`.
///
/// Holds the words following the sync word. Packets produced by
/// [`packets`](Self::packets) borrow their payload from this buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitstreamReader<A: Architecture> {
    words: Vec<u32>,
    _arch: PhantomData<A>,
}

impl<A: Architecture> BitstreamReader<A> {
    /// Searches `bytes` for the sync word and decodes everything after it
    /// into big-endian words of the architecture's width.
    ///
    /// Returns `None` when no sync word is present. Trailing bytes that do
    /// not form a whole word are ignored.
    pub fn init_with_bytes(bytes: &[u8]) -> Option<Self> {
        let position = bytes
            .windows(SYNC_WORD.len())
            .position(|window| window == SYNC_WORD)?;
        let stream = &bytes[position + SYNC_WORD.len()..];
        let words: Vec<u32> = match A::PACKET_FORMAT {
            PacketFormat::Word32 => BigEndianView::<u32>::new(stream).iter().collect(),
            PacketFormat::Word16 => BigEndianView::<u16>::new(stream)
                .iter()
                .map(u32::from)
                .collect(),
        };
        log::debug!(
            "sync word at byte {position}, {} {} words follow",
            words.len(),
            A::KIND
        );
        Some(Self {
            words,
            _arch: PhantomData,
        })
    }

    /// Stream words after the sync word.
    pub fn words(&self) -> &[u32] {
        &self.words
    }

    /// Iterates over the decoded packets.
    pub fn packets(&self) -> Packets<'_, A> {
        Packets {
            remaining: &self.words,
            previous: None,
        }
    }
}

impl<'r, A: Architecture> IntoIterator for &'r BitstreamReader<A> {
    type Item = ConfigurationPacket<'r, A>;
    type IntoIter = Packets<'r, A>;

    fn into_iter(self) -> Self::IntoIter {
        self.packets()
    }
}

/// Lazy packet iterator over a [`BitstreamReader`].
///
/// Ends at the first incomplete packet; a truncated stream therefore
/// yields every complete packet before the truncation point.
#[derive(Debug, Clone)]
pub struct Packets<'r, A: Architecture> {
    remaining: &'r [u32],
    previous: Option<ConfigurationPacket<'r, A>>,
}

impl<'r, A: Architecture> Iterator for Packets<'r, A> {
    type Item = ConfigurationPacket<'r, A>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.remaining.is_empty() {
                return None;
            }
            let (rest, packet) =
                ConfigurationPacket::init_with_words(self.remaining, self.previous.as_ref());
            if rest.len() == self.remaining.len() {
                log::debug!(
                    "incomplete packet with {} words remaining, stopping",
                    rest.len()
                );
                self.remaining = &[];
                return None;
            }
            self.remaining = rest;
            if let Some(packet) = packet {
                self.previous = Some(packet.clone());
                return Some(packet);
            }
        }
    }
}

impl<A: Architecture> FusedIterator for Packets<'_, A> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arch::{Series7, Spartan6};
    use crate::packet::{HeaderType, Opcode};
    use crate::register::{Series7Register, Spartan6Register};

    #[test]
    fn missing_sync_word() {
        assert!(BitstreamReader::<Series7>::init_with_bytes(&[0xFF; 16]).is_none());
        assert!(BitstreamReader::<Series7>::init_with_bytes(&[]).is_none());
    }

    #[test]
    fn sync_word_only_yields_no_packets() {
        let reader = BitstreamReader::<Series7>::init_with_bytes(&SYNC_WORD).unwrap();
        assert!(reader.words().is_empty());
        assert_eq!(reader.packets().count(), 0);
    }

    #[test]
    fn single_nop() {
        let bytes = [0xAA, 0x99, 0x55, 0x66, 0x20, 0x00, 0x00, 0x00];
        let reader = BitstreamReader::<Series7>::init_with_bytes(&bytes).unwrap();
        let mut packets = reader.packets();
        let nop = packets.next().unwrap();
        assert_eq!(nop.header_type(), HeaderType::Type1);
        assert_eq!(nop.opcode(), Opcode::Nop);
        assert_eq!(nop.address(), Series7Register::Crc);
        assert!(nop.data().is_empty());
        assert!(packets.next().is_none());
        assert!(packets.next().is_none());
    }

    #[test]
    fn skips_leading_garbage_and_trailing_bytes() {
        let mut bytes = vec![0xFF, 0xFF, 0x00, 0xBB];
        bytes.extend_from_slice(&SYNC_WORD);
        bytes.extend_from_slice(&[0x30, 0x00, 0x80, 0x01, 0x00, 0x00, 0x00, 0x07, 0x12]);
        let reader = BitstreamReader::<Series7>::init_with_bytes(&bytes).unwrap();
        assert_eq!(reader.words(), &[0x3000_8001, 0x0000_0007]);
        let packets: Vec<_> = reader.packets().collect();
        assert_eq!(packets.len(), 1);
        assert_eq!(packets[0].address(), Series7Register::Cmd);
        assert_eq!(packets[0].data(), &[7]);
    }

    #[test]
    fn stops_at_truncated_packet() {
        let mut bytes = SYNC_WORD.to_vec();
        // NOP, then FDRI announcing 3 words with only 1 present.
        bytes.extend_from_slice(&[0x20, 0, 0, 0, 0x30, 0x00, 0x40, 0x03, 0, 0, 0, 1]);
        let reader = BitstreamReader::<Series7>::init_with_bytes(&bytes).unwrap();
        assert_eq!(reader.packets().count(), 1);
    }

    #[test]
    fn type2_resolves_against_previous_packet() {
        let mut bytes = SYNC_WORD.to_vec();
        for word in [0x3000_4000u32, 0x5000_0002, 0x1111_1111, 0x2222_2222] {
            bytes.extend_from_slice(&word.to_be_bytes());
        }
        let reader = BitstreamReader::<Series7>::init_with_bytes(&bytes).unwrap();
        let packets: Vec<_> = (&reader).into_iter().collect();
        assert_eq!(packets.len(), 2);
        assert_eq!(packets[1].header_type(), HeaderType::Type2);
        assert_eq!(packets[1].address(), Series7Register::Fdri);
        assert_eq!(packets[1].data(), &[0x1111_1111, 0x2222_2222]);
    }

    #[test]
    fn orphan_type2_is_skipped() {
        let mut bytes = SYNC_WORD.to_vec();
        for word in [0x5000_0001u32, 0xDEAD_BEEF, 0x2000_0000] {
            bytes.extend_from_slice(&word.to_be_bytes());
        }
        let reader = BitstreamReader::<Series7>::init_with_bytes(&bytes).unwrap();
        let packets: Vec<_> = reader.packets().collect();
        assert_eq!(packets.len(), 1);
        assert_eq!(packets[0].opcode(), Opcode::Nop);
    }

    #[test]
    fn spartan6_reads_16_bit_words() {
        let bytes = [0xAA, 0x99, 0x55, 0x66, 0x30, 0xA1, 0x00, 0x07, 0x20, 0x00];
        let reader = BitstreamReader::<Spartan6>::init_with_bytes(&bytes).unwrap();
        assert_eq!(reader.words(), &[0x30A1, 0x0007, 0x2000]);
        let packets: Vec<_> = reader.packets().collect();
        assert_eq!(packets.len(), 2);
        assert_eq!(packets[0].address(), Spartan6Register::Cmd);
    }
}
