//! Bitstream writer: flattens packets into the word stream.

use crate::arch::{Architecture, PacketFormat};
use crate::packet::{ConfigurationPacket, PacketHeader};
use std::io;
use std::iter::FusedIterator;
use xbit_common::words_to_bytes;

/// Lazily emits the sync header followed by every packet's header and
/// payload words.
#[derive(Debug, Clone)]
pub struct BitstreamWriter<'a, A: Architecture, I> {
    header: std::slice::Iter<'static, u32>,
    packets: I,
    pending: Option<Pending<'a, A>>,
}

#[derive(Debug, Clone)]
struct Pending<'a, A: Architecture> {
    header: PacketHeader,
    packet: ConfigurationPacket<'a, A>,
    position: usize,
}

impl<A: Architecture> Pending<'_, A> {
    fn next_word(&mut self) -> Option<u32> {
        let header = self.header.as_slice();
        let word = if self.position < header.len() {
            header[self.position]
        } else {
            *self.packet.data().get(self.position - header.len())?
        };
        self.position += 1;
        Some(word)
    }
}

impl<'a, A, I> BitstreamWriter<'a, A, I>
where
    A: Architecture,
    I: Iterator<Item = ConfigurationPacket<'a, A>>,
{
    /// Creates a writer over `packets`.
    pub fn new(packets: impl IntoIterator<Item = ConfigurationPacket<'a, A>, IntoIter = I>) -> Self {
        Self {
            header: A::SYNC_HEADER.iter(),
            packets: packets.into_iter(),
            pending: None,
        }
    }

    /// Encodes the whole stream as big-endian bytes of the architecture's
    /// word width.
    pub fn to_bytes(self) -> Vec<u8> {
        match A::PACKET_FORMAT {
            PacketFormat::Word32 => words_to_bytes(self),
            PacketFormat::Word16 => words_to_bytes(self.map(|word| word as u16)),
        }
    }

    /// Writes the encoded stream to `out`, returning the byte count.
    pub fn write_to<W: io::Write>(self, mut out: W) -> io::Result<usize> {
        let bytes = self.to_bytes();
        out.write_all(&bytes)?;
        Ok(bytes.len())
    }
}

impl<'a, A, I> Iterator for BitstreamWriter<'a, A, I>
where
    A: Architecture,
    I: Iterator<Item = ConfigurationPacket<'a, A>>,
{
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        if let Some(&word) = self.header.next() {
            return Some(word);
        }
        loop {
            if let Some(word) = self.pending.as_mut().and_then(Pending::next_word) {
                return Some(word);
            }
            let packet = self.packets.next()?;
            self.pending = Some(Pending {
                header: packet.header(),
                packet,
                position: 0,
            });
        }
    }
}

impl<'a, A, I> FusedIterator for BitstreamWriter<'a, A, I>
where
    A: Architecture,
    I: FusedIterator<Item = ConfigurationPacket<'a, A>>,
{
}
