//! Configuration packets: decoding from and encoding to header words.
//!
//! A packet is a header plus zero or more payload words addressed to one
//! configuration register. Three header types exist: type 0 (padding with
//! no register), type 1 (register address and short word count) and type 2
//! (long word count, register inherited from the preceding type-1 packet).
//!
//! 32-bit header layout (7-series, UltraScale, UltraScale+):
//!
//! | bits  | type 1        | type 2     |
//! |-------|---------------|------------|
//! | 31:29 | header type   | header type|
//! | 28:27 | opcode        | opcode     |
//! | 26:13 | register      | word count |
//! | 10:0  | word count    | (26:0)     |
//!
//! 16-bit header layout (Spartan-6): header type 15:13, opcode 12:11,
//! register 10:5 and a 5-bit type-1 word count in 4:0. A type-2 header is
//! followed by two words carrying the 32-bit count, high half first.

use crate::arch::{Architecture, PacketFormat};
use crate::register::ConfigurationRegister;
use std::borrow::Cow;
use std::fmt;
use xbit_common::{bit_field_get, bit_field_set};

const NO_DATA: &[u32] = &[];

/// Packet header type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeaderType {
    /// Type 0: a single padding word.
    None,
    /// Type 1: register address with a short word count.
    Type1,
    /// Type 2: long word count for the last type-1 register.
    Type2,
}

impl HeaderType {
    fn to_raw(self) -> u32 {
        match self {
            Self::None => 0,
            Self::Type1 => 1,
            Self::Type2 => 2,
        }
    }
}

/// The operation a packet performs on its register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    /// No operation.
    Nop,
    /// Register read.
    Read,
    /// Register write.
    Write,
    /// Reserved encoding.
    Reserved,
}

impl Opcode {
    fn from_raw(raw: u32) -> Self {
        match raw & 0x3 {
            0 => Self::Nop,
            1 => Self::Read,
            2 => Self::Write,
            _ => Self::Reserved,
        }
    }

    fn to_raw(self) -> u32 {
        match self {
            Self::Nop => 0,
            Self::Read => 1,
            Self::Write => 2,
            Self::Reserved => 3,
        }
    }
}

/// Encoded header words of one packet: one word, or three for a 16-bit
/// type-2 header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacketHeader {
    words: [u32; 3],
    len: usize,
}

impl PacketHeader {
    fn single(word: u32) -> Self {
        Self { words: [word, 0, 0], len: 1 }
    }

    /// The header words in stream order.
    pub fn as_slice(&self) -> &[u32] {
        &self.words[..self.len]
    }
}

/// The result of decoding one packet: the words left over, and the packet
/// if one was produced.
pub type ParseResult<'a, A> = (&'a [u32], Option<ConfigurationPacket<'a, A>>);

/// One configuration packet for architecture `A`.
///
/// Payload words borrow from the decoded word buffer when the packet was
/// parsed, and are owned when the packet was built in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigurationPacket<'a, A: Architecture> {
    header_type: HeaderType,
    opcode: Opcode,
    address: A::Register,
    data: Cow<'a, [u32]>,
}

impl<'a, A: Architecture> ConfigurationPacket<'a, A> {
    /// Builds a packet from its parts.
    pub fn new(
        header_type: HeaderType,
        opcode: Opcode,
        address: A::Register,
        data: impl Into<Cow<'a, [u32]>>,
    ) -> Self {
        Self {
            header_type,
            opcode,
            address,
            data: data.into(),
        }
    }

    /// A type-1 no-op packet. Encodes as `0x20000000` (`0x2000` on Spartan-6).
    pub fn nop() -> Self {
        Self::new(HeaderType::Type1, Opcode::Nop, A::Register::CRC, NO_DATA)
    }

    /// A type-0 padding word.
    pub fn zero_pad() -> Self {
        Self::new(HeaderType::None, Opcode::Nop, A::Register::CRC, NO_DATA)
    }

    /// A type-1 write of `data` to `register`.
    pub fn write(register: A::Register, data: impl Into<Cow<'a, [u32]>>) -> Self {
        Self::new(HeaderType::Type1, Opcode::Write, register, data)
    }

    /// A type-1 write of a single command word to CMD.
    pub fn command(command: crate::register::Command) -> Self {
        Self::write(A::Register::CMD, vec![command.to_raw()])
    }

    /// A type-2 write of `data`. The register is taken from the preceding
    /// type-1 header when decoded; it is stored here so replay and CRC
    /// computation see the same stream the parser would.
    pub fn long_write(register: A::Register, data: impl Into<Cow<'a, [u32]>>) -> Self {
        Self::new(HeaderType::Type2, Opcode::Write, register, data)
    }

    /// Header type.
    pub fn header_type(&self) -> HeaderType {
        self.header_type
    }

    /// Opcode.
    pub fn opcode(&self) -> Opcode {
        self.opcode
    }

    /// Target register.
    pub fn address(&self) -> A::Register {
        self.address
    }

    /// Payload words.
    pub fn data(&self) -> &[u32] {
        &self.data
    }

    /// Payload words with their original lifetime.
    pub fn data_cow(&self) -> &Cow<'a, [u32]> {
        &self.data
    }

    /// Detaches the packet from the buffer it was parsed from.
    pub fn into_owned(self) -> ConfigurationPacket<'static, A> {
        ConfigurationPacket {
            header_type: self.header_type,
            opcode: self.opcode,
            address: self.address,
            data: Cow::Owned(self.data.into_owned()),
        }
    }

    /// Largest payload a type-1 header can describe.
    pub fn max_type1_words() -> usize {
        match A::PACKET_FORMAT {
            PacketFormat::Word32 => 0x7FF,
            PacketFormat::Word16 => 0x1F,
        }
    }

    /// Decodes one packet from the front of `words`.
    ///
    /// Returns the unchanged input and no packet when the packet is
    /// incomplete or `words` is empty. A type-2 header with no preceding
    /// packet consumes its words but yields no packet. An unknown header
    /// type consumes everything.
    pub fn init_with_words(
        words: &'a [u32],
        previous: Option<&ConfigurationPacket<'_, A>>,
    ) -> ParseResult<'a, A> {
        match A::PACKET_FORMAT {
            PacketFormat::Word32 => Self::parse_word32(words, previous),
            PacketFormat::Word16 => Self::parse_word16(words, previous),
        }
    }

    fn parse_word32(
        words: &'a [u32],
        previous: Option<&ConfigurationPacket<'_, A>>,
    ) -> ParseResult<'a, A> {
        let Some(&header) = words.first() else {
            return (words, None);
        };
        let opcode = Opcode::from_raw(bit_field_get(header, 28, 27));
        match bit_field_get(header, 31, 29) {
            0x0 => (
                &words[1..],
                Some(Self::new(HeaderType::None, opcode, A::Register::CRC, NO_DATA)),
            ),
            0x1 => {
                let address = A::Register::from_raw(bit_field_get(header, 26, 13));
                let count = bit_field_get(header, 10, 0) as usize;
                Self::take_payload(words, 1, count, HeaderType::Type1, opcode, Some(address))
            }
            0x2 => {
                let count = bit_field_get(header, 26, 0) as usize;
                let address = previous.map(|p| p.address);
                Self::take_payload(words, 1, count, HeaderType::Type2, opcode, address)
            }
            _ => (&words[words.len()..], None),
        }
    }

    fn parse_word16(
        words: &'a [u32],
        _previous: Option<&ConfigurationPacket<'_, A>>,
    ) -> ParseResult<'a, A> {
        let Some(&header) = words.first() else {
            return (words, None);
        };
        let opcode = Opcode::from_raw(bit_field_get(header, 12, 11));
        let address = A::Register::from_raw(bit_field_get(header, 10, 5));
        match bit_field_get(header, 15, 13) {
            0x0 => (
                &words[1..],
                Some(Self::new(HeaderType::None, opcode, A::Register::CRC, NO_DATA)),
            ),
            0x1 => {
                let count = bit_field_get(header, 4, 0) as usize;
                Self::take_payload(words, 1, count, HeaderType::Type1, opcode, Some(address))
            }
            0x2 => {
                // The 16-bit type-2 header carries its own register field, so
                // no previous packet is consulted. The count follows in two words.
                if words.len() < 3 {
                    return (words, None);
                }
                let count = (((words[1] & 0xFFFF) << 16) | (words[2] & 0xFFFF)) as usize;
                Self::take_payload(words, 3, count, HeaderType::Type2, opcode, Some(address))
            }
            _ => (&words[words.len()..], None),
        }
    }

    fn take_payload(
        words: &'a [u32],
        header_words: usize,
        count: usize,
        header_type: HeaderType,
        opcode: Opcode,
        address: Option<A::Register>,
    ) -> ParseResult<'a, A> {
        if count > words.len() - header_words {
            return (words, None);
        }
        let end = header_words + count;
        let rest = &words[end..];
        match address {
            Some(address) => (
                rest,
                Some(Self::new(header_type, opcode, address, &words[header_words..end])),
            ),
            None => (rest, None),
        }
    }

    /// Encodes the packet header.
    pub fn header(&self) -> PacketHeader {
        let count = self.data.len() as u32;
        match A::PACKET_FORMAT {
            PacketFormat::Word32 => {
                let mut word = bit_field_set(0u32, 31, 29, self.header_type.to_raw());
                match self.header_type {
                    HeaderType::None => {}
                    HeaderType::Type1 => {
                        word = bit_field_set(word, 28, 27, self.opcode.to_raw());
                        word = bit_field_set(word, 26, 13, self.address.to_raw());
                        word = bit_field_set(word, 10, 0, count);
                    }
                    HeaderType::Type2 => {
                        word = bit_field_set(word, 28, 27, self.opcode.to_raw());
                        word = bit_field_set(word, 26, 0, count);
                    }
                }
                PacketHeader::single(word)
            }
            PacketFormat::Word16 => {
                let mut word = bit_field_set(0u32, 15, 13, self.header_type.to_raw());
                if self.header_type == HeaderType::None {
                    return PacketHeader::single(word);
                }
                word = bit_field_set(word, 12, 11, self.opcode.to_raw());
                word = bit_field_set(word, 10, 5, self.address.to_raw());
                if self.header_type == HeaderType::Type1 {
                    word = bit_field_set(word, 4, 0, count);
                    return PacketHeader::single(word);
                }
                PacketHeader {
                    words: [word, count >> 16, count & 0xFFFF],
                    len: 3,
                }
            }
        }
    }

    /// Number of words this packet occupies in a stream.
    pub fn encoded_len(&self) -> usize {
        self.header().len + self.data.len()
    }
}

impl<A: Architecture> fmt::Display for ConfigurationPacket<'_, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.header_type, self.opcode) {
            (HeaderType::None, _) => write!(f, "[Zero-pad]"),
            (_, Opcode::Nop) => write!(f, "[NOP]"),
            (header_type, opcode) => {
                let kind = if header_type == HeaderType::Type1 { "Type1" } else { "Type2" };
                let op = match opcode {
                    Opcode::Read => "Read",
                    Opcode::Write => "Write",
                    _ => "Reserved",
                };
                write!(f, "[{kind} {op} {} count={}", self.address, self.data.len())?;
                for word in self.data.iter().take(8) {
                    write!(f, " {word:08x}")?;
                }
                if self.data.len() > 8 {
                    write!(f, " ...")?;
                }
                write!(f, "]")
            }
        }
    }
}
