//! Architecture descriptors.
//!
//! Each supported family is a zero-sized marker type implementing
//! [`Architecture`]. Generic code over `A: Architecture` is monomorphized
//! per family; the associated constants and types carry everything that
//! differs between them: frame size, packet word width, register map,
//! frame address layout, sync header, ECC scheme and boot sequence.

use crate::ecc;
use crate::frame_address::{FrameAddress, Series7FrameAddress, Spartan6FrameAddress};
use crate::package;
use crate::packet::ConfigurationPacket;
use crate::register::{ConfigurationRegister, Series7Register, Spartan6Register};
use std::fmt::Debug;
use xbit_common::ArchitectureKind;

mod sealed {
    pub trait Sealed {}
    impl Sealed for super::Series7 {}
    impl Sealed for super::UltraScale {}
    impl Sealed for super::UltraScalePlus {}
    impl Sealed for super::Spartan6 {}
}

/// Width of the words making up the packet stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacketFormat {
    /// 32-bit big-endian words.
    Word32,
    /// 16-bit big-endian words (Spartan-6). Held in the low half of a `u32`.
    Word16,
}

impl PacketFormat {
    /// Size of one stream word in bytes.
    pub fn word_bytes(self) -> usize {
        match self {
            Self::Word32 => 4,
            Self::Word16 => 2,
        }
    }
}

/// A configuration-logic family.
pub trait Architecture:
    sealed::Sealed + Copy + Clone + Default + Debug + PartialEq + Eq + Send + Sync + 'static
{
    /// Family identifier.
    const KIND: ArchitectureKind;
    /// Words in one configuration frame.
    const WORDS_PER_FRAME: usize;
    /// Stream word width.
    const PACKET_FORMAT: PacketFormat;
    /// Words emitted ahead of the first packet: padding, bus-width
    /// detection pattern and sync word.
    const SYNC_HEADER: &'static [u32];
    /// Number of payload words carrying the device IDCODE.
    const IDCODE_WORDS: usize;
    /// Control-register bit that, when set, stops a frame address write
    /// from starting a new frame data run.
    const FAR_AUTO_WRITE_INHIBIT_BIT: Option<u32>;

    /// Register map.
    type Register: ConfigurationRegister;
    /// Frame address layout.
    type FrameAddress: FrameAddress;

    /// Packet that loads `address` into the frame address register.
    fn frame_address_write(address: Self::FrameAddress) -> ConfigurationPacket<'static, Self>;

    /// Recomputes the ECC words embedded in one frame.
    fn update_ecc(frame: &mut [u32]);

    /// Packets preceding frame data: timers, options, IDCODE check, mask
    /// and control setup.
    fn boot_sequence(idcode: u32) -> Vec<ConfigurationPacket<'static, Self>>;

    /// Packets that write `payload` starting at frame address `start`.
    fn frame_data_sequence(
        start: Self::FrameAddress,
        payload: &[u32],
    ) -> Vec<ConfigurationPacket<'_, Self>>;

    /// Packets that start the device and desynchronize.
    fn finalization_sequence() -> Vec<ConfigurationPacket<'static, Self>>;
}

/// 7-series devices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Series7;

/// UltraScale devices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct UltraScale;

/// UltraScale+ devices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct UltraScalePlus;

/// Spartan-6 devices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Spartan6;

const SERIES7_SYNC_HEADER: [u32; 13] = [
    0xFFFF_FFFF, 0xFFFF_FFFF, 0xFFFF_FFFF, 0xFFFF_FFFF,
    0xFFFF_FFFF, 0xFFFF_FFFF, 0xFFFF_FFFF, 0xFFFF_FFFF,
    0x0000_00BB, 0x1122_0044, 0xFFFF_FFFF, 0xFFFF_FFFF,
    0xAA99_5566,
];

const ULTRASCALE_SYNC_HEADER: [u32; 6] = [
    0xFFFF_FFFF, 0x0000_00BB, 0x1122_0044, 0xFFFF_FFFF, 0xFFFF_FFFF, 0xAA99_5566,
];

const ULTRASCALE_PLUS_SYNC_HEADER: [u32; 21] = [
    0xFFFF_FFFF, 0xFFFF_FFFF, 0xFFFF_FFFF, 0xFFFF_FFFF,
    0xFFFF_FFFF, 0xFFFF_FFFF, 0xFFFF_FFFF, 0xFFFF_FFFF,
    0xFFFF_FFFF, 0xFFFF_FFFF, 0xFFFF_FFFF, 0xFFFF_FFFF,
    0xFFFF_FFFF, 0xFFFF_FFFF, 0xFFFF_FFFF, 0xFFFF_FFFF,
    0x0000_00BB, 0x1122_0044, 0xFFFF_FFFF, 0xFFFF_FFFF,
    0xAA99_5566,
];

const SPARTAN6_SYNC_HEADER: [u32; 10] = [
    0xFFFF, 0xFFFF, 0xFFFF, 0xFFFF, 0xFFFF, 0xFFFF, 0xFFFF, 0xFFFF, 0xAA99, 0x5566,
];

/// CTL1 bit 21 suppresses the implicit write start on FAR updates.
const SERIES7_FAR_INHIBIT_BIT: u32 = 21;

impl Architecture for Series7 {
    const KIND: ArchitectureKind = ArchitectureKind::Series7;
    const WORDS_PER_FRAME: usize = 101;
    const PACKET_FORMAT: PacketFormat = PacketFormat::Word32;
    const SYNC_HEADER: &'static [u32] = &SERIES7_SYNC_HEADER;
    const IDCODE_WORDS: usize = 1;
    const FAR_AUTO_WRITE_INHIBIT_BIT: Option<u32> = Some(SERIES7_FAR_INHIBIT_BIT);

    type Register = Series7Register;
    type FrameAddress = Series7FrameAddress;

    fn frame_address_write(address: Series7FrameAddress) -> ConfigurationPacket<'static, Self> {
        ConfigurationPacket::write(Series7Register::Far, vec![address.raw()])
    }

    fn update_ecc(frame: &mut [u32]) {
        ecc::update_series7_ecc(frame);
    }

    fn boot_sequence(idcode: u32) -> Vec<ConfigurationPacket<'static, Self>> {
        package::series7::boot_sequence(idcode)
    }

    fn frame_data_sequence(
        start: Series7FrameAddress,
        payload: &[u32],
    ) -> Vec<ConfigurationPacket<'_, Self>> {
        package::series7::frame_data_sequence(start, payload)
    }

    fn finalization_sequence() -> Vec<ConfigurationPacket<'static, Self>> {
        package::series7::finalization_sequence()
    }
}

impl Architecture for UltraScale {
    const KIND: ArchitectureKind = ArchitectureKind::UltraScale;
    const WORDS_PER_FRAME: usize = 123;
    const PACKET_FORMAT: PacketFormat = PacketFormat::Word32;
    const SYNC_HEADER: &'static [u32] = &ULTRASCALE_SYNC_HEADER;
    const IDCODE_WORDS: usize = 1;
    const FAR_AUTO_WRITE_INHIBIT_BIT: Option<u32> = Some(SERIES7_FAR_INHIBIT_BIT);

    type Register = Series7Register;
    type FrameAddress = Series7FrameAddress;

    fn frame_address_write(address: Series7FrameAddress) -> ConfigurationPacket<'static, Self> {
        ConfigurationPacket::write(Series7Register::Far, vec![address.raw()])
    }

    fn update_ecc(frame: &mut [u32]) {
        ecc::update_ultrascale_ecc(frame, ecc::ULTRASCALE_ECC_WORD);
    }

    fn boot_sequence(idcode: u32) -> Vec<ConfigurationPacket<'static, Self>> {
        package::ultrascale::boot_sequence(&package::ultrascale::ULTRASCALE, idcode)
    }

    fn frame_data_sequence(
        start: Series7FrameAddress,
        payload: &[u32],
    ) -> Vec<ConfigurationPacket<'_, Self>> {
        package::ultrascale::frame_data_sequence(start, payload)
    }

    fn finalization_sequence() -> Vec<ConfigurationPacket<'static, Self>> {
        package::ultrascale::finalization_sequence(&package::ultrascale::ULTRASCALE)
    }
}

impl Architecture for UltraScalePlus {
    const KIND: ArchitectureKind = ArchitectureKind::UltraScalePlus;
    const WORDS_PER_FRAME: usize = 93;
    const PACKET_FORMAT: PacketFormat = PacketFormat::Word32;
    const SYNC_HEADER: &'static [u32] = &ULTRASCALE_PLUS_SYNC_HEADER;
    const IDCODE_WORDS: usize = 1;
    const FAR_AUTO_WRITE_INHIBIT_BIT: Option<u32> = Some(SERIES7_FAR_INHIBIT_BIT);

    type Register = Series7Register;
    type FrameAddress = Series7FrameAddress;

    fn frame_address_write(address: Series7FrameAddress) -> ConfigurationPacket<'static, Self> {
        ConfigurationPacket::write(Series7Register::Far, vec![address.raw()])
    }

    fn update_ecc(frame: &mut [u32]) {
        ecc::update_ultrascale_ecc(frame, ecc::ULTRASCALE_PLUS_ECC_WORD);
    }

    fn boot_sequence(idcode: u32) -> Vec<ConfigurationPacket<'static, Self>> {
        package::ultrascale::boot_sequence(&package::ultrascale::ULTRASCALE_PLUS, idcode)
    }

    fn frame_data_sequence(
        start: Series7FrameAddress,
        payload: &[u32],
    ) -> Vec<ConfigurationPacket<'_, Self>> {
        package::ultrascale::frame_data_sequence(start, payload)
    }

    fn finalization_sequence() -> Vec<ConfigurationPacket<'static, Self>> {
        package::ultrascale::finalization_sequence(&package::ultrascale::ULTRASCALE_PLUS)
    }
}

impl Architecture for Spartan6 {
    const KIND: ArchitectureKind = ArchitectureKind::Spartan6;
    const WORDS_PER_FRAME: usize = 65;
    const PACKET_FORMAT: PacketFormat = PacketFormat::Word16;
    const SYNC_HEADER: &'static [u32] = &SPARTAN6_SYNC_HEADER;
    const IDCODE_WORDS: usize = 2;
    const FAR_AUTO_WRITE_INHIBIT_BIT: Option<u32> = None;

    type Register = Spartan6Register;
    type FrameAddress = Spartan6FrameAddress;

    fn frame_address_write(address: Spartan6FrameAddress) -> ConfigurationPacket<'static, Self> {
        let raw = address.raw();
        ConfigurationPacket::write(Spartan6Register::FarMaj, vec![raw >> 16, raw & 0xFFFF])
    }

    fn update_ecc(_frame: &mut [u32]) {}

    fn boot_sequence(idcode: u32) -> Vec<ConfigurationPacket<'static, Self>> {
        package::spartan6::boot_sequence(idcode)
    }

    fn frame_data_sequence(
        start: Spartan6FrameAddress,
        payload: &[u32],
    ) -> Vec<ConfigurationPacket<'_, Self>> {
        package::spartan6::frame_data_sequence(start, payload)
    }

    fn finalization_sequence() -> Vec<ConfigurationPacket<'static, Self>> {
        package::spartan6::finalization_sequence()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_sizes() {
        assert_eq!(Series7::WORDS_PER_FRAME, 101);
        assert_eq!(UltraScale::WORDS_PER_FRAME, 123);
        assert_eq!(UltraScalePlus::WORDS_PER_FRAME, 93);
        assert_eq!(Spartan6::WORDS_PER_FRAME, 65);
    }

    #[test]
    fn sync_headers_end_with_sync_word() {
        assert_eq!(Series7::SYNC_HEADER.len(), 13);
        assert_eq!(UltraScale::SYNC_HEADER.len(), 6);
        assert_eq!(UltraScalePlus::SYNC_HEADER.len(), 21);
        assert_eq!(Spartan6::SYNC_HEADER.len(), 10);
        assert_eq!(Series7::SYNC_HEADER.last(), Some(&0xAA99_5566));
        assert_eq!(&Spartan6::SYNC_HEADER[8..], &[0xAA99, 0x5566]);
    }

    #[test]
    fn spartan6_far_write_splits_address() {
        let address = Spartan6FrameAddress::from(0x0203_0011);
        let packet = Spartan6::frame_address_write(address);
        assert_eq!(packet.address(), Spartan6Register::FarMaj);
        assert_eq!(packet.data(), &[0x0203, 0x0011]);
    }

    #[test]
    fn kinds() {
        assert_eq!(Series7::KIND, ArchitectureKind::Series7);
        assert_eq!(Spartan6::KIND.to_string(), "spartan6");
    }
}
