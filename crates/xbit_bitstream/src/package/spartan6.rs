//! Spartan-6 boot and startup sequences.
//!
//! Every register write carries 16-bit words; 32-bit values such as the
//! IDCODE and frame address are split high half first.

use super::nops;
use crate::arch::Spartan6;
use crate::frame_address::{FrameAddress, Spartan6FrameAddress};
use crate::packet::ConfigurationPacket;
use crate::register::{Command, Spartan6Register as Reg};

type Packet<'a> = ConfigurationPacket<'a, Spartan6>;

fn write(register: Reg, value: u32) -> Packet<'static> {
    Packet::write(register, vec![value])
}

fn split(value: u32) -> Vec<u32> {
    vec![value >> 16, value & 0xFFFF]
}

pub(crate) fn boot_sequence(idcode: u32) -> Vec<Packet<'static>> {
    let mut packets = vec![
        Packet::command(Command::Rcrc),
        Packet::nop(),
        write(Reg::Flr, 0x0380),
        write(Reg::Cor1, 0x3D00),
        write(Reg::Cor2, 0x09EE),
        Packet::write(Reg::Idcode, split(idcode)),
        write(Reg::Mask, 0x00CF),
        write(Reg::Ctl, 0x0081),
    ];
    packets.extend(nops(17));
    packets.extend([
        write(Reg::CclkFreq, 0x3CC8),
        write(Reg::PwrdnReg, 0x0881),
        write(Reg::EyeMask, 0x0000),
        write(Reg::HcOpt, 0x001F),
        write(Reg::Cwdt, 0xFFFF),
        write(Reg::PuGwe, 0x0005),
        write(Reg::PuGts, 0x0004),
        write(Reg::Mode, 0x0100),
        write(Reg::General1, 0x0000),
        write(Reg::General2, 0x0000),
        write(Reg::General3, 0x0000),
        write(Reg::General4, 0x0000),
        write(Reg::General5, 0x0000),
        write(Reg::SeuOpt, 0x1BE2),
        Packet::write(Reg::ExpSign, split(0)),
        Packet::nop(),
        Packet::nop(),
    ]);
    packets
}

pub(crate) fn frame_data_sequence(start: Spartan6FrameAddress, payload: &[u32]) -> Vec<Packet<'_>> {
    let mut packets = vec![
        Packet::write(Reg::FarMaj, split(start.raw())),
        Packet::command(Command::Wcfg),
        Packet::long_write(Reg::Fdri, payload),
    ];
    packets.extend(nops(24));
    packets
}

pub(crate) fn finalization_sequence() -> Vec<Packet<'static>> {
    let mut packets = vec![
        Packet::command(Command::Grestore),
        Packet::command(Command::Lfrm),
    ];
    packets.extend(nops(4));
    packets.extend([
        Packet::command(Command::Grestore),
        Packet::command(Command::Start),
        write(Reg::Mask, 0x00FF),
        write(Reg::Ctl, 0x0081),
        Packet::write(Reg::Crc, vec![0x0039, 0xE423]),
        Packet::command(Command::Desync),
    ]);
    packets.extend(nops(14));
    packets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packet::HeaderType;

    #[test]
    fn idcode_is_split() {
        let packets = boot_sequence(0x0400_1093);
        let idcode = packets.iter().find(|p| p.address() == Reg::Idcode).unwrap();
        assert_eq!(idcode.data(), &[0x0400, 0x1093]);
        assert_eq!(packets.len(), 8 + 17 + 17);
    }

    #[test]
    fn frame_data_is_type2_without_type1_header() {
        let payload = vec![0u32; 130];
        let packets = frame_data_sequence(Spartan6FrameAddress::from(0x0001_0000), &payload);
        assert_eq!(packets[0].data(), &[0x0001, 0x0000]);
        assert_eq!(packets[2].header_type(), HeaderType::Type2);
        assert_eq!(packets[2].address(), Reg::Fdri);
        assert_eq!(packets.len(), 3 + 24);
    }

    #[test]
    fn all_words_fit_in_16_bits() {
        let packets = boot_sequence(0xFFFF_FFFF)
            .into_iter()
            .chain(finalization_sequence());
        for packet in packets {
            assert!(packet.data().iter().all(|&w| w <= 0xFFFF), "{packet}");
        }
    }
}
