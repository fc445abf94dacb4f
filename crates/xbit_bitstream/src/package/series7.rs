//! 7-series boot and startup sequences.

use super::nops;
use crate::arch::Series7;
use crate::frame_address::{FrameAddress, Series7FrameAddress};
use crate::options::ConfigurationOptions0;
use crate::packet::ConfigurationPacket;
use crate::register::{Command, Series7Register as Reg};

type Packet<'a> = ConfigurationPacket<'a, Series7>;

/// FAR value written after START.
const STARTUP_FRAME_ADDRESS: u32 = 0x03BE_0000;
/// CTL0 value and mask used around configuration.
const CTL0_VALUE: u32 = 0x501;
const CTL0_INITIAL_MASK: u32 = 0x401;

fn write(register: Reg, value: u32) -> Packet<'static> {
    Packet::write(register, vec![value])
}

pub(crate) fn boot_sequence(idcode: u32) -> Vec<Packet<'static>> {
    let mut packets = vec![
        Packet::nop(),
        write(Reg::Timer, 0),
        write(Reg::Wbstar, 0),
        Packet::command(Command::Null),
        Packet::nop(),
        Packet::command(Command::Rcrc),
        Packet::nop(),
        Packet::nop(),
        write(Reg::RbCrcSw, 0),
        write(Reg::Cor0, ConfigurationOptions0::default().to_raw()),
        write(Reg::Cor1, 0),
        write(Reg::Idcode, idcode),
        Packet::command(Command::Switch),
        Packet::nop(),
        write(Reg::Mask, CTL0_INITIAL_MASK),
        write(Reg::Ctl0, CTL0_VALUE),
        write(Reg::Mask, 0),
        write(Reg::Ctl1, 0),
    ];
    packets.extend(nops(8));
    packets
}

pub(crate) fn frame_data_sequence(start: Series7FrameAddress, payload: &[u32]) -> Vec<Packet<'_>> {
    vec![
        write(Reg::Far, start.raw()),
        Packet::command(Command::Wcfg),
        Packet::nop(),
        Packet::write(Reg::Fdri, Vec::<u32>::new()),
        Packet::long_write(Reg::Fdri, payload),
    ]
}

pub(crate) fn finalization_sequence() -> Vec<Packet<'static>> {
    let mut packets = vec![
        Packet::command(Command::Rcrc),
        Packet::nop(),
        Packet::nop(),
        Packet::command(Command::Grestore),
        Packet::nop(),
        Packet::command(Command::Lfrm),
    ];
    packets.extend(nops(100));
    packets.extend([
        Packet::command(Command::Start),
        Packet::nop(),
        write(Reg::Far, STARTUP_FRAME_ADDRESS),
        write(Reg::Mask, CTL0_VALUE),
        write(Reg::Ctl0, CTL0_VALUE),
        Packet::command(Command::Rcrc),
        Packet::nop(),
        Packet::nop(),
        Packet::command(Command::Desync),
    ]);
    packets.extend(nops(400));
    packets
}
