//! UltraScale and UltraScale+ boot and startup sequences.
//!
//! Both families share the 7-series register map and command flow. They
//! differ from 7-series in the absence of the RBCRC_SW write, the FAR value
//! written after START, and the amount of trailing padding; they differ
//! from each other only in those table values.

use super::nops;
use crate::arch::Architecture;
use crate::frame_address::{FrameAddress, Series7FrameAddress};
use crate::options::ConfigurationOptions0;
use crate::packet::ConfigurationPacket;
use crate::register::{Command, Series7Register as Reg};

/// Per-family constants of the UltraScale sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct UltraScaleSequence {
    cor1: u32,
    startup_frame_address: u32,
    lfrm_padding: usize,
    trailing_padding: usize,
}

pub(crate) const ULTRASCALE: UltraScaleSequence = UltraScaleSequence {
    cor1: 0,
    startup_frame_address: 0x07FC_0000,
    lfrm_padding: 100,
    trailing_padding: 400,
};

pub(crate) const ULTRASCALE_PLUS: UltraScaleSequence = UltraScaleSequence {
    cor1: 0,
    startup_frame_address: 0x07FC_0000,
    lfrm_padding: 100,
    trailing_padding: 160,
};

fn write<A: Architecture<Register = Reg>>(register: Reg, value: u32) -> ConfigurationPacket<'static, A> {
    ConfigurationPacket::write(register, vec![value])
}

pub(crate) fn boot_sequence<A: Architecture<Register = Reg>>(
    sequence: &UltraScaleSequence,
    idcode: u32,
) -> Vec<ConfigurationPacket<'static, A>> {
    let mut packets = vec![
        ConfigurationPacket::nop(),
        write(Reg::Timer, 0),
        write(Reg::Wbstar, 0),
        ConfigurationPacket::command(Command::Null),
        ConfigurationPacket::nop(),
        ConfigurationPacket::command(Command::Rcrc),
        ConfigurationPacket::nop(),
        ConfigurationPacket::nop(),
        write(Reg::Cor0, ConfigurationOptions0::default().to_raw()),
        write(Reg::Cor1, sequence.cor1),
        write(Reg::Idcode, idcode),
        ConfigurationPacket::command(Command::Switch),
        ConfigurationPacket::nop(),
        write(Reg::Mask, 0x401),
        write(Reg::Ctl0, 0x501),
        write(Reg::Mask, 0),
        write(Reg::Ctl1, 0),
    ];
    packets.extend(nops(8));
    packets
}

pub(crate) fn frame_data_sequence<A>(start: Series7FrameAddress, payload: &[u32]) -> Vec<ConfigurationPacket<'_, A>>
where
    A: Architecture<Register = Reg, FrameAddress = Series7FrameAddress>,
{
    vec![
        write(Reg::Far, start.raw()),
        ConfigurationPacket::command(Command::Wcfg),
        ConfigurationPacket::nop(),
        ConfigurationPacket::write(Reg::Fdri, Vec::<u32>::new()),
        ConfigurationPacket::long_write(Reg::Fdri, payload),
    ]
}

pub(crate) fn finalization_sequence<A: Architecture<Register = Reg>>(
    sequence: &UltraScaleSequence,
) -> Vec<ConfigurationPacket<'static, A>> {
    let mut packets = vec![
        ConfigurationPacket::command(Command::Rcrc),
        ConfigurationPacket::nop(),
        ConfigurationPacket::nop(),
        ConfigurationPacket::command(Command::Grestore),
        ConfigurationPacket::nop(),
        ConfigurationPacket::command(Command::Lfrm),
    ];
    packets.extend(nops(sequence.lfrm_padding));
    packets.extend([
        ConfigurationPacket::command(Command::Start),
        ConfigurationPacket::nop(),
        write(Reg::Far, sequence.startup_frame_address),
        write(Reg::Mask, 0x501),
        write(Reg::Ctl0, 0x501),
        ConfigurationPacket::command(Command::Rcrc),
        ConfigurationPacket::nop(),
        ConfigurationPacket::nop(),
        ConfigurationPacket::command(Command::Desync),
    ]);
    packets.extend(nops(sequence.trailing_padding));
    packets
}
