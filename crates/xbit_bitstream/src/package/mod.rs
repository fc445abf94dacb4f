//! Complete configuration packages.
//!
//! A package is the full packet stream of a bitstream: the family's boot
//! sequence, one or more frame data sections, and the startup/desync
//! tail. Each family's sequence is a fixed table in its own submodule;
//! [`create_configuration_package`] and [`create_partial_package`] stitch
//! them together through the [`Architecture`] hooks.

pub(crate) mod series7;
pub(crate) mod spartan6;
pub(crate) mod ultrascale;

use crate::arch::Architecture;
use crate::crc::insert_crc_check;
use crate::options::ConfigurationOptions0;
use crate::packet::{ConfigurationPacket, Opcode};
use crate::register::ConfigurationRegister;
use crate::topology::Part;
use serde::{Deserialize, Serialize};

/// Adjustments applied on top of a family's fixed sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackageOptions {
    /// Replaces the COR0 value of the boot sequence, where the family has one.
    pub cor0: Option<ConfigurationOptions0>,
    /// Writes the expected CRC before the final DESYNC.
    pub crc_check: bool,
}

/// A run of frame data written starting at one frame address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameDataSegment<'a, A: Architecture> {
    /// Frame address of the first frame.
    pub start: A::FrameAddress,
    /// Concatenated frame words, including any row padding.
    pub payload: &'a [u32],
}

/// Builds a full bitstream package that writes `payload` starting at the
/// part's first frame.
pub fn create_configuration_package<'a, A: Architecture>(
    part: &Part<A>,
    payload: &'a [u32],
    options: &PackageOptions,
) -> Vec<ConfigurationPacket<'a, A>> {
    let start = part
        .first_frame_address()
        .unwrap_or_else(|| A::FrameAddress::from(0));
    let segment = FrameDataSegment { start, payload };
    create_partial_package(part, std::slice::from_ref(&segment), options)
}

/// Builds a package that writes each segment through its own frame
/// address, sharing one boot sequence and one startup tail.
pub fn create_partial_package<'a, A: Architecture>(
    part: &Part<A>,
    segments: &[FrameDataSegment<'a, A>],
    options: &PackageOptions,
) -> Vec<ConfigurationPacket<'a, A>> {
    let mut packets: Vec<ConfigurationPacket<'a, A>> = A::boot_sequence(part.idcode());
    if let Some(cor0) = &options.cor0 {
        override_cor0(&mut packets, cor0.to_raw());
    }
    for segment in segments {
        packets.extend(A::frame_data_sequence(segment.start, segment.payload));
    }
    packets.extend(A::finalization_sequence());
    if options.crc_check {
        insert_crc_check(&mut packets);
    }
    log::debug!(
        "built {} package: {} segments, {} packets",
        A::KIND,
        segments.len(),
        packets.len()
    );
    packets
}

fn override_cor0<A: Architecture>(packets: &mut [ConfigurationPacket<'_, A>], value: u32) {
    let Some(cor0) = A::Register::COR0 else {
        return;
    };
    for packet in packets.iter_mut() {
        if packet.opcode() == Opcode::Write && packet.address() == cor0 {
            *packet = ConfigurationPacket::write(cor0, vec![value]);
        }
    }
}

/// Repeats a no-op packet `count` times.
pub(crate) fn nops<'a, A: Architecture>(count: usize) -> impl Iterator<Item = ConfigurationPacket<'a, A>> {
    std::iter::repeat_with(ConfigurationPacket::nop).take(count)
}
