//! Frame replay: reconstructs frame contents from a packet stream.
//!
//! [`Configuration::init_with_packets`] plays packets through a small model
//! of the configuration logic's registers (FAR, MASK, control, CMD, IDCODE)
//! and collects every frame written through FDRI or duplicated through
//! MFWR into an address-ordered map.

use crate::arch::Architecture;
use crate::frame_address::{is_row_boundary, FrameAddress};
use crate::packet::{ConfigurationPacket, Opcode};
use crate::packetizer::ConfigurationPacketizer;
use crate::register::{Command, ConfigurationRegister, RegisterRole};
use crate::topology::Part;
use std::borrow::Cow;
use std::collections::BTreeMap;

/// Frame contents keyed by frame address.
pub type FrameMap<'a, A> = BTreeMap<<A as Architecture>::FrameAddress, Cow<'a, [u32]>>;

/// The frames carried by a bitstream, bound to the part they address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration<'a, A: Architecture> {
    part: &'a Part<A>,
    frames: FrameMap<'a, A>,
}

/// Replay state of the modelled configuration registers.
#[derive(Debug, Default)]
struct RegisterState {
    command: u32,
    frame_address: u32,
    mask: u32,
    control: u32,
    start_new_write: bool,
    start_duplicate_write: bool,
    current_frame_address: u32,
    last_written_frame_address: Option<u32>,
}

impl RegisterState {
    fn far_write_requested<A: Architecture>(&self) -> bool {
        let inhibited = A::FAR_AUTO_WRITE_INHIBIT_BIT
            .is_some_and(|bit| self.control & (1 << bit) != 0);
        !inhibited && self.command == Command::Wcfg.to_raw()
    }
}

impl<'a, A: Architecture> Configuration<'a, A> {
    /// Wraps an existing frame map.
    pub fn new(part: &'a Part<A>, frames: FrameMap<'a, A>) -> Self {
        Self { part, frames }
    }

    /// Replays `packets` against `part`.
    ///
    /// Only write packets have an effect. Returns `None` when an IDCODE
    /// write does not match the part.
    pub fn init_with_packets(
        part: &'a Part<A>,
        packets: impl IntoIterator<Item = ConfigurationPacket<'a, A>>,
    ) -> Option<Self> {
        let mut state = RegisterState::default();
        let mut frames: FrameMap<'a, A> = BTreeMap::new();

        for packet in packets {
            if packet.opcode() != Opcode::Write {
                continue;
            }
            let data = packet.data();
            match packet.address().role() {
                RegisterRole::Mask => {
                    if let Some(&mask) = data.first() {
                        state.mask = mask;
                    }
                }
                RegisterRole::Control => {
                    if let Some(&value) = data.first() {
                        state.control = value & state.mask;
                    }
                }
                RegisterRole::Command => {
                    let Some(&command) = data.first() else {
                        continue;
                    };
                    state.command = command;
                    match Command::from_raw(command) {
                        Command::Wcfg => state.start_new_write = true,
                        Command::Mfw => state.start_duplicate_write = true,
                        _ => {}
                    }
                }
                RegisterRole::Idcode => {
                    if data.len() < A::IDCODE_WORDS {
                        continue;
                    }
                    let idcode = if A::IDCODE_WORDS == 2 {
                        ((data[0] & 0xFFFF) << 16) | (data[1] & 0xFFFF)
                    } else {
                        data[0]
                    };
                    if idcode != part.idcode() {
                        log::warn!(
                            "IDCODE mismatch: bitstream targets {idcode:#010x}, part is {:#010x}",
                            part.idcode()
                        );
                        return None;
                    }
                }
                RegisterRole::FrameAddress => {
                    if let Some(&address) = data.first() {
                        state.frame_address = address;
                        if state.far_write_requested::<A>() {
                            state.start_new_write = true;
                        }
                    }
                }
                RegisterRole::FrameAddressMajor => match *data {
                    [major] => state.frame_address = (major & 0xFFFF) << 16,
                    [major, minor, ..] => {
                        state.frame_address = ((major & 0xFFFF) << 16) | (minor & 0xFFFF);
                        if state.far_write_requested::<A>() {
                            state.start_new_write = true;
                        }
                    }
                    [] => {}
                },
                RegisterRole::FrameAddressMinor => {
                    if let Some(&minor) = data.first() {
                        state.frame_address = (state.frame_address & !0x3FF) | (minor & 0x3FF);
                        if state.far_write_requested::<A>() {
                            state.start_new_write = true;
                        }
                    }
                }
                RegisterRole::FrameDataInput => {
                    Self::write_frames(part, &mut state, &mut frames, packet.data_cow());
                }
                RegisterRole::MultiFrameWrite => {
                    if !state.start_duplicate_write {
                        continue;
                    }
                    let source = state
                        .last_written_frame_address
                        .and_then(|raw| frames.get(&A::FrameAddress::from(raw)).cloned());
                    match source {
                        Some(frame) => {
                            frames.insert(A::FrameAddress::from(state.frame_address), frame);
                        }
                        None => log::warn!(
                            "multiple frame write to {:#010x} with no frame to copy",
                            state.frame_address
                        ),
                    }
                }
                RegisterRole::Crc | RegisterRole::Other => {}
            }
        }

        log::debug!("replay produced {} frames", frames.len());
        Some(Self { part, frames })
    }

    fn write_frames(
        part: &Part<A>,
        state: &mut RegisterState,
        frames: &mut FrameMap<'a, A>,
        data: &Cow<'a, [u32]>,
    ) {
        if state.start_new_write {
            state.current_frame_address = state.frame_address;
            state.start_new_write = false;
        }

        let frame_count = data.len() / A::WORDS_PER_FRAME;
        let mut index = 0;
        while index < frame_count {
            let current = A::FrameAddress::from(state.current_frame_address);
            let start = index * A::WORDS_PER_FRAME;
            frames.insert(current, slice_frame(data, start, start + A::WORDS_PER_FRAME));
            state.last_written_frame_address = Some(current.raw());

            let Some(next) = part.next_frame_address(current) else {
                let dropped = data.len() - (index + 1) * A::WORDS_PER_FRAME;
                if dropped > 0 {
                    log::debug!("{dropped} words past the last frame of the part dropped");
                }
                break;
            };
            if is_row_boundary(current, next) {
                index += 2;
            }
            state.current_frame_address = next.raw();
            index += 1;
        }
    }

    /// The part the frames belong to.
    pub fn part(&self) -> &'a Part<A> {
        self.part
    }

    /// Frames keyed by address.
    pub fn frames(&self) -> &FrameMap<'a, A> {
        &self.frames
    }

    /// Consumes the configuration, returning its frames.
    pub fn into_frames(self) -> FrameMap<'a, A> {
        self.frames
    }

    /// Packet stream that writes these frames back: FAR, FDRI and row
    /// padding for each run of frames.
    pub fn packetize(
        &self,
    ) -> ConfigurationPacketizer<'_, A, impl Iterator<Item = (A::FrameAddress, &[u32])> + '_> {
        ConfigurationPacketizer::new(
            self.part,
            self.frames.iter().map(|(&address, words)| (address, words.as_ref())),
        )
    }
}

fn slice_frame<'a>(data: &Cow<'a, [u32]>, start: usize, end: usize) -> Cow<'a, [u32]> {
    match *data {
        Cow::Borrowed(words) => Cow::Borrowed(&words[start..end]),
        Cow::Owned(ref words) => Cow::Owned(words[start..end].to_vec()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arch::{Series7, Spartan6};
    use crate::frame_address::{BlockType, Series7FrameAddress, Spartan6FrameAddress};
    use crate::register::{Series7Register, Spartan6Register};

    type Packet = ConfigurationPacket<'static, Series7>;

    fn addr(row: u32, column: u32, minor: u32) -> Series7FrameAddress {
        Series7FrameAddress::new(BlockType::ClbIoClk, false, row, column, minor)
    }

    /// Two rows, one column of two frames each.
    fn part() -> Part<Series7> {
        Part::from_frame_addresses(
            0x0362_D093,
            &[addr(0, 0, 0), addr(0, 0, 1), addr(1, 0, 0), addr(1, 0, 1)],
        )
    }

    fn frame(fill: u32) -> Vec<u32> {
        vec![fill; Series7::WORDS_PER_FRAME]
    }

    fn write_sequence(start: Series7FrameAddress, payload: Vec<u32>) -> Vec<Packet> {
        vec![
            Packet::write(Series7Register::Idcode, vec![0x0362_D093]),
            Packet::command(Command::Wcfg),
            Packet::write(Series7Register::Far, vec![start.raw()]),
            Packet::write(Series7Register::Fdri, Vec::<u32>::new()),
            Packet::long_write(Series7Register::Fdri, payload),
        ]
    }

    #[test]
    fn writes_consecutive_frames_and_skips_row_padding() {
        let part = part();
        let mut payload = Vec::new();
        payload.extend(frame(1));
        payload.extend(frame(2));
        payload.extend(frame(0));
        payload.extend(frame(0));
        payload.extend(frame(3));
        payload.extend(frame(4));
        let config = Configuration::init_with_packets(&part, write_sequence(addr(0, 0, 0), payload)).unwrap();

        let frames = config.frames();
        assert_eq!(frames.len(), 4);
        assert_eq!(frames[&addr(0, 0, 1)][0], 2);
        assert_eq!(frames[&addr(1, 0, 0)][0], 3);
        assert_eq!(frames[&addr(1, 0, 1)][0], 4);
    }

    #[test]
    fn idcode_mismatch_fails() {
        let part = part();
        let packets = vec![Packet::write(Series7Register::Idcode, vec![0x1234_5678])];
        assert!(Configuration::init_with_packets(&part, packets).is_none());
    }

    #[test]
    fn overrun_past_last_frame_is_dropped() {
        let part = part();
        let mut payload = Vec::new();
        for fill in 1..=4 {
            payload.extend(frame(fill));
        }
        let config = Configuration::init_with_packets(&part, write_sequence(addr(1, 0, 0), payload)).unwrap();
        let frames = config.frames();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[&addr(1, 0, 0)][0], 1);
        assert_eq!(frames[&addr(1, 0, 1)][0], 2);
    }

    #[test]
    fn partial_trailing_frame_is_ignored() {
        let part = part();
        let mut payload = frame(7);
        payload.extend_from_slice(&[9; 10]);
        let config = Configuration::init_with_packets(&part, write_sequence(addr(0, 0, 0), payload)).unwrap();
        assert_eq!(config.frames().len(), 1);
    }

    #[test]
    fn far_write_without_wcfg_continues_previous_run() {
        let part = part();
        let packets = vec![
            Packet::command(Command::Wcfg),
            Packet::write(Series7Register::Far, vec![addr(0, 0, 0).raw()]),
            Packet::write(Series7Register::Fdri, frame(1)),
            Packet::command(Command::Null),
            Packet::write(Series7Register::Far, vec![addr(1, 0, 0).raw()]),
            Packet::write(Series7Register::Fdri, frame(2)),
        ];
        let config = Configuration::init_with_packets(&part, packets).unwrap();
        assert_eq!(config.frames()[&addr(0, 0, 1)][0], 2);
        assert!(!config.frames().contains_key(&addr(1, 0, 0)));
    }

    #[test]
    fn ctl1_inhibit_bit_blocks_far_retrigger() {
        let part = part();
        let packets = vec![
            Packet::write(Series7Register::Mask, vec![1 << 21]),
            Packet::write(Series7Register::Ctl1, vec![1 << 21]),
            Packet::write(Series7Register::Far, vec![addr(0, 0, 0).raw()]),
            Packet::command(Command::Wcfg),
            Packet::write(Series7Register::Fdri, frame(1)),
            Packet::write(Series7Register::Far, vec![addr(1, 0, 0).raw()]),
            Packet::write(Series7Register::Fdri, frame(2)),
        ];
        let config = Configuration::init_with_packets(&part, packets).unwrap();
        assert_eq!(config.frames()[&addr(0, 0, 0)][0], 1);
        assert_eq!(config.frames()[&addr(0, 0, 1)][0], 2);
    }

    #[test]
    fn masked_control_write_is_ignored() {
        let part = part();
        let packets = vec![
            Packet::write(Series7Register::Mask, vec![0]),
            Packet::write(Series7Register::Ctl1, vec![1 << 21]),
            Packet::command(Command::Wcfg),
            Packet::write(Series7Register::Far, vec![addr(0, 0, 0).raw()]),
            Packet::write(Series7Register::Fdri, frame(1)),
            Packet::write(Series7Register::Far, vec![addr(1, 0, 0).raw()]),
            Packet::write(Series7Register::Fdri, frame(2)),
        ];
        let config = Configuration::init_with_packets(&part, packets).unwrap();
        assert_eq!(config.frames()[&addr(1, 0, 0)][0], 2);
    }

    #[test]
    fn read_packets_have_no_effect() {
        let part = part();
        let packets = vec![
            Packet::command(Command::Wcfg),
            Packet::new(crate::packet::HeaderType::Type1, Opcode::Read, Series7Register::Fdri, frame(5)),
        ];
        let config = Configuration::init_with_packets(&part, packets).unwrap();
        assert!(config.frames().is_empty());
    }

    #[test]
    fn spartan6_split_far_and_multi_frame_write() {
        type S6 = ConfigurationPacket<'static, Spartan6>;
        let a0 = Spartan6FrameAddress::new(BlockType::ClbIoClk, false, 0, 0, 0);
        let a1 = a0.with_minor(1);
        let a2 = a0.with_minor(2);
        let part = Part::<Spartan6>::from_frame_addresses(0x0400_1093, &[a0, a1, a2]);
        let packets = vec![
            S6::write(Spartan6Register::Idcode, vec![0x0400, 0x1093]),
            S6::command(Command::Wcfg),
            S6::write(Spartan6Register::FarMaj, vec![0x0000, 0x0001]),
            S6::long_write(Spartan6Register::Fdri, vec![0xBEEF; Spartan6::WORDS_PER_FRAME]),
            S6::command(Command::Mfw),
            S6::write(Spartan6Register::FarMaj, vec![0x0000]),
            S6::write(Spartan6Register::FarMin, vec![0x0002]),
            S6::write(Spartan6Register::Mfwr, vec![0, 0, 0, 0]),
        ];
        let config = Configuration::init_with_packets(&part, packets).unwrap();
        assert_eq!(config.frames().len(), 2);
        assert_eq!(config.frames()[&a1][0], 0xBEEF);
        assert_eq!(config.frames()[&a2][0], 0xBEEF);
    }

    #[test]
    fn spartan6_minor_write_replaces_previous_minor() {
        type S6 = ConfigurationPacket<'static, Spartan6>;
        let a0 = Spartan6FrameAddress::new(BlockType::ClbIoClk, false, 0, 0, 0);
        let addresses: Vec<_> = (0..4).map(|minor| a0.with_minor(minor)).collect();
        let part = Part::<Spartan6>::from_frame_addresses(0x0400_1093, &addresses);
        let packets = vec![
            S6::command(Command::Wcfg),
            S6::write(Spartan6Register::FarMaj, vec![0x0000, 0x0003]),
            S6::write(Spartan6Register::FarMin, vec![0x0001]),
            S6::long_write(Spartan6Register::Fdri, vec![0x00AA; Spartan6::WORDS_PER_FRAME]),
        ];
        let config = Configuration::init_with_packets(&part, packets).unwrap();
        assert_eq!(config.frames().len(), 1);
        assert_eq!(config.frames()[&a0.with_minor(1)][0], 0x00AA);
    }

    #[test]
    fn frames_borrow_from_input_buffer() {
        let part = part();
        let words = frame(6);
        let packets = vec![
            ConfigurationPacket::<Series7>::command(Command::Wcfg),
            ConfigurationPacket::write(Series7Register::Far, vec![0]),
            ConfigurationPacket::write(Series7Register::Fdri, words.as_slice()),
        ];
        let config = Configuration::init_with_packets(&part, packets).unwrap();
        assert!(matches!(config.frames()[&addr(0, 0, 0)], Cow::Borrowed(_)));
    }
}
