//! Frame-to-packet synthesis.
//!
//! The packetizer is the inverse of replay: given frames in address order
//! it emits, per frame, a frame address write, the frame data through FDRI
//! (split into a type-1 header and a type-2 payload when the frame is too
//! long for a type-1 count), and two frames of zero padding wherever the
//! next frame lies in a different row, half or block type.

use crate::arch::Architecture;
use crate::frame_address::is_row_boundary;
use crate::packet::ConfigurationPacket;
use crate::register::ConfigurationRegister;
use crate::topology::Part;
use std::iter::FusedIterator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Start,
    FrameAddressWritten,
    LongFrameHeaderWritten,
    FrameDataWritten,
    ZeroPadWritten { remaining: usize },
    Finished,
}

/// Lazily turns `(address, frame)` pairs into configuration packets.
#[derive(Debug, Clone)]
pub struct ConfigurationPacketizer<'a, A: Architecture, I> {
    part: &'a Part<A>,
    frames: I,
    current: Option<(A::FrameAddress, &'a [u32])>,
    state: State,
}

impl<'a, A, I> ConfigurationPacketizer<'a, A, I>
where
    A: Architecture,
    I: Iterator<Item = (A::FrameAddress, &'a [u32])>,
{
    /// Creates a packetizer over frames sorted by address.
    pub fn new(part: &'a Part<A>, frames: I) -> Self {
        Self {
            part,
            frames,
            current: None,
            state: State::Start,
        }
    }
}

impl<'a, A, I> Iterator for ConfigurationPacketizer<'a, A, I>
where
    A: Architecture,
    I: Iterator<Item = (A::FrameAddress, &'a [u32])>,
{
    type Item = ConfigurationPacket<'a, A>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.state {
                State::Start => {
                    let Some((address, frame)) = self.frames.next() else {
                        self.state = State::Finished;
                        return None;
                    };
                    self.current = Some((address, frame));
                    self.state = State::FrameAddressWritten;
                    return Some(A::frame_address_write(address));
                }
                State::FrameAddressWritten => {
                    let (_, frame) = self.current?;
                    if frame.len() <= ConfigurationPacket::<A>::max_type1_words() {
                        self.state = State::FrameDataWritten;
                        return Some(ConfigurationPacket::write(A::Register::FDRI, frame));
                    }
                    self.state = State::LongFrameHeaderWritten;
                    return Some(ConfigurationPacket::write(A::Register::FDRI, Vec::<u32>::new()));
                }
                State::LongFrameHeaderWritten => {
                    let (_, frame) = self.current?;
                    self.state = State::FrameDataWritten;
                    return Some(ConfigurationPacket::long_write(A::Register::FDRI, frame));
                }
                State::FrameDataWritten => {
                    let (address, _) = self.current?;
                    let pad = match self.part.next_frame_address(address) {
                        Some(next) => is_row_boundary(address, next),
                        None => true,
                    };
                    self.state = if pad {
                        log::debug!("row ends after frame {address}, padding with two frames");
                        State::ZeroPadWritten {
                            remaining: 2 * A::WORDS_PER_FRAME,
                        }
                    } else {
                        State::Start
                    };
                }
                State::ZeroPadWritten { remaining: 0 } => self.state = State::Start,
                State::ZeroPadWritten { remaining } => {
                    self.state = State::ZeroPadWritten {
                        remaining: remaining - 1,
                    };
                    return Some(ConfigurationPacket::zero_pad());
                }
                State::Finished => return None,
            }
        }
    }
}

impl<'a, A, I> FusedIterator for ConfigurationPacketizer<'a, A, I>
where
    A: Architecture,
    I: Iterator<Item = (A::FrameAddress, &'a [u32])>,
{
}
