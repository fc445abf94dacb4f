//! Owned frame sets and the textual `.frm` frame file format.
//!
//! A `.frm` file has one frame per line: the hex frame address, a space,
//! then the frame's words as comma-separated hex values. Blank lines and
//! lines starting with `#` are ignored.
//!
//! ```text
//! 0x00000000 0x00000000,0x00000000,...,0x00000000
//! ```

use crate::arch::{Architecture, PacketFormat};
use crate::configuration::Configuration;
use crate::frame_address::{is_row_boundary, BlockType, FrameAddress};
use crate::package::FrameDataSegment;
use crate::packetizer::ConfigurationPacketizer;
use crate::topology::Part;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;

/// Errors raised while reading a `.frm` file.
#[derive(Debug, thiserror::Error)]
pub enum FrameFileError {
    /// The file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A frame address is not a hex number.
    #[error("line {line}: invalid frame address '{text}'")]
    InvalidAddress {
        /// 1-based line number.
        line: usize,
        /// The offending token.
        text: String,
    },

    /// A frame word is not a hex number.
    #[error("line {line}: invalid frame word '{text}'")]
    InvalidWord {
        /// 1-based line number.
        line: usize,
        /// The offending token.
        text: String,
    },

    /// A frame has the wrong number of words for the architecture.
    #[error("line {line}: frame has {found} words, expected {expected}")]
    WrongFrameLength {
        /// 1-based line number.
        line: usize,
        /// Words per frame for the architecture.
        expected: usize,
        /// Words present on the line.
        found: usize,
    },
}

/// Parses a hex number with an optional `0x` prefix.
fn parse_hex(text: &str) -> Option<u32> {
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    u32::from_str_radix(digits, 16).ok()
}

/// An owned, address-ordered set of frames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frames<A: Architecture> {
    frames: BTreeMap<A::FrameAddress, Vec<u32>>,
}

impl<A: Architecture> Default for Frames<A> {
    fn default() -> Self {
        Self {
            frames: BTreeMap::new(),
        }
    }
}

impl<A: Architecture> Frames<A> {
    /// An empty frame set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies the frames of a replayed configuration.
    pub fn from_configuration(configuration: &Configuration<'_, A>) -> Self {
        let frames = configuration
            .frames()
            .iter()
            .map(|(&address, words)| (address, words.to_vec()))
            .collect();
        Self { frames }
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether the set holds no frames.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Inserts or replaces one frame.
    pub fn insert(&mut self, address: A::FrameAddress, words: Vec<u32>) -> Option<Vec<u32>> {
        self.frames.insert(address, words)
    }

    /// Words of one frame.
    pub fn get(&self, address: A::FrameAddress) -> Option<&[u32]> {
        self.frames.get(&address).map(Vec::as_slice)
    }

    /// Frames in address order.
    pub fn iter(&self) -> impl Iterator<Item = (A::FrameAddress, &[u32])> {
        self.frames.iter().map(|(&address, words)| (address, words.as_slice()))
    }

    /// Keeps only frames whose address satisfies `keep`.
    pub fn retain(&mut self, mut keep: impl FnMut(A::FrameAddress) -> bool) {
        self.frames.retain(|&address, _| keep(address));
    }

    fn expected_words(address: A::FrameAddress) -> Option<usize> {
        // Spartan-6 IOB frames vary in length.
        if A::PACKET_FORMAT == PacketFormat::Word16 && address.block_type() == BlockType::IOB {
            None
        } else {
            Some(A::WORDS_PER_FRAME)
        }
    }

    /// Parses a `.frm` stream.
    pub fn read_frm(reader: impl BufRead) -> Result<Self, FrameFileError> {
        let mut frames = Self::new();
        for (index, line) in reader.lines().enumerate() {
            let line_number = index + 1;
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (address_text, words_text) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
            let address = parse_hex(address_text).ok_or_else(|| FrameFileError::InvalidAddress {
                line: line_number,
                text: address_text.to_string(),
            })?;
            let address = A::FrameAddress::from(address);

            let words = words_text
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|token| !token.is_empty())
                .map(|token| {
                    parse_hex(token).ok_or_else(|| FrameFileError::InvalidWord {
                        line: line_number,
                        text: token.to_string(),
                    })
                })
                .collect::<Result<Vec<u32>, _>>()?;

            if let Some(expected) = Self::expected_words(address) {
                if words.len() != expected {
                    return Err(FrameFileError::WrongFrameLength {
                        line: line_number,
                        expected,
                        found: words.len(),
                    });
                }
            }
            frames.insert(address, words);
        }
        log::debug!("read {} frames", frames.len());
        Ok(frames)
    }

    /// Reads a `.frm` file from disk.
    pub fn read_frm_file(path: &Path) -> Result<Self, FrameFileError> {
        Self::read_frm(BufReader::new(File::open(path)?))
    }

    /// Writes the frames in `.frm` form.
    pub fn write_frm(&self, mut out: impl Write) -> io::Result<()> {
        for (address, words) in self.iter() {
            write!(out, "0x{:08x} ", address.raw())?;
            for (index, word) in words.iter().enumerate() {
                if index > 0 {
                    out.write_all(b",")?;
                }
                write!(out, "0x{word:08x}")?;
            }
            writeln!(out)?;
        }
        Ok(())
    }

    /// Inserts an all-zero frame for every address of `part` that has no
    /// frame yet. Returns how many were added.
    pub fn add_missing_frames(&mut self, part: &Part<A>) -> usize {
        let mut added = 0;
        for address in part.frame_addresses() {
            self.frames.entry(address).or_insert_with(|| {
                added += 1;
                vec![0; A::WORDS_PER_FRAME]
            });
        }
        if added > 0 {
            log::debug!("filled {added} missing frames with zeros");
        }
        added
    }

    /// Recomputes the ECC words of every frame.
    pub fn update_ecc(&mut self) {
        for words in self.frames.values_mut() {
            A::update_ecc(words);
        }
    }

    /// Concatenates frames in the part's configuration order into one FDRI
    /// payload. Missing frames are written as zeros, and two zero frames
    /// follow each row and the final frame.
    pub fn assemble_payload(&self, part: &Part<A>) -> Vec<u32> {
        let zero_frame = vec![0u32; A::WORDS_PER_FRAME];
        let mut payload = Vec::new();
        let mut addresses = part.frame_addresses().peekable();
        while let Some(address) = addresses.next() {
            match self.frames.get(&address) {
                Some(words) => payload.extend_from_slice(words),
                None => payload.extend_from_slice(&zero_frame),
            }
            let pad = addresses.peek().map_or(true, |&next| is_row_boundary(address, next));
            if pad {
                payload.extend_from_slice(&zero_frame);
                payload.extend_from_slice(&zero_frame);
            }
        }
        payload
    }

    /// Splits the frames into runs of addresses the configuration logic
    /// visits consecutively within one row. Each run becomes one segment
    /// with its own frame address write.
    pub fn segments(&self, part: &Part<A>) -> Vec<(A::FrameAddress, Vec<u32>)> {
        let mut segments: Vec<(A::FrameAddress, Vec<u32>)> = Vec::new();
        let mut previous: Option<A::FrameAddress> = None;
        for (address, words) in self.iter() {
            let continues = previous.is_some_and(|prev| {
                part.next_frame_address(prev) == Some(address) && !is_row_boundary(prev, address)
            });
            let run = if continues { segments.last_mut() } else { None };
            match run {
                Some((_, payload)) => payload.extend_from_slice(words),
                None => segments.push((address, words.to_vec())),
            }
            previous = Some(address);
        }
        segments
    }

    /// Borrows [`segments`](Self::segments) output as package segments.
    pub fn as_package_segments(segments: &[(A::FrameAddress, Vec<u32>)]) -> Vec<FrameDataSegment<'_, A>> {
        segments
            .iter()
            .map(|(start, payload)| FrameDataSegment {
                start: *start,
                payload,
            })
            .collect()
    }

    /// Packet stream writing each frame individually.
    pub fn packetize<'a>(
        &'a self,
        part: &'a Part<A>,
    ) -> ConfigurationPacketizer<'a, A, impl Iterator<Item = (A::FrameAddress, &'a [u32])> + 'a> {
        ConfigurationPacketizer::new(part, self.iter())
    }
}
