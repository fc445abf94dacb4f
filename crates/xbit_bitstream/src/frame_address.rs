//! Frame addresses and the block types they select.
//!
//! A frame address is a 32-bit register value whose fields select a block
//! type, a half of the device, a row, a column (major address) and a
//! minor frame within that column. The field layout differs between the
//! 7-series/UltraScale families and Spartan-6, so each layout is its own
//! newtype implementing [`FrameAddress`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;
use xbit_common::{bit_field_get, bit_field_set};

/// The kind of configuration block a frame belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BlockType {
    /// Interconnect and logic: CLBs, IOs and clocking.
    ClbIoClk,
    /// Block RAM contents.
    BlockRam,
    /// CFG_CLB on 7-series and UltraScale; IOB on Spartan-6.
    CfgClb,
    /// Any other encoding of the block-type field.
    Reserved(u32),
}

impl BlockType {
    /// Spartan-6 name for the third block type.
    pub const IOB: BlockType = BlockType::CfgClb;

    /// Block types that carry configuration frames, in address order.
    pub const CONFIGURABLE: [BlockType; 3] =
        [BlockType::ClbIoClk, BlockType::BlockRam, BlockType::CfgClb];

    /// Decodes the raw block-type field.
    pub fn from_raw(raw: u32) -> Self {
        match raw {
            0 => Self::ClbIoClk,
            1 => Self::BlockRam,
            2 => Self::CfgClb,
            other => Self::Reserved(other),
        }
    }

    /// Encodes the block type back into its raw field value.
    pub fn to_raw(self) -> u32 {
        match self {
            Self::ClbIoClk => 0,
            Self::BlockRam => 1,
            Self::CfgClb => 2,
            Self::Reserved(raw) => raw,
        }
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ClbIoClk => f.write_str("CLB_IO_CLK"),
            Self::BlockRam => f.write_str("BLOCK_RAM"),
            Self::CfgClb => f.write_str("CFG_CLB"),
            Self::Reserved(raw) => write!(f, "RESERVED({raw})"),
        }
    }
}

/// Field access for one frame-address register layout.
///
/// Addresses order numerically, which for every supported layout is the
/// lexicographic order of (block type, half, row, column, minor).
pub trait FrameAddress:
    Copy + Eq + Ord + Hash + fmt::Debug + fmt::Display + From<u32> + Into<u32> + Send + Sync + 'static
{
    /// Packs the given fields, truncating each to its field width.
    fn new(block_type: BlockType, is_bottom_half_rows: bool, row: u32, column: u32, minor: u32) -> Self;

    /// The block type selected by this address.
    fn block_type(self) -> BlockType;

    /// Whether the address selects the bottom half of the device.
    fn is_bottom_half_rows(self) -> bool;

    /// Row within the half.
    fn row(self) -> u32;

    /// Column (major address) within the row.
    fn column(self) -> u32;

    /// Minor frame within the column.
    fn minor(self) -> u32;

    /// The raw register value.
    fn raw(self) -> u32 {
        self.into()
    }

    /// Returns this address with only the minor field replaced.
    fn with_minor(self, minor: u32) -> Self {
        Self::new(
            self.block_type(),
            self.is_bottom_half_rows(),
            self.row(),
            self.column(),
            minor,
        )
    }
}

/// Returns `true` when advancing from `current` to `next` crosses a block
/// type, half or row boundary. Two frames of padding separate such runs in
/// the frame data stream.
pub fn is_row_boundary<F: FrameAddress>(current: F, next: F) -> bool {
    current.block_type() != next.block_type()
        || current.is_bottom_half_rows() != next.is_bottom_half_rows()
        || current.row() != next.row()
}

fn format_address<F: FrameAddress>(address: F, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
        f,
        "[{:08x} type={} half={} row={} column={} minor={}]",
        address.raw(),
        address.block_type(),
        if address.is_bottom_half_rows() { "bottom" } else { "top" },
        address.row(),
        address.column(),
        address.minor(),
    )
}

/// Frame address layout shared by 7-series, UltraScale and UltraScale+.
///
/// | bits  | field        |
/// |-------|--------------|
/// | 25:23 | block type   |
/// | 22    | bottom half  |
/// | 21:17 | row          |
/// | 16:7  | column       |
/// | 6:0   | minor        |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Series7FrameAddress(u32);

impl From<u32> for Series7FrameAddress {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

impl From<Series7FrameAddress> for u32 {
    fn from(address: Series7FrameAddress) -> Self {
        address.0
    }
}

impl FrameAddress for Series7FrameAddress {
    fn new(block_type: BlockType, is_bottom_half_rows: bool, row: u32, column: u32, minor: u32) -> Self {
        let mut raw = 0u32;
        raw = bit_field_set(raw, 25, 23, block_type.to_raw());
        raw = bit_field_set(raw, 22, 22, u32::from(is_bottom_half_rows));
        raw = bit_field_set(raw, 21, 17, row);
        raw = bit_field_set(raw, 16, 7, column);
        raw = bit_field_set(raw, 6, 0, minor);
        Self(raw)
    }

    fn block_type(self) -> BlockType {
        BlockType::from_raw(bit_field_get(self.0, 25, 23))
    }

    fn is_bottom_half_rows(self) -> bool {
        bit_field_get(self.0, 22, 22) != 0
    }

    fn row(self) -> u32 {
        bit_field_get(self.0, 21, 17)
    }

    fn column(self) -> u32 {
        bit_field_get(self.0, 16, 7)
    }

    fn minor(self) -> u32 {
        bit_field_get(self.0, 6, 0)
    }
}

impl fmt::Display for Series7FrameAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        format_address(*self, f)
    }
}

/// Spartan-6 frame address layout.
///
/// | bits  | field      |
/// |-------|------------|
/// | 31:28 | block type |
/// | 27:24 | row        |
/// | 23:16 | column     |
/// | 9:0   | minor      |
///
/// Spartan-6 has no half selector; every address reports the top half.
/// The block type field is four bits wide, although only the values 0
/// (CLB/IO/CLK), 1 (block RAM) and 2 (IOB) occur; other values decode as
/// [`BlockType::Reserved`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Spartan6FrameAddress(u32);

impl From<u32> for Spartan6FrameAddress {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

impl From<Spartan6FrameAddress> for u32 {
    fn from(address: Spartan6FrameAddress) -> Self {
        address.0
    }
}

impl FrameAddress for Spartan6FrameAddress {
    fn new(block_type: BlockType, _is_bottom_half_rows: bool, row: u32, column: u32, minor: u32) -> Self {
        let mut raw = 0u32;
        raw = bit_field_set(raw, 31, 28, block_type.to_raw());
        raw = bit_field_set(raw, 27, 24, row);
        raw = bit_field_set(raw, 23, 16, column);
        raw = bit_field_set(raw, 9, 0, minor);
        Self(raw)
    }

    fn block_type(self) -> BlockType {
        BlockType::from_raw(bit_field_get(self.0, 31, 28))
    }

    fn is_bottom_half_rows(self) -> bool {
        false
    }

    fn row(self) -> u32 {
        bit_field_get(self.0, 27, 24)
    }

    fn column(self) -> u32 {
        bit_field_get(self.0, 23, 16)
    }

    fn minor(self) -> u32 {
        bit_field_get(self.0, 9, 0)
    }
}

impl fmt::Display for Spartan6FrameAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        format_address(*self, f)
    }
}
