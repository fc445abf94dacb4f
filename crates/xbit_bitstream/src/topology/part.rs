use super::region::GlobalClockRegion;
use crate::arch::Architecture;
use crate::frame_address::{BlockType, FrameAddress};
use std::iter::FusedIterator;
use std::ops::Range;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Layout {
    Regions {
        top: GlobalClockRegion,
        bottom: GlobalClockRegion,
    },
    Ranges(Vec<Range<u32>>),
}

/// The frame-address space of one device.
///
/// Built either from a tree of global clock regions (the usual case) or,
/// for parts described only by address intervals, from a sorted list of
/// half-open `[begin, end)` ranges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part<A: Architecture> {
    idcode: u32,
    layout: Layout,
    _arch: std::marker::PhantomData<A>,
}

impl<A: Architecture> Part<A> {
    /// Builds a part from explicit top and bottom regions.
    pub fn new(idcode: u32, top: GlobalClockRegion, bottom: GlobalClockRegion) -> Self {
        Self {
            idcode,
            layout: Layout::Regions { top, bottom },
            _arch: std::marker::PhantomData,
        }
    }

    /// Builds a part from the addresses of every frame it contains.
    pub fn from_frame_addresses(idcode: u32, addresses: &[A::FrameAddress]) -> Self {
        let (bottom, top): (Vec<_>, Vec<_>) = addresses
            .iter()
            .copied()
            .partition(|address| address.is_bottom_half_rows());
        Self::new(
            idcode,
            GlobalClockRegion::from_frame_addresses(&top),
            GlobalClockRegion::from_frame_addresses(&bottom),
        )
    }

    /// Builds a part from half-open raw address ranges. Empty ranges are
    /// dropped and the rest sorted by start.
    ///
    /// # Panics
    ///
    /// Panics if two ranges overlap.
    pub fn from_ranges(idcode: u32, ranges: impl IntoIterator<Item = Range<u32>>) -> Self {
        let mut ranges: Vec<Range<u32>> = ranges.into_iter().filter(|r| r.start < r.end).collect();
        ranges.sort_by_key(|r| r.start);
        assert!(
            ranges.windows(2).all(|pair| pair[0].end <= pair[1].start),
            "frame address ranges overlap"
        );
        Self {
            idcode,
            layout: Layout::Ranges(ranges),
            _arch: std::marker::PhantomData,
        }
    }

    /// Device identifier expected in the IDCODE register.
    pub fn idcode(&self) -> u32 {
        self.idcode
    }

    /// Top half region, for region-based parts.
    pub fn top_region(&self) -> Option<&GlobalClockRegion> {
        match &self.layout {
            Layout::Regions { top, .. } => Some(top),
            Layout::Ranges(_) => None,
        }
    }

    /// Bottom half region, for region-based parts.
    pub fn bottom_region(&self) -> Option<&GlobalClockRegion> {
        match &self.layout {
            Layout::Regions { bottom, .. } => Some(bottom),
            Layout::Ranges(_) => None,
        }
    }

    /// Address ranges, for range-based parts.
    pub fn ranges(&self) -> Option<&[Range<u32>]> {
        match &self.layout {
            Layout::Ranges(ranges) => Some(ranges),
            Layout::Regions { .. } => None,
        }
    }

    /// Whether `address` names a frame of this part.
    pub fn is_valid_frame_address(&self, address: A::FrameAddress) -> bool {
        match &self.layout {
            Layout::Regions { top, bottom } => {
                if address.is_bottom_half_rows() {
                    bottom.is_valid_frame_address(address)
                } else {
                    top.is_valid_frame_address(address)
                }
            }
            Layout::Ranges(ranges) => {
                let raw = address.raw();
                ranges.iter().any(|r| r.contains(&raw))
            }
        }
    }

    /// The address the configuration logic advances to after `address`.
    ///
    /// Within a half the order is column, then row. When a half runs out,
    /// the top half continues into the bottom half of the same block type,
    /// and after that into the next block type, top half first. Each jump
    /// lands on the lowest populated row and column, not on row 0 column 0.
    /// Addresses that are not frames of the part have no successor.
    pub fn next_frame_address(&self, address: A::FrameAddress) -> Option<A::FrameAddress> {
        match &self.layout {
            Layout::Regions { top, bottom } => Self::next_in_regions(top, bottom, address),
            Layout::Ranges(ranges) => {
                let raw = address.raw();
                let index = ranges.iter().position(|r| r.contains(&raw))?;
                if raw + 1 < ranges[index].end {
                    Some(A::FrameAddress::from(raw + 1))
                } else {
                    ranges.get(index + 1).map(|r| A::FrameAddress::from(r.start))
                }
            }
        }
    }

    fn next_in_regions(
        top: &GlobalClockRegion,
        bottom: &GlobalClockRegion,
        address: A::FrameAddress,
    ) -> Option<A::FrameAddress> {
        let block_type = address.block_type();
        let region = if address.is_bottom_half_rows() { bottom } else { top };
        if !region.is_valid_frame_address(address) {
            return None;
        }
        if let Some(next) = region.next_frame_address(address) {
            return Some(next);
        }

        if !address.is_bottom_half_rows() {
            if let Some(next) = bottom.first_frame_address(block_type, true) {
                return Some(next);
            }
        }

        [BlockType::BlockRam, BlockType::CfgClb]
            .into_iter()
            .filter(|&candidate| block_type < candidate)
            .find_map(|candidate| {
                top.first_frame_address(candidate, false)
                    .or_else(|| bottom.first_frame_address(candidate, true))
            })
    }

    /// The lowest frame address of the part.
    pub fn first_frame_address(&self) -> Option<A::FrameAddress> {
        match &self.layout {
            Layout::Regions { top, bottom } => BlockType::CONFIGURABLE.iter().find_map(|&block_type| {
                top.first_frame_address(block_type, false)
                    .or_else(|| bottom.first_frame_address(block_type, true))
            }),
            Layout::Ranges(ranges) => ranges.first().map(|r| A::FrameAddress::from(r.start)),
        }
    }

    /// Walks the part from its first frame using
    /// [`next_frame_address`](Self::next_frame_address).
    pub fn frame_addresses(&self) -> FrameAddresses<'_, A> {
        FrameAddresses {
            part: self,
            next: self.first_frame_address(),
        }
    }
}

/// Iterator over a part's frame addresses in configuration order.
#[derive(Debug, Clone)]
pub struct FrameAddresses<'p, A: Architecture> {
    part: &'p Part<A>,
    next: Option<A::FrameAddress>,
}

impl<A: Architecture> Iterator for FrameAddresses<'_, A> {
    type Item = A::FrameAddress;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.part.next_frame_address(current);
        Some(current)
    }
}

impl<A: Architecture> FusedIterator for FrameAddresses<'_, A> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arch::{Series7, Spartan6};
    use crate::frame_address::{Series7FrameAddress, Spartan6FrameAddress};

    fn s7(block_type: BlockType, bottom: bool, row: u32, column: u32, minor: u32) -> Series7FrameAddress {
        Series7FrameAddress::new(block_type, bottom, row, column, minor)
    }

    /// Two rows per half, two CLB columns per row, one BRAM column in row 0.
    fn small_part_addresses() -> Vec<Series7FrameAddress> {
        let mut addresses = Vec::new();
        for bottom in [false, true] {
            for row in 0..2 {
                for column in 0..2 {
                    for minor in 0..3 {
                        addresses.push(s7(BlockType::ClbIoClk, bottom, row, column, minor));
                    }
                }
            }
            for minor in 0..2 {
                addresses.push(s7(BlockType::BlockRam, bottom, 0, 0, minor));
            }
        }
        addresses
    }

    #[test]
    fn enumeration_visits_every_frame_once_in_order() {
        let addresses = small_part_addresses();
        let part = Part::<Series7>::from_frame_addresses(0x0362_D093, &addresses);
        let walked: Vec<_> = part.frame_addresses().collect();

        let mut expected = addresses.clone();
        expected.sort();
        assert_eq!(walked, expected);
        assert!(walked.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn next_of_valid_address_is_valid() {
        let addresses = small_part_addresses();
        let part = Part::<Series7>::from_frame_addresses(0, &addresses);
        for &address in &addresses {
            if let Some(next) = part.next_frame_address(address) {
                assert!(part.is_valid_frame_address(next), "{address} -> {next}");
            }
        }
    }

    #[test]
    fn top_half_continues_into_bottom_half() {
        let part = Part::<Series7>::from_frame_addresses(0, &small_part_addresses());
        assert_eq!(
            part.next_frame_address(s7(BlockType::ClbIoClk, false, 1, 1, 2)),
            Some(s7(BlockType::ClbIoClk, true, 0, 0, 0))
        );
        assert_eq!(
            part.next_frame_address(s7(BlockType::ClbIoClk, true, 1, 1, 2)),
            Some(s7(BlockType::BlockRam, false, 0, 0, 0))
        );
        assert_eq!(part.next_frame_address(s7(BlockType::BlockRam, true, 0, 0, 1)), None);
    }

    #[test]
    fn walk_reaches_buses_that_start_past_row_zero() {
        let addresses = [
            s7(BlockType::ClbIoClk, false, 0, 0, 0),
            s7(BlockType::ClbIoClk, false, 1, 4, 0),
            s7(BlockType::ClbIoClk, true, 1, 2, 0),
            s7(BlockType::BlockRam, false, 1, 3, 0),
            s7(BlockType::BlockRam, true, 2, 1, 0),
        ];
        let part = Part::<Series7>::from_frame_addresses(0, &addresses);
        assert_eq!(part.first_frame_address(), Some(addresses[0]));
        let walked: Vec<_> = part.frame_addresses().collect();
        assert_eq!(walked, addresses);
    }

    #[test]
    fn invalid_address_has_no_successor() {
        let part = Part::<Series7>::from_frame_addresses(0, &small_part_addresses());
        let bogus = s7(BlockType::ClbIoClk, false, 7, 0, 0);
        assert!(!part.is_valid_frame_address(bogus));
        assert_eq!(part.next_frame_address(bogus), None);
    }

    #[test]
    fn ranges_layout() {
        let part = Part::<Series7>::from_ranges(1, [0x100..0x102, 0x0..0x2, 0x50..0x50]);
        let walked: Vec<u32> = part.frame_addresses().map(u32::from).collect();
        assert_eq!(walked, vec![0x0, 0x1, 0x100, 0x101]);
        assert!(part.is_valid_frame_address(Series7FrameAddress::from(0x101)));
        assert!(!part.is_valid_frame_address(Series7FrameAddress::from(0x2)));
        assert!(part.top_region().is_none());
        assert_eq!(part.ranges().map(<[_]>::len), Some(2));
    }

    #[test]
    #[should_panic(expected = "overlap")]
    fn overlapping_ranges_rejected() {
        Part::<Series7>::from_ranges(0, [0..4, 2..6]);
    }

    #[test]
    fn spartan6_walks_block_types() {
        let mut addresses = Vec::new();
        for row in 0..2 {
            for minor in 0..4 {
                addresses.push(Spartan6FrameAddress::new(BlockType::ClbIoClk, false, row, 0, minor));
            }
        }
        addresses.push(Spartan6FrameAddress::new(BlockType::IOB, false, 0, 0, 0));
        let part = Part::<Spartan6>::from_frame_addresses(0x0400_1093, &addresses);
        let walked: Vec<_> = part.frame_addresses().collect();
        assert_eq!(walked.len(), addresses.len());
        assert_eq!(walked.last().map(|a| a.block_type()), Some(BlockType::IOB));
        assert!(part.bottom_region().is_some_and(GlobalClockRegion::is_empty));
    }
}
