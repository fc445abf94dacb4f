use super::group_by_field;
use super::row::Row;
use crate::frame_address::{BlockType, FrameAddress};
use std::collections::BTreeMap;
use std::ops::Bound;

/// One half of the device: the rows above or below the center line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GlobalClockRegion {
    rows: BTreeMap<u32, Row>,
}

impl GlobalClockRegion {
    /// Builds a region from explicit rows.
    pub fn new(rows: BTreeMap<u32, Row>) -> Self {
        Self { rows }
    }

    /// Builds a region from frame addresses sharing a half.
    ///
    /// # Panics
    ///
    /// Panics if the addresses disagree on half.
    pub fn from_frame_addresses<F: FrameAddress>(addresses: &[F]) -> Self {
        if let Some(first) = addresses.first() {
            assert!(
                addresses
                    .iter()
                    .all(|a| a.is_bottom_half_rows() == first.is_bottom_half_rows()),
                "frame addresses span both halves"
            );
        }
        let rows = group_by_field(addresses, |a| a.row())
            .into_iter()
            .map(|(row, group)| (row, Row::from_frame_addresses(&group)))
            .collect();
        Self { rows }
    }

    /// Rows keyed by row number.
    pub fn rows(&self) -> impl Iterator<Item = (u32, &Row)> {
        self.rows.iter().map(|(&k, v)| (k, v))
    }

    /// Whether the region has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Whether `address` names a frame in this region.
    pub fn is_valid_frame_address<F: FrameAddress>(&self, address: F) -> bool {
        self.rows
            .get(&address.row())
            .is_some_and(|row| row.is_valid_frame_address(address))
    }

    /// The next frame within the row, or the first frame of the same block
    /// type in the next row that has that bus.
    pub fn next_frame_address<F: FrameAddress>(&self, address: F) -> Option<F> {
        let row = self.rows.get(&address.row())?;
        if let Some(next) = row.next_frame_address(address) {
            return Some(next);
        }
        let block_type = address.block_type();
        self.rows
            .range((Bound::Excluded(address.row()), Bound::Unbounded))
            .find_map(|(&row_number, row)| {
                let column = row.bus(block_type)?.first_column()?;
                let next = F::new(block_type, address.is_bottom_half_rows(), row_number, column, 0);
                self.is_valid_frame_address(next).then_some(next)
            })
    }

    /// The lowest frame of `block_type` in this region.
    pub fn first_frame_address<F: FrameAddress>(&self, block_type: BlockType, is_bottom: bool) -> Option<F> {
        self.rows.iter().find_map(|(&row_number, row)| {
            let column = row.bus(block_type)?.first_column()?;
            let address = F::new(block_type, is_bottom, row_number, column, 0);
            self.is_valid_frame_address(address).then_some(address)
        })
    }
}
