use super::column::ConfigurationColumn;
use super::group_by_field;
use crate::frame_address::FrameAddress;
use std::collections::BTreeMap;
use std::ops::Bound;

/// All columns of one block type within a row.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConfigurationBus {
    columns: BTreeMap<u32, ConfigurationColumn>,
}

impl ConfigurationBus {
    /// Builds a bus from explicit columns.
    pub fn new(columns: BTreeMap<u32, ConfigurationColumn>) -> Self {
        Self { columns }
    }

    /// Builds a bus from frame addresses sharing a block type, half and row.
    ///
    /// # Panics
    ///
    /// Panics if the addresses disagree on block type, half or row.
    pub fn from_frame_addresses<F: FrameAddress>(addresses: &[F]) -> Self {
        if let Some(first) = addresses.first() {
            assert!(
                addresses.iter().all(|a| a.block_type() == first.block_type()
                    && a.is_bottom_half_rows() == first.is_bottom_half_rows()
                    && a.row() == first.row()),
                "frame addresses span multiple buses"
            );
        }
        let columns = group_by_field(addresses, |a| a.column())
            .into_iter()
            .map(|(column, group)| (column, ConfigurationColumn::from_frame_addresses(&group)))
            .collect();
        Self { columns }
    }

    /// Columns keyed by major address.
    pub fn columns(&self) -> impl Iterator<Item = (u32, &ConfigurationColumn)> {
        self.columns.iter().map(|(&k, v)| (k, v))
    }

    /// Whether the column and minor of `address` exist in this bus.
    pub fn is_valid_frame_address<F: FrameAddress>(&self, address: F) -> bool {
        self.columns
            .get(&address.column())
            .is_some_and(|column| column.is_valid_frame_address(address))
    }

    /// The next frame in this bus: the next minor of the same column, or
    /// minor 0 of the next populated column.
    pub fn next_frame_address<F: FrameAddress>(&self, address: F) -> Option<F> {
        let column = self.columns.get(&address.column())?;
        if let Some(next) = column.next_frame_address(address) {
            return Some(next);
        }
        let (&next_column, _) = self
            .columns
            .range((Bound::Excluded(address.column()), Bound::Unbounded))
            .next()?;
        let next = F::new(
            address.block_type(),
            address.is_bottom_half_rows(),
            address.row(),
            next_column,
            0,
        );
        self.is_valid_frame_address(next).then_some(next)
    }

    /// Major address of the lowest column.
    pub fn first_column(&self) -> Option<u32> {
        self.columns.keys().next().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame_address::{BlockType, Series7FrameAddress};

    fn addr(column: u32, minor: u32) -> Series7FrameAddress {
        Series7FrameAddress::new(BlockType::ClbIoClk, false, 0, column, minor)
    }

    fn bus() -> ConfigurationBus {
        ConfigurationBus::from_frame_addresses(&[addr(0, 0), addr(0, 1), addr(2, 0), addr(2, 1), addr(2, 2)])
    }

    #[test]
    fn advances_within_and_across_columns() {
        let bus = bus();
        assert_eq!(bus.next_frame_address(addr(0, 0)), Some(addr(0, 1)));
        assert_eq!(bus.next_frame_address(addr(0, 1)), Some(addr(2, 0)));
        assert_eq!(bus.next_frame_address(addr(2, 2)), None);
    }

    #[test]
    fn unknown_column_has_no_successor() {
        assert_eq!(bus().next_frame_address(addr(1, 0)), None);
        assert!(!bus().is_valid_frame_address(addr(1, 0)));
    }

    #[test]
    fn columns_are_sorted() {
        let bus = bus();
        let counts: Vec<_> = bus.columns().map(|(c, col)| (c, col.frame_count())).collect();
        assert_eq!(counts, vec![(0, 2), (2, 3)]);
        assert_eq!(bus.first_column(), Some(0));
    }
}
