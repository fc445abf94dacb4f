use super::bus::ConfigurationBus;
use super::group_by_field;
use crate::frame_address::{BlockType, FrameAddress};
use std::collections::BTreeMap;

/// One row of a global clock region: a bus per block type.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Row {
    buses: BTreeMap<BlockType, ConfigurationBus>,
}

impl Row {
    /// Builds a row from explicit buses.
    pub fn new(buses: BTreeMap<BlockType, ConfigurationBus>) -> Self {
        Self { buses }
    }

    /// Builds a row from frame addresses sharing a half and row number.
    ///
    /// # Panics
    ///
    /// Panics if the addresses disagree on half or row.
    pub fn from_frame_addresses<F: FrameAddress>(addresses: &[F]) -> Self {
        if let Some(first) = addresses.first() {
            assert!(
                addresses.iter().all(|a| a.is_bottom_half_rows() == first.is_bottom_half_rows()
                    && a.row() == first.row()),
                "frame addresses span multiple rows"
            );
        }
        let buses = group_by_field(addresses, |a| a.block_type())
            .into_iter()
            .map(|(block_type, group)| (block_type, ConfigurationBus::from_frame_addresses(&group)))
            .collect();
        Self { buses }
    }

    /// Buses keyed by block type.
    pub fn buses(&self) -> impl Iterator<Item = (BlockType, &ConfigurationBus)> {
        self.buses.iter().map(|(&k, v)| (k, v))
    }

    /// The bus of one block type.
    pub fn bus(&self, block_type: BlockType) -> Option<&ConfigurationBus> {
        self.buses.get(&block_type)
    }

    /// Whether `address` names a frame in this row.
    pub fn is_valid_frame_address<F: FrameAddress>(&self, address: F) -> bool {
        self.bus(address.block_type())
            .is_some_and(|bus| bus.is_valid_frame_address(address))
    }

    /// The next frame on the same bus, if any.
    pub fn next_frame_address<F: FrameAddress>(&self, address: F) -> Option<F> {
        self.bus(address.block_type())?.next_frame_address(address)
    }
}
