//! Device frame-address topology.
//!
//! A part is a tree: global clock regions (top and bottom half) contain
//! rows, rows contain one bus per block type, and buses contain columns
//! that each hold a fixed number of minor frames. The tree answers two
//! questions during replay and synthesis: is a frame address valid, and
//! which address does the configuration logic advance to next.

mod bus;
mod column;
mod part;
mod region;
mod row;

pub use bus::ConfigurationBus;
pub use column::ConfigurationColumn;
pub use part::{FrameAddresses, Part};
pub use region::GlobalClockRegion;
pub use row::Row;

/// Sorts `addresses` by `key` and splits them into runs sharing a key.
fn group_by_field<F: Copy, K: Ord + Copy>(addresses: &[F], key: impl Fn(F) -> K) -> Vec<(K, Vec<F>)> {
    let mut sorted = addresses.to_vec();
    sorted.sort_by_key(|&address| key(address));

    let mut groups = Vec::new();
    let mut rest = sorted.as_slice();
    while let Some(&first) = rest.first() {
        let value = key(first);
        let end = rest.partition_point(|&address| key(address) <= value);
        groups.push((value, rest[..end].to_vec()));
        rest = &rest[end..];
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_runs_by_key() {
        let groups = group_by_field(&[5u32, 12, 3, 14, 7], |v| v / 10);
        assert_eq!(groups, vec![(0, vec![5, 3, 7]), (1, vec![12, 14])]);
    }

    #[test]
    fn empty_input_has_no_groups() {
        assert!(group_by_field(&[] as &[u32], |v| v).is_empty());
    }
}
