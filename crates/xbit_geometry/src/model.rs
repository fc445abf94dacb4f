//! Serializable part geometry and its conversion to and from [`Part`].

use crate::error::GeometryError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::Range;
use xbit_bitstream::topology::{ConfigurationBus, ConfigurationColumn, GlobalClockRegion, Row};
use xbit_bitstream::{Architecture, BlockType, Part};
use xbit_common::ArchitectureKind;

/// The top-level contents of a geometry file.
///
/// Exactly one of `global_clock_regions` and `ranges` describes the
/// address space. Hex values are stored as strings (`"0x0362d093"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartGeometry {
    /// Device IDCODE as a hex string.
    pub idcode: String,
    /// Configuration-logic family.
    pub architecture: ArchitectureKind,
    /// Region/row/bus/column tree.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_clock_regions: Option<RegionGeometry>,
    /// Flat half-open address ranges.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ranges: Vec<RangeGeometry>,
}

/// Rows above and below the device center line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionGeometry {
    /// Top-half rows.
    #[serde(default)]
    pub top: Vec<RowGeometry>,
    /// Bottom-half rows.
    #[serde(default)]
    pub bottom: Vec<RowGeometry>,
}

/// One row of a region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowGeometry {
    /// Row number within the half.
    pub row: u32,
    /// Buses present in the row.
    pub buses: Vec<BusGeometry>,
}

/// One bus of a row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusGeometry {
    /// Block type addressed by the bus.
    pub block_type: BlockType,
    /// Columns present on the bus.
    pub columns: Vec<ColumnGeometry>,
}

/// One column of a bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnGeometry {
    /// Column (major) number.
    pub column: u32,
    /// Number of minor frames.
    pub frame_count: u32,
}

/// A half-open `[begin, end)` range of raw frame addresses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeGeometry {
    /// First address in the range, as hex.
    pub begin: String,
    /// One past the last address, as hex.
    pub end: String,
}

impl RangeGeometry {
    fn to_range(&self) -> Result<Range<u32>, GeometryError> {
        let begin = parse_hex_field("ranges.begin", &self.begin)?;
        let end = parse_hex_field("ranges.end", &self.end)?;
        if begin > end {
            return Err(GeometryError::InvalidLayout(format!(
                "range {} ends before it begins",
                self.begin
            )));
        }
        Ok(begin..end)
    }
}

impl From<&Range<u32>> for RangeGeometry {
    fn from(range: &Range<u32>) -> Self {
        Self {
            begin: format!("{:#010x}", range.start),
            end: format!("{:#010x}", range.end),
        }
    }
}

impl PartGeometry {
    /// Parses the IDCODE field.
    pub fn idcode(&self) -> Result<u32, GeometryError> {
        parse_hex_field("idcode", &self.idcode)
    }

    /// Builds the topology described by this geometry.
    ///
    /// # Errors
    ///
    /// Fails when the family differs from `A`, when a hex field is
    /// malformed, when no addresses are described, or when the layout has
    /// duplicate, empty or overlapping entries.
    pub fn to_part<A: Architecture>(&self) -> Result<Part<A>, GeometryError> {
        if self.architecture != A::KIND {
            return Err(GeometryError::ArchitectureMismatch {
                expected: A::KIND,
                found: self.architecture,
            });
        }
        let idcode = self.idcode()?;

        match (&self.global_clock_regions, self.ranges.is_empty()) {
            (Some(_), false) => Err(GeometryError::InvalidLayout(
                "both global_clock_regions and ranges are present".to_string(),
            )),
            (Some(regions), true) => {
                if A::KIND == ArchitectureKind::Spartan6 && !regions.bottom.is_empty() {
                    return Err(GeometryError::InvalidLayout(
                        "spartan6 frame addresses have no bottom half".to_string(),
                    ));
                }
                let top = build_region(&regions.top)?;
                let bottom = build_region(&regions.bottom)?;
                if top.is_empty() && bottom.is_empty() {
                    return Err(GeometryError::Empty);
                }
                Ok(Part::new(idcode, top, bottom))
            }
            (None, false) => {
                let mut ranges = self
                    .ranges
                    .iter()
                    .map(RangeGeometry::to_range)
                    .collect::<Result<Vec<_>, _>>()?;
                ranges.sort_by_key(|r| r.start);
                if let Some(pair) = ranges.windows(2).find(|pair| pair[0].end > pair[1].start) {
                    return Err(GeometryError::InvalidLayout(format!(
                        "ranges starting at {:#010x} and {:#010x} overlap",
                        pair[0].start, pair[1].start
                    )));
                }
                Ok(Part::from_ranges(idcode, ranges))
            }
            (None, true) => Err(GeometryError::Empty),
        }
    }

    /// Describes an existing topology.
    pub fn from_part<A: Architecture>(part: &Part<A>) -> Self {
        let (global_clock_regions, ranges) = match part.ranges() {
            Some(ranges) => (None, ranges.iter().map(RangeGeometry::from).collect()),
            None => (
                Some(RegionGeometry {
                    top: part.top_region().map(describe_region).unwrap_or_default(),
                    bottom: part.bottom_region().map(describe_region).unwrap_or_default(),
                }),
                Vec::new(),
            ),
        };
        Self {
            idcode: format!("{:#010x}", part.idcode()),
            architecture: A::KIND,
            global_clock_regions,
            ranges,
        }
    }
}

fn parse_hex_field(field: &'static str, text: &str) -> Result<u32, GeometryError> {
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    u32::from_str_radix(digits, 16).map_err(|_| GeometryError::InvalidHex {
        field,
        text: text.to_string(),
    })
}

fn build_region(rows: &[RowGeometry]) -> Result<GlobalClockRegion, GeometryError> {
    let mut region = BTreeMap::new();
    for row in rows {
        let mut buses = BTreeMap::new();
        for bus in &row.buses {
            let mut columns = BTreeMap::new();
            for column in &bus.columns {
                if column.frame_count == 0 {
                    return Err(GeometryError::InvalidLayout(format!(
                        "row {} {} column {} has no frames",
                        row.row, bus.block_type, column.column
                    )));
                }
                if columns
                    .insert(column.column, ConfigurationColumn::new(column.frame_count))
                    .is_some()
                {
                    return Err(GeometryError::InvalidLayout(format!(
                        "row {} {} lists column {} twice",
                        row.row, bus.block_type, column.column
                    )));
                }
            }
            if columns.is_empty() {
                return Err(GeometryError::InvalidLayout(format!(
                    "row {} {} has no columns",
                    row.row, bus.block_type
                )));
            }
            if buses
                .insert(bus.block_type, ConfigurationBus::new(columns))
                .is_some()
            {
                return Err(GeometryError::InvalidLayout(format!(
                    "row {} lists {} twice",
                    row.row, bus.block_type
                )));
            }
        }
        if buses.is_empty() {
            return Err(GeometryError::InvalidLayout(format!("row {} has no buses", row.row)));
        }
        if region.insert(row.row, Row::new(buses)).is_some() {
            return Err(GeometryError::InvalidLayout(format!("row {} listed twice", row.row)));
        }
    }
    Ok(GlobalClockRegion::new(region))
}

fn describe_region(region: &GlobalClockRegion) -> Vec<RowGeometry> {
    region
        .rows()
        .map(|(number, row)| RowGeometry {
            row: number,
            buses: row
                .buses()
                .map(|(block_type, bus)| BusGeometry {
                    block_type,
                    columns: bus
                        .columns()
                        .map(|(column, frames)| ColumnGeometry {
                            column,
                            frame_count: frames.frame_count(),
                        })
                        .collect(),
                })
                .collect(),
        })
        .collect()
}
