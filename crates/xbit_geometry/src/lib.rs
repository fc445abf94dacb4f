//! Part geometry files for xbit.
//!
//! A geometry file is a JSON document naming a device's IDCODE and family
//! and describing its frame-address space, either as a tree of global clock
//! regions, rows, buses and columns or as a flat list of `[begin, end)`
//! address ranges. Loading one yields the [`Part`](xbit_bitstream::Part)
//! that bitstream replay and packetizing walk.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod model;

pub use error::GeometryError;
pub use loader::{load_geometry, load_part, parse_geometry, save_geometry};
pub use model::{
    BusGeometry, ColumnGeometry, PartGeometry, RangeGeometry, RegionGeometry, RowGeometry,
};
