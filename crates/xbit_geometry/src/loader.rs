//! Reading and writing geometry files.

use crate::error::GeometryError;
use crate::model::PartGeometry;
use std::path::Path;
use xbit_bitstream::{Architecture, Part};

/// Parses geometry JSON from a string.
pub fn parse_geometry(json: &str) -> Result<PartGeometry, GeometryError> {
    Ok(serde_json::from_str(json)?)
}

/// Reads a geometry file.
pub fn load_geometry(path: &Path) -> Result<PartGeometry, GeometryError> {
    let content = std::fs::read_to_string(path)?;
    let geometry = parse_geometry(&content)?;
    log::info!(
        "loaded {} geometry {} from {}",
        geometry.architecture,
        geometry.idcode,
        path.display()
    );
    Ok(geometry)
}

/// Reads a geometry file and builds the topology it describes.
///
/// # Errors
///
/// Besides IO and JSON failures, returns
/// [`GeometryError::ArchitectureMismatch`] when the file names a family
/// other than `A`.
pub fn load_part<A: Architecture>(path: &Path) -> Result<Part<A>, GeometryError> {
    let part = load_geometry(path)?.to_part::<A>()?;
    log::debug!("part {:#010x} has {} frames", part.idcode(), part.frame_addresses().count());
    Ok(part)
}

/// Writes a geometry file as pretty-printed JSON.
pub fn save_geometry(geometry: &PartGeometry, path: &Path) -> Result<(), GeometryError> {
    let json = serde_json::to_string_pretty(geometry)?;
    std::fs::write(path, json)?;
    Ok(())
}
