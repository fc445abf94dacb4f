//! Configuration types deserialized from `xbit.toml`.

use serde::Deserialize;
use std::path::PathBuf;
use xbit_bitstream::PackageOptions;
use xbit_common::ArchitectureKind;

/// The top-level tool configuration parsed from `xbit.toml`.
///
/// Every section is optional; an empty file yields [`ToolConfig::default`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    /// Target device selection.
    pub part: PartConfig,
    /// How written bitstreams are framed and prepared.
    pub output: OutputConfig,
    /// Adjustments to the generated packet stream.
    pub options: PackageOptions,
}

/// Which device the tools operate on.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PartConfig {
    /// Configuration-logic family.
    pub architecture: Option<ArchitectureKind>,
    /// Path to the part geometry JSON file.
    pub geometry: Option<PathBuf>,
}

/// Settings for written bitstreams.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Prepend the `.bit` TLV header.
    pub header: bool,
    /// Design name recorded in the header.
    pub design_name: String,
    /// Part name recorded in the header.
    pub part_name: String,
    /// Date recorded in the header.
    pub date: String,
    /// Time recorded in the header.
    pub time: String,
    /// Recompute frame ECC before packing.
    pub update_ecc: bool,
    /// Zero-fill every valid address the input does not cover.
    pub fill_missing_frames: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            header: true,
            design_name: "design".to_string(),
            part_name: String::new(),
            date: String::new(),
            time: String::new(),
            update_ecc: true,
            fill_missing_frames: true,
        }
    }
}
