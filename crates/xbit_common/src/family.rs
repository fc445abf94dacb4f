//! Device family identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The configuration-logic family of a Xilinx device.
///
/// Each family has its own packet layout, register map, frame size and
/// boot sequence. UltraScale and UltraScale+ reuse the 7-series register
/// map and frame addressing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArchitectureKind {
    /// 7-series (Artix-7, Kintex-7, Virtex-7, Zynq-7000).
    Series7,
    /// UltraScale (Kintex/Virtex UltraScale).
    #[serde(rename = "ultrascale")]
    UltraScale,
    /// UltraScale+ (Kintex/Virtex UltraScale+, Zynq MPSoC).
    #[serde(rename = "ultrascale_plus")]
    UltraScalePlus,
    /// Spartan-6, the 16-bit word family.
    Spartan6,
}

impl ArchitectureKind {
    /// All supported families.
    pub const ALL: [ArchitectureKind; 4] = [
        Self::Series7,
        Self::UltraScale,
        Self::UltraScalePlus,
        Self::Spartan6,
    ];

    /// Returns the canonical lowercase identifier (e.g. `"series7"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Series7 => "series7",
            Self::UltraScale => "ultrascale",
            Self::UltraScalePlus => "ultrascale_plus",
            Self::Spartan6 => "spartan6",
        }
    }
}

impl fmt::Display for ArchitectureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a family name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown architecture '{0}' (expected series7, ultrascale, ultrascale_plus or spartan6)")]
pub struct ParseArchitectureError(pub String);

impl FromStr for ArchitectureKind {
    type Err = ParseArchitectureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "series7" | "7series" | "xc7" => Ok(Self::Series7),
            "ultrascale" | "us" => Ok(Self::UltraScale),
            "ultrascale_plus" | "ultrascaleplus" | "us+" | "usp" => Ok(Self::UltraScalePlus),
            "spartan6" | "xc6s" => Ok(Self::Spartan6),
            _ => Err(ParseArchitectureError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_roundtrips_through_from_str() {
        for kind in ArchitectureKind::ALL {
            assert_eq!(kind.to_string().parse::<ArchitectureKind>(), Ok(kind));
        }
    }

    #[test]
    fn aliases() {
        assert_eq!("UltraScale-Plus".parse(), Ok(ArchitectureKind::UltraScalePlus));
        assert_eq!("7series".parse(), Ok(ArchitectureKind::Series7));
        assert_eq!("xc6s".parse(), Ok(ArchitectureKind::Spartan6));
    }

    #[test]
    fn unknown_name() {
        let err = "virtex2".parse::<ArchitectureKind>().unwrap_err();
        assert!(err.to_string().contains("virtex2"));
    }

    #[test]
    fn serde_names() {
        let json = serde_json::to_string(&ArchitectureKind::UltraScalePlus).unwrap();
        assert_eq!(json, "\"ultrascale_plus\"");
        let back: ArchitectureKind = serde_json::from_str("\"series7\"").unwrap();
        assert_eq!(back, ArchitectureKind::Series7);
    }
}
