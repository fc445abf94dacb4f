//! Error types for geometry loading.

use xbit_common::ArchitectureKind;

/// Errors that can occur when reading, writing or interpreting a geometry file.
#[derive(Debug, thiserror::Error)]
pub enum GeometryError {
    /// The geometry file could not be read or written.
    #[error("failed to access geometry file: {0}")]
    Io(#[from] std::io::Error),

    /// The JSON content could not be parsed or produced.
    #[error("invalid geometry JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A hex-encoded field did not hold a 32-bit hex number.
    #[error("invalid hex value '{text}' in field '{field}'")]
    InvalidHex {
        /// The field holding the value.
        field: &'static str,
        /// The offending text.
        text: String,
    },

    /// The file describes a different family than the one requested.
    #[error("geometry is for {found}, expected {expected}")]
    ArchitectureMismatch {
        /// The family the caller asked for.
        expected: ArchitectureKind,
        /// The family named in the file.
        found: ArchitectureKind,
    },

    /// Neither regions nor ranges are present.
    #[error("geometry describes no frame addresses")]
    Empty,

    /// The layout is structurally inconsistent.
    #[error("invalid geometry layout: {0}")]
    InvalidLayout(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_mismatch() {
        let err = GeometryError::ArchitectureMismatch {
            expected: ArchitectureKind::Series7,
            found: ArchitectureKind::Spartan6,
        };
        assert_eq!(err.to_string(), "geometry is for spartan6, expected series7");
    }

    #[test]
    fn display_invalid_hex() {
        let err = GeometryError::InvalidHex {
            field: "idcode",
            text: "0xZZ".to_string(),
        };
        assert_eq!(err.to_string(), "invalid hex value '0xZZ' in field 'idcode'");
    }
}
