//! Errors raised while reading `xbit.toml`.

use std::path::PathBuf;
use xbit_common::ArchitectureKind;

/// Why an `xbit.toml` could not be turned into a [`crate::ToolConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("cannot read {}: {source}", path.display())]
    Read {
        /// The file that was requested.
        path: PathBuf,
        /// The underlying failure.
        source: std::io::Error,
    },

    /// The content is not valid TOML for the schema, including unknown
    /// family names.
    #[error("malformed xbit.toml: {0}")]
    Toml(#[from] toml::de::Error),

    /// `part.geometry` is present but empty.
    #[error("part.geometry is set to an empty path")]
    EmptyGeometryPath,

    /// A `.bit` header was requested without a design name to record.
    #[error("output.header needs a non-empty output.design_name")]
    MissingDesignName,

    /// The COR0 CCLK frequency field is six bits wide.
    #[error("options.cor0.cclk_frequency {0} does not fit in 6 bits")]
    CclkFrequencyOutOfRange(u32),

    /// The selected family has no COR0 register.
    #[error("{0} has no COR0 register")]
    Cor0Unsupported(ArchitectureKind),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_error_names_the_file() {
        let err = ConfigError::Read {
            path: PathBuf::from("board/xbit.toml"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
        };
        assert_eq!(format!("{err}"), "cannot read board/xbit.toml: file not found");
    }

    #[test]
    fn display_cor0_errors() {
        assert_eq!(
            ConfigError::CclkFrequencyOutOfRange(64).to_string(),
            "options.cor0.cclk_frequency 64 does not fit in 6 bits"
        );
        assert!(ConfigError::Cor0Unsupported(ArchitectureKind::Spartan6)
            .to_string()
            .ends_with("has no COR0 register"));
    }
}
