//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::ToolConfig;
use std::path::Path;
use xbit_common::ArchitectureKind;

/// File name looked up in the working directory when no path is given.
pub const CONFIG_FILE_NAME: &str = "xbit.toml";

/// Loads and validates the configuration at `path`.
pub fn load_config(path: &Path) -> Result<ToolConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    load_config_from_str(&content)
}

/// Loads the explicitly requested configuration, or `xbit.toml` from
/// `dir` if present, or the defaults.
///
/// An explicit path that does not exist is an error; a missing default
/// file is not.
pub fn discover_config(explicit: Option<&Path>, dir: &Path) -> Result<ToolConfig, ConfigError> {
    if let Some(path) = explicit {
        return load_config(path);
    }
    let default_path = dir.join(CONFIG_FILE_NAME);
    if default_path.is_file() {
        load_config(&default_path)
    } else {
        Ok(ToolConfig::default())
    }
}

/// Parses and validates an `xbit.toml` configuration from a string.
pub fn load_config_from_str(content: &str) -> Result<ToolConfig, ConfigError> {
    let config: ToolConfig = toml::from_str(content)?;
    validate_config(&config)?;
    Ok(config)
}

/// Checks values the TOML schema cannot express.
fn validate_config(config: &ToolConfig) -> Result<(), ConfigError> {
    if config
        .part
        .geometry
        .as_ref()
        .is_some_and(|path| path.as_os_str().is_empty())
    {
        return Err(ConfigError::EmptyGeometryPath);
    }
    if config.output.header && config.output.design_name.is_empty() {
        return Err(ConfigError::MissingDesignName);
    }
    if let Some(cor0) = &config.options.cor0 {
        if cor0.cclk_frequency > 0x3F {
            return Err(ConfigError::CclkFrequencyOutOfRange(cor0.cclk_frequency));
        }
        if let Some(kind @ ArchitectureKind::Spartan6) = config.part.architecture {
            return Err(ConfigError::Cor0Unsupported(kind));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use xbit_bitstream::options::StartupCycle;
    use std::path::PathBuf;

    #[test]
    fn parse_full_config() {
        let toml = r#"
[part]
architecture = "series7"
geometry = "parts/xc7a50t.json"

[output]
header = true
design_name = "blinky"
part_name = "7a50tcsg324"
update_ecc = false

[options]
crc_check = true

[options.cor0]
done_cycle = "phase4"
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.part.architecture, Some(ArchitectureKind::Series7));
        assert_eq!(config.part.geometry, Some(PathBuf::from("parts/xc7a50t.json")));
        assert_eq!(config.output.design_name, "blinky");
        assert!(!config.output.update_ecc);
        assert!(config.output.fill_missing_frames);
        assert!(config.options.crc_check);
        let cor0 = config.options.cor0.unwrap();
        assert_eq!(cor0.done_cycle, StartupCycle::Phase4);
        assert!(cor0.done_pipeline);
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config, ToolConfig::default());
        assert!(config.output.header);
        assert_eq!(config.output.design_name, "design");
        assert!(config.options.cor0.is_none());
    }

    #[test]
    fn unknown_family_rejected() {
        let err = load_config_from_str("[part]\narchitecture = \"virtex2\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn empty_geometry_path() {
        let err = load_config_from_str("[part]\ngeometry = \"\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::EmptyGeometryPath));
    }

    #[test]
    fn header_needs_design_name() {
        let err = load_config_from_str("[output]\ndesign_name = \"\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::MissingDesignName));
        assert!(load_config_from_str("[output]\nheader = false\ndesign_name = \"\"\n").is_ok());
    }

    #[test]
    fn cor0_checks() {
        let wide = "[options.cor0]\ncclk_frequency = 64\n";
        assert!(matches!(
            load_config_from_str(wide).unwrap_err(),
            ConfigError::CclkFrequencyOutOfRange(64)
        ));
        let spartan6 = "[part]\narchitecture = \"spartan6\"\n[options.cor0]\n";
        assert!(matches!(
            load_config_from_str(spartan6).unwrap_err(),
            ConfigError::Cor0Unsupported(ArchitectureKind::Spartan6)
        ));
    }

    #[test]
    fn discover_prefers_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(discover_config(None, dir.path()).unwrap(), ToolConfig::default());

        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "[output]\ndesign_name = \"found\"\n").unwrap();
        assert_eq!(discover_config(None, dir.path()).unwrap().output.design_name, "found");

        let other = dir.path().join("other.toml");
        std::fs::write(&other, "[output]\ndesign_name = \"explicit\"\n").unwrap();
        let config = discover_config(Some(&other), dir.path()).unwrap();
        assert_eq!(config.output.design_name, "explicit");

        let missing = dir.path().join("missing.toml");
        assert!(matches!(
            discover_config(Some(&missing), dir.path()),
            Err(ConfigError::Read { path, .. }) if path == missing
        ));
    }
}
