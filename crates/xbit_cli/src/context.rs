//! Shared plumbing for the subcommands: configuration lookup, flag/config
//! precedence, and family dispatch.

use std::error::Error;
use std::path::{Path, PathBuf};

use xbit_common::ArchitectureKind;
use xbit_config::ToolConfig;

use crate::GlobalArgs;

/// Calls a function generic over [`xbit_bitstream::Architecture`] with the
/// type matching an [`ArchitectureKind`] value.
macro_rules! with_architecture {
    ($kind:expr, $f:ident ( $($arg:expr),* $(,)? )) => {
        match $kind {
            xbit_common::ArchitectureKind::Series7 => $f::<xbit_bitstream::Series7>($($arg),*),
            xbit_common::ArchitectureKind::UltraScale => $f::<xbit_bitstream::UltraScale>($($arg),*),
            xbit_common::ArchitectureKind::UltraScalePlus => {
                $f::<xbit_bitstream::UltraScalePlus>($($arg),*)
            }
            xbit_common::ArchitectureKind::Spartan6 => $f::<xbit_bitstream::Spartan6>($($arg),*),
        }
    };
}
pub(crate) use with_architecture;

/// Loads `--config`, else `./xbit.toml`, else the defaults.
pub fn load_tool_config(global: &GlobalArgs) -> Result<ToolConfig, Box<dyn Error>> {
    let cwd = std::env::current_dir()?;
    let config = xbit_config::discover_config(global.config.as_deref(), &cwd)?;
    Ok(config)
}

/// The family from the flag, falling back to the configuration.
pub fn resolve_architecture(
    flag: Option<ArchitectureKind>,
    config: &ToolConfig,
) -> Result<ArchitectureKind, Box<dyn Error>> {
    flag.or(config.part.architecture)
        .ok_or_else(|| "no device family given: pass --arch or set part.architecture".into())
}

/// The geometry file from the flag, falling back to the configuration.
pub fn resolve_geometry(flag: Option<&Path>, config: &ToolConfig) -> Result<PathBuf, Box<dyn Error>> {
    flag.map(Path::to_path_buf)
        .or_else(|| config.part.geometry.clone())
        .ok_or_else(|| "no part geometry given: pass --geometry or set part.geometry".into())
}
