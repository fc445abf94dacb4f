//! `xbit pack`: build a bitstream from a frame file.

use std::error::Error;
use std::ops::RangeInclusive;
use std::path::Path;

use xbit_bitstream::package::{create_configuration_package, create_partial_package};
use xbit_bitstream::{Architecture, BitHeader, BitstreamWriter, FrameAddress, Frames};
use xbit_config::ToolConfig;
use xbit_geometry::load_part;

use crate::context::{load_tool_config, resolve_architecture, resolve_geometry, with_architecture};
use crate::{GlobalArgs, PackArgs};

/// Raw frame-address windows selected for a partial bitstream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct PartialSelection {
    windows: Vec<RangeInclusive<u32>>,
}

impl PartialSelection {
    fn from_args(args: &PackArgs) -> Result<Self, Box<dyn Error>> {
        let mut windows = Vec::new();
        for (name, start, end) in [
            ("clb", args.clb_start, args.clb_end),
            ("bram", args.bram_start, args.bram_end),
        ] {
            match (start, end) {
                (Some(start), Some(end)) if start <= end => windows.push(start..=end),
                (Some(start), Some(end)) => {
                    return Err(format!("--{name}-start {start:#010x} is after --{name}-end {end:#010x}").into())
                }
                (None, None) => {}
                _ => return Err(format!("--{name}-start and --{name}-end must be given together").into()),
            }
        }
        if windows.is_empty() {
            return Err("--partial needs --clb-start/--clb-end or --bram-start/--bram-end".into());
        }
        Ok(Self { windows })
    }

    fn contains(&self, raw: u32) -> bool {
        self.windows.iter().any(|window| window.contains(&raw))
    }
}

/// Runs the `xbit pack` command.
pub fn run(args: &PackArgs, global: &GlobalArgs) -> Result<i32, Box<dyn Error>> {
    let config = load_tool_config(global)?;
    let kind = resolve_architecture(args.arch, &config)?;
    let geometry = resolve_geometry(args.geometry.as_deref(), &config)?;
    let selection = if args.partial {
        Some(PartialSelection::from_args(args)?)
    } else {
        None
    };

    let stream = with_architecture!(
        kind,
        build_bitstream(&args.frames, &geometry, &config, selection.as_ref())
    )?;

    let bytes = if config.output.header && !args.raw {
        let header = BitHeader {
            design_name: args
                .design_name
                .clone()
                .unwrap_or_else(|| config.output.design_name.clone()),
            part_name: config.output.part_name.clone(),
            date: config.output.date.clone(),
            time: config.output.time.clone(),
        };
        header.write(&stream)
    } else {
        stream
    };
    std::fs::write(&args.output, &bytes)?;

    if !global.quiet {
        eprintln!("   Wrote {} bytes to {}", bytes.len(), args.output.display());
    }
    Ok(0)
}

/// Reads the frame file, prepares the frames per the configuration and
/// encodes a full or partial package.
pub(crate) fn build_bitstream<A: Architecture>(
    frm: &Path,
    geometry: &Path,
    config: &ToolConfig,
    selection: Option<&PartialSelection>,
) -> Result<Vec<u8>, Box<dyn Error>> {
    let part = load_part::<A>(geometry)?;
    let mut frames = Frames::<A>::read_frm_file(frm)?;
    log::info!("read {} frames from {}", frames.len(), frm.display());

    if config.output.fill_missing_frames {
        let added = frames.add_missing_frames(&part);
        log::debug!("zero-filled {added} missing frames");
    }
    if config.output.update_ecc {
        frames.update_ecc();
    }

    let bytes = match selection {
        None => {
            let payload = frames.assemble_payload(&part);
            let packets = create_configuration_package(&part, &payload, &config.options);
            BitstreamWriter::new(packets).to_bytes()
        }
        Some(selection) => {
            frames.retain(|address| selection.contains(address.raw()));
            if frames.is_empty() {
                return Err("no frames fall inside the partial address ranges".into());
            }
            let runs = frames.segments(&part);
            log::debug!("partial bitstream has {} segments", runs.len());
            let segments = Frames::<A>::as_package_segments(&runs);
            let packets = create_partial_package(&part, &segments, &config.options);
            BitstreamWriter::new(packets).to_bytes()
        }
    };
    Ok(bytes)
}
