//! `xbit frames`: decode a bitstream into a frame file.

use std::error::Error;
use std::path::Path;

use xbit_bitstream::{strip_bit_header, Architecture, BitstreamReader, Configuration, Frames};
use xbit_geometry::load_part;

use crate::context::{load_tool_config, resolve_architecture, resolve_geometry, with_architecture};
use crate::{FramesArgs, GlobalArgs};

/// Runs the `xbit frames` command.
pub fn run(args: &FramesArgs, global: &GlobalArgs) -> Result<i32, Box<dyn Error>> {
    let config = load_tool_config(global)?;
    let kind = resolve_architecture(args.arch, &config)?;
    let geometry = resolve_geometry(args.geometry.as_deref(), &config)?;
    let bytes = std::fs::read(&args.bitstream)?;
    let (_, data) = strip_bit_header(&bytes);

    let (count, text) = with_architecture!(kind, decode(data, &geometry))?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, &text)?;
            if !global.quiet {
                eprintln!("   Decoded {count} frames to {}", path.display());
            }
        }
        None => {
            use std::io::Write;
            std::io::stdout().lock().write_all(&text)?;
        }
    }
    Ok(0)
}

/// Replays the bitstream against the part and renders the frames as
/// `.frm` text.
pub(crate) fn decode<A: Architecture>(data: &[u8], geometry: &Path) -> Result<(usize, Vec<u8>), Box<dyn Error>> {
    let part = load_part::<A>(geometry)?;
    let reader = BitstreamReader::<A>::init_with_bytes(data).ok_or("no sync word found")?;
    let configuration = Configuration::init_with_packets(&part, reader.packets())
        .ok_or("bitstream does not match the specified part")?;
    let frames = Frames::from_configuration(&configuration);

    let mut text = Vec::new();
    frames.write_frm(&mut text)?;
    Ok((frames.len(), text))
}
