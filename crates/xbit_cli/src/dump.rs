//! `xbit dump`: list the packets of a bitstream.

use std::error::Error;
use std::io::Write;

use xbit_bitstream::crc::Crc;
use xbit_bitstream::{strip_bit_header, Architecture, BitstreamReader};

use crate::context::{load_tool_config, resolve_architecture, with_architecture};
use crate::{DumpArgs, GlobalArgs};

/// Runs the `xbit dump` command.
pub fn run(args: &DumpArgs, global: &GlobalArgs) -> Result<i32, Box<dyn Error>> {
    let config = load_tool_config(global)?;
    let kind = resolve_architecture(args.arch, &config)?;
    let bytes = std::fs::read(&args.bitstream)?;
    let (header, data) = strip_bit_header(&bytes);

    if let (Some(header), false) = (&header, global.quiet) {
        eprintln!(
            "   Design {} for {} ({} {})",
            header.design_name, header.part_name, header.date, header.time
        );
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let (count, crc) = with_architecture!(kind, dump_packets(data, &mut out))?;
    out.flush()?;

    if !global.quiet {
        eprintln!("   {count} packets, running CRC {crc:#010x}");
    }
    Ok(0)
}

/// Writes one line per packet and returns the packet count and the CRC
/// accumulated since the last reset.
fn dump_packets<A: Architecture>(data: &[u8], out: &mut impl Write) -> Result<(usize, u32), Box<dyn Error>> {
    let reader = BitstreamReader::<A>::init_with_bytes(data).ok_or("no sync word found")?;
    let mut crc = Crc::new();
    let mut count = 0;
    for packet in reader.packets() {
        writeln!(out, "{packet}")?;
        crc.update_packet(&packet);
        count += 1;
    }
    Ok((count, crc.value()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use xbit_bitstream::register::Series7Register;
    use xbit_bitstream::{BitstreamWriter, Command, ConfigurationPacket, Series7};

    #[test]
    fn one_line_per_packet() {
        let packets = vec![
            ConfigurationPacket::<Series7>::write(Series7Register::Idcode, vec![0x0362_D093]),
            ConfigurationPacket::command(Command::Start),
            ConfigurationPacket::nop(),
        ];
        let bytes = BitstreamWriter::new(packets).to_bytes();
        let mut out = Vec::new();
        let (count, crc) = dump_packets::<Series7>(&bytes, &mut out).unwrap();
        assert_eq!(count, 3);
        assert_eq!(crc, 0x044C_CD88);
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 3);
        assert!(text.lines().next().unwrap().contains("IDCODE"));
    }

    #[test]
    fn missing_sync_word() {
        let mut out = Vec::new();
        let err = dump_packets::<Series7>(&[0u8; 16], &mut out).unwrap_err();
        assert_eq!(err.to_string(), "no sync word found");
    }
}
