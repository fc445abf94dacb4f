//! Reading, replaying and synthesizing Xilinx configuration bitstreams.
//!
//! The crate models the configuration port of four device families
//! (7-series, UltraScale, UltraScale+ and Spartan-6) as generic code over
//! an [`Architecture`] marker type. The pipeline runs in both directions:
//!
//! - **Reading:** [`BitstreamReader`] finds the sync word and lazily
//!   decodes [`ConfigurationPacket`]s; [`Configuration::init_with_packets`]
//!   replays them against a [`Part`] topology to recover frame contents.
//! - **Writing:** [`Frames`] holds frame data (from a `.frm` file or a
//!   replay), [`package::create_configuration_package`] wraps it in the
//!   family's boot and startup sequence, and [`BitstreamWriter`] encodes
//!   the packets to bytes, optionally behind a [`BitHeader`].

#![warn(missing_docs)]

pub mod arch;
pub mod bit_file;
pub mod configuration;
pub mod crc;
pub mod ecc;
pub mod frame_address;
pub mod frames;
pub mod options;
pub mod package;
pub mod packet;
pub mod packetizer;
pub mod reader;
pub mod register;
pub mod topology;
pub mod writer;

pub use arch::{Architecture, PacketFormat, Series7, Spartan6, UltraScale, UltraScalePlus};
pub use bit_file::{BitHeader, BitHeaderError};
pub use configuration::{Configuration, FrameMap};
pub use frame_address::{BlockType, FrameAddress, Series7FrameAddress, Spartan6FrameAddress};
pub use frames::{FrameFileError, Frames};
pub use options::ConfigurationOptions0;
pub use package::{FrameDataSegment, PackageOptions};
pub use packet::{ConfigurationPacket, HeaderType, Opcode};
pub use packetizer::ConfigurationPacketizer;
pub use reader::BitstreamReader;
pub use register::{Command, ConfigurationRegister, RegisterRole};
pub use topology::Part;
pub use writer::BitstreamWriter;

/// Splits a `.bit` header off `bytes` if one is present.
///
/// Raw bitstreams (no preamble) are returned unchanged with no header.
/// A damaged header is logged and the input returned unchanged, since the
/// reader locates the sync word on its own.
pub fn strip_bit_header(bytes: &[u8]) -> (Option<BitHeader>, &[u8]) {
    match BitHeader::parse(bytes) {
        Ok((header, data)) => (Some(header), data),
        Err(BitHeaderError::MissingPreamble) => (None, bytes),
        Err(err) => {
            log::warn!("ignoring unreadable .bit header: {err}");
            (None, bytes)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_passes_raw_streams_through() {
        let raw = [0xAA, 0x99, 0x55, 0x66];
        let (header, data) = strip_bit_header(&raw);
        assert!(header.is_none());
        assert_eq!(data, &raw);
    }

    #[test]
    fn strip_removes_header() {
        let wrapped = BitHeader {
            part_name: "7a35tcsg324".to_string(),
            ..BitHeader::default()
        }
        .write(&[0xAA, 0x99, 0x55, 0x66]);
        let (header, data) = strip_bit_header(&wrapped);
        assert_eq!(header.unwrap().part_name, "7a35tcsg324");
        assert_eq!(data, &[0xAA, 0x99, 0x55, 0x66]);
    }
}
