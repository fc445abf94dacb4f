//! Byte-level decoding scenarios for the reader and replay engine.

use xbit_bitstream::frame_address::Series7FrameAddress;
use xbit_bitstream::register::Series7Register;
use xbit_bitstream::{
    BitstreamReader, BitstreamWriter, BlockType, Command, Configuration, ConfigurationPacket,
    FrameAddress, Frames, HeaderType, Opcode, Part, Series7,
};

fn bytes_of(words: &[u32]) -> Vec<u8> {
    let mut bytes = vec![0xAA, 0x99, 0x55, 0x66];
    for word in words {
        bytes.extend_from_slice(&word.to_be_bytes());
    }
    bytes
}

fn addr(row: u32, column: u32, minor: u32) -> Series7FrameAddress {
    Series7FrameAddress::new(BlockType::ClbIoClk, false, row, column, minor)
}

#[test]
fn sync_then_nop() {
    let bytes = [0xAA, 0x99, 0x55, 0x66, 0x20, 0x00, 0x00, 0x00];
    let reader = BitstreamReader::<Series7>::init_with_bytes(&bytes).unwrap();
    let packets: Vec<_> = reader.packets().collect();
    assert_eq!(packets.len(), 1);
    assert_eq!(packets[0].header_type(), HeaderType::Type1);
    assert_eq!(packets[0].opcode(), Opcode::Nop);
    assert_eq!(packets[0].address(), Series7Register::Crc);
    assert!(packets[0].data().is_empty());
}

#[test]
fn sync_only() {
    let reader = BitstreamReader::<Series7>::init_with_bytes(&[0xAA, 0x99, 0x55, 0x66]).unwrap();
    assert_eq!(reader.packets().count(), 0);
}

#[test]
fn single_frame_at_row_end_is_padded() {
    let part = Part::<Series7>::from_frame_addresses(0, &[addr(0, 0, 0), addr(0, 0, 1), addr(1, 0, 0)]);
    let mut frames = Frames::<Series7>::new();
    frames.insert(addr(0, 0, 1), vec![0xCAFE_F00D; 101]);
    let packets: Vec<_> = frames.packetize(&part).collect();
    assert_eq!(packets.len(), 2 + 202);
    assert_eq!(packets[0].address(), Series7Register::Far);
    assert_eq!(packets[1].address(), Series7Register::Fdri);
    assert!(packets[2..]
        .iter()
        .all(|p| p.header_type() == HeaderType::None && p.data().is_empty()));
}

#[test]
fn fdri_overrun_keeps_frames_up_to_part_end() {
    let part = Part::<Series7>::from_frame_addresses(0, &[addr(0, 0, 0), addr(0, 0, 1)]);
    let mut words = vec![
        0x3000_8001, Command::Wcfg.to_raw(),
        0x3000_2001, addr(0, 0, 0).raw(),
        0x3000_4000,
        0x5000_0000 | (3 * 101),
    ];
    words.extend((0..3 * 101).map(|i| i as u32));
    let bytes = bytes_of(&words);
    let reader = BitstreamReader::<Series7>::init_with_bytes(&bytes).unwrap();
    let config = Configuration::init_with_packets(&part, reader.packets()).unwrap();
    assert_eq!(config.frames().len(), 2);
    assert_eq!(config.frames()[&addr(0, 0, 1)][0], 101);
}

#[test]
fn idcode_mismatch_aborts_replay() {
    let part = Part::<Series7>::from_frame_addresses(0x0362_D093, &[addr(0, 0, 0)]);
    let bytes = bytes_of(&[0x3001_8001, 0x0372_7093]);
    let reader = BitstreamReader::<Series7>::init_with_bytes(&bytes).unwrap();
    assert!(Configuration::init_with_packets(&part, reader.packets()).is_none());
}

#[test]
fn truncated_stream_replays_complete_packets() {
    let part = Part::<Series7>::from_frame_addresses(0, &[addr(0, 0, 0), addr(0, 0, 1)]);
    let frame = vec![0x1111_1111; 101];
    let packets = vec![
        ConfigurationPacket::<Series7>::command(Command::Wcfg),
        ConfigurationPacket::write(Series7Register::Far, vec![0]),
        ConfigurationPacket::write(Series7Register::Fdri, frame.clone()),
        ConfigurationPacket::write(Series7Register::Fdri, frame),
    ];
    let mut bytes = BitstreamWriter::new(packets).to_bytes();
    bytes.truncate(bytes.len() - 8);
    let reader = BitstreamReader::<Series7>::init_with_bytes(&bytes).unwrap();
    assert_eq!(reader.packets().count(), 3);
    let config = Configuration::init_with_packets(&part, reader.packets()).unwrap();
    assert_eq!(config.frames().len(), 1);
}
