//! Configuration CRC.
//!
//! The configuration logic folds every register write into a running
//! CRC-32C. Each update consumes 37 bits, least significant first: the
//! 32-bit data word followed by the 5-bit register address. The CMD
//! write of RCRC resets the value to zero.

use crate::arch::{Architecture, PacketFormat};
use crate::packet::{ConfigurationPacket, Opcode};
use crate::register::{Command, ConfigurationRegister, RegisterRole};

/// CRC-32C (Castagnoli) polynomial, bit-reversed.
const CRC32C_POLY: u32 = 0x82F6_3B78;

/// Bits consumed per update: 32 data bits and a 5-bit register address.
const UPDATE_BITS: u32 = 37;

/// Folds one register write into `previous`.
pub fn icap_crc(register: u32, data: u32, previous: u32) -> u32 {
    let poly = u64::from(CRC32C_POLY) << 1;
    let mut value = (u64::from(register) << 32) | u64::from(data);
    let mut crc = u64::from(previous);
    for _ in 0..UPDATE_BITS {
        if (value & 1) != (crc & 1) {
            crc ^= poly;
        }
        value >>= 1;
        crc >>= 1;
    }
    crc as u32
}

/// Running CRC over a sequence of register writes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Crc {
    value: u32,
}

impl Crc {
    /// A CRC in its reset state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value.
    pub fn value(&self) -> u32 {
        self.value
    }

    /// Resets to zero, as the RCRC command does.
    pub fn reset(&mut self) {
        self.value = 0;
    }

    /// Folds in one data word written to `register`.
    pub fn update(&mut self, register: u32, data: u32) {
        self.value = icap_crc(register, data, self.value);
    }

    /// Folds in every payload word of a write packet. RCRC commands reset
    /// the value; CRC register writes and non-write packets are skipped.
    pub fn update_packet<A: Architecture>(&mut self, packet: &ConfigurationPacket<'_, A>) {
        if packet.opcode() != Opcode::Write {
            return;
        }
        let register = packet.address();
        match register.role() {
            RegisterRole::Crc => {}
            RegisterRole::Command if packet.data().first().map(|&c| Command::from_raw(c)) == Some(Command::Rcrc) => {
                self.reset();
            }
            _ => {
                for &word in packet.data() {
                    self.update(register.to_raw(), word);
                }
            }
        }
    }
}

/// CRC of a packet stream as the configuration logic would compute it at
/// the end of the stream.
pub fn crc_of_packets<'p, 'a: 'p, A: Architecture>(
    packets: impl IntoIterator<Item = &'p ConfigurationPacket<'a, A>>,
) -> u32 {
    let mut crc = Crc::new();
    for packet in packets {
        crc.update_packet(packet);
    }
    crc.value()
}

/// Inserts a CRC check write ahead of the final DESYNC command, so the
/// device verifies every write since the last RCRC.
///
/// Returns the inserted value, or `None` when the stream has no DESYNC or
/// the architecture's packets are not 32 bits wide.
pub fn insert_crc_check<A: Architecture>(packets: &mut Vec<ConfigurationPacket<'_, A>>) -> Option<u32> {
    if A::PACKET_FORMAT != PacketFormat::Word32 {
        return None;
    }
    let desync = packets.iter().rposition(|packet| {
        packet.opcode() == Opcode::Write
            && packet.address() == A::Register::CMD
            && packet.data().first().copied() == Some(Command::Desync.to_raw())
    })?;
    let value = crc_of_packets(&packets[..desync]);
    packets.insert(desync, ConfigurationPacket::write(A::Register::CRC, vec![value]));
    log::debug!("inserted CRC check {value:#010x}");
    Some(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arch::{Series7, Spartan6};
    use crate::register::Series7Register;

    #[test]
    fn known_vectors() {
        assert_eq!(icap_crc(0, 0, 0), 0);
        assert_eq!(icap_crc(1 << 4, 0, 0), 0x82F6_3B78);
        assert_eq!(icap_crc(0x1F, !0, 0), 0xBF86_D4DF);
        assert_eq!(icap_crc(0, 0, !0), 0xC631_E365);
        assert_eq!(icap_crc(4, 7, 0), 0x7150_51CB);
    }

    #[test]
    fn register_address_is_five_bits() {
        assert_eq!(icap_crc(!0, !0, 0), icap_crc(0x1F, !0, 0));
    }

    #[test]
    fn accumulates_writes_and_resets_on_rcrc() {
        let packets = vec![
            ConfigurationPacket::<Series7>::write(Series7Register::Cor0, vec![0xAAAA]),
            ConfigurationPacket::command(Command::Rcrc),
            ConfigurationPacket::nop(),
            ConfigurationPacket::write(Series7Register::Idcode, vec![0x0362_D093]),
            ConfigurationPacket::command(Command::Start),
        ];
        assert_eq!(crc_of_packets(&packets), 0x044C_CD88);
    }

    #[test]
    fn crc_register_writes_are_not_folded() {
        let mut crc = Crc::new();
        crc.update_packet(&ConfigurationPacket::<Series7>::write(Series7Register::Crc, vec![0x1234]));
        assert_eq!(crc.value(), 0);
    }

    #[test]
    fn check_lands_before_desync() {
        let mut packets = vec![
            ConfigurationPacket::<Series7>::command(Command::Rcrc),
            ConfigurationPacket::write(Series7Register::Idcode, vec![0x0362_D093]),
            ConfigurationPacket::command(Command::Start),
            ConfigurationPacket::command(Command::Desync),
            ConfigurationPacket::nop(),
        ];
        let value = insert_crc_check(&mut packets).unwrap();
        assert_eq!(value, 0x044C_CD88);
        assert_eq!(packets[3].address(), Series7Register::Crc);
        assert_eq!(packets[3].data(), &[value]);
        assert_eq!(packets[4].data(), &[Command::Desync.to_raw()]);
    }

    #[test]
    fn no_check_without_desync_or_on_spartan6() {
        let mut packets = vec![ConfigurationPacket::<Series7>::nop()];
        assert_eq!(insert_crc_check(&mut packets), None);
        let mut packets = vec![ConfigurationPacket::<Spartan6>::command(Command::Desync)];
        assert_eq!(insert_crc_check(&mut packets), None);
        assert_eq!(packets.len(), 1);
    }
}
