//! Configuration option register 0 (COR0) encoding.
//!
//! COR0 controls the startup sequence: which clock drives it and in which
//! phase each global signal is released.
//!
//! | bits  | field                         |
//! |-------|-------------------------------|
//! | 27    | power-down status on INIT_B   |
//! | 25    | DONE pipeline                 |
//! | 24    | actively drive DONE high      |
//! | 23    | single-shot readback          |
//! | 22:17 | CCLK frequency select         |
//! | 16:15 | startup clock source          |
//! | 14:12 | DONE release cycle            |
//! | 11:9  | DCI match wait cycle          |
//! | 8:6   | MMCM lock wait cycle          |
//! | 5:3   | GTS release cycle             |
//! | 2:0   | GWE release cycle             |

use serde::{Deserialize, Serialize};
use xbit_common::{bit_field_get, bit_field_set};

/// Clock that drives the startup sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StartupClock {
    /// Configuration clock.
    Cclk,
    /// User clock from the STARTUP primitive.
    UserClk,
    /// JTAG TCK.
    JtagClk,
}

impl StartupClock {
    fn to_raw(self) -> u32 {
        match self {
            Self::Cclk => 0,
            Self::UserClk => 1,
            Self::JtagClk => 2,
        }
    }

    fn from_raw(raw: u32) -> Self {
        match raw {
            1 => Self::UserClk,
            2 => Self::JtagClk,
            _ => Self::Cclk,
        }
    }
}

/// Startup phase in which a signal is released or waited for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StartupCycle {
    /// Phase 1.
    Phase1,
    /// Phase 2.
    Phase2,
    /// Phase 3.
    Phase3,
    /// Phase 4.
    Phase4,
    /// Phase 5.
    Phase5,
    /// Phase 6.
    Phase6,
    /// Synchronized to DONE.
    Done,
    /// Keep current state, or do not wait.
    Keep,
}

impl StartupCycle {
    /// Alias used for the DCI and MMCM wait fields.
    pub const NO_WAIT: StartupCycle = StartupCycle::Keep;

    fn to_raw(self) -> u32 {
        match self {
            Self::Phase1 => 0,
            Self::Phase2 => 1,
            Self::Phase3 => 2,
            Self::Phase4 => 3,
            Self::Phase5 => 4,
            Self::Phase6 => 5,
            Self::Done => 6,
            Self::Keep => 7,
        }
    }

    fn from_raw(raw: u32) -> Self {
        match raw & 0x7 {
            0 => Self::Phase1,
            1 => Self::Phase2,
            2 => Self::Phase3,
            3 => Self::Phase4,
            4 => Self::Phase5,
            5 => Self::Phase6,
            6 => Self::Done,
            _ => Self::Keep,
        }
    }
}

/// Decoded COR0 value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigurationOptions0 {
    /// Drive power-down status on INIT_B.
    pub power_down_status: bool,
    /// Add a pipeline stage to DONE input.
    pub done_pipeline: bool,
    /// Actively drive DONE high instead of open drain.
    pub drive_done: bool,
    /// Single-shot readback capture.
    pub single_readback: bool,
    /// CCLK frequency select.
    pub cclk_frequency: u32,
    /// Startup clock source.
    pub startup_clock: StartupClock,
    /// Phase in which DONE is released.
    pub done_cycle: StartupCycle,
    /// Phase that waits for DCI match.
    pub dci_match_cycle: StartupCycle,
    /// Phase that waits for MMCM lock.
    pub mmcm_lock_cycle: StartupCycle,
    /// Phase in which GTS is deasserted.
    pub gts_cycle: StartupCycle,
    /// Phase in which GWE is asserted.
    pub gwe_cycle: StartupCycle,
}

impl Default for ConfigurationOptions0 {
    /// The option set that encodes to `0x02003FE5`.
    fn default() -> Self {
        Self {
            power_down_status: false,
            done_pipeline: true,
            drive_done: false,
            single_readback: false,
            cclk_frequency: 0,
            startup_clock: StartupClock::Cclk,
            done_cycle: StartupCycle::Phase4,
            dci_match_cycle: StartupCycle::NO_WAIT,
            mmcm_lock_cycle: StartupCycle::NO_WAIT,
            gts_cycle: StartupCycle::Phase5,
            gwe_cycle: StartupCycle::Phase6,
        }
    }
}

impl ConfigurationOptions0 {
    /// Encodes the register value.
    pub fn to_raw(&self) -> u32 {
        let mut raw = 0u32;
        raw = bit_field_set(raw, 27, 27, u32::from(self.power_down_status));
        raw = bit_field_set(raw, 25, 25, u32::from(self.done_pipeline));
        raw = bit_field_set(raw, 24, 24, u32::from(self.drive_done));
        raw = bit_field_set(raw, 23, 23, u32::from(self.single_readback));
        raw = bit_field_set(raw, 22, 17, self.cclk_frequency);
        raw = bit_field_set(raw, 16, 15, self.startup_clock.to_raw());
        raw = bit_field_set(raw, 14, 12, self.done_cycle.to_raw());
        raw = bit_field_set(raw, 11, 9, self.dci_match_cycle.to_raw());
        raw = bit_field_set(raw, 8, 6, self.mmcm_lock_cycle.to_raw());
        raw = bit_field_set(raw, 5, 3, self.gts_cycle.to_raw());
        raw = bit_field_set(raw, 2, 0, self.gwe_cycle.to_raw());
        raw
    }

    /// Decodes a register value. Reserved bits are dropped.
    pub fn from_raw(raw: u32) -> Self {
        Self {
            power_down_status: bit_field_get(raw, 27, 27) != 0,
            done_pipeline: bit_field_get(raw, 25, 25) != 0,
            drive_done: bit_field_get(raw, 24, 24) != 0,
            single_readback: bit_field_get(raw, 23, 23) != 0,
            cclk_frequency: bit_field_get(raw, 22, 17),
            startup_clock: StartupClock::from_raw(bit_field_get(raw, 16, 15)),
            done_cycle: StartupCycle::from_raw(bit_field_get(raw, 14, 12)),
            dci_match_cycle: StartupCycle::from_raw(bit_field_get(raw, 11, 9)),
            mmcm_lock_cycle: StartupCycle::from_raw(bit_field_get(raw, 8, 6)),
            gts_cycle: StartupCycle::from_raw(bit_field_get(raw, 5, 3)),
            gwe_cycle: StartupCycle::from_raw(bit_field_get(raw, 2, 0)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_value() {
        assert_eq!(ConfigurationOptions0::default().to_raw(), 0x0200_3FE5);
    }

    #[test]
    fn decode_default() {
        assert_eq!(ConfigurationOptions0::from_raw(0x0200_3FE5), ConfigurationOptions0::default());
    }

    #[test]
    fn fields_land_in_place() {
        let options = ConfigurationOptions0 {
            done_pipeline: false,
            drive_done: true,
            startup_clock: StartupClock::UserClk,
            gwe_cycle: StartupCycle::Done,
            ..ConfigurationOptions0::default()
        };
        let raw = options.to_raw();
        assert_eq!(raw & (1 << 25), 0);
        assert_ne!(raw & (1 << 24), 0);
        assert_eq!((raw >> 15) & 0x3, 1);
        assert_eq!(raw & 0x7, 6);
    }

    #[test]
    fn cclk_field_truncates() {
        let options = ConfigurationOptions0 {
            cclk_frequency: 0xFF,
            ..ConfigurationOptions0::default()
        };
        assert_eq!(ConfigurationOptions0::from_raw(options.to_raw()).cclk_frequency, 0x3F);
    }

    #[test]
    fn deserializes_partial_table() {
        let options: ConfigurationOptions0 =
            serde_json::from_str(r#"{"startup_clock":"jtag_clk","done_cycle":"phase6"}"#).unwrap();
        assert_eq!(options.startup_clock, StartupClock::JtagClk);
        assert_eq!(options.done_cycle, StartupCycle::Phase6);
        assert!(options.done_pipeline);
    }
}
