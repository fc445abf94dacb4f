//! Configuration register maps and command codes.
//!
//! Every family addresses the configuration logic through a small register
//! file. The replay engine only needs to know what a handful of registers
//! *mean*, which [`ConfigurationRegister::role`] exposes; everything else is
//! carried through untouched.

use std::fmt;
use std::hash::Hash;

/// The part a register plays during frame replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegisterRole {
    /// Running CRC check value.
    Crc,
    /// Full frame address.
    FrameAddress,
    /// Upper half of a split frame address (Spartan-6 FAR_MAJ).
    FrameAddressMajor,
    /// Minor field of a split frame address (Spartan-6 FAR_MIN).
    FrameAddressMinor,
    /// Frame data input.
    FrameDataInput,
    /// Multiple frame write.
    MultiFrameWrite,
    /// Command register.
    Command,
    /// Write mask applied to the control register.
    Mask,
    /// Control register whose value gates frame address auto-write.
    Control,
    /// Device identifier check.
    Idcode,
    /// A register with no effect on replay.
    Other,
}

/// A family's configuration register address space.
pub trait ConfigurationRegister:
    Copy + Eq + Ord + Hash + fmt::Debug + fmt::Display + Send + Sync + 'static
{
    /// Register addressed by type-0 and NOP packets.
    const CRC: Self;
    /// Register that receives the frame address ahead of frame data.
    const FRAME_ADDRESS: Self;
    /// Frame data input register.
    const FDRI: Self;
    /// Command register.
    const CMD: Self;
    /// Mask register.
    const MASK: Self;
    /// Device identifier register.
    const IDCODE: Self;
    /// Startup options register in the [`ConfigurationOptions0`] layout,
    /// if the family has one.
    ///
    /// [`ConfigurationOptions0`]: crate::options::ConfigurationOptions0
    const COR0: Option<Self>;

    /// Decodes a raw register address.
    fn from_raw(raw: u32) -> Self;

    /// Encodes the register back into its raw address.
    fn to_raw(self) -> u32;

    /// What writes to this register do during replay.
    fn role(self) -> RegisterRole;
}

macro_rules! register_map {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $value:literal => $text:literal, )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )*
            /// An address with no assigned register.
            Unknown(u32),
        }

        impl $name {
            /// Decodes a raw register address.
            pub fn from_raw(raw: u32) -> Self {
                match raw {
                    $( $value => Self::$variant, )*
                    other => Self::Unknown(other),
                }
            }

            /// Encodes the register back into its raw address.
            pub fn to_raw(self) -> u32 {
                match self {
                    $( Self::$variant => $value, )*
                    Self::Unknown(raw) => raw,
                }
            }

            /// The datasheet mnemonic, if the register is known.
            pub fn name(self) -> Option<&'static str> {
                match self {
                    $( Self::$variant => Some($text), )*
                    Self::Unknown(_) => None,
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self.name() {
                    Some(name) => f.write_str(name),
                    None => write!(f, "UNKNOWN(0x{:02x})", self.to_raw()),
                }
            }
        }
    };
}

register_map! {
    /// Register map of 7-series, UltraScale and UltraScale+ devices.
    Series7Register {
        /// CRC check value.
        Crc = 0x00 => "CRC",
        /// Frame address.
        Far = 0x01 => "FAR",
        /// Frame data input.
        Fdri = 0x02 => "FDRI",
        /// Frame data output.
        Fdro = 0x03 => "FDRO",
        /// Command.
        Cmd = 0x04 => "CMD",
        /// Control register 0.
        Ctl0 = 0x05 => "CTL0",
        /// Masking register for CTL0 and CTL1.
        Mask = 0x06 => "MASK",
        /// Status.
        Stat = 0x07 => "STAT",
        /// Legacy output for daisy chains.
        Lout = 0x08 => "LOUT",
        /// Configuration option 0.
        Cor0 = 0x09 => "COR0",
        /// Multiple frame write.
        Mfwr = 0x0A => "MFWR",
        /// Initial CBC value.
        Cbc = 0x0B => "CBC",
        /// Device identifier.
        Idcode = 0x0C => "IDCODE",
        /// User access.
        Axss = 0x0D => "AXSS",
        /// Configuration option 1.
        Cor1 = 0x0E => "COR1",
        /// Warm boot start address.
        Wbstar = 0x10 => "WBSTAR",
        /// Watchdog timer.
        Timer = 0x11 => "TIMER",
        /// Readback CRC software trigger.
        RbCrcSw = 0x13 => "RBCRC_SW",
        /// Boot history status.
        Bootsts = 0x16 => "BOOTSTS",
        /// Control register 1.
        Ctl1 = 0x18 => "CTL1",
        /// BPI/SPI configuration options.
        Bspi = 0x1F => "BSPI",
    }
}

impl ConfigurationRegister for Series7Register {
    const CRC: Self = Self::Crc;
    const FRAME_ADDRESS: Self = Self::Far;
    const FDRI: Self = Self::Fdri;
    const CMD: Self = Self::Cmd;
    const MASK: Self = Self::Mask;
    const IDCODE: Self = Self::Idcode;
    const COR0: Option<Self> = Some(Self::Cor0);

    fn from_raw(raw: u32) -> Self {
        Series7Register::from_raw(raw)
    }

    fn to_raw(self) -> u32 {
        Series7Register::to_raw(self)
    }

    fn role(self) -> RegisterRole {
        match self {
            Self::Crc => RegisterRole::Crc,
            Self::Far => RegisterRole::FrameAddress,
            Self::Fdri => RegisterRole::FrameDataInput,
            Self::Mfwr => RegisterRole::MultiFrameWrite,
            Self::Cmd => RegisterRole::Command,
            Self::Mask => RegisterRole::Mask,
            Self::Ctl1 => RegisterRole::Control,
            Self::Idcode => RegisterRole::Idcode,
            _ => RegisterRole::Other,
        }
    }
}

register_map! {
    /// Register map of Spartan-6 devices.
    Spartan6Register {
        /// CRC check value.
        Crc = 0x00 => "CRC",
        /// Frame address, major half.
        FarMaj = 0x01 => "FAR_MAJ",
        /// Frame address, minor half.
        FarMin = 0x02 => "FAR_MIN",
        /// Frame data input.
        Fdri = 0x03 => "FDRI",
        /// Frame data output.
        Fdro = 0x04 => "FDRO",
        /// Command.
        Cmd = 0x05 => "CMD",
        /// Control.
        Ctl = 0x06 => "CTL",
        /// Masking register for CTL.
        Mask = 0x07 => "MASK",
        /// Status.
        Stat = 0x08 => "STAT",
        /// Legacy output for daisy chains.
        Lout = 0x09 => "LOUT",
        /// Configuration option 1.
        Cor1 = 0x0A => "COR1",
        /// Configuration option 2.
        Cor2 = 0x0B => "COR2",
        /// Power-down register.
        PwrdnReg = 0x0C => "PWRDN_REG",
        /// Frame length.
        Flr = 0x0D => "FLR",
        /// Device identifier.
        Idcode = 0x0E => "IDCODE",
        /// Configuration watchdog timer.
        Cwdt = 0x0F => "CWDT",
        /// Housecleaning options.
        HcOpt = 0x10 => "HC_OPT_REG",
        /// Configuration status.
        Csbo = 0x12 => "CSBO",
        /// Multi-boot general register 1.
        General1 = 0x13 => "GENERAL1",
        /// Multi-boot general register 2.
        General2 = 0x14 => "GENERAL2",
        /// Multi-boot general register 3.
        General3 = 0x15 => "GENERAL3",
        /// Multi-boot general register 4.
        General4 = 0x16 => "GENERAL4",
        /// Multi-boot general register 5.
        General5 = 0x17 => "GENERAL5",
        /// Configuration mode.
        Mode = 0x18 => "MODE_REG",
        /// GWE cycle during wake-up.
        PuGwe = 0x19 => "PU_GWE",
        /// GTS cycle during wake-up.
        PuGts = 0x1A => "PU_GTS",
        /// Multiple frame write.
        Mfwr = 0x1B => "MFWR",
        /// CCLK frequency selection.
        CclkFreq = 0x1C => "CCLK_FREQ",
        /// SEU detection options.
        SeuOpt = 0x1D => "SEU_OPT",
        /// Expected readback signature.
        ExpSign = 0x1E => "EXP_SIGN",
        /// Readback signature.
        RdbkSign = 0x1F => "RDBK_SIGN",
        /// Boot status.
        Bootsts = 0x20 => "BOOTSTS",
        /// Eye mask.
        EyeMask = 0x21 => "EYE_MASK",
        /// Initial CBC value.
        CbcReg = 0x22 => "CBC_REG",
    }
}

impl ConfigurationRegister for Spartan6Register {
    const CRC: Self = Self::Crc;
    const FRAME_ADDRESS: Self = Self::FarMaj;
    const FDRI: Self = Self::Fdri;
    const CMD: Self = Self::Cmd;
    const MASK: Self = Self::Mask;
    const IDCODE: Self = Self::Idcode;
    const COR0: Option<Self> = None;

    fn from_raw(raw: u32) -> Self {
        Spartan6Register::from_raw(raw)
    }

    fn to_raw(self) -> u32 {
        Spartan6Register::to_raw(self)
    }

    fn role(self) -> RegisterRole {
        match self {
            Self::Crc => RegisterRole::Crc,
            Self::FarMaj => RegisterRole::FrameAddressMajor,
            Self::FarMin => RegisterRole::FrameAddressMinor,
            Self::Fdri => RegisterRole::FrameDataInput,
            Self::Mfwr => RegisterRole::MultiFrameWrite,
            Self::Cmd => RegisterRole::Command,
            Self::Mask => RegisterRole::Mask,
            Self::Ctl => RegisterRole::Control,
            Self::Idcode => RegisterRole::Idcode,
            _ => RegisterRole::Other,
        }
    }
}

/// Values written to the command register.
///
/// The codes are shared by every family; Spartan-6 reuses `Mfw` for its
/// multiple-frame-write command and has no `Iprog` at 0x0F.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// No operation.
    Null,
    /// Write configuration data.
    Wcfg,
    /// Multiple frame write.
    Mfw,
    /// Last frame: deassert GHIGH_B.
    Lfrm,
    /// Read configuration data.
    Rcfg,
    /// Begin the startup sequence.
    Start,
    /// Reset the CAPTURE signal.
    Rcap,
    /// Reset the CRC register.
    Rcrc,
    /// Assert GHIGH_B.
    Aghigh,
    /// Switch CCLK frequency.
    Switch,
    /// Pulse GRESTORE.
    Grestore,
    /// Begin the shutdown sequence.
    Shutdown,
    /// Pulse GCAPTURE.
    Gcapture,
    /// Reset the DALIGN signal.
    Desync,
    /// Internal PROG for warm boot.
    Iprog,
    /// Calculate the readback CRC.
    Crcc,
    /// Reload the watchdog timer.
    Ltimer,
    /// Read SPI flash through the BSPI register.
    BspiRead,
    /// Switch to falling-edge CCLK sampling.
    FallEdge,
    /// An undocumented command code.
    Unknown(u32),
}

impl Command {
    /// Decodes a command register value.
    pub fn from_raw(raw: u32) -> Self {
        match raw {
            0x00 => Self::Null,
            0x01 => Self::Wcfg,
            0x02 => Self::Mfw,
            0x03 => Self::Lfrm,
            0x04 => Self::Rcfg,
            0x05 => Self::Start,
            0x06 => Self::Rcap,
            0x07 => Self::Rcrc,
            0x08 => Self::Aghigh,
            0x09 => Self::Switch,
            0x0A => Self::Grestore,
            0x0B => Self::Shutdown,
            0x0C => Self::Gcapture,
            0x0D => Self::Desync,
            0x0F => Self::Iprog,
            0x10 => Self::Crcc,
            0x11 => Self::Ltimer,
            0x12 => Self::BspiRead,
            0x13 => Self::FallEdge,
            other => Self::Unknown(other),
        }
    }

    /// Encodes the command as a register value.
    pub fn to_raw(self) -> u32 {
        match self {
            Self::Null => 0x00,
            Self::Wcfg => 0x01,
            Self::Mfw => 0x02,
            Self::Lfrm => 0x03,
            Self::Rcfg => 0x04,
            Self::Start => 0x05,
            Self::Rcap => 0x06,
            Self::Rcrc => 0x07,
            Self::Aghigh => 0x08,
            Self::Switch => 0x09,
            Self::Grestore => 0x0A,
            Self::Shutdown => 0x0B,
            Self::Gcapture => 0x0C,
            Self::Desync => 0x0D,
            Self::Iprog => 0x0F,
            Self::Crcc => 0x10,
            Self::Ltimer => 0x11,
            Self::BspiRead => 0x12,
            Self::FallEdge => 0x13,
            Self::Unknown(raw) => raw,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Null => "NULL",
            Self::Wcfg => "WCFG",
            Self::Mfw => "MFW",
            Self::Lfrm => "LFRM",
            Self::Rcfg => "RCFG",
            Self::Start => "START",
            Self::Rcap => "RCAP",
            Self::Rcrc => "RCRC",
            Self::Aghigh => "AGHIGH",
            Self::Switch => "SWITCH",
            Self::Grestore => "GRESTORE",
            Self::Shutdown => "SHUTDOWN",
            Self::Gcapture => "GCAPTURE",
            Self::Desync => "DESYNC",
            Self::Iprog => "IPROG",
            Self::Crcc => "CRCC",
            Self::Ltimer => "LTIMER",
            Self::BspiRead => "BSPI_READ",
            Self::FallEdge => "FALL_EDGE",
            Self::Unknown(raw) => return write!(f, "UNKNOWN(0x{raw:02x})"),
        };
        f.write_str(name)
    }
}
