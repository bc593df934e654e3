//! Status register type

use bitflags::bitflags;

use super::opcodes;

bitflags! {
    /// SPI NAND status register (feature address 0xC0)
    ///
    /// Read fresh after every state-changing command; never cached.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Status: u8 {
        /// Operation in progress
        const OIP    = opcodes::SR_OIP;
        /// Write enable latch
        const WEL    = opcodes::SR_WEL;
        /// Erase failed
        const E_FAIL = opcodes::SR_E_FAIL;
        /// Program failed
        const P_FAIL = opcodes::SR_P_FAIL;
        /// ECC status bit 0
        const ECC_0  = 0x10;
        /// ECC status bit 1
        const ECC_1  = 0x20;
    }
}

/// Decoded ECC result field
///
/// The meaning of `0b10` differs between vendors; only the all-set pattern
/// is treated as fatal by the read sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EccStatus {
    /// No bit errors
    NoError,
    /// Bit errors detected and corrected
    Corrected,
    /// Vendor specific (`0b10`)
    CorrectedAtLimit,
    /// All-set pattern: errors could not be corrected
    Uncorrectable,
}

impl Status {
    /// Wrap a raw status byte, keeping undefined bits
    pub const fn from_raw(raw: u8) -> Self {
        Self::from_bits_retain(raw)
    }

    /// The device is still executing the last command
    pub const fn is_busy(&self) -> bool {
        self.contains(Self::OIP)
    }

    /// The write enable latch is set
    pub const fn write_enabled(&self) -> bool {
        self.contains(Self::WEL)
    }

    /// The last block erase failed
    pub const fn erase_failed(&self) -> bool {
        self.contains(Self::E_FAIL)
    }

    /// The last program execute failed
    pub const fn program_failed(&self) -> bool {
        self.contains(Self::P_FAIL)
    }

    /// Raw two-bit ECC field
    pub const fn ecc_bits(&self) -> u8 {
        (self.bits() & opcodes::SR_ECC_MASK) >> opcodes::SR_ECC_SHIFT
    }

    /// Decoded ECC field
    pub const fn ecc(&self) -> EccStatus {
        match self.ecc_bits() {
            0b00 => EccStatus::NoError,
            0b01 => EccStatus::Corrected,
            0b10 => EccStatus::CorrectedAtLimit,
            _ => EccStatus::Uncorrectable,
        }
    }

    /// ECC field reads the all-set pattern
    pub const fn ecc_uncorrectable(&self) -> bool {
        matches!(self.ecc(), EccStatus::Uncorrectable)
    }
}
