//! SPI NAND flash opcodes
//!
//! Command set shared by the Toshiba TC58CVx and GigaDevice GD5FxGQ4x
//! families.

// ============================================================================
// Identification and reset
// ============================================================================

/// Read ID (manufacturer + device ID)
pub const READ_ID: u8 = 0x9F;
/// Reset the device
pub const RESET: u8 = 0xFF;

// ============================================================================
// Feature registers
// ============================================================================

/// Get Feature - read a feature register (1 address byte)
pub const GET_FEATURE: u8 = 0x0F;
/// Set Feature - write a feature register (1 address byte + value)
pub const SET_FEATURE: u8 = 0x1F;

/// Feature address: block lock register
pub const FEATURE_BLOCK_LOCK: u8 = 0xA0;
/// Feature address: status register
pub const FEATURE_STATUS: u8 = 0xC0;

// ============================================================================
// Write control
// ============================================================================

/// Write Enable - required before program execute and block erase
pub const WRITE_ENABLE: u8 = 0x06;

// ============================================================================
// Array access
// ============================================================================

/// Page Read - load a page from the array into the cache register
pub const PAGE_READ: u8 = 0x13;
/// Read From Cache (2 column bytes + 1 dummy byte)
pub const READ_FROM_CACHE: u8 = 0x03;
/// Program Load - load data into the cache register
pub const PROGRAM_LOAD: u8 = 0x02;
/// Program Execute - commit the cache register to a page
pub const PROGRAM_EXECUTE: u8 = 0x10;
/// Block Erase (3 row address bytes)
pub const BLOCK_ERASE: u8 = 0xD8;

// ============================================================================
// Status register bit definitions
// ============================================================================

/// Status: Operation In Progress
pub const SR_OIP: u8 = 0x01;
/// Status: Write Enable Latch
pub const SR_WEL: u8 = 0x02;
/// Status: Erase Fail
pub const SR_E_FAIL: u8 = 0x04;
/// Status: Program Fail
pub const SR_P_FAIL: u8 = 0x08;
/// Status: ECC result field (2 bits)
pub const SR_ECC_MASK: u8 = 0x30;
/// Status: ECC result field position
pub const SR_ECC_SHIFT: u8 = 4;

// ============================================================================
// Timings
// ============================================================================

/// Page read latency, used as the status poll interval
pub const PAGE_READ_TIME_US: u32 = 115;
