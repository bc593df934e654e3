//! SPI NAND wire vocabulary
//!
//! This module provides the command opcodes, the command frame layout and
//! the status register type shared by the protocol sequences.

mod address;
mod buffer;
mod command;
pub mod opcodes;
mod status;

pub use address::AddressWidth;
pub use buffer::ScratchBuffer;
pub use command::{NandCommand, MAX_HEADER_BYTES};
pub use status::{EccStatus, Status};
