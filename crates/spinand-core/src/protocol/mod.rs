//! Protocol implementations
//!
//! This module contains the SPI NAND command sequences and the status
//! polling loop they are built on.

mod poll;
mod spinand;

pub use poll::*;
pub use spinand::*;
