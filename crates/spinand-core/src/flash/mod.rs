//! Session lifecycle and page/block operations
//!
//! This module provides [`NandFlash`], the owned driver instance that
//! identifies the chip, holds the scratch buffer and runs the read, program,
//! erase and reset/unlock sequences.

mod session;

pub use session::{NandFlash, Session};
