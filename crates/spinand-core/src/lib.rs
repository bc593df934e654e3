//! spinand-core - Core library for SPI NAND flash chips
//!
//! This crate translates page-level operations (read, program, erase) into
//! the command frames understood by serial NAND flash chips, identifies the
//! attached device and polls its status register for completion and
//! failure. It is `no_std` compatible but needs `alloc` for the per-session
//! scratch buffer.
//!
//! The physical link is supplied by the caller through the
//! [`transport::SpiTransport`] trait.
//!
//! # Features
//!
//! - `std` - Implement `std::error::Error` for [`Error`]
//!
//! # Example
//!
//! ```ignore
//! use spinand_core::flash::NandFlash;
//!
//! fn dump_first_page<T: spinand_core::transport::SpiTransport>(transport: T) {
//!     let mut flash = NandFlash::new(transport);
//!     let chip = flash.initialize().unwrap();
//!     println!("Found: {} {}", chip.vendor, chip.name);
//!
//!     flash.reset_unlock().unwrap();
//!     let mut page = vec![0u8; flash.page_size_bytes() as usize];
//!     flash.page_read(0, 0, &mut page).unwrap();
//! }
//! ```

#![no_std]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod chip;
pub mod error;
pub mod flash;
pub mod protocol;
pub mod spi;
pub mod transport;

pub use error::{error_name, Error, Result};
