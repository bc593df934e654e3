//! spinand-linux-spi - Linux spidev transport
//!
//! Drives a SPI NAND through the `/dev/spidevX.Y` character device.
//!
//! # Example
//!
//! ```no_run
//! use spinand_core::flash::NandFlash;
//! use spinand_linux_spi::{LinuxSpi, LinuxSpiConfig};
//!
//! let config = LinuxSpiConfig::new("/dev/spidev0.0").with_speed(20_000_000);
//! let mut flash = NandFlash::new(LinuxSpi::open(&config)?);
//! let chip = flash.initialize()?;
//! println!("{} {}", chip.vendor, chip.name);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Usage with the spinand CLI
//!
//! ```bash
//! spinand probe -p linux_spi:dev=/dev/spidev0.0
//! spinand read -p linux_spi:dev=/dev/spidev0.0,spispeed=4000 -o dump.bin
//! ```
//!
//! A full page transfer is `page_size + 4` bytes, which exceeds the default
//! spidev `bufsiz` of 4096 on 4 KiB page parts. Load spidev with a larger
//! `bufsiz` for those.

pub mod device;
pub mod error;

pub use device::{mode, parse_options, LinuxSpi, LinuxSpiConfig, DEFAULT_SPEED_HZ};
pub use error::{LinuxSpiError, Result};
