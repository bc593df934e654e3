//! spidev device
//!
//! [`LinuxSpi`] drives a SPI NAND through `/dev/spidevX.Y`. Every command
//! frame becomes a single `SPI_IOC_MESSAGE` with a write segment and an
//! optional read segment, so chip select stays asserted across both.

use crate::error::{LinuxSpiError, Result};

use spinand_core::error::{Error as CoreError, Result as CoreResult};
use spinand_core::transport::SpiTransport;

use std::fs::{File, OpenOptions};
use std::os::unix::io::AsRawFd;
use std::time::Duration;

/// Path to kernel spidev buffer size parameter
const BUF_SIZE_SYSFS: &str = "/sys/module/spidev/parameters/bufsiz";

/// Default SPI clock speed in Hz (10 MHz)
pub const DEFAULT_SPEED_HZ: u32 = 10_000_000;

/// SPI mode constants
pub mod mode {
    /// SPI mode 0: CPOL=0, CPHA=0
    pub const MODE_0: u8 = 0;
    /// SPI mode 3: CPOL=1, CPHA=1
    pub const MODE_3: u8 = 3;
}

mod ioctl {
    use nix::ioctl_write_ptr;

    const SPI_IOC_MAGIC: u8 = b'k';

    const SPI_IOC_TYPE_MODE: u8 = 1;
    const SPI_IOC_TYPE_BITS_PER_WORD: u8 = 3;
    const SPI_IOC_TYPE_MAX_SPEED_HZ: u8 = 4;

    ioctl_write_ptr!(spi_ioc_wr_mode, SPI_IOC_MAGIC, SPI_IOC_TYPE_MODE, u8);
    ioctl_write_ptr!(
        spi_ioc_wr_bits_per_word,
        SPI_IOC_MAGIC,
        SPI_IOC_TYPE_BITS_PER_WORD,
        u8
    );
    ioctl_write_ptr!(
        spi_ioc_wr_max_speed_hz,
        SPI_IOC_MAGIC,
        SPI_IOC_TYPE_MAX_SPEED_HZ,
        u32
    );

    /// Size of struct spi_ioc_transfer
    pub const SPI_IOC_TRANSFER_SIZE: usize = 32;

    /// SPI_IOC_MESSAGE(n) = _IOW(SPI_IOC_MAGIC, 0, char[n * sizeof(spi_ioc_transfer)])
    pub fn spi_ioc_message(n: u8) -> libc::c_ulong {
        let size = (n as usize) * SPI_IOC_TRANSFER_SIZE;
        ((1u32 << 30) | ((size as u32) << 16) | ((SPI_IOC_MAGIC as u32) << 8)) as libc::c_ulong
    }
}

/// Kernel `struct spi_ioc_transfer`
#[repr(C)]
#[derive(Debug, Default, Clone)]
struct SpiIocTransfer {
    tx_buf: u64,
    rx_buf: u64,
    len: u32,
    speed_hz: u32,
    delay_usecs: u16,
    bits_per_word: u8,
    cs_change: u8,
    tx_nbits: u8,
    rx_nbits: u8,
    word_delay_usecs: u8,
    _pad: u8,
}

impl SpiIocTransfer {
    fn tx(data: &[u8], speed_hz: u32) -> Self {
        Self {
            tx_buf: data.as_ptr() as u64,
            len: data.len() as u32,
            speed_hz,
            bits_per_word: 8,
            ..Default::default()
        }
    }

    fn rx(buf: &mut [u8], speed_hz: u32) -> Self {
        Self {
            rx_buf: buf.as_mut_ptr() as u64,
            len: buf.len() as u32,
            speed_hz,
            bits_per_word: 8,
            ..Default::default()
        }
    }
}

/// Configuration for opening a spidev device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinuxSpiConfig {
    /// Device path (e.g., "/dev/spidev0.0")
    pub device: String,
    /// SPI clock speed in Hz
    pub speed_hz: u32,
    /// SPI mode (0-3)
    pub mode: u8,
}

impl Default for LinuxSpiConfig {
    fn default() -> Self {
        Self {
            device: String::new(),
            speed_hz: DEFAULT_SPEED_HZ,
            mode: mode::MODE_0,
        }
    }
}

impl LinuxSpiConfig {
    /// Create a new configuration with the given device path
    pub fn new(device: impl Into<String>) -> Self {
        Self {
            device: device.into(),
            ..Default::default()
        }
    }

    /// Set the SPI clock speed in Hz
    pub fn with_speed(mut self, speed_hz: u32) -> Self {
        self.speed_hz = speed_hz;
        self
    }

    /// Set the SPI mode (0-3)
    pub fn with_mode(mut self, mode: u8) -> Self {
        self.mode = mode;
        self
    }
}

/// SPI NAND transport over spidev
pub struct LinuxSpi {
    file: File,
    max_transfer_len: usize,
    speed_hz: u32,
}

impl LinuxSpi {
    /// Open a spidev device with the given configuration
    pub fn open(config: &LinuxSpiConfig) -> Result<Self> {
        if config.device.is_empty() {
            return Err(LinuxSpiError::NoDevice);
        }

        log::debug!("linux_spi: Opening device {}", config.device);

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(&config.device)
            .map_err(|e| LinuxSpiError::OpenFailed {
                path: config.device.clone(),
                source: e,
            })?;

        let fd = file.as_raw_fd();

        let mode = config.mode;
        unsafe {
            ioctl::spi_ioc_wr_mode(fd, &mode).map_err(|e| LinuxSpiError::SetModeFailed {
                mode,
                source: std::io::Error::from_raw_os_error(e as i32),
            })?;
        }

        let bits: u8 = 8;
        unsafe {
            ioctl::spi_ioc_wr_bits_per_word(fd, &bits).map_err(|e| {
                LinuxSpiError::SetBitsPerWordFailed {
                    bits,
                    source: std::io::Error::from_raw_os_error(e as i32),
                }
            })?;
        }

        let speed = config.speed_hz;
        unsafe {
            ioctl::spi_ioc_wr_max_speed_hz(fd, &speed).map_err(|e| {
                LinuxSpiError::SetSpeedFailed {
                    speed,
                    source: std::io::Error::from_raw_os_error(e as i32),
                }
            })?;
        }

        let max_transfer_len = max_kernel_buf_size();
        log::info!(
            "linux_spi: Opened {} (mode={}, speed={} kHz, bufsiz={})",
            config.device,
            mode,
            speed / 1000,
            max_transfer_len
        );

        Ok(Self {
            file,
            max_transfer_len,
            speed_hz: speed,
        })
    }

    /// Open a device with default settings
    pub fn open_device(device: &str) -> Result<Self> {
        Self::open(&LinuxSpiConfig::new(device))
    }

    /// Current clock speed in Hz
    pub fn speed_hz(&self) -> u32 {
        self.speed_hz
    }

    /// Largest frame the kernel accepts in one message
    pub fn max_transfer_len(&self) -> usize {
        self.max_transfer_len
    }

    fn message(&mut self, write: &[u8], read: &mut [u8]) -> Result<()> {
        if write.is_empty() {
            return Err(LinuxSpiError::InvalidParameter(
                "command frame cannot be empty".into(),
            ));
        }
        let len = write.len() + read.len();
        if len > self.max_transfer_len {
            return Err(LinuxSpiError::TransferTooLarge {
                len,
                max: self.max_transfer_len,
            });
        }

        let mut transfers = vec![SpiIocTransfer::tx(write, self.speed_hz)];
        if !read.is_empty() {
            transfers.push(SpiIocTransfer::rx(read, self.speed_hz));
        }

        let ioctl_num = ioctl::spi_ioc_message(transfers.len() as u8);
        let ret = unsafe { libc::ioctl(self.file.as_raw_fd(), ioctl_num, transfers.as_ptr()) };
        if ret < 0 {
            return Err(LinuxSpiError::TransferFailed(
                std::io::Error::last_os_error(),
            ));
        }
        Ok(())
    }
}

impl SpiTransport for LinuxSpi {
    fn transfer(&mut self, buf: &mut [u8], write_len: usize, read_len: usize) -> CoreResult<()> {
        if buf.len() < write_len + read_len {
            return Err(CoreError::TransportFailure);
        }
        let (write, rest) = buf.split_at_mut(write_len);
        self.message(write, &mut rest[..read_len]).map_err(|e| {
            log::error!("linux_spi: {}", e);
            CoreError::TransportFailure
        })
    }

    fn delay_us(&mut self, us: u32) {
        std::thread::sleep(Duration::from_micros(us as u64));
    }
}

/// Read the spidev buffer size from sysfs, falling back to the page size
fn max_kernel_buf_size() -> usize {
    if let Ok(content) = std::fs::read_to_string(BUF_SIZE_SYSFS) {
        if let Ok(size) = content.trim().parse::<usize>() {
            if size > 0 {
                return size;
            }
        }
        log::warn!("linux_spi: Invalid buffer size in {}", BUF_SIZE_SYSFS);
    } else {
        log::debug!("linux_spi: Cannot read {}, using page size", BUF_SIZE_SYSFS);
    }

    unsafe { libc::sysconf(libc::_SC_PAGESIZE) as usize }
}

/// Parse transport options from `key=value` pairs
///
/// Recognized keys are `dev` (required), `spispeed` in kHz and `mode`.
pub fn parse_options(options: &[(&str, &str)]) -> Result<LinuxSpiConfig> {
    let mut config = LinuxSpiConfig::default();

    for (key, value) in options {
        match *key {
            "dev" => config.device = value.to_string(),
            "spispeed" => {
                let speed_khz: u32 = value.parse().map_err(|_| {
                    LinuxSpiError::InvalidParameter(format!("spispeed={}", value))
                })?;
                if speed_khz == 0 {
                    return Err(LinuxSpiError::InvalidParameter("spispeed=0".into()));
                }
                config.speed_hz = speed_khz.saturating_mul(1000);
            }
            "mode" => {
                let mode: u8 = value
                    .parse()
                    .ok()
                    .filter(|m| *m <= mode::MODE_3)
                    .ok_or_else(|| {
                        LinuxSpiError::InvalidParameter(format!("mode={} (must be 0-3)", value))
                    })?;
                config.mode = mode;
            }
            _ => log::warn!("linux_spi: Unknown option: {}={}", key, value),
        }
    }

    if config.device.is_empty() {
        return Err(LinuxSpiError::NoDevice);
    }

    Ok(config)
}
