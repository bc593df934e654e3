//! Transport trait definitions

use crate::error::Result;

/// Blocking serial link to a SPI NAND chip
///
/// ## Transfer contract
///
/// `transfer()` clocks out the first `write_len` bytes of `buf`, then clocks
/// in `read_len` bytes and stores them in `buf[write_len..write_len + read_len]`,
/// all within one chip-select assertion. The driver always passes a buffer
/// of exactly `write_len + read_len` bytes with the opcode, address and
/// payload packed at its start.
///
/// A full-duplex implementation may also overwrite the written region with
/// whatever it received while sending; the driver never reads it back.
///
/// Any failure must be reported as `Err(Error::TransportFailure)`; the driver
/// aborts the enclosing operation immediately and does not retry.
///
/// ## Example
///
/// ```ignore
/// impl SpiTransport for MyBus {
///     fn transfer(&mut self, buf: &mut [u8], write_len: usize, read_len: usize) -> Result<()> {
///         let (tx, rx) = buf.split_at_mut(write_len);
///         self.select();
///         let res = self.write(tx).and_then(|_| self.read(&mut rx[..read_len]));
///         self.deselect();
///         res.map_err(|_| Error::TransportFailure)
///     }
///
///     fn delay_us(&mut self, us: u32) {
///         self.timer.block_for_us(us);
///     }
/// }
/// ```
pub trait SpiTransport {
    /// Write `write_len` bytes, then read `read_len` bytes after them
    fn transfer(&mut self, buf: &mut [u8], write_len: usize, read_len: usize) -> Result<()>;

    /// Block for at least the given number of microseconds
    fn delay_us(&mut self, us: u32);
}

impl<T: SpiTransport + ?Sized> SpiTransport for &mut T {
    fn transfer(&mut self, buf: &mut [u8], write_len: usize, read_len: usize) -> Result<()> {
        (**self).transfer(buf, write_len, read_len)
    }

    fn delay_us(&mut self, us: u32) {
        (**self).delay_us(us)
    }
}

// Blanket impl for boxed transports to allow trait objects
impl SpiTransport for alloc::boxed::Box<dyn SpiTransport + Send> {
    fn transfer(&mut self, buf: &mut [u8], write_len: usize, read_len: usize) -> Result<()> {
        (**self).transfer(buf, write_len, read_len)
    }

    fn delay_us(&mut self, us: u32) {
        (**self).delay_us(us)
    }
}
