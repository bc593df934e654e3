//! Closure-based transport configuration

use super::SpiTransport;
use crate::error::{Error, Result};

/// Transport built from a transfer function and a delay function
///
/// Lets a caller hand the driver two plain callbacks instead of
/// implementing [`SpiTransport`] on a type of its own. The transfer callback
/// follows the [`SpiTransport::transfer`] contract; any `Err` it returns is
/// reported as `TransportFailure`.
///
/// ```ignore
/// let config = SessionConfig::new(
///     |buf: &mut [u8], write_len, read_len| spi.write_then_read(buf, write_len, read_len),
///     |us| delay.delay_us(us),
/// );
/// let mut flash = NandFlash::new(config);
/// ```
pub struct SessionConfig<F, D> {
    transfer: F,
    delay: D,
}

impl<F, D> SessionConfig<F, D> {
    /// Bundle the two callbacks
    pub fn new(transfer: F, delay: D) -> Self {
        Self { transfer, delay }
    }
}

impl<F, D, E> SpiTransport for SessionConfig<F, D>
where
    F: FnMut(&mut [u8], usize, usize) -> core::result::Result<(), E>,
    D: FnMut(u32),
{
    fn transfer(&mut self, buf: &mut [u8], write_len: usize, read_len: usize) -> Result<()> {
        (self.transfer)(buf, write_len, read_len).map_err(|_| Error::TransportFailure)
    }

    fn delay_us(&mut self, us: u32) {
        (self.delay)(us)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_callbacks_are_forwarded() {
        let mut delays = 0u32;
        {
            let mut config = SessionConfig::new(
                |buf: &mut [u8], write_len: usize, read_len: usize| {
                    if buf[0] == 0xEE {
                        return Err(());
                    }
                    buf[write_len..write_len + read_len].fill(0x5A);
                    Ok(())
                },
                |us: u32| delays += us,
            );

            let mut buf = [0x0F, 0xC0, 0x00];
            assert_eq!(config.transfer(&mut buf, 2, 1), Ok(()));
            assert_eq!(buf[2], 0x5A);

            let mut bad = [0xEE];
            assert_eq!(
                config.transfer(&mut bad, 1, 0),
                Err(Error::TransportFailure)
            );

            config.delay_us(115);
            config.delay_us(115);
        }
        assert_eq!(delays, 230);
    }
}
