//! Owned scratch buffer for command exchanges

use alloc::vec;
use alloc::vec::Vec;

use super::{NandCommand, MAX_HEADER_BYTES};
use crate::error::{Error, Result};
use crate::transport::SpiTransport;

/// Reusable transfer buffer owned by a session
///
/// Sized for one full page of payload plus the largest command header, so a
/// whole-page program load or cache read fits in a single exchange.
#[derive(Debug)]
pub struct ScratchBuffer {
    buf: Vec<u8>,
}

impl ScratchBuffer {
    /// Allocate a buffer able to carry `payload` data bytes plus a header
    pub fn new(payload: usize) -> Self {
        Self {
            buf: vec![0u8; payload + MAX_HEADER_BYTES],
        }
    }

    /// Total size in bytes
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Largest payload (write data or read-back) a single command can carry
    pub fn payload_capacity(&self) -> usize {
        self.buf.len() - MAX_HEADER_BYTES
    }

    /// Pack `cmd` contiguously, run one transfer and return the read-back bytes
    ///
    /// Fails with `DataTooBig` without touching the transport if the command
    /// does not fit, or if its write data or read-back alone exceeds
    /// [`payload_capacity()`](Self::payload_capacity).
    pub fn exchange<T: SpiTransport + ?Sized>(
        &mut self,
        transport: &mut T,
        cmd: &NandCommand<'_>,
    ) -> Result<&[u8]> {
        let header_len = cmd.header_len();
        let write_len = cmd.write_len();
        let total = cmd.total_len();
        let payload = self.payload_capacity();
        if cmd.write_data.len() > payload || cmd.read_len > payload || total > self.buf.len() {
            return Err(Error::DataTooBig);
        }

        cmd.encode_header(&mut self.buf[..header_len]);
        self.buf[header_len..write_len].copy_from_slice(cmd.write_data);

        log::trace!(
            "spinand: cmd 0x{:02X} write {} read {}",
            cmd.opcode,
            write_len,
            cmd.read_len
        );
        transport.transfer(&mut self.buf[..total], write_len, cmd.read_len)?;

        Ok(&self.buf[write_len..total])
    }
}
