//! Status polling
//!
//! After a state-changing command the device raises OIP until it is done.
//! The poller waits one interval, reads the status register and repeats
//! while OIP is set. The status of the final read is returned so the caller
//! can decode the failure bits.

use crate::error::{Error, Result};
use crate::spi::{opcodes, ScratchBuffer, Status};
use crate::transport::SpiTransport;

use super::read_status;

/// Default number of status reads before giving up (about 1.15s of polling
/// at the default interval)
pub const DEFAULT_MAX_POLLS: u32 = 10_000;

/// Status polling parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    /// Delay before each status read, in microseconds
    pub interval_us: u32,
    /// Maximum number of status reads before `Timeout`
    pub max_polls: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_us: opcodes::PAGE_READ_TIME_US,
            max_polls: DEFAULT_MAX_POLLS,
        }
    }
}

impl PollConfig {
    /// Set the delay before each status read
    pub fn with_interval_us(mut self, interval_us: u32) -> Self {
        self.interval_us = interval_us;
        self
    }

    /// Set the maximum number of status reads
    pub fn with_max_polls(mut self, max_polls: u32) -> Self {
        self.max_polls = max_polls;
        self
    }
}

/// Wait for the OIP (Operation In Progress) bit to clear
///
/// Performs exactly `k + 1` status reads for a device that reports busy `k`
/// times. Returns `Error::Timeout` once `max_polls` reads all came back
/// busy, and `Error::TransportFailure` as soon as a status read fails.
pub fn wait_ready<T: SpiTransport + ?Sized>(
    transport: &mut T,
    scratch: &mut ScratchBuffer,
    config: &PollConfig,
) -> Result<Status> {
    for poll in 1..=config.max_polls {
        transport.delay_us(config.interval_us);
        let status = read_status(transport, scratch)?;
        if !status.is_busy() {
            log::trace!(
                "spinand: ready after {} poll(s), status 0x{:02X}",
                poll,
                status.bits()
            );
            return Ok(status);
        }
    }

    log::warn!(
        "spinand: device still busy after {} status polls",
        config.max_polls
    );
    Err(Error::Timeout)
}
