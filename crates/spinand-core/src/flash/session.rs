//! NAND flash session
//!
//! A [`NandFlash`] owns its transport. `initialize()` identifies the device
//! and allocates the scratch buffer; `deinitialize()` drops both. Every
//! operation borrows the driver mutably, so one instance never runs two
//! sequences at once. To share a driver between threads, put it behind a
//! `Mutex`.

use crate::chip::{self, DeviceGeometry, NandChip};
use crate::error::{Error, Result};
use crate::protocol::{self, PollConfig};
use crate::spi::{opcodes, ScratchBuffer, Status};
use crate::transport::SpiTransport;

/// Live state of an initialized driver
#[derive(Debug)]
pub struct Session {
    /// The identified chip
    pub chip: &'static NandChip,
    scratch: ScratchBuffer,
}

impl Session {
    fn new(chip: &'static NandChip) -> Self {
        Self {
            chip,
            scratch: ScratchBuffer::new(chip.geometry.page_size_bytes as usize),
        }
    }

    /// Resolved geometry
    pub fn geometry(&self) -> &DeviceGeometry {
        &self.chip.geometry
    }

    /// Size of the owned transfer buffer
    pub fn scratch_len(&self) -> usize {
        self.scratch.capacity()
    }

    fn check_bounds(&self, column: u16, len: usize) -> Result<()> {
        let page_size = self.chip.geometry.page_size_bytes as usize;
        if column as usize + len > page_size {
            return Err(Error::DataTooBig);
        }
        Ok(())
    }

    fn check_row(&self, row: u32) -> Result<()> {
        if !self.chip.geometry.contains_row(row) {
            log::debug!("spinand: row 0x{:X} outside the device", row);
            return Err(Error::AddressOutOfRange);
        }
        Ok(())
    }
}

/// SPI NAND flash driver
pub struct NandFlash<T: SpiTransport> {
    transport: T,
    poll: PollConfig,
    session: Option<Session>,
}

impl<T: SpiTransport> NandFlash<T> {
    /// Create an uninitialized driver on top of `transport`
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            poll: PollConfig::default(),
            session: None,
        }
    }

    /// Replace the status polling parameters
    pub fn with_poll_config(mut self, poll: PollConfig) -> Self {
        self.poll = poll;
        self
    }

    /// Current status polling parameters
    pub fn poll_config(&self) -> &PollConfig {
        &self.poll
    }

    /// Identify the chip, resolve its geometry and allocate the scratch buffer
    ///
    /// Fails with `AlreadyInitialized` on a live driver, leaving the session
    /// untouched.
    pub fn initialize(&mut self) -> Result<&'static NandChip> {
        if self.session.is_some() {
            return Err(Error::AlreadyInitialized);
        }

        let id = protocol::read_id(&mut self.transport)?;
        let chip = chip::identify(&id).inspect_err(|e| {
            log::debug!("spinand: identification failed: {}", e);
        })?;

        log::info!(
            "spinand: found {} {} ({} x {} x {} bytes)",
            chip.vendor,
            chip.name,
            chip.geometry.blocks_count,
            chip.geometry.block_size_pages,
            chip.geometry.page_size_bytes
        );

        self.session = Some(Session::new(chip));
        Ok(chip)
    }

    /// Release the scratch buffer and forget the chip
    ///
    /// Calling this on an uninitialized driver does nothing.
    pub fn deinitialize(&mut self) {
        if self.session.take().is_some() {
            log::debug!("spinand: session closed");
        }
    }

    /// Whether `initialize()` has succeeded and no `deinitialize()` followed
    pub fn is_initialized(&self) -> bool {
        self.session.is_some()
    }

    /// The live session, if any
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// The identified chip, if initialized
    pub fn chip(&self) -> Option<&'static NandChip> {
        self.session.as_ref().map(|s| s.chip)
    }

    /// The resolved geometry, if initialized
    pub fn geometry(&self) -> Option<DeviceGeometry> {
        self.session.as_ref().map(|s| s.chip.geometry)
    }

    /// Page size in bytes, 0 before initialization
    pub fn page_size_bytes(&self) -> u16 {
        self.geometry().map_or(0, |g| g.page_size_bytes)
    }

    /// Block size in pages, 0 before initialization
    pub fn block_size_pages(&self) -> u16 {
        self.geometry().map_or(0, |g| g.block_size_pages)
    }

    /// Number of blocks, 0 before initialization
    pub fn blocks_count(&self) -> u16 {
        self.geometry().map_or(0, |g| g.blocks_count)
    }

    /// Borrow the transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Borrow the transport mutably
    ///
    /// Commands sent directly through it bypass the session.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Drop the session and hand the transport back
    pub fn into_transport(self) -> T {
        self.transport
    }

    fn live(&mut self) -> Result<(&mut T, &mut Session)> {
        match self.session.as_mut() {
            Some(session) => Ok((&mut self.transport, session)),
            None => Err(Error::NotInitialized),
        }
    }

    /// Poll the status register until the device is ready
    ///
    /// Returns the status byte of the final poll.
    pub fn read_status(&mut self) -> Result<Status> {
        let poll = self.poll;
        let (transport, session) = self.live()?;
        protocol::wait_ready(transport, &mut session.scratch, &poll)
    }

    /// Read the block lock feature register
    pub fn block_lock(&mut self) -> Result<u8> {
        let (transport, session) = self.live()?;
        protocol::get_feature(transport, &mut session.scratch, opcodes::FEATURE_BLOCK_LOCK)
    }

    /// Read `buf.len()` bytes from the page at `row`, starting at `column`
    ///
    /// Loads the page into the device cache, waits for completion, rejects
    /// the page as `BadBlock` if the ECC field reports an uncorrectable
    /// error, then reads the requested span out of the cache. Returns the
    /// number of bytes read. A `row` past the last page fails with
    /// `AddressOutOfRange` before anything is sent.
    pub fn page_read(&mut self, row: u32, column: u16, buf: &mut [u8]) -> Result<usize> {
        let poll = self.poll;
        let (transport, session) = self.live()?;
        session.check_row(row)?;
        session.check_bounds(column, buf.len())?;

        protocol::load_page(transport, &mut session.scratch, row)?;
        let status = protocol::wait_ready(transport, &mut session.scratch, &poll)?;
        if status.ecc_uncorrectable() {
            log::warn!("spinand: uncorrectable ECC error at row 0x{:06X}", row);
            return Err(Error::BadBlock);
        }

        protocol::read_from_cache(transport, &mut session.scratch, column, buf)?;
        Ok(buf.len())
    }

    /// Program `data` into the page at `row`, starting at `column`
    ///
    /// Returns the number of bytes written. No retry is attempted on failure.
    pub fn page_program(&mut self, row: u32, column: u16, data: &[u8]) -> Result<usize> {
        let poll = self.poll;
        let (transport, session) = self.live()?;
        session.check_row(row)?;
        session.check_bounds(column, data.len())?;

        protocol::write_enable(transport, &mut session.scratch)?;
        protocol::program_load(transport, &mut session.scratch, column, data)?;
        protocol::program_execute(transport, &mut session.scratch, row)?;

        let status = protocol::wait_ready(transport, &mut session.scratch, &poll)?;
        if status.program_failed() {
            log::warn!("spinand: program failed at row 0x{:06X}", row);
            return Err(Error::ProgramFailure);
        }
        Ok(data.len())
    }

    /// Erase the block containing the page at `row`
    ///
    /// The row address is sent as given; the device drops the page bits.
    pub fn block_erase(&mut self, row: u32) -> Result<()> {
        let poll = self.poll;
        let (transport, session) = self.live()?;
        session.check_row(row)?;

        protocol::write_enable(transport, &mut session.scratch)?;
        protocol::erase_block(transport, &mut session.scratch, row)?;

        let status = protocol::wait_ready(transport, &mut session.scratch, &poll)?;
        if status.erase_failed() {
            log::warn!("spinand: erase failed at row 0x{:06X}", row);
            return Err(Error::EraseFailure);
        }
        Ok(())
    }

    /// Reset the device and clear the block lock register
    ///
    /// Fresh parts power up with every block locked. Call this once after
    /// `initialize()` and before the first program or erase.
    pub fn reset_unlock(&mut self) -> Result<()> {
        let poll = self.poll;
        let (transport, session) = self.live()?;

        protocol::reset(transport, &mut session.scratch)?;
        protocol::wait_ready(transport, &mut session.scratch, &poll)?;
        protocol::set_feature(
            transport,
            &mut session.scratch,
            opcodes::FEATURE_BLOCK_LOCK,
            0x00,
        )?;
        log::debug!("spinand: device reset, all blocks unlocked");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    /// Counts transfers; answers READ_ID with a fixed response and status
    /// reads with "ready"
    struct Counting {
        id: [u8; 3],
        transfers: usize,
        opcodes: Vec<u8>,
    }

    impl Counting {
        fn toshiba() -> Self {
            Self {
                id: [0x00, 0x98, 0xCD],
                transfers: 0,
                opcodes: Vec::new(),
            }
        }
    }

    impl SpiTransport for Counting {
        fn transfer(&mut self, buf: &mut [u8], write_len: usize, read_len: usize) -> Result<()> {
            self.transfers += 1;
            self.opcodes.push(buf[0]);
            if buf[0] == opcodes::READ_ID {
                buf[1..4].copy_from_slice(&self.id);
            } else {
                buf[write_len..write_len + read_len].fill(0);
            }
            Ok(())
        }

        fn delay_us(&mut self, _us: u32) {}
    }

    #[test]
    fn test_accessors_before_initialize() {
        let flash = NandFlash::new(Counting::toshiba());
        assert!(!flash.is_initialized());
        assert_eq!(flash.page_size_bytes(), 0);
        assert_eq!(flash.block_size_pages(), 0);
        assert_eq!(flash.blocks_count(), 0);
        assert!(flash.chip().is_none());
    }

    #[test]
    fn test_operations_require_initialize() {
        let mut flash = NandFlash::new(Counting::toshiba());
        let mut buf = [0u8; 4];
        assert_eq!(flash.page_read(0, 0, &mut buf), Err(Error::NotInitialized));
        assert_eq!(flash.page_program(0, 0, &buf), Err(Error::NotInitialized));
        assert_eq!(flash.block_erase(0), Err(Error::NotInitialized));
        assert_eq!(flash.reset_unlock(), Err(Error::NotInitialized));
        assert_eq!(flash.read_status(), Err(Error::NotInitialized));
        assert_eq!(flash.transport().transfers, 0);
    }

    #[test]
    fn test_initialize_lifecycle() {
        let mut flash = NandFlash::new(Counting::toshiba());
        let chip = flash.initialize().unwrap();
        assert_eq!(chip.geometry, DeviceGeometry::new(4096, 64, 2048));
        assert_eq!(flash.page_size_bytes(), 4096);
        assert_eq!(flash.block_size_pages(), 64);
        assert_eq!(flash.blocks_count(), 2048);
        assert_eq!(flash.session().unwrap().scratch_len(), 4096 + 4);

        assert_eq!(flash.initialize(), Err(Error::AlreadyInitialized));
        assert_eq!(flash.transport().transfers, 1);
        assert!(flash.is_initialized());

        flash.deinitialize();
        assert_eq!(flash.page_size_bytes(), 0);
        flash.deinitialize();

        assert!(flash.initialize().is_ok());
        assert_eq!(flash.transport().transfers, 2);
    }

    #[test]
    fn test_unknown_device_leaves_driver_uninitialized() {
        let mut link = Counting::toshiba();
        link.id = [0xEF, 0xAA, 0x21];
        let mut flash = NandFlash::new(link);
        assert!(matches!(
            flash.initialize(),
            Err(Error::UnknownDevice { .. })
        ));
        assert!(!flash.is_initialized());
        assert_eq!(flash.blocks_count(), 0);
    }

    #[test]
    fn test_out_of_bounds_issue_no_transfer() {
        let mut flash = NandFlash::new(Counting::toshiba());
        flash.initialize().unwrap();
        let before = flash.transport().transfers;

        let mut big = alloc::vec![0u8; 4097];
        assert_eq!(flash.page_read(0, 0, &mut big), Err(Error::DataTooBig));
        assert_eq!(flash.page_program(0, 0, &big), Err(Error::DataTooBig));

        let mut tail = [0u8; 2];
        assert_eq!(flash.page_read(0, 4095, &mut tail), Err(Error::DataTooBig));
        assert_eq!(flash.page_program(0, 4095, &tail), Err(Error::DataTooBig));

        assert_eq!(flash.transport().transfers, before);
    }

    #[test]
    fn test_rows_past_the_device_issue_no_transfer() {
        let mut flash = NandFlash::new(Counting::toshiba());
        flash.initialize().unwrap();
        let before = flash.transport().transfers;
        let mut buf = [0u8; 4];

        // 2048 blocks of 64 pages
        for row in [131_072, 0x0100_0000, u32::MAX] {
            assert_eq!(
                flash.page_read(row, 0, &mut buf),
                Err(Error::AddressOutOfRange)
            );
            assert_eq!(
                flash.page_program(row, 0, &buf),
                Err(Error::AddressOutOfRange)
            );
            assert_eq!(flash.block_erase(row), Err(Error::AddressOutOfRange));
        }
        assert_eq!(flash.transport().transfers, before);

        assert_eq!(flash.page_read(131_071, 0, &mut buf), Ok(4));
        assert_eq!(flash.block_erase(131_071), Ok(()));
    }

    #[test]
    fn test_full_page_fits_scratch() {
        let mut flash = NandFlash::new(Counting::toshiba());
        flash.initialize().unwrap();

        let mut page = alloc::vec![0xFFu8; 4096];
        assert_eq!(flash.page_read(3, 0, &mut page), Ok(4096));
        assert_eq!(flash.page_program(3, 0, &page), Ok(4096));
    }

    #[test]
    fn test_reset_unlock_sequence() {
        let mut flash = NandFlash::new(Counting::toshiba());
        flash.initialize().unwrap();
        flash.transport_mut().opcodes.clear();

        flash.reset_unlock().unwrap();
        assert_eq!(
            flash.transport().opcodes,
            [opcodes::RESET, opcodes::GET_FEATURE, opcodes::SET_FEATURE]
        );
    }
}
