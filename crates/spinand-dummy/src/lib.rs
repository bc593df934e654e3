//! spinand-dummy - In-memory SPI NAND emulator for testing
//!
//! This crate provides a transport that decodes the raw command frames the
//! driver sends and answers them like a SPI NAND chip would. Pages are
//! stored sparsely, so the full address range of a multi-gigabit part costs
//! nothing until it is written.
//!
//! Faults can be injected per page, per block or per opcode to exercise the
//! driver's failure paths.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

use alloc::collections::{BTreeMap, BTreeSet};
use alloc::vec;
use alloc::vec::Vec;

use spinand_core::chip::{self, DeviceGeometry, NandChip, ID_RESPONSE_LEN};
use spinand_core::error::{Error, Result};
use spinand_core::spi::opcodes;
use spinand_core::transport::SpiTransport;

/// Block lock register value after power-on: all blocks locked
pub const BLOCK_LOCK_ALL: u8 = 0x38;

/// Configuration for the dummy NAND
#[derive(Debug, Clone)]
pub struct DummyConfig {
    /// Bytes returned after the READ_ID opcode
    pub id: [u8; ID_RESPONSE_LEN],
    /// Array geometry
    pub geometry: DeviceGeometry,
    /// Status reads that report OIP after each array operation
    pub busy_polls: u32,
    /// Block lock register value at power-on
    pub power_on_lock: u8,
}

impl Default for DummyConfig {
    fn default() -> Self {
        // GD5F1GQ4U is the smallest part in the table
        match chip::find_by_name("GD5F1GQ4U") {
            Some(chip) => Self::for_chip(chip),
            None => Self {
                id: [chip::MFR_GIGADEVICE, 0xB1, 0x00],
                geometry: DeviceGeometry::new(2048, 64, 1024),
                busy_polls: 2,
                power_on_lock: BLOCK_LOCK_ALL,
            },
        }
    }
}

impl DummyConfig {
    /// Emulate a chip from the descriptor table
    pub fn for_chip(chip: &NandChip) -> Self {
        Self {
            id: chip::id_response(chip),
            geometry: chip.geometry,
            busy_polls: 2,
            power_on_lock: BLOCK_LOCK_ALL,
        }
    }

    /// Set the number of busy status reads after each array operation
    pub fn with_busy_polls(mut self, busy_polls: u32) -> Self {
        self.busy_polls = busy_polls;
        self
    }

    /// Set the block lock register value at power-on
    pub fn with_power_on_lock(mut self, lock: u8) -> Self {
        self.power_on_lock = lock;
        self
    }
}

/// Injected faults
#[derive(Debug, Default, Clone)]
struct Faults {
    failing_opcode: Option<u8>,
    program_fail_rows: BTreeSet<u32>,
    erase_fail_blocks: BTreeSet<u32>,
    uncorrectable_rows: BTreeSet<u32>,
    never_ready: bool,
}

/// Dummy SPI NAND chip
///
/// Emulates the cache register, the write enable latch, the block lock
/// register and the busy window of a SPI NAND device.
pub struct DummyNand {
    config: DummyConfig,
    pages: BTreeMap<u32, Vec<u8>>,
    cache: Vec<u8>,
    status: u8,
    busy_remaining: u32,
    block_lock: u8,
    faults: Faults,
    opcode_log: Vec<u8>,
    status_reads: usize,
    delay_total_us: u64,
}

impl DummyNand {
    /// Create a new, fully erased dummy NAND
    pub fn new(config: DummyConfig) -> Self {
        let page_size = config.geometry.page_size_bytes as usize;
        Self {
            block_lock: config.power_on_lock,
            config,
            pages: BTreeMap::new(),
            cache: vec![0xFF; page_size],
            status: 0,
            busy_remaining: 0,
            faults: Faults::default(),
            opcode_log: Vec::new(),
            status_reads: 0,
            delay_total_us: 0,
        }
    }

    /// Create a dummy NAND with the default configuration (GD5F1GQ4U)
    pub fn new_default() -> Self {
        Self::new(DummyConfig::default())
    }

    /// Get the configuration
    pub fn config(&self) -> &DummyConfig {
        &self.config
    }

    /// Contents of the page at `row` (all 0xFF if never programmed)
    pub fn page(&self, row: u32) -> Vec<u8> {
        match self.pages.get(&row) {
            Some(page) => page.clone(),
            None => vec![0xFF; self.page_size()],
        }
    }

    /// Overwrite the page at `row`, bypassing program semantics
    pub fn set_page(&mut self, row: u32, data: &[u8]) {
        let mut page = vec![0xFF; self.page_size()];
        let len = core::cmp::min(data.len(), page.len());
        page[..len].copy_from_slice(&data[..len]);
        self.pages.insert(row, page);
    }

    /// Number of pages holding programmed data
    pub fn programmed_pages(&self) -> usize {
        self.pages.len()
    }

    /// Current block lock register value
    pub fn block_lock(&self) -> u8 {
        self.block_lock
    }

    /// Every opcode received, in order
    pub fn opcode_log(&self) -> &[u8] {
        &self.opcode_log
    }

    /// Forget the opcode log and counters
    pub fn clear_log(&mut self) {
        self.opcode_log.clear();
        self.status_reads = 0;
        self.delay_total_us = 0;
    }

    /// Number of status register reads served
    pub fn status_reads(&self) -> usize {
        self.status_reads
    }

    /// Sum of all requested delays
    pub fn delay_total_us(&self) -> u64 {
        self.delay_total_us
    }

    /// Fail every transfer starting with `opcode`
    pub fn fail_transfers_with(&mut self, opcode: Option<u8>) {
        self.faults.failing_opcode = opcode;
    }

    /// Report a program failure for the page at `row`
    pub fn fail_program_at(&mut self, row: u32) {
        self.faults.program_fail_rows.insert(row);
    }

    /// Report an erase failure for `block`
    pub fn fail_erase_at(&mut self, block: u32) {
        self.faults.erase_fail_blocks.insert(block);
    }

    /// Report an uncorrectable ECC error when the page at `row` is loaded
    pub fn mark_uncorrectable(&mut self, row: u32) {
        self.faults.uncorrectable_rows.insert(row);
    }

    /// Keep OIP set forever
    pub fn set_never_ready(&mut self, never_ready: bool) {
        self.faults.never_ready = never_ready;
    }

    fn page_size(&self) -> usize {
        self.config.geometry.page_size_bytes as usize
    }

    fn start_operation(&mut self) {
        self.busy_remaining = self.config.busy_polls;
    }

    fn write_enabled(&self) -> bool {
        self.status & opcodes::SR_WEL != 0
    }

    fn row_address(frame: &[u8]) -> Result<u32> {
        if frame.len() < 4 {
            return Err(Error::TransportFailure);
        }
        Ok(u32::from_be_bytes([0, frame[1], frame[2], frame[3]]))
    }

    fn column_address(frame: &[u8]) -> Result<usize> {
        if frame.len() < 3 {
            return Err(Error::TransportFailure);
        }
        Ok(((frame[1] as usize) << 8) | frame[2] as usize)
    }

    fn handle_get_feature(&mut self, frame: &[u8], out: &mut [u8]) -> Result<()> {
        let feature = *frame.get(1).ok_or(Error::TransportFailure)?;
        let value = match feature {
            opcodes::FEATURE_STATUS => {
                self.status_reads += 1;
                let mut status = self.status;
                if self.faults.never_ready || self.busy_remaining > 0 {
                    status |= opcodes::SR_OIP;
                    self.busy_remaining = self.busy_remaining.saturating_sub(1);
                }
                status
            }
            opcodes::FEATURE_BLOCK_LOCK => self.block_lock,
            _ => 0,
        };
        if let Some(byte) = out.first_mut() {
            *byte = value;
        }
        Ok(())
    }

    fn handle_set_feature(&mut self, frame: &[u8]) -> Result<()> {
        if frame.len() < 3 {
            return Err(Error::TransportFailure);
        }
        if frame[1] == opcodes::FEATURE_BLOCK_LOCK {
            self.block_lock = frame[2];
        }
        Ok(())
    }

    fn handle_page_read(&mut self, frame: &[u8]) -> Result<()> {
        let row = Self::row_address(frame)?;
        self.cache = self.page(row);
        self.status &= !opcodes::SR_ECC_MASK;
        if self.faults.uncorrectable_rows.contains(&row) {
            self.status |= opcodes::SR_ECC_MASK;
        }
        self.start_operation();
        Ok(())
    }

    fn handle_read_from_cache(&mut self, frame: &[u8], out: &mut [u8]) -> Result<()> {
        let column = Self::column_address(frame)?;
        for (i, byte) in out.iter_mut().enumerate() {
            *byte = self.cache.get(column + i).copied().unwrap_or(0xFF);
        }
        Ok(())
    }

    fn handle_program_load(&mut self, frame: &[u8]) -> Result<()> {
        let column = Self::column_address(frame)?;
        // PROGRAM_LOAD resets the unaddressed part of the cache to 0xFF
        self.cache.fill(0xFF);
        for (i, &byte) in frame[3..].iter().enumerate() {
            if let Some(slot) = self.cache.get_mut(column + i) {
                *slot = byte;
            }
        }
        Ok(())
    }

    fn handle_program_execute(&mut self, frame: &[u8]) -> Result<()> {
        let row = Self::row_address(frame)?;
        if !self.write_enabled() {
            log::debug!("dummy: PROGRAM_EXECUTE without WEL ignored");
            return Ok(());
        }
        self.status &= !(opcodes::SR_WEL | opcodes::SR_P_FAIL);
        self.start_operation();

        if self.block_lock != 0 || self.faults.program_fail_rows.contains(&row) {
            self.status |= opcodes::SR_P_FAIL;
            return Ok(());
        }

        // NAND programming: can only change 1 -> 0
        let mut page = self.page(row);
        for (cell, &byte) in page.iter_mut().zip(self.cache.iter()) {
            *cell &= byte;
        }
        self.pages.insert(row, page);
        Ok(())
    }

    fn handle_block_erase(&mut self, frame: &[u8]) -> Result<()> {
        let row = Self::row_address(frame)?;
        if !self.write_enabled() {
            log::debug!("dummy: BLOCK_ERASE without WEL ignored");
            return Ok(());
        }
        self.status &= !(opcodes::SR_WEL | opcodes::SR_E_FAIL);
        self.start_operation();

        let block = self.config.geometry.block_of(row);
        if self.block_lock != 0 || self.faults.erase_fail_blocks.contains(&block) {
            self.status |= opcodes::SR_E_FAIL;
            return Ok(());
        }

        let first = self.config.geometry.row_address(block, 0);
        let last = first + self.config.geometry.block_size_pages as u32;
        self.pages.retain(|&r, _| r < first || r >= last);
        Ok(())
    }

    fn handle_reset(&mut self) {
        self.status = 0;
        self.cache.fill(0xFF);
        self.start_operation();
    }
}

impl SpiTransport for DummyNand {
    fn transfer(&mut self, buf: &mut [u8], write_len: usize, read_len: usize) -> Result<()> {
        if write_len == 0 || buf.len() < write_len + read_len {
            return Err(Error::TransportFailure);
        }
        let opcode = buf[0];
        self.opcode_log.push(opcode);
        if self.faults.failing_opcode == Some(opcode) {
            return Err(Error::TransportFailure);
        }

        let (frame, rest) = buf.split_at_mut(write_len);
        let out = &mut rest[..read_len];

        match opcode {
            opcodes::READ_ID => {
                for (i, byte) in out.iter_mut().enumerate() {
                    *byte = self.config.id.get(i).copied().unwrap_or(0);
                }
                Ok(())
            }
            opcodes::GET_FEATURE => self.handle_get_feature(frame, out),
            opcodes::SET_FEATURE => self.handle_set_feature(frame),
            opcodes::WRITE_ENABLE => {
                self.status |= opcodes::SR_WEL;
                Ok(())
            }
            opcodes::RESET => {
                self.handle_reset();
                Ok(())
            }
            opcodes::PAGE_READ => self.handle_page_read(frame),
            opcodes::READ_FROM_CACHE => self.handle_read_from_cache(frame, out),
            opcodes::PROGRAM_LOAD => self.handle_program_load(frame),
            opcodes::PROGRAM_EXECUTE => self.handle_program_execute(frame),
            opcodes::BLOCK_ERASE => self.handle_block_erase(frame),

            // Unknown opcode
            _ => {
                log::warn!("dummy: unsupported opcode 0x{:02X}", opcode);
                Err(Error::TransportFailure)
            }
        }
    }

    fn delay_us(&mut self, us: u32) {
        // No delay needed for in-memory operations
        self.delay_total_us += us as u64;
    }
}
