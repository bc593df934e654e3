//! SPI NAND protocol implementation
//!
//! Single-command building blocks. Each function issues exactly one transfer
//! through the session's scratch buffer and reports transport failures
//! immediately. The multi-step page and block sequences in
//! [`crate::flash`] are composed from these.

use crate::chip::ID_RESPONSE_LEN;
use crate::error::Result;
use crate::spi::{opcodes, NandCommand, ScratchBuffer, Status};
use crate::transport::SpiTransport;

/// Read the identification bytes
///
/// Sends the opcode alone and clocks in [`ID_RESPONSE_LEN`] bytes; the first
/// of them is the dummy-byte slot some vendors use for their manufacturer ID.
/// Uses its own stack buffer so it can run before a session exists.
pub fn read_id<T: SpiTransport + ?Sized>(transport: &mut T) -> Result<[u8; ID_RESPONSE_LEN]> {
    let mut buf = [0u8; 1 + ID_RESPONSE_LEN];
    buf[0] = opcodes::READ_ID;
    transport.transfer(&mut buf, 1, ID_RESPONSE_LEN)?;

    let mut id = [0u8; ID_RESPONSE_LEN];
    id.copy_from_slice(&buf[1..]);
    log::debug!("spinand: READ_ID {:02X} {:02X} {:02X}", id[0], id[1], id[2]);
    Ok(id)
}

/// Read a feature register
pub fn get_feature<T: SpiTransport + ?Sized>(
    transport: &mut T,
    scratch: &mut ScratchBuffer,
    feature: u8,
) -> Result<u8> {
    let cmd = NandCommand::get_feature(opcodes::GET_FEATURE, feature);
    let data = scratch.exchange(transport, &cmd)?;
    Ok(data[0])
}

/// Write a feature register
pub fn set_feature<T: SpiTransport + ?Sized>(
    transport: &mut T,
    scratch: &mut ScratchBuffer,
    feature: u8,
    value: u8,
) -> Result<()> {
    let data = [value];
    let cmd = NandCommand::set_feature(opcodes::SET_FEATURE, feature, &data);
    scratch.exchange(transport, &cmd)?;
    Ok(())
}

/// Read the status register once
pub fn read_status<T: SpiTransport + ?Sized>(
    transport: &mut T,
    scratch: &mut ScratchBuffer,
) -> Result<Status> {
    get_feature(transport, scratch, opcodes::FEATURE_STATUS).map(Status::from_raw)
}

/// Send the Write Enable command
pub fn write_enable<T: SpiTransport + ?Sized>(
    transport: &mut T,
    scratch: &mut ScratchBuffer,
) -> Result<()> {
    scratch.exchange(transport, &NandCommand::simple(opcodes::WRITE_ENABLE))?;
    Ok(())
}

/// Send the Reset command
pub fn reset<T: SpiTransport + ?Sized>(
    transport: &mut T,
    scratch: &mut ScratchBuffer,
) -> Result<()> {
    scratch.exchange(transport, &NandCommand::simple(opcodes::RESET))?;
    Ok(())
}

/// Load the page at `row` from the array into the cache register
pub fn load_page<T: SpiTransport + ?Sized>(
    transport: &mut T,
    scratch: &mut ScratchBuffer,
    row: u32,
) -> Result<()> {
    scratch.exchange(transport, &NandCommand::row(opcodes::PAGE_READ, row))?;
    Ok(())
}

/// Read `buf.len()` bytes of the cache register starting at `column`
pub fn read_from_cache<T: SpiTransport + ?Sized>(
    transport: &mut T,
    scratch: &mut ScratchBuffer,
    column: u16,
    buf: &mut [u8],
) -> Result<()> {
    let cmd =
        NandCommand::column_read(opcodes::READ_FROM_CACHE, column, buf.len()).with_dummy_bytes(1);
    let data = scratch.exchange(transport, &cmd)?;
    buf.copy_from_slice(data);
    Ok(())
}

/// Load `data` into the cache register at `column`
pub fn program_load<T: SpiTransport + ?Sized>(
    transport: &mut T,
    scratch: &mut ScratchBuffer,
    column: u16,
    data: &[u8],
) -> Result<()> {
    let cmd = NandCommand::column_write(opcodes::PROGRAM_LOAD, column, data);
    scratch.exchange(transport, &cmd)?;
    Ok(())
}

/// Commit the cache register to the page at `row`
pub fn program_execute<T: SpiTransport + ?Sized>(
    transport: &mut T,
    scratch: &mut ScratchBuffer,
    row: u32,
) -> Result<()> {
    scratch.exchange(transport, &NandCommand::row(opcodes::PROGRAM_EXECUTE, row))?;
    Ok(())
}

/// Issue Block Erase for the block containing `row`
///
/// The device ignores the page bits of the row address.
pub fn erase_block<T: SpiTransport + ?Sized>(
    transport: &mut T,
    scratch: &mut ScratchBuffer,
    row: u32,
) -> Result<()> {
    scratch.exchange(transport, &NandCommand::row(opcodes::BLOCK_ERASE, row))?;
    Ok(())
}
