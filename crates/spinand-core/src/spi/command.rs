//! SPI NAND command structure

use super::AddressWidth;

/// Largest command header: opcode + 3 address bytes, or opcode + 2 column
/// bytes + 1 dummy byte
pub const MAX_HEADER_BYTES: usize = 4;

/// A single SPI NAND transaction
///
/// Describes what goes on the wire; the bytes themselves are packed into a
/// [`ScratchBuffer`](super::ScratchBuffer) when the command is exchanged.
#[derive(Debug, Clone, Copy)]
pub struct NandCommand<'a> {
    /// The opcode byte
    pub opcode: u8,

    /// Address (if any)
    pub address: Option<u32>,

    /// Address width
    pub address_width: AddressWidth,

    /// Number of dummy bytes after the address
    pub dummy_bytes: u8,

    /// Data to write after opcode/address/dummy
    pub write_data: &'a [u8],

    /// Number of bytes to read back after the write phase
    pub read_len: usize,
}

impl<'a> NandCommand<'a> {
    /// Create a simple command with no address or data (e.g. WRITE_ENABLE)
    pub const fn simple(opcode: u8) -> Self {
        Self {
            opcode,
            address: None,
            address_width: AddressWidth::None,
            dummy_bytes: 0,
            write_data: &[],
            read_len: 0,
        }
    }

    /// Read a feature register (GET_FEATURE)
    pub const fn get_feature(opcode: u8, feature: u8) -> Self {
        Self {
            opcode,
            address: Some(feature as u32),
            address_width: AddressWidth::Feature,
            dummy_bytes: 0,
            write_data: &[],
            read_len: 1,
        }
    }

    /// Write a feature register (SET_FEATURE)
    pub const fn set_feature(opcode: u8, feature: u8, value: &'a [u8]) -> Self {
        Self {
            opcode,
            address: Some(feature as u32),
            address_width: AddressWidth::Feature,
            dummy_bytes: 0,
            write_data: value,
            read_len: 0,
        }
    }

    /// Command carrying a 3-byte row address (PAGE_READ, PROGRAM_EXECUTE,
    /// BLOCK_ERASE)
    pub const fn row(opcode: u8, row: u32) -> Self {
        Self {
            opcode,
            address: Some(row),
            address_width: AddressWidth::Row,
            dummy_bytes: 0,
            write_data: &[],
            read_len: 0,
        }
    }

    /// Column-addressed write into the cache register (PROGRAM_LOAD)
    pub const fn column_write(opcode: u8, column: u16, data: &'a [u8]) -> Self {
        Self {
            opcode,
            address: Some(column as u32),
            address_width: AddressWidth::Column,
            dummy_bytes: 0,
            write_data: data,
            read_len: 0,
        }
    }

    /// Column-addressed read from the cache register (READ_FROM_CACHE)
    pub const fn column_read(opcode: u8, column: u16, len: usize) -> Self {
        Self {
            opcode,
            address: Some(column as u32),
            address_width: AddressWidth::Column,
            dummy_bytes: 0,
            write_data: &[],
            read_len: len,
        }
    }

    /// Set the number of dummy bytes
    pub const fn with_dummy_bytes(mut self, count: u8) -> Self {
        self.dummy_bytes = count;
        self
    }

    /// Number of header bytes (opcode + address + dummy)
    pub const fn header_len(&self) -> usize {
        1 + self.address_width.bytes() as usize + self.dummy_bytes as usize
    }

    /// Number of bytes sent on the wire
    pub const fn write_len(&self) -> usize {
        self.header_len() + self.write_data.len()
    }

    /// Total buffer space needed for the exchange
    pub const fn total_len(&self) -> usize {
        self.write_len() + self.read_len
    }

    /// Encode opcode, address and dummy bytes into `buf`
    ///
    /// `buf` must hold at least `header_len()` bytes.
    pub fn encode_header(&self, buf: &mut [u8]) {
        buf[0] = self.opcode;
        let addr_len = self.address_width.bytes() as usize;
        if let Some(addr) = self.address {
            self.address_width.encode(addr, &mut buf[1..1 + addr_len]);
        }
        for byte in &mut buf[1 + addr_len..self.header_len()] {
            *byte = 0;
        }
    }
}
