//! Address width types

/// Address width for SPI NAND commands
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AddressWidth {
    /// No address phase
    #[default]
    None,
    /// 1-byte feature register address
    Feature,
    /// 2-byte column address (byte offset within the cache register)
    Column,
    /// 3-byte row address (block index + page index)
    Row,
}

impl AddressWidth {
    /// Returns the number of address bytes
    pub const fn bytes(&self) -> u8 {
        match self {
            Self::None => 0,
            Self::Feature => 1,
            Self::Column => 2,
            Self::Row => 3,
        }
    }

    /// Encode an address into bytes, most significant first
    ///
    /// Bits above the width are dropped.
    pub fn encode(&self, address: u32, buf: &mut [u8]) {
        match self {
            Self::None => {}
            Self::Feature => {
                buf[0] = address as u8;
            }
            Self::Column => {
                buf[0] = (address >> 8) as u8;
                buf[1] = address as u8;
            }
            Self::Row => {
                buf[0] = (address >> 16) as u8;
                buf[1] = (address >> 8) as u8;
                buf[2] = address as u8;
            }
        }
    }
}
