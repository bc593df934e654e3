//! NAND chip type definitions

/// Memory array geometry
///
/// Resolved once from the identification bytes and immutable afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeviceGeometry {
    /// Data bytes per page
    pub page_size_bytes: u16,
    /// Pages per erase block
    pub block_size_pages: u16,
    /// Number of erase blocks
    pub blocks_count: u16,
}

impl DeviceGeometry {
    /// Create a new geometry
    pub const fn new(page_size_bytes: u16, block_size_pages: u16, blocks_count: u16) -> Self {
        Self {
            page_size_bytes,
            block_size_pages,
            blocks_count,
        }
    }

    /// Size of an erase block in bytes
    pub const fn block_size_bytes(&self) -> u32 {
        self.page_size_bytes as u32 * self.block_size_pages as u32
    }

    /// Total number of pages
    pub const fn total_pages(&self) -> u32 {
        self.block_size_pages as u32 * self.blocks_count as u32
    }

    /// Total data capacity in bytes
    pub const fn total_size(&self) -> u64 {
        self.total_pages() as u64 * self.page_size_bytes as u64
    }

    /// Row address of `page` within `block`
    ///
    /// Pages per block is a power of two on every supported part, so this is
    /// the block index concatenated with the page index.
    pub const fn row_address(&self, block: u32, page: u32) -> u32 {
        block * self.block_size_pages as u32 + page
    }

    /// Block index of a row address
    pub const fn block_of(&self, row: u32) -> u32 {
        row / self.block_size_pages as u32
    }

    /// Page index within its block of a row address
    pub const fn page_in_block(&self, row: u32) -> u32 {
        row % self.block_size_pages as u32
    }

    /// Whether `row` addresses a page inside the array
    pub const fn contains_row(&self, row: u32) -> bool {
        row < self.total_pages()
    }
}

/// A known NAND device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NandChip {
    /// Vendor name
    pub vendor: &'static str,
    /// Part name
    pub name: &'static str,
    /// Manufacturer byte as reported by READ_ID
    pub manufacturer_id: u8,
    /// Device byte as reported by READ_ID
    pub device_id: u8,
    /// Memory array geometry
    pub geometry: DeviceGeometry,
}

impl NandChip {
    /// Total data capacity in bytes
    pub const fn total_size(&self) -> u64 {
        self.geometry.total_size()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_address_split() {
        let geometry = DeviceGeometry::new(2048, 64, 1024);
        let row = geometry.row_address(5, 17);
        assert_eq!(row, 5 * 64 + 17);
        assert_eq!(geometry.block_of(row), 5);
        assert_eq!(geometry.page_in_block(row), 17);
        assert!(geometry.contains_row(row));
        assert!(!geometry.contains_row(geometry.total_pages()));
    }

    #[test]
    fn test_sizes() {
        let geometry = DeviceGeometry::new(4096, 64, 2048);
        assert_eq!(geometry.block_size_bytes(), 256 * 1024);
        assert_eq!(geometry.total_size(), 512 * 1024 * 1024);
    }
}
