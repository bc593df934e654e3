//! List commands implementation

use super::format_size;
use crate::programmers;
use spinand_core::chip;

/// List all programmers compiled into this binary
pub fn list_programmers() {
    println!("{}", programmers::programmer_help());
}

/// List all supported chips
pub fn list_chips(vendor_filter: Option<&str>) {
    println!("Supported SPI NAND chips:");
    println!();
    println!(
        "{:<10} {:<18} {:>8} {:>6} {:>7} {:>9} {:>6}",
        "Vendor", "Name", "Size", "Page", "Pages", "Blocks", "ID"
    );
    println!("{}", "-".repeat(70));

    for nand in chip::all_chips() {
        if let Some(vendor) = vendor_filter {
            if !nand.vendor.to_lowercase().contains(&vendor.to_lowercase()) {
                continue;
            }
        }

        let geometry = &nand.geometry;
        println!(
            "{:<10} {:<18} {:>8} {:>6} {:>7} {:>9} {:02X} {:02X}",
            nand.vendor,
            nand.name,
            format_size(nand.total_size()),
            geometry.page_size_bytes,
            geometry.block_size_pages,
            geometry.blocks_count,
            nand.manufacturer_id,
            nand.device_id
        );
    }
}
