//! Probe, status and unlock commands

use super::{format_size, CmdResult};
use spinand_core::flash::NandFlash;
use spinand_core::spi::EccStatus;
use spinand_core::transport::SpiTransport;

/// Print the identified chip
pub fn run_probe<T: SpiTransport>(flash: &NandFlash<T>) -> CmdResult {
    let nand = flash.chip().ok_or("No chip identified")?;
    let geometry = &nand.geometry;

    println!("Found SPI NAND chip:");
    println!("  Vendor:  {}", nand.vendor);
    println!("  Name:    {}", nand.name);
    println!(
        "  ID:      {:02X} {:02X}",
        nand.manufacturer_id, nand.device_id
    );
    println!(
        "  Size:    {} ({} bytes)",
        format_size(nand.total_size()),
        nand.total_size()
    );
    println!("  Page:    {} bytes", geometry.page_size_bytes);
    println!(
        "  Block:   {} pages ({})",
        geometry.block_size_pages,
        format_size(geometry.block_size_bytes() as u64)
    );
    println!("  Blocks:  {}", geometry.blocks_count);
    Ok(())
}

/// Print the status and block lock registers
pub fn run_status<T: SpiTransport>(flash: &mut NandFlash<T>) -> CmdResult {
    let status = flash.read_status()?;
    let lock = flash.block_lock()?;

    let ecc = match status.ecc() {
        EccStatus::NoError => "no errors",
        EccStatus::Corrected => "corrected",
        EccStatus::CorrectedAtLimit => "corrected at limit",
        EccStatus::Uncorrectable => "uncorrectable",
    };

    println!("Status register: 0x{:02X}", status.bits());
    println!("  Write enabled:   {}", status.write_enabled());
    println!("  Erase failed:    {}", status.erase_failed());
    println!("  Program failed:  {}", status.program_failed());
    println!("  Last read ECC:   {}", ecc);
    println!(
        "Block lock:      0x{:02X} ({})",
        lock,
        if lock == 0 { "unlocked" } else { "locked" }
    );
    Ok(())
}

/// Reset the chip and clear every block lock bit
pub fn run_unlock<T: SpiTransport>(flash: &mut NandFlash<T>) -> CmdResult {
    flash.reset_unlock()?;
    let lock = flash.block_lock()?;
    if lock != 0 {
        let msg = format!("Block lock still 0x{:02X} after unlock", lock);
        return Err(msg.into());
    }
    println!("Chip reset and unlocked");
    Ok(())
}
