//! Erase command implementation

use super::{progress_bar, CmdResult};
use spinand_core::flash::NandFlash;
use spinand_core::transport::SpiTransport;
use spinand_core::Error;
use std::ops::Range;

/// Run the erase command
pub fn run_erase<T: SpiTransport>(flash: &mut NandFlash<T>, blocks: Range<u32>) -> CmdResult {
    let count = blocks.len();
    let (start, end) = (blocks.start, blocks.end);
    erase_blocks(flash, blocks)?;
    println!("Erased {} block(s) ({}..{})", count, start, end);
    Ok(())
}

/// Erase every block in `blocks`, stopping at the first failure
pub fn erase_blocks<T: SpiTransport>(flash: &mut NandFlash<T>, blocks: Range<u32>) -> CmdResult {
    let geometry = flash.geometry().ok_or(Error::NotInitialized)?;
    let block_bytes = geometry.block_size_bytes() as u64;
    let pb = progress_bar(blocks.len() as u64 * block_bytes, "Erasing");

    for block in blocks {
        if let Err(e) = flash.block_erase(geometry.row_address(block, 0)) {
            pb.abandon();
            return Err(format!("Erase of block {} failed: {}", block, e).into());
        }
        pb.inc(block_bytes);
    }

    pb.finish_with_message("Erase complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use spinand_dummy::{DummyConfig, DummyNand};

    #[test]
    fn test_erase_blocks_stops_at_failure() {
        let mut nand = DummyNand::new(DummyConfig::default().with_power_on_lock(0));
        nand.set_page(0, &[0x00; 4]);
        nand.set_page(128, &[0x00; 4]);
        nand.fail_erase_at(1);
        let mut flash = NandFlash::new(nand);
        flash.initialize().unwrap();

        assert!(erase_blocks(&mut flash, 0..3).is_err());
        // Block 0 erased, block 2 never reached
        assert_eq!(flash.transport().programmed_pages(), 1);
        assert_eq!(flash.transport().page(128)[0], 0x00);
    }
}
