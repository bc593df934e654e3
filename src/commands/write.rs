//! Write command implementation

use super::erase::erase_blocks;
use super::{progress_bar, CmdResult};
use spinand_core::flash::NandFlash;
use spinand_core::transport::SpiTransport;
use spinand_core::Error;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Options for [`write_image`]
#[derive(Debug, Clone, Copy)]
pub struct WriteOptions {
    /// First block of the image
    pub start_block: u32,
    /// Erase the covered blocks first
    pub erase: bool,
    /// Read the image back afterwards
    pub verify: bool,
}

/// Statistics from a write
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct WriteStats {
    /// Pages programmed
    pub pages_written: usize,
    /// Erased pages left untouched
    pub pages_skipped: usize,
    /// Blocks erased before programming
    pub blocks_erased: usize,
}

/// Run the write command
pub fn run_write<T: SpiTransport>(
    flash: &mut NandFlash<T>,
    input: &Path,
    options: WriteOptions,
) -> CmdResult {
    let mut file = File::open(input)?;
    let mut data = Vec::new();
    file.read_to_end(&mut data)?;
    println!("Read {} bytes from {:?}", data.len(), input);

    let stats = write_image(flash, &data, options)?;

    println!(
        "Programmed {} page(s), skipped {} blank page(s)",
        stats.pages_written, stats.pages_skipped
    );
    if options.verify {
        println!("Verification passed!");
    }
    Ok(())
}

/// Program `data` page by page starting at the first page of `start_block`
///
/// The last page is padded with 0xFF. Pages that are entirely 0xFF are not
/// programmed, since an erased page already holds them.
pub fn write_image<T: SpiTransport>(
    flash: &mut NandFlash<T>,
    data: &[u8],
    options: WriteOptions,
) -> CmdResult<WriteStats> {
    let geometry = flash.geometry().ok_or(Error::NotInitialized)?;
    let page_size = geometry.page_size_bytes as usize;
    let block_bytes = geometry.block_size_bytes() as usize;

    if data.is_empty() {
        return Err("Input file is empty".into());
    }
    let blocks_needed = data.len().div_ceil(block_bytes) as u32;
    let blocks = super::block_range(&geometry, options.start_block, Some(blocks_needed))
        .map_err(|e| format!("Image does not fit: {}", e))?;

    let mut stats = WriteStats::default();
    if options.erase {
        stats.blocks_erased = blocks.len();
        erase_blocks(flash, blocks.clone())?;
    }

    let first_row = geometry.row_address(blocks.start, 0);
    let mut page = vec![0xFF; page_size];
    let pb = progress_bar(data.len() as u64, "Writing");

    for (row, chunk) in (first_row..).zip(data.chunks(page_size)) {
        page.fill(0xFF);
        page[..chunk.len()].copy_from_slice(chunk);

        if page.iter().all(|&b| b == 0xFF) {
            stats.pages_skipped += 1;
        } else {
            if let Err(e) = flash.page_program(row, 0, &page) {
                pb.abandon();
                return Err(format!("Program of row {} failed: {}", row, e).into());
            }
            stats.pages_written += 1;
        }
        pb.inc(chunk.len() as u64);
    }
    pb.finish_with_message("Write complete");

    if options.verify {
        verify_image(flash, first_row, data)?;
    }
    Ok(stats)
}

/// Compare flash contents starting at `first_row` with `expected`
pub fn verify_image<T: SpiTransport>(
    flash: &mut NandFlash<T>,
    first_row: u32,
    expected: &[u8],
) -> CmdResult {
    let page_size = flash.page_size_bytes() as usize;
    let mut page = vec![0u8; page_size];
    let pb = progress_bar(expected.len() as u64, "Verifying");

    for (index, (row, chunk)) in (first_row..).zip(expected.chunks(page_size)).enumerate() {
        let got = &mut page[..chunk.len()];
        flash.page_read(row, 0, got)?;
        if let Some(i) = got.iter().zip(chunk).position(|(a, b)| a != b) {
            pb.abandon();
            let offset = index * page_size + i;
            return Err(format!(
                "Verification failed at offset 0x{:08X}: expected 0x{:02X}, got 0x{:02X}",
                offset, chunk[i], got[i]
            )
            .into());
        }
        pb.inc(chunk.len() as u64);
    }

    pb.finish_with_message("Verify complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use spinand_dummy::{DummyConfig, DummyNand};

    fn unlocked_flash() -> NandFlash<DummyNand> {
        let nand = DummyNand::new(DummyConfig::default().with_busy_polls(1));
        let mut flash = NandFlash::new(nand);
        flash.initialize().unwrap();
        flash.reset_unlock().unwrap();
        flash
    }

    #[test]
    fn test_write_image_pads_and_skips_blank_pages() {
        let mut flash = unlocked_flash();
        // Full page, partial page, blank page, two-byte tail
        let mut image = vec![0xA5; 2048 + 10];
        image.resize(image.len() + 2038 + 2048, 0xFF);
        image.extend([0x01, 0x02]);

        let stats = write_image(
            &mut flash,
            &image,
            WriteOptions {
                start_block: 3,
                erase: true,
                verify: true,
            },
        )
        .unwrap();

        assert_eq!(stats.blocks_erased, 1);
        assert_eq!(stats.pages_written, 3);
        assert_eq!(stats.pages_skipped, 1);

        let first = 3 * 64;
        let nand = flash.transport();
        assert_eq!(nand.page(first), vec![0xA5; 2048]);
        assert_eq!(&nand.page(first + 1)[..10], &[0xA5; 10]);
        assert!(nand.page(first + 1)[10..].iter().all(|&b| b == 0xFF));
        assert_eq!(&nand.page(first + 3)[..3], &[0x01, 0x02, 0xFF]);
    }

    #[test]
    fn test_write_image_rejects_oversized() {
        let mut flash = unlocked_flash();
        let image = vec![0u8; 2 * 64 * 2048];
        let options = WriteOptions {
            start_block: 1023,
            erase: false,
            verify: false,
        };
        assert!(write_image(&mut flash, &image, options).is_err());
        assert_eq!(flash.transport().programmed_pages(), 0);
    }

    #[test]
    fn test_verify_detects_mismatch() {
        let mut flash = unlocked_flash();
        flash.transport_mut().set_page(0, &[0x00, 0x11]);
        assert!(verify_image(&mut flash, 0, &[0x00, 0x11]).is_ok());
        assert!(verify_image(&mut flash, 0, &[0x00, 0x12]).is_err());
    }
}
