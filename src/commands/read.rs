//! Read command implementation

use super::{progress_bar, CmdResult};
use spinand_core::flash::NandFlash;
use spinand_core::transport::SpiTransport;
use spinand_core::Error;
use std::fs::File;
use std::io::Write;
use std::ops::Range;
use std::path::Path;

/// Run the read command
pub fn run_read<T: SpiTransport>(
    flash: &mut NandFlash<T>,
    output: &Path,
    blocks: Range<u32>,
) -> CmdResult {
    let (data, bad_pages) = read_blocks(flash, blocks)?;

    let mut file = File::create(output)?;
    file.write_all(&data)?;

    println!("Wrote {} bytes to {:?}", data.len(), output);
    if !bad_pages.is_empty() {
        println!(
            "{} page(s) had uncorrectable ECC errors and were filled with 0xFF",
            bad_pages.len()
        );
    }
    Ok(())
}

/// Read whole blocks, returning the data and the rows that failed ECC
///
/// Pages with uncorrectable ECC errors are reported rather than aborting the
/// dump; their bytes in the image are left erased.
pub fn read_blocks<T: SpiTransport>(
    flash: &mut NandFlash<T>,
    blocks: Range<u32>,
) -> CmdResult<(Vec<u8>, Vec<u32>)> {
    let geometry = flash.geometry().ok_or(Error::NotInitialized)?;
    let page_size = geometry.page_size_bytes as usize;
    let rows = geometry.row_address(blocks.start, 0)..geometry.row_address(blocks.end, 0);
    let total = rows.len() * page_size;

    let mut data = vec![0xFF; total];
    let mut bad_pages = Vec::new();
    let pb = progress_bar(total as u64, "Reading");

    for (row, page) in rows.zip(data.chunks_exact_mut(page_size)) {
        match flash.page_read(row, 0, page) {
            Ok(_) => {}
            Err(Error::BadBlock) => {
                log::warn!("Uncorrectable ECC error at row {}", row);
                page.fill(0xFF);
                bad_pages.push(row);
            }
            Err(e) => {
                pb.abandon();
                return Err(e.into());
            }
        }
        pb.inc(page_size as u64);
    }

    pb.finish_with_message("Read complete");
    Ok((data, bad_pages))
}
