//! CLI command implementations
//!
//! Every command except the listings works on an initialized
//! [`NandFlash`](spinand_core::flash::NandFlash), so the functions here are
//! generic over the transport and can be driven by the emulator in tests.

pub mod erase;
mod list;
pub mod probe;
pub mod read;
pub mod write;

pub use list::{list_chips, list_programmers};

use indicatif::{ProgressBar, ProgressStyle};
use spinand_core::chip::DeviceGeometry;
use std::ops::Range;

/// Result type shared by the commands
pub type CmdResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

/// Resolve a `--start-block`/`--blocks` pair against the device
pub fn block_range(
    geometry: &DeviceGeometry,
    start_block: u32,
    blocks: Option<u32>,
) -> Result<Range<u32>, String> {
    let total = geometry.blocks_count as u32;
    if start_block >= total {
        return Err(format!(
            "Start block {} is outside the device ({} blocks)",
            start_block, total
        ));
    }
    let count = blocks.unwrap_or(total - start_block);
    if count == 0 {
        return Err("Block count must be at least 1".to_string());
    }
    let end = start_block
        .checked_add(count)
        .filter(|end| *end <= total)
        .ok_or_else(|| {
            format!(
                "Blocks {}..{} exceed the device ({} blocks)",
                start_block,
                start_block as u64 + count as u64,
                total
            )
        })?;
    Ok(start_block..end)
}

/// Format a byte count for humans
pub fn format_size(bytes: u64) -> String {
    if bytes >= 1024 * 1024 {
        format!("{} MiB", bytes / (1024 * 1024))
    } else if bytes >= 1024 {
        format!("{} KiB", bytes / 1024)
    } else {
        format!("{} B", bytes)
    }
}

/// Create a byte progress bar labelled with `phase`
fn progress_bar(total: u64, phase: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(&format!(
                "{{spinner:.green}} [{{elapsed_precise}}] [{{bar:40.cyan/blue}}] {{bytes}}/{{total_bytes}} ({{bytes_per_sec}}, {{eta}}) {}",
                phase
            ))
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    pb
}
