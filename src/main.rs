//! spinand - SPI NAND flash tool
//!
//! Identifies SPI NAND chips and reads, programs, erases and unlocks them
//! through any transport enabled at compile time.

mod cli;
mod commands;
mod programmers;

use clap::Parser;
use cli::{Cli, Commands};
use commands::write::WriteOptions;
use programmers::Transport;
use spinand_core::flash::NandFlash;
use spinand_core::protocol::PollConfig;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(log_filter(cli.verbose)),
    )
    .init();

    let mut poll = PollConfig::default();
    if let Some(max_polls) = cli.max_polls {
        poll = poll.with_max_polls(max_polls);
    }

    match cli.command {
        Commands::Probe { programmer } => {
            let flash = open_flash(&programmer, poll)?;
            commands::probe::run_probe(&flash)
        }
        Commands::Status { programmer } => {
            let mut flash = open_flash(&programmer, poll)?;
            commands::probe::run_status(&mut flash)
        }
        Commands::Read {
            programmer,
            output,
            range,
        } => {
            let mut flash = open_flash(&programmer, poll)?;
            let blocks = resolve_range(&flash, range.start_block, range.blocks)?;
            commands::read::run_read(&mut flash, &output, blocks)
        }
        Commands::Write {
            programmer,
            input,
            start_block,
            no_verify,
            no_erase,
        } => {
            let mut flash = open_flash(&programmer, poll)?;
            let options = WriteOptions {
                start_block,
                erase: !no_erase,
                verify: !no_verify,
            };
            commands::write::run_write(&mut flash, &input, options)
        }
        Commands::Erase { programmer, range } => {
            let mut flash = open_flash(&programmer, poll)?;
            let blocks = resolve_range(&flash, range.start_block, range.blocks)?;
            commands::erase::run_erase(&mut flash, blocks)
        }
        Commands::Unlock { programmer } => {
            let mut flash = open_flash(&programmer, poll)?;
            commands::probe::run_unlock(&mut flash)
        }
        Commands::ListProgrammers => {
            commands::list_programmers();
            Ok(())
        }
        Commands::ListChips { vendor } => {
            commands::list_chips(vendor.as_deref());
            Ok(())
        }
    }
}

/// Default log filter for the number of `-v` flags, overridden by `RUST_LOG`
fn log_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

/// Open the programmer and identify the chip behind it
fn open_flash(
    programmer: &str,
    poll: PollConfig,
) -> Result<NandFlash<Transport>, Box<dyn std::error::Error>> {
    let transport = programmers::open_transport(programmer)?;
    let mut flash = NandFlash::new(transport).with_poll_config(poll);
    let chip = flash.initialize()?;
    println!(
        "Found: {} {} ({})",
        chip.vendor,
        chip.name,
        commands::format_size(chip.total_size())
    );
    Ok(flash)
}

fn resolve_range(
    flash: &NandFlash<Transport>,
    start_block: u32,
    blocks: Option<u32>,
) -> Result<std::ops::Range<u32>, Box<dyn std::error::Error>> {
    let geometry = flash.geometry().ok_or("No chip identified")?;
    Ok(commands::block_range(&geometry, start_block, blocks)?)
}
