//! CLI argument parsing

use crate::programmers;
use clap::{value_parser, Parser, Subcommand};
use std::path::PathBuf;

/// Parse a string as a hex or decimal u32
fn parse_hex_u32(s: &str) -> Result<u32, String> {
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16).map_err(|e| format!("Invalid hex value: {}", e))
    } else {
        s.parse::<u32>()
            .map_err(|e| format!("Invalid number: {}", e))
    }
}

/// Generate dynamic help text for the programmer argument
fn programmer_help() -> String {
    format!(
        "Programmer to use [available: {}]",
        programmers::programmer_names_short()
    )
}

#[derive(Parser)]
#[command(name = "spinand")]
#[command(author, version, about = "SPI NAND flash tool", long_about = None)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Maximum status reads while waiting for an operation to finish
    #[arg(long, global = true, value_parser = value_parser!(u32).range(1..))]
    pub max_polls: Option<u32>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Block range shared by read and erase
#[derive(clap::Args, Debug, Clone, Default)]
pub struct BlockRange {
    /// First block (hex or decimal)
    #[arg(long, value_parser = parse_hex_u32, default_value = "0")]
    pub start_block: u32,

    /// Number of blocks (defaults to the rest of the device)
    #[arg(long, value_parser = parse_hex_u32)]
    pub blocks: Option<u32>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Identify the attached chip
    Probe {
        #[arg(short, long, help = programmer_help())]
        programmer: String,
    },

    /// Show the status and block lock registers
    Status {
        #[arg(short, long, help = programmer_help())]
        programmer: String,
    },

    /// Read pages to a file
    Read {
        #[arg(short, long, help = programmer_help())]
        programmer: String,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        range: BlockRange,
    },

    /// Program a file into the flash
    Write {
        #[arg(short, long, help = programmer_help())]
        programmer: String,

        /// Input file path
        #[arg(short, long)]
        input: PathBuf,

        /// First block to write (hex or decimal)
        #[arg(long, value_parser = parse_hex_u32, default_value = "0")]
        start_block: u32,

        /// Skip reading the data back after writing
        #[arg(long)]
        no_verify: bool,

        /// Don't erase before writing
        #[arg(long)]
        no_erase: bool,
    },

    /// Erase blocks
    Erase {
        #[arg(short, long, help = programmer_help())]
        programmer: String,

        #[command(flatten)]
        range: BlockRange,
    },

    /// Reset the chip and clear the block lock register
    Unlock {
        #[arg(short, long, help = programmer_help())]
        programmer: String,
    },

    /// List supported programmers
    ListProgrammers,

    /// List supported chips
    ListChips {
        /// Filter by vendor
        #[arg(long)]
        vendor: Option<String>,
    },
}
