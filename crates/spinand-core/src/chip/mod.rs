//! NAND chip types and descriptor table
//!
//! This module provides the geometry type and the static table of known
//! devices, matched against the bytes returned by READ_ID.

mod database;
mod types;

pub use database::*;
pub use types::*;
