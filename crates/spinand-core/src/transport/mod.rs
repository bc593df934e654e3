//! Transport traits and adapters
//!
//! The driver never touches hardware directly. Everything it sends goes
//! through a caller-supplied [`SpiTransport`].

mod config;
mod traits;

pub use config::SessionConfig;
pub use traits::*;
