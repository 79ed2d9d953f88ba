//! Logging shared by the command-line tools
//!
//! - Bracketed event format: `[TIMESTAMP] [LEVEL] [FUNCTION] [TARGET: FILE:LINE]: MESSAGE`
//! - Dual output: a timestamped file under `logs/` plus stderr
//! - `RUST_LOG` overrides the default filter

mod formatter;
mod setup;

pub use formatter::BracketedFormatter;
pub use setup::setup_logging;
