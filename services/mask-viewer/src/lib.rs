//! Mask viewer library
//!
//! Wires configuration, a raster source and a file-backed display into a
//! command dispatcher, so the binary only parses arguments and feeds input.

pub mod file_display;
pub mod session;

pub use file_display::FileDisplay;
pub use session::{build_dispatcher, run_lines, SessionSummary};
