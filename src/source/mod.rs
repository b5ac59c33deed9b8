//! Text-level helpers for carving edits out of existing source files.
//!
//! Nothing here parses a language. The [`scanner`] tracks comment and string
//! context, [`region`] uses it to find a function body's line span, and the
//! [`names`] and [`paths`] heuristics label regions and route edits.

pub mod names;
pub mod paths;
pub mod region;
pub mod scanner;

pub use names::extract_name;
pub use paths::detect_paths;
pub use region::{SourceRegion, locate, locate_offsets};
pub use scanner::{ScanState, Scanner, Token};
