//! Lists file paths mentioned in a text file.

use std::io::{self, Write};

use suture::{PatchError, SutureConfig, detect_paths};

use super::output::{read_input, write_json};

/// Prints the sorted, de-duplicated paths mentioned in `--file`.
///
/// # Errors
///
/// Returns [`PatchError::Configuration`] when no file is configured and
/// [`PatchError::Io`] when it cannot be read.
pub fn run(config: &SutureConfig) -> Result<(), PatchError> {
    let mut stdout = io::stdout().lock();
    run_with_writer(config, &mut stdout)
}

/// Detects paths and writes them to `writer` as a JSON array.
pub fn run_with_writer<W: Write>(config: &SutureConfig, writer: &mut W) -> Result<(), PatchError> {
    let text = read_input(config.require_file()?)?;
    let paths = detect_paths(&text);
    write_json(writer, &paths)
}
