//! JSON output helpers for CLI operations.

use std::fs;
use std::io::{self, Write};

use serde::Serialize;
use suture::github::{CommitOutcome, FailedStep};
use suture::{CommitReport, FileEdit, PatchError, RepositoryLocator, SutureConfig};

/// Writes `value` as pretty-printed JSON followed by a newline.
pub fn write_json<W: Write, T: Serialize + ?Sized>(
    writer: &mut W,
    value: &T,
) -> Result<(), PatchError> {
    serde_json::to_writer_pretty(&mut *writer, value).map_err(|error| PatchError::Io {
        message: format!("serialise output: {error}"),
    })?;
    writeln!(writer).map_err(|error| io_error(&error))
}

/// Reads a UTF-8 input file named in configuration.
pub fn read_input(path: &str) -> Result<String, PatchError> {
    fs::read_to_string(path).map_err(|error| PatchError::Io {
        message: format!("read {path}: {error}"),
    })
}

/// Reads a JSON array of `{ "path", "content" }` edits.
pub fn read_manifest(path: &str) -> Result<Vec<FileEdit>, PatchError> {
    let raw = read_input(path)?;
    serde_json::from_str(&raw).map_err(|error| PatchError::Configuration {
        message: format!("manifest {path} is not a JSON array of file edits: {error}"),
    })
}

/// Resolves the configured repository for a commit run.
///
/// A URL that does not name a GitHub repository still produces the
/// `{success: false, error}` report before the error is returned.
pub fn resolve_repository<W: Write>(
    config: &SutureConfig,
    writer: &mut W,
) -> Result<RepositoryLocator, PatchError> {
    match config.repository_locator() {
        Err(error @ PatchError::InvalidRepoUrl { .. }) => {
            let report = CommitReport {
                branch: None,
                committed: Vec::new(),
                outcome: CommitOutcome::Failed {
                    step: FailedStep::ResolveRepository,
                    error: error.clone(),
                },
            };
            write_json(writer, &report.into_response())?;
            Err(error)
        }
        resolved => resolved,
    }
}

/// Converts an I/O error to a [`PatchError::Io`].
pub(crate) fn io_error(error: &io::Error) -> PatchError {
    PatchError::Io {
        message: error.to_string(),
    }
}
