//! Error types shared by the source scanner and the GitHub pipeline.

use thiserror::Error;

/// Errors surfaced while locating source regions or talking to GitHub.
///
/// Every variant is terminal for the operation that produced it: the
/// pipeline never retries, guesses a region, or rolls back commits that
/// already landed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PatchError {
    /// No balanced function body encloses the requested offset.
    #[error("no balanced function body found near offset {offset}")]
    BoundaryNotFound {
        /// Offset the caller asked about.
        offset: usize,
    },

    /// A region did not fit the text it was applied to.
    #[error("region {start}..{end} does not fit text of length {len}")]
    RegionOutOfBounds {
        /// Region start offset.
        start: usize,
        /// Region end offset.
        end: usize,
        /// Length of the text the region was applied to.
        len: usize,
    },

    /// The repository URL does not name a GitHub owner and repository.
    #[error("Invalid GitHub URL")]
    InvalidRepoUrl {
        /// The rejected input, kept for logging.
        input: String,
    },

    /// A file edit cannot be committed as supplied.
    #[error("invalid file edit at index {index}: {message}")]
    InvalidFileEdit {
        /// Position of the edit in the submitted batch.
        index: usize,
        /// Why the edit was rejected.
        message: String,
    },

    /// The pull request number is not a positive integer.
    #[error("pull request number must be a positive integer")]
    InvalidPullRequestNumber,

    /// The authentication token was missing.
    #[error("GitHub token missing")]
    MissingToken,

    /// The authentication token was rejected by GitHub.
    #[error("GitHub rejected the token: {message}")]
    Authentication {
        /// GitHub error message returned with the 401/403 response.
        message: String,
    },

    /// The base branch reference could not be found.
    #[error("branch '{branch}' not found: {message}")]
    RefNotFound {
        /// Branch that was looked up.
        branch: String,
        /// Response detail from GitHub.
        message: String,
    },

    /// The new branch reference already exists.
    #[error("branch '{branch}' already exists: {message}")]
    RefCreateConflict {
        /// Branch that could not be created.
        branch: String,
        /// Response detail from GitHub.
        message: String,
    },

    /// A file update carried a stale blob SHA.
    #[error("content conflict writing '{path}': {message}")]
    ContentConflict {
        /// Repository-relative path that was being written.
        path: String,
        /// Response detail from GitHub.
        message: String,
    },

    /// The pull request cannot be merged in its current state.
    #[error("pull request #{number} cannot be merged: {message}")]
    PullRequestNotMergeable {
        /// Pull request number.
        number: u64,
        /// Reason reported by GitHub or derived from the PR state.
        message: String,
    },

    /// GitHub returned a non-authentication API error.
    #[error("GitHub API error: {message}")]
    Api {
        /// Response body from GitHub describing the failure.
        message: String,
    },

    /// Networking failed while calling GitHub.
    #[error("network error talking to GitHub: {message}")]
    Network {
        /// Transport-level error detail.
        message: String,
    },

    /// Local I/O operation failed.
    #[error("I/O error: {message}")]
    Io {
        /// Error detail from the underlying I/O operation.
        message: String,
    },

    /// Configuration could not be loaded or is incomplete.
    #[error("configuration error: {message}")]
    Configuration {
        /// Details about the configuration failure.
        message: String,
    },
}
