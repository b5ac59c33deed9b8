//! Suture library crate: surgical source patches delivered as pull requests.
//!
//! The [`source`] module finds the byte span of a function body inside
//! already-formatted source text, labels it and spots file paths mentioned
//! in freeform text. The [`github`] module turns a batch of whole-file edits
//! into a feature branch, one commit per file and a single pull request. It
//! can extend an existing branch the same way and offers thin pull request
//! listing, review and housekeeping operations.

pub mod config;
pub mod error;
pub mod github;
pub mod source;

pub use config::{OperationMode, SutureConfig};
pub use error::PatchError;
pub use github::{
    BranchCommitter, CommitOptions, CommitReport, CommitRequest, FileEdit,
    OctocrabHostingGateway, PersonalAccessToken, PullRequestOps, RepositoryLocator, UpdateRequest,
};
pub use source::{SourceRegion, detect_paths, extract_name, locate, locate_offsets};
