//! GitHub side of the patch pipeline.
//!
//! This module wraps Octocrab to resolve repository URLs, create feature
//! branches, commit file edits and open or manage pull requests. Errors are
//! mapped into [`PatchError`](crate::error::PatchError) variants so callers
//! can surface precise failures without exposing Octocrab internals.

pub mod branch;
pub mod committer;
pub mod gateway;
pub mod locator;
pub mod models;
pub mod pulls;
#[cfg(feature = "test-support")]
pub mod test_support;

pub use branch::BranchName;
pub use committer::{
    BranchCommitter, CommentDelivery, CommitOptions, CommitOutcome, CommitReport, CommitRequest,
    CommitResponse, FailedStep, PullRequestComment, UpdateRequest,
};
pub use gateway::{ContentGateway, OctocrabHostingGateway, PullRequestGateway};
pub use locator::{
    PersonalAccessToken, PullRequestNumber, RepositoryLocator, RepositoryName, RepositoryOwner,
};
pub use models::{
    CommittedFile, CreatedPullRequest, FileEdit, PullRequestStatus, PullRequestSummary,
};
pub use pulls::{PullRequestOps, StateChange};

#[cfg(test)]
pub use gateway::{MockContentGateway, MockPullRequestGateway};
