//! Gateways for writing branches, files and pull requests through Octocrab.
//!
//! The pipeline talks to GitHub only through the [`ContentGateway`] and
//! [`PullRequestGateway`] traits, so tests can substitute mocks while
//! [`OctocrabHostingGateway`] performs the real HTTP requests.

mod client;
mod contents;
mod error_mapping;
mod pull_requests;

#[cfg(test)]
mod tests;

use async_trait::async_trait;
use octocrab::Octocrab;

use crate::error::PatchError;
use crate::github::locator::{PersonalAccessToken, PullRequestNumber, RepositoryLocator};
use crate::github::models::{
    CreatedPullRequest, FileWrite, FileWriteOutcome, NewPullRequest, PullRequestStatus,
    PullRequestSummary,
};

use client::build_octocrab_client;

/// Gateway for branch references and repository contents.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentGateway: Send + Sync {
    /// Returns the commit SHA at the head of `branch`.
    async fn branch_head(
        &self,
        repo: &RepositoryLocator,
        branch: &str,
    ) -> Result<String, PatchError>;

    /// Creates `refs/heads/<branch>` pointing at `sha`.
    async fn create_branch(
        &self,
        repo: &RepositoryLocator,
        branch: &str,
        sha: &str,
    ) -> Result<(), PatchError>;

    /// Deletes `refs/heads/<branch>`.
    async fn delete_branch(&self, repo: &RepositoryLocator, branch: &str)
    -> Result<(), PatchError>;

    /// Returns the blob SHA of `path` on `branch`, or `None` when the file
    /// does not exist there.
    async fn file_sha(
        &self,
        repo: &RepositoryLocator,
        path: &str,
        branch: &str,
    ) -> Result<Option<String>, PatchError>;

    /// Creates or replaces a file with a single commit.
    async fn put_file(
        &self,
        repo: &RepositoryLocator,
        write: &FileWrite,
    ) -> Result<FileWriteOutcome, PatchError>;
}

/// Gateway for pull request operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PullRequestGateway: Send + Sync {
    /// Opens a pull request.
    async fn create_pull_request(
        &self,
        repo: &RepositoryLocator,
        request: &NewPullRequest,
    ) -> Result<CreatedPullRequest, PatchError>;

    /// Lists the first page of open pull requests.
    async fn list_open_pull_requests(
        &self,
        repo: &RepositoryLocator,
    ) -> Result<Vec<PullRequestSummary>, PatchError>;

    /// Fetches the merge-relevant state of one pull request.
    async fn pull_request(
        &self,
        repo: &RepositoryLocator,
        number: PullRequestNumber,
    ) -> Result<PullRequestStatus, PatchError>;

    /// Submits an approving review and returns the review id.
    async fn approve_pull_request(
        &self,
        repo: &RepositoryLocator,
        number: PullRequestNumber,
        body: Option<String>,
    ) -> Result<u64, PatchError>;

    /// Squash-merges a pull request.
    async fn merge_pull_request(
        &self,
        repo: &RepositoryLocator,
        number: PullRequestNumber,
    ) -> Result<(), PatchError>;

    /// Posts an issue comment on a pull request and returns its id.
    async fn comment_on_pull_request(
        &self,
        repo: &RepositoryLocator,
        number: PullRequestNumber,
        body: &str,
    ) -> Result<u64, PatchError>;

    /// Closes a pull request without merging.
    async fn close_pull_request(
        &self,
        repo: &RepositoryLocator,
        number: PullRequestNumber,
    ) -> Result<(), PatchError>;
}

/// Octocrab-backed gateway implementing both hosting traits.
pub struct OctocrabHostingGateway {
    client: Octocrab,
}

impl OctocrabHostingGateway {
    /// Creates a new gateway from an Octocrab client.
    #[must_use]
    pub const fn new(client: Octocrab) -> Self {
        Self { client }
    }

    /// Builds an Octocrab client for the given token and repository host.
    ///
    /// # Errors
    ///
    /// Returns `PatchError::Configuration` when the API base cannot be parsed
    /// or `PatchError::Api` when Octocrab fails to construct a client.
    pub fn for_token(
        token: &PersonalAccessToken,
        repo: &RepositoryLocator,
    ) -> Result<Self, PatchError> {
        let octocrab = build_octocrab_client(token, repo.api_base().as_str())?;
        Ok(Self::new(octocrab))
    }
}
