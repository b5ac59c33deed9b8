//! Pull request listing, review and housekeeping operations.
//!
//! Each operation accepts a repository URL, parses it before touching the
//! network and surfaces GitHub failures as [`PatchError`]s.

use serde::Serialize;
use tracing::info;

use crate::error::PatchError;
use crate::github::gateway::{ContentGateway, PullRequestGateway};
use crate::github::locator::{PullRequestNumber, RepositoryLocator};
use crate::github::models::PullRequestSummary;

/// What a merge or close request actually did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum StateChange {
    /// The pull request changed state.
    Applied,
    /// The pull request was already in the requested state.
    AlreadyDone,
}

/// Thin pull request operations over hosting gateways.
///
/// # Example
///
/// ```ignore
/// use suture::github::{OctocrabHostingGateway, PersonalAccessToken, PullRequestOps};
///
/// let token = PersonalAccessToken::new("ghp_example")?;
/// let repo = suture::github::RepositoryLocator::parse("https://github.com/acme/widgets")?;
/// let gateway = OctocrabHostingGateway::for_token(&token, &repo)?;
/// let ops = PullRequestOps::new(&gateway, &gateway);
/// let open = ops.list_open_pull_requests("https://github.com/acme/widgets").await?;
/// ```
pub struct PullRequestOps<'client, Pulls, Contents>
where
    Pulls: PullRequestGateway + ?Sized,
    Contents: ContentGateway + ?Sized,
{
    pulls: &'client Pulls,
    contents: &'client Contents,
}

impl<'client, Pulls, Contents> PullRequestOps<'client, Pulls, Contents>
where
    Pulls: PullRequestGateway + ?Sized,
    Contents: ContentGateway + ?Sized,
{
    /// Create the operations facade.
    #[must_use]
    pub const fn new(pulls: &'client Pulls, contents: &'client Contents) -> Self {
        Self { pulls, contents }
    }

    /// Lists open pull requests.
    ///
    /// Only the first page GitHub returns is read.
    ///
    /// # Errors
    ///
    /// Returns `PatchError::InvalidRepoUrl` for a malformed URL, otherwise
    /// propagates gateway failures.
    pub async fn list_open_pull_requests(
        &self,
        repo_url: &str,
    ) -> Result<Vec<PullRequestSummary>, PatchError> {
        let repo = RepositoryLocator::parse(repo_url)?;
        self.pulls.list_open_pull_requests(&repo).await
    }

    /// Submits an approving review and returns the review id.
    ///
    /// # Errors
    ///
    /// Returns `PatchError::InvalidRepoUrl` or
    /// `PatchError::InvalidPullRequestNumber` for bad input, otherwise
    /// propagates gateway failures.
    pub async fn approve_pull_request(
        &self,
        repo_url: &str,
        number: u64,
        body: Option<String>,
    ) -> Result<u64, PatchError> {
        let repo = RepositoryLocator::parse(repo_url)?;
        let pull_number = PullRequestNumber::new(number)?;
        let review_id = self
            .pulls
            .approve_pull_request(&repo, pull_number, body)
            .await?;
        info!(repo = %repo.slug(), number, review_id, "approved pull request");
        Ok(review_id)
    }

    /// Squash-merges an open pull request.
    ///
    /// A pull request that is already merged counts as success.
    ///
    /// # Errors
    ///
    /// Returns `PatchError::PullRequestNotMergeable` when the pull request is
    /// closed without being merged or GitHub refuses the merge.
    pub async fn merge_pull_request(
        &self,
        repo_url: &str,
        number: u64,
    ) -> Result<StateChange, PatchError> {
        let repo = RepositoryLocator::parse(repo_url)?;
        let pull_number = PullRequestNumber::new(number)?;
        let status = self.pulls.pull_request(&repo, pull_number).await?;

        if status.merged {
            return Ok(StateChange::AlreadyDone);
        }
        if !status.is_open() {
            return Err(PatchError::PullRequestNotMergeable {
                number,
                message: format!("pull request is {}", status.state),
            });
        }
        if status.mergeable == Some(false) {
            return Err(PatchError::PullRequestNotMergeable {
                number,
                message: format!(
                    "merge state is {}",
                    status.mergeable_state.as_deref().unwrap_or("unknown")
                ),
            });
        }

        self.pulls.merge_pull_request(&repo, pull_number).await?;
        info!(repo = %repo.slug(), number, "merged pull request");
        Ok(StateChange::Applied)
    }

    /// Posts `body` as a conversation comment and returns the comment id.
    ///
    /// # Errors
    ///
    /// Returns `PatchError::Configuration` for a blank body, otherwise
    /// propagates gateway failures.
    pub async fn comment_on_pull_request(
        &self,
        repo_url: &str,
        number: u64,
        body: &str,
    ) -> Result<u64, PatchError> {
        let repo = RepositoryLocator::parse(repo_url)?;
        let pull_number = PullRequestNumber::new(number)?;
        if body.trim().is_empty() {
            return Err(PatchError::Configuration {
                message: "a comment body is required".to_owned(),
            });
        }
        let id = self
            .pulls
            .comment_on_pull_request(&repo, pull_number, body)
            .await?;
        info!(repo = %repo.slug(), number, id, "commented on pull request");
        Ok(id)
    }

    /// Closes a pull request without merging it.
    ///
    /// # Errors
    ///
    /// Propagates gateway failures.
    pub async fn close_pull_request(
        &self,
        repo_url: &str,
        number: u64,
    ) -> Result<StateChange, PatchError> {
        let repo = RepositoryLocator::parse(repo_url)?;
        let pull_number = PullRequestNumber::new(number)?;
        let status = self.pulls.pull_request(&repo, pull_number).await?;
        if !status.is_open() {
            return Ok(StateChange::AlreadyDone);
        }

        self.pulls.close_pull_request(&repo, pull_number).await?;
        info!(repo = %repo.slug(), number, "closed pull request");
        Ok(StateChange::Applied)
    }

    /// Deletes a branch, typically one left behind by a failed commit run.
    ///
    /// # Errors
    ///
    /// Propagates gateway failures.
    pub async fn delete_branch(&self, repo_url: &str, branch: &str) -> Result<(), PatchError> {
        let repo = RepositoryLocator::parse(repo_url)?;
        self.contents.delete_branch(&repo, branch).await?;
        info!(repo = %repo.slug(), branch, "deleted branch");
        Ok(())
    }
}
