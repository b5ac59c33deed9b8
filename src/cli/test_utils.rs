//! Shared test utilities for CLI tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use suture::github::models::{FileWrite, FileWriteOutcome, NewPullRequest};
use suture::github::{
    ContentGateway, CreatedPullRequest, PullRequestGateway, PullRequestNumber, PullRequestStatus,
    PullRequestSummary, RepositoryLocator,
};
use suture::PatchError;

/// In-memory hosting gateway that records every call it receives.
///
/// Calls are logged as short strings such as `put_file src/a.ts` so tests
/// can assert on ordering without a mocking framework.
#[derive(Clone, Default)]
pub struct RecordingGateway {
    /// Calls received, in order.
    pub calls: Arc<Mutex<Vec<String>>>,
    /// Path whose write fails with a content conflict.
    pub conflict_on: Option<String>,
    /// Status returned for any pull request lookup.
    pub status: PullRequestStatus,
    /// Open pull requests returned by listing.
    pub open: Vec<PullRequestSummary>,
    /// Whether commenting fails with an API error.
    pub fail_comment: bool,
}

impl RecordingGateway {
    /// Gateway whose pull request lookups report an open, mergeable state.
    #[must_use]
    pub fn with_open_pull_request() -> Self {
        Self {
            status: PullRequestStatus {
                number: 7,
                state: "open".to_owned(),
                merged: false,
                mergeable: Some(true),
                mergeable_state: Some("clean".to_owned()),
            },
            ..Self::default()
        }
    }

    /// Snapshot of the recorded calls.
    #[must_use]
    pub fn recorded(&self) -> Vec<String> {
        self.calls
            .lock()
            .expect("calls mutex should be available")
            .clone()
    }

    fn record(&self, call: String) {
        self.calls
            .lock()
            .expect("calls mutex should be available")
            .push(call);
    }
}

#[async_trait]
impl ContentGateway for RecordingGateway {
    async fn branch_head(
        &self,
        _repo: &RepositoryLocator,
        branch: &str,
    ) -> Result<String, PatchError> {
        self.record(format!("branch_head {branch}"));
        Ok("base-sha".to_owned())
    }

    async fn create_branch(
        &self,
        _repo: &RepositoryLocator,
        branch: &str,
        sha: &str,
    ) -> Result<(), PatchError> {
        self.record(format!("create_branch {branch} {sha}"));
        Ok(())
    }

    async fn delete_branch(
        &self,
        _repo: &RepositoryLocator,
        branch: &str,
    ) -> Result<(), PatchError> {
        self.record(format!("delete_branch {branch}"));
        Ok(())
    }

    async fn file_sha(
        &self,
        _repo: &RepositoryLocator,
        path: &str,
        _branch: &str,
    ) -> Result<Option<String>, PatchError> {
        self.record(format!("file_sha {path}"));
        Ok(None)
    }

    async fn put_file(
        &self,
        _repo: &RepositoryLocator,
        write: &FileWrite,
    ) -> Result<FileWriteOutcome, PatchError> {
        self.record(format!("put_file {}", write.path));
        if self.conflict_on.as_deref() == Some(write.path.as_str()) {
            return Err(PatchError::ContentConflict {
                path: write.path.clone(),
                message: "sha does not match".to_owned(),
            });
        }
        Ok(FileWriteOutcome {
            content_sha: Some(format!("blob-{}", write.path)),
            commit_sha: Some("commit-sha".to_owned()),
        })
    }
}

#[async_trait]
impl PullRequestGateway for RecordingGateway {
    async fn create_pull_request(
        &self,
        _repo: &RepositoryLocator,
        request: &NewPullRequest,
    ) -> Result<CreatedPullRequest, PatchError> {
        self.record(format!("create_pull_request {} -> {}", request.head, request.base));
        Ok(CreatedPullRequest {
            number: 7,
            html_url: "https://github.com/acme/widgets/pull/7".to_owned(),
        })
    }

    async fn list_open_pull_requests(
        &self,
        _repo: &RepositoryLocator,
    ) -> Result<Vec<PullRequestSummary>, PatchError> {
        self.record("list_open_pull_requests".to_owned());
        Ok(self.open.clone())
    }

    async fn pull_request(
        &self,
        _repo: &RepositoryLocator,
        number: PullRequestNumber,
    ) -> Result<PullRequestStatus, PatchError> {
        self.record(format!("pull_request {}", number.get()));
        Ok(self.status.clone())
    }

    async fn approve_pull_request(
        &self,
        _repo: &RepositoryLocator,
        number: PullRequestNumber,
        body: Option<String>,
    ) -> Result<u64, PatchError> {
        self.record(format!(
            "approve_pull_request {} {}",
            number.get(),
            body.unwrap_or_default()
        ));
        Ok(99)
    }

    async fn merge_pull_request(
        &self,
        _repo: &RepositoryLocator,
        number: PullRequestNumber,
    ) -> Result<(), PatchError> {
        self.record(format!("merge_pull_request {}", number.get()));
        Ok(())
    }

    async fn comment_on_pull_request(
        &self,
        _repo: &RepositoryLocator,
        number: PullRequestNumber,
        body: &str,
    ) -> Result<u64, PatchError> {
        self.record(format!("comment_on_pull_request {} {body}", number.get()));
        if self.fail_comment {
            return Err(PatchError::Api {
                message: "Issue is locked".to_owned(),
            });
        }
        Ok(55)
    }

    async fn close_pull_request(
        &self,
        _repo: &RepositoryLocator,
        number: PullRequestNumber,
    ) -> Result<(), PatchError> {
        self.record(format!("close_pull_request {}", number.get()));
        Ok(())
    }
}
