//! Data models exchanged with the GitHub REST API.
//!
//! Public types are the domain view used by the committer and the CLI. Types
//! prefixed with `Api` are deserialisation targets and request bodies that
//! stay inside the gateway.

use serde::{Deserialize, Serialize};

/// A requested full-file replacement.
///
/// `content` is committed verbatim; the pipeline never reformats it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEdit {
    /// Repository-relative path, without a leading `/`.
    pub path: String,
    /// New file content.
    pub content: String,
}

impl FileEdit {
    /// Creates an edit from a path and its new content.
    #[must_use]
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

/// Payload for one file commit on a branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileWrite {
    /// Repository-relative path.
    pub path: String,
    /// Base64-encoded file content.
    pub encoded_content: String,
    /// Commit message.
    pub message: String,
    /// Target branch.
    pub branch: String,
    /// Blob SHA of the file being replaced; `None` creates a new file.
    pub sha: Option<String>,
}

/// SHAs reported by GitHub after a file commit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileWriteOutcome {
    /// Blob SHA of the new content.
    pub content_sha: Option<String>,
    /// SHA of the commit that wrote it.
    pub commit_sha: Option<String>,
}

/// File that landed on the feature branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommittedFile {
    /// Position of the edit in the submitted batch.
    pub index: usize,
    /// Repository-relative path.
    pub path: String,
    /// Blob SHA of the committed content.
    pub blob_sha: Option<String>,
    /// SHA of the commit.
    pub commit_sha: Option<String>,
    /// `true` when the file did not exist on the branch before.
    pub created: bool,
}

/// Request to open a pull request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewPullRequest {
    /// Branch holding the changes.
    pub head: String,
    /// Branch the changes merge into.
    pub base: String,
    /// Pull request title.
    pub title: String,
    /// Pull request description.
    pub body: String,
}

/// Pull request opened by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedPullRequest {
    /// Pull request number.
    pub number: u64,
    /// Browser URL of the pull request.
    #[serde(alias = "html_url")]
    pub html_url: String,
}

/// Lightweight pull request summary for listing views.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequestSummary {
    /// Pull request number.
    pub number: u64,
    /// Title of the pull request.
    pub title: Option<String>,
    /// State (e.g. open, closed).
    pub state: Option<String>,
    /// Browser URL.
    pub html_url: Option<String>,
    /// Author login if present.
    pub author: Option<String>,
    /// Name of the head branch.
    pub head_branch: Option<String>,
    /// Creation timestamp (ISO 8601 format).
    pub created_at: Option<String>,
    /// Last update timestamp (ISO 8601 format).
    pub updated_at: Option<String>,
}

/// Merge-relevant state of a single pull request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequestStatus {
    /// Pull request number.
    pub number: u64,
    /// `open` or `closed`.
    pub state: String,
    /// Whether the pull request has been merged.
    pub merged: bool,
    /// GitHub's mergeability verdict, `None` while still being computed.
    pub mergeable: Option<bool>,
    /// Detailed mergeability state such as `clean` or `dirty`.
    pub mergeable_state: Option<String>,
}

impl PullRequestStatus {
    /// Returns `true` when the pull request is open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state.eq_ignore_ascii_case("open")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiRef {
    pub(crate) object: ApiGitObject,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiGitObject {
    pub(crate) sha: String,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct ApiCreateRef<'a> {
    #[serde(rename = "ref")]
    pub(crate) reference: String,
    pub(crate) sha: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiContentEntry {
    pub(crate) sha: String,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct ApiPutContent<'a> {
    pub(crate) message: &'a str,
    pub(crate) content: &'a str,
    pub(crate) branch: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) sha: Option<&'a str>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiPutContentResponse {
    pub(crate) content: Option<ApiGitObject>,
    pub(crate) commit: Option<ApiGitObject>,
}

impl From<ApiPutContentResponse> for FileWriteOutcome {
    fn from(value: ApiPutContentResponse) -> Self {
        Self {
            content_sha: value.content.map(|object| object.sha),
            commit_sha: value.commit.map(|object| object.sha),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiUser {
    pub(crate) login: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiBranchRef {
    #[serde(rename = "ref")]
    pub(crate) name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiPullRequest {
    pub(crate) number: u64,
    pub(crate) title: Option<String>,
    pub(crate) state: Option<String>,
    pub(crate) html_url: Option<String>,
    pub(crate) user: Option<ApiUser>,
    pub(crate) head: Option<ApiBranchRef>,
    pub(crate) created_at: Option<String>,
    pub(crate) updated_at: Option<String>,
    #[serde(default)]
    pub(crate) merged: bool,
    pub(crate) mergeable: Option<bool>,
    pub(crate) mergeable_state: Option<String>,
}

impl From<ApiPullRequest> for PullRequestSummary {
    fn from(value: ApiPullRequest) -> Self {
        Self {
            number: value.number,
            title: value.title,
            state: value.state,
            html_url: value.html_url,
            author: value.user.and_then(|user| user.login),
            head_branch: value.head.and_then(|head| head.name),
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl From<ApiPullRequest> for PullRequestStatus {
    fn from(value: ApiPullRequest) -> Self {
        Self {
            number: value.number,
            state: value.state.unwrap_or_default(),
            merged: value.merged,
            mergeable: value.mergeable,
            mergeable_state: value.mergeable_state,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct ApiReview<'a> {
    pub(crate) event: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) body: Option<&'a str>,
}

/// Response carrying the id of a created review or comment.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiCreatedId {
    pub(crate) id: u64,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct ApiIssueComment<'a> {
    pub(crate) body: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct ApiMergeRequest {
    pub(crate) merge_method: &'static str,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiMergeResponse {
    #[serde(default)]
    pub(crate) merged: bool,
    pub(crate) message: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct ApiStateUpdate {
    pub(crate) state: &'static str,
}
