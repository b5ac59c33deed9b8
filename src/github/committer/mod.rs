//! Branch, commit and pull request saga.
//!
//! [`BranchCommitter::apply`] turns a batch of [`FileEdit`]s into a fresh
//! branch off the base branch, one commit per file in input order, and a
//! single pull request. Every call is awaited before the next is issued:
//! each file commit moves the branch head that GitHub uses as the parent of
//! the next one.
//!
//! [`BranchCommitter::update_branch`] commits the same way onto a branch
//! that already exists, optionally leaving a comment on its pull request.
//!
//! The first failure stops the run. Nothing is rolled back; the returned
//! [`CommitReport`] lists what landed and which step failed so the caller
//! can resume with an update or clean up (see
//! [`crate::github::PullRequestOps::delete_branch`]).

use std::borrow::Cow;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::PatchError;
use crate::github::branch::BranchName;
use crate::github::gateway::{ContentGateway, PullRequestGateway};
use crate::github::locator::{PullRequestNumber, RepositoryLocator};
use crate::github::models::{
    CommittedFile, CreatedPullRequest, FileEdit, FileWrite, NewPullRequest,
};


/// Messages above this size are rejected by GitHub.
const MAX_MESSAGE_BYTES: usize = 65_000;
/// Size a too-large message is cut down to before the marker is appended.
const TRUNCATED_MESSAGE_BYTES: usize = 60_000;

/// Default branch new work is based on and merged into.
pub const DEFAULT_BASE_BRANCH: &str = "main";
/// Default prefix for generated branch names.
pub const DEFAULT_BRANCH_PREFIX: &str = "coze";

/// Repository-independent settings for a committer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitOptions {
    /// Branch the feature branch starts from and the pull request targets.
    pub base_branch: String,
    /// Prefix used when generating `feature/<prefix>-...` branch names.
    pub branch_prefix: String,
}

impl Default for CommitOptions {
    fn default() -> Self {
        Self {
            base_branch: DEFAULT_BASE_BRANCH.to_owned(),
            branch_prefix: DEFAULT_BRANCH_PREFIX.to_owned(),
        }
    }
}

/// One invocation of the pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitRequest {
    /// Repository URL, e.g. `https://github.com/acme/widgets`.
    pub repo_url: String,
    /// Edits to commit, in order.
    pub files: Vec<FileEdit>,
    /// Pull request title.
    pub title: String,
    /// Pull request description.
    pub description: String,
    /// Commit message for every file commit; defaults to the title.
    pub commit_message: Option<String>,
    /// Branch to create; generated when absent.
    pub branch: Option<String>,
}

/// Comment left on a pull request once a branch update lands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestComment {
    /// Pull request to comment on.
    pub number: PullRequestNumber,
    /// Comment text; truncated when too large.
    pub body: String,
}

/// Commits onto a branch that already exists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateRequest {
    /// Repository URL, e.g. `https://github.com/acme/widgets`.
    pub repo_url: String,
    /// Edits to commit, in order.
    pub files: Vec<FileEdit>,
    /// Existing branch to commit onto.
    pub branch: String,
    /// Commit message for every file commit.
    pub commit_message: String,
    /// Comment to post after the last commit.
    pub comment: Option<PullRequestComment>,
}

/// Step of the saga that failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "step")]
pub enum FailedStep {
    /// The repository URL could not be parsed.
    ResolveRepository,
    /// A file edit was rejected before any network call.
    ValidateEdit {
        /// Position of the edit in the batch.
        index: usize,
    },
    /// The base branch head could not be read.
    ReadBaseHead,
    /// The feature branch could not be created.
    CreateBranch,
    /// The branch to update could not be read.
    ReadBranchHead,
    /// Reading an existing file's blob SHA failed.
    ReadFileSha {
        /// Position of the edit in the batch.
        index: usize,
        /// Repository-relative path.
        path: String,
    },
    /// Writing a file failed.
    WriteFile {
        /// Position of the edit in the batch.
        index: usize,
        /// Repository-relative path.
        path: String,
    },
    /// The pull request could not be opened.
    OpenPullRequest,
}

impl FailedStep {
    /// Index of the file edit the step was working on, if any.
    #[must_use]
    pub const fn file_index(&self) -> Option<usize> {
        match self {
            Self::ValidateEdit { index }
            | Self::ReadFileSha { index, .. }
            | Self::WriteFile { index, .. } => Some(*index),
            Self::ResolveRepository
            | Self::ReadBaseHead
            | Self::CreateBranch
            | Self::ReadBranchHead
            | Self::OpenPullRequest => None,
        }
    }
}

/// Result of posting the comment requested with a branch update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentDelivery {
    /// The comment was posted.
    Posted {
        /// Comment id.
        id: u64,
    },
    /// Posting failed; the update itself still stands.
    Failed {
        /// Error returned by GitHub.
        error: PatchError,
    },
}

/// Final state of a saga run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    /// Every file landed and the pull request is open.
    PullRequestOpened(CreatedPullRequest),
    /// Every file landed on the existing branch.
    BranchUpdated {
        /// Commit SHA of the last file commit, the new branch head.
        head_sha: Option<String>,
        /// Outcome of the requested comment, if one was requested.
        comment: Option<CommentDelivery>,
    },
    /// The run stopped at `step`.
    Failed {
        /// Step that failed.
        step: FailedStep,
        /// Error returned by that step.
        error: PatchError,
    },
}

/// Result of [`BranchCommitter::apply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitReport {
    /// Branch created for the run, if creation succeeded.
    pub branch: Option<BranchName>,
    /// Files committed before the run ended.
    pub committed: Vec<CommittedFile>,
    /// Whether the run opened a pull request or where it stopped.
    pub outcome: CommitOutcome,
}

impl CommitReport {
    /// Returns `true` when the pull request was opened or the branch updated.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        !matches!(self.outcome, CommitOutcome::Failed { .. })
    }

    /// The opened pull request, if any.
    #[must_use]
    pub const fn pull_request(&self) -> Option<&CreatedPullRequest> {
        match &self.outcome {
            CommitOutcome::PullRequestOpened(created) => Some(created),
            CommitOutcome::BranchUpdated { .. } | CommitOutcome::Failed { .. } => None,
        }
    }

    /// The first error of the run, if any.
    #[must_use]
    pub const fn error(&self) -> Option<&PatchError> {
        match &self.outcome {
            CommitOutcome::PullRequestOpened(_) | CommitOutcome::BranchUpdated { .. } => None,
            CommitOutcome::Failed { error, .. } => Some(error),
        }
    }

    /// Index of the file edit that failed, if the run stopped on one.
    #[must_use]
    pub const fn failed_at(&self) -> Option<usize> {
        match &self.outcome {
            CommitOutcome::PullRequestOpened(_) | CommitOutcome::BranchUpdated { .. } => None,
            CommitOutcome::Failed { step, .. } => step.file_index(),
        }
    }

    /// What happened to the comment requested with a branch update.
    #[must_use]
    pub const fn comment(&self) -> Option<&CommentDelivery> {
        match &self.outcome {
            CommitOutcome::BranchUpdated { comment, .. } => comment.as_ref(),
            CommitOutcome::PullRequestOpened(_) | CommitOutcome::Failed { .. } => None,
        }
    }

    /// Converts the report into the `{success, prUrl}`,
    /// `{success, commitSha}` or `{success: false, error}` response shape.
    #[must_use]
    pub fn into_response(self) -> CommitResponse {
        let mut response = CommitResponse {
            success: self.is_success(),
            pr_url: None,
            commit_sha: None,
            comment_id: None,
            comment_error: None,
            error: None,
            failed_at: self.failed_at(),
            branch: self.branch.map(|name| name.as_str().to_owned()),
            committed: self.committed,
            failed_step: None,
        };
        match self.outcome {
            CommitOutcome::PullRequestOpened(created) => response.pr_url = Some(created.html_url),
            CommitOutcome::BranchUpdated { head_sha, comment } => {
                response.commit_sha = head_sha;
                match comment {
                    Some(CommentDelivery::Posted { id }) => response.comment_id = Some(id),
                    Some(CommentDelivery::Failed { error }) => {
                        response.comment_error = Some(error.to_string());
                    }
                    None => {}
                }
            }
            CommitOutcome::Failed { step, error } => {
                response.error = Some(error.to_string());
                response.failed_step = Some(step);
            }
        }
        response
    }
}

/// Serialisable summary of a [`CommitReport`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitResponse {
    /// Whether the pull request was opened.
    pub success: bool,
    /// Browser URL of the pull request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pr_url: Option<String>,
    /// New branch head after an update.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit_sha: Option<String>,
    /// Id of the comment posted after an update.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment_id: Option<u64>,
    /// Why the comment requested with an update was not posted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment_error: Option<String>,
    /// Human-readable first error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Branch created for the run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    /// Files that landed.
    pub committed: Vec<CommittedFile>,
    /// Step the run stopped at.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_step: Option<FailedStep>,
    /// Index of the failing edit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_at: Option<usize>,
}

type StepResult<T> = Result<T, (FailedStep, PatchError)>;

#[derive(Default)]
struct Progress {
    branch: Option<BranchName>,
    committed: Vec<CommittedFile>,
}

impl Progress {
    fn into_report(self, result: StepResult<CommitOutcome>) -> CommitReport {
        let outcome = result.unwrap_or_else(|(step, error)| {
            warn!(?step, %error, "commit pipeline stopped");
            CommitOutcome::Failed { step, error }
        });
        CommitReport {
            branch: self.branch,
            committed: self.committed,
            outcome,
        }
    }
}

/// Drives the branch/commit/pull request saga through hosting gateways.
pub struct BranchCommitter<'client, Contents, Pulls>
where
    Contents: ContentGateway + ?Sized,
    Pulls: PullRequestGateway + ?Sized,
{
    contents: &'client Contents,
    pulls: &'client Pulls,
    options: CommitOptions,
}

impl<'client, Contents, Pulls> BranchCommitter<'client, Contents, Pulls>
where
    Contents: ContentGateway + ?Sized,
    Pulls: PullRequestGateway + ?Sized,
{
    /// Create a committer using the provided gateways.
    #[must_use]
    pub const fn new(
        contents: &'client Contents,
        pulls: &'client Pulls,
        options: CommitOptions,
    ) -> Self {
        Self {
            contents,
            pulls,
            options,
        }
    }

    /// Runs the saga for `request`.
    ///
    /// The repository URL and every edit path are validated before the
    /// first network call. Failures never panic or propagate; they are
    /// recorded in the returned report.
    pub async fn apply(&self, request: &CommitRequest) -> CommitReport {
        let mut progress = Progress::default();
        let result = self
            .run(request, &mut progress)
            .await
            .map(CommitOutcome::PullRequestOpened);
        progress.into_report(result)
    }

    /// Commits `request.files` onto an existing branch, one commit per file,
    /// then posts the requested pull request comment.
    ///
    /// A missing branch stops the run at [`FailedStep::ReadBranchHead`]. A
    /// failed comment is recorded in the report but does not fail the
    /// update. A blank commit message becomes `Update <branch>`.
    pub async fn update_branch(&self, request: &UpdateRequest) -> CommitReport {
        let mut progress = Progress::default();
        let result = self.run_update(request, &mut progress).await;
        progress.into_report(result)
    }

    async fn run_update(
        &self,
        request: &UpdateRequest,
        progress: &mut Progress,
    ) -> StepResult<CommitOutcome> {
        let repo = RepositoryLocator::parse(&request.repo_url)
            .map_err(|error| (FailedStep::ResolveRepository, error))?;
        validate_edits(&request.files)?;

        let branch_input = request.branch.trim();
        if branch_input.is_empty() {
            return Err((
                FailedStep::ReadBranchHead,
                PatchError::Configuration {
                    message: "a branch name is required to update a branch".to_owned(),
                },
            ));
        }
        let branch = BranchName::explicit(branch_input);
        let head_sha = self
            .contents
            .branch_head(&repo, branch.as_str())
            .await
            .map_err(|error| (FailedStep::ReadBranchHead, error))?;
        debug!(%branch, %head_sha, "read branch head");
        progress.branch = Some(branch.clone());

        let commit_message = if request.commit_message.trim().is_empty() {
            Cow::Owned(format!("Update {branch}"))
        } else {
            truncate_message(&request.commit_message, "...")
        };
        for (index, edit) in request.files.iter().enumerate() {
            let committed = self
                .commit_file(&repo, &branch, &commit_message, index, edit)
                .await?;
            progress.committed.push(committed);
        }
        info!(
            repo = %repo.slug(),
            %branch,
            files = progress.committed.len(),
            "updated branch"
        );

        let mut comment = None;
        if let Some(requested) = &request.comment {
            comment = Some(self.post_comment(&repo, requested).await);
        }
        Ok(CommitOutcome::BranchUpdated {
            head_sha: progress
                .committed
                .last()
                .and_then(|file| file.commit_sha.clone()),
            comment,
        })
    }

    async fn post_comment(
        &self,
        repo: &RepositoryLocator,
        comment: &PullRequestComment,
    ) -> CommentDelivery {
        let number = comment.number.get();
        let body = truncate_message(&comment.body, "\n\n... (comment truncated)");
        match self
            .pulls
            .comment_on_pull_request(repo, comment.number, &body)
            .await
        {
            Ok(id) => {
                info!(repo = %repo.slug(), number, id, "commented on pull request");
                CommentDelivery::Posted { id }
            }
            Err(error) => {
                warn!(repo = %repo.slug(), number, %error, "comment failed, branch update kept");
                CommentDelivery::Failed { error }
            }
        }
    }

    async fn run(
        &self,
        request: &CommitRequest,
        progress: &mut Progress,
    ) -> StepResult<CreatedPullRequest> {
        let repo = RepositoryLocator::parse(&request.repo_url)
            .map_err(|error| (FailedStep::ResolveRepository, error))?;
        validate_edits(&request.files)?;

        let base = self.options.base_branch.as_str();
        let base_sha = self
            .contents
            .branch_head(&repo, base)
            .await
            .map_err(|error| (FailedStep::ReadBaseHead, error))?;

        let branch = request.branch.as_deref().map_or_else(
            || BranchName::generate(&self.options.branch_prefix),
            BranchName::explicit,
        );
        self.contents
            .create_branch(&repo, branch.as_str(), &base_sha)
            .await
            .map_err(|error| (FailedStep::CreateBranch, error))?;
        info!(repo = %repo.slug(), %branch, %base_sha, "created branch");
        progress.branch = Some(branch.clone());

        let commit_message = truncate_message(
            request.commit_message.as_deref().unwrap_or(&request.title),
            "... (truncated)",
        );
        for (index, edit) in request.files.iter().enumerate() {
            let committed = self
                .commit_file(&repo, &branch, &commit_message, index, edit)
                .await?;
            progress.committed.push(committed);
        }

        let pull_request = NewPullRequest {
            head: branch.as_str().to_owned(),
            base: base.to_owned(),
            title: request.title.clone(),
            body: truncate_message(&request.description, "\n\n... (truncated)").into_owned(),
        };
        let created = self
            .pulls
            .create_pull_request(&repo, &pull_request)
            .await
            .map_err(|error| (FailedStep::OpenPullRequest, error))?;
        info!(
            repo = %repo.slug(),
            number = created.number,
            url = %created.html_url,
            files = progress.committed.len(),
            "opened pull request"
        );
        Ok(created)
    }

    async fn commit_file(
        &self,
        repo: &RepositoryLocator,
        branch: &BranchName,
        message: &str,
        index: usize,
        edit: &FileEdit,
    ) -> StepResult<CommittedFile> {
        let existing_sha = self
            .contents
            .file_sha(repo, &edit.path, branch.as_str())
            .await
            .map_err(|error| {
                (
                    FailedStep::ReadFileSha {
                        index,
                        path: edit.path.clone(),
                    },
                    error,
                )
            })?;
        debug!(path = %edit.path, exists = existing_sha.is_some(), "looked up file sha");

        let write = FileWrite {
            path: edit.path.clone(),
            encoded_content: STANDARD.encode(edit.content.as_bytes()),
            message: message.to_owned(),
            branch: branch.as_str().to_owned(),
            sha: existing_sha.clone(),
        };
        let outcome = self.contents.put_file(repo, &write).await.map_err(|error| {
            (
                FailedStep::WriteFile {
                    index,
                    path: edit.path.clone(),
                },
                error,
            )
        })?;
        debug!(path = %edit.path, commit = ?outcome.commit_sha, "committed file");

        Ok(CommittedFile {
            index,
            path: edit.path.clone(),
            blob_sha: outcome.content_sha,
            commit_sha: outcome.commit_sha,
            created: existing_sha.is_none(),
        })
    }
}

fn validate_edits(files: &[FileEdit]) -> StepResult<()> {
    if files.is_empty() {
        return Err((
            FailedStep::ValidateEdit { index: 0 },
            PatchError::InvalidFileEdit {
                index: 0,
                message: "no files to commit".to_owned(),
            },
        ));
    }

    for (index, edit) in files.iter().enumerate() {
        if let Some(message) = path_problem(&edit.path) {
            return Err((
                FailedStep::ValidateEdit { index },
                PatchError::InvalidFileEdit {
                    index,
                    message: message.to_owned(),
                },
            ));
        }
    }
    Ok(())
}

fn path_problem(path: &str) -> Option<&'static str> {
    if path.trim().is_empty() {
        Some("path is empty")
    } else if path.starts_with('/') {
        Some("path must be relative to the repository root")
    } else if path.split('/').any(|segment| segment == "..") {
        Some("path must not leave the repository")
    } else {
        None
    }
}

/// Shortens `text` to fit GitHub's message limits, appending `marker` when
/// anything was cut. The cut lands on a char boundary.
fn truncate_message<'text>(text: &'text str, marker: &str) -> Cow<'text, str> {
    if text.len() <= MAX_MESSAGE_BYTES {
        return Cow::Borrowed(text);
    }

    let mut cut = TRUNCATED_MESSAGE_BYTES;
    while !text.is_char_boundary(cut) {
        cut -= 1;
    }
    warn!(
        original_bytes = text.len(),
        kept_bytes = cut,
        "message too long, truncating"
    );
    let kept = text.get(..cut).unwrap_or_default();
    Cow::Owned(format!("{kept}{marker}"))
}
