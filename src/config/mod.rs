//! Application configuration loaded from CLI, environment, and files.
//!
//! Values are merged with ortho-config's layered approach.
//!
//! # Precedence
//!
//! Configuration values are loaded with the following precedence (lowest to
//! highest):
//!
//! 1. **Defaults** – base branch `main`, branch prefix `coze`
//! 2. **Configuration file** – `.suture.toml` in the current directory, home
//!    directory, or XDG config directory
//! 3. **Environment variables** – `SUTURE_REPO_URL`, `SUTURE_TOKEN`, or the
//!    fallback `GITHUB_TOKEN`
//! 4. **Command-line arguments** – `--repo-url`/`-r`, `--token`/`-t`, ...
//!
//! # Configuration File
//!
//! ```toml
//! repo_url = "https://github.com/acme/widgets"
//! token = "ghp_example"
//! # GitHub Enterprise only:
//! # api_base = "https://ghe.example.com/api/v3"
//! base_branch = "main"
//! branch_prefix = "coze"
//! ```

use std::env;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

use crate::error::PatchError;
use crate::github::committer::{CommitOptions, DEFAULT_BASE_BRANCH, DEFAULT_BRANCH_PREFIX};
use crate::github::locator::{PersonalAccessToken, RepositoryLocator};

/// Operation selected by the supplied configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationMode {
    /// Print the function region around an offset in a file.
    Locate,
    /// Print file paths mentioned in a text file.
    DetectPaths,
    /// Commit a manifest of edits and open a pull request.
    Submit,
    /// Commit a manifest of edits onto an existing branch.
    UpdateBranch,
    /// Comment on a pull request.
    Comment,
    /// List open pull requests.
    ListPulls,
    /// Approve a pull request.
    Approve,
    /// Squash-merge a pull request.
    Merge,
    /// Close a pull request.
    Close,
    /// Delete a branch.
    DeleteBranch,
    /// Nothing to do.
    Unspecified,
}

/// Application configuration supporting CLI, environment, and file sources.
///
/// # Example
///
/// ```no_run
/// use ortho_config::OrthoConfig;
/// use suture::SutureConfig;
///
/// let config = SutureConfig::load().expect("failed to load configuration");
/// let repo_url = config.require_repo_url().expect("repository URL required");
/// let token = config.resolve_token().expect("token required");
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "SUTURE",
    discovery(
        dotfile_name = ".suture.toml",
        config_file_name = "suture.toml",
        app_name = "suture"
    )
)]
pub struct SutureConfig {
    /// Personal access token for GitHub API authentication.
    ///
    /// Can be provided via:
    /// - CLI: `--token <TOKEN>` or `-t <TOKEN>`
    /// - Environment: `SUTURE_TOKEN` or `GITHUB_TOKEN` (fallback)
    /// - Config file: `token = "..."`
    #[ortho_config(cli_short = 't')]
    pub token: Option<String>,

    /// Repository URL, e.g. `https://github.com/acme/widgets`.
    #[ortho_config(cli_short = 'r')]
    pub repo_url: Option<String>,

    /// API base for GitHub Enterprise servers, e.g.
    /// `https://ghe.example.com/api/v3`.
    ///
    /// Repository URLs must still name `github.com`; the API host is never
    /// taken from them.
    #[ortho_config()]
    pub api_base: Option<String>,

    /// Branch new work starts from and pull requests target.
    #[ortho_config(cli_short = 'B')]
    pub base_branch: String,

    /// Prefix for generated `feature/<prefix>-<millis>-<suffix>` branches.
    #[ortho_config(cli_short = 'R')]
    pub branch_prefix: String,

    /// Explicit branch name for `submit`; generated when absent.
    #[ortho_config(cli_short = 'b')]
    pub branch: Option<String>,

    /// Pull request title for `submit`.
    #[ortho_config()]
    pub title: Option<String>,

    /// Pull request description for `submit`; also the review body for
    /// `approve` and the comment body for `comment_on`.
    #[ortho_config()]
    pub description: Option<String>,

    /// Commit message for `submit`; defaults to the title.
    #[ortho_config(cli_short = 'm')]
    pub commit_message: Option<String>,

    /// JSON file holding an array of `{ "path", "content" }` edits.
    ///
    /// Selects `submit` mode, or the edits for `update_branch`.
    #[ortho_config()]
    pub manifest: Option<String>,

    /// Existing branch to commit the manifest onto instead of opening a new
    /// pull request.
    #[ortho_config()]
    pub update_branch: Option<String>,

    /// Pull request number to comment on, with `description` as the body.
    ///
    /// Alongside `update_branch` the comment follows the update.
    #[ortho_config()]
    pub comment_on: Option<u64>,

    /// Source or text file for `locate` and `detect-paths`.
    #[ortho_config(cli_short = 'f')]
    pub file: Option<String>,

    /// Byte offset inside `file`; together with `file` selects `locate`.
    #[ortho_config()]
    pub offset: Option<u64>,

    /// Lists paths mentioned in `file` instead of locating a region.
    ///
    /// Environment variables cannot set boolean flags.
    #[ortho_config()]
    pub detect_paths: bool,

    /// Lists open pull requests for `repo_url`.
    #[ortho_config()]
    pub list_pulls: bool,

    /// Pull request number to approve.
    #[ortho_config()]
    pub approve: Option<u64>,

    /// Pull request number to squash-merge.
    #[ortho_config()]
    pub merge: Option<u64>,

    /// Pull request number to close.
    #[ortho_config()]
    pub close: Option<u64>,

    /// Branch to delete.
    #[ortho_config()]
    pub delete_branch: Option<String>,
}

impl Default for SutureConfig {
    fn default() -> Self {
        Self {
            token: None,
            repo_url: None,
            api_base: None,
            base_branch: DEFAULT_BASE_BRANCH.to_owned(),
            branch_prefix: DEFAULT_BRANCH_PREFIX.to_owned(),
            branch: None,
            title: None,
            description: None,
            commit_message: None,
            manifest: None,
            update_branch: None,
            comment_on: None,
            file: None,
            offset: None,
            detect_paths: false,
            list_pulls: false,
            approve: None,
            merge: None,
            close: None,
            delete_branch: None,
        }
    }
}

impl SutureConfig {
    /// Resolves the token from configuration or the `GITHUB_TOKEN`
    /// environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`PatchError::MissingToken`] when no source provides a
    /// non-blank value.
    pub fn resolve_token(&self) -> Result<PersonalAccessToken, PatchError> {
        let value = self
            .token
            .clone()
            .or_else(|| env::var("GITHUB_TOKEN").ok())
            .ok_or(PatchError::MissingToken)?;
        PersonalAccessToken::new(value)
    }

    /// Returns the repository URL or an error if missing.
    ///
    /// # Errors
    ///
    /// Returns [`PatchError::Configuration`] when no URL is configured.
    pub fn require_repo_url(&self) -> Result<&str, PatchError> {
        self.repo_url
            .as_deref()
            .ok_or_else(|| PatchError::Configuration {
                message: "repository URL is required (use --repo-url or -r)".to_owned(),
            })
    }

    /// Parses the configured repository URL, applying `api_base` when set.
    ///
    /// # Errors
    ///
    /// Returns [`PatchError::Configuration`] when no URL is configured or
    /// `api_base` is malformed, and [`PatchError::InvalidRepoUrl`] when the
    /// URL does not name a `github.com` repository.
    pub fn repository_locator(&self) -> Result<RepositoryLocator, PatchError> {
        let locator = RepositoryLocator::parse(self.require_repo_url()?)?;
        match self.api_base.as_deref() {
            Some(api_base) => locator.with_api_base(api_base),
            None => Ok(locator),
        }
    }

    /// Returns the input file or an error if missing.
    ///
    /// # Errors
    ///
    /// Returns [`PatchError::Configuration`] when no file is configured.
    pub fn require_file(&self) -> Result<&str, PatchError> {
        self.file
            .as_deref()
            .ok_or_else(|| PatchError::Configuration {
                message: "an input file is required (use --file or -f)".to_owned(),
            })
    }

    /// Returns the pull request title or an error if missing.
    ///
    /// # Errors
    ///
    /// Returns [`PatchError::Configuration`] when no title is configured.
    pub fn require_title(&self) -> Result<&str, PatchError> {
        self.title
            .as_deref()
            .filter(|title| !title.trim().is_empty())
            .ok_or_else(|| PatchError::Configuration {
                message: "a pull request title is required (use --title)".to_owned(),
            })
    }

    /// Settings for the branch committer.
    #[must_use]
    pub fn commit_options(&self) -> CommitOptions {
        CommitOptions {
            base_branch: self.base_branch.clone(),
            branch_prefix: self.branch_prefix.clone(),
        }
    }

    /// Determines the operation mode based on provided configuration.
    ///
    /// Repository operations take precedence over file operations; among
    /// them the order is branch update, submit, comment, approve, merge,
    /// close, delete branch and listing.
    #[must_use]
    pub const fn operation_mode(&self) -> OperationMode {
        if self.update_branch.is_some() {
            OperationMode::UpdateBranch
        } else if self.manifest.is_some() {
            OperationMode::Submit
        } else if self.comment_on.is_some() {
            OperationMode::Comment
        } else if self.approve.is_some() {
            OperationMode::Approve
        } else if self.merge.is_some() {
            OperationMode::Merge
        } else if self.close.is_some() {
            OperationMode::Close
        } else if self.delete_branch.is_some() {
            OperationMode::DeleteBranch
        } else if self.list_pulls {
            OperationMode::ListPulls
        } else if self.file.is_some() && self.detect_paths {
            OperationMode::DetectPaths
        } else if self.file.is_some() && self.offset.is_some() {
            OperationMode::Locate
        } else {
            OperationMode::Unspecified
        }
    }

    /// Rejects configurations that select more than one repository
    /// operation.
    ///
    /// # Errors
    ///
    /// Returns [`PatchError::Configuration`] naming the conflicting options.
    pub fn validate(&self) -> Result<(), PatchError> {
        let selected: Vec<&str> = [
            ("--update-branch", self.update_branch.is_some()),
            (
                "--manifest",
                self.manifest.is_some() && self.update_branch.is_none(),
            ),
            (
                "--comment-on",
                self.comment_on.is_some() && self.update_branch.is_none(),
            ),
            ("--approve", self.approve.is_some()),
            ("--merge", self.merge.is_some()),
            ("--close", self.close.is_some()),
            ("--delete-branch", self.delete_branch.is_some()),
            ("--list-pulls", self.list_pulls),
        ]
        .into_iter()
        .filter_map(|(flag, set)| set.then_some(flag))
        .collect();

        if selected.len() > 1 {
            return Err(PatchError::Configuration {
                message: format!("choose one operation, got {}", selected.join(", ")),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;
