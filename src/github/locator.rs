//! Repository URL parsing and identity wrappers for the patch pipeline.

use url::Url;

use crate::error::PatchError;

/// Repository owner wrapper to avoid stringly typed parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryOwner(String);

impl RepositoryOwner {
    fn new(value: &str, input: &str) -> Result<Self, PatchError> {
        if value.is_empty() {
            return Err(invalid_url(input));
        }
        Ok(Self(value.to_owned()))
    }

    /// Borrow the owner value.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Repository name wrapper to prevent parameter mix-ups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryName(String);

impl RepositoryName {
    fn new(value: &str, input: &str) -> Result<Self, PatchError> {
        let trimmed = value.strip_suffix(".git").unwrap_or(value);
        if trimmed.is_empty() {
            return Err(invalid_url(input));
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the repository name.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Pull request number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PullRequestNumber(u64);

impl PullRequestNumber {
    /// Validates that the number is positive.
    ///
    /// # Errors
    ///
    /// Returns `PatchError::InvalidPullRequestNumber` for zero.
    pub const fn new(value: u64) -> Result<Self, PatchError> {
        if value == 0 {
            return Err(PatchError::InvalidPullRequestNumber);
        }
        Ok(Self(value))
    }

    /// Returns the numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Personal access token wrapper enforcing presence.
#[derive(Clone, PartialEq, Eq)]
pub struct PersonalAccessToken(String);

impl PersonalAccessToken {
    /// Validates that the token is non-empty and trims whitespace.
    ///
    /// # Errors
    ///
    /// Returns `PatchError::MissingToken` when the supplied string is blank.
    pub fn new(token: impl AsRef<str>) -> Result<Self, PatchError> {
        let trimmed = token.as_ref().trim();
        if trimmed.is_empty() {
            return Err(PatchError::MissingToken);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the token value.
    #[must_use]
    pub const fn value(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for PersonalAccessToken {
    fn as_ref(&self) -> &str {
        self.value()
    }
}

impl std::fmt::Debug for PersonalAccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PersonalAccessToken(***)")
    }
}

fn invalid_url(input: &str) -> PatchError {
    PatchError::InvalidRepoUrl {
        input: input.to_owned(),
    }
}

/// Public API base used for every repository parsed from a URL.
const PUBLIC_API_BASE: &str = "https://api.github.com";

/// Hosts a repository URL may name.
const GITHUB_HOSTS: [&str; 2] = ["github.com", "www.github.com"];

fn is_github_host(host: &str) -> bool {
    GITHUB_HOSTS
        .iter()
        .any(|known| host.eq_ignore_ascii_case(known))
}

/// Parsed `github.com` repository URL and the API base requests go to.
///
/// # Example
///
/// ```
/// use suture::github::RepositoryLocator;
///
/// let locator = RepositoryLocator::parse("github.com/acme/widgets.git")
///     .expect("should parse repository URL");
/// assert_eq!(locator.owner().as_str(), "acme");
/// assert_eq!(locator.repository().as_str(), "widgets");
/// assert_eq!(locator.api_base().as_str(), "https://api.github.com/");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryLocator {
    api_base: Url,
    owner: RepositoryOwner,
    repository: RepositoryName,
}

impl RepositoryLocator {
    /// Parses a repository URL such as `https://github.com/<owner>/<repo>`.
    ///
    /// The scheme may be omitted, a trailing `.git` is dropped and any path
    /// after the repository segment (`/tree/main`, `/pull/3`) is ignored.
    /// Only `github.com` (or `www.github.com`) is accepted; requests go to
    /// the public API unless [`with_api_base`](Self::with_api_base) says
    /// otherwise.
    ///
    /// # Errors
    ///
    /// Returns `PatchError::InvalidRepoUrl` when the input is not a URL,
    /// names another host, or lacks owner and repository segments.
    pub fn parse(input: &str) -> Result<Self, PatchError> {
        let trimmed = input.trim();
        let candidate = if trimmed.contains("://") {
            trimmed.to_owned()
        } else {
            format!("https://{trimmed}")
        };

        let parsed = Url::parse(&candidate).map_err(|_| invalid_url(input))?;
        if !matches!(parsed.scheme(), "http" | "https")
            || !parsed.host_str().is_some_and(is_github_host)
        {
            return Err(invalid_url(input));
        }

        let mut segments = parsed
            .path_segments()
            .ok_or_else(|| invalid_url(input))?
            .filter(|segment| !segment.is_empty());

        let owner_segment = segments.next().ok_or_else(|| invalid_url(input))?;
        let repository_segment = segments.next().ok_or_else(|| invalid_url(input))?;

        let owner = RepositoryOwner::new(owner_segment, input)?;
        let repository = RepositoryName::new(repository_segment, input)?;
        let api_base = Url::parse(PUBLIC_API_BASE).map_err(|_| invalid_url(input))?;

        Ok(Self {
            api_base,
            owner,
            repository,
        })
    }

    /// Sends requests for this repository to `api_base` instead of the
    /// public API, e.g. `https://ghe.example.com/api/v3`.
    ///
    /// The override is explicit configuration; it is never inferred from a
    /// repository URL.
    ///
    /// # Errors
    ///
    /// Returns `PatchError::Configuration` when `api_base` is not an
    /// `http(s)` URL.
    pub fn with_api_base(self, api_base: &str) -> Result<Self, PatchError> {
        let parsed = Url::parse(api_base.trim())
            .ok()
            .filter(|url| matches!(url.scheme(), "http" | "https") && url.has_host())
            .ok_or_else(|| PatchError::Configuration {
                message: format!("invalid API base URL: {api_base}"),
            })?;
        Ok(Self {
            api_base: parsed,
            ..self
        })
    }

    /// API base URL requests are sent to.
    #[must_use]
    pub const fn api_base(&self) -> &Url {
        &self.api_base
    }

    /// Repository owner.
    #[must_use]
    pub const fn owner(&self) -> &RepositoryOwner {
        &self.owner
    }

    /// Repository name.
    #[must_use]
    pub const fn repository(&self) -> &RepositoryName {
        &self.repository
    }

    /// `owner/repo` slug used in log fields.
    #[must_use]
    pub fn slug(&self) -> String {
        format!("{}/{}", self.owner.as_str(), self.repository.as_str())
    }

    fn repo_path(&self) -> String {
        format!(
            "/repos/{}/{}",
            self.owner.as_str(),
            self.repository.as_str()
        )
    }

    /// Path of a single branch reference, as read by `git/ref`.
    pub(crate) fn branch_ref_path(&self, branch: &str) -> String {
        format!("{}/git/ref/heads/{branch}", self.repo_path())
    }

    /// Path of a branch reference for deletion through `git/refs`.
    pub(crate) fn branch_refs_path(&self, branch: &str) -> String {
        format!("{}/git/refs/heads/{branch}", self.repo_path())
    }

    /// Collection path used to create references.
    pub(crate) fn refs_path(&self) -> String {
        format!("{}/git/refs", self.repo_path())
    }

    /// Contents path for a repository-relative file, percent-encoded per
    /// segment so names such as `app/[id]/page.tsx` survive.
    pub(crate) fn contents_path(&self, path: &str) -> String {
        let encoded = Url::parse("http://contents.invalid").map_or_else(
            |_| format!("/{path}"),
            |mut scratch| {
                if let Ok(mut segments) = scratch.path_segments_mut() {
                    segments.clear().extend(path.split('/'));
                }
                scratch.path().replace('[', "%5B").replace(']', "%5D")
            },
        );
        format!("{}/contents{encoded}", self.repo_path())
    }

    /// Returns the API path for listing or creating pull requests.
    pub(crate) fn pulls_path(&self) -> String {
        format!("{}/pulls", self.repo_path())
    }

    /// Returns the API path for issue comments on a pull request.
    pub(crate) fn issue_comments_path(&self, number: PullRequestNumber) -> String {
        format!("{}/issues/{}/comments", self.repo_path(), number.get())
    }

    /// Returns the API path of a single pull request.
    pub(crate) fn pull_request_path(&self, number: PullRequestNumber) -> String {
        format!("{}/{}", self.pulls_path(), number.get())
    }
}
