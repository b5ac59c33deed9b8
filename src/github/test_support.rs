//! Canned GitHub REST payloads for HTTP-level tests.
//!
//! These builders produce the JSON bodies a stub server returns for the
//! endpoints the hosting gateway calls, so tests only spell out the fields
//! they care about.
//!
//! # Examples
//!
//! ```
//! use suture::github::test_support::git_ref;
//!
//! let body = git_ref("main", "abc123");
//! assert_eq!(body["object"]["sha"], "abc123");
//! ```

use serde_json::{Value, json};

/// Body of `GET /repos/{owner}/{repo}/git/ref/heads/{branch}`.
#[must_use]
pub fn git_ref(branch: &str, sha: &str) -> Value {
    json!({
        "ref": format!("refs/heads/{branch}"),
        "object": { "sha": sha, "type": "commit" }
    })
}

/// Body of `GET /repos/{owner}/{repo}/contents/{path}` for an existing file.
#[must_use]
pub fn content_entry(path: &str, sha: &str) -> Value {
    json!({ "type": "file", "path": path, "sha": sha })
}

/// Body of a successful `PUT /repos/{owner}/{repo}/contents/{path}`.
#[must_use]
pub fn content_written(path: &str, blob_sha: &str, commit_sha: &str) -> Value {
    json!({
        "content": { "path": path, "sha": blob_sha },
        "commit": { "sha": commit_sha }
    })
}

/// Pull request object as returned by the pulls endpoints.
#[must_use]
pub fn pull_request(number: u64, state: &str, merged: bool) -> Value {
    json!({
        "number": number,
        "title": format!("Pull request {number}"),
        "state": state,
        "html_url": format!("https://github.com/acme/widgets/pull/{number}"),
        "user": { "login": "octocat" },
        "head": { "ref": format!("feature/coze-{number}") },
        "created_at": "2026-01-02T03:04:05Z",
        "updated_at": "2026-01-02T03:04:05Z",
        "merged": merged,
        "mergeable": state == "open",
        "mergeable_state": if state == "open" { "clean" } else { "unknown" }
    })
}

/// GitHub error body carrying `message`.
#[must_use]
pub fn error_body(message: &str) -> Value {
    json!({
        "message": message,
        "documentation_url": "https://docs.github.com/rest"
    })
}
