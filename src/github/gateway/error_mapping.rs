//! Error mapping helpers for the Octocrab gateway implementation.

use http::StatusCode;

use crate::error::PatchError;

/// Checks if a GitHub error status indicates an authentication failure.
pub(super) const fn is_auth_failure(status: StatusCode) -> bool {
    matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
}

/// Checks if an octocrab error represents a network/transport issue.
pub(super) const fn is_network_error(error: &octocrab::Error) -> bool {
    matches!(
        error,
        octocrab::Error::Http { .. }
            | octocrab::Error::Hyper { .. }
            | octocrab::Error::Service { .. }
    )
}

/// Status and message of an error response GitHub actually sent.
pub(super) fn github_failure(error: &octocrab::Error) -> Option<(StatusCode, &str)> {
    match error {
        octocrab::Error::GitHub { source, .. } => {
            Some((source.status_code, source.message.as_str()))
        }
        _ => None,
    }
}

/// Returns `true` when GitHub answered with a 404.
pub(super) fn is_not_found(error: &octocrab::Error) -> bool {
    github_failure(error).is_some_and(|(status, _)| status == StatusCode::NOT_FOUND)
}

pub(super) fn map_octocrab_error(operation: &str, error: &octocrab::Error) -> PatchError {
    if let Some((status, message)) = github_failure(error) {
        return map_http_error(operation, status, Some(message.to_owned()));
    }

    if is_network_error(error) {
        return PatchError::Network {
            message: format!("{operation} failed: {error}"),
        };
    }

    PatchError::Api {
        message: format!("{operation} failed: {error}"),
    }
}

pub(super) fn map_http_error(
    operation: &str,
    status: StatusCode,
    maybe_message: Option<String>,
) -> PatchError {
    let message = maybe_message.unwrap_or_else(|| "unknown error".to_owned());
    if is_auth_failure(status) {
        PatchError::Authentication {
            message: format!("{operation} failed: GitHub returned {status} {message}"),
        }
    } else {
        PatchError::Api {
            message: format!("{operation} failed with status {status}: {message}"),
        }
    }
}

/// Maps a failure to read the base branch head; 404 means the branch is
/// missing.
pub(super) fn map_ref_read_error(branch: &str, error: &octocrab::Error) -> PatchError {
    match github_failure(error) {
        Some((StatusCode::NOT_FOUND, message)) => PatchError::RefNotFound {
            branch: branch.to_owned(),
            message: message.to_owned(),
        },
        _ => map_octocrab_error("read branch head", error),
    }
}

/// Maps a failure to create a branch reference.
pub(super) fn map_ref_create_error(branch: &str, error: &octocrab::Error) -> PatchError {
    match github_failure(error) {
        Some((StatusCode::UNPROCESSABLE_ENTITY, message))
            if message.to_lowercase().contains("already exists") =>
        {
            PatchError::RefCreateConflict {
                branch: branch.to_owned(),
                message: message.to_owned(),
            }
        }
        _ => map_octocrab_error("create branch", error),
    }
}

/// Maps a failure to write file contents; stale or missing blob SHAs become
/// [`PatchError::ContentConflict`].
pub(super) fn map_content_write_error(path: &str, error: &octocrab::Error) -> PatchError {
    match github_failure(error) {
        Some((StatusCode::CONFLICT, message)) => PatchError::ContentConflict {
            path: path.to_owned(),
            message: message.to_owned(),
        },
        Some((StatusCode::UNPROCESSABLE_ENTITY, message))
            if message.to_lowercase().contains("sha") =>
        {
            PatchError::ContentConflict {
                path: path.to_owned(),
                message: message.to_owned(),
            }
        }
        _ => map_octocrab_error("write file", error),
    }
}

/// Maps a failed merge; 405 and 409 mean GitHub refused to merge.
pub(super) fn map_merge_error(number: u64, error: &octocrab::Error) -> PatchError {
    match github_failure(error) {
        Some((StatusCode::METHOD_NOT_ALLOWED | StatusCode::CONFLICT, message)) => {
            PatchError::PullRequestNotMergeable {
                number,
                message: message.to_owned(),
            }
        }
        _ => map_octocrab_error("merge pull request", error),
    }
}

pub(super) fn extract_github_message(body: &str) -> Option<String> {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return None;
    };
    value
        .get("message")
        .and_then(serde_json::Value::as_str)
        .map(ToOwned::to_owned)
}
