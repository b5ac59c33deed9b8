//! Pull request listing, review and housekeeping operations.

use std::io::{self, Write};

use serde::Serialize;
use suture::github::{ContentGateway, PullRequestGateway, StateChange};
use suture::{
    OctocrabHostingGateway, OperationMode, PatchError, PersonalAccessToken, PullRequestOps,
    RepositoryLocator, SutureConfig,
};

use super::output::write_json;

/// Result printed by approve, comment, merge, close and branch deletion.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ActionOutput<'a> {
    success: bool,
    action: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    number: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    branch: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    review_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    comment_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    change: Option<StateChange>,
}

impl<'a> ActionOutput<'a> {
    const fn new(action: &'a str) -> Self {
        Self {
            success: true,
            action,
            number: None,
            branch: None,
            review_id: None,
            comment_id: None,
            change: None,
        }
    }
}

/// Runs the pull request operation selected by `config`.
///
/// # Errors
///
/// Returns [`PatchError::Configuration`] if required configuration is
/// missing, otherwise propagates GitHub failures.
pub async fn run(config: &SutureConfig) -> Result<(), PatchError> {
    let mut stdout = io::stdout().lock();
    run_with_gateway_builder(config, OctocrabHostingGateway::for_token, &mut stdout).await
}

/// Runs the selected operation using a custom gateway builder.
///
/// This function is exposed for testing with fake gateways.
pub async fn run_with_gateway_builder<G, F, W>(
    config: &SutureConfig,
    build_gateway: F,
    writer: &mut W,
) -> Result<(), PatchError>
where
    G: ContentGateway + PullRequestGateway,
    F: FnOnce(&PersonalAccessToken, &RepositoryLocator) -> Result<G, PatchError>,
    W: Write,
{
    let repo_url = config.require_repo_url()?;
    let locator = config.repository_locator()?;
    let token = config.resolve_token()?;
    let gateway = build_gateway(&token, &locator)?;
    let ops = PullRequestOps::new(&gateway, &gateway);

    match (config.operation_mode(), config.approve, config.merge, config.close) {
        (OperationMode::ListPulls, ..) => {
            let open = ops.list_open_pull_requests(repo_url).await?;
            write_json(writer, &open)
        }
        (OperationMode::Approve, Some(number), ..) => {
            let review_id = ops
                .approve_pull_request(repo_url, number, config.description.clone())
                .await?;
            write_json(
                writer,
                &ActionOutput {
                    number: Some(number),
                    review_id: Some(review_id),
                    ..ActionOutput::new("approve")
                },
            )
        }
        (OperationMode::Comment, ..) => {
            let number = config.comment_on.unwrap_or_default();
            let body = config.description.as_deref().unwrap_or_default();
            let comment_id = ops.comment_on_pull_request(repo_url, number, body).await?;
            write_json(
                writer,
                &ActionOutput {
                    number: Some(number),
                    comment_id: Some(comment_id),
                    ..ActionOutput::new("comment")
                },
            )
        }
        (OperationMode::Merge, _, Some(number), _) => {
            let change = ops.merge_pull_request(repo_url, number).await?;
            write_json(
                writer,
                &ActionOutput {
                    number: Some(number),
                    change: Some(change),
                    ..ActionOutput::new("merge")
                },
            )
        }
        (OperationMode::Close, .., Some(number)) => {
            let change = ops.close_pull_request(repo_url, number).await?;
            write_json(
                writer,
                &ActionOutput {
                    number: Some(number),
                    change: Some(change),
                    ..ActionOutput::new("close")
                },
            )
        }
        (OperationMode::DeleteBranch, ..) => {
            let branch = config.delete_branch.as_deref().unwrap_or_default();
            ops.delete_branch(repo_url, branch).await?;
            write_json(
                writer,
                &ActionOutput {
                    branch: Some(branch),
                    ..ActionOutput::new("deleteBranch")
                },
            )
        }
        (mode, ..) => Err(PatchError::Configuration {
            message: format!("{mode:?} is not a pull request operation"),
        }),
    }
}
