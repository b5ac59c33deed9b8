//! Commits a manifest of file edits onto an existing branch.

use std::io::{self, Write};

use suture::github::{ContentGateway, PullRequestComment, PullRequestGateway, PullRequestNumber};
use suture::{
    BranchCommitter, OctocrabHostingGateway, PatchError, PersonalAccessToken, RepositoryLocator,
    SutureConfig, UpdateRequest,
};

use super::output::{read_manifest, resolve_repository, write_json};

/// Runs the branch update for `--update-branch`.
///
/// # Errors
///
/// Returns [`PatchError::Configuration`] if the manifest or the comment body
/// is missing, [`PatchError::Io`] if the manifest cannot be read, or the
/// first error of a failed run after its report has been printed. A failed
/// comment is reported but does not fail the update.
pub async fn run(config: &SutureConfig) -> Result<(), PatchError> {
    let mut stdout = io::stdout().lock();
    run_with_gateway_builder(config, OctocrabHostingGateway::for_token, &mut stdout).await
}

/// Runs the branch update using a custom gateway builder.
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
    let request = update_request(config)?;
    let locator = resolve_repository(config, writer)?;
    let token = config.resolve_token()?;
    let gateway = build_gateway(&token, &locator)?;

    let committer = BranchCommitter::new(&gateway, &gateway, config.commit_options());
    let report = committer.update_branch(&request).await;
    let failure = report.error().cloned();

    write_json(writer, &report.into_response())?;
    failure.map_or(Ok(()), Err)
}

fn update_request(config: &SutureConfig) -> Result<UpdateRequest, PatchError> {
    let manifest_path = config
        .manifest
        .as_deref()
        .ok_or_else(|| PatchError::Configuration {
            message: "--update-branch needs the edits to commit (use --manifest)".to_owned(),
        })?;
    let files = read_manifest(manifest_path)?;
    let comment = config
        .comment_on
        .map(|number| requested_comment(config, number))
        .transpose()?;
    Ok(UpdateRequest {
        repo_url: config.require_repo_url()?.to_owned(),
        files,
        branch: config.update_branch.clone().unwrap_or_default(),
        commit_message: config
            .commit_message
            .clone()
            .or_else(|| config.title.clone())
            .unwrap_or_default(),
        comment,
    })
}

fn requested_comment(
    config: &SutureConfig,
    number: u64,
) -> Result<PullRequestComment, PatchError> {
    let body = config
        .description
        .as_deref()
        .filter(|body| !body.trim().is_empty())
        .ok_or_else(|| PatchError::Configuration {
            message: "--comment-on needs a comment body (use --description)".to_owned(),
        })?;
    Ok(PullRequestComment {
        number: PullRequestNumber::new(number)?,
        body: body.to_owned(),
    })
}
