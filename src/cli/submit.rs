//! Commits a manifest of file edits on a new branch and opens a pull request.

use std::io::{self, Write};

use suture::github::{ContentGateway, PullRequestGateway};
use suture::{
    BranchCommitter, CommitRequest, OctocrabHostingGateway, PatchError, PersonalAccessToken,
    RepositoryLocator, SutureConfig,
};

use super::output::{read_manifest, resolve_repository, write_json};

/// Runs the commit pipeline for `--manifest`.
///
/// # Errors
///
/// Returns [`PatchError::Configuration`] if required configuration is
/// missing, [`PatchError::Io`] if the manifest cannot be read, or the first
/// error of a failed run after its report has been printed. A repository URL
/// that does not name a GitHub repository is reported the same way.
pub async fn run(config: &SutureConfig) -> Result<(), PatchError> {
    let mut stdout = io::stdout().lock();
    run_with_gateway_builder(config, OctocrabHostingGateway::for_token, &mut stdout).await
}

/// Runs the commit pipeline using a custom gateway builder.
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
    let request = commit_request(config)?;
    let locator = resolve_repository(config, writer)?;
    let token = config.resolve_token()?;
    let gateway = build_gateway(&token, &locator)?;

    let committer = BranchCommitter::new(&gateway, &gateway, config.commit_options());
    let report = committer.apply(&request).await;
    let failure = report.error().cloned();

    write_json(writer, &report.into_response())?;
    failure.map_or(Ok(()), Err)
}

fn commit_request(config: &SutureConfig) -> Result<CommitRequest, PatchError> {
    let manifest_path = config.manifest.as_deref().unwrap_or_default();
    let files = read_manifest(manifest_path)?;
    Ok(CommitRequest {
        repo_url: config.require_repo_url()?.to_owned(),
        files,
        title: config.require_title()?.to_owned(),
        description: config.description.clone().unwrap_or_default(),
        commit_message: config.commit_message.clone(),
        branch: config.branch.clone(),
    })
}
