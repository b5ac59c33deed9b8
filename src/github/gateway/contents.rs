//! Branch reference and file content operations.

use async_trait::async_trait;
use http::{StatusCode, Uri};

use crate::error::PatchError;
use crate::github::locator::RepositoryLocator;
use crate::github::models::{
    ApiContentEntry, ApiCreateRef, ApiPutContent, ApiPutContentResponse, ApiRef, FileWrite,
    FileWriteOutcome,
};

use super::error_mapping::{
    extract_github_message, is_not_found, map_content_write_error, map_http_error,
    map_octocrab_error, map_ref_create_error, map_ref_read_error,
};
use super::{ContentGateway, OctocrabHostingGateway};

#[async_trait]
impl ContentGateway for OctocrabHostingGateway {
    async fn branch_head(
        &self,
        repo: &RepositoryLocator,
        branch: &str,
    ) -> Result<String, PatchError> {
        self.client
            .get::<ApiRef, _, _>(repo.branch_ref_path(branch), None::<&()>)
            .await
            .map(|reference| reference.object.sha)
            .map_err(|error| map_ref_read_error(branch, &error))
    }

    async fn create_branch(
        &self,
        repo: &RepositoryLocator,
        branch: &str,
        sha: &str,
    ) -> Result<(), PatchError> {
        let body = ApiCreateRef {
            reference: format!("refs/heads/{branch}"),
            sha,
        };
        self.client
            .post::<_, serde_json::Value>(repo.refs_path(), Some(&body))
            .await
            .map(|_| ())
            .map_err(|error| map_ref_create_error(branch, &error))
    }

    async fn delete_branch(
        &self,
        repo: &RepositoryLocator,
        branch: &str,
    ) -> Result<(), PatchError> {
        let uri: Uri = repo
            .branch_refs_path(branch)
            .parse::<Uri>()
            .map_err(|error| PatchError::Configuration {
                message: format!("invalid branch path for '{branch}': {error}"),
            })?;

        let response = self
            .client
            ._delete(uri, None::<&()>)
            .await
            .map_err(|error| map_octocrab_error("delete branch", &error))?;

        match response.status() {
            StatusCode::NO_CONTENT | StatusCode::OK => Ok(()),
            status => {
                let body = self
                    .client
                    .body_to_string(response)
                    .await
                    .unwrap_or_else(|_| String::new());

                Err(map_http_error(
                    "delete branch",
                    status,
                    extract_github_message(&body),
                ))
            }
        }
    }

    async fn file_sha(
        &self,
        repo: &RepositoryLocator,
        path: &str,
        branch: &str,
    ) -> Result<Option<String>, PatchError> {
        let params = [("ref", branch)];
        match self
            .client
            .get::<ApiContentEntry, _, _>(repo.contents_path(path), Some(&params))
            .await
        {
            Ok(entry) => Ok(Some(entry.sha)),
            Err(error) if is_not_found(&error) => Ok(None),
            Err(error) => Err(map_octocrab_error("read file", &error)),
        }
    }

    async fn put_file(
        &self,
        repo: &RepositoryLocator,
        write: &FileWrite,
    ) -> Result<FileWriteOutcome, PatchError> {
        let body = ApiPutContent {
            message: &write.message,
            content: &write.encoded_content,
            branch: &write.branch,
            sha: write.sha.as_deref(),
        };
        self.client
            .put::<ApiPutContentResponse, _, _>(repo.contents_path(&write.path), Some(&body))
            .await
            .map(FileWriteOutcome::from)
            .map_err(|error| map_content_write_error(&write.path, &error))
    }
}
