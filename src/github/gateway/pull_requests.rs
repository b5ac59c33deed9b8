//! Pull request operations.

use async_trait::async_trait;

use crate::error::PatchError;
use crate::github::locator::{PullRequestNumber, RepositoryLocator};
use crate::github::models::{
    ApiCreatedId, ApiIssueComment, ApiMergeRequest, ApiMergeResponse, ApiPullRequest, ApiReview,
    ApiStateUpdate, CreatedPullRequest, NewPullRequest, PullRequestStatus, PullRequestSummary,
};

use super::error_mapping::{map_merge_error, map_octocrab_error};
use super::{OctocrabHostingGateway, PullRequestGateway};

#[async_trait]
impl PullRequestGateway for OctocrabHostingGateway {
    async fn create_pull_request(
        &self,
        repo: &RepositoryLocator,
        request: &NewPullRequest,
    ) -> Result<CreatedPullRequest, PatchError> {
        self.client
            .post::<_, CreatedPullRequest>(repo.pulls_path(), Some(request))
            .await
            .map_err(|error| map_octocrab_error("create pull request", &error))
    }

    async fn list_open_pull_requests(
        &self,
        repo: &RepositoryLocator,
    ) -> Result<Vec<PullRequestSummary>, PatchError> {
        let params = [("state", "open")];
        self.client
            .get::<Vec<ApiPullRequest>, _, _>(repo.pulls_path(), Some(&params))
            .await
            .map(|pulls| pulls.into_iter().map(PullRequestSummary::from).collect())
            .map_err(|error| map_octocrab_error("list pull requests", &error))
    }

    async fn pull_request(
        &self,
        repo: &RepositoryLocator,
        number: PullRequestNumber,
    ) -> Result<PullRequestStatus, PatchError> {
        self.client
            .get::<ApiPullRequest, _, _>(repo.pull_request_path(number), None::<&()>)
            .await
            .map(PullRequestStatus::from)
            .map_err(|error| map_octocrab_error("pull request", &error))
    }

    async fn approve_pull_request(
        &self,
        repo: &RepositoryLocator,
        number: PullRequestNumber,
        body: Option<String>,
    ) -> Result<u64, PatchError> {
        let review = ApiReview {
            event: "APPROVE",
            body: body.as_deref(),
        };
        let route = format!("{}/reviews", repo.pull_request_path(number));
        self.client
            .post::<_, ApiCreatedId>(route, Some(&review))
            .await
            .map(|response| response.id)
            .map_err(|error| map_octocrab_error("approve pull request", &error))
    }

    async fn merge_pull_request(
        &self,
        repo: &RepositoryLocator,
        number: PullRequestNumber,
    ) -> Result<(), PatchError> {
        let request = ApiMergeRequest {
            merge_method: "squash",
        };
        let route = format!("{}/merge", repo.pull_request_path(number));
        let response = self
            .client
            .put::<ApiMergeResponse, _, _>(route, Some(&request))
            .await
            .map_err(|error| map_merge_error(number.get(), &error))?;

        if response.merged {
            Ok(())
        } else {
            Err(PatchError::PullRequestNotMergeable {
                number: number.get(),
                message: response
                    .message
                    .unwrap_or_else(|| "GitHub did not merge the pull request".to_owned()),
            })
        }
    }

    async fn comment_on_pull_request(
        &self,
        repo: &RepositoryLocator,
        number: PullRequestNumber,
        body: &str,
    ) -> Result<u64, PatchError> {
        let comment = ApiIssueComment { body };
        self.client
            .post::<_, ApiCreatedId>(repo.issue_comments_path(number), Some(&comment))
            .await
            .map(|response| response.id)
            .map_err(|error| map_octocrab_error("comment on pull request", &error))
    }

    async fn close_pull_request(
        &self,
        repo: &RepositoryLocator,
        number: PullRequestNumber,
    ) -> Result<(), PatchError> {
        let update = ApiStateUpdate { state: "closed" };
        self.client
            .patch::<ApiPullRequest, _, _>(repo.pull_request_path(number), Some(&update))
            .await
            .map(|_| ())
            .map_err(|error| map_octocrab_error("close pull request", &error))
    }
}
