//! Tests for the Octocrab hosting gateway against a mock GitHub server.

use rstest::{fixture, rstest};
use serde_json::json;
use tokio::runtime::Runtime;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::{ContentGateway, OctocrabHostingGateway, PullRequestGateway};
use crate::error::PatchError;
use crate::github::locator::{PersonalAccessToken, PullRequestNumber, RepositoryLocator};
use crate::github::models::{FileWrite, NewPullRequest};

const REPO: &str = "/api/v3/repos/owner/repo";

struct GatewayFixture {
    server: MockServer,
    locator: RepositoryLocator,
    gateway: OctocrabHostingGateway,
    runtime: Runtime,
}

impl GatewayFixture {
    fn block_on<F: std::future::Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    fn mount(&self, mock: Mock) {
        self.block_on(mock.mount(&self.server));
    }
}

#[fixture]
fn token() -> PersonalAccessToken {
    PersonalAccessToken::new("valid-token").expect("token should be valid")
}

#[fixture]
fn gateway_fixture(token: PersonalAccessToken) -> GatewayFixture {
    let runtime = Runtime::new().expect("runtime should start");
    let server = runtime.block_on(MockServer::start());
    let locator = RepositoryLocator::parse("https://github.com/owner/repo")
        .and_then(|parsed| parsed.with_api_base(&format!("{}/api/v3", server.uri())))
        .expect("should create repository locator");
    let gateway = {
        let _guard = runtime.enter();
        OctocrabHostingGateway::for_token(&token, &locator).expect("should create gateway")
    };
    GatewayFixture {
        server,
        locator,
        gateway,
        runtime,
    }
}

fn github_error(status: u16, message: &str) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(json!({
        "message": message,
        "documentation_url": "https://docs.github.com/rest"
    }))
}

#[rstest]
fn branch_head_reads_ref_sha(gateway_fixture: GatewayFixture) {
    gateway_fixture.mount(
        Mock::given(method("GET"))
            .and(path(format!("{REPO}/git/ref/heads/main")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ref": "refs/heads/main",
                "object": { "sha": "base123", "type": "commit" }
            }))),
    );

    let sha = gateway_fixture
        .block_on(
            gateway_fixture
                .gateway
                .branch_head(&gateway_fixture.locator, "main"),
        )
        .expect("head should resolve");

    assert_eq!(sha, "base123");
}

#[rstest]
fn missing_base_branch_maps_to_ref_not_found(gateway_fixture: GatewayFixture) {
    gateway_fixture.mount(
        Mock::given(method("GET"))
            .and(path(format!("{REPO}/git/ref/heads/trunk")))
            .respond_with(github_error(404, "Not Found")),
    );

    let error = gateway_fixture
        .block_on(
            gateway_fixture
                .gateway
                .branch_head(&gateway_fixture.locator, "trunk"),
        )
        .expect_err("missing branch should fail");

    assert_eq!(
        error,
        PatchError::RefNotFound {
            branch: "trunk".to_owned(),
            message: "Not Found".to_owned(),
        }
    );
}

#[rstest]
fn create_branch_posts_full_ref(gateway_fixture: GatewayFixture) {
    gateway_fixture.mount(
        Mock::given(method("POST"))
            .and(path(format!("{REPO}/git/refs")))
            .and(body_json(json!({
                "ref": "refs/heads/feature/coze-1",
                "sha": "base123"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "ref": "refs/heads/feature/coze-1",
                "object": { "sha": "base123" }
            })))
            .expect(1),
    );

    gateway_fixture
        .block_on(gateway_fixture.gateway.create_branch(
            &gateway_fixture.locator,
            "feature/coze-1",
            "base123",
        ))
        .expect("branch should be created");
}

#[rstest]
fn existing_branch_maps_to_create_conflict(gateway_fixture: GatewayFixture) {
    gateway_fixture.mount(
        Mock::given(method("POST"))
            .and(path(format!("{REPO}/git/refs")))
            .respond_with(github_error(422, "Reference already exists")),
    );

    let error = gateway_fixture
        .block_on(gateway_fixture.gateway.create_branch(
            &gateway_fixture.locator,
            "feature/taken",
            "base123",
        ))
        .expect_err("duplicate branch should fail");

    assert!(
        matches!(error, PatchError::RefCreateConflict { ref branch, .. } if branch == "feature/taken"),
        "unexpected error: {error:?}"
    );
}

#[rstest]
fn file_sha_is_none_for_missing_file(gateway_fixture: GatewayFixture) {
    gateway_fixture.mount(
        Mock::given(method("GET"))
            .and(path(format!("{REPO}/contents/src/new.ts")))
            .and(query_param("ref", "feature/x"))
            .respond_with(github_error(404, "Not Found")),
    );

    let sha = gateway_fixture
        .block_on(gateway_fixture.gateway.file_sha(
            &gateway_fixture.locator,
            "src/new.ts",
            "feature/x",
        ))
        .expect("404 is not an error");

    assert_eq!(sha, None);
}

#[rstest]
fn file_sha_returns_existing_blob(gateway_fixture: GatewayFixture) {
    gateway_fixture.mount(
        Mock::given(method("GET"))
            .and(path(format!("{REPO}/contents/src/old.ts")))
            .and(query_param("ref", "feature/x"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "type": "file",
                "path": "src/old.ts",
                "sha": "blobX"
            }))),
    );

    let sha = gateway_fixture
        .block_on(gateway_fixture.gateway.file_sha(
            &gateway_fixture.locator,
            "src/old.ts",
            "feature/x",
        ))
        .expect("sha lookup should succeed");

    assert_eq!(sha.as_deref(), Some("blobX"));
}

#[rstest]
fn file_sha_surfaces_auth_failures(gateway_fixture: GatewayFixture) {
    gateway_fixture.mount(
        Mock::given(method("GET"))
            .and(path(format!("{REPO}/contents/a.ts")))
            .respond_with(github_error(401, "Bad credentials")),
    );

    let error = gateway_fixture
        .block_on(
            gateway_fixture
                .gateway
                .file_sha(&gateway_fixture.locator, "a.ts", "main"),
        )
        .expect_err("401 should fail");

    assert!(matches!(error, PatchError::Authentication { .. }));
}

fn sample_write(sha: Option<&str>) -> FileWrite {
    FileWrite {
        path: "a.ts".to_owned(),
        encoded_content: "ZXhwb3J0IGNvbnN0IGE9MTs=".to_owned(),
        message: "Feat: add a".to_owned(),
        branch: "feature/x".to_owned(),
        sha: sha.map(ToOwned::to_owned),
    }
}

#[rstest]
fn put_file_omits_sha_for_new_files(gateway_fixture: GatewayFixture) {
    gateway_fixture.mount(
        Mock::given(method("PUT"))
            .and(path(format!("{REPO}/contents/a.ts")))
            .and(body_json(json!({
                "message": "Feat: add a",
                "content": "ZXhwb3J0IGNvbnN0IGE9MTs=",
                "branch": "feature/x"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "content": { "sha": "blob1" },
                "commit": { "sha": "commit1" }
            })))
            .expect(1),
    );

    let outcome = gateway_fixture
        .block_on(
            gateway_fixture
                .gateway
                .put_file(&gateway_fixture.locator, &sample_write(None)),
        )
        .expect("write should succeed");

    assert_eq!(outcome.content_sha.as_deref(), Some("blob1"));
    assert_eq!(outcome.commit_sha.as_deref(), Some("commit1"));
}

#[rstest]
#[case::stale_sha(409, "a.ts does not match blobX")]
#[case::missing_sha(422, "Invalid request.\n\n\"sha\" wasn't supplied.")]
fn put_file_maps_sha_rejections_to_conflict(
    gateway_fixture: GatewayFixture,
    #[case] status: u16,
    #[case] message: &str,
) {
    gateway_fixture.mount(
        Mock::given(method("PUT"))
            .and(path(format!("{REPO}/contents/a.ts")))
            .respond_with(github_error(status, message)),
    );

    let error = gateway_fixture
        .block_on(
            gateway_fixture
                .gateway
                .put_file(&gateway_fixture.locator, &sample_write(Some("blobX"))),
        )
        .expect_err("write should fail");

    assert_eq!(
        error,
        PatchError::ContentConflict {
            path: "a.ts".to_owned(),
            message: message.to_owned(),
        }
    );
}

#[rstest]
fn delete_branch_accepts_no_content(gateway_fixture: GatewayFixture) {
    gateway_fixture.mount(
        Mock::given(method("DELETE"))
            .and(path(format!("{REPO}/git/refs/heads/feature/x")))
            .respond_with(ResponseTemplate::new(204))
            .expect(1),
    );

    gateway_fixture
        .block_on(
            gateway_fixture
                .gateway
                .delete_branch(&gateway_fixture.locator, "feature/x"),
        )
        .expect("delete should succeed");
}

#[rstest]
fn delete_branch_reports_github_message(gateway_fixture: GatewayFixture) {
    gateway_fixture.mount(
        Mock::given(method("DELETE"))
            .and(path(format!("{REPO}/git/refs/heads/gone")))
            .respond_with(github_error(422, "Reference does not exist")),
    );

    let error = gateway_fixture
        .block_on(
            gateway_fixture
                .gateway
                .delete_branch(&gateway_fixture.locator, "gone"),
        )
        .expect_err("delete should fail");

    assert!(
        matches!(error, PatchError::Api { ref message } if message.contains("Reference does not exist")),
        "unexpected error: {error:?}"
    );
}

#[rstest]
fn create_pull_request_returns_number_and_url(gateway_fixture: GatewayFixture) {
    gateway_fixture.mount(
        Mock::given(method("POST"))
            .and(path(format!("{REPO}/pulls")))
            .and(body_json(json!({
                "head": "feature/x",
                "base": "main",
                "title": "Feat: add a",
                "body": "adds a"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "number": 12,
                "html_url": "https://github.com/owner/repo/pull/12",
                "state": "open"
            }))),
    );

    let request = NewPullRequest {
        head: "feature/x".to_owned(),
        base: "main".to_owned(),
        title: "Feat: add a".to_owned(),
        body: "adds a".to_owned(),
    };
    let created = gateway_fixture
        .block_on(
            gateway_fixture
                .gateway
                .create_pull_request(&gateway_fixture.locator, &request),
        )
        .expect("pull request should open");

    assert_eq!(created.number, 12);
    assert_eq!(created.html_url, "https://github.com/owner/repo/pull/12");
}

#[rstest]
fn list_open_pull_requests_requests_open_state(gateway_fixture: GatewayFixture) {
    gateway_fixture.mount(
        Mock::given(method("GET"))
            .and(path(format!("{REPO}/pulls")))
            .and(query_param("state", "open"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {
                    "number": 3,
                    "title": "Feat: add a",
                    "state": "open",
                    "html_url": "https://github.com/owner/repo/pull/3",
                    "user": { "login": "octocat" },
                    "head": { "ref": "feature/coze-1" },
                    "created_at": "2025-01-01T00:00:00Z",
                    "updated_at": "2025-01-02T00:00:00Z"
                }
            ]))),
    );

    let pulls = gateway_fixture
        .block_on(
            gateway_fixture
                .gateway
                .list_open_pull_requests(&gateway_fixture.locator),
        )
        .expect("listing should succeed");

    assert_eq!(pulls.len(), 1);
    let first = pulls.first().expect("one pull request");
    assert_eq!(first.number, 3);
    assert_eq!(first.author.as_deref(), Some("octocat"));
    assert_eq!(first.head_branch.as_deref(), Some("feature/coze-1"));
}

#[rstest]
fn approve_posts_approve_event(gateway_fixture: GatewayFixture) {
    gateway_fixture.mount(
        Mock::given(method("POST"))
            .and(path(format!("{REPO}/pulls/3/reviews")))
            .and(body_json(json!({ "event": "APPROVE" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 80,
                "state": "APPROVED"
            })))
            .expect(1),
    );

    let number = PullRequestNumber::new(3).expect("number");
    let review_id = gateway_fixture
        .block_on(gateway_fixture.gateway.approve_pull_request(
            &gateway_fixture.locator,
            number,
            None,
        ))
        .expect("approval should succeed");

    assert_eq!(review_id, 80);
}

#[rstest]
fn merge_squashes_pull_request(gateway_fixture: GatewayFixture) {
    gateway_fixture.mount(
        Mock::given(method("PUT"))
            .and(path(format!("{REPO}/pulls/3/merge")))
            .and(body_json(json!({ "merge_method": "squash" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "sha": "merge1",
                "merged": true,
                "message": "Pull Request successfully merged"
            })))
            .expect(1),
    );

    let number = PullRequestNumber::new(3).expect("number");
    gateway_fixture
        .block_on(
            gateway_fixture
                .gateway
                .merge_pull_request(&gateway_fixture.locator, number),
        )
        .expect("merge should succeed");
}

#[rstest]
fn merge_refusal_maps_to_not_mergeable(gateway_fixture: GatewayFixture) {
    gateway_fixture.mount(
        Mock::given(method("PUT"))
            .and(path(format!("{REPO}/pulls/4/merge")))
            .respond_with(github_error(405, "Pull Request is not mergeable")),
    );

    let number = PullRequestNumber::new(4).expect("number");
    let error = gateway_fixture
        .block_on(
            gateway_fixture
                .gateway
                .merge_pull_request(&gateway_fixture.locator, number),
        )
        .expect_err("merge should fail");

    assert_eq!(
        error,
        PatchError::PullRequestNotMergeable {
            number: 4,
            message: "Pull Request is not mergeable".to_owned(),
        }
    );
}

#[rstest]
fn close_patches_state(gateway_fixture: GatewayFixture) {
    gateway_fixture.mount(
        Mock::given(method("PATCH"))
            .and(path(format!("{REPO}/pulls/5")))
            .and(body_json(json!({ "state": "closed" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "number": 5,
                "state": "closed"
            })))
            .expect(1),
    );

    let number = PullRequestNumber::new(5).expect("number");
    gateway_fixture
        .block_on(
            gateway_fixture
                .gateway
                .close_pull_request(&gateway_fixture.locator, number),
        )
        .expect("close should succeed");
}

#[rstest]
fn comment_posts_to_issue_comments(gateway_fixture: GatewayFixture) {
    gateway_fixture.mount(
        Mock::given(method("POST"))
            .and(path(format!("{REPO}/issues/6/comments")))
            .and(body_json(json!({ "body": "Updated src/a.ts" })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": 4411,
                "body": "Updated src/a.ts"
            })))
            .expect(1),
    );

    let number = PullRequestNumber::new(6).expect("number");
    let comment_id = gateway_fixture
        .block_on(gateway_fixture.gateway.comment_on_pull_request(
            &gateway_fixture.locator,
            number,
            "Updated src/a.ts",
        ))
        .expect("comment should succeed");

    assert_eq!(comment_id, 4411);
}

#[rstest]
fn comment_on_locked_issue_maps_to_api_error(gateway_fixture: GatewayFixture) {
    gateway_fixture.mount(
        Mock::given(method("POST"))
            .and(path(format!("{REPO}/issues/6/comments")))
            .respond_with(github_error(422, "Issue is locked")),
    );

    let number = PullRequestNumber::new(6).expect("number");
    let error = gateway_fixture
        .block_on(gateway_fixture.gateway.comment_on_pull_request(
            &gateway_fixture.locator,
            number,
            "late",
        ))
        .expect_err("comment should fail");

    assert!(
        matches!(error, PatchError::Api { ref message } if message.contains("Issue is locked")),
        "unexpected error: {error:?}"
    );
}
