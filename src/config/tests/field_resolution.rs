//! Tests for field resolution methods (`resolve_token`, `require_repo_url`,
//! `require_file`, `require_title`, `repository_locator`, `commit_options`).

use rstest::rstest;

use crate::SutureConfig;
use crate::error::PatchError;

#[rstest]
fn resolve_token_returns_value_when_present() {
    let config = SutureConfig {
        token: Some("my-token".to_owned()),
        ..Default::default()
    };

    let token = config.resolve_token().expect("token should resolve");
    assert_eq!(token.value(), "my-token", "should return the token");
}

#[rstest]
fn resolve_token_falls_back_to_github_token() {
    let _guard = env_lock::lock_env([("GITHUB_TOKEN", Some("env-token"))]);
    let config = SutureConfig::default();

    let token = config.resolve_token().expect("token should resolve");
    assert_eq!(token.value(), "env-token");
}

#[rstest]
fn resolve_token_returns_error_when_none() {
    let _guard = env_lock::lock_env([("GITHUB_TOKEN", None::<&str>)]);
    let config = SutureConfig::default();

    assert_eq!(config.resolve_token(), Err(PatchError::MissingToken));
}

#[rstest]
fn blank_token_counts_as_missing() {
    let config = SutureConfig {
        token: Some("   ".to_owned()),
        ..Default::default()
    };

    assert_eq!(config.resolve_token(), Err(PatchError::MissingToken));
}

#[rstest]
fn require_repo_url_returns_error_when_none() {
    let config = SutureConfig::default();
    let result = config.require_repo_url();
    assert!(
        matches!(result, Err(PatchError::Configuration { .. })),
        "expected configuration error, got {result:?}"
    );
}

#[rstest]
fn require_file_returns_value_when_present() {
    let config = SutureConfig {
        file: Some("notes.md".to_owned()),
        ..Default::default()
    };

    assert_eq!(config.require_file().ok(), Some("notes.md"));
}

#[rstest]
#[case::missing(None)]
#[case::blank(Some("  "))]
fn require_title_rejects_missing_or_blank(#[case] title: Option<&str>) {
    let config = SutureConfig {
        title: title.map(ToOwned::to_owned),
        ..Default::default()
    };

    assert!(config.require_title().is_err());
}

#[rstest]
fn commit_options_follow_configuration() {
    let config = SutureConfig {
        base_branch: "develop".to_owned(),
        branch_prefix: "bot".to_owned(),
        ..Default::default()
    };

    let options = config.commit_options();
    assert_eq!(options.base_branch, "develop");
    assert_eq!(options.branch_prefix, "bot");
}

#[rstest]
fn repository_locator_uses_public_api_by_default() {
    let config = SutureConfig {
        repo_url: Some("https://github.com/acme/widgets".to_owned()),
        ..Default::default()
    };

    let locator = config.repository_locator().expect("locator should resolve");
    assert_eq!(locator.api_base().as_str(), "https://api.github.com/");
}

#[rstest]
fn repository_locator_applies_configured_api_base() {
    let config = SutureConfig {
        repo_url: Some("https://github.com/acme/widgets".to_owned()),
        api_base: Some("https://ghe.example.com/api/v3".to_owned()),
        ..Default::default()
    };

    let locator = config.repository_locator().expect("locator should resolve");
    assert_eq!(locator.api_base().as_str(), "https://ghe.example.com/api/v3");
    assert_eq!(locator.slug(), "acme/widgets");
}

#[rstest]
fn repository_locator_rejects_foreign_hosts_even_with_api_base() {
    let config = SutureConfig {
        repo_url: Some("https://gitlab.com/acme/widgets".to_owned()),
        api_base: Some("https://ghe.example.com/api/v3".to_owned()),
        ..Default::default()
    };

    assert!(matches!(
        config.repository_locator(),
        Err(PatchError::InvalidRepoUrl { .. })
    ));
}
