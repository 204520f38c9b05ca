// SPDX-License-Identifier: MPL-2.0

//! # Release Update Checker
//!
//! Asks the GitHub Releases API for the latest published release and
//! compares its tag with the running version.
//!
//! ## API Integration
//!
//! ```text
//! GET https://api.github.com/repos/{owner}/{repo}/releases/latest
//! User-Agent: Desktop-Clock-Update-Checker
//! ```
//!
//! Only the `tag_name` string field of the response is used.
//!
//! ## Error Handling
//!
//! - Transport failure, timeout or non-success status: [`UpdateError::Network`]
//! - Body that is not JSON or lacks a string `tag_name`: [`UpdateError::Protocol`]
//! - Tag that is not a dotted version: logged, treated as "no update"

use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use super::version::ReleaseVersion;

/// Repository whose releases are checked.
pub const GITHUB_REPO: &str = "LonoxX/Desktop-Clock";

/// GitHub requires a User-Agent header on API requests.
pub const USER_AGENT: &str = "Desktop-Clock-Update-Checker";

pub const GITHUB_API_BASE: &str = "https://api.github.com";

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Error)]
pub enum UpdateError {
    /// Transport failure, timeout or non-success HTTP status
    #[error("network error: {0}")]
    Network(String),

    /// Response body did not have the expected shape
    #[error("unexpected release response: {0}")]
    Protocol(String),
}

impl From<reqwest::Error> for UpdateError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            UpdateError::Network(format!("request timed out: {}", err))
        } else {
            UpdateError::Network(err.to_string())
        }
    }
}

/// The part of the release response we care about.
#[derive(Debug, Deserialize)]
struct LatestRelease {
    tag_name: String,
}

/// Page users are sent to when they accept an update.
pub fn release_page_url(repo: &str) -> String {
    format!("https://github.com/{}/releases/latest", repo)
}

#[derive(Debug, Clone)]
pub struct UpdateChecker {
    client: reqwest::Client,
    api_base: String,
    repo: String,
}

impl UpdateChecker {
    /// Checker for this application's repository on api.github.com.
    pub fn new() -> Result<Self, UpdateError> {
        Self::with_endpoint(GITHUB_API_BASE, GITHUB_REPO, REQUEST_TIMEOUT)
    }

    /// Checker against another API base, repository or timeout.
    pub fn with_endpoint(
        api_base: &str,
        repo: &str,
        timeout: Duration,
    ) -> Result<Self, UpdateError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            repo: repo.to_string(),
        })
    }

    pub fn repo(&self) -> &str {
        &self.repo
    }

    pub fn latest_release_url(&self) -> String {
        format!("{}/repos/{}/releases/latest", self.api_base, self.repo)
    }

    /// Fetch the tag of the latest release.
    pub async fn fetch_latest_tag(&self) -> Result<String, UpdateError> {
        let url = self.latest_release_url();
        log::debug!("Requesting {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(UpdateError::Network(format!(
                "release API answered {}",
                status
            )));
        }

        let body = response.text().await?;
        parse_release_tag(&body)
    }

    /// Return the latest release if it is strictly newer than `current`.
    pub async fn check_for_update(
        &self,
        current: ReleaseVersion,
    ) -> Result<Option<ReleaseVersion>, UpdateError> {
        let tag = self.fetch_latest_tag().await?;
        Ok(newer_release(&tag, current))
    }
}

/// Extract `tag_name` from a release response body.
pub fn parse_release_tag(body: &str) -> Result<String, UpdateError> {
    serde_json::from_str::<LatestRelease>(body)
        .map(|release| release.tag_name)
        .map_err(|err| UpdateError::Protocol(err.to_string()))
}

/// Compare a release tag with the running version.
///
/// An unparsable tag carries no usable information and yields `None`.
pub fn newer_release(tag: &str, current: ReleaseVersion) -> Option<ReleaseVersion> {
    let latest = match ReleaseVersion::from_tag(tag) {
        Ok(latest) => latest,
        Err(err) => {
            log::info!("Ignoring release tag: {}", err);
            return None;
        }
    };

    log::info!("Latest release {}, running {}", latest, current);
    (latest > current).then_some(latest)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CURRENT: ReleaseVersion = ReleaseVersion::new(2, 3, 0);

    fn checker_for(server: &mockito::Server) -> UpdateChecker {
        UpdateChecker::with_endpoint(&server.url(), "test-owner/test-repo", Duration::from_secs(2))
            .unwrap()
    }

    #[test]
    fn newer_tag_is_reported() {
        assert_eq!(newer_release("v2.3.1", CURRENT), Some(ReleaseVersion::new(2, 3, 1)));
    }

    #[test]
    fn equal_or_older_tag_is_not_reported() {
        assert_eq!(newer_release("2.3.0", CURRENT), None);
        assert_eq!(newer_release("v2.2.9", CURRENT), None);
    }

    #[test]
    fn unparsable_tag_means_no_information() {
        assert_eq!(newer_release("nightly", CURRENT), None);
        assert_eq!(newer_release("v2.4", CURRENT), None);
    }

    #[test]
    fn missing_tag_name_is_protocol_error() {
        let err = parse_release_tag(r#"{"name": "Release 2"}"#).unwrap_err();
        assert!(matches!(err, UpdateError::Protocol(_)));
    }

    #[test]
    fn non_string_tag_name_is_protocol_error() {
        let err = parse_release_tag(r#"{"tag_name": 231}"#).unwrap_err();
        assert!(matches!(err, UpdateError::Protocol(_)));
    }

    #[test]
    fn invalid_json_is_protocol_error() {
        let err = parse_release_tag("<html>rate limited</html>").unwrap_err();
        assert!(matches!(err, UpdateError::Protocol(_)));
    }

    #[test]
    fn release_page_points_at_latest() {
        assert_eq!(
            release_page_url(GITHUB_REPO),
            "https://github.com/LonoxX/Desktop-Clock/releases/latest"
        );
    }

    #[tokio::test]
    async fn check_reports_newer_release() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/repos/test-owner/test-repo/releases/latest")
            .match_header("user-agent", USER_AGENT)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"tag_name": "v2.3.1", "name": "Desktop Clock 2.3.1"}"#)
            .create_async()
            .await;

        let result = checker_for(&server).check_for_update(CURRENT).await;

        mock.assert_async().await;
        assert_eq!(result.unwrap(), Some(ReleaseVersion::new(2, 3, 1)));
    }

    #[tokio::test]
    async fn check_reports_nothing_when_up_to_date() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/repos/test-owner/test-repo/releases/latest")
            .with_status(200)
            .with_body(r#"{"tag_name": "2.3.0"}"#)
            .create_async()
            .await;

        let result = checker_for(&server).check_for_update(CURRENT).await;

        assert_eq!(result.unwrap(), None);
    }

    #[tokio::test]
    async fn error_status_is_network_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/repos/test-owner/test-repo/releases/latest")
            .with_status(404)
            .with_body("Not Found")
            .create_async()
            .await;

        let result = checker_for(&server).check_for_update(CURRENT).await;

        assert!(matches!(result, Err(UpdateError::Network(_))));
    }

    #[tokio::test]
    async fn body_without_tag_is_protocol_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/repos/test-owner/test-repo/releases/latest")
            .with_status(200)
            .with_body(r#"{"message": "ok"}"#)
            .create_async()
            .await;

        let result = checker_for(&server).check_for_update(CURRENT).await;

        assert!(matches!(result, Err(UpdateError::Protocol(_))));
    }

    #[tokio::test]
    async fn unreachable_host_is_network_error() {
        let checker = UpdateChecker::with_endpoint(
            "http://127.0.0.1:9",
            "test-owner/test-repo",
            Duration::from_secs(2),
        )
        .unwrap();

        let result = checker.check_for_update(CURRENT).await;

        assert!(matches!(result, Err(UpdateError::Network(_))));
    }

    #[tokio::test]
    async fn stalled_server_times_out_as_network_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        let hold = tokio::spawn(async move {
            // Accept and never answer
            let (socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(10)).await;
            drop(socket);
        });

        let checker = UpdateChecker::with_endpoint(
            &format!("http://{}", address),
            "test-owner/test-repo",
            Duration::from_millis(200),
        )
        .unwrap();

        let result = checker.check_for_update(CURRENT).await;
        hold.abort();

        match result {
            Err(UpdateError::Network(reason)) => assert!(reason.contains("timed out")),
            other => panic!("expected timeout, got {:?}", other),
        }
    }
}
