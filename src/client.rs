//! Directory client
//!
//! One parameterized GET against the user-search endpoint per call. The
//! client is stateless between calls and never classifies failures for its
//! caller: whatever goes wrong comes back as a [`HubSeekError`].

use crate::{AppConfig, HubSeekError, Result};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One profile as returned by the directory API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileRecord {
    /// Stable numeric account id, used as the deduplication key
    pub id: u64,
    pub login: String,
    #[serde(default)]
    pub avatar_url: String,
    #[serde(default)]
    pub html_url: String,
    /// "User" or "Organization"
    #[serde(rename = "type", default)]
    pub account_type: String,
    #[serde(default)]
    pub score: f64,
}

/// A single page of search results plus the total match count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchPage {
    pub items: Vec<ProfileRecord>,
    pub total_count: u64,
}

/// Anything that can answer a paged username search.
pub trait DirectoryClient: Send + Sync {
    fn search(&self, query: &str, page: u32, per_page: u32) -> Result<SearchPage>;
}

/// Directory client backed by the GitHub REST API.
pub struct GitHubClient {
    http: Client,
    endpoint: Url,
    token: Option<String>,
}

impl GitHubClient {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let endpoint = Url::parse(&config.api_url)
            .map_err(|_| HubSeekError::InvalidEndpoint(config.api_url.clone()))?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));

        let http = Client::builder()
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            endpoint,
            token: config.token.clone().filter(|t| !t.is_empty()),
        })
    }

    /// Full request URL for one page
    pub fn page_url(&self, query: &str, page: u32, per_page: u32) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("page", &page.to_string())
            .append_pair("per_page", &per_page.to_string());
        url
    }
}

impl DirectoryClient for GitHubClient {
    fn search(&self, query: &str, page: u32, per_page: u32) -> Result<SearchPage> {
        let url = self.page_url(query, page, per_page);
        tracing::debug!(%url, "requesting directory page");

        let mut request = self.http.get(url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send()?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text()?;

        if !status.is_success() {
            let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());
            let err = HubSeekError::from_status(
                status.as_u16(),
                header("x-ratelimit-remaining"),
                header("x-ratelimit-reset"),
                &body,
            );
            tracing::warn!(status = status.as_u16(), error = %err, "directory request failed");
            return Err(err);
        }

        parse_search_page(&body)
    }
}

/// Decode a success body into a [`SearchPage`].
pub fn parse_search_page(body: &str) -> Result<SearchPage> {
    serde_json::from_str(body).map_err(|e| HubSeekError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn page_url_encodes_query_and_paging() {
        let client = GitHubClient::new(&AppConfig::default()).unwrap();
        let url = client.page_url("john doe&x", 2, 16);
        assert_eq!(
            url.as_str(),
            "https://api.github.com/search/users?q=john+doe%26x&page=2&per_page=16"
        );
    }

    #[test]
    fn page_url_keeps_existing_endpoint_params() {
        let config = AppConfig {
            api_url: "http://localhost:8080/search/users?sort=followers".to_string(),
            ..AppConfig::default()
        };
        let client = GitHubClient::new(&config).unwrap();
        assert_eq!(
            client.page_url("ada", 1, 16).as_str(),
            "http://localhost:8080/search/users?sort=followers&q=ada&page=1&per_page=16"
        );
    }

    #[test]
    fn invalid_endpoint_is_rejected() {
        let config = AppConfig {
            api_url: "not a url".to_string(),
            ..AppConfig::default()
        };
        assert!(matches!(
            GitHubClient::new(&config),
            Err(HubSeekError::InvalidEndpoint(_))
        ));
    }

    #[test]
    fn parses_github_body_and_ignores_extra_fields() {
        let body = r#"{
            "total_count": 2,
            "incomplete_results": false,
            "items": [
                {"login": "octocat", "id": 583231, "avatar_url": "https://a/1",
                 "html_url": "https://github.com/octocat", "type": "User",
                 "score": 1.0, "site_admin": false},
                {"login": "octo-org", "id": 9919, "type": "Organization"}
            ]
        }"#;

        let page = parse_search_page(body).unwrap();
        assert_eq!(page.total_count, 2);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].login, "octocat");
        assert_eq!(page.items[0].html_url, "https://github.com/octocat");
        assert_eq!(page.items[1].account_type, "Organization");
        assert_eq!(page.items[1].avatar_url, "");
    }

    #[test]
    fn malformed_body_is_decode_error() {
        assert!(matches!(
            parse_search_page(r#"{"items": "nope"}"#),
            Err(HubSeekError::Decode(_))
        ));
        assert!(matches!(
            parse_search_page("<html>"),
            Err(HubSeekError::Decode(_))
        ));
    }
}
