//! GitHub GraphQL API client for fetching merged PRs and reviews

use std::time::Duration;

use common::snapshot::RawPullRequest;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use tracing::debug;

use crate::source::{PullRequestPage, PullRequestSource};

pub const GITHUB_GRAPHQL_URL: &str = "https://api.github.com/graphql";

/// Merged PRs, most recently updated first, with up to 50 reviews each
const MERGED_PRS_QUERY: &str = r#"
query($owner: String!, $name: String!, $pageSize: Int!, $cursor: String) {
  repository(owner: $owner, name: $name) {
    pullRequests(first: $pageSize, after: $cursor, states: MERGED, orderBy: {field: UPDATED_AT, direction: DESC}) {
      pageInfo { hasNextPage endCursor }
      nodes {
        number
        title
        url
        createdAt
        mergedAt
        additions
        deletions
        changedFiles
        author { login }
        reviews(first: 50) {
          nodes {
            author { login }
            state
            createdAt
          }
        }
      }
    }
  }
}
"#;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Missing GITHUB_TOKEN env var")]
    MissingToken,
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Rate limited, retry after {retry_after} seconds")]
    RateLimited { retry_after: u64 },
    #[error("GitHub API error: {status} - {message}")]
    Api { status: u16, message: String },
    #[error("GraphQL errors: {0}")]
    GraphQl(String),
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl From<ClientError> for common::Error {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::MissingToken => common::Error::Config(err.to_string()),
            ClientError::Http(ref e) if e.is_decode() => common::Error::DataShape(err.to_string()),
            ClientError::Http(_) | ClientError::RateLimited { .. } | ClientError::Api { .. } => {
                common::Error::Transport(err.to_string())
            }
            ClientError::GraphQl(_) | ClientError::MalformedResponse(_) => {
                common::Error::DataShape(err.to_string())
            }
        }
    }
}

/// GitHub API client
pub struct GitHubClient {
    client: reqwest::Client,
    token: Option<String>,
    endpoint: String,
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct RepositoryData {
    repository: Option<RepositoryNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RepositoryNode {
    pull_requests: PullRequestConnection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PullRequestConnection {
    page_info: PageInfo,
    #[serde(default)]
    nodes: Vec<RawPullRequest>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageInfo {
    has_next_page: bool,
    end_cursor: Option<String>,
}

impl GitHubClient {
    pub fn new(token: Option<String>, timeout: Duration) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            token,
            endpoint: GITHUB_GRAPHQL_URL.to_string(),
        })
    }

    /// Point the client at a different GraphQL endpoint (GitHub Enterprise)
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    fn headers(&self) -> Result<HeaderMap, ClientError> {
        let token = self.token.as_deref().ok_or(ClientError::MissingToken)?;

        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("impact-report/0.1"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let auth = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| ClientError::MissingToken)?;
        headers.insert(AUTHORIZATION, auth);
        Ok(headers)
    }

    async fn post_graphql(&self, body: serde_json::Value) -> Result<String, ClientError> {
        debug!("POST {}", self.endpoint);
        let resp = self
            .client
            .post(&self.endpoint)
            .headers(self.headers()?)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if status == reqwest::StatusCode::FORBIDDEN
            || status == reqwest::StatusCode::TOO_MANY_REQUESTS
        {
            let retry_after = resp
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            return Err(ClientError::RateLimited { retry_after });
        }
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(resp.text().await?)
    }
}

/// Decode one `pullRequests` page out of a GraphQL response body
pub fn parse_page_response(body: &str) -> Result<PullRequestPage, ClientError> {
    let payload: GraphQlResponse<RepositoryData> = serde_json::from_str(body)
        .map_err(|e| ClientError::MalformedResponse(e.to_string()))?;

    if let Some(errors) = payload.errors.filter(|e| !e.is_empty()) {
        let messages: Vec<_> = errors.into_iter().map(|e| e.message).collect();
        return Err(ClientError::GraphQl(messages.join("; ")));
    }

    let repository = payload
        .data
        .ok_or_else(|| ClientError::MalformedResponse("missing data".to_string()))?
        .repository
        .ok_or_else(|| ClientError::MalformedResponse("repository not found".to_string()))?;

    let connection = repository.pull_requests;
    Ok(PullRequestPage {
        nodes: connection.nodes,
        has_next_page: connection.page_info.has_next_page,
        end_cursor: connection.page_info.end_cursor,
    })
}

impl PullRequestSource for GitHubClient {
    fn check_credentials(&self) -> Result<(), ClientError> {
        match self.token.as_deref() {
            Some(t) if !t.trim().is_empty() => Ok(()),
            _ => Err(ClientError::MissingToken),
        }
    }

    async fn fetch_merged_page(
        &self,
        owner: &str,
        repo: &str,
        page_size: u32,
        cursor: Option<&str>,
    ) -> Result<PullRequestPage, ClientError> {
        let body = json!({
            "query": MERGED_PRS_QUERY,
            "variables": {
                "owner": owner,
                "name": repo,
                "pageSize": page_size,
                "cursor": cursor,
            },
        });

        let text = self.post_graphql(body).await?;
        parse_page_response(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(token: Option<&str>) -> GitHubClient {
        GitHubClient::new(token.map(str::to_string), Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_client_creation() {
        let c = client(None);
        assert!(c.token.is_none());
        assert_eq!(c.endpoint, GITHUB_GRAPHQL_URL);

        let c = client(Some("test")).with_endpoint("http://localhost:9/graphql");
        assert_eq!(c.token, Some("test".to_string()));
        assert_eq!(c.endpoint, "http://localhost:9/graphql");
    }

    #[test]
    fn test_credentials_required() {
        assert!(matches!(
            client(None).check_credentials(),
            Err(ClientError::MissingToken)
        ));
        assert!(matches!(
            client(Some(" ")).check_credentials(),
            Err(ClientError::MissingToken)
        ));
        assert!(client(Some("ghp_x")).check_credentials().is_ok());
    }

    #[test]
    fn test_headers_carry_bearer_token() {
        let headers = client(Some("ghp_x")).headers().unwrap();
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer ghp_x");
    }

    #[tokio::test]
    async fn test_fetch_without_token_makes_no_request() {
        let c = client(None).with_endpoint("http://127.0.0.1:1/graphql");
        let err = c.fetch_merged_page("o", "r", 50, None).await.unwrap_err();
        assert!(matches!(err, ClientError::MissingToken));
    }

    #[test]
    fn test_parse_page() {
        let body = r#"{
            "data": {"repository": {"pullRequests": {
                "pageInfo": {"hasNextPage": true, "endCursor": "Y3Vyc29y"},
                "nodes": [{
                    "number": 7,
                    "title": "Add thing",
                    "url": "https://github.com/o/r/pull/7",
                    "createdAt": "2026-03-01T00:00:00Z",
                    "mergedAt": "2026-03-01T05:00:00Z",
                    "additions": 3,
                    "deletions": 1,
                    "changedFiles": 1,
                    "author": {"login": "alice"},
                    "reviews": {"nodes": []}
                }]
            }}}
        }"#;

        let page = parse_page_response(body).unwrap();
        assert!(page.has_next_page);
        assert_eq!(page.end_cursor.as_deref(), Some("Y3Vyc29y"));
        assert_eq!(page.nodes.len(), 1);
        assert_eq!(page.nodes[0].number, 7);
    }

    #[test]
    fn test_parse_graphql_errors() {
        let body = r#"{"errors": [{"message": "Bad credentials"}, {"message": "again"}]}"#;
        match parse_page_response(body) {
            Err(ClientError::GraphQl(msg)) => assert_eq!(msg, "Bad credentials; again"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_parse_missing_repository() {
        let body = r#"{"data": {"repository": null}}"#;
        assert!(matches!(
            parse_page_response(body),
            Err(ClientError::MalformedResponse(_))
        ));
        assert!(matches!(
            parse_page_response("<html>"),
            Err(ClientError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_error_kinds_map_to_common_errors() {
        assert!(matches!(
            common::Error::from(ClientError::MissingToken),
            common::Error::Config(_)
        ));
        assert!(matches!(
            common::Error::from(ClientError::RateLimited { retry_after: 5 }),
            common::Error::Transport(_)
        ));
        assert!(matches!(
            common::Error::from(ClientError::GraphQl("x".into())),
            common::Error::DataShape(_)
        ));
    }
}
