//! Semantic Scholar Graph API client

use crate::error::{ProviderError, ProviderResult};
use crate::retry::RetryPolicy;
use async_trait::async_trait;
use proximity_core::{Author, AuthorFetcher, AuthorId, FetchError, Paper, PaperAuthor};
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.semanticscholar.org/graph/v1";

const AUTHOR_FIELDS: &str = "name,paperCount,papers.title,papers.authors";

/// Connection settings for [`SemanticScholarClient`]
#[derive(Debug, Clone)]
pub struct SemanticScholarConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    /// Per-request timeout
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

impl Default for SemanticScholarConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            timeout: Duration::from_secs(30),
            retry: RetryPolicy::default(),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthorResponse {
    author_id: Option<String>,
    name: Option<String>,
    paper_count: Option<u32>,
    #[serde(default)]
    papers: Option<Vec<PaperResponse>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PaperResponse {
    paper_id: Option<String>,
    title: Option<String>,
    #[serde(default)]
    authors: Option<Vec<PaperAuthorResponse>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PaperAuthorResponse {
    author_id: Option<String>,
    name: Option<String>,
}

/// Client for the Semantic Scholar author endpoint
///
/// Cheap to share: the underlying `reqwest::Client` pools connections and
/// is safe to call from many workers at once.
pub struct SemanticScholarClient {
    client: reqwest::Client,
    config: SemanticScholarConfig,
}

impl SemanticScholarClient {
    pub fn new(config: SemanticScholarConfig) -> ProviderResult<Self> {
        if config.base_url.trim().is_empty() {
            return Err(ProviderError::InvalidConfig(
                "base_url cannot be empty".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("proximity/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &SemanticScholarConfig {
        &self.config
    }

    fn author_url(&self, id: &AuthorId) -> String {
        format!(
            "{}/author/{}",
            self.config.base_url.trim_end_matches('/'),
            id.as_str()
        )
    }

    async fn make_request(&self, id: &AuthorId) -> Result<Author, FetchError> {
        let mut request = self
            .client
            .get(self.author_url(id))
            .query(&[("fields", AUTHOR_FIELDS)]);
        if let Some(key) = &self.config.api_key {
            request = request.header("x-api-key", key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(map_status(status, id, &body));
        }

        parse_author(id, &body)
    }
}

#[async_trait]
impl AuthorFetcher for SemanticScholarClient {
    async fn fetch(&self, id: &AuthorId) -> Result<Author, FetchError> {
        if id.is_empty() {
            return Err(FetchError::InvalidId(id.to_string()));
        }

        tracing::debug!("Fetching author {} from Semantic Scholar", id);
        self.config.retry.run(|| self.make_request(id)).await
    }

    fn provider_name(&self) -> &str {
        "semantic-scholar"
    }
}

fn map_status(status: StatusCode, id: &AuthorId, body: &str) -> FetchError {
    match status {
        StatusCode::NOT_FOUND => FetchError::NotFound(id.to_string()),
        StatusCode::TOO_MANY_REQUESTS => FetchError::RateLimited,
        _ => FetchError::Status {
            code: status.as_u16(),
            message: body.chars().take(200).collect(),
        },
    }
}

/// Convert an author payload into an [`Author`].
///
/// A payload without an `authorId` is attributed to the requested id.
pub fn parse_author(requested: &AuthorId, body: &str) -> Result<Author, FetchError> {
    let response: AuthorResponse =
        serde_json::from_str(body).map_err(|e| FetchError::Malformed(e.to_string()))?;

    let author_id = response
        .author_id
        .filter(|id| !id.is_empty())
        .map(AuthorId::from)
        .unwrap_or_else(|| requested.clone());

    let papers = response
        .papers
        .unwrap_or_default()
        .into_iter()
        .map(|p| Paper {
            paper_id: p.paper_id,
            title: p.title.unwrap_or_default(),
            authors: p
                .authors
                .unwrap_or_default()
                .into_iter()
                .map(|a| PaperAuthor {
                    author_id: a.author_id.filter(|id| !id.is_empty()).map(AuthorId::from),
                    name: a.name,
                })
                .collect(),
        })
        .collect();

    Ok(Author {
        author_id,
        name: response.name,
        paper_count: response.paper_count,
        papers,
    })
}
