use async_trait::async_trait;
use axum::body::Bytes;
use std::time::Duration;
use tracing::debug;

use super::types::{MovieCategory, MoviePayload};
use crate::config::TmdbConfig;

/// Sub-resources appended to a movie detail lookup, so one round trip
/// returns the movie, its credits and its external ids.
pub const DETAIL_APPEND: &str = "credits,external_ids";

/// Source of movie data. Every call takes the credential explicitly; the
/// caller decides whether one is configured.
#[async_trait]
pub trait MovieSource: Send + Sync {
    async fn movie_detail(&self, api_key: &str, id: &str) -> Result<MoviePayload, UpstreamError>;
    async fn movie_list(
        &self,
        api_key: &str,
        category: MovieCategory,
        page: u32,
    ) -> Result<MoviePayload, UpstreamError>;
}

pub struct TmdbClient {
    client: reqwest::Client,
    base_url: String,
    language: String,
}

impl TmdbClient {
    pub fn new(config: &TmdbConfig) -> Result<Self, UpstreamError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            language: config.language.clone(),
        })
    }

    async fn fetch(&self, url: &str, query: &[(&str, &str)]) -> Result<MoviePayload, UpstreamError> {
        debug!(url = %url, "upstream request");

        let response = self.client.get(url).query(query).send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;

        if !(200..300).contains(&status) {
            return Err(UpstreamError::Status { status, body });
        }

        Ok(MoviePayload(body))
    }
}

#[async_trait]
impl MovieSource for TmdbClient {
    async fn movie_detail(&self, api_key: &str, id: &str) -> Result<MoviePayload, UpstreamError> {
        let url = movie_url(&self.base_url, id);
        self.fetch(
            &url,
            &[
                ("api_key", api_key),
                ("language", self.language.as_str()),
                ("append_to_response", DETAIL_APPEND),
            ],
        )
        .await
    }

    async fn movie_list(
        &self,
        api_key: &str,
        category: MovieCategory,
        page: u32,
    ) -> Result<MoviePayload, UpstreamError> {
        let url = movie_url(&self.base_url, category.as_str());
        let page = page.to_string();
        self.fetch(
            &url,
            &[
                ("api_key", api_key),
                ("language", self.language.as_str()),
                ("page", page.as_str()),
            ],
        )
        .await
    }
}

// The segment is encoded so an id can never escape `/movie/`.
fn movie_url(base_url: &str, segment: &str) -> String {
    format!("{}/movie/{}", base_url, urlencoding::encode(segment))
}

#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("Upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Upstream returned status {status}")]
    Status { status: u16, body: Bytes },
}

impl UpstreamError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, UpstreamError::Transport(e) if e.is_timeout())
    }
}
