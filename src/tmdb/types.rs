use axum::{
    body::{Body, Bytes},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

/// Movie list endpoints the proxy is allowed to reach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MovieCategory {
    #[default]
    Popular,
    Upcoming,
    TopRated,
}

impl MovieCategory {
    /// Map a caller-supplied category. Unknown or empty values fall back to
    /// `Popular` instead of being rejected.
    pub fn from_param(value: Option<&str>) -> Self {
        match value {
            Some("upcoming") => MovieCategory::Upcoming,
            Some("top_rated") => MovieCategory::TopRated,
            _ => MovieCategory::Popular,
        }
    }

    /// Upstream path segment under `/movie/`.
    pub fn as_str(&self) -> &'static str {
        match self {
            MovieCategory::Popular => "popular",
            MovieCategory::Upcoming => "upcoming",
            MovieCategory::TopRated => "top_rated",
        }
    }
}

impl std::fmt::Display for MovieCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Upstream JSON body, kept as raw bytes and relayed unmodified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoviePayload(pub Bytes);

impl MoviePayload {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl From<Bytes> for MoviePayload {
    fn from(bytes: Bytes) -> Self {
        MoviePayload(bytes)
    }
}

impl IntoResponse for MoviePayload {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.0));
        *response.status_mut() = StatusCode::OK;
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        response
    }
}
