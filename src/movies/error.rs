use axum::{
    body::Body,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::warn;

use crate::tmdb::UpstreamError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("credential missing")]
    MissingCredential,
    #[error("identifier is required")]
    MissingIdentifier,
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub status_code: u16,
    pub status_message: String,
}

fn error_response(status: StatusCode, message: &str) -> Response {
    let body = ErrorBody {
        status_code: status.as_u16(),
        status_message: message.to_string(),
    };
    (status, Json(body)).into_response()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::MissingCredential => {
                error_response(StatusCode::INTERNAL_SERVER_ERROR, "credential missing")
            }
            ApiError::MissingIdentifier => {
                error_response(StatusCode::BAD_REQUEST, "identifier is required")
            }
            // Upstream status and body are relayed as they came in.
            ApiError::Upstream(UpstreamError::Status { status, body }) => {
                warn!(status = status, "upstream returned an error");
                let mut response = Response::new(Body::from(body));
                *response.status_mut() =
                    StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
                response.headers_mut().insert(
                    header::CONTENT_TYPE,
                    header::HeaderValue::from_static("application/json"),
                );
                response
            }
            ApiError::Upstream(e) if e.is_timeout() => {
                warn!(error = %e, "upstream timed out");
                error_response(StatusCode::GATEWAY_TIMEOUT, "upstream request timed out")
            }
            ApiError::Upstream(e) => {
                warn!(error = %e, "upstream request failed");
                error_response(StatusCode::BAD_GATEWAY, "upstream request failed")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::server::{build_router, AppState};
    use crate::tmdb::TmdbClient;
    use axum::body::{to_bytes, Bytes};
    use std::sync::Arc;
    use tower::ServiceExt;

    async fn parts(err: ApiError) -> (StatusCode, Bytes) {
        let response = err.into_response();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body)
    }

    #[tokio::test]
    async fn test_missing_credential() {
        let (status, body) = parts(ApiError::MissingCredential).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["statusCode"], 500);
        assert_eq!(json["statusMessage"], "credential missing");
    }

    #[tokio::test]
    async fn test_missing_identifier() {
        let (status, body) = parts(ApiError::MissingIdentifier).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["statusMessage"], "identifier is required");
    }

    #[tokio::test]
    async fn test_upstream_status_relayed() {
        let upstream = Bytes::from_static(br#"{"status_code":7,"status_message":"Invalid API key"}"#);
        let err = ApiError::Upstream(UpstreamError::Status {
            status: 401,
            body: upstream.clone(),
        });
        let (status, body) = parts(err).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, upstream);
    }

    async fn through_router(base_url: String, timeout: Option<u64>) -> (StatusCode, Bytes) {
        let mut config = Config::default();
        config.tmdb.api_key = Some("key".to_string());
        config.tmdb.base_url = base_url;
        config.tmdb.timeout = timeout;

        let client = TmdbClient::new(&config.tmdb).unwrap();
        let app = build_router(AppState::new(config, Arc::new(client)));
        let req = axum::http::Request::builder()
            .uri("/api/movies/42")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(req).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body)
    }

    #[tokio::test]
    async fn test_upstream_timeout_is_gateway_timeout() {
        // Accepts connections and never answers.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let (status, body) = through_router(format!("http://{}", addr), Some(1)).await;
        assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["statusCode"], 504);
    }

    #[tokio::test]
    async fn test_refused_connection_is_bad_gateway() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let (status, body) = through_router(format!("http://{}", addr), Some(5)).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["statusCode"], 502);
        assert_eq!(json["statusMessage"], "upstream request failed");
    }
}
