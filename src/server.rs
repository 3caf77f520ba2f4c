use axum::{
    extract::{Request, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::Config;
use crate::tmdb::MovieSource;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub movies: Arc<dyn MovieSource>,
}

impl AppState {
    pub fn new(config: Config, movies: Arc<dyn MovieSource>) -> Self {
        Self {
            config: Arc::new(config),
            movies,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let movie_routes = Router::new()
        .route("/api/movies/popular", get(crate::movies::list_movies))
        .route("/api/movies/", get(crate::movies::get_movie))
        .route("/api/movies/:id", get(crate::movies::get_movie));

    let router = Router::new()
        .route("/robots.txt", get(robots_txt_handler))
        .route("/api/config", get(public_config))
        .merge(movie_routes)
        .fallback(fallback_handler)
        .layer(axum::middleware::from_fn(crate::middleware::log_request))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Layers on a router run after route matching, so path rewriting goes
    // on an outer router that hands everything to the real one.
    Router::new()
        .fallback_service(router)
        .layer(axum::middleware::from_fn(crate::middleware::normalize_path))
}

/// Configuration the front-end is allowed to see.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicConfig {
    pub tmdb_image_base: String,
}

async fn public_config(State(state): State<AppState>) -> Json<PublicConfig> {
    Json(PublicConfig {
        tmdb_image_base: state.config.tmdb.image_base.clone(),
    })
}

async fn robots_txt_handler() -> &'static str {
    "User-agent: *\nDisallow: /\n"
}

async fn fallback_handler(req: Request) -> impl IntoResponse {
    // CORS preflight for unknown paths
    if req.method() == axum::http::Method::OPTIONS {
        return StatusCode::OK.into_response();
    }
    StatusCode::NOT_FOUND.into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tmdb::TmdbClient;
    use axum::body::{to_bytes, Body};
    use tower::ServiceExt;

    fn app(config: Config) -> Router {
        let client = TmdbClient::new(&config.tmdb).unwrap();
        build_router(AppState::new(config, Arc::new(client)))
    }

    #[tokio::test]
    async fn test_public_config_hides_key() {
        let mut config = Config::default();
        config.tmdb.api_key = Some("secret-key".to_string());

        let req = axum::http::Request::builder().uri("/api/config").body(Body::empty()).unwrap();
        let response = app(config).oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["tmdbImageBase"], "https://image.tmdb.org/t/p/w500");
        assert!(!String::from_utf8_lossy(&body).contains("secret-key"));
    }

    #[tokio::test]
    async fn test_unknown_path() {
        let req = axum::http::Request::builder().uri("/nope").body(Body::empty()).unwrap();
        let response = app(Config::default()).oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_double_slash_path() {
        let req = axum::http::Request::builder().uri("//api//config").body(Body::empty()).unwrap();
        let response = app(Config::default()).oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_robots_txt() {
        let req = axum::http::Request::builder().uri("/robots.txt").body(Body::empty()).unwrap();
        let response = app(Config::default()).oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
