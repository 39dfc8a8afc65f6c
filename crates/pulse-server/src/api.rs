use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use pulse_core::{AppConfig, FeedSource};
use pulse_db::PgArticleStore;
use pulse_feed::{
    load_feed, refresh_feed, Enricher, FeedError, FeedFetcher, FeedProjection, PipelineOptions,
};

use crate::middleware::{request_id, RequestId};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<AppConfig>,
    pub sources: Arc<Vec<FeedSource>>,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    database: &'static str,
}

impl ResponseMeta {
    fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "upstream_error" => StatusCode::BAD_GATEWAY,
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static("x-request-id"),
        ])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/feed", get(get_feed))
        .route("/api/v1/feed/refresh", post(refresh))
        .layer(
            ServiceBuilder::new()
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let meta = ResponseMeta::new(req_id.0);

    match pulse_db::ping(&state.pool).await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse {
                data: HealthData {
                    status: "ok",
                    database: "ok",
                },
                meta,
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "health check: database unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse {
                    data: HealthData {
                        status: "degraded",
                        database: "unavailable",
                    },
                    meta,
                }),
            )
        }
    }
}

/// Load entry point: rehydrate the dashboard from persisted state.
///
/// `data` is `null` when the store is empty or the query fails; the UI
/// substitutes its placeholder content.
async fn get_feed(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let meta = ResponseMeta::new(req_id.0);
    let store = PgArticleStore::new(state.pool.clone());

    let projection: Option<FeedProjection> = load_feed(&store, pipeline_options(&state.config)).await;

    (StatusCode::OK, Json(ApiResponse { data: projection, meta }))
}

/// Ingestion entry point: run a full refresh cycle and return the new
/// projections.
async fn refresh(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<FeedProjection>>, ApiError> {
    let meta = ResponseMeta::new(req_id.0.clone());

    let fetcher = FeedFetcher::new(
        state.config.feed_timeout_secs,
        &state.config.user_agent,
        state.config.max_concurrent_feeds,
    )
    .map_err(|e| map_feed_error(&req_id.0, &e))?;
    let enricher = Enricher::new(
        state.config.page_timeout_secs,
        &state.config.user_agent,
        &state.config.translate_url,
        &state.config.translate_target,
        state.config.max_concurrent_enrich,
    )
    .map_err(|e| map_feed_error(&req_id.0, &e))?;
    let store = PgArticleStore::new(state.pool.clone());

    let projection = refresh_feed(
        &fetcher,
        &enricher,
        &store,
        &state.sources,
        pipeline_options(&state.config),
    )
    .await
    .map_err(|e| map_feed_error(&req_id.0, &e))?;

    Ok(Json(ApiResponse {
        data: projection,
        meta,
    }))
}

fn pipeline_options(config: &AppConfig) -> PipelineOptions {
    PipelineOptions {
        fallback_recent: config.fallback_recent,
        recent_load_limit: config.recent_load_limit,
    }
}

fn map_feed_error(request_id: &str, error: &FeedError) -> ApiError {
    tracing::error!(error = %error, "refresh failed");
    match error {
        FeedError::AllSourcesFailed(_) | FeedError::TranslatorUnreachable { .. } => {
            ApiError::new(request_id, "upstream_error", error.to_string())
        }
        _ => ApiError::new(request_id, "internal_error", "refresh failed"),
    }
}
