mod page;

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Extension, Json, Router,
};
use chrono::{DateTime, Local, Utc};
use phdigest_client::{ClientError, RankingReport};
use phdigest_core::{AppConfig, ResultRow};
use phdigest_export::{export_file_name, workbook_bytes, XLSX_CONTENT_TYPE};
use serde::Serialize;
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::budget::UpstreamBudget;
use crate::middleware::{request_id, RequestId};
use page::{render_dashboard, PageBody};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    /// Rows behind the most recently rendered dashboard, served by `/download`.
    pub latest: Arc<RwLock<Option<Vec<ResultRow>>>>,
    pub budget: UpstreamBudget,
}

impl AppState {
    pub fn new(config: Arc<AppConfig>, budget: UpstreamBudget) -> Self {
        Self {
            config,
            latest: Arc::new(RwLock::new(None)),
            budget,
        }
    }
}

/// Why a handler could not produce a fresh report.
enum FetchFailure {
    BudgetExhausted,
    Upstream(ClientError),
}

const BUDGET_EXHAUSTED: &str = "too many refreshes; try again in a minute";

/// Runs the pipeline once, charging the upstream budget first.
async fn fetch_report(state: &AppState) -> Result<RankingReport, FetchFailure> {
    if !state.budget.try_acquire().await {
        return Err(FetchFailure::BudgetExhausted);
    }
    phdigest_client::run(&state.config)
        .await
        .map_err(FetchFailure::Upstream)
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
    upstream_runs_remaining: usize,
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
    fn into_response(self) -> Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "upstream_error" => StatusCode::BAD_GATEWAY,
            "rate_limited" => StatusCode::TOO_MANY_REQUESTS,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

fn map_fetch_failure(request_id: String, failure: &FetchFailure) -> ApiError {
    match failure {
        FetchFailure::BudgetExhausted => {
            ApiError::new(request_id, "rate_limited", BUDGET_EXHAUSTED)
        }
        FetchFailure::Upstream(error) => {
            tracing::error!(error = %error, "ranking fetch failed");
            ApiError::new(request_id, "upstream_error", error.to_string())
        }
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static("x-request-id")])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(dashboard))
        .route("/download", get(download))
        .route("/api/v1/rankings", get(list_rankings))
        .route("/api/v1/health", get(health))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

/// Runs the full day range and renders it; failures are shown inline.
async fn dashboard(State(state): State<AppState>) -> (StatusCode, Html<String>) {
    let run = state.config.run;

    match fetch_report(&state).await {
        Ok(report) => {
            *state.latest.write().await = Some(report.rows.clone());
            (
                StatusCode::OK,
                Html(render_dashboard(run, &PageBody::Report(&report))),
            )
        }
        Err(FetchFailure::BudgetExhausted) => (
            StatusCode::TOO_MANY_REQUESTS,
            Html(render_dashboard(run, &PageBody::Failure(BUDGET_EXHAUSTED))),
        ),
        Err(FetchFailure::Upstream(e)) => {
            tracing::error!(error = %e, "dashboard render failed");
            let message = e.to_string();
            (
                StatusCode::OK,
                Html(render_dashboard(run, &PageBody::Failure(&message))),
            )
        }
    }
}

/// Serves the dashboard's rows as XLSX, running the pipeline if nothing has
/// been rendered yet.
async fn download(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Response, ApiError> {
    let cached = state.latest.read().await.clone();
    let rows = match cached {
        Some(rows) => rows,
        None => {
            let report = fetch_report(&state)
                .await
                .map_err(|f| map_fetch_failure(req_id.0.clone(), &f))?;
            *state.latest.write().await = Some(report.rows.clone());
            report.rows
        }
    };

    let bytes = workbook_bytes(&rows).map_err(|e| {
        tracing::error!(error = %e, "failed to build workbook");
        ApiError::new(req_id.0.clone(), "internal_error", "failed to build workbook")
    })?;

    let filename = export_file_name(
        &state.config.export_prefix,
        Local::now().date_naive(),
        "xlsx",
    );

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    )
        .into_response())
}

async fn list_rankings(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<RankingReport>>, ApiError> {
    let report = fetch_report(&state)
        .await
        .map_err(|f| map_fetch_failure(req_id.0.clone(), &f))?;

    Ok(Json(ApiResponse {
        data: report,
        meta: ResponseMeta::new(req_id.0),
    }))
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    Json(ApiResponse {
        data: HealthData {
            status: "ok",
            upstream_runs_remaining: state.budget.remaining().await,
        },
        meta: ResponseMeta::new(req_id.0),
    })
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::time::Duration;

    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use calamine::{open_workbook_from_rs, Data, Reader, Xlsx};
    use phdigest_core::{Credentials, RunSettings};
    use serde_json::json;
    use tower::ServiceExt;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn test_config(base_url: &str, days: usize) -> Arc<AppConfig> {
        Arc::new(AppConfig {
            credentials: Credentials::new("id", "secret").unwrap(),
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            log_level: "info".to_string(),
            api_base_url: base_url.to_string(),
            run: RunSettings::new(days, 10).unwrap(),
            request_timeout_secs: 5,
            user_agent: "phdigest-test/0.1".to_string(),
            export_prefix: "producthunt_top_products".to_string(),
            output_dir: ".".into(),
        })
    }

    fn state_for(base_url: &str, days: usize) -> AppState {
        AppState::new(test_config(base_url, days), UpstreamBudget::default())
    }

    async fn mount_upstream(server: &MockServer, token_status: u16) {
        Mock::given(method("POST"))
            .and(path("/v2/oauth/token"))
            .respond_with(if token_status == 200 {
                ResponseTemplate::new(200).set_body_json(json!({ "access_token": "t" }))
            } else {
                ResponseTemplate::new(token_status).set_body_string("invalid_client")
            })
            .mount(server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v2/api/graphql"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "posts": { "edges": [
                    { "node": { "name": "Alpha", "tagline": "First", "votesCount": 90, "url": "https://ph.test/a" } },
                    { "node": { "name": "Beta", "votesCount": 40, "url": "https://ph.test/b" } }
                ] } }
            })))
            .mount(server)
            .await;
    }

    async fn get(app: Router, uri: &str) -> Response {
        app.oneshot(Request::builder().uri(uri).body(Body::empty()).expect("request"))
            .await
            .expect("response")
    }

    async fn body_bytes(response: Response) -> Vec<u8> {
        to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes")
            .to_vec()
    }

    #[test]
    fn api_error_upstream_maps_to_bad_gateway() {
        let response = ApiError::new("req-1", "upstream_error", "boom").into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn health_returns_ok_with_request_id() {
        let state = state_for("http://127.0.0.1:9", 1);
        let app = build_app(state);
        let response = get(app, "/api/v1/health").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
        let json: serde_json::Value =
            serde_json::from_slice(&body_bytes(response).await).expect("json");
        assert_eq!(json["data"]["status"], "ok");
        assert_eq!(json["data"]["upstream_runs_remaining"], 30);
    }

    #[tokio::test]
    async fn dashboard_renders_rows_for_every_day() {
        let server = MockServer::start().await;
        mount_upstream(&server, 200).await;

        let state = state_for(&server.uri(), 2);
        let app = build_app(state.clone());
        let response = get(app, "/").await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = String::from_utf8(body_bytes(response).await).expect("utf8");
        assert_eq!(html.matches("<td>Alpha</td>").count(), 2);
        assert!(html.contains("Download Excel file"));

        let latest = state.latest.read().await.clone().expect("rows cached");
        assert_eq!(latest.len(), 4);
        assert!(latest.iter().any(|r| r.product_name == "Beta" && r.tagline.is_empty()));
    }

    #[tokio::test]
    async fn dashboard_shows_auth_failure_inline() {
        let server = MockServer::start().await;
        mount_upstream(&server, 401).await;

        let state = state_for(&server.uri(), 3);
        let app = build_app(state.clone());
        let response = get(app, "/").await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = String::from_utf8(body_bytes(response).await).expect("utf8");
        assert!(html.contains("class=\"notice error\""));
        assert!(html.contains("invalid_client"));
        assert!(state.latest.read().await.is_none());
    }

    #[tokio::test]
    async fn download_serves_xlsx_attachment() {
        let server = MockServer::start().await;
        mount_upstream(&server, 200).await;

        let state = state_for(&server.uri(), 1);
        let app = build_app(state);
        let response = get(app, "/download").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            XLSX_CONTENT_TYPE
        );
        let disposition = response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .expect("ascii header")
            .to_string();
        assert!(disposition.starts_with("attachment; filename=\"producthunt_top_products_"));
        assert!(disposition.ends_with(".xlsx\""));

        let bytes = body_bytes(response).await;
        let mut workbook: Xlsx<_> =
            open_workbook_from_rs(Cursor::new(bytes)).expect("valid xlsx");
        let range = workbook.worksheet_range("Sheet1").expect("sheet");
        assert_eq!(range.height(), 3);
        assert_eq!(range.get((1, 1)), Some(&Data::String("Alpha".to_string())));
    }

    #[tokio::test]
    async fn download_prefers_rows_from_last_render() {
        let state = state_for("http://127.0.0.1:9", 1);
        *state.latest.write().await = Some(Vec::new());

        let app = build_app(state);
        let response = get(app, "/download").await;

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = body_bytes(response).await;
        let mut workbook: Xlsx<_> =
            open_workbook_from_rs(Cursor::new(bytes)).expect("valid xlsx");
        let range = workbook.worksheet_range("Sheet1").expect("sheet");
        assert_eq!(range.height(), 1, "header only");
    }

    #[tokio::test]
    async fn rankings_endpoint_maps_auth_failure_to_bad_gateway() {
        let server = MockServer::start().await;
        mount_upstream(&server, 401).await;

        let state = state_for(&server.uri(), 1);
        let app = build_app(state);
        let response = get(app, "/api/v1/rankings").await;

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let json: serde_json::Value =
            serde_json::from_slice(&body_bytes(response).await).expect("json");
        assert_eq!(json["error"]["code"], "upstream_error");
    }

    #[tokio::test]
    async fn rankings_endpoint_returns_rows_json() {
        let server = MockServer::start().await;
        mount_upstream(&server, 200).await;

        let state = state_for(&server.uri(), 1);
        let app = build_app(state);
        let response = get(app, "/api/v1/rankings").await;

        assert_eq!(response.status(), StatusCode::OK);
        let json: serde_json::Value =
            serde_json::from_slice(&body_bytes(response).await).expect("json");
        let rows = json["data"]["rows"].as_array().expect("rows array");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["product_name"], "Alpha");
        assert_eq!(rows[1]["tagline"], "");
        assert!(json["data"]["skipped"].as_array().expect("skipped").is_empty());
    }

    #[tokio::test]
    async fn download_from_last_render_spends_no_budget() {
        let server = MockServer::start().await;
        mount_upstream(&server, 200).await;

        let budget = UpstreamBudget::new(1, Duration::from_secs(60));
        let state = AppState::new(test_config(&server.uri(), 1), budget.clone());
        let app = build_app(state);

        let page = get(app.clone(), "/").await;
        assert_eq!(page.status(), StatusCode::OK);
        assert_eq!(budget.remaining().await, 0);

        for _ in 0..3 {
            let response = get(app.clone(), "/download").await;
            assert_eq!(response.status(), StatusCode::OK);
        }
        assert_eq!(budget.remaining().await, 0);
    }

    #[tokio::test]
    async fn exhausted_budget_blocks_pipeline_runs_only() {
        let server = MockServer::start().await;
        mount_upstream(&server, 200).await;

        let budget = UpstreamBudget::new(1, Duration::from_secs(60));
        let state = AppState::new(test_config(&server.uri(), 1), budget);
        let app = build_app(state);

        let first = get(app.clone(), "/api/v1/rankings").await;
        assert_eq!(first.status(), StatusCode::OK);

        let second = get(app.clone(), "/api/v1/rankings").await;
        assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
        let json: serde_json::Value =
            serde_json::from_slice(&body_bytes(second).await).expect("json");
        assert_eq!(json["error"]["code"], "rate_limited");

        let page = get(app.clone(), "/").await;
        assert_eq!(page.status(), StatusCode::TOO_MANY_REQUESTS);
        let html = String::from_utf8(body_bytes(page).await).expect("utf8");
        assert!(html.contains("class=\"notice error\""));

        let health = get(app, "/api/v1/health").await;
        assert_eq!(health.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn supplied_request_id_is_echoed() {
        let state = state_for("http://127.0.0.1:9", 1);
        let response = build_app(state)
            .oneshot(
                Request::builder()
                    .uri("/api/v1/health")
                    .header("x-request-id", "trace-42")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.headers()["x-request-id"], "trace-42");
    }
}
