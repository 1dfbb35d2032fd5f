use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use rebar_core::{
    EstimateReport, EstimateRequest, Estimator, EstimatorError, PackingResult, StockPacker,
    DEFAULT_STOCK_BAR_LENGTH_M,
};
use serde::Deserialize;
use serde_json::json;
use tower_http::cors::CorsLayer;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const DEFAULT_ADDR: &str = "0.0.0.0:3000";
const OPENAPI_SPEC: &str = include_str!("../../../openapi.yaml");
const SWAGGER_UI_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1" />
    <title>Rebar Estimator API Docs</title>
    <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css" />
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
    <script>
        window.onload = () => {
            SwaggerUIBundle({
                url: '/openapi.yaml',
                dom_id: '#swagger-ui',
                presets: [SwaggerUIBundle.presets.apis],
                layout: 'BaseLayout',
            });
        };
    </script>
</body>
</html>"#;
const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
    <title>Rebar Estimator</title>
</head>
<body>
    <h1>Rebar Estimator API</h1>
    <h2>API Endpoints:</h2>
    <ul>
        <li>GET /api/health - Health check</li>
        <li>POST /api/estimate - Weight, cost and stock bars for a project</li>
        <li>POST /api/pack - Cut pieces from stock bars</li>
        <li>GET /docs - API documentation</li>
    </ul>
</body>
</html>"#;

/// Body of `POST /api/pack`
#[derive(Debug, Deserialize)]
struct PackRequest {
    pieces: Vec<f64>,
    #[serde(default = "default_stock_length")]
    stock_bar_length_m: f64,
}

fn default_stock_length() -> f64 {
    DEFAULT_STOCK_BAR_LENGTH_M
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    info!("Starting Rebar Estimator API");

    let addr = std::env::var("REBAR_API_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("API server listening on http://{}", addr);
    info!("Try: curl http://localhost:3000/api/health");

    axum::serve(listener, app()).await?;
    Ok(())
}

fn app() -> Router {
    Router::new()
        .route("/", get(serve_index))
        .route("/api/health", get(health_check))
        .route("/api/estimate", post(estimate))
        .route("/api/pack", post(pack))
        .route("/openapi.yaml", get(serve_openapi_spec))
        .route("/docs", get(serve_swagger_ui))
        .layer(CorsLayer::permissive())
}

/// Health check endpoint
async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "service": "rebar-estimator-api",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Main estimation endpoint
async fn estimate(
    Json(request): Json<EstimateRequest>,
) -> Result<Json<EstimateReport>, AppError> {
    info!(
        "Received estimate request with {} rebar rows and {} m3 of concrete",
        request.specs.len(),
        request.concrete_volume_m3
    );

    let estimator = Estimator::new(request)?;
    let report = estimator.estimate()?;

    info!(
        "Estimate complete: {} stock bars, {:.2} kg of rebar, total cost {:.0}",
        report.summary.total_bars, report.summary.total_rebar_weight_kg, report.summary.total_cost
    );

    Ok(Json(report))
}

/// Cutting-stock endpoint for a bare list of pieces
async fn pack(Json(request): Json<PackRequest>) -> Result<Json<PackingResult>, AppError> {
    info!(
        "Packing {} pieces into {} m bars",
        request.pieces.len(),
        request.stock_bar_length_m
    );

    let packer = StockPacker::new(request.stock_bar_length_m)?;
    let result = packer.pack(&request.pieces)?;

    info!(
        "Packing complete: {} bars, {:.2} m waste",
        result.bar_count,
        result.total_waste()
    );

    Ok(Json(result))
}

/// Application error type
struct AppError(anyhow::Error);

impl From<EstimatorError> for AppError {
    fn from(err: EstimatorError) -> Self {
        AppError(err.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error!("Request error: {}", self.0);

        // Every estimator error is caused by the submitted data
        let status = if self.0.downcast_ref::<EstimatorError>().is_some() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        (
            status,
            Json(json!({
                "error": self.0.to_string(),
            })),
        )
            .into_response()
    }
}

async fn serve_index() -> impl IntoResponse {
    Html(INDEX_HTML)
}

async fn serve_openapi_spec() -> impl IntoResponse {
    (
        StatusCode::OK,
        [("Content-Type", "application/yaml")],
        OPENAPI_SPEC,
    )
}

async fn serve_swagger_ui() -> impl IntoResponse {
    Html(SWAGGER_UI_HTML)
}
