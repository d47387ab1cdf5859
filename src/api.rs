//! REST API for the packing service.
//!
//! Provides HTTP endpoints that accept an input document and return the
//! packing result. Uses Axum as the web framework and supports CORS.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::{
    Router,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use serde_json::json;
use std::sync::OnceLock;
use tokio::sync::mpsc;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::ReceiverStream;
use tower_http::cors::{Any, CorsLayer};
use utoipa::{OpenApi, ToSchema};

use crate::config::{ApiConfig, OptimizerConfig};
use crate::error::PackError;
use crate::geometry::{Axis, BoundsViolation};
use crate::manifest::{ContainerSpec, ItemTemplate, PackInput};
use crate::metrics::Metrics;
use crate::model::{Container, ItemInstance};
use crate::optimizer::{
    PackEvent, PackStatus, PackingResult, Placement, UnpackedItem, pack_items_with_config,
    pack_items_with_progress,
};
use crate::orientation::OrientationName;
use crate::shelf::Shelf;
use crate::types::Dims;

#[derive(Clone)]
struct ApiState {
    optimizer_config: OptimizerConfig,
}

static OPENAPI_DOC: OnceLock<utoipa::openapi::OpenApi> = OnceLock::new();

// SRI hashes verified against https://unpkg.com/swagger-ui-dist@5.17.14/ on 2025-10-29.
const SWAGGER_UI_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
    <head>
        <meta charset="utf-8" />
        <title>shelf-pack API Docs</title>
        <link
            rel="stylesheet"
            href="https://unpkg.com/swagger-ui-dist@5.17.14/swagger-ui.css"
            integrity="sha384-wxLW6kwyHktdDGr6Pv1zgm/VGJh99lfUbzSn6HNHBENZlCN7W602k9VkGdxuFvPn"
            crossorigin="anonymous"
        />
    </head>
    <body>
        <div id="swagger-ui"></div>
        <script
            src="https://unpkg.com/swagger-ui-dist@5.17.14/swagger-ui-bundle.js"
            integrity="sha384-wmyclcVGX/WhUkdkATwhaK1X1JtiNrr2EoYJ+diV3vj4v6OC5yCeSu+yW13SYJep"
            crossorigin="anonymous"
        ></script>
        <script
            src="https://unpkg.com/swagger-ui-dist@5.17.14/swagger-ui-standalone-preset.js"
            integrity="sha384-2YH8WDRaj7V2OqU/trsmzSagmk/E2SutiCsGkdgoQwC9pNUJV1u/141DHB6jgs8t"
            crossorigin="anonymous"
        ></script>
        <script>
            window.onload = function () {
                const ui = SwaggerUIBundle({
                    url: "/docs/openapi.json",
                    dom_id: "#swagger-ui",
                    presets: [SwaggerUIBundle.presets.apis, SwaggerUIStandalonePreset],
                    layout: "StandaloneLayout",
                });
                window.ui = ui;
            };
        </script>
    </body>
    </html>"##;

fn openapi_doc() -> &'static utoipa::openapi::OpenApi {
    OPENAPI_DOC.get_or_init(ApiDoc::openapi)
}

/// Unpacked item with a machine readable reason code.
#[derive(Debug, Serialize, ToSchema)]
pub struct UnpackedEntry {
    pub item_instance_id: String,
    pub reason_code: String,
    pub reason: String,
}

impl From<&UnpackedItem> for UnpackedEntry {
    fn from(item: &UnpackedItem) -> Self {
        Self {
            item_instance_id: item.item_instance_id.clone(),
            reason_code: item.reason.code().to_string(),
            reason: item.reason.to_string(),
        }
    }
}

/// Output document of a packing run.
///
/// # Fields
/// * `unpacked_items` - Entries of the form `"<id> (<reason>)"`
/// * `unpacked` - The same entries with reason codes
/// * `bounds_violations` - Placements reaching beyond the container (warn mode)
#[derive(Debug, Serialize, ToSchema)]
pub struct PackResponse {
    pub status: PackStatus,
    #[schema(nullable = true)]
    pub unit: Option<String>,
    pub metrics: Metrics,
    pub placements: Vec<Placement>,
    pub unpacked_items: Vec<String>,
    pub unpacked: Vec<UnpackedEntry>,
    pub shelves: Vec<Shelf>,
    pub bounds_violations: Vec<BoundsViolation>,
    pub is_complete: bool,
}

impl PackResponse {
    /// Creates a PackResponse from a PackingResult.
    pub fn from_packing_result(result: PackingResult, container: &Container) -> Self {
        let is_complete = result.is_complete();
        let unpacked_items = result.unpacked_labels();
        let unpacked = result.unpacked.iter().map(UnpackedEntry::from).collect();

        let PackingResult {
            status,
            metrics,
            placements,
            shelves,
            bounds_violations,
            ..
        } = result;

        Self {
            status,
            unit: container.unit.clone(),
            metrics,
            placements,
            unpacked_items,
            unpacked,
            shelves,
            bounds_violations,
            is_complete,
        }
    }
}

#[derive(Serialize, ToSchema)]
struct ErrorResponse {
    error: String,
    details: String,
}

impl ErrorResponse {
    fn new(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: details.into(),
        }
    }
}

fn error_response(
    status: StatusCode,
    error: impl Into<String>,
    details: impl Into<String>,
) -> Response {
    (status, Json(ErrorResponse::new(error, details))).into_response()
}

fn json_deserialize_error(err: JsonRejection) -> Response {
    error_response(
        StatusCode::UNPROCESSABLE_ENTITY,
        "Invalid JSON data",
        err.to_string(),
    )
}

fn pack_error_response(err: PackError) -> Response {
    let error = match err {
        PackError::InvalidContainer(_) | PackError::ZeroContainerVolume => {
            "Invalid container configuration"
        }
        PackError::InvalidItem(_) | PackError::NoItems => "Invalid input data",
        PackError::OutOfBounds(_) => "Placement verification failed",
    };
    error_response(StatusCode::UNPROCESSABLE_ENTITY, error, err.to_string())
}

fn job_failed_response(err: tokio::task::JoinError) -> Response {
    log::error!("Packing job failed: {err}");
    error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        "Packing job failed",
        err.to_string(),
    )
}

/// Validates the document and expands its templates on the blocking pool.
async fn parse_pack_request(
    payload: Result<Json<PackInput>, JsonRejection>,
) -> Result<(Container, Vec<ItemInstance>), Response> {
    let Json(payload) = payload.map_err(json_deserialize_error)?;
    match tokio::task::spawn_blocking(move || payload.into_parts()).await {
        Ok(Ok(parts)) => Ok(parts),
        Ok(Err(err)) => Err(pack_error_response(err)),
        Err(err) => Err(job_failed_response(err)),
    }
}

/// Forwards serialized pack events to an SSE channel.
///
/// Once the client has disconnected, further events are dropped without
/// being serialized.
struct EventSink {
    tx: mpsc::Sender<String>,
    closed: bool,
}

impl EventSink {
    fn new(tx: mpsc::Sender<String>) -> Self {
        Self { tx, closed: false }
    }

    fn send(&mut self, message: String) {
        if self.closed {
            return;
        }
        if self.tx.blocking_send(message).is_err() {
            log::debug!("Stream client disconnected, dropping remaining events");
            self.closed = true;
        }
    }

    fn send_event(&mut self, event: &PackEvent) {
        if self.closed {
            return;
        }
        match serde_json::to_string(event) {
            Ok(json) => self.send(json),
            Err(err) => log::warn!("Could not serialize pack event: {}", err),
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(handle_pack, handle_pack_stream),
    components(
        schemas(
            PackInput,
            ContainerSpec,
            ItemTemplate,
            PackResponse,
            UnpackedEntry,
            ErrorResponse,
            Metrics,
            Placement,
            PackStatus,
            OrientationName,
            Shelf,
            BoundsViolation,
            Axis,
            Dims
        )
    ),
    tags((name = "packing", description = "Endpoints for shelf packing"))
)]
struct ApiDoc;

fn router(optimizer_config: OptimizerConfig) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let state = ApiState { optimizer_config };

    Router::new()
        .route("/pack", post(handle_pack))
        .route("/pack_stream", post(handle_pack_stream))
        .route("/docs/openapi.json", get(serve_openapi_json))
        .route("/docs", get(serve_openapi_ui))
        .layer(cors)
        .with_state(state)
}

/// Starts the API server.
///
/// Configures CORS for cross-origin requests.
/// Blocks until the server is terminated.
pub async fn start_api_server(
    config: ApiConfig,
    optimizer_config: OptimizerConfig,
) -> std::io::Result<()> {
    let app = router(optimizer_config);

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;

    log::info!(
        "🚀 Server running on http://{}:{}",
        config.display_host(),
        config.port()
    );
    if config.binds_to_all_interfaces() {
        log::info!("💡 Local access: http://localhost:{}", config.port());
    }
    log::info!("📦 API Endpoints:");
    log::info!("   - POST /pack");
    log::info!("   - POST /pack_stream");
    log::info!("📑 Documentation:");
    log::info!("   - GET /docs");
    log::info!("   - GET /docs/openapi.json");

    axum::serve(listener, app).await
}

/// Handler for POST /pack endpoint.
///
/// Expands the item templates and packs them into the container.
///
/// # Parameters
/// * `payload` - JSON input document with container and item templates
///
/// # Returns
/// JSON response with placements, unpacked items and metrics
#[utoipa::path(
    post,
    path = "/pack",
    request_body = PackInput,
    responses(
        (status = 200, description = "Packing finished", body = PackResponse),
        (
            status = UNPROCESSABLE_ENTITY,
            description = "Invalid document, container or items",
            body = ErrorResponse
        ),
        (
            status = INTERNAL_SERVER_ERROR,
            description = "Packing job failed",
            body = ErrorResponse
        )
    ),
    tag = "packing"
)]
async fn handle_pack(
    State(state): State<ApiState>,
    payload: Result<Json<PackInput>, JsonRejection>,
) -> impl IntoResponse {
    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return json_deserialize_error(rejection),
    };
    let packing_config = state.optimizer_config.packing_config();

    let job = tokio::task::spawn_blocking(move || {
        let (container, items) = payload.into_parts()?;
        log::info!(
            "📥 New pack request: {} items, container {}",
            items.len(),
            container.dims
        );
        let result = pack_items_with_config(&container, &items, packing_config)?;
        Ok::<_, PackError>((container, result))
    })
    .await;

    match job {
        Ok(Ok((container, result))) => {
            log::info!(
                "📦 Result: {} placed on {} shelves, {} unpacked, {:.2}% utilization",
                result.metrics.items_packed,
                result.shelf_count(),
                result.unpacked_count(),
                result.metrics.utilization_percent
            );
            let response = PackResponse::from_packing_result(result, &container);
            (StatusCode::OK, Json(response)).into_response()
        }
        Ok(Err(err)) => pack_error_response(err),
        Err(err) => job_failed_response(err),
    }
}

/// Handler for POST /pack_stream endpoint (SSE).
///
/// Streams pack events in real-time as Server-Sent Events (text/event-stream).
/// A failing run ends with an event of type `Error`.
#[utoipa::path(
    post,
    path = "/pack_stream",
    request_body = PackInput,
    responses(
        (
            status = 200,
            description = "Streams pack events in real-time",
            content_type = "text/event-stream",
            body = String
        ),
        (
            status = UNPROCESSABLE_ENTITY,
            description = "Invalid document, container or items",
            body = ErrorResponse
        )
    ),
    tag = "packing"
)]
async fn handle_pack_stream(
    State(state): State<ApiState>,
    payload: Result<Json<PackInput>, JsonRejection>,
) -> impl IntoResponse {
    let (container, items) = match parse_pack_request(payload).await {
        Ok(parts) => parts,
        Err(response) => return response,
    };

    let (tx, rx) = mpsc::channel::<String>(32);
    let packing_config = state.optimizer_config.packing_config();

    tokio::task::spawn_blocking(move || {
        let mut sink = EventSink::new(tx);
        let result = pack_items_with_progress(&container, &items, packing_config, |evt| {
            sink.send_event(evt)
        });
        if let Err(err) = result {
            sink.send(json!({ "type": "Error", "error": err.to_string() }).to_string());
        }
    });

    let stream = ReceiverStream::new(rx)
        .map(|msg| Ok::<_, std::convert::Infallible>(Event::default().data(msg)));
    Sse::new(stream)
        .keep_alive(
            KeepAlive::new()
                .interval(std::time::Duration::from_secs(10))
                .text("keep-alive"),
        )
        .into_response()
}

async fn serve_openapi_json(State(_state): State<ApiState>) -> impl IntoResponse {
    Json(openapi_doc())
}

async fn serve_openapi_ui(State(_state): State<ApiState>) -> impl IntoResponse {
    Html(SWAGGER_UI_HTML)
}
