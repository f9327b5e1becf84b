use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::{
    app_state::AppState,
    dashboard::{build_view, DashboardView},
    dataset::DatasetSummary,
    detail::{contract_detail, node_detail, DetailField, NodeDetail},
    filter::{apply_event, FilterEvent, FilterState},
    geo::Department,
    graph,
    models::NodeRef,
    options::{derive_options, FilterOptions},
    search::{search, SearchHit},
};

const DEFAULT_SEARCH_LIMIT: usize = 10;
const MAX_SEARCH_LIMIT: usize = 50;

type ApiError = (StatusCode, Json<Value>);

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(json!({ "error": message.into() })))
}

// --- Payloads y Respuestas de la API ---

#[derive(Deserialize)]
pub struct EventPayload {
    #[serde(default)]
    state: FilterState,
    event: FilterEvent,
}

#[derive(Serialize)]
pub struct StateAndView {
    state: FilterState,
    view: DashboardView,
}

#[derive(Serialize)]
pub struct StatusResponse {
    dataset: DatasetSummary,
    departments: usize,
    sample_seed: u64,
    initial_sample_size: Option<usize>,
}

#[derive(Deserialize)]
pub struct OptionsQuery {
    sample_size: Option<usize>,
}

#[derive(Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    q: String,
    limit: Option<usize>,
}

#[derive(Serialize)]
pub struct ContractDetailResponse {
    row_index: usize,
    fields: Vec<DetailField>,
}

// --- Router ---

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/api/status", get(status_handler))
        .route("/api/dashboard/initial", get(initial_dashboard_handler))
        .route("/api/dashboard", post(dashboard_handler))
        .route("/api/dashboard/event", post(dashboard_event_handler))
        .route("/api/options", get(options_handler))
        .route("/api/contracts/:row", get(contract_detail_handler))
        .route("/api/nodes/:id", get(node_detail_handler))
        .route("/api/search", get(search_handler))
        .route("/api/departments", get(departments_handler))
        .route("/api/stylesheet", get(stylesheet_handler))
        .route("/api/shutdown", post(shutdown_handler))
        .with_state(app_state)
}

// --- Handlers ---

#[axum::debug_handler]
async fn status_handler(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        dataset: state.dataset.summary(),
        departments: state.departments.len(),
        sample_seed: state.sampling.seed,
        initial_sample_size: state.sampling.initial_size,
    })
}

#[axum::debug_handler]
async fn initial_dashboard_handler(State(state): State<AppState>) -> Json<StateAndView> {
    let filters = FilterState::initial(&state.dataset, &state.sampling);
    let view = build_view(&state.dataset, &state.sampling, &filters);
    Json(StateAndView {
        state: filters,
        view,
    })
}

#[axum::debug_handler]
async fn dashboard_handler(
    State(state): State<AppState>,
    Json(filters): Json<FilterState>,
) -> Json<DashboardView> {
    Json(build_view(&state.dataset, &state.sampling, &filters))
}

#[axum::debug_handler]
async fn dashboard_event_handler(
    State(state): State<AppState>,
    Json(payload): Json<EventPayload>,
) -> Json<StateAndView> {
    let filters = apply_event(&state.dataset, &state.sampling, &payload.state, payload.event);
    let view = build_view(&state.dataset, &state.sampling, &filters);
    Json(StateAndView {
        state: filters,
        view,
    })
}

#[axum::debug_handler]
async fn options_handler(
    State(state): State<AppState>,
    Query(query): Query<OptionsQuery>,
) -> Json<FilterOptions> {
    let scope = state.sampling.draw(&state.dataset, query.sample_size);
    Json(derive_options(&scope))
}

#[axum::debug_handler]
async fn contract_detail_handler(
    State(state): State<AppState>,
    Path(row): Path<usize>,
) -> Result<Json<ContractDetailResponse>, ApiError> {
    match contract_detail(&state.dataset, row) {
        Some(fields) => Ok(Json(ContractDetailResponse {
            row_index: row,
            fields,
        })),
        None => Err(api_error(
            StatusCode::NOT_FOUND,
            format!("No existe el contrato {row}"),
        )),
    }
}

#[axum::debug_handler]
async fn node_detail_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<NodeDetail>, ApiError> {
    let node: NodeRef = id
        .parse()
        .map_err(|e| api_error(StatusCode::BAD_REQUEST, format!("{e}")))?;
    node_detail(&state.dataset, &node)
        .map(Json)
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, format!("El nodo {node} no tiene contratos")))
}

#[axum::debug_handler]
async fn search_handler(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Json<Vec<SearchHit>> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_SEARCH_LIMIT)
        .min(MAX_SEARCH_LIMIT);
    Json(search(&state.dataset, &query.q, limit))
}

#[axum::debug_handler]
async fn departments_handler(State(state): State<AppState>) -> Json<Vec<Department>> {
    Json(state.departments.as_ref().clone())
}

async fn stylesheet_handler() -> Json<Value> {
    Json(graph::stylesheet())
}

// --- Handler de Apagado ---

#[axum::debug_handler]
async fn shutdown_handler(State(state): State<AppState>) -> impl IntoResponse {
    info!("Petición de apagado recibida.");
    match state.shutdown_sender.lock() {
        Ok(mut sender) => {
            if let Some(sender) = sender.take() {
                let _ = sender.send(());
            }
        }
        Err(e) => warn!("No se pudo acceder al canal de apagado: {e}"),
    }
    StatusCode::OK
}
