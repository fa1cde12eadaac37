//! # API REST
//!
//! REST API implementation for the repertory service.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON serialization, CORS, status mapping)
//!
//! The engine and store logic live in `repertory-core` and
//! `repertory-store`; this crate only maps them onto HTTP.

#![warn(rust_2018_idioms)]

use axum::{
    extract::{Path as AxumPath, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

use repertory_core::config::{REMEDY_SEARCH_LIMIT, SYMPTOM_SEARCH_LIMIT};
use repertory_core::{
    AnalysisResult, AnalysisService, EngineConfig, MatchedSymptom, RankedCandidate, ReferenceStore,
    Remedy, RemedyRef, RepertoryError, Section, Symptom,
};
use repertory_store::JsonStore;

/// Application state shared across REST API handlers.
///
/// Holds the startup-resolved engine configuration and the loaded reference
/// store. Both are behind `Arc`, so cloning per request is cheap.
#[derive(Clone)]
pub struct AppState {
    cfg: Arc<EngineConfig>,
    store: Arc<JsonStore>,
}

impl AppState {
    pub fn new(cfg: Arc<EngineConfig>, store: Arc<JsonStore>) -> Self {
        Self { cfg, store }
    }
}

/// Health check response envelope.
#[derive(Debug, serde::Serialize, serde::Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, ToSchema)]
pub struct SectionsRes {
    pub sections: Vec<Section>,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, ToSchema)]
pub struct SymptomsRes {
    pub symptoms: Vec<Symptom>,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, ToSchema)]
pub struct RemediesRes {
    pub remedies: Vec<Remedy>,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, ToSchema)]
pub struct RemedyRes {
    pub remedy: Remedy,
}

/// Analysis request body: the caller's symptom selection.
#[derive(Debug, serde::Serialize, serde::Deserialize, ToSchema)]
pub struct AnalyzeReq {
    #[serde(default)]
    pub symptom_ids: Vec<String>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        list_sections,
        section_symptoms,
        search_symptoms,
        analyze,
        list_remedies,
        get_remedy,
        search_remedies,
    ),
    components(schemas(
        HealthRes,
        SectionsRes,
        SymptomsRes,
        RemediesRes,
        RemedyRes,
        AnalyzeReq,
        AnalysisResult,
        RankedCandidate,
        RemedyRef,
        MatchedSymptom,
        Section,
        Symptom,
        Remedy,
    ))
)]
struct ApiDoc;

/// Builds the REST router with Swagger UI and permissive CORS.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/repertory/sections", get(list_sections))
        .route("/repertory/sections/:id/symptoms", get(section_symptoms))
        .route("/repertory/symptoms/search/:query", get(search_symptoms))
        .route("/repertory/analyze", post(analyze))
        .route("/remedies", get(list_remedies))
        .route("/remedies/:id", get(get_remedy))
        .route("/remedies/search/:query", get(search_remedies))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// Used for monitoring and load balancer health checks.
#[axum::debug_handler]
async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthRes {
        ok: true,
        message: "Repertory REST API is alive".into(),
    })
}

#[utoipa::path(
    get,
    path = "/repertory/sections",
    responses(
        (status = 200, description = "All repertory sections, name-ordered", body = SectionsRes),
        (status = 500, description = "Internal server error")
    )
)]
/// List all repertory sections
#[axum::debug_handler]
async fn list_sections(
    State(state): State<AppState>,
) -> Result<Json<SectionsRes>, (StatusCode, &'static str)> {
    match state.store.list_sections().await {
        Ok(sections) => Ok(Json(SectionsRes { sections })),
        Err(e) => {
            tracing::error!("List sections error: {:?}", e);
            Err((StatusCode::INTERNAL_SERVER_ERROR, "Internal error"))
        }
    }
}

#[utoipa::path(
    get,
    path = "/repertory/sections/{id}/symptoms",
    responses(
        (status = 200, description = "Symptoms of one section, text-ordered", body = SymptomsRes),
        (status = 500, description = "Internal server error")
    )
)]
/// List the symptoms belonging to one repertory section
///
/// An unknown section id yields an empty list, matching the behaviour of a
/// filtered reference query.
#[axum::debug_handler]
async fn section_symptoms(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
) -> Result<Json<SymptomsRes>, (StatusCode, &'static str)> {
    match state.store.symptoms_in_section(&id).await {
        Ok(symptoms) => Ok(Json(SymptomsRes { symptoms })),
        Err(e) => {
            tracing::error!("Section symptoms error: {:?}", e);
            Err((StatusCode::INTERNAL_SERVER_ERROR, "Internal error"))
        }
    }
}

#[utoipa::path(
    get,
    path = "/repertory/symptoms/search/{query}",
    responses(
        (status = 200, description = "Matching symptoms", body = SymptomsRes),
        (status = 400, description = "Query too short"),
        (status = 500, description = "Internal server error")
    )
)]
/// Case-insensitive substring search over symptom rubric text
#[axum::debug_handler]
async fn search_symptoms(
    State(state): State<AppState>,
    AxumPath(query): AxumPath<String>,
) -> Result<Json<SymptomsRes>, (StatusCode, &'static str)> {
    if query.chars().count() < state.cfg.min_symptom_query_len() {
        return Err((StatusCode::BAD_REQUEST, "Query too short"));
    }

    match state.store.search_symptoms(&query, SYMPTOM_SEARCH_LIMIT).await {
        Ok(symptoms) => Ok(Json(SymptomsRes { symptoms })),
        Err(e) => {
            tracing::error!("Search symptoms error: {:?}", e);
            Err((StatusCode::INTERNAL_SERVER_ERROR, "Internal error"))
        }
    }
}

#[utoipa::path(
    post,
    path = "/repertory/analyze",
    request_body = AnalyzeReq,
    responses(
        (status = 200, description = "Ranked remedy candidates", body = AnalysisResult),
        (status = 400, description = "No symptoms provided"),
        (status = 500, description = "Internal server error")
    )
)]
/// Repertorization: rank remedies against the selected symptoms
///
/// Delegates to the analysis engine. An empty selection is a client error;
/// a failed association lookup is a server error and never yields a partial
/// ranking.
#[axum::debug_handler]
async fn analyze(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeReq>,
) -> Result<Json<AnalysisResult>, (StatusCode, &'static str)> {
    let service = AnalysisService::new(state.cfg.clone(), state.store.clone());
    match service.analyze(&req.symptom_ids).await {
        Ok(result) => Ok(Json(result)),
        Err(RepertoryError::InvalidInput(_)) => {
            Err((StatusCode::BAD_REQUEST, "No symptoms provided"))
        }
        Err(e) => {
            tracing::error!("Analyze error: {:?}", e);
            Err((StatusCode::INTERNAL_SERVER_ERROR, "Internal error"))
        }
    }
}

#[utoipa::path(
    get,
    path = "/remedies",
    responses(
        (status = 200, description = "All remedies, name-ordered", body = RemediesRes),
        (status = 500, description = "Internal server error")
    )
)]
/// List all remedies
#[axum::debug_handler]
async fn list_remedies(
    State(state): State<AppState>,
) -> Result<Json<RemediesRes>, (StatusCode, &'static str)> {
    match state.store.list_remedies().await {
        Ok(remedies) => Ok(Json(RemediesRes { remedies })),
        Err(e) => {
            tracing::error!("List remedies error: {:?}", e);
            Err((StatusCode::INTERNAL_SERVER_ERROR, "Internal error"))
        }
    }
}

#[utoipa::path(
    get,
    path = "/remedies/{id}",
    responses(
        (status = 200, description = "Remedy found", body = RemedyRes),
        (status = 404, description = "Remedy not found"),
        (status = 500, description = "Internal server error")
    )
)]
/// Fetch a single remedy by identifier
#[axum::debug_handler]
async fn get_remedy(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
) -> Result<Json<RemedyRes>, (StatusCode, &'static str)> {
    match state.store.get_remedy(&id).await {
        Ok(Some(remedy)) => Ok(Json(RemedyRes { remedy })),
        Ok(None) => Err((StatusCode::NOT_FOUND, "Remedy not found")),
        Err(e) => {
            tracing::error!("Get remedy error: {:?}", e);
            Err((StatusCode::INTERNAL_SERVER_ERROR, "Internal error"))
        }
    }
}

#[utoipa::path(
    get,
    path = "/remedies/search/{query}",
    responses(
        (status = 200, description = "Matching remedies", body = RemediesRes),
        (status = 400, description = "Query too short"),
        (status = 500, description = "Internal server error")
    )
)]
/// Case-insensitive substring search over remedy name and common name
#[axum::debug_handler]
async fn search_remedies(
    State(state): State<AppState>,
    AxumPath(query): AxumPath<String>,
) -> Result<Json<RemediesRes>, (StatusCode, &'static str)> {
    if query.chars().count() < state.cfg.min_remedy_query_len() {
        return Err((StatusCode::BAD_REQUEST, "Query too short"));
    }

    match state.store.search_remedies(&query, REMEDY_SEARCH_LIMIT).await {
        Ok(remedies) => Ok(Json(RemediesRes { remedies })),
        Err(e) => {
            tracing::error!("Search remedies error: {:?}", e);
            Err((StatusCode::INTERNAL_SERVER_ERROR, "Internal error"))
        }
    }
}
