use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    Json as RequestJson,
};
use serde::Serialize;
use std::sync::Arc;

use crate::error::HybridError;
use crate::logic::{
    apply_view_params, derive_and_score, derive_hybrid, enrich_records, score_record,
    ParentIndex, SuccessModel,
};
use crate::model::{
    DeriveRequest, DerivedHybrid, HeatBand, HybridRecord, NewHybrid, ViewParams, ViewQuery,
};
use crate::store::{HybridStore, SessionCache};
use crate::table::{columns, export_view, read_records};

pub const MODEL_UNAVAILABLE_WARNING: &str =
    "Success model unavailable; AI success scores are shown as Unknown";

/// Collaborators shared by every request.
pub struct HybridState<S> {
    pub store: Arc<S>,
    pub model: Option<Arc<dyn SuccessModel>>,
    pub sessions: SessionCache,
    pub max_min_heat: u64,
}

impl<S> HybridState<S> {
    pub fn model(&self) -> Option<&dyn SuccessModel> {
        self.model.as_deref()
    }

    fn warnings(&self) -> Vec<String> {
        if self.model.is_none() {
            vec![MODEL_UNAVAILABLE_WARNING.to_string()]
        } else {
            Vec::new()
        }
    }

    fn view_params(&self, query: ViewQuery) -> Result<ViewParams, ApiError> {
        query.into_params(self.max_min_heat).map_err(domain_error)
    }
}

pub type AppState<S> = Arc<HybridState<S>>;

pub type ApiError = (StatusCode, Json<ErrorResponse>);

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: &str) -> Self {
        Self {
            error: message.to_string(),
        }
    }
}

fn domain_error(e: HybridError) -> ApiError {
    let status = if e.is_not_found() {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::BAD_REQUEST
    };
    (status, Json(ErrorResponse::new(&e.to_string())))
}

fn internal_error(e: anyhow::Error) -> ApiError {
    log::error!("Request failed: {:#}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new(&e.to_string())),
    )
}

/// A record as displayed, with its heat color band.
#[derive(Debug, Serialize)]
pub struct ViewItem {
    #[serde(flatten)]
    pub record: HybridRecord,
    pub heat_band: HeatBand,
}

#[derive(Debug, Serialize)]
pub struct ViewResponse {
    pub items: Vec<ViewItem>,
    pub total: usize,
    pub warnings: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct DeriveResponse {
    pub hybrid: DerivedHybrid,
    pub heat_band: HeatBand,
    pub warnings: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct SessionCreatedResponse {
    pub session_id: String,
    pub created_at: String,
    pub records: usize,
    pub parents: ParentIndex,
}

#[derive(Debug, Serialize)]
pub struct InsertResponse {
    pub id: i64,
    pub record: HybridRecord,
    pub warnings: Vec<String>,
}

fn view_response<S>(state: &HybridState<S>, view: Vec<HybridRecord>) -> ViewResponse {
    let items: Vec<ViewItem> = view
        .into_iter()
        .map(|record| ViewItem {
            heat_band: record.heat_band(),
            record,
        })
        .collect();
    ViewResponse {
        total: items.len(),
        items,
        warnings: state.warnings(),
    }
}

fn derive_response<S>(
    state: &HybridState<S>,
    records: &[HybridRecord],
    request: &DeriveRequest,
) -> Result<DeriveResponse, ApiError> {
    let hybrid = derive_and_score(&request.parent_a, &request.parent_b, records, state.model())
        .map_err(domain_error)?;
    Ok(DeriveResponse {
        heat_band: HeatBand::classify(hybrid.expected_heat_shu),
        hybrid,
        warnings: state.warnings(),
    })
}

fn csv_download(records: &[HybridRecord], filename: &str) -> Result<Response, ApiError> {
    let bytes = export_view(records).map_err(internal_error)?;
    Ok((
        [
            (header::CONTENT_TYPE, columns::CSV_CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        bytes,
    )
        .into_response())
}

/// Reload the persisted table and enrich it.
async fn stored_working_set<S: HybridStore>(state: &HybridState<S>) -> Result<Vec<HybridRecord>, ApiError> {
    let mut records = state.store.list_hybrids().await.map_err(internal_error)?;
    enrich_records(&mut records, state.model());
    Ok(records)
}

/// Copy an uploaded working set out of the session cache and enrich it.
async fn session_working_set<S>(
    state: &HybridState<S>,
    session_id: &str,
) -> Result<Vec<HybridRecord>, ApiError> {
    let session = state
        .sessions
        .get(session_id)
        .await
        .ok_or_else(|| domain_error(HybridError::SessionNotFound(session_id.to_string())))?;
    let mut records = session.records.as_ref().clone();
    enrich_records(&mut records, state.model());
    Ok(records)
}

// Uploaded working sets

pub async fn create_session<S: HybridStore>(
    State(state): State<AppState<S>>,
    body: Bytes,
) -> Result<(StatusCode, Json<SessionCreatedResponse>), ApiError> {
    let records = read_records(body.as_ref()).map_err(domain_error)?;
    let expired = state.sessions.clear_expired().await;
    if expired > 0 {
        log::debug!("Dropped {} expired sessions", expired);
    }

    let parents = ParentIndex::build(&records);
    let session = state.sessions.create(records).await;
    log::info!(
        "Created session {} with {} records and {} parents",
        session.id,
        session.records.len(),
        parents.len()
    );

    Ok((
        StatusCode::CREATED,
        Json(SessionCreatedResponse {
            session_id: session.id,
            created_at: session.created_at.to_rfc3339(),
            records: session.records.len(),
            parents,
        }),
    ))
}

pub async fn delete_session<S: HybridStore>(
    State(state): State<AppState<S>>,
    Path(session_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if state.sessions.remove(&session_id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(domain_error(HybridError::SessionNotFound(session_id)))
    }
}

pub async fn get_session_view<S: HybridStore>(
    State(state): State<AppState<S>>,
    Path(session_id): Path<String>,
    Query(query): Query<ViewQuery>,
) -> Result<Json<ViewResponse>, ApiError> {
    let params = state.view_params(query)?;
    let records = session_working_set(&state, &session_id).await?;
    let view = apply_view_params(&records, &params);
    log::debug!("Session {} view: {} of {} records", session_id, view.len(), records.len());
    Ok(Json(view_response(&state, view)))
}

pub async fn export_session_view<S: HybridStore>(
    State(state): State<AppState<S>>,
    Path(session_id): Path<String>,
    Query(query): Query<ViewQuery>,
) -> Result<Response, ApiError> {
    let params = state.view_params(query)?;
    let records = session_working_set(&state, &session_id).await?;
    csv_download(&apply_view_params(&records, &params), columns::FILTERED_EXPORT_NAME)
}

pub async fn get_session_parents<S: HybridStore>(
    State(state): State<AppState<S>>,
    Path(session_id): Path<String>,
) -> Result<Json<ParentIndex>, ApiError> {
    let records = session_working_set(&state, &session_id).await?;
    Ok(Json(ParentIndex::build(&records)))
}

pub async fn derive_session_hybrid<S: HybridStore>(
    State(state): State<AppState<S>>,
    Path(session_id): Path<String>,
    RequestJson(request): RequestJson<DeriveRequest>,
) -> Result<Json<DeriveResponse>, ApiError> {
    let records = session_working_set(&state, &session_id).await?;
    derive_response(&state, &records, &request).map(Json)
}

// Persisted table

pub async fn get_stored_view<S: HybridStore>(
    State(state): State<AppState<S>>,
    Query(query): Query<ViewQuery>,
) -> Result<Json<ViewResponse>, ApiError> {
    let params = state.view_params(query)?;
    let records = stored_working_set(&state).await?;
    Ok(Json(view_response(&state, apply_view_params(&records, &params))))
}

pub async fn export_stored_view<S: HybridStore>(
    State(state): State<AppState<S>>,
    Query(query): Query<ViewQuery>,
) -> Result<Response, ApiError> {
    let params = state.view_params(query)?;
    let records = stored_working_set(&state).await?;
    csv_download(&apply_view_params(&records, &params), columns::FILTERED_EXPORT_NAME)
}

pub async fn export_all_stored<S: HybridStore>(
    State(state): State<AppState<S>>,
) -> Result<Response, ApiError> {
    let records = stored_working_set(&state).await?;
    csv_download(&records, columns::FULL_EXPORT_NAME)
}

pub async fn get_stored_parents<S: HybridStore>(
    State(state): State<AppState<S>>,
) -> Result<Json<ParentIndex>, ApiError> {
    let records = stored_working_set(&state).await?;
    Ok(Json(ParentIndex::build(&records)))
}

pub async fn derive_stored_hybrid<S: HybridStore>(
    State(state): State<AppState<S>>,
    RequestJson(request): RequestJson<DeriveRequest>,
) -> Result<Json<DeriveResponse>, ApiError> {
    let records = stored_working_set(&state).await?;
    derive_response(&state, &records, &request).map(Json)
}

/// Append one record to the persisted table.
///
/// Trait fields left out of the request are derived from the two parents in
/// the current table; the success score is computed at insertion and stored.
pub async fn insert_stored_hybrid<S: HybridStore>(
    State(state): State<AppState<S>>,
    RequestJson(new): RequestJson<NewHybrid>,
) -> Result<(StatusCode, Json<InsertResponse>), ApiError> {
    let mut record = match (
        new.expected_heat_shu,
        new.expected_yield.clone(),
        new.climate_suitability.clone(),
        new.expected_flavor.clone(),
    ) {
        (Some(heat), Some(expected_yield), Some(climate), Some(flavor)) => HybridRecord::new(
            new.parent_a.clone(),
            new.parent_b.clone(),
            heat,
            expected_yield,
            climate,
            flavor,
        ),
        (heat, expected_yield, climate, flavor) => {
            let records = state.store.list_hybrids().await.map_err(internal_error)?;
            let derived = derive_hybrid(&new.parent_a, &new.parent_b, &records)
                .map_err(domain_error)?
                .into_record();
            HybridRecord {
                expected_heat_shu: heat.unwrap_or(derived.expected_heat_shu),
                expected_yield: expected_yield.unwrap_or(derived.expected_yield),
                climate_suitability: climate.unwrap_or(derived.climate_suitability),
                expected_flavor: flavor.unwrap_or(derived.expected_flavor),
                ai_success_score: None,
                ..derived
            }
        }
    };

    record.ai_success_score = Some(score_record(&record, state.model()));
    let id = state
        .store
        .insert_hybrid(&record)
        .await
        .map_err(internal_error)?;
    record.id = Some(id);
    log::info!(
        "Inserted hybrid {}: {} x {}",
        id,
        record.parent_a,
        record.parent_b
    );

    Ok((
        StatusCode::CREATED,
        Json(InsertResponse {
            id,
            record,
            warnings: state.warnings(),
        }),
    ))
}
