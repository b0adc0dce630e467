//! Dashboard API route handlers.
//!
//! All endpoints speak JSON. State is shared via `Arc<DashboardState>`.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::warn;

use crate::entry::amount_from_f64;
use crate::ledger::Ledger;
use crate::types::{Bet, BetId, LedgerError, NetOutlook, Outcome, Totals};

// ---------------------------------------------------------------------------
// Shared state
// ---------------------------------------------------------------------------

/// Shared state accessible by all route handlers.
pub struct DashboardState {
    pub ledger: RwLock<Ledger>,
}

impl DashboardState {
    pub fn new(ledger: Ledger) -> Self {
        Self {
            ledger: RwLock::new(ledger),
        }
    }
}

pub type AppState = Arc<DashboardState>;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct PlaceBetRequest {
    pub amount: f64,
}

/// `persisted` is false when the bet is in the ledger but the write failed;
/// the client must not retry, the server saves it on the next write.
#[derive(Debug, Clone, Serialize)]
pub struct PlaceBetResponse {
    pub id: BetId,
    pub persisted: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResolveRequest {
    pub outcome: Outcome,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResolveResponse {
    pub bet: Bet,
    pub persisted: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct TotalsResponse {
    #[serde(flatten)]
    pub totals: Totals,
    pub outlook: NetOutlook,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub kind: &'static str,
    pub error: String,
}

/// Maps ledger errors onto HTTP statuses.
#[derive(Debug)]
pub struct ApiError(pub LedgerError);

impl From<LedgerError> for ApiError {
    fn from(e: LedgerError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind) = match &self.0 {
            LedgerError::InvalidAmount(_) => (StatusCode::UNPROCESSABLE_ENTITY, "invalid_amount"),
            LedgerError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            LedgerError::AlreadyResolved { .. } => (StatusCode::CONFLICT, "already_resolved"),
            LedgerError::IdsExhausted => (StatusCode::CONFLICT, "ids_exhausted"),
            LedgerError::StorageUnavailable(_) => {
                warn!(error = %self.0, "Request applied but not persisted");
                (StatusCode::SERVICE_UNAVAILABLE, "storage_unavailable")
            }
        };
        let body = ErrorBody {
            kind,
            error: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

/// GET /api/bets, newest first.
pub async fn list_bets(State(state): State<AppState>) -> Json<Vec<Bet>> {
    let ledger = state.ledger.read().await;
    Json(ledger.recent_first().cloned().collect())
}

/// Splits "applied but not saved" off from real rejections.
fn applied<T>(result: Result<T, LedgerError>) -> Result<Option<T>, LedgerError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(LedgerError::StorageUnavailable(e)) => {
            warn!(error = %e, "Request applied but not persisted");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// POST /api/bets
pub async fn place_bet(
    State(state): State<AppState>,
    Json(req): Json<PlaceBetRequest>,
) -> Result<(StatusCode, Json<PlaceBetResponse>), ApiError> {
    let amount = amount_from_f64(req.amount)?;
    let mut ledger = state.ledger.write().await;
    let allocated = ledger.next_id();
    let response = match applied(ledger.place_bet(amount))? {
        Some(id) => PlaceBetResponse { id, persisted: true },
        // Pushed under `allocated` before the write failed.
        None => PlaceBetResponse { id: allocated, persisted: false },
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /api/bets/:id/resolve
pub async fn resolve_bet(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(req): Json<ResolveRequest>,
) -> Result<Json<ResolveResponse>, ApiError> {
    let id = BetId(id);
    let mut ledger = state.ledger.write().await;
    let persisted = applied(ledger.resolve_bet(id, req.outcome))?.is_some();
    let bet = ledger.get(id).cloned().ok_or(LedgerError::NotFound(id))?;
    Ok(Json(ResolveResponse { bet, persisted }))
}

/// DELETE /api/bets/:id. Succeeds whether or not the bet existed; answers
/// 202 instead of 204 when the removal is not yet saved.
pub async fn delete_bet(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<StatusCode, ApiError> {
    let mut ledger = state.ledger.write().await;
    match applied(ledger.delete_bet(BetId(id)))? {
        Some(_) => Ok(StatusCode::NO_CONTENT),
        None => Ok(StatusCode::ACCEPTED),
    }
}

/// GET /api/totals
pub async fn get_totals(State(state): State<AppState>) -> Json<TotalsResponse> {
    let totals = state.ledger.read().await.totals();
    Json(TotalsResponse {
        totals,
        outlook: totals.outlook(),
    })
}

/// GET /health
pub async fn health() -> StatusCode {
    StatusCode::OK
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
