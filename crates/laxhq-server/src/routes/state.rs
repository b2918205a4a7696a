use crate::error::AppError;
use crate::state::AppState;
use axum::extract::State;
use axum::Json;
use chrono::Utc;
use laxhq_core::{club::Club, entitlement::Ledger, member::Member, team::Team};
use serde::Serialize;

#[derive(Serialize)]
pub struct StateSummary {
    pub members: usize,
    pub teams: usize,
    pub clubs: usize,
    pub active_entitlements: usize,
}

pub async fn get_state(State(state): State<AppState>) -> Result<Json<StateSummary>, AppError> {
    let ledger = Ledger::load(&state.root)?;
    Ok(Json(StateSummary {
        members: Member::list(&state.root)?.len(),
        teams: Team::list(&state.root)?.len(),
        clubs: Club::list(&state.root)?.len(),
        active_entitlements: ledger.active_count(Utc::now()),
    }))
}
