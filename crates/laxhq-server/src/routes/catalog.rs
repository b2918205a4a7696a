use crate::error::AppError;
use crate::state::AppState;
use axum::extract::State;
use axum::Json;
use laxhq_core::catalog::Catalog;

pub async fn get_catalog(State(state): State<AppState>) -> Result<Json<Catalog>, AppError> {
    Ok(Json(Catalog::load(&state.root)?))
}
