use crate::error::AppError;
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::Json;
use laxhq_core::{catalog::Catalog, member::Member, resolver};

pub async fn list_members(State(state): State<AppState>) -> Result<Json<Vec<Member>>, AppError> {
    Ok(Json(Member::list(&state.root)?))
}

pub async fn get_capabilities(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<resolver::MemberCapabilities>, AppError> {
    let catalog = Catalog::load(&state.root)?;
    let caps = resolver::member_capabilities(&state.root, &catalog, &id)?;
    Ok(Json(caps))
}
