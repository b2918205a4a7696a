use crate::error::AppError;
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::Json;
use laxhq_core::{catalog::Catalog, resolver, team::Team};

pub async fn list_teams(State(state): State<AppState>) -> Result<Json<Vec<Team>>, AppError> {
    Ok(Json(Team::list(&state.root)?))
}

pub async fn get_overview(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<resolver::TeamOverview>, AppError> {
    let catalog = Catalog::load(&state.root)?;
    let overview = resolver::team_overview(&state.root, &catalog, &id)?;
    Ok(Json(overview))
}
