use axum::{
    extract::{Query, State},
    response::Json,
};

use crate::dtos::comparison_dtos::{TeamSearchQuery, TeamsRequest};
use crate::errors::Result;
use crate::models::Game;
use crate::services::MatchUniverse;
use crate::state::AppState;

/// GET /api/teams — every team name appearing as home or away side.
pub async fn get_teams(State(state): State<AppState>) -> Result<Json<Vec<String>>> {
    let catalog = state.catalog();
    Ok(Json(catalog.team_names().to_vec()))
}

/// GET /api/teams/search?query= — case-insensitive substring search.
pub async fn search_teams(
    State(state): State<AppState>,
    Query(params): Query<TeamSearchQuery>,
) -> Result<Json<Vec<String>>> {
    let catalog = state.catalog();
    Ok(Json(catalog.search_teams(&params.query)))
}

/// POST /api/games/teams — all games of the selected teams, soonest first.
pub async fn get_team_games(
    State(state): State<AppState>,
    Json(request): Json<TeamsRequest>,
) -> Result<Json<Vec<Game>>> {
    let catalog = state.catalog();
    let universe = MatchUniverse::resolve(&catalog, &request.teams);

    let mut games: Vec<Game> = universe
        .ids()
        .iter()
        .filter_map(|id| catalog.game(*id).cloned())
        .collect();
    games.sort_by(|a, b| a.starts_at.cmp(&b.starts_at).then_with(|| a.id.cmp(&b.id)));

    tracing::debug!(
        "resolved {} games for {} teams",
        games.len(),
        request.teams.len()
    );
    Ok(Json(games))
}
