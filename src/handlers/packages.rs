use axum::{extract::State, response::Json};

use crate::dtos::comparison_dtos::{CompareRequest, CompareResponse};
use crate::errors::{AppError, Result};
use crate::models::StreamingPackage;
use crate::services::{score_catalog, MatchUniverse};
use crate::state::AppState;

/// GET /api/packages — the full package catalog.
pub async fn get_packages(State(state): State<AppState>) -> Result<Json<Vec<StreamingPackage>>> {
    let catalog = state.catalog();
    Ok(Json(catalog.packages().to_vec()))
}

/// POST /api/packages/compare — coverage of every package over the selected
/// teams' games, best coverage first.
///
/// An empty or unknown selection degrades to an empty result, not an error,
/// so the frontend can render its neutral state.
pub async fn compare_packages(
    State(state): State<AppState>,
    Json(request): Json<CompareRequest>,
) -> Result<Json<CompareResponse>> {
    let catalog = state.catalog();
    if catalog.is_empty() {
        return Err(AppError::unavailable("no catalog loaded"));
    }

    let universe = MatchUniverse::resolve(&catalog, &request.teams);
    if universe.is_empty() {
        return Ok(Json(CompareResponse {
            total_games: 0,
            packages: Vec::new(),
        }));
    }

    let mode = request.mode.to_mode(state.config.highlights_weight);
    let started = std::time::Instant::now();
    let packages = score_catalog(&catalog, &universe, mode);
    tracing::info!(
        "scored {} packages over {} games in {:?}",
        packages.len(),
        universe.len(),
        started.elapsed()
    );

    Ok(Json(CompareResponse {
        total_games: universe.len(),
        packages,
    }))
}
