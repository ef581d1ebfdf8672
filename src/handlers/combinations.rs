use std::collections::HashSet;

use axum::{extract::State, response::Json};

use crate::dtos::comparison_dtos::{CombinationListsResponse, CombinationsRequest};
use crate::errors::{AppError, Result};
use crate::services;
use crate::services::MatchUniverse;
use crate::state::AppState;

/// POST /api/packages/combinations — exact minimal-cost covering
/// combinations, ranked by monthly and by yearly-equivalent price.
///
/// Both lists empty means either nothing to cover or no full live cover
/// exists within the search bounds; the client then calls the backup
/// endpoint.
pub async fn find_combinations(
    State(state): State<AppState>,
    Json(request): Json<CombinationsRequest>,
) -> Result<Json<CombinationListsResponse>> {
    let catalog = state.catalog();
    if catalog.is_empty() {
        return Err(AppError::unavailable("no catalog loaded"));
    }

    let universe = MatchUniverse::resolve(&catalog, &request.teams);
    let exclude: HashSet<u32> = request.exclude.iter().copied().collect();
    let mode = request.mode.to_mode(state.config.highlights_weight);

    let started = std::time::Instant::now();
    let lists = services::find_combinations(
        &catalog,
        &universe,
        &exclude,
        state.config.search_limits,
        mode,
    );
    tracing::info!(
        "combination search over {} games: {} monthly / {} yearly results in {:?}",
        universe.len(),
        lists.monthly_ordered.len(),
        lists.yearly_ordered.len(),
        started.elapsed()
    );
    if lists.is_empty() && !universe.is_empty() {
        tracing::info!("no full covering combination within bounds, client may fall back");
    }

    Ok(Json(CombinationListsResponse::from_lists(&catalog, lists)))
}

/// POST /api/packages/combinations/backup — greedy best-effort answer for
/// selections the exact search could not fully cover.
pub async fn find_combinations_backup(
    State(state): State<AppState>,
    Json(request): Json<CombinationsRequest>,
) -> Result<Json<CombinationListsResponse>> {
    let catalog = state.catalog();
    if catalog.is_empty() {
        return Err(AppError::unavailable("no catalog loaded"));
    }

    let universe = MatchUniverse::resolve(&catalog, &request.teams);
    let exclude: HashSet<u32> = request.exclude.iter().copied().collect();
    let mode = request.mode.to_mode(state.config.highlights_weight);

    let lists = services::find_combinations_backup(
        &catalog,
        &universe,
        &exclude,
        state.config.highlights_weight,
        mode,
    );
    tracing::info!(
        "backup search over {} games: {} monthly / {} yearly results",
        universe.len(),
        lists.monthly_ordered.len(),
        lists.yearly_ordered.len(),
    );

    Ok(Json(CombinationListsResponse::from_lists(&catalog, lists)))
}
