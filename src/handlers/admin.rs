use axum::{extract::State, response::Json};

use crate::catalog::load_catalog;
use crate::dtos::comparison_dtos::ImportResponse;
use crate::errors::{AppError, Result};
use crate::state::AppState;

/// POST /api/admin/import — re-read the CSV files and swap the catalog.
///
/// On failure the previous catalog stays in place.
pub async fn import_data(State(state): State<AppState>) -> Result<Json<ImportResponse>> {
    let data_dir = state.config.data_dir.clone();
    let (catalog, stats) =
        load_catalog(&data_dir).map_err(|e| AppError::import(format!("{e:#}")))?;

    tracing::info!(
        "reimported catalog: {} games, {} packages, {} offers ({} rows skipped)",
        stats.games,
        stats.packages,
        stats.offers,
        stats.skipped_rows
    );
    state.replace_catalog(catalog);

    Ok(Json(ImportResponse {
        status: "success",
        stats,
    }))
}
