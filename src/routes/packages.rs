use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{combinations, packages};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(packages::get_packages))
        .route("/compare", post(packages::compare_packages))
        .route("/combinations", post(combinations::find_combinations))
        .route(
            "/combinations/backup",
            post(combinations::find_combinations_backup),
        )
}
