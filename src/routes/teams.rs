use axum::{routing::get, Router};

use crate::handlers::teams;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(teams::get_teams))
        .route("/search", get(teams::search_teams))
}
