use axum::{routing::post, Router};

use crate::handlers::teams;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/teams", post(teams::get_team_games))
}
