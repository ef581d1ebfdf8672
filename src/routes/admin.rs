use axum::{routing::post, Router};

use crate::handlers::admin;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/import", post(admin::import_data))
}
