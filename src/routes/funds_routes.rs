use crate::{controllers::funds_controller, AppState};
use axum::{routing::get, Router};

pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/funds", get(funds_controller::get_funds))
        .route("/funds/:code", get(funds_controller::get_fund))
}
