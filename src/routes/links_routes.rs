use crate::{controllers::links_controller, AppState};
use axum::{
    routing::{delete, get, post},
    Router,
};

pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/favorites", get(links_controller::get_favorites))
        .route("/favorites/:code", post(links_controller::post_add_favorite))
        .route("/favorites/:code", delete(links_controller::delete_favorite))
        .route("/monitors", get(links_controller::get_monitors))
        .route("/monitors/:code", post(links_controller::post_add_monitor))
        .route("/monitors/:code", delete(links_controller::delete_monitor))
}
