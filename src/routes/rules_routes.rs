use crate::{controllers::rules_controller, AppState};
use axum::{
    routing::{delete, get, post},
    Router,
};

pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/monitors/:code/rules", get(rules_controller::get_rules))
        .route("/monitors/:code/rules", post(rules_controller::post_save_rule))
        .route(
            "/monitors/:code/rules/:id",
            delete(rules_controller::delete_rule),
        )
}
