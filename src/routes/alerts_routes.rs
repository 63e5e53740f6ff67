use crate::{controllers::alerts_controller, AppState};
use axum::{routing::post, Router};

pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    router.route("/monitors/:code/push", post(alerts_controller::post_push_now))
}
