use axum::{
    Router,
    routing::{get, put},
};

use crate::state::AppState;

use super::controller::{change_password, get_profile, update_profile};

pub fn init_profile_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_profile).put(update_profile))
        .route("/password", put(change_password))
}
