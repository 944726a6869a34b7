use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{
    create_footprint, delete_footprint, get_factors, get_footprint, get_footprints, get_summary,
    update_footprint,
};

pub fn init_footprints_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_footprints).post(create_footprint))
        .route("/factors", get(get_factors))
        .route("/summary", get(get_summary))
        .route(
            "/{id}",
            get(get_footprint)
                .put(update_footprint)
                .delete(delete_footprint),
        )
}
