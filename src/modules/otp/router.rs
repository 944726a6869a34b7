use axum::{Router, routing::post};

use crate::state::AppState;

use super::controller::{send_otp, verify_otp};

pub fn init_otp_router() -> Router<AppState> {
    Router::new()
        .route("/send", post(send_otp))
        .route("/verify", post(verify_otp))
}
