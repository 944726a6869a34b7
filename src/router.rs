use std::sync::Arc;

use axum::{Router, middleware};
use metrics_exporter_prometheus::PrometheusHandle;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

use crate::docs::ApiDoc;
use crate::logging::logging_middleware;
use crate::metrics::{metrics_middleware, metrics_router};
use crate::middleware::cors::{cors_layer, enforce_origin};
use crate::middleware::rate_limit::{RateLimit, rate_limit};
use crate::modules::auth::router::init_auth_router;
use crate::modules::footprints::router::init_footprints_router;
use crate::modules::health::router::init_health_router;
use crate::modules::otp::router::init_otp_router;
use crate::modules::profile::router::init_profile_router;
use crate::modules::realtime::router::init_realtime_router;
use crate::state::AppState;

/// The limiters a router was built with, so the caller can prune them.
#[derive(Clone)]
pub struct RateLimiters {
    pub general: RateLimit,
    pub auth: RateLimit,
}

impl RateLimiters {
    pub fn from_state(state: &AppState) -> Self {
        Self {
            general: RateLimit::new(
                state.rate_limit_config.general_quota(),
                &state.rate_limit_config.trusted_proxies,
                "general",
            ),
            auth: RateLimit::new(
                state.rate_limit_config.auth_quota(),
                &state.rate_limit_config.trusted_proxies,
                "auth",
            ),
        }
    }

    pub fn prune(&self) {
        self.general.prune();
        self.auth.prune();
    }
}

pub fn init_router(state: AppState) -> Router {
    let limiters = RateLimiters::from_state(&state);
    build_router(state, &limiters, None)
}

/// Full application router.
///
/// Layers run outermost first: request logging, metrics, origin enforcement,
/// CORS headers, then the per-group rate limits. Auth and OTP routes sit
/// behind both the general and the stricter auth limiter.
pub fn build_router(
    state: AppState,
    limiters: &RateLimiters,
    metrics_handle: Option<PrometheusHandle>,
) -> Router {
    let cors_config = Arc::new(state.cors_config.clone());

    let api = Router::new()
        .nest(
            "/auth",
            init_auth_router().layer(middleware::from_fn_with_state(
                limiters.auth.clone(),
                rate_limit,
            )),
        )
        .nest(
            "/otp",
            init_otp_router().layer(middleware::from_fn_with_state(
                limiters.auth.clone(),
                rate_limit,
            )),
        )
        .nest("/footprints", init_footprints_router())
        .nest("/profile", init_profile_router())
        .nest("/realtime", init_realtime_router())
        .layer(middleware::from_fn_with_state(
            limiters.general.clone(),
            rate_limit,
        ));

    let mut router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .merge(init_health_router())
        .nest("/api", api);

    if let Some(handle) = metrics_handle {
        router = router.merge(metrics_router(handle));
    }

    router
        .with_state(state)
        .layer(cors_layer(&cors_config))
        .layer(middleware::from_fn_with_state(cors_config, enforce_origin))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(logging_middleware))
}
