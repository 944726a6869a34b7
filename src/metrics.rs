use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
    routing::get,
};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

static OBSERVABILITY_ENABLED: OnceLock<bool> = OnceLock::new();

/// Check if observability is enabled via OBSERVABILITY_ENABLED env var
pub fn is_observability_enabled() -> bool {
    *OBSERVABILITY_ENABLED.get_or_init(|| {
        std::env::var("OBSERVABILITY_ENABLED")
            .map(|v| parse_enabled(&v))
            .unwrap_or(true)
    })
}

fn parse_enabled(value: &str) -> bool {
    !matches!(value.trim().to_lowercase().as_str(), "false" | "0" | "no" | "off")
}

/// Installs the Prometheus recorder and spawns its upkeep task.
///
/// Returns `Ok(None)` when observability is disabled.
pub fn init_metrics() -> Result<Option<PrometheusHandle>, BuildError> {
    if !is_observability_enabled() {
        return Ok(None);
    }

    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full("http_request_duration_seconds".to_string()),
            &[
                0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
            ],
        )?
        .install_recorder()?;

    let upkeep_handle = handle.clone();
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(Duration::from_secs(5)).await;
            upkeep_handle.run_upkeep();
        }
    });

    Ok(Some(handle))
}

/// Metrics middleware to track HTTP requests
pub async fn metrics_middleware(req: Request, next: Next) -> Response {
    if !is_observability_enabled() {
        return next.run(req).await;
    }

    let start = Instant::now();
    let method = req.method().as_str().to_owned();
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| req.uri().path().to_owned());

    gauge!("http_requests_active").increment(1.0);

    let response = next.run(req).await;

    let latency = start.elapsed().as_secs_f64();
    let status = response.status().as_u16();

    counter!(
        "http_requests_total",
        "method" => method.clone(),
        "path" => path.clone(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("http_request_duration_seconds", "method" => method, "path" => path)
        .record(latency);

    gauge!("http_requests_active").decrement(1.0);

    response
}

/// Routes serving the Prometheus scrape endpoint.
pub fn metrics_router<S>(handle: PrometheusHandle) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route("/metrics", get(move || async move { handle.render() }))
}

// Business metrics helpers

pub fn track_user_registered() {
    if !is_observability_enabled() {
        return;
    }
    counter!("users_registered_total").increment(1);
}

pub fn track_user_login_success(method: &'static str) {
    if !is_observability_enabled() {
        return;
    }
    counter!("user_logins_total", "method" => method, "status" => "success").increment(1);
}

pub fn track_user_login_failure(reason: &'static str) {
    if !is_observability_enabled() {
        return;
    }
    counter!("user_logins_total", "method" => "password", "status" => "failure", "reason" => reason)
        .increment(1);
}

pub fn track_jwt_issued() {
    if !is_observability_enabled() {
        return;
    }
    counter!("jwt_tokens_issued_total").increment(1);
}

pub fn track_otp_issued(purpose: &'static str) {
    if !is_observability_enabled() {
        return;
    }
    counter!("otp_codes_issued_total", "purpose" => purpose).increment(1);
}

pub fn track_otp_verification(purpose: &'static str, outcome: &'static str) {
    if !is_observability_enabled() {
        return;
    }
    counter!("otp_verifications_total", "purpose" => purpose, "outcome" => outcome).increment(1);
}

pub fn track_footprint_logged(category: &'static str, co2e_kg: f64) {
    if !is_observability_enabled() {
        return;
    }
    counter!("footprints_logged_total", "category" => category).increment(1);
    histogram!("footprint_co2e_kg", "category" => category).record(co2e_kg);
}

pub fn track_db_health_check(healthy: bool) {
    if !is_observability_enabled() {
        return;
    }
    let status = if healthy { "up" } else { "down" };
    counter!("database_health_checks_total", "status" => status).increment(1);
}

pub fn track_rate_limited(scope: &'static str) {
    if !is_observability_enabled() {
        return;
    }
    counter!("rate_limited_requests_total", "scope" => scope).increment(1);
}

pub fn track_origin_rejected() {
    if !is_observability_enabled() {
        return;
    }
    counter!("cors_rejections_total").increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_enabled() {
        assert!(parse_enabled("true"));
        assert!(parse_enabled("1"));
        assert!(parse_enabled(""));
        assert!(!parse_enabled("false"));
        assert!(!parse_enabled(" OFF "));
        assert!(!parse_enabled("0"));
    }
}
