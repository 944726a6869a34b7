use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use ecotrack_core::AppError;
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use tracing::warn;

use crate::metrics::track_rate_limited;

/// Key for requests served without a peer address (only in-process callers).
const UNKNOWN_CLIENT: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);

/// A keyed limiter shared by every request that passes through one layer.
///
/// Clients are keyed by peer IP address. `X-Forwarded-For` is read only when
/// the peer itself is one of the trusted proxies; the key is then the
/// rightmost hop that is not a trusted proxy.
#[derive(Clone)]
pub struct RateLimit {
    limiter: Arc<DefaultKeyedRateLimiter<IpAddr>>,
    trusted_proxies: Arc<[IpAddr]>,
    scope: &'static str,
}

impl RateLimit {
    pub fn new(quota: Quota, trusted_proxies: &[IpAddr], scope: &'static str) -> Self {
        Self {
            limiter: Arc::new(RateLimiter::keyed(quota)),
            trusted_proxies: trusted_proxies.into(),
            scope,
        }
    }

    pub fn check(&self, key: IpAddr) -> bool {
        self.limiter.check_key(&key).is_ok()
    }

    /// Drops per-client state that has fully replenished.
    pub fn prune(&self) {
        self.limiter.retain_recent();
    }
}

pub async fn rate_limit(State(limit): State<RateLimit>, req: Request, next: Next) -> Response {
    let key = client_ip(&req, &limit.trusted_proxies).unwrap_or(UNKNOWN_CLIENT);

    if !limit.check(key) {
        warn!(client = %key, scope = limit.scope, "Rate limit exceeded");
        track_rate_limited(limit.scope);
        return AppError::too_many_requests("Too many requests, please try again later")
            .into_response();
    }

    next.run(req).await
}

fn client_ip(req: &Request, trusted_proxies: &[IpAddr]) -> Option<IpAddr> {
    let peer = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())?;

    if !trusted_proxies.contains(&peer) {
        return Some(peer);
    }

    let forwarded = req
        .headers()
        .get_all("x-forwarded-for")
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .filter_map(|hop| hop.trim().parse::<IpAddr>().ok())
        .collect::<Vec<_>>();

    let client = forwarded
        .into_iter()
        .rev()
        .find(|hop| !trusted_proxies.contains(hop))
        .unwrap_or(peer);
    Some(client)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use std::num::NonZeroU32;

    fn quota(burst: u32) -> Quota {
        Quota::per_hour(NonZeroU32::MIN).allow_burst(NonZeroU32::new(burst).unwrap())
    }

    fn ip(value: &str) -> IpAddr {
        value.parse().unwrap()
    }

    fn request_from(peer: &str, forwarded_for: Option<&str>) -> Request {
        let mut builder = Request::builder();
        if let Some(value) = forwarded_for {
            builder = builder.header("x-forwarded-for", value);
        }
        let mut req = builder.body(Body::empty()).unwrap();
        req.extensions_mut()
            .insert(ConnectInfo(SocketAddr::new(ip(peer), 4000)));
        req
    }

    #[test]
    fn test_burst_then_reject() {
        let limit = RateLimit::new(quota(3), &[], "test");
        let client = ip("10.0.0.1");
        assert!(limit.check(client));
        assert!(limit.check(client));
        assert!(limit.check(client));
        assert!(!limit.check(client));
    }

    #[test]
    fn test_clients_are_limited_independently() {
        let limit = RateLimit::new(quota(1), &[], "test");
        assert!(limit.check(ip("10.0.0.1")));
        assert!(!limit.check(ip("10.0.0.1")));
        assert!(limit.check(ip("10.0.0.2")));
    }

    #[test]
    fn test_client_ip_uses_peer_address() {
        let req = request_from("192.0.2.1", None);
        assert_eq!(client_ip(&req, &[]), Some(ip("192.0.2.1")));
    }

    #[test]
    fn test_forwarded_for_ignored_from_untrusted_peer() {
        let req = request_from("192.0.2.1", Some("203.0.113.7"));
        assert_eq!(client_ip(&req, &[]), Some(ip("192.0.2.1")));

        let req = request_from("192.0.2.1", Some("203.0.113.7"));
        assert_eq!(client_ip(&req, &[ip("10.0.0.1")]), Some(ip("192.0.2.1")));
    }

    #[test]
    fn test_forwarded_for_read_behind_trusted_proxy() {
        let trusted = [ip("10.0.0.1"), ip("10.0.0.2")];

        // Left-most entries are client supplied; the last untrusted hop wins.
        let req = request_from("10.0.0.1", Some("198.51.100.9, 203.0.113.7, 10.0.0.2"));
        assert_eq!(client_ip(&req, &trusted), Some(ip("203.0.113.7")));

        let req = request_from("10.0.0.1", Some("garbage"));
        assert_eq!(client_ip(&req, &trusted), Some(ip("10.0.0.1")));

        let req = request_from("10.0.0.1", None);
        assert_eq!(client_ip(&req, &trusted), Some(ip("10.0.0.1")));
    }

    #[test]
    fn test_client_ip_without_peer() {
        let req = Request::builder()
            .header("x-forwarded-for", "203.0.113.7")
            .body(Body::empty())
            .unwrap();
        assert_eq!(client_ip(&req, &[ip("10.0.0.1")]), None);
    }

    #[test]
    fn test_spoofed_forwarded_for_shares_peer_bucket() {
        let limit = RateLimit::new(quota(1), &[], "test");

        let passed = (0..20)
            .filter(|i| {
                let spoofed = format!("203.0.113.{i}");
                let req = request_from("192.0.2.50", Some(spoofed.as_str()));
                let key = client_ip(&req, &limit.trusted_proxies).unwrap_or(UNKNOWN_CLIENT);
                limit.check(key)
            })
            .count();
        assert_eq!(passed, 1);
    }
}
