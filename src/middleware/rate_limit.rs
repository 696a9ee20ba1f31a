use axum::{
    Json,
    extract::{ConnectInfo, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use std::{net::SocketAddr, sync::Arc};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::reviews::dtos::ErrorResponse;

/// Fixed-window request counter keyed by client IP.
#[derive(Clone)]
pub struct RateLimit {
    store: Arc<DashMap<String, RateLimitData>>,
    max_requests: u32,
    window_seconds: i64,
}

#[derive(Debug, Clone)]
struct RateLimitData {
    count: u32,
    window_start: DateTime<Utc>,
}

impl RateLimit {
    pub fn new(max_requests: u32, window_seconds: i64) -> Self {
        Self {
            store: Arc::new(DashMap::new()),
            max_requests,
            window_seconds,
        }
    }

    /// Counts one request from `key` at `now`; false once the window's
    /// budget is spent.
    fn allow(&self, key: String, now: DateTime<Utc>) -> bool {
        let mut entry = self.store.entry(key).or_insert_with(|| RateLimitData {
            count: 0,
            window_start: now,
        });

        let data = entry.value_mut();

        // Check if we need to reset the window
        if now.signed_duration_since(data.window_start) >= Duration::seconds(self.window_seconds) {
            data.count = 0;
            data.window_start = now;
        }

        data.count += 1;
        data.count <= self.max_requests
    }

    /// Drops clients whose window has ended by `now`. Returns how many were
    /// removed.
    pub fn sweep(&self, now: DateTime<Utc>) -> usize {
        let window = Duration::seconds(self.window_seconds);
        let before = self.store.len();
        self.store
            .retain(|_, data| now.signed_duration_since(data.window_start) < window);
        before.saturating_sub(self.store.len())
    }

    /// Sweeps expired windows once per window length for as long as the
    /// server runs.
    pub fn spawn_sweeper(&self) -> JoinHandle<()> {
        let limit = self.clone();
        let period = std::time::Duration::from_secs(self.window_seconds.max(1) as u64);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;
                let removed = limit.sweep(Utc::now());
                if removed > 0 {
                    debug!(removed, "expired rate limit windows dropped");
                }
            }
        })
    }
}

/// IP-based rate limiting middleware for review submissions.
pub async fn rate_limit_middleware(
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    State(rate_limit): State<RateLimit>,
    req: Request,
    next: Next,
) -> Response {
    let ip = addr.ip().to_string();

    if !rate_limit.allow(ip.clone(), Utc::now()) {
        warn!(client_ip = %ip, "submission rate limit exceeded");
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(ErrorResponse {
                error: "Rate limit exceeded".to_string(),
            }),
        )
            .into_response();
    }

    next.run(req).await
}
