use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use crate::error::AppError;

/// Entries beyond this count trigger a sweep of expired windows
const PRUNE_THRESHOLD: usize = 10_000;

#[derive(Debug, Clone, Copy)]
pub struct RateLimitConfig {
    pub max_requests: u32,
    pub window: Duration,
}

impl RateLimitConfig {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct RateLimitEntry {
    count: u32,
    window_start: Instant,
}

/// Fixed-window request counter keyed by client IP
#[derive(Debug, Clone)]
pub struct RateLimiter {
    config: RateLimitConfig,
    limits: Arc<RwLock<HashMap<IpAddr, RateLimitEntry>>>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            limits: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Count one request from `ip`, returning whether it fits in the current window
    pub async fn check(&self, ip: IpAddr) -> bool {
        let now = Instant::now();
        let window = self.config.window;
        let mut limits = self.limits.write().await;

        if limits.len() > PRUNE_THRESHOLD {
            limits.retain(|_, entry| now.duration_since(entry.window_start) < window);
        }

        let entry = limits.entry(ip).or_insert(RateLimitEntry {
            count: 0,
            window_start: now,
        });

        if now.duration_since(entry.window_start) >= window {
            entry.count = 0;
            entry.window_start = now;
        }

        if entry.count < self.config.max_requests {
            entry.count += 1;
            true
        } else {
            false
        }
    }
}

/// Client IP: first `X-Forwarded-For` hop, then `X-Real-IP`, then the peer address.
fn client_ip(request: &Request) -> IpAddr {
    let headers = request.headers();

    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .and_then(|v| v.trim().parse::<IpAddr>().ok());

    let real_ip = || {
        headers
            .get("x-real-ip")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<IpAddr>().ok())
    };

    let peer = || {
        request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip())
    };

    forwarded
        .or_else(real_ip)
        .or_else(peer)
        .unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST))
}

/// Middleware rejecting requests over the per-client budget with 429
pub async fn rate_limit(
    State(limiter): State<RateLimiter>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let ip = client_ip(&request);

    if !limiter.check(ip).await {
        tracing::warn!(client_ip = %ip, "Rate limit exceeded");
        return Err(AppError::TooManyRequests);
    }

    Ok(next.run(request).await)
}
