//! Per-route, per-client-IP rate limiting.

use axum::{
    body::Body,
    extract::{ConnectInfo, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use serde_json::json;
use std::{
    collections::HashMap,
    net::SocketAddr,
    num::NonZeroU32,
    sync::{Arc, Mutex, RwLock},
    time::{Duration, Instant},
};

/// Per-IP rate limiter using Governor.
pub type IpRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

// Entries idle past this are dropped by the cleanup sweep. Longer than the
// quota window, so dropping one never hands a throttled client fresh quota.
const IDLE_TTL: Duration = Duration::from_secs(120);

struct IpEntry {
    limiter: IpRateLimiter,
    last_seen: Mutex<Instant>,
}

/// Counter store for one route: a limiter per client IP, all sharing the
/// route's quota.
pub struct RouteLimiter {
    limiters: RwLock<HashMap<String, Arc<IpEntry>>>,
    per_minute: u32,
}

impl RouteLimiter {
    pub fn new(per_minute: u32) -> Self {
        Self {
            limiters: RwLock::new(HashMap::new()),
            per_minute,
        }
    }

    /// Check if a request from this IP is within the route's quota.
    pub fn check(&self, ip: &str) -> bool {
        let entry = self.get_or_create_entry(ip);
        *entry.last_seen.lock().unwrap() = Instant::now();
        entry.limiter.check().is_ok()
    }

    fn get_or_create_entry(&self, ip: &str) -> Arc<IpEntry> {
        // Try read lock first
        {
            let read_guard = self.limiters.read().unwrap();
            if let Some(entry) = read_guard.get(ip) {
                return entry.clone();
            }
        }

        let mut write_guard = self.limiters.write().unwrap();

        // Double-check after acquiring write lock
        if let Some(entry) = write_guard.get(ip) {
            return entry.clone();
        }

        let quota =
            Quota::per_minute(NonZeroU32::new(self.per_minute).unwrap_or(NonZeroU32::MIN));
        let entry = Arc::new(IpEntry {
            limiter: RateLimiter::direct(quota),
            last_seen: Mutex::new(Instant::now()),
        });
        write_guard.insert(ip.to_string(), entry.clone());
        entry
    }

    fn cleanup(&self) {
        self.cleanup_idle(IDLE_TTL);
    }

    fn cleanup_idle(&self, ttl: Duration) {
        let now = Instant::now();
        let mut guard = self.limiters.write().unwrap();
        guard.retain(|_, entry| {
            now.duration_since(*entry.last_seen.lock().unwrap()) < ttl
        });
    }
}

/// Rate-limiter state for all externally reachable routes. Initialized once
/// at startup; the per-key counters are the only state shared between
/// concurrent requests.
pub struct RateLimitState {
    pub create: RouteLimiter,
    pub upgrade: RouteLimiter,
    pub inbox: RouteLimiter,
    pub message: RouteLimiter,
}

impl RateLimitState {
    pub fn new(create: u32, upgrade: u32, inbox: u32, message: u32) -> Self {
        Self {
            create: RouteLimiter::new(create),
            upgrade: RouteLimiter::new(upgrade),
            inbox: RouteLimiter::new(inbox),
            message: RouteLimiter::new(message),
        }
    }

    /// Drop per-IP entries no longer referenced elsewhere.
    pub fn cleanup(&self) {
        self.create.cleanup();
        self.upgrade.cleanup();
        self.inbox.cleanup();
        self.message.cleanup();
    }

    /// Start a background task to periodically clean up old entries.
    pub fn start_cleanup_task(self: Arc<Self>) {
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(Duration::from_secs(300)).await;
                self.cleanup();
            }
        });
    }
}

/// Extract the client IP from the request.
fn client_ip(req: &Request<Body>) -> String {
    // X-Forwarded-For first (reverse proxy), taking the first hop.
    if let Some(forwarded) = req
        .headers()
        .get("X-Forwarded-For")
        .and_then(|v| v.to_str().ok())
    {
        if let Some(ip) = forwarded.split(',').next() {
            return ip.trim().to_string();
        }
    }

    if let Some(real_ip) = req
        .headers()
        .get("X-Real-IP")
        .and_then(|v| v.to_str().ok())
    {
        return real_ip.to_string();
    }

    if let Some(ConnectInfo(addr)) = req.extensions().get::<ConnectInfo<SocketAddr>>() {
        return addr.ip().to_string();
    }

    "unknown".to_string()
}

fn enforce(limiter: &RouteLimiter, route: &str, req: Request<Body>) -> Result<Request<Body>, Response> {
    let ip = client_ip(&req);
    if !limiter.check(&ip) {
        tracing::warn!(ip = %ip, route = route, "rate limit exceeded");
        return Err((
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({ "detail": "Rate limit exceeded" })),
        )
            .into_response());
    }
    Ok(req)
}

pub async fn create_limit(
    State(state): State<Arc<RateLimitState>>,
    req: Request<Body>,
    next: Next,
) -> Response {
    match enforce(&state.create, "/create", req) {
        Ok(req) => next.run(req).await,
        Err(resp) => resp,
    }
}

pub async fn upgrade_limit(
    State(state): State<Arc<RateLimitState>>,
    req: Request<Body>,
    next: Next,
) -> Response {
    match enforce(&state.upgrade, "/upgrade-email", req) {
        Ok(req) => next.run(req).await,
        Err(resp) => resp,
    }
}

pub async fn inbox_limit(
    State(state): State<Arc<RateLimitState>>,
    req: Request<Body>,
    next: Next,
) -> Response {
    match enforce(&state.inbox, "/inbox", req) {
        Ok(req) => next.run(req).await,
        Err(resp) => resp,
    }
}

pub async fn message_limit(
    State(state): State<Arc<RateLimitState>>,
    req: Request<Body>,
    next: Next,
) -> Response {
    match enforce(&state.message, "/message", req) {
        Ok(req) => next.run(req).await,
        Err(resp) => resp,
    }
}
