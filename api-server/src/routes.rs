//! HTTP request handlers and the validation gate in front of the probes.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use conncheck::allowlist::HostAllowlist;
use conncheck::host_check::is_valid_host;
use probe_call::service::{MAX_HOPS, MAX_PING_COUNT, MIN_HOPS, MIN_PING_COUNT};
use probe_call::ProbeService;
use probe_models::{PingResult, TracerouteResult};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;

/// At most this many hosts per bulk request.
const MAX_BULK_HOSTS: usize = 5;

pub struct AppState {
    allowlist: HostAllowlist,
    probes: ProbeService,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn shared(allowlist: HostAllowlist) -> SharedState {
        Arc::new(AppState {
            allowlist,
            probes: ProbeService::new(),
        })
    }
}

pub fn create_router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(handle_root))
        .route("/health", get(handle_health))
        .route("/ping", get(handle_ping))
        .route("/ping/bulk", post(handle_bulk_ping))
        .route("/traceroute", get(handle_traceroute))
        .route("/allowed-hosts", get(handle_allowed_hosts))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[derive(Debug, Serialize)]
pub struct HealthCheck {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    pub version: &'static str,
}

impl HealthCheck {
    fn now(status: &'static str) -> Json<Self> {
        Json(Self {
            status,
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION"),
        })
    }
}

async fn handle_root() -> Json<HealthCheck> {
    HealthCheck::now("OK")
}

async fn handle_health() -> Json<HealthCheck> {
    HealthCheck::now("healthy")
}

/// Error envelope returned for all non-2xx responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub detail: String,
    pub error_code: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    fn bad_request(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            detail: detail.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            detail: self.detail,
            error_code: format!("HTTP_{}", self.status.as_u16()),
            timestamp: Utc::now(),
        };
        (self.status, Json(body)).into_response()
    }
}

#[derive(Debug, Deserialize)]
pub struct PingQuery {
    /// IPv4 address or domain name to probe.
    pub host: String,
    /// Packets to send, 1-10.
    #[serde(default = "default_count")]
    pub count: u32,
}

fn default_count() -> u32 {
    4
}

#[derive(Debug, Deserialize)]
pub struct TracerouteQuery {
    pub host: String,
    /// Maximum hops to trace, 1-50.
    #[serde(default = "default_max_hops")]
    pub max_hops: u32,
}

fn default_max_hops() -> u32 {
    30
}

#[derive(Debug, Deserialize)]
pub struct BulkPingRequest {
    pub hosts: Vec<String>,
    #[serde(default = "default_count")]
    pub count: u32,
}

#[derive(Debug, Serialize)]
pub struct BulkPingResponse {
    pub results: Vec<PingResult>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct AllowedHostsResponse {
    pub allowed_hosts: Vec<String>,
    pub count: usize,
    pub timestamp: DateTime<Utc>,
}

async fn handle_ping(
    State(state): State<SharedState>,
    Query(params): Query<PingQuery>,
) -> Result<Json<PingResult>, ApiError> {
    check_host(&state, &params.host)?;
    check_bounds(params.count, MIN_PING_COUNT, MAX_PING_COUNT, "count")?;

    Ok(Json(state.probes.ping(&params.host, params.count).await))
}

async fn handle_traceroute(
    State(state): State<SharedState>,
    Query(params): Query<TracerouteQuery>,
) -> Result<Json<TracerouteResult>, ApiError> {
    check_host(&state, &params.host)?;
    check_bounds(params.max_hops, MIN_HOPS, MAX_HOPS, "max_hops")?;

    Ok(Json(
        state.probes.traceroute(&params.host, params.max_hops).await,
    ))
}

async fn handle_bulk_ping(
    State(state): State<SharedState>,
    Json(request): Json<BulkPingRequest>,
) -> Result<Json<BulkPingResponse>, ApiError> {
    if request.hosts.len() > MAX_BULK_HOSTS {
        return Err(ApiError::bad_request(format!(
            "At most {} hosts are allowed per request",
            MAX_BULK_HOSTS
        )));
    }
    for host in &request.hosts {
        check_host(&state, host)?;
    }
    check_bounds(request.count, MIN_PING_COUNT, MAX_PING_COUNT, "count")?;

    let results = state.probes.ping_many(&request.hosts, request.count).await;
    Ok(Json(BulkPingResponse {
        results,
        timestamp: Utc::now(),
    }))
}

async fn handle_allowed_hosts(State(state): State<SharedState>) -> Json<AllowedHostsResponse> {
    let allowed_hosts = state.allowlist.sorted_hosts();
    Json(AllowedHostsResponse {
        count: allowed_hosts.len(),
        allowed_hosts,
        timestamp: Utc::now(),
    })
}

/// Allow-list membership first, syntax second; both reject with 400 so a
/// caller cannot distinguish unknown hosts from malformed ones by status.
fn check_host(state: &AppState, host: &str) -> Result<(), ApiError> {
    if !state.allowlist.is_allowed(host) {
        return Err(ApiError::bad_request(format!(
            "Host '{}' is not allowed. Allowed hosts: {:?}",
            host,
            state.allowlist.sorted_hosts()
        )));
    }
    if !is_valid_host(host) {
        return Err(ApiError::bad_request(format!("Host '{}' is not valid", host)));
    }
    Ok(())
}

fn check_bounds(value: u32, min: u32, max: u32, name: &str) -> Result<(), ApiError> {
    if value < min || value > max {
        return Err(ApiError::bad_request(format!(
            "Parameter '{}' must be between {} and {}",
            name, min, max
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use assertor::assert_that;
    use assertor::ResultAssertion;

    use super::*;

    fn test_state() -> AppState {
        AppState {
            allowlist: HostAllowlist::new(vec![
                "8.8.8.8".to_string(),
                "google.com".to_string(),
                "bad_entry".to_string(),
            ]),
            probes: ProbeService::for_flavor(probe_call::Flavor::Unix),
        }
    }

    #[test]
    fn allowed_and_valid_host_passes() {
        let state = test_state();

        assert_that!(check_host(&state, "8.8.8.8")).is_ok();
        assert_that!(check_host(&state, "google.com")).is_ok();
    }

    #[test]
    fn unknown_host_is_rejected() {
        let state = test_state();

        let err = check_host(&state, "evil.example.org").unwrap_err();

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(err.detail.contains("not allowed"));
    }

    #[test]
    fn allowed_but_malformed_host_is_rejected() {
        let state = test_state();

        let err = check_host(&state, "bad_entry").unwrap_err();

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(err.detail.contains("not valid"));
    }

    #[test]
    fn bounds_check_rejects_out_of_range() {
        assert_that!(check_bounds(4, 1, 10, "count")).is_ok();
        assert_that!(check_bounds(1, 1, 10, "count")).is_ok();
        assert_that!(check_bounds(10, 1, 10, "count")).is_ok();
        assert!(check_bounds(0, 1, 10, "count").is_err());
        assert!(check_bounds(11, 1, 10, "count").is_err());
    }

    #[test]
    fn error_envelope_carries_status_code() {
        let err = ApiError::bad_request("nope");

        let body = ErrorBody {
            detail: err.detail.clone(),
            error_code: format!("HTTP_{}", err.status.as_u16()),
            timestamp: Utc::now(),
        };
        let json = serde_json::to_value(&body).expect("serialization to succeed");

        assert_eq!(json["error_code"], "HTTP_400");
        assert_eq!(json["detail"], "nope");
    }
}
