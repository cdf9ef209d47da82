use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sentinel host reported when a hop gave no reply. Not an error; silent
/// routers are a normal part of a trace.
pub const NO_REPLY_HOST: &str = "timeout";

/// One node on the path, at `hop` probes' distance from the origin. The hop
/// sequence preserves tool order and may contain gaps or duplicates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceHop {
    pub hop: u32,
    pub host: String,
    pub rtt_ms: Option<f64>,
}

impl TraceHop {
    pub fn no_reply(hop: u32) -> Self {
        Self {
            hop,
            host: NO_REPLY_HOST.to_string(),
            rtt_ms: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TracerouteResult {
    pub host: String,
    pub hops: Vec<TraceHop>,
    pub timestamp: DateTime<Utc>,
}

impl TracerouteResult {
    /// An empty trace, used when the tool never produced usable output.
    pub fn empty(host: &str) -> Self {
        Self {
            host: host.to_string(),
            hops: vec![],
            timestamp: Utc::now(),
        }
    }
}
