use chrono::Utc;
use futures::future::join_all;
use log::debug;
use probe_models::{PingResult, TracerouteResult};

use crate::caller::{self, PING_CEILING, TRACEROUTE_CEILING};
use crate::flavor::Flavor;
use crate::locate;
use crate::parse::{PingParser, TraceParser};

pub const MIN_PING_COUNT: u32 = 1;
pub const MAX_PING_COUNT: u32 = 10;
pub const MIN_HOPS: u32 = 1;
pub const MAX_HOPS: u32 = 50;

/// The tool's own per-packet wait. The wall-clock ceilings in [caller]
/// apply on top of this.
const PACKET_TIMEOUT_SECS: u64 = 2;

/// Orchestrates tool invocation and output parsing into the two public
/// probe operations. All failure paths (missing binary, non-zero exit,
/// ceiling breach, grammar miss) fold into well-formed pessimistic results;
/// none of the operations can fail.
///
/// Holds no mutable state, so one instance serves concurrent requests.
#[derive(Debug)]
pub struct ProbeService {
    flavor: Flavor,
    ping_parser: PingParser,
    trace_parser: TraceParser,
    ping_program: String,
    traceroute_program: String,
}

impl ProbeService {
    pub fn new() -> Self {
        Self::for_flavor(Flavor::detect())
    }

    pub fn for_flavor(flavor: Flavor) -> Self {
        let ping_program = flavor.ping_program().to_string();
        let traceroute_program = locate::locate_traceroute(flavor);
        Self::with_programs(flavor, ping_program, traceroute_program)
    }

    fn with_programs(flavor: Flavor, ping_program: String, traceroute_program: String) -> Self {
        Self {
            flavor,
            ping_parser: PingParser::new(flavor),
            trace_parser: TraceParser::new(flavor),
            ping_program,
            traceroute_program,
        }
    }

    /// Pings `host` with `count` packets (re-clamped to [1, 10] since this
    /// is reachable as a library function).
    pub async fn ping(&self, host: &str, count: u32) -> PingResult {
        let count = count.clamp(MIN_PING_COUNT, MAX_PING_COUNT);
        let args = self.flavor.build_ping_args(host, count, PACKET_TIMEOUT_SECS);
        let exec = caller::run_with_ceiling(&self.ping_program, &args, PING_CEILING).await;

        if exec.timed_out || !exec.success {
            // non-zero exit means the target did not answer; that is total
            // packet loss, not an error
            debug!("ping of {} did not complete cleanly, reporting full loss", host);
            return PingResult::unreachable(host, count);
        }
        self.ping_parser.parse(&exec.stdout, host, count)
    }

    /// Pings all `hosts` concurrently; results come back in input order
    /// regardless of which probe finishes first.
    pub async fn ping_many(&self, hosts: &[String], count: u32) -> Vec<PingResult> {
        join_all(hosts.iter().map(|host| self.ping(host, count))).await
    }

    /// Traces the route to `host` (`max_hops` re-clamped to [1, 50]). The
    /// exit status is deliberately not consulted: traceroute frequently
    /// exits non-zero while still having printed useful hops.
    pub async fn traceroute(&self, host: &str, max_hops: u32) -> TracerouteResult {
        let max_hops = max_hops.clamp(MIN_HOPS, MAX_HOPS);
        let args = self.flavor.build_traceroute_args(host, max_hops);
        let exec =
            caller::run_with_ceiling(&self.traceroute_program, &args, TRACEROUTE_CEILING).await;

        if exec.timed_out {
            debug!("traceroute to {} hit its ceiling, reporting an empty trace", host);
            return TracerouteResult::empty(host);
        }
        TracerouteResult {
            host: host.to_string(),
            hops: self.trace_parser.parse(&exec.stdout),
            timestamp: Utc::now(),
        }
    }
}

impl Default for ProbeService {
    fn default() -> Self {
        Self::new()
    }
}
