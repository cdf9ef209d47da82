use chrono::Utc;
use probe_models::PingResult;
use regex::Regex;

use crate::flavor::Flavor;

/// Extracts RTT statistics and packet loss from raw ping output.
///
/// A grammar miss is not a failure: RTTs default to 0.0 and loss to 0.0
/// (optimistic — distinct from the pessimistic full-loss outcome used when
/// the tool itself failed, which the caller decides before parsing).
#[derive(Debug)]
pub struct PingParser {
    flavor: Flavor,
    stats_re: Regex,
    loss_re: Regex,
}

impl PingParser {
    pub fn new(flavor: Flavor) -> Self {
        let stats_re = match flavor {
            Flavor::Unix => Regex::new(r"min/avg/max.*= ([\d.]+)/([\d.]+)/([\d.]+)"),
            Flavor::Windows => {
                Regex::new(r"Minimum = (\d+)ms, Maximum = (\d+)ms, Average = (\d+)ms")
            }
        }
        .expect("ping stats regex to compile");
        // ping localises its summary line; "perdidos" covers Spanish systems
        let loss_re =
            Regex::new(r"(\d+)% packet loss|(\d+)% perdidos").expect("ping loss regex to compile");
        Self {
            flavor,
            stats_re,
            loss_re,
        }
    }

    pub fn parse(&self, raw: &str, host: &str, count: u32) -> PingResult {
        let (min_ms, avg_ms, max_ms) = self.parse_rtt_stats(raw);
        let packet_loss = self.parse_loss(raw);
        let lost = (count as f64 * packet_loss / 100.0).floor() as u32;
        let packets_received = count.saturating_sub(lost);

        PingResult {
            host: host.to_string(),
            packets_transmitted: count,
            packets_received,
            packet_loss,
            min_ms,
            avg_ms,
            max_ms,
            timestamp: Utc::now(),
        }
    }

    fn parse_rtt_stats(&self, raw: &str) -> (f64, f64, f64) {
        let caps = match self.stats_re.captures(raw) {
            Some(caps) => caps,
            None => return (0.0, 0.0, 0.0),
        };
        let group = |index| {
            caps.get(index)
                .and_then(|m| m.as_str().parse::<f64>().ok())
                .unwrap_or(0.0)
        };
        match self.flavor {
            Flavor::Unix => (group(1), group(2), group(3)),
            // Windows prints Minimum, Maximum, Average in that order
            Flavor::Windows => (group(1), group(3), group(2)),
        }
    }

    fn parse_loss(&self, raw: &str) -> f64 {
        let caps = match self.loss_re.captures(raw) {
            Some(caps) => caps,
            None => return 0.0,
        };
        caps.get(1)
            .or_else(|| caps.get(2))
            .and_then(|m| m.as_str().parse::<f64>().ok())
            .unwrap_or(0.0)
            .clamp(0.0, 100.0)
    }
}
