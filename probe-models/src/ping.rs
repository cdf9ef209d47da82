use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fully-populated result of one ping probe. Constructed fresh per request
/// and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PingResult {
    pub host: String,
    pub packets_transmitted: u32,
    pub packets_received: u32,
    /// Percentage in [0, 100]
    pub packet_loss: f64,
    pub min_ms: f64,
    pub avg_ms: f64,
    pub max_ms: f64,
    pub timestamp: DateTime<Utc>,
}

impl PingResult {
    /// Maximally-pessimistic outcome used whenever the real one cannot be
    /// determined (tool missing, non-zero exit, wall-clock ceiling hit).
    pub fn unreachable(host: &str, count: u32) -> Self {
        Self {
            host: host.to_string(),
            packets_transmitted: count,
            packets_received: 0,
            packet_loss: 100.0,
            min_ms: 0.0,
            avg_ms: 0.0,
            max_ms: 0.0,
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unreachable_is_full_loss() {
        let result = PingResult::unreachable("192.0.2.1", 4);

        assert_eq!(result.packets_transmitted, 4);
        assert_eq!(result.packets_received, 0);
        assert_eq!(result.packet_loss, 100.0);
        assert_eq!(result.min_ms, 0.0);
        assert_eq!(result.avg_ms, 0.0);
        assert_eq!(result.max_ms, 0.0);
    }

    #[test]
    fn serializes_with_wire_field_names() {
        let result = PingResult::unreachable("8.8.8.8", 2);

        let json = serde_json::to_value(&result).expect("serialization to succeed");
        assert_eq!(json["host"], "8.8.8.8");
        assert_eq!(json["packets_transmitted"], 2);
        assert_eq!(json["packet_loss"], 100.0);
        assert!(json.get("timestamp").is_some());
    }
}
