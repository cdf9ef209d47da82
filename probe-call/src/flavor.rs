/// Which family of diagnostic tools we are driving. Detected once at
/// startup; everything downstream (argument vectors, output grammars)
/// dispatches on this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flavor {
    Unix,
    Windows,
}

impl Flavor {
    pub fn detect() -> Self {
        if cfg!(windows) {
            Flavor::Windows
        } else {
            Flavor::Unix
        }
    }

    /// The ping binary goes by the same name everywhere.
    pub fn ping_program(&self) -> &'static str {
        "ping"
    }

    /// `packet_timeout_secs` is the tool's own per-packet wait, not the
    /// wall-clock ceiling enforced by the caller.
    pub fn build_ping_args(&self, host: &str, count: u32, packet_timeout_secs: u64) -> Vec<String> {
        match self {
            Flavor::Windows => vec![
                "-n".to_string(),
                count.to_string(),
                // Windows ping takes milliseconds
                "-w".to_string(),
                (packet_timeout_secs * 1000).to_string(),
                host.to_string(),
            ],
            Flavor::Unix => vec![
                "-c".to_string(),
                count.to_string(),
                "-W".to_string(),
                packet_timeout_secs.to_string(),
                host.to_string(),
            ],
        }
    }

    pub fn build_traceroute_args(&self, host: &str, max_hops: u32) -> Vec<String> {
        match self {
            Flavor::Windows => vec!["-h".to_string(), max_hops.to_string(), host.to_string()],
            // -n: numeric output, skip reverse DNS
            Flavor::Unix => vec![
                "-n".to_string(),
                "-m".to_string(),
                max_hops.to_string(),
                host.to_string(),
            ],
        }
    }
}
