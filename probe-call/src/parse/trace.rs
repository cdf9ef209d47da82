use log::trace;
use probe_models::TraceHop;
use regex::Regex;

use crate::flavor::Flavor;

/// Extracts hops from raw traceroute/tracert output.
///
/// Neither tool emits a structured format, so this parser is deliberately
/// lenient: a line that does not parse is skipped and the rest of the trace
/// survives. Partial hop data is still useful to the caller.
#[derive(Debug)]
pub struct TraceParser {
    flavor: Flavor,
    ipv4_re: Regex,
    rtt_re: Regex,
}

impl TraceParser {
    pub fn new(flavor: Flavor) -> Self {
        let ipv4_re = Regex::new(r"\d+\.\d+\.\d+\.\d+").expect("IPv4 shape regex to compile");
        let rtt_re = Regex::new(r"(\d+)\s*ms").expect("RTT regex to compile");
        Self {
            flavor,
            ipv4_re,
            rtt_re,
        }
    }

    pub fn parse(&self, raw: &str) -> Vec<TraceHop> {
        match self.flavor {
            Flavor::Unix => parse_unix(raw),
            Flavor::Windows => self.parse_windows(raw),
        }
    }

    fn parse_windows(&self, raw: &str) -> Vec<TraceHop> {
        let mut hops = vec![];
        for (index, line) in raw.lines().enumerate() {
            let trimmed = line.trim();
            // data lines start with their own 1-based index; everything
            // else is banner or blank
            if !trimmed.starts_with(&(index + 1).to_string()) {
                continue;
            }
            match self.parse_windows_line(trimmed) {
                Some(hop) => hops.push(hop),
                None => trace!("Skipping unparseable tracert line: {}", line),
            }
        }
        hops
    }

    fn parse_windows_line(&self, line: &str) -> Option<TraceHop> {
        let hop = line.split_whitespace().next()?.parse().ok()?;
        match self.ipv4_re.find(line) {
            None => Some(TraceHop::no_reply(hop)),
            Some(found) => {
                let rtt_ms = self
                    .rtt_re
                    .captures(line)
                    .and_then(|caps| caps.get(1))
                    .and_then(|m| m.as_str().parse().ok());
                Some(TraceHop {
                    hop,
                    host: found.as_str().to_string(),
                    rtt_ms,
                })
            }
        }
    }
}

fn parse_unix(raw: &str) -> Vec<TraceHop> {
    let mut hops = vec![];
    // first line is the "traceroute to ..." banner
    for line in raw.lines().skip(1) {
        if line.trim().is_empty() {
            continue;
        }
        match parse_unix_line(line) {
            Some(hop) => hops.push(hop),
            None => trace!("Skipping unparseable traceroute line: {}", line),
        }
    }
    hops
}

fn parse_unix_line(line: &str) -> Option<TraceHop> {
    let mut tokens = line.split_whitespace();
    let hop = tokens.next()?.parse().ok()?;
    let second = tokens.next()?;
    if second == "*" {
        return Some(TraceHop::no_reply(hop));
    }
    let rtt_ms = match tokens.next() {
        None => None,
        // a present-but-malformed RTT invalidates the whole line
        Some(token) => Some(token.parse().ok()?),
    };
    Some(TraceHop {
        hop,
        host: second.to_string(),
        rtt_ms,
    })
}
