use itertools::Itertools;
use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::PathBuf,
};
use thiserror::Error;

use clap::Args;

use crate::host_check::is_valid_host;

#[derive(Args, Clone)]
#[group(id = "allowlist")]
pub struct Params {
    /// Flatfile to read the set of hosts this service may probe from.
    /// One IPv4 address or domain name per line
    /// # at start of line to comment out the whole line
    /// No headers or similar
    #[arg(
        long,
        default_value = "allowed-hosts.txt",
        env = "ALLOWLIST_FILE"
    )]
    pub allowlist_file: PathBuf,

    /// Whether to treat absence of the allow-list file as a fatal error (the default).
    /// Otherwise, the built-in default set is used.
    #[arg(long, default_value = "true", env = "FAIL_ON_MISSING_ALLOWLIST")]
    pub fail_on_missing_allowlist: bool,
}

/// Hosts we are permitted to probe when none are configured explicitly.
pub const DEFAULT_ALLOWED_HOSTS: [&str; 8] = [
    "1.0.0.1",
    "1.1.1.1",
    "8.8.4.4",
    "8.8.8.8",
    "cloudflare.com",
    "github.com",
    "google.com",
    "stackoverflow.com",
];

/// Immutable set of probe-able hosts, loaded once at startup and shared
/// read-only between requests.
#[derive(Debug)]
pub struct HostAllowlist {
    entries: Vec<String>,
}

impl HostAllowlist {
    pub fn new(entries: Vec<String>) -> Self {
        return Self { entries };
    }

    pub fn builtin_default() -> Self {
        Self::new(DEFAULT_ALLOWED_HOSTS.iter().map(|it| it.to_string()).collect())
    }

    pub fn is_allowed(&self, query: &str) -> bool {
        self.entries.iter().any(|entry| entry == query)
    }

    pub fn sorted_hosts(&self) -> Vec<String> {
        self.entries.iter().cloned().sorted().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Error, Debug)]
pub enum AllowlistReadError {
    #[error("allow-list file does not exist: `{0}`")]
    NoSuchFile(PathBuf),

    #[error("failed to open allow-list file `{path}`")]
    FailedOpen {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to read a line from allow-list file")]
    FailedRead { source: std::io::Error },

    #[error("invalid host entry encountered: `{line}`")]
    HostSyntax { line: String },
}

pub type AllowlistReadResult = Result<HostAllowlist, AllowlistReadError>;

pub fn read(params: Params) -> AllowlistReadResult {
    use AllowlistReadError as E;

    match read_from(params.allowlist_file) {
        e @ Err(E::NoSuchFile(_)) => {
            if params.fail_on_missing_allowlist {
                e
            } else {
                Ok(HostAllowlist::builtin_default())
            }
        }
        any => any,
    }
}

fn read_from(path: PathBuf) -> AllowlistReadResult {
    use AllowlistReadError as E;

    if !path.is_file() {
        return Err(AllowlistReadError::NoSuchFile(path));
    }

    let mut entries = vec![];
    let file = File::open(path.clone()).map_err(|source| E::FailedOpen { path, source })?;
    let lines = BufReader::new(file)
        .lines()
        .filter_ok(|line| {
            let line = line.trim();
            !line.starts_with("#") && !line.is_empty()
        });

    for line_res in lines {
        match line_res {
            Err(source) => return Err(E::FailedRead { source }),
            Ok(line) => {
                let line = line.trim().to_string();
                if !is_valid_host(&line) {
                    return Err(E::HostSyntax { line });
                }
                entries.push(line);
            }
        }
    }

    Ok(HostAllowlist::new(entries))
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use assertor::assert_that;
    use assertor::BooleanAssertion;
    use assertor::ResultAssertion;

    use super::read_from;
    use super::HostAllowlist;

    #[test]
    fn example_allowlist_loads() {
        // given
        let path = PathBuf::from("allowed-hosts-example.txt");
        // when
        let res = read_from(path);
        // then
        assert_that!(res).is_ok();
        let res = res.unwrap();

        assert_that!(res.is_allowed("8.8.8.8")).is_true();
        assert_that!(res.is_allowed("google.com")).is_true();
        assert_that!(res.is_allowed("evil.example.org")).is_false();
        // commented-out lines must not count
        assert_that!(res.is_allowed("9.9.9.9")).is_false();
    }

    #[test]
    fn builtin_default_has_public_resolvers() {
        let list = HostAllowlist::builtin_default();

        assert_that!(list.is_allowed("8.8.8.8")).is_true();
        assert_that!(list.is_allowed("1.1.1.1")).is_true();
        assert_that!(list.is_allowed("198.51.100.17")).is_false();
    }

    #[test]
    fn sorted_hosts_is_sorted() {
        // given
        let list = HostAllowlist::new(vec![
            "google.com".to_string(),
            "1.1.1.1".to_string(),
            "cloudflare.com".to_string(),
        ]);
        // when
        let sorted = list.sorted_hosts();
        // then
        assert_eq!(sorted, vec!["1.1.1.1", "cloudflare.com", "google.com"]);
        assert_eq!(list.len(), 3);
    }
}
