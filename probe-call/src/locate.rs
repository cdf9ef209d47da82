use std::path::Path;
use std::process::{Command, Stdio};

use log::debug;

use crate::flavor::Flavor;

/// Well-known places for the traceroute binary on Unix-likes, probed in
/// order when a plain PATH lookup fails.
const UNIX_FALLBACK_PATHS: [&str; 3] = [
    "/usr/bin/traceroute",
    "/usr/sbin/traceroute",
    "/bin/traceroute",
];

/// Finds the traceroute binary to invoke. A miss is not fatal here: we fall
/// back to the bare name and let the eventual spawn failure degrade into a
/// normal probe failure.
pub fn locate_traceroute(flavor: Flavor) -> String {
    match flavor {
        // tracert ships with the OS and is always on the PATH
        Flavor::Windows => "tracert".to_string(),
        Flavor::Unix => locate_unix_traceroute(),
    }
}

fn locate_unix_traceroute() -> String {
    if path_lookup_succeeds("traceroute") {
        debug!("traceroute found on the PATH");
        return "traceroute".to_string();
    }
    for path in UNIX_FALLBACK_PATHS {
        if is_executable_file(Path::new(path)) {
            debug!("Using traceroute binary at {}", path);
            return path.to_string();
        }
    }
    debug!("traceroute not found anywhere obvious, using the bare name anyways");
    "traceroute".to_string()
}

fn path_lookup_succeeds(name: &str) -> bool {
    Command::new("which")
        .arg(name)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

fn is_executable_file(path: &Path) -> bool {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        path.metadata()
            .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
            .unwrap_or(false)
    }
    #[cfg(not(unix))]
    {
        path.is_file()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn windows_uses_builtin_name() {
        assert_eq!(locate_traceroute(Flavor::Windows), "tracert");
    }

    #[test]
    fn unix_locate_always_yields_something_runnable() {
        // whatever the environment looks like, we must get a non-empty
        // program name back rather than an error
        let binary = locate_traceroute(Flavor::Unix);

        assert!(!binary.is_empty());
        assert!(binary.contains("traceroute"));
    }

    #[cfg(unix)]
    #[test]
    fn executable_check_rejects_plain_files() {
        assert!(!is_executable_file(Path::new("/etc/passwd")));
        assert!(!is_executable_file(Path::new("/definitely/not/there")));
    }
}
