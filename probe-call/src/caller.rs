use std::process::Stdio;
use std::time::Duration;

use log::Level::Debug;
use log::{debug, log_enabled, warn};
use tokio::process::Command;
use tokio::time::timeout;

/// Hard wall-clock ceilings, independent of the tools' own per-packet
/// timeouts. A tool that is still running when its ceiling expires is
/// killed and reported as timed out.
pub const PING_CEILING: Duration = Duration::from_secs(30);
pub const TRACEROUTE_CEILING: Duration = Duration::from_secs(60);

/// Outcome of one external tool invocation. Failure modes are data here,
/// not errors: unreachable targets, missing binaries and ceiling breaches
/// are all expected business outcomes.
#[derive(Debug)]
pub struct Execution {
    pub stdout: String,
    pub success: bool,
    pub timed_out: bool,
}

impl Execution {
    fn spawn_failure() -> Self {
        Execution {
            stdout: String::new(),
            success: false,
            timed_out: false,
        }
    }

    fn ceiling_hit() -> Self {
        Execution {
            stdout: String::new(),
            success: false,
            timed_out: true,
        }
    }
}

/// Runs `program` with `args`, capturing stdout, bounded by `ceiling`.
/// Never returns an error; anything that goes wrong is reflected in the
/// returned [Execution].
pub async fn run_with_ceiling(program: &str, args: &[String], ceiling: Duration) -> Execution {
    if log_enabled!(Debug) {
        debug!("Calling {} with arguments: {}", program, args.join(" "));
    }

    let child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn();

    let child = match child {
        Ok(child) => child,
        Err(e) => {
            warn!("Failed to spawn {}: {}", program, e);
            return Execution::spawn_failure();
        }
    };

    match timeout(ceiling, child.wait_with_output()).await {
        Err(_elapsed) => {
            // dropping the future kills the child (kill_on_drop)
            warn!("{} exceeded its {:?} ceiling, killing it", program, ceiling);
            Execution::ceiling_hit()
        }
        Ok(Err(e)) => {
            warn!("Failed to wait for {} to exit: {}", program, e);
            Execution::spawn_failure()
        }
        Ok(Ok(output)) => {
            if !output.status.success() {
                debug!("{} exited with non-successful status {:?}", program, output.status);
            }
            Execution {
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                success: output.status.success(),
                timed_out: false,
            }
        }
    }
}
