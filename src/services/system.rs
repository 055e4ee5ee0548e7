//! System sleep invocation

use std::io;

use futures::future::BoxFuture;
use thiserror::Error;
use tokio::process::Command;
use tracing::info;

/// Errors from asking the operating system to sleep.
#[derive(Debug, Error)]
pub enum SleepError {
    /// No sleep utility is known for this platform
    #[error("system sleep is not supported on this platform")]
    Unsupported,

    /// The sleep utility could not be launched
    #[error("failed to run {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    /// The sleep utility ran but refused the request
    #[error("{command} exited with code {code:?}: {stderr}")]
    CommandFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },
}

/// The single external action that suspends the host machine.
///
/// The binary wires in [`SystemSleep`]; tests substitute a recording double.
pub trait SleepTrigger: Send + Sync + 'static {
    /// Ask the operating system to suspend the machine. Resolves once the
    /// request has been accepted or refused.
    fn trigger(&self) -> BoxFuture<'static, Result<(), SleepError>>;
}

/// Production trigger backed by the platform sleep command.
#[derive(Debug, Default)]
pub struct SystemSleep;

impl SleepTrigger for SystemSleep {
    fn trigger(&self) -> BoxFuture<'static, Result<(), SleepError>> {
        Box::pin(execute_system_sleep())
    }
}

/// The platform's sleep utility and a harmless way to probe for it.
struct PlatformSleep {
    program: &'static str,
    args: &'static [&'static str],
    probe_args: &'static [&'static str],
}

#[cfg(target_os = "linux")]
const PLATFORM_SLEEP: Option<PlatformSleep> = Some(PlatformSleep {
    program: "systemctl",
    args: &["suspend"],
    probe_args: &["--version"],
});

#[cfg(target_os = "macos")]
const PLATFORM_SLEEP: Option<PlatformSleep> = Some(PlatformSleep {
    program: "pmset",
    args: &["sleepnow"],
    probe_args: &["-g"],
});

#[cfg(target_os = "windows")]
const PLATFORM_SLEEP: Option<PlatformSleep> = Some(PlatformSleep {
    program: "rundll32",
    args: &["powrprof.dll,SetSuspendState", "0,1,0"],
    probe_args: &[],
});

#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
const PLATFORM_SLEEP: Option<PlatformSleep> = None;

/// Ask the operating system to suspend the machine.
pub async fn execute_system_sleep() -> Result<(), SleepError> {
    let platform = PLATFORM_SLEEP.ok_or(SleepError::Unsupported)?;

    info!("Requesting system sleep via {}", platform.program);

    let output = Command::new(platform.program)
        .args(platform.args)
        .output()
        .await
        .map_err(|source| SleepError::Spawn {
            command: platform.program.to_string(),
            source,
        })?;

    if !output.status.success() {
        return Err(SleepError::CommandFailed {
            command: platform.program.to_string(),
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    info!("System sleep command accepted");
    Ok(())
}

/// Check that the platform sleep utility is invocable, without suspending.
pub async fn check_sleep_support() -> Result<(), SleepError> {
    let platform = PLATFORM_SLEEP.ok_or(SleepError::Unsupported)?;

    Command::new(platform.program)
        .args(platform.probe_args)
        .output()
        .await
        .map_err(|source| SleepError::Spawn {
            command: platform.program.to_string(),
            source,
        })?;

    info!("{} is available", platform.program);
    Ok(())
}
