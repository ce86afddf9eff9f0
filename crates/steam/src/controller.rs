//! Steam process controller: shutdown, start, restart.
//!
//! Platform-specific process handling lives in `controller_linux.rs` and
//! `controller_windows.rs` behind [`SystemProcess`]. The [`Controller`]
//! adds the bounded polling around it.

use std::future::Future;
use std::time::Duration;

use crate::SteamError;

/// How long `shutdown` waits for the process to go away.
pub const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(10);

/// Max time to wait for the Steam process to appear after start.
pub const START_TIMEOUT: Duration = Duration::from_secs(30);

/// Poll interval when waiting for the process to exit or appear.
pub const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Pause after a force kill before starting again.
pub const SETTLE_DELAY: Duration = Duration::from_secs(2);

/// Outcome of [`Controller::restart`], with a message for the user.
#[derive(Debug, Clone)]
pub struct RestartResult {
    pub success: bool,
    pub message: String,
}

impl RestartResult {
    fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Timing knobs for [`Controller`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerTimeouts {
    pub shutdown: Duration,
    pub start: Duration,
    pub poll_interval: Duration,
    pub settle: Duration,
}

impl Default for ControllerTimeouts {
    fn default() -> Self {
        Self {
            shutdown: SHUTDOWN_TIMEOUT,
            start: START_TIMEOUT,
            poll_interval: POLL_INTERVAL,
            settle: SETTLE_DELAY,
        }
    }
}

/// Operations on the Steam client process.
pub trait SteamProcess {
    /// Whether a Steam client process exists.
    fn is_running(&self) -> impl Future<Output = bool> + Send;

    /// Returns `true` when a session manager restarts Steam by itself
    /// (gamescope on Linux).
    fn is_gaming_mode(&self) -> bool;

    /// Starts Steam detached from this process.
    fn start(&self) -> impl Future<Output = Result<(), SteamError>> + Send;

    /// Asks Steam to exit.
    fn shutdown_command(&self) -> impl Future<Output = Result<(), SteamError>> + Send;

    /// Kills Steam.
    fn force_kill(&self) -> impl Future<Output = Result<(), SteamError>> + Send;
}

/// The real Steam process on this machine.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemProcess;

impl SteamProcess for SystemProcess {
    async fn is_running(&self) -> bool {
        platform::is_running().await
    }

    fn is_gaming_mode(&self) -> bool {
        platform::is_gaming_mode()
    }

    async fn start(&self) -> Result<(), SteamError> {
        platform::start().await
    }

    async fn shutdown_command(&self) -> Result<(), SteamError> {
        platform::shutdown_command().await
    }

    async fn force_kill(&self) -> Result<(), SteamError> {
        platform::force_kill().await
    }
}

/// Drives a [`SteamProcess`] through shutdown, start and restart.
pub struct Controller<P = SystemProcess> {
    process: P,
    timeouts: ControllerTimeouts,
}

impl Controller<SystemProcess> {
    pub fn new() -> Self {
        Self::with_process(SystemProcess, ControllerTimeouts::default())
    }
}

impl Default for Controller<SystemProcess> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: SteamProcess> Controller<P> {
    pub fn with_process(process: P, timeouts: ControllerTimeouts) -> Self {
        Self { process, timeouts }
    }

    pub fn timeouts(&self) -> ControllerTimeouts {
        self.timeouts
    }

    pub async fn is_running(&self) -> bool {
        self.process.is_running().await
    }

    /// Gracefully shuts down Steam. Polls for process exit up to the
    /// shutdown timeout.
    pub async fn shutdown(&self) -> Result<(), SteamError> {
        if !self.is_running().await {
            tracing::debug!("steam not running, nothing to shut down");
            return Ok(());
        }

        self.process.shutdown_command().await?;

        if self.poll_until(false, self.timeouts.shutdown).await {
            tracing::info!("steam exited");
            return Ok(());
        }

        Err(SteamError::Timeout(format!(
            "Steam still running after {}s",
            self.timeouts.shutdown.as_secs()
        )))
    }

    /// Polls until Steam is running or the start timeout elapses.
    pub async fn wait_for_start(&self) -> Result<(), SteamError> {
        if self.poll_until(true, self.timeouts.start).await {
            return Ok(());
        }
        Err(SteamError::Timeout(format!(
            "timeout waiting for Steam to start (waited {}s)",
            self.timeouts.start.as_secs()
        )))
    }

    /// Stops Steam (killing it if it ignores the request), starts it again
    /// unless gamescope does that, and waits for the new process.
    pub async fn restart(&self) -> RestartResult {
        match self.cycle().await {
            Ok(()) => RestartResult::ok("Steam restarted successfully"),
            Err(message) => RestartResult::failed(message),
        }
    }

    async fn cycle(&self) -> Result<(), String> {
        if let Err(e) = self.shutdown().await {
            tracing::warn!("graceful shutdown failed ({e}), killing steam");
            self.process
                .force_kill()
                .await
                .map_err(|e| format!("failed to force kill Steam: {e}"))?;
            tokio::time::sleep(self.timeouts.settle).await;
        }

        if self.process.is_gaming_mode() {
            tracing::info!("gaming mode, leaving the relaunch to the session");
        } else {
            self.process
                .start()
                .await
                .map_err(|e| format!("failed to start Steam: {e}"))?;
        }

        self.wait_for_start()
            .await
            .map_err(|e| format!("Steam did not come back: {e}"))
    }

    /// Polls `is_running` until it equals `want`. Returns `false` on timeout.
    async fn poll_until(&self, want: bool, timeout: Duration) -> bool {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            if self.is_running().await == want {
                return true;
            }
            if tokio::time::Instant::now() >= deadline {
                return false;
            }
            tokio::time::sleep(self.timeouts.poll_interval).await;
        }
    }
}

#[cfg(target_os = "linux")]
#[path = "controller_linux.rs"]
mod platform;

#[cfg(target_os = "windows")]
#[path = "controller_windows.rs"]
mod platform;

#[cfg(not(any(target_os = "linux", target_os = "windows")))]
mod platform {
    use crate::SteamError;

    pub async fn is_running() -> bool {
        false
    }
    pub fn is_gaming_mode() -> bool {
        false
    }
    pub async fn start() -> Result<(), SteamError> {
        Err(SteamError::NotFound)
    }
    pub async fn shutdown_command() -> Result<(), SteamError> {
        Err(SteamError::NotFound)
    }
    pub async fn force_kill() -> Result<(), SteamError> {
        Err(SteamError::NotFound)
    }
}
