use crate::config::LauncherSettings;
use crate::error::{Error, Result};
use crate::process::Prober;
use std::time::Duration;
use tokio::time::{self, Instant};

/// Bounded wait for a freshly spawned server to accept connections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadinessCheck {
    /// Total time the server gets
    pub timeout: Duration,
    /// Pause between two probes
    pub poll_interval: Duration,
}

impl ReadinessCheck {
    /// Check with the given timeout and poll interval.
    pub fn new(timeout: Duration, poll_interval: Duration) -> Self {
        Self {
            timeout,
            poll_interval,
        }
    }

    /// Probe `host:port` until it is connectable or the timeout runs out.
    ///
    /// Returns how long it took on success. Succeeds as soon as the prober
    /// reports the address connectable and never after the deadline; a probe
    /// still in flight at the deadline is abandoned.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ReadinessTimeout`] when the deadline passes without a
    /// successful probe.
    pub async fn wait(&self, prober: &dyn Prober, host: &str, port: u16) -> Result<Duration> {
        let started = Instant::now();
        let deadline = started + self.timeout;
        let mut attempts = 0u32;

        loop {
            let now = Instant::now();
            if now >= deadline {
                break;
            }

            attempts += 1;
            match time::timeout(deadline - now, prober.is_connectable(host, port)).await {
                Ok(true) => {
                    let elapsed = started.elapsed();
                    tracing::debug!(attempts, ?elapsed, "Server is connectable");
                    return Ok(elapsed);
                }
                Ok(false) => {}
                Err(_) => break,
            }

            let now = Instant::now();
            if now >= deadline {
                break;
            }
            time::sleep(self.poll_interval.min(deadline - now)).await;
        }

        tracing::debug!(attempts, timeout = ?self.timeout, "Gave up waiting for server");
        Err(Error::ReadinessTimeout {
            host: host.to_string(),
            port,
            timeout: self.timeout,
        })
    }
}

impl From<&LauncherSettings> for ReadinessCheck {
    fn from(settings: &LauncherSettings) -> Self {
        Self::new(settings.timeout, settings.poll_interval)
    }
}

impl Default for ReadinessCheck {
    fn default() -> Self {
        Self::new(
            Duration::from_secs(crate::config::settings::DEFAULT_TIMEOUT_SECS),
            crate::config::settings::DEFAULT_POLL_INTERVAL,
        )
    }
}
