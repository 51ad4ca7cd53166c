// ── Process discovery ──
//
// Thin boundary over Win32_Process: "is the monitored process running",
// plus a bounded wait for callers that start before the monitor does.
// The wait is the one place in this workspace that accepts a timeout —
// it returns a sentinel on expiry instead of blocking forever.

use std::thread;
use std::time::{Duration, Instant};

use tracing::debug;

use ohmview_wmi::{ConnectionOverrides, Connector, Namespace, Result, Selector, Transport};

use crate::win32;

/// Process-discovery boundary over a cimv2 namespace.
pub struct ProcessWatch<T: Transport> {
    namespace: Namespace<T>,
}

impl<T: Transport> ProcessWatch<T> {
    pub fn connect<C>(connector: &C, overrides: ConnectionOverrides) -> Result<Self>
    where
        C: Connector<Transport = T>,
    {
        let namespace = Namespace::<T>::builder()
            .defaults(win32::cimv2_overrides())
            .options(overrides)
            .register(win32::PROCESS)
            .connect(connector)?;
        Ok(Self { namespace })
    }

    /// Whether a process named `name` is currently running.
    ///
    /// Zero matches is an answer here, not an error.
    pub fn is_running(&self, name: &str) -> Result<bool> {
        match self
            .namespace
            .instances_of("Process", &Selector::new().with("Name", name))
        {
            Ok(found) => Ok(found.len() > 0),
            Err(error) if error.is_not_found() => Ok(false),
            Err(error) => Err(error),
        }
    }

    /// Block until a process named `name` starts, polling every
    /// `poll_interval`, for at most `timeout`.
    ///
    /// Returns `Ok(true)` once seen, `Ok(false)` on expiry. Transport
    /// failures propagate — whether to keep waiting is the caller's call.
    pub fn wait_for(&self, name: &str, timeout: Duration, poll_interval: Duration) -> Result<bool> {
        let deadline = Instant::now() + timeout;
        loop {
            if self.is_running(name)? {
                return Ok(true);
            }
            let now = Instant::now();
            if now >= deadline {
                debug!(process = name, ?timeout, "wait for process expired");
                return Ok(false);
            }
            thread::sleep(poll_interval.min(deadline - now));
        }
    }

    pub fn namespace(&self) -> &Namespace<T> {
        &self.namespace
    }
}
