//! Session keepalive.
//!
//! Once the auth gate has verified the user, a background task re-runs the
//! identity check on a fixed interval so the server-side session stays warm.
//! The loop lives for the rest of the process unless [`SessionKeepalive::stop`]
//! is called; dropping the gate does not stop it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::auth::IdentityVerifier;

pub struct SessionKeepalive {
    verifier: Arc<dyn IdentityVerifier>,
    interval: Duration,
    task: Mutex<Option<JoinHandle<()>>>,
    refreshes: Arc<AtomicU64>,
}

impl SessionKeepalive {
    pub fn new(verifier: Arc<dyn IdentityVerifier>, interval: Duration) -> Self {
        Self {
            verifier,
            interval,
            task: Mutex::new(None),
            refreshes: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Start the refresh loop. A loop that is already running is left alone.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&self) {
        let mut task = self.task.lock().unwrap_or_else(|e| e.into_inner());
        if task.as_ref().is_some_and(|t| !t.is_finished()) {
            return;
        }

        let verifier = Arc::clone(&self.verifier);
        let refreshes = Arc::clone(&self.refreshes);
        let period = self.interval;
        debug!(interval_secs = period.as_secs(), "starting session keepalive");

        *task = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            // The first tick completes immediately; the gate just verified.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                match verifier.verify().await {
                    Ok(_) => {
                        refreshes.fetch_add(1, Ordering::Relaxed);
                        debug!("session refreshed");
                    }
                    Err(e) => warn!(error = %e, "session refresh failed"),
                }
            }
        }));
    }

    /// Stop the refresh loop if it is running.
    pub fn stop(&self) {
        let mut task = self.task.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(t) = task.take() {
            t.abort();
            debug!("stopped session keepalive");
        }
    }

    pub fn is_running(&self) -> bool {
        let task = self.task.lock().unwrap_or_else(|e| e.into_inner());
        task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Successful refreshes since creation.
    pub fn refreshes(&self) -> u64 {
        self.refreshes.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Identity;
    use anyhow::Result;
    use async_trait::async_trait;

    struct AlwaysOk;

    #[async_trait]
    impl IdentityVerifier for AlwaysOk {
        async fn verify(&self) -> Result<Identity> {
            Ok(Identity::anonymous())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn refreshes_on_interval() {
        let keepalive = SessionKeepalive::new(Arc::new(AlwaysOk), Duration::from_secs(60));
        keepalive.start();
        assert!(keepalive.is_running());

        tokio::time::sleep(Duration::from_secs(185)).await;
        assert_eq!(keepalive.refreshes(), 3);

        keepalive.stop();
        tokio::task::yield_now().await;
        assert!(!keepalive.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn start_is_idempotent() {
        let keepalive = SessionKeepalive::new(Arc::new(AlwaysOk), Duration::from_secs(10));
        keepalive.start();
        keepalive.start();
        tokio::time::sleep(Duration::from_secs(25)).await;
        assert_eq!(keepalive.refreshes(), 2);
        keepalive.stop();
    }

    #[tokio::test]
    async fn stop_without_start_is_noop() {
        let keepalive = SessionKeepalive::new(Arc::new(AlwaysOk), Duration::from_secs(10));
        keepalive.stop();
        assert!(!keepalive.is_running());
    }
}
