//! Periodic background reconciliation.

use std::sync::{Arc, Weak};
use std::time::Duration;

use tokio::sync::watch;

use super::{ConfigProvider, ProviderState};

impl ConfigProvider {
    /// Starts the background reload task.
    ///
    /// Does nothing if the reload interval is zero or a task is already
    /// running. The task holds only a weak reference and exits once the
    /// provider is dropped or [`stop_reloading`](Self::stop_reloading) is
    /// called. Must be called from within a tokio runtime.
    pub fn start_reloading(self: &Arc<Self>) {
        if self.reload_interval.is_zero() {
            tracing::debug!("Reload interval is zero, background reloading disabled");
            return;
        }

        let mut signal = self.stop_signal.lock();
        if signal.is_some() {
            return;
        }
        let (tx, rx) = watch::channel(false);
        *signal = Some(tx);
        drop(signal);

        *self.state.lock() = ProviderState::Ready;
        tracing::info!("Reloading configuration every {:?}", self.reload_interval);
        tokio::spawn(reload_loop(Arc::downgrade(self), self.reload_interval, rx));
    }

    /// Stops background reloading. Idempotent.
    ///
    /// A reconciliation already in progress completes; no further one is
    /// scheduled. Explicit [`reload`](Self::reload) calls keep working.
    pub fn stop_reloading(&self) {
        if let Some(tx) = self.stop_signal.lock().take() {
            // receiver may already be gone if the task exited
            let _ = tx.send(true);
            tracing::info!("Background reloading stopped");
        }
        *self.state.lock() = ProviderState::Stopped;
    }

    /// Returns true if the background reload task is running.
    #[must_use]
    pub fn is_reloading(&self) -> bool {
        self.stop_signal.lock().is_some()
    }
}

async fn reload_loop(
    provider: Weak<ConfigProvider>,
    interval: Duration,
    mut stop: watch::Receiver<bool>,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    // first tick completes immediately; the initial load already happened
    ticker.tick().await;

    loop {
        tokio::select! {
            biased;

            changed = stop.changed() => {
                if changed.is_err() || *stop.borrow() {
                    break;
                }
            }

            _ = ticker.tick() => {
                let Some(provider) = provider.upgrade() else {
                    break;
                };
                let loaded = provider.reload().await;
                tracing::debug!("Scheduled reload decoded {loaded} documents");
            }
        }
    }

    tracing::debug!("Reload loop exited");
}
