//! AlertDispatcher
//!
//! Single shared FIFO between every symbol worker and the notification
//! sink. Producers enqueue without blocking on an unbounded channel; one
//! consumer task drains at a fixed cadence so the external channel's rate
//! limit is respected no matter how many symbols fire at once.
//!
//! The queue never drops: if producers outpace the drain rate the queue
//! depth (and alert latency) grows. That is the accepted backpressure
//! policy under alert storms.
//!
//! Shutdown: dropping every `AlertDispatcher` handle closes the channel;
//! the consumer drains what is already buffered at its cadence, then
//! exits.

use std::sync::Arc;
use std::time::Duration;

use engine::types::PendingAlert;
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::Notifier;

/// Default drain cadence, just over one alert per second.
pub const DEFAULT_CADENCE: Duration = Duration::from_millis(1_100);

/// Cloneable producer handle over the shared alert queue.
#[derive(Clone)]
pub struct AlertDispatcher {
    tx: UnboundedSender<PendingAlert>,
}

impl AlertDispatcher {
    /// Spawn the drain task and return the producer handle.
    pub fn start(notifier: Arc<dyn Notifier>, cadence: Duration) -> (Self, JoinHandle<()>) {
        let (tx, mut rx) = mpsc::unbounded_channel::<PendingAlert>();

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(cadence);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            // FIFO drain, one alert per tick. Delivery failures are logged
            // and never requeued: at-most-once, best-effort.
            while let Some(alert) = rx.recv().await {
                ticker.tick().await;

                match notifier.notify(&alert.text).await {
                    Ok(()) => {
                        tracing::info!(alert_id = %alert.id, "alert delivered");
                    }
                    Err(e) => {
                        tracing::warn!(alert_id = %alert.id, error = %e, "alert delivery failed");
                    }
                }
            }

            tracing::info!("alert queue closed, dispatcher stopping");
        });

        (Self { tx }, handle)
    }

    /// Non-blocking enqueue. An error only means the dispatcher is gone.
    pub fn enqueue(&self, alert: PendingAlert) {
        if self.tx.send(alert).is_err() {
            tracing::warn!("enqueue after dispatcher shutdown, alert discarded");
        }
    }

    /// Raw sender for producers that hold the queue end directly.
    pub fn sender(&self) -> UnboundedSender<PendingAlert> {
        self.tx.clone()
    }
}
