use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::domain::payment::PaymentStatus;
use crate::domain::ports::SharedPaymentGateway;

/// Observable watcher lifecycle.
///
/// `Pending` is the only non-terminal state: a confirmed tick moves to
/// `Confirmed` (firing the callback), teardown moves to `Stopped` (never
/// firing it).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatcherState {
    Pending,
    Confirmed,
    Stopped,
}

/// Polls an order's payment status until it settles or the watcher is torn
/// down.
///
/// PIX (and boleto) confirmations arrive out-of-band, so the watcher fetches
/// the status on a fixed interval. Failed or inconclusive ticks keep polling;
/// only a `CONFIRMED` status terminates with the completion callback, which
/// runs at most once. Cancellation is cooperative: the token is consulted
/// before each fetch and again before acting on its result, so a response that
/// resolves after `stop()` cannot fire the callback.
pub struct PaymentWatcher {
    cancel: watch::Sender<bool>,
    state_tx: watch::Sender<WatcherState>,
    state_rx: watch::Receiver<WatcherState>,
    handle: JoinHandle<()>,
}

impl PaymentWatcher {
    /// Starts polling `order_id` every `interval`.
    pub fn spawn<F>(
        gateway: SharedPaymentGateway,
        order_id: String,
        interval: Duration,
        on_confirmed: F,
    ) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        let (cancel_tx, mut cancel_rx) = watch::channel(false);
        let (state_tx, state_rx) = watch::channel(WatcherState::Pending);
        let task_state = state_tx.clone();

        let handle = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = tokio::time::sleep(interval) => {}
                    _ = cancel_rx.changed() => {
                        mark_stopped(&task_state);
                        return;
                    }
                }

                let status = tokio::select! {
                    status = gateway.payment_status(&order_id) => status,
                    _ = cancel_rx.changed() => {
                        mark_stopped(&task_state);
                        return;
                    }
                };

                match status {
                    Ok(PaymentStatus::Confirmed) => {
                        // Loses against a concurrent stop(): the state moved
                        // off Pending first, so the callback stays unfired.
                        let confirmed = task_state.send_if_modified(|state| {
                            if *state == WatcherState::Pending {
                                *state = WatcherState::Confirmed;
                                true
                            } else {
                                false
                            }
                        });
                        if confirmed {
                            tracing::debug!(%order_id, "payment confirmed");
                            on_confirmed();
                        }
                        return;
                    }
                    Ok(status) => {
                        tracing::debug!(%order_id, ?status, "payment not settled yet");
                    }
                    Err(err) => {
                        // Transient failures are inconclusive, not fatal.
                        tracing::debug!(%order_id, %err, "status poll failed, retrying");
                    }
                }
            }
        });

        Self {
            cancel: cancel_tx,
            state_tx,
            state_rx,
            handle,
        }
    }

    pub fn state(&self) -> WatcherState {
        *self.state_rx.borrow()
    }

    /// Tears the watcher down. Idempotent; a no-op once confirmed.
    pub fn stop(&self) {
        let _ = self.cancel.send(true);
        mark_stopped(&self.state_tx);
    }

    /// Waits for the watcher to leave `Pending` and returns the terminal
    /// state.
    pub async fn wait_terminal(&mut self) -> WatcherState {
        let terminal = self
            .state_rx
            .wait_for(|state| *state != WatcherState::Pending)
            .await
            .map(|state| *state);
        match terminal {
            Ok(state) => state,
            Err(_) => *self.state_rx.borrow(),
        }
    }
}

impl Drop for PaymentWatcher {
    fn drop(&mut self) {
        self.stop();
        self.handle.abort();
    }
}

fn mark_stopped(state: &watch::Sender<WatcherState>) {
    state.send_if_modified(|state| {
        if *state == WatcherState::Pending {
            *state = WatcherState::Stopped;
            true
        } else {
            false
        }
    });
}
