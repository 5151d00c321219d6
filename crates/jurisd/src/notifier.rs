//! Notification collaborator - fire-and-forget delivery of lifecycle events.
//!
//! Actual delivery channels (push, email) live outside this service; the
//! daemon only hands events over. `LogNotifier` is the default sink,
//! `ChannelNotifier` lets embedders and tests observe the stream.

use tokio::sync::mpsc;
use tracing::info;

use juris_common::LifecycleEvent;

/// Accepts lifecycle events for delivery. Must never block or fail the
/// transition that emitted the event.
pub trait Notifier: Send + Sync {
    fn notify(&self, event: LifecycleEvent);
}

/// Default sink: structured log line per event
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, event: LifecycleEvent) {
        info!(
            recipient = %event.recipient_id,
            case = %event.case_id,
            kind = ?event.kind,
            "{}",
            event.message
        );
    }
}

/// Forwards events into an unbounded channel
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<LifecycleEvent>,
}

impl ChannelNotifier {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<LifecycleEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, event: LifecycleEvent) {
        // Receiver may be gone; dropping the event is fine for fire-and-forget
        let _ = self.tx.send(event);
    }
}
