use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::AbortHandle;

use super::Lifecycle;

/// How long a success notice stays up.
pub const NOTICE_TTL: Duration = Duration::from_secs(3);

/// A success message that clears itself after [`NOTICE_TTL`].
///
/// The dismissal timer is registered with the owning page's [`Lifecycle`], so
/// it never outlives the page.
pub struct TransientNotice {
    slot: Arc<watch::Sender<Option<String>>>,
    timer: Option<AbortHandle>,
    ttl: Duration,
}

impl Default for TransientNotice {
    fn default() -> Self {
        Self::new()
    }
}

impl TransientNotice {
    pub fn new() -> Self {
        Self::with_ttl(NOTICE_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        let (slot, _) = watch::channel(None);
        Self {
            slot: Arc::new(slot),
            timer: None,
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Replaces the current message and restarts the dismissal timer.
    /// Must be called from within a tokio runtime.
    pub fn show(&mut self, message: impl Into<String>, lifecycle: &mut Lifecycle) {
        self.cancel_timer();
        self.slot.send_replace(Some(message.into()));

        let slot = Arc::clone(&self.slot);
        let ttl = self.ttl;
        let task = tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            slot.send_replace(None);
        });
        self.timer = Some(task.abort_handle());
        lifecycle.register_task(task.abort_handle());
    }

    pub fn dismiss(&mut self) {
        self.cancel_timer();
        self.slot.send_replace(None);
    }

    pub fn current(&self) -> Option<String> {
        self.slot.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<String>> {
        self.slot.subscribe()
    }

    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}
