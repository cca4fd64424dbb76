//! Consumer visibility
//!
//! A backgrounded consumer does not need fresh status. While hidden the
//! poller idles on a fixed slow cadence and issues no requests.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::watch;

/// Whether the consumer of a session is currently in the foreground
#[async_trait]
pub trait Visibility: Send + Sync {
    fn is_visible(&self) -> bool;

    /// Resolves once the consumer is visible
    ///
    /// Implementations that cannot observe changes never resolve, leaving
    /// the hidden-interval timer as the only wake-up.
    async fn visible(&self) {
        std::future::pending::<()>().await
    }
}

/// Visibility for consumers without a foreground notion (services, CLIs)
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysVisible;

#[async_trait]
impl Visibility for AlwaysVisible {
    fn is_visible(&self) -> bool {
        true
    }

    async fn visible(&self) {}
}

/// Externally driven visibility state
///
/// Clones share one flag. Flipping it to visible wakes any session waiting
/// out a hidden interval.
#[derive(Debug, Clone)]
pub struct VisibilityFlag {
    tx: Arc<watch::Sender<bool>>,
}

impl VisibilityFlag {
    pub fn new(visible: bool) -> Self {
        let (tx, _) = watch::channel(visible);
        Self { tx: Arc::new(tx) }
    }

    pub fn set_visible(&self) {
        self.set(true);
    }

    pub fn set_hidden(&self) {
        self.set(false);
    }

    pub fn set(&self, visible: bool) {
        self.tx.send_if_modified(|current| {
            let changed = *current != visible;
            *current = visible;
            changed
        });
    }
}

impl Default for VisibilityFlag {
    fn default() -> Self {
        Self::new(true)
    }
}

#[async_trait]
impl Visibility for VisibilityFlag {
    fn is_visible(&self) -> bool {
        *self.tx.borrow()
    }

    async fn visible(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives as long as `self`, so this cannot see a closed channel
        let _ = rx.wait_for(|visible| *visible).await;
    }
}
