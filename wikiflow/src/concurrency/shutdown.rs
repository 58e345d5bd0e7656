//! Broadcast shutdown signaling for pipeline workers.
//!
//! Abstracts tokio's watch channels into a shutdown-specific pair: one
//! transmitter owned by the pipeline, any number of receivers handed to
//! workers. Signaling is one-way and sticky; once shutdown is requested it
//! stays requested for the lifetime of the channel.

use tokio::sync::watch;

/// Transmitter side of the shutdown channel.
///
/// Owned by the pipeline's lifecycle object. Cloning is cheap and all clones
/// signal the same channel.
#[derive(Debug, Clone)]
pub struct ShutdownTx(watch::Sender<bool>);

/// Receiver side of the shutdown channel.
///
/// Workers hold one receiver each and either check [`ShutdownRx::is_shutdown`]
/// between units of work or await [`ShutdownRx::signaled`] inside a
/// `tokio::select!`.
#[derive(Debug, Clone)]
pub struct ShutdownRx(watch::Receiver<bool>);

/// Creates a new shutdown channel.
///
/// The channel starts in the "not shut down" state. The receiver returned here
/// can be dropped freely; more receivers can be created via
/// [`ShutdownTx::subscribe`].
pub fn create_shutdown_channel() -> (ShutdownTx, ShutdownRx) {
    let (tx, rx) = watch::channel(false);
    (ShutdownTx(tx), ShutdownRx(rx))
}

impl ShutdownTx {
    /// Signals shutdown to all current and future receivers.
    ///
    /// Fails only when no receiver exists anymore, which means every worker has
    /// already terminated.
    pub fn shutdown(&self) -> Result<(), watch::error::SendError<bool>> {
        self.0.send(true)
    }

    /// Creates a new receiver subscribed to this channel.
    pub fn subscribe(&self) -> ShutdownRx {
        ShutdownRx(self.0.subscribe())
    }
}

impl ShutdownRx {
    /// Returns whether shutdown has been requested.
    pub fn is_shutdown(&self) -> bool {
        *self.0.borrow()
    }

    /// Waits until shutdown is requested.
    ///
    /// Also resolves when the transmitter is dropped, since a channel without a
    /// transmitter can never be signaled and workers must not wait forever.
    pub async fn signaled(&mut self) {
        let _ = self.0.wait_for(|shutdown| *shutdown).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn shutdown_is_visible_to_all_receivers() {
        let (tx, rx) = create_shutdown_channel();
        let mut subscribed = tx.subscribe();

        assert!(!rx.is_shutdown());
        assert!(!subscribed.is_shutdown());

        tx.shutdown().unwrap();

        assert!(rx.is_shutdown());
        subscribed.signaled().await;
    }

    #[tokio::test]
    async fn signaled_resolves_when_transmitter_is_dropped() {
        let (tx, mut rx) = create_shutdown_channel();
        drop(tx);

        rx.signaled().await;
    }
}
