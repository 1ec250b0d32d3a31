//! Host hooks for taking control of open clients.

/// Client-management seam of the host runtime.
///
/// The controller signals through this trait when a freshly installed
/// generation should activate without a waiting grace period, and when the
/// active controller should take over every open client immediately.
pub trait ClientControl: Send + Sync {
    /// Skip the waiting grace period between install and activation.
    fn skip_waiting(&self);

    /// Take responsibility for all currently open clients.
    fn claim(&self);
}

/// Default implementation that records the signals in the log.
#[derive(Debug, Default)]
pub struct LoggingClients;

impl ClientControl for LoggingClients {
    fn skip_waiting(&self) {
        tracing::info!("skipping waiting grace period");
    }

    fn claim(&self) {
        tracing::info!("claiming all open clients");
    }
}
