//! Per-call request options and caller-driven cancellation.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::HeaderMap;
use tokio::sync::watch;

use crate::config::{overlay_headers, parse_header};
use crate::error::ConfigError;

/// Overrides applied to a single request.
///
/// Headers are merged over the client's defaults (these win on collision)
/// and the timeout, if set, replaces the client's default for this call.
///
/// ## Examples
///
/// ```rust
/// use std::time::Duration;
/// use xplat_api::RequestOptions;
///
/// let options = RequestOptions::new()
///     .timeout(Duration::from_millis(500))
///     .header("X-Request-Id", "abc-123")?;
/// # Ok::<(), xplat_api::ConfigError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub(crate) headers: HeaderMap,
    pub(crate) timeout: Option<Duration>,
    pub(crate) cancellation: Option<CancellationHandle>,
}

impl RequestOptions {
    /// Creates empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a header for this call only.
    ///
    /// ## Errors
    ///
    /// Returns an error if the header name or value is invalid.
    pub fn header(
        mut self,
        name: impl AsRef<str>,
        value: impl AsRef<str>,
    ) -> Result<Self, ConfigError> {
        let (name, value) = parse_header(name.as_ref(), value.as_ref())?;
        self.headers.insert(name, value);
        Ok(self)
    }

    /// Overlays a prepared header map for this call only.
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        overlay_headers(&mut self.headers, &headers);
        self
    }

    /// Sets the timeout for this call only. A zero duration falls back to
    /// the client's default.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Attaches a cancellation handle; cancelling it aborts the request.
    pub fn cancellation(mut self, handle: CancellationHandle) -> Self {
        self.cancellation = Some(handle);
        self
    }
}

/// A cloneable handle the caller can use to abort in-flight requests.
///
/// All clones share one signal; once cancelled, it stays cancelled and every
/// request carrying it resolves to a `Request cancelled` envelope.
#[derive(Debug, Clone)]
pub struct CancellationHandle {
    signal: Arc<watch::Sender<bool>>,
}

impl CancellationHandle {
    /// Creates a handle in the not-cancelled state.
    pub fn new() -> Self {
        let (signal, _) = watch::channel(false);
        Self {
            signal: Arc::new(signal),
        }
    }

    /// Signals cancellation to every request holding this handle.
    pub fn cancel(&self) {
        self.signal.send_replace(true);
    }

    /// Returns `true` once [`cancel`](Self::cancel) has been called.
    pub fn is_cancelled(&self) -> bool {
        *self.signal.borrow()
    }

    /// Resolves when the handle is cancelled.
    pub async fn cancelled(&self) {
        let mut receiver = self.signal.subscribe();
        // The sender lives as long as `self`, so the wait cannot end early.
        let _ = receiver.wait_for(|cancelled| *cancelled).await;
    }
}

impl Default for CancellationHandle {
    fn default() -> Self {
        Self::new()
    }
}
