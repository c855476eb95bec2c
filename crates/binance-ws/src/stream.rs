//! Stream reader task
//!
//! A [`StreamHandle`] owns a spawned task that reads from a connected
//! [`Transport`] and forwards every text frame unparsed. The task ends on
//! server close, read error, idle timeout or cancellation, and in every case
//! closes the transport and sends one final `Disconnected` event.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::events::{DisconnectReason, StreamEvent};
use crate::transport::{Transport, TransportError, DEFAULT_CONNECT_TIMEOUT};

/// Options for opening a stream
#[derive(Debug, Clone)]
pub struct StreamOptions {
    /// Time allowed for the WebSocket handshake
    pub connect_timeout: Duration,
    /// End the stream if no message arrives for this long
    pub idle_timeout: Option<Duration>,
}

impl Default for StreamOptions {
    fn default() -> Self {
        Self {
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            idle_timeout: None,
        }
    }
}

impl StreamOptions {
    /// Create with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set handshake timeout
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Detect silent streams
    pub fn with_idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = Some(timeout);
        self
    }
}

/// Handle to a running stream
///
/// Dropping the handle cancels the reader; use [`cancel`](Self::cancel) to
/// also wait until the socket is closed.
pub struct StreamHandle {
    endpoint: String,
    events: mpsc::UnboundedReceiver<StreamEvent>,
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl StreamHandle {
    /// Start reading from an already connected transport
    ///
    /// `guard` is held by the reader task and dropped when it exits.
    pub fn spawn<T, G>(transport: T, guard: G, options: &StreamOptions) -> Self
    where
        T: Transport + 'static,
        G: Send + 'static,
    {
        let endpoint = transport.endpoint().to_string();
        let (tx, events) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();

        let task = tokio::spawn(read_loop(
            transport,
            tx,
            cancel.clone(),
            options.idle_timeout,
            guard,
        ));

        Self {
            endpoint,
            events,
            cancel,
            task: Some(task),
        }
    }

    /// URL this stream reads from
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Next event, or `None` once the reader is gone and all events are read
    pub async fn recv(&mut self) -> Option<StreamEvent> {
        self.events.recv().await
    }

    /// Check if the reader task has exited
    pub fn is_finished(&self) -> bool {
        self.task.as_ref().map_or(true, |t| t.is_finished())
    }

    /// Stop the reader, close the socket and wait for the task to exit
    pub async fn cancel(mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!(endpoint = %self.endpoint, error = %e, "Stream reader task failed");
            }
        }
    }
}

impl Drop for StreamHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

impl std::fmt::Debug for StreamHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamHandle")
            .field("endpoint", &self.endpoint)
            .field("finished", &self.is_finished())
            .finish()
    }
}

enum Received {
    Frame(Option<String>),
    Failed(TransportError),
    Idle,
    Cancelled,
}

async fn next_frame<T: Transport>(transport: &mut T, idle: Option<Duration>) -> Received {
    let result = match idle {
        Some(limit) => match timeout(limit, transport.recv()).await {
            Ok(result) => result,
            Err(_) => return Received::Idle,
        },
        None => transport.recv().await,
    };
    match result {
        Ok(frame) => Received::Frame(frame),
        Err(e) => Received::Failed(e),
    }
}

async fn read_loop<T, G>(
    mut transport: T,
    tx: mpsc::UnboundedSender<StreamEvent>,
    cancel: CancellationToken,
    idle: Option<Duration>,
    guard: G,
) where
    T: Transport,
{
    debug!(endpoint = transport.endpoint(), "Stream reader started");

    let reason = loop {
        let received = tokio::select! {
            biased;
            _ = cancel.cancelled() => Received::Cancelled,
            received = next_frame(&mut transport, idle) => received,
        };

        match received {
            Received::Frame(Some(text)) => {
                if tx.send(StreamEvent::Message(text)).is_err() {
                    break DisconnectReason::Shutdown;
                }
            }
            Received::Frame(None) => break DisconnectReason::ServerClosed,
            Received::Failed(e) => break DisconnectReason::NetworkError(e.to_string()),
            Received::Idle => break DisconnectReason::IdleTimeout,
            Received::Cancelled => break DisconnectReason::Shutdown,
        }
    };

    if let Err(e) = transport.close().await {
        debug!(error = %e, "Error closing stream transport");
    }
    drop(guard);
    info!(endpoint = transport.endpoint(), %reason, "Stream ended");

    let _ = tx.send(StreamEvent::Disconnected(reason));
}
