//! Stream-based source.
//!
//! Reads newline-delimited JSON samples from any async reader (a TCP
//! connection in practice) on a background tokio task and hands them to the
//! UI thread through a bounded channel.

use std::sync::{Arc, Mutex};

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc;

use super::HealthDataSource;
use crate::data::HealthSample;

/// Samples buffered between the reader task and the UI thread.
const CHANNEL_CAPACITY: usize = 64;

type ErrorSlot = Arc<Mutex<Option<String>>>;

fn set_error(slot: &ErrorSlot, message: Option<String>) {
    if let Ok(mut guard) = slot.lock() {
        *guard = message;
    }
}

/// A source fed by a background reader task.
///
/// ```
/// use std::io::Cursor;
/// use vitality_monitor::StreamSource;
///
/// # tokio_test::block_on(async {
/// let data = b"{\"label\":\"10:00\",\"value\":45}\n";
/// let source = StreamSource::spawn(Cursor::new(data.to_vec()), "example");
/// # });
/// ```
#[derive(Debug)]
pub struct StreamSource {
    receiver: mpsc::Receiver<HealthSample>,
    description: String,
    last_error: ErrorSlot,
}

impl StreamSource {
    /// Spawn the reader task. Must be called from within a tokio runtime.
    pub fn spawn<R>(reader: R, description: &str) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        let last_error: ErrorSlot = Arc::new(Mutex::new(None));
        let error_handle = last_error.clone();

        tokio::spawn(async move {
            let mut reader = BufReader::new(reader);
            let mut line = String::new();

            loop {
                line.clear();
                match reader.read_line(&mut line).await {
                    Ok(0) => {
                        set_error(&error_handle, Some("Connection closed".to_string()));
                        break;
                    }
                    Ok(_) => {
                        let trimmed = line.trim();
                        if trimmed.is_empty() {
                            continue;
                        }
                        match serde_json::from_str::<HealthSample>(trimmed) {
                            Ok(sample) => {
                                set_error(&error_handle, None);
                                if tx.send(sample).await.is_err() {
                                    // Receiver dropped: the dashboard unsubscribed.
                                    break;
                                }
                            }
                            Err(e) => {
                                tracing::warn!(error = %e, "skipping malformed sample line");
                                set_error(&error_handle, Some(format!("Parse error: {}", e)));
                            }
                        }
                    }
                    Err(e) => {
                        set_error(&error_handle, Some(format!("Read error: {}", e)));
                        break;
                    }
                }
            }
        });

        Self {
            receiver: rx,
            description: format!("stream: {}", description),
            last_error,
        }
    }
}

impl HealthDataSource for StreamSource {
    fn poll(&mut self) -> Option<HealthSample> {
        match self.receiver.try_recv() {
            Ok(sample) => Some(sample),
            Err(mpsc::error::TryRecvError::Empty) => None,
            Err(mpsc::error::TryRecvError::Disconnected) => None,
        }
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<String> {
        self.last_error.lock().ok().and_then(|guard| guard.clone())
    }
}
