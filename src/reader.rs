use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use crate::{ChunkStream, ConnectorError, PlayerQuery, QueryConnector};

/// Serves one query from chunks pushed through a channel.
///
/// The stream ends when every sender is dropped.
pub struct ChannelConnector {
    rx: Mutex<Option<mpsc::Receiver<Vec<u8>>>>,
}

impl ChannelConnector {
    pub fn new(rx: mpsc::Receiver<Vec<u8>>) -> Self {
        Self {
            rx: Mutex::new(Some(rx)),
        }
    }

    pub fn channel(capacity: usize) -> (mpsc::Sender<Vec<u8>>, Self) {
        let (tx, rx) = mpsc::channel(capacity);
        (tx, Self::new(rx))
    }
}

#[async_trait]
impl QueryConnector for ChannelConnector {
    async fn open(&self, _query: &PlayerQuery) -> Result<ChunkStream, ConnectorError> {
        let rx = self
            .rx
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take()
            .ok_or(ConnectorError::Exhausted)?;
        Ok(ReceiverStream::new(rx)
            .map(|chunk| Ok(Bytes::from(chunk)))
            .boxed())
    }
}

/// Replays the same response for every query.
#[derive(Debug, Clone, Default)]
pub struct ScriptedConnector {
    chunks: Vec<Bytes>,
    delay: Option<Duration>,
    status: Option<u16>,
    fail_mid_stream: bool,
}

impl ScriptedConnector {
    pub fn new<I, B>(chunks: I) -> Self
    where
        I: IntoIterator<Item = B>,
        B: Into<Bytes>,
    {
        Self {
            chunks: chunks.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Pause before each chunk.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Answer with this HTTP status; anything outside 2xx fails before the body.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Break the body after the last scripted chunk.
    pub fn failing_mid_stream(mut self) -> Self {
        self.fail_mid_stream = true;
        self
    }
}

#[async_trait]
impl QueryConnector for ScriptedConnector {
    async fn open(&self, _query: &PlayerQuery) -> Result<ChunkStream, ConnectorError> {
        if let Some(status) = self.status.filter(|s| !(200..300).contains(s)) {
            return Err(ConnectorError::Status(status));
        }

        let chunks = self.chunks.clone();
        let delay = self.delay;
        let fail = self.fail_mid_stream;
        let stream = async_stream::stream! {
            for chunk in chunks {
                if let Some(delay) = delay {
                    tokio::time::sleep(delay).await;
                }
                yield Ok(chunk);
            }
            if fail {
                yield Err(ConnectorError::Body("connection reset by peer".into()));
            }
        };
        Ok(stream.boxed())
    }
}
