use futures::StreamExt;
use tracing::{debug, info, instrument, warn};

use crate::{
    find_player_json, metrics, ConnectorError, Extraction, PlayerData, PlayerQuery,
    QueryConnector, SearchState, Utf8Decoder,
};

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error(transparent)]
    Connector(#[from] ConnectorError),
    #[error("No player data received")]
    NoPlayerData,
    #[error("Failed to parse player data")]
    ParseFailed,
}

/// Error plus whatever text had arrived when it happened.
struct Interrupted {
    stream_text: String,
    error: SearchError,
}

/// Runs a player query and turns its streamed response into search states.
pub struct StreamConsumer<C> {
    connector: C,
}

impl<C: QueryConnector> StreamConsumer<C> {
    pub fn new(connector: C) -> Self {
        Self { connector }
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    /// Streams the response for `query`, calling `on_update` with every state.
    ///
    /// The first update is always an empty `loading` state, sent before the
    /// request goes out. Each decoded chunk produces another `loading` update
    /// with the whole buffer so far. The last update is the terminal state,
    /// which is also returned.
    #[instrument(skip_all, fields(player = %query))]
    pub async fn search<F>(&self, query: &PlayerQuery, mut on_update: F) -> SearchState
    where
        F: FnMut(&SearchState),
    {
        metrics::record_query();
        on_update(&SearchState::loading(""));

        let terminal = match self.read_stream(query, &mut on_update).await {
            Ok(stream_text) => match find_player_json(&stream_text) {
                Extraction::Parsed(value) => {
                    info!(buffer_len = stream_text.len(), "player data received");
                    SearchState::success(stream_text, PlayerData::from_value(value))
                }
                Extraction::Unparseable => fail(stream_text, SearchError::ParseFailed),
                Extraction::NoCandidate => fail(stream_text, SearchError::NoPlayerData),
            },
            Err(Interrupted { stream_text, error }) => fail(stream_text, error),
        };

        on_update(&terminal);
        terminal
    }

    async fn read_stream<F>(
        &self,
        query: &PlayerQuery,
        on_update: &mut F,
    ) -> Result<String, Interrupted>
    where
        F: FnMut(&SearchState),
    {
        let mut chunks = self.connector.open(query).await.map_err(|e| Interrupted {
            stream_text: String::new(),
            error: e.into(),
        })?;

        let mut decoder = Utf8Decoder::new();
        let mut state = SearchState::loading("");

        while let Some(chunk) = chunks.next().await {
            let chunk = match chunk {
                Ok(chunk) => chunk,
                Err(e) => {
                    if let ConnectorError::Body(detail) = &e {
                        warn!(%detail, "response body failed mid-stream");
                    }
                    state.append_stream_text(&decoder.finish());
                    return Err(Interrupted {
                        stream_text: state.into_stream_text(),
                        error: e.into(),
                    });
                }
            };

            metrics::record_chunk(chunk.len());
            let text = decoder.decode(&chunk);
            if text.is_empty() {
                continue;
            }
            state.append_stream_text(&text);
            debug!(
                chunk_bytes = chunk.len(),
                buffer_len = state.stream_text().len(),
                "stream chunk received"
            );
            on_update(&state);
        }

        let tail = decoder.finish();
        if !tail.is_empty() {
            state.append_stream_text(&tail);
            on_update(&state);
        }

        let stream_text = state.into_stream_text();
        metrics::set_buffer_size(stream_text.len());
        Ok(stream_text)
    }
}

fn fail(stream_text: String, error: SearchError) -> SearchState {
    metrics::record_failure();
    warn!(%error, buffer_len = stream_text.len(), "player search failed");
    SearchState::failure(stream_text, error.to_string())
}
