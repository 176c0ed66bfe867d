use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;

use crate::PlayerQuery;

/// Body of one query response, chunk by chunk.
pub type ChunkStream = BoxStream<'static, Result<Bytes, ConnectorError>>;

#[derive(Debug, thiserror::Error)]
pub enum ConnectorError {
    #[error("HTTP error! status: {0}")]
    Status(u16),
    #[cfg(feature = "http")]
    #[error("{0}")]
    Http(#[from] reqwest::Error),
    /// The body failed after the response started; the detail is kept for logs.
    #[error("Failed to read response stream")]
    Body(String),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Connector already used for a query")]
    Exhausted,
}

/// Opens the streamed response for a player query.
#[async_trait]
pub trait QueryConnector: Send + Sync {
    async fn open(&self, query: &PlayerQuery) -> Result<ChunkStream, ConnectorError>;
}

#[async_trait]
impl<T: QueryConnector + ?Sized> QueryConnector for Box<T> {
    async fn open(&self, query: &PlayerQuery) -> Result<ChunkStream, ConnectorError> {
        (**self).open(query).await
    }
}

#[async_trait]
impl<T: QueryConnector + ?Sized> QueryConnector for std::sync::Arc<T> {
    async fn open(&self, query: &PlayerQuery) -> Result<ChunkStream, ConnectorError> {
        (**self).open(query).await
    }
}

#[cfg(feature = "http")]
pub use http::HttpConnector;

#[cfg(feature = "http")]
mod http {
    use async_trait::async_trait;
    use futures::{StreamExt, TryStreamExt};
    use reqwest::{header::ACCEPT, Client, Url};
    use tracing::{debug, instrument, warn};

    use super::{ChunkStream, ConnectorError, QueryConnector};
    use crate::{ClientConfig, PlayerQuery, PLAYER_NAME_PARAM};

    /// Streams `GET {base_url}{query_path}?player_full_name=...` responses.
    ///
    /// No timeout is set; a query waits for the service to close the stream.
    #[derive(Debug, Clone)]
    pub struct HttpConnector {
        client: Client,
        endpoint: Url,
        accept: String,
    }

    impl HttpConnector {
        pub fn new(config: &ClientConfig) -> Result<Self, ConnectorError> {
            Self::with_client(Client::new(), config)
        }

        pub fn with_client(client: Client, config: &ClientConfig) -> Result<Self, ConnectorError> {
            let base = Url::parse(&config.base_url)
                .map_err(|e| ConnectorError::Config(format!("{}: {}", config.base_url, e)))?;
            let endpoint = base
                .join(&config.query_path)
                .map_err(|e| ConnectorError::Config(format!("{}: {}", config.query_path, e)))?;

            Ok(Self {
                client,
                endpoint,
                accept: config.accept.clone(),
            })
        }

        pub fn request_url(&self, query: &PlayerQuery) -> Url {
            let mut url = self.endpoint.clone();
            url.query_pairs_mut()
                .append_pair(PLAYER_NAME_PARAM, query.full_name());
            url
        }
    }

    #[async_trait]
    impl QueryConnector for HttpConnector {
        #[instrument(skip_all, fields(player = %query))]
        async fn open(&self, query: &PlayerQuery) -> Result<ChunkStream, ConnectorError> {
            let url = self.request_url(query);
            debug!(%url, "opening player query stream");

            let response = self
                .client
                .get(url)
                .header(ACCEPT, self.accept.as_str())
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                warn!(status = status.as_u16(), "player query rejected");
                return Err(ConnectorError::Status(status.as_u16()));
            }

            Ok(response
                .bytes_stream()
                .map_err(|e| ConnectorError::Body(e.to_string()))
                .boxed())
        }
    }
}
