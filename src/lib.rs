//! # Know Your Player
//!
//! Client for a player query service that streams free text and ends with a
//! JSON record describing a baseball player. The response is consumed chunk by
//! chunk, every chunk is surfaced as a `loading` [`SearchState`], and once the
//! stream closes the embedded JSON object is extracted and the search ends in
//! `success` or `error`.
//!
//! ## Example
//!
//! ```no_run
//! use know_your_player::{PlayerQuery, ScriptedConnector, SearchStatus, StreamConsumer};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Simulate a service that talks a little before sending the record.
//!     let connector = ScriptedConnector::new([
//!         "Gathering information about Gary Carter...\n\n",
//!         r#"{"history":"Hall of Famer","simple_information":{"team":"Mets"},"statistics":{"hr":324},"games":[]}"#,
//!     ]);
//!     let consumer = StreamConsumer::new(connector);
//!
//!     let query = PlayerQuery::new("Gary Carter")?;
//!     let state = consumer
//!         .search(&query, |update| {
//!             println!("{:?}: {} bytes", update.status(), update.stream_text().len())
//!         })
//!         .await;
//!
//!     assert_eq!(state.status(), SearchStatus::Success);
//!     println!("{:?}", state.player_data().and_then(|data| data.history()));
//!     Ok(())
//! }
//! ```

#[cfg(test)]
mod tests;

mod query;
pub use query::*;

mod settings;
pub use settings::*;

mod connectors;
pub use connectors::*;

mod reader;
pub use reader::*;

mod decoder;
pub use decoder::*;

mod extract_json;
pub use extract_json::*;

mod player;
pub use player::*;

mod state;
pub use state::*;

mod consumer;
pub use consumer::*;

mod session;
pub use session::*;

pub mod render;

pub mod metrics;
