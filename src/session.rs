use tracing::{debug, instrument};

use crate::{PlayerQuery, QueryConnector, QueryError, SearchState, StreamConsumer};

/// Top-level controller: owns the name input and the current search state.
///
/// Views read the state through [`SearchSession::state`] or the update
/// callback passed to [`SearchSession::submit`]; they never mutate it.
/// `submit` borrows the session mutably, so only one query can be in flight.
pub struct SearchSession<C> {
    consumer: StreamConsumer<C>,
    input: String,
    state: SearchState,
}

impl<C: QueryConnector> SearchSession<C> {
    pub fn new(consumer: StreamConsumer<C>) -> Self {
        Self {
            consumer,
            input: String::new(),
            state: SearchState::idle(),
        }
    }

    pub fn consumer(&self) -> &StreamConsumer<C> {
        &self.consumer
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// False while a search is loading or when the input is blank.
    pub fn can_submit(&self) -> bool {
        !self.state.is_loading() && !self.input.trim().is_empty()
    }

    /// Searches for the current input, replacing any previous result.
    ///
    /// Invalid input leaves the state untouched.
    #[instrument(skip_all)]
    pub async fn submit<F>(&mut self, on_update: F) -> Result<&SearchState, QueryError>
    where
        F: FnMut(&SearchState),
    {
        let query = PlayerQuery::new(&self.input)?;
        debug!(player = %query, "submitting search");
        self.state = SearchState::loading("");
        self.state = self.consumer.search(&query, on_update).await;
        Ok(&self.state)
    }

    pub async fn search<F>(&mut self, name: &str, on_update: F) -> Result<&SearchState, QueryError>
    where
        F: FnMut(&SearchState),
    {
        self.set_input(name);
        self.submit(on_update).await
    }

    /// Back to idle from any state; the input is emptied too.
    pub fn clear(&mut self) {
        self.input.clear();
        self.state = SearchState::idle();
    }
}
