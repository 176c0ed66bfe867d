use serde::Serialize;

use crate::PlayerData;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchStatus {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

/// Everything the view needs to render one search.
///
/// `success` always carries player data and `error` always carries a message;
/// the constructors are the only way to build a state.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchState {
    status: SearchStatus,
    stream_text: String,
    player_data: Option<PlayerData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl SearchState {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn loading(stream_text: impl Into<String>) -> Self {
        Self {
            status: SearchStatus::Loading,
            stream_text: stream_text.into(),
            ..Self::default()
        }
    }

    pub fn success(stream_text: impl Into<String>, player_data: PlayerData) -> Self {
        Self {
            status: SearchStatus::Success,
            stream_text: stream_text.into(),
            player_data: Some(player_data),
            error: None,
        }
    }

    pub fn failure(stream_text: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status: SearchStatus::Error,
            stream_text: stream_text.into(),
            player_data: None,
            error: Some(message.into()),
        }
    }

    pub fn status(&self) -> SearchStatus {
        self.status
    }

    pub fn stream_text(&self) -> &str {
        &self.stream_text
    }

    pub fn player_data(&self) -> Option<&PlayerData> {
        self.player_data.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.status == SearchStatus::Loading
    }

    /// `success` or `error`.
    pub fn is_terminal(&self) -> bool {
        matches!(self.status, SearchStatus::Success | SearchStatus::Error)
    }

    pub(crate) fn append_stream_text(&mut self, text: &str) {
        debug_assert!(self.is_loading());
        self.stream_text.push_str(text);
    }

    pub(crate) fn into_stream_text(self) -> String {
        self.stream_text
    }
}
