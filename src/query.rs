use std::fmt;

use validator::Validate;

/// Name of the request parameter carrying the player's full name.
pub const PLAYER_NAME_PARAM: &str = "player_full_name";

/// Upper bound on the trimmed name, in characters.
pub const MAX_NAME_CHARS: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("Player name must not be empty")]
    Empty,
    #[error("Player name is longer than {max} characters")]
    TooLong { max: usize },
}

/// A validated search query: the trimmed, non-empty full name of a player.
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct PlayerQuery {
    #[validate(length(min = 1, max = 200))]
    full_name: String,
}

impl PlayerQuery {
    pub fn new(raw: &str) -> Result<Self, QueryError> {
        let query = Self {
            full_name: raw.trim().to_string(),
        };
        if query.full_name.is_empty() {
            return Err(QueryError::Empty);
        }
        query
            .validate()
            .map_err(|_| QueryError::TooLong { max: MAX_NAME_CHARS })?;
        Ok(query)
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }
}

impl fmt::Display for PlayerQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_name)
    }
}
