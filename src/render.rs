//! Plain-text views of a [`SearchState`].

use std::io::{self, Write};

use crate::{display_value, humanize_key, Field, PlayerData, SearchState, SearchStatus};

/// Games listed under "Notable Games" before the rest are summarised.
pub const NOTABLE_GAMES_SHOWN: usize = 5;

#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    /// Append the raw response text to a successful result.
    pub show_raw: bool,
}

pub fn render_state<W: Write>(
    state: &SearchState,
    options: &RenderOptions,
    out: &mut W,
) -> io::Result<()> {
    match state.status() {
        SearchStatus::Idle => {
            writeln!(out, "Ready to Search")?;
            writeln!(out, "Enter a baseball player's name to get started")
        }
        SearchStatus::Loading => {
            writeln!(out, "Searching...")?;
            if !state.stream_text().is_empty() {
                writeln!(out, "Live Updates:")?;
                write_block(out, state.stream_text())?;
            }
            Ok(())
        }
        SearchStatus::Error => {
            writeln!(out, "Search Failed")?;
            writeln!(out, "{}", state.error().unwrap_or("An unexpected error occurred"))?;
            if !state.stream_text().is_empty() {
                writeln!(out)?;
                writeln!(out, "Partial Response:")?;
                write_block(out, state.stream_text())?;
            }
            Ok(())
        }
        SearchStatus::Success => match state.player_data() {
            Some(data) => render_player(data, state.stream_text(), options, out),
            None => {
                writeln!(out, "No Results")?;
                writeln!(out, "No player data available")
            }
        },
    }
}

fn render_player<W: Write>(
    data: &PlayerData,
    stream_text: &str,
    options: &RenderOptions,
    out: &mut W,
) -> io::Result<()> {
    if let Some(reported) = data.reported_error() {
        heading(out, "Service Error")?;
        writeln!(out, "{}", reported.message.unwrap_or("The service could not answer this query"))?;
        if let Some(details) = reported.details {
            writeln!(out, "Details: {}", details)?;
        }
    }

    if let Some(info) = data.simple_information() {
        heading(out, "Baseball Legend")?;
        write_fields(out, &info, "  ")?;
    }

    if let Some(history) = data.history().filter(|h| !h.is_empty()) {
        heading(out, "Career Summary")?;
        writeln!(out, "{}", history)?;
    }

    if let Some(stats) = data.statistics() {
        heading(out, "Career Statistics")?;
        write_fields(out, &stats, "  ")?;
    }

    let games = data.games();
    if !games.is_empty() {
        heading(out, &format!("Notable Games ({})", games.len()))?;
        for (index, game) in games.iter().take(NOTABLE_GAMES_SHOWN).enumerate() {
            writeln!(out, "  Game {}", index + 1)?;
            write_fields(out, game, "    ")?;
        }
        if games.len() > NOTABLE_GAMES_SHOWN {
            writeln!(out, "  And {} more games...", games.len() - NOTABLE_GAMES_SHOWN)?;
        }
    }

    if options.show_raw && !stream_text.is_empty() {
        heading(out, "Raw Response")?;
        write_block(out, stream_text)?;
    }
    Ok(())
}

fn heading<W: Write>(out: &mut W, title: &str) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", title)?;
    writeln!(out, "{}", "-".repeat(title.chars().count()))
}

fn write_fields<W: Write>(out: &mut W, fields: &[Field<'_>], indent: &str) -> io::Result<()> {
    for (key, value) in fields {
        writeln!(out, "{}{}: {}", indent, humanize_key(key), display_value(value))?;
    }
    Ok(())
}

fn write_block<W: Write>(out: &mut W, text: &str) -> io::Result<()> {
    out.write_all(text.as_bytes())?;
    if !text.ends_with('\n') {
        writeln!(out)?;
    }
    Ok(())
}

/// Streams a search to a terminal: while loading only the newly arrived text
/// is written, then the terminal state is rendered in full.
#[derive(Debug, Default)]
pub struct LiveRenderer {
    options: RenderOptions,
    printed: usize,
    streaming: bool,
}

impl LiveRenderer {
    pub fn new(options: RenderOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn update<W: Write>(&mut self, state: &SearchState, out: &mut W) -> io::Result<()> {
        if state.is_loading() {
            if !self.streaming {
                writeln!(out, "Searching...")?;
                self.streaming = true;
                self.printed = 0;
            }
            let text = state.stream_text();
            let fresh = text.get(self.printed..).unwrap_or(text);
            out.write_all(fresh.as_bytes())?;
            self.printed = text.len();
            return out.flush();
        }

        if self.streaming && self.printed > 0 {
            writeln!(out)?;
        }
        self.streaming = false;
        self.printed = 0;
        render_state(state, &self.options, out)?;
        out.flush()
    }
}
