//! Search bar widget — text input at the bottom of the screen plus the
//! floating result list above it.
//!
//! # Editing
//!
//! - `Char(c)` inserts at the cursor.
//! - `Backspace` deletes the character before the cursor.
//! - `Nav(Left)` / `Nav(Right)` move the cursor.
//! - `Nav(Up)` / `Nav(Down)` move the highlighted result.
//!
//! The widget never runs the matcher itself: the app shell re-arms a
//! debounce deadline on every edit and writes `results` back when the quiet
//! period elapses, so a fast typist never triggers a search per keystroke.

use crate::event::{AppEvent, Direction};
use crate::theme::Theme;
use gaz_core::SearchEntry;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction as LayoutDir, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Clear, List, ListItem, ListState, Paragraph, StatefulWidget, Widget},
};
use tracing;

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct SearchBarState {
    /// The query typed by the user.
    pub query: String,
    /// Byte offset of the cursor within `query`.
    pub cursor: usize,
    /// Matches for the last query the debounce let through. Owned clones —
    /// small strings plus a handle — so the widget carries no index lifetime.
    pub results: Vec<SearchEntry>,
    /// Index of the highlighted result.
    pub selected: usize,
    /// True once the matcher has run for the current query text.
    pub ran: bool,
}

impl SearchBarState {
    /// Handle a key event from the app shell. Returns `true` when the query
    /// text changed (the app shell re-arms the debounce on that signal).
    pub fn handle(&mut self, event: &AppEvent) -> bool {
        match event {
            AppEvent::Char(c) => {
                self.query.insert(self.cursor, *c);
                self.cursor += c.len_utf8();
                self.ran = false;
                tracing::debug!(query = %self.query, cursor = self.cursor, "search: char inserted");
                true
            }
            AppEvent::Backspace => {
                if self.cursor > 0 {
                    // Walk back one char boundary
                    let prev = self.query[..self.cursor]
                        .char_indices()
                        .last()
                        .map(|(i, _)| i)
                        .unwrap_or(0);
                    self.query.remove(prev);
                    self.cursor = prev;
                    self.ran = false;
                    tracing::debug!(query = %self.query, cursor = self.cursor, "search: backspace");
                    true
                } else {
                    false
                }
            }
            AppEvent::Nav(Direction::Left) => {
                if self.cursor > 0 {
                    self.cursor = self.query[..self.cursor]
                        .char_indices()
                        .last()
                        .map(|(i, _)| i)
                        .unwrap_or(0);
                }
                false
            }
            AppEvent::Nav(Direction::Right) => {
                if self.cursor < self.query.len() {
                    let next = self.query[self.cursor..]
                        .char_indices()
                        .nth(1)
                        .map(|(i, _)| self.cursor + i)
                        .unwrap_or(self.query.len());
                    self.cursor = next;
                }
                false
            }
            AppEvent::Nav(Direction::Up) => {
                self.selected = self.selected.saturating_sub(1);
                false
            }
            AppEvent::Nav(Direction::Down) => {
                if self.selected + 1 < self.results.len() {
                    self.selected += 1;
                }
                false
            }
            _ => false,
        }
    }

    /// Store fresh matcher output and reset the highlight.
    pub fn set_results(&mut self, results: Vec<SearchEntry>) {
        tracing::debug!(query = %self.query, count = results.len(), "search: results updated");
        self.results = results;
        self.selected = 0;
        self.ran = true;
    }

    /// The highlighted result, if any.
    pub fn selected_entry(&self) -> Option<&SearchEntry> {
        self.results.get(self.selected)
    }

    pub fn clear(&mut self) {
        self.query.clear();
        self.cursor = 0;
        self.results.clear();
        self.selected = 0;
        self.ran = false;
    }
}

// ---------------------------------------------------------------------------
// Input widget
// ---------------------------------------------------------------------------

pub struct SearchBar<'a> {
    state: &'a SearchBarState,
    focused: bool,
    theme: &'a Theme,
}

impl<'a> SearchBar<'a> {
    pub fn new(state: &'a SearchBarState, focused: bool, theme: &'a Theme) -> Self {
        Self { state, focused, theme }
    }

    /// Absolute terminal position of the text cursor within this widget's
    /// rendered area. Pass to `frame.set_cursor_position()` after rendering.
    pub fn cursor_position(&self, area: Rect) -> (u16, u16) {
        // The block adds 1-cell borders; text starts at (area.x+1, area.y+1).
        let col = self.state.query[..self.state.cursor].chars().count() as u16;
        let x = (area.x + 1 + col).min(area.right().saturating_sub(1));
        let y = area.y + 1;
        (x, y)
    }
}

impl Widget for SearchBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.focused {
            self.theme.border_focused
        } else {
            self.theme.border_unfocused
        };

        let block = Block::bordered()
            .title("Search")
            .border_style(border_style);

        let inner = block.inner(area);
        block.render(area, buf);

        // Split inner area: query text (fill) | match counter (fixed width)
        let chunks = Layout::default()
            .direction(LayoutDir::Horizontal)
            .constraints([Constraint::Fill(1), Constraint::Length(14)])
            .split(inner);

        // Query input
        let query_line = if self.state.query.is_empty() && !self.focused {
            Line::from(Span::styled(
                "press / to search",
                Style::default().add_modifier(Modifier::DIM),
            ))
        } else {
            Line::from(self.state.query.as_str())
        };
        Paragraph::new(query_line).render(chunks[0], buf);

        // Match counter: shown once the matcher has run for this query
        let counter = if self.state.ran {
            match self.state.results.len() {
                0 => "no matches".to_string(),
                1 => "1 match".to_string(),
                n => format!("{n} matches"),
            }
        } else {
            String::new()
        };
        Paragraph::new(Line::from(Span::styled(
            counter,
            Style::default().add_modifier(Modifier::DIM),
        )))
        .render(chunks[1], buf);
    }
}

// ---------------------------------------------------------------------------
// Result list overlay
// ---------------------------------------------------------------------------

/// Floating list of matches, anchored directly above the search bar. The
/// caller passes the search bar's area; the overlay sizes itself to the
/// result count and clears whatever it covers.
pub struct SearchResults<'a> {
    state: &'a SearchBarState,
    theme: &'a Theme,
}

impl<'a> SearchResults<'a> {
    pub fn new(state: &'a SearchBarState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    /// The overlay area for a given search-bar area, or `None` when there is
    /// nothing to show.
    pub fn overlay_area(&self, search_area: Rect) -> Option<Rect> {
        if self.state.results.is_empty() {
            return None;
        }
        let height = (self.state.results.len() as u16 + 2).min(search_area.y);
        if height < 3 {
            return None;
        }
        Some(Rect {
            x: search_area.x,
            y: search_area.y - height,
            width: search_area.width,
            height,
        })
    }
}

impl Widget for SearchResults<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);

        let block = Block::bordered()
            .title("Results")
            .border_style(self.theme.border_focused);
        let inner = block.inner(area);
        block.render(area, buf);

        let width = inner.width as usize;
        let items: Vec<ListItem> = self
            .state
            .results
            .iter()
            .map(|entry| {
                let provenance = format!(" {}", entry.source_layer);
                let name_width = width.saturating_sub(provenance.chars().count());
                ListItem::new(Line::from(vec![
                    Span::raw(format!("{:<name_width$.name_width$}", entry.display_name)),
                    Span::styled(provenance, Style::default().add_modifier(Modifier::DIM)),
                ]))
            })
            .collect();

        let list = List::new(items)
            .highlight_style(self.theme.search_highlight);
        let mut list_state = ListState::default().with_selected(Some(self.state.selected));
        StatefulWidget::render(list, inner, buf, &mut list_state);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
