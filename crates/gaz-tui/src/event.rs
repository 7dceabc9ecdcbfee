//! Semantic application events — crossterm key events mapped to a
//! widget-agnostic vocabulary so widgets never touch crossterm directly.
//!
//! # Usage
//!
//! In the main event loop, call [`to_app_event`] on every
//! [`crossterm::event::Event`] and match on the returned [`AppEvent`]
//! instead of crossterm types.
//!
//! # Keybindings
//!
//! Structural keys are fixed; the single-character bindings in the right
//! column come from the `[keybindings]` config section (defaults shown).
//!
//! | Key(s)                  | Event                      |
//! |-------------------------|----------------------------|
//! | `q`, `Ctrl+c`           | `Quit`                     |
//! | `Tab`                   | `FocusNext`                |
//! | `/` (configurable)      | `SearchFocus`              |
//! | `b` (configurable)      | `BasemapNext`              |
//! | `g` (configurable)      | `GridToggle`               |
//! | `+` / `-` (configurable)| `ZoomIn` / `ZoomOut`       |
//! | `F` (configurable)      | `FitVisible`               |
//! | `]` / `[`               | `GridNext` / `GridPrev`    |
//! | `↑` / `k` …             | `Nav(Up)` …                |
//! | printable char          | `Char(c)`                  |
//! | `Backspace`             | `Backspace`                |
//! | `Enter`                 | `Enter`                    |
//! | terminal resize         | `Resize(w, h)`             |
//!
//! ## Insert mode
//!
//! When a text-input widget (search bar, command bar) is focused, the event
//! loop calls [`to_app_event_insert`] instead. In insert mode every
//! printable character — including the configured shortcut characters — is
//! forwarded verbatim as `Char`; arrow keys still produce `Nav` so `←`/`→`
//! move the text cursor. Only `Ctrl+c`, `Escape`, `Enter`, `Tab`, and
//! `Backspace` keep their special bindings.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use gaz_core::config::KeybindingsConfig;

/// Cardinal direction for layer-tree navigation and map panning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// A semantic application event derived from a raw crossterm [`Event`].
///
/// Widgets receive `AppEvent` values — they never inspect crossterm types
/// directly. The App shell routes events to the appropriate widget based on
/// the current focus state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// Exit the application.
    Quit,
    /// Move keyboard focus to the next pane (Tab-cycle).
    FocusNext,
    /// Transfer focus to the search bar.
    SearchFocus,
    /// Switch to the next basemap (wraps; exactly one is ever active).
    BasemapNext,
    /// Toggle the grid navigation overlay.
    GridToggle,
    /// Move the grid cursor to the next cell.
    GridNext,
    /// Move the grid cursor to the previous cell.
    GridPrev,
    /// Zoom the map viewport in one step.
    ZoomIn,
    /// Zoom the map viewport out one step.
    ZoomOut,
    /// Fit the viewport to every visible layer.
    FitVisible,
    /// Navigate within the layer tree, pan the map, or move a text cursor.
    Nav(Direction),
    /// A printable character forwarded to the active text input.
    Char(char),
    /// Delete the character before the cursor in the active text input.
    Backspace,
    /// Confirm the active input, select a search hit, or zoom to a grid cell.
    Enter,
    /// The terminal was resized to the given (width, height).
    Resize(u16, u16),
    /// Dismiss the active modal (popup, search focus, help).
    Escape,
}

/// Map a raw crossterm [`Event`] to an [`AppEvent`] (normal / navigation mode).
///
/// Returns `None` for events that carry no semantic meaning for the
/// application (mouse events, key-release events on terminals that emit
/// them, unbound keys).
pub fn to_app_event(event: Event, kb: &KeybindingsConfig) -> Option<AppEvent> {
    match event {
        Event::Resize(w, h) => Some(AppEvent::Resize(w, h)),
        Event::Key(key) => map_key(key, kb),
        _ => None,
    }
}

/// Map a raw crossterm [`Event`] to an [`AppEvent`] for text-input ("insert")
/// mode. Call this variant whenever a text-input widget (search bar, command
/// bar) has focus.
pub fn to_app_event_insert(event: Event) -> Option<AppEvent> {
    match event {
        Event::Resize(w, h) => Some(AppEvent::Resize(w, h)),
        Event::Key(key) => map_key_insert(key),
        _ => None,
    }
}

fn map_key(key: KeyEvent, kb: &KeybindingsConfig) -> Option<AppEvent> {
    use KeyCode::*;
    use KeyModifiers as Mod;

    match key.code {
        // Quit — q (normal mode) or Ctrl+c anywhere
        Char('q') if key.modifiers == Mod::NONE => Some(AppEvent::Quit),
        Char('c') if key.modifiers == Mod::CONTROL => Some(AppEvent::Quit),

        // Focus cycling
        Tab if key.modifiers == Mod::NONE => Some(AppEvent::FocusNext),

        // Grid cell stepping works regardless of focus, like any overlay key
        Char(']') if key.modifiers == Mod::NONE => Some(AppEvent::GridNext),
        Char('[') if key.modifiers == Mod::NONE => Some(AppEvent::GridPrev),

        // Tree / map navigation
        Up | Char('k') if key.modifiers == Mod::NONE => Some(AppEvent::Nav(Direction::Up)),
        Down | Char('j') if key.modifiers == Mod::NONE => Some(AppEvent::Nav(Direction::Down)),
        Left | Char('h') if key.modifiers == Mod::NONE => Some(AppEvent::Nav(Direction::Left)),
        Right | Char('l') if key.modifiers == Mod::NONE => Some(AppEvent::Nav(Direction::Right)),

        // Configured single-char bindings, then plain text forwarding
        Char(c) if key.modifiers == Mod::NONE || key.modifiers == Mod::SHIFT => {
            Some(configured(c, kb).unwrap_or(AppEvent::Char(c)))
        }

        Backspace if key.modifiers == Mod::NONE => Some(AppEvent::Backspace),
        Enter if key.modifiers == Mod::NONE => Some(AppEvent::Enter),
        Esc => Some(AppEvent::Escape),

        _ => None,
    }
}

/// Resolve a printable character against the configured bindings.
fn configured(c: char, kb: &KeybindingsConfig) -> Option<AppEvent> {
    if c == kb.char_or(&kb.search_focus, '/') {
        Some(AppEvent::SearchFocus)
    } else if c == kb.char_or(&kb.basemap_next, 'b') {
        Some(AppEvent::BasemapNext)
    } else if c == kb.char_or(&kb.grid_toggle, 'g') {
        Some(AppEvent::GridToggle)
    } else if c == kb.char_or(&kb.zoom_in, '+') || c == '=' {
        Some(AppEvent::ZoomIn)
    } else if c == kb.char_or(&kb.zoom_out, '-') {
        Some(AppEvent::ZoomOut)
    } else if c == kb.char_or(&kb.fit_visible, 'F') {
        Some(AppEvent::FitVisible)
    } else {
        None
    }
}

/// Key mapping for text-input / insert mode.
///
/// All printable characters (with or without Shift) forward as `Char`.
/// Arrow keys produce `Nav` so `←` / `→` still move the text cursor.
fn map_key_insert(key: KeyEvent) -> Option<AppEvent> {
    use KeyCode::*;
    use KeyModifiers as Mod;

    match key.code {
        // Ctrl+c always quits, even while typing
        Char('c') if key.modifiers == Mod::CONTROL => Some(AppEvent::Quit),

        // Arrow keys move the text cursor or step through search results
        Up => Some(AppEvent::Nav(Direction::Up)),
        Down => Some(AppEvent::Nav(Direction::Down)),
        Left => Some(AppEvent::Nav(Direction::Left)),
        Right => Some(AppEvent::Nav(Direction::Right)),

        // Tab exits the text input (focus-cycle behaviour)
        Tab if key.modifiers == Mod::NONE => Some(AppEvent::FocusNext),

        // Every printable character — including letters that are shortcuts
        // in normal mode — is forwarded verbatim
        Char(c) if key.modifiers == Mod::NONE || key.modifiers == Mod::SHIFT => {
            Some(AppEvent::Char(c))
        }

        Backspace if key.modifiers == Mod::NONE => Some(AppEvent::Backspace),
        Enter if key.modifiers == Mod::NONE => Some(AppEvent::Enter),
        Esc => Some(AppEvent::Escape),

        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
