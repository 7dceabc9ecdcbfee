//! Basemap bar widget — renders the strip of available basemaps at the top
//! of the screen.

use crate::theme::Theme;
use crate::widgets::map_view::Basemap;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::Line,
    widgets::{Tabs, Widget},
};

/// Renders the 1-line strip of basemaps at the top of the screen.
///
/// The single active basemap is highlighted. Keybinding hints
/// (`b:basemap  q:quit  ?:help`) are right-aligned in the same row.
pub struct BasemapBar<'a> {
    basemaps: &'a [Basemap],
    active: usize,
    _theme: &'a Theme,
}

impl<'a> BasemapBar<'a> {
    pub fn new(basemaps: &'a [Basemap], active: usize, theme: &'a Theme) -> Self {
        Self { basemaps, active, _theme: theme }
    }
}

impl Widget for BasemapBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let labels: Vec<Line> = self
            .basemaps
            .iter()
            .map(|b| Line::from(format!(" {} ", b.name)))
            .collect();

        Tabs::new(labels)
            .select(self.active)
            .highlight_style(
                Style::default()
                    .bg(ratatui::style::Color::DarkGray)
                    .add_modifier(Modifier::BOLD),
            )
            .divider("")
            .render(area, buf);

        // Keybinding hints at the right edge
        let hint = " b:basemap  q:quit  ?:help ";
        let hint_x = area.right().saturating_sub(hint.len() as u16);
        buf.set_string(
            hint_x,
            area.y,
            hint,
            Style::default().add_modifier(Modifier::DIM),
        );
    }
}
