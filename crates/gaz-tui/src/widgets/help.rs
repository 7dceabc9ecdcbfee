//! Help popup — centred floating overlay listing all keybindings.
//!
//! Toggle with `?`; close with `?` or `Escape`. The footer names the loaded
//! map and, when the export tool stamped one, its generation timestamp.

use crate::theme::Theme;
use chrono::{DateTime, Utc};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Clear, Paragraph, Widget},
};

pub struct HelpPopup<'a> {
    title: &'a str,
    generated: Option<DateTime<Utc>>,
    _theme: &'a Theme,
}

impl<'a> HelpPopup<'a> {
    pub fn new(title: &'a str, generated: Option<DateTime<Utc>>, theme: &'a Theme) -> Self {
        Self { title, generated, _theme: theme }
    }
}

impl Widget for HelpPopup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let popup = centered_rect(80, 22, area);
        Clear.render(popup, buf);

        let block = Block::bordered()
            .title(" gaz — keybindings (? to close) ")
            .border_style(Style::default().add_modifier(Modifier::BOLD));

        let inner = block.inner(popup);
        block.render(popup, buf);

        const BINDINGS: &[(&str, &str)] = &[
            ("q  /  Ctrl+c", "Quit"),
            ("Tab", "Cycle focus: layers → map → search"),
            ("/", "Focus the search bar"),
            ("Escape", "Close popup / leave search bar"),
            ("↑ k  /  ↓ j", "Navigate tree, pan map, step results"),
            ("← h  /  → l", "Collapse/expand category, pan map"),
            ("Space", "Toggle layer or category visibility"),
            ("Enter", "Select search hit / zoom to grid cell"),
            ("b", "Next basemap"),
            ("g", "Toggle the grid overlay"),
            ("]  /  [", "Next / previous grid cell"),
            ("+  /  -", "Zoom in / out"),
            ("F", "Fit view to visible layers"),
            (":", "Command bar (quit, theme, basemap, …)"),
            ("?", "Toggle this help popup"),
        ];

        let mut lines: Vec<Line> = BINDINGS
            .iter()
            .map(|(key, desc)| {
                Line::from(vec![
                    Span::styled(
                        format!("  {:<22}", key),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(*desc),
                ])
            })
            .collect();

        // Footer: map title and export timestamp
        lines.push(Line::from(""));
        let footer = match self.generated {
            Some(ts) => format!("  {} — exported {}", self.title, ts.format("%Y-%m-%d %H:%M UTC")),
            None => format!("  {}", self.title),
        };
        lines.push(Line::from(Span::styled(
            footer,
            Style::default().add_modifier(Modifier::DIM),
        )));

        Paragraph::new(lines).render(inner, buf);
    }
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}
