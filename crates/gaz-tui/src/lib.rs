//! gaz TUI — ratatui application shell.

pub mod app;
pub mod commands;
pub mod event;
pub mod theme;
pub mod widgets;

pub use app::App;

use std::path::Path;

/// Load a map export directory and start the TUI.
pub fn run(map_dir: &Path) -> anyhow::Result<()> {
    let config = gaz_core::config::Config::load()
        .unwrap_or_else(|_| gaz_core::config::Config::defaults());
    let theme = theme::Theme::load_default();

    let export = gaz_layers::load_export(map_dir)?;
    let index =
        gaz_core::SearchIndex::build(&export.registry, &export.manifest.search_config());
    tracing::debug!(
        layers = export.registry.layers().len(),
        entries = index.len(),
        "map export loaded"
    );

    App::new(export, index, config, theme).run()
}
