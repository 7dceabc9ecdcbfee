//! Ratatui widgets for the gaz TUI.

pub mod basemap_bar;
pub mod command_bar;
pub mod help;
pub mod layer_tree;
pub mod map_view;
pub mod search_bar;
