//! Layer tree widget — categories and their layers in the left pane, with
//! tri-state visibility checkboxes.
//!
//! # Navigation
//! - `↑`/`k` and `↓`/`j` move the cursor up and down the visible list.
//! - `→`/`l` expands the focused category; `←`/`h` collapses it.
//! - `Space` toggles visibility of the focused node; toggling a category
//!   cascades to every layer under it.
//!
//! Checkbox state is initialized from each layer's presence on the map at
//! startup; after that the tree is the single source of truth for which
//! layers the map pane draws.

use crate::event::{AppEvent, Direction};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, List, ListItem, ListState, StatefulWidget, Widget},
};
use tracing;

// ---------------------------------------------------------------------------
// Selection state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeSelection {
    /// All layers under this node are on the map.
    Selected,
    /// No layers under this node are on the map.
    Unselected,
    /// Some (but not all) layers under this node are on the map.
    Partial,
}

// ---------------------------------------------------------------------------
// Tree node
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct TreeNode {
    /// Stable identifier (layer name for leaves, prefixed label for
    /// categories).
    pub id: String,
    /// Human-readable display label.
    pub label: String,
    pub expanded: bool,
    pub selection: NodeSelection,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            expanded: true,
            selection: NodeSelection::Unselected,
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<TreeNode>) -> Self {
        self.children = children;
        self
    }

    pub fn with_selection(mut self, selection: NodeSelection) -> Self {
        self.selection = selection;
        self
    }
}

// ---------------------------------------------------------------------------
// Tree state
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct LayerTreeState {
    pub nodes: Vec<TreeNode>,
    /// Index into the currently-visible (flattened) list.
    pub cursor: usize,
}

impl LayerTreeState {
    /// Build the tree from `(category label, [(layer name, visible)])`
    /// groups, in order. Category selection states are derived from their
    /// children.
    pub fn from_categories(groups: &[(String, Vec<(String, bool)>)]) -> Self {
        let nodes = groups
            .iter()
            .map(|(category, layers)| {
                let children: Vec<TreeNode> = layers
                    .iter()
                    .map(|(name, visible)| {
                        TreeNode::new(name.clone(), name.clone()).with_selection(if *visible {
                            NodeSelection::Selected
                        } else {
                            NodeSelection::Unselected
                        })
                    })
                    .collect();
                let selection = compute_selection_from_children(&children);
                TreeNode::new(format!("category:{category}"), category.clone())
                    .with_children(children)
                    .with_selection(selection)
            })
            .collect();
        Self { nodes, cursor: 0 }
    }

    /// Names of every layer whose checkbox is on, in tree order.
    pub fn visible_layers(&self) -> Vec<String> {
        let mut out = Vec::new();
        collect_selected_leaves(&self.nodes, &mut out);
        out
    }

    /// Return the id of the node at the cursor, if any.
    fn cursor_id(&self) -> Option<String> {
        self.visible()
            .into_iter()
            .nth(self.cursor)
            .map(|(_, n)| n.id.clone())
    }

    /// Flatten the tree into `(depth, &node)` pairs, respecting expanded state.
    pub fn visible(&self) -> Vec<(usize, &TreeNode)> {
        flatten(&self.nodes, 0)
    }

    /// Handle an [`AppEvent`], mutating state as appropriate.
    pub fn handle(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Nav(Direction::Up) => {
                self.cursor = self.cursor.saturating_sub(1);
                tracing::debug!(cursor = self.cursor, "tree: cursor up");
            }
            AppEvent::Nav(Direction::Down) => {
                let max = self.visible().len().saturating_sub(1);
                if self.cursor < max {
                    self.cursor += 1;
                }
                tracing::debug!(cursor = self.cursor, "tree: cursor down");
            }
            AppEvent::Nav(Direction::Right) => {
                if let Some(id) = self.cursor_id() {
                    tracing::debug!(node = %id, "tree: expand");
                    set_expanded(&mut self.nodes, &id, true);
                }
            }
            AppEvent::Nav(Direction::Left) => {
                if let Some(id) = self.cursor_id() {
                    tracing::debug!(node = %id, "tree: collapse");
                    set_expanded(&mut self.nodes, &id, false);
                    self.clamp_cursor();
                }
            }
            AppEvent::Enter => {
                if let Some(id) = self.cursor_id() {
                    if is_leaf(&self.nodes, &id) {
                        tracing::debug!(node = %id, "tree: toggle visibility (leaf enter)");
                        toggle_selection(&mut self.nodes, &id);
                    } else {
                        tracing::debug!(node = %id, "tree: toggle expand (category enter)");
                        toggle_expanded(&mut self.nodes, &id);
                        self.clamp_cursor();
                    }
                }
            }
            AppEvent::Char(' ') => {
                if let Some(id) = self.cursor_id() {
                    tracing::debug!(node = %id, "tree: toggle visibility (space)");
                    toggle_selection(&mut self.nodes, &id);
                }
            }
            _ => {}
        }
    }

    fn clamp_cursor(&mut self) {
        let max = self.visible().len().saturating_sub(1);
        if self.cursor > max {
            self.cursor = max;
        }
    }
}

// ---------------------------------------------------------------------------
// Recursive tree helpers
// ---------------------------------------------------------------------------

fn flatten(nodes: &[TreeNode], depth: usize) -> Vec<(usize, &TreeNode)> {
    let mut out = Vec::new();
    for node in nodes {
        out.push((depth, node));
        if node.expanded {
            out.extend(flatten(&node.children, depth + 1));
        }
    }
    out
}

fn collect_selected_leaves(nodes: &[TreeNode], out: &mut Vec<String>) {
    for node in nodes {
        if node.children.is_empty() {
            if node.selection == NodeSelection::Selected {
                out.push(node.id.clone());
            }
        } else {
            collect_selected_leaves(&node.children, out);
        }
    }
}

/// Set the `expanded` flag on the node with `id`. Returns `true` if found.
fn set_expanded(nodes: &mut [TreeNode], id: &str, expanded: bool) -> bool {
    for node in nodes.iter_mut() {
        if node.id == id {
            node.expanded = expanded;
            return true;
        }
        if set_expanded(&mut node.children, id, expanded) {
            return true;
        }
    }
    false
}

/// Flip the `expanded` flag on the node with `id`. Returns `true` if found.
fn toggle_expanded(nodes: &mut [TreeNode], id: &str) -> bool {
    for node in nodes.iter_mut() {
        if node.id == id {
            node.expanded = !node.expanded;
            return true;
        }
        if toggle_expanded(&mut node.children, id) {
            return true;
        }
    }
    false
}

/// Returns `Some(true)` if the node with `id` is a leaf, `Some(false)` if it
/// has children, or `None` if the id is not found in the subtree.
fn find_is_leaf(nodes: &[TreeNode], id: &str) -> Option<bool> {
    for node in nodes {
        if node.id == id {
            return Some(node.children.is_empty());
        }
        if let Some(result) = find_is_leaf(&node.children, id) {
            return Some(result);
        }
    }
    None
}

fn is_leaf(nodes: &[TreeNode], id: &str) -> bool {
    find_is_leaf(nodes, id).unwrap_or(true)
}

/// Toggle the selection state of the node with `id`.
///
/// When the toggled node is found, its new state is pushed down to every
/// descendant via [`set_all_selection`]. On the way back up the call stack,
/// each ancestor recomputes its own state from its children via
/// [`compute_selection_from_children`].
fn toggle_selection(nodes: &mut [TreeNode], id: &str) -> bool {
    for node in nodes.iter_mut() {
        if node.id == id {
            let new_state = match node.selection {
                NodeSelection::Selected | NodeSelection::Partial => NodeSelection::Unselected,
                NodeSelection::Unselected => NodeSelection::Selected,
            };
            node.selection = new_state;
            // Push the new state down to every descendant
            set_all_selection(&mut node.children, new_state);
            return true;
        }
        if toggle_selection(&mut node.children, id) {
            // Recompute this node's state from its (now-updated) children
            node.selection = compute_selection_from_children(&node.children);
            return true;
        }
    }
    false
}

/// Recursively set every node in the subtree to `state`.
fn set_all_selection(nodes: &mut [TreeNode], state: NodeSelection) {
    for node in nodes.iter_mut() {
        node.selection = state;
        set_all_selection(&mut node.children, state);
    }
}

/// Derive a category's selection state from the states of its direct children.
///
/// - All `Selected`   → `Selected`
/// - All `Unselected` → `Unselected`
/// - Any mix (or any child is `Partial`) → `Partial`
fn compute_selection_from_children(children: &[TreeNode]) -> NodeSelection {
    if children.is_empty() {
        return NodeSelection::Unselected;
    }
    let all_sel = children
        .iter()
        .all(|c| c.selection == NodeSelection::Selected);
    let all_unsel = children
        .iter()
        .all(|c| c.selection == NodeSelection::Unselected);
    if all_sel {
        NodeSelection::Selected
    } else if all_unsel {
        NodeSelection::Unselected
    } else {
        NodeSelection::Partial
    }
}

// ---------------------------------------------------------------------------
// Widget
// ---------------------------------------------------------------------------

pub struct LayerTree<'a> {
    state: &'a LayerTreeState,
    focused: bool,
    theme: &'a crate::theme::Theme,
}

impl<'a> LayerTree<'a> {
    pub fn new(
        state: &'a LayerTreeState,
        focused: bool,
        theme: &'a crate::theme::Theme,
    ) -> Self {
        Self {
            state,
            focused,
            theme,
        }
    }
}

impl Widget for LayerTree<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.focused {
            self.theme.border_focused
        } else {
            self.theme.border_unfocused
        };

        let block = Block::bordered()
            .title("Layers")
            .border_style(border_style);

        let inner = block.inner(area);
        block.render(area, buf);

        let visible = self.state.visible();

        let items: Vec<ListItem> = visible
            .iter()
            .map(|(depth, node)| {
                let indent = "  ".repeat(*depth);
                let expand = if node.children.is_empty() {
                    "  "
                } else if node.expanded {
                    "▼ "
                } else {
                    "▶ "
                };
                let sel = match node.selection {
                    NodeSelection::Selected => "[x] ",
                    NodeSelection::Unselected => "[ ] ",
                    NodeSelection::Partial => "[~] ",
                };
                let line = if node.children.is_empty() {
                    Line::styled(
                        format!("{}{}{}{}", indent, expand, sel, node.label),
                        self.theme.layer_style(&node.id),
                    )
                } else {
                    Line::from(format!("{}{}{}{}", indent, expand, sel, node.label))
                };
                ListItem::new(line)
            })
            .collect();

        let list =
            List::new(items).highlight_style(Style::default().add_modifier(Modifier::REVERSED));

        let mut list_state = ListState::default().with_selected(Some(self.state.cursor));
        StatefulWidget::render(list, inner, buf, &mut list_state);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a small tree: one category with layers a, b, c — all off.
    fn three_layer_tree() -> Vec<TreeNode> {
        LayerTreeState::from_categories(&[(
            "Overlays".to_string(),
            vec![
                ("a".to_string(), false),
                ("b".to_string(), false),
                ("c".to_string(), false),
            ],
        )])
        .nodes
    }

    fn find_sel(nodes: &[TreeNode], id: &str) -> NodeSelection {
        find_sel_opt(nodes, id).unwrap_or(NodeSelection::Unselected)
    }

    fn find_sel_opt(nodes: &[TreeNode], id: &str) -> Option<NodeSelection> {
        for n in nodes {
            if n.id == id {
                return Some(n.selection);
            }
            if let Some(r) = find_sel_opt(&n.children, id) {
                return Some(r);
            }
        }
        None
    }

    #[test]
    fn toggling_layer_selects_it() {
        let mut nodes = three_layer_tree();
        toggle_selection(&mut nodes, "a");
        assert_eq!(find_sel(&nodes, "a"), NodeSelection::Selected);
        assert_eq!(find_sel(&nodes, "b"), NodeSelection::Unselected);
    }

    #[test]
    fn toggling_layer_makes_category_partial() {
        let mut nodes = three_layer_tree();
        toggle_selection(&mut nodes, "a");
        assert_eq!(find_sel(&nodes, "category:Overlays"), NodeSelection::Partial);
    }

    #[test]
    fn toggling_all_layers_makes_category_selected() {
        let mut nodes = three_layer_tree();
        toggle_selection(&mut nodes, "a");
        toggle_selection(&mut nodes, "b");
        toggle_selection(&mut nodes, "c");
        assert_eq!(find_sel(&nodes, "category:Overlays"), NodeSelection::Selected);
    }

    #[test]
    fn toggling_category_selects_all_layers() {
        let mut nodes = three_layer_tree();
        toggle_selection(&mut nodes, "category:Overlays");
        assert_eq!(find_sel(&nodes, "category:Overlays"), NodeSelection::Selected);
        assert_eq!(find_sel(&nodes, "a"), NodeSelection::Selected);
        assert_eq!(find_sel(&nodes, "b"), NodeSelection::Selected);
        assert_eq!(find_sel(&nodes, "c"), NodeSelection::Selected);
    }

    #[test]
    fn toggling_selected_category_deselects_all_layers() {
        let mut nodes = three_layer_tree();
        toggle_selection(&mut nodes, "category:Overlays"); // → Selected
        toggle_selection(&mut nodes, "category:Overlays"); // → Unselected
        assert_eq!(find_sel(&nodes, "category:Overlays"), NodeSelection::Unselected);
        assert_eq!(find_sel(&nodes, "a"), NodeSelection::Unselected);
        assert_eq!(find_sel(&nodes, "b"), NodeSelection::Unselected);
    }

    #[test]
    fn partial_category_toggle_clears_all() {
        let mut nodes = three_layer_tree();
        toggle_selection(&mut nodes, "a"); // category → Partial
        toggle_selection(&mut nodes, "category:Overlays"); // Partial → Unselected
        assert_eq!(find_sel(&nodes, "category:Overlays"), NodeSelection::Unselected);
        assert_eq!(find_sel(&nodes, "a"), NodeSelection::Unselected);
    }

    #[test]
    fn checkboxes_reflect_startup_visibility() {
        let state = LayerTreeState::from_categories(&[(
            "Overlays".to_string(),
            vec![("on".to_string(), true), ("off".to_string(), false)],
        )]);
        assert_eq!(find_sel(&state.nodes, "on"), NodeSelection::Selected);
        assert_eq!(find_sel(&state.nodes, "off"), NodeSelection::Unselected);
        assert_eq!(
            find_sel(&state.nodes, "category:Overlays"),
            NodeSelection::Partial
        );
        assert_eq!(state.visible_layers(), vec!["on".to_string()]);
    }

    #[test]
    fn visible_layers_follow_tree_order() {
        let state = LayerTreeState::from_categories(&[
            ("B".to_string(), vec![("roads".to_string(), true)]),
            ("A".to_string(), vec![("markets".to_string(), true)]),
        ]);
        assert_eq!(
            state.visible_layers(),
            vec!["roads".to_string(), "markets".to_string()]
        );
    }
}
