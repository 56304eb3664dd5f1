//! Visible-node sequence and the scrolled window drawn from it.
//!
//! The sequence is rebuilt only on structural changes (expand, collapse,
//! selection). Drawing a frame only slices it.

use crate::fs::tree::{NodeId, SelectionState, TreeModel};

/// Label shown under a deferred directory that has not been scanned.
pub const PLACEHOLDER_LABEL: &str = "… large directory, not yet scanned";

/// One entry of the visible sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibleItem {
    Node(NodeId),
    /// Display-only stand-in for the contents of an unscanned deferred directory.
    Placeholder { owner: NodeId },
}

impl VisibleItem {
    /// The node an action on this row applies to.
    pub fn target(self) -> NodeId {
        match self {
            VisibleItem::Node(id) => id,
            VisibleItem::Placeholder { owner } => owner,
        }
    }
}

/// Flatten the expanded part of the tree in pre-order.
///
/// The root is always present and always treated as expanded.
pub fn flatten(tree: &TreeModel) -> Vec<VisibleItem> {
    let root = tree.root();
    let mut items = Vec::new();
    let mut stack = vec![root];
    while let Some(id) = stack.pop() {
        items.push(VisibleItem::Node(id));
        let node = tree.node(id);
        if id == root || node.expanded {
            stack.extend(node.children.iter().rev());
        } else if node.deferred && !node.loaded {
            items.push(VisibleItem::Placeholder { owner: id });
        }
    }
    items
}

/// Visible sequence plus the cursor position within it.
#[derive(Debug, Default)]
pub struct Viewport {
    items: Vec<VisibleItem>,
    cursor: usize,
}

impl Viewport {
    pub fn new(tree: &TreeModel) -> Self {
        Self {
            items: flatten(tree),
            cursor: 0,
        }
    }

    pub fn items(&self) -> &[VisibleItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn current(&self) -> Option<VisibleItem> {
        self.items.get(self.cursor).copied()
    }

    /// Recompute the visible sequence, keeping the cursor on the same path.
    ///
    /// If that path is no longer visible the cursor keeps its index,
    /// clamped to the new length.
    pub fn rebuild(&mut self, tree: &TreeModel) {
        let anchor = match self.current() {
            Some(VisibleItem::Node(id)) => Some(tree.node(id).path.clone()),
            _ => None,
        };
        let old_index = self.cursor;

        self.items = flatten(tree);

        let relocated = anchor
            .and_then(|path| tree.lookup(&path))
            .and_then(|id| self.position_of(id));
        self.cursor = relocated.unwrap_or_else(|| old_index.min(self.items.len().saturating_sub(1)));

        tracing::trace!(visible = self.items.len(), cursor = self.cursor, "viewport rebuilt");
    }

    fn position_of(&self, id: NodeId) -> Option<usize> {
        self.items
            .iter()
            .position(|item| *item == VisibleItem::Node(id))
    }

    /// Put the cursor on `id` if it is visible. Returns whether it moved.
    pub fn select_node(&mut self, id: NodeId) -> bool {
        match self.position_of(id) {
            Some(index) => {
                self.cursor = index;
                true
            }
            None => false,
        }
    }

    pub fn select_next(&mut self) {
        if self.cursor + 1 < self.items.len() {
            self.cursor += 1;
        }
    }

    pub fn select_previous(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn select_first(&mut self) {
        self.cursor = 0;
    }

    pub fn select_last(&mut self) {
        self.cursor = self.items.len().saturating_sub(1);
    }

    pub fn page_down(&mut self, height: usize) {
        self.cursor = (self.cursor + height.max(1)).min(self.items.len().saturating_sub(1));
    }

    pub fn page_up(&mut self, height: usize) {
        self.cursor = self.cursor.saturating_sub(height.max(1));
    }
}

/// The slice of the visible sequence that fits on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: usize,
    pub end: usize,
    /// Rows hidden above `start` (scroll indicator).
    pub hidden_above: usize,
    /// Rows hidden below `end` (scroll indicator).
    pub hidden_below: usize,
}

/// Compute the window of `height` rows around `cursor`.
///
/// The window starts half a screen above the cursor (never before the
/// first row). Near the end it runs short instead of scrolling back.
pub fn window(len: usize, cursor: usize, height: usize) -> Window {
    if len == 0 || height == 0 {
        return Window {
            start: 0,
            end: 0,
            hidden_above: 0,
            hidden_below: len,
        };
    }
    let start = cursor.saturating_sub(height / 2);
    let end = (start + height).min(len);
    Window {
        start,
        end,
        hidden_above: start,
        hidden_below: len - end,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Directory,
    File,
    Placeholder,
}

/// A formatted line of the tree view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub text: String,
    pub kind: RowKind,
    pub selection: Option<SelectionState>,
    pub is_cursor: bool,
}

pub fn selection_glyph(state: SelectionState) -> &'static str {
    match state {
        SelectionState::Full => "[x]",
        SelectionState::Partial => "[~]",
        SelectionState::None => "[ ]",
    }
}

/// Format one visible item: indentation, expand glyph, selection glyph, name.
pub fn format_row(tree: &TreeModel, item: VisibleItem) -> Row {
    match item {
        VisibleItem::Node(id) => {
            let node = tree.node(id);
            let indent = "  ".repeat(node.depth);
            if node.is_dir {
                let expanded = id == tree.root() || node.expanded;
                let arrow = if expanded { "▼" } else { "▶" };
                Row {
                    text: format!(
                        "{indent}{arrow} {} {}/",
                        selection_glyph(node.selection),
                        node.name
                    ),
                    kind: RowKind::Directory,
                    selection: Some(node.selection),
                    is_cursor: false,
                }
            } else {
                Row {
                    text: format!("{indent}  {} {}", selection_glyph(node.selection), node.name),
                    kind: RowKind::File,
                    selection: Some(node.selection),
                    is_cursor: false,
                }
            }
        }
        VisibleItem::Placeholder { owner } => {
            let indent = "  ".repeat(tree.node(owner).depth + 1);
            Row {
                text: format!("{indent}  {PLACEHOLDER_LABEL}"),
                kind: RowKind::Placeholder,
                selection: None,
                is_cursor: false,
            }
        }
    }
}

/// Format the rows currently on screen for a viewport `height` rows tall.
pub fn render_window(tree: &TreeModel, viewport: &Viewport, height: usize) -> (Window, Vec<Row>) {
    let win = window(viewport.len(), viewport.cursor(), height);
    let rows = viewport.items()[win.start..win.end]
        .iter()
        .enumerate()
        .map(|(offset, &item)| {
            let mut row = format_row(tree, item);
            row.is_cursor = win.start + offset == viewport.cursor();
            row
        })
        .collect();
    (win, rows)
}
