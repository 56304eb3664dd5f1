//! Tri-state selection over a [`TreeModel`].
//!
//! Toggling stamps the new state on a whole subtree, then re-derives the
//! ancestors from their direct children. `Partial` is never set directly.

use std::path::PathBuf;

use super::tree::{NodeId, SelectionState, TreeModel};

/// Derive a directory's state from its direct children.
///
/// Returns `None` for a node without children; such a node keeps whatever
/// state was stamped on it.
fn derived_state(tree: &TreeModel, id: NodeId) -> Option<SelectionState> {
    let children = &tree.node(id).children;
    if children.is_empty() {
        return None;
    }
    let mut all_full = true;
    let mut all_none = true;
    for &child in children {
        match tree.node(child).selection {
            SelectionState::Full => all_none = false,
            SelectionState::None => all_full = false,
            SelectionState::Partial => {
                all_full = false;
                all_none = false;
            }
        }
        if !all_full && !all_none {
            return Some(SelectionState::Partial);
        }
    }
    Some(if all_full {
        SelectionState::Full
    } else {
        SelectionState::None
    })
}

/// Toggle the selection of `id` and propagate.
///
/// A `Full` node becomes `None`; anything else (including `Partial`)
/// becomes `Full`. Returns how many nodes were stamped, the node included.
pub fn toggle(tree: &mut TreeModel, id: NodeId) -> usize {
    let next = match tree.node(id).selection {
        SelectionState::Full => SelectionState::None,
        SelectionState::None | SelectionState::Partial => SelectionState::Full,
    };

    let mut stamped = 0;
    let mut stack = vec![id];
    while let Some(current) = stack.pop() {
        let node = tree.node_mut(current);
        node.selection = next;
        stamped += 1;
        stack.extend_from_slice(&node.children);
    }

    let mut ancestors = 0;
    let mut current = tree.node(id).parent;
    while let Some(parent) = current {
        let Some(state) = derived_state(tree, parent) else {
            break;
        };
        if state == tree.node(parent).selection {
            break;
        }
        tree.node_mut(parent).selection = state;
        ancestors += 1;
        current = tree.node(parent).parent;
    }

    tracing::debug!(
        path = %tree.node(id).path.display(),
        state = ?next,
        stamped,
        ancestors,
        "selection toggled"
    );
    stamped
}

/// Number of fully selected files in the loaded subtree of `id`, the node
/// itself included.
pub fn selected_files_below(tree: &TreeModel, id: NodeId) -> usize {
    let mut count = 0;
    let mut stack = vec![id];
    while let Some(current) = stack.pop() {
        let node = tree.node(current);
        if !node.is_dir && node.selection == SelectionState::Full {
            count += 1;
        }
        stack.extend_from_slice(&node.children);
    }
    count
}

/// Visit every loaded node in pre-order, keeping the `Full` ones that pass `keep`.
fn collect_full(tree: &TreeModel, keep: impl Fn(NodeId) -> bool) -> Vec<PathBuf> {
    let mut out = Vec::new();
    let mut stack = vec![tree.root()];
    while let Some(id) = stack.pop() {
        let node = tree.node(id);
        if node.selection == SelectionState::Full && keep(id) {
            out.push(node.path.clone());
        }
        stack.extend(node.children.iter().rev());
    }
    out
}

/// Paths of every fully selected node, directories included, in tree order.
pub fn selected_paths(tree: &TreeModel) -> Vec<PathBuf> {
    collect_full(tree, |_| true)
}

/// Paths of every fully selected file, in tree order.
pub fn selected_files(tree: &TreeModel) -> Vec<PathBuf> {
    collect_full(tree, |id| !tree.node(id).is_dir)
}
