//! Arena-backed filesystem tree with lazy, deferred directory scanning.
//!
//! Nodes live in a flat `Vec` and refer to each other by [`NodeId`]. The
//! owning edge is `children`; `parent` is a plain index used only to walk
//! upward. Nodes are created by scans and never removed during a session.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{AppError, Result};

/// Index into the tree arena.
pub type NodeId = usize;

/// Directory names whose scan is postponed until the user expands them.
pub const DEFAULT_IGNORE_DIRS: &[&str] = &[
    ".git",
    "node_modules",
    "__pycache__",
    "venv",
    ".venv",
    ".tox",
    ".mypy_cache",
    ".pytest_cache",
    "target",
];

/// Tri-state selection of a node.
///
/// `Partial` only ever arises on directories, derived from their children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionState {
    #[default]
    None,
    Partial,
    Full,
}

/// Cached counters over the loaded part of a subtree (the node itself excluded).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DescendantCounts {
    pub files: usize,
    pub total: usize,
}

/// Set of directory names whose scan is deferred.
#[derive(Debug, Clone)]
pub struct IgnoreSet {
    names: HashSet<String>,
}

impl IgnoreSet {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// An ignore-set that defers nothing.
    pub fn empty() -> Self {
        Self {
            names: HashSet::new(),
        }
    }

    pub fn matches(&self, name: &str) -> bool {
        self.names.contains(name)
    }
}

impl Default for IgnoreSet {
    fn default() -> Self {
        Self::new(DEFAULT_IGNORE_DIRS.iter().copied())
    }
}

/// A single filesystem entry in the tree.
#[derive(Debug, Clone)]
pub struct TreeNode {
    pub name: String,
    pub path: PathBuf,
    pub is_dir: bool,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// Depth from the root (root = 0).
    pub depth: usize,
    pub expanded: bool,
    /// Immediate children have been scanned at least once.
    pub loaded: bool,
    /// Name matched the ignore-set; scanning waits for an explicit expand.
    pub deferred: bool,
    pub selection: SelectionState,
    counts: Option<DescendantCounts>,
}

/// What a directory load produced.
#[derive(Debug, Default)]
pub struct ScanOutcome {
    /// Number of nodes created.
    pub added: usize,
    /// Entries (or the whole directory) that could not be read.
    pub failures: Vec<AppError>,
}

impl ScanOutcome {
    fn fail(&mut self, path: &Path, source: std::io::Error) {
        tracing::warn!(path = %path.display(), error = %source, "scan failed");
        self.failures.push(AppError::Scan {
            path: path.to_path_buf(),
            source,
        });
    }
}

/// An entry read from disk, before it becomes a node.
struct ScannedEntry {
    name: String,
    path: PathBuf,
    is_dir: bool,
}

/// Directories first, then byte-wise by name.
fn compare_entries(a: &ScannedEntry, b: &ScannedEntry) -> Ordering {
    b.is_dir
        .cmp(&a.is_dir)
        .then_with(|| a.name.as_bytes().cmp(b.name.as_bytes()))
}

/// The in-memory directory tree.
pub struct TreeModel {
    nodes: Vec<TreeNode>,
    index: HashMap<PathBuf, NodeId>,
    root: NodeId,
    ignore: IgnoreSet,
    scan_failures: usize,
}

impl TreeModel {
    /// Build a tree rooted at `root_path`, prefetching two levels.
    ///
    /// The root's children are loaded, and so are the children of every
    /// directory child that is not matched by `ignore`. Matching directories
    /// are marked deferred and left unscanned.
    pub fn initialize(root_path: &Path, ignore: IgnoreSet) -> Result<Self> {
        let meta = fs::metadata(root_path).map_err(|e| {
            AppError::RootResolution(format!("{}: {}", root_path.display(), e))
        })?;
        if !meta.is_dir() {
            return Err(AppError::RootResolution(format!(
                "{} is not a directory",
                root_path.display()
            )));
        }

        let name = root_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| root_path.display().to_string());
        let root = TreeNode {
            name,
            path: root_path.to_path_buf(),
            is_dir: true,
            parent: None,
            children: Vec::new(),
            depth: 0,
            expanded: true,
            loaded: false,
            deferred: false,
            selection: SelectionState::None,
            counts: None,
        };

        let mut tree = Self {
            nodes: vec![root],
            index: HashMap::from([(root_path.to_path_buf(), 0)]),
            root: 0,
            ignore,
            scan_failures: 0,
        };

        tree.load_children(tree.root);
        let prefetch: Vec<NodeId> = tree.nodes[tree.root]
            .children
            .iter()
            .copied()
            .filter(|&c| tree.nodes[c].is_dir && !tree.nodes[c].deferred)
            .collect();
        for dir in prefetch {
            tree.load_children(dir);
        }

        tracing::debug!(
            root = %root_path.display(),
            nodes = tree.nodes.len(),
            failures = tree.scan_failures,
            "tree initialized"
        );
        Ok(tree)
    }

    /// Scan the immediate entries of a directory and attach them as children.
    ///
    /// Read failures are collected in the outcome and logged; the node is
    /// marked loaded with whatever could be read. Already-loaded nodes and
    /// files are left untouched.
    pub fn load_children(&mut self, id: NodeId) -> ScanOutcome {
        let mut outcome = ScanOutcome::default();
        let node = &self.nodes[id];
        if !node.is_dir || node.loaded {
            return outcome;
        }
        let dir = node.path.clone();
        let depth = node.depth + 1;
        // Children of a fully selected (necessarily empty) directory start selected.
        let inherited = match node.selection {
            SelectionState::Full => SelectionState::Full,
            _ => SelectionState::None,
        };

        let mut entries = Vec::new();
        match fs::read_dir(&dir) {
            Ok(read_dir) => {
                for entry in read_dir {
                    let entry = match entry {
                        Ok(e) => e,
                        Err(e) => {
                            outcome.fail(&dir, e);
                            continue;
                        }
                    };
                    let path = entry.path();
                    // Follows symlinks, so a dangling link surfaces here.
                    match fs::metadata(&path) {
                        Ok(meta) => entries.push(ScannedEntry {
                            name: entry.file_name().to_string_lossy().into_owned(),
                            path,
                            is_dir: meta.is_dir(),
                        }),
                        Err(e) => outcome.fail(&path, e),
                    }
                }
            }
            Err(e) => outcome.fail(&dir, e),
        }

        entries.sort_by(compare_entries);

        for entry in entries {
            if self.index.contains_key(&entry.path) {
                tracing::warn!(path = %entry.path.display(), "duplicate path skipped");
                continue;
            }
            let child_id = self.nodes.len();
            let deferred = entry.is_dir && self.ignore.matches(&entry.name);
            self.index.insert(entry.path.clone(), child_id);
            self.nodes.push(TreeNode {
                name: entry.name,
                path: entry.path,
                is_dir: entry.is_dir,
                parent: Some(id),
                children: Vec::new(),
                depth,
                expanded: false,
                loaded: false,
                deferred,
                selection: inherited,
                counts: None,
            });
            self.nodes[id].children.push(child_id);
            outcome.added += 1;
        }

        self.nodes[id].loaded = true;
        self.invalidate_counts(id);
        self.scan_failures += outcome.failures.len();

        tracing::debug!(
            dir = %dir.display(),
            added = outcome.added,
            failures = outcome.failures.len(),
            "directory loaded"
        );
        outcome
    }

    /// Toggle the expanded flag of the directory at `path`.
    ///
    /// Returns the scan outcome when expanding triggered a first load.
    pub fn expand(&mut self, path: &Path) -> Option<ScanOutcome> {
        let id = self.lookup(path)?;
        self.toggle_expanded(id)
    }

    /// Id-based form of [`TreeModel::expand`].
    ///
    /// Files are ignored and the root always stays expanded. A first
    /// expansion scans one level only, deferred directories included.
    pub fn toggle_expanded(&mut self, id: NodeId) -> Option<ScanOutcome> {
        if !self.nodes[id].is_dir || id == self.root {
            return None;
        }
        let node = &mut self.nodes[id];
        node.expanded = !node.expanded;
        if node.expanded && !node.loaded {
            if node.deferred {
                tracing::debug!(path = %node.path.display(), "scanning deferred directory");
            }
            return Some(self.load_children(id));
        }
        None
    }

    /// Collapse an expanded directory. Returns `true` if anything changed.
    pub fn collapse(&mut self, id: NodeId) -> bool {
        if id == self.root {
            return false;
        }
        let node = &mut self.nodes[id];
        if node.is_dir && node.expanded {
            node.expanded = false;
            return true;
        }
        false
    }

    /// Find the node for an absolute path.
    pub fn lookup(&self, path: &Path) -> Option<NodeId> {
        self.index.get(path).copied()
    }

    pub fn node(&self, id: NodeId) -> &TreeNode {
        &self.nodes[id]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut TreeNode {
        &mut self.nodes[id]
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Total number of nodes created so far.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Number of entries that failed to scan over the whole session.
    pub fn scan_failures(&self) -> usize {
        self.scan_failures
    }

    /// File and entry counts below `id`, computed once and cached until a
    /// load happens somewhere in the subtree.
    pub fn descendant_counts(&mut self, id: NodeId) -> DescendantCounts {
        if let Some(counts) = self.nodes[id].counts {
            return counts;
        }
        let mut counts = DescendantCounts::default();
        let mut stack: Vec<NodeId> = self.nodes[id].children.clone();
        while let Some(current) = stack.pop() {
            let node = &self.nodes[current];
            counts.total += 1;
            if !node.is_dir {
                counts.files += 1;
            }
            stack.extend_from_slice(&node.children);
        }
        self.nodes[id].counts = Some(counts);
        counts
    }

    fn invalidate_counts(&mut self, id: NodeId) {
        let mut current = Some(id);
        while let Some(c) = current {
            self.nodes[c].counts = None;
            current = self.nodes[c].parent;
        }
    }
}
