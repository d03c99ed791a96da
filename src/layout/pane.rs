//! Binary split tree of panes.
//!
//! Every zone of the layout is a [`PaneTree`]: an arena of nodes where each
//! node is either a two-child [`SplitNode`] or a leaf. The tree is generic
//! over the leaf payload because it is used twice:
//!
//! - the outer arrangement of zones around the document area stores a
//!   [`Position`](super::Position) per leaf,
//! - each zone's inner tree stores a [`WindowGroup`] (a tabbed stack of
//!   windows) per leaf.
//!
//! Structural rules:
//!
//! - Splits always have exactly two children; removing one child dissolves
//!   the split and promotes the survivor.
//! - A parent index is kept in a [`SecondaryMap`] so upward walks never
//!   search.
//! - Node rects are cached from the last [`relayout`](PaneTree::relayout)
//!   and read by hit testing and hint capture.

use std::collections::BTreeSet;
use std::fmt::{self, Write as _};

use slotmap::{new_key_type, SecondaryMap, SlotMap};

use crate::geometry::{Orientation, Rect};
use crate::window::{DockSide, WindowId, WindowKind};

new_key_type! {
    /// Key of a node in a [`PaneTree`].
    pub struct PaneKey;
}

/// Smallest share of a split either child can hold.
pub const MIN_RATIO: f64 = 0.05;

/// An inner node arranging two children along one axis.
#[derive(Debug, Clone)]
pub struct SplitNode {
    pub orientation: Orientation,
    pub children: [PaneKey; 2],
    /// Share of the split's extent given to the first child.
    pub ratio: f64,
    /// Whether the first child is the anchored one that keeps its size when
    /// the split as a whole is resized.
    pub primary_first: bool,
}

/// A node of the tree.
#[derive(Debug, Clone)]
pub enum PaneNode<L> {
    Split(SplitNode),
    Leaf(L),
}

/// A tabbed stack of windows sharing one pane.
///
/// All members have the same [`WindowKind`]; exactly one member is selected.
/// Groups are never empty while in a tree.
#[derive(Debug, Clone)]
pub struct WindowGroup {
    kind: WindowKind,
    windows: Vec<WindowId>,
    selected: usize,
}

impl WindowGroup {
    pub fn new(kind: WindowKind, window: WindowId) -> Self {
        Self {
            kind,
            windows: vec![window],
            selected: 0,
        }
    }

    /// Rebuilds a group from persisted parts. The selection is clamped.
    pub fn from_parts(kind: WindowKind, windows: Vec<WindowId>, selected: usize) -> Self {
        let selected = selected.min(windows.len().saturating_sub(1));
        Self {
            kind,
            windows,
            selected,
        }
    }

    pub fn kind(&self) -> WindowKind {
        self.kind
    }

    pub fn windows(&self) -> &[WindowId] {
        &self.windows
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    pub fn contains(&self, id: &WindowId) -> bool {
        self.windows.iter().any(|w| w == id)
    }

    pub fn position_of(&self, id: &WindowId) -> Option<usize> {
        self.windows.iter().position(|w| w == id)
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected_window(&self) -> &WindowId {
        &self.windows[self.selected]
    }

    /// Appends a window as the last tab without touching the selection.
    pub fn add(&mut self, id: WindowId) {
        debug_assert!(!self.contains(&id), "window already in group");
        self.windows.push(id);
    }

    /// Inserts a window at the given tab index, keeping the selected window
    /// selected.
    pub fn insert(&mut self, index: usize, id: WindowId) {
        debug_assert!(!self.contains(&id), "window already in group");
        let index = index.min(self.windows.len());
        self.windows.insert(index, id);
        if index <= self.selected {
            self.selected += 1;
        }
    }

    /// Removes a window. Returns false if it was not a member.
    pub fn remove(&mut self, id: &WindowId) -> bool {
        let Some(index) = self.position_of(id) else {
            return false;
        };
        self.windows.remove(index);
        if index < self.selected {
            self.selected -= 1;
        }
        self.selected = self.selected.min(self.windows.len().saturating_sub(1));
        true
    }

    /// Selects the given window. Returns the previously selected window if
    /// the selection actually moved.
    pub fn select(&mut self, id: &WindowId) -> Option<WindowId> {
        let index = self.position_of(id)?;
        if index == self.selected {
            return None;
        }
        let previous = self.windows[self.selected].clone();
        self.selected = index;
        Some(previous)
    }

    /// Replaces a window id in place, keeping its tab position and the
    /// selection. Returns false if `old` is not a member.
    pub(crate) fn rename(&mut self, old: &WindowId, new: WindowId) -> bool {
        let Some(index) = self.position_of(old) else {
            return false;
        };
        self.windows[index] = new;
        true
    }

    /// Moves the tab at `from` to `to`, keeping the selected window selected.
    pub fn move_tab(&mut self, from: usize, to: usize) {
        if from == to || from >= self.windows.len() || to >= self.windows.len() {
            return;
        }
        let selected_id = self.windows[self.selected].clone();
        let window = self.windows.remove(from);
        self.windows.insert(to, window);
        self.selected = self
            .windows
            .iter()
            .position(|w| *w == selected_id)
            .unwrap_or(0);
    }

    pub fn into_parts(self) -> (Vec<WindowId>, usize) {
        (self.windows, self.selected)
    }
}

impl fmt::Display for WindowGroup {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let label = match self.kind {
            WindowKind::Dockable => "group",
            WindowKind::Document => "documents",
        };
        write!(f, "{label} [")?;
        for (i, window) in self.windows.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{window}")?;
            if i == self.selected {
                write!(f, "*")?;
            }
        }
        write!(f, "]")
    }
}

/// A subtree pulled out of a [`PaneTree`], keyless and self-contained.
///
/// Used to move whole panes between zones and to rebuild trees from
/// persisted layouts.
#[derive(Debug)]
pub enum DetachedPane<L> {
    Leaf(L),
    Split {
        orientation: Orientation,
        ratio: f64,
        primary_first: bool,
        children: Box<[DetachedPane<L>; 2]>,
    },
}

impl<L> DetachedPane<L> {
    pub fn leaf_count(&self) -> usize {
        match self {
            DetachedPane::Leaf(_) => 1,
            DetachedPane::Split { children, .. } => {
                children[0].leaf_count() + children[1].leaf_count()
            }
        }
    }

    pub fn leaves(&self) -> Vec<&L> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a L>) {
        match self {
            DetachedPane::Leaf(leaf) => out.push(leaf),
            DetachedPane::Split { children, .. } => {
                children[0].collect_leaves(out);
                children[1].collect_leaves(out);
            }
        }
    }
}

impl DetachedPane<WindowGroup> {
    /// All windows in the subtree, in pane and tab order.
    pub fn windows(&self) -> Vec<WindowId> {
        self.leaves()
            .iter()
            .flat_map(|g| g.windows().iter().cloned())
            .collect()
    }

    pub fn kind(&self) -> WindowKind {
        match self {
            DetachedPane::Leaf(group) => group.kind(),
            DetachedPane::Split { children, .. } => children[0].kind(),
        }
    }
}

/// The arena tree itself.
#[derive(Debug, Clone)]
pub struct PaneTree<L> {
    nodes: SlotMap<PaneKey, PaneNode<L>>,
    parents: SecondaryMap<PaneKey, PaneKey>,
    rects: SecondaryMap<PaneKey, Rect>,
    root: Option<PaneKey>,
}

impl<L> PaneTree<L> {
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            parents: SecondaryMap::new(),
            rects: SecondaryMap::new(),
            root: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn root(&self) -> Option<PaneKey> {
        self.root
    }

    pub fn contains(&self, key: PaneKey) -> bool {
        self.nodes.contains_key(key)
    }

    pub fn get(&self, key: PaneKey) -> Option<&PaneNode<L>> {
        self.nodes.get(key)
    }

    pub fn parent(&self, key: PaneKey) -> Option<PaneKey> {
        self.parents.get(key).copied()
    }

    /// The leaf payload at `key`, or None if the node is a split.
    pub fn leaf(&self, key: PaneKey) -> Option<&L> {
        match self.nodes.get(key)? {
            PaneNode::Leaf(leaf) => Some(leaf),
            PaneNode::Split(_) => None,
        }
    }

    pub fn leaf_mut(&mut self, key: PaneKey) -> Option<&mut L> {
        match self.nodes.get_mut(key)? {
            PaneNode::Leaf(leaf) => Some(leaf),
            PaneNode::Split(_) => None,
        }
    }

    pub fn split(&self, key: PaneKey) -> Option<&SplitNode> {
        match self.nodes.get(key)? {
            PaneNode::Split(split) => Some(split),
            PaneNode::Leaf(_) => None,
        }
    }

    /// Leaf keys in depth-first order, first child before second.
    pub fn leaves(&self) -> Vec<PaneKey> {
        let mut out = Vec::new();
        if let Some(root) = self.root {
            self.collect_leaves(root, &mut out);
        }
        out
    }

    fn collect_leaves(&self, key: PaneKey, out: &mut Vec<PaneKey>) {
        match &self.nodes[key] {
            PaneNode::Leaf(_) => out.push(key),
            PaneNode::Split(split) => {
                self.collect_leaves(split.children[0], out);
                self.collect_leaves(split.children[1], out);
            }
        }
    }

    pub fn first_leaf(&self) -> Option<PaneKey> {
        let mut key = self.root?;
        loop {
            match &self.nodes[key] {
                PaneNode::Leaf(_) => return Some(key),
                PaneNode::Split(split) => key = split.children[0],
            }
        }
    }

    /// Docks a new leaf at `edge` of `target`, giving it `ratio` of the
    /// resulting split. With no target the whole tree is split; on an empty
    /// tree the leaf becomes the root and `edge`/`ratio` are ignored.
    pub fn dock_leaf(&mut self, target: Option<PaneKey>, edge: DockSide, leaf: L, ratio: f64) -> PaneKey {
        let new_key = self.nodes.insert(PaneNode::Leaf(leaf));
        self.place(new_key, target, edge, ratio);
        new_key
    }

    /// Grafts a detached subtree at `edge` of `target`, like
    /// [`dock_leaf`](Self::dock_leaf).
    pub fn attach(
        &mut self,
        target: Option<PaneKey>,
        edge: DockSide,
        sub: DetachedPane<L>,
        ratio: f64,
    ) -> PaneKey {
        let new_key = self.graft(sub);
        self.place(new_key, target, edge, ratio);
        new_key
    }

    fn place(&mut self, new_key: PaneKey, target: Option<PaneKey>, edge: DockSide, ratio: f64) {
        let target = target.or(self.root).filter(|&t| t != new_key);
        match target {
            Some(target) => self.insert_at(target, edge, new_key, ratio),
            None => {
                debug_assert!(self.root.is_none(), "tree has a root but no target");
                self.root = Some(new_key);
            }
        }
    }

    fn insert_at(&mut self, target: PaneKey, edge: DockSide, new_key: PaneKey, ratio: f64) {
        let ratio = ratio.clamp(MIN_RATIO, 1. - MIN_RATIO);
        let new_first = edge.docks_first();
        let (children, first_ratio) = if new_first {
            ([new_key, target], ratio)
        } else {
            ([target, new_key], 1. - ratio)
        };
        let split = SplitNode {
            orientation: edge.orientation(),
            children,
            ratio: first_ratio,
            primary_first: new_first,
        };

        let parent = self.parents.get(target).copied();
        let split_key = self.nodes.insert(PaneNode::Split(split));
        match parent {
            Some(parent) => {
                if let Some(PaneNode::Split(ps)) = self.nodes.get_mut(parent) {
                    for child in &mut ps.children {
                        if *child == target {
                            *child = split_key;
                        }
                    }
                }
                self.parents.insert(split_key, parent);
            }
            None => self.root = Some(split_key),
        }
        self.parents.insert(target, split_key);
        self.parents.insert(new_key, split_key);
    }

    fn graft(&mut self, sub: DetachedPane<L>) -> PaneKey {
        match sub {
            DetachedPane::Leaf(leaf) => self.nodes.insert(PaneNode::Leaf(leaf)),
            DetachedPane::Split {
                orientation,
                ratio,
                primary_first,
                children,
            } => {
                let [first, second] = *children;
                let a = self.graft(first);
                let b = self.graft(second);
                let key = self.nodes.insert(PaneNode::Split(SplitNode {
                    orientation,
                    children: [a, b],
                    ratio,
                    primary_first,
                }));
                self.parents.insert(a, key);
                self.parents.insert(b, key);
                key
            }
        }
    }

    /// Removes a leaf, dissolving its parent split.
    pub fn remove_leaf(&mut self, key: PaneKey) -> L {
        assert!(
            matches!(self.nodes.get(key), Some(PaneNode::Leaf(_))),
            "remove_leaf on a non-leaf node"
        );
        self.splice_out(key);
        self.rects.remove(key);
        match self.nodes.remove(key) {
            Some(PaneNode::Leaf(leaf)) => leaf,
            _ => unreachable!(),
        }
    }

    /// Pulls the subtree rooted at `key` out of the tree.
    pub fn detach(&mut self, key: PaneKey) -> DetachedPane<L> {
        assert!(self.nodes.contains_key(key), "detach of an unknown node");
        self.splice_out(key);
        self.take_subtree(key)
    }

    /// Unlinks `key` from its parent, promoting the sibling. The subtree
    /// under `key` stays in the arena, unreferenced.
    fn splice_out(&mut self, key: PaneKey) {
        let parent = self.parents.get(key).copied();
        self.parents.remove(key);
        let Some(split_key) = parent else {
            self.root = None;
            return;
        };

        let sibling = match &self.nodes[split_key] {
            PaneNode::Split(split) => {
                if split.children[0] == key {
                    split.children[1]
                } else {
                    split.children[0]
                }
            }
            PaneNode::Leaf(_) => panic!("parent index points at a leaf"),
        };

        let grand = self.parents.get(split_key).copied();
        self.nodes.remove(split_key);
        self.rects.remove(split_key);
        self.parents.remove(split_key);
        match grand {
            None => {
                self.root = Some(sibling);
                self.parents.remove(sibling);
            }
            Some(grand) => {
                if let Some(PaneNode::Split(gs)) = self.nodes.get_mut(grand) {
                    for child in &mut gs.children {
                        if *child == split_key {
                            *child = sibling;
                        }
                    }
                }
                self.parents.insert(sibling, grand);
            }
        }
    }

    fn take_subtree(&mut self, key: PaneKey) -> DetachedPane<L> {
        self.rects.remove(key);
        self.parents.remove(key);
        match self.nodes.remove(key) {
            Some(PaneNode::Leaf(leaf)) => DetachedPane::Leaf(leaf),
            Some(PaneNode::Split(split)) => {
                let first = self.take_subtree(split.children[0]);
                let second = self.take_subtree(split.children[1]);
                DetachedPane::Split {
                    orientation: split.orientation,
                    ratio: split.ratio,
                    primary_first: split.primary_first,
                    children: Box::new([first, second]),
                }
            }
            None => panic!("detached node missing from the arena"),
        }
    }

    /// Copies the whole tree out as a detached subtree, or None when empty.
    pub fn to_detached(&self) -> Option<DetachedPane<L>>
    where
        L: Clone,
    {
        self.root.map(|root| self.clone_subtree(root))
    }

    fn clone_subtree(&self, key: PaneKey) -> DetachedPane<L>
    where
        L: Clone,
    {
        match &self.nodes[key] {
            PaneNode::Leaf(leaf) => DetachedPane::Leaf(leaf.clone()),
            PaneNode::Split(split) => DetachedPane::Split {
                orientation: split.orientation,
                ratio: split.ratio,
                primary_first: split.primary_first,
                children: Box::new([
                    self.clone_subtree(split.children[0]),
                    self.clone_subtree(split.children[1]),
                ]),
            },
        }
    }

    /// Adjusts the first-child share of a split.
    pub fn set_ratio(&mut self, key: PaneKey, ratio: f64) {
        if let Some(PaneNode::Split(split)) = self.nodes.get_mut(key) {
            split.ratio = ratio.clamp(MIN_RATIO, 1. - MIN_RATIO);
        }
    }

    /// Rect computed for `key` by the last relayout.
    pub fn rect_of(&self, key: PaneKey) -> Option<Rect> {
        self.rects.get(key).copied()
    }

    /// Recomputes the rect of every node from the split ratios.
    pub fn relayout(&mut self, rect: Rect) {
        if let Some(root) = self.root {
            self.layout_node(root, rect);
        }
    }

    fn layout_node(&mut self, key: PaneKey, rect: Rect) {
        self.rects.insert(key, rect);
        let (orientation, ratio, children) = match &self.nodes[key] {
            PaneNode::Leaf(_) => return,
            PaneNode::Split(split) => (split.orientation, split.ratio, split.children),
        };
        let (first, second) = split_rect(rect, orientation, ratio);
        self.layout_node(children[0], first);
        self.layout_node(children[1], second);
    }

    /// The leaf whose rect contains `point`, if any.
    pub fn leaf_at(&self, point: crate::geometry::Point) -> Option<PaneKey> {
        self.leaves()
            .into_iter()
            .find(|&key| self.rects.get(key).is_some_and(|r| r.contains(point)))
    }

    /// Checks arena and parent-index consistency. Panics on violation.
    pub fn verify_invariants(&self) {
        let Some(root) = self.root else {
            assert!(self.nodes.is_empty(), "nodes in a rootless tree");
            return;
        };
        assert!(
            self.parents.get(root).is_none(),
            "root must not have a parent"
        );

        let mut seen = 0;
        let mut stack = vec![root];
        while let Some(key) = stack.pop() {
            seen += 1;
            if let PaneNode::Split(split) = &self.nodes[key] {
                assert!(
                    split.ratio > 0. && split.ratio < 1.,
                    "split ratio out of range: {}",
                    split.ratio
                );
                assert_ne!(
                    split.children[0], split.children[1],
                    "split children must differ"
                );
                for &child in &split.children {
                    assert!(self.nodes.contains_key(child), "dangling child key");
                    assert_eq!(
                        self.parents.get(child).copied(),
                        Some(key),
                        "parent index out of sync"
                    );
                    stack.push(child);
                }
            }
        }
        assert_eq!(seen, self.nodes.len(), "unreachable nodes in the arena");
    }

    /// Writes an indented description of the tree for snapshots.
    pub fn write_debug(&self, out: &mut String, indent: usize)
    where
        L: fmt::Display,
    {
        match self.root {
            None => {
                let pad = "  ".repeat(indent);
                let _ = writeln!(out, "{pad}(empty)");
            }
            Some(root) => self.write_node(out, root, indent),
        }
    }

    fn write_node(&self, out: &mut String, key: PaneKey, indent: usize)
    where
        L: fmt::Display,
    {
        let pad = "  ".repeat(indent);
        match &self.nodes[key] {
            PaneNode::Leaf(leaf) => {
                let _ = writeln!(out, "{pad}{leaf}");
            }
            PaneNode::Split(split) => {
                let axis = match split.orientation {
                    Orientation::Horizontal => "h",
                    Orientation::Vertical => "v",
                };
                let _ = writeln!(out, "{pad}split {axis} {:.2}", split.ratio);
                self.write_node(out, split.children[0], indent + 1);
                self.write_node(out, split.children[1], indent + 1);
            }
        }
    }
}

impl PaneTree<WindowGroup> {
    /// The pane holding `id`, if any.
    pub fn find_window(&self, id: &WindowId) -> Option<PaneKey> {
        self.leaves()
            .into_iter()
            .find(|&key| self.leaf(key).is_some_and(|g| g.contains(id)))
    }

    /// All windows in the tree, in pane and tab order.
    pub fn windows(&self) -> Vec<WindowId> {
        self.leaves()
            .into_iter()
            .flat_map(|key| match self.leaf(key) {
                Some(group) => group.windows().to_vec(),
                None => Vec::new(),
            })
            .collect()
    }

    pub fn window_count(&self) -> usize {
        self.leaves()
            .into_iter()
            .map(|key| self.leaf(key).map_or(0, WindowGroup::len))
            .sum()
    }

    /// [`verify_invariants`](Self::verify_invariants) plus group rules:
    /// groups are non-empty with a valid selection and no window appears
    /// twice.
    pub fn verify_window_invariants(&self) {
        self.verify_invariants();
        let mut seen = BTreeSet::new();
        for key in self.leaves() {
            let Some(group) = self.leaf(key) else {
                panic!("leaves() returned a split")
            };
            assert!(!group.is_empty(), "empty window group in tree");
            assert!(
                group.selected_index() < group.len(),
                "selection out of range"
            );
            for window in group.windows() {
                assert!(seen.insert(window.clone()), "window {window} in two panes");
            }
        }
    }
}

fn split_rect(rect: Rect, orientation: Orientation, ratio: f64) -> (Rect, Rect) {
    match orientation {
        Orientation::Horizontal => {
            let first_w = rect.size.w * ratio;
            (
                Rect::new(rect.loc.x, rect.loc.y, first_w, rect.size.h),
                Rect::new(
                    rect.loc.x + first_w,
                    rect.loc.y,
                    rect.size.w - first_w,
                    rect.size.h,
                ),
            )
        }
        Orientation::Vertical => {
            let first_h = rect.size.h * ratio;
            (
                Rect::new(rect.loc.x, rect.loc.y, rect.size.w, first_h),
                Rect::new(
                    rect.loc.x,
                    rect.loc.y + first_h,
                    rect.size.w,
                    rect.size.h - first_h,
                ),
            )
        }
    }
}
