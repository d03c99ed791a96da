//! Layout documents.
//!
//! A saved layout is an attributed tree ([`Memento`]) serialized as JSON:
//! every node has a kind, a string attribute map, and child nodes. The
//! document root carries `layoutHint` records, `floatingFrame` records,
//! `autoHideItemContainer` records, one `layoutContainer` holding the docked
//! pane tree (`splitPane` nodes over `tiledContainer` zone leaves, which in
//! turn hold `splitPane` nodes over `documentContainer` and
//! `combinedDockableContainer` group leaves), and an `activeWindow`
//! reference.
//!
//! Loading parses a whole document into a [`RestorePlan`] before any live
//! state is touched, so a malformed document never leaves a half-restored
//! layout behind. Unknown window names inside a valid document are skipped
//! with a warning; split children whose windows all disappeared collapse
//! into their sibling.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::geometry::{Orientation, Rect, Size};
use crate::layout::hints::LayoutHint;
use crate::layout::pane::{DetachedPane, WindowGroup, MIN_RATIO};
use crate::layout::{LayoutContainer, LayoutOptions, OuterNode, Position};
use crate::window::{DockSide, DockState, WindowHandle, WindowId, WindowKind};
use crate::LayoutError;

/// One node of the attributed-tree document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Memento {
    pub kind: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Memento>,
}

impl Memento {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            attrs: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    pub fn put(&mut self, key: &str, value: impl fmt::Display) {
        self.attrs.insert(key.to_owned(), value.to_string());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).map(String::as_str)
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.get(key)?.parse().ok()
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key)?.parse().ok()
    }

    /// Appends a new empty child and returns it for filling in.
    pub fn add_child(&mut self, kind: &str) -> &mut Memento {
        self.children.push(Memento::new(kind));
        self.children.last_mut().unwrap()
    }

    pub fn push(&mut self, child: Memento) {
        self.children.push(child);
    }

    pub fn child(&self, kind: &str) -> Option<&Memento> {
        self.children.iter().find(|c| c.kind == kind)
    }

    pub fn children_of<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = &'a Memento> + 'a {
        self.children.iter().filter(move |c| c.kind == kind)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap()
    }

    pub fn from_json(input: &str) -> Result<Self, LayoutError> {
        serde_json::from_str(input).map_err(|err| LayoutError::Parse(err.to_string()))
    }
}

// =============================================================================
// Saving

/// Writes the whole arrangement into a `layout` document. Hints are taken
/// as they are; the caller refreshes them for shown windows first.
pub(crate) fn save_document(
    layout: &LayoutContainer,
    windows: &BTreeMap<WindowId, WindowHandle>,
    active: Option<&WindowId>,
) -> Memento {
    let mut doc = Memento::new("layout");

    for id in windows.keys() {
        if let Some(hint) = layout.hint(id) {
            doc.push(hint_node(id, hint));
        }
    }

    for frame in layout.floating() {
        let bounds = frame.bounds();
        let node = doc.add_child("floatingFrame");
        node.put("x", bounds.loc.x);
        node.put("y", bounds.loc.y);
        node.put("width", bounds.size.w);
        node.put("height", bounds.size.h);
        node.push(group_node(frame.group()));
    }

    for side in DockSide::ALL {
        let items = layout.strips().items(side);
        if items.is_empty() {
            continue;
        }
        let node = doc.add_child("autoHideItemContainer");
        node.put("position", Position::from(side).as_str());
        for item in items {
            let entry = node.add_child("autoHideItem");
            for id in item.windows() {
                entry.push(window_ref(id));
            }
            entry.put("selectedWindow", item.selected_window());
        }
    }

    let container = doc.add_child("layoutContainer");
    if let Some(root) = layout.snapshot_outer() {
        container.push(outer_node(&root));
    }

    if let Some(active) = active {
        doc.put("activeWindow", active);
    }
    doc
}

fn window_ref(id: &WindowId) -> Memento {
    let mut node = Memento::new("window");
    node.put("name", id);
    node
}

fn group_node(group: &WindowGroup) -> Memento {
    let mut node = Memento::new("pane");
    node.put(
        "type",
        match group.kind() {
            WindowKind::Dockable => "combinedDockableContainer",
            WindowKind::Document => "documentContainer",
        },
    );
    for id in group.windows() {
        node.push(window_ref(id));
    }
    node.put("selectedWindow", group.selected_window());
    node
}

fn inner_node(pane: &DetachedPane<WindowGroup>) -> Memento {
    match pane {
        DetachedPane::Leaf(group) => group_node(group),
        DetachedPane::Split {
            orientation,
            ratio,
            primary_first,
            children,
        } => {
            let mut node = split_node(*orientation, *ratio, *primary_first);
            node.push(inner_node(&children[0]));
            node.push(inner_node(&children[1]));
            node
        }
    }
}

fn outer_node(node: &OuterNode) -> Memento {
    match node {
        OuterNode::Zone { position, tree } => {
            let mut out = Memento::new("pane");
            out.put("type", "tiledContainer");
            out.put("position", position.as_str());
            if let Some(tree) = tree {
                out.push(inner_node(tree));
            }
            out
        }
        OuterNode::Split {
            orientation,
            ratio,
            primary_first,
            children,
        } => {
            let mut out = split_node(*orientation, *ratio, *primary_first);
            out.push(outer_node(&children[0]));
            out.push(outer_node(&children[1]));
            out
        }
    }
}

fn split_node(orientation: Orientation, ratio: f64, primary_first: bool) -> Memento {
    let mut node = Memento::new("pane");
    node.put("type", "splitPane");
    node.put("orientation", orientation.as_str());
    node.put("weight", ratio);
    node.put("primaryFirst", primary_first);
    node
}

fn hint_node(id: &WindowId, hint: &LayoutHint) -> Memento {
    let mut node = Memento::new("layoutHint");
    node.put("window", id);
    node.put("dockState", hint.dock_state.as_str());
    for sibling in &hint.siblings {
        node.add_child("sibling").put("name", sibling);
    }
    for prev in &hint.prev_neighbors {
        node.add_child("prev").put("name", prev);
    }
    for next in &hint.next_neighbors {
        node.add_child("next").put("name", next);
    }
    if let Some(position) = hint.container_position {
        node.put("containerPosition", position.as_str());
    }
    node.put("containerDominance", hint.container_dominance);
    if let Some(ratio) = hint.container_ratio {
        node.put("containerRatioW", ratio.w);
        node.put("containerRatioH", ratio.h);
    }
    if let Some(ratio) = hint.pane_ratio {
        node.put("paneRatioW", ratio.w);
        node.put("paneRatioH", ratio.h);
    }
    if let Some(edge) = hint.anchor_edge {
        node.put("anchor", Position::from(edge).as_str());
    }
    if let Some(bounds) = hint.floating_bounds {
        let fb = node.add_child("floatingBounds");
        fb.put("x", bounds.loc.x);
        fb.put("y", bounds.loc.y);
        fb.put("width", bounds.size.w);
        fb.put("height", bounds.size.h);
    }
    if let Some(size) = hint.auto_hide_size {
        node.put("autoHideWidth", size.w);
        node.put("autoHideHeight", size.h);
    }
    node
}

// =============================================================================
// Loading

/// Everything a document describes, resolved against the window registry
/// and ready to apply.
#[derive(Debug, Default)]
pub(crate) struct RestorePlan {
    pub hints: Vec<(WindowId, LayoutHint)>,
    pub floating: Vec<(WindowGroup, Rect)>,
    pub strips: Vec<(DockSide, WindowGroup)>,
    pub outer: Option<OuterNode>,
    pub active: Option<WindowId>,
}

impl RestorePlan {
    /// All windows the restored arrangement will host.
    pub(crate) fn windows(&self) -> Vec<WindowId> {
        let mut out = Vec::new();
        for (group, _) in &self.floating {
            out.extend(group.windows().iter().cloned());
        }
        for (_, group) in &self.strips {
            out.extend(group.windows().iter().cloned());
        }
        if let Some(outer) = &self.outer {
            collect_outer_windows(outer, &mut out);
        }
        out
    }
}

fn collect_outer_windows(node: &OuterNode, out: &mut Vec<WindowId>) {
    match node {
        OuterNode::Split { children, .. } => {
            collect_outer_windows(&children[0], out);
            collect_outer_windows(&children[1], out);
        }
        OuterNode::Zone { tree, .. } => {
            if let Some(tree) = tree {
                out.extend(tree.windows());
            }
        }
    }
}

/// Parses a document against the given registry. Structural problems are
/// errors; unknown or misplaced window references are skipped with a warn.
pub(crate) fn parse_plan(
    doc: &Memento,
    known: &BTreeMap<WindowId, WindowHandle>,
    options: &LayoutOptions,
) -> Result<RestorePlan, LayoutError> {
    let mut claimed = BTreeSet::new();
    let mut plan = RestorePlan::default();

    for node in doc.children_of("layoutHint") {
        let Some((id, hint)) = parse_hint(node) else {
            warn!("layout hint without a window reference, skipped");
            continue;
        };
        if !known.contains_key(&id) {
            warn!("layout hint for unknown window {id}, skipped");
            continue;
        }
        plan.hints.push((id, hint));
    }

    for node in doc.children_of("floatingFrame") {
        let Some(pane) = node.child("pane") else {
            continue;
        };
        let Some(group) = parse_group(pane, WindowKind::Dockable, known, &mut claimed) else {
            continue;
        };
        let bounds = Rect::new(
            node.get_f64("x").unwrap_or(0.),
            node.get_f64("y").unwrap_or(0.),
            node.get_f64("width")
                .unwrap_or(options.default_float_size.w),
            node.get_f64("height")
                .unwrap_or(options.default_float_size.h),
        );
        plan.floating.push((group, bounds));
    }

    for node in doc.children_of("autoHideItemContainer") {
        let side = node
            .get("position")
            .and_then(Position::from_str)
            .and_then(Position::edge)
            .unwrap_or(DockSide::Right);
        for item in node.children_of("autoHideItem") {
            if let Some(group) = parse_group(item, WindowKind::Dockable, known, &mut claimed) {
                plan.strips.push((side, group));
            }
        }
    }

    if let Some(container) = doc.child("layoutContainer") {
        if let Some(root) = container.child("pane") {
            plan.outer = parse_outer(root, known, &mut claimed)?;
        }
    }

    plan.active = doc
        .get("activeWindow")
        .map(WindowId::from)
        .filter(|id| known.contains_key(id));
    Ok(plan)
}

fn parse_hint(node: &Memento) -> Option<(WindowId, LayoutHint)> {
    let id = WindowId::from(node.get("window")?);
    let state = node
        .get("dockState")
        .and_then(DockState::from_str)
        .unwrap_or(DockState::Docked);
    let mut hint = LayoutHint::new(state);
    hint.siblings = names_of(node, "sibling");
    hint.prev_neighbors = names_of(node, "prev");
    hint.next_neighbors = names_of(node, "next");
    hint.container_position = node.get("containerPosition").and_then(Position::from_str);
    hint.container_dominance = node
        .get("containerDominance")
        .and_then(|v| v.parse().ok())
        .unwrap_or(4);
    hint.container_ratio = size_attrs(node, "containerRatioW", "containerRatioH");
    hint.pane_ratio = size_attrs(node, "paneRatioW", "paneRatioH");
    hint.anchor_edge = node
        .get("anchor")
        .and_then(Position::from_str)
        .and_then(Position::edge);
    hint.floating_bounds = node.child("floatingBounds").and_then(rect_attrs);
    hint.auto_hide_size = size_attrs(node, "autoHideWidth", "autoHideHeight");
    Some((id, hint))
}

fn names_of(node: &Memento, kind: &str) -> Vec<WindowId> {
    node.children_of(kind)
        .filter_map(|c| c.get("name"))
        .map(WindowId::from)
        .collect()
}

fn size_attrs(node: &Memento, w: &str, h: &str) -> Option<Size> {
    Some(Size::new(node.get_f64(w)?, node.get_f64(h)?))
}

fn rect_attrs(node: &Memento) -> Option<Rect> {
    Some(Rect::new(
        node.get_f64("x")?,
        node.get_f64("y")?,
        node.get_f64("width")?,
        node.get_f64("height")?,
    ))
}

/// Resolves the window refs of a group leaf. Unknown windows, windows of
/// the wrong kind and windows already claimed by an earlier node are
/// dropped; a group left with no windows dissolves.
fn parse_group(
    node: &Memento,
    kind: WindowKind,
    known: &BTreeMap<WindowId, WindowHandle>,
    claimed: &mut BTreeSet<WindowId>,
) -> Option<WindowGroup> {
    let mut ids = Vec::new();
    for child in node.children_of("window") {
        let Some(name) = child.get("name") else {
            continue;
        };
        let id = WindowId::from(name);
        match known.get(&id) {
            Some(handle) if handle.kind() != kind => {
                warn!("window {name} has the wrong kind for its pane, skipped");
            }
            Some(_) => {
                if claimed.insert(id.clone()) {
                    ids.push(id);
                } else {
                    warn!("window {name} is listed twice in the document, skipped");
                }
            }
            None => warn!("unknown window {name} in layout document, skipped"),
        }
    }
    if ids.is_empty() {
        return None;
    }
    let selected = node
        .get("selectedWindow")
        .map(WindowId::from)
        .and_then(|sel| ids.iter().position(|id| *id == sel))
        .unwrap_or(0);
    Some(WindowGroup::from_parts(kind, ids, selected))
}

fn parse_split_attrs(node: &Memento) -> (Orientation, f64, bool) {
    let orientation = node
        .get("orientation")
        .and_then(Orientation::from_str)
        .unwrap_or(Orientation::Horizontal);
    let ratio = node
        .get_f64("weight")
        .unwrap_or(0.5)
        .clamp(MIN_RATIO, 1. - MIN_RATIO);
    let primary_first = node.get_bool("primaryFirst").unwrap_or(true);
    (orientation, ratio, primary_first)
}

fn parse_inner(
    node: &Memento,
    expected: WindowKind,
    known: &BTreeMap<WindowId, WindowHandle>,
    claimed: &mut BTreeSet<WindowId>,
) -> Result<Option<DetachedPane<WindowGroup>>, LayoutError> {
    match node.get("type") {
        Some("splitPane") => {
            let mut panes = node.children_of("pane");
            let (Some(first), Some(second)) = (panes.next(), panes.next()) else {
                return Err(LayoutError::Parse(
                    "splitPane without two children".to_owned(),
                ));
            };
            let first = parse_inner(first, expected, known, claimed)?;
            let second = parse_inner(second, expected, known, claimed)?;
            let (orientation, ratio, primary_first) = parse_split_attrs(node);
            Ok(match (first, second) {
                (Some(a), Some(b)) => Some(DetachedPane::Split {
                    orientation,
                    ratio,
                    primary_first,
                    children: Box::new([a, b]),
                }),
                (Some(a), None) => Some(a),
                (None, Some(b)) => Some(b),
                (None, None) => None,
            })
        }
        Some("combinedDockableContainer") if expected == WindowKind::Dockable => {
            Ok(parse_group(node, expected, known, claimed).map(DetachedPane::Leaf))
        }
        Some("documentContainer") if expected == WindowKind::Document => {
            Ok(parse_group(node, expected, known, claimed).map(DetachedPane::Leaf))
        }
        Some("combinedDockableContainer") => Err(LayoutError::Parse(
            "dockable pane inside the document zone".to_owned(),
        )),
        Some("documentContainer") => Err(LayoutError::Parse(
            "document pane inside an edge zone".to_owned(),
        )),
        Some(other) => Err(LayoutError::Parse(format!("unknown pane type: {other}"))),
        None => Err(LayoutError::Parse("pane node without a type".to_owned())),
    }
}

fn parse_outer(
    node: &Memento,
    known: &BTreeMap<WindowId, WindowHandle>,
    claimed: &mut BTreeSet<WindowId>,
) -> Result<Option<OuterNode>, LayoutError> {
    match node.get("type") {
        Some("splitPane") => {
            let mut panes = node.children_of("pane");
            let (Some(first), Some(second)) = (panes.next(), panes.next()) else {
                return Err(LayoutError::Parse(
                    "splitPane without two children".to_owned(),
                ));
            };
            let first = parse_outer(first, known, claimed)?;
            let second = parse_outer(second, known, claimed)?;
            let (orientation, ratio, primary_first) = parse_split_attrs(node);
            Ok(match (first, second) {
                (Some(a), Some(b)) => Some(OuterNode::Split {
                    orientation,
                    ratio,
                    primary_first,
                    children: Box::new([a, b]),
                }),
                (Some(a), None) => Some(a),
                (None, Some(b)) => Some(b),
                (None, None) => None,
            })
        }
        Some("tiledContainer") => {
            let Some(position) = node.get("position").and_then(Position::from_str) else {
                return Err(LayoutError::Parse(
                    "tiledContainer without a position".to_owned(),
                ));
            };
            let expected = match position {
                Position::Document => WindowKind::Document,
                _ => WindowKind::Dockable,
            };
            let tree = match node.child("pane") {
                Some(inner) => parse_inner(inner, expected, known, claimed)?,
                None => None,
            };
            if tree.is_none() && position != Position::Document {
                // An edge zone that lost all its windows is not recreated.
                return Ok(None);
            }
            Ok(Some(OuterNode::Zone { position, tree }))
        }
        Some(other) => Err(LayoutError::Parse(format!("unknown pane type: {other}"))),
        None => Err(LayoutError::Parse("pane node without a type".to_owned())),
    }
}
