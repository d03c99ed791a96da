//! Docking layout logic.
//!
//! The layout is a rectangle carved up as follows:
//!
//! - Around the edges sit up to four auto-hide strips holding collapsed
//!   windows ([`autohide`]).
//! - The remaining content area is an outer [`PaneTree`] whose leaves are
//!   zones: at most one per edge plus the always-present document zone in
//!   the middle ([`tiled`]).
//! - Each zone is itself a [`PaneTree`] whose leaves are tabbed
//!   [`WindowGroup`]s.
//! - Floating groups hover above all of that in z-order ([`floating`]).
//!
//! A window is hosted in exactly one place: some zone's group, a floating
//! group, or a strip item. Moving a window between hosts always goes through
//! [`LayoutContainer`], which keeps the trees collapsed (no single-child
//! splits, no empty groups, no empty edge zones) and remembers per-window
//! placement in a hint cache ([`hints`]) so windows return to familiar spots.
//!
//! Sizes are relative: every split stores the fraction given to its first
//! child, so resizing the whole layout reflows everything proportionally.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{self, Write as _};
use std::rc::Rc;

use bitflags::bitflags;

use crate::geometry::{edges_touch, Rect, Size};
use crate::window::{DockSide, WindowHandle, WindowId};

pub mod autohide;
pub mod drag;
pub mod floating;
pub mod hints;
pub mod pane;
pub mod tiled;
#[cfg(test)]
mod tests;

use autohide::AutoHideStrips;
use floating::FloatingGroup;
use hints::HintCache;
use pane::{DetachedPane, PaneKey, PaneTree, WindowGroup};
use tiled::TiledContainer;

/// Share of the layout a freshly created edge zone receives.
pub(crate) const FRESH_ZONE_RATIO: f64 = 0.3;

/// Tunable metrics of the layout.
///
/// The engine does not render anything itself, but drop classification and
/// strip carving need to know how tall the chrome the host draws is.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutOptions {
    /// Height of the title band at the top of dockable panes.
    pub title_band: f64,
    /// Height of a tab strip row.
    pub tab_strip: f64,
    /// Nominal width of one tab, before clipping to the pane width.
    pub tab_width: f64,
    /// Thickness of the auto-hide strips along the edges.
    pub strip_thickness: f64,
    /// Pointer travel in either axis before an armed drag starts.
    pub drag_threshold: f64,
    /// Size of floating frames when nothing better is known.
    pub default_float_size: Size,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            title_band: 18.,
            tab_strip: 22.,
            tab_width: 100.,
            strip_thickness: 24.,
            drag_threshold: 5.,
            default_float_size: Size::new(240., 180.),
        }
    }
}

/// Where a zone sits: one of the four edges or the document area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Position {
    Top,
    Left,
    Bottom,
    Right,
    Document,
}

impl Position {
    /// The edge this zone occupies; None for the document zone.
    pub fn edge(self) -> Option<DockSide> {
        match self {
            Position::Top => Some(DockSide::Top),
            Position::Left => Some(DockSide::Left),
            Position::Bottom => Some(DockSide::Bottom),
            Position::Right => Some(DockSide::Right),
            Position::Document => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Position::Top => "top",
            Position::Left => "left",
            Position::Bottom => "bottom",
            Position::Right => "right",
            Position::Document => "document",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "top" => Some(Position::Top),
            "left" => Some(Position::Left),
            "bottom" => Some(Position::Bottom),
            "right" => Some(Position::Right),
            "document" => Some(Position::Document),
            _ => None,
        }
    }
}

impl From<DockSide> for Position {
    fn from(side: DockSide) -> Self {
        match side {
            DockSide::Top => Position::Top,
            DockSide::Left => Position::Left,
            DockSide::Bottom => Position::Bottom,
            DockSide::Right => Position::Right,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

bitflags! {
    /// Which edges of the content area a rect is flush with.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub(crate) struct EdgeMask: u8 {
        const TOP = 1;
        const LEFT = 2;
        const BOTTOM = 4;
        const RIGHT = 8;
    }
}

pub(crate) fn edge_mask(rect: Rect, whole: Rect) -> EdgeMask {
    let mut mask = EdgeMask::empty();
    if edges_touch(rect.loc.y, whole.loc.y) {
        mask |= EdgeMask::TOP;
    }
    if edges_touch(rect.loc.x, whole.loc.x) {
        mask |= EdgeMask::LEFT;
    }
    if edges_touch(rect.bottom(), whole.bottom()) {
        mask |= EdgeMask::BOTTOM;
    }
    if edges_touch(rect.right(), whole.right()) {
        mask |= EdgeMask::RIGHT;
    }
    mask
}

/// How completely a zone claims its edge, 0 (spans everything) to 3 (spans
/// nothing beyond its own slot); 4 when the flush pattern fits no category.
///
/// Recorded in layout hints and used to rebuild a missing zone in roughly
/// the same relationship to its perpendicular neighbors.
pub(crate) fn dominance(edge: DockSide, rect: Rect, whole: Rect) -> u8 {
    let mask = edge_mask(rect, whole).bits();
    if mask == 0b1111 {
        return 0;
    }
    match edge {
        DockSide::Top => match mask {
            0b1011 => 0,
            0b0011 => 1,
            0b1001 => 2,
            0b0001 => 3,
            _ => 4,
        },
        DockSide::Left => match mask {
            0b0111 => 0,
            0b0011 => 1,
            0b0110 => 2,
            0b0010 => 3,
            _ => 4,
        },
        DockSide::Bottom => match mask {
            0b1110 => 0,
            0b0110 => 1,
            0b1100 => 2,
            0b0100 => 3,
            _ => 4,
        },
        DockSide::Right => match mask {
            0b1101 => 0,
            0b1001 => 1,
            0b1100 => 2,
            0b1000 => 3,
            _ => 4,
        },
    }
}

/// Where a window currently lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowPlace {
    Docked { zone: Position, pane: PaneKey },
    Floating { index: usize },
    AutoHidden { side: DockSide, item: usize },
}

/// What kind of host a window was removed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovedFrom {
    Zone(Position),
    Floating { disposed: bool },
    AutoHidden { side: DockSide, item_removed: bool },
}

/// Anchor for docking a new zone into the outer tree.
#[derive(Debug, Clone, Copy)]
pub(crate) enum OuterTarget {
    /// Split the whole current arrangement.
    Base,
    /// Split the document zone's slot.
    Document,
    /// Split the subtree directly above the given zone.
    AboveZone(Position),
}

/// Structural snapshot of the outer tree with zone contents inline.
///
/// This is the shape persistence serializes and restore rebuilds from.
#[derive(Debug)]
pub(crate) enum OuterNode {
    Split {
        orientation: crate::geometry::Orientation,
        ratio: f64,
        primary_first: bool,
        children: Box<[OuterNode; 2]>,
    },
    Zone {
        position: Position,
        tree: Option<DetachedPane<WindowGroup>>,
    },
}

/// The whole docking area: zones, floating groups, and auto-hide strips.
#[derive(Debug)]
pub struct LayoutContainer {
    /// Arrangement of zones within the content area.
    outer: PaneTree<Position>,
    /// The zones themselves, including the always-present document zone.
    zones: BTreeMap<Position, TiledContainer>,
    /// Floating groups in z-order, last on top.
    floating: Vec<FloatingGroup>,
    /// Auto-hide strips along the edges.
    strips: AutoHideStrips,
    /// The strip item currently flown out as an overlay, if any.
    active_overlay: Option<(DockSide, usize)>,
    /// Remembered placements keyed by window id.
    hints: HintCache,
    /// Outer bounds of the layout, strips included.
    bounds: Rect,
    options: Rc<LayoutOptions>,
}

impl LayoutContainer {
    pub fn new(options: Rc<LayoutOptions>) -> Self {
        let mut outer = PaneTree::new();
        outer.dock_leaf(None, DockSide::Right, Position::Document, 0.5);
        let mut zones = BTreeMap::new();
        zones.insert(Position::Document, TiledContainer::new(Position::Document));
        Self {
            outer,
            zones,
            floating: Vec::new(),
            strips: AutoHideStrips::new(),
            active_overlay: None,
            hints: HintCache::new(),
            bounds: Rect::default(),
            options,
        }
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
        self.relayout();
    }

    pub fn options(&self) -> &LayoutOptions {
        &self.options
    }

    /// Content area: the bounds minus any occupied auto-hide strips.
    pub fn content_rect(&self) -> Rect {
        let mut rect = self.bounds;
        let t = self.options.strip_thickness;
        if self.strips.has_items(DockSide::Top) {
            rect.loc.y += t;
            rect.size.h -= t;
        }
        if self.strips.has_items(DockSide::Bottom) {
            rect.size.h -= t;
        }
        if self.strips.has_items(DockSide::Left) {
            rect.loc.x += t;
            rect.size.w -= t;
        }
        if self.strips.has_items(DockSide::Right) {
            rect.size.w -= t;
        }
        rect.size.w = rect.size.w.max(0.);
        rect.size.h = rect.size.h.max(0.);
        rect
    }

    // =============================================================================
    // Zones

    pub fn zone(&self, position: Position) -> Option<&TiledContainer> {
        self.zones.get(&position)
    }

    pub(crate) fn zone_mut(&mut self, position: Position) -> Option<&mut TiledContainer> {
        self.zones.get_mut(&position)
    }

    pub fn document_zone(&self) -> &TiledContainer {
        &self.zones[&Position::Document]
    }

    /// Zone positions in outer-tree leaf order.
    pub fn positions(&self) -> Vec<Position> {
        self.outer
            .leaves()
            .into_iter()
            .filter_map(|key| self.outer.leaf(key).copied())
            .collect()
    }

    fn outer_leaf(&self, position: Position) -> Option<PaneKey> {
        self.outer
            .leaves()
            .into_iter()
            .find(|&key| self.outer.leaf(key) == Some(&position))
    }

    fn resolve_outer_target(&self, target: OuterTarget) -> Option<PaneKey> {
        match target {
            OuterTarget::Base => self.outer.root(),
            OuterTarget::Document => self.outer_leaf(Position::Document),
            OuterTarget::AboveZone(position) => match self.outer_leaf(position) {
                Some(leaf) => self.outer.parent(leaf).or(Some(leaf)),
                None => self.outer.root(),
            },
        }
    }

    /// Creates the zone for `side`, docking it into the outer tree with the
    /// given share. The zone must not exist yet.
    pub(crate) fn create_zone(&mut self, side: DockSide, ratio: f64, target: OuterTarget) -> Position {
        let position = Position::from(side);
        debug_assert!(!self.zones.contains_key(&position), "zone already exists");
        let target_key = self.resolve_outer_target(target);
        self.outer.dock_leaf(target_key, side, position, ratio);
        self.zones.insert(position, TiledContainer::new(position));
        position
    }

    fn remove_zone_if_empty(&mut self, position: Position) {
        if position == Position::Document {
            return;
        }
        if !self.zones.get(&position).is_some_and(TiledContainer::is_empty) {
            return;
        }
        self.zones.remove(&position);
        if let Some(leaf) = self.outer_leaf(position) {
            self.outer.remove_leaf(leaf);
        }
    }

    // =============================================================================
    // Adding and removing windows

    /// Places a fresh dockable window: by layout hint if one applies,
    /// otherwise tabbed onto the base pane of its preferred edge zone,
    /// creating the zone when needed.
    pub fn add_dockable(&mut self, window: &WindowHandle) -> PaneKey {
        debug_assert!(!window.is_document());
        if let Some(pane) = self.apply_hint(window) {
            self.relayout();
            return pane;
        }
        let side = window.preferred_dock_side();
        let position = Position::from(side);
        if !self.zones.contains_key(&position) {
            self.create_zone(side, FRESH_ZONE_RATIO, OuterTarget::Base);
        }
        let pane = self.zones.get_mut(&position).unwrap().add_window(window.id().clone());
        self.relayout();
        pane
    }

    /// Places a fresh document window: by layout hint (sibling rules only),
    /// otherwise tabbed onto the document zone's base pane.
    pub fn add_document(&mut self, window: &WindowHandle) -> PaneKey {
        debug_assert!(window.is_document());
        if let Some(pane) = self.apply_hint(window) {
            self.relayout();
            return pane;
        }
        let pane = self
            .zones
            .get_mut(&Position::Document)
            .unwrap()
            .add_window(window.id().clone());
        self.relayout();
        pane
    }

    /// Removes a window from whatever hosts it, collapsing emptied
    /// structure. Unknown windows are ignored.
    pub fn remove_window(&mut self, id: &WindowId) -> Option<RemovedFrom> {
        if let Some(index) = self.floating.iter().position(|f| f.contains(id)) {
            let group = self.floating[index].group_mut();
            group.remove(id);
            let disposed = group.is_empty();
            if disposed {
                self.floating.remove(index);
            }
            return Some(RemovedFrom::Floating { disposed });
        }

        if let Some((side, item_removed)) = self.strip_remove_window(id) {
            return Some(RemovedFrom::AutoHidden { side, item_removed });
        }

        let position = self
            .zones
            .iter()
            .find_map(|(&p, zone)| zone.find_window(id).map(|_| p))?;
        self.zones.get_mut(&position).unwrap().remove_window(id);
        self.remove_zone_if_empty(position);
        self.relayout();
        Some(RemovedFrom::Zone(position))
    }

    pub fn find_window(&self, id: &WindowId) -> Option<WindowPlace> {
        if let Some(index) = self.floating.iter().position(|f| f.contains(id)) {
            return Some(WindowPlace::Floating { index });
        }
        if let Some((side, item)) = self.strips.find(id) {
            return Some(WindowPlace::AutoHidden { side, item });
        }
        for (&position, zone) in &self.zones {
            if let Some(pane) = zone.find_window(id) {
                return Some(WindowPlace::Docked {
                    zone: position,
                    pane,
                });
            }
        }
        None
    }

    pub fn contains_window(&self, id: &WindowId) -> bool {
        self.find_window(id).is_some()
    }

    /// All hosted windows: zones in outer order, then floating, then strips.
    pub fn windows(&self) -> Vec<WindowId> {
        let mut out = Vec::new();
        for position in self.positions() {
            if let Some(zone) = self.zones.get(&position) {
                out.extend(zone.windows());
            }
        }
        for group in &self.floating {
            out.extend(group.windows().iter().cloned());
        }
        out.extend(self.strips.windows());
        out
    }

    /// Selects `id` within its group. Returns the previously selected
    /// window if the selection moved.
    pub fn select_window(&mut self, id: &WindowId) -> Option<WindowId> {
        match self.find_window(id)? {
            WindowPlace::Docked { zone, pane } => self
                .zones
                .get_mut(&zone)?
                .tree_mut()
                .leaf_mut(pane)?
                .select(id),
            WindowPlace::Floating { index } => self.floating.get_mut(index)?.group_mut().select(id),
            WindowPlace::AutoHidden { side, item } => self.strips.item_mut(side, item)?.select(id),
        }
    }

    /// Tabs a window onto an existing pane without touching the selection.
    pub(crate) fn dock_on_top(&mut self, position: Position, pane: PaneKey, id: WindowId) {
        if let Some(zone) = self.zones.get_mut(&position) {
            if let Some(group) = zone.tree_mut().leaf_mut(pane) {
                group.add(id);
            }
        }
    }

    /// Rewrites a window's id in its host group and its own hint entry.
    /// References to the old id in other windows' hints stay; stale ids are
    /// never matched.
    pub(crate) fn rename_window(&mut self, old: &WindowId, new: &WindowId) {
        match self.find_window(old) {
            Some(WindowPlace::Docked { zone, pane }) => {
                if let Some(group) = self
                    .zones
                    .get_mut(&zone)
                    .and_then(|z| z.tree_mut().leaf_mut(pane))
                {
                    group.rename(old, new.clone());
                }
            }
            Some(WindowPlace::Floating { index }) => {
                if let Some(frame) = self.floating.get_mut(index) {
                    frame.group_mut().rename(old, new.clone());
                }
            }
            Some(WindowPlace::AutoHidden { side, item }) => {
                if let Some(group) = self.strips.item_mut(side, item) {
                    group.rename(old, new.clone());
                }
            }
            None => {}
        }
        if let Some(hint) = self.remove_hint(old) {
            self.insert_hint(new.clone(), hint);
        }
    }

    /// Detaches the whole group of the pane hosting the window, dissolving
    /// its zone if that empties it.
    pub(crate) fn take_pane_group(&mut self, id: &WindowId) -> Option<WindowGroup> {
        let Some(WindowPlace::Docked { zone, pane }) = self.find_window(id) else {
            return None;
        };
        let group = self.zones.get_mut(&zone)?.tree_mut().remove_leaf(pane);
        self.remove_zone_if_empty(zone);
        self.relayout();
        Some(group)
    }

    // =============================================================================
    // Floating groups

    pub fn floating(&self) -> &[FloatingGroup] {
        &self.floating
    }

    pub(crate) fn floating_mut(&mut self, index: usize) -> Option<&mut FloatingGroup> {
        self.floating.get_mut(index)
    }

    /// Adds a floating group on top of the stack.
    pub(crate) fn float_attach(&mut self, group: WindowGroup, bounds: Rect) -> usize {
        self.floating.push(FloatingGroup::new(group, bounds));
        self.floating.len() - 1
    }

    pub(crate) fn float_to_front(&mut self, index: usize) {
        if index < self.floating.len() && index + 1 != self.floating.len() {
            let group = self.floating.remove(index);
            self.floating.push(group);
        }
    }

    pub(crate) fn set_floating_bounds(&mut self, index: usize, bounds: Rect) {
        if let Some(group) = self.floating.get_mut(index) {
            group.set_bounds(bounds);
        }
    }

    /// Removes one window from its floating group. Returns the frame bounds
    /// and whether the frame was disposed.
    pub(crate) fn remove_floating_window(&mut self, id: &WindowId) -> Option<(Rect, bool)> {
        let index = self.floating.iter().position(|f| f.contains(id))?;
        let bounds = self.floating[index].bounds();
        let group = self.floating[index].group_mut();
        group.remove(id);
        let disposed = group.is_empty();
        if disposed {
            self.floating.remove(index);
        }
        Some((bounds, disposed))
    }

    // =============================================================================
    // Auto-hide strips

    pub fn strips(&self) -> &AutoHideStrips {
        &self.strips
    }

    pub fn active_overlay(&self) -> Option<(DockSide, usize)> {
        self.active_overlay
    }

    pub(crate) fn set_active_overlay(&mut self, overlay: Option<(DockSide, usize)>) {
        self.active_overlay = overlay;
    }

    /// Rect of the flown-out overlay pane, anchored at its strip.
    ///
    /// `preferred` is the remembered pane size of the selected window; a
    /// third of the content area is used without one.
    pub fn overlay_rect(&self, preferred: Option<Size>) -> Option<Rect> {
        let (side, _) = self.active_overlay?;
        let content = self.content_rect();
        let rect = match side {
            DockSide::Left | DockSide::Right => {
                let w = preferred
                    .map(|s| s.w)
                    .unwrap_or(content.size.w / 3.)
                    .min(content.size.w);
                let x = match side {
                    DockSide::Left => content.loc.x,
                    _ => content.right() - w,
                };
                Rect::new(x, content.loc.y, w, content.size.h)
            }
            DockSide::Top | DockSide::Bottom => {
                let h = preferred
                    .map(|s| s.h)
                    .unwrap_or(content.size.h / 3.)
                    .min(content.size.h);
                let y = match side {
                    DockSide::Top => content.loc.y,
                    _ => content.bottom() - h,
                };
                Rect::new(content.loc.x, y, content.size.w, h)
            }
        };
        Some(rect)
    }

    pub(crate) fn push_strip_item(&mut self, side: DockSide, item: WindowGroup) {
        self.strips.push(side, item);
        self.relayout();
    }

    /// Removes a whole strip item, fixing up the active overlay.
    pub(crate) fn take_strip_item(&mut self, side: DockSide, index: usize) -> WindowGroup {
        let item = self.strips.remove_item(side, index);
        self.fix_overlay_after_item_removed(side, index);
        self.relayout();
        item
    }

    fn strip_remove_window(&mut self, id: &WindowId) -> Option<(DockSide, bool)> {
        let (side, index) = self.strips.find(id)?;
        let result = self.strips.remove_window(id);
        if let Some((_, true)) = result {
            self.fix_overlay_after_item_removed(side, index);
        }
        self.relayout();
        result
    }

    fn fix_overlay_after_item_removed(&mut self, side: DockSide, index: usize) {
        if let Some((s, i)) = self.active_overlay {
            if s == side {
                if i == index {
                    self.active_overlay = None;
                } else if i > index {
                    self.active_overlay = Some((s, i - 1));
                }
            }
        }
    }

    // =============================================================================
    // Geometry

    /// Recomputes every rect from the split ratios and current bounds.
    pub fn relayout(&mut self) {
        let content = self.content_rect();
        self.outer.relayout(content);
        let zone_rects: Vec<(Position, Rect)> = self
            .outer
            .leaves()
            .into_iter()
            .filter_map(|key| Some((*self.outer.leaf(key)?, self.outer.rect_of(key)?)))
            .collect();
        for (position, rect) in zone_rects {
            if let Some(zone) = self.zones.get_mut(&position) {
                zone.tree_mut().relayout(rect);
            }
        }
    }

    pub fn pane_rect(&self, position: Position, pane: PaneKey) -> Option<Rect> {
        self.zones.get(&position)?.tree().rect_of(pane)
    }

    /// Rect of whatever hosts the window: its pane, floating frame, or
    /// nothing for auto-hidden windows.
    pub fn window_rect(&self, id: &WindowId) -> Option<Rect> {
        match self.find_window(id)? {
            WindowPlace::Docked { zone, pane } => self.pane_rect(zone, pane),
            WindowPlace::Floating { index } => Some(self.floating[index].bounds()),
            WindowPlace::AutoHidden { .. } => None,
        }
    }

    pub(crate) fn dominance_of(&self, position: Position) -> u8 {
        let Some(edge) = position.edge() else {
            return 4;
        };
        let Some(rect) = self.outer_leaf(position).and_then(|k| self.outer.rect_of(k)) else {
            return 4;
        };
        dominance(edge, rect, self.content_rect())
    }

    /// Extent of a zone's slot relative to the whole content area, along the
    /// axis its edge cares about.
    pub(crate) fn zone_extent_ratio(&self, position: Position) -> Option<f64> {
        let rect = self.outer_leaf(position).and_then(|k| self.outer.rect_of(k))?;
        let content = self.content_rect();
        match position {
            Position::Top | Position::Bottom if content.size.h > 0. => {
                Some(rect.size.h / content.size.h)
            }
            Position::Left | Position::Right if content.size.w > 0. => {
                Some(rect.size.w / content.size.w)
            }
            _ => None,
        }
    }

    /// Moves the outer divider directly above a zone so its slot takes
    /// `share` of the split. Returns false when the zone has no divider,
    /// which is the case while it is the only zone.
    pub(crate) fn set_zone_share(&mut self, position: Position, share: f64) -> bool {
        let Some(leaf) = self.outer_leaf(position) else {
            return false;
        };
        let Some(parent) = self.outer.parent(leaf) else {
            return false;
        };
        let first = self
            .outer
            .split(parent)
            .is_some_and(|split| split.children[0] == leaf);
        let ratio = if first { share } else { 1. - share };
        self.outer.set_ratio(parent, ratio);
        self.relayout();
        true
    }

    /// Moves an inner divider of a zone's pane tree. Returns false when
    /// `split` is not a split node of that zone.
    pub(crate) fn set_split_ratio(&mut self, position: Position, split: PaneKey, ratio: f64) -> bool {
        let Some(zone) = self.zones.get_mut(&position) else {
            return false;
        };
        if zone.tree().split(split).is_none() {
            return false;
        }
        zone.tree_mut().set_ratio(split, ratio);
        self.relayout();
        true
    }

    // =============================================================================
    // Persistence support

    pub(crate) fn snapshot_outer(&self) -> Option<OuterNode> {
        self.outer.root().map(|root| self.snapshot_node(root))
    }

    fn snapshot_node(&self, key: PaneKey) -> OuterNode {
        if let Some(&position) = self.outer.leaf(key) {
            let tree = self
                .zones
                .get(&position)
                .and_then(|zone| zone.tree().to_detached());
            return OuterNode::Zone { position, tree };
        }
        let split = self.outer.split(key).unwrap();
        let first = self.snapshot_node(split.children[0]);
        let second = self.snapshot_node(split.children[1]);
        OuterNode::Split {
            orientation: split.orientation,
            ratio: split.ratio,
            primary_first: split.primary_first,
            children: Box::new([first, second]),
        }
    }

    /// Replaces the zones and outer arrangement with a restored snapshot.
    ///
    /// Floating groups and strips are left alone; callers clear those first.
    /// A missing document zone is recreated empty.
    pub(crate) fn restore_outer(&mut self, root: Option<OuterNode>) {
        self.outer = PaneTree::new();
        self.zones.clear();
        if let Some(root) = root {
            let sub = Self::collect_restored(root, &mut self.zones);
            self.outer.attach(None, DockSide::Right, sub, 0.5);
        }
        if !self.zones.contains_key(&Position::Document) {
            self.zones
                .insert(Position::Document, TiledContainer::new(Position::Document));
            self.outer
                .dock_leaf(None, DockSide::Right, Position::Document, 0.5);
        }
        self.relayout();
    }

    fn collect_restored(
        node: OuterNode,
        zones: &mut BTreeMap<Position, TiledContainer>,
    ) -> DetachedPane<Position> {
        match node {
            OuterNode::Zone { position, tree } => {
                let mut zone = TiledContainer::new(position);
                if let Some(sub) = tree {
                    zone.tree_mut().attach(None, DockSide::Right, sub, 0.5);
                }
                zones.insert(position, zone);
                DetachedPane::Leaf(position)
            }
            OuterNode::Split {
                orientation,
                ratio,
                primary_first,
                children,
            } => {
                let [a, b] = *children;
                DetachedPane::Split {
                    orientation,
                    ratio,
                    primary_first,
                    children: Box::new([
                        Self::collect_restored(a, zones),
                        Self::collect_restored(b, zones),
                    ]),
                }
            }
        }
    }

    pub(crate) fn restore_floating(&mut self, groups: Vec<FloatingGroup>) {
        self.floating = groups;
    }

    pub(crate) fn restore_strips(&mut self, items: Vec<(DockSide, WindowGroup)>) {
        self.strips = AutoHideStrips::new();
        for (side, item) in items {
            self.strips.push(side, item);
        }
        self.active_overlay = None;
        self.relayout();
    }

    // =============================================================================
    // Debugging

    /// Indented description of the whole layout for snapshots.
    pub fn debug_tree(&self) -> String {
        let mut out = String::new();
        for position in self.positions() {
            let _ = writeln!(out, "{position}:");
            if let Some(zone) = self.zones.get(&position) {
                zone.tree().write_debug(&mut out, 1);
            }
        }
        if !self.floating.is_empty() {
            let _ = writeln!(out, "floating:");
            for group in &self.floating {
                let _ = writeln!(out, "  {} at {}", group.group(), group.bounds());
            }
        }
        for &side in &DockSide::ALL {
            let items = self.strips.items(side);
            if items.is_empty() {
                continue;
            }
            let _ = writeln!(out, "autohide {side}:");
            for item in items {
                let _ = writeln!(out, "  {item}");
            }
        }
        out
    }

    /// Checks every structural rule of the layout. Panics on violation.
    pub fn verify_invariants(&self) {
        self.outer.verify_invariants();

        let mut outer_positions = Vec::new();
        for key in self.outer.leaves() {
            let Some(&position) = self.outer.leaf(key) else {
                panic!("outer leaves() returned a split");
            };
            assert!(
                !outer_positions.contains(&position),
                "zone {position} appears twice in the outer tree"
            );
            outer_positions.push(position);
        }
        assert!(
            outer_positions.contains(&Position::Document),
            "document zone missing from the outer tree"
        );
        assert_eq!(
            outer_positions.len(),
            self.zones.len(),
            "outer leaves and zones out of sync"
        );

        let mut seen = BTreeSet::new();
        for (&position, zone) in &self.zones {
            assert!(
                outer_positions.contains(&position),
                "zone {position} not in the outer tree"
            );
            assert_eq!(zone.position(), position, "zone keyed under wrong position");
            if position != Position::Document {
                assert!(!zone.is_empty(), "empty edge zone {position} kept alive");
            }
            zone.tree().verify_window_invariants();
            for key in zone.panes() {
                if let Some(group) = zone.tree().leaf(key) {
                    assert_eq!(
                        group.kind(),
                        zone.kind(),
                        "group of the wrong kind in zone {position}"
                    );
                }
            }
            for id in zone.windows() {
                assert!(seen.insert(id.clone()), "window {id} hosted twice");
            }
        }

        for group in &self.floating {
            assert!(!group.group().is_empty(), "empty floating group");
            assert!(
                !group.group().kind().is_document(),
                "document window in a floating group"
            );
            for id in group.windows() {
                assert!(seen.insert(id.clone()), "window {id} hosted twice");
            }
        }

        for &side in &DockSide::ALL {
            for item in self.strips.items(side) {
                assert!(!item.is_empty(), "empty auto-hide item");
                assert!(
                    !item.kind().is_document(),
                    "document window in an auto-hide strip"
                );
                for id in item.windows() {
                    assert!(seen.insert(id.clone()), "window {id} hosted twice");
                }
            }
        }

        if let Some((side, item)) = self.active_overlay {
            assert!(
                item < self.strips.items(side).len(),
                "active overlay points at a missing item"
            );
        }

        self.hints.verify();
    }
}
