//! Remembered window placements.
//!
//! Whenever a docked window is about to move or hide, its spot is captured
//! as a [`LayoutHint`]: the zone it was in, how completely that zone claimed
//! its edge, which windows shared its pane, which panes sat before and after
//! it, and how large everything was relative to its surroundings. When the
//! window later returns, [`apply_hint`](LayoutContainer::apply_hint) replays
//! the hint against the current layout, preferring the strongest still valid
//! relation:
//!
//! 1. a former tab mate still docked in the remembered zone,
//! 2. the pane holding the most former tab mates, wherever it is,
//! 3. (dockables only) the remembered zone, recreated at its old share and
//!    edge relation when it no longer exists,
//! 4. the remembered anchor edge of that zone,
//! 5. a squeeze next to the former neighbor panes, after the previous pane
//!    when both survive.
//!
//! Extents are captured as ratios of the content area and zone, so hints
//! stay meaningful across resizes.

use std::collections::BTreeSet;

use tracing::trace;

use crate::geometry::{Rect, Size};
use crate::window::{DockSide, DockState, WindowHandle, WindowId};

use super::pane::{PaneKey, WindowGroup};
use super::{LayoutContainer, OuterTarget, Position, WindowPlace, FRESH_ZONE_RATIO};

/// Hints kept before the least recently written one is dropped.
pub(crate) const HINT_CACHE_CAP: usize = 256;

/// A remembered placement for one window.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutHint {
    /// Dock state the window had when the hint was captured.
    pub dock_state: DockState,
    /// Windows that shared the pane.
    pub siblings: Vec<WindowId>,
    /// Windows of the pane just before this window's pane, in pane order.
    pub prev_neighbors: Vec<WindowId>,
    /// Windows of the pane just after this window's pane.
    pub next_neighbors: Vec<WindowId>,
    /// Zone the pane belonged to.
    pub container_position: Option<Position>,
    /// How completely the zone claimed its edge, 0 (fully) to 4 (unknown).
    pub container_dominance: u8,
    /// Zone extent relative to the content area, both axes.
    pub container_ratio: Option<Size>,
    /// Pane extent relative to the zone, both axes.
    pub pane_ratio: Option<Size>,
    /// Zone edge the pane sat flush against, far edges taking precedence.
    pub anchor_edge: Option<DockSide>,
    /// Last floating frame geometry.
    pub floating_bounds: Option<Rect>,
    /// Last overlay size while auto-hidden.
    pub auto_hide_size: Option<Size>,
}

impl LayoutHint {
    pub(crate) fn new(dock_state: DockState) -> Self {
        Self {
            dock_state,
            siblings: Vec::new(),
            prev_neighbors: Vec::new(),
            next_neighbors: Vec::new(),
            container_position: None,
            container_dominance: 4,
            container_ratio: None,
            pane_ratio: None,
            anchor_edge: None,
            floating_bounds: None,
            auto_hide_size: None,
        }
    }
}

/// Write-ordered hint cache, most recently written last.
#[derive(Debug, Default)]
pub(crate) struct HintCache {
    entries: Vec<(WindowId, LayoutHint)>,
}

impl HintCache {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn contains(&self, id: &WindowId) -> bool {
        self.entries.iter().any(|(k, _)| k == id)
    }

    pub(crate) fn get(&self, id: &WindowId) -> Option<&LayoutHint> {
        self.entries.iter().find(|(k, _)| k == id).map(|(_, h)| h)
    }

    pub(crate) fn get_mut(&mut self, id: &WindowId) -> Option<&mut LayoutHint> {
        self.entries.iter_mut().find(|(k, _)| k == id).map(|(_, h)| h)
    }

    /// Inserts or replaces a hint, moving it to the back. The least
    /// recently written hint is dropped when over capacity.
    pub(crate) fn insert(&mut self, id: WindowId, hint: LayoutHint) {
        if let Some(index) = self.entries.iter().position(|(k, _)| k == &id) {
            self.entries.remove(index);
        }
        self.entries.push((id, hint));
        if self.entries.len() > HINT_CACHE_CAP {
            self.entries.remove(0);
        }
    }

    pub(crate) fn remove(&mut self, id: &WindowId) -> Option<LayoutHint> {
        let index = self.entries.iter().position(|(k, _)| k == id)?;
        Some(self.entries.remove(index).1)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&WindowId, &LayoutHint)> {
        self.entries.iter().map(|(k, h)| (k, h))
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    pub(crate) fn verify(&self) {
        assert!(self.entries.len() <= HINT_CACHE_CAP, "hint cache over capacity");
        let mut seen = BTreeSet::new();
        for (id, _) in &self.entries {
            assert!(seen.insert(id.clone()), "two hints for window {id}");
        }
    }
}

/// Counts pane occurrences; ties go to the first-added pane.
#[derive(Debug, Default)]
struct PaneBag {
    counts: Vec<(Position, PaneKey, usize)>,
}

impl PaneBag {
    fn add(&mut self, zone: Position, pane: PaneKey) {
        match self
            .counts
            .iter_mut()
            .find(|(z, p, _)| *z == zone && *p == pane)
        {
            Some(entry) => entry.2 += 1,
            None => self.counts.push((zone, pane, 1)),
        }
    }

    fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    fn max(&self) -> Option<(Position, PaneKey)> {
        let mut best: Option<&(Position, PaneKey, usize)> = None;
        for entry in &self.counts {
            if best.map_or(true, |b| entry.2 > b.2) {
                best = Some(entry);
            }
        }
        best.map(|&(zone, pane, _)| (zone, pane))
    }

    /// All panes sharing the highest count.
    fn candidates(&self) -> Vec<PaneKey> {
        let max = self.counts.iter().map(|e| e.2).max().unwrap_or(0);
        self.counts
            .iter()
            .filter(|e| e.2 == max)
            .map(|e| e.1)
            .collect()
    }
}

impl LayoutContainer {
    /// The remembered placement for a window, if any.
    pub fn hint(&self, id: &WindowId) -> Option<&LayoutHint> {
        self.hints.get(id)
    }

    pub(crate) fn hint_entries(&self) -> Vec<(WindowId, LayoutHint)> {
        self.hints
            .iter()
            .map(|(id, hint)| (id.clone(), hint.clone()))
            .collect()
    }

    pub(crate) fn insert_hint(&mut self, id: WindowId, hint: LayoutHint) {
        self.hints.insert(id, hint);
    }

    pub(crate) fn remove_hint(&mut self, id: &WindowId) -> Option<LayoutHint> {
        self.hints.remove(id)
    }

    pub(crate) fn clear_hints(&mut self) {
        self.hints.clear();
    }

    /// Captures the window's placement unless a hint already exists.
    pub(crate) fn setup_hint(&mut self, window: &WindowHandle) {
        if !self.hints.contains(window.id()) {
            self.update_hint(window);
        }
    }

    /// Captures the window's current docked placement, overwriting any
    /// previous hint but carrying the floating geometry forward. Does
    /// nothing for hidden windows and windows not docked in a zone.
    pub(crate) fn update_hint(&mut self, window: &WindowHandle) {
        if !window.is_shown() {
            return;
        }
        let Some(WindowPlace::Docked { zone, pane }) = self.find_window(window.id()) else {
            return;
        };

        let mut hint = LayoutHint::new(window.dock_state());
        if let Some(old) = self.hints.get(window.id()) {
            hint.floating_bounds = old.floating_bounds;
        }
        hint.auto_hide_size = window.autohide_size();

        let container = &self.zones[&zone];
        let tree = container.tree();
        if let Some(group) = tree.leaf(pane) {
            hint.siblings = group
                .windows()
                .iter()
                .filter(|w| *w != window.id())
                .cloned()
                .collect();
        }
        hint.container_position = Some(zone);
        hint.container_dominance = self.dominance_of(zone);

        let content = self.content_rect();
        let zone_rect = tree.root().and_then(|root| tree.rect_of(root));
        if let Some(rect) = zone_rect {
            if content.size.w > 0. && content.size.h > 0. {
                hint.container_ratio = Some(Size::new(
                    rect.size.w / content.size.w,
                    rect.size.h / content.size.h,
                ));
            }
        }
        if let (Some(pane_rect), Some(zone_rect)) = (tree.rect_of(pane), zone_rect) {
            if zone_rect.size.w > 0. && zone_rect.size.h > 0. {
                hint.pane_ratio = Some(Size::new(
                    pane_rect.size.w / zone_rect.size.w,
                    pane_rect.size.h / zone_rect.size.h,
                ));
            }
        }
        hint.anchor_edge = container.anchor_edge_of(pane);
        let (prev, next) = container.neighbors_of(pane);
        hint.prev_neighbors = prev;
        hint.next_neighbors = next;

        trace!(window = %window.id(), zone = %zone, "captured layout hint");
        self.hints.insert(window.id().clone(), hint);
    }

    /// Re-captures the hints of every docked window.
    pub(crate) fn update_all_hints(&mut self, windows: &[&WindowHandle]) {
        for window in windows {
            self.update_hint(window);
        }
    }

    /// Remembers the window's floating frame geometry.
    pub(crate) fn update_floating_hint(&mut self, window: &WindowHandle, bounds: Rect) {
        self.setup_hint(window);
        if let Some(hint) = self.hints.get_mut(window.id()) {
            hint.floating_bounds = Some(bounds);
        }
    }

    /// Forgets the moved windows in the hints of everything that lived in
    /// the source container, so stale sibling and neighbor references do not
    /// pull returning windows toward panes they left.
    pub(crate) fn scrub_hint_references(&mut self, residents: &[WindowId], moved: &[WindowId]) {
        for resident in residents {
            if let Some(hint) = self.hints.get_mut(resident) {
                hint.siblings.retain(|w| !moved.contains(w));
                hint.prev_neighbors.retain(|w| !moved.contains(w));
                hint.next_neighbors.retain(|w| !moved.contains(w));
            }
        }
    }

    /// Replays a remembered placement, tabbing or docking the window into
    /// the layout. Returns the pane it landed in, or None when no still
    /// valid relation was found. The caller relayouts on success.
    pub(crate) fn apply_hint(&mut self, window: &WindowHandle) -> Option<PaneKey> {
        let hint = self.hints.get(window.id())?.clone();
        let remembered = hint.container_position;
        let remembered_exists = remembered.is_some_and(|p| self.zones.contains_key(&p));

        // A former tab mate still in the remembered zone wins outright;
        // otherwise the pane with the most former tab mates does.
        let mut bag = PaneBag::default();
        for sibling in &hint.siblings {
            let Some(WindowPlace::Docked { zone, pane }) = self.find_window(sibling) else {
                continue;
            };
            if remembered_exists && remembered == Some(zone) {
                self.zones
                    .get_mut(&zone)?
                    .tree_mut()
                    .leaf_mut(pane)?
                    .add(window.id().clone());
                trace!(window = %window.id(), %zone, "hint: rejoined sibling in remembered zone");
                return Some(pane);
            }
            bag.add(zone, pane);
        }
        if let Some((zone, pane)) = bag.max() {
            self.zones
                .get_mut(&zone)?
                .tree_mut()
                .leaf_mut(pane)?
                .add(window.id().clone());
            trace!(window = %window.id(), %zone, "hint: rejoined strayed siblings");
            return Some(pane);
        }

        if window.is_document() {
            return None;
        }

        // Recreate the remembered zone at its old share and edge relation.
        // The window becomes its only pane, so the anchor and neighbor rules
        // below only ever run against a surviving zone.
        let position = remembered?;
        let side = position.edge()?;
        if !remembered_exists {
            let weight = match side {
                DockSide::Top | DockSide::Bottom => hint.container_ratio.map(|s| s.h),
                DockSide::Left | DockSide::Right => hint.container_ratio.map(|s| s.w),
            }
            .unwrap_or(FRESH_ZONE_RATIO);
            let target = self.recreation_target(side, hint.container_dominance);
            self.create_zone(side, weight, target);
            trace!(window = %window.id(), zone = %position, "hint: recreated zone");
            let pane = self.zones.get_mut(&position)?.tree_mut().dock_leaf(
                None,
                DockSide::Right,
                WindowGroup::new(window.kind(), window.id().clone()),
                0.5,
            );
            return Some(pane);
        }

        let weight = self.squeeze_weight(position, &hint);

        // Dock against the whole zone at the remembered anchor edge.
        if let Some(edge) = hint.anchor_edge {
            let zone = self.zones.get_mut(&position)?;
            let root = zone.tree().root();
            let pane = zone.tree_mut().dock_leaf(
                root,
                edge,
                WindowGroup::new(window.kind(), window.id().clone()),
                weight,
            );
            trace!(window = %window.id(), zone = %position, ?edge, "hint: docked at anchor");
            return Some(pane);
        }

        // Squeeze next to the former neighbor panes, after the previous
        // pane when it survives.
        let zone = self.zone(position)?;
        let mut prev_bag = PaneBag::default();
        for name in &hint.prev_neighbors {
            if let Some(pane) = zone.find_window(name) {
                prev_bag.add(position, pane);
            }
        }
        let mut next_bag = PaneBag::default();
        for name in &hint.next_neighbors {
            if let Some(pane) = zone.find_window(name) {
                next_bag.add(position, pane);
            }
        }

        let (bag, edge) = if !prev_bag.is_empty() {
            let edge = if zone.is_horizontal() {
                DockSide::Right
            } else {
                DockSide::Bottom
            };
            (prev_bag, edge)
        } else if !next_bag.is_empty() {
            let edge = if zone.is_horizontal() {
                DockSide::Left
            } else {
                DockSide::Top
            };
            (next_bag, edge)
        } else {
            return None;
        };

        let candidates = bag.candidates();
        let target = zone.panes().into_iter().find(|p| candidates.contains(p))?;
        let pane = self.zones.get_mut(&position)?.tree_mut().dock_leaf(
            Some(target),
            edge,
            WindowGroup::new(window.kind(), window.id().clone()),
            weight,
        );
        trace!(window = %window.id(), zone = %position, ?edge, "hint: squeezed next to neighbors");
        Some(pane)
    }

    /// Outer-tree anchor for recreating a zone with the given dominance.
    fn recreation_target(&self, side: DockSide, dominance: u8) -> OuterTarget {
        let (first, second) = match side {
            DockSide::Top | DockSide::Bottom => (Position::Left, Position::Right),
            DockSide::Left | DockSide::Right => (Position::Top, Position::Bottom),
        };
        let has_first = self.zones.contains_key(&first);
        let has_second = self.zones.contains_key(&second);
        if dominance == 0 || (!has_first && !has_second) {
            OuterTarget::Base
        } else if dominance == 1 && has_first {
            OuterTarget::AboveZone(first)
        } else if dominance == 2 && has_second {
            OuterTarget::AboveZone(second)
        } else {
            OuterTarget::Document
        }
    }

    /// Share for squeezing a pane back into a zone: the remembered pane
    /// ratio along the zone's axis, kept sensible for the pane count.
    fn squeeze_weight(&self, position: Position, hint: &LayoutHint) -> f64 {
        let Some(zone) = self.zones.get(&position) else {
            return 0.5;
        };
        let ratio = if zone.is_horizontal() {
            hint.pane_ratio.map(|s| s.w)
        } else {
            hint.pane_ratio.map(|s| s.h)
        }
        .unwrap_or(0.5);
        ratio.max(0.1).min(1.0 / (zone.panes().len() as f64 + 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_evicts_least_recently_written() {
        let mut cache = HintCache::new();
        for i in 0..HINT_CACHE_CAP {
            cache.insert(WindowId::from(format!("w{i}")), LayoutHint::new(DockState::Docked));
        }
        assert_eq!(cache.len(), HINT_CACHE_CAP);

        // Rewriting w0 moves it to the back, so w1 is evicted next.
        cache.insert(WindowId::from("w0"), LayoutHint::new(DockState::Floated));
        cache.insert(WindowId::from("extra"), LayoutHint::new(DockState::Docked));
        assert_eq!(cache.len(), HINT_CACHE_CAP);
        assert!(cache.contains(&WindowId::from("w0")));
        assert!(!cache.contains(&WindowId::from("w1")));
        assert!(cache.contains(&WindowId::from("extra")));
        cache.verify();
    }

    #[test]
    fn bag_prefers_count_then_first_added() {
        let mut tree = crate::layout::pane::PaneTree::new();
        let a = tree.dock_leaf(None, DockSide::Right, (), 0.5);
        let b = tree.dock_leaf(Some(a), DockSide::Right, (), 0.5);

        let mut bag = PaneBag::default();
        bag.add(Position::Right, a);
        bag.add(Position::Right, b);
        bag.add(Position::Right, b);
        assert_eq!(bag.max(), Some((Position::Right, b)));
        assert_eq!(bag.candidates(), vec![b]);

        let mut tied = PaneBag::default();
        tied.add(Position::Right, a);
        tied.add(Position::Right, b);
        assert_eq!(tied.max(), Some((Position::Right, a)));
        assert_eq!(tied.candidates(), vec![a, b]);
    }
}
