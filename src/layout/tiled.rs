//! One zone of the layout: a positioned tree of window groups.

use super::pane::{PaneKey, PaneTree, WindowGroup};
use super::Position;
use crate::geometry::edges_touch;
use crate::window::{DockSide, WindowId, WindowKind};

/// A zone's pane tree together with the edge it sits at.
///
/// Zones at Top/Bottom read as horizontal strips, Left/Right as vertical
/// ones; the document zone is neither. The distinction drives drop weights
/// and the anchor edge recorded in layout hints.
#[derive(Debug, Clone)]
pub struct TiledContainer {
    position: Position,
    tree: PaneTree<WindowGroup>,
}

impl TiledContainer {
    pub fn new(position: Position) -> Self {
        Self {
            position,
            tree: PaneTree::new(),
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Kind of window this zone hosts.
    pub fn kind(&self) -> WindowKind {
        match self.position {
            Position::Document => WindowKind::Document,
            _ => WindowKind::Dockable,
        }
    }

    pub fn is_horizontal(&self) -> bool {
        matches!(self.position, Position::Top | Position::Bottom)
    }

    pub fn is_vertical(&self) -> bool {
        matches!(self.position, Position::Left | Position::Right)
    }

    pub fn tree(&self) -> &PaneTree<WindowGroup> {
        &self.tree
    }

    pub(crate) fn tree_mut(&mut self) -> &mut PaneTree<WindowGroup> {
        &mut self.tree
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// The zone's base pane: the first leaf in depth-first order. New
    /// windows without a better placement tab onto it.
    pub fn primary_pane(&self) -> Option<PaneKey> {
        self.tree.first_leaf()
    }

    pub fn panes(&self) -> Vec<PaneKey> {
        self.tree.leaves()
    }

    pub fn find_window(&self, id: &WindowId) -> Option<PaneKey> {
        self.tree.find_window(id)
    }

    pub fn windows(&self) -> Vec<WindowId> {
        self.tree.windows()
    }

    /// Tabs a window onto the primary pane, creating it if the zone is
    /// empty. Returns the hosting pane.
    pub fn add_window(&mut self, id: WindowId) -> PaneKey {
        match self.primary_pane() {
            Some(pane) => {
                if let Some(group) = self.tree.leaf_mut(pane) {
                    group.add(id);
                }
                pane
            }
            None => self
                .tree
                .dock_leaf(None, DockSide::Right, WindowGroup::new(self.kind(), id), 0.5),
        }
    }

    /// Removes a window, dissolving its pane if it became empty. Returns
    /// the pane the window was in, or None if it was not here.
    pub fn remove_window(&mut self, id: &WindowId) -> Option<PaneKey> {
        let pane = self.tree.find_window(id)?;
        let emptied = match self.tree.leaf_mut(pane) {
            Some(group) => {
                group.remove(id);
                group.is_empty()
            }
            None => false,
        };
        if emptied {
            self.tree.remove_leaf(pane);
        }
        Some(pane)
    }

    /// Edge of the zone the pane is flush with, far edge winning.
    ///
    /// Horizontal zones test left then right, vertical ones top then
    /// bottom. The document zone has no anchor.
    pub fn anchor_edge_of(&self, pane: PaneKey) -> Option<DockSide> {
        let zone_rect = self.tree.rect_of(self.tree.root()?)?;
        let pane_rect = self.tree.rect_of(pane)?;
        let mut anchor = None;
        if self.is_horizontal() {
            if edges_touch(pane_rect.loc.x, zone_rect.loc.x) {
                anchor = Some(DockSide::Left);
            }
            if edges_touch(pane_rect.right(), zone_rect.right()) {
                anchor = Some(DockSide::Right);
            }
        }
        if self.is_vertical() {
            if edges_touch(pane_rect.loc.y, zone_rect.loc.y) {
                anchor = Some(DockSide::Top);
            }
            if edges_touch(pane_rect.bottom(), zone_rect.bottom()) {
                anchor = Some(DockSide::Bottom);
            }
        }
        anchor
    }

    /// Windows of the panes directly before and after `pane` in pane order.
    pub fn neighbors_of(&self, pane: PaneKey) -> (Vec<WindowId>, Vec<WindowId>) {
        let panes = self.panes();
        let Some(index) = panes.iter().position(|&p| p == pane) else {
            return (Vec::new(), Vec::new());
        };
        let windows_of = |key: PaneKey| match self.tree.leaf(key) {
            Some(group) => group.windows().to_vec(),
            None => Vec::new(),
        };
        let prev = if index > 0 {
            windows_of(panes[index - 1])
        } else {
            Vec::new()
        };
        let next = if index + 1 < panes.len() {
            windows_of(panes[index + 1])
        } else {
            Vec::new()
        };
        (prev, next)
    }
}
