//! Auto-hide strips along the layout edges.
//!
//! Auto-hidden windows collapse into labeled items on one of four edge
//! strips. Each item is a [`WindowGroup`]: a whole pane sent to the strip
//! keeps its tab set and selection. At most one item is flown out as an
//! overlay at a time; that state lives on the
//! [`LayoutContainer`](super::LayoutContainer).

use super::pane::WindowGroup;
use crate::window::{DockSide, WindowId};

/// The four edge strips of auto-hidden items.
#[derive(Debug, Clone, Default)]
pub struct AutoHideStrips {
    items: [Vec<WindowGroup>; 4],
}

fn side_index(side: DockSide) -> usize {
    match side {
        DockSide::Top => 0,
        DockSide::Left => 1,
        DockSide::Bottom => 2,
        DockSide::Right => 3,
    }
}

impl AutoHideStrips {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self, side: DockSide) -> &[WindowGroup] {
        &self.items[side_index(side)]
    }

    pub fn has_items(&self, side: DockSide) -> bool {
        !self.items(side).is_empty()
    }

    pub fn is_empty(&self) -> bool {
        DockSide::ALL.iter().all(|&side| !self.has_items(side))
    }

    /// Appends an item to the strip at `side`.
    pub(crate) fn push(&mut self, side: DockSide, item: WindowGroup) {
        self.items[side_index(side)].push(item);
    }

    pub(crate) fn item_mut(&mut self, side: DockSide, index: usize) -> Option<&mut WindowGroup> {
        self.items[side_index(side)].get_mut(index)
    }

    pub(crate) fn remove_item(&mut self, side: DockSide, index: usize) -> WindowGroup {
        self.items[side_index(side)].remove(index)
    }

    /// Strip and item index holding `id`.
    pub fn find(&self, id: &WindowId) -> Option<(DockSide, usize)> {
        for &side in &DockSide::ALL {
            if let Some(index) = self.items(side).iter().position(|item| item.contains(id)) {
                return Some((side, index));
            }
        }
        None
    }

    /// Removes one window; drops its item when it became empty. Returns the
    /// strip side and whether the whole item went away.
    pub(crate) fn remove_window(&mut self, id: &WindowId) -> Option<(DockSide, bool)> {
        let (side, index) = self.find(id)?;
        let items = &mut self.items[side_index(side)];
        items[index].remove(id);
        let emptied = items[index].is_empty();
        if emptied {
            items.remove(index);
        }
        Some((side, emptied))
    }

    /// All windows in strip order: Top, Left, Bottom, Right.
    pub fn windows(&self) -> Vec<WindowId> {
        DockSide::ALL
            .iter()
            .flat_map(|&side| {
                self.items(side)
                    .iter()
                    .flat_map(|item| item.windows().iter().cloned())
            })
            .collect()
    }

    pub fn window_count(&self) -> usize {
        DockSide::ALL
            .iter()
            .map(|&side| self.items(side).iter().map(WindowGroup::len).sum::<usize>())
            .sum()
    }
}
