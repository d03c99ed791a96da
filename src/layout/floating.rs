//! Floating groups: panes torn out of the tree into free-positioned frames.

use super::pane::WindowGroup;
use crate::geometry::Rect;
use crate::window::WindowId;

/// A tabbed group floating above the tiled layout.
///
/// The containing `Vec` is the z-order, last on top. Groups are never empty;
/// removing the last window disposes the frame.
#[derive(Debug, Clone)]
pub struct FloatingGroup {
    group: WindowGroup,
    bounds: Rect,
}

impl FloatingGroup {
    pub fn new(group: WindowGroup, bounds: Rect) -> Self {
        Self { group, bounds }
    }

    pub fn group(&self) -> &WindowGroup {
        &self.group
    }

    pub(crate) fn group_mut(&mut self) -> &mut WindowGroup {
        &mut self.group
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub(crate) fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
    }

    pub fn windows(&self) -> &[WindowId] {
        self.group.windows()
    }

    pub fn contains(&self, id: &WindowId) -> bool {
        self.group.contains(id)
    }

    pub fn into_group(self) -> WindowGroup {
        self.group
    }
}
