//! Window identity and per-window state.
//!
//! A [`WindowHandle`] is the layout's record of one window: its kind, its
//! current dock state, and the UI properties hosts render (title, icon,
//! components). Handles are owned by the manager's registry; the layout tree
//! itself only stores [`WindowId`]s.

use std::fmt;

use crate::geometry::{Orientation, Rect, Size};

/// Unique, stable name of a window.
///
/// Ids sort lexicographically which keeps registry iteration and tie-breaking
/// deterministic.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WindowId(String);

impl WindowId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WindowId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for WindowId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// The two window species the layout distinguishes.
///
/// Dockables live in the edge zones, documents in the center zone. The two
/// kinds never share a pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowKind {
    Dockable,
    Document,
}

impl WindowKind {
    pub fn is_document(self) -> bool {
        matches!(self, WindowKind::Document)
    }
}

/// One of the four edges of a rect or of the whole layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DockSide {
    Top,
    Left,
    Bottom,
    Right,
}

impl DockSide {
    pub const ALL: [DockSide; 4] = [
        DockSide::Top,
        DockSide::Left,
        DockSide::Bottom,
        DockSide::Right,
    ];

    /// Orientation of the split created by docking at this edge.
    ///
    /// Top/Bottom stack the two children vertically, Left/Right place them
    /// side by side.
    pub fn orientation(self) -> Orientation {
        match self {
            DockSide::Top | DockSide::Bottom => Orientation::Vertical,
            DockSide::Left | DockSide::Right => Orientation::Horizontal,
        }
    }

    /// Whether a pane docked at this edge becomes the first child.
    pub fn docks_first(self) -> bool {
        matches!(self, DockSide::Top | DockSide::Left)
    }

    pub fn opposite(self) -> Self {
        match self {
            DockSide::Top => DockSide::Bottom,
            DockSide::Left => DockSide::Right,
            DockSide::Bottom => DockSide::Top,
            DockSide::Right => DockSide::Left,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DockSide::Top => "top",
            DockSide::Left => "left",
            DockSide::Bottom => "bottom",
            DockSide::Right => "right",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "top" => Some(DockSide::Top),
            "left" => Some(DockSide::Left),
            "bottom" => Some(DockSide::Bottom),
            "right" => Some(DockSide::Right),
            _ => None,
        }
    }
}

impl fmt::Display for DockSide {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a shown window is currently presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DockState {
    Docked,
    Floated,
    AutoHidden,
}

impl DockState {
    pub fn as_str(self) -> &'static str {
        match self {
            DockState::Docked => "docked",
            DockState::Floated => "floated",
            DockState::AutoHidden => "autohidden",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "docked" => Some(DockState::Docked),
            "floated" => Some(DockState::Floated),
            "autohidden" => Some(DockState::AutoHidden),
            _ => None,
        }
    }
}

/// A named content slot inside a window.
///
/// Windows with more than one component render them as inner tabs; the tab
/// title falls back to the component name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    pub name: String,
    pub tab_title: Option<String>,
    pub icon: Option<String>,
}

impl Component {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tab_title: None,
            icon: None,
        }
    }

    pub fn tab_title(&self) -> &str {
        self.tab_title.as_deref().unwrap_or(&self.name)
    }
}

/// Everything the layout knows about one window.
#[derive(Debug, Clone)]
pub struct WindowHandle {
    id: WindowId,
    kind: WindowKind,
    title: String,
    tab_title: Option<String>,
    icon: Option<String>,
    closable: bool,
    preferred_dock_side: DockSide,
    dock_state: DockState,
    shown: bool,
    components: Vec<Component>,
    active_component: usize,
    bounds: Rect,
    floating_bounds: Option<Rect>,
    autohide_size: Option<Size>,
}

impl WindowHandle {
    pub(crate) fn new(id: WindowId, kind: WindowKind, title: impl Into<String>) -> Self {
        Self {
            id,
            kind,
            title: title.into(),
            tab_title: None,
            icon: None,
            closable: true,
            preferred_dock_side: DockSide::Right,
            dock_state: DockState::Docked,
            shown: false,
            components: Vec::new(),
            active_component: 0,
            bounds: Rect::default(),
            floating_bounds: None,
            autohide_size: None,
        }
    }

    pub fn id(&self) -> &WindowId {
        &self.id
    }

    pub(crate) fn set_id(&mut self, id: WindowId) {
        self.id = id;
    }

    pub fn kind(&self) -> WindowKind {
        self.kind
    }

    pub fn is_document(&self) -> bool {
        self.kind.is_document()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub(crate) fn set_title(&mut self, title: String) {
        self.title = title;
    }

    /// Title shown on the window's tab; falls back to the window title.
    pub fn tab_title(&self) -> &str {
        self.tab_title.as_deref().unwrap_or(&self.title)
    }

    pub(crate) fn set_tab_title(&mut self, tab_title: Option<String>) {
        self.tab_title = tab_title;
    }

    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    pub(crate) fn set_icon(&mut self, icon: Option<String>) {
        self.icon = icon;
    }

    pub fn is_closable(&self) -> bool {
        self.closable
    }

    pub(crate) fn set_closable(&mut self, closable: bool) {
        self.closable = closable;
    }

    /// Edge zone a fresh dockable is placed in when no layout hint applies.
    pub fn preferred_dock_side(&self) -> DockSide {
        self.preferred_dock_side
    }

    pub(crate) fn set_preferred_dock_side(&mut self, side: DockSide) {
        self.preferred_dock_side = side;
    }

    pub fn dock_state(&self) -> DockState {
        self.dock_state
    }

    pub(crate) fn set_dock_state(&mut self, state: DockState) {
        self.dock_state = state;
    }

    /// Whether the window currently takes part in the layout.
    pub fn is_shown(&self) -> bool {
        self.shown
    }

    pub(crate) fn set_shown(&mut self, shown: bool) {
        self.shown = shown;
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn find_component(&self, name: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.name == name)
    }

    /// The component shown as the window's content, if any exist.
    pub fn active_component(&self) -> Option<&Component> {
        self.components.get(self.active_component)
    }

    pub fn active_component_index(&self) -> usize {
        self.active_component
    }

    pub(crate) fn set_active_component_index(&mut self, index: usize) {
        self.active_component = index;
    }

    pub(crate) fn push_component(&mut self, component: Component) {
        self.components.push(component);
    }

    /// Removes the named component and reports whether it was the active
    /// one. Unknown names are ignored. Removing the last component keeps
    /// the active index on the new last slot; removing an earlier one
    /// leaves the index in place, so the next component takes over.
    pub(crate) fn remove_component(&mut self, name: &str) -> Option<(Component, bool)> {
        let idx = self.components.iter().position(|c| c.name == name)?;
        let component = self.components.remove(idx);
        let was_active = self.active_component == idx;
        if self.active_component == self.components.len() && self.active_component > 0 {
            self.active_component -= 1;
        }
        Some((component, was_active))
    }

    /// Last content bounds this window was laid out at.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub(crate) fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
    }

    /// Bounds the window's floating group had when it last floated.
    pub fn floating_bounds(&self) -> Option<Rect> {
        self.floating_bounds
    }

    pub(crate) fn set_floating_bounds(&mut self, bounds: Option<Rect>) {
        self.floating_bounds = bounds;
    }

    /// Overlay size the window's strip item had when it last flew out.
    pub fn autohide_size(&self) -> Option<Size> {
        self.autohide_size
    }

    pub(crate) fn set_autohide_size(&mut self, size: Option<Size>) {
        self.autohide_size = size;
    }
}
