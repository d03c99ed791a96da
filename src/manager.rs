//! The host-facing manager tying the pieces together.
//!
//! [`LayoutManager`] owns the window registry and the [`LayoutContainer`]
//! and runs every operation a host can ask for: registering and showing
//! windows, activation, dock state changes, drags, named window sets, and
//! saving or restoring the whole arrangement. Listeners registered here
//! observe each change as a [`LayoutEvent`].

use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

use tracing::{debug, warn};

use crate::event::{LayoutEvent, LayoutListener, Listeners};
use crate::geometry::{Point, Rect};
use crate::layout::drag::{DragController, DragSource, DropOutcome, DropZone};
use crate::layout::floating::FloatingGroup;
use crate::layout::pane::{PaneKey, WindowGroup};
use crate::layout::{
    LayoutContainer, LayoutOptions, Position, RemovedFrom, WindowPlace,
};
use crate::persistence::{self, Memento, RestorePlan};
use crate::window::{
    Component, DockSide, DockState, WindowHandle, WindowId, WindowKind,
};
use crate::LayoutError;

/// The top-level entry point of the layout engine.
///
/// All windows a host works with are registered here first; the manager
/// keeps their handles, the activation order, and the layout itself
/// consistent with each other. Mutations go through the manager so every
/// listener sees them.
#[derive(Debug)]
pub struct LayoutManager {
    windows: BTreeMap<WindowId, WindowHandle>,
    window_sets: BTreeMap<String, BTreeSet<WindowId>>,
    layout: LayoutContainer,
    drag: DragController,
    listeners: Listeners,
    /// Activation order, most recently activated last. The tail is the
    /// active window. Only shown windows appear here.
    active_history: Vec<WindowId>,
}

impl LayoutManager {
    pub fn new(options: LayoutOptions) -> Self {
        Self {
            windows: BTreeMap::new(),
            window_sets: BTreeMap::new(),
            layout: LayoutContainer::new(Rc::new(options)),
            drag: DragController::new(),
            listeners: Listeners::default(),
            active_history: Vec::new(),
        }
    }

    pub fn options(&self) -> &LayoutOptions {
        self.layout.options()
    }

    /// The layout itself, for rendering and hit testing.
    pub fn layout(&self) -> &LayoutContainer {
        &self.layout
    }

    pub fn bounds(&self) -> Rect {
        self.layout.bounds()
    }

    pub fn set_bounds(&mut self, bounds: Rect) {
        self.layout.set_bounds(bounds);
    }

    pub fn add_listener(&mut self, listener: Rc<dyn LayoutListener>) {
        self.listeners.add(listener);
    }

    pub fn remove_listener(&mut self, listener: &Rc<dyn LayoutListener>) {
        self.listeners.remove(listener);
    }

    // =============================================================================
    // Registry

    /// Registers a new window under a unique name. The window starts out
    /// hidden and docked.
    pub fn create_window(
        &mut self,
        kind: WindowKind,
        id: impl Into<String>,
        title: impl Into<String>,
        icon: Option<String>,
    ) -> Result<(), LayoutError> {
        let mut handle = WindowHandle::new(WindowId::new(id), kind, title);
        handle.set_icon(icon);
        self.open(handle)
    }

    pub fn create_dockable(
        &mut self,
        id: impl Into<String>,
        title: impl Into<String>,
        icon: Option<String>,
    ) -> Result<(), LayoutError> {
        self.create_window(WindowKind::Dockable, id, title, icon)
    }

    pub fn create_document(
        &mut self,
        id: impl Into<String>,
        title: impl Into<String>,
        icon: Option<String>,
    ) -> Result<(), LayoutError> {
        self.create_window(WindowKind::Document, id, title, icon)
    }

    /// Adds a handle to the registry, typically one returned by
    /// [`close`](Self::close) earlier.
    pub fn open(&mut self, handle: WindowHandle) -> Result<(), LayoutError> {
        let id = handle.id().clone();
        if self.windows.contains_key(&id) {
            return Err(LayoutError::DuplicateWindow(id));
        }
        debug!("opening window {id}");
        self.windows.insert(id.clone(), handle);
        self.listeners.notify(&LayoutEvent::Opened { window: id });
        Ok(())
    }

    /// Unregisters a hidden window and returns its handle so it can be
    /// opened again later. Shown windows and non-closable documents are
    /// left alone. The placement hint stays cached, so a window that is
    /// closed and reopened comes back to its old spot.
    pub fn close(&mut self, id: &WindowId) -> Option<WindowHandle> {
        let handle = match self.windows.get(id) {
            Some(handle) => handle,
            None => {
                debug!("close of unknown window {id} ignored");
                return None;
            }
        };
        if handle.is_shown() {
            warn!("window {id} is still shown, not closing");
            return None;
        }
        if handle.is_document() && !handle.is_closable() {
            warn!("document window {id} is not closable");
            return None;
        }
        debug!("closing window {id}");
        let handle = self.windows.remove(id);
        self.active_history.retain(|w| w != id);
        self.listeners
            .notify(&LayoutEvent::Closed { window: id.clone() });
        handle
    }

    pub fn window(&self, id: &WindowId) -> Option<&WindowHandle> {
        self.windows.get(id)
    }

    /// All registered windows in name order.
    pub fn windows(&self) -> impl Iterator<Item = &WindowHandle> {
        self.windows.values()
    }

    pub fn dockables(&self) -> impl Iterator<Item = &WindowHandle> {
        self.windows.values().filter(|w| !w.is_document())
    }

    pub fn documents(&self) -> impl Iterator<Item = &WindowHandle> {
        self.windows.values().filter(|w| w.is_document())
    }

    /// Shown dockable windows currently docked in a zone.
    pub fn shown_docked_windows(&self) -> impl Iterator<Item = &WindowHandle> {
        self.windows.values().filter(|w| {
            w.is_shown() && !w.is_document() && w.dock_state() == DockState::Docked
        })
    }

    pub fn is_shown(&self, id: &WindowId) -> bool {
        self.windows.get(id).is_some_and(WindowHandle::is_shown)
    }

    /// The most recently activated window.
    pub fn active_window(&self) -> Option<&WindowId> {
        self.active_history.last()
    }

    // =============================================================================
    // Window properties

    pub fn set_title(
        &mut self,
        id: &WindowId,
        title: impl Into<String>,
    ) -> Result<(), LayoutError> {
        self.handle_mut(id)?.set_title(title.into());
        Ok(())
    }

    pub fn set_tab_title(
        &mut self,
        id: &WindowId,
        tab_title: Option<String>,
    ) -> Result<(), LayoutError> {
        self.handle_mut(id)?.set_tab_title(tab_title);
        Ok(())
    }

    pub fn set_icon(&mut self, id: &WindowId, icon: Option<String>) -> Result<(), LayoutError> {
        self.handle_mut(id)?.set_icon(icon);
        Ok(())
    }

    pub fn set_closable(&mut self, id: &WindowId, closable: bool) -> Result<(), LayoutError> {
        self.handle_mut(id)?.set_closable(closable);
        Ok(())
    }

    /// Sets the edge a freshly shown window docks to when no hint applies.
    pub fn set_preferred_dock_side(
        &mut self,
        id: &WindowId,
        side: DockSide,
    ) -> Result<(), LayoutError> {
        self.handle_mut(id)?.set_preferred_dock_side(side);
        Ok(())
    }

    /// Adds a content slot to the window. Component names are unique per
    /// window; duplicates are ignored.
    pub fn add_component(
        &mut self,
        id: &WindowId,
        component: Component,
    ) -> Result<(), LayoutError> {
        let handle = self.handle_mut(id)?;
        if handle.find_component(&component.name).is_some() {
            warn!("window {id} already has a component named {}", component.name);
            return Ok(());
        }
        let name = component.name.clone();
        handle.push_component(component);
        let first = handle.components().len() == 1;
        self.listeners.notify(&LayoutEvent::ComponentAdded {
            window: id.clone(),
            component: name.clone(),
        });
        if first {
            self.listeners.notify(&LayoutEvent::ComponentActivated {
                window: id.clone(),
                component: Some(name),
            });
        }
        Ok(())
    }

    pub fn remove_component(&mut self, id: &WindowId, name: &str) -> Result<(), LayoutError> {
        let handle = self.handle_mut(id)?;
        let Some((_, was_active)) = handle.remove_component(name) else {
            return Ok(());
        };
        let successor = handle.active_component().map(|c| c.name.clone());
        self.listeners.notify(&LayoutEvent::ComponentRemoved {
            window: id.clone(),
            component: name.to_owned(),
        });
        if was_active {
            self.listeners.notify(&LayoutEvent::ComponentActivated {
                window: id.clone(),
                component: successor,
            });
        }
        Ok(())
    }

    /// Shows the named component as the window's content, as if its inner
    /// tab was clicked. Unknown names are ignored.
    pub fn activate_component(&mut self, id: &WindowId, name: &str) -> Result<(), LayoutError> {
        let handle = self.handle_mut(id)?;
        let Some(index) = handle.components().iter().position(|c| c.name == name) else {
            debug!("window {id} has no component named {name}");
            return Ok(());
        };
        if index == handle.active_component_index() {
            return Ok(());
        }
        handle.set_active_component_index(index);
        self.listeners.notify(&LayoutEvent::ComponentActivated {
            window: id.clone(),
            component: Some(name.to_owned()),
        });
        Ok(())
    }

    fn handle_mut(&mut self, id: &WindowId) -> Result<&mut WindowHandle, LayoutError> {
        self.windows
            .get_mut(id)
            .ok_or_else(|| LayoutError::UnknownWindow(id.clone()))
    }

    // =============================================================================
    // Showing and hiding

    /// Places the window in the layout according to its dock state,
    /// preferring its remembered spot. Showing a shown window does nothing.
    pub fn show(&mut self, id: &WindowId) -> Result<(), LayoutError> {
        if !self.windows.contains_key(id) {
            return Err(LayoutError::UnknownWindow(id.clone()));
        }
        self.show_known(id);
        Ok(())
    }

    fn show_known(&mut self, id: &WindowId) {
        let Some(handle) = self.windows.get(id) else {
            return;
        };
        if handle.is_shown() {
            return;
        }
        let state = handle.dock_state();
        debug!("showing window {id} as {state:?}");
        if handle.is_document() {
            self.layout.add_document(handle);
        } else {
            match state {
                DockState::Docked => {
                    self.layout.add_dockable(handle);
                }
                DockState::Floated => {
                    self.float_window(id);
                }
                DockState::AutoHidden => {
                    // Dock first so the strip side and the remembered
                    // overlay size come from the spot the window would
                    // occupy.
                    self.layout.add_dockable(handle);
                    self.stow(id);
                }
            }
        }
        if let Some(handle) = self.windows.get_mut(id) {
            handle.set_shown(true);
        }
        self.listeners
            .notify(&LayoutEvent::Shown { window: id.clone() });
        self.listeners.notify(&LayoutEvent::SaveNeeded);
    }

    /// Removes the window from the layout, remembering its spot. Hiding a
    /// hidden or unknown window does nothing; listeners may veto hiding a
    /// document.
    pub fn hide(&mut self, id: &WindowId) {
        let Some(handle) = self.windows.get(id) else {
            debug!("hide of unknown window {id} ignored");
            return;
        };
        if !handle.is_shown() {
            return;
        }
        if handle.is_document() && !self.listeners.allows_hiding(handle) {
            debug!("hiding of document window {id} vetoed");
            return;
        }
        debug!("hiding window {id}");

        let place = self.layout.find_window(id);
        let mut frame_bounds = None;
        match place {
            Some(WindowPlace::Docked { .. }) => self.layout.update_hint(handle),
            Some(WindowPlace::Floating { index }) => {
                let bounds = self.layout.floating()[index].bounds();
                self.layout.update_floating_hint(handle, bounds);
                frame_bounds = Some(bounds);
            }
            _ => {}
        }

        let removed = self.layout.remove_window(id);
        let next = match (place, removed) {
            (Some(WindowPlace::Docked { zone, pane }), _) => self
                .layout
                .zone(zone)
                .and_then(|zone| zone.tree().leaf(pane))
                .map(|group| group.selected_window().clone()),
            (
                Some(WindowPlace::Floating { index }),
                Some(RemovedFrom::Floating { disposed: false }),
            ) => self
                .layout
                .floating()
                .get(index)
                .map(|frame| frame.group().selected_window().clone()),
            (
                Some(WindowPlace::AutoHidden { side, item }),
                Some(RemovedFrom::AutoHidden {
                    item_removed: false,
                    ..
                }),
            ) => self
                .layout
                .strips()
                .items(side)
                .get(item)
                .map(|group| group.selected_window().clone()),
            _ => None,
        };
        self.handoff_activation(id, next.as_ref());

        if let Some(handle) = self.windows.get_mut(id) {
            if let Some(bounds) = frame_bounds {
                handle.set_floating_bounds(Some(bounds));
            }
            handle.set_shown(false);
        }
        self.listeners
            .notify(&LayoutEvent::Hidden { window: id.clone() });
        self.listeners.notify(&LayoutEvent::SaveNeeded);
    }

    /// Hides every shown window. Documents may veto and stay.
    pub fn hide_all(&mut self) {
        let ids: Vec<WindowId> = self.windows.keys().cloned().collect();
        for id in &ids {
            self.hide(id);
        }
    }

    pub fn hide_all_dockables(&mut self) {
        let ids: Vec<WindowId> = self.dockables().map(|w| w.id().clone()).collect();
        for id in &ids {
            self.hide(id);
        }
    }

    pub fn hide_all_documents(&mut self) {
        let ids: Vec<WindowId> = self.documents().map(|w| w.id().clone()).collect();
        for id in &ids {
            self.hide(id);
        }
    }

    /// Hides and closes every window. A vetoed document stays open.
    pub fn close_all(&mut self) {
        let ids: Vec<WindowId> = self.windows.keys().cloned().collect();
        self.close_each(&ids);
    }

    pub fn close_all_dockables(&mut self) {
        let ids: Vec<WindowId> = self.dockables().map(|w| w.id().clone()).collect();
        self.close_each(&ids);
    }

    pub fn close_all_documents(&mut self) {
        let ids: Vec<WindowId> = self.documents().map(|w| w.id().clone()).collect();
        self.close_each(&ids);
    }

    fn close_each(&mut self, ids: &[WindowId]) {
        for id in ids {
            self.hide(id);
            if !self.is_shown(id) {
                self.close(id);
            }
        }
    }

    // =============================================================================
    // Activation

    /// Makes the window the active one: raises its frame when floating,
    /// flies out its overlay when auto-hidden, and selects its tab.
    /// Activating a hidden window does nothing.
    pub fn activate(&mut self, id: &WindowId) -> Result<(), LayoutError> {
        let Some(handle) = self.windows.get(id) else {
            return Err(LayoutError::UnknownWindow(id.clone()));
        };
        if !handle.is_shown() {
            debug!("activate of hidden window {id} ignored");
            return Ok(());
        }
        self.activate_shown(id);
        Ok(())
    }

    fn activate_shown(&mut self, id: &WindowId) {
        if self.active_window() == Some(id) {
            // Still raise the frame or fly the overlay back out.
            match self.layout.find_window(id) {
                Some(WindowPlace::Floating { index }) => self.layout.float_to_front(index),
                Some(WindowPlace::AutoHidden { side, item }) => {
                    self.layout.set_active_overlay(Some((side, item)));
                }
                _ => {}
            }
            return;
        }
        debug!("activating window {id}");
        self.deactivate_last(Some(id));
        match self.layout.find_window(id) {
            Some(WindowPlace::Floating { index }) => {
                self.layout.float_to_front(index);
                self.layout.set_active_overlay(None);
            }
            Some(WindowPlace::AutoHidden { side, item }) => {
                self.layout.set_active_overlay(Some((side, item)));
            }
            _ => self.layout.set_active_overlay(None),
        }
        if let Some(previous) = self.layout.select_window(id) {
            self.listeners.notify(&LayoutEvent::SelectionChanged {
                window: id.clone(),
                previous: Some(previous),
            });
        }
        self.listeners
            .notify(&LayoutEvent::Activated { window: id.clone() });
    }

    /// Reports the end of the current activation. With a successor the
    /// history is kept; without one it is cleared entirely.
    fn deactivate_last(&mut self, next: Option<&WindowId>) {
        if let Some(old) = self.active_history.last() {
            self.listeners
                .notify(&LayoutEvent::Deactivated { window: old.clone() });
        }
        match next {
            Some(id) => {
                self.active_history.retain(|w| w != id);
                self.active_history.push(id.clone());
            }
            None => self.active_history.clear(),
        }
    }

    /// After a window left the layout: hands activation to a successor
    /// when it was the active window, then drops it from the history. The
    /// successor is the host's surviving selection, or failing that the
    /// most recent history entry that is still docked or floating.
    fn handoff_activation(&mut self, id: &WindowId, next: Option<&WindowId>) {
        if self.active_window() == Some(id) {
            if let Some(next) = next {
                self.activate_shown(next);
            } else {
                let fallback = self
                    .active_history
                    .iter()
                    .rev()
                    .skip(1)
                    .find(|&w| {
                        matches!(
                            self.layout.find_window(w),
                            Some(WindowPlace::Docked { .. }) | Some(WindowPlace::Floating { .. })
                        )
                    })
                    .cloned();
                if let Some(fallback) = fallback {
                    self.activate_shown(&fallback);
                }
            }
        }
        self.active_history.retain(|w| w != id);
    }

    /// Slides a flown-out auto-hide overlay back into its strip.
    pub fn retract_overlay(&mut self) {
        self.layout.set_active_overlay(None);
    }

    // =============================================================================
    // Dividers

    /// Moves the divider between a zone and the rest of the layout so the
    /// zone takes `share` of the slot it splits. The stored placement hints
    /// pick up the new ratios.
    pub fn resize_zone(&mut self, position: Position, share: f64) -> Result<(), LayoutError> {
        if !self.layout.set_zone_share(position, share) {
            return Err(LayoutError::InvalidOperation(format!(
                "no divider to move at the {position} zone"
            )));
        }
        self.refresh_shown_hints();
        self.listeners.notify(&LayoutEvent::SaveNeeded);
        Ok(())
    }

    /// Moves a divider between two panes inside a zone.
    pub fn resize_split(
        &mut self,
        position: Position,
        split: PaneKey,
        ratio: f64,
    ) -> Result<(), LayoutError> {
        if !self.layout.set_split_ratio(position, split, ratio) {
            return Err(LayoutError::InvalidOperation(format!(
                "no such divider in the {position} zone"
            )));
        }
        self.refresh_shown_hints();
        self.listeners.notify(&LayoutEvent::SaveNeeded);
        Ok(())
    }

    fn refresh_shown_hints(&mut self) {
        let shown: Vec<&WindowHandle> =
            self.windows.values().filter(|w| w.is_shown()).collect();
        self.layout.update_all_hints(&shown);
    }

    // =============================================================================
    // Dock state requests

    /// Tears the window out into a floating frame at its remembered
    /// bounds. A hidden window is shown floating; documents cannot float.
    pub fn request_float(&mut self, id: &WindowId) -> Result<(), LayoutError> {
        let Some(handle) = self.windows.get(id) else {
            return Err(LayoutError::UnknownWindow(id.clone()));
        };
        if handle.is_document() {
            return Err(LayoutError::InvalidOperation(format!(
                "document window {id} cannot float"
            )));
        }
        let was = handle.dock_state();
        if !handle.is_shown() {
            debug!("showing hidden window {id} floating");
            if let Some(handle) = self.windows.get_mut(id) {
                handle.set_dock_state(DockState::Floated);
            }
            self.report_dock_state(id, was, DockState::Floated);
            self.show_known(id);
            return Ok(());
        }
        match self.layout.find_window(id) {
            Some(WindowPlace::Floating { index }) => {
                self.layout.float_to_front(index);
                return Ok(());
            }
            Some(WindowPlace::Docked { .. }) => {
                debug!("floating docked window {id}");
                if let Some(handle) = self.windows.get(id) {
                    self.layout.setup_hint(handle);
                }
                self.layout.remove_window(id);
                self.float_window(id);
            }
            Some(WindowPlace::AutoHidden { .. }) => {
                debug!("floating auto-hidden window {id}");
                self.layout.remove_window(id);
                self.float_window(id);
            }
            None => {
                warn!("shown window {id} is not hosted anywhere");
                return Ok(());
            }
        }
        if let Some(handle) = self.windows.get_mut(id) {
            handle.set_dock_state(DockState::Floated);
        }
        self.report_dock_state(id, was, DockState::Floated);
        self.listeners.notify(&LayoutEvent::SaveNeeded);
        Ok(())
    }

    /// Floats the whole pane hosting the window as one frame, keeping its
    /// tabs and selection. The frame opens where the pane was unless some
    /// member remembers a floating position.
    pub fn request_float_pane(&mut self, id: &WindowId) -> Result<(), LayoutError> {
        let Some(handle) = self.windows.get(id) else {
            return Err(LayoutError::UnknownWindow(id.clone()));
        };
        if handle.is_document() {
            return Err(LayoutError::InvalidOperation(format!(
                "document window {id} cannot float"
            )));
        }
        if let Some(WindowPlace::Floating { index }) = self.layout.find_window(id) {
            self.layout.float_to_front(index);
            return Ok(());
        }
        let Some(WindowPlace::Docked { zone, pane }) = self.layout.find_window(id) else {
            debug!("window {id} is not docked, leaving its pane alone");
            return Ok(());
        };
        let members: Vec<WindowId> = self
            .layout
            .zone(zone)
            .and_then(|z| z.tree().leaf(pane))
            .map(|group| group.windows().to_vec())
            .unwrap_or_default();
        let Some(rect) = self.layout.pane_rect(zone, pane) else {
            return Ok(());
        };
        for member in &members {
            if let Some(handle) = self.windows.get_mut(member) {
                handle.set_bounds(rect);
            }
            if let Some(handle) = self.windows.get(member) {
                self.layout.setup_hint(handle);
            }
        }
        let Some(group) = self.layout.take_pane_group(id) else {
            return Ok(());
        };
        let bounds = members
            .iter()
            .find_map(|m| self.layout.hint(m).and_then(|hint| hint.floating_bounds))
            .unwrap_or(rect);
        self.layout.float_attach(group, bounds);
        for member in &members {
            let was = self
                .windows
                .get(member)
                .map(|handle| handle.dock_state());
            if let Some(handle) = self.windows.get_mut(member) {
                handle.set_dock_state(DockState::Floated);
            }
            if let Some(was) = was {
                self.report_dock_state(member, was, DockState::Floated);
            }
        }
        self.listeners.notify(&LayoutEvent::SaveNeeded);
        Ok(())
    }

    /// Returns the window from floating or the auto-hide strip into the
    /// docked layout. An auto-hidden window brings its whole strip item
    /// back; hidden windows are left alone.
    pub fn request_dock(&mut self, id: &WindowId) -> Result<(), LayoutError> {
        let Some(handle) = self.windows.get(id) else {
            return Err(LayoutError::UnknownWindow(id.clone()));
        };
        if handle.is_document() {
            return Err(LayoutError::InvalidOperation(format!(
                "document window {id} is always docked"
            )));
        }
        if !handle.is_shown() {
            return Ok(());
        }
        let was = handle.dock_state();
        match self.layout.find_window(id) {
            Some(WindowPlace::Floating { index }) => {
                debug!("docking floating window {id}");
                let bounds = self.layout.floating()[index].bounds();
                if let Some(handle) = self.windows.get_mut(id) {
                    handle.set_floating_bounds(Some(bounds));
                }
                self.layout.remove_window(id);
                self.redock_windows(None, &[id.clone()], id);
                if let Some(handle) = self.windows.get_mut(id) {
                    handle.set_dock_state(DockState::Docked);
                }
                self.report_dock_state(id, was, DockState::Docked);
            }
            Some(WindowPlace::AutoHidden { side, item }) => {
                debug!("docking auto-hidden window {id} and its strip item");
                let group = self.layout.take_strip_item(side, item);
                let selected = group.selected_window().clone();
                let members = group.windows().to_vec();
                self.redock_windows(Some(side), &members, &selected);
                for member in &members {
                    let state = self
                        .windows
                        .get(member)
                        .map(|handle| handle.dock_state());
                    if let Some(handle) = self.windows.get_mut(member) {
                        handle.set_dock_state(DockState::Docked);
                    }
                    if let Some(state) = state {
                        self.report_dock_state(member, state, DockState::Docked);
                    }
                }
            }
            _ => return Ok(()),
        }
        self.listeners.notify(&LayoutEvent::SaveNeeded);
        Ok(())
    }

    /// Moves a docked window onto the auto-hide strip at its zone's edge.
    /// A hidden window is shown straight onto the strip; floating windows
    /// are left alone.
    pub fn request_auto_hide(&mut self, id: &WindowId) -> Result<(), LayoutError> {
        let Some(handle) = self.windows.get(id) else {
            return Err(LayoutError::UnknownWindow(id.clone()));
        };
        if handle.is_document() {
            return Err(LayoutError::InvalidOperation(format!(
                "document window {id} cannot auto-hide"
            )));
        }
        let was = handle.dock_state();
        if !handle.is_shown() {
            debug!("showing hidden window {id} on the auto-hide strip");
            if let Some(handle) = self.windows.get_mut(id) {
                handle.set_dock_state(DockState::AutoHidden);
            }
            self.report_dock_state(id, was, DockState::AutoHidden);
            self.show_known(id);
            return Ok(());
        }
        match self.layout.find_window(id) {
            Some(WindowPlace::Docked { .. }) => {
                debug!("auto-hiding docked window {id}");
                self.stow(id);
                if let Some(handle) = self.windows.get_mut(id) {
                    handle.set_dock_state(DockState::AutoHidden);
                }
                self.report_dock_state(id, was, DockState::AutoHidden);
                self.listeners.notify(&LayoutEvent::SaveNeeded);
            }
            Some(WindowPlace::Floating { .. }) => {
                warn!("floating window {id} cannot auto-hide");
            }
            _ => {}
        }
        Ok(())
    }

    fn report_dock_state(&self, id: &WindowId, was: DockState, now: DockState) {
        if was != now {
            self.listeners.notify(&LayoutEvent::DockStateChanged {
                window: id.clone(),
                state: now,
            });
        }
    }

    /// Opens a floating frame for the window at its remembered bounds, or
    /// centered at the default size when nothing is remembered.
    fn float_window(&mut self, id: &WindowId) {
        let Some(handle) = self.windows.get(id) else {
            return;
        };
        let bounds = handle
            .floating_bounds()
            .or_else(|| self.layout.hint(id).and_then(|hint| hint.floating_bounds))
            .unwrap_or_else(|| self.default_float_bounds());
        let group = WindowGroup::new(handle.kind(), id.clone());
        self.layout.float_attach(group, bounds);
    }

    fn default_float_bounds(&self) -> Rect {
        let size = self.layout.options().default_float_size;
        let bounds = self.layout.bounds();
        Rect::new(
            bounds.loc.x + (bounds.size.w - size.w) / 2.,
            bounds.loc.y + (bounds.size.h - size.h) / 2.,
            size.w,
            size.h,
        )
    }

    /// Moves a docked window out of its pane onto the strip of its zone's
    /// edge, capturing the pane size for the later overlay.
    fn stow(&mut self, id: &WindowId) {
        let Some(WindowPlace::Docked { zone, pane }) = self.layout.find_window(id) else {
            return;
        };
        let Some(side) = zone.edge() else {
            return;
        };
        if self.active_window() == Some(id) {
            // The strip keeps no activation; flying out reactivates.
            self.deactivate_last(None);
        }
        if let Some(rect) = self.layout.pane_rect(zone, pane) {
            if let Some(handle) = self.windows.get_mut(id) {
                if handle.autohide_size().is_none() && rect.size.w > 0. && rect.size.h > 0. {
                    handle.set_autohide_size(Some(rect.size));
                }
            }
        }
        if let Some(handle) = self.windows.get(id) {
            self.layout.setup_hint(handle);
        }
        self.layout.remove_window(id);
        self.layout
            .push_strip_item(side, WindowGroup::new(WindowKind::Dockable, id.clone()));
    }

    /// Docks the given windows as one pane, preferring the first window's
    /// remembered spot. Without an applicable hint each window is placed
    /// on its own, overriding the preferred edge with `side` when given.
    fn redock_windows(&mut self, side: Option<DockSide>, ids: &[WindowId], selected: &WindowId) {
        let Some(first) = ids.first() else {
            return;
        };
        let mut target = None;
        if let Some(handle) = self.windows.get(first) {
            target = self.layout.apply_hint(handle);
        }
        if target.is_some() {
            if let Some(WindowPlace::Docked { zone, pane }) = self.layout.find_window(first) {
                for id in &ids[1..] {
                    self.layout.dock_on_top(zone, pane, id.clone());
                }
            }
            self.layout.relayout();
            if let Some(previous) = self.layout.select_window(selected) {
                self.listeners.notify(&LayoutEvent::SelectionChanged {
                    window: selected.clone(),
                    previous: Some(previous),
                });
            }
        } else {
            for id in ids {
                if let Some(side) = side {
                    if let Some(handle) = self.windows.get_mut(id) {
                        handle.set_preferred_dock_side(side);
                    }
                }
                if let Some(handle) = self.windows.get(id) {
                    self.layout.add_dockable(handle);
                }
            }
        }
    }

    // =============================================================================
    // Window sets

    /// Defines a named group of windows to show and hide together.
    /// Redefining a set replaces it.
    pub fn add_window_set(&mut self, name: impl Into<String>, ids: &[WindowId]) {
        let name = name.into();
        if self.window_sets.contains_key(&name) {
            warn!("window set {name} redefined");
        }
        self.window_sets.insert(name, ids.iter().cloned().collect());
    }

    pub fn remove_window_set(&mut self, name: &str) {
        if self.window_sets.remove(name).is_none() {
            warn!("window set {name} does not exist");
        }
    }

    /// Shows every member of the set. Members that are not registered are
    /// skipped.
    pub fn show_window_set(&mut self, name: &str) {
        let Some(set) = self.window_sets.get(name) else {
            warn!("window set {name} does not exist");
            return;
        };
        let ids: Vec<WindowId> = set.iter().cloned().collect();
        for id in &ids {
            if self.windows.contains_key(id) {
                self.show_known(id);
            } else {
                warn!("window set {name} refers to unknown window {id}");
            }
        }
    }

    /// Hides every member of the set.
    pub fn hide_window_set(&mut self, name: &str) {
        let Some(set) = self.window_sets.get(name) else {
            warn!("window set {name} does not exist");
            return;
        };
        let ids: Vec<WindowId> = set.iter().cloned().collect();
        for id in &ids {
            self.hide(id);
        }
    }

    /// Defines the `default` window set from the given windows and shows
    /// it.
    pub fn show_windows(&mut self, ids: &[WindowId]) {
        self.add_window_set("default", ids);
        self.show_window_set("default");
    }

    // =============================================================================
    // Renaming

    /// Gives a window a new unique name, rewriting every reference to the
    /// old one: the registry, the layout, window sets, the activation
    /// order, and the window's own hint.
    pub fn rename(&mut self, old: &WindowId, new: impl Into<String>) -> Result<(), LayoutError> {
        let new = WindowId::new(new);
        if *old == new {
            return Ok(());
        }
        if self.windows.contains_key(&new) {
            return Err(LayoutError::DuplicateWindow(new));
        }
        let Some(mut handle) = self.windows.remove(old) else {
            return Err(LayoutError::UnknownWindow(old.clone()));
        };
        debug!("renaming window {old} to {new}");
        handle.set_id(new.clone());
        self.windows.insert(new.clone(), handle);
        for set in self.window_sets.values_mut() {
            if set.remove(old) {
                set.insert(new.clone());
            }
        }
        self.layout.rename_window(old, &new);
        for entry in &mut self.active_history {
            if entry == old {
                *entry = new.clone();
            }
        }
        self.listeners.notify(&LayoutEvent::SaveNeeded);
        Ok(())
    }

    // =============================================================================
    // Dragging

    /// Arms a drag of a tab or a whole pane from the given pointer
    /// position. Auto-hidden windows and whole document panes cannot be
    /// dragged; starting a tab drag selects the tab.
    pub fn begin_drag(&mut self, source: DragSource, at: Point) -> Result<(), LayoutError> {
        let id = source.window().clone();
        let Some(handle) = self.windows.get(&id) else {
            return Err(LayoutError::UnknownWindow(id));
        };
        if !handle.is_shown() {
            return Err(LayoutError::InvalidOperation(format!(
                "window {id} is not shown"
            )));
        }
        if matches!(source, DragSource::Pane(_)) && handle.is_document() {
            return Err(LayoutError::InvalidOperation(
                "document panes cannot be dragged".into(),
            ));
        }
        if matches!(
            self.layout.find_window(&id),
            Some(WindowPlace::AutoHidden { .. })
        ) {
            return Err(LayoutError::InvalidOperation(format!(
                "auto-hidden window {id} cannot be dragged"
            )));
        }
        if matches!(source, DragSource::Tab(_)) {
            if let Some(previous) = self.layout.select_window(&id) {
                self.listeners.notify(&LayoutEvent::SelectionChanged {
                    window: id.clone(),
                    previous: Some(previous),
                });
            }
        }
        self.drag.begin(source, at);
        Ok(())
    }

    /// Moves the drag to the pointer position and reports what releasing
    /// here would do.
    pub fn update_drag(&mut self, point: Point) -> DropZone {
        self.drag.update(&mut self.layout, point)
    }

    /// Abandons the drag without changing anything.
    pub fn cancel_drag(&mut self) {
        self.drag.cancel();
    }

    /// Releases the drag at the pointer position and applies the drop.
    pub fn finish_drag(&mut self, point: Point) {
        let outcome = self.drag.finish(&mut self.layout, &mut self.windows, point);
        self.apply_drop(outcome);
    }

    fn apply_drop(&mut self, outcome: DropOutcome) {
        match outcome {
            DropOutcome::Nothing => {}
            DropOutcome::FrameMoved | DropOutcome::Rearranged => {
                self.listeners.notify(&LayoutEvent::SaveNeeded);
            }
            DropOutcome::Floated { windows, bounds } => {
                for id in &windows {
                    let was = self.windows.get(id).map(|handle| handle.dock_state());
                    if let Some(handle) = self.windows.get_mut(id) {
                        handle.set_floating_bounds(Some(bounds));
                        handle.set_dock_state(DockState::Floated);
                    }
                    if let Some(was) = was {
                        self.report_dock_state(id, was, DockState::Floated);
                    }
                }
                self.listeners.notify(&LayoutEvent::SaveNeeded);
            }
            DropOutcome::Docked { windows, .. } => {
                for id in &windows {
                    let was = self.windows.get(id).map(|handle| handle.dock_state());
                    if let Some(handle) = self.windows.get_mut(id) {
                        handle.set_dock_state(DockState::Docked);
                    }
                    if let Some(was) = was {
                        self.report_dock_state(id, was, DockState::Docked);
                    }
                }
                self.listeners.notify(&LayoutEvent::SaveNeeded);
            }
            DropOutcome::Tabbed {
                windows,
                zone,
                selected,
                previous_selection,
            } => {
                let state = if zone.is_some() {
                    DockState::Docked
                } else {
                    DockState::Floated
                };
                let edge = zone.and_then(Position::edge);
                for id in &windows {
                    let was = self.windows.get(id).map(|handle| handle.dock_state());
                    if let Some(handle) = self.windows.get_mut(id) {
                        handle.set_dock_state(state);
                        if let Some(edge) = edge {
                            handle.set_preferred_dock_side(edge);
                        }
                    }
                    if let Some(was) = was {
                        self.report_dock_state(id, was, state);
                    }
                }
                if previous_selection.is_some() {
                    self.listeners.notify(&LayoutEvent::SelectionChanged {
                        window: selected,
                        previous: previous_selection,
                    });
                }
                self.listeners.notify(&LayoutEvent::SaveNeeded);
            }
        }
    }

    // =============================================================================
    // Persistence

    /// Captures the whole arrangement as a document, refreshing the hints
    /// of everything shown first.
    pub fn save_layout(&mut self) -> Memento {
        self.refresh_shown_hints();
        persistence::save_document(&self.layout, &self.windows, self.active_window())
    }

    /// Replaces the arrangement with the one the document describes.
    ///
    /// The document is parsed completely before anything is touched, so a
    /// malformed one leaves the layout as it was. Referenced windows that
    /// are not registered are skipped; registered windows the document
    /// does not place end up hidden.
    pub fn load_layout(&mut self, doc: &Memento) -> Result<(), LayoutError> {
        let plan = persistence::parse_plan(doc, &self.windows, self.layout.options())?;
        self.drag.cancel();

        let previously_shown = self.layout.windows();
        let placed = plan.windows();
        debug!("restoring a layout hosting {} windows", placed.len());

        let RestorePlan {
            hints,
            floating,
            strips,
            outer,
            active,
        } = plan;

        for (id, hint) in hints {
            if let Some(handle) = self.windows.get_mut(&id) {
                if let Some(size) = hint.auto_hide_size {
                    handle.set_autohide_size(Some(size));
                }
                if let Some(bounds) = hint.floating_bounds {
                    if bounds.size.w > 0. && bounds.size.h > 0. {
                        handle.set_floating_bounds(Some(bounds));
                    }
                }
            }
            self.layout.insert_hint(id, hint);
        }

        self.layout.restore_floating(
            floating
                .into_iter()
                .map(|(group, bounds)| FloatingGroup::new(group, bounds))
                .collect(),
        );
        self.layout.restore_strips(strips);
        self.layout.restore_outer(outer);

        let mut newly_shown = Vec::new();
        for id in &placed {
            let state = match self.layout.find_window(id) {
                Some(WindowPlace::Floating { .. }) => DockState::Floated,
                Some(WindowPlace::AutoHidden { .. }) => DockState::AutoHidden,
                _ => DockState::Docked,
            };
            let Some(handle) = self.windows.get_mut(id) else {
                continue;
            };
            handle.set_dock_state(state);
            if !handle.is_shown() {
                handle.set_shown(true);
                newly_shown.push(id.clone());
            }
        }

        for id in &previously_shown {
            if self.layout.contains_window(id) {
                continue;
            }
            let Some(handle) = self.windows.get_mut(id) else {
                continue;
            };
            handle.set_shown(false);
            self.listeners
                .notify(&LayoutEvent::Hidden { window: id.clone() });
        }
        let windows = &self.windows;
        self.active_history
            .retain(|id| windows.get(id).is_some_and(WindowHandle::is_shown));

        if let Some(active) = &active {
            if self.windows.get(active).is_some_and(WindowHandle::is_shown) {
                self.activate_shown(active);
            }
        }

        let shown: Vec<&WindowHandle> =
            self.windows.values().filter(|w| w.is_shown()).collect();
        self.layout.update_all_hints(&shown);

        for id in &newly_shown {
            self.listeners
                .notify(&LayoutEvent::Shown { window: id.clone() });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};

    use approx::assert_relative_eq;

    use super::*;

    #[derive(Default)]
    struct Recorder {
        events: RefCell<Vec<LayoutEvent>>,
        veto: Cell<bool>,
    }

    impl Recorder {
        fn take(&self) -> Vec<LayoutEvent> {
            self.events.borrow_mut().split_off(0)
        }

        fn count(&self, matches: impl Fn(&LayoutEvent) -> bool) -> usize {
            self.events.borrow().iter().filter(|e| matches(e)).count()
        }
    }

    impl LayoutListener for Recorder {
        fn on_event(&self, event: &LayoutEvent) {
            self.events.borrow_mut().push(event.clone());
        }

        fn document_hiding(&self, _window: &WindowHandle) -> bool {
            !self.veto.get()
        }
    }

    fn manager() -> LayoutManager {
        let mut manager = LayoutManager::new(LayoutOptions::default());
        manager.set_bounds(Rect::new(0., 0., 800., 600.));
        manager
    }

    fn recorded() -> (LayoutManager, Rc<Recorder>) {
        let mut manager = manager();
        let recorder = Rc::new(Recorder::default());
        manager.add_listener(recorder.clone());
        (manager, recorder)
    }

    fn id(name: &str) -> WindowId {
        WindowId::from(name)
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut manager = manager();
        manager.create_dockable("a", "A", None).unwrap();
        assert!(matches!(
            manager.create_document("a", "Other", None),
            Err(LayoutError::DuplicateWindow(_))
        ));
    }

    #[test]
    fn show_and_hide_are_idempotent() {
        let (mut manager, recorder) = recorded();
        manager.create_dockable("a", "A", None).unwrap();
        manager.show(&id("a")).unwrap();
        manager.show(&id("a")).unwrap();
        assert_eq!(
            recorder.count(|e| matches!(e, LayoutEvent::Shown { .. })),
            1
        );

        manager.hide(&id("a"));
        manager.hide(&id("a"));
        assert_eq!(
            recorder.count(|e| matches!(e, LayoutEvent::Hidden { .. })),
            1
        );
        assert!(!manager.is_shown(&id("a")));
    }

    #[test]
    fn a_shown_window_cannot_be_closed() {
        let mut manager = manager();
        manager.create_dockable("a", "A", None).unwrap();
        manager.show(&id("a")).unwrap();
        assert!(manager.close(&id("a")).is_none());

        manager.hide(&id("a"));
        let handle = manager.close(&id("a"));
        assert_eq!(handle.map(|h| h.id().clone()), Some(id("a")));
        assert!(manager.window(&id("a")).is_none());
    }

    #[test]
    fn a_closed_window_reopens_at_its_old_spot() {
        let mut manager = manager();
        manager.create_dockable("a", "A", None).unwrap();
        manager.create_dockable("b", "B", None).unwrap();
        manager.show(&id("a")).unwrap();
        manager.show(&id("b")).unwrap();
        let pane_of_a = manager.layout().find_window(&id("a"));
        assert_eq!(pane_of_a, manager.layout().find_window(&id("b")));

        manager.hide(&id("b"));
        let handle = manager.close(&id("b")).unwrap();
        manager.open(handle).unwrap();
        manager.show(&id("b")).unwrap();
        assert_eq!(manager.layout().find_window(&id("b")), pane_of_a);
    }

    #[test]
    fn a_listener_can_veto_hiding_a_document() {
        let (mut manager, recorder) = recorded();
        manager.create_document("doc", "Doc", None).unwrap();
        manager.show(&id("doc")).unwrap();

        recorder.veto.set(true);
        manager.hide(&id("doc"));
        assert!(manager.is_shown(&id("doc")));

        recorder.veto.set(false);
        manager.hide(&id("doc"));
        assert!(!manager.is_shown(&id("doc")));
    }

    #[test]
    fn activation_reports_the_handover_in_order() {
        let (mut manager, recorder) = recorded();
        manager.create_dockable("a", "A", None).unwrap();
        manager.create_dockable("b", "B", None).unwrap();
        manager.show(&id("a")).unwrap();
        manager.show(&id("b")).unwrap();
        manager.activate(&id("a")).unwrap();
        recorder.take();

        manager.activate(&id("b")).unwrap();
        assert_eq!(
            recorder.take(),
            vec![
                LayoutEvent::Deactivated { window: id("a") },
                LayoutEvent::SelectionChanged {
                    window: id("b"),
                    previous: Some(id("a")),
                },
                LayoutEvent::Activated { window: id("b") },
            ]
        );

        // Re-activating the active window is quiet.
        manager.activate(&id("b")).unwrap();
        assert_eq!(recorder.take(), vec![]);
    }

    #[test]
    fn hiding_the_active_window_activates_the_panes_successor() {
        let mut manager = manager();
        for name in ["a", "b", "c"] {
            manager.create_dockable(name, name, None).unwrap();
            manager.show(&id(name)).unwrap();
        }
        manager.activate(&id("a")).unwrap();
        manager.activate(&id("b")).unwrap();
        manager.activate(&id("c")).unwrap();

        manager.hide(&id("c"));
        assert_eq!(manager.active_window(), Some(&id("b")));
    }

    #[test]
    fn hiding_the_last_frame_window_falls_back_to_the_history() {
        let mut manager = manager();
        manager.create_dockable("a", "A", None).unwrap();
        manager.create_dockable("b", "B", None).unwrap();
        manager.show(&id("a")).unwrap();
        manager.show(&id("b")).unwrap();
        manager.activate(&id("a")).unwrap();
        manager.activate(&id("b")).unwrap();

        manager.request_float(&id("b")).unwrap();
        manager.hide(&id("b"));
        assert_eq!(manager.active_window(), Some(&id("a")));
    }

    #[test]
    fn float_then_dock_returns_to_the_remembered_pane() {
        let mut manager = manager();
        manager.create_dockable("a", "A", None).unwrap();
        manager.create_dockable("b", "B", None).unwrap();
        manager.show(&id("a")).unwrap();
        manager.show(&id("b")).unwrap();

        manager.request_float(&id("b")).unwrap();
        assert!(matches!(
            manager.layout().find_window(&id("b")),
            Some(WindowPlace::Floating { .. })
        ));
        assert_eq!(
            manager.window(&id("b")).map(|w| w.dock_state()),
            Some(DockState::Floated)
        );

        manager.request_dock(&id("b")).unwrap();
        assert_eq!(
            manager.layout().find_window(&id("b")),
            manager.layout().find_window(&id("a"))
        );
        assert_eq!(
            manager.window(&id("b")).map(|w| w.dock_state()),
            Some(DockState::Docked)
        );
    }

    #[test]
    fn floating_a_pane_keeps_its_tabs_and_bounds() {
        let mut manager = manager();
        manager.create_dockable("a", "A", None).unwrap();
        manager.create_dockable("b", "B", None).unwrap();
        manager.show(&id("a")).unwrap();
        manager.show(&id("b")).unwrap();
        manager.activate(&id("b")).unwrap();
        let pane = manager.layout().window_rect(&id("b")).unwrap();

        manager.request_float_pane(&id("b")).unwrap();
        assert!(matches!(
            manager.layout().find_window(&id("a")),
            Some(WindowPlace::Floating { .. })
        ));
        let frame = &manager.layout().floating()[0];
        assert_eq!(frame.bounds(), pane);
        assert_eq!(frame.bounds(), Rect::new(560., 0., 240., 600.));
        assert_eq!(frame.group().windows(), [id("a"), id("b")]);
        assert_eq!(frame.group().selected_window(), &id("b"));
        assert_eq!(
            manager.window(&id("a")).map(|w| w.dock_state()),
            Some(DockState::Floated)
        );
        assert!(manager.layout().zone(Position::Right).is_none());
    }

    #[test]
    fn auto_hide_stows_at_the_zone_edge_and_docks_back() {
        let mut manager = manager();
        manager.create_dockable("a", "A", None).unwrap();
        manager.show(&id("a")).unwrap();

        manager.request_auto_hide(&id("a")).unwrap();
        assert!(matches!(
            manager.layout().find_window(&id("a")),
            Some(WindowPlace::AutoHidden {
                side: DockSide::Right,
                ..
            })
        ));

        manager.request_dock(&id("a")).unwrap();
        assert!(matches!(
            manager.layout().find_window(&id("a")),
            Some(WindowPlace::Docked {
                zone: Position::Right,
                ..
            })
        ));
    }

    #[test]
    fn an_auto_hidden_tab_docks_back_next_to_its_mate() {
        let mut manager = manager();
        manager.create_dockable("a", "A", None).unwrap();
        manager.create_dockable("b", "B", None).unwrap();
        manager
            .set_preferred_dock_side(&id("a"), DockSide::Left)
            .unwrap();
        manager
            .set_preferred_dock_side(&id("b"), DockSide::Left)
            .unwrap();
        manager.show(&id("a")).unwrap();
        manager.show(&id("b")).unwrap();

        manager.request_auto_hide(&id("b")).unwrap();
        assert!(matches!(
            manager.layout().find_window(&id("b")),
            Some(WindowPlace::AutoHidden {
                side: DockSide::Left,
                ..
            })
        ));
        assert!(matches!(
            manager.layout().find_window(&id("a")),
            Some(WindowPlace::Docked {
                zone: Position::Left,
                ..
            })
        ));

        manager.request_dock(&id("b")).unwrap();
        assert_eq!(
            manager.layout().find_window(&id("b")),
            manager.layout().find_window(&id("a"))
        );
    }

    #[test]
    fn auto_hiding_the_active_window_clears_the_history() {
        let mut manager = manager();
        manager.create_dockable("a", "A", None).unwrap();
        manager.create_dockable("b", "B", None).unwrap();
        manager.show(&id("a")).unwrap();
        manager.show(&id("b")).unwrap();
        manager.activate(&id("a")).unwrap();
        manager.activate(&id("b")).unwrap();

        manager.request_auto_hide(&id("b")).unwrap();
        assert_eq!(manager.active_window(), None);
    }

    #[test]
    fn documents_cannot_leave_the_document_zone() {
        let mut manager = manager();
        manager.create_document("doc", "Doc", None).unwrap();
        manager.show(&id("doc")).unwrap();
        assert!(manager.request_float(&id("doc")).is_err());
        assert!(manager.request_auto_hide(&id("doc")).is_err());
    }

    #[test]
    fn moving_a_divider_resizes_the_zone_and_asks_for_a_save() {
        let (mut manager, recorder) = recorded();
        manager.create_dockable("a", "A", None).unwrap();
        manager.show(&id("a")).unwrap();
        recorder.take();

        manager.resize_zone(Position::Right, 0.45).unwrap();
        let rect = manager.layout().window_rect(&id("a")).unwrap();
        assert_relative_eq!(rect.size.w, 360., epsilon = 1e-6);
        assert_eq!(recorder.take(), vec![LayoutEvent::SaveNeeded]);

        // No left zone, so there is no divider to move there.
        assert!(manager.resize_zone(Position::Left, 0.5).is_err());
    }

    #[test]
    fn window_sets_show_and_hide_together() {
        let mut manager = manager();
        manager.create_dockable("a", "A", None).unwrap();
        manager.create_dockable("b", "B", None).unwrap();
        manager.add_window_set("tools", &[id("a"), id("b"), id("ghost")]);

        manager.show_window_set("tools");
        assert!(manager.is_shown(&id("a")));
        assert!(manager.is_shown(&id("b")));

        manager.hide_window_set("tools");
        assert!(!manager.is_shown(&id("a")));
        assert!(!manager.is_shown(&id("b")));
    }

    #[test]
    fn renaming_updates_every_reference() {
        let mut manager = manager();
        manager.create_dockable("old", "Tool", None).unwrap();
        manager.show(&id("old")).unwrap();
        manager.activate(&id("old")).unwrap();
        manager.add_window_set("tools", &[id("old")]);

        manager.rename(&id("old"), "new").unwrap();
        assert!(manager.window(&id("old")).is_none());
        assert!(manager.layout().contains_window(&id("new")));
        assert_eq!(manager.active_window(), Some(&id("new")));

        manager.hide_window_set("tools");
        assert!(!manager.is_shown(&id("new")));
    }

    #[test]
    fn components_track_the_shown_content() {
        let (mut manager, recorder) = recorded();
        manager.create_document("d", "Doc", None).unwrap();
        recorder.take();

        manager
            .add_component(&id("d"), Component::new("editor"))
            .unwrap();
        assert_eq!(
            recorder.take(),
            vec![
                LayoutEvent::ComponentAdded {
                    window: id("d"),
                    component: "editor".to_owned(),
                },
                LayoutEvent::ComponentActivated {
                    window: id("d"),
                    component: Some("editor".to_owned()),
                },
            ]
        );

        manager
            .add_component(&id("d"), Component::new("preview"))
            .unwrap();
        manager.activate_component(&id("d"), "preview").unwrap();
        // Re-activating the same component or an unknown name stays quiet.
        manager.activate_component(&id("d"), "preview").unwrap();
        manager.activate_component(&id("d"), "missing").unwrap();
        assert_eq!(
            recorder.take(),
            vec![
                LayoutEvent::ComponentAdded {
                    window: id("d"),
                    component: "preview".to_owned(),
                },
                LayoutEvent::ComponentActivated {
                    window: id("d"),
                    component: Some("preview".to_owned()),
                },
            ]
        );

        manager.remove_component(&id("d"), "preview").unwrap();
        let handle = manager.window(&id("d")).unwrap();
        assert_eq!(
            handle.active_component().map(|c| c.name.as_str()),
            Some("editor")
        );
        assert_eq!(
            recorder.take(),
            vec![
                LayoutEvent::ComponentRemoved {
                    window: id("d"),
                    component: "preview".to_owned(),
                },
                LayoutEvent::ComponentActivated {
                    window: id("d"),
                    component: Some("editor".to_owned()),
                },
            ]
        );
    }

    #[test]
    fn dropping_a_tab_in_the_open_floats_it() {
        let (mut manager, recorder) = recorded();
        manager.create_dockable("a", "A", None).unwrap();
        manager.create_dockable("b", "B", None).unwrap();
        manager.show(&id("a")).unwrap();
        manager.show(&id("b")).unwrap();
        let tab = manager
            .layout()
            .window_rect(&id("b"))
            .map(|r| r.center())
            .unwrap();

        manager.begin_drag(DragSource::Tab(id("b")), tab).unwrap();
        recorder.take();
        manager.update_drag(Point::new(200., 300.));
        manager.finish_drag(Point::new(200., 300.));

        assert!(matches!(
            manager.layout().find_window(&id("b")),
            Some(WindowPlace::Floating { .. })
        ));
        let events = recorder.take();
        assert!(events.contains(&LayoutEvent::DockStateChanged {
            window: id("b"),
            state: DockState::Floated,
        }));
        assert!(events.contains(&LayoutEvent::SaveNeeded));
    }

    #[test]
    fn a_tab_drag_selects_once_and_reorders_silently() {
        let (mut manager, recorder) = recorded();
        manager.create_dockable("a", "A", None).unwrap();
        manager.create_dockable("b", "B", None).unwrap();
        manager.show(&id("a")).unwrap();
        manager.show(&id("b")).unwrap();
        recorder.take();

        // Grab b's tab on the bottom strip of the shared pane and slide it
        // over a's tab.
        manager
            .begin_drag(DragSource::Tab(id("b")), Point::new(700., 590.))
            .unwrap();
        assert_eq!(
            manager.update_drag(Point::new(600., 590.)),
            DropZone::Rearrange
        );
        manager.finish_drag(Point::new(600., 590.));

        let Some(WindowPlace::Docked { zone, pane }) = manager.layout().find_window(&id("b"))
        else {
            panic!("b left its pane");
        };
        let group = manager
            .layout()
            .zone(zone)
            .and_then(|z| z.tree().leaf(pane))
            .unwrap();
        assert_eq!(group.windows(), [id("b"), id("a")]);
        assert_eq!(group.selected_window(), &id("b"));
        assert_eq!(
            recorder.take(),
            vec![
                LayoutEvent::SelectionChanged {
                    window: id("b"),
                    previous: Some(id("a")),
                },
                LayoutEvent::SaveNeeded,
            ]
        );
    }

    #[test]
    fn load_restores_shown_windows_and_hides_the_rest() {
        let mut manager = manager();
        manager.create_dockable("a", "A", None).unwrap();
        manager.create_document("doc", "Doc", None).unwrap();
        manager.show(&id("a")).unwrap();
        manager.show(&id("doc")).unwrap();
        manager.activate(&id("a")).unwrap();
        let saved = manager.save_layout();

        manager.create_dockable("c", "C", None).unwrap();
        manager.show(&id("c")).unwrap();
        manager.hide(&id("a"));

        manager.load_layout(&saved).unwrap();
        assert!(manager.is_shown(&id("a")));
        assert!(manager.is_shown(&id("doc")));
        assert!(!manager.is_shown(&id("c")));
        assert_eq!(manager.active_window(), Some(&id("a")));
    }

    #[test]
    fn a_saved_arrangement_reloads_in_a_fresh_manager() {
        let mut source = manager();
        source.create_dockable("a", "A", None).unwrap();
        source.create_dockable("b", "B", None).unwrap();
        source.create_document("d", "Doc", None).unwrap();
        source
            .set_preferred_dock_side(&id("a"), DockSide::Top)
            .unwrap();
        source.show(&id("a")).unwrap();
        source.show(&id("b")).unwrap();
        source.show(&id("d")).unwrap();
        source.resize_zone(Position::Top, 0.4).unwrap();
        let saved = source.save_layout();

        let mut fresh = manager();
        fresh.create_dockable("a", "A", None).unwrap();
        fresh.create_dockable("b", "B", None).unwrap();
        fresh.create_document("d", "Doc", None).unwrap();
        fresh.load_layout(&saved).unwrap();

        assert!(matches!(
            fresh.layout().find_window(&id("a")),
            Some(WindowPlace::Docked {
                zone: Position::Top,
                ..
            })
        ));
        assert!(matches!(
            fresh.layout().find_window(&id("b")),
            Some(WindowPlace::Docked {
                zone: Position::Right,
                ..
            })
        ));
        assert!(matches!(
            fresh.layout().find_window(&id("d")),
            Some(WindowPlace::Docked {
                zone: Position::Document,
                ..
            })
        ));
        assert_eq!(
            fresh.layout().window_rect(&id("a")),
            source.layout().window_rect(&id("a"))
        );
        let top = fresh.layout().window_rect(&id("a")).unwrap();
        assert_relative_eq!(top.size.h, 240., epsilon = 1e-6);
        let right = fresh.layout().window_rect(&id("b")).unwrap();
        assert_relative_eq!(right.size.w, 240., epsilon = 1e-6);
        assert_relative_eq!(right.size.h, 360., epsilon = 1e-6);
    }

    #[test]
    fn a_full_round_trip_rebuilds_frames_and_strips() {
        let mut manager = manager();
        manager.create_dockable("a", "A", None).unwrap();
        manager.create_dockable("b", "B", None).unwrap();
        manager.create_dockable("c", "C", None).unwrap();
        manager.create_dockable("e", "E", None).unwrap();
        manager.create_document("d", "Doc", None).unwrap();
        manager
            .set_preferred_dock_side(&id("c"), DockSide::Bottom)
            .unwrap();
        manager
            .set_preferred_dock_side(&id("e"), DockSide::Left)
            .unwrap();
        manager.show(&id("a")).unwrap();
        manager.show(&id("b")).unwrap();
        manager.show(&id("c")).unwrap();
        manager.show(&id("e")).unwrap();
        manager.show(&id("d")).unwrap();
        manager.activate(&id("b")).unwrap();
        manager.request_float_pane(&id("b")).unwrap();
        manager.request_auto_hide(&id("c")).unwrap();
        let saved = manager.save_layout();
        let before = manager.layout().debug_tree();

        manager.request_dock(&id("b")).unwrap();
        manager.hide(&id("c"));
        manager.hide(&id("e"));
        manager.load_layout(&saved).unwrap();

        assert_eq!(manager.layout().debug_tree(), before);
        assert_eq!(manager.active_window(), Some(&id("b")));
    }
}
