//! Layout change notifications.
//!
//! Hosts register [`LayoutListener`]s with the manager and mirror the
//! resulting [`LayoutEvent`] stream into their widget toolkit. Events are
//! delivered synchronously, in the order the mutations happened.

use std::rc::Rc;

use crate::window::{DockState, WindowHandle, WindowId};

/// A single observable layout change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutEvent {
    /// The window was registered and can be shown.
    Opened { window: WindowId },
    /// The window was unregistered; its handle is gone.
    Closed { window: WindowId },
    /// The window became part of the layout.
    Shown { window: WindowId },
    /// The window left the layout but stays registered.
    Hidden { window: WindowId },
    /// The window became the active one.
    Activated { window: WindowId },
    /// The window stopped being the active one.
    Deactivated { window: WindowId },
    /// The window moved between docked, floated, and auto-hidden.
    DockStateChanged { window: WindowId, state: DockState },
    /// A different tab was selected within the window's pane.
    SelectionChanged {
        window: WindowId,
        previous: Option<WindowId>,
    },
    /// A component was added to the window.
    ComponentAdded { window: WindowId, component: String },
    /// A component was removed from the window.
    ComponentRemoved { window: WindowId, component: String },
    /// A different component became the window's shown content. None when
    /// the last component went away.
    ComponentActivated {
        window: WindowId,
        component: Option<String>,
    },
    /// The layout structure changed and should be persisted.
    SaveNeeded,
}

/// Receives layout notifications.
///
/// Listeners must not call back into the manager while an event is being
/// dispatched.
pub trait LayoutListener {
    fn on_event(&self, _event: &LayoutEvent) {}

    /// Consulted before a shown document is hidden or closed.
    ///
    /// Return `false` to veto. Non-closable documents are never closed
    /// regardless of this answer.
    fn document_hiding(&self, _window: &WindowHandle) -> bool {
        true
    }
}

/// The manager's listener registry.
///
/// Dispatch iterates over a copy of the list so registrations that happen
/// between events never shift an ongoing iteration.
#[derive(Default)]
pub(crate) struct Listeners {
    listeners: Vec<Rc<dyn LayoutListener>>,
}

impl Listeners {
    pub fn add(&mut self, listener: Rc<dyn LayoutListener>) {
        if !self.listeners.iter().any(|l| Rc::ptr_eq(l, &listener)) {
            self.listeners.push(listener);
        }
    }

    pub fn remove(&mut self, listener: &Rc<dyn LayoutListener>) {
        self.listeners.retain(|l| !Rc::ptr_eq(l, listener));
    }

    pub fn notify(&self, event: &LayoutEvent) {
        let listeners = self.listeners.clone();
        for listener in listeners {
            listener.on_event(event);
        }
    }

    /// True if every listener agrees to hide the given document.
    pub fn allows_hiding(&self, window: &WindowHandle) -> bool {
        let listeners = self.listeners.clone();
        listeners.iter().all(|l| l.document_hiding(window))
    }
}

impl std::fmt::Debug for Listeners {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Listeners")
            .field("count", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::window::WindowKind;

    struct Veto(Cell<bool>);

    impl LayoutListener for Veto {
        fn document_hiding(&self, _window: &WindowHandle) -> bool {
            !self.0.get()
        }
    }

    #[test]
    fn add_is_idempotent_per_instance() {
        let mut listeners = Listeners::default();
        let listener: Rc<dyn LayoutListener> = Rc::new(Veto(Cell::new(false)));
        listeners.add(listener.clone());
        listeners.add(listener.clone());

        let window = WindowHandle::new(WindowId::from("d"), WindowKind::Document, "Doc");
        assert!(listeners.allows_hiding(&window));

        listeners.remove(&listener);
        assert!(listeners.allows_hiding(&window));
    }

    #[test]
    fn any_veto_blocks_hiding() {
        let mut listeners = Listeners::default();
        let quiet: Rc<dyn LayoutListener> = Rc::new(Veto(Cell::new(false)));
        let veto = Rc::new(Veto(Cell::new(true)));
        listeners.add(quiet);
        listeners.add(veto.clone());

        let window = WindowHandle::new(WindowId::from("d"), WindowKind::Document, "Doc");
        assert!(!listeners.allows_hiding(&window));

        veto.0.set(false);
        assert!(listeners.allows_hiding(&window));
    }
}
