//! A docking-window layout engine.
//!
//! Windows register with a [`LayoutManager`] and are arranged inside a
//! rectangular content area: documents share a tabbed zone in the middle,
//! dockables split the four edges around it, and both can be torn off into
//! floating groups or collapsed onto auto-hide strips. The engine is pure
//! geometry and bookkeeping; a host toolkit draws the panes at the rects the
//! layout computes and feeds pointer input back into the drag controller.
//!
//! The pieces:
//!
//! - [`window`]: window identity, kind, dock state, and per-window metadata.
//! - [`layout`]: the pane trees, zones, floating groups, auto-hide strips,
//!   layout hints, and the drag-and-drop controller.
//! - [`persistence`]: saving the whole arrangement to a JSON document and
//!   restoring it.
//! - [`event`]: change notifications hosts subscribe to.

pub mod event;
pub mod geometry;
pub mod layout;
mod manager;
pub mod persistence;
pub mod window;

pub use event::{LayoutEvent, LayoutListener};
pub use layout::drag::{DragSource, DropZone};
pub use layout::{LayoutOptions, Position};
pub use manager::LayoutManager;
pub use persistence::Memento;
pub use window::{DockSide, DockState, WindowId, WindowKind};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("window name {0} is already in use")]
    DuplicateWindow(WindowId),
    #[error("unknown window {0}")]
    UnknownWindow(WindowId),
    #[error("{0}")]
    InvalidOperation(String),
    #[error("malformed layout document: {0}")]
    Parse(String),
}
