//! Drag and drop of tabs and panes.
//!
//! A drag starts on a tab or a pane title band, arms at the press point,
//! and becomes live once the pointer travels past the drag threshold. While
//! live, every pointer position classifies into a [`DropZone`]:
//!
//! - over the source pane's own tab strip, tabs are reordered in place,
//! - over another pane's title band or a floating frame, the source would
//!   tab onto the target,
//! - over the margin ring of a pane's content, the source would dock at the
//!   nearest edge of that pane,
//! - anywhere else, releasing floats the source (documents stay put).
//!
//! Dropping executes the classified zone. Docks remember the source size as
//! the split share, clamped so the target keeps at least half.

use std::collections::BTreeMap;

use tracing::trace;

use crate::geometry::{edges_touch, Point, Rect};
use crate::window::{DockSide, WindowHandle, WindowId, WindowKind};

use super::pane::{PaneKey, WindowGroup};
use super::{LayoutContainer, OuterTarget, Position, WindowPlace};

/// What a drag moves: a single tab or a whole pane of tabs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragSource {
    Tab(WindowId),
    Pane(WindowId),
}

impl DragSource {
    pub fn window(&self) -> &WindowId {
        match self {
            DragSource::Tab(id) | DragSource::Pane(id) => id,
        }
    }

    fn is_tab(&self) -> bool {
        matches!(self, DragSource::Tab(_))
    }
}

/// What releasing the pointer at the current position would do.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DropZone {
    /// Float the source, or do nothing for documents.
    #[default]
    None,
    /// Dock at an edge of the target pane.
    Top,
    Left,
    Bottom,
    Right,
    /// Tab onto the target pane.
    OnTop,
    /// Tabs were reordered within the source pane.
    Rearrange,
}

impl DropZone {
    fn edge(self) -> Option<DockSide> {
        match self {
            DropZone::Top => Some(DockSide::Top),
            DropZone::Left => Some(DockSide::Left),
            DropZone::Bottom => Some(DockSide::Bottom),
            DropZone::Right => Some(DockSide::Right),
            _ => None,
        }
    }
}

/// The pane or floating frame under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DropTarget {
    Docked { zone: Position, pane: PaneKey },
    Floating { index: usize },
}

/// What a finished drop did, for the caller to report.
#[derive(Debug)]
pub(crate) enum DropOutcome {
    Nothing,
    /// Windows left their host and float as one new group.
    Floated { windows: Vec<WindowId>, bounds: Rect },
    /// A floating frame was moved to the pointer, nothing re-hosted.
    FrameMoved,
    /// Windows docked as a new pane in the zone.
    Docked { windows: Vec<WindowId>, zone: Position },
    /// Windows tabbed onto an existing pane; zone is None for a floating
    /// target. The dragged window ends up selected.
    Tabbed {
        windows: Vec<WindowId>,
        zone: Option<Position>,
        selected: WindowId,
        previous_selection: Option<WindowId>,
    },
    /// Tabs were reordered within the source pane.
    Rearranged,
}

#[derive(Debug, Default)]
enum DragState {
    #[default]
    Idle,
    /// Pressed, but the pointer has not traveled past the threshold yet.
    Armed { source: DragSource, origin: Point },
    Dragging { source: DragSource, zone: DropZone },
}

/// Tracks one press-drag-release interaction.
#[derive(Debug, Default)]
pub struct DragController {
    state: DragState,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        !matches!(self.state, DragState::Idle)
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    pub fn source(&self) -> Option<&DragSource> {
        match &self.state {
            DragState::Idle => None,
            DragState::Armed { source, .. } | DragState::Dragging { source, .. } => Some(source),
        }
    }

    /// The zone the last pointer position classified into.
    pub fn zone(&self) -> DropZone {
        match &self.state {
            DragState::Dragging { zone, .. } => *zone,
            _ => DropZone::None,
        }
    }

    pub(crate) fn begin(&mut self, source: DragSource, at: Point) {
        self.state = DragState::Armed { source, origin: at };
    }

    pub(crate) fn cancel(&mut self) {
        self.state = DragState::Idle;
    }

    /// Feeds a pointer position, reordering tabs live when the pointer sits
    /// on the source pane's own tab strip. Returns the classified zone.
    pub(crate) fn update(&mut self, layout: &mut LayoutContainer, point: Point) -> DropZone {
        match std::mem::take(&mut self.state) {
            DragState::Idle => DropZone::None,
            DragState::Armed { source, origin } => {
                let threshold = layout.options().drag_threshold;
                if (point.x - origin.x).abs() < threshold
                    && (point.y - origin.y).abs() < threshold
                {
                    self.state = DragState::Armed { source, origin };
                    return DropZone::None;
                }
                let zone = classify(layout, &source, DropZone::None, point);
                self.state = DragState::Dragging { source, zone };
                zone
            }
            DragState::Dragging { source, zone: last } => {
                let zone = classify(layout, &source, last, point);
                self.state = DragState::Dragging { source, zone };
                zone
            }
        }
    }

    /// Releases the pointer, executing whatever the position classifies
    /// into. A press that never traveled past the threshold does nothing.
    pub(crate) fn finish(
        &mut self,
        layout: &mut LayoutContainer,
        windows: &mut BTreeMap<WindowId, WindowHandle>,
        point: Point,
    ) -> DropOutcome {
        let zone = self.update(layout, point);
        let state = std::mem::take(&mut self.state);
        let DragState::Dragging { source, .. } = state else {
            return DropOutcome::Nothing;
        };
        trace!(window = %source.window(), ?zone, "drop");
        execute_drop(layout, windows, &source, zone, point)
    }
}

// =============================================================================
// Classification

fn place_of(layout: &LayoutContainer, id: &WindowId) -> Option<DropTarget> {
    match layout.find_window(id)? {
        WindowPlace::Docked { zone, pane } => Some(DropTarget::Docked { zone, pane }),
        WindowPlace::Floating { index } => Some(DropTarget::Floating { index }),
        WindowPlace::AutoHidden { .. } => None,
    }
}

/// The topmost floating frame under the point, else the zone pane there.
fn target_at(layout: &LayoutContainer, point: Point) -> Option<DropTarget> {
    for (index, group) in layout.floating().iter().enumerate().rev() {
        if group.bounds().contains(point) {
            return Some(DropTarget::Floating { index });
        }
    }
    for position in layout.positions() {
        if let Some(zone) = layout.zone(position) {
            if let Some(pane) = zone.tree().leaf_at(point) {
                return Some(DropTarget::Docked {
                    zone: position,
                    pane,
                });
            }
        }
    }
    None
}

fn target_rect(layout: &LayoutContainer, target: DropTarget) -> Option<Rect> {
    match target {
        DropTarget::Docked { zone, pane } => layout.pane_rect(zone, pane),
        DropTarget::Floating { index } => Some(layout.floating().get(index)?.bounds()),
    }
}

fn target_group<'a>(layout: &'a LayoutContainer, target: DropTarget) -> Option<&'a WindowGroup> {
    match target {
        DropTarget::Docked { zone, pane } => layout.zone(zone)?.tree().leaf(pane),
        DropTarget::Floating { index } => Some(layout.floating().get(index)?.group()),
    }
}

/// Band of the pane occupied by its tab strip, with the uniform width of
/// one tab. Dockable panes show tabs along the bottom once they hold more
/// than one window; document panes always show them along the top.
fn tab_strip(
    layout: &LayoutContainer,
    rect: Rect,
    kind: WindowKind,
    len: usize,
) -> Option<(Rect, f64)> {
    let options = layout.options();
    let band = match kind {
        WindowKind::Document => Rect::new(rect.loc.x, rect.loc.y, rect.size.w, options.tab_strip),
        WindowKind::Dockable if len > 1 => Rect::new(
            rect.loc.x,
            rect.bottom() - options.tab_strip,
            rect.size.w,
            options.tab_strip,
        ),
        WindowKind::Dockable => return None,
    };
    let tab_w = options.tab_width.min(rect.size.w / len as f64);
    Some((band, tab_w))
}

fn tab_index_at(band: Rect, tab_w: f64, len: usize, point: Point) -> Option<usize> {
    if !band.contains(point) || tab_w <= 0. {
        return None;
    }
    let index = ((point.x - band.loc.x) / tab_w).floor() as usize;
    (index < len).then_some(index)
}

fn classify(
    layout: &mut LayoutContainer,
    source: &DragSource,
    last: DropZone,
    point: Point,
) -> DropZone {
    let Some(source_place) = place_of(layout, source.window()) else {
        return DropZone::None;
    };
    let target = target_at(layout, point);

    // Over the own tab strip a tab drag reorders live.
    if source.is_tab() && target == Some(source_place) {
        if let Some(zone) = try_rearrange(layout, source.window(), source_place, last, point) {
            return zone;
        }
    }

    let Some(target) = target else {
        return DropZone::None;
    };
    let (Some(trect), Some(tgroup)) = (target_rect(layout, target), target_group(layout, target))
    else {
        return DropZone::None;
    };
    let tkind = tgroup.kind();
    let tcount = tgroup.len();
    let target_floating = matches!(target, DropTarget::Floating { .. });

    let Some(sgroup) = target_group(layout, source_place) else {
        return DropZone::None;
    };
    let source_is_document = sgroup.kind().is_document();
    let source_count = sgroup.len();
    let whole_pane = !source.is_tab();

    // A document pane's band is its top tab strip.
    let title = if tkind.is_document() {
        layout.options().tab_strip
    } else {
        layout.options().title_band
    };

    // Over a title band the source would tab onto the target, unless the
    // target is the source itself or the kinds differ.
    if (source_is_document || whole_pane || source_count > 1) && point.y - trect.loc.y < title {
        if target == source_place || (source_is_document != tkind.is_document()) {
            return DropZone::None;
        }
        return DropZone::OnTop;
    }

    // Floating frames only take tabs, never edge docks.
    if target_floating {
        if source_is_document {
            return DropZone::None;
        }
        return DropZone::OnTop;
    }

    let width = trect.size.w;
    let mut height = trect.size.h - title;
    if !tkind.is_document() && tcount > 1 {
        height -= layout.options().tab_strip;
    }
    let px = point.x - trect.loc.x;
    let py = point.y - trect.loc.y - title;

    let marginx = (width / 3.).min(15.);
    let marginy = (height / 3.).min(15.);
    if px >= marginx && px < width - marginx && py >= marginy && py < height - marginy {
        return DropZone::None;
    }

    // Docking a pane to an edge of itself would change nothing; docking one
    // tab out of a tabbed pane is fine.
    if target == source_place {
        let forbid = if tkind.is_document() {
            tcount < 2
        } else {
            tcount == 1 || whole_pane
        };
        if forbid {
            return DropZone::None;
        }
    }

    if source_is_document && !tkind.is_document() {
        return DropZone::None;
    }

    let cx = px - width / 2.;
    let cy = py - height / 2.;
    let degrees = (cy * width).atan2(cx * height).to_degrees();
    let zone = if degrees < -45. && degrees >= -135. {
        DropZone::Top
    } else if degrees < -135. || degrees > 135. {
        DropZone::Left
    } else if degrees < 135. && degrees >= 45. {
        DropZone::Bottom
    } else {
        DropZone::Right
    };

    // A dockable docked against the document area must land flush with the
    // content edge, where it can become a proper edge zone.
    if !source_is_document && tkind.is_document() {
        let content = layout.content_rect();
        let flush = match zone {
            DropZone::Top => edges_touch(trect.loc.y, content.loc.y),
            DropZone::Left => edges_touch(trect.loc.x, content.loc.x),
            DropZone::Bottom => edges_touch(trect.bottom(), content.bottom()),
            DropZone::Right => edges_touch(trect.right(), content.right()),
            _ => true,
        };
        if !flush {
            return DropZone::None;
        }
    }

    zone
}

/// Live tab reordering. Returns the zone when the point sits on the tab
/// strip over a tab; None lets the general rules run.
fn try_rearrange(
    layout: &mut LayoutContainer,
    dragged: &WindowId,
    place: DropTarget,
    last: DropZone,
    point: Point,
) -> Option<DropZone> {
    let rect = target_rect(layout, place)?;
    let group = target_group(layout, place)?;
    let len = group.len();
    let last_index = group.position_of(dragged)?;
    let (band, tab_w) = tab_strip(layout, rect, group.kind(), len)?;
    if !band.contains(point) {
        return None;
    }
    let Some(index) = tab_index_at(band, tab_w, len, point) else {
        // Empty strip space past the tabs, let the general rules decide.
        return None;
    };

    if index == last_index {
        return Some(last);
    }
    // When moving left, wait until the pointer clears the trailing edge of
    // the hovered tab, otherwise the tabs flicker back and forth.
    if index < last_index && point.x >= band.loc.x + (index as f64 + 1.) * tab_w - 2. {
        return Some(DropZone::Rearrange);
    }

    let group = match place {
        DropTarget::Docked { zone, pane } => layout.zones.get_mut(&zone)?.tree_mut().leaf_mut(pane),
        DropTarget::Floating { index } => layout.floating_mut(index).map(|f| f.group_mut()),
    }?;
    group.move_tab(last_index, index);
    trace!(window = %dragged, from = last_index, to = index, "rearranged tab");
    Some(DropZone::Rearrange)
}

// =============================================================================
// Execution

fn execute_drop(
    layout: &mut LayoutContainer,
    windows: &mut BTreeMap<WindowId, WindowHandle>,
    source: &DragSource,
    zone: DropZone,
    point: Point,
) -> DropOutcome {
    let Some(source_place) = place_of(layout, source.window()) else {
        return DropOutcome::Nothing;
    };
    match zone {
        DropZone::None => drop_float(layout, windows, source, source_place, point),
        DropZone::Top | DropZone::Left | DropZone::Bottom | DropZone::Right => {
            drop_dock(layout, windows, source, source_place, zone, point)
        }
        DropZone::OnTop => drop_on_top(layout, windows, source, source_place, point),
        DropZone::Rearrange => DropOutcome::Rearranged,
    }
}

/// Zone 0: float the source at the pointer, documents stay put.
fn drop_float(
    layout: &mut LayoutContainer,
    windows: &mut BTreeMap<WindowId, WindowHandle>,
    source: &DragSource,
    place: DropTarget,
    point: Point,
) -> DropOutcome {
    let Some(sgroup) = target_group(layout, place) else {
        return DropOutcome::Nothing;
    };
    if sgroup.kind().is_document() {
        return DropOutcome::Nothing;
    }
    let Some(source_rect) = target_rect(layout, place) else {
        return DropOutcome::Nothing;
    };

    match (source, place) {
        // Dragging a whole floating frame just moves it.
        (DragSource::Pane(_), DropTarget::Floating { index }) => {
            layout.set_floating_bounds(
                index,
                Rect::from_loc_and_size(point, source_rect.size),
            );
            DropOutcome::FrameMoved
        }
        (DragSource::Pane(_), DropTarget::Docked { zone, pane }) => {
            let member_ids: Vec<WindowId> = sgroup.windows().to_vec();
            for id in &member_ids {
                if let Some(handle) = windows.get_mut(id) {
                    handle.set_bounds(source_rect);
                }
            }
            for id in &member_ids {
                if let Some(handle) = windows.get(id) {
                    layout.setup_hint(handle);
                }
            }
            let group = layout.zones.get_mut(&zone).unwrap().tree_mut().remove_leaf(pane);
            layout.remove_zone_if_empty(zone);
            layout.relayout();
            let bounds = Rect::from_loc_and_size(point, source_rect.size);
            layout.float_attach(group, bounds);
            DropOutcome::Floated {
                windows: member_ids,
                bounds,
            }
        }
        (DragSource::Tab(id), _) => {
            let id = id.clone();
            let kind = sgroup.kind();
            if let Some(handle) = windows.get_mut(&id) {
                handle.set_bounds(source_rect);
            }
            remove_from_place(layout, place, &id);
            let bounds = Rect::from_loc_and_size(point, source_rect.size);
            layout.float_attach(WindowGroup::new(kind, id.clone()), bounds);
            DropOutcome::Floated {
                windows: vec![id],
                bounds,
            }
        }
    }
}

/// Zones 1 to 4: dock the source as a new pane at an edge of the target.
fn drop_dock(
    layout: &mut LayoutContainer,
    windows: &mut BTreeMap<WindowId, WindowHandle>,
    source: &DragSource,
    place: DropTarget,
    zone: DropZone,
    point: Point,
) -> DropOutcome {
    let Some(edge) = zone.edge() else {
        return DropOutcome::Nothing;
    };
    let Some(DropTarget::Docked {
        zone: tzone,
        pane: tpane,
    }) = target_at(layout, point)
    else {
        return DropOutcome::Nothing;
    };

    // The source keeps its current size as the split share, but the target
    // keeps at least half.
    let Some(source_rect) = target_rect(layout, place) else {
        return DropOutcome::Nothing;
    };
    let weight = dock_weight(layout, tzone, source_rect);

    let residents = residents_of(layout, place);
    let group = detach_source(layout, source, place);
    let moved: Vec<WindowId> = group.windows().to_vec();
    layout.scrub_hint_references(&residents, &moved);

    let position;
    if tzone == Position::Document && !group.kind().is_document() {
        // A dockable landing on the document area joins (or becomes) the
        // edge zone on that side instead of splitting the documents.
        position = Position::from(edge);
        if !layout.zones.contains_key(&position) {
            layout.create_zone(edge, weight, OuterTarget::Document);
        }
        let zc = layout.zones.get_mut(&position).unwrap();
        let root = zc.tree().root();
        zc.tree_mut().dock_leaf(root, DockSide::Right, group, 0.5);
    } else {
        position = tzone;
        layout
            .zones
            .get_mut(&tzone)
            .unwrap()
            .tree_mut()
            .dock_leaf(Some(tpane), edge, group, weight);
    }
    layout.relayout();
    refresh_zone_hints(layout, windows, position);
    if position != tzone {
        // The documents shrank to make room, their ratios moved too.
        refresh_zone_hints(layout, windows, tzone);
    }

    DropOutcome::Docked {
        windows: moved,
        zone: position,
    }
}

/// Zone 5: tab the source onto the target pane and select the dragged
/// window.
fn drop_on_top(
    layout: &mut LayoutContainer,
    windows: &mut BTreeMap<WindowId, WindowHandle>,
    source: &DragSource,
    place: DropTarget,
    point: Point,
) -> DropOutcome {
    let Some(target) = target_at(layout, point) else {
        return DropOutcome::Nothing;
    };
    if target == place {
        return DropOutcome::Nothing;
    }

    // The floating stack shifts when the source frame is disposed, so
    // remember the target by one of its windows.
    let target_probe = match target {
        DropTarget::Floating { index } => layout
            .floating()
            .get(index)
            .map(|f| f.group().selected_window().clone()),
        DropTarget::Docked { .. } => None,
    };

    let residents = residents_of(layout, place);
    let group = detach_source(layout, source, place);
    let moved: Vec<WindowId> = group.windows().to_vec();
    layout.scrub_hint_references(&residents, &moved);

    let dragged = source.window().clone();
    let outcome_zone;
    match target {
        DropTarget::Docked { zone, pane } => {
            for id in &moved {
                layout.dock_on_top(zone, pane, id.clone());
            }
            outcome_zone = Some(zone);
        }
        DropTarget::Floating { .. } => {
            let probe = target_probe.unwrap();
            let index = layout
                .floating()
                .iter()
                .position(|f| f.contains(&probe))
                .unwrap();
            if let Some(frame) = layout.floating_mut(index) {
                for id in &moved {
                    frame.group_mut().add(id.clone());
                }
            }
            outcome_zone = None;
        }
    }
    let previous_selection = layout.select_window(&dragged);
    layout.relayout();
    if let Some(zone) = outcome_zone {
        refresh_zone_hints(layout, windows, zone);
    }

    DropOutcome::Tabbed {
        windows: moved,
        zone: outcome_zone,
        selected: dragged,
        previous_selection,
    }
}

/// Split share for docking into `zone`: the source's extent along the
/// zone's axis relative to the whole zone, clamped to [0.1, 0.5].
fn dock_weight(layout: &LayoutContainer, zone: Position, source_rect: Rect) -> f64 {
    let Some(container) = layout.zone(zone) else {
        return 0.5;
    };
    let zone_rect = container
        .tree()
        .root()
        .and_then(|root| container.tree().rect_of(root));
    let Some(zone_rect) = zone_rect else {
        return 0.5;
    };
    let weight = if container.is_horizontal() {
        source_rect.size.w / zone_rect.size.w
    } else {
        source_rect.size.h / zone_rect.size.h
    };
    weight.clamp(0.1, 0.5)
}

fn residents_of(layout: &LayoutContainer, place: DropTarget) -> Vec<WindowId> {
    match place {
        DropTarget::Docked { zone, .. } => layout
            .zone(zone)
            .map(|z| z.windows())
            .unwrap_or_default(),
        DropTarget::Floating { index } => layout
            .floating()
            .get(index)
            .map(|f| f.windows().to_vec())
            .unwrap_or_default(),
    }
}

/// Pulls the dragged tab or whole pane out of its host as one group,
/// collapsing emptied structure.
fn detach_source(
    layout: &mut LayoutContainer,
    source: &DragSource,
    place: DropTarget,
) -> WindowGroup {
    match (source, place) {
        (DragSource::Pane(_), DropTarget::Docked { zone, pane }) => {
            let group = layout.zones.get_mut(&zone).unwrap().tree_mut().remove_leaf(pane);
            layout.remove_zone_if_empty(zone);
            layout.relayout();
            group
        }
        (DragSource::Pane(_), DropTarget::Floating { index }) => {
            layout.floating.remove(index).into_group()
        }
        (DragSource::Tab(id), _) => {
            let kind = target_group(layout, place).map_or(WindowKind::Dockable, WindowGroup::kind);
            let id = id.clone();
            remove_from_place(layout, place, &id);
            WindowGroup::new(kind, id)
        }
    }
}

fn remove_from_place(layout: &mut LayoutContainer, place: DropTarget, id: &WindowId) {
    match place {
        DropTarget::Docked { zone, pane } => {
            let empty = {
                let Some(group) = layout
                    .zones
                    .get_mut(&zone)
                    .and_then(|z| z.tree_mut().leaf_mut(pane))
                else {
                    return;
                };
                group.remove(id);
                group.is_empty()
            };
            if empty {
                layout.zones.get_mut(&zone).unwrap().tree_mut().remove_leaf(pane);
                layout.remove_zone_if_empty(zone);
            }
            layout.relayout();
        }
        DropTarget::Floating { .. } => {
            layout.remove_floating_window(id);
        }
    }
}

/// Re-captures the hints of every window in the zone after a drop changed
/// its pane arrangement.
fn refresh_zone_hints(
    layout: &mut LayoutContainer,
    windows: &BTreeMap<WindowId, WindowHandle>,
    zone: Position,
) {
    let ids = match layout.zone(zone) {
        Some(z) => z.windows(),
        None => return,
    };
    for id in ids {
        if let Some(handle) = windows.get(&id) {
            layout.update_hint(handle);
        }
    }
}
