use std::collections::BTreeMap;
use std::rc::Rc;

use approx::assert_relative_eq;
use insta::assert_snapshot;
use proptest::prelude::*;
use proptest_derive::Arbitrary;

use super::drag::{DragController, DragSource, DropOutcome, DropZone};
use super::pane::WindowGroup;
use super::*;
use crate::geometry::Point;
use crate::window::{WindowHandle, WindowKind};

fn container() -> LayoutContainer {
    let mut layout = LayoutContainer::new(Rc::new(LayoutOptions::default()));
    layout.set_bounds(Rect::new(0., 0., 800., 600.));
    layout
}

fn dockable(name: &str) -> WindowHandle {
    WindowHandle::new(WindowId::from(name), WindowKind::Dockable, name)
}

fn dockable_at(name: &str, side: DockSide) -> WindowHandle {
    let mut handle = dockable(name);
    handle.set_preferred_dock_side(side);
    handle
}

fn document(name: &str) -> WindowHandle {
    WindowHandle::new(WindowId::from(name), WindowKind::Document, name)
}

fn id(name: &str) -> WindowId {
    WindowId::from(name)
}

/// Docks a window and registers its handle, the way a host would.
fn add_docked(
    layout: &mut LayoutContainer,
    windows: &mut BTreeMap<WindowId, WindowHandle>,
    name: &str,
    side: DockSide,
) {
    let mut handle = dockable_at(name, side);
    handle.set_shown(true);
    layout.add_dockable(&handle);
    windows.insert(handle.id().clone(), handle);
}

#[test]
fn a_fresh_container_has_only_the_document_zone() {
    let layout = container();
    layout.verify_invariants();
    assert_eq!(layout.positions(), vec![Position::Document]);
    assert_snapshot!(
        layout.debug_tree(),
        @"
    document:
      (empty)
    "
    );
}

#[test]
fn dockables_open_zones_at_their_preferred_edges() {
    let mut layout = container();
    layout.add_dockable(&dockable_at("left", DockSide::Left));
    layout.add_dockable(&dockable_at("bottom", DockSide::Bottom));
    layout.add_document(&document("doc"));
    layout.verify_invariants();

    assert_eq!(
        layout.positions(),
        vec![Position::Left, Position::Document, Position::Bottom]
    );
    assert_snapshot!(
        layout.debug_tree(),
        @"
    left:
      group [left*]
    document:
      documents [doc*]
    bottom:
      group [bottom*]
    "
    );
}

#[test]
fn windows_tab_onto_the_base_pane_in_arrival_order() {
    let mut layout = container();
    layout.add_dockable(&dockable_at("a", DockSide::Right));
    layout.add_dockable(&dockable_at("b", DockSide::Right));
    layout.add_dockable(&dockable_at("c", DockSide::Right));

    assert_eq!(layout.select_window(&id("b")), Some(id("a")));
    assert_eq!(layout.select_window(&id("b")), None);
    layout.verify_invariants();

    assert_snapshot!(
        layout.debug_tree(),
        @"
    document:
      (empty)
    right:
      group [a b* c]
    "
    );
}

#[test]
fn removing_the_last_dockable_dissolves_its_zone() {
    let mut layout = container();
    layout.add_dockable(&dockable_at("a", DockSide::Right));
    layout.add_dockable(&dockable_at("b", DockSide::Right));

    layout.remove_window(&id("a"));
    layout.verify_invariants();
    assert_snapshot!(
        layout.debug_tree(),
        @"
    document:
      (empty)
    right:
      group [b*]
    "
    );

    layout.remove_window(&id("b"));
    layout.verify_invariants();
    assert_eq!(layout.positions(), vec![Position::Document]);
    assert!(layout.zone(Position::Right).is_none());
}

#[test]
fn the_document_zone_survives_emptying() {
    let mut layout = container();
    layout.add_document(&document("d"));
    layout.remove_window(&id("d"));
    layout.verify_invariants();

    assert_eq!(layout.positions(), vec![Position::Document]);
    assert!(layout.zone(Position::Document).is_some());
}

#[test]
fn moving_a_divider_reshapes_the_panes() {
    let mut layout = container();
    layout.add_dockable(&dockable_at("a", DockSide::Right));
    let target = layout.zone(Position::Right).unwrap().primary_pane().unwrap();
    let pane = layout.zone_mut(Position::Right).unwrap().tree_mut().dock_leaf(
        Some(target),
        DockSide::Left,
        WindowGroup::new(WindowKind::Dockable, id("b")),
        0.5,
    );
    layout.relayout();
    layout.verify_invariants();
    assert_relative_eq!(
        layout.pane_rect(Position::Right, pane).unwrap().size.w,
        120.,
        epsilon = 1e-6
    );

    let divider = layout.zone(Position::Right).unwrap().tree().root().unwrap();
    assert!(layout.set_split_ratio(Position::Right, divider, 0.25));
    assert_relative_eq!(
        layout.pane_rect(Position::Right, pane).unwrap().size.w,
        60.,
        epsilon = 1e-6
    );

    // A leaf is not a divider.
    assert!(!layout.set_split_ratio(Position::Right, pane, 0.5));

    assert!(layout.set_zone_share(Position::Right, 0.5));
    assert_relative_eq!(
        layout.zone_extent_ratio(Position::Right).unwrap(),
        0.5,
        epsilon = 1e-6
    );

    // A lone zone fills everything and has no divider above it.
    let mut fresh = container();
    assert!(!fresh.set_zone_share(Position::Document, 0.5));
}

#[test]
fn a_tab_dropped_at_the_left_band_splits_the_pane() {
    let mut layout = container();
    let mut windows = BTreeMap::new();
    add_docked(&mut layout, &mut windows, "a", DockSide::Right);
    add_docked(&mut layout, &mut windows, "b", DockSide::Right);

    let mut drag = DragController::new();
    drag.begin(DragSource::Tab(id("b")), Point::new(700., 590.));
    assert_eq!(drag.update(&mut layout, Point::new(565., 298.)), DropZone::Left);

    let outcome = drag.finish(&mut layout, &mut windows, Point::new(565., 298.));
    assert!(matches!(
        outcome,
        DropOutcome::Docked { ref windows, zone: Position::Right } if *windows == [id("b")]
    ));
    layout.verify_invariants();

    assert_snapshot!(
        layout.debug_tree(),
        @"
    document:
      (empty)
    right:
      split h 0.50
        group [b*]
        group [a*]
    "
    );
}

#[test]
fn the_pane_center_is_not_a_drop_target() {
    let mut layout = container();
    let mut windows = BTreeMap::new();
    add_docked(&mut layout, &mut windows, "a", DockSide::Right);
    add_docked(&mut layout, &mut windows, "b", DockSide::Right);

    let mut drag = DragController::new();
    drag.begin(DragSource::Tab(id("b")), Point::new(700., 590.));
    assert_eq!(drag.update(&mut layout, Point::new(680., 310.)), DropZone::None);

    drag.cancel();
    assert!(!drag.is_active());
    layout.verify_invariants();
    assert_snapshot!(
        layout.debug_tree(),
        @"
    document:
      (empty)
    right:
      group [a* b]
    "
    );
}

#[test]
fn dropping_in_the_open_floats_the_tab_at_the_pointer() {
    let mut layout = container();
    let mut windows = BTreeMap::new();
    add_docked(&mut layout, &mut windows, "a", DockSide::Right);
    add_docked(&mut layout, &mut windows, "b", DockSide::Right);

    let mut drag = DragController::new();
    drag.begin(DragSource::Tab(id("b")), Point::new(700., 590.));
    assert_eq!(drag.update(&mut layout, Point::new(200., 300.)), DropZone::None);

    let outcome = drag.finish(&mut layout, &mut windows, Point::new(200., 300.));
    assert!(matches!(
        outcome,
        DropOutcome::Floated { ref windows, bounds }
            if *windows == [id("b")] && bounds == Rect::new(200., 300., 240., 600.)
    ));
    layout.verify_invariants();

    assert_snapshot!(
        layout.debug_tree(),
        @"
    document:
      (empty)
    right:
      group [a*]
    floating:
      group [b*] at (200,300 240x600)
    "
    );
}

#[test]
fn a_floating_frame_takes_tabs_on_top() {
    let mut layout = container();
    let mut windows = BTreeMap::new();
    add_docked(&mut layout, &mut windows, "a", DockSide::Right);
    add_docked(&mut layout, &mut windows, "b", DockSide::Right);

    let mut drag = DragController::new();
    drag.begin(DragSource::Tab(id("b")), Point::new(700., 590.));
    drag.finish(&mut layout, &mut windows, Point::new(200., 300.));

    drag.begin(DragSource::Tab(id("a")), Point::new(680., 300.));
    assert_eq!(drag.update(&mut layout, Point::new(210., 310.)), DropZone::OnTop);

    let outcome = drag.finish(&mut layout, &mut windows, Point::new(210., 310.));
    assert!(matches!(
        outcome,
        DropOutcome::Tabbed {
            zone: None,
            ref selected,
            ref previous_selection,
            ..
        } if *selected == id("a") && *previous_selection == Some(id("b"))
    ));
    layout.verify_invariants();

    // The dragged tab's pane was the last of its zone, so the zone is gone.
    assert!(layout.zone(Position::Right).is_none());
    assert_snapshot!(
        layout.debug_tree(),
        @"
    document:
      (empty)
    floating:
      group [b a*] at (200,300 240x600)
    "
    );
}

#[test]
fn dragging_along_the_tab_strip_reorders_live() {
    let mut layout = container();
    let mut windows = BTreeMap::new();
    add_docked(&mut layout, &mut windows, "a", DockSide::Right);
    add_docked(&mut layout, &mut windows, "b", DockSide::Right);

    let mut drag = DragController::new();
    drag.begin(DragSource::Tab(id("b")), Point::new(700., 590.));
    assert_eq!(
        drag.update(&mut layout, Point::new(600., 590.)),
        DropZone::Rearrange
    );

    let outcome = drag.finish(&mut layout, &mut windows, Point::new(600., 590.));
    assert!(matches!(outcome, DropOutcome::Rearranged));
    layout.verify_invariants();

    assert_snapshot!(
        layout.debug_tree(),
        @"
    document:
      (empty)
    right:
      group [b a*]
    "
    );
}

#[test]
fn a_dockable_docked_against_documents_needs_a_flush_edge() {
    let mut layout = container();
    let mut windows = BTreeMap::new();
    add_docked(&mut layout, &mut windows, "a", DockSide::Right);
    layout.add_document(&document("d"));

    let mut drag = DragController::new();
    drag.begin(DragSource::Tab(id("a")), Point::new(680., 300.));

    // The inner edge of the document pane faces the right zone, not the
    // content edge, so no zone could grow there.
    assert_eq!(drag.update(&mut layout, Point::new(555., 300.)), DropZone::None);
    assert_eq!(drag.update(&mut layout, Point::new(5., 300.)), DropZone::Left);

    let outcome = drag.finish(&mut layout, &mut windows, Point::new(5., 300.));
    assert!(matches!(
        outcome,
        DropOutcome::Docked { ref windows, zone: Position::Left } if *windows == [id("a")]
    ));
    layout.verify_invariants();

    assert!(layout.zone(Position::Right).is_none());
    assert_snapshot!(
        layout.debug_tree(),
        @"
    left:
      group [a*]
    document:
      documents [d*]
    "
    );
}

#[test]
fn a_document_tab_splits_the_area_and_tabs_back_on_top() {
    let mut layout = container();
    let mut windows = BTreeMap::new();
    layout.add_document(&document("d"));
    layout.add_document(&document("e"));

    let mut drag = DragController::new();
    drag.begin(DragSource::Tab(id("e")), Point::new(150., 10.));
    assert_eq!(drag.update(&mut layout, Point::new(400., 595.)), DropZone::Bottom);

    let outcome = drag.finish(&mut layout, &mut windows, Point::new(400., 595.));
    assert!(matches!(
        outcome,
        DropOutcome::Docked { ref windows, zone: Position::Document } if *windows == [id("e")]
    ));
    layout.verify_invariants();
    assert_snapshot!(
        layout.debug_tree(),
        @"
    document:
      split v 0.50
        documents [d*]
        documents [e*]
    "
    );

    // The lower pane's tab strip takes the tab back, no matter how far from
    // the content edge it sits.
    drag.begin(DragSource::Tab(id("d")), Point::new(50., 10.));
    assert_eq!(drag.update(&mut layout, Point::new(150., 310.)), DropZone::OnTop);

    let outcome = drag.finish(&mut layout, &mut windows, Point::new(150., 310.));
    assert!(matches!(
        outcome,
        DropOutcome::Tabbed {
            zone: Some(Position::Document),
            ref selected,
            ref previous_selection,
            ..
        } if *selected == id("d") && *previous_selection == Some(id("e"))
    ));
    layout.verify_invariants();
    assert_snapshot!(
        layout.debug_tree(),
        @"
    document:
      documents [e d*]
    "
    );
}

#[test]
fn strip_items_shrink_the_content_area() {
    let mut layout = container();
    layout.push_strip_item(DockSide::Left, WindowGroup::new(WindowKind::Dockable, id("a")));
    layout.push_strip_item(DockSide::Left, WindowGroup::new(WindowKind::Dockable, id("b")));
    layout.verify_invariants();

    assert_eq!(layout.content_rect(), Rect::new(24., 0., 776., 600.));
    assert_snapshot!(
        layout.debug_tree(),
        @"
    document:
      (empty)
    autohide left:
      group [a*]
      group [b*]
    "
    );

    layout.set_active_overlay(Some((DockSide::Left, 0)));
    assert_eq!(
        layout.overlay_rect(Some(Size::new(200., 300.))),
        Some(Rect::new(24., 0., 200., 600.))
    );
}

#[test]
fn taking_strip_items_keeps_the_overlay_on_the_same_window() {
    let mut layout = container();
    layout.push_strip_item(DockSide::Left, WindowGroup::new(WindowKind::Dockable, id("a")));
    layout.push_strip_item(DockSide::Left, WindowGroup::new(WindowKind::Dockable, id("b")));
    layout.set_active_overlay(Some((DockSide::Left, 1)));

    let item = layout.take_strip_item(DockSide::Left, 0);
    assert_eq!(item.windows(), [id("a")]);
    assert_eq!(layout.active_overlay(), Some((DockSide::Left, 0)));

    let _ = layout.take_strip_item(DockSide::Left, 0);
    assert_eq!(layout.active_overlay(), None);
    layout.verify_invariants();
}

#[test]
fn a_hint_recreates_the_lost_zone_at_its_old_share() {
    let mut layout = container();
    let mut handle = dockable_at("a", DockSide::Bottom);
    handle.set_shown(true);
    layout.add_dockable(&handle);
    assert!(layout.set_zone_share(Position::Bottom, 0.45));

    layout.setup_hint(&handle);
    layout.remove_window(&id("a"));
    assert!(layout.zone(Position::Bottom).is_none());

    layout.add_dockable(&handle);
    layout.verify_invariants();
    assert!(matches!(
        layout.find_window(&id("a")),
        Some(WindowPlace::Docked { zone: Position::Bottom, .. })
    ));
    assert_relative_eq!(
        layout.zone_extent_ratio(Position::Bottom).unwrap(),
        0.45,
        epsilon = 1e-6
    );
}

#[test]
fn outer_snapshots_round_trip_zone_shares() {
    let mut layout = container();
    layout.add_dockable(&dockable_at("t", DockSide::Top));
    layout.add_dockable(&dockable_at("r", DockSide::Right));
    let top_share = layout.zone_extent_ratio(Position::Top).unwrap();
    let right_share = layout.zone_extent_ratio(Position::Right).unwrap();

    let snapshot = layout.snapshot_outer();
    layout.restore_outer(None);
    layout.verify_invariants();
    assert_eq!(layout.positions(), vec![Position::Document]);

    layout.restore_outer(snapshot);
    layout.verify_invariants();
    assert!(matches!(
        layout.find_window(&id("t")),
        Some(WindowPlace::Docked { zone: Position::Top, .. })
    ));
    assert_relative_eq!(
        layout.zone_extent_ratio(Position::Top).unwrap(),
        top_share,
        epsilon = 1e-6
    );
    assert_relative_eq!(
        layout.zone_extent_ratio(Position::Right).unwrap(),
        right_share,
        epsilon = 1e-6
    );
}

// =============================================================================
// Randomized operations

fn arbitrary_side() -> impl Strategy<Value = DockSide> {
    prop_oneof![
        Just(DockSide::Top),
        Just(DockSide::Left),
        Just(DockSide::Bottom),
        Just(DockSide::Right),
    ]
}

fn arbitrary_point() -> impl Strategy<Value = Point> {
    (-50.0f64..900., -50.0f64..700.).prop_map(|(x, y)| Point::new(x, y))
}

/// One host-visible mutation, drawn from a small window pool so random
/// sequences collide with existing state often.
#[derive(Debug, Clone, Arbitrary)]
enum Op {
    AddDockable {
        #[proptest(strategy = "1..=4usize")]
        id: usize,
        #[proptest(strategy = "arbitrary_side()")]
        side: DockSide,
    },
    AddDocument(#[proptest(strategy = "1..=2usize")] usize),
    RemoveDockable(#[proptest(strategy = "1..=4usize")] usize),
    RemoveDocument(#[proptest(strategy = "1..=2usize")] usize),
    Select(#[proptest(strategy = "1..=4usize")] usize),
    Float(#[proptest(strategy = "1..=4usize")] usize),
    Stow(#[proptest(strategy = "1..=4usize")] usize),
    PopStrip(#[proptest(strategy = "arbitrary_side()")] DockSide),
    ResizeZone {
        #[proptest(strategy = "arbitrary_side()")]
        side: DockSide,
        #[proptest(strategy = "0.05f64..0.95")]
        share: f64,
    },
    DragTab {
        #[proptest(strategy = "1..=4usize")]
        id: usize,
        #[proptest(strategy = "arbitrary_point()")]
        to: Point,
    },
    DragPane {
        #[proptest(strategy = "1..=4usize")]
        id: usize,
        #[proptest(strategy = "arbitrary_point()")]
        to: Point,
    },
    DragDocument {
        #[proptest(strategy = "1..=2usize")]
        id: usize,
        #[proptest(strategy = "arbitrary_point()")]
        to: Point,
    },
    Resize {
        #[proptest(strategy = "200.0f64..1600.0")]
        w: f64,
        #[proptest(strategy = "200.0f64..1200.0")]
        h: f64,
    },
}

impl Op {
    fn apply(self, layout: &mut LayoutContainer, windows: &mut BTreeMap<WindowId, WindowHandle>) {
        match self {
            Op::AddDockable { id, side } => {
                let name = format!("w{id}");
                let window = WindowId::from(name.as_str());
                if layout.contains_window(&window) {
                    return;
                }
                let handle = windows.entry(window).or_insert_with(|| {
                    let mut handle = dockable(&name);
                    handle.set_shown(true);
                    handle
                });
                handle.set_preferred_dock_side(side);
                layout.add_dockable(handle);
            }
            Op::AddDocument(id) => {
                let name = format!("d{id}");
                let window = WindowId::from(name.as_str());
                if layout.contains_window(&window) {
                    return;
                }
                let handle = windows.entry(window).or_insert_with(|| {
                    let mut handle = document(&name);
                    handle.set_shown(true);
                    handle
                });
                layout.add_document(handle);
            }
            Op::RemoveDockable(id) => {
                layout.remove_window(&WindowId::from(format!("w{id}")));
            }
            Op::RemoveDocument(id) => {
                layout.remove_window(&WindowId::from(format!("d{id}")));
            }
            Op::Select(id) => {
                layout.select_window(&WindowId::from(format!("w{id}")));
            }
            Op::Float(id) => {
                let window = WindowId::from(format!("w{id}"));
                if !matches!(layout.find_window(&window), Some(WindowPlace::Docked { .. })) {
                    return;
                }
                layout.remove_window(&window);
                layout.float_attach(
                    WindowGroup::new(WindowKind::Dockable, window),
                    Rect::new(40., 40., 240., 180.),
                );
            }
            Op::Stow(id) => {
                let window = WindowId::from(format!("w{id}"));
                let Some(WindowPlace::Docked { zone, .. }) = layout.find_window(&window) else {
                    return;
                };
                let Some(side) = zone.edge() else {
                    return;
                };
                layout.remove_window(&window);
                layout.push_strip_item(side, WindowGroup::new(WindowKind::Dockable, window));
            }
            Op::PopStrip(side) => {
                if layout.strips().items(side).is_empty() {
                    return;
                }
                let item = layout.take_strip_item(side, 0);
                layout.float_attach(item, Rect::new(80., 80., 220., 160.));
            }
            Op::ResizeZone { side, share } => {
                layout.set_zone_share(Position::from(side), share);
            }
            Op::DragTab { id, to } => drag_window(layout, windows, format!("w{id}"), true, to),
            Op::DragPane { id, to } => drag_window(layout, windows, format!("w{id}"), false, to),
            Op::DragDocument { id, to } => drag_window(layout, windows, format!("d{id}"), true, to),
            Op::Resize { w, h } => layout.set_bounds(Rect::new(0., 0., w, h)),
        }
    }
}

fn drag_window(
    layout: &mut LayoutContainer,
    windows: &mut BTreeMap<WindowId, WindowHandle>,
    name: String,
    tab: bool,
    to: Point,
) {
    let window = WindowId::from(name);
    let Some(origin) = layout.window_rect(&window).map(|r| r.center()) else {
        return;
    };
    let source = if tab {
        DragSource::Tab(window)
    } else {
        DragSource::Pane(window)
    };
    let mut drag = DragController::new();
    drag.begin(source, origin);
    drag.update(layout, to);
    drag.finish(layout, windows, to);
}

#[track_caller]
fn check_ops_on_layout(
    layout: &mut LayoutContainer,
    windows: &mut BTreeMap<WindowId, WindowHandle>,
    ops: impl IntoIterator<Item = Op>,
) {
    for op in ops {
        op.apply(layout, windows);
        layout.verify_invariants();
    }
}

#[track_caller]
fn check_ops(ops: impl IntoIterator<Item = Op>) -> LayoutContainer {
    let mut layout = container();
    let mut windows = BTreeMap::new();
    check_ops_on_layout(&mut layout, &mut windows, ops);
    layout
}

fn every_op() -> Vec<Op> {
    let mut ops = vec![
        Op::AddDocument(1),
        Op::RemoveDocument(1),
        Op::DragDocument {
            id: 1,
            to: Point::new(30., 590.),
        },
        Op::Resize { w: 400., h: 300. },
        Op::ResizeZone {
            side: DockSide::Right,
            share: 0.5,
        },
    ];
    for id in 1..=2 {
        for side in DockSide::ALL {
            ops.push(Op::AddDockable { id, side });
        }
        ops.push(Op::RemoveDockable(id));
        ops.push(Op::Select(id));
        ops.push(Op::Float(id));
        ops.push(Op::Stow(id));
        ops.push(Op::DragTab {
            id,
            to: Point::new(570., 300.),
        });
        ops.push(Op::DragTab {
            id,
            to: Point::new(200., 300.),
        });
        ops.push(Op::DragPane {
            id,
            to: Point::new(790., 10.),
        });
    }
    for side in DockSide::ALL {
        ops.push(Op::PopStrip(side));
    }
    ops
}

#[test]
fn op_pairs_dont_panic() {
    let every_op = every_op();
    for second in &every_op {
        for first in &every_op {
            let mut layout = container();
            let mut windows = BTreeMap::new();
            first.clone().apply(&mut layout, &mut windows);
            layout.verify_invariants();
            second.clone().apply(&mut layout, &mut windows);
            layout.verify_invariants();
        }
    }
}

#[test]
fn operations_dont_panic() {
    if std::env::var_os("RUN_SLOW_TESTS").is_none() {
        eprintln!("ignoring slow test");
        return;
    }

    let every_op = every_op();
    for third in &every_op {
        for second in &every_op {
            for first in &every_op {
                let mut layout = container();
                let mut windows = BTreeMap::new();
                first.clone().apply(&mut layout, &mut windows);
                layout.verify_invariants();
                second.clone().apply(&mut layout, &mut windows);
                layout.verify_invariants();
                third.clone().apply(&mut layout, &mut windows);
                layout.verify_invariants();
            }
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        ..ProptestConfig::default()
    })]

    #[test]
    fn random_operations_dont_panic(ops in prop::collection::vec(any::<Op>(), 1..80)) {
        check_ops(ops);
    }

    #[test]
    fn random_arrangements_survive_an_outer_round_trip(
        ops in prop::collection::vec(any::<Op>(), 1..40),
    ) {
        let mut layout = check_ops(ops);
        let before = layout.debug_tree();
        let snapshot = layout.snapshot_outer();
        layout.restore_outer(snapshot);
        layout.verify_invariants();
        prop_assert_eq!(layout.debug_tree(), before);
    }
}
