use std::collections::HashSet;

use desktop_app_contract::{AppIcon, IconKind};
use desktop_runtime::{
    reduce_desktop, DesktopAction, DesktopConfig, DesktopEvent, DesktopGrid, DesktopState,
    InteractionState, OpenWindowRequest, Point, PointerInput, ResizeEdge, Size, WindowRect,
};
use pretty_assertions::assert_eq;

fn grid_with(icons: Vec<AppIcon>) -> DesktopGrid {
    let mut grid = DesktopGrid::new(&DesktopConfig::default());
    assert!(grid.resize_container(Size::new(1280.0, 752.0)));
    grid.sync_icons(icons).expect("sync icons");
    grid
}

fn file(id: &str, x: i32, y: i32) -> AppIcon {
    AppIcon::new(id, id.to_uppercase(), IconKind::File, x, y)
}

fn centre(col: u32, row: u32) -> Point {
    Point::new(f64::from(col) * 116.0 + 50.0, f64::from(row) * 116.0 + 50.0)
}

fn click(grid: &mut DesktopGrid, at: Point, time_ms: f64) -> Vec<DesktopEvent> {
    let input = PointerInput::at(at.x, at.y).at_time(time_ms);
    let mut events = grid.pointer_down(input);
    events.extend(grid.pointer_up(input));
    events
}

fn apply(state: &mut DesktopState, interaction: &mut InteractionState, action: DesktopAction) {
    reduce_desktop(state, interaction, action).expect("reduce");
}

fn rect(state: &DesktopState, id: &str) -> WindowRect {
    state.window(id).map(|w| w.rect).expect("window")
}

#[test]
fn calc_window_drag_resize_and_reopen() {
    let mut state = DesktopState::default();
    let mut interaction = InteractionState::default();
    apply(
        &mut state,
        &mut interaction,
        DesktopAction::OpenWindow(OpenWindowRequest::new("calc").at(100.0, 100.0).sized(300.0, 450.0)),
    );
    assert_eq!(rect(&state, "calc"), WindowRect::new(100.0, 100.0, 300.0, 450.0));

    for action in [
        DesktopAction::BeginMove {
            window_id: "calc".into(),
            pointer: Point::new(200.0, 110.0),
        },
        DesktopAction::UpdateMove {
            pointer: Point::new(250.0, 130.0),
        },
        DesktopAction::EndMove,
    ] {
        apply(&mut state, &mut interaction, action);
    }
    assert_eq!(rect(&state, "calc"), WindowRect::new(150.0, 120.0, 300.0, 450.0));

    for action in [
        DesktopAction::BeginResize {
            window_id: "calc".into(),
            edge: ResizeEdge::SouthEast,
            pointer: Point::new(450.0, 570.0),
        },
        DesktopAction::UpdateResize {
            pointer: Point::new(490.0, 610.0),
        },
        DesktopAction::EndResize,
    ] {
        apply(&mut state, &mut interaction, action);
    }
    assert_eq!(rect(&state, "calc"), WindowRect::new(150.0, 120.0, 340.0, 490.0));

    apply(
        &mut state,
        &mut interaction,
        DesktopAction::OpenWindow(OpenWindowRequest::new("calc")),
    );
    assert_eq!(state.windows.len(), 1);
    assert_eq!(state.focused_window_id(), Some("calc"));
    assert_eq!(rect(&state, "calc"), WindowRect::new(150.0, 120.0, 340.0, 490.0));
}

#[test]
fn dragging_an_icon_onto_its_neighbour_swaps_them() {
    let mut grid = grid_with(vec![file("a", 0, 0), file("b", 1, 0)]);
    grid.pointer_down(PointerInput::at(centre(0, 0).x, centre(0, 0).y));
    grid.pointer_move(centre(1, 0));
    grid.pointer_up(PointerInput::at(centre(1, 0).x, centre(1, 0).y));

    let a = grid.icon("a").expect("a");
    let b = grid.icon("b").expect("b");
    assert_eq!((a.x, a.y), (1, 0));
    assert_eq!((b.x, b.y), (0, 0));
}

#[test]
fn committed_layouts_never_overlap() {
    let mut grid = grid_with(vec![
        file("a", 0, 0),
        file("b", 1, 0),
        file("c", 0, 1),
        file("d", 1, 1),
        file("e", 0, 2),
    ]);
    // Select a and b, then drop them one row down onto c and d.
    click(&mut grid, centre(0, 0), 0.0);
    let shifted = PointerInput::at(centre(1, 0).x, centre(1, 0).y)
        .at_time(2_000.0)
        .with_shift();
    grid.pointer_down(shifted);
    grid.pointer_up(shifted);
    assert_eq!(grid.selection().len(), 2);

    grid.pointer_down(PointerInput::at(centre(0, 0).x, centre(0, 0).y).at_time(4_000.0));
    grid.pointer_move(centre(0, 1));
    let events = grid.pointer_up(PointerInput::at(centre(0, 1).x, centre(0, 1).y));
    assert!(matches!(events.last(), Some(DesktopEvent::IconsChanged(_))));

    let cells: HashSet<(i32, i32)> = grid.icons().iter().map(|icon| (icon.x, icon.y)).collect();
    assert_eq!(cells.len(), grid.icons().len());
    assert!(grid.icons().iter().all(|icon| (0..2).contains(&icon.x) && icon.y >= 0));
}

#[test]
fn rubber_band_selection_is_direction_independent() {
    let icons = vec![file("a", 0, 0), file("b", 1, 1), file("c", 1, 2), file("d", 0, 3)];
    let corner_a = Point::new(108.0, 108.0);
    let corner_b = Point::new(400.0, 300.0);

    let mut forward = grid_with(icons.clone());
    forward.pointer_down(PointerInput::at(corner_a.x, corner_a.y));
    forward.pointer_move(corner_b);
    forward.pointer_up(PointerInput::at(corner_b.x, corner_b.y));

    let mut backward = grid_with(icons);
    backward.pointer_down(PointerInput::at(corner_b.x, corner_b.y));
    backward.pointer_move(corner_a);
    backward.pointer_up(PointerInput::at(corner_a.x, corner_a.y));

    let expected: Vec<&str> = vec!["b", "c"];
    assert_eq!(
        forward.selection().iter().map(String::as_str).collect::<Vec<_>>(),
        expected
    );
    assert_eq!(forward.selection(), backward.selection());
}

#[test]
fn resizing_past_the_maximum_lands_on_it_every_time() {
    let mut state = DesktopState::default();
    state.settings.max_width = Some(700.0);
    state.settings.max_height = Some(500.0);
    let mut interaction = InteractionState::default();
    apply(
        &mut state,
        &mut interaction,
        DesktopAction::OpenWindow(OpenWindowRequest::new("w").at(10.0, 10.0).sized(400.0, 300.0)),
    );

    for _ in 0..3 {
        for action in [
            DesktopAction::BeginResize {
                window_id: "w".into(),
                edge: ResizeEdge::SouthEast,
                pointer: Point::new(0.0, 0.0),
            },
            DesktopAction::UpdateResize {
                pointer: Point::new(5_000.0, 5_000.0),
            },
            DesktopAction::EndResize,
        ] {
            apply(&mut state, &mut interaction, action);
        }
        assert_eq!(rect(&state, "w"), WindowRect::new(10.0, 10.0, 700.0, 500.0));
    }
}

#[test]
fn maximize_and_restore_round_trip_exactly() {
    let mut state = DesktopState::default();
    let mut interaction = InteractionState::default();
    apply(
        &mut state,
        &mut interaction,
        DesktopAction::OpenWindow(
            OpenWindowRequest::new("w").at(12.345, 67.891).sized(432.1, 321.09),
        ),
    );
    let before = rect(&state, "w");
    apply(&mut state, &mut interaction, DesktopAction::ToggleMaximize { window_id: "w".into() });
    assert_eq!(rect(&state, "w"), WindowRect::new(0.0, 0.0, 1280.0, 752.0));
    apply(&mut state, &mut interaction, DesktopAction::ToggleMaximize { window_id: "w".into() });

    let after = rect(&state, "w");
    assert_eq!(after.x.to_bits(), before.x.to_bits());
    assert_eq!(after.y.to_bits(), before.y.to_bits());
    assert_eq!(after.w.to_bits(), before.w.to_bits());
    assert_eq!(after.h.to_bits(), before.h.to_bits());
}

#[test]
fn exactly_one_visible_window_is_focused_and_on_top() {
    let mut state = DesktopState::default();
    let mut interaction = InteractionState::default();
    let ids = ["a", "b", "c", "d"];
    // Deterministic pseudo-random op sequence.
    let mut seed: u64 = 0x2545_f491;
    for _ in 0..200 {
        seed = seed.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
        let id = ids[(seed >> 33) as usize % ids.len()].to_string();
        let action = match (seed >> 40) % 4 {
            0 | 1 => DesktopAction::OpenWindow(OpenWindowRequest::new(id)),
            2 if state.window(&id).is_some() => DesktopAction::FocusWindow { window_id: id },
            3 if state.window(&id).is_some() => DesktopAction::MinimizeWindow { window_id: id },
            _ => continue,
        };
        apply(&mut state, &mut interaction, action);

        let visible: Vec<_> = state.windows.iter().filter(|w| !w.minimized).collect();
        let focused: Vec<_> = state.windows.iter().filter(|w| w.is_focused).collect();
        if visible.is_empty() {
            assert!(focused.is_empty());
            continue;
        }
        assert_eq!(focused.len(), 1);
        let top = visible.iter().map(|w| w.z_index).max();
        assert!(!focused[0].minimized);
        assert_eq!(Some(focused[0].z_index), top);
    }
}

#[test]
fn double_click_timing_and_distance_thresholds() {
    let opened = |events: &[DesktopEvent]| {
        events
            .iter()
            .any(|event| matches!(event, DesktopEvent::OpenRequested(id) if id == "a"))
    };
    let at = centre(0, 0);

    let mut grid = grid_with(vec![file("a", 0, 0)]);
    click(&mut grid, at, 1_000.0);
    assert!(opened(&click(&mut grid, at, 1_499.0)));

    let mut grid = grid_with(vec![file("a", 0, 0)]);
    click(&mut grid, at, 1_000.0);
    assert!(!opened(&click(&mut grid, at, 1_501.0)));

    let mut grid = grid_with(vec![file("a", 0, 0)]);
    click(&mut grid, at, 1_000.0);
    assert!(!opened(&click(&mut grid, Point::new(at.x + 11.0, at.y), 1_100.0)));
}
