#![allow(clippy::unwrap_used)]

mod common;

use std::cell::RefCell;
use std::rc::Rc;

use approx::assert_abs_diff_eq;
use common::{camera_enabled, editor_at, screen};
use waymark::geometry::{DrawingId, DrawingKind, MeasurementUnit, Position};
use waymark::math::segment_distances;
use waymark::mode::{DrawingMode, Transition};
use waymark::overlay::{Layer, OverlayId};

#[test]
fn waypoint_click_auto_finishes() {
    let spot = Position::new(-110.76, 43.48);
    let mut editor = editor_at(spot, 12.0);

    editor.start_drawing_mode(DrawingMode::Waypoint).unwrap();
    assert!(editor.on_click(screen(&editor, spot)));

    assert_eq!(editor.mode(), DrawingMode::Idle);
    let (key, drawing) = editor.drawings().next().unwrap();
    assert_eq!(drawing.kind, DrawingKind::Waypoint);
    assert_eq!(drawing.points, vec![spot]);
    assert_eq!(drawing.id, Some(DrawingId("drawing-1".into())));
    assert!(editor.overlay().contains(&OverlayId::Drawing(key)));
    assert_eq!(editor.overlay().ids_in(Layer::Preview).count(), 0);
    assert_eq!(editor.store().drawing_count(), 1);
}

#[test]
fn two_click_line_measures_kilometers() {
    let mut editor = editor_at(Position::new(0.0, 0.005), 14.0);
    editor.start_drawing_mode(DrawingMode::Line).unwrap();

    assert!(editor.on_click(screen(&editor, Position::new(0.0, 0.0))));
    assert!(editor.on_click(screen(&editor, Position::new(0.0, 0.01))));
    assert_eq!(editor.mode(), DrawingMode::Line);
    assert_eq!(editor.current_drawing().unwrap().points.len(), 2);
    assert!(editor.overlay().contains(&OverlayId::PreviewShape));

    let drawing = editor.finish_drawing().unwrap().unwrap();
    let segments = segment_distances(&drawing.points);
    assert_eq!(segments.len(), 1);
    assert_abs_diff_eq!(segments[0], 1112.0, epsilon = 2.0);
    assert_eq!(drawing.measurement_unit, Some(MeasurementUnit::Kilometers));
    assert_abs_diff_eq!(drawing.measurement_value.unwrap(), 1.11);
    assert_eq!(editor.mode(), DrawingMode::Idle);
}

#[test]
fn click_on_route_line_inserts_control_point() {
    let mut editor = editor_at(Position::new(0.0, 10.0), 3.0);
    let handed_back: Rc<RefCell<Vec<Vec<Position>>>> = Rc::default();
    let sink = Rc::clone(&handed_back);
    let path = vec![
        Position::new(0.0, 0.0),
        Position::new(0.0, 10.0),
        Position::new(0.0, 20.0),
    ];

    let t = editor
        .enable_draw_route_mode(
            path,
            Vec::new(),
            Box::new(move |p: &[Position]| sink.borrow_mut().push(p.to_vec())),
        )
        .unwrap();
    assert_eq!(t, Transition::Started(DrawingMode::RouteEdit));
    assert!(editor.overlay().contains(&OverlayId::HitCorridor));

    assert!(editor.on_click(screen(&editor, Position::new(0.0, 15.0))));
    let edited = editor.draw_route_path().unwrap().to_vec();
    assert_eq!(edited.len(), 4);
    assert_abs_diff_eq!(edited[2].latitude, 15.0, epsilon = 1e-9);
    assert_abs_diff_eq!(edited[2].longitude, 0.0, epsilon = 1e-9);
    assert_eq!(edited[3], Position::new(0.0, 20.0));
    assert!(editor.overlay().contains(&OverlayId::ControlPoint(2)));
    assert!(editor.overlay().style(&OverlayId::ControlPoint(2)).unwrap().draggable);

    assert!(handed_back.borrow().is_empty());
    let final_path = editor.disable_draw_route_mode().unwrap();
    assert_eq!(handed_back.borrow().as_slice(), &[final_path]);
    assert_eq!(editor.overlay().ids_in(Layer::RouteEdit).count(), 0);
    assert_eq!(editor.mode(), DrawingMode::Idle);
}

#[test]
fn tiny_offline_drag_is_flagged_invalid() {
    let start = Position::new(10.0, 10.0);
    let mut editor = editor_at(start, 12.0);
    editor.start_offline_selection().unwrap();
    assert!(!camera_enabled(&editor));

    let end = Position::new(10.0005, 10.0005);
    assert!(editor.on_pointer_down(screen(&editor, start)));
    assert!(editor.on_pointer_move(screen(&editor, end)));
    assert!(editor.overlay().contains(&OverlayId::OfflineRegion));
    assert!(editor.on_pointer_up(screen(&editor, end)));

    assert!(editor.offline_invalid_drag());
    assert!(editor.offline_bounds().is_none());
    assert!(!editor.overlay().contains(&OverlayId::OfflineRegion));
}

#[test]
fn one_degree_offline_drag_commits() {
    let mut editor = editor_at(Position::new(10.5, 10.5), 8.0);
    editor.start_offline_selection().unwrap();

    let a = Position::new(10.0, 10.0);
    let b = Position::new(11.0, 11.0);
    editor.on_pointer_down(screen(&editor, a));
    editor.on_pointer_move(screen(&editor, b));
    editor.on_pointer_up(screen(&editor, b));

    assert!(!editor.offline_invalid_drag());
    let sel = editor.offline_bounds().unwrap();
    assert_abs_diff_eq!(sel.bounds.lat_span(), 1.0, epsilon = 1e-9);
    assert_abs_diff_eq!(sel.bounds.lng_span(), 1.0, epsilon = 1e-9);
    assert_abs_diff_eq!(sel.zoom, 8.0);
    assert!(editor.overlay().contains(&OverlayId::OfflineRegion));

    assert_eq!(editor.finish_offline_selection(), Some(sel));
    assert!(editor.overlay().contains(&OverlayId::OfflineRegion));

    assert_eq!(editor.complete_offline_selection(), Some(sel));
    assert_eq!(editor.mode(), DrawingMode::Idle);
    assert!(!editor.overlay().contains(&OverlayId::OfflineRegion));
    assert!(camera_enabled(&editor));
}

#[test]
fn tap_inside_committed_offline_box_keeps_it() {
    let mut editor = editor_at(Position::new(10.5, 10.5), 8.0);
    editor.start_offline_selection().unwrap();
    let a = Position::new(10.0, 10.0);
    let b = Position::new(11.0, 11.0);
    editor.on_pointer_down(screen(&editor, a));
    editor.on_pointer_move(screen(&editor, b));
    editor.on_pointer_up(screen(&editor, b));
    let sel = editor.offline_bounds().unwrap();

    let tap = screen(&editor, Position::new(10.5, 10.5));
    editor.on_pointer_down(tap);
    assert!(!editor.on_pointer_up(tap));

    assert_eq!(editor.offline_bounds(), Some(sel));
    assert!(editor.overlay().contains(&OverlayId::OfflineRegion));
    assert!(!editor.offline_invalid_drag());
}
