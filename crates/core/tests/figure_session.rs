//! Integration test: build a figure from a host description and drive it
//! through a typical session of double-clicks, hovers and wheel zooms,
//! applying every command to an in-memory scene.

use profile_svg_core::model::FigureSource;
use profile_svg_core::viewport::state::label_transform;
use profile_svg_core::{Figure, Gesture, PointerMapping, SceneState, ViewportCommand};
use profile_svg_protocol::Transform;

/// Tick at 60 fps until the running transition ends; returns the final time.
fn run_to_end(figure: &mut Figure, scene: &mut SceneState, start_ms: f64) -> f64 {
    let mut now = start_ms;
    loop {
        let commands = figure.tick(now);
        scene.apply(&commands);
        if !figure.is_animating() {
            return now;
        }
        now += 16.0;
    }
}

fn load() -> (Figure, SceneState) {
    let data = include_bytes!("fixtures/figure.json");
    let source = FigureSource::from_json(data).expect("failed to parse figure description");
    let labels = source.rects.len();
    let (figure, commands) = Figure::initialize(source, 0.0).expect("figure should initialize");
    let mut scene = SceneState::new(labels);
    scene.apply(&commands);
    (figure, scene)
}

#[test]
fn initialization_fits_figure_and_places_details() {
    let (mut figure, mut scene) = load();
    assert!(!scene.labels_visible, "labels stay hidden during the first fit");
    let panel = scene.details.clone().expect("details panel placed");
    assert!(!panel.shown);
    assert_eq!(panel.background.y, 76.0);
    assert_eq!(panel.details_at.x, 8.0);
    assert!(panel.background_fill.is_some());

    let end = run_to_end(&mut figure, &mut scene, 0.0);
    assert!(end >= 250.0);
    assert!(scene.labels_visible);
    assert_eq!(scene.viewport, figure.state().transform(figure.center_x()));
    let (focus, scale) = figure.reset_target();
    assert_eq!(focus, 600.0);
    assert!((scale - 1200.0 / 1180.0 * 0.9).abs() < 1e-12);

    // The root frame has room for its whole label; the narrow one is cut.
    assert_eq!(scene.labels[0].text, "main in main.rs:1");
    let cut = &scene.labels[3].text;
    assert!(cut.starts_with("decode_"), "got {cut:?}");
    assert!(cut.ends_with(".."));
    assert!(cut.chars().count() < "decode_request_headers in codec.rs:301".len());
}

#[test]
fn double_click_zooms_into_a_frame_and_back_out() {
    let (mut figure, mut scene) = load();
    let now = run_to_end(&mut figure, &mut scene, 0.0);
    let fitted = figure.state();

    let response = figure
        .handle(Gesture::DoubleClickRect { index: 3 }, now)
        .expect("rect 3 exists");
    assert!(!response.prevent_default);
    scene.apply(&response.commands);
    assert!(!scene.labels_visible);
    let now = run_to_end(&mut figure, &mut scene, now);

    assert_eq!(figure.state().focus_x, 70.0);
    assert!((figure.state().scale_x - 9.0).abs() < 1e-12);
    assert!(scene.labels_visible);
    assert_eq!(scene.labels[3].text, "decode_request_headers in codec.rs:301");
    assert_eq!(scene.labels[3].transform, label_transform(10.0, figure.state().scale_x));
    let (rx, ry) = scene.corner_radius.expect("rounded rectangles");
    assert!((rx - 2.0 / 9.0).abs() < 1e-12);
    assert_eq!(ry, 2.0);

    let response = figure
        .handle(Gesture::DoubleClickBackground, now)
        .expect("reset never fails");
    scene.apply(&response.commands);
    run_to_end(&mut figure, &mut scene, now);
    assert_eq!(figure.state(), fitted);
    assert_eq!(scene.viewport, fitted.transform(figure.center_x()));
}

#[test]
fn hover_fills_details_panel() {
    let (mut figure, mut scene) = load();
    run_to_end(&mut figure, &mut scene, 0.0);

    let enter = figure.handle(Gesture::HoverEnter { index: 3 }, 0.0).unwrap();
    scene.apply(&enter.commands);
    let panel = scene.details.clone().unwrap();
    assert!(panel.shown);
    assert_eq!(panel.details, "Function: decode_request_headers in codec.rs:301");
    assert_eq!(panel.time.as_deref(), Some("Time: 30 ms"));
    assert!(scene.labels[3].highlighted);

    let leave = figure.handle(Gesture::HoverLeave { index: 3 }, 0.0).unwrap();
    scene.apply(&leave.commands);
    assert!(!scene.details.clone().unwrap().shown);
    assert!(!scene.labels[3].highlighted);

    let enter = figure.handle(Gesture::HoverEnter { index: 1 }, 0.0).unwrap();
    scene.apply(&enter.commands);
    let panel = scene.details.unwrap();
    assert_eq!(panel.details, "Function: serve in src/net/server.rs:88");
    assert_eq!(panel.time.as_deref(), Some("Time: 175 ms"));
}

#[test]
fn wheel_zoom_keeps_data_under_pointer() {
    let (mut figure, mut scene) = load();
    let mut now = run_to_end(&mut figure, &mut scene, 0.0);
    let mapping = PointerMapping {
        svg_left: 50.0,
        ctm: None,
    };
    let pointer_x = mapping.to_figure_x(350.0);
    assert_eq!(pointer_x, 300.0);

    for delta_y in [-1.0, -1.0, 1.0, -2.0] {
        now += 500.0;
        let before = figure.state().to_data_x(pointer_x, figure.center_x());
        let response = figure
            .handle(Gesture::Wheel { delta_y, pointer_x }, now)
            .unwrap();
        assert!(response.prevent_default);
        scene.apply(&response.commands);
        now = run_to_end(&mut figure, &mut scene, now);
        let after = scene.viewport.invert_x(pointer_x);
        assert!((before - after).abs() < 1e-6, "{before} drifted to {after}");
    }
    assert!(figure.state().scale_x > figure.reset_target().1);
}

#[test]
fn commands_serialize_for_the_browser_host() {
    let (mut figure, _) = load();
    let commands = figure.move_and_zoom(600.0, 2.0, None, 0.0);
    let json = serde_json::to_value(&commands).unwrap();
    assert_eq!(json[0]["kind"], "set_viewport_transform");
    assert_eq!(json[0]["transform"]["scale_x"], 2.0);
    assert_eq!(json[1]["kind"], "set_corner_radius");
    assert_eq!(json[2]["kind"], "set_label");

    let ViewportCommand::SetViewportTransform { transform } = &commands[0] else {
        panic!("first command should move the viewport");
    };
    assert_eq!(*transform, Transform::new(2.0, 1.0, -600.0, 0.0));
    assert_eq!(transform.to_svg(), "matrix(2 0 0 1 -600 0)");
}
