use river_calibration_core::{CanvasEdit, CoordKey, FormEdit, PixelTransform, Pt2};
use river_calibration_pipeline::error::CalibrationError;
use river_calibration_pipeline::session::CalibrationSession;
use river_calibration_pipeline::solver::from_fn;
use river_calibration_pipeline::uav::{self, UavRequest, UavResponse, UavWorkflow};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn horizontal_line() -> CanvasEdit {
    CanvasEdit {
        points: vec![Pt2::new(100.0, 100.0), Pt2::new(400.0, 100.0)],
        scale_factor: 1.0,
        point_index: None,
    }
}

/// 1 px = 1/60 m, origin at the first endpoint.
fn scale_response(request: &UavRequest) -> UavResponse {
    let s = 1.0 / request.pixel_size;
    let origin = request.dir_points[0];
    UavResponse {
        uav_matrix: PixelTransform::from_rows([
            [s, 0.0, -origin.x * s],
            [0.0, s, -origin.y * s],
            [0.0, 0.0, 1.0],
        ]),
        ortho_image: "/tmp/uav_ortho.png".into(),
        output_resolution: s,
        extent: vec![0.0, 10.0, 0.0, 8.0],
        width: Some(600),
        height: Some(480),
    }
}

#[test]
fn scale_line_end_to_end() {
    init_logging();
    let mut session = CalibrationSession::<UavWorkflow>::new();

    uav::set_pixel_points_canvas(&mut session, &horizontal_line()).unwrap();
    uav::set_real_world_length(&mut session, 5.0).unwrap();
    assert_eq!(session.state().pixel_size, 60.0);
    assert_eq!(
        session.state().real_world_points,
        [Pt2::new(0.0, 0.0), Pt2::new(5.0, 0.0)]
    );

    let mut calls = 0;
    let mut solver = from_fn::<UavWorkflow, _>(|request| {
        calls += 1;
        Ok(scale_response(request))
    });

    let outcome = session.submit(&mut solver, &()).unwrap();
    assert!(outcome.was_solved());
    let solution = session.solution().unwrap();
    assert!((solution.second_point.x - 5.0).abs() < 1e-12);
    assert!(solution.second_point.y.abs() < 1e-12);
    assert_eq!((solution.width, solution.height), (600, 480));

    let again = session.submit(&mut solver, &()).unwrap();
    assert!(!again.was_solved());
    drop(solver);
    assert_eq!(calls, 1);
}

#[test]
fn form_edit_invalidates_and_resolves() {
    init_logging();
    let mut session = CalibrationSession::<UavWorkflow>::new();
    uav::set_pixel_points_canvas(&mut session, &horizontal_line()).unwrap();
    uav::set_real_world_length(&mut session, 5.0).unwrap();

    let mut solver = from_fn::<UavWorkflow, _>(|request| Ok(scale_response(request)));
    session.submit(&mut solver, &()).unwrap();
    assert!(session.has_solution());

    // Same value: nothing committed, solution kept.
    let unchanged = FormEdit {
        value: 400.0,
        key: CoordKey::x(1),
    };
    assert!(!uav::set_pixel_point_form(&mut session, unchanged).unwrap());
    assert!(session.has_solution());
    assert!(!session.has_changed());

    let longer = FormEdit {
        value: 700.0,
        key: CoordKey::x(1),
    };
    assert!(uav::set_pixel_point_form(&mut session, longer).unwrap());
    assert!(!session.has_solution());
    assert_eq!(session.state().pixel_size, 120.0);

    assert!(session.submit(&mut solver, &()).unwrap().was_solved());
}

#[test]
fn collapsed_line_is_rejected_without_side_effects() {
    init_logging();
    let mut session = CalibrationSession::<UavWorkflow>::new();
    uav::set_pixel_points_canvas(&mut session, &horizontal_line()).unwrap();
    uav::set_real_world_length(&mut session, 5.0).unwrap();
    let before = session.state().clone();
    let log_len = session.log.len();

    let collapse = FormEdit {
        value: 100.0,
        key: CoordKey::x(1),
    };
    let err = uav::set_pixel_point_form(&mut session, collapse).unwrap_err();
    assert_eq!(
        err,
        CalibrationError::DegenerateScaleLine { x: 100.0, y: 100.0 }
    );
    assert_eq!(session.state(), &before);
    assert_eq!(session.log.len(), log_len);
}

#[test]
fn pixel_size_without_line_places_default() {
    init_logging();
    let mut session = CalibrationSession::<UavWorkflow>::new();
    uav::set_pixel_size(&mut session, 10.0, 1920.0, 1080.0).unwrap();

    let state = session.state();
    assert!(state.draw_line);
    let line = state.pixel_points.unwrap();
    assert_eq!(line[0].y, line[1].y);
    assert!(state.rw_length > 0.0);

    let mut solver = from_fn::<UavWorkflow, _>(|request| Ok(scale_response(request)));
    assert!(session.submit(&mut solver, &()).unwrap().was_solved());
}

#[test]
fn solve_without_line_is_a_validation_error() {
    init_logging();
    let mut session = CalibrationSession::<UavWorkflow>::new();
    uav::set_real_world_length(&mut session, 5.0).unwrap();

    let mut solver = from_fn::<UavWorkflow, _>(|_| panic!("solver must not run"));
    let err = session.submit(&mut solver, &()).unwrap_err();
    assert!(matches!(err, CalibrationError::Validation(_)));
    assert!(session.has_changed());
}

#[test]
fn session_survives_json() {
    init_logging();
    let mut session = CalibrationSession::<UavWorkflow>::with_description("bridge survey");
    uav::set_pixel_points_canvas(&mut session, &horizontal_line()).unwrap();
    uav::set_real_world_length(&mut session, 5.0).unwrap();
    let mut solver = from_fn::<UavWorkflow, _>(|request| Ok(scale_response(request)));
    session.submit(&mut solver, &()).unwrap();

    let json = session.to_json().unwrap();
    let restored = CalibrationSession::<UavWorkflow>::from_json(&json).unwrap();
    assert_eq!(restored.state(), session.state());
    assert_eq!(
        restored.solution().map(|s| s.as_ref()),
        session.solution().map(|s| s.as_ref())
    );
    assert!(!restored.has_changed());
    assert!(!restored.is_backend_working());
}
