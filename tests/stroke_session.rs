use egui::{Pos2, Vec2};
use painter_canvas::document::Document;
use painter_canvas::tools::{BrushError, BrushId};
use painter_canvas::util::ManualClock;
use painter_canvas::{
    BrushTool, CanvasController, CanvasError, GestureKind, Sample, StrokeBrush, StrokeFault, Viewport,
};

fn controller(clock: &ManualClock) -> CanvasController<StrokeBrush, ManualClock> {
    CanvasController::with_clock(
        StrokeBrush::default(),
        Viewport::new(800.0, 600.0).unwrap(),
        clock.clone(),
    )
}

fn assert_close(a: f32, b: f32) {
    assert!((a - b).abs() < 1e-5, "{a} != {b}");
}

#[test]
fn test_down_move_up_then_new_stroke() {
    let clock = ManualClock::new(0.0);
    let mut canvas = controller(&clock);

    canvas.stylus_down(Pos2::new(400.0, 300.0), 0.4).unwrap();
    assert!(canvas.strokes().is_active());

    clock.set(0.2);
    let sample = canvas
        .stylus_move(Pos2::new(410.0, 300.0), 0.6)
        .unwrap()
        .expect("stroke is active");
    assert_close(sample.elapsed, 0.2);
    assert_close(sample.pressure, 0.6);

    canvas.stylus_up(Pos2::new(410.0, 300.0)).unwrap();
    assert!(!canvas.strokes().is_active());

    clock.set(1.0);
    canvas.stylus_down(Pos2::new(100.0, 100.0), 0.5).unwrap();
    assert!(canvas.strokes().is_active());
    assert_eq!(canvas.strokes().session().unwrap().start_time, 1.0);

    let strokes = canvas.document().strokes();
    assert_eq!(strokes.len(), 2);
    assert_eq!(strokes[0].pressures, vec![0.4, 0.6]);
    assert_close(strokes[0].times[1], 0.2);
    assert_close(strokes[0].positions[0].x, 0.0);
    assert_close(strokes[0].positions[0].y, 0.0);
}

#[test]
fn test_orphan_move_and_up_are_silent() {
    let clock = ManualClock::new(5.0);
    let mut canvas = controller(&clock);
    canvas.manipulate(2.0, 0.5, Vec2::new(0.1, 0.2));
    let before = *canvas.transform();

    assert_eq!(canvas.stylus_move(Pos2::new(10.0, 10.0), 1.0).unwrap(), None);
    canvas.stylus_up(Pos2::new(10.0, 10.0)).unwrap();
    canvas.stylus_up(Pos2::new(10.0, 10.0)).unwrap();

    assert_eq!(*canvas.transform(), before);
    assert!(canvas.document().is_empty());
    assert!(!canvas.strokes().is_active());
}

#[test]
fn test_second_down_is_reported_but_leaves_one_session() {
    let clock = ManualClock::new(0.0);
    let mut canvas = controller(&clock);

    canvas.stylus_down(Pos2::new(100.0, 100.0), 1.0).unwrap();
    clock.advance(0.5);
    let err = canvas.stylus_down(Pos2::new(200.0, 200.0), 1.0).unwrap_err();
    assert!(matches!(err, CanvasError::Stroke(StrokeFault::AlreadyActive)));

    let session = canvas.strokes().session().expect("one session");
    assert_eq!(session.start_time, 0.5);

    // Samples now land in the new stroke and are timed from the second down
    clock.advance(0.25);
    let sample = canvas.stylus_move(Pos2::new(210.0, 200.0), 1.0).unwrap().unwrap();
    assert_close(sample.elapsed, 0.25);
    assert_eq!(canvas.document().strokes()[1].len(), 2);
    assert_eq!(canvas.document().strokes()[0].len(), 1);
}

#[test]
fn test_stroke_uses_transform_at_each_event() {
    let clock = ManualClock::new(0.0);
    let mut canvas = controller(&clock);

    canvas.stylus_down(Pos2::new(400.0, 300.0), 1.0).unwrap();

    // Zooming mid-stroke changes where later samples land, not earlier ones
    canvas.begin_gesture(GestureKind::Zoom).unwrap();
    canvas.update_zoom(2.0).unwrap();
    canvas.end_gesture(GestureKind::Zoom).unwrap();

    let sample = canvas.stylus_move(Pos2::new(700.0, 300.0), 1.0).unwrap().unwrap();
    let expected = canvas.to_logical(Pos2::new(700.0, 300.0));
    assert_eq!(sample.position, expected);
    assert_close(sample.position.x, 0.5);

    let stroke = &canvas.document().strokes()[0];
    assert_eq!(stroke.positions[0], Pos2::ZERO);
}

#[test]
fn test_elapsed_never_negative() {
    let clock = ManualClock::new(10.0);
    let mut canvas = controller(&clock);
    canvas.stylus_down(Pos2::new(1.0, 1.0), 1.0).unwrap();
    clock.set(9.0);
    let sample = canvas.stylus_move(Pos2::new(2.0, 2.0), 1.0).unwrap().unwrap();
    assert_eq!(sample.elapsed, 0.0);
}

#[test]
fn test_stroke_events_request_redraw() {
    let clock = ManualClock::new(0.0);
    let mut canvas = controller(&clock);
    canvas.take_redraw_request();

    canvas.stylus_down(Pos2::new(1.0, 1.0), 1.0).unwrap();
    assert!(canvas.take_redraw_request());
    canvas.stylus_move(Pos2::new(2.0, 2.0), 1.0).unwrap();
    assert!(canvas.take_redraw_request());
    canvas.stylus_up(Pos2::new(2.0, 2.0)).unwrap();
    assert!(canvas.take_redraw_request());
}

/// Brush that fails on demand and counts calls
#[derive(Default)]
struct FlakyBrush {
    fail_start: bool,
    fail_end: bool,
    starts: usize,
    continues: usize,
    ends: usize,
}

impl BrushTool for FlakyBrush {
    fn name(&self) -> &'static str {
        "Flaky"
    }

    fn brush_id(&self) -> Option<BrushId> {
        None
    }

    fn start_stroke(&mut self, _document: &mut Document, _position: Pos2, _pressure: f32) -> Result<(), BrushError> {
        self.starts += 1;
        if self.fail_start {
            return Err(BrushError::Rejected("no brush loaded".to_string()));
        }
        Ok(())
    }

    fn continue_stroke(&mut self, _document: &mut Document, _sample: &Sample) -> Result<(), BrushError> {
        self.continues += 1;
        Ok(())
    }

    fn end_stroke(&mut self) -> Result<(), BrushError> {
        self.ends += 1;
        if self.fail_end {
            return Err(BrushError::Rejected("end failed".to_string()));
        }
        Ok(())
    }
}

fn flaky_controller(brush: FlakyBrush) -> CanvasController<FlakyBrush, ManualClock> {
    CanvasController::with_clock(brush, Viewport::new(640.0, 480.0).unwrap(), ManualClock::new(0.0))
}

#[test]
fn test_failed_start_leaves_no_session() {
    let mut canvas = flaky_controller(FlakyBrush {
        fail_start: true,
        ..Default::default()
    });

    let err = canvas.stylus_down(Pos2::new(5.0, 5.0), 1.0).unwrap_err();
    assert!(matches!(err, CanvasError::Brush(_)));
    assert!(!err.is_fault());
    assert!(!canvas.strokes().is_active());

    // Following motion is treated as orphaned
    assert_eq!(canvas.stylus_move(Pos2::new(6.0, 6.0), 1.0).unwrap(), None);
    assert_eq!(canvas.brush().continues, 0);
}

#[test]
fn test_failed_end_still_clears_session() {
    let mut canvas = flaky_controller(FlakyBrush {
        fail_end: true,
        ..Default::default()
    });

    canvas.stylus_down(Pos2::new(5.0, 5.0), 1.0).unwrap();
    assert!(canvas.stylus_up(Pos2::new(5.0, 5.0)).is_err());
    assert!(!canvas.strokes().is_active());
    canvas.brush_mut().fail_end = false;
    canvas.stylus_down(Pos2::new(7.0, 7.0), 1.0).unwrap();
}

#[test]
fn test_up_always_reaches_the_brush() {
    let mut canvas = flaky_controller(FlakyBrush::default());
    canvas.stylus_up(Pos2::ZERO).unwrap();
    canvas.stylus_up(Pos2::ZERO).unwrap();
    assert_eq!(canvas.brush().ends, 2);
    assert_eq!(canvas.brush().starts, 0);
}
