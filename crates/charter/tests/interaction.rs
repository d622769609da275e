//! Drawing interaction through the chart controller.

mod common;

use charter::{DrawingMode, InputEvent, Key, ResolvedShape, ScreenPos};
use charter_core::AnnotationKind;
use common::Harness;

#[test]
fn rectangle_hit_includes_interior() {
    let mut h = Harness::with_symbol("AAPL");
    h.chart.set_mode(DrawingMode::Rectangle);
    h.click(10.0, 10.0);
    h.click(50.0, 50.0);
    assert_eq!(h.chart.annotations().len(), 1);
    let id = h.chart.annotations()[0].id();

    h.chart.set_mode(DrawingMode::Select);
    h.click(30.0, 30.0);
    assert_eq!(h.chart.selected(), Some(id));

    h.click(60.0, 60.0);
    assert_eq!(h.chart.selected(), None);
}

#[test]
fn topmost_annotation_wins_overlap() {
    let mut h = Harness::with_symbol("AAPL");
    h.chart.set_mode(DrawingMode::HorizontalLine);
    h.click(20.0, 40.0);
    h.click(80.0, 40.0);
    let newest = h.chart.annotations()[1].id();

    h.chart.set_mode(DrawingMode::Select);
    h.click(50.0, 42.0);
    assert_eq!(h.chart.selected(), Some(newest));
}

#[test]
fn mode_switch_abandons_trendline() {
    let mut h = Harness::with_symbol("AAPL");
    h.chart.set_mode(DrawingMode::Trendline);
    h.click(10.0, 10.0);
    assert!(h.chart.pending().is_some());

    h.chart.set_mode(DrawingMode::Select);
    assert!(h.chart.annotations().is_empty());
    assert!(h.chart.pending().is_none());

    // the next gesture starts from scratch
    h.chart.set_mode(DrawingMode::Trendline);
    h.click(20.0, 20.0);
    assert!(h.chart.annotations().is_empty());
}

#[test]
fn delete_without_selection_is_noop() {
    let mut h = Harness::with_symbol("AAPL");
    h.chart.set_mode(DrawingMode::HorizontalLine);
    h.click(10.0, 50.0);
    let before = h.chart.annotations().to_vec();

    assert_eq!(h.chart.delete_selected().unwrap(), None);
    h.chart.handle_event(InputEvent::Key(Key::Delete)).unwrap();
    assert_eq!(h.chart.annotations(), before.as_slice());
}

#[test]
fn delete_key_removes_selection() {
    let mut h = Harness::with_symbol("AAPL");
    h.chart.set_mode(DrawingMode::HorizontalLine);
    h.click(10.0, 50.0);
    h.chart.set_mode(DrawingMode::Select);
    h.click(10.0, 50.0);
    assert!(h.chart.selected().is_some());

    h.chart.handle_event(InputEvent::Key(Key::Backspace)).unwrap();
    assert!(h.chart.annotations().is_empty());
    assert!(h.chart.selected().is_none());
}

#[test]
fn symbol_switch_discards_pending_point() {
    let mut h = Harness::with_symbol("AAPL");
    h.chart.set_mode(DrawingMode::Trendline);
    h.click(10.0, 10.0);

    h.chart.set_symbol("MSFT").unwrap();
    assert!(h.chart.pending().is_none());
    assert_eq!(h.chart.mode(), DrawingMode::Trendline);

    // one click on the new symbol only starts a gesture
    h.click(40.0, 40.0);
    assert!(h.chart.annotations().is_empty());
    assert!(h.chart.pending().is_some());

    h.chart.set_symbol("AAPL").unwrap();
    assert!(h.chart.annotations().is_empty());
}

#[test]
fn symbol_switch_clears_selection_and_swaps_sets() {
    let mut h = Harness::with_symbol("AAPL");
    h.chart.set_mode(DrawingMode::HorizontalLine);
    h.click(10.0, 50.0);
    h.chart.set_mode(DrawingMode::Select);
    h.click(10.0, 50.0);

    h.chart.set_symbol("MSFT").unwrap();
    assert!(h.chart.selected().is_none());
    assert!(h.chart.annotations().is_empty());

    h.chart.set_symbol("AAPL").unwrap();
    assert_eq!(h.chart.annotations().len(), 1);
    assert_eq!(h.chart.annotations()[0].kind(), AnnotationKind::HorizontalLine);
}

#[test]
fn drawing_before_symbol_is_ignored() {
    use charter_indicators::IndicatorSet;
    use charter_data::{MemoryStore, Persistence, StoreError};
    use std::cell::RefCell;
    use std::rc::Rc;

    let backend = Rc::new(RefCell::new(MemoryStore::new()));
    let mut h = Harness::new(backend.clone());
    h.chart.set_mode(DrawingMode::HorizontalLine);
    h.click(10.0, 50.0);
    h.chart.set_mode(DrawingMode::Trendline);
    h.click(10.0, 10.0);
    assert!(h.chart.annotations().is_empty());
    assert!(h.chart.pending().is_none());

    let refused = h.chart.set_indicator_config(IndicatorSet::default());
    assert!(matches!(refused, Err(StoreError::NoSymbol)));

    h.chart.set_symbol("AAPL").unwrap();
    assert!(h.chart.annotations().is_empty());
    assert!(backend.borrow().load_annotations("AAPL").unwrap().is_empty());

    // drawing works once a symbol is loaded
    h.click(10.0, 10.0);
    h.click(40.0, 40.0);
    assert_eq!(h.chart.annotations().len(), 1);
}

#[test]
fn clicks_outside_plot_are_ignored() {
    let mut h = Harness::with_symbol("AAPL");
    h.chart.set_mode(DrawingMode::Rectangle);
    h.click(150.0, 10.0);
    assert!(h.chart.pending().is_none());

    h.click(10.0, 10.0);
    h.click(10.0, 130.0);
    assert!(h.chart.pending().is_some());
    assert!(h.chart.annotations().is_empty());

    h.click(50.0, 50.0);
    assert_eq!(h.chart.annotations().len(), 1);
}

#[test]
fn escape_cancels_gesture_and_selection() {
    let mut h = Harness::with_symbol("AAPL");
    h.chart.set_mode(DrawingMode::HorizontalLine);
    h.click(10.0, 50.0);
    h.chart.set_mode(DrawingMode::Select);
    h.click(10.0, 50.0);
    h.chart.set_mode(DrawingMode::Trendline);
    h.click(10.0, 10.0);

    h.chart.handle_event(InputEvent::Key(Key::Escape)).unwrap();
    assert!(h.chart.pending().is_none());
    assert!(h.chart.selected().is_none());
    assert_eq!(h.chart.annotations().len(), 1);
}

#[test]
fn shortcut_keys_switch_mode() {
    let mut h = Harness::with_symbol("AAPL");
    h.chart.handle_event(InputEvent::Key(Key::Char('b'))).unwrap();
    assert_eq!(h.chart.mode(), DrawingMode::Rectangle);
    h.chart.handle_event(InputEvent::Key(Key::Char('q'))).unwrap();
    assert_eq!(h.chart.mode(), DrawingMode::Rectangle);
}

#[test]
fn preview_is_never_persisted() {
    let mut h = Harness::with_symbol("AAPL");
    h.chart.set_mode(DrawingMode::Rectangle);
    h.click(10.0, 10.0);
    for x in 11..60 {
        h.hover(x as f64, 40.0);
    }
    assert!(h.chart.annotations().is_empty());

    h.chart.frame();
    let painted = h.last_paint();
    assert_eq!(painted.len(), 1);
    assert_eq!(
        painted[0].0,
        ResolvedShape::Rect {
            min: ScreenPos::new(10.0, 10.0),
            max: ScreenPos::new(59.0, 40.0),
        }
    );
}

#[test]
fn hover_reports_time_and_bar() {
    use charter::HoverInfo;
    use charter_core::TimePoint;
    use charter_data::PriceHistory;
    use std::cell::RefCell;
    use std::rc::Rc;

    let mut h = Harness::with_symbol("AAPL");
    let dates = (0..10).map(|m| TimePoint::from_unix_seconds(m * 60)).collect();
    let closes = (0..10).map(|m| 50.0 + m as f64).collect();
    h.chart.set_history(PriceHistory::new(dates, closes).unwrap());

    let seen: Rc<RefCell<Vec<HoverInfo>>> = Rc::default();
    let sink = Rc::clone(&seen);
    h.chart.on_hover(move |info| sink.borrow_mut().push(*info));

    h.hover(3.0, 20.0);
    h.hover(30.0, 20.0);
    h.hover(300.0, 20.0);

    let seen = seen.borrow();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0].time, TimePoint::from_unix_seconds(180));
    assert_eq!(seen[0].bar.map(|b| b.close), Some(53.0));
    assert_eq!(seen[1].bar, None);
}
