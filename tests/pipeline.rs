use rusty_phase::data::loader;
use rusty_phase::projection::AxisRange;
use rusty_phase::state::{AppState, MAX_SNAPSHOT_TICKS};
use rusty_phase::CoreError;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

const CSV: &str = "\
Time,X,Y,Z
t0,10,1,-5
t1,20,2,-4
t2,45,3,-3
t3,5,4,-2
";

fn loaded_state() -> AppState {
    init_logging();
    let table = loader::parse_csv(CSV.as_bytes()).unwrap();
    let mut state = AppState::default();
    state.set_table(table).unwrap();
    state
}

#[test]
fn csv_to_both_projections() {
    let state = loaded_state();
    let snap = state.snapshot().unwrap();

    assert_eq!(snap.time_header, "Time");
    assert_eq!(snap.y_header, "X");
    assert_eq!(snap.x_ticks, vec!["t0", "t1", "t2", "t3"]);
    assert_eq!(snap.y_range, AxisRange { min: 0.0, max: 50.0 });
    assert_eq!(snap.y_ticks, vec![0.0, 10.0, 20.0, 30.0, 40.0, 50.0]);

    assert_eq!(snap.time_series.len(), 4);
    assert_eq!(snap.phase_space.len(), 4);
    let last = &snap.phase_space[3];
    assert_eq!((last.x, last.y, last.z), (5.0, 45.0, 20.0));
}

#[test]
fn header_cycling_rebuilds_projections() {
    let mut state = loaded_state();

    state.select_y_header("Z").unwrap();
    state.next_y_header().unwrap();
    assert_eq!(state.snapshot().unwrap().y_header, "X");

    state.previous_y_header().unwrap();
    let snap = state.snapshot().unwrap();
    assert_eq!(snap.y_header, "Z");
    assert_eq!(snap.time_series[0].value, -5.0);
    assert_eq!(snap.y_range, AxisRange { min: -10.0, max: 10.0 });
    assert_eq!(snap.y_ticks.len(), 11);
}

#[test]
fn differencing_and_tau_flow_through() {
    let mut state = loaded_state();
    state.set_first_differencing(true).unwrap();
    state.set_tau(2).unwrap();

    let snap = state.snapshot().unwrap();
    let values: Vec<_> = snap.time_series.iter().map(|p| p.value).collect();
    assert_eq!(values, vec![0.0, 10.0, 25.0, -40.0]);

    let p = &snap.phase_space[1];
    assert_eq!((p.x, p.y, p.z), (10.0, 0.0, 0.0));
    let p = &snap.phase_space[3];
    assert_eq!((p.x, p.y, p.z), (-40.0, 10.0, 0.0));
}

#[test]
fn selection_is_visible_in_next_snapshot() {
    let mut state = loaded_state();
    state.set_point_selected(2, true).unwrap();

    let snap = state.snapshot().unwrap();
    assert!(snap.time_series[2].selected);
    assert!(snap.phase_space[2].selected);
    assert!(!snap.phase_space[1].selected);

    assert!(matches!(
        state.set_point_selected(9, true),
        Err(CoreError::IndexOutOfBounds { .. })
    ));
}

#[test]
fn rejected_reload_keeps_previous_dataset() {
    let mut state = loaded_state();

    let bad = loader::parse_csv("A,B\n1,2\n".as_bytes()).unwrap();
    let err = state.set_table(bad).unwrap_err();
    assert!(matches!(err, CoreError::MissingTimeHeader { .. }));
    assert!(state.status_message.is_some());

    let snap = state.snapshot().unwrap();
    assert_eq!(snap.time_series.len(), 4);
    assert_eq!(snap.y_header, "X");
}

#[test]
fn overflow_and_short_rows_are_rejected() {
    init_logging();
    let mut state = AppState::default();

    let overflow = loader::parse_csv("Time,X\nt0,1,2\n".as_bytes()).unwrap();
    assert_eq!(
        state.set_table(overflow),
        Err(CoreError::ExtraColumn { row: 0 })
    );

    let short = loader::parse_csv("Time,X,Y\nt0,1,2\nt1,3\n".as_bytes()).unwrap();
    assert!(matches!(
        state.set_table(short),
        Err(CoreError::RowShape { row: 1, .. })
    ));
    assert!(state.dataset.is_none());
}

#[test]
fn snapshot_serialises_with_camel_case_fields() {
    let state = loaded_state();
    let json = serde_json::to_value(state.snapshot().unwrap()).unwrap();
    assert_eq!(json["yHeader"], "X");
    assert_eq!(json["timeSeries"][0]["timeLabel"], "t0");
    assert_eq!(json["phaseSpace"][0]["z"], 0.0);
}

#[test]
fn repeated_refresh_is_stable() {
    let mut state = loaded_state();
    let before = state.snapshot().unwrap().time_series;
    state.refresh().unwrap();
    state.refresh().unwrap();
    assert_eq!(before, state.snapshot().unwrap().time_series);
}

#[test]
fn huge_magnitudes_load_with_bounded_ticks() {
    init_logging();
    let table = loader::parse_csv("Time,X\nt0,1e30\nt1,2\n".as_bytes()).unwrap();
    let mut state = AppState::default();
    state.set_table(table).unwrap();

    let snap = state.snapshot().unwrap();
    assert_eq!(snap.time_series.len(), 2);
    assert!(snap.y_ticks.len() <= MAX_SNAPSHOT_TICKS);
    assert!(snap.time_series.iter().all(|p| p.y.is_finite()));
}

#[test]
fn duplicate_header_is_named_in_the_error() {
    init_logging();
    let mut state = AppState::default();
    let table = loader::parse_csv("Time,X,X\nt0,1,2\n".as_bytes()).unwrap();
    assert_eq!(
        state.set_table(table),
        Err(CoreError::DuplicateHeader { header: "X".into() })
    );
    assert!(state.dataset.is_none());
}
