use waylog::session::{CreationInput, Session};
use waylog::store::SqliteStore;
use waylog::view::{FormView, ListView, MapView};
use waylog::workout::{Coordinates, Kind, KindData};

struct SilentMap;

impl MapView for SilentMap {
    fn add_marker(&mut self, _coords: Coordinates, _popup_text: &str, _kind: Kind) {}
    fn pan_to(&mut self, _coords: Coordinates) {}
}

struct SilentList;

impl ListView for SilentList {
    fn append_item(&mut self, _item: &str) {}
}

struct SilentForm;

impl FormView for SilentForm {
    fn show(&mut self) {}
    fn hide_and_reset(&mut self) {}
}

fn session_at(path: &std::path::Path) -> Session<SqliteStore, SilentMap, SilentList, SilentForm> {
    let store = SqliteStore::open(path).unwrap();
    Session::new(store, SilentMap, SilentList, SilentForm)
}

#[test]
fn create_persist_reload_focus_clear_cycle() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("waylog.db");

    let run_coords = Coordinates { lat: 10.0, lon: 20.0 };
    let ride_coords = Coordinates { lat: 48.1, lon: -1.7 };

    // First session: record one run and one ride.
    let mut first = session_at(&db);
    first.initialize();
    assert!(first.workouts().is_empty());

    first.begin_creation(run_coords);
    first
        .submit_creation(CreationInput::Running {
            distance_km: 5.0,
            duration_min: 30.0,
            cadence_spm: 150.0,
        })
        .unwrap();

    first.begin_creation(ride_coords);
    first
        .submit_creation(CreationInput::Cycling {
            distance_km: 30.0,
            duration_min: 90.0,
            elevation_gain_m: -40.0,
        })
        .unwrap();

    let recorded = first.workouts().to_vec();
    assert_eq!(recorded.len(), 2);
    drop(first);

    // Second session over the same file restores everything in order,
    // derived metrics and descriptions included.
    let mut second = session_at(&db);
    second.initialize();
    assert_eq!(second.workouts(), recorded.as_slice());

    let run = &second.workouts()[0];
    assert_eq!(run.coords, run_coords);
    assert_eq!(run.pace_min_per_km(), Some(6.0));
    assert!(matches!(run.kind, KindData::Running { cadence_spm } if cadence_spm == 150.0));
    let ride = &second.workouts()[1];
    assert_eq!(ride.speed_km_per_h(), Some(20.0));

    // Selecting the run counts the interaction on the restored record.
    let run_id = run.id.clone();
    second.focus_on(&run_id);
    assert_eq!(second.workouts()[0].interactions, 1);

    // Clearing erases only the store; this session keeps its collection.
    second.clear_history().unwrap();
    assert_eq!(second.workouts().len(), 2);
    drop(second);

    let mut third = session_at(&db);
    third.initialize();
    assert!(third.workouts().is_empty());
}
