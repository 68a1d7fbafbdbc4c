use crate::dlog;
use crate::error::{InvalidInput, PersistenceUnreadable};
use crate::store::{KeyValueStore, WORKOUTS_KEY};
use crate::view::{FormView, ListView, MapView, render_list_item};
use crate::workout::{
    Coordinates, Workout, WorkoutId, deserialize_collection, serialize_collection,
};
use anyhow::{Context, Result};

/// Parsed form fields for one creation gesture. The location comes from the
/// pending context recorded by [`Session::begin_creation`], not from here.
#[derive(Debug, Clone, Copy)]
pub enum CreationInput {
    Running {
        distance_km: f64,
        duration_min: f64,
        cadence_spm: f64,
    },
    Cycling {
        distance_km: f64,
        duration_min: f64,
        elevation_gain_m: f64,
    },
}

/// Single authority over the workout collection. Mediates between the
/// creation flow, the rendering collaborators and the persistent store;
/// every mutation runs to completion before the next event is handled.
pub struct Session<S, M, L, F>
where
    S: KeyValueStore,
    M: MapView,
    L: ListView,
    F: FormView,
{
    workouts: Vec<Workout>,
    pending: Option<Coordinates>,
    store: S,
    map: M,
    list: L,
    form: F,
}

impl<S, M, L, F> Session<S, M, L, F>
where
    S: KeyValueStore,
    M: MapView,
    L: ListView,
    F: FormView,
{
    pub fn new(store: S, map: M, list: L, form: F) -> Self {
        Self {
            workouts: Vec::new(),
            pending: None,
            store,
            map,
            list,
            form,
        }
    }

    pub fn workouts(&self) -> &[Workout] {
        &self.workouts
    }

    /// Restore the collection from the store. An absent or unreadable store
    /// is a cold-start, not an error. List items are rendered immediately;
    /// markers wait for [`Session::map_ready`].
    pub fn initialize(&mut self) {
        match Self::load_persisted(&self.store) {
            Ok(None) => dlog!("no persisted history, cold start"),
            Ok(Some(workouts)) => {
                self.workouts = workouts;
                for w in &self.workouts {
                    self.list.append_item(&render_list_item(w));
                }
                dlog!("restored workouts={}", self.workouts.len());
            }
            Err(e) => {
                tracing::debug!(err = %e, "starting with an empty collection");
            }
        }
    }

    fn load_persisted(store: &S) -> Result<Option<Vec<Workout>>, PersistenceUnreadable> {
        let raw = store.get(WORKOUTS_KEY).map_err(PersistenceUnreadable)?;
        let Some(raw) = raw else {
            return Ok(None);
        };
        let workouts = deserialize_collection(&raw).map_err(PersistenceUnreadable)?;
        Ok(Some(workouts))
    }

    /// External trigger fired once map initialization completes; renders a
    /// marker for every workout restored before the map existed.
    pub fn map_ready(&mut self) {
        for w in &self.workouts {
            self.map.add_marker(w.coords, &w.description, w.kind_tag());
        }
    }

    /// Record where the next workout goes and show the form. Calling this
    /// again before submission overwrites the pending location
    /// (last-write-wins, no queueing).
    pub fn begin_creation(&mut self, coords: Coordinates) {
        self.pending = Some(coords);
        self.form.show();
    }

    /// Validated creation entry point. On failure nothing is mutated and the
    /// form keeps its state for a retry; on success the new workout is
    /// appended, rendered, and the entire collection is re-serialized to the
    /// store before returning.
    pub fn submit_creation(&mut self, input: CreationInput) -> Result<WorkoutId> {
        let coords = validate(self.pending, input)?;

        let workout = match input {
            CreationInput::Running {
                distance_km,
                duration_min,
                cadence_spm,
            } => Workout::running(coords, distance_km, duration_min, cadence_spm),
            CreationInput::Cycling {
                distance_km,
                duration_min,
                elevation_gain_m,
            } => Workout::cycling(coords, distance_km, duration_min, elevation_gain_m),
        };

        let id = workout.id.clone();
        self.list.append_item(&render_list_item(&workout));
        self.map
            .add_marker(workout.coords, &workout.description, workout.kind_tag());
        self.workouts.push(workout);

        self.pending = None;
        self.form.hide_and_reset();

        self.persist()?;
        Ok(id)
    }

    /// Resolve a list selection back to a map focus. An unknown id is a
    /// no-op; the list and the collection may diverge and that is not an
    /// error.
    pub fn focus_on(&mut self, id: &WorkoutId) {
        let Some(w) = self.workouts.iter_mut().find(|w| &w.id == id) else {
            dlog!("stale_selection id={id}");
            return;
        };
        w.record_interaction();
        let coords = w.coords;
        self.map.pan_to(coords);
    }

    /// Erase the persisted history only. The in-memory collection is left
    /// untouched; a restart is what observes the empty state.
    pub fn clear_history(&mut self) -> Result<()> {
        self.store
            .remove(WORKOUTS_KEY)
            .context("clearing persisted workout history")
    }

    fn persist(&mut self) -> Result<()> {
        let raw = serialize_collection(&self.workouts)?;
        self.store
            .set(WORKOUTS_KEY, &raw)
            .context("persisting workout history")
    }
}

fn validate(pending: Option<Coordinates>, input: CreationInput) -> Result<Coordinates, InvalidInput> {
    let mut fields = Vec::new();

    let (distance_km, duration_min) = match input {
        CreationInput::Running {
            distance_km,
            duration_min,
            ..
        }
        | CreationInput::Cycling {
            distance_km,
            duration_min,
            ..
        } => (distance_km, duration_min),
    };

    if !(distance_km.is_finite() && distance_km > 0.0) {
        fields.push("distance");
    }
    if !(duration_min.is_finite() && duration_min > 0.0) {
        fields.push("duration");
    }
    match input {
        CreationInput::Running { cadence_spm, .. } => {
            if !(cadence_spm.is_finite() && cadence_spm > 0.0) {
                fields.push("cadence");
            }
        }
        // Downhill rides exist: elevation gain only has to be finite.
        CreationInput::Cycling {
            elevation_gain_m, ..
        } => {
            if !elevation_gain_m.is_finite() {
                fields.push("elevation");
            }
        }
    }
    if pending.is_none() {
        fields.push("location");
    }

    match pending {
        Some(coords) if fields.is_empty() => Ok(coords),
        _ => Err(InvalidInput { fields }),
    }
}
