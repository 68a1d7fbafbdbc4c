use anyhow::{Result, bail};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Latitude/longitude pair in degrees, taken from the map-click location.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Running,
    Cycling,
}

impl Kind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Running => "Running",
            Self::Cycling => "Cycling",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Kind-specific payload, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KindData {
    Running { cadence_spm: f64 },
    Cycling { elevation_gain_m: f64 },
}

/// Opaque stable identifier derived from the creation timestamp (last ten
/// digits of the epoch milliseconds). Collisions are accepted as negligible
/// at this scale.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkoutId(String);

impl WorkoutId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    fn from_timestamp(created_at: DateTime<Utc>) -> Self {
        let ms = created_at.timestamp_millis().to_string();
        Self(ms[ms.len().saturating_sub(10)..].to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorkoutId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn pace_min_per_km(distance_km: f64, duration_min: f64) -> f64 {
    duration_min / distance_km
}

pub fn speed_km_per_h(distance_km: f64, duration_min: f64) -> f64 {
    distance_km / (duration_min / 60.0)
}

/// A single logged activity. Immutable after construction except for the
/// interaction counter.
///
/// Constructors perform no validation; inputs are assumed finite and positive
/// where required, checked upstream by the session controller.
#[derive(Debug, Clone, PartialEq)]
pub struct Workout {
    pub id: WorkoutId,
    pub created_at: DateTime<Utc>,
    pub coords: Coordinates,
    pub distance_km: f64,
    pub duration_min: f64,
    pub interactions: u32,
    pub description: String,
    pub kind: KindData,
}

impl Workout {
    pub fn running(
        coords: Coordinates,
        distance_km: f64,
        duration_min: f64,
        cadence_spm: f64,
    ) -> Self {
        Self::new(coords, distance_km, duration_min, KindData::Running { cadence_spm })
    }

    pub fn cycling(
        coords: Coordinates,
        distance_km: f64,
        duration_min: f64,
        elevation_gain_m: f64,
    ) -> Self {
        Self::new(
            coords,
            distance_km,
            duration_min,
            KindData::Cycling { elevation_gain_m },
        )
    }

    fn new(coords: Coordinates, distance_km: f64, duration_min: f64, kind: KindData) -> Self {
        let created_at = Utc::now();
        let tag = match kind {
            KindData::Running { .. } => Kind::Running,
            KindData::Cycling { .. } => Kind::Cycling,
        };
        Self {
            id: WorkoutId::from_timestamp(created_at),
            created_at,
            coords,
            distance_km,
            duration_min,
            interactions: 0,
            description: describe(tag, created_at),
            kind,
        }
    }

    pub const fn kind_tag(&self) -> Kind {
        match self.kind {
            KindData::Running { .. } => Kind::Running,
            KindData::Cycling { .. } => Kind::Cycling,
        }
    }

    /// min/km, running only.
    pub fn pace_min_per_km(&self) -> Option<f64> {
        matches!(self.kind, KindData::Running { .. })
            .then(|| pace_min_per_km(self.distance_km, self.duration_min))
    }

    /// km/h, cycling only.
    pub fn speed_km_per_h(&self) -> Option<f64> {
        matches!(self.kind, KindData::Cycling { .. })
            .then(|| speed_km_per_h(self.distance_km, self.duration_min))
    }

    pub fn record_interaction(&mut self) {
        self.interactions += 1;
    }

    pub fn to_record(&self) -> WorkoutRecord {
        let (cadence_spm, elevation_gain_m) = match self.kind {
            KindData::Running { cadence_spm } => (Some(cadence_spm), None),
            KindData::Cycling { elevation_gain_m } => (None, Some(elevation_gain_m)),
        };
        WorkoutRecord {
            kind: self.kind_tag(),
            id: self.id.clone(),
            created_at: self.created_at,
            lat: self.coords.lat,
            lon: self.coords.lon,
            distance_km: self.distance_km,
            duration_min: self.duration_min,
            interactions: self.interactions,
            description: self.description.clone(),
            cadence_spm,
            elevation_gain_m,
            pace_min_per_km: self.pace_min_per_km(),
            speed_km_per_h: self.speed_km_per_h(),
        }
    }

    /// Rebuild a workout from its persisted form. The description is taken
    /// verbatim from the record; derived metrics are recomputed from
    /// distance/duration, which are their single source of truth.
    pub fn from_record(rec: WorkoutRecord) -> Result<Self> {
        let kind = match rec.kind {
            Kind::Running => {
                let Some(cadence_spm) = rec.cadence_spm else {
                    bail!("running record {} is missing cadence", rec.id);
                };
                KindData::Running { cadence_spm }
            }
            Kind::Cycling => {
                let Some(elevation_gain_m) = rec.elevation_gain_m else {
                    bail!("cycling record {} is missing elevation gain", rec.id);
                };
                KindData::Cycling { elevation_gain_m }
            }
        };

        Ok(Self {
            id: rec.id,
            created_at: rec.created_at,
            coords: Coordinates {
                lat: rec.lat,
                lon: rec.lon,
            },
            distance_km: rec.distance_km,
            duration_min: rec.duration_min,
            interactions: rec.interactions,
            description: rec.description,
            kind,
        })
    }
}

fn describe(kind: Kind, created_at: DateTime<Utc>) -> String {
    format!("{} on {}", kind.label(), created_at.format("%B %-d"))
}

/// Flat persisted form of a workout, tag field first. Derived metrics are
/// written out so the stored history is readable on its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutRecord {
    pub kind: Kind,
    pub id: WorkoutId,
    pub created_at: DateTime<Utc>,
    pub lat: f64,
    pub lon: f64,
    pub distance_km: f64,
    pub duration_min: f64,
    pub interactions: u32,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cadence_spm: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elevation_gain_m: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pace_min_per_km: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed_km_per_h: Option<f64>,
}

pub fn serialize_collection(workouts: &[Workout]) -> Result<String> {
    let records: Vec<WorkoutRecord> = workouts.iter().map(Workout::to_record).collect();
    Ok(serde_json::to_string(&records)?)
}

/// Order-preserving inverse of [`serialize_collection`].
pub fn deserialize_collection(raw: &str) -> Result<Vec<Workout>> {
    let records: Vec<WorkoutRecord> = serde_json::from_str(raw)?;
    records.into_iter().map(Workout::from_record).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn coords() -> Coordinates {
        Coordinates { lat: 10.0, lon: 20.0 }
    }

    #[test]
    fn running_pace_is_duration_over_distance() {
        let w = Workout::running(coords(), 5.0, 30.0, 150.0);
        assert_eq!(w.pace_min_per_km(), Some(6.0));
        assert_eq!(w.speed_km_per_h(), None);
    }

    #[test]
    fn cycling_speed_is_distance_over_hours() {
        let w = Workout::cycling(coords(), 30.0, 90.0, 400.0);
        assert_eq!(w.speed_km_per_h(), Some(20.0));
        assert_eq!(w.pace_min_per_km(), None);
    }

    #[test]
    fn description_combines_kind_and_date() {
        let w = Workout::running(coords(), 5.0, 30.0, 150.0);
        let expected = format!("Running on {}", w.created_at.format("%B %-d"));
        assert_eq!(w.description, expected);
    }

    #[test]
    fn id_is_last_ten_digits_of_epoch_millis() {
        let t = Utc.with_ymd_and_hms(2024, 5, 17, 12, 0, 0).unwrap();
        let id = WorkoutId::from_timestamp(t);
        let ms = t.timestamp_millis().to_string();
        assert_eq!(id.as_str(), &ms[ms.len() - 10..]);
        assert_eq!(id.as_str().len(), 10);
    }

    #[test]
    fn interaction_counter_matches_call_count() {
        let mut w = Workout::cycling(coords(), 12.0, 40.0, -30.0);
        assert_eq!(w.interactions, 0);
        w.record_interaction();
        w.record_interaction();
        assert_eq!(w.interactions, 2);
    }

    #[test]
    fn record_round_trip_preserves_everything() {
        let mut running = Workout::running(coords(), 5.0, 30.0, 150.0);
        running.record_interaction();
        let cycling = Workout::cycling(Coordinates { lat: -3.5, lon: 151.2 }, 42.0, 120.0, -12.0);

        let raw = serialize_collection(&[running.clone(), cycling.clone()]).unwrap();
        let restored = deserialize_collection(&raw).unwrap();

        assert_eq!(restored, vec![running, cycling]);
    }

    #[test]
    fn persisted_record_carries_derived_fields() {
        let rec = Workout::running(coords(), 5.0, 30.0, 150.0).to_record();
        assert_eq!(rec.pace_min_per_km, Some(6.0));
        assert_eq!(rec.speed_km_per_h, None);
        assert_eq!(rec.cadence_spm, Some(150.0));
    }

    #[test]
    fn record_missing_variant_field_is_rejected() {
        let mut rec = Workout::running(coords(), 5.0, 30.0, 150.0).to_record();
        rec.cadence_spm = None;
        assert!(Workout::from_record(rec).is_err());
    }
}
