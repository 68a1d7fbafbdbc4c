use crate::dlog;
use crate::error::GeolocationUnavailable;
use crate::utils::format_coords;
use crate::workout::{Coordinates, Kind, KindData, Workout, pace_min_per_km, speed_km_per_h};

/// One-shot position request. Either resolves once or the app proceeds
/// without a map; no retry policy here.
pub trait Geolocator {
    fn locate(&self) -> Result<Coordinates, GeolocationUnavailable>;
}

/// Map surface. Markers are append-only for the session.
pub trait MapView {
    fn add_marker(&mut self, coords: Coordinates, popup_text: &str, kind: Kind);
    /// Animated focus/pan.
    fn pan_to(&mut self, coords: Coordinates);
}

pub trait ListView {
    fn append_item(&mut self, item: &str);
}

pub trait FormView {
    fn show(&mut self);
    fn hide_and_reset(&mut self);
}

/// One list line per workout: identity, description, base fields and the
/// kind-specific metrics.
pub fn render_list_item(w: &Workout) -> String {
    let mut line = format!(
        "[{}] {}: {} km in {} min",
        w.id, w.description, w.distance_km, w.duration_min
    );
    match w.kind {
        KindData::Running { cadence_spm } => {
            let pace = pace_min_per_km(w.distance_km, w.duration_min);
            line.push_str(&format!(", {pace:.1} min/km, {cadence_spm} spm"));
        }
        KindData::Cycling { elevation_gain_m } => {
            let speed = speed_km_per_h(w.distance_km, w.duration_min);
            line.push_str(&format!(", {speed:.1} km/h, {elevation_gain_m} m gain"));
        }
    }
    line
}

/// Position source fed from CLI arguments instead of a device.
pub struct FixedGeolocator {
    coords: Option<Coordinates>,
}

impl FixedGeolocator {
    pub const fn new(coords: Option<Coordinates>) -> Self {
        Self { coords }
    }
}

impl Geolocator for FixedGeolocator {
    fn locate(&self) -> Result<Coordinates, GeolocationUnavailable> {
        self.coords.ok_or_else(|| GeolocationUnavailable {
            reason: "no position given (pass --lat/--lon)".to_string(),
        })
    }
}

/// Terminal stand-in for the interactive map. Panning is user-visible,
/// markers only show up in the debug log.
pub struct TerminalMap;

impl MapView for TerminalMap {
    fn add_marker(&mut self, coords: Coordinates, popup_text: &str, kind: Kind) {
        dlog!(
            "marker_added at={} popup={popup_text:?} kind={kind}",
            format_coords(coords)
        );
    }

    fn pan_to(&mut self, coords: Coordinates) {
        println!("panning map to {}", format_coords(coords));
    }
}

pub struct TerminalList;

impl ListView for TerminalList {
    fn append_item(&mut self, item: &str) {
        println!("{item}");
    }
}

pub struct TerminalForm;

impl FormView for TerminalForm {
    fn show(&mut self) {
        dlog!("form_shown");
    }

    fn hide_and_reset(&mut self) {
        dlog!("form_hidden");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_geolocator_resolves_or_fails_once() {
        let located = FixedGeolocator::new(Some(Coordinates { lat: 1.0, lon: 2.0 }));
        assert!(located.locate().is_ok());

        let missing = FixedGeolocator::new(None);
        let err = missing.locate().unwrap_err();
        assert!(err.reason.contains("--lat"));
    }

    #[test]
    fn list_item_shows_kind_specific_metrics() {
        let coords = Coordinates { lat: 10.0, lon: 20.0 };
        let running = Workout::running(coords, 5.0, 30.0, 150.0);
        let line = render_list_item(&running);
        assert!(line.contains("5 km in 30 min"));
        assert!(line.contains("6.0 min/km"));
        assert!(line.contains("150 spm"));

        let cycling = Workout::cycling(coords, 30.0, 90.0, -12.0);
        let line = render_list_item(&cycling);
        assert!(line.contains("20.0 km/h"));
        assert!(line.contains("-12 m gain"));
    }
}
