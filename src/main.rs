#![deny(warnings, clippy::all, clippy::pedantic, clippy::nursery)]

use anyhow::Result;
use clap::Parser;
use waylog::session::{CreationInput, Session};
use waylog::store::SqliteStore;
use waylog::view::{FixedGeolocator, Geolocator, TerminalForm, TerminalList, TerminalMap};
use waylog::workout::{Coordinates, WorkoutId};
use waylog::{cli, utils};

#[macro_use]
extern crate waylog;

type CliSession = Session<SqliteStore, TerminalMap, TerminalList, TerminalForm>;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    utils::init_logging(cli.verbose, cli.quiet);

    let store = SqliteStore::open(&cli.store)?;
    let mut session = Session::new(store, TerminalMap, TerminalList, TerminalForm);

    match cli.cmd {
        None => {
            list(&mut session, None);
            Ok(())
        }
        Some(cli::Cmd::List { lat, lon }) => {
            list(&mut session, lat.zip(lon));
            Ok(())
        }
        Some(cli::Cmd::Add { lat, lon, activity }) => {
            add(&mut session, Coordinates { lat, lon }, &activity)
        }
        Some(cli::Cmd::Focus { id }) => {
            session.initialize();
            session.focus_on(&WorkoutId::new(id));
            Ok(())
        }
        Some(cli::Cmd::Clear) => {
            session.clear_history()?;
            println!("persisted workout history cleared");
            Ok(())
        }
    }
}

fn list(session: &mut CliSession, center: Option<(f64, f64)>) {
    session.initialize();
    if session.workouts().is_empty() {
        tracing::info!("no workouts recorded yet");
    }

    let geolocator = FixedGeolocator::new(center.map(|(lat, lon)| Coordinates { lat, lon }));
    match geolocator.locate() {
        Ok(coords) => {
            dlog!("map_ready center={}", utils::format_coords(coords));
            session.map_ready();
        }
        Err(e) => tracing::warn!(err = %e, "continuing without a map"),
    };
}

fn add(session: &mut CliSession, coords: Coordinates, activity: &cli::Activity) -> Result<()> {
    session.initialize();
    session.begin_creation(coords);

    let input = match *activity {
        cli::Activity::Running {
            distance,
            duration,
            cadence,
        } => CreationInput::Running {
            distance_km: distance,
            duration_min: duration,
            cadence_spm: cadence,
        },
        cli::Activity::Cycling {
            distance,
            duration,
            elevation,
        } => CreationInput::Cycling {
            distance_km: distance,
            duration_min: duration,
            elevation_gain_m: elevation,
        },
    };

    let id = session.submit_creation(input)?;
    println!("recorded workout {id}");
    Ok(())
}
