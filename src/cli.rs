use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

const DEFAULT_STORE: &str = "waylog.db";

#[derive(Parser, Debug)]
#[command(
    name = "waylog",
    about = "Log workouts at map locations and keep them across sessions"
)]
pub struct Cli {
    /// Path to the SQLite file backing the workout history.
    #[arg(long, value_name = "PATH", default_value = DEFAULT_STORE, global = true)]
    pub store: PathBuf,

    /// Increase log verbosity (-v, -vv). Defaults to INFO.
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Decrease log verbosity (-q, -qq). Defaults to INFO.
    #[arg(short = 'q', long, action = ArgAction::Count, global = true)]
    pub quiet: u8,

    #[command(subcommand)]
    pub cmd: Option<Cmd>,
}

#[derive(Subcommand, Debug)]
pub enum Cmd {
    /// Print the recorded workouts (the default command).
    List {
        /// Map center latitude; without a position the map stays off.
        #[arg(long)]
        lat: Option<f64>,

        /// Map center longitude.
        #[arg(long)]
        lon: Option<f64>,
    },

    /// Record a new workout at the given location.
    Add {
        /// Latitude of the workout location.
        #[arg(long)]
        lat: f64,

        /// Longitude of the workout location.
        #[arg(long)]
        lon: f64,

        #[command(subcommand)]
        activity: Activity,
    },

    /// Select a workout by id and pan the map to it.
    Focus {
        /// Workout id as printed by `list`.
        id: String,
    },

    /// Erase the persisted history. Already-loaded sessions are unaffected.
    Clear,
}

#[derive(Subcommand, Debug)]
pub enum Activity {
    Running {
        /// Distance in km.
        #[arg(long)]
        distance: f64,

        /// Duration in minutes.
        #[arg(long)]
        duration: f64,

        /// Cadence in steps per minute.
        #[arg(long)]
        cadence: f64,
    },
    Cycling {
        /// Distance in km.
        #[arg(long)]
        distance: f64,

        /// Duration in minutes.
        #[arg(long)]
        duration: f64,

        /// Elevation gain in meters (negative for net descent).
        #[arg(long)]
        elevation: f64,
    },
}
