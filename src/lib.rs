//! Workout logging core: the workout domain model, the session controller
//! keeping the in-memory collection, the rendered views and the persisted
//! store mutually consistent, and the collaborator traits those flows run
//! against.

pub mod cli;
pub mod error;
pub mod session;
pub mod store;
pub mod utils;
pub mod view;
pub mod workout;
