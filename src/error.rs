use thiserror::Error;

/// Rejected creation input. User-correctable; the collection, the form and
/// the store are left untouched so the gesture can simply be repeated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid input: {}", .fields.join(", "))]
pub struct InvalidInput {
    pub fields: Vec<&'static str>,
}

/// The one-shot position request failed. Surfaced once as a warning; the app
/// continues without map initialization.
#[derive(Debug, Clone, Error)]
#[error("could not acquire a position: {reason}")]
pub struct GeolocationUnavailable {
    pub reason: String,
}

/// The persisted history could not be read or parsed. Treated as a
/// cold-start, never surfaced to the user.
#[derive(Debug, Error)]
#[error("persisted workout history could not be read: {0}")]
pub struct PersistenceUnreadable(pub anyhow::Error);
