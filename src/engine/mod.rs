//! The seam between the HTTP layer and the astrology computation.
//!
//! Chart mathematics is an external concern: everything the service needs
//! from it is expressed by [`AstroEngine`], and everything that can go wrong
//! inside it by [`EngineError`]. The shipped [`deterministic`] implementation
//! is a table-driven stand-in that keeps the binary and the test suites
//! self-contained; an ephemeris-backed implementation drops in behind the
//! same trait.

pub mod deterministic;

pub use deterministic::DeterministicEngine;

use std::path::Path;

use chrono::{NaiveDate, NaiveTime};
use chrono_tz::Tz;
use thiserror::Error;

use crate::models::{AspectRecord, Subject};

/// Validated input to subject construction.
#[derive(Debug, Clone, PartialEq)]
pub struct SubjectRequest {
    pub name: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub location: LocationRequest,
}

/// Where the birth happened: explicit coordinates with a resolved timezone,
/// or a place name the engine resolves itself.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationRequest {
    Coordinates {
        latitude: f64,
        longitude: f64,
        timezone: Tz,
    },
    Place(String),
}

/// Failures surfaced by an engine. Resolution failures are client errors;
/// render and I/O failures are server errors. The HTTP layer maps them
/// accordingly.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("unknown place of birth: {0:?}")]
    UnresolvablePlace(String),
    #[error("unresolvable timezone identifier {0:?}")]
    InvalidTimezone(String),
    #[error("birth instant does not exist in timezone {timezone}: {date} {time}")]
    InvalidInstant {
        date: NaiveDate,
        time: NaiveTime,
        timezone: Tz,
    },
    #[error("chart renderer failed: {0}")]
    Render(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// The astrology computation the service delegates to.
pub trait AstroEngine: Send + Sync {
    /// Construct the chart subject for a validated request.
    fn build_subject(&self, request: &SubjectRequest) -> Result<Subject, EngineError>;

    /// Compute the aspect records for a subject.
    fn aspects(&self, subject: &Subject) -> Result<Vec<AspectRecord>, EngineError>;

    /// Render the subject's chart wheel as SVG into `output`.
    fn render_chart(&self, subject: &Subject, output: &Path) -> Result<(), EngineError>;
}
