use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An angular relationship between two chart points.
///
/// Derived per request by the engine's aspect pass. `p1`/`p2` are the raw
/// indices of the points in the engine's point list; together with the
/// absolute positions, `diff` and `aid` they are internal detail stripped by
/// the structure optimizer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AspectRecord {
    pub p1_name: String,
    pub p2_name: String,
    pub p1: usize,
    pub p2: usize,
    pub p1_abs_pos: f64,
    pub p2_abs_pos: f64,
    pub aspect: AspectType,
    /// Distance from the exact aspect angle, in degrees.
    pub orbit: f64,
    /// Signed shortest angular separation, (-180, 180].
    pub diff: f64,
    /// Generated identifier, unique per record.
    pub aid: Uuid,
}

/// The recognized aspect angles and their allowed orbs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AspectType {
    Conjunction,
    Sextile,
    Square,
    Trine,
    Opposition,
}

impl AspectType {
    pub const ALL: [AspectType; 5] = [
        Self::Conjunction,
        Self::Sextile,
        Self::Square,
        Self::Trine,
        Self::Opposition,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Conjunction => "conjunction",
            Self::Sextile => "sextile",
            Self::Square => "square",
            Self::Trine => "trine",
            Self::Opposition => "opposition",
        }
    }

    /// Exact angle of the aspect, in degrees.
    pub fn degrees(&self) -> f64 {
        match self {
            Self::Conjunction => 0.0,
            Self::Sextile => 60.0,
            Self::Square => 90.0,
            Self::Trine => 120.0,
            Self::Opposition => 180.0,
        }
    }

    /// Maximum distance from the exact angle still counted as this aspect.
    pub fn orb(&self) -> f64 {
        match self {
            Self::Conjunction => 10.0,
            Self::Sextile => 6.0,
            Self::Square => 8.0,
            Self::Trine => 8.0,
            Self::Opposition => 10.0,
        }
    }

    /// The aspect matching an angular separation, if any. Orbs are narrow
    /// enough that at most one angle can match.
    pub fn matching(separation: f64) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|aspect| (separation - aspect.degrees()).abs() <= aspect.orb())
    }
}
