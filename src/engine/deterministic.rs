//! Table-driven engine stand-in.
//!
//! Positions are stable arithmetic placeholders derived from the birth
//! instant, not ephemeris output. The point of this implementation is a
//! deterministic, self-contained chart graph with the full shape the
//! serializer and optimizer expect: fourteen tracked bodies, two axes,
//! twelve equal house cusps, aspects from the fixed angle/orb table, lunar
//! phase and dominant classifications.

use std::path::Path;
use std::str::FromStr;

use chrono::{DateTime, Timelike};
use chrono_tz::Tz;
use uuid::Uuid;

use crate::models::{
    AspectRecord, AspectType, ChartPoint, Element, LunarPhase, PointType, Quality, Subject,
    HOUSE_NAMES,
};

use super::{AstroEngine, EngineError, LocationRequest, SubjectRequest};

/// Seconds since the Unix epoch of 2000-01-01T00:00:00Z, the zero point of
/// the placeholder motion table.
const EPOCH: i64 = 946_684_800;

/// Tracked bodies: display name, placeholder daily motion in degrees, and
/// longitude at the epoch.
const BODIES: [(&str, f64, f64); 14] = [
    ("Sun", 0.9856, 280.46),
    ("Moon", 13.1764, 218.32),
    ("Mercury", 1.3833, 252.25),
    ("Venus", 1.2, 181.98),
    ("Mars", 0.5240, 355.43),
    ("Jupiter", 0.0831, 34.35),
    ("Saturn", 0.0334, 50.08),
    ("Uranus", 0.0117, 314.05),
    ("Neptune", 0.006, 304.35),
    ("Pluto", 0.004, 238.93),
    ("North_Node", -0.0529, 125.04),
    ("South_Node", -0.0529, 305.04),
    ("Chiron", 0.02, 207.22),
    ("Lilith", 0.1114, 83.35),
];

/// Built-in place resolution: name, latitude, longitude, IANA timezone.
const GAZETTEER: [(&str, f64, f64, &str); 10] = [
    ("london", 51.5074, -0.1278, "Europe/London"),
    ("new york", 40.7128, -74.0060, "America/New_York"),
    ("tokyo", 35.6762, 139.6503, "Asia/Tokyo"),
    ("paris", 48.8566, 2.3522, "Europe/Paris"),
    ("berlin", 52.5200, 13.4050, "Europe/Berlin"),
    ("new delhi", 28.6139, 77.2090, "Asia/Kolkata"),
    ("sydney", -33.8688, 151.2093, "Australia/Sydney"),
    ("sao paulo", -23.5505, -46.6333, "America/Sao_Paulo"),
    ("los angeles", 34.0522, -118.2437, "America/Los_Angeles"),
    ("cairo", 30.0444, 31.2357, "Africa/Cairo"),
];

const PHASES: [(&str, &str); 8] = [
    ("New Moon", "\u{1f311}"),
    ("Waxing Crescent", "\u{1f312}"),
    ("First Quarter", "\u{1f313}"),
    ("Waxing Gibbous", "\u{1f314}"),
    ("Full Moon", "\u{1f315}"),
    ("Waning Gibbous", "\u{1f316}"),
    ("Last Quarter", "\u{1f317}"),
    ("Waning Crescent", "\u{1f318}"),
];

#[derive(Debug, Clone, Copy, Default)]
pub struct DeterministicEngine;

impl DeterministicEngine {
    pub fn new() -> Self {
        Self
    }

    fn resolve_location(
        &self,
        location: &LocationRequest,
    ) -> Result<(f64, f64, Tz), EngineError> {
        match location {
            LocationRequest::Coordinates {
                latitude,
                longitude,
                timezone,
            } => Ok((*latitude, *longitude, *timezone)),
            LocationRequest::Place(place) => {
                let wanted = place.trim().to_lowercase();
                let &(_, latitude, longitude, tz_name) = GAZETTEER
                    .iter()
                    .find(|(name, _, _, _)| *name == wanted)
                    .ok_or_else(|| EngineError::UnresolvablePlace(place.clone()))?;
                let timezone = Tz::from_str(tz_name)
                    .map_err(|_| EngineError::InvalidTimezone(tz_name.to_string()))?;
                Ok((latitude, longitude, timezone))
            }
        }
    }
}

impl AstroEngine for DeterministicEngine {
    fn build_subject(&self, request: &SubjectRequest) -> Result<Subject, EngineError> {
        let (latitude, longitude, timezone) = self.resolve_location(&request.location)?;

        let instant: DateTime<Tz> = request
            .date
            .and_time(request.time)
            .and_local_timezone(timezone)
            .earliest()
            .ok_or(EngineError::InvalidInstant {
                date: request.date,
                time: request.time,
                timezone,
            })?;
        let days = (instant.timestamp() - EPOCH) as f64 / 86_400.0;

        // Equal cusps off a placeholder ascendant; the tenth cusp doubles as
        // the midheaven.
        let ascendant_pos = (request.time.num_seconds_from_midnight() as f64 / 240.0
            + longitude
            + latitude)
            .rem_euclid(360.0);
        let houses: Vec<ChartPoint> = HOUSE_NAMES
            .iter()
            .enumerate()
            .map(|(i, name)| {
                ChartPoint::from_abs_pos(
                    *name,
                    ascendant_pos + 30.0 * i as f64,
                    PointType::House,
                )
            })
            .collect();

        let mut ascendant =
            ChartPoint::from_abs_pos("Ascendant", ascendant_pos, PointType::AxialCusp);
        let mut midheaven =
            ChartPoint::from_abs_pos("Midheaven", houses[9].abs_pos, PointType::AxialCusp);
        ascendant.house = Some(HOUSE_NAMES[0].to_string());
        midheaven.house = Some(HOUSE_NAMES[9].to_string());

        let planets: Vec<ChartPoint> = BODIES
            .iter()
            .enumerate()
            .map(|(index, (name, motion, epoch_pos))| {
                let abs_pos = (epoch_pos + motion * days).rem_euclid(360.0);
                let mut point = ChartPoint::from_abs_pos(*name, abs_pos, PointType::Planet);
                let house_index =
                    ((abs_pos - ascendant_pos).rem_euclid(360.0) / 30.0) as usize;
                point.house = Some(HOUSE_NAMES[house_index.min(11)].to_string());
                point.retrograde = Some(is_retrograde(*name, index, days));
                point
            })
            .collect();

        let retrograde_planets = planets
            .iter()
            .filter(|p| p.retrograde == Some(true))
            .map(|p| p.name.clone())
            .collect();

        let lunar_phase = lunar_phase(planets[0].abs_pos, planets[1].abs_pos);
        let dominant_element = dominant_element(&planets);
        let dominant_modality = dominant_modality(&planets);

        Ok(Subject {
            name: request.name.clone(),
            date_of_birth: request.date,
            time_of_birth: request.time,
            latitude,
            longitude,
            timezone,
            planets,
            ascendant,
            midheaven,
            houses,
            lunar_phase,
            dominant_element,
            dominant_modality,
            retrograde_planets,
        })
    }

    fn aspects(&self, subject: &Subject) -> Result<Vec<AspectRecord>, EngineError> {
        let mut points: Vec<&ChartPoint> = subject.planets.iter().collect();
        points.push(&subject.ascendant);
        points.push(&subject.midheaven);

        let mut records = Vec::new();
        for i in 0..points.len() {
            for j in (i + 1)..points.len() {
                let diff = signed_separation(points[i].abs_pos, points[j].abs_pos);
                let Some(aspect) = AspectType::matching(diff.abs()) else {
                    continue;
                };
                records.push(AspectRecord {
                    p1_name: points[i].name.clone(),
                    p2_name: points[j].name.clone(),
                    p1: i,
                    p2: j,
                    p1_abs_pos: points[i].abs_pos,
                    p2_abs_pos: points[j].abs_pos,
                    aspect,
                    orbit: (diff.abs() - aspect.degrees()).abs(),
                    diff,
                    aid: Uuid::new_v4(),
                });
            }
        }
        Ok(records)
    }

    fn render_chart(&self, subject: &Subject, output: &Path) -> Result<(), EngineError> {
        let svg = wheel_svg(subject);
        std::fs::write(output, svg)?;
        Ok(())
    }
}

/// Retrograde placeholder: luminaries never, nodes always, everything else
/// on a stable modular rule over the birth instant.
fn is_retrograde(name: &str, index: usize, days: f64) -> bool {
    match name {
        "Sun" | "Moon" => false,
        "North_Node" | "South_Node" => true,
        _ => (days.floor() as i64 + index as i64 * 37).rem_euclid(10) < 3,
    }
}

/// Signed shortest separation from `a` to `b`, in (-180, 180].
fn signed_separation(a: f64, b: f64) -> f64 {
    let diff = (b - a).rem_euclid(360.0);
    if diff > 180.0 {
        diff - 360.0
    } else {
        diff
    }
}

fn lunar_phase(sun_pos: f64, moon_pos: f64) -> LunarPhase {
    let degrees = (moon_pos - sun_pos).rem_euclid(360.0);
    let (name, emoji) = PHASES[(((degrees + 22.5) % 360.0) / 45.0) as usize % 8];
    LunarPhase {
        degrees_between_s_m: degrees,
        moon_phase: ((degrees / (360.0 / 28.0)) as u8 + 1).min(28),
        sun_phase: ((degrees / 45.0) as u8 + 1).min(8),
        moon_phase_name: name.to_string(),
        moon_emoji: emoji.to_string(),
    }
}

fn dominant_element(planets: &[ChartPoint]) -> Element {
    let mut best = Element::Fire;
    let mut best_count = 0;
    for element in Element::ALL {
        let count = planets.iter().filter(|p| p.element == element).count();
        if count > best_count {
            best = element;
            best_count = count;
        }
    }
    best
}

fn dominant_modality(planets: &[ChartPoint]) -> Quality {
    let mut best = Quality::Cardinal;
    let mut best_count = 0;
    for quality in Quality::ALL {
        let count = planets.iter().filter(|p| p.quality == quality).count();
        if count > best_count {
            best = quality;
            best_count = count;
        }
    }
    best
}

/// Minimal placeholder wheel: an outer ring, twelve sector lines, and one
/// label per body at its position.
fn wheel_svg(subject: &Subject) -> String {
    let mut svg = String::new();
    svg.push_str(concat!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"600\" height=\"600\" ",
        "viewBox=\"0 0 600 600\">\n"
    ));
    svg.push_str(&format!("  <title>{}</title>\n", escape_xml(&subject.name)));
    svg.push_str("  <circle cx=\"300\" cy=\"300\" r=\"280\" fill=\"none\" stroke=\"black\"/>\n");
    svg.push_str("  <circle cx=\"300\" cy=\"300\" r=\"200\" fill=\"none\" stroke=\"black\"/>\n");

    for i in 0..12 {
        let theta = (subject.houses[i].abs_pos).to_radians();
        let (x1, y1) = (300.0 + 200.0 * theta.cos(), 300.0 - 200.0 * theta.sin());
        let (x2, y2) = (300.0 + 280.0 * theta.cos(), 300.0 - 280.0 * theta.sin());
        svg.push_str(&format!(
            "  <line x1=\"{x1:.1}\" y1=\"{y1:.1}\" x2=\"{x2:.1}\" y2=\"{y2:.1}\" stroke=\"black\"/>\n"
        ));
    }

    for point in &subject.planets {
        let theta = point.abs_pos.to_radians();
        let (x, y) = (300.0 + 240.0 * theta.cos(), 300.0 - 240.0 * theta.sin());
        svg.push_str(&format!(
            "  <text x=\"{x:.1}\" y=\"{y:.1}\" text-anchor=\"middle\">{} {}</text>\n",
            point.emoji,
            escape_xml(&point.name)
        ));
    }

    svg.push_str(&format!(
        "  <text x=\"300\" y=\"300\" text-anchor=\"middle\">{}</text>\n",
        escape_xml(&subject.name)
    ));
    svg.push_str("</svg>\n");
    svg
}

fn escape_xml(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
