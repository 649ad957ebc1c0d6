use chrono::{NaiveDate, NaiveTime};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// House cusp names, in chart order. Also used as the serialized item keys
/// for the `houses` category (lowercased).
pub const HOUSE_NAMES: [&str; 12] = [
    "First_House",
    "Second_House",
    "Third_House",
    "Fourth_House",
    "Fifth_House",
    "Sixth_House",
    "Seventh_House",
    "Eighth_House",
    "Ninth_House",
    "Tenth_House",
    "Eleventh_House",
    "Twelfth_House",
];

/// A zodiac sign. Serialized as its three-letter code ("Ari", "Tau", ...),
/// which is the form the structure optimizer expands back to a full name
/// for client output.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Sign {
    #[serde(rename = "Ari")]
    Aries,
    #[serde(rename = "Tau")]
    Taurus,
    #[serde(rename = "Gem")]
    Gemini,
    #[serde(rename = "Can")]
    Cancer,
    #[serde(rename = "Leo")]
    Leo,
    #[serde(rename = "Vir")]
    Virgo,
    #[serde(rename = "Lib")]
    Libra,
    #[serde(rename = "Sco")]
    Scorpio,
    #[serde(rename = "Sag")]
    Sagittarius,
    #[serde(rename = "Cap")]
    Capricorn,
    #[serde(rename = "Aqu")]
    Aquarius,
    #[serde(rename = "Pis")]
    Pisces,
}

impl Sign {
    pub const ALL: [Sign; 12] = [
        Self::Aries,
        Self::Taurus,
        Self::Gemini,
        Self::Cancer,
        Self::Leo,
        Self::Virgo,
        Self::Libra,
        Self::Scorpio,
        Self::Sagittarius,
        Self::Capricorn,
        Self::Aquarius,
        Self::Pisces,
    ];

    /// Sign containing the given absolute ecliptic position.
    pub fn from_abs_pos(abs_pos: f64) -> Self {
        let index = (abs_pos.rem_euclid(360.0) / 30.0) as usize;
        Self::ALL[index.min(11)]
    }

    pub fn from_abbreviation(s: &str) -> Option<Self> {
        match s {
            "Ari" => Some(Self::Aries),
            "Tau" => Some(Self::Taurus),
            "Gem" => Some(Self::Gemini),
            "Can" => Some(Self::Cancer),
            "Leo" => Some(Self::Leo),
            "Vir" => Some(Self::Virgo),
            "Lib" => Some(Self::Libra),
            "Sco" => Some(Self::Scorpio),
            "Sag" => Some(Self::Sagittarius),
            "Cap" => Some(Self::Capricorn),
            "Aqu" => Some(Self::Aquarius),
            "Pis" => Some(Self::Pisces),
            _ => None,
        }
    }

    pub fn abbreviation(&self) -> &'static str {
        match self {
            Self::Aries => "Ari",
            Self::Taurus => "Tau",
            Self::Gemini => "Gem",
            Self::Cancer => "Can",
            Self::Leo => "Leo",
            Self::Virgo => "Vir",
            Self::Libra => "Lib",
            Self::Scorpio => "Sco",
            Self::Sagittarius => "Sag",
            Self::Capricorn => "Cap",
            Self::Aquarius => "Aqu",
            Self::Pisces => "Pis",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Aries => "Aries",
            Self::Taurus => "Taurus",
            Self::Gemini => "Gemini",
            Self::Cancer => "Cancer",
            Self::Leo => "Leo",
            Self::Virgo => "Virgo",
            Self::Libra => "Libra",
            Self::Scorpio => "Scorpio",
            Self::Sagittarius => "Sagittarius",
            Self::Capricorn => "Capricorn",
            Self::Aquarius => "Aquarius",
            Self::Pisces => "Pisces",
        }
    }

    pub fn element(&self) -> Element {
        match self {
            Self::Aries | Self::Leo | Self::Sagittarius => Element::Fire,
            Self::Taurus | Self::Virgo | Self::Capricorn => Element::Earth,
            Self::Gemini | Self::Libra | Self::Aquarius => Element::Air,
            Self::Cancer | Self::Scorpio | Self::Pisces => Element::Water,
        }
    }

    pub fn quality(&self) -> Quality {
        match self {
            Self::Aries | Self::Cancer | Self::Libra | Self::Capricorn => Quality::Cardinal,
            Self::Taurus | Self::Leo | Self::Scorpio | Self::Aquarius => Quality::Fixed,
            Self::Gemini | Self::Virgo | Self::Sagittarius | Self::Pisces => Quality::Mutable,
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Self::Aries => "\u{2648}",
            Self::Taurus => "\u{2649}",
            Self::Gemini => "\u{264a}",
            Self::Cancer => "\u{264b}",
            Self::Leo => "\u{264c}",
            Self::Virgo => "\u{264d}",
            Self::Libra => "\u{264e}",
            Self::Scorpio => "\u{264f}",
            Self::Sagittarius => "\u{2650}",
            Self::Capricorn => "\u{2651}",
            Self::Aquarius => "\u{2652}",
            Self::Pisces => "\u{2653}",
        }
    }
}

/// Classical element of a sign.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Element {
    Fire,
    Earth,
    Air,
    Water,
}

impl Element {
    pub const ALL: [Element; 4] = [Self::Fire, Self::Earth, Self::Air, Self::Water];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fire => "fire",
            Self::Earth => "earth",
            Self::Air => "air",
            Self::Water => "water",
        }
    }
}

/// Modality (quality) of a sign.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Quality {
    Cardinal,
    Fixed,
    Mutable,
}

impl Quality {
    pub const ALL: [Quality; 3] = [Self::Cardinal, Self::Fixed, Self::Mutable];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cardinal => "cardinal",
            Self::Fixed => "fixed",
            Self::Mutable => "mutable",
        }
    }
}

/// What kind of chart point a [`ChartPoint`] describes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PointType {
    Planet,
    House,
    AxialCusp,
}

/// One point of a chart: a celestial body, an axis, or a house cusp.
///
/// Serialized field names are the wire contract consumed by the structure
/// optimizer; `emoji`, `sign_num`, `house` and `point_type` are presentation
/// or internal fields and are stripped from optimized output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartPoint {
    pub name: String,
    pub quality: Quality,
    pub element: Element,
    pub sign: Sign,
    pub sign_num: u8,
    /// Degrees within the sign, [0, 30).
    pub position: f64,
    /// Absolute ecliptic longitude, [0, 360).
    pub abs_pos: f64,
    pub emoji: String,
    pub point_type: PointType,
    /// House placement, for celestial bodies only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub house: Option<String>,
    /// Retrograde flag, for celestial bodies only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retrograde: Option<bool>,
}

impl ChartPoint {
    /// Build a point from its absolute position, deriving sign, sign index,
    /// in-sign position, element, quality and glyph.
    pub fn from_abs_pos(name: impl Into<String>, abs_pos: f64, point_type: PointType) -> Self {
        let abs_pos = abs_pos.rem_euclid(360.0);
        let sign = Sign::from_abs_pos(abs_pos);
        Self {
            name: name.into(),
            quality: sign.quality(),
            element: sign.element(),
            sign,
            sign_num: ((abs_pos / 30.0) as u8).min(11),
            position: abs_pos % 30.0,
            abs_pos,
            emoji: sign.emoji().to_string(),
            point_type,
            house: None,
            retrograde: None,
        }
    }
}

/// Lunar phase of a chart, as reported by the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LunarPhase {
    /// Angular separation between sun and moon, [0, 360).
    pub degrees_between_s_m: f64,
    /// Lunation index, 1..=28.
    pub moon_phase: u8,
    /// Coarse phase index, 1..=8.
    pub sun_phase: u8,
    pub moon_phase_name: String,
    pub moon_emoji: String,
}

/// A fully computed birth chart.
///
/// Owned transiently per request: the engine builds it, the serializer walks
/// it, and it is dropped with the response.
#[derive(Debug, Clone)]
pub struct Subject {
    pub name: String,
    pub date_of_birth: NaiveDate,
    pub time_of_birth: NaiveTime,
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: Tz,
    /// Tracked celestial bodies, in engine order: the ten classical planets,
    /// then lunar nodes, Chiron and Lilith.
    pub planets: Vec<ChartPoint>,
    pub ascendant: ChartPoint,
    pub midheaven: ChartPoint,
    /// Twelve house cusps, in house order.
    pub houses: Vec<ChartPoint>,
    pub lunar_phase: LunarPhase,
    pub dominant_element: Element,
    pub dominant_modality: Quality,
    /// Names of bodies flagged retrograde, in engine order.
    pub retrograde_planets: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_from_abs_pos_covers_all_twelve() {
        for (i, sign) in Sign::ALL.iter().enumerate() {
            assert_eq!(Sign::from_abs_pos(i as f64 * 30.0 + 15.0), *sign);
        }
    }

    #[test]
    fn sign_abbreviations_round_trip() {
        for sign in Sign::ALL {
            assert_eq!(Sign::from_abbreviation(sign.abbreviation()), Some(sign));
        }
    }

    #[test]
    fn sign_serializes_as_abbreviation() {
        let json = serde_json::to_value(Sign::Aries).unwrap();
        assert_eq!(json, serde_json::json!("Ari"));
    }

    #[test]
    fn chart_point_derives_sign_fields() {
        let point = ChartPoint::from_abs_pos("Sun", 95.5, PointType::Planet);
        assert_eq!(point.sign, Sign::Cancer);
        assert_eq!(point.sign_num, 3);
        assert_eq!(point.element, Element::Water);
        assert_eq!(point.quality, Quality::Cardinal);
        assert!((point.position - 5.5).abs() < 1e-9);
    }

    #[test]
    fn chart_point_normalizes_out_of_range_positions() {
        let point = ChartPoint::from_abs_pos("Moon", 725.0, PointType::Planet);
        assert!((point.abs_pos - 5.0).abs() < 1e-9);
        assert_eq!(point.sign, Sign::Aries);
    }
}
