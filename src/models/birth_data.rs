use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime};
use chrono_tz::Tz;
use serde::Deserialize;
use thiserror::Error;

use crate::engine::{LocationRequest, SubjectRequest};

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M";

/// Inbound birth-data payload.
///
/// Location is given either as an explicit latitude/longitude/timezone triple
/// or as a place name the engine resolves itself. A complete triple takes
/// precedence over a place name.
#[derive(Debug, Clone, Deserialize)]
pub struct BirthData {
    pub name: String,
    /// Calendar date, `YYYY-MM-DD`.
    pub date_of_birth: String,
    /// 24-hour clock time, `HH:MM`.
    pub time_of_birth: String,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    /// IANA timezone identifier, e.g. `Europe/London`.
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub place_of_birth: Option<String>,
}

/// Why a payload failed validation. Messages are returned to the client
/// verbatim, so they name the offending field and the expected form.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("name must not be empty")]
    EmptyName,
    #[error("invalid date_of_birth {value:?}: expected YYYY-MM-DD")]
    Date { value: String },
    #[error("invalid time_of_birth {value:?}: expected HH:MM")]
    Time { value: String },
    #[error("latitude {0} is out of range [-90, 90]")]
    Latitude(f64),
    #[error("longitude {0} is out of range [-180, 180]")]
    Longitude(f64),
    #[error("unresolvable timezone identifier {0:?}")]
    Timezone(String),
    #[error("either place_of_birth or all of latitude, longitude and timezone are required")]
    MissingLocation,
}

impl BirthData {
    /// Validate the payload and map it onto the engine's subject request.
    ///
    /// Malformed input never reaches the engine; every failure carries a
    /// client-facing message.
    pub fn validate(&self) -> Result<SubjectRequest, ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }

        let date = NaiveDate::parse_from_str(&self.date_of_birth, DATE_FORMAT).map_err(|_| {
            ValidationError::Date {
                value: self.date_of_birth.clone(),
            }
        })?;
        let time = NaiveTime::parse_from_str(&self.time_of_birth, TIME_FORMAT).map_err(|_| {
            ValidationError::Time {
                value: self.time_of_birth.clone(),
            }
        })?;

        let location = self.location()?;

        Ok(SubjectRequest {
            name: name.to_string(),
            date,
            time,
            location,
        })
    }

    fn location(&self) -> Result<LocationRequest, ValidationError> {
        if let (Some(latitude), Some(longitude), Some(timezone)) =
            (self.latitude, self.longitude, self.timezone.as_deref())
        {
            if !(-90.0..=90.0).contains(&latitude) {
                return Err(ValidationError::Latitude(latitude));
            }
            if !(-180.0..=180.0).contains(&longitude) {
                return Err(ValidationError::Longitude(longitude));
            }
            let timezone = Tz::from_str(timezone)
                .map_err(|_| ValidationError::Timezone(timezone.to_string()))?;
            return Ok(LocationRequest::Coordinates {
                latitude,
                longitude,
                timezone,
            });
        }

        match self.place_of_birth.as_deref().map(str::trim) {
            Some(place) if !place.is_empty() => Ok(LocationRequest::Place(place.to_string())),
            _ => Err(ValidationError::MissingLocation),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> BirthData {
        BirthData {
            name: "Test".to_string(),
            date_of_birth: "1990-01-01".to_string(),
            time_of_birth: "12:00".to_string(),
            latitude: Some(0.0),
            longitude: Some(0.0),
            timezone: Some("UTC".to_string()),
            place_of_birth: None,
        }
    }

    #[test]
    fn accepts_explicit_coordinates() {
        let request = payload().validate().unwrap();
        assert_eq!(request.name, "Test");
        assert!(matches!(
            request.location,
            LocationRequest::Coordinates { .. }
        ));
    }

    #[test]
    fn accepts_place_name_when_triple_is_absent() {
        let data = BirthData {
            latitude: None,
            longitude: None,
            timezone: None,
            place_of_birth: Some("London".to_string()),
            ..payload()
        };
        let request = data.validate().unwrap();
        assert!(matches!(request.location, LocationRequest::Place(p) if p == "London"));
    }

    #[test]
    fn rejects_slash_separated_date() {
        let data = BirthData {
            date_of_birth: "1990/01/01".to_string(),
            ..payload()
        };
        assert!(matches!(
            data.validate(),
            Err(ValidationError::Date { .. })
        ));
    }

    #[test]
    fn rejects_time_with_seconds() {
        let data = BirthData {
            time_of_birth: "12:00:30".to_string(),
            ..payload()
        };
        assert!(matches!(data.validate(), Err(ValidationError::Time { .. })));
    }

    #[test]
    fn rejects_out_of_range_clock_values() {
        let data = BirthData {
            time_of_birth: "25:00".to_string(),
            ..payload()
        };
        assert!(matches!(data.validate(), Err(ValidationError::Time { .. })));
    }

    #[test]
    fn rejects_impossible_calendar_date() {
        let data = BirthData {
            date_of_birth: "1990-02-30".to_string(),
            ..payload()
        };
        assert!(matches!(data.validate(), Err(ValidationError::Date { .. })));
    }

    #[test]
    fn rejects_out_of_range_latitude() {
        let data = BirthData {
            latitude: Some(91.0),
            ..payload()
        };
        assert_eq!(data.validate(), Err(ValidationError::Latitude(91.0)));
    }

    #[test]
    fn rejects_unknown_timezone() {
        let data = BirthData {
            timezone: Some("Mars/Olympus_Mons".to_string()),
            ..payload()
        };
        assert!(matches!(data.validate(), Err(ValidationError::Timezone(_))));
    }

    #[test]
    fn rejects_partial_coordinate_triple_without_place() {
        let data = BirthData {
            timezone: None,
            ..payload()
        };
        assert_eq!(data.validate(), Err(ValidationError::MissingLocation));
    }

    #[test]
    fn rejects_blank_name() {
        let data = BirthData {
            name: "  ".to_string(),
            ..payload()
        };
        assert_eq!(data.validate(), Err(ValidationError::EmptyName));
    }
}
