use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde_json::{json, Value};

use crate::chart::{optimizer, serializer};
use crate::engine::EngineError;
use crate::models::{BirthData, Subject, ValidationError};

use super::SharedEngine;

// ============================================================
// Error Handling
// ============================================================

/// Map a payload-validation failure to a client error. The message names the
/// offending field, so it is safe to return verbatim.
fn validation_error(e: ValidationError) -> (StatusCode, String) {
    tracing::warn!("Rejected birth data: {}", e);
    (StatusCode::BAD_REQUEST, e.to_string())
}

/// Map an engine failure onto the error taxonomy: resolution failures are
/// the caller's problem, render and I/O failures are ours. Internal detail
/// is logged and replaced with a generic message.
fn engine_error(e: EngineError) -> (StatusCode, String) {
    match e {
        EngineError::UnresolvablePlace(_)
        | EngineError::InvalidTimezone(_)
        | EngineError::InvalidInstant { .. } => {
            tracing::warn!("Chart request rejected: {}", e);
            (StatusCode::BAD_REQUEST, e.to_string())
        }
        EngineError::Render(_) | EngineError::Io(_) => {
            tracing::error!("Engine failure: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            )
        }
    }
}

/// Log an internal error and return a sanitized response to the client.
fn internal_error(e: impl std::fmt::Display) -> (StatusCode, String) {
    tracing::error!("Internal error: {}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal server error".to_string(),
    )
}

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

// ============================================================
// Chart Data
// ============================================================

/// Build a chart from the posted birth data and return the optimized JSON
/// shape under `astrology_data`.
pub async fn generate_chart(
    State(engine): State<SharedEngine>,
    Json(birth_data): Json<BirthData>,
) -> Result<Json<Value>, (StatusCode, String)> {
    let request = birth_data.validate().map_err(validation_error)?;
    tracing::info!(name = %request.name, "Generating chart data");

    let subject = engine.build_subject(&request).map_err(engine_error)?;
    let aspects = engine.aspects(&subject).map_err(engine_error)?;

    let chart = serializer::serialize_chart(&subject, &aspects).map_err(internal_error)?;
    let optimized = optimizer::optimize(chart);

    Ok(Json(json!({ "astrology_data": optimized })))
}

// ============================================================
// Chart Export (SVG)
// ============================================================

/// Render the chart wheel and return the markup. The renderer writes into a
/// per-request temporary directory, which is dropped with the response, so
/// concurrent requests for the same subject name cannot collide.
pub async fn generate_chart_svg(
    State(engine): State<SharedEngine>,
    Json(birth_data): Json<BirthData>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let request = birth_data.validate().map_err(validation_error)?;
    tracing::info!(name = %request.name, "Rendering chart SVG");

    let subject = engine.build_subject(&request).map_err(engine_error)?;

    let dir = tempfile::tempdir().map_err(internal_error)?;
    let path = dir.path().join(chart_file_name(&subject));
    engine.render_chart(&subject, &path).map_err(engine_error)?;

    let markup = tokio::fs::read_to_string(&path)
        .await
        .map_err(|e| internal_error(format!("chart output missing at {}: {}", path.display(), e)))?;
    if markup.trim().is_empty() {
        return Err(internal_error("chart renderer produced an empty file"));
    }

    Ok(([(header::CONTENT_TYPE, "image/svg+xml")], markup))
}

/// File name for the rendered wheel, derived from the subject's display name
/// and the chart type.
fn chart_file_name(subject: &Subject) -> String {
    let stem: String = subject
        .name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect();
    format!("{}-natal.svg", stem)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{AstroEngine, DeterministicEngine, LocationRequest, SubjectRequest};
    use chrono::{NaiveDate, NaiveTime};

    #[test]
    fn chart_file_name_keeps_only_ascii_alphanumerics() {
        let subject = DeterministicEngine::new()
            .build_subject(&SubjectRequest {
                name: "J. Doe & Co".to_string(),
                date: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
                time: NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
                location: LocationRequest::Coordinates {
                    latitude: 0.0,
                    longitude: 0.0,
                    timezone: chrono_tz::UTC,
                },
            })
            .unwrap();
        let name = chart_file_name(&subject);
        assert_eq!(name, "J--Doe---Co-natal.svg");
    }

    #[test]
    fn resolution_failures_map_to_bad_request() {
        let (status, _) = engine_error(EngineError::UnresolvablePlace("Atlantis".into()));
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn render_failures_map_to_internal_error_with_sanitized_message() {
        let (status, message) = engine_error(EngineError::Render("renderer exploded".into()));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(message, "Internal server error");
    }
}
