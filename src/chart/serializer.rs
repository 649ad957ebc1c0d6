//! Subject graph → category-keyed JSON.
//!
//! Conversion rules, in precedence order: known record types (aspects, lunar
//! phase) are written through explicit fixed field lists; the remaining typed
//! models go through their `Serialize` impls; primitives pass through; the
//! only value outside those types (the timezone) is rendered as text. The
//! explicit lists come first so a field added to a record type never reaches
//! the wire without being listed here.

use serde_json::{json, Map, Value};

use crate::models::{AspectRecord, ChartPoint, LunarPhase, Subject};

/// Serialize a computed subject and its aspect records into the category map
/// consumed by the structure optimizer.
pub fn serialize_chart(
    subject: &Subject,
    aspects: &[AspectRecord],
) -> serde_json::Result<Value> {
    let mut chart = Map::new();

    chart.insert("name".into(), json!(subject.name));
    chart.insert(
        "date_of_birth".into(),
        json!(subject.date_of_birth.format("%Y-%m-%d").to_string()),
    );
    chart.insert(
        "time_of_birth".into(),
        json!(subject.time_of_birth.format("%H:%M").to_string()),
    );
    chart.insert("latitude".into(), json!(subject.latitude));
    chart.insert("longitude".into(), json!(subject.longitude));
    chart.insert("timezone".into(), json!(subject.timezone.name()));

    chart.insert("planets".into(), point_map(&subject.planets)?);

    let mut angles = Map::new();
    angles.insert("ascendant".into(), serde_json::to_value(&subject.ascendant)?);
    angles.insert("midheaven".into(), serde_json::to_value(&subject.midheaven)?);
    chart.insert("angles".into(), Value::Object(angles));

    chart.insert("houses".into(), point_map(&subject.houses)?);

    chart.insert(
        "aspects".into(),
        Value::Array(aspects.iter().map(aspect_value).collect()),
    );
    chart.insert("lunar_phase".into(), lunar_phase_value(&subject.lunar_phase));

    chart.insert(
        "dominant_element".into(),
        json!(subject.dominant_element.as_str()),
    );
    chart.insert(
        "dominant_modality".into(),
        json!(subject.dominant_modality.as_str()),
    );
    chart.insert(
        "retrograde_planets".into(),
        json!(subject.retrograde_planets),
    );

    Ok(Value::Object(chart))
}

/// Points keyed by their lowercased name, serialized through `Serialize`.
fn point_map(points: &[ChartPoint]) -> serde_json::Result<Value> {
    let mut map = Map::new();
    for point in points {
        map.insert(point.name.to_lowercase(), serde_json::to_value(point)?);
    }
    Ok(Value::Object(map))
}

/// Fixed field list for aspect records.
fn aspect_value(record: &AspectRecord) -> Value {
    json!({
        "p1_name": record.p1_name,
        "p1_abs_pos": record.p1_abs_pos,
        "p2_name": record.p2_name,
        "p2_abs_pos": record.p2_abs_pos,
        "aspect": record.aspect.as_str(),
        "orbit": record.orbit,
        "aspect_degrees": record.aspect.degrees(),
        "diff": record.diff,
        "p1": record.p1,
        "p2": record.p2,
        "aid": record.aid,
    })
}

/// Fixed field list for the lunar phase record.
fn lunar_phase_value(phase: &LunarPhase) -> Value {
    json!({
        "degrees_between_s_m": phase.degrees_between_s_m,
        "moon_phase": phase.moon_phase,
        "sun_phase": phase.sun_phase,
        "moon_phase_name": phase.moon_phase_name,
        "moon_emoji": phase.moon_emoji,
    })
}
