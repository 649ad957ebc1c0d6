//! Serialization and optimization properties over real engine output.

use chrono::{NaiveDate, NaiveTime};
use serde_json::Value;

use astrochart::chart::{optimizer, serializer};
use astrochart::engine::{AstroEngine, DeterministicEngine, LocationRequest, SubjectRequest};
use astrochart::models::{AspectRecord, Subject};

fn build(name: &str, date: (i32, u32, u32), time: (u32, u32)) -> (Subject, Vec<AspectRecord>) {
    let engine = DeterministicEngine::new();
    let subject = engine
        .build_subject(&SubjectRequest {
            name: name.to_string(),
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            time: NaiveTime::from_hms_opt(time.0, time.1, 0).unwrap(),
            location: LocationRequest::Coordinates {
                latitude: 48.8566,
                longitude: 2.3522,
                timezone: chrono_tz::Europe::Paris,
            },
        })
        .unwrap();
    let aspects = engine.aspects(&subject).unwrap();
    (subject, aspects)
}

/// Recursively assert a value contains only JSON-native nodes with finite
/// numbers.
fn assert_pure_json(value: &Value, path: &str) {
    match value {
        Value::Null | Value::Bool(_) | Value::String(_) => {}
        Value::Number(n) => {
            assert!(
                n.is_i64() || n.is_u64() || n.as_f64().is_some_and(f64::is_finite),
                "non-finite number at {path}"
            );
        }
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                assert_pure_json(item, &format!("{path}[{i}]"));
            }
        }
        Value::Object(fields) => {
            for (key, item) in fields {
                assert_pure_json(item, &format!("{path}.{key}"));
            }
        }
    }
}

#[test]
fn serialized_chart_is_pure_json() {
    let (subject, aspects) = build("Pure", (1984, 6, 16), (5, 30));
    let chart = serializer::serialize_chart(&subject, &aspects).unwrap();
    assert_pure_json(&chart, "chart");
}

#[test]
fn optimized_chart_is_pure_json() {
    let (subject, aspects) = build("Pure", (1984, 6, 16), (5, 30));
    let chart = serializer::serialize_chart(&subject, &aspects).unwrap();
    let optimized = optimizer::optimize(chart);
    assert_pure_json(&optimized, "optimized");
}

#[test]
fn optimization_preserves_category_names() {
    let (subject, aspects) = build("Stable", (2001, 9, 9), (21, 45));
    let chart = serializer::serialize_chart(&subject, &aspects).unwrap();
    let before: Vec<String> = chart.as_object().unwrap().keys().cloned().collect();
    let optimized = optimizer::optimize(chart);
    let after: Vec<String> = optimized.as_object().unwrap().keys().cloned().collect();
    assert_eq!(before, after);
}

#[test]
fn optimization_preserves_item_count_per_category() {
    let (subject, aspects) = build("Count", (1975, 12, 1), (0, 15));
    let chart = serializer::serialize_chart(&subject, &aspects).unwrap();
    let planets_before = chart["planets"].as_object().unwrap().len();
    let aspects_before = chart["aspects"].as_array().unwrap().len();

    let optimized = optimizer::optimize(chart);
    let planets = optimized["planets"].as_object().unwrap();
    // One extra entry for the shared key list.
    assert_eq!(planets.len(), planets_before + 1);
    assert_eq!(
        optimized["aspects"].as_array().unwrap().len(),
        aspects_before
    );
}

#[test]
fn keys_and_rows_agree_for_every_compacted_category() {
    let (subject, aspects) = build("Rows", (1999, 8, 11), (11, 3));
    let chart = serializer::serialize_chart(&subject, &aspects).unwrap();
    let optimized = optimizer::optimize(chart);

    for (category, value) in optimized.as_object().unwrap() {
        let Some(items) = value.as_object() else {
            continue;
        };
        let Some(keys) = items.get("keys").and_then(Value::as_array) else {
            continue;
        };
        for (name, row) in items.iter().filter(|(name, _)| *name != "keys") {
            assert_eq!(
                row.as_array().map(Vec::len),
                Some(keys.len()),
                "{category}.{name}"
            );
        }
    }
}

#[test]
fn retrograde_planet_names_survive_both_passes() {
    let (subject, aspects) = build("Retro", (1969, 7, 20), (20, 17));
    let expected = subject.retrograde_planets.clone();
    let chart = serializer::serialize_chart(&subject, &aspects).unwrap();
    let optimized = optimizer::optimize(chart);
    let listed: Vec<String> = optimized["retrograde_planets"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap().to_string())
        .collect();
    assert_eq!(listed, expected);
}
