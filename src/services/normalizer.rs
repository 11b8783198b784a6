//! Converts raw recommendation payloads into canonical [`Internship`] records.
//!
//! Normalization never fails: a malformed field falls back to a safe default
//! (empty tags, absent coordinates, empty text) so one bad record cannot take
//! the rest of the batch down with it.

use serde_json::Value;

use crate::models::{Internship, InternshipType, MissingSkill, RawInternship};

/// Normalizes a whole response, dropping only records that carry no id
pub fn normalize_all(raw: Vec<RawInternship>) -> Vec<Internship> {
    let total = raw.len();

    let records: Vec<Internship> = raw
        .into_iter()
        .map(normalize)
        .filter(|record| {
            if record.id.is_empty() {
                tracing::warn!(title = %record.title, "Dropping internship record without id");
                false
            } else {
                true
            }
        })
        .collect();

    tracing::debug!(received = total, kept = records.len(), "Normalized internship batch");

    records
}

/// Normalizes a single record
pub fn normalize(raw: RawInternship) -> Internship {
    let stipend = text(&raw.stipend);
    let internship_type = internship_type(&raw.internship_type, &stipend);

    Internship {
        id: id(&raw.id),
        title: text(&raw.title),
        company: text(&raw.company),
        location: text(&raw.location),
        sector: text(&raw.sector),
        duration: text(&raw.duration),
        stipend,
        description: text(&raw.description),
        posted_date: text(&raw.posted_date),
        remote: flag(&raw.remote),
        internship_type,
        tags: normalize_tags(&raw.tags),
        lat: number(&raw.lat),
        lng: number(&raw.lng),
        score: number(&raw.score),
        missing_skills: missing_skills(&raw.missing_skills_with_resources),
    }
}

/// Canonical tag list from either a comma-delimited string or a string array
///
/// Splits on commas only, trims each entry and drops empty ones. Order is
/// kept and duplicates are not removed. Any other shape yields no tags.
pub fn normalize_tags(tags: &Value) -> Vec<String> {
    match tags {
        Value::String(joined) => clean(joined.split(',')),
        Value::Array(items) => clean(items.iter().filter_map(Value::as_str)),
        _ => Vec::new(),
    }
}

fn clean<'a>(parts: impl Iterator<Item = &'a str>) -> Vec<String> {
    parts
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

fn id(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n
            .as_i64()
            .map(|i| i.to_string())
            .unwrap_or_else(|| n.to_string()),
        _ => String::new(),
    }
}

fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

fn number(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|n| n.is_finite())
}

fn flag(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_i64() == Some(1),
        Value::String(s) => matches!(s.trim().to_lowercase().as_str(), "true" | "yes" | "1"),
        _ => false,
    }
}

/// Explicit `type` wins; otherwise a stipend mentioning "unpaid" marks the listing unpaid
fn internship_type(value: &Value, stipend: &str) -> InternshipType {
    match value.as_str().map(|s| s.trim().to_lowercase()).as_deref() {
        Some("paid") => InternshipType::Paid,
        Some("unpaid") => InternshipType::Unpaid,
        _ if stipend.to_lowercase().contains("unpaid") => InternshipType::Unpaid,
        _ => InternshipType::Paid,
    }
}

fn missing_skills(value: &Value) -> Vec<MissingSkill> {
    let Value::Array(items) = value else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| serde_json::from_value::<MissingSkill>(item.clone()).ok())
        .filter(|entry| !entry.skill.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: Value) -> RawInternship {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_string_and_array_tags_normalize_identically() {
        let from_string = normalize_tags(&json!("a, b ,c"));
        let from_array = normalize_tags(&json!(["a", "b", "c"]));

        assert_eq!(from_string, vec!["a", "b", "c"]);
        assert_eq!(from_string, from_array);
    }

    #[test]
    fn test_tags_drop_empty_segments_and_keep_duplicates() {
        let tags = normalize_tags(&json!(" React,, ,Node , React,"));
        assert_eq!(tags, vec!["React", "Node", "React"]);
    }

    #[test]
    fn test_array_tags_are_trimmed_and_non_strings_dropped() {
        let tags = normalize_tags(&json!([" SQL ", "", 7, null, "Excel"]));
        assert_eq!(tags, vec!["SQL", "Excel"]);
    }

    #[test]
    fn test_malformed_tags_become_empty() {
        assert!(normalize_tags(&json!({"python": true})).is_empty());
        assert!(normalize_tags(&json!(42)).is_empty());
        assert!(normalize_tags(&Value::Null).is_empty());
    }

    #[test]
    fn test_normalize_full_record() {
        let record = normalize(raw(json!({
            "id": 3,
            "title": "Web Development Intern",
            "company": "Kite Labs",
            "location": "Pune",
            "sector": "Technology",
            "duration": "2 Months",
            "stipend": "₹8,000 /month",
            "type": "paid",
            "tags": "html, css, javascript",
            "lat": 18.52,
            "lng": "73.85",
            "score": 87.5,
            "missing_skills_with_resources": [
                {
                    "skill": "CSS",
                    "resources": {
                        "websites": ["https://web.dev/learn/css"],
                        "youtube": "https://www.youtube.com/watch?v=OXGznpKZ_sA"
                    }
                }
            ]
        })));

        assert_eq!(record.id, "3");
        assert_eq!(record.company, "Kite Labs");
        assert_eq!(record.stipend, "₹8,000 /month");
        assert_eq!(record.internship_type, InternshipType::Paid);
        assert_eq!(record.tags, vec!["html", "css", "javascript"]);
        assert_eq!(record.lat, Some(18.52));
        assert_eq!(record.lng, Some(73.85));
        assert_eq!(record.score, Some(87.5));
        assert_eq!(record.missing_skills.len(), 1);
        assert_eq!(record.missing_skills[0].resources.websites.len(), 1);
    }

    #[test]
    fn test_missing_type_is_derived_from_stipend() {
        let unpaid = normalize(raw(json!({ "id": "1", "stipend": "Unpaid" })));
        let paid = normalize(raw(json!({ "id": "2", "stipend": "₹5,000" })));

        assert_eq!(unpaid.internship_type, InternshipType::Unpaid);
        assert_eq!(paid.internship_type, InternshipType::Paid);
    }

    #[test]
    fn test_bad_numeric_fields_become_absent() {
        let record = normalize(raw(json!({
            "id": "9",
            "lat": "north",
            "lng": null,
            "score": "n/a"
        })));

        assert_eq!(record.lat, None);
        assert_eq!(record.lng, None);
        assert_eq!(record.score, None);
    }

    #[test]
    fn test_malformed_missing_skills_entries_are_skipped() {
        let record = normalize(raw(json!({
            "id": "4",
            "missing_skills_with_resources": [
                "SQL",
                { "skill": "Java", "resources": { "websites": [], "youtube": "" } },
                { "skill": 12 }
            ]
        })));

        assert_eq!(record.missing_skills.len(), 1);
        assert_eq!(record.missing_skills[0].skill, "Java");
    }

    #[test]
    fn test_normalize_all_keeps_batch_when_one_record_is_bad() {
        let batch = vec![
            raw(json!({ "id": 1, "tags": ["a"] })),
            raw(json!({ "title": "no id here", "tags": 5 })),
            raw(json!({ "id": 2, "tags": { "bad": "shape" } })),
        ];

        let records = normalize_all(batch);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "1");
        assert_eq!(records[1].id, "2");
        assert!(records[1].tags.is_empty());
    }
}
