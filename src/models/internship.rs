use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Internship record exactly as the recommendation API sends it
///
/// Every field is kept as a raw JSON value: the service is loose about shapes
/// (integer ids, `tags` as a comma-joined string or an array, NaN-ish
/// coordinates), and a single odd record must not fail the whole response.
/// `services::normalizer` turns these into [`Internship`]s.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawInternship {
    #[serde(default)]
    pub id: Value,
    #[serde(default)]
    pub title: Value,
    #[serde(default)]
    pub company: Value,
    #[serde(default)]
    pub location: Value,
    #[serde(default)]
    pub sector: Value,
    #[serde(default)]
    pub duration: Value,
    #[serde(default)]
    pub stipend: Value,
    #[serde(default)]
    pub description: Value,
    #[serde(default, alias = "postedDate")]
    pub posted_date: Value,
    #[serde(default)]
    pub remote: Value,
    #[serde(default, rename = "type")]
    pub internship_type: Value,
    #[serde(default)]
    pub tags: Value,
    #[serde(default)]
    pub lat: Value,
    #[serde(default)]
    pub lng: Value,
    #[serde(default)]
    pub score: Value,
    #[serde(default, alias = "missingSkills")]
    pub missing_skills_with_resources: Value,
}

/// Canonical internship record, post-normalization
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Internship {
    pub id: String,
    pub title: String,
    pub company: String,
    pub location: String,
    pub sector: String,
    pub duration: String,
    pub stipend: String,
    pub description: String,
    pub posted_date: String,
    pub remote: bool,
    #[serde(rename = "type")]
    pub internship_type: InternshipType,
    /// Always trimmed, non-empty entries in source order
    pub tags: Vec<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    /// Server-computed match percentage; absent when no profile ranking ran
    pub score: Option<f64>,
    pub missing_skills: Vec<MissingSkill>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum InternshipType {
    Paid,
    Unpaid,
}

/// A skill the profile lacks for a listing, with where to learn it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct MissingSkill {
    #[serde(default)]
    pub skill: String,
    #[serde(default)]
    pub resources: LearningResources,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct LearningResources {
    #[serde(default)]
    pub websites: Vec<String>,
    #[serde(default)]
    pub youtube: String,
}

impl Internship {
    /// Coordinates usable for spatial aggregation, if any
    ///
    /// Missing, non-finite and out-of-range values are rejected, and so is a
    /// zero on either axis: the dataset uses 0 as "unknown".
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        let (lat, lng) = (self.lat?, self.lng?);
        let valid = lat.is_finite()
            && lng.is_finite()
            && lat != 0.0
            && lng != 0.0
            && (-90.0..=90.0).contains(&lat)
            && (-180.0..=180.0).contains(&lng);
        valid.then_some((lat, lng))
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// Builds a paid internship with just enough fields set for filter tests
    pub fn internship(id: &str) -> Internship {
        Internship {
            id: id.to_string(),
            title: format!("Internship {}", id),
            company: "Acme".to_string(),
            location: "Bengaluru".to_string(),
            sector: "Technology".to_string(),
            duration: "3 months".to_string(),
            stipend: "₹10,000".to_string(),
            description: String::new(),
            posted_date: String::new(),
            remote: false,
            internship_type: InternshipType::Paid,
            tags: vec![],
            lat: None,
            lng: None,
            score: None,
            missing_skills: vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::internship;
    use super::*;
    use serde_json::json;

    #[test]
    fn test_raw_internship_accepts_loose_shapes() {
        let raw: RawInternship = serde_json::from_value(json!({
            "id": 17,
            "title": "Data Analyst Intern",
            "tags": "python, sql",
            "lat": null
        }))
        .unwrap();

        assert_eq!(raw.id, json!(17));
        assert_eq!(raw.tags, json!("python, sql"));
        assert_eq!(raw.company, Value::Null);
    }

    #[test]
    fn test_raw_internship_reads_both_missing_skill_keys() {
        let snake: RawInternship =
            serde_json::from_value(json!({ "missing_skills_with_resources": [] })).unwrap();
        let camel: RawInternship =
            serde_json::from_value(json!({ "missingSkills": [] })).unwrap();

        assert_eq!(snake.missing_skills_with_resources, json!([]));
        assert_eq!(camel.missing_skills_with_resources, json!([]));
    }

    #[test]
    fn test_internship_serializes_type_field() {
        let value = serde_json::to_value(internship("1")).unwrap();
        assert_eq!(value["type"], "paid");
        assert_eq!(value["missingSkills"], json!([]));
        assert_eq!(value["postedDate"], "");
    }

    #[test]
    fn test_coordinates_valid() {
        let mut record = internship("1");
        record.lat = Some(12.97);
        record.lng = Some(77.59);
        assert_eq!(record.coordinates(), Some((12.97, 77.59)));
    }

    #[test]
    fn test_coordinates_rejects_missing_zero_and_out_of_range() {
        let mut record = internship("1");
        assert_eq!(record.coordinates(), None);

        record.lat = Some(0.0);
        record.lng = Some(77.59);
        assert_eq!(record.coordinates(), None);

        record.lat = Some(120.0);
        assert_eq!(record.coordinates(), None);

        record.lat = Some(f64::NAN);
        assert_eq!(record.coordinates(), None);
    }
}
