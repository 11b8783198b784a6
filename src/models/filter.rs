use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::InternshipType;

/// Live search state driving the filter/sort pipeline
///
/// An empty `locations` or `sectors` set means "no restriction".
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FilterCriteria {
    pub query: String,
    pub locations: BTreeSet<String>,
    pub sectors: BTreeSet<String>,
    #[serde(rename = "type")]
    pub internship_type: TypeFilter,
    pub sort: SortKey,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TypeFilter {
    #[default]
    All,
    Paid,
    Unpaid,
}

impl TypeFilter {
    pub fn matches(self, internship_type: InternshipType) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::Paid => internship_type == InternshipType::Paid,
            TypeFilter::Unpaid => internship_type == InternshipType::Unpaid,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Keep the caller's order, which is already most-recent first
    #[default]
    Recent,
    Stipend,
    Duration,
}

impl FilterCriteria {
    /// Adds or removes a location from the selection
    pub fn toggle_location(&mut self, location: &str, selected: bool) {
        toggle(&mut self.locations, location, selected);
    }

    /// Adds or removes a sector from the selection
    pub fn toggle_sector(&mut self, sector: &str, selected: bool) {
        toggle(&mut self.sectors, sector, selected);
    }

    /// Resets every filter but keeps the sort key
    pub fn clear_filters(&mut self) {
        *self = Self {
            sort: self.sort,
            ..Self::default()
        };
    }
}

fn toggle(set: &mut BTreeSet<String>, value: &str, selected: bool) {
    if selected {
        set.insert(value.to_string());
    } else {
        set.remove(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_filter_all_matches_everything() {
        assert!(TypeFilter::All.matches(InternshipType::Paid));
        assert!(TypeFilter::All.matches(InternshipType::Unpaid));
        assert!(!TypeFilter::Paid.matches(InternshipType::Unpaid));
        assert!(TypeFilter::Unpaid.matches(InternshipType::Unpaid));
    }

    #[test]
    fn test_criteria_deserializes_partial_body() {
        let criteria: FilterCriteria =
            serde_json::from_str(r#"{"query":"react","type":"paid"}"#).unwrap();
        assert_eq!(criteria.query, "react");
        assert_eq!(criteria.internship_type, TypeFilter::Paid);
        assert!(criteria.locations.is_empty());
        assert_eq!(criteria.sort, SortKey::Recent);
    }

    #[test]
    fn test_toggle_location() {
        let mut criteria = FilterCriteria::default();
        criteria.toggle_location("Pune", true);
        criteria.toggle_location("Pune", true);
        assert_eq!(criteria.locations.len(), 1);

        criteria.toggle_location("Pune", false);
        criteria.toggle_location("Delhi", false);
        assert!(criteria.locations.is_empty());
    }

    #[test]
    fn test_clear_filters_keeps_sort() {
        let mut criteria = FilterCriteria {
            query: "remote".to_string(),
            sort: SortKey::Stipend,
            internship_type: TypeFilter::Paid,
            ..Default::default()
        };
        criteria.toggle_sector("Finance", true);

        criteria.clear_filters();

        assert_eq!(
            criteria,
            FilterCriteria {
                sort: SortKey::Stipend,
                ..Default::default()
            }
        );
    }
}
