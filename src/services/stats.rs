use serde::Serialize;
use std::collections::HashSet;

use crate::models::{Internship, InternshipType};

/// Headline numbers shown on the dashboard
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_internships: usize,
    pub unique_cities: usize,
    pub paid_opportunities: usize,
    /// Mean duration rounded up, e.g. "3 months"
    pub avg_duration: String,
}

/// Distinct values available to the search filters, in first-seen order
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct Facets {
    pub locations: Vec<String>,
    pub sectors: Vec<String>,
}

pub fn dashboard_stats(records: &[Internship]) -> DashboardStats {
    let unique_cities = records
        .iter()
        .map(|r| r.location.as_str())
        .collect::<HashSet<_>>()
        .len();

    let paid_opportunities = records
        .iter()
        .filter(|r| r.internship_type == InternshipType::Paid)
        .count();

    let durations: Vec<u64> = records
        .iter()
        .filter_map(|r| first_number(&r.duration))
        .collect();

    let avg_months = if durations.is_empty() {
        0
    } else {
        let total: f64 = durations.iter().map(|&d| d as f64).sum();
        (total / durations.len() as f64).ceil() as u64
    };

    DashboardStats {
        total_internships: records.len(),
        unique_cities,
        paid_opportunities,
        avg_duration: format!("{} months", avg_months),
    }
}

pub fn facets(records: &[Internship]) -> Facets {
    Facets {
        locations: distinct(records.iter().map(|r| r.location.as_str())),
        sectors: distinct(records.iter().map(|r| r.sector.as_str())),
    }
}

/// Leading run of digits, so a range like "2-3 months" reads as 2
fn first_number(text: &str) -> Option<u64> {
    let digits: String = text
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(char::is_ascii_digit)
        .collect();
    if digits.is_empty() {
        return None;
    }
    Some(
        digits
            .bytes()
            .fold(0u64, |n, b| n.saturating_mul(10).saturating_add(u64::from(b - b'0'))),
    )
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .filter(|v| !v.is_empty() && seen.insert(*v))
        .map(str::to_string)
        .collect()
}
