use std::cmp::Reverse;
use std::collections::HashSet;

use crate::models::{FilterCriteria, Internship, InternshipType, SortKey};

/// Sort value for listings whose duration carries no digits
pub const UNKNOWN_DURATION: u64 = u64::MAX;

/// Filters, de-duplicates and sorts canonical records
///
/// Pure: the same records and criteria always produce the same output.
/// Sorting is stable, and [`SortKey::Recent`] leaves the caller's order as is.
pub fn apply(records: &[Internship], criteria: &FilterCriteria) -> Vec<Internship> {
    let mut results = filter(records, criteria);

    match criteria.sort {
        SortKey::Recent => {}
        SortKey::Stipend => results.sort_by_cached_key(|record| Reverse(stipend_value(record))),
        SortKey::Duration => results.sort_by_cached_key(duration_value),
    }

    results
}

/// The filtering half of [`apply`]; idempotent
///
/// Keeps the first record seen for any id.
pub fn filter(records: &[Internship], criteria: &FilterCriteria) -> Vec<Internship> {
    let query = criteria.query.trim().to_lowercase();
    let mut seen = HashSet::new();

    records
        .iter()
        .filter(|record| matches(record, criteria, &query))
        .filter(|record| seen.insert(record.id.as_str()))
        .cloned()
        .collect()
}

/// Inclusion predicate; `query` must already be trimmed and lowercased
fn matches(record: &Internship, criteria: &FilterCriteria, query: &str) -> bool {
    let matches_query = query.is_empty()
        || record.title.to_lowercase().contains(query)
        || record.company.to_lowercase().contains(query)
        || record
            .tags
            .iter()
            .any(|tag| tag.to_lowercase().contains(query));

    let matches_location =
        criteria.locations.is_empty() || criteria.locations.contains(&record.location);

    let matches_sector = criteria.sectors.is_empty() || criteria.sectors.contains(&record.sector);

    matches_query
        && matches_location
        && matches_sector
        && criteria.internship_type.matches(record.internship_type)
}

/// Numeric value of a display string: every ASCII digit, in order, read as one number
///
/// `"₹5,000 /month"` reads as 5000 and `"3 months"` as 3. A string without
/// digits has no value. Values too large for `u64` saturate.
pub fn extract_number(text: &str) -> Option<u64> {
    let mut digits = text.chars().filter_map(|c| c.to_digit(10)).peekable();
    digits.peek()?;

    Some(digits.fold(0u64, |acc, d| {
        acc.saturating_mul(10).saturating_add(u64::from(d))
    }))
}

/// Unpaid and unparsable stipends count as zero
fn stipend_value(record: &Internship) -> u64 {
    match record.internship_type {
        InternshipType::Unpaid => 0,
        InternshipType::Paid => extract_number(&record.stipend).unwrap_or(0),
    }
}

fn duration_value(record: &Internship) -> u64 {
    extract_number(&record.duration).unwrap_or(UNKNOWN_DURATION)
}
