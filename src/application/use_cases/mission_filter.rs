use crate::application::use_cases::input_validator::CountrySelection;
use crate::domain::mission::{MissionDataset, MissionRecord, YearRange};

/// Records launched inside `years`, then narrowed to operators containing the
/// selected country name. Undated records never pass the year filter.
pub fn filter_missions<'d>(
    dataset: &'d MissionDataset,
    years: YearRange,
    country: CountrySelection<'_>,
) -> Vec<&'d MissionRecord> {
    dataset
        .records()
        .iter()
        .filter(|record| record.launch_year().is_some_and(|year| years.contains(year)))
        .filter(|record| match country {
            CountrySelection::All => true,
            CountrySelection::Country(name) => record.operated_by(name),
        })
        .collect()
}

/// Failure records whose category equals `category`.
pub fn failures_in_category<'d>(
    dataset: &'d MissionDataset,
    category: &str,
) -> Vec<&'d MissionRecord> {
    dataset
        .records()
        .iter()
        .filter(|record| record.failure_category() == Some(category))
        .collect()
}
