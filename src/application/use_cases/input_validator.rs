//! Input Validator for dashboard controls
//!
//! Every user selection is checked against an allow-list derived from the
//! configuration or the dataset itself:
//! - Country must be a configured country name or the "All Countries" sentinel
//! - Year range must lie entirely inside the dataset's launch years
//! - Failure category must be a failure prefix observed in the dataset
//!
//! Validation never fails: an unknown value is replaced by a safe default.

use crate::domain::mission::{MissionDataset, YearRange};

/// Sentinel selection meaning "do not filter by operator".
pub const ALL_COUNTRIES: &str = "All Countries";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountrySelection<'a> {
    All,
    Country(&'a str),
}

impl<'a> CountrySelection<'a> {
    pub fn label(&self) -> &'a str {
        match self {
            CountrySelection::All => ALL_COUNTRIES,
            CountrySelection::Country(name) => *name,
        }
    }
}

#[derive(Debug, Clone)]
pub struct InputValidator {
    countries: Vec<String>,
    year_bounds: YearRange,
    failure_categories: Vec<String>,
}

impl InputValidator {
    /// Build the allow-lists. The sentinel is never kept as a country name.
    pub fn new(countries: Vec<String>, dataset: &MissionDataset) -> Self {
        Self {
            countries: countries
                .into_iter()
                .filter(|c| c != ALL_COUNTRIES)
                .collect(),
            year_bounds: dataset.year_bounds(),
            failure_categories: dataset.failure_categories().to_vec(),
        }
    }

    /// Allow-listed country names, sentinel excluded.
    pub fn countries(&self) -> &[String] {
        &self.countries
    }

    /// Options for the country selector, sentinel first.
    pub fn country_options(&self) -> Vec<String> {
        std::iter::once(ALL_COUNTRIES.to_string())
            .chain(self.countries.iter().cloned())
            .collect()
    }

    pub fn year_bounds(&self) -> YearRange {
        self.year_bounds
    }

    pub fn failure_categories(&self) -> &[String] {
        &self.failure_categories
    }

    pub fn validate_country(&self, value: Option<&str>) -> CountrySelection<'_> {
        match value {
            Some(name) => self
                .countries
                .iter()
                .find(|country| country.as_str() == name)
                .map(|country| CountrySelection::Country(country.as_str()))
                .unwrap_or(CountrySelection::All),
            None => CountrySelection::All,
        }
    }

    /// Both bounds inside the dataset years, or the full range. A reversed
    /// in-bounds pair is kept as given.
    pub fn validate_year_range(&self, start: Option<i32>, end: Option<i32>) -> YearRange {
        match (start, end) {
            (Some(start), Some(end))
                if self.year_bounds.contains(start) && self.year_bounds.contains(end) =>
            {
                YearRange::new(start, end)
            }
            _ => self.year_bounds,
        }
    }

    /// The requested category if observed, else the first one in dataset order.
    /// `None` only when the dataset has no failures at all.
    pub fn validate_failure_category(&self, value: Option<&str>) -> Option<&str> {
        value
            .and_then(|name| {
                self.failure_categories
                    .iter()
                    .find(|category| category.as_str() == name)
            })
            .or_else(|| self.failure_categories.first())
            .map(String::as_str)
    }
}
