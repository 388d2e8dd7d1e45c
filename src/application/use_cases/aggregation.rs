//! Chart-ready summaries of a filtered record set.
//!
//! Every function here is pure: the same records always produce the same
//! summary, and nothing in the dataset is modified.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use crate::domain::error::{AppError, Result};
use crate::domain::mission::MissionRecord;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutcomeCount {
    pub outcome: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LaunchCount {
    pub date: NaiveDate,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountryFailureCount {
    pub country: String,
    pub count: usize,
}

/// Mission type (rows) by outcome (columns) counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeatmapMatrix {
    pub mission_types: Vec<String>,
    pub outcomes: Vec<String>,
    pub counts: Vec<Vec<usize>>,
}

impl HeatmapMatrix {
    #[cfg(test)]
    pub fn get(&self, mission_type: &str, outcome: &str) -> Option<usize> {
        let row = self.mission_types.iter().position(|t| t == mission_type)?;
        let column = self.outcomes.iter().position(|o| o == outcome)?;
        Some(self.counts[row][column])
    }

    #[cfg(test)]
    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }
}

/// Count per outcome, most frequent first. Ties keep first-seen order.
pub fn outcome_distribution(records: &[&MissionRecord]) -> Vec<OutcomeCount> {
    let mut counts: Vec<OutcomeCount> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for record in records.iter().filter(|r| !r.outcome.is_empty()) {
        match index.get(record.outcome.as_str()) {
            Some(&position) => counts[position].count += 1,
            None => {
                index.insert(record.outcome.as_str(), counts.len());
                counts.push(OutcomeCount {
                    outcome: record.outcome.clone(),
                    count: 1,
                });
            }
        }
    }

    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

/// Number of launches per distinct launch date, oldest first.
pub fn launch_counts(records: &[&MissionRecord]) -> Vec<LaunchCount> {
    let mut per_date: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for date in records.iter().filter_map(|r| r.launch_date) {
        *per_date.entry(date).or_insert(0) += 1;
    }

    per_date
        .into_iter()
        .map(|(date, count)| LaunchCount { date, count })
        .collect()
}

/// Co-occurrence counts over a fixed vocabulary, so the matrix keeps the same
/// shape whatever the filter. Records with an empty type or outcome are skipped.
///
/// A value outside the vocabulary means the records do not come from the
/// dataset the vocabulary was built from, and is reported as an error.
pub fn mission_type_outcome_matrix(
    mission_types: &[String],
    outcomes: &[String],
    records: &[&MissionRecord],
) -> Result<HeatmapMatrix> {
    let row_index: HashMap<&str, usize> = mission_types
        .iter()
        .enumerate()
        .map(|(i, t)| (t.as_str(), i))
        .collect();
    let column_index: HashMap<&str, usize> = outcomes
        .iter()
        .enumerate()
        .map(|(i, o)| (o.as_str(), i))
        .collect();

    let mut counts = vec![vec![0usize; outcomes.len()]; mission_types.len()];

    for record in records
        .iter()
        .filter(|r| !r.mission_type.is_empty() && !r.outcome.is_empty())
    {
        let row = *row_index.get(record.mission_type.as_str()).ok_or_else(|| {
            AppError::Internal(format!(
                "Mission type '{}' is not part of the dataset vocabulary",
                record.mission_type
            ))
        })?;
        let column = *column_index.get(record.outcome.as_str()).ok_or_else(|| {
            AppError::Internal(format!(
                "Outcome '{}' is not part of the dataset vocabulary",
                record.outcome
            ))
        })?;
        counts[row][column] += 1;
    }

    Ok(HeatmapMatrix {
        mission_types: mission_types.to_vec(),
        outcomes: outcomes.to_vec(),
        counts,
    })
}

/// For each country, the number of failure records whose operator contains
/// the country name. One operator may count toward several countries.
pub fn failure_counts_by_country(
    countries: &[String],
    failures: &[&MissionRecord],
) -> Vec<CountryFailureCount> {
    countries
        .iter()
        .map(|country| CountryFailureCount {
            country: country.clone(),
            count: failures.iter().filter(|r| r.operated_by(country)).count(),
        })
        .collect()
}
