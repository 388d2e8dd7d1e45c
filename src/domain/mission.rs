use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::error::{AppError, Result};
use super::launch_date::normalize_launch_date;

pub const LAUNCH_DATE_COLUMN: &str = "Launch Date";
pub const OPERATOR_COLUMN: &str = "Operator";
pub const MISSION_TYPE_COLUMN: &str = "Mission Type";
pub const OUTCOME_COLUMN: &str = "Outcome";

/// Outcomes containing this marker count as failures.
pub const FAILURE_MARKER: &str = "fail";

/// Inclusive range of launch years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    pub start: i32,
    pub end: i32,
}

impl YearRange {
    pub fn new(start: i32, end: i32) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, year: i32) -> bool {
        self.start <= year && year <= self.end
    }
}

/// One row of the lunar missions dataset.
#[derive(Debug, Clone, Serialize)]
pub struct MissionRecord {
    pub launch_date: Option<NaiveDate>,
    pub operator: String,
    pub mission_type: String,
    pub outcome: String,
    /// Every source column in column order. The launch date cell holds the
    /// normalized ISO date, or nothing when the date is missing.
    pub cells: Vec<String>,
}

impl MissionRecord {
    pub fn launch_year(&self) -> Option<i32> {
        self.launch_date.map(|date| date.year())
    }

    pub fn is_failure(&self) -> bool {
        self.outcome.contains(FAILURE_MARKER)
    }

    /// First word of the outcome for failure records.
    pub fn failure_category(&self) -> Option<&str> {
        if self.is_failure() {
            Some(outcome_prefix(&self.outcome))
        } else {
            None
        }
    }

    /// Substring match of a country name against the operator field.
    pub fn operated_by(&self, country: &str) -> bool {
        self.operator.contains(country)
    }
}

/// The part of an outcome before its first space ("Launch failure" -> "Launch").
pub fn outcome_prefix(outcome: &str) -> &str {
    outcome.split(' ').next().unwrap_or(outcome)
}

/// Column positions of the fields the dashboard reads.
#[derive(Debug, Clone, Copy)]
struct ColumnLayout {
    launch_date: usize,
    operator: usize,
    mission_type: usize,
    outcome: usize,
}

impl ColumnLayout {
    fn resolve(columns: &[String]) -> Result<Self> {
        let find = |name: &str| {
            columns
                .iter()
                .position(|column| column == name)
                .ok_or_else(|| {
                    AppError::ValidationError(format!(
                        "Required column '{}' is missing from the dataset",
                        name
                    ))
                })
        };

        Ok(Self {
            launch_date: find(LAUNCH_DATE_COLUMN)?,
            operator: find(OPERATOR_COLUMN)?,
            mission_type: find(MISSION_TYPE_COLUMN)?,
            outcome: find(OUTCOME_COLUMN)?,
        })
    }
}

/// The normalized, immutable dataset shared by every request.
#[derive(Debug, Clone)]
pub struct MissionDataset {
    columns: Vec<String>,
    records: Vec<MissionRecord>,
    launch_date_column: usize,
    year_bounds: YearRange,
    mission_types: Vec<String>,
    outcomes: Vec<String>,
    failure_categories: Vec<String>,
}

impl MissionDataset {
    /// Build the dataset from raw rows, normalizing launch dates.
    ///
    /// Short rows are padded with empty cells and long rows truncated to the
    /// header width.
    pub fn from_rows(columns: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self> {
        let layout = ColumnLayout::resolve(&columns)?;

        let records: Vec<MissionRecord> = rows
            .into_iter()
            .map(|mut cells| {
                cells.resize(columns.len(), String::new());
                let launch_date = normalize_launch_date(&cells[layout.launch_date]);
                cells[layout.launch_date] = launch_date
                    .map(|date| date.format("%Y-%m-%d").to_string())
                    .unwrap_or_default();

                MissionRecord {
                    launch_date,
                    operator: cells[layout.operator].clone(),
                    mission_type: cells[layout.mission_type].clone(),
                    outcome: cells[layout.outcome].clone(),
                    cells,
                }
            })
            .collect();

        let year_bounds = year_bounds(&records).ok_or_else(|| {
            AppError::ValidationError("Dataset contains no parsable launch dates".to_string())
        })?;

        let mission_types = distinct_in_order(records.iter().map(|r| r.mission_type.as_str()));
        let outcomes = distinct_in_order(records.iter().map(|r| r.outcome.as_str()));
        let failure_categories =
            distinct_in_order(records.iter().filter_map(|r| r.failure_category()));

        Ok(Self {
            columns,
            records,
            launch_date_column: layout.launch_date,
            year_bounds,
            mission_types,
            outcomes,
            failure_categories,
        })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn records(&self) -> &[MissionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn launch_date_column(&self) -> usize {
        self.launch_date_column
    }

    /// Earliest and latest launch year among dated records.
    pub fn year_bounds(&self) -> YearRange {
        self.year_bounds
    }

    /// Distinct non-empty mission types in first-seen order.
    pub fn mission_types(&self) -> &[String] {
        &self.mission_types
    }

    /// Distinct non-empty outcomes in first-seen order.
    pub fn outcomes(&self) -> &[String] {
        &self.outcomes
    }

    /// Distinct failure prefixes in first-seen order.
    pub fn failure_categories(&self) -> &[String] {
        &self.failure_categories
    }

    pub fn missing_launch_dates(&self) -> usize {
        self.records
            .iter()
            .filter(|record| record.launch_date.is_none())
            .count()
    }
}

fn year_bounds(records: &[MissionRecord]) -> Option<YearRange> {
    let years = records.iter().filter_map(MissionRecord::launch_year);
    let (min, max) = years.fold(None, |bounds: Option<(i32, i32)>, year| match bounds {
        None => Some((year, year)),
        Some((min, max)) => Some((min.min(year), max.max(year))),
    })?;
    Some(YearRange::new(min, max))
}

fn distinct_in_order<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .filter(|value| !value.is_empty())
        .filter(|value| seen.insert(*value))
        .map(str::to_string)
        .collect()
}
