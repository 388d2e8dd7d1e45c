//! Dashboard service
//!
//! Entry point for every dashboard interaction. Each call validates its raw
//! inputs, re-filters the shared dataset and rebuilds the requested output from
//! scratch; nothing is cached between calls.

use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::application::use_cases::aggregation::{
    failure_counts_by_country, launch_counts, mission_type_outcome_matrix, outcome_distribution,
};
use crate::application::use_cases::charts::{
    failure_bar, launch_scatter, launch_scatter_title, mission_heatmap, outcome_pie,
    outcome_pie_title,
};
use crate::application::use_cases::exporter::{export_dataset, ExportFile, ExportFormat};
use crate::application::use_cases::input_validator::{CountrySelection, InputValidator};
use crate::application::use_cases::mission_filter::{failures_in_category, filter_missions};
use crate::application::use_cases::table_view::{TablePage, TableRequest, TableView};
use crate::domain::chart::Figure;
use crate::domain::error::Result;
use crate::domain::mission::{MissionDataset, YearRange};

/// Shown in place of the charts when aggregation fails.
pub const DATA_MANIPULATION_ERROR: &str = "An error occurred during data manipulation.";

/// Category preselected in the failure chart when the dataset has it.
const DEFAULT_FAILURE_CATEGORY: &str = "Launch";

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ChartsResponse {
    Ok {
        country: String,
        years: YearRange,
        record_count: usize,
        pie: Figure,
        scatter: Figure,
        heatmap: Figure,
    },
    Error {
        message: String,
        incident_id: String,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct FailureChart {
    /// `None` when the dataset has no failures.
    pub category: Option<String>,
    pub figure: Figure,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardOptions {
    pub countries: Vec<String>,
    pub years: YearRange,
    pub failure_categories: Vec<String>,
    pub default_failure_category: Option<String>,
    pub export_formats: Vec<&'static str>,
    pub table_columns: Vec<String>,
    pub page_size: usize,
}

#[derive(Debug, Clone)]
pub struct DashboardService {
    dataset: Arc<MissionDataset>,
    validator: InputValidator,
    table: TableView,
}

impl DashboardService {
    pub fn new(
        dataset: Arc<MissionDataset>,
        countries: Vec<String>,
        hidden_columns: &[String],
        page_size: usize,
        max_page_size: usize,
    ) -> Self {
        let validator = InputValidator::new(countries, &dataset);
        let table = TableView::new(&dataset, hidden_columns, page_size, max_page_size);
        Self {
            dataset,
            validator,
            table,
        }
    }

    pub fn dataset(&self) -> &MissionDataset {
        &self.dataset
    }

    pub fn options(&self) -> DashboardOptions {
        DashboardOptions {
            countries: self.validator.country_options(),
            years: self.validator.year_bounds(),
            failure_categories: self.validator.failure_categories().to_vec(),
            default_failure_category: self
                .validator
                .validate_failure_category(Some(DEFAULT_FAILURE_CATEGORY))
                .map(str::to_string),
            export_formats: ExportFormat::ALL.iter().map(|f| f.as_str()).collect(),
            table_columns: self.table.columns().to_vec(),
            page_size: self.table.default_page_size(),
        }
    }

    /// Pie, scatter and heatmap for the selected country and year range.
    pub fn charts_by_country(
        &self,
        country: Option<&str>,
        start: Option<i32>,
        end: Option<i32>,
    ) -> ChartsResponse {
        let selection = self.validator.validate_country(country);
        let years = self.validator.validate_year_range(start, end);

        match self.render_charts(selection, years) {
            Ok(response) => response,
            Err(err) => {
                let incident_id = Uuid::new_v4().to_string();
                error!(
                    incident_id = %incident_id,
                    country = selection.label(),
                    start = years.start,
                    end = years.end,
                    error = %err,
                    "Chart aggregation failed"
                );
                ChartsResponse::Error {
                    message: DATA_MANIPULATION_ERROR.to_string(),
                    incident_id,
                }
            }
        }
    }

    fn render_charts(
        &self,
        selection: CountrySelection<'_>,
        years: YearRange,
    ) -> Result<ChartsResponse> {
        let filtered = filter_missions(&self.dataset, years, selection);

        let pie = outcome_pie(outcome_pie_title(selection), &outcome_distribution(&filtered));
        let scatter = launch_scatter(launch_scatter_title(selection), &launch_counts(&filtered));
        let matrix = mission_type_outcome_matrix(
            self.dataset.mission_types(),
            self.dataset.outcomes(),
            &filtered,
        )?;

        Ok(ChartsResponse::Ok {
            country: selection.label().to_string(),
            years,
            record_count: filtered.len(),
            pie,
            scatter,
            heatmap: mission_heatmap(&matrix),
        })
    }

    /// Failure counts per allow-listed country for one failure category.
    pub fn failure_chart(&self, category: Option<&str>) -> FailureChart {
        let category = self.validator.validate_failure_category(category);
        let failures = match category {
            Some(category) => failures_in_category(&self.dataset, category),
            None => Vec::new(),
        };
        let counts = failure_counts_by_country(self.validator.countries(), &failures);

        FailureChart {
            category: category.map(str::to_string),
            figure: failure_bar(&counts),
        }
    }

    /// Serialize the whole dataset. `Ok(None)` for an unrecognized format.
    pub fn export(&self, format: &str) -> Result<Option<ExportFile>> {
        let Some(format) = ExportFormat::parse(format) else {
            warn!(format = %format, "Ignoring export request for unknown format");
            return Ok(None);
        };

        let file = export_dataset(&self.dataset, format)?;
        info!(
            format = format.as_str(),
            file_name = file.file_name(),
            bytes = file.bytes.len(),
            "Dataset exported"
        );
        Ok(Some(file))
    }

    pub fn table_page(&self, request: &TableRequest) -> TablePage {
        self.table.page(&self.dataset, request)
    }
}
