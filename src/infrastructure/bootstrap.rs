use std::path::Path;
use std::sync::Arc;

use tracing::{error, info, warn};

use crate::application::DashboardService;
use crate::domain::error::{AppError, Result};
use crate::domain::mission::MissionDataset;
use crate::infrastructure::config::Settings;
use crate::infrastructure::csv::CsvParser;

/// Read and normalize the mission CSV. Any failure here is fatal for startup.
pub fn load_dataset(path: &Path) -> Result<MissionDataset> {
    if !path.is_file() {
        error!(data_path = %path.display(), "Mission data file not found");
        return Err(AppError::NotFound(format!(
            "Mission data file not found: {}",
            path.display()
        )));
    }

    let table = CsvParser::new().parse_file(path).map_err(|err| {
        error!(error = %err, data_path = %path.display(), "Failed to read mission data");
        err
    })?;

    let dataset = MissionDataset::from_rows(table.headers, table.rows).map_err(|err| {
        error!(error = %err, data_path = %path.display(), "Mission data is malformed");
        err
    })?;

    let missing = dataset.missing_launch_dates();
    if missing > 0 {
        warn!(
            missing_launch_dates = missing,
            "Some launch dates could not be parsed and are treated as missing"
        );
    }

    let years = dataset.year_bounds();
    info!(
        data_path = %path.display(),
        records = dataset.len(),
        columns = dataset.columns().len(),
        first_year = years.start,
        last_year = years.end,
        failure_categories = dataset.failure_categories().len(),
        "Mission data loaded"
    );

    Ok(dataset)
}

pub fn setup(settings: &Settings) -> Result<DashboardService> {
    let dataset = load_dataset(settings.data_path())?;

    Ok(DashboardService::new(
        Arc::new(dataset),
        settings.countries.clone(),
        &settings.hidden_columns,
        settings.page_size,
        settings.max_page_size,
    ))
}
