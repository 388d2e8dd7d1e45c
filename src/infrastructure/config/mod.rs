use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::Path;
use validator::Validate;

use crate::domain::error::{AppError, Result};

/// Optional settings file read from the working directory.
pub const CONFIG_FILE: &str = "dashboard.toml";

/// Prefix for environment overrides, e.g. `DASHBOARD_PORT=9000`.
pub const ENV_PREFIX: &str = "DASHBOARD_";

pub const DEFAULT_COUNTRIES: &[&str] = &[
    "United States",
    "Soviet Union",
    "Japan",
    "European Union",
    "China",
    "India",
    "Luxembourg",
    "Israel",
    "South Korea",
    "Italy",
    "UAE",
    "Russia",
];

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Settings {
    #[validate(length(min = 1))]
    pub host: String,
    #[validate(range(min = 1))]
    pub port: u16,
    /// Source CSV, relative to the working directory unless absolute.
    #[validate(length(min = 1))]
    pub data_path: String,
    #[validate(length(min = 1))]
    pub log_filter: String,
    /// Country names offered by the country selector and the failure chart.
    #[validate(length(min = 1))]
    pub countries: Vec<String>,
    /// Columns left out of the table view.
    pub hidden_columns: Vec<String>,
    #[validate(range(min = 1))]
    pub page_size: usize,
    #[validate(range(min = 1))]
    pub max_page_size: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8050,
            data_path: "data.csv".to_string(),
            log_filter: "info".to_string(),
            countries: DEFAULT_COUNTRIES.iter().map(|c| c.to_string()).collect(),
            hidden_columns: vec!["Additional information".to_string()],
            page_size: 10,
            max_page_size: 100,
        }
    }
}

impl Settings {
    /// Defaults, then `dashboard.toml`, then `DASHBOARD_*` environment variables.
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed(ENV_PREFIX))
    }

    pub fn load() -> Result<Self> {
        Self::from_figment(Self::figment())
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        let settings: Settings = figment
            .extract()
            .map_err(|e| AppError::ValidationError(format!("Invalid configuration: {}", e)))?;

        settings
            .validate()
            .map_err(|e| AppError::ValidationError(format!("Invalid configuration: {}", e)))?;

        if settings.page_size > settings.max_page_size {
            return Err(AppError::ValidationError(format!(
                "Invalid configuration: page_size ({}) exceeds max_page_size ({})",
                settings.page_size, settings.max_page_size
            )));
        }

        Ok(settings)
    }

    pub fn data_path(&self) -> &Path {
        Path::new(&self.data_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_defaults() {
        let settings = Settings::from_figment(Figment::from(Serialized::defaults(
            Settings::default(),
        )))
        .unwrap();

        assert_eq!(settings.port, 8050);
        assert_eq!(settings.data_path(), Path::new("data.csv"));
        assert_eq!(settings.countries.len(), 12);
        assert_eq!(settings.page_size, 10);
    }

    #[test]
    fn test_file_and_env_layers() {
        Jail::expect_with(|jail| {
            jail.create_file(
                CONFIG_FILE,
                r#"
                    port = 9000
                    data_path = "from-file.csv"
                    countries = ["Japan", "India"]
                "#,
            )?;
            jail.set_env("DASHBOARD_DATA_PATH", "missions.csv");

            let settings = Settings::load().map_err(|e| e.to_string())?;
            assert_eq!(settings.port, 9000);
            assert_eq!(settings.data_path, "missions.csv");
            assert_eq!(settings.countries, vec!["Japan", "India"]);
            assert_eq!(settings.host, "127.0.0.1");
            Ok(())
        });
    }

    #[test]
    fn test_rejects_invalid_values() {
        Jail::expect_with(|jail| {
            jail.set_env("DASHBOARD_PAGE_SIZE", "0");
            assert!(Settings::load().is_err());
            Ok(())
        });
    }

    #[test]
    fn test_rejects_page_size_above_maximum() {
        Jail::expect_with(|jail| {
            jail.set_env("DASHBOARD_PAGE_SIZE", "50");
            jail.set_env("DASHBOARD_MAX_PAGE_SIZE", "20");
            let err = Settings::load().unwrap_err();
            assert!(err.to_string().contains("max_page_size"));
            Ok(())
        });
    }
}
