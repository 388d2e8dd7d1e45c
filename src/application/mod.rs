pub mod use_cases;

pub use use_cases::dashboard::DashboardService;
pub use use_cases::exporter::{ExportFile, ExportFormat};
pub use use_cases::input_validator::{CountrySelection, InputValidator};
pub use use_cases::table_view::{TablePage, TableRequest, TableView};
