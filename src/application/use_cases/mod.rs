pub mod aggregation;
pub mod charts;
pub mod dashboard;
pub mod exporter;
pub mod input_validator;
pub mod mission_filter;
pub mod table_view;
