//! Whole-dataset export to CSV, JSON and xlsx.
//!
//! Exports always cover the full normalized dataset, never a filtered view,
//! and are rebuilt on every request. Output is deterministic: the same dataset
//! always serializes to the same bytes.

use chrono::Datelike;
use rust_xlsxwriter::{DocProperties, ExcelDateTime, Format, Workbook};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use sha2::{Digest, Sha256};

use crate::domain::error::{AppError, Result};
use crate::domain::mission::{MissionDataset, MissionRecord};

const WORKSHEET_NAME: &str = "Moon missions";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
    Excel,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [ExportFormat::Csv, ExportFormat::Json, ExportFormat::Excel];

    /// Case-insensitive lookup; `None` for anything outside the three formats.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "csv" => Some(ExportFormat::Csv),
            "json" => Some(ExportFormat::Json),
            "excel" => Some(ExportFormat::Excel),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Excel => "excel",
        }
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "Moonlanding.csv",
            ExportFormat::Json => "Moonlanding.json",
            ExportFormat::Excel => "Moonlanding.xlsx",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv; charset=utf-8",
            ExportFormat::Json => "application/json",
            ExportFormat::Excel => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExportFile {
    pub format: ExportFormat,
    pub bytes: Vec<u8>,
}

impl ExportFile {
    pub fn file_name(&self) -> &'static str {
        self.format.file_name()
    }

    pub fn content_type(&self) -> &'static str {
        self.format.content_type()
    }

    /// Hex SHA-256 of the payload, used as the download's ETag.
    pub fn etag(&self) -> String {
        hex::encode(Sha256::digest(&self.bytes))
    }
}

pub fn export_dataset(dataset: &MissionDataset, format: ExportFormat) -> Result<ExportFile> {
    let bytes = match format {
        ExportFormat::Csv => to_csv(dataset)?,
        ExportFormat::Json => to_json(dataset)?,
        ExportFormat::Excel => to_excel(dataset)?,
    };
    Ok(ExportFile { format, bytes })
}

fn to_csv(dataset: &MissionDataset) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(dataset.columns())?;
    for record in dataset.records() {
        writer.write_record(&record.cells)?;
    }
    writer
        .into_inner()
        .map_err(|e| AppError::ExportError(format!("Failed to finish CSV export: {}", e)))
}

fn to_json(dataset: &MissionDataset) -> Result<Vec<u8>> {
    serde_json::to_vec_pretty(&JsonRecords(dataset))
        .map_err(|e| AppError::ExportError(format!("Failed to serialize JSON export: {}", e)))
}

/// Array of objects keyed by column name, in column order. Empty cells are null.
struct JsonRecords<'a>(&'a MissionDataset);

struct JsonRecord<'a> {
    columns: &'a [String],
    record: &'a MissionRecord,
}

impl Serialize for JsonRecords<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let columns = self.0.columns();
        let mut seq = serializer.serialize_seq(Some(self.0.len()))?;
        for record in self.0.records() {
            seq.serialize_element(&JsonRecord { columns, record })?;
        }
        seq.end()
    }
}

impl Serialize for JsonRecord<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (column, value) in self.columns.iter().zip(&self.record.cells) {
            if value.is_empty() {
                map.serialize_entry(column, &None::<&str>)?;
            } else {
                map.serialize_entry(column, value)?;
            }
        }
        map.end()
    }
}

fn to_excel(dataset: &MissionDataset) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();

    // A fixed creation time keeps repeated exports byte-identical.
    let created = ExcelDateTime::from_ymd(2023, 1, 1)?;
    workbook.set_properties(&DocProperties::new().set_creation_datetime(&created));

    let header_format = Format::new().set_bold();
    let date_format = Format::new().set_num_format("yyyy-mm-dd");
    let launch_column = dataset.launch_date_column();

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(WORKSHEET_NAME)?;

    for (col, name) in dataset.columns().iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, name, &header_format)?;
    }

    for (index, record) in dataset.records().iter().enumerate() {
        let row = index as u32 + 1;
        for (col, value) in record.cells.iter().enumerate() {
            if value.is_empty() {
                continue;
            }
            let excel_date = record
                .launch_date
                .filter(|_| col == launch_column)
                .and_then(|date| {
                    ExcelDateTime::from_ymd(date.year() as u16, date.month() as u8, date.day() as u8)
                        .ok()
                });
            match excel_date {
                Some(date) => {
                    worksheet.write_datetime_with_format(row, col as u16, &date, &date_format)?;
                }
                None => {
                    worksheet.write_string(row, col as u16, value)?;
                }
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}
