// ============================================================
// CSV INFRASTRUCTURE LAYER
// ============================================================
// Reading the mission source file into raw header/row tables

mod csv_parser;

pub use csv_parser::{CsvParser, CsvTable};
