//! Excel template engine: the exporter rebuilds the official SNIES
//! "Software" workbook, the importer reads it (and close variants) back.

pub mod export;
pub mod import;
pub mod normalize;
pub mod serial;

pub use export::{export_workbook, ExportResult};
pub use import::{import_workbook, ParsedImport};

pub const EXPORT_FILENAME: &str = "planilla_reporte_snies_software.xlsx";
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
