pub mod csv;
pub mod route_json;

pub use csv::{parse_csv_records, parse_reports, split_csv_record, ParsedReports, ReportColumn, ReportLayout};
pub use route_json::{export_lines, parse_lines};
