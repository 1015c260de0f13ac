use crate::constants::{ANONYMOUS_AUTHOR, DEFAULT_STATUS};
use crate::error::ParseError;
use crate::models::{LatLng, Priority, Report};
use crate::time::parse_report_date;
use chrono::NaiveDate;
use std::collections::HashMap;

/// Position of the record splitter relative to the current field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldState {
    /// Nothing but whitespace read for this field yet
    StartOfField,
    Unquoted,
    Quoted,
    /// A quote was read inside a quoted field: either an escaped `""` or the closing quote
    QuoteInQuoted,
}

/// Splits CSV text into records of trimmed fields.
///
/// Quoted fields may contain commas, newlines and doubled quotes. A quote in
/// the middle of an unquoted field is kept as a literal character.
#[derive(Debug)]
struct RecordSplitter {
    state: FieldState,
    field: String,
    record: Vec<String>,
}

impl RecordSplitter {
    fn new() -> Self {
        Self {
            state: FieldState::StartOfField,
            field: String::new(),
            record: Vec::new(),
        }
    }

    fn end_field(&mut self) {
        self.record.push(self.field.trim().to_string());
        self.field.clear();
        self.state = FieldState::StartOfField;
    }

    fn end_record(&mut self) -> Vec<String> {
        self.end_field();
        std::mem::take(&mut self.record)
    }

    /// Feed one character; returns a record when `c` completes one
    fn push(&mut self, c: char) -> Option<Vec<String>> {
        match (self.state, c) {
            (FieldState::Quoted, '"') => self.state = FieldState::QuoteInQuoted,
            (FieldState::Quoted, _) => self.field.push(c),
            (FieldState::QuoteInQuoted, '"') => {
                self.field.push('"');
                self.state = FieldState::Quoted;
            }
            (_, ',') => self.end_field(),
            (_, '\n') => return Some(self.end_record()),
            (_, '\r') => {}
            (FieldState::StartOfField, '"') => self.state = FieldState::Quoted,
            (FieldState::StartOfField, c) if c.is_whitespace() => {}
            (FieldState::StartOfField | FieldState::Unquoted | FieldState::QuoteInQuoted, c) => {
                self.field.push(c);
                self.state = FieldState::Unquoted;
            }
        }
        None
    }

    fn finish(mut self) -> Option<Vec<String>> {
        if self.record.is_empty() && self.field.is_empty() && self.state == FieldState::StartOfField {
            return None;
        }
        Some(self.end_record())
    }
}

fn is_blank(record: &[String]) -> bool {
    record.iter().all(String::is_empty)
}

/// Split a single CSV line into trimmed fields
#[must_use]
pub fn split_csv_record(line: &str) -> Vec<String> {
    let mut splitter = RecordSplitter::new();
    for c in line.chars() {
        if let Some(record) = splitter.push(c) {
            return record;
        }
    }
    splitter.finish().unwrap_or_else(|| vec![String::new()])
}

/// Split CSV text into records of trimmed fields, skipping blank lines.
/// Records may differ in length.
#[must_use]
pub fn parse_csv_records(text: &str) -> Vec<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.trim_start_matches('\u{feff}').as_bytes());

    reader
        .records()
        .filter_map(|record| match record {
            Ok(record) => Some(record.iter().map(ToString::to_string).collect::<Vec<_>>()),
            Err(e) => {
                leptos::logging::warn!("Unreadable CSV record skipped: {e}");
                None
            }
        })
        .filter(|record| !is_blank(record))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportColumn {
    Author,
    ProblemType,
    Description,
    Address,
    /// Combined `"lat,lng"` cell
    Coordinates,
    Latitude,
    Longitude,
    Date,
    Status,
}

impl ReportColumn {
    /// Recognise a header cell (Spanish or English, case-insensitive)
    #[must_use]
    pub fn from_header(header: &str) -> Option<Self> {
        let column = match header.trim().to_lowercase().as_str() {
            "nombre" | "name" | "reportado por" | "autor" | "author" => Self::Author,
            "tipo" | "tipo de problema" | "type" | "problem type" => Self::ProblemType,
            "descripción" | "descripcion" | "description" => Self::Description,
            "dirección" | "direccion" | "address" => Self::Address,
            "coordenadas" | "coordinates" | "ubicación" | "ubicacion" => Self::Coordinates,
            "lat" | "latitud" | "latitude" => Self::Latitude,
            "lng" | "lon" | "longitud" | "longitude" => Self::Longitude,
            "fecha" | "date" | "timestamp" | "marca temporal" => Self::Date,
            "estado" | "status" => Self::Status,
            _ => return None,
        };
        Some(column)
    }
}

/// Where each report field lives in a CSV record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLayout {
    columns: HashMap<ReportColumn, usize>,
    /// Records shorter than this are rejected outright
    min_fields: usize,
}

impl ReportLayout {
    /// `nombre, tipo, descripcion, direccion, coordenadas, fecha[, estado]`
    #[must_use]
    pub fn positional() -> Self {
        let columns = [
            ReportColumn::Author,
            ReportColumn::ProblemType,
            ReportColumn::Description,
            ReportColumn::Address,
            ReportColumn::Coordinates,
            ReportColumn::Date,
            ReportColumn::Status,
        ]
        .into_iter()
        .enumerate()
        .map(|(index, column)| (column, index))
        .collect();
        Self { columns, min_fields: 6 }
    }

    /// Resolve columns by name. `None` unless the header names a type column
    /// and a location (combined, or separate latitude and longitude).
    #[must_use]
    pub fn from_header(header: &[String]) -> Option<Self> {
        let mut columns = HashMap::new();
        for (index, cell) in header.iter().enumerate() {
            if let Some(column) = ReportColumn::from_header(cell) {
                columns.entry(column).or_insert(index);
            }
        }
        let has_location = columns.contains_key(&ReportColumn::Coordinates)
            || (columns.contains_key(&ReportColumn::Latitude) && columns.contains_key(&ReportColumn::Longitude));
        if !columns.contains_key(&ReportColumn::ProblemType) || !has_location {
            return None;
        }
        Some(Self { columns, min_fields: 0 })
    }

    fn get<'a>(&self, record: &'a [String], column: ReportColumn) -> &'a str {
        self.columns
            .get(&column)
            .and_then(|&index| record.get(index))
            .map_or("", String::as_str)
    }

    fn location(&self, record: &[String]) -> Option<LatLng> {
        let (lat, lng) = if self.columns.contains_key(&ReportColumn::Coordinates)
            && !self.get(record, ReportColumn::Coordinates).is_empty()
        {
            let (lat, lng) = self.get(record, ReportColumn::Coordinates).split_once(',')?;
            (lat.trim().parse::<f64>().ok()?, lng.trim().parse::<f64>().ok()?)
        } else {
            (
                self.get(record, ReportColumn::Latitude).parse::<f64>().ok()?,
                self.get(record, ReportColumn::Longitude).parse::<f64>().ok()?,
            )
        };
        LatLng { lat, lng }.validated().ok()
    }

    /// Decode one data record. `row` is the 1-based line number used in errors.
    ///
    /// # Errors
    ///
    /// Returns `CsvRow` for short records, a missing type or an invalid location
    pub fn decode(&self, row: usize, record: &[String], today: NaiveDate) -> Result<Report, ParseError> {
        let invalid = |reason: &str| ParseError::CsvRow { row, reason: reason.to_string() };

        if record.len() < self.min_fields {
            return Err(invalid("faltan columnas"));
        }
        let problem_type = self.get(record, ReportColumn::ProblemType);
        if problem_type.is_empty() {
            return Err(invalid("falta el tipo de problema"));
        }
        let location = self.location(record).ok_or_else(|| invalid("coordenadas inválidas"))?;

        let raw_date = self.get(record, ReportColumn::Date).to_string();
        let date = parse_report_date(&raw_date);
        let author = self.get(record, ReportColumn::Author);
        let status = self.get(record, ReportColumn::Status);

        let mut report = Report {
            author: if author.is_empty() { ANONYMOUS_AUTHOR } else { author }.to_string(),
            problem_type: problem_type.to_string(),
            description: self.get(record, ReportColumn::Description).to_string(),
            address: self.get(record, ReportColumn::Address).to_string(),
            location,
            date,
            raw_date,
            status: if status.is_empty() { DEFAULT_STATUS } else { status }.to_string(),
            days_since: 0,
            priority: Priority::Low,
        };
        report.refresh_age(today);
        Ok(report)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedReports {
    pub reports: Vec<Report>,
    /// Rows that were dropped, with the reason
    pub skipped: Vec<ParseError>,
}

/// Decode a report spreadsheet export.
///
/// The first record is always treated as a header. Rows without a type or a
/// valid coordinate pair are dropped and logged; they never fail the whole load.
#[must_use]
pub fn parse_reports(text: &str, today: NaiveDate) -> ParsedReports {
    let mut records = parse_csv_records(text).into_iter();
    let Some(header) = records.next() else {
        return ParsedReports::default();
    };
    let layout = ReportLayout::from_header(&header).unwrap_or_else(ReportLayout::positional);

    let mut parsed = ParsedReports::default();
    for (offset, record) in records.enumerate() {
        match layout.decode(offset + 2, &record, today) {
            Ok(report) => parsed.reports.push(report),
            Err(e) => {
                leptos::logging::warn!("Invalid report skipped: {e}");
                parsed.skipped.push(e);
            }
        }
    }
    parsed
}
