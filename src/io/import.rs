//! CSV import for utility interval exports and daily weather series.

use std::fs::{self, File};
use std::io::Read;
use std::path::Path;

use chrono::{NaiveDate, NaiveTime};
use tracing::{debug, warn};

use crate::usage::UsageRecord;
use crate::weather::DailyWeather;

/// Row type kept from the export; gas and other rows are ignored.
const ELECTRIC_USAGE: &str = "Electric usage";

const COL_TYPE: &str = "TYPE";
const COL_DATE: &str = "DATE";
const COL_START: &str = "START TIME";
const COL_END: &str = "END TIME";
const COL_USAGE: &str = "USAGE (KWH)";

/// Errors raised while reading an export or weather file.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("cannot read \"{path}\": {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("no header row beginning with \"TYPE,\" found")]
    MissingHeader,
    #[error("header row has no \"{0}\" column")]
    MissingColumn(&'static str),
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// Account details from the free-form lines above the header.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccountInfo {
    pub name: Option<String>,
    pub address: Option<String>,
    /// First five-digit token of the address.
    pub zip_code: Option<String>,
}

/// Parsed export.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UsageImport {
    pub records: Vec<UsageRecord>,
    pub account: AccountInfo,
    /// Electric rows dropped for an unreadable date or time.
    pub skipped_rows: usize,
}

/// Finds the header row: a line starting with `TYPE,` (any case) or
/// containing `TYPE,DATE,`.
fn header_line_index(lines: &[&str]) -> Option<usize> {
    lines
        .iter()
        .position(|l| l.starts_with("TYPE,"))
        .or_else(|| {
            lines.iter().position(|l| {
                l.trim_start().to_ascii_uppercase().starts_with("TYPE,") || l.contains("TYPE,DATE,")
            })
        })
}

/// Extracts the first standalone five-digit token, allowing a ZIP+4 suffix.
///
/// # Examples
///
/// ```
/// use tariff_insights::io::import::extract_zip_code;
///
/// assert_eq!(extract_zip_code("123 Main St, Seattle WA 98101"), Some("98101".to_string()));
/// assert_eq!(extract_zip_code("Bellevue WA 98004-1234"), Some("98004".to_string()));
/// assert_eq!(extract_zip_code("123 Main St"), None);
/// ```
pub fn extract_zip_code(address: &str) -> Option<String> {
    address
        .split(|c: char| !c.is_ascii_alphanumeric())
        .find(|tok| tok.len() == 5 && tok.bytes().all(|b| b.is_ascii_digit()))
        .map(str::to_string)
}

fn parse_preamble(lines: &[&str]) -> AccountInfo {
    let mut info = AccountInfo::default();
    let text = lines.join("\n");
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());
    for rec in rdr.records().flatten() {
        let (Some(key), Some(value)) = (rec.get(0), rec.get(1)) else {
            continue;
        };
        match key.to_ascii_lowercase().as_str() {
            "name" => info.name = Some(value.to_string()),
            "address" => {
                info.zip_code = extract_zip_code(value);
                info.address = Some(value.to_string());
            }
            _ => {}
        }
    }
    info
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%m/%d/%Y"))
        .ok()
}

fn parse_time(s: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .ok()
}

/// Unreadable usage counts as zero.
fn parse_usage(s: &str) -> f64 {
    s.trim().parse::<f64>().unwrap_or(0.0)
}

/// Parses a utility export held in memory.
///
/// Lines above the header are read as `key,value` account details. Only
/// `Electric usage` rows are kept. Rows whose date or start/end time cannot
/// be read are skipped and counted.
///
/// # Errors
///
/// Returns an `ImportError` if no header row is found, a required column is
/// missing, or the CSV is malformed.
pub fn parse_usage_csv(text: &str) -> Result<UsageImport, ImportError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let lines: Vec<&str> = text.lines().collect();
    let header_idx = header_line_index(&lines).ok_or(ImportError::MissingHeader)?;
    let account = parse_preamble(&lines[..header_idx]);

    let body = lines[header_idx..].join("\n");
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(body.as_bytes());

    let headers = rdr.headers()?.clone();
    let column = |name: &'static str| {
        headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
            .ok_or(ImportError::MissingColumn(name))
    };
    let type_col = column(COL_TYPE)?;
    let date_col = column(COL_DATE)?;
    let start_col = column(COL_START)?;
    let end_col = column(COL_END)?;
    let usage_col = column(COL_USAGE)?;

    let mut records = Vec::new();
    let mut skipped_rows = 0;
    for (i, row) in rdr.records().enumerate() {
        let row = row?;
        if row.get(type_col) != Some(ELECTRIC_USAGE) {
            continue;
        }
        let date = row.get(date_col).and_then(parse_date);
        let start = row.get(start_col).and_then(parse_time);
        let end = row.get(end_col).and_then(parse_time);
        let (Some(date), Some(start), Some(end)) = (date, start, end) else {
            // header is line 1 of the body
            warn!(line = header_idx + i + 2, "skipping row with unreadable date or time");
            skipped_rows += 1;
            continue;
        };
        let usage = row.get(usage_col).map_or(0.0, parse_usage);
        records.push(UsageRecord::new(date, start, end, usage));
    }

    debug!(records = records.len(), skipped_rows, "parsed usage export");
    Ok(UsageImport {
        records,
        account,
        skipped_rows,
    })
}

/// Reads the whole file, replacing invalid UTF-8 (e.g. a Latin-1 address in
/// the preamble) with U+FFFD.
fn read_to_string(path: &Path) -> Result<String, ImportError> {
    let bytes = fs::read(path).map_err(|source| ImportError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Reads and parses a utility export file.
///
/// # Errors
///
/// Returns an `ImportError` if the file cannot be read or parsed.
pub fn read_usage_csv(path: &Path) -> Result<UsageImport, ImportError> {
    parse_usage_csv(&read_to_string(path)?)
}

/// Parses a weather series with header `date,temp_max,temp_min,temp_mean`.
///
/// # Errors
///
/// Returns an `ImportError` on malformed rows.
pub fn parse_weather_csv(reader: impl Read) -> Result<Vec<DailyWeather>, ImportError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let weather = rdr
        .deserialize::<DailyWeather>()
        .collect::<Result<Vec<_>, _>>()?;
    debug!(days = weather.len(), "parsed weather series");
    Ok(weather)
}

/// Reads and parses a weather CSV file.
///
/// # Errors
///
/// Returns an `ImportError` if the file cannot be read or parsed.
pub fn read_weather_csv(path: &Path) -> Result<Vec<DailyWeather>, ImportError> {
    let file = File::open(path).map_err(|source| ImportError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_weather_csv(std::io::BufReader::new(file))
}
