//! CSV export for monthly plan costs and hour-of-week averages.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::usage::{HourlyAverage, MonthlyStats};

/// Column header for the monthly cost export.
const MONTHLY_HEADER: &str = "month,total_kwh,peak_kwh,off_peak_kwh,\
                              flat_cost,tou_cost,tou_super_cost";

/// Column header for the hour-of-week export.
const HOURLY_HEADER: &str = "weekday,hour,average_kwh";

fn create(path: &Path) -> io::Result<io::BufWriter<File>> {
    Ok(io::BufWriter::new(File::create(path)?))
}

/// Exports monthly stats to a CSV file at the given path.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_monthly_csv(months: &[MonthlyStats], path: &Path) -> io::Result<()> {
    write_monthly_csv(months, create(path)?)
}

/// Writes one row per month, values to two decimals. Output is deterministic
/// for identical inputs.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_monthly_csv(months: &[MonthlyStats], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(MONTHLY_HEADER.split(',').map(str::trim))?;
    for m in months {
        wtr.write_record(&[
            m.month.to_string(),
            format!("{:.2}", m.total_usage),
            format!("{:.2}", m.peak_usage),
            format!("{:.2}", m.off_peak_usage),
            format!("{:.2}", m.flat_cost),
            format!("{:.2}", m.tou_cost),
            format!("{:.2}", m.tou_super_cost),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Exports hour-of-week averages to a CSV file at the given path.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_hourly_csv(hours: &[HourlyAverage], path: &Path) -> io::Result<()> {
    write_hourly_csv(hours, create(path)?)
}

/// Writes one row per hour-of-week cell, averages to three decimals.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_hourly_csv(hours: &[HourlyAverage], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HOURLY_HEADER.split(','))?;
    for h in hours {
        wtr.write_record(&[
            h.weekday.to_string(),
            h.hour.to_string(),
            format!("{:.3}", h.average),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
