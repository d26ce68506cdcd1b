//! Spreadsheet export of scraped records.

use crate::catalogue::BookRecord;
use crate::error::ScrapeError;
use rust_xlsxwriter::{Format, Workbook};
use std::path::Path;
use tracing::info;

/// Header row, in column order.
pub const COLUMNS: [&str; 6] = ["BookID", "Title", "Price GBP", "Price USD", "Availability", "Rating"];

/// Name of the single worksheet.
pub const SHEET_NAME: &str = "Books";

/// Writes records to an `.xlsx` workbook: one header row, one row per record, no index column.
pub struct Exporter;

impl Exporter {
    /// Writes `records` to `path` and returns the number of data rows.
    ///
    /// An unwritable destination is an error; nothing is retried.
    pub fn export(records: &[BookRecord], path: impl AsRef<Path>) -> Result<usize, ScrapeError> {
        let path = path.as_ref();

        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(SHEET_NAME)?;

        let header = Format::new().set_bold();
        for (col, name) in COLUMNS.iter().enumerate() {
            worksheet.write_string_with_format(0, col as u16, *name, &header)?;
        }

        for (i, record) in records.iter().enumerate() {
            let row = i as u32 + 1;
            worksheet.write_string(row, 0, record.id().to_string())?;
            worksheet.write_string(row, 1, record.title())?;
            worksheet.write_number(row, 2, record.price_gbp())?;
            worksheet.write_number(row, 3, record.price_usd())?;
            worksheet.write_string(row, 4, record.availability())?;
            worksheet.write_string(row, 5, record.rating().as_str())?;
        }

        worksheet.autofit();
        workbook.save(path)?;

        info!("Saved {} books to {}", records.len(), path.display());
        Ok(records.len())
    }
}
