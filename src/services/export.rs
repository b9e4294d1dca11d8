use crate::models::reading::{ReconciledPair, RecognitionResult};
use chrono::{DateTime, Local};
use rust_xlsxwriter::{Format, Workbook};
use std::path::{Path, PathBuf};

pub const RESULTS_SHEET: &str = "Results";
pub const RAW_SHEET: &str = "Raw Data";
const PAIR_HEADERS: [&str; 3] = ["Entry", "Exit", "Difference"];
const RAW_HEADERS: [&str; 2] = ["File", "Reading"];

/// Spreadsheet writer for reconciled pairs
pub struct SpreadsheetExporter {
    file_suffix: String,
    include_raw_sheet: bool,
}

impl SpreadsheetExporter {
    pub fn new(file_suffix: impl Into<String>, include_raw_sheet: bool) -> Self {
        Self {
            file_suffix: file_suffix.into(),
            include_raw_sheet,
        }
    }

    /// File name stamped with the generation time, e.g. `2026-10-16_14-03-59-Mileage.xlsx`
    pub fn file_name(&self, generated_at: DateTime<Local>) -> String {
        format!(
            "{}-{}.xlsx",
            generated_at.format("%Y-%m-%d_%H-%M-%S"),
            self.file_suffix
        )
    }

    /// Write the workbook into `dir` and return the full path
    pub fn export_to_dir(
        &self,
        dir: &Path,
        pairs: &[ReconciledPair],
        results: &[RecognitionResult],
    ) -> Result<PathBuf, String> {
        let path = dir.join(self.file_name(Local::now()));
        let mut workbook = self.build_workbook(pairs, results)?;
        workbook
            .save(&path)
            .map_err(|e| format!("Failed to save XLSX file: {}", e))?;
        Ok(path)
    }

    /// Write the workbook into memory
    pub fn export_to_buffer(
        &self,
        pairs: &[ReconciledPair],
        results: &[RecognitionResult],
    ) -> Result<Vec<u8>, String> {
        let mut workbook = self.build_workbook(pairs, results)?;
        workbook
            .save_to_buffer()
            .map_err(|e| format!("Failed to write XLSX buffer: {}", e))
    }

    fn build_workbook(
        &self,
        pairs: &[ReconciledPair],
        results: &[RecognitionResult],
    ) -> Result<Workbook, String> {
        let mut workbook = Workbook::new();
        let header = Format::new().set_bold();

        let sheet = workbook
            .add_worksheet()
            .set_name(RESULTS_SHEET)
            .map_err(|e| format!("Failed to create sheet '{}': {}", RESULTS_SHEET, e))?;

        for (col, title) in PAIR_HEADERS.iter().enumerate() {
            sheet
                .write_string_with_format(0, col as u16, *title, &header)
                .map_err(|e| format!("Failed to write header: {}", e))?;
        }

        for (idx, pair) in pairs.iter().enumerate() {
            let row = idx as u32 + 1;
            for (col, value) in [pair.entry, pair.exit, pair.difference].iter().enumerate() {
                sheet
                    .write_number(row, col as u16, *value as f64)
                    .map_err(|e| format!("Failed to write row {}: {}", row, e))?;
            }
        }

        if self.include_raw_sheet {
            let raw = workbook
                .add_worksheet()
                .set_name(RAW_SHEET)
                .map_err(|e| format!("Failed to create sheet '{}': {}", RAW_SHEET, e))?;

            for (col, title) in RAW_HEADERS.iter().enumerate() {
                raw.write_string_with_format(0, col as u16, *title, &header)
                    .map_err(|e| format!("Failed to write header: {}", e))?;
            }

            for (idx, result) in results.iter().enumerate() {
                let row = idx as u32 + 1;
                raw.write_string(row, 0, &result.file_name)
                    .map_err(|e| format!("Failed to write row {}: {}", row, e))?;
                raw.write_string(row, 1, result.display_text())
                    .map_err(|e| format!("Failed to write row {}: {}", row, e))?;
            }
        }

        Ok(workbook)
    }
}
