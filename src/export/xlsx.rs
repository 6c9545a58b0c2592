use std::fs;
use std::path::{Path, PathBuf};
use calamine::{open_workbook, Data, Reader, Xlsx};
use log::{debug, info};
use rust_xlsxwriter::{Format, Workbook};
use crate::config::OutputConfig;
use crate::error::{Error, Result};
use crate::export::TablePersister;
use crate::models::{CellValue, ColumnKind, MarketRecord, MarketTable, COLUMNS};

/// Writes the market table to a single-sheet xlsx workbook.
#[derive(Debug, Clone)]
pub struct XlsxExporter {
    path: PathBuf,
    sheet_name: String,
}

impl XlsxExporter {
    pub fn new(path: impl Into<PathBuf>, sheet_name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            sheet_name: sheet_name.into(),
        }
    }

    pub fn from_config(config: &OutputConfig) -> Self {
        Self::new(config.path.clone(), config.sheet_name.clone())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Header row plus one row per record, no index column. Replaces any existing file.
    pub fn write_table(&self, table: &MarketTable) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut workbook = Workbook::new();
        let header_format = Format::new().set_bold();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(self.sheet_name.as_str())?;

        for (col, column) in COLUMNS.iter().enumerate() {
            worksheet.write_string_with_format(0, col as u16, column.header, &header_format)?;
        }

        for (i, record) in table.iter().enumerate() {
            let row = (i + 1) as u32;
            for (col, value) in record.cells().into_iter().enumerate() {
                match value {
                    CellValue::Text(text) => {
                        worksheet.write_string(row, col as u16, text)?;
                    }
                    CellValue::Number(Some(n)) if n.is_finite() => {
                        worksheet.write_number(row, col as u16, n)?;
                    }
                    // Blank cell for unknown figures.
                    CellValue::Number(_) => {}
                }
            }
        }
        worksheet.autofit();

        workbook.save(&self.path)?;
        debug!("Wrote {} rows to {:?}", table.len(), self.path);
        Ok(())
    }

    /// Loads the sheet back, checking the header row against the column schema.
    pub fn read_table(&self) -> Result<MarketTable> {
        let mut workbook: Xlsx<_> = open_workbook(&self.path)?;
        let range = workbook.worksheet_range(&self.sheet_name)?;
        let mut rows = range.rows();

        let header = rows
            .next()
            .ok_or_else(|| Error::Spreadsheet(format!("sheet '{}' is empty", self.sheet_name)))?;
        if header.len() != COLUMNS.len() {
            return Err(Error::Spreadsheet(format!(
                "expected {} columns, found {}",
                COLUMNS.len(),
                header.len()
            )));
        }
        for (col, column) in COLUMNS.iter().enumerate() {
            match &header[col] {
                Data::String(h) if h == column.header => {}
                other => {
                    return Err(Error::Spreadsheet(format!(
                        "column {} header is {:?}, expected '{}'",
                        col + 1,
                        other,
                        column.header
                    )));
                }
            }
        }

        let mut records = Vec::new();
        for (i, row) in rows.enumerate() {
            let mut record = MarketRecord::default();
            for (col, column) in COLUMNS.iter().enumerate() {
                let cell = row.get(col).unwrap_or(&Data::Empty);
                let value = cell_value(column.kind, cell).ok_or_else(|| {
                    Error::Spreadsheet(format!(
                        "row {} column '{}' has unexpected cell {:?}",
                        i + 2,
                        column.header,
                        cell
                    ))
                })?;
                column.assign(&mut record, value);
            }
            records.push(record);
        }

        Ok(MarketTable::new(records))
    }
}

fn cell_value(kind: ColumnKind, cell: &Data) -> Option<CellValue> {
    match (kind, cell) {
        (ColumnKind::Text, Data::String(s)) => Some(CellValue::Text(s.clone())),
        (ColumnKind::Text, Data::Empty) => Some(CellValue::Text(String::new())),
        (ColumnKind::Number, Data::Float(n)) => Some(CellValue::Number(Some(*n))),
        (ColumnKind::Number, Data::Int(n)) => Some(CellValue::Number(Some(*n as f64))),
        (ColumnKind::Number, Data::Empty) => Some(CellValue::Number(None)),
        _ => None,
    }
}

impl TablePersister for XlsxExporter {
    fn persist(&self, table: &MarketTable) -> Result<()> {
        self.write_table(table)?;
        info!("Excel file {:?} updated successfully ({} rows)", self.path, table.len());
        Ok(())
    }
}
