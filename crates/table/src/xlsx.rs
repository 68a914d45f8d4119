use crate::cell::CellValue;
use crate::error::{Result, TableError};
use crate::table::{Row, Table};
use calamine::{open_workbook, Data, Reader, Xlsx};
use rust_xlsxwriter::Workbook;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Convert calamine Data to CellValue
fn data_to_cell_value(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Null,
        Data::Bool(b) => CellValue::Bool(*b),
        Data::Int(i) => CellValue::Int(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::String(s) => CellValue::String(s.clone()),
        // Excel stores dates as day serials since 1899-12-30
        Data::DateTime(dt) => CellValue::Float(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::String(s.clone()),
        Data::Error(e) => CellValue::String(format!("#ERROR: {e:?}")),
    }
}

impl Table {
    /// Load a table from the first sheet of an Excel file.
    ///
    /// The first row is the header row.
    pub fn from_xlsx<P: AsRef<Path>>(path: P) -> Result<(Self, Vec<String>)> {
        let mut workbook: Xlsx<BufReader<File>> = open_workbook(path.as_ref())
            .map_err(|e: calamine::XlsxError| TableError::Spreadsheet(e.to_string()))?;

        let sheet_names = workbook.sheet_names().to_vec();
        let first = sheet_names.first().ok_or_else(|| {
            TableError::EmptyDataset("Workbook contains no sheets".to_string())
        })?;

        let range = workbook
            .worksheet_range(first)
            .map_err(|e| TableError::Spreadsheet(e.to_string()))?;

        let mut sheet_rows = range.rows();
        let header_row = sheet_rows.next().ok_or_else(|| {
            TableError::EmptyDataset(format!("Sheet '{first}' is empty"))
        })?;
        let headers: Vec<String> = header_row
            .iter()
            .map(|c| data_to_cell_value(c).as_str())
            .collect();

        let mut rows = Vec::new();
        for sheet_row in sheet_rows {
            let row: Row = headers
                .iter()
                .zip(sheet_row.iter())
                .map(|(name, data)| (name.clone(), data_to_cell_value(data)))
                .collect();
            rows.push(row);
        }

        Ok((Table::from_rows(rows), headers))
    }

    /// Save the table to an Excel file with a single named worksheet
    pub fn save_as_xlsx<P: AsRef<Path>>(
        &self,
        path: P,
        headers: &[String],
        sheet_name: &str,
    ) -> Result<()> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet
            .set_name(sheet_name)
            .map_err(|e| TableError::Spreadsheet(e.to_string()))?;

        for (col_idx, name) in headers.iter().enumerate() {
            worksheet
                .write_string(0, col_idx as u16, name)
                .map_err(|e| TableError::Spreadsheet(e.to_string()))?;
        }

        for (row_idx, row) in self.rows().iter().enumerate() {
            let row_num = (row_idx + 1) as u32;
            for (col_idx, name) in headers.iter().enumerate() {
                let col_num = col_idx as u16;
                match row.get(name).unwrap_or(&CellValue::Null) {
                    CellValue::Null => {} // Leave empty
                    CellValue::Bool(b) => {
                        worksheet
                            .write_boolean(row_num, col_num, *b)
                            .map_err(|e| TableError::Spreadsheet(e.to_string()))?;
                    }
                    CellValue::Int(i) => {
                        worksheet
                            .write_number(row_num, col_num, *i as f64)
                            .map_err(|e| TableError::Spreadsheet(e.to_string()))?;
                    }
                    CellValue::Float(f) => {
                        worksheet
                            .write_number(row_num, col_num, *f)
                            .map_err(|e| TableError::Spreadsheet(e.to_string()))?;
                    }
                    CellValue::String(s) => {
                        worksheet
                            .write_string(row_num, col_num, s)
                            .map_err(|e| TableError::Spreadsheet(e.to_string()))?;
                    }
                }
            }
        }

        workbook
            .save(path.as_ref())
            .map_err(|e| TableError::Spreadsheet(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xlsx_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.xlsx");

        let (table, headers) = Table::from_csv_str("name,age\nAlice,30\nBob,").unwrap();
        table.save_as_xlsx(&path, &headers, "Cleaned Data").unwrap();

        let (loaded, loaded_headers) = Table::from_xlsx(&path).unwrap();
        assert_eq!(loaded_headers, headers);
        assert_eq!(loaded.row_count(), 2);
        assert_eq!(loaded.cell(0, "name"), &CellValue::from("Alice"));
        assert_eq!(loaded.cell(0, "age"), &CellValue::Float(30.0));
    }
}
