use crate::cell::CellValue;
use crate::error::{Result, TableError};
use crate::table::{Row, Table};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

fn check_headers(headers: &[String]) -> Result<()> {
    for (i, name) in headers.iter().enumerate() {
        if headers[..i].contains(name) {
            return Err(TableError::DuplicateColumnName { name: name.clone() });
        }
    }
    Ok(())
}

impl Table {
    /// Load a table from a CSV file.
    ///
    /// The first record is the header row; remaining fields go through
    /// [`CellValue::parse`] type inference. Returns the table plus the header
    /// list in file order.
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<(Self, Vec<String>)> {
        let file = File::open(path.as_ref())?;
        Self::from_csv_reader(BufReader::new(file))
    }

    /// Load a table from a CSV string
    pub fn from_csv_str(content: &str) -> Result<(Self, Vec<String>)> {
        Self::from_csv_reader(content.as_bytes())
    }

    /// Load a table from a reader
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<(Self, Vec<String>)> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut records = csv_reader.records();
        let header_record = records
            .next()
            .transpose()?
            .ok_or_else(|| TableError::EmptyDataset("CSV input has no rows".to_string()))?;
        let headers: Vec<String> = header_record.iter().map(str::to_string).collect();
        check_headers(&headers)?;

        let mut rows = Vec::new();
        for result in records {
            let record = result?;
            let row: Row = headers
                .iter()
                .zip(record.iter())
                .map(|(name, field)| (name.clone(), CellValue::parse(field)))
                .collect();
            rows.push(row);
        }

        Ok((Table::from_rows(rows), headers))
    }

    /// Save the table to a CSV file
    pub fn save_as_csv<P: AsRef<Path>>(&self, path: P, headers: &[String]) -> Result<()> {
        let file = File::create(path)?;
        self.write_csv(BufWriter::new(file), headers)
    }

    /// Write the table to a writer as CSV.
    ///
    /// Every field is double-quoted (embedded quotes are doubled by the csv
    /// crate) and missing cells render as the empty string.
    pub fn write_csv<W: Write>(&self, writer: W, headers: &[String]) -> Result<()> {
        let mut csv_writer = csv::WriterBuilder::new()
            .quote_style(csv::QuoteStyle::Always)
            .from_writer(writer);

        csv_writer.write_record(headers)?;
        for row in self.rows() {
            let record: Vec<String> = headers
                .iter()
                .map(|name| row.get(name).map(CellValue::as_str).unwrap_or_default())
                .collect();
            csv_writer.write_record(&record)?;
        }

        csv_writer.flush()?;
        Ok(())
    }

    /// Convert the table to a CSV string
    #[must_use]
    pub fn to_csv_string(&self, headers: &[String]) -> String {
        let mut buffer = Vec::new();
        // Writing to a Vec cannot fail
        let _ = self.write_csv(&mut buffer, headers);
        String::from_utf8_lossy(&buffer).to_string()
    }
}
