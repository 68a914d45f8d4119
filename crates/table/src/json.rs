//! JSON support for Table
//!
//! Reads and writes tables as an array of row objects:
//! `[{"name": "Alice", "age": 30}, ...]`

use crate::cell::CellValue;
use crate::error::{Result, TableError};
use crate::table::{Row, Table};
use serde_json::{Map, Number, Value};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

fn json_value_to_cell(value: &Value) -> CellValue {
    match value {
        Value::Null => CellValue::Null,
        Value::Bool(b) => CellValue::Bool(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Int(i)
            } else {
                CellValue::Float(n.as_f64().unwrap_or(0.0))
            }
        }
        Value::String(s) => CellValue::String(s.clone()),
        other => CellValue::String(other.to_string()),
    }
}

fn cell_to_json_value(cell: &CellValue) -> Value {
    match cell {
        CellValue::Null => Value::Null,
        CellValue::Bool(b) => Value::Bool(*b),
        CellValue::Int(i) => Value::Number(Number::from(*i)),
        CellValue::Float(f) => Number::from_f64(*f).map_or(Value::Null, Value::Number),
        CellValue::String(s) => Value::String(s.clone()),
    }
}

impl Table {
    /// Load a table from a JSON file containing an array of objects
    pub fn from_json<P: AsRef<Path>>(path: P) -> Result<(Self, Vec<String>)> {
        let file = File::open(path.as_ref())?;
        Self::from_json_reader(BufReader::new(file))
    }

    /// Load a table from a JSON string containing an array of objects
    pub fn from_json_str(content: &str) -> Result<(Self, Vec<String>)> {
        Self::from_json_reader(content.as_bytes())
    }

    /// Load a table from a reader.
    ///
    /// The header list is taken from the first object's keys in order.
    pub fn from_json_reader<R: Read>(reader: R) -> Result<(Self, Vec<String>)> {
        let value: Value = serde_json::from_reader(reader)
            .map_err(|e| TableError::Parse(format!("Invalid JSON: {e}")))?;

        let array = value
            .as_array()
            .ok_or_else(|| TableError::Parse("JSON must be an array of objects".to_string()))?;

        if array.is_empty() {
            return Err(TableError::EmptyDataset(
                "JSON input has no rows".to_string(),
            ));
        }

        let first_obj = array[0]
            .as_object()
            .ok_or_else(|| TableError::Parse("Array elements must be objects".to_string()))?;
        let headers: Vec<String> = first_obj.keys().cloned().collect();

        let mut rows = Vec::with_capacity(array.len());
        for (idx, item) in array.iter().enumerate() {
            let obj = item.as_object().ok_or_else(|| {
                TableError::Parse(format!("Element at index {idx} must be an object"))
            })?;

            let row: Row = headers
                .iter()
                .map(|name| {
                    let value = obj.get(name).unwrap_or(&Value::Null);
                    (name.clone(), json_value_to_cell(value))
                })
                .collect();
            rows.push(row);
        }

        Ok((Table::from_rows(rows), headers))
    }

    /// Save the table to a JSON file as a pretty-printed array of objects
    pub fn save_as_json<P: AsRef<Path>>(&self, path: P, headers: &[String]) -> Result<()> {
        let file = File::create(path)?;
        self.write_json(BufWriter::new(file), headers)
    }

    /// Write the table to a writer as a pretty-printed JSON array
    pub fn write_json<W: Write>(&self, writer: W, headers: &[String]) -> Result<()> {
        let json_array: Vec<Map<String, Value>> = self
            .rows()
            .iter()
            .map(|row| {
                headers
                    .iter()
                    .map(|name| {
                        let cell = row.get(name).unwrap_or(&CellValue::Null);
                        (name.clone(), cell_to_json_value(cell))
                    })
                    .collect()
            })
            .collect();

        serde_json::to_writer_pretty(writer, &json_array)
            .map_err(|e| TableError::Serialize(format!("JSON write error: {e}")))?;
        Ok(())
    }

    /// Convert the table to a pretty-printed JSON string
    pub fn to_json_string(&self, headers: &[String]) -> Result<String> {
        let mut buffer = Vec::new();
        self.write_json(&mut buffer, headers)?;
        // serde_json always outputs valid UTF-8
        String::from_utf8(buffer).map_err(|e| TableError::Serialize(e.to_string()))
    }
}
