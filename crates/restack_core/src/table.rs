//! Rectangular tables of named columns, plus CSV input/output.

use crate::cell::Cell;
use crate::error::{ReshapeError, Result as ReshapeResult};
use anyhow::{Context, Result};
use std::io::{Read, Write};
use std::path::Path;

/// A rectangular table. Column names need not be unique.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Build a table, checking that every row has one cell per column.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> ReshapeResult<Self> {
        for (row, values) in rows.iter().enumerate() {
            if values.len() != columns.len() {
                return Err(ReshapeError::RowLength {
                    row,
                    expected: columns.len(),
                    found: values.len(),
                });
            }
        }
        Ok(Self { columns, rows })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All cells of one column, top to bottom.
    pub fn column(&self, index: usize) -> impl Iterator<Item = &Cell> + '_ {
        self.rows.iter().filter_map(move |row| row.get(index))
    }

    // ========================================================================
    // CSV
    // ========================================================================

    /// Write a header line of column names followed by one line per row.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut out = csv::WriterBuilder::new().flexible(false).from_writer(writer);
        out.write_record(&self.columns)
            .context("Failed to write CSV header")?;
        for row in &self.rows {
            out.write_record(row.iter().map(|c| c.to_string()))
                .context("Failed to write CSV row")?;
        }
        out.flush().context("Failed to flush CSV output")?;
        Ok(())
    }

    /// Read a CSV with a header line, inferring cell types.
    pub fn read_csv<R: Read>(reader: R) -> Result<Self> {
        let mut input = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .from_reader(reader);
        let columns: Vec<String> = input
            .headers()
            .context("Failed to read CSV header")?
            .iter()
            .map(str::to_string)
            .collect();
        let mut rows = Vec::new();
        for (i, record) in input.records().enumerate() {
            let record = record.with_context(|| format!("Failed to read CSV record {}", i + 1))?;
            rows.push(record.iter().map(Cell::parse).collect());
        }
        Ok(Self::new(columns, rows)?)
    }

    pub fn save_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path.as_ref())
            .with_context(|| format!("Failed to create {}", path.as_ref().display()))?;
        self.write_csv(std::io::BufWriter::new(file))
            .with_context(|| format!("Failed to write {}", path.as_ref().display()))
    }

    pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path.as_ref())
            .with_context(|| format!("Failed to open {}", path.as_ref().display()))?;
        Self::read_csv(std::io::BufReader::new(file))
            .with_context(|| format!("Failed to parse {}", path.as_ref().display()))
    }
}
