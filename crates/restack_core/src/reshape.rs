//! Wide-to-long reshaping.
//!
//! A wide table stores a repeated measurement block as `count` copies of
//! `length` columns side by side. [`cut_and_stack`] folds those copies into
//! `count` rows per input row:
//!
//! ```text
//! id a1 b1 a2 b2          id a  b
//!  1 10 20 11 21   ==>     1 10 20
//!                          1 11 21
//! ```
//!
//! Columns before the cut region (the prefix) and after it (the suffix) are
//! repeated on every output row. Skip columns that sit inside the cut span
//! are constants of the wide row; they are hoisted out and emitted once
//! per output row directly after the prefix.

use crate::cell::Cell;
use crate::error::{ReshapeError, Result};
use crate::naming::MergeNaming;
use crate::table::Table;
use std::collections::BTreeSet;

/// Where the repeated block sits in the wide table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CutSpec {
    /// Index of the first column of the first repetition.
    pub start: usize,
    /// Non-skipped columns per repetition.
    pub length: usize,
    /// Number of repetitions.
    pub count: usize,
    /// Column indexes excluded from the repetition walk.
    pub skip: BTreeSet<usize>,
    /// Exclusive end of the cut span. When given, the span must hold exactly
    /// `length * count` non-skipped columns.
    pub end: Option<usize>,
}

impl CutSpec {
    pub fn new(start: usize, length: usize, count: usize) -> Self {
        Self {
            start,
            length,
            count,
            ..Self::default()
        }
    }

    pub fn with_skip<I: IntoIterator<Item = usize>>(mut self, skip: I) -> Self {
        self.skip.extend(skip);
        self
    }

    pub fn with_end(mut self, end: usize) -> Self {
        self.end = Some(end);
        self
    }

    /// Resolve the spec against a table of `columns` columns.
    ///
    /// All validation happens here, before any row is touched.
    pub fn plan(&self, columns: usize) -> Result<CutPlan> {
        if self.length == 0 || self.count == 0 {
            return Err(ReshapeError::InvalidCut(format!(
                "length ({}) and count ({}) must both be positive",
                self.length, self.count
            )));
        }
        if self.start > columns {
            return Err(ReshapeError::InvalidCut(format!(
                "start {} is past the last column ({} columns)",
                self.start, columns
            )));
        }
        if let Some(&bad) = self.skip.iter().find(|&&i| i >= columns) {
            return Err(ReshapeError::InvalidCut(format!(
                "skip column {} is out of range ({} columns)",
                bad, columns
            )));
        }
        let expected = self.length.checked_mul(self.count).ok_or_else(|| {
            ReshapeError::InvalidCut(format!("{} x {} columns overflows", self.length, self.count))
        })?;

        // the span can never hold more than the columns after `start`
        let mut unit = Vec::with_capacity(expected.min(columns - self.start));
        let mut hoisted = Vec::new();

        let cut_end = match self.end {
            Some(end) => {
                if end < self.start || end > columns {
                    return Err(ReshapeError::InvalidCut(format!(
                        "end {} must lie between start {} and {} columns",
                        end, self.start, columns
                    )));
                }
                for i in self.start..end {
                    if self.skip.contains(&i) {
                        hoisted.push(i);
                    } else {
                        unit.push(i);
                    }
                }
                if unit.len() != expected {
                    return Err(ReshapeError::MisalignedCut {
                        start: self.start,
                        end,
                        found: unit.len(),
                        expected,
                    });
                }
                end
            }
            None => {
                let mut i = self.start;
                while unit.len() < expected && i < columns {
                    if self.skip.contains(&i) {
                        hoisted.push(i);
                    } else {
                        unit.push(i);
                    }
                    i += 1;
                }
                if unit.len() < expected {
                    return Err(ReshapeError::MisalignedCut {
                        start: self.start,
                        end: columns,
                        found: unit.len(),
                        expected,
                    });
                }
                i
            }
        };

        Ok(CutPlan {
            length: self.length,
            count: self.count,
            prefix: (0..self.start).collect(),
            hoisted,
            unit,
            suffix: (cut_end..columns).collect(),
        })
    }
}

/// Column indexes of a resolved cut, in output order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CutPlan {
    pub length: usize,
    pub count: usize,
    pub prefix: Vec<usize>,
    pub hoisted: Vec<usize>,
    /// `count` consecutive runs of `length` indexes.
    pub unit: Vec<usize>,
    pub suffix: Vec<usize>,
}

impl CutPlan {
    /// Unit column indexes of repetition `rep`.
    pub fn repetition(&self, rep: usize) -> &[usize] {
        &self.unit[rep * self.length..(rep + 1) * self.length]
    }

    fn shared(&self) -> impl Iterator<Item = usize> + '_ {
        self.prefix.iter().chain(&self.hoisted).copied()
    }
}

/// Fold the repeated block described by `spec` into rows.
///
/// Output columns are prefix, hoisted skip columns, one merged name per unit
/// position, then suffix. Input row `j` becomes output rows
/// `j * count .. (j + 1) * count`.
pub fn cut_and_stack(table: &Table, spec: &CutSpec, naming: &dyn MergeNaming) -> Result<Table> {
    let plan = spec.plan(table.column_count())?;
    let names = table.columns();

    let mut columns: Vec<String> = plan.shared().map(|i| names[i].clone()).collect();
    columns.extend(merged_names(names, &plan, naming)?);
    columns.extend(plan.suffix.iter().map(|&i| names[i].clone()));

    let mut rows = Vec::with_capacity(table.row_count() * plan.count);
    for row in table.rows() {
        for rep in 0..plan.count {
            let mut out: Vec<Cell> = Vec::with_capacity(columns.len());
            out.extend(plan.shared().map(|i| row[i].clone()));
            out.extend(plan.repetition(rep).iter().map(|&i| row[i].clone()));
            out.extend(plan.suffix.iter().map(|&i| row[i].clone()));
            rows.push(out);
        }
    }

    tracing::debug!(
        wide_rows = table.row_count(),
        long_rows = rows.len(),
        hoisted = plan.hoisted.len(),
        "Stacked cut region"
    );

    Table::new(columns, rows)
}

fn merged_names(names: &[String], plan: &CutPlan, naming: &dyn MergeNaming) -> Result<Vec<String>> {
    let first = plan.repetition(0);
    if plan.count == 1 {
        return Ok(first.iter().map(|&i| names[i].clone()).collect());
    }
    let second = plan.repetition(1);

    first
        .iter()
        .zip(second)
        .enumerate()
        .map(|(position, (&a, &b))| {
            naming
                .merge(&names[a], &names[b])
                .ok_or_else(|| ReshapeError::AmbiguousMergeName {
                    position,
                    first: names[a].clone(),
                    second: names[b].clone(),
                })
        })
        .collect()
}
