//! Align rows with differing column sets onto one column universe.
//!
//! Each row carries its own ordered column names. The union keeps the first
//! row's order as the base. Later rows are walked with a cursor into the
//! union: a known name moves the cursor past it, and a new name is inserted
//! at the cursor, directly after the union position of its row predecessor.
//! Every row's names stay a subsequence of the union. Missing cells become
//! [`Cell::Empty`].

use crate::cell::Cell;
use crate::error::{ReshapeError, Result};
use crate::table::Table;
use std::collections::hash_map::Entry;
use std::collections::{BinaryHeap, HashMap};

/// Build the column union of `rows` and pad every row to it.
///
/// Fails with [`ReshapeError::ColumnOrderConflict`] when the rows' column
/// orders contradict each other (or a row repeats a column), and with
/// [`ReshapeError::RowLength`] when a row's names and values differ in length.
pub fn fill_missing_columns(rows: Vec<(Vec<String>, Vec<Cell>)>) -> Result<Table> {
    for (i, (names, values)) in rows.iter().enumerate() {
        if names.len() != values.len() {
            return Err(ReshapeError::RowLength {
                row: i,
                expected: names.len(),
                found: values.len(),
            });
        }
    }

    let union = column_union(rows.iter().map(|(names, _)| names.as_slice()))?;
    tracing::debug!(rows = rows.len(), columns = union.len(), "Built column union");

    let filled = rows
        .into_iter()
        .map(|(names, values)| pad_row(&union, names, values))
        .collect();

    Table::new(union, filled)
}

/// Merge ordered name lists into one ordered union.
///
/// Every list must be a subsequence of the result. Consecutive names in a
/// list are ordering constraints, and the union is their topological order
/// with ties going to the most recently introduced name. Whenever the cursor
/// walk succeeds this is exactly its result: a new name lands right after its
/// row predecessor, ahead of the older names that followed it. A list that
/// reaches back behind the cursor without contradicting any other list still
/// merges. A cycle in the constraints is a
/// [`ReshapeError::ColumnOrderConflict`].
pub fn column_union<'a, I>(name_lists: I) -> Result<Vec<String>>
where
    I: IntoIterator<Item = &'a [String]>,
{
    // ids are assigned in order of first appearance
    let mut names: Vec<&'a str> = Vec::new();
    let mut ids: HashMap<&'a str, usize> = HashMap::new();
    let mut successors: Vec<Vec<usize>> = Vec::new();
    let mut indegree: Vec<usize> = Vec::new();
    // (before, after) -> first row that required it
    let mut edges: HashMap<(usize, usize), usize> = HashMap::new();

    for (row, list) in name_lists.into_iter().enumerate() {
        let mut previous: Option<usize> = None;
        for name in list {
            let id = *ids.entry(name.as_str()).or_insert_with(|| {
                names.push(name.as_str());
                successors.push(Vec::new());
                indegree.push(0);
                names.len() - 1
            });
            if let Some(before) = previous {
                if let Entry::Vacant(slot) = edges.entry((before, id)) {
                    slot.insert(row);
                    successors[before].push(id);
                    indegree[id] += 1;
                }
            }
            previous = Some(id);
        }
    }

    // max-heap: the newest ready name goes first
    let mut ready: BinaryHeap<usize> = (0..names.len())
        .filter(|&id| indegree[id] == 0)
        .collect();
    let mut placed = vec![false; names.len()];
    let mut union = Vec::with_capacity(names.len());

    while let Some(id) = ready.pop() {
        placed[id] = true;
        union.push(names[id].to_string());
        for &next in &successors[id] {
            indegree[next] -= 1;
            if indegree[next] == 0 {
                ready.push(next);
            }
        }
    }

    if let Some(column) = placed.iter().position(|done| !done) {
        // an unplaced column always has an unplaced predecessor
        let (before, row) = edges
            .iter()
            .filter(|((before, after), _)| *after == column && !placed[*before])
            .map(|(&(before, _), &row)| (before, row))
            .min_by_key(|&(_, row)| row)
            .unwrap_or((column, 0));
        return Err(ReshapeError::ColumnOrderConflict {
            row,
            column: names[column].to_string(),
            conflicts_with: names[before].to_string(),
        });
    }

    Ok(union)
}

fn pad_row(union: &[String], names: Vec<String>, values: Vec<Cell>) -> Vec<Cell> {
    let mut own = names.into_iter().zip(values).peekable();
    union
        .iter()
        .map(|column| match own.peek() {
            Some((name, _)) if name == column => own.next().map(|(_, v)| v).unwrap_or_default(),
            _ => Cell::Empty,
        })
        .collect()
}
