//! Descriptive statistics over reshaped columns.

use crate::cell::Cell;
use crate::table::Table;

/// Summary of one numeric column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSummary {
    pub column: String,
    pub n: usize,
    pub mean: f64,
    /// `None` with fewer than two values.
    pub sem: Option<f64>,
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Standard error of the mean, using the sample standard deviation
/// (n - 1 in the denominator).
pub fn sem(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 2 {
        return None;
    }
    let m = mean(values)?;
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (n - 1) as f64;
    Some(variance.sqrt() / (n as f64).sqrt())
}

/// Summarize every column that holds at least one numeric cell.
pub fn summarize_columns(table: &Table) -> Vec<ColumnSummary> {
    table
        .columns()
        .iter()
        .enumerate()
        .filter_map(|(i, name)| {
            let values: Vec<f64> = table.column(i).filter_map(Cell::as_f64).collect();
            let m = mean(&values)?;
            Some(ColumnSummary {
                column: name.clone(),
                n: values.len(),
                mean: m,
                sem: sem(&values),
            })
        })
        .collect()
}

/// [`summarize_columns`] as a table with columns `column, n, mean, sem`.
pub fn summarize(table: &Table) -> Table {
    let rows = summarize_columns(table)
        .into_iter()
        .map(|s| {
            vec![
                Cell::Text(s.column),
                Cell::Int(s.n as i64),
                Cell::Float(s.mean),
                s.sem.map(Cell::Float).unwrap_or_default(),
            ]
        })
        .collect();
    let columns = ["column", "n", "mean", "sem"].map(String::from).to_vec();
    // every row is built with four cells
    Table::new(columns, rows).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_mean_and_sem() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!(close(mean(&values).unwrap(), 5.0));
        // sample sd = sqrt(32 / 7)
        let expected = (32.0f64 / 7.0).sqrt() / 8.0f64.sqrt();
        assert!(close(sem(&values).unwrap(), expected));
    }

    #[test]
    fn test_degenerate_inputs() {
        assert_eq!(mean(&[]), None);
        assert_eq!(sem(&[]), None);
        assert_eq!(sem(&[3.0]), None);
        assert_eq!(sem(&[3.0, 3.0]), Some(0.0));
    }

    #[test]
    fn test_summarize_skips_text_and_empty() {
        let table = Table::new(
            vec!["id".into(), "block".into(), "rt".into()],
            vec![
                vec![Cell::Int(130), Cell::from("train"), Cell::Float(800.0)],
                vec![Cell::Int(131), Cell::from("test"), Cell::Empty],
                vec![Cell::Int(132), Cell::from("test"), Cell::from("600")],
            ],
        )
        .unwrap();
        let summary = summarize_columns(&table);
        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].column, "id");
        assert_eq!(summary[1].column, "rt");
        assert_eq!(summary[1].n, 2);
        assert!(close(summary[1].mean, 700.0));
        assert!(close(summary[1].sem.unwrap(), 100.0));
    }

    #[test]
    fn test_summary_table_shape() {
        let table = Table::new(vec!["rt".into()], vec![vec![Cell::Int(5)]]).unwrap();
        let out = summarize(&table);
        assert_eq!(out.columns(), &["column", "n", "mean", "sem"]);
        assert_eq!(
            out.rows(),
            &[vec![Cell::from("rt"), Cell::Int(1), Cell::Float(5.0), Cell::Empty]]
        );
    }
}
