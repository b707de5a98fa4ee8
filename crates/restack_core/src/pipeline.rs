//! End-to-end run: trial logs in, long-table CSV out.

use crate::cell::Cell;
use crate::config::RestackConfig;
use crate::fill::fill_missing_columns;
use crate::flatten::flatten;
use crate::naming;
use crate::reshape::cut_and_stack;
use crate::stats;
use crate::table::Table;
use crate::trials::{discover_logs, load_json_lines, LogFile};
use anyhow::{bail, Context, Result};
use serde_json::Value;
use tracing::{debug, info};

/// What a run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineReport {
    pub files: usize,
    pub wide_columns: usize,
    pub long_columns: usize,
    pub rows: usize,
}

/// Read one log and flatten it into a wide row keyed by the file stem.
pub fn wide_row(log: &LogFile) -> Result<(Vec<String>, Vec<Cell>)> {
    let records = load_json_lines(&log.path)?;
    debug!("{}: {} records", log.stem, records.len());
    Ok(flatten(&Value::Array(records), Some(Cell::Text(log.stem.clone()))))
}

/// Align wide rows and apply the configured cut, without touching the
/// file system.
pub fn reshape(
    rows: Vec<(Vec<String>, Vec<Cell>)>,
    config: &RestackConfig,
) -> Result<Table> {
    let wide = fill_missing_columns(rows)?;
    let Some(cut) = &config.cut else {
        return Ok(wide);
    };
    let namer = naming::from_config(&config.naming)?;
    let long = cut_and_stack(&wide, &cut.to_spec(), namer.as_ref())
        .with_context(|| format!("Failed to stack {} wide columns", wide.column_count()))?;
    Ok(long)
}

/// Run the whole pipeline as configured.
pub fn run(config: &RestackConfig) -> Result<(Table, PipelineReport)> {
    let logs = discover_logs(&config.input)?;
    if logs.is_empty() {
        bail!("No trial logs found in {}", config.input.data_dir.display());
    }
    info!("Found {} trial logs in {}", logs.len(), config.input.data_dir.display());

    let rows = logs.iter().map(wide_row).collect::<Result<Vec<_>>>()?;
    let wide_columns = rows.iter().map(|(names, _)| names.len()).max().unwrap_or(0);

    let table = reshape(rows, config)?;
    info!(
        "Reshaped into {} rows x {} columns",
        table.row_count(),
        table.column_count()
    );

    if let Some(path) = &config.output.csv {
        table.save_csv(path)?;
        info!("Wrote {}", path.display());
    }
    if let Some(path) = &config.output.summary {
        stats::summarize(&table).save_csv(path)?;
        info!("Wrote summary {}", path.display());
    }

    let report = PipelineReport {
        files: logs.len(),
        wide_columns,
        long_columns: table.column_count(),
        rows: table.row_count(),
    };
    Ok((table, report))
}
