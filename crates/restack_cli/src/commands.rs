use crate::{CutArgs, NamingArg};
use anyhow::{Context, Result};
use restack_core::config::{CutConfig, NamingConfig, NamingStrategy};
use restack_core::{cut_and_stack, naming, pipeline, stats, RestackConfig, Table};
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;

/// `restack run`
pub fn run(
    mut config: RestackConfig,
    data_dir: Option<PathBuf>,
    output: Option<PathBuf>,
    summary: Option<PathBuf>,
) -> Result<()> {
    if let Some(dir) = data_dir {
        config.input.data_dir = dir;
    }
    if output.is_some() {
        config.output.csv = output;
    }
    if summary.is_some() {
        config.output.summary = summary;
    }

    let (table, report) = pipeline::run(&config)?;
    if config.output.csv.is_none() {
        table.write_csv(io::stdout().lock())?;
    }
    info!(
        "Done: {} files, {} wide columns -> {} rows x {} columns",
        report.files, report.wide_columns, report.rows, report.long_columns
    );
    Ok(())
}

/// `restack cut`
pub fn cut(config: &RestackConfig, input: &Path, args: &CutArgs, output: Option<PathBuf>) -> Result<()> {
    let cut = resolve_cut(config.cut.as_ref(), args)?;
    let naming_config = resolve_naming(&config.naming, args);
    let namer = naming::from_config(&naming_config)?;

    let wide = Table::load_csv(input)?;
    info!(
        "Read {} rows x {} columns from {}",
        wide.row_count(),
        wide.column_count(),
        input.display()
    );
    let long = cut_and_stack(&wide, &cut.to_spec(), namer.as_ref())
        .with_context(|| format!("Failed to stack {}", input.display()))?;

    emit(&long, output)
}

/// `restack summary`
pub fn summary(input: &Path, output: Option<PathBuf>) -> Result<()> {
    let table = Table::load_csv(input)?;
    emit(&stats::summarize(&table), output)
}

fn emit(table: &Table, output: Option<PathBuf>) -> Result<()> {
    match output {
        Some(path) => {
            table.save_csv(&path)?;
            info!("Wrote {} rows to {}", table.row_count(), path.display());
            Ok(())
        }
        None => table.write_csv(io::stdout().lock()),
    }
}

/// Merge cut flags over the config's `[cut]` section.
fn resolve_cut(base: Option<&CutConfig>, args: &CutArgs) -> Result<CutConfig> {
    let field = |flag: Option<usize>, from_config: Option<usize>, name: &str| {
        flag.or(from_config)
            .with_context(|| format!("--{} is required (or set it in [cut])", name))
    };
    let skip = if args.skip.is_empty() {
        base.map(|c| c.skip.clone()).unwrap_or_default()
    } else {
        args.skip.clone()
    };
    Ok(CutConfig {
        start: field(args.start, base.map(|c| c.start), "start")?,
        length: field(args.length, base.map(|c| c.length), "length")?,
        count: field(args.count, base.map(|c| c.count), "count")?,
        skip,
        end: args.end.or(base.and_then(|c| c.end)),
    })
}

fn resolve_naming(base: &NamingConfig, args: &CutArgs) -> NamingConfig {
    let strategy = match args.naming {
        Some(NamingArg::CommonSubstring) => NamingStrategy::CommonSubstring,
        Some(NamingArg::Pattern) => NamingStrategy::Pattern,
        None if args.pattern.is_some() => NamingStrategy::Pattern,
        None => base.strategy,
    };
    NamingConfig {
        strategy,
        pattern: args.pattern.clone().or_else(|| base.pattern.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config_cut() {
        let base = CutConfig {
            start: 1,
            length: 2,
            count: 16,
            skip: vec![5],
            end: None,
        };
        let args = CutArgs {
            count: Some(8),
            ..CutArgs::default()
        };
        let cut = resolve_cut(Some(&base), &args).unwrap();
        assert_eq!(cut.start, 1);
        assert_eq!(cut.count, 8);
        assert_eq!(cut.skip, vec![5]);
    }

    #[test]
    fn test_missing_cut_field_is_reported() {
        let args = CutArgs {
            start: Some(1),
            length: Some(2),
            ..CutArgs::default()
        };
        let err = resolve_cut(None, &args).unwrap_err();
        assert!(err.to_string().contains("--count"));
    }

    #[test]
    fn test_pattern_flag_implies_pattern_naming() {
        let args = CutArgs {
            pattern: Some(r"\d+$".to_string()),
            ..CutArgs::default()
        };
        let naming = resolve_naming(&NamingConfig::default(), &args);
        assert_eq!(naming.strategy, NamingStrategy::Pattern);
        assert_eq!(naming.pattern.as_deref(), Some(r"\d+$"));
    }
}
