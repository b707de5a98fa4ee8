use clap::{Parser, Subcommand, ValueEnum};
use restack_core::RestackConfig;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser, Debug)]
#[command(name = "restack", author, version, about, long_about = None)]
struct Args {
    /// Path to the TOML config file (missing file = defaults)
    #[arg(short, long, global = true, env = "RESTACK_CONFIG", default_value = "restack.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Reshape a directory of trial logs into a long-table CSV
    Run {
        /// Directory of per-line JSON trial logs
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Long-table CSV (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also write a per-column mean / SEM CSV here
        #[arg(long)]
        summary: Option<PathBuf>,
    },

    /// Fold repeated column blocks of a wide CSV into rows
    Cut {
        /// Wide CSV with a header line
        input: PathBuf,

        #[command(flatten)]
        cut: CutArgs,

        /// Long-table CSV (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Mean and standard error of every numeric column of a CSV
    Summary {
        /// CSV with a header line
        input: PathBuf,

        /// Summary CSV (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Cut region flags. Anything left out falls back to the config's `[cut]`.
#[derive(clap::Args, Debug, Default)]
pub struct CutArgs {
    /// Index of the first column of the first repetition
    #[arg(long)]
    pub start: Option<usize>,

    /// Columns per repetition, skipped columns excluded
    #[arg(long)]
    pub length: Option<usize>,

    /// Number of repetitions
    #[arg(long)]
    pub count: Option<usize>,

    /// Column indexes to keep out of the repetition walk
    #[arg(long, value_delimiter = ',')]
    pub skip: Vec<usize>,

    /// Exclusive end of the cut span, checked against length x count
    #[arg(long)]
    pub end: Option<usize>,

    /// How repeated column names are merged
    #[arg(long, value_enum)]
    pub naming: Option<NamingArg>,

    /// Regex stripped from names with `--naming pattern`
    #[arg(long)]
    pub pattern: Option<String>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum NamingArg {
    /// Longest common substring of the first two repetitions
    CommonSubstring,
    /// Strip `--pattern` from both names
    Pattern,
}

fn main() -> anyhow::Result<()> {
    // logs go to stderr so CSV on stdout stays clean
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let config = RestackConfig::load_or_default(&args.config)?;
    debug!("Loaded config from {}", args.config.display());

    match args.command {
        Command::Run {
            data_dir,
            output,
            summary,
        } => commands::run(config, data_dir, output, summary),
        Command::Cut { input, cut, output } => commands::cut(&config, &input, &cut, output),
        Command::Summary { input, output } => commands::summary(&input, output),
    }
}
