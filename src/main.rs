use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use columnar_frame::{AggregateOp, ParseOptions, RowLengthPolicy, Table, infer_value};
use jemallocator::Jemalloc;
use tracing_subscriber::EnvFilter;

#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

/// Load a delimited text file and print a preview of the result
#[derive(Debug, Parser)]
#[command(name = "columnar-frame", version)]
struct Cli {
    /// Input file; the first non-empty line is the header
    path: PathBuf,

    /// Field separator
    #[arg(short, long, default_value_t = ',')]
    separator: char,

    /// Fail on rows whose field count differs from the header
    #[arg(long)]
    strict: bool,

    /// Keep only these columns, comma separated
    #[arg(long, value_delimiter = ',')]
    select: Vec<String>,

    /// Keep rows where COLUMN equals VALUE (VALUE is type-inferred)
    #[arg(long = "where", value_name = "COLUMN=VALUE")]
    filter: Option<String>,

    /// Split the table by this column before printing
    #[arg(long)]
    group_by: Option<String>,

    /// Aggregate a column, e.g. `value:sum`
    #[arg(long, value_name = "COLUMN:OP")]
    aggregate: Option<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let policy = if cli.strict {
        RowLengthPolicy::Strict
    } else {
        RowLengthPolicy::Pad
    };
    let options = ParseOptions::default()
        .with_separator(cli.separator)
        .with_row_length(policy);

    let mut table = Table::from_path(&cli.path, &options)
        .with_context(|| format!("failed to load {}", cli.path.display()))?;
    println!("Loaded {} rows x {} columns", table.num_rows(), table.num_columns());

    if let Some(expr) = &cli.filter {
        let (column, literal) = expr
            .split_once('=')
            .ok_or_else(|| anyhow!("--where expects COLUMN=VALUE, got {expr}"))?;
        let target = infer_value(literal.trim());
        table.column(column)?;
        table = table.filter(|row| row.get(column) == Some(&target))?;
    }

    if !cli.select.is_empty() {
        table = table.select(cli.select.as_slice())?;
    }

    let aggregate = cli.aggregate.as_deref().map(parse_aggregate).transpose()?;

    match &cli.group_by {
        Some(column) => {
            for (key, group) in table.group_by(column)? {
                println!("{column} = {key} ({} rows)", group.num_rows());
                println!("{group}");
                if let Some((agg_col, op)) = aggregate {
                    println!("{op}({agg_col}) = {}", group.aggregate_op(agg_col, op)?);
                }
            }
        }
        None => {
            println!("{table}");
            if let Some((agg_col, op)) = aggregate {
                println!("{op}({agg_col}) = {}", table.aggregate_op(agg_col, op)?);
            }
        }
    }

    Ok(())
}

fn parse_aggregate(spec: &str) -> Result<(&str, AggregateOp)> {
    let (column, op) = spec
        .split_once(':')
        .ok_or_else(|| anyhow!("--aggregate expects COLUMN:OP, got {spec}"))?;
    let op = op.parse().map_err(|e: String| anyhow!(e))?;
    Ok((column, op))
}
