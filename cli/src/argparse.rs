use clap::{Args, Parser, Subcommand};
use dp_filter::DataType;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "dpf",
    about = "Apply data portal filter trees to result files",
    version,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// TOML file overriding which operators each data type offers
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log at debug level, including rules treated as non-matching
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Pick which subcommand to use
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the records matching a filter, one JSON object per line
    Apply(ApplyArgs),
    /// Print the human-readable summary of a filter
    Summary(SummaryArgs),
    /// Check that a filter is complete enough to be applied
    Validate(ValidateArgs),
    /// List the operators offered for each data type
    Operators(OperatorsArgs),
}

#[derive(Args)]
pub struct ApplyArgs {
    /// Filter tree, as .json or .yaml
    #[arg(long)]
    pub filter: PathBuf,

    /// Records to filter: .json, .jsonl/.ndjson, .yaml, .csv or .tsv
    #[arg(long)]
    pub records: PathBuf,

    /// Column delimiter for delimited input (default: ',' for csv, tab for tsv)
    #[arg(long)]
    pub delimiter: Option<char>,

    /// Only print the number of matching records
    #[arg(long)]
    pub count: bool,
}

#[derive(Args)]
pub struct SummaryArgs {
    /// Filter tree, as .json or .yaml
    #[arg(long)]
    pub filter: PathBuf,
}

#[derive(Args)]
pub struct ValidateArgs {
    /// Filter tree, as .json or .yaml
    #[arg(long)]
    pub filter: PathBuf,

    /// Also fail on operators not offered for a rule's data type, unknown
    /// operators and malformed values
    #[arg(long)]
    pub strict: bool,
}

#[derive(Args)]
pub struct OperatorsArgs {
    /// Only list operators of this data type
    #[arg(long)]
    pub data_type: Option<DataType>,

    /// Only list operators whose label contains this text
    #[arg(long)]
    pub search: Option<String>,
}
