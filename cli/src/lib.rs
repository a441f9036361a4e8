pub mod argparse;
pub mod commands;
pub mod config;
pub mod records;
pub mod utils;

use std::path::PathBuf;

/// Errors the `dpf` commands report to the user
#[derive(Debug)]
pub enum CliError {
    NoValidRule(PathBuf),
    ValidationFailed { path: PathBuf, issues: usize },
    UnsupportedFormat(PathBuf),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::NoValidRule(path) => {
                write!(
                    f,
                    "Filter {} has no complete rule and cannot be applied.\n\nPossible fixes:\n  - Set a field and an operator on at least one rule\n  - Give value-taking rules a non-empty value\n  - Give between/not_between rules both bounds, e.g. [18, 65]\n  - Run: dpf validate --strict --filter {}",
                    path.display(),
                    path.display()
                )
            }
            CliError::ValidationFailed { path, issues } => {
                write!(
                    f,
                    "Filter {} failed strict validation with {} issue(s).\n\nFix the rules listed above, or list the operators each data type offers with: dpf operators",
                    path.display(),
                    issues
                )
            }
            CliError::UnsupportedFormat(path) => {
                write!(
                    f,
                    "Unsupported record file: {}\n\nSupported extensions are: .json, .jsonl, .ndjson, .yaml, .yml, .csv, .tsv",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for CliError {}
