use crate::argparse::ValidateArgs;
use crate::records::load_filter;
use crate::CliError;
use anyhow::Result;
use dp_filter::{is_valid_group, summarize, OperatorRegistry};
use log::warn;
use std::io::Write;

pub fn handle_validate_command<W: Write>(
    args: ValidateArgs,
    registry: &OperatorRegistry,
    out: &mut W,
) -> Result<()> {
    let filter = load_filter(&args.filter)?;
    let issues = registry.check_group(&filter);

    if args.strict && !issues.is_empty() {
        for issue in &issues {
            writeln!(out, "{}", issue)?;
        }
        return Err(CliError::ValidationFailed {
            path: args.filter,
            issues: issues.len(),
        }
        .into());
    }
    for issue in &issues {
        warn!("{}: {}", args.filter.display(), issue);
    }

    if !is_valid_group(&filter) {
        return Err(CliError::NoValidRule(args.filter).into());
    }
    writeln!(out, "OK: {}", summarize(&filter))?;
    Ok(())
}
