use crate::argparse::ApplyArgs;
use crate::records::{load_filter, load_records};
use crate::CliError;
use anyhow::Result;
use dp_filter::{filter_records, is_valid_group, summarize, OperatorRegistry};
use log::{info, warn};
use std::io::Write;

pub fn handle_apply_command<W: Write>(
    args: ApplyArgs,
    registry: &OperatorRegistry,
    out: &mut W,
) -> Result<()> {
    let filter = load_filter(&args.filter)?;
    if !is_valid_group(&filter) {
        return Err(CliError::NoValidRule(args.filter).into());
    }
    // Rules with these issues never match, but the rest of the tree still applies.
    for issue in registry.check_group(&filter) {
        warn!("{}: {}", args.filter.display(), issue);
    }
    info!("Applying filter: {}", summarize(&filter));

    let records = load_records(&args.records, args.delimiter)?;
    let matching = filter_records(&filter, &records);
    info!(
        "{} of {} records from {} match",
        matching.len(),
        records.len(),
        args.records.display()
    );

    if args.count {
        writeln!(out, "{}", matching.len())?;
    } else {
        for record in matching {
            writeln!(out, "{}", serde_json::to_string(record)?)?;
        }
    }
    Ok(())
}
