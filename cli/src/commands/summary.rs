use crate::argparse::SummaryArgs;
use crate::records::load_filter;
use anyhow::Result;
use dp_filter::summarize;
use log::warn;
use std::io::Write;

pub fn handle_summary_command<W: Write>(args: SummaryArgs, out: &mut W) -> Result<()> {
    let filter = load_filter(&args.filter)?;
    let summary = summarize(&filter);
    if summary.is_empty() {
        warn!("{} has no complete rule to summarize", args.filter.display());
    }
    writeln!(out, "{}", summary)?;
    Ok(())
}
