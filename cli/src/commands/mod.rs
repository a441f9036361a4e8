mod apply;
mod operators;
mod summary;
mod validate;

use crate::argparse::Commands;
use anyhow::Result;
pub use apply::handle_apply_command;
use dp_filter::OperatorRegistry;
pub use operators::handle_operators_command;
use std::io::Write;
pub use summary::handle_summary_command;
pub use validate::handle_validate_command;

pub fn handle_command<W: Write>(
    command: Commands,
    registry: &OperatorRegistry,
    out: &mut W,
) -> Result<()> {
    match command {
        Commands::Apply(args) => handle_apply_command(args, registry, out),
        Commands::Summary(args) => handle_summary_command(args, out),
        Commands::Validate(args) => handle_validate_command(args, registry, out),
        Commands::Operators(args) => handle_operators_command(args, registry, out),
    }
}
