use anyhow::Result;
use clap::Parser;
use dp_filter::OperatorRegistry;
use dportal::argparse::Cli;
use dportal::config::Config;
use dportal::{commands, utils};

fn main() -> Result<()> {
    let cli = Cli::parse();
    utils::init_logger(cli.verbose);

    let registry = match &cli.config {
        Some(path) => Config::load(path)?.registry()?,
        None => OperatorRegistry::default(),
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    commands::handle_command(cli.command, &registry, &mut out)
}
