use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use bravia_rs232::{Bravia, Operation};

mod cli;

fn main() -> Result<()> {
    let args = cli::Cli::parse();
    init_tracing(args.verbose);

    let config = args.ser.link_config();
    let mut tv = Bravia::open(&config)?;

    let op = Operation::from(args.cmd);
    let result = tv.execute(op).with_context(|| format!("{} on {}", op, config.path));
    tv.stats().log();
    result
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "warn,bravia_rs232=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
