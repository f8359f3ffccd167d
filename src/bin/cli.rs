// src/bin/cli.rs
use clap::Parser;
use fut_scrape::cli;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    fut_scrape::log::init();

    let args = cli::Args::parse();
    cli::run(args)?;
    Ok(())
}
