#![allow(dead_code)]

mod cli;
mod application;
mod domain;
mod data;
mod infra;

use anyhow::Result;
use clap::Parser;
use cli::Cli;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("xling_revdict=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    cli.run()
}
