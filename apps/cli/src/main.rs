//! LeadGen CLI: ranked lead lists for the 3D in-vitro toxicology market.
//!
//! Pulls prospects from the candidate network and PubMed, enriches their
//! funding data, scores them and prints a ranked table.

mod commands;
mod render;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
