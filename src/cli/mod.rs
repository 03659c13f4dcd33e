// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Entry point for all user interaction. Parses arguments with
// clap and delegates to Layer 2 (application). This layer only
// routes and prints — it never computes.

// Declare the commands submodule
pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{AuditArgs, Commands, PrepareArgs};

#[derive(Parser, Debug)]
#[command(
    name = "xling-revdict",
    version = "0.1.0",
    about = "Prepare cross-lingual reverse-dictionary batches from phrase-pair records."
)]
pub struct Cli {
    /// The subcommand to run (prepare or audit)
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Match on the subcommand and dispatch to the correct use case.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Prepare(args) => Self::run_prepare(args),
            Commands::Audit(args)   => Self::run_audit(args),
        }
    }

    /// Handles the `prepare` subcommand.
    fn run_prepare(args: PrepareArgs) -> Result<()> {
        use crate::application::prepare_use_case::PrepareUseCase;

        tracing::info!("Preparing batches from '{}'", args.records);

        let summary = PrepareUseCase::new(args.into()).execute()?;

        println!(
            "Prepared {} items from {} records ({} unresolved targets)",
            summary.items, summary.records, summary.unresolved,
        );
        println!(
            "{} batches | feature shape [N, {}] | target shape [N, {}]",
            summary.batches, summary.seq_len, summary.embedding_dim,
        );
        for c in &summary.coverage {
            println!(
                "  {}: {}/{} targets resolved",
                c.lang,
                c.resolved(),
                c.total,
            );
        }
        Ok(())
    }

    /// Handles the `audit` subcommand.
    fn run_audit(args: AuditArgs) -> Result<()> {
        use crate::application::audit_use_case::AuditUseCase;

        let summary = AuditUseCase::new(args.into()).execute()?;

        println!(
            "{} records | {} unresolved target keywords",
            summary.records,
            summary.total_missing(),
        );
        for c in &summary.coverage {
            println!(
                "  {}: {}/{} targets resolved ({} missing)",
                c.lang,
                c.resolved(),
                c.total,
                c.missing,
            );
        }
        Ok(())
    }
}
