//! as-cli
//!
//! Command-line access to the aws-services S3 and SQS helpers.

use clap::Parser;

mod args;
mod run;

use args::Cli;

/// Exit code when a broadcast reached only some of its queues.
const EXIT_PARTIAL_FAILURE: i32 = 4;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    // Logs go to stderr so stdout carries only command output
    as_cli_common::init_logging(args.log_level)?;

    let outcome = run::execute(args).await?;

    if let run::Outcome::Partial { delivered, failed } = outcome {
        eprintln!("Broadcast incomplete: {} delivered, {} failed", delivered, failed);
        std::process::exit(EXIT_PARTIAL_FAILURE);
    }

    Ok(())
}
