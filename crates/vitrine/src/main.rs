//! Vitrine CLI binary.
//!
//! This binary provides command-line access to Vitrine's functionality:
//! - Resolve references and backend records to display URLs
//! - Step or simulate the fallback chain for a broken URL
//! - Inspect and maintain the persisted failure caches

use clap::Parser;

mod cli;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, Commands, handle_cache_command, run_chain, run_fallback, run_record, run_resolve};

    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    // Initialize tracing
    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let resolver = cli::open_resolver(cli.config.as_deref(), cli.store.as_deref())?;

    // Execute the requested command
    match cli.command {
        Commands::Resolve {
            reference,
            json,
            category,
            video_id,
        } => run_resolve(&resolver, &reference, json, category, video_id, cli.format)?,

        Commands::Record { record, category } => {
            run_record(&resolver, &record, category, cli.format)?
        }

        Commands::Fallback {
            url,
            category,
            video_id,
        } => run_fallback(&resolver, &url, category, video_id, cli.format)?,

        Commands::Chain {
            url,
            category,
            video_id,
        } => run_chain(resolver.config(), &url, category, video_id, cli.format)?,

        Commands::Cache(cache_cmd) => handle_cache_command(&resolver, cache_cmd, cli.format)?,
    }

    Ok(())
}
