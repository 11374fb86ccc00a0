//! Tierlist CLI - five-tier image triage and image server.

mod cli;
mod commands;
mod server;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Serve {
            images_dir,
            host,
            port,
            dataset,
        } => commands::serve::run(images_dir, host, port, dataset),

        Commands::Rate { client, open } => commands::rate::run(client, open, cli.verbose),

        Commands::Status { client, json } => commands::status::run(client, json, cli.verbose),

        Commands::Upload { client, files } => commands::upload::run(client, files),

        Commands::Export { client, output } => commands::export::run(client, output),

        Commands::Reset {
            client,
            delete_images,
            yes,
        } => commands::reset::run(client, delete_images, yes),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
