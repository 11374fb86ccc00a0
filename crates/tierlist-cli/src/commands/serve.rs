//! Serve command - run the image server.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use colored::Colorize;

use crate::server::{
    app,
    state::{AppState, ServerConfig},
};

pub fn run(
    images_dir: PathBuf,
    host: IpAddr,
    port: u16,
    dataset: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig {
        images_dir,
        addr: SocketAddr::new(host, port),
        dataset,
        ..ServerConfig::default()
    };
    let state = AppState::new(config)?;

    let url = format!("http://{}", state.config.addr);
    println!();
    println!(
        "{} {}",
        "Starting image server at".cyan().bold(),
        url.white().bold()
    );
    println!();
    println!("  Images: {}", state.store.root().display());
    println!("  Dataset: {}", state.store().dataset()?);
    println!();
    println!("Press {} to stop the server", "Ctrl+C".yellow().bold());
    println!();

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(app::run_server(state))?;

    println!("{}", "Server stopped.".yellow());
    Ok(())
}
