//! Export command - write the tiers as JSON.

use std::path::PathBuf;

use colored::Colorize;

use crate::cli::ClientArgs;

pub fn run(client: ClientArgs, output: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let (session, _store) = client.open_session()?;
    session.export_to(&output)?;

    println!(
        "{} {} rated image(s) to {}",
        "Exported".green().bold(),
        session.engine().tiers().rated_count(),
        output.display()
    );
    Ok(())
}
