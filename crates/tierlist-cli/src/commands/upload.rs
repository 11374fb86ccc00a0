//! Upload command - send image files to the server.

use std::path::PathBuf;

use colored::Colorize;
use tierlist::Upload;

use crate::cli::ClientArgs;

pub fn run(client: ClientArgs, files: Vec<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let uploads = files
        .iter()
        .map(Upload::from_path)
        .collect::<tierlist::Result<Vec<_>>>()?;

    let (mut session, _store) = client.open_session()?;
    let stored = session.upload(&uploads)?;

    println!(
        "{} {} image(s)",
        "Uploaded".green().bold(),
        stored.len()
    );
    for image in &stored {
        println!("  {}", image);
    }

    if let Some(image) = session.current_image().image() {
        println!();
        println!("Next to rate: {}", image.white());
    }

    Ok(())
}
