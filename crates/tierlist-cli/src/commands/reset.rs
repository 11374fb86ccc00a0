//! Reset command - forget all ratings, optionally deleting server images.

use std::io::{self, BufRead, Write};

use colored::Colorize;

use crate::cli::ClientArgs;

pub fn run(
    client: ClientArgs,
    delete_images: bool,
    yes: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let (mut session, store) = client.open_session()?;

    if !yes {
        let prompt = if delete_images {
            format!(
                "Delete all ratings and every image on {}? This cannot be undone.",
                store.base_url()
            )
        } else {
            "Delete all ratings? This cannot be undone.".to_string()
        };
        if !confirm(&prompt)? {
            println!("Aborted.");
            return Ok(());
        }
    }

    let report = session.reset(delete_images);

    println!("{}", "Session reset.".green().bold());
    if delete_images {
        if report.images_deleted {
            println!("  All images deleted from the server.");
        } else {
            println!(
                "  {} Images could not be deleted from the server.",
                "Warning:".yellow()
            );
        }
    }
    println!("  {} image(s) to rate.", report.catalog);

    Ok(())
}

fn confirm(prompt: &str) -> io::Result<bool> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(matches!(line.trim().to_lowercase().as_str(), "y" | "yes"))
}
