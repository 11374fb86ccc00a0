//! Status command - show rating progress and tier counts.

use colored::Colorize;
use tierlist::{CurrentImage, Tier};

use crate::cli::ClientArgs;

pub fn run(
    client: ClientArgs,
    json_output: bool,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let (session, store) = client.open_session()?;
    let progress = session.progress();
    let tiers = session.engine().tiers();

    if json_output {
        let previews: serde_json::Map<String, serde_json::Value> = Tier::all()
            .map(|tier| (tier.to_string(), serde_json::json!(tiers.preview(tier))))
            .collect();
        let status = serde_json::json!({
            "server": store.base_url(),
            "namespace": session.namespace(),
            "progress": progress,
            "fraction": progress.fraction(),
            "current": session.current_image(),
            "previews": previews,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!(
        "{} {}",
        "Rating status for".cyan().bold(),
        session.namespace().white()
    );
    println!();

    let bar_width = 30;
    let filled = (progress.fraction() * bar_width as f64).round() as usize;
    let bar: String = "█".repeat(filled) + &"░".repeat(bar_width - filled);
    println!(
        "Progress: {} {}/{} ({:.0}%)",
        bar.cyan(),
        progress.rated.to_string().white().bold(),
        progress.catalog,
        progress.fraction() * 100.0
    );
    println!();

    println!("{}", "Tiers:".white().bold());
    for tier in Tier::all().collect::<Vec<_>>().into_iter().rev() {
        let count = progress.tiers.get(tier);
        let preview = tiers
            .preview(tier)
            .map(|image| image.dimmed().to_string())
            .unwrap_or_default();
        println!("  {:>4}  {:>5}  {}", tier.label().yellow(), count, preview);
    }
    println!();

    match session.current_image() {
        CurrentImage::Showing {
            image, remaining, ..
        } => println!("Next: {} ({} unrated)", image.green(), remaining),
        other => {
            if let Some(message) = other.message() {
                println!("{}", message.yellow());
            }
        }
    }

    if verbose {
        println!();
        println!("  Server: {}", store.base_url());
        println!("  Cursor: {}", progress.cursor);
        println!("  Undo depth: {}", progress.undo_depth);
        println!("  Merge policy: {}", session.config().merge_policy);
    }

    Ok(())
}
