//! Rate command - interactive one-image-at-a-time triage.

use std::io::{self, BufRead, Write};

use colored::Colorize;
use tierlist::store::HttpStore;
use tierlist::{Action, CurrentImage, Session, Tier};

use crate::cli::ClientArgs;

/// One line of user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Assign(Tier),
    Skip,
    Undo,
    OpenReview(Tier),
    Next,
    Previous,
    Up,
    Down,
    CloseReview,
    Status,
    Help,
    Quit,
}

/// Parse a line typed at the prompt. Keys mean different things while a
/// review is open.
pub fn parse_input(line: &str, in_review: bool) -> Option<Input> {
    let line = line.trim().to_lowercase();
    let mut words = line.split_whitespace();
    let command = words.next()?;
    let argument = words.next();

    if in_review {
        return match command {
            "n" | "next" | "right" => Some(Input::Next),
            "p" | "prev" | "previous" | "left" => Some(Input::Previous),
            "+" | "up" => Some(Input::Up),
            "-" | "down" => Some(Input::Down),
            "q" | "close" | "esc" => Some(Input::CloseReview),
            "?" | "h" | "help" => Some(Input::Help),
            "v" | "view" => argument.and_then(|t| t.parse().ok()).map(Input::OpenReview),
            _ => None,
        };
    }

    match command {
        "s" | "skip" | "right" => Some(Input::Skip),
        "u" | "undo" | "left" => Some(Input::Undo),
        "v" | "view" => argument.and_then(|t| t.parse().ok()).map(Input::OpenReview),
        "st" | "status" => Some(Input::Status),
        "?" | "h" | "help" => Some(Input::Help),
        "q" | "quit" | "exit" => Some(Input::Quit),
        tier => tier.parse().ok().map(Input::Assign),
    }
}

pub fn run(client: ClientArgs, open: bool, verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let (mut session, store) = client.open_session()?;

    // Every change is saved as it happens, so Ctrl+C only needs to say so.
    ctrlc::set_handler(|| {
        println!();
        println!("{}", "Progress saved. Bye.".yellow());
        std::process::exit(0);
    })?;

    println!(
        "{} {} ({} images)",
        "Rating".cyan().bold(),
        session.namespace().white(),
        session.engine().catalog().len()
    );
    print_help(false);

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let mut shown: Option<String> = None;

    loop {
        let in_review = session.review().is_some();
        if in_review {
            show_review(&session, &store, open, &mut shown);
        } else {
            show_current(&session, &store, open, &mut shown);
        }

        let prompt = if in_review { "review>" } else { ">" };
        print!("{} ", prompt.bold());
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let Some(input) = parse_input(&line, in_review) else {
            println!("{} '{}' (type ? for help)", "Unknown command".red(), line.trim());
            continue;
        };

        match apply(&mut session, input) {
            Ok(Outcome::Continue) => {}
            Ok(Outcome::Quit) => break,
            Err(e) if e.is_no_op() => {
                if verbose {
                    println!("{}", e.to_string().dimmed());
                }
            }
            Err(e) => println!("{} {}", "Error:".red(), e),
        }
    }

    let progress = session.progress();
    println!(
        "{} {}/{} rated.",
        "Saved.".green().bold(),
        progress.rated,
        progress.catalog
    );
    Ok(())
}

enum Outcome {
    Continue,
    Quit,
}

fn apply(session: &mut Session, input: Input) -> tierlist::Result<Outcome> {
    match input {
        Input::Assign(tier) => {
            let image = session.assign(tier)?;
            println!("  {} {}", tier.label().yellow(), image.dimmed());
        }
        Input::Skip => {
            session.skip()?;
        }
        Input::Undo => match session.undo()? {
            Action::Assign { image, tier } => {
                println!("  Undid {} for {}", tier.label().yellow(), image.dimmed())
            }
            Action::Skip { image, .. } => println!("  Undid skip of {}", image.dimmed()),
            Action::Move { image, from, to } => println!(
                "  Moved {} back from {} to {}",
                image.dimmed(),
                to.label(),
                from.label()
            ),
        },
        Input::OpenReview(tier) => {
            let review = session.open_review(tier);
            println!(
                "{} {} ({} images)",
                "Reviewing".cyan().bold(),
                tier.label(),
                review.len()
            );
        }
        Input::Next => {
            session.review_next();
        }
        Input::Previous => {
            session.review_previous();
        }
        Input::Up | Input::Down => {
            let delta = if input == Input::Up { 1 } else { -1 };
            let tier = session.review_bump(delta)?;
            println!("  Moved to {}", tier.label().yellow());
        }
        Input::CloseReview => session.close_review(),
        Input::Status => print_status(session),
        Input::Help => print_help(session.review().is_some()),
        Input::Quit => return Ok(Outcome::Quit),
    }
    Ok(Outcome::Continue)
}

fn show_current(session: &Session, store: &HttpStore, open: bool, shown: &mut Option<String>) {
    let current = session.current_image();
    match &current {
        CurrentImage::Showing {
            image, remaining, ..
        } => {
            println!();
            println!("{} ({} left)", image.white().bold(), remaining);
            if mark_shown(shown, image) && open {
                open_image(store, image);
            }
        }
        other => {
            if let Some(message) = other.message() {
                println!();
                println!("{}", message.yellow());
            }
            *shown = None;
        }
    }
}

fn show_review(session: &Session, store: &HttpStore, open: bool, shown: &mut Option<String>) {
    let Some(review) = session.review() else {
        return;
    };
    println!();
    match review.current() {
        Some(image) => {
            println!(
                "{} [{}/{}] {}",
                review.tier().label().yellow(),
                review.index() + 1,
                review.len(),
                image.white().bold()
            );
            if mark_shown(shown, image) && open {
                open_image(store, image);
            }
        }
        None => {
            println!("{} is empty. Press q to close.", review.tier().label());
            *shown = None;
        }
    }
}

/// Record `image` as the one on screen. True if it changed.
fn mark_shown(shown: &mut Option<String>, image: &str) -> bool {
    if shown.as_deref() == Some(image) {
        return false;
    }
    *shown = Some(image.to_string());
    true
}

fn open_image(store: &HttpStore, image: &str) {
    let url = store.image_url(image);
    if let Err(e) = open::that(&url) {
        eprintln!("{} Could not open image: {}", "Warning:".yellow(), e);
    }
}

fn print_status(session: &Session) {
    let progress = session.progress();
    println!(
        "  {}/{} rated, {} unrated",
        progress.rated, progress.catalog, progress.unrated
    );
    for tier in Tier::all() {
        println!("  {:>4}  {}", tier.label(), progress.tiers.get(tier));
    }
}

fn print_help(in_review: bool) {
    if in_review {
        println!(
            "  {} next  {} previous  {} up a tier  {} down a tier  {} close",
            "n".bold(),
            "p".bold(),
            "+".bold(),
            "-".bold(),
            "q".bold()
        );
    } else {
        println!(
            "  {} rate  {} skip  {} undo  {} review tier  {} status  {} quit",
            "1-5".bold(),
            "s".bold(),
            "u".bold(),
            "v <tier>".bold(),
            "st".bold(),
            "q".bold()
        );
    }
}
