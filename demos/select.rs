use anyhow::Result;
use promptline::{Logging, Outcome, Select, print, render};

fn main() -> Result<()> {
    if let Ok(path) = std::env::var("PROMPTLINE_LOG") {
        Logging::new().with_file(path).with_debug_mode(true).start()?;
    }

    let select = Select::new(
        "Pick a color",
        vec!["red", "green", "blue", "yellow", "magenta", "cyan"],
    )?
    .with_help_message("↑↓ navigate, Enter select, Esc cancel, Ctrl+C quit");

    match render(select)?.wait() {
        Some(Outcome::Submitted(color)) => print(&format!("You picked {color}"))?,
        Some(Outcome::Aborted) | None => print("Nothing picked")?,
    }

    Ok(())
}
