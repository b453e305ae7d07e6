use colored::Colorize;

pub fn handle_error(err: anyhow::Error) -> ! {
    eprintln!("{} {}", "Error:".red().bold(), err);

    let msg = err.to_string().to_lowercase();

    if msg.contains("cannot reach the relay") || msg.contains("connection refused") {
        eprintln!("\n{}", "Suggestion:".yellow().bold());
        eprintln!("  Is the relay running? Start it with:");
        eprintln!("  {} cargo run -p moonchat-server", "$".dimmed());
    }

    std::process::exit(1);
}
