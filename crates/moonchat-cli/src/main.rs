mod cli;
mod error;
mod render;
mod session;

use std::io::Write as _;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use session::{ChatSession, TurnStatus};

#[tokio::main]
async fn main() {
    let args = cli::Cli::parse();

    // Diagnostics go to stderr so they never interleave with the chat
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    if let Err(err) = run(args).await {
        error::handle_error(err);
    }
}

async fn run(args: cli::Cli) -> anyhow::Result<()> {
    let mut session = ChatSession::new(&args.server);
    session.check_health().await?;

    let renderer = render::Renderer::new(args.raw);
    println!("Moonchat - chatting via {} (/quit to exit)", args.server);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("you> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim();
        if input == "/quit" || input == "/exit" {
            break;
        }

        match session.submit(input, |delta| renderer.delta(delta)).await {
            TurnStatus::Skipped => continue,
            TurnStatus::Completed => {
                if let Some(message) = session.transcript().last() {
                    renderer.finish_turn(&message.content);
                }
            }
            TurnStatus::Failed => {
                if let Some(message) = session.transcript().last() {
                    renderer.turn_failed(&message.content);
                }
            }
            TurnStatus::Cancelled => {
                println!();
                println!("(cancelled)");
            }
        }
    }

    Ok(())
}
