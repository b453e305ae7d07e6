use clap::Parser;

/// Chat with an LLM through the Moonchat relay.
#[derive(Debug, Parser)]
#[command(name = "moonchat", version, about)]
pub struct Cli {
    /// Base URL of the Moonchat relay
    #[arg(long, env = "MOONCHAT_SERVER_URL", default_value = "http://127.0.0.1:3000")]
    pub server: String,

    /// Print the streamed text as-is, skipping the markdown re-render
    #[arg(long)]
    pub raw: bool,
}
