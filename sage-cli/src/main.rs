//! Sage CLI — terminal interface for the Sage agent.
//!
//! Wires the configured providers together and exposes three operations:
//! `run` (agent routing with tool toggles), `chat` (model fallback chain,
//! streaming by default), and `send` (forward text to a configured sink).

mod commands;

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Sage: chat-agent orchestration from the command line
#[derive(Parser, Debug)]
#[command(name = "sage", version, about, long_about = None)]
struct Cli {
    /// Workspace directory (where .sage/config.toml is looked up)
    #[arg(short, long, default_value = ".")]
    workspace: PathBuf,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Route a prompt through the agent with the given tool toggles
    Run {
        /// The user prompt
        prompt: String,

        /// Enable the deep research pipeline
        #[arg(long)]
        research: bool,

        /// Enable web search
        #[arg(long)]
        search: bool,

        /// Enable summarization of search results
        #[arg(long)]
        summarize: bool,

        /// Enable image generation
        #[arg(long)]
        image: bool,

        /// Model override, tried before the fallback candidates
        #[arg(short, long)]
        model: Option<String>,
    },
    /// Chat through the model fallback chain
    Chat {
        /// The user prompt
        prompt: String,

        /// Model override, tried before the fallback candidates
        #[arg(short, long)]
        model: Option<String>,
    },
    /// Forward text to a configured sink (slack, notion, drive)
    Send {
        /// Target app name
        app: String,

        /// Text to forward
        body: String,

        /// Title (Slack heading, Notion page name, Drive filename)
        #[arg(long, default_value = "Sage report")]
        title: String,
    },
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("sage={default_level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = sage_core::load_config(&cli.workspace)
        .map_err(|e| anyhow::anyhow!("failed to load configuration: {e}"))?;

    match cli.command {
        Commands::Run {
            prompt,
            research,
            search,
            summarize,
            image,
            model,
        } => {
            commands::run_agent(
                &config, &prompt, research, search, summarize, image, model,
            )
            .await
        }
        Commands::Chat { prompt, model } => commands::chat(&config, &prompt, model).await,
        Commands::Send { app, body, title } => commands::send(&config, &app, &title, &body).await,
    }
}
