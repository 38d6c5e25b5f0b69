//! `slashbot`: launch the interactive REPL, run a one-shot message, or
//! manage stored credentials.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use slashbot_cli::repl::{run_one_shot, ReplSession};
use slashbot_cli::{commands, CliError};

#[derive(Parser, Debug)]
#[command(name = "slashbot", version, about = "Interactive LLM agent runtime")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// One-shot message: run a single turn, print the final text, exit.
    #[arg(short = 'm', long = "message", value_name = "TEXT")]
    message: Option<String>,

    #[arg(short = 'w', long = "working-folder", value_name = "DIR")]
    working_folder: Option<PathBuf>,

    #[arg(long)]
    model: Option<String>,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// Persist an API key for future runs; reads from stdin if omitted.
    Login { api_key: Option<String> },
    /// Clear the persisted API key.
    Logout,
    /// Check for a newer release.
    UpdateCheck,
    /// Update to the latest release.
    Update,
}

fn init_tracing() {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_filter(filter))
        .try_init();
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let _ = env_config::load_and_apply("slashbot", None);

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let home_root = slashbot::paths::home_root()?;
    slashbot::paths::ensure_dir(&home_root)?;
    let credentials_path = slashbot::paths::credentials_file(&home_root);
    let working_folder = cli
        .working_folder
        .clone()
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."));

    if let Some(command) = cli.command {
        return match command {
            Command::Login { api_key } => commands::login(&credentials_path, api_key),
            Command::Logout => commands::logout(&credentials_path),
            Command::UpdateCheck => {
                commands::update_check();
                Ok(())
            }
            Command::Update => {
                commands::update();
                Ok(())
            }
        };
    }

    if let Some(message) = cli.message {
        let reply = run_one_shot(home_root, working_folder, cli.model, &message).await?;
        println!("{reply}");
        return Ok(());
    }

    let mut session = ReplSession::new(home_root, working_folder).await?;
    session.run().await
}
