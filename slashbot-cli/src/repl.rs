//! Interactive line loop: everything that isn't a slash-command goes to
//! the agent as a user turn; slash-commands are handled locally, in the
//! same process, the same way `ParseActionsNode` handles action tags —
//! a small known set, everything else reported back as unrecognized.

use std::io::Write;
use std::path::PathBuf;

use tokio::io::{AsyncBufReadExt, BufReader};

use slashbot::agent::react::{build_react_runner, ReactBuildConfig, ReactRunner};
use slashbot::helve::{to_react_build_config, HelveConfig};
use slashbot::{paths, Scheduler};

use crate::commands::{self, ResolvedLlm};
use crate::CliError;

const CORE_COMMANDS: &str = "/login /logout /task /telegram /discord /model /clear /ps /kill /help /exit";

pub struct ReplSession {
    home_root: PathBuf,
    working_folder: PathBuf,
    credentials_path: PathBuf,
    model: String,
    thread_id: String,
    runner: ReactRunner,
}

impl ReplSession {
    pub async fn new(home_root: PathBuf, working_folder: PathBuf) -> Result<Self, CliError> {
        let credentials_path = paths::credentials_file(&home_root);
        let model = commands::DEFAULT_MODEL.to_string();
        let thread_id = new_thread_id();
        let runner = build_runner(&credentials_path, &working_folder, &model, &thread_id).await?;
        Ok(Self {
            home_root,
            working_folder,
            credentials_path,
            model,
            thread_id,
            runner,
        })
    }

    async fn rebuild(&mut self) -> Result<(), CliError> {
        self.runner = build_runner(
            &self.credentials_path,
            &self.working_folder,
            &self.model,
            &self.thread_id,
        )
        .await?;
        Ok(())
    }

    fn scheduler(&self) -> Scheduler {
        Scheduler::load(paths::tasks_file(&self.home_root))
    }

    /// Runs the interactive loop against stdin/stdout until `/exit` or EOF.
    pub async fn run(&mut self) -> Result<(), CliError> {
        println!("slashbot ready. Type /help for commands, /exit to quit.");
        let history_path = paths::history_file(&self.home_root);
        let mut reader = BufReader::new(tokio::io::stdin()).lines();
        loop {
            print!("> ");
            std::io::stdout().flush().ok();

            let line = reader
                .next_line()
                .await
                .map_err(|e| CliError::Message(format!("stdin read failed: {e}")))?;
            let line = match line {
                None => break, // EOF
                Some(s) if s.trim().is_empty() => continue,
                Some(s) => s,
            };
            append_history(&history_path, &line);

            if line.starts_with('/') {
                if self.handle_slash_command(&line).await? {
                    break;
                }
                continue;
            }

            match self.runner.invoke(&line).await {
                Ok(state) => {
                    let reply = state
                        .last_assistant_reply()
                        .unwrap_or_else(|| "(no reply)".to_string());
                    println!("{reply}");
                }
                Err(e) => eprintln!("error: {e}"),
            }
        }
        Ok(())
    }

    /// Returns `true` when the session should end (`/exit`).
    async fn handle_slash_command(&mut self, line: &str) -> Result<bool, CliError> {
        let mut parts = line.splitn(2, char::is_whitespace);
        let cmd = parts.next().unwrap_or("");
        let rest = parts.next().unwrap_or("").trim();

        match cmd {
            "/exit" => return Ok(true),
            "/help" => println!("core commands: {CORE_COMMANDS}"),
            "/login" => {
                let key = if rest.is_empty() { None } else { Some(rest.to_string()) };
                commands::login(&self.credentials_path, key)?;
                self.rebuild().await?;
            }
            "/logout" => {
                commands::logout(&self.credentials_path)?;
            }
            "/model" => {
                if rest.is_empty() {
                    println!("current model: {}", self.model);
                } else {
                    self.model = rest.to_string();
                    self.rebuild().await?;
                    println!("model set to {}", self.model);
                }
            }
            "/clear" => {
                self.thread_id = new_thread_id();
                self.rebuild().await?;
                println!("conversation cleared.");
            }
            "/task" => self.print_tasks(),
            "/ps" => self.print_tasks(),
            "/kill" => {
                if rest.is_empty() {
                    eprintln!("usage: /kill <task-id>");
                } else {
                    match self.scheduler().remove_task(rest) {
                        Ok(()) => println!("removed task {rest}"),
                        Err(e) => eprintln!("error: {e}"),
                    }
                }
            }
            "/telegram" => println!("run the `slashbot-telegram` binary separately to host a Telegram connector"),
            "/discord" => println!("run the `slashbot-discord` binary separately to host a Discord connector"),
            other => eprintln!("unrecognized command {other}; try /help"),
        }
        Ok(false)
    }

    fn print_tasks(&self) {
        let tasks = self.scheduler().tasks();
        if tasks.is_empty() {
            println!("no scheduled tasks.");
            return;
        }
        for t in tasks {
            println!(
                "{}  cron={}  enabled={}  {}",
                t.id, t.cron, t.enabled, t.name
            );
        }
    }
}

fn new_thread_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

fn append_history(path: &std::path::Path, line: &str) {
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    if let Ok(mut f) = std::fs::OpenOptions::new().create(true).append(true).open(path) {
        let _ = writeln!(f, "{line}");
    }
}

async fn build_runner(
    credentials_path: &std::path::Path,
    working_folder: &std::path::Path,
    model: &str,
    thread_id: &str,
) -> Result<ReactRunner, CliError> {
    let ResolvedLlm { api_key, base_url, model } =
        commands::resolve_llm(credentials_path, Some(model))?;

    let helve = HelveConfig {
        working_folder: Some(working_folder.to_path_buf()),
        thread_id: Some(thread_id.to_string()),
        ..Default::default()
    };
    let base = ReactBuildConfig {
        openai_api_key: Some(api_key),
        openai_base_url: Some(base_url),
        model: Some(model),
        ..Default::default()
    };
    let config = to_react_build_config(&helve, base);
    let runner = build_react_runner(&config, None, false).await?;
    Ok(runner)
}

/// One-shot `-m/--message` path: runs a single turn with no persisted
/// thread, prints the final text, returns `Ok` iff the turn produced one.
pub async fn run_one_shot(
    home_root: PathBuf,
    working_folder: PathBuf,
    model: Option<String>,
    message: &str,
) -> Result<String, CliError> {
    let credentials_path = paths::credentials_file(&home_root);
    let ResolvedLlm { api_key, base_url, model } =
        commands::resolve_llm(&credentials_path, model.as_deref())?;

    let helve = HelveConfig {
        working_folder: Some(working_folder),
        ..Default::default()
    };
    let base = ReactBuildConfig {
        openai_api_key: Some(api_key),
        openai_base_url: Some(base_url),
        model: Some(model),
        ..Default::default()
    };
    let config = to_react_build_config(&helve, base);
    let runner = build_react_runner(&config, None, false).await?;
    let final_state = runner.invoke(message).await?;
    final_state
        .last_assistant_reply()
        .ok_or_else(|| CliError::Message("agent finished without a final reply".to_string()))
}
