//! Discord connector: one [`ReactRunner`] cached per channel, FIFO-ordered
//! per channel via [`SessionRouter`], replies split into
//! [`DISCORD_MAX_CHARS`]-sized chunks. Mirrors `slashbot-telegram`'s shape;
//! the two differ only in which gateway/event API they sit on top of.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use serenity::async_trait;
use serenity::model::channel::Message;
use serenity::model::gateway::Ready;
use serenity::prelude::*;
use tokio::sync::Mutex as AsyncMutex;

use slashbot::agent::react::{build_react_runner, BuildRunnerError, ReactBuildConfig, ReactRunner};
use slashbot::helve::{to_react_build_config, HelveConfig};
use slashbot::paths;
use slashbot_workspace::{split_message, LockManager, SessionRouter, DISCORD_MAX_CHARS};

const CONNECTOR_ID: &str = "discord";
const XAI_BASE_URL: &str = "https://api.x.ai/v1";
const DEFAULT_MODEL: &str = "grok-beta";

fn resolve_api_key() -> Option<String> {
    std::env::var("GROK_API_KEY")
        .ok()
        .filter(|s| !s.is_empty())
        .or_else(|| std::env::var("XAI_API_KEY").ok().filter(|s| !s.is_empty()))
}

/// One cached [`ReactRunner`] per Discord channel id, built lazily against
/// a shared working folder and credential.
struct RunnerCache {
    working_folder: PathBuf,
    api_key: String,
    runners: AsyncMutex<HashMap<String, Arc<ReactRunner>>>,
}

impl RunnerCache {
    fn new(working_folder: PathBuf, api_key: String) -> Self {
        Self {
            working_folder,
            api_key,
            runners: AsyncMutex::new(HashMap::new()),
        }
    }

    async fn get_or_build(&self, channel_id: &str) -> Result<Arc<ReactRunner>, BuildRunnerError> {
        let mut guard = self.runners.lock().await;
        if let Some(runner) = guard.get(channel_id) {
            return Ok(Arc::clone(runner));
        }
        let helve = HelveConfig {
            working_folder: Some(self.working_folder.clone()),
            thread_id: Some(format!("{CONNECTOR_ID}:{channel_id}")),
            user_id: Some(channel_id.to_string()),
            ..Default::default()
        };
        let base = ReactBuildConfig {
            openai_api_key: Some(self.api_key.clone()),
            openai_base_url: Some(XAI_BASE_URL.to_string()),
            model: Some(DEFAULT_MODEL.to_string()),
            ..Default::default()
        };
        let config = to_react_build_config(&helve, base);
        let runner = Arc::new(build_react_runner(&config, None, false).await?);
        guard.insert(channel_id.to_string(), Arc::clone(&runner));
        Ok(runner)
    }
}

async fn run_turn(cache: &RunnerCache, channel_id: &str, text: &str) -> Result<String, String> {
    let runner = cache.get_or_build(channel_id).await.map_err(|e| e.to_string())?;
    let final_state = runner.invoke(text).await.map_err(|e| e.to_string())?;
    Ok(final_state
        .last_assistant_reply()
        .unwrap_or_else(|| "(no reply)".to_string()))
}

struct Handler {
    cache: Arc<RunnerCache>,
    router: Arc<SessionRouter>,
}

#[async_trait]
impl EventHandler for Handler {
    async fn message(&self, ctx: Context, msg: Message) {
        if msg.author.bot || msg.content.is_empty() {
            return;
        }
        let channel_id = msg.channel_id.to_string();
        let session_id = SessionRouter::session_id(CONNECTOR_ID, &channel_id);
        let text = msg.content.clone();

        let reply = self
            .router
            .run_exclusive(&session_id, || run_turn(&self.cache, &channel_id, &text))
            .await;

        match reply {
            Ok(reply) => {
                for chunk in split_message(&reply, DISCORD_MAX_CHARS) {
                    if let Err(e) = msg.channel_id.say(&ctx.http, chunk).await {
                        tracing::warn!(error = %e, "failed to send discord reply chunk");
                    }
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "agent turn failed");
                let _ = msg.channel_id.say(&ctx.http, format!("error: {e}")).await;
            }
        }
    }

    async fn ready(&self, _ctx: Context, ready: Ready) {
        tracing::info!(user = %ready.user.name, "discord connector ready");
    }
}

#[tokio::main]
async fn main() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into());
    tracing_subscriber::fmt().with_env_filter(filter).init();
    let _ = env_config::load_and_apply("slashbot", None);

    let home_root = paths::home_root().expect("HOME must be set");
    paths::ensure_dir(&home_root).expect("failed to create ~/.slashbot");

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let lock_manager =
        LockManager::new(paths::locks_dir(&home_root)).expect("failed to open locks dir");
    let outcome = lock_manager
        .acquire(CONNECTOR_ID, cwd.clone())
        .expect("failed to acquire connector lock");
    if !outcome.acquired {
        eprintln!(
            "another slashbot-discord process (pid {:?}) already owns this connector, exiting",
            outcome.existing_pid
        );
        std::process::exit(1);
    }

    let api_key = resolve_api_key().expect("GROK_API_KEY or XAI_API_KEY must be set");
    let token = std::env::var("DISCORD_TOKEN").expect("DISCORD_TOKEN must be set");

    let handler = Handler {
        cache: Arc::new(RunnerCache::new(cwd, api_key)),
        router: Arc::new(SessionRouter::new()),
    };

    let intents = GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT;

    let mut client = Client::builder(&token, intents)
        .event_handler(handler)
        .await
        .expect("failed to build discord client");

    if let Err(e) = client.start().await {
        tracing::error!(error = %e, "discord client exited with an error");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grok_api_key_takes_priority_over_xai_api_key() {
        std::env::set_var("GROK_API_KEY", "grok-secret");
        std::env::set_var("XAI_API_KEY", "xai-secret");
        assert_eq!(resolve_api_key().as_deref(), Some("grok-secret"));
        std::env::remove_var("GROK_API_KEY");
        std::env::remove_var("XAI_API_KEY");
    }

    #[test]
    fn falls_back_to_xai_api_key_when_grok_unset() {
        std::env::remove_var("GROK_API_KEY");
        std::env::set_var("XAI_API_KEY", "xai-secret");
        assert_eq!(resolve_api_key().as_deref(), Some("xai-secret"));
        std::env::remove_var("XAI_API_KEY");
    }

    #[test]
    fn empty_env_vars_are_treated_as_unset() {
        std::env::set_var("GROK_API_KEY", "");
        std::env::remove_var("XAI_API_KEY");
        assert_eq!(resolve_api_key(), None);
        std::env::remove_var("GROK_API_KEY");
    }
}
