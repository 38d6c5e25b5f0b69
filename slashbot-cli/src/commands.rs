//! Subcommands that don't need an agent turn: `login`, `logout`,
//! `update`, `update-check`, and the env/credentials resolution shared
//! by the REPL and one-shot `-m` path.

use std::path::Path;

use crate::credentials;
use crate::CliError;

/// Default OpenAI-compatible base URL for the xAI/Grok API, used when a
/// key is found but no base URL override is configured.
pub const XAI_BASE_URL: &str = "https://api.x.ai/v1";
pub const DEFAULT_MODEL: &str = "grok-beta";

/// Resolved LLM credentials: where the key came from determines the base
/// URL, since a persisted `slashbot login` key and an `XAI_API_KEY`/
/// `GROK_API_KEY` env var both speak the same xAI-compatible API.
pub struct ResolvedLlm {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
}

/// `GROK_API_KEY` and `XAI_API_KEY` are both read; `GROK_API_KEY` wins
/// when both are set since it's the more specific of the two names.
fn env_api_key() -> Option<String> {
    std::env::var("GROK_API_KEY")
        .ok()
        .filter(|s| !s.is_empty())
        .or_else(|| std::env::var("XAI_API_KEY").ok().filter(|s| !s.is_empty()))
}

/// Resolves an API key from the environment first, then the persisted
/// credentials file, per the env-over-file precedence `config::load_and_apply`
/// already uses elsewhere in this workspace.
pub fn resolve_llm(credentials_path: &Path, model_override: Option<&str>) -> Result<ResolvedLlm, CliError> {
    let api_key = match env_api_key() {
        Some(key) => key,
        None => credentials::load_api_key(credentials_path)?.ok_or_else(|| {
            CliError::Message(
                "no API key configured: run `slashbot login <api-key>` or set GROK_API_KEY/XAI_API_KEY".to_string(),
            )
        })?,
    };
    Ok(ResolvedLlm {
        api_key,
        base_url: XAI_BASE_URL.to_string(),
        model: model_override.unwrap_or(DEFAULT_MODEL).to_string(),
    })
}

/// `slashbot login [api-key]`. Reads from stdin when no key is given on
/// the command line, mirroring how most CLI tools avoid putting a secret
/// directly in shell history.
pub fn login(credentials_path: &Path, api_key: Option<String>) -> Result<(), CliError> {
    let key = match api_key {
        Some(k) => k,
        None => {
            eprint!("Enter API key: ");
            use std::io::Write;
            std::io::stderr().flush().ok();
            let mut line = String::new();
            std::io::stdin()
                .read_line(&mut line)
                .map_err(|e| CliError::Message(format!("failed to read api key: {e}")))?;
            line.trim().to_string()
        }
    };
    if key.is_empty() {
        return Err(CliError::Message("api key must not be empty".to_string()));
    }
    credentials::save_api_key(credentials_path, &key)?;
    println!("Credentials saved to {}", credentials_path.display());
    Ok(())
}

pub fn logout(credentials_path: &Path) -> Result<(), CliError> {
    credentials::clear(credentials_path)?;
    println!("Credentials cleared.");
    Ok(())
}

/// No release feed is wired up; this reports the running binary's own
/// version rather than pretending to reach a server.
pub fn update_check() {
    println!("slashbot {} (no update channel configured)", env!("CARGO_PKG_VERSION"));
}

pub fn update() {
    println!(
        "slashbot {}: nothing to update (no update channel configured)",
        env!("CARGO_PKG_VERSION")
    );
}
