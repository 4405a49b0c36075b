//! `dryrun config` subcommands.

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use dryrun_constant::app;
use dryrun_runtime::LlmProvider;

use crate::cli::ConfigAction;
use crate::output;

pub async fn handle(action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Api { provider } => configure_api(provider),
    }
}

fn description(provider: LlmProvider) -> &'static str {
    match provider {
        LlmProvider::Gemini => "Google Gemini models (gemini-2.0-flash, gemini-1.5-pro, ...)",
        LlmProvider::OpenAI => "OpenAI chat models (gpt-4o, gpt-4o-mini, ...)",
    }
}

/// Variable the key is saved under.
fn key_var(provider: LlmProvider) -> &'static str {
    provider.api_key_vars().first().copied().unwrap_or("DRYRUN_API_KEY")
}

fn configure_api(provider: Option<String>) -> Result<()> {
    let selected = match provider {
        Some(p) => p.parse::<LlmProvider>().map_err(|_| {
            anyhow!(
                "Unknown provider '{}'. Available: {}",
                p,
                LlmProvider::ALL.map(|p| p.as_str()).join(", ")
            )
        })?,
        None => select_provider()?,
    };
    let env_var = key_var(selected);

    output::header(&format!("Configure {}", selected));
    println!("  {}", description(selected));
    println!();

    if let Ok(current) = env::var(env_var) {
        println!("  Current: {}", mask_key(&current));
        println!();
    }

    let key = prompt_api_key(selected.as_str())?;
    if key.is_empty() {
        output::warning("No key entered, cancelled.");
        return Ok(());
    }

    let config_path = get_config_path()?;
    save_api_key(&config_path, env_var, &key)?;

    output::success(&format!("Saved {} to {}", env_var, config_path.display()));
    output::dim("dryrun reads this file on start; no shell restart needed.");
    Ok(())
}

fn select_provider() -> Result<LlmProvider> {
    println!("Select a provider to configure:\n");

    for (i, provider) in LlmProvider::ALL.iter().enumerate() {
        let status = if env::var(key_var(*provider)).is_ok() {
            console::style("(configured)").green()
        } else {
            console::style("(not set)").dim()
        };
        println!("  {}) {} {} - {}", i + 1, provider, status, description(*provider));
    }
    println!();

    print!("Enter choice [1-{}]: ", LlmProvider::ALL.len());
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    parse_choice(&input)
}

fn parse_choice(input: &str) -> Result<LlmProvider> {
    let choice: usize = input.trim().parse().map_err(|_| anyhow!("Invalid choice"))?;
    choice
        .checked_sub(1)
        .and_then(|i| LlmProvider::ALL.get(i).copied())
        .ok_or_else(|| anyhow!("Choice must be 1-{}", LlmProvider::ALL.len()))
}

/// Reads a key without echoing it; each char shows as `*`.
fn prompt_api_key(provider: &str) -> Result<String> {
    use crossterm::{
        event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
        terminal,
    };

    println!("Enter API key for {}:", provider);
    print!("> ");
    io::stdout().flush()?;

    let mut key = String::new();
    terminal::enable_raw_mode()?;

    let outcome = (|| -> Result<bool> {
        loop {
            if !event::poll(std::time::Duration::from_millis(100))? {
                continue;
            }
            let Event::Key(k) = event::read()? else {
                continue;
            };
            if k.kind != KeyEventKind::Press {
                continue;
            }
            match k.code {
                KeyCode::Enter => return Ok(true),
                KeyCode::Esc => return Ok(false),
                KeyCode::Backspace => {
                    if key.pop().is_some() {
                        print!("\x08 \x08");
                        io::stdout().flush()?;
                    }
                }
                KeyCode::Char('c') if k.modifiers.contains(KeyModifiers::CONTROL) => {
                    return Ok(false);
                }
                KeyCode::Char(c) => {
                    key.push(c);
                    print!("*");
                    io::stdout().flush()?;
                }
                _ => {}
            }
        }
    })();

    terminal::disable_raw_mode()?;
    println!();

    match outcome? {
        true => Ok(key.trim().to_string()),
        false => Ok(String::new()),
    }
}

/// First and last four chars of a key; short keys are fully masked.
fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}

fn get_config_path() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| anyhow!("Could not find home directory"))?;
    let data_dir = home.join(app::DATA_DIR);
    fs::create_dir_all(&data_dir)?;
    Ok(data_dir.join(app::ENV_FILE))
}

/// Sets `env_var` in an `export KEY="value"` file, keeping other entries.
fn save_api_key(path: &Path, env_var: &str, key: &str) -> Result<()> {
    let existing = if path.exists() {
        fs::read_to_string(path)?
    } else {
        String::new()
    };

    let mut config: BTreeMap<String, String> = existing
        .lines()
        .filter_map(|line| {
            let line = line.trim().strip_prefix("export ")?;
            let (key, value) = line.split_once('=')?;
            Some((key.trim().to_string(), value.trim().to_string()))
        })
        .collect();

    let escaped = key.replace('\\', "\\\\").replace('"', "\\\"");
    config.insert(env_var.to_string(), format!("\"{escaped}\""));

    let mut content = String::new();
    content.push_str(&format!("# {} configuration\n", app::DISPLAY_NAME));
    content.push_str("# Loaded automatically by dryrun; can also be sourced from a shell.\n\n");
    for (k, v) in &config {
        content.push_str(&format!("export {}={}\n", k, v));
    }

    fs::write(path, content)?;
    Ok(())
}
