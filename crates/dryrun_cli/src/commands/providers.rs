//! `dryrun providers` subcommands.

use std::sync::Arc;

use anyhow::{anyhow, Result};
use comfy_table::{Cell, Color};
use dryrun_llms::{Provider, ProviderRegistry};
use dryrun_runtime::{LlmProvider, Runtime};
use serde::Serialize;

use crate::cli::ProvidersAction;
use crate::output;

#[derive(Debug, Serialize)]
struct ProviderInfo {
    id: &'static str,
    has_key: bool,
    default_model: &'static str,
    key_vars: &'static [&'static str],
}

fn provider_infos(registry: &ProviderRegistry) -> Vec<ProviderInfo> {
    LlmProvider::ALL
        .into_iter()
        .map(|p| ProviderInfo {
            id: p.as_str(),
            has_key: registry.contains(p.as_str()),
            default_model: p.default_model(),
            key_vars: p.api_key_vars(),
        })
        .collect()
}

pub async fn handle(action: ProvidersAction) -> Result<()> {
    match action {
        ProvidersAction::List => list(),
        ProvidersAction::Test { provider } => test(&provider).await,
        ProvidersAction::Models { provider } => models(&provider).await,
    }
}

fn list() -> Result<()> {
    let infos = provider_infos(&Runtime::provider_registry());

    if output::is_json() {
        output::data("providers", &infos);
        return Ok(());
    }

    output::header("Providers");
    let mut table = output::table();
    output::table_header(&mut table, &["Provider", "Status", "Default model", "Key variables"]);
    for info in &infos {
        let status = if info.has_key {
            Cell::new("configured").fg(Color::Green)
        } else {
            Cell::new("missing API key").fg(Color::Yellow)
        };
        table.add_row(vec![
            Cell::new(info.id).fg(Color::Green),
            status,
            Cell::new(info.default_model),
            Cell::new(info.key_vars.join(", ")),
        ]);
    }
    println!("{table}");
    Ok(())
}

/// Looks up a configured provider, explaining how to fix a missing key.
fn configured_provider(registry: &ProviderRegistry, id: &str) -> Result<Arc<dyn Provider>> {
    let provider = id.parse::<LlmProvider>().map_err(|_| {
        anyhow!(
            "Unknown provider '{}'. Available: {}",
            id,
            LlmProvider::ALL.map(|p| p.as_str()).join(", ")
        )
    })?;
    if !registry.contains(provider.as_str()) {
        return Err(anyhow!(
            "{} has no API key. Set {} or run 'dryrun config api {}'",
            provider,
            provider.api_key_vars().join(" or "),
            provider
        ));
    }
    Ok(registry.get_provider(provider.as_str())?)
}

async fn test(provider_id: &str) -> Result<()> {
    let registry = Runtime::provider_registry();
    let provider = configured_provider(&registry, provider_id)?;

    let spinner = output::spinner(&format!("Testing {} connectivity...", provider_id));

    match provider.list_models().await {
        Ok(models) => {
            output::spinner_success(
                &spinner,
                &format!("{} is reachable ({} models)", provider_id, models.len()),
            );
            Ok(())
        }
        Err(e) => {
            output::spinner_error(&spinner, &format!("{} connection failed", provider_id));
            Err(anyhow!("Provider test failed: {}", e))
        }
    }
}

async fn models(provider_id: &str) -> Result<()> {
    let registry = Runtime::provider_registry();
    let provider = configured_provider(&registry, provider_id)?;

    let spinner = output::spinner(&format!("Fetching models for {}...", provider_id));

    match provider.list_models().await {
        Ok(models) => {
            spinner.finish_and_clear();
            if output::is_json() {
                output::data("models", &models);
                return Ok(());
            }

            output::header(&format!("Models for {}", provider_id));
            if models.is_empty() {
                output::dim("No models returned");
                return Ok(());
            }
            let mut table = output::table();
            output::table_header(&mut table, &["Model"]);
            for model in &models {
                table.add_row(vec![Cell::new(model).fg(Color::Green)]);
            }
            println!("{table}");
            Ok(())
        }
        Err(e) => {
            output::spinner_error(&spinner, "Failed to fetch models");
            Err(anyhow!("Failed to list models: {}", e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infos_cover_every_provider() {
        let infos = provider_infos(&ProviderRegistry::new());
        let ids: Vec<_> = infos.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec!["gemini", "openai"]);
        assert!(infos.iter().all(|i| !i.has_key));
        assert!(infos[0].key_vars.contains(&"GEMINI_API_KEY"));
    }

    #[test]
    fn unknown_provider_is_rejected() {
        let err = configured_provider(&ProviderRegistry::new(), "llama")
            .err()
            .unwrap();
        assert!(err.to_string().contains("Unknown provider 'llama'"));
    }

    #[test]
    fn missing_key_points_at_config() {
        let err = configured_provider(&ProviderRegistry::new(), "openai")
            .err()
            .unwrap();
        let msg = err.to_string();
        assert!(msg.contains("OPENAI_API_KEY"));
        assert!(msg.contains("dryrun config api openai"));
    }
}
