use beacon_core::config::{AppConfig, ProviderEntry};

use super::utils::{CliError, CliResult};

pub fn list_providers(config_file: &str) -> CliResult<()> {
    let config =
        AppConfig::from_file(config_file).map_err(|e| CliError::Config(e.to_string()))?;
    config.validate().map_err(CliError::Config)?;

    println!("Configured providers ({}):", config.providers.len());
    for provider in &config.providers {
        println!("{}", render_provider(provider));
    }

    Ok(())
}

fn render_provider(provider: &ProviderEntry) -> String {
    format!(
        "  {}: {} (max {} requests/min)",
        provider.name, provider.url_template, provider.max_requests_per_minute
    )
}
