use beacon_core::config::AppConfig;
use clap::Subcommand;
use std::path::Path;

use super::utils::{print_error, print_info, print_success, CliResult};

/// Sample configuration written by `beacon config generate`.
const SAMPLE_CONFIG: &str = r#"# Beacon Lookup Dispatcher Configuration
# This is a sample configuration file with sensible defaults

environment = "development"

# Configure your lookup providers. Each url_template must contain exactly
# one {key} placeholder, replaced with the request key at dispatch time.
[[providers]]
name = "ip-api"
url_template = "http://ip-api.com/json/{key}"
max_requests_per_minute = 45

[[providers]]
name = "ipwhois"
url_template = "https://ipwho.is/{key}"
max_requests_per_minute = 60

[transport]
connect_timeout_seconds = 5
request_timeout_seconds = 10
pool_idle_timeout_seconds = 30
pool_max_idle_per_host = 32

[logging]
level = "info"
format = "pretty"
"#;

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Validate the current configuration
    Validate {
        /// Path to config file (defaults to config/config.toml)
        #[arg(short, long, default_value = "config/config.toml")]
        file: String,
    },

    /// Show current configuration
    Show {
        /// Path to config file (defaults to config/config.toml)
        #[arg(short, long, default_value = "config/config.toml")]
        file: String,
    },

    /// Generate a sample configuration file
    Generate {
        /// Output path for the config file
        #[arg(short, long, default_value = "config/config.toml")]
        output: String,

        /// Overwrite existing file
        #[arg(long)]
        force: bool,
    },
}

pub fn handle_config_command(command: ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Validate { file } => validate_config(&file),
        ConfigCommands::Show { file } => show_config(&file),
        ConfigCommands::Generate { output, force } => generate_config(&output, force),
    }
}

fn validate_config(file: &str) -> CliResult<()> {
    if !Path::new(file).exists() {
        print_error(&format!("Configuration file not found: {file}"));
        return Err(super::utils::CliError::Config(format!("File not found: {file}")));
    }

    print_info(&format!("Loading configuration from {file}..."));

    let config =
        AppConfig::from_file(file).map_err(|e| super::utils::CliError::Config(e.to_string()))?;

    print_info("Validating configuration...");
    config.validate().map_err(super::utils::CliError::Config)?;

    print_success("Configuration is valid!");

    // Show basic stats
    println!("Configuration Summary:");
    println!("  Environment: {}", config.environment);
    println!("  Providers: {}", config.providers.len());
    for provider in &config.providers {
        println!("    {}: {} requests/min", provider.name, provider.max_requests_per_minute);
    }
    println!("  Request Timeout: {}s", config.transport.request_timeout_seconds);
    println!("  Logging: {} ({})", config.logging.level, config.logging.format);

    Ok(())
}

fn show_config(file: &str) -> CliResult<()> {
    let config =
        AppConfig::from_file(file).map_err(|e| super::utils::CliError::Config(e.to_string()))?;

    println!("Configuration from {file}:");
    println!("  Environment: {}", config.environment);

    println!("\n[Providers] ({} configured)", config.providers.len());
    for provider in &config.providers {
        println!(
            "  {}: {} (max {} requests/min)",
            provider.name, provider.url_template, provider.max_requests_per_minute
        );
    }

    println!("\n[Transport]");
    println!("  Connect Timeout: {}s", config.transport.connect_timeout_seconds);
    println!("  Request Timeout: {}s", config.transport.request_timeout_seconds);
    println!("  Pool Idle Timeout: {}s", config.transport.pool_idle_timeout_seconds);
    println!("  Pool Max Idle Per Host: {}", config.transport.pool_max_idle_per_host);

    println!("\n[Logging]");
    println!("  Level: {}", config.logging.level);
    println!("  Format: {}", config.logging.format);

    Ok(())
}

fn generate_config(output: &str, force: bool) -> CliResult<()> {
    if Path::new(output).exists() && !force {
        return Err(super::utils::CliError::Config(format!(
            "File {output} already exists. Use --force to overwrite."
        )));
    }

    std::fs::write(output, SAMPLE_CONFIG).map_err(super::utils::CliError::from)?;

    print_success(&format!("Sample configuration generated: {output}"));
    print_info("Remember to:");
    print_info("  1. Point url_template at your preferred lookup services");
    print_info("  2. Set max_requests_per_minute to each provider's documented limit");
    print_info("  3. Keep exactly one {key} placeholder in every template");

    Ok(())
}
