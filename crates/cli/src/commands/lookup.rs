use beacon_core::config::AppConfig;
use beacon_core::upstream::{Broker, BrokerError, HttpTransport};
use futures::future::join_all;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use super::utils::{
    init_logging, print_error, print_info, print_success, CliError, CliResult,
};

/// Options for a lookup run.
pub struct LookupOptions {
    /// Request keys to dispatch, in the order given on the command line.
    pub keys: Vec<String>,
    /// Path to the configuration file.
    pub config_file: String,
    /// Dispatch all keys concurrently instead of one at a time.
    pub parallel: bool,
}

/// Result of one dispatched lookup, with the wall time observed by the CLI.
enum LookupOutcome {
    Success { body: String, elapsed_ms: u128 },
    Failure { error: BrokerError, elapsed_ms: u128 },
}

pub async fn run_lookups(options: LookupOptions) -> CliResult<()> {
    if !Path::new(&options.config_file).exists() {
        print_info(&format!(
            "Config file {} not found; using built-in defaults",
            options.config_file
        ));
    }

    let config = AppConfig::from_file(&options.config_file)
        .map_err(|e| CliError::Config(e.to_string()))?;
    config.validate().map_err(CliError::Config)?;

    init_logging(&config.logging);
    tracing::debug!(
        keys = options.keys.len(),
        parallel = options.parallel,
        "lookup run starting"
    );

    let transport = HttpTransport::with_config(&config.transport_config())
        .map_err(|e| CliError::Network(e.to_string()))?;
    let broker = Arc::new(Broker::new(config.to_provider_configs(), Arc::new(transport)));

    print_info(&format!(
        "Dispatching {} lookups across {} providers...",
        options.keys.len(),
        broker.providers().len()
    ));

    let outcomes = if options.parallel {
        join_all(options.keys.iter().map(|key| {
            let broker = Arc::clone(&broker);
            async move { dispatch_one(&broker, key).await }
        }))
        .await
    } else {
        let mut outcomes = Vec::with_capacity(options.keys.len());
        for key in &options.keys {
            outcomes.push(dispatch_one(&broker, key).await);
        }
        outcomes
    };

    let mut successful = 0;
    let mut failed = 0;
    for (key, outcome) in options.keys.iter().zip(&outcomes) {
        println!("{}", render_outcome(key, outcome));
        match outcome {
            LookupOutcome::Success { .. } => successful += 1,
            LookupOutcome::Failure { .. } => failed += 1,
        }
    }

    println!("\nLookup Results:");
    println!("  [SUCCESS] Successful: {successful}");
    println!("  [ERROR] Failed: {failed}");

    if failed > 0 {
        print_error("Some lookups failed");
        return Err(CliError::General(format!(
            "{failed} of {} lookups failed",
            options.keys.len()
        )));
    }

    print_success("All lookups completed successfully!");
    Ok(())
}

async fn dispatch_one(broker: &Broker, key: &str) -> LookupOutcome {
    let start = Instant::now();
    match broker.dispatch(key).await {
        Ok(body) => LookupOutcome::Success { body, elapsed_ms: start.elapsed().as_millis() },
        Err(error) => LookupOutcome::Failure { error, elapsed_ms: start.elapsed().as_millis() },
    }
}

fn render_outcome(key: &str, outcome: &LookupOutcome) -> String {
    match outcome {
        LookupOutcome::Success { body, elapsed_ms } => {
            format!("[OK] {key} ({elapsed_ms}ms): {body}")
        }
        LookupOutcome::Failure { error, elapsed_ms } => {
            format!("[ERROR] {key} ({elapsed_ms}ms): {error}")
        }
    }
}
