use clap::Parser;
use sync_probe::domain::ports::{Fetcher, SessionProvider};
use sync_probe::utils::validation::{validate_required_field, Validate};
use sync_probe::utils::logger;
use sync_probe::{CliConfig, Condition, FormLogin, HttpProbe, ProbeError, SyncVerifier, TomlConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting sync-probe");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("{}", e);
        std::process::exit(2);
    }

    let (target, fetcher) = match resolve_target(&config).await {
        Ok(resolved) => resolved,
        Err(e) => {
            tracing::error!("Setup failed: {}", e);
            eprintln!("{}", e);
            std::process::exit(2);
        }
    };

    let verifier = SyncVerifier::new(fetcher, &config);
    let result = match config.condition()? {
        Condition::Contains(marker) => verifier.verify_content(&target, &marker).await,
        Condition::Absent(marker) => verifier.verify_content_missing(&target, &marker).await,
        Condition::Stock(level) => verifier.verify_stock(&target, level).await,
        Condition::Matches(pattern) => verifier.verify_matches(&target, &pattern).await,
    };

    match result {
        Ok(report) => {
            if config.json {
                println!("{}", serde_json::to_string(&report)?);
            } else {
                println!(
                    "Condition satisfied after {} attempts ({}ms)",
                    report.attempts, report.elapsed_ms
                );
            }
            Ok(())
        }
        Err(e @ ProbeError::TimeoutExceeded { .. }) => {
            if let Some(snippet) = e.last_observed_snippet() {
                tracing::error!("Last observed body: {}", snippet);
            }
            tracing::error!("{}", e);
            eprintln!("{}", e);
            std::process::exit(1);
        }
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("{}", e);
            std::process::exit(2);
        }
    }
}

/// Work out what to probe and how. A bare `--target` gets an anonymous
/// probe; a configured service with credentials gets a logged-in one.
async fn resolve_target(config: &CliConfig) -> sync_probe::Result<(String, Box<dyn Fetcher>)> {
    if let Some(target) = &config.target {
        return Ok((target.clone(), Box::new(HttpProbe::new())));
    }

    let file = validate_required_field("config", &config.config)?;
    let service_name = validate_required_field("service", &config.service)?;

    let services = TomlConfig::from_file(file)?;
    services.validate_config()?;
    let service = services.service(service_name)?;
    let target = service.url(&config.path);

    let fetcher: Box<dyn Fetcher> = if service.credentials.is_some() {
        FormLogin::with_timeout(services.request_timeout())
            .acquire(&service)
            .await?
    } else {
        Box::new(HttpProbe::with_timeout(services.request_timeout())?)
    };

    Ok((target, fetcher))
}
