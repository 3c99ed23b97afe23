use clap::Parser;
use prime_keygen::utils::{logger, validation::Validate};
use prime_keygen::{CliConfig, KeygenEngine, PrimalityOrchestrator};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting prime-keygen CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let monitor_enabled = config.monitor;
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let source = match config.candidate_source() {
        Ok(source) => source,
        Err(e) => {
            tracing::error!("❌ Invalid candidates: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    let orchestrator = PrimalityOrchestrator::new(config.clone());
    let engine = KeygenEngine::new_with_monitoring(source, orchestrator, monitor_enabled);

    match engine.run().await {
        Ok(key_pair) => {
            tracing::info!("✅ Key generation completed successfully!");
            println!("✅ Key generation completed successfully!");
            println!("Public key = {}", key_pair.public);
            println!("Private key = {}", key_pair.private);
        }
        Err(e) => {
            tracing::error!(
                "❌ Key generation failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                prime_keygen::utils::error::ErrorSeverity::Low => 0,
                prime_keygen::utils::error::ErrorSeverity::Medium => 2,
                prime_keygen::utils::error::ErrorSeverity::High => 1,
                prime_keygen::utils::error::ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}
