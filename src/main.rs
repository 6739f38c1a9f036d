use clap::Parser;
use file_relay::utils::logger;
use file_relay::{CliConfig, RelayDriver, StdoutReporter, SystemClock, TokioSleeper};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    logger::init_cli_logger(cli.verbose);

    tracing::info!("Starting file-relay");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    // 設定錯誤時在任何週期開始前退出
    let config = match cli.into_relay_config(|key| std::env::var(key).ok()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(
                "❌ Configuration failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    if !config.destination.is_dir() {
        tracing::warn!(
            "Destination {} does not exist yet; moves will fail until it does",
            config.destination.display()
        );
    }

    tracing::info!(
        "📁 Watching {} -> {} every {:?}",
        config.watch_target.display(),
        config.destination.display(),
        config.interval
    );

    let mut driver = RelayDriver::new(config, SystemClock, TokioSleeper, StdoutReporter);
    let summary = driver.run().await;

    if summary.halted {
        anyhow::bail!("relay stopped after an unclassified selection error");
    }

    Ok(())
}
