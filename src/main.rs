use clap::Parser;
use quake_map::utils::{logger, validation::Validate};
use quake_map::{CliConfig, LocalStorage, MapEngine, MapError, QuakeMapPipeline};

fn report_failure(e: &MapError) -> ! {
    tracing::error!(
        "❌ Map build failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    std::process::exit(e.exit_code());
}

#[tokio::main]
async fn main() {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting quake-map");
    if config.verbose {
        tracing::debug!(
            "Sources: quakes={} boundaries={} output={} formats={:?}",
            config.quakes_url,
            config.boundaries_url,
            config.output_path,
            config.output_formats
        );
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        report_failure(&e);
    }

    let monitor_enabled = config.monitor;
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let storage = LocalStorage::new(config.output_path.clone());
    let pipeline = match QuakeMapPipeline::new(storage, config) {
        Ok(pipeline) => pipeline,
        Err(e) => report_failure(&e),
    };

    let engine = MapEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("✅ Map build completed");
            println!("✅ Map build completed!");
            println!("📁 Open in a browser: {}", output_path);
        }
        Err(e) => report_failure(&e),
    }
}
