use clap::Parser;
use quake_map::app::pipelines::quake_map_pipeline::{CSV_FILENAME, HTML_FILENAME, JSON_FILENAME};
use quake_map::core::ConfigProvider;
use quake_map::utils::{logger, validation::Validate};
use quake_map::{LocalStorage, MapEngine, QuakeMapPipeline, TomlConfig};

#[derive(Parser)]
#[command(name = "toml-map")]
#[command(about = "Build the quake map from a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "quake-map.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Override load.output_path from config
    #[arg(long)]
    output_path: Option<String>,

    /// Show what would be built without fetching anything
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 初始化日誌
    if args.log_json {
        logger::init_json_logger(args.verbose);
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("🚀 Starting TOML-based map build");
    tracing::info!("📁 Loading configuration from: {}", args.config);

    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 套用命令列覆蓋設定
    if let Some(output_path) = &args.output_path {
        config.load.output_path = output_path.clone();
        tracing::info!("🔧 Output path overridden to: {}", output_path);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(e.exit_code());
    }

    tracing::info!("✅ Configuration loaded and validated successfully");
    display_config_summary(&config, &args);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - nothing will be fetched or written");
        perform_dry_run(&config);
        return Ok(());
    }

    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let storage = LocalStorage::new(config.output_path().to_string());
    let pipeline = QuakeMapPipeline::new(storage, config)?;
    let engine = MapEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("✅ Map build completed");
            println!("✅ Map build completed!");
            println!("📁 Open in a browser: {}", output_path);
        }
        Err(e) => {
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
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig, args: &Args) {
    let view = config.map_view();

    println!("📋 Configuration Summary:");
    println!("  Map: {} ({})", config.map.name, view.title);
    println!("  Quakes: {}", config.quakes_url());
    println!("  Boundaries: {}", config.boundaries_url());
    println!("  Output: {}", config.output_path());
    println!("  Formats: {}", config.output_formats().join(", "));

    if let Some(bundle) = config.bundle_filename() {
        println!("  Bundle: {}", bundle);
    }
    if let Some(timeout) = config.request_timeout() {
        println!("  Request timeout: {:?}", timeout);
    }

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

fn perform_dry_run(config: &TomlConfig) {
    let view = config.map_view();

    println!("🔍 Dry Run Analysis:");
    println!();

    println!("📡 Data Sources (fetched concurrently):");
    println!("  GET {}", config.quakes_url());
    println!("  GET {}", config.boundaries_url());

    println!();
    println!("🗺️ Map:");
    println!("  Center: {}, {}  Zoom: {}", view.center.lat, view.center.lng, view.zoom);
    println!(
        "  Tile token: {}",
        if config.access_token().trim().is_empty() {
            "not set"
        } else {
            "set"
        }
    );

    println!();
    println!("💾 Files:");
    println!("  {}/{}", config.output_path(), HTML_FILENAME);
    for format in config.output_formats() {
        match format.as_str() {
            "json" => println!("  {}/{}", config.output_path(), JSON_FILENAME),
            "csv" => println!("  {}/{}", config.output_path(), CSV_FILENAME),
            _ => {}
        }
    }
    if let Some(bundle) = config.bundle_filename() {
        println!("  {}/{}", config.output_path(), bundle);
    }

    println!();
    println!("✅ Dry run analysis complete.");
}
