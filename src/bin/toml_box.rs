use anyhow::Context;
use card_boxer::core::{ConfigProvider, Pipeline};
use card_boxer::utils::error::ErrorSeverity;
use card_boxer::utils::{logger, validation::Validate};
use card_boxer::{BoxingPipeline, EtlEngine, LocalStorage, TomlConfig};
use clap::Parser;

#[derive(Parser)]
#[command(name = "toml-box")]
#[command(about = "Run a card boxing job described by a TOML file")]
struct Args {
    /// Path to TOML job file
    #[arg(short, long, default_value = "boxing-job.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Override the unit from config
    #[arg(long)]
    unit: Option<usize>,

    /// Dry run - read and box the input without writing any file
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 載入 TOML 配置，日誌格式由配置決定
    let config = TomlConfig::from_file(&args.config);
    match &config {
        Ok(c) if c.json_logs() => logger::init_json_logger(),
        _ => logger::init_cli_logger(args.verbose),
    }
    let mut config =
        config.with_context(|| format!("failed to load job file '{}'", args.config))?;

    tracing::info!("🚀 Starting TOML boxing job '{}'", config.job.name);

    // 應用命令列覆蓋設定
    if let Some(unit) = args.unit {
        config.boxing.unit = unit;
        tracing::info!("🔧 Unit overridden to: {}", unit);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    display_config_summary(&config, &args);

    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());
    let storage = LocalStorage::new(".");
    let pipeline = BoxingPipeline::new(storage, config);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No files will be written");
        return perform_dry_run(&pipeline).await;
    }

    let engine = EtlEngine::new_with_monitoring(pipeline, monitor_enabled);
    match engine.run().await {
        Ok(output_path) => {
            println!("✅ Boxing job completed successfully!");
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Boxing job failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig, args: &Args) {
    println!("📋 Job Summary:");
    println!("  Job: {}", config.job.name);
    if let Some(description) = &config.job.description {
        println!("  Description: {}", description);
    }
    println!("  Input: {}", config.input_path());
    if let Some(sheet) = config.sheet_name() {
        println!("  Sheet: {}", sheet);
    }
    println!("  Unit: {}", config.unit());
    println!("  Output: {}/{}", config.output_path(), config.output_stem());
    println!("  Formats: {}", config.output_formats().join(", "));
    if config.compress_output() {
        println!("  Compression: ZIP");
    }
    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }
    println!();
}

async fn perform_dry_run<P: Pipeline>(pipeline: &P) -> anyhow::Result<()> {
    let table = pipeline.extract().await.context("failed to read input")?;
    let result = pipeline
        .transform(table)
        .await
        .context("failed to box input")?;

    println!("🔍 Dry Run Analysis:");
    println!("  Rows: {}", result.total_rows);
    println!("  Boxes: {}", result.boxes.len());
    for branch in result.branch_summaries() {
        println!(
            "  {} - {} cards in {} boxes",
            branch.branch_name, branch.rows, branch.boxes
        );
    }

    Ok(())
}
