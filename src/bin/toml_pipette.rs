use anyhow::Context;
use clap::Parser;
use pipette_sim::core::ConfigProvider;
use pipette_sim::utils::{display, logger, validation::Validate};
use pipette_sim::{LocalStorage, ProtocolPipeline, SimulationEngine, TomlConfig};

#[derive(Parser)]
#[command(name = "toml-pipette")]
#[command(about = "Pipetting protocol generator driven by a TOML configuration")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "pipette.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override the input sheet from the config
    #[arg(long)]
    input: Option<String>,

    /// Compute and print the protocol without writing files
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = TomlConfig::from_file(&args.config).with_context(|| {
        format!(
            "Failed to load config file '{}'; make sure it exists and is valid TOML",
            args.config
        )
    })?;

    logger::init_logger(
        args.verbose || config.verbose_logging(),
        config.json_logging(),
    );
    tracing::info!("🚀 Starting TOML-based pipette simulation");
    tracing::info!("📁 Loaded configuration from: {}", args.config);

    if let Some(input) = args.input.clone() {
        tracing::info!("🔧 Input overridden to: {}", input);
        config.input.path = input;
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    display_config_summary(&config, &args);

    let storage = LocalStorage::new(config.output_path().to_string());
    let pipeline = ProtocolPipeline::new(storage, config);
    let engine = SimulationEngine::new(pipeline);

    let outcome = if args.dry_run {
        engine
            .simulate()
            .await
            .map(|result| display::results_table(&result))
    } else {
        engine
            .run()
            .await
            .map(|output_path| format!("📁 Output saved to: {}", output_path))
    };

    match outcome {
        Ok(message) => {
            if !args.dry_run {
                println!("✅ Pipetting protocol generated successfully!");
            }
            println!("{}", message);
        }
        Err(e) => {
            tracing::error!(
                "❌ Simulation failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(e.exit_code());
        }
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig, args: &Args) {
    let simulation = config.simulation();

    println!("📋 Configuration Summary:");
    println!("  Run: {}", config.run.name);
    if let Some(description) = &config.run.description {
        println!("  Description: {}", description);
    }
    println!("  Input: {}", config.input_file());
    println!("  Output: {}", config.output_path());
    println!("  Formats: {}", config.output_formats().join(", "));
    if config.compress_output() {
        println!("  Compression: {} (ZIP)", config.archive_filename());
    }
    println!(
        "  Target Concentration: {} ng/µL",
        simulation.target_concentration
    );
    println!("  Max Total Volume: {} µL", simulation.max_total_volume);
    println!("  Volume Precision: {} µL", simulation.volume_precision);

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}
