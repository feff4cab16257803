use clap::Parser;
use pipette_sim::core::pipeline::write_template;
use pipette_sim::core::ConfigProvider;
use pipette_sim::utils::error::PipetteError;
use pipette_sim::utils::{display, logger, validation::Validate};
use pipette_sim::{CliConfig, LocalStorage, ProtocolPipeline, SimulationEngine};

#[tokio::main]
async fn main() {
    let config = CliConfig::parse();

    logger::init_logger(config.verbose, config.json_logs);

    tracing::info!("Starting pipette-sim");
    tracing::debug!("CLI config: {:?}", config);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let storage = LocalStorage::new(config.output_path.clone());

    if config.write_template {
        match write_template(&storage).await {
            Ok(name) => {
                println!("📄 Template written to: {}/{}", config.output_path, name);
                return;
            }
            Err(e) => exit_with(e),
        }
    }

    let dry_run = config.dry_run;
    let simulation = config.simulation();
    tracing::info!(
        "Target {} ng/µL, max volume {} µL, precision {} µL",
        simulation.target_concentration,
        simulation.max_total_volume,
        simulation.volume_precision
    );

    let pipeline = ProtocolPipeline::new(storage, config);
    let engine = SimulationEngine::new(pipeline);

    if dry_run {
        match engine.simulate().await {
            Ok(result) => println!("{}", display::results_table(&result)),
            Err(e) => exit_with(e),
        }
        return;
    }

    match engine.run().await {
        Ok(output_path) => {
            println!("✅ Pipetting protocol generated successfully!");
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e) => exit_with(e),
    }
}

fn exit_with(e: PipetteError) -> ! {
    tracing::error!(
        "❌ Simulation failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    std::process::exit(e.exit_code());
}
