use anyhow::Context;
use clap::Parser;
use solar_potential::cli::{Args, setup_logging};
use solar_potential::processor::PipelineRunner;
use std::process;

fn main() {
    let args = Args::parse();
    setup_logging(args.log_level());

    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    let result = runtime.block_on(async {
        tokio::select! {
            result = run(args) => result,
            _ = tokio::signal::ctrl_c() => {
                eprintln!("\nReceived CTRL+C, shutting down...");
                Err(anyhow::anyhow!("Processing interrupted by user"))
            }
        }
    });

    if let Err(error) = result {
        eprintln!("Error: {:#}", error);
        process::exit(1);
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let config = args.to_config().context("Invalid options")?;

    let mut runner = PipelineRunner::new(args.input_path.clone(), args.output_path.clone())
        .with_context(|| format!("Cannot read input directory {}", args.input_path.display()))?
        .with_config(config);

    let stats = runner.run().await.context("Pipeline failed")?;
    if stats.countries_processed == 0 {
        anyhow::bail!(
            "No country datasets could be processed in {}",
            args.input_path.display()
        );
    }
    Ok(())
}
