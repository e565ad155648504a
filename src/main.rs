mod cli;
mod interactive;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Commands};
use vidmux_convert::{stats, BatchScheduler, BatchStats, ConversionEngine, ConversionResult, ToolRegistry};
use vidmux_core::Config;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load_or_default(cli.config.as_deref());
    if let Some(max_workers) = cli.max_workers {
        config.conversion.max_workers = max_workers;
    }

    init_logging(&cli.log_level, config.log.file.as_deref())?;

    for warning in config.validate() {
        tracing::warn!("Config warning: {warning}");
    }

    let rt = tokio::runtime::Runtime::new()?;

    match cli.command {
        Some(Commands::Serve { host, port }) => {
            config.server.host = host;
            config.server.port = port;
            rt.block_on(vidmux_server::start(config))?;
            Ok(())
        }
        Some(Commands::CheckTools) => check_tools(&config),
        None => match cli.input.clone() {
            Some(input) => rt.block_on(run_convert(&cli, config, input)),
            None => rt.block_on(interactive::run(config)),
        },
    }
}

/// Install the tracing subscriber: a console layer plus an append-mode log
/// file layer (ANSI disabled). `RUST_LOG` overrides the `--log-level` flag.
fn init_logging(level: &str, log_file: Option<&Path>) -> Result<()> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let level = match level.to_ascii_lowercase().as_str() {
        "warning" => "warn".to_string(),
        other => other.to_string(),
    };
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        format!(
            "vidmux={level},vidmux_core={level},vidmux_convert={level},vidmux_server={level},tower_http=info"
        )
    });

    let file_layer = match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_writer(std::sync::Mutex::new(file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(filter))
        .with(fmt::layer())
        .with(file_layer)
        .init();

    Ok(())
}

/// Convert a single file or a whole directory, per the CLI flags.
///
/// Returns an error (exit code 1) when the path is invalid, the single
/// conversion failed, or any batch item failed.
async fn run_convert(cli: &Cli, config: Config, input: PathBuf) -> Result<()> {
    let tools = ToolRegistry::discover(&config.tools);
    let engine = Arc::new(ConversionEngine::new(config.conversion.clone(), &tools)?);

    if input.is_dir() {
        let scheduler = BatchScheduler::new(engine);
        let results = scheduler
            .convert_folder(&input, &cli.format, cli.use_parallel())
            .await;
        let batch = stats::summarize(&results);
        print_batch_report(&results, &batch);
        if batch.failed > 0 {
            anyhow::bail!("{} of {} conversions failed", batch.failed, batch.total_files);
        }
        Ok(())
    } else if input.is_file() {
        let result = engine.convert(&input, &cli.format).await;
        if result.success {
            match (&result.message, &result.output_path) {
                (Some(msg), _) => println!("{msg}"),
                (None, Some(output)) => println!("Converted: {}", output.display()),
                (None, None) => {}
            }
            Ok(())
        } else {
            anyhow::bail!(result
                .message
                .unwrap_or_else(|| "conversion failed".to_string()));
        }
    } else {
        Err(vidmux_core::Error::input_not_found(&input).into())
    }
}

/// Print the batch summary and any failed files.
pub(crate) fn print_batch_report(results: &[ConversionResult], batch: &BatchStats) {
    println!("\n=== Conversion complete ===");
    println!("Total files:  {}", batch.total_files);
    println!("Successful:   {}", batch.successful);
    println!("Failed:       {}", batch.failed);
    println!("Success rate: {:.1}%", batch.success_rate);
    println!(
        "Total time:   {:.2}s",
        batch.total_processing_time.as_secs_f64()
    );
    if batch.successful > 0 {
        println!(
            "Average time: {:.2}s",
            batch.average_time_per_file.as_secs_f64()
        );
    }

    if batch.failed > 0 {
        println!("\nFailed files:");
        for result in results.iter().filter(|r| !r.success) {
            println!(
                "  - {}: {}",
                result.input_path.display(),
                result.message.as_deref().unwrap_or("unknown error")
            );
        }
    }
}

fn check_tools(config: &Config) -> Result<()> {
    println!("Checking external tools...\n");

    let registry = ToolRegistry::discover(&config.tools);
    let mut all_ok = true;

    for tool in registry.check_all() {
        let status = if tool.available {
            "ok"
        } else {
            all_ok = false;
            "missing"
        };

        print!("[{status}] {}", tool.name);
        if let Some(ref version) = tool.version {
            print!(" ({version})");
        }
        if let Some(ref path) = tool.path {
            print!(" - {}", path.display());
        }
        println!();
    }

    println!();
    if all_ok {
        println!("All required tools are available.");
    } else {
        println!("Some tools are missing. Install them to enable conversions.");
    }

    Ok(())
}
