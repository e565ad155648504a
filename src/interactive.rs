//! Interactive prompt loop, used when no input path is given on the command
//! line. Drives the same convert/convert_folder operations as the flags do.

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;

use vidmux_convert::{stats, BatchScheduler, ConversionEngine, ToolRegistry};
use vidmux_core::Config;

pub async fn run(config: Config) -> Result<()> {
    let tools = ToolRegistry::discover(&config.tools);
    let engine = Arc::new(ConversionEngine::new(config.conversion.clone(), &tools)?);

    println!("=== vidmux interactive mode ===");
    println!(
        "Supported formats: {}",
        engine.catalog().formats().join(", ")
    );

    let target_format = loop {
        let answer = prompt("Target format: ")?;
        let answer = answer.trim().to_ascii_lowercase();
        if engine.catalog().is_supported(&answer) {
            break answer;
        }
        println!(
            "Unsupported format; choose one of: {}",
            engine.catalog().formats().join(", ")
        );
    };

    let input = loop {
        let answer = prompt("Input file or directory: ")?;
        let answer = answer.trim().trim_matches('\'').trim_matches('"').to_string();
        let path = PathBuf::from(answer);
        if path.exists() {
            break path;
        }
        println!("Path does not exist, try again");
    };

    if input.is_dir() {
        let answer = prompt("Convert in parallel? (y/n, default y): ")?;
        let parallel = !answer.trim().eq_ignore_ascii_case("n");

        let scheduler = BatchScheduler::new(engine);
        let results = scheduler
            .convert_folder(&input, &target_format, parallel)
            .await;
        let batch = stats::summarize(&results);
        crate::print_batch_report(&results, &batch);
    } else {
        let result = engine.convert(&input, &target_format).await;
        if result.success {
            match (&result.message, &result.output_path) {
                (Some(msg), _) => println!("{msg}"),
                (None, Some(output)) => println!("Converted: {}", output.display()),
                (None, None) => {}
            }
        } else {
            println!(
                "Conversion failed: {}",
                result.message.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

fn prompt(message: &str) -> Result<String> {
    print!("{message}");
    io::stdout().flush()?;

    let mut line = String::new();
    let read = io::stdin().read_line(&mut line)?;
    if read == 0 {
        anyhow::bail!("stdin closed");
    }
    Ok(line)
}
