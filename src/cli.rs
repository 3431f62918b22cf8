use crate::config::settings::DemoConfig;
use crate::config::types::DrainReport;
use crate::config::validator::validate_config;
use crate::observability::metrics::get_metrics;
use crate::printer::{self, PrintableValue};
use crate::probe::{copy_cost_with, sample_copy_cost, SharedHandle};
use crate::safety::lifecycle::LifecycleTracker;
use crate::safety::scoped_resource::{default_fifo_path, read_until, ScopedResource};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON config file (defaults to ./idiomlab.json when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Print Prometheus metrics after the command completes
    #[arg(long, global = true)]
    metrics: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a FIFO, read until a byte threshold, and release it
    Fifo {
        /// FIFO path (a fresh path under the configured dir when omitted)
        #[arg(long)]
        path: Option<PathBuf>,
        /// Stop once this many bytes were read
        #[arg(long)]
        threshold: Option<usize>,
        /// Bytes requested per read
        #[arg(long)]
        chunk_size: Option<usize>,
        /// Write this many bytes into the FIFO from a feeder thread
        #[arg(long)]
        feed: Option<usize>,
        /// Emit the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print values as ` [value]` each, followed by a newline
    Print {
        /// Values; integers and floats are recognized, the rest is text
        values: Vec<String>,
    },
    /// Compare handle duplication against reference passing
    Probe {
        /// Duplications per measurement
        #[arg(long)]
        iterations: Option<u64>,
        /// Measurements; more than one prints percentiles
        #[arg(long)]
        samples: Option<usize>,
        /// Emit the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Validate the configuration and print the effective settings
    CheckConfig,
}

pub fn run() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let dump_metrics = cli.metrics;

    let mut config = match cli.config.as_ref() {
        Some(path) => DemoConfig::load_from_file(path)?,
        None => DemoConfig::load_default()?,
    };

    match cli.command {
        Commands::Fifo {
            path,
            threshold,
            chunk_size,
            feed,
            json,
        } => {
            if let Some(chunk_size) = chunk_size {
                config.fifo.chunk_size = chunk_size;
            }
            validate_config(&config, true)?;

            let path = path.unwrap_or_else(|| default_fifo_path(&config.fifo));
            let threshold = threshold.unwrap_or(config.fifo.threshold);
            let report = run_fifo(&config, path, threshold, feed)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!(
                    "read {} bytes from {} (threshold {}, chunk {})",
                    report.bytes_read,
                    report.path.display(),
                    report.threshold,
                    report.chunk_size
                );
            }
        }
        Commands::Print { values } => {
            let values: Vec<PrintableValue> =
                values.iter().map(|v| PrintableValue::parse(v)).collect();
            printer::print_values(&values)?;
        }
        Commands::Probe {
            iterations,
            samples,
            json,
        } => {
            if let Some(iterations) = iterations {
                config.probe.iterations = iterations;
            }
            if let Some(samples) = samples {
                config.probe.samples = samples;
            }
            validate_config(&config, true)?;
            run_probe(&config, json)?;
        }
        Commands::CheckConfig => {
            let result = validate_config(&config, false)?;
            for warning in &result.warnings {
                println!("warning: {}", warning);
            }
            for error in &result.errors {
                println!("error: {}", error);
            }
            println!("{}", serde_json::to_string_pretty(&config)?);
            if !result.is_valid() {
                anyhow::bail!("configuration has {} error(s)", result.errors.len());
            }
        }
    }

    if dump_metrics {
        print!("{}", get_metrics().export_prometheus());
    }

    Ok(())
}

fn run_fifo(
    config: &DemoConfig,
    path: PathBuf,
    threshold: usize,
    feed: Option<usize>,
) -> Result<DrainReport> {
    let resource =
        ScopedResource::acquire_with(&path, &config.fifo, Arc::new(LifecycleTracker::new()))?;
    let chunk_size = resource.chunk_size();

    // The writer end is opened here, while the reader exists, so the open
    // cannot block and the first read cannot see a premature EOF.
    let feeder = match feed {
        Some(bytes) => {
            let writer = std::fs::OpenOptions::new()
                .write(true)
                .open(&path)
                .with_context(|| format!("opening writer for {}", path.display()))?;
            Some(std::thread::spawn(move || feed_fifo(writer, bytes)))
        }
        None => None,
    };

    let bytes_read = read_until(resource, threshold)?;

    if let Some(feeder) = feeder {
        match feeder.join() {
            Ok(Ok(written)) => log::info!("Feeder wrote {} bytes", written),
            // The reader may stop early and close its end; that is expected.
            Ok(Err(e)) => log::info!("Feeder stopped: {}", e),
            Err(_) => log::warn!("Feeder thread panicked"),
        }
    }

    Ok(DrainReport {
        path,
        threshold,
        chunk_size,
        bytes_read,
    })
}

fn feed_fifo(mut writer: std::fs::File, bytes: usize) -> std::io::Result<usize> {
    let pattern: Vec<u8> = (0..bytes).map(|i| (i % 251) as u8).collect();
    writer.write_all(&pattern)?;
    Ok(bytes)
}

fn run_probe(config: &DemoConfig, json: bool) -> Result<()> {
    let handle = SharedHandle::new(config.probe.payload);

    if config.probe.samples <= 1 {
        let report = copy_cost_with(&handle, config.probe.iterations);
        if json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            println!("{}", report);
        }
        return Ok(());
    }

    let stats = sample_copy_cost(&handle, config.probe.iterations, config.probe.samples)
        .context("probe produced no samples")?;
    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        println!("{}", stats);
    }
    Ok(())
}
