//! Deviation Report CLI
//!
//! Render the six-chart deviation report from a JSON dataset.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use deviation_report::analysis::RangeAxis;
use deviation_report::{init_rayon, run_report, Config, Dataset, Metrics};

#[derive(Parser)]
#[command(name = "deviation-report")]
#[command(about = "Render confusion-matrix and floor/ceiling deviation charts", long_about = None)]
struct Cli {
    /// Path to configuration file (YAML or JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Override the input dataset path
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Override the output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Render charts in parallel
    #[arg(long)]
    parallel: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the report (default if no command specified)
    Run,

    /// Print dataset statistics without rendering
    Summary,

    /// Validate configuration
    Validate,

    /// Generate a sample configuration file
    GenerateConfig {
        /// Output path for configuration file
        #[arg(short, long, default_value = "deviation-report.yaml")]
        output: PathBuf,
    },
}

impl Cli {
    fn load_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_file(path)?,
            None => Config::default(),
        };

        // Apply overrides
        if let Some(input) = &self.input {
            config.input.path = input.clone();
        }
        if let Some(dir) = &self.output_dir {
            config.output.dir = dir.clone();
        }
        if self.parallel {
            config.processing.parallel_render = true;
        }

        Ok(config)
    }
}

fn main() -> Result<ExitCode> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let cli = Cli::parse();

    match &cli.command {
        None | Some(Commands::Run) => run_command(&cli),

        Some(Commands::Summary) => {
            summary_command(&cli)?;
            Ok(ExitCode::SUCCESS)
        }

        Some(Commands::Validate) => {
            validate_command(&cli)?;
            Ok(ExitCode::SUCCESS)
        }

        Some(Commands::GenerateConfig { output }) => {
            generate_config_command(output)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn run_command(cli: &Cli) -> Result<ExitCode> {
    let config = cli.load_config()?;
    config.validate()?;

    init_rayon(config.processing.rayon_threads)?;

    match run_report(config) {
        Some(report) => {
            print!("{}", report);
            Ok(ExitCode::SUCCESS)
        }
        None => {
            println!("Plot creation failed.");
            Ok(ExitCode::FAILURE)
        }
    }
}

fn summary_command(cli: &Cli) -> Result<()> {
    let config = cli.load_config()?;
    config.validate()?;

    let dataset = Dataset::from_path(&config.input.path)?;
    let metrics = Metrics::compute(&dataset, &config.labels)?;

    println!("\n=== Dataset Summary ===");
    println!("Source: {}", config.input.path.display());
    println!("Records: {}", dataset.len());

    println!("\n=== Confusion Matrix ===");
    print!("{}", metrics.confusion);
    println!("Accuracy: {:.1}%", metrics.confusion.accuracy() * 100.0);

    println!("\n=== Ranges ===");
    println!("{}", metrics.ranges.summary(RangeAxis::Floor));
    println!("{}", metrics.ranges.summary(RangeAxis::Ceiling));

    let warnings = metrics.warnings();
    if !warnings.is_empty() {
        println!("\n=== Range Warnings ({}) ===", warnings.len());
        for warning in warnings {
            println!("{}", warning);
        }
    }
    println!("=======================\n");

    Ok(())
}

fn validate_command(cli: &Cli) -> Result<()> {
    let config = cli.load_config()?;
    config.validate()?;
    println!("Configuration is valid");
    Ok(())
}

fn generate_config_command(output: &Path) -> Result<()> {
    // Generate a commented YAML config
    let yaml = r#"# Deviation Report Configuration

# === INPUT: Dataset to read ===
input:
  # JSON file: either an array of records, or an object of columns
  # keyed by row index ({"gt_corners": {"0": 4, "1": 6}, ...})
  path: "deviation.json"

# === OUTPUT: Where the six PNG charts are written ===
output:
  # Created if it does not exist; existing charts are overwritten
  dir: "plots"

  # Image size in pixels
  image_width: 640
  image_height: 480

# === LABELS: Corner-count classes on the confusion-matrix axes ===
# Any gt_corners / rb_corners value outside this list fails the run.
labels: [4.0, 6.0, 8.0, 10.0]

# === PROCESSING: Performance tuning ===
processing:
  # Render the six charts concurrently (output order is unchanged)
  parallel_render: false

  # Rayon thread pool size (null = num CPUs)
  # rayon_threads: 4

  # Write run metrics as JSON after the run
  # metrics_output_path: "report-metrics.json"
"#;

    std::fs::write(output, yaml)?;
    println!("Generated sample configuration at: {}", output.display());

    Ok(())
}
