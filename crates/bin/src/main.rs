//! SafeBalance CLI binary.
//!
//! Scores companies for financial distress from the command line.

mod config;
mod input;

use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use input::{InputError, InputFormat};
use safebalance::features::available_features;
use safebalance::{BatchConfig, BatchError, DistressPredictor, INTERNAL_ERROR_MESSAGE, PredictError};
use safebalance_output::{BatchResults, BatchSummary, ExportFormat, Exporter};
use serde_json::json;
use std::error::Error;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;
use tracing::{info, warn};

/// Batches at least this long get a progress bar.
const PROGRESS_MIN_RECORDS: usize = 500;

#[derive(Parser)]
#[command(name = "safebalance")]
#[command(about = "SafeBalance: financial distress probability from company financials", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the XGBoost JSON model
    #[arg(long, global = true, env = "SAFEBALANCE_MODEL")]
    model: Option<PathBuf>,

    /// Log level filter (overridden by RUST_LOG)
    #[arg(long, global = true, env = "SAFEBALANCE_LOG", default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score one company
    Predict {
        /// JSON record to read (stdin when omitted)
        #[arg(long)]
        input: Option<PathBuf>,

        /// Print a one-line summary instead of JSON
        #[arg(long)]
        text: bool,
    },

    /// Score many companies
    Batch {
        /// Batch file to read (stdin when `-`)
        #[arg(long)]
        input: PathBuf,

        /// Input layout (guessed from the file extension when omitted)
        #[arg(long, value_enum)]
        input_format: Option<InputFormat>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,

        /// Write results here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,

        /// Score records in parallel
        #[arg(long)]
        parallel: bool,

        /// Print a summary table to stderr
        #[arg(long)]
        summary: bool,
    },

    /// Show the engineered feature vector of one company
    Features {
        /// JSON record to read (stdin when omitted)
        #[arg(long)]
        input: Option<PathBuf>,

        /// Print JSON instead of `name = value` lines
        #[arg(long)]
        json: bool,
    },

    /// List the feature columns the model consumes
    Schema,

    /// Load the model and verify its feature schema
    Check,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    PrettyJson,
    Csv,
}

impl From<OutputFormat> for ExportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Json => Self::Json,
            OutputFormat::PrettyJson => Self::PrettyJson,
            OutputFormat::Csv => Self::Csv,
        }
    }
}

fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    config::init_logging(&cli.log_level);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(exit_code(e.as_ref()));
    }
}

/// 2 for input the caller can fix, 1 for everything else.
fn exit_code(e: &(dyn Error + 'static)) -> i32 {
    let client = e
        .downcast_ref::<PredictError>()
        .is_some_and(PredictError::is_client_error)
        || e.is::<BatchError>()
        || e.is::<InputError>();
    if client { 2 } else { 1 }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let model = cli.model.as_deref();

    match cli.command {
        Commands::Predict { input, text } => {
            let predictor = load_predictor(model)?;
            predict(&predictor, input.as_deref(), text)?;
        }
        Commands::Batch {
            input,
            input_format,
            format,
            output,
            parallel,
            summary,
        } => {
            let predictor = load_predictor(model)?;
            let input_format = input_format.unwrap_or_else(|| InputFormat::from_path(&input));
            let options = BatchOptions {
                format: format.into(),
                output,
                config: BatchConfig {
                    parallel,
                    ..BatchConfig::default()
                },
                summary,
            };
            batch(&predictor, &input, input_format, &options)?;
        }
        Commands::Features { input, json } => features(input.as_deref(), json)?,
        Commands::Schema => schema(),
        Commands::Check => check(model)?,
    }

    Ok(())
}

fn load_predictor(model: Option<&Path>) -> Result<DistressPredictor, Box<dyn Error>> {
    let path = config::resolve_model_path(model);
    Ok(DistressPredictor::from_model_path(&path)?)
}

fn predict(predictor: &DistressPredictor, input: Option<&Path>, text: bool) -> Result<(), Box<dyn Error>> {
    let record = input::parse_record(&input::read_source(input)?)?;
    let result = predictor.predict(&record).map_err(report_predict_error)?;

    if text {
        println!("{}", result);
    } else {
        println!("{}", serde_json::to_string_pretty(&result)?);
    }
    Ok(())
}

/// Client errors pass through with their field message. Anything else is
/// logged and replaced by the generic internal message.
fn report_predict_error(e: PredictError) -> Box<dyn Error> {
    if e.is_client_error() {
        Box::new(e)
    } else {
        warn!(error = %e, "failed to score record");
        INTERNAL_ERROR_MESSAGE.into()
    }
}

struct BatchOptions {
    format: ExportFormat,
    output: Option<PathBuf>,
    config: BatchConfig,
    summary: bool,
}

fn batch(
    predictor: &DistressPredictor,
    input: &Path,
    input_format: InputFormat,
    options: &BatchOptions,
) -> Result<(), Box<dyn Error>> {
    let records = input::parse_batch(&input::read_source(Some(input))?, input_format)?;
    info!(records = records.len(), input = %input.display(), "scoring batch");

    let pb = progress_bar(records.len());
    let items = predictor.run_batch_with(&records, &options.config, || pb.inc(1))?;
    pb.finish_and_clear();

    let results = BatchResults::new(items);
    match &options.output {
        Some(path) => {
            results.export_to_file(path, options.format)?;
            info!(output = %path.display(), "wrote batch results");
        }
        None => {
            let rendered = results.export_to_string(options.format)?;
            print!("{}", rendered);
            if !rendered.ends_with('\n') {
                println!();
            }
        }
    }

    if options.summary {
        eprint!("{}", BatchSummary::from_items(&results.results).to_ascii_table());
    }
    Ok(())
}

fn progress_bar(len: usize) -> ProgressBar {
    if len < PROGRESS_MIN_RECORDS {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(len as u64);
    if let Ok(style) =
        ProgressStyle::default_bar().template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
    {
        pb.set_style(style.progress_chars("█▓░"));
    }
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message("Scoring companies...");
    pb
}

fn features(input: Option<&Path>, json: bool) -> Result<(), Box<dyn Error>> {
    let record = input::parse_record(&input::read_source(input)?)?;
    let vector = safebalance::transform(&record).map_err(PredictError::from)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&vector)?);
    } else {
        for (name, value) in vector.iter() {
            println!("{:<20} = {}", name, value);
        }
    }
    Ok(())
}

fn schema() {
    println!("{:>5}  {:<20} {:<12} Description", "Index", "Feature", "Category");
    println!("{}", "-".repeat(72));
    for feature in available_features() {
        println!(
            "{:>5}  {:<20} {:<12} {}",
            feature.index,
            feature.name,
            feature.category.label(),
            feature.description
        );
    }
}

fn check(model: Option<&Path>) -> Result<(), Box<dyn Error>> {
    let path = config::resolve_model_path(model);
    let predictor = DistressPredictor::from_model_path(&path)?;
    let classifier = predictor.engine().classifier();

    let status = json!({
        "status": "healthy",
        "model": "loaded",
        "model_path": path.display().to_string(),
        "num_features": classifier.num_features(),
        "feature_names": classifier.feature_names().is_some(),
        "threshold": safebalance::THRESHOLD,
        "version": safebalance::VERSION,
    });
    println!("{}", serde_json::to_string_pretty(&status)?);
    Ok(())
}
