use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use trial_match::config::Settings;
use trial_match::core::{assemble_output, Matcher};
use trial_match::services::{load_patients, load_trials, prepare_patients, write_matches_json, write_patient_table};
use validator::Validate;

#[derive(Parser)]
#[command(name = "trial-match")]
#[command(about = "Match patient records to clinical-trial eligibility criteria")]
struct Cli {
    /// Configuration file (defaults to config/default.toml and config/local.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the processed patient table from raw EHR exports
    Prepare {
        /// Directory holding patients.csv and conditions.csv
        #[arg(long)]
        raw_dir: Option<String>,
        /// Processed patient table to write
        #[arg(long)]
        output: Option<String>,
    },
    /// Match processed patients against scraped trials
    Match {
        /// Processed patient table
        #[arg(long)]
        patients: Option<String>,
        /// Scraped trial table
        #[arg(long)]
        trials: Option<String>,
        /// Match document to write
        #[arg(long)]
        output: Option<String>,
    },
    /// Prepare patients, then match them (default)
    Run,
}

type AppResult<T> = Result<T, Box<dyn std::error::Error>>;

fn init_logging() {
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(log_level))
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.compact().init();
    }
}

fn prepare(settings: &Settings) -> AppResult<()> {
    let year = settings.matching.reference_year();
    info!("Preparing patients from {} (reference year {})", settings.input.raw_data_dir, year);

    let rows = prepare_patients(&settings.input.raw_data_dir, year)?;
    write_patient_table(&settings.output.patients_path, &rows)?;
    Ok(())
}

fn run_matching(settings: &Settings) -> AppResult<()> {
    let patients = load_patients(&settings.input.patients_path)?;
    let trials = load_trials(&settings.input.trials_path)?;

    let matcher = Matcher::new(settings.matching.evaluation_options());
    let result = matcher.find_matches(&patients, &trials);

    info!(
        "Matched {} of {} patients across {} trials ({} eligible pairs)",
        result.records.len(),
        result.total_patients,
        result.total_trials,
        result.eligible_pairs
    );

    write_matches_json(&settings.output.matches_path, &assemble_output(result.records))?;
    Ok(())
}

fn main() -> AppResult<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    init_logging();

    let cli = Cli::parse();

    let mut settings = match &cli.config {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    }
    .map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Prepare { raw_dir, output } => {
            if let Some(raw_dir) = raw_dir {
                settings.input.raw_data_dir = raw_dir;
            }
            if let Some(output) = output {
                settings.output.patients_path = output;
            }
            settings.validate()?;
            prepare(&settings)?;
        }
        Commands::Match { patients, trials, output } => {
            if let Some(patients) = patients {
                settings.input.patients_path = patients;
            }
            if let Some(trials) = trials {
                settings.input.trials_path = trials;
            }
            if let Some(output) = output {
                settings.output.matches_path = output;
            }
            settings.validate()?;
            run_matching(&settings)?;
        }
        Commands::Run => {
            settings.validate()?;
            prepare(&settings)?;
            // Match what was just prepared
            settings.input.patients_path = settings.output.patients_path.clone();
            run_matching(&settings)?;
        }
    }

    info!("Done");
    Ok(())
}
