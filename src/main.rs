use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use povrisk::input::BatchEntry;
use povrisk::{AssessmentForm, RiskEngine, RiskError, SessionStore};

const EXIT_SUCCESS: i32 = 0;
const EXIT_FAILURE: i32 = 1;
const EXIT_INPUT: i32 = 2;
const EXIT_REGION: i32 = 3;
const EXIT_CONFIG: i32 = 4;

#[derive(Args, Debug)]
struct HouseholdArgs {
    /// Annual household income, in the region's currency
    #[arg(long)]
    income: String,

    /// Years of education of the household head
    #[arg(long)]
    education: String,

    /// Employment status: yes/no or number of employed members
    #[arg(long, default_value = "yes")]
    employed: String,

    /// Number of people in the household
    #[arg(long)]
    household: String,

    /// Number of earning members
    #[arg(long, default_value = "1")]
    working: String,

    /// Region (country) key, e.g. India
    #[arg(long)]
    region: String,
}

impl HouseholdArgs {
    fn to_form(&self) -> AssessmentForm {
        AssessmentForm {
            income: self.income.clone(),
            education_years: self.education.clone(),
            employed: self.employed.clone(),
            household_size: self.household.clone(),
            working_members: self.working.clone(),
            region_key: self.region.clone(),
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score a single household
    Assess {
        #[command(flatten)]
        household: HouseholdArgs,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Compare interventions for a single household
    Simulate {
        #[command(flatten)]
        household: HouseholdArgs,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Assess every household in a YAML file and summarize the session
    Batch {
        /// Path to a YAML list of households
        file: PathBuf,

        /// Session name the results are recorded under
        #[arg(long, default_value = "batch")]
        session: String,

        /// Print tab-separated rows instead of detailed output
        #[arg(long)]
        tsv: bool,
    },
    /// List configured regions
    Regions,
}

#[derive(Parser, Debug)]
#[command(name = "povrisk")]
#[command(about = "Household poverty-risk assessment", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/povrisk/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn exit_code(err: &RiskError) -> i32 {
    match err {
        RiskError::InvalidInput { .. } => EXIT_INPUT,
        RiskError::RegionNotFound { .. } => EXIT_REGION,
        RiskError::InvalidConfig { .. } | RiskError::ClassifierUnavailable { .. } => EXIT_CONFIG,
    }
}

fn fail(err: RiskError) -> ! {
    eprintln!("Error: {}", err);
    std::process::exit(exit_code(&err));
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Load config
    let config_path = cli.config.map(PathBuf::from);
    let config = match povrisk::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    // Building the engine validates the whole config at once
    let engine = match RiskEngine::from_config(&config) {
        Ok(engine) => engine,
        Err(RiskError::InvalidConfig { errors }) => {
            eprintln!("Config errors:");
            for error in errors {
                eprintln!("  - {}", error);
            }
            std::process::exit(EXIT_CONFIG);
        }
        Err(e) => fail(e),
    };

    if cli.verbose {
        eprintln!(
            "Loaded {} regions ({} classifier)",
            engine.registry().len(),
            if engine.has_classifier() { "with" } else { "no" }
        );
    }

    let use_colors = povrisk::output::should_use_colors();

    match cli.command {
        Commands::Assess { household, json } => {
            let input = household.to_form().parse().unwrap_or_else(|e| fail(e));
            let assessment = engine.assess_input(&input).unwrap_or_else(|e| fail(e));
            if json {
                print_json(&assessment);
            } else {
                println!(
                    "{}",
                    povrisk::output::format_assessment(&assessment, use_colors)
                );
            }
        }
        Commands::Simulate { household, json } => {
            let input = household.to_form().parse().unwrap_or_else(|e| fail(e));
            let report = engine.simulate_input(&input).unwrap_or_else(|e| fail(e));
            if json {
                print_json(&report);
            } else {
                println!(
                    "{}",
                    povrisk::output::format_scenarios(
                        &report,
                        engine.scenario_config(),
                        use_colors
                    )
                );
            }
        }
        Commands::Batch { file, session, tsv } => {
            let sessions = SessionStore::new(config.session.capacity);
            if let Err(e) = run_batch(&engine, &sessions, &file, &session, tsv, use_colors) {
                eprintln!("Batch error: {:#}", e);
                std::process::exit(EXIT_FAILURE);
            }
        }
        Commands::Regions => {
            println!(
                "{}",
                povrisk::output::format_regions(engine.registry(), use_colors)
            );
        }
    }

    std::process::exit(EXIT_SUCCESS);
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Failed to serialize output: {}", e);
            std::process::exit(EXIT_FAILURE);
        }
    }
}

/// Assess each entry, skipping invalid ones, and print the session summary.
fn run_batch(
    engine: &RiskEngine,
    sessions: &SessionStore,
    file: &Path,
    session: &str,
    tsv: bool,
    use_colors: bool,
) -> Result<()> {
    let content = fs::read_to_string(file)
        .with_context(|| format!("Failed to read batch file at {}", file.display()))?;
    let entries: Vec<BatchEntry> = serde_saphyr::from_str(&content)
        .with_context(|| {
            format!("Failed to parse batch file: invalid YAML in {}", file.display())
        })?;

    let mut assessments = Vec::new();
    for (i, entry) in entries.iter().enumerate() {
        let result = entry
            .to_input()
            .and_then(|input| engine.assess_input(&input));
        match result {
            Ok(assessment) => {
                sessions.record_and_summarize(session, &assessment);
                assessments.push(assessment);
            }
            Err(e) => {
                // Continue with other entries
                eprintln!("Entry {} skipped: {}", i + 1, e);
            }
        }
    }

    if tsv {
        println!("{}", povrisk::output::format_tsv(&assessments));
    } else {
        for assessment in &assessments {
            println!(
                "{}",
                povrisk::output::format_assessment(assessment, use_colors)
            );
            println!();
        }
    }

    let stats = sessions.stats(session).unwrap_or_default();
    println!("{}", povrisk::output::format_session_stats(&stats));
    Ok(())
}
