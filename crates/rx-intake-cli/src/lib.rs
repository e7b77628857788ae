pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rx_intake_core::config::{IntakeConfig, LoadOptions, LogFormat};
use rx_intake_core::{IntakeService, ProductCatalog};
use tracing_subscriber::EnvFilter;

use commands::dose::DoseArgs;
use commands::CommandResult;

#[derive(Debug, Parser)]
#[command(
    name = "rx-intake",
    about = "Rx intake operator CLI",
    long_about = "Recommend products for symptoms, resolve dosages, and inspect the patient intake store.",
    after_help = "Examples:\n  rx-intake recommend \"Insomnia, Anxiety\"\n  rx-intake dose \"Calm Drops\" --age 42 --gender Female\n  rx-intake list --search rao --page 2"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Path to rx-intake.toml (default: ./rx-intake.toml)")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Score catalog products against a comma-delimited symptom list")]
    Recommend {
        symptoms: String,
        #[arg(long, default_value = "All", help = "Category filter, or All")]
        category: String,
    },
    #[command(about = "Resolve the dosage for a product by age and gender")]
    Dose {
        #[arg(help = "Product id or display name")]
        product: String,
        #[arg(long, conflicts_with = "dob", required_unless_present = "dob")]
        age: Option<i64>,
        #[arg(long, help = "Date of birth, YYYY-MM-DD")]
        dob: Option<NaiveDate>,
        #[arg(long)]
        gender: String,
    },
    #[command(about = "List categories, products and normalized symptom keys")]
    Catalog,
    #[command(about = "Store an intake form (JSON file) and print its prescription and e-mail")]
    Submit {
        file: PathBuf,
        #[arg(long, help = "Issue date, YYYY-MM-DD (default: today)")]
        date: Option<NaiveDate>,
    },
    #[command(about = "Page through stored intakes, newest first")]
    List {
        #[arg(long)]
        search: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    #[command(about = "Show one stored intake")]
    Show {
        id: String,
        #[arg(long, help = "Include the prescription as issued today")]
        prescription: bool,
    },
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Command::Recommend { .. } => "recommend",
            Command::Dose { .. } => "dose",
            Command::Catalog => "catalog",
            Command::Submit { .. } => "submit",
            Command::List { .. } => "list",
            Command::Show { .. } => "show",
        }
    }
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    let result = execute(cli);
    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

/// Load configuration, set up logging and dispatch one command.
pub fn execute(cli: Cli) -> CommandResult {
    let name = cli.command.name();

    let options = LoadOptions {
        require_file: cli.config.is_some(),
        config_path: cli.config,
    };
    let config = match IntakeConfig::load(options) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(name, "config_validation", error.to_string(), 2)
        }
    };
    init_logging(&config);

    CommandResult::from_outcome(name, dispatch(cli.command, config))
}

fn dispatch(command: Command, config: IntakeConfig) -> Result<serde_json::Value> {
    let today = chrono::Local::now().date_naive();

    match command {
        Command::Recommend { symptoms, category } => {
            commands::recommend::run(&load_catalog(&config)?, &symptoms, &category)
        }
        Command::Dose {
            product,
            age,
            dob,
            gender,
        } => {
            let args = DoseArgs {
                product,
                gender,
                age,
                date_of_birth: dob,
                today,
            };
            commands::dose::run(&load_catalog(&config)?, &args)
        }
        Command::Catalog => commands::catalog::run(&load_catalog(&config)?),
        Command::Submit { file, date } => {
            let service = open_service(config)?;
            commands::submit::run(&service, &file, date.unwrap_or(today))
        }
        Command::List { search, page } => {
            let service = open_service(config)?;
            commands::intakes::list(&service, search, page)
        }
        Command::Show { id, prescription } => {
            let service = open_service(config)?;
            commands::intakes::show(&service, &id, prescription.then_some(today))
        }
    }
}

fn load_catalog(config: &IntakeConfig) -> Result<ProductCatalog> {
    let path = config.catalog.path.as_deref();
    ProductCatalog::load_or_builtin(path).with_context(|| match path {
        Some(path) => format!("loading catalog {}", path.display()),
        None => "loading built-in catalog".to_string(),
    })
}

fn open_service(config: IntakeConfig) -> Result<IntakeService> {
    let path = config.database.path.clone();
    IntakeService::open(config).with_context(|| format!("opening intake store {}", path.display()))
}

/// Logs go to stderr; stdout carries the JSON result.
fn init_logging(config: &IntakeConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.level.to_ascii_lowercase()));
    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    // A second init in the same process (tests) keeps the first subscriber
    let _ = match config.logging.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}
