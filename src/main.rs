use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use gcpadmin::admin::{CloudAdmin, ParentRef, ProjectSummary, OPERATIONS};
use gcpadmin::config::Config;
use gcpadmin::error::format_gcp_error;
use gcpadmin::AdminError;
use serde::Serialize;
use serde_json::{json, Value};
use std::io::Write;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Administrative facade over Google Cloud APIs
#[derive(Parser, Debug)]
#[command(name = "gcpadmin", version, about, long_about = None)]
struct Args {
    /// GCP project to use
    #[arg(short, long, global = true)]
    project: Option<String>,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off", global = true)]
    log_level: LogLevel,

    /// Send every API call to this root instead of googleapis.com
    #[arg(long, global = true)]
    api_root: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json", global = true)]
    output: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every accessible project
    Projects,
    /// Show a project with its labels and org path
    Project { id: Option<String> },
    /// Print the folder/organization path of a project
    OrgPath { id: Option<String> },
    /// List billing accounts
    BillingAccounts,
    /// List organizations
    Organizations,
    /// List folders under a parent such as organizations/123
    Folders { parent: String },
    /// Show bucket metadata
    Bucket { name: String },
    /// Write an object's content to stdout
    Cat { bucket: String, object: String },
    /// Show a service management operation
    Operation { name: String },
    /// List facade operations with their backend and error policy
    Operations,
    /// Remember a default project
    UseProject { id: String },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Yaml,
}

fn setup_logging(level: LogLevel) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let Some(tracing_level) = level.to_tracing_level() else {
        return Ok(None);
    };

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory {:?}", parent))?;
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {:?}", log_path))?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("gcpadmin started with log level: {:?}", level);
    tracing::info!("Log file: {:?}", log_path);

    Ok(Some(guard))
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = Config::config_dir() {
        return config_dir.join("gcpadmin.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".gcpadmin").join("gcpadmin.log");
    }
    PathBuf::from("gcpadmin.log")
}

fn print_value<T: Serialize>(value: &T, format: OutputFormat) -> Result<()> {
    let rendered = match format {
        OutputFormat::Json => serde_json::to_string_pretty(value)?,
        OutputFormat::Yaml => serde_yaml::to_string(value)?,
    };
    println!("{}", rendered.trim_end());
    Ok(())
}

fn require_project(config: &Config, args: &Args, id: Option<String>) -> Result<String> {
    id.or_else(|| config.effective_project(args.project.as_deref()))
        .context("No project given. Pass one, use --project, or run 'gcpadmin use-project <ID>'")
}

/// Org path of a project payload, empty for projects without a parent
async fn org_path(admin: &CloudAdmin, project: &Value) -> Result<String, AdminError> {
    match ParentRef::of_project(project)? {
        Some(parent) => admin.resolve_org_path(&parent).await,
        None => Ok(String::new()),
    }
}

async fn run(args: Args, mut config: Config) -> Result<()> {
    // Commands that need no session
    match &args.command {
        Command::Operations => {
            let table: Vec<Value> = OPERATIONS
                .iter()
                .map(|op| {
                    json!({
                        "name": op.name,
                        "backend": op.backend.to_string(),
                        "errorPolicy": op.policy.to_string(),
                    })
                })
                .collect();
            return print_value(&table, args.output);
        },
        Command::UseProject { id } => {
            config.set_project(id)?;
            println!("Default project set to {}", id);
            return Ok(());
        },
        _ => {},
    }

    let endpoints = config.effective_endpoints(args.api_root.as_deref());
    let admin = CloudAdmin::authenticate(&endpoints).await?;

    match &args.command {
        Command::Projects => {
            let projects: Vec<ProjectSummary> = admin
                .get_projects()
                .await?
                .iter()
                .map(ProjectSummary::from)
                .collect();
            print_value(&projects, args.output)
        },
        Command::Project { id } => {
            let id = require_project(&config, &args, id.clone())?;
            let project = admin.get_project(&id).await?;
            let summary = ProjectSummary::from(&project);
            let path = org_path(&admin, &project).await?;
            print_value(
                &json!({ "project": project, "labels": summary.labels, "orgPath": path }),
                args.output,
            )
        },
        Command::OrgPath { id } => {
            let id = require_project(&config, &args, id.clone())?;
            let project = admin.get_project(&id).await?;
            println!("{}", org_path(&admin, &project).await?);
            Ok(())
        },
        Command::BillingAccounts => print_value(&admin.get_billing_accounts().await?, args.output),
        Command::Organizations => print_value(&admin.get_organizations().await?, args.output),
        Command::Folders { parent } => print_value(&admin.get_folders(parent).await?, args.output),
        Command::Bucket { name } => print_value(&admin.get_bucket(name).await?, args.output),
        Command::Cat { bucket, object } => {
            let bytes = admin.get_bucket_object(bucket, object).await?;
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&bytes)?;
            stdout.flush()?;
            Ok(())
        },
        Command::Operation { name } => {
            print_value(&admin.get_service_operation(name).await?, args.output)
        },
        Command::Operations | Command::UseProject { .. } => Ok(()),
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    let config = Config::load();

    let log_guard = match setup_logging(args.log_level) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Warning: logging disabled: {:#}", e);
            None
        },
    };

    if let Err(e) = run(args, config).await {
        match e.downcast_ref::<AdminError>() {
            Some(admin_error) => eprintln!("Error: {}", format_gcp_error(admin_error)),
            None => eprintln!("Error: {:#}", e),
        }
        tracing::error!("Command failed: {:#}", e);
        drop(log_guard);
        std::process::exit(1);
    }
}
