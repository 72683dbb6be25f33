//! qdppms - CLI entry point.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use qdppms::client::MeasurementReport;
use qdppms::config::{DEFAULT_CONNECTION_LINE, env};
use qdppms::{
    FieldStatus, InstrumentClient, InstrumentConnection, MultiVu, PpmsLibrary, RetryPolicy,
    StatusCode, TemperatureStatus,
};

/// Exit status when a read fell back to the unknown sentinel.
const SENTINEL_EXIT: u8 = 2;

/// Read temperature and field from a Quantum Design instrument.
#[derive(Parser, Debug)]
#[command(name = "qdppms")]
#[command(about = "Read temperature and field from a Quantum Design PPMS through MultiVu")]
#[command(version)]
struct Cli {
    /// Connection line, e.g. remote=False;ip=127.0.0.1;insttype=PPMS
    #[arg(long, env = "QDPPMS_CONFIG", default_value = DEFAULT_CONNECTION_LINE)]
    config: String,

    /// Attempts per read (overrides QDPPMS_RETRY_TRIES)
    #[arg(long)]
    tries: Option<u32>,

    /// Seconds to wait after a failed attempt (overrides QDPPMS_RETRY_WAIT)
    #[arg(long)]
    wait: Option<u64>,

    /// Path to MyPPMSDLL (overrides QDPPMS_DLL_PATH)
    #[arg(long)]
    dll: Option<PathBuf>,

    /// Path to the MultiVu executable (overrides QDPPMS_MULTIVU_PATH)
    #[arg(long)]
    multivu: Option<PathBuf>,

    /// Print readings as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Read the sample temperature (K)
    Temperature,
    /// Read the magnetic field (Oe)
    Field,
    /// List the vendor status codes
    StatusCodes,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let report = match cli.command {
        Command::StatusCodes => {
            print_status_codes();
            return Ok(ExitCode::SUCCESS);
        }
        Command::Temperature => {
            let client = build_client(&cli)?;
            MeasurementReport::new("temperature", "K", &client.get_temperature())
        }
        Command::Field => {
            let client = build_client(&cli)?;
            MeasurementReport::new("field", "Oe", &client.get_field())
        }
    };

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialize reading")?
        );
    } else {
        print_report(&report);
    }

    if report.sentinel {
        eprintln!("Warning: {} could not be read; returned the unknown placeholder", report.quantity);
        return Ok(ExitCode::from(SENTINEL_EXIT));
    }

    Ok(ExitCode::SUCCESS)
}

fn build_client(cli: &Cli) -> Result<InstrumentClient<PpmsLibrary, MultiVu>> {
    let dll_path = cli.dll.clone().unwrap_or_else(env::dll_path);
    let library = PpmsLibrary::load(&dll_path)
        .with_context(|| format!("Could not load the PPMS library from {}", dll_path.display()))?;

    let multivu = cli
        .multivu
        .clone()
        .map(MultiVu::new)
        .unwrap_or_else(MultiVu::from_env);

    let connection = InstrumentConnection::from_line(&cli.config);
    Ok(InstrumentClient::new(connection, library, multivu).with_policy(resolve_policy(cli)))
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Command-line flags take precedence over the environment.
fn resolve_policy(cli: &Cli) -> RetryPolicy {
    let mut policy = env::retry_policy();
    if let Some(tries) = cli.tries {
        policy.tries = tries;
    }
    if let Some(wait) = cli.wait {
        policy.wait = Duration::from_secs(wait);
    }
    policy
}

fn print_report(report: &MeasurementReport) {
    let flag = if report.error { " [error]" } else { "" };
    println!(
        "{}: {} {} ({}){}",
        report.quantity, report.value, report.unit, report.status, flag
    );
}

fn print_status_codes() {
    println!("Temperature status:");
    for status in TemperatureStatus::KNOWN {
        println!("  {:>3}  {}", status.code(), status.label());
    }

    println!("\nField status:");
    for status in FieldStatus::KNOWN {
        println!("  {:>3}  {}", status.code(), status.label());
    }
}
