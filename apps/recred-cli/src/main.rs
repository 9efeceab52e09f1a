//! recred - Bulk password reset against an HCM cloud environment
//!
//! Two sequential phases per invocation:
//! - Resolve each requested username to its internal identifier by
//!   running a predefined lookup report
//! - Submit one batched credential update and report per-user outcomes
//!
//! A batch-level rejection aborts with a classified message; a rejection
//! of an individual operation inside an accepted batch shows up as a
//! failed row instead.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod error;
mod formats;
mod output;
mod redact;

use error::{CliError, CliResult};
use formats::export_outcomes_csv;
use output::{print_info, print_outcome_table, print_success, print_warning};
use recred_client::{
    normalize_usernames, outcome, password, AdminCredentials, BulkPatchOrchestrator, Connection,
    IdentifierResolver, PasswordAssignment,
};
use redact::Redactor;

/// Bulk password reset for an HCM cloud environment
#[derive(Parser)]
#[command(name = "recred")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Environment base URL, e.g. https://env.example.com
    #[arg(long)]
    url: String,

    /// Administrator username for both services
    #[arg(long)]
    admin: String,

    /// Administrator password (falls back to $RECRED_ADMIN_PASSWORD, then
    /// an interactive prompt)
    #[arg(long)]
    password: Option<String>,

    /// Comma-separated list of usernames to reset
    #[arg(long)]
    users: String,

    /// Common password to assign to every user; omit to generate a
    /// distinct one per user
    #[arg(long)]
    new_password: Option<String>,

    /// Length of generated passwords
    #[arg(long, default_value_t = 12)]
    length: usize,

    /// Write the outcome report to a CSV file
    #[arg(long, value_name = "PATH")]
    export: Option<PathBuf>,

    /// Print the outcome report as JSON instead of a table
    #[arg(long)]
    json: bool,

    /// Print the raw (redacted) bulk response body for diagnostics
    #[arg(long)]
    show_response: bool,

    /// Skip TLS certificate verification (test environments only)
    #[arg(long)]
    insecure: bool,

    /// HTTP timeout in seconds for each outbound call
    #[arg(long, default_value_t = 60)]
    timeout_secs: u64,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            e.print();
            std::process::exit(e.exit_code());
        }
    }
}

async fn run(cli: Cli) -> CliResult<()> {
    let usernames = normalize_usernames(&cli.users);
    if usernames.is_empty() {
        return Err(CliError::Validation(
            "no usernames supplied: --users expects a comma-separated list".to_string(),
        ));
    }
    if cli.length < password::MIN_LENGTH {
        return Err(CliError::Validation(format!(
            "--length must be at least {}",
            password::MIN_LENGTH
        )));
    }

    let admin_password = admin_password(&cli)?;
    let credentials = AdminCredentials::new(&cli.admin, admin_password);
    let connection = Connection::new(
        cli.url.clone(),
        credentials,
        Duration::from_secs(cli.timeout_secs),
        !cli.insecure,
    )?;

    let records = IdentifierResolver::new(connection.clone())
        .resolve(&usernames)
        .await?;

    if records.is_empty() {
        print_warning("No matching users found.");
        return Ok(());
    }
    if records.len() < usernames.len() {
        print_info(&format!(
            "{} of {} usernames resolved; the rest were not found.",
            records.len(),
            usernames.len()
        ));
    }

    let assignment = PasswordAssignment::from_operator_input(cli.new_password.as_deref(), cli.length);
    let report = BulkPatchOrchestrator::new(connection)
        .submit(&records, &assignment)
        .await?;

    let rows = outcome::rows(&report.outcomes);

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        print_outcome_table(&rows);

        let updated = report.outcomes.iter().filter(|o| o.succeeded()).count();
        let failed = report.outcomes.len() - updated;
        println!();
        if failed == 0 {
            print_success(&format!("{updated} password(s) updated."));
        } else {
            print_warning(&format!("{updated} updated, {failed} failed."));
        }
    }

    if let Some(path) = &cli.export {
        let file = std::fs::File::create(path)?;
        export_outcomes_csv(&rows, file)?;
        print_success(&format!("Report written to {}", path.display()));
    }

    if cli.show_response {
        let redactor = Redactor::new();
        println!("\n{}", redactor.redact(&report.raw_body));
    }

    Ok(())
}

/// Resolve the admin password from the flag, the environment, or an
/// interactive prompt, in that order.
fn admin_password(cli: &Cli) -> CliResult<String> {
    if let Some(password) = &cli.password {
        return Ok(password.clone());
    }
    if let Ok(password) = std::env::var("RECRED_ADMIN_PASSWORD") {
        if !password.is_empty() {
            return Ok(password);
        }
    }
    dialoguer::Password::new()
        .with_prompt(format!("Password for {}", cli.admin))
        .interact()
        .map_err(Into::into)
}
