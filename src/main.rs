//! Policy Tracker CLI
//!
//! Dashboard, renewals, reports and policy creation over a CSV data directory

use anyhow::{bail, Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use uuid::Uuid;

use policy_tracker::notify::LogNotifier;
use policy_tracker::session::StaticAuth;
use policy_tracker::{CsvStore, DeskError, PolicyDesk, PolicyForm, Session, TrackerConfig};

#[derive(Parser, Debug)]
#[command(
    name = "policy-tracker",
    version,
    about = "Client and policy tracking: renewals, reports, new policies"
)]
struct Cli {
    /// Directory holding clients.csv / policies.csv / profiles.csv
    #[arg(long, env = "POLICY_TRACKER_DATA", global = true)]
    data_dir: Option<PathBuf>,

    /// Signed-in user id
    #[arg(long, env = "POLICY_TRACKER_USER", global = true)]
    user: Option<Uuid>,

    /// JSON config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Evaluate windows as of this instant (RFC 3339) instead of the clock
    #[arg(long, global = true)]
    now: Option<DateTime<Utc>>,

    /// Print JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Summary cards
    Dashboard,
    /// Active policies expiring in the renewals window
    Renewals,
    /// Policies by type and premium by month
    Report,
    /// Client list ordered by name
    Clients,
    /// Create a new active policy
    CreatePolicy(CreateArgs),
}

#[derive(Args, Debug)]
struct CreateArgs {
    /// Client id (see `clients`)
    #[arg(long)]
    client: String,

    #[arg(long)]
    number: String,

    #[arg(long = "type")]
    policy_type: String,

    #[arg(long)]
    premium: String,

    /// Start date (YYYY-MM-DD)
    #[arg(long)]
    start: NaiveDate,

    /// Expiration date (YYYY-MM-DD), after the start date
    #[arg(long)]
    expire: NaiveDate,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => TrackerConfig::from_path(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => TrackerConfig::default(),
    };
    if let Some(dir) = &cli.data_dir {
        config.data_dir = dir.clone();
    }

    let store = CsvStore::open(&config.data_dir)
        .with_context(|| format!("opening data directory {}", config.data_dir.display()))?;
    let auth = match cli.user {
        Some(id) => StaticAuth::signed_in(id),
        None => StaticAuth::anonymous(),
    };
    let session = Session::start(auth);
    if !session.is_authenticated() {
        log::warn!("No user given (--user / POLICY_TRACKER_USER); views will be empty");
    }

    let mut desk = PolicyDesk::new(store, session, config);
    let now = cli.now.unwrap_or_else(Utc::now);

    if !cli.json {
        match desk.greeting_name() {
            Some(name) => println!("Sistema de Gestión - {}\n", name),
            None => println!("Sistema de Gestión\n"),
        }
    }

    match cli.command {
        Command::Dashboard => {
            let stats = desk.dashboard(now);
            if cli.json {
                return print_json(&stats);
            }
            println!("{:<16} {:>12}", "Clientes", stats.total_clients);
            println!("{:<16} {:>12}", "Renovaciones", stats.expiring_policies);
            println!("{:<16} {:>12}", "Cartera Activa", stats.active_policies);
            println!("{:<16} {:>12}", "Reportes", format!("${:.2}", stats.total_revenue));
        }

        Command::Renewals => {
            let rows = desk.renewals(now);
            if cli.json {
                return print_json(&rows);
            }
            if rows.is_empty() {
                println!(
                    "No hay renovaciones próximas en los siguientes {} días",
                    desk.config().renewals_window_days
                );
                return Ok(());
            }
            println!(
                "{:<24} {:<16} {:<12} {:<12} {:>12}  {}",
                "Cliente", "Póliza", "Tipo", "Vencimiento", "Prima", "Estado"
            );
            println!("{}", "-".repeat(100));
            for row in &rows {
                let p = &row.policy;
                println!(
                    "{:<24} {:<16} {:<12} {:<12} {:>12}  {}",
                    p.client.name,
                    p.policy_number,
                    p.policy_type,
                    p.expire_date.format("%d/%m/%Y").to_string(),
                    format!("${:.2}", p.premium_amount),
                    row.badge(),
                );
            }
        }

        Command::Report => {
            let report = desk.report();
            if cli.json {
                return print_json(&report);
            }
            println!("{:<18} {:>12}", "Total Clientes", report.total_clients);
            println!("{:<18} {:>12}", "Pólizas Activas", report.active_policies);
            println!(
                "{:<18} {:>12}",
                "Ingresos Totales",
                format!("${:.2}", report.total_revenue)
            );
            println!("{:<18} {:>12}", "Renovaciones", report.renewed_policies);

            println!("\nPólizas por Tipo:");
            for slice in &report.policies_by_type {
                println!("  {:<20} {:>6}", slice.name, slice.value);
            }

            println!("\nIngresos por Mes:");
            for bar in &report.revenue_by_month {
                println!("  {:<10} {:>14.2}", bar.month, bar.revenue);
            }
        }

        Command::Clients => {
            let clients = desk.clients();
            if cli.json {
                return print_json(&clients);
            }
            for client in &clients {
                println!(
                    "{}  {:<28} {}",
                    client.id,
                    client.name,
                    client.email.as_deref().unwrap_or("")
                );
            }
        }

        Command::CreatePolicy(args) => {
            let mut form = PolicyForm {
                client_id: args.client,
                policy_number: args.number,
                policy_type: args.policy_type,
                premium_amount: args.premium,
                start_date: Some(args.start),
                expire_date: Some(args.expire),
            };
            let mut notifier = LogNotifier;

            match desk.create_policy(&mut form, &mut notifier, None) {
                Ok(()) => {}
                Err(DeskError::Validation(errors)) => {
                    for e in &errors.errors {
                        eprintln!("  {}: {}", e.field, e.message);
                    }
                    bail!("invalid policy input");
                }
                Err(e) => return Err(e).context("creating policy"),
            }
        }
    }

    Ok(())
}
