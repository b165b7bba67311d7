use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use credit_tracker_app::service::today;
use credit_tracker_app::{Config, CreditTracker};
use credit_tracker_core::{ISO_DATE_FORMAT, parse_date};
use credit_tracker_ledger::LedgerStats;
use credit_tracker_store::JsonFileStore;

#[derive(Parser, Debug)]
#[command(name = "credit-tracker", version, about = "Personal debt/credit ledger")]
struct Cli {
    /// Directory holding the ledger document (overrides CREDIT_TRACKER_DATA_DIR)
    #[arg(long = "data-dir", global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Record a cash withdrawal (a new debt)
    Withdraw {
        amount: String,
        /// Date incurred, YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<String>,
        #[arg(long, default_value = "")]
        note: String,
    },
    /// Record a payment; settles the oldest debts first
    Pay {
        amount: String,
        /// Payment date, YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<String>,
    },
    /// Show total debt, credit, net debt and what is due within 7 days
    Stats {
        #[arg(long = "as-of")]
        as_of: Option<String>,
    },
    /// List withdrawals and payments
    List,
    /// Write Withdrawals.csv and Payments.csv into a directory
    Export { dir: PathBuf },
}

fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let mut config = Config::from_env();
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    credit_tracker_observability::init(config.log_format);

    let store = JsonFileStore::with_key(&config.data_dir, &config.store_key);
    tracing::debug!(path = %store.path().display(), "using ledger document");
    let mut tracker = CreditTracker::open(store);

    match cli.command {
        Command::Withdraw { amount, date, note } => {
            let date = date.unwrap_or_else(today_string);
            let id = tracker
                .record_withdrawal(&amount, &date, &note)
                .context("failed to record withdrawal")?;
            println!("recorded withdrawal {id}");
            print_stats(&tracker.stats());
        }
        Command::Pay { amount, date } => {
            let date = date.unwrap_or_else(today_string);
            let recorded = tracker
                .record_payment(&amount, &date)
                .context("failed to record payment")?;
            println!(
                "recorded payment {} ({} debts paid down, {} credited)",
                recorded.payment_id,
                recorded.allocations.len(),
                recorded.credited
            );
            print_stats(&tracker.stats());
        }
        Command::Stats { as_of } => {
            let stats = match as_of {
                Some(raw) => tracker.stats_as_of(parse_date(&raw).context("invalid --as-of")?),
                None => tracker.stats(),
            };
            print_stats(&stats);
        }
        Command::List => {
            let snapshot = tracker.ledger();
            println!("Withdrawals");
            for w in snapshot.withdrawals {
                println!(
                    "  {}  {:>12.2}  paid {:>12.2}  remaining {:>12.2}  due {}  {}",
                    w.date().format(ISO_DATE_FORMAT),
                    w.amount(),
                    w.settled_amount(),
                    w.remaining_amount(),
                    w.due_date().format(ISO_DATE_FORMAT),
                    w.note().unwrap_or_default()
                );
            }
            println!("Payments");
            for p in snapshot.payments {
                println!("  {}  {:>12.2}", p.date().format(ISO_DATE_FORMAT), p.amount());
            }
        }
        Command::Export { dir } => {
            let written = tracker.export_to(&dir).context("failed to export ledger")?;
            for path in written {
                println!("wrote {}", path.display());
            }
        }
    }

    Ok(())
}

fn today_string() -> String {
    today().format(ISO_DATE_FORMAT).to_string()
}

fn print_stats(stats: &LedgerStats) {
    println!("total debt      {:>12.2}", stats.total_debt);
    println!("credit balance  {:>12.2}", stats.credit_balance);
    println!("net debt        {:>12.2}", stats.net_debt);
    println!("due in 7 days   {:>12.2}", stats.upcoming_7_days);
}
