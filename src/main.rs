use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde_json::json;

mod config;
mod error;
mod intake;
mod models;
mod notify;
mod report;
mod store;
mod workflow;

use config::Config;
use notify::{Notifier, ResendSender};
use store::SignupStore;

#[derive(Parser)]
#[command(name = "newsletter-signups")]
#[command(about = "Newsletter signup processing for JULDD Media", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v: debug, -vv: trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process one signup submission
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        /// Child name; repeat for several children
        #[arg(long = "child")]
        children: Vec<String>,
    },
    /// Print the most recent signups from the sheet
    Recent {
        #[arg(long, default_value_t = store::DEFAULT_RECENT_LIMIT)]
        limit: usize,
    },
    /// Email a digest of recent signups to the operations address
    Report {
        #[arg(long, default_value = "Daily Report")]
        label: String,
    },
    /// Send a digest built from canned sample rows
    TestReport,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt().with_env_filter(log_level).init();

    let config = Config::from_env()?;
    let store = SignupStore::new(config.store_path.clone());
    let notifier = Notifier::new(
        Arc::new(ResendSender::new(config.resend_api_key.clone())),
        config.from_email.clone(),
        config.report_recipient.clone(),
    );

    match cli.command {
        Commands::Signup {
            name,
            email,
            children,
        } => {
            let payload = json!({
                "parentName": name,
                "parentEmail": email,
                "childrenNames": children,
            });
            let (status, response) =
                intake::handle_signup(payload, &store, &notifier, config.persist_signups).await;
            println!("[{status}] {}", response.message);
            if !response.success {
                anyhow::bail!("signup was not accepted");
            }
        }
        Commands::Recent { limit } => {
            let rows = store.read_recent(limit);
            if rows.is_empty() {
                println!("No signups recorded in {} yet.", store.path().display());
            } else {
                for row in &rows {
                    println!(
                        "- {} <{}> on {} (children: {})",
                        row.parent_name, row.parent_email, row.date, row.children_names
                    );
                }
            }
        }
        Commands::Report { label } => {
            let outcome = report::generate(&store, &notifier, &label).await?;
            if outcome.report_html.is_none() {
                println!("No new signups to report.");
            } else {
                println!(
                    "Digest of {} signups sent to {}.",
                    outcome.records.len(),
                    config.report_recipient
                );
            }
        }
        Commands::TestReport => {
            report::send_test_report(&notifier).await?;
            println!("Test report sent to {}.", config.report_recipient);
        }
    }

    Ok(())
}
