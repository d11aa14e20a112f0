//! Leavebook summary reporter.
//!
//! Loads one tenant's leave book and prints a balance per employee and leave
//! type as JSON lines.
//!
//! Usage:
//!   leavebook-report <tenant-id> [--as-of YYYY-MM-DD] [--type NAME]... [--running] [--active-only]

use std::io::{self, Write};

use anyhow::{Context, bail};
use chrono::{NaiveDate, Utc};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use leavebook_core::leave::{BalanceEngine, SummaryOptions};
use leavebook_db::{LeaveRepository, connect_with};
use leavebook_shared::{AppConfig, LoggingConfig, types::TenantId};

#[derive(Debug, PartialEq, Eq)]
struct ReportArgs {
    tenant_id: TenantId,
    as_of: Option<NaiveDate>,
    leave_types: Vec<String>,
    running: bool,
    active_only: bool,
}

impl ReportArgs {
    fn parse<I: IntoIterator<Item = String>>(args: I) -> anyhow::Result<Self> {
        let mut tenant_id = None;
        let mut as_of = None;
        let mut leave_types = Vec::new();
        let mut running = false;
        let mut active_only = false;

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--as-of" => {
                    let value = args.next().context("--as-of needs a date")?;
                    as_of = Some(
                        NaiveDate::parse_from_str(&value, "%Y-%m-%d")
                            .with_context(|| format!("invalid --as-of date: {value}"))?,
                    );
                }
                "--type" => leave_types.push(args.next().context("--type needs a name")?),
                "--running" => running = true,
                "--active-only" => active_only = true,
                flag if flag.starts_with("--") => bail!("unknown option: {flag}"),
                id if tenant_id.is_none() => {
                    tenant_id = Some(
                        id.parse::<TenantId>()
                            .with_context(|| format!("invalid tenant id: {id}"))?,
                    );
                }
                extra => bail!("unexpected argument: {extra}"),
            }
        }

        Ok(Self {
            tenant_id: tenant_id.context("missing <tenant-id>")?,
            as_of,
            leave_types,
            running,
            active_only,
        })
    }
}

fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.filter));
    let registry = tracing_subscriber::registry().with(filter);
    if logging.json {
        registry.with(fmt::layer().json().with_writer(io::stderr)).init();
    } else {
        registry.with(fmt::layer().with_writer(io::stderr)).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration (also reads .env)
    let config = AppConfig::load().context("Failed to load configuration")?;
    init_tracing(&config.logging);

    let args = ReportArgs::parse(std::env::args().skip(1))?;
    let as_of = args.as_of.unwrap_or_else(|| Utc::now().date_naive());

    // Connect to database
    let db = connect_with(&config.database).await?;
    info!("Connected to database");

    let repo = LeaveRepository::new(db);
    let book = repo.load_book(args.tenant_id).await?;

    let options = SummaryOptions {
        active_only: args.active_only || config.leave.summary_active_only,
        running: args.running,
    };
    let rows = BalanceEngine::new(&book).summary(&args.leave_types, as_of, options);
    info!(tenant_id = %args.tenant_id, %as_of, rows = rows.len(), "summary ready");

    let mut out = io::stdout().lock();
    for row in &rows {
        serde_json::to_writer(&mut out, row)?;
        writeln!(out)?;
    }
    Ok(())
}
