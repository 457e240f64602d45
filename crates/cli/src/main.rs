//! `orderdesk-validate` -- validate one order draft against PostgreSQL.
//!
//! Reads the draft as JSON from `PATH` (or stdin), runs the standard
//! validation pipeline and prints the report as JSON on stdout. Logs go to
//! stderr.
//!
//! # Environment variables
//!
//! | Variable       | Required | Default         | Description                          |
//! |----------------|----------|-----------------|--------------------------------------|
//! | `DATABASE_URL` | yes      | --              | PostgreSQL holding the `orders` table |
//! | `RUST_LOG`     | no       | `orderdesk=info`| Log filter                           |
//! | `LOG_FORMAT`   | no       | `text`          | `json` for structured log lines      |
//!
//! Pipeline limits are read by `PipelineConfig::from_env`.
//!
//! Exit status: `0` accepted, `2` rejected, `1` anything else.

use std::process::ExitCode;

use anyhow::Context;
use orderdesk_cli::input::{read_draft, DraftSource};
use orderdesk_cli::{exit_status, EXIT_FAILURE};
use orderdesk_core::config::PipelineConfig;
use orderdesk_core::validation::{ValidationContext, ValidationPipeline};
use orderdesk_db::PgExistenceOracle;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let json_logs = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "orderdesk=info".into()),
        )
        .with(json_logs.then(|| {
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
        }))
        .with((!json_logs).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr)))
        .init();

    match run().await {
        Ok(status) => ExitCode::from(status),
        Err(err) => {
            tracing::error!(error = format!("{err:#}"), "Order validation failed");
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

async fn run() -> anyhow::Result<u8> {
    let source = DraftSource::from_args(std::env::args().skip(1))?;
    let draft = read_draft(&source)?;

    let config = PipelineConfig::from_env().context("Failed to load pipeline configuration")?;
    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let pool = orderdesk_db::create_pool(&database_url)
        .await
        .context("Failed to connect to database")?;
    orderdesk_db::health_check(&pool)
        .await
        .context("Database health check failed")?;
    tracing::info!("Database connection pool created");

    let oracle = PgExistenceOracle::new(pool);
    let pipeline = ValidationPipeline::new(&config);
    let ctx = ValidationContext::new();

    tracing::info!(operation_id = %ctx.operation_id, title = %draft.title, "Validating order draft");

    let report = pipeline.validate(&draft, &oracle, &ctx).await?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(exit_status(&report))
}
