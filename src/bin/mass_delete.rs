use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr, eyre};
use tracing::{info, warn};

use matrix_tools::application::MassRedactUseCase;
use matrix_tools::infrastructure::config::{MassDeleteArgs, validate_connection};
use matrix_tools::infrastructure::{ConfigStore, MatrixClient, init_logging};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenvy::dotenv().ok();

    let args = MassDeleteArgs::parse();

    let (mut config, ignored) =
        ConfigStore::new().load_or_default(args.logging.config.as_deref())?;
    config.merge_with_args(&args.connection, &args.logging);

    init_logging(&config).wrap_err("failed to initialize logging")?;

    if let Some(e) = ignored {
        warn!(error = %e, "Failed to parse config file, using defaults");
    }

    let connection = validate_connection(&config, &args.connection).map_err(|errors| eyre!("{errors}"))?;

    info!(version = matrix_tools::VERSION, room_id = %connection.room_id, "Starting mass delete");

    let client = MatrixClient::new(connection.server.as_str(), connection.token)?;
    let report = MassRedactUseCase::new(Arc::new(client))
        .execute(&connection.room_id)
        .await?;

    info!(
        pages = report.pages,
        redacted = report.redacted,
        skipped = report.skipped,
        "Done"
    );

    Ok(())
}
