use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr, eyre};
use tracing::{info, warn};

use matrix_tools::application::{UploadPackRequest, UploadPackUseCase};
use matrix_tools::infrastructure::config::{UploaderArgs, validate_uploader};
use matrix_tools::infrastructure::{ConfigStore, ImageClassifier, MatrixClient, init_logging};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenvy::dotenv().ok();

    let args = UploaderArgs::parse();

    let (mut config, ignored) =
        ConfigStore::new().load_or_default(args.logging.config.as_deref())?;
    config.merge_with_args(&args.connection, &args.logging);

    init_logging(&config).wrap_err("failed to initialize logging")?;

    if let Some(e) = ignored {
        warn!(error = %e, "Failed to parse config file, using defaults");
    }

    let settings = validate_uploader(&config, &args).map_err(|errors| eyre!("{errors}"))?;

    info!(version = matrix_tools::VERSION, server = %settings.connection.server, "Starting emoji uploader");

    let client = MatrixClient::new(settings.connection.server.as_str(), settings.connection.token)?;
    let use_case = UploadPackUseCase::new(Arc::new(client), Arc::new(ImageClassifier::new()));

    let request = UploadPackRequest::new(
        settings.connection.room_id,
        settings.pack_name,
        settings.path,
    );
    let response = use_case.execute(request).await?;

    for skipped in &response.failed {
        warn!(path = %skipped.path.display(), reason = %skipped.reason, "Not included in pack");
    }

    info!(
        pack_id = %response.pack_id,
        images = response.pack.images.len(),
        uploaded = response.uploaded.len(),
        existing = response.existing.len(),
        skipped = response.failed.len(),
        avatar_updated = response.avatar_updated,
        "Done"
    );

    Ok(())
}
