//! drive_fetch CLI - download files from Google Drive.

use anyhow::{Context, Result};
use clap::Parser;

use drive_fetch::config::CredentialSource;
use drive_fetch::{Authenticator, Config, DriveClient};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();
    drive_fetch::logging::init_logging(&config.log_level, config.log_format);

    let settings = config.validate().context("Invalid configuration")?;

    let auth = match &settings.credentials {
        CredentialSource::Inline(json) => Authenticator::from_json(json),
        CredentialSource::File(path) => Authenticator::from_file(path),
    }
    .context("Failed to load credentials")?
    .with_scope(settings.scope.as_str());

    let client = DriveClient::new(auth, settings.drive_id.clone());

    let summary = drive_fetch::run(&settings, &client)
        .await
        .context("Unable to resolve files")?;
    println!("{}", summary);

    if !summary.is_success() {
        anyhow::bail!("{} of {} download(s) failed", summary.failed(), summary.total());
    }

    Ok(())
}
