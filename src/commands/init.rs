use crate::args::InitArgs;
use crate::commands::Out;
use crate::{Config, Result};
use anyhow::Context;
use std::path::Path;

/// Writes a new `config.json` at `config_path`, creating its directory if needed.
///
/// # Errors
/// - Returns an error if the file already exists, the sheet URL is not usable or any file
///   operation fails.
pub async fn init(config_path: &Path, args: &InitArgs) -> Result<Out<()>> {
    let config = Config::create(
        config_path,
        args.sheet_url(),
        args.worksheet(),
        args.credentials().map(Path::to_path_buf),
    )
    .await
    .context("Unable to create the configuration")?;
    Ok(format!(
        "Created {} for worksheet '{}'. The service account key is expected at {}",
        config.config_path().display(),
        config.worksheet_name(),
        config.credentials_path().display()
    )
    .into())
}
