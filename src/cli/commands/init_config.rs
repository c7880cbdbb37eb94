//! Print the default configuration.

use anyhow::{bail, Context, Result};
use supertrend_config::default_toml;
use tracing::info;

use crate::cli::InitConfigArgs;

pub async fn run(args: InitConfigArgs) -> Result<()> {
    let rendered = default_toml()?;

    match &args.output {
        Some(path) => {
            if path.exists() && !args.force {
                bail!("{} already exists (use --force to overwrite)", path.display());
            }
            if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
                tokio::fs::create_dir_all(dir)
                    .await
                    .with_context(|| format!("Failed to create {}", dir.display()))?;
            }
            tokio::fs::write(path, rendered)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Default configuration written to {:?}", path);
        }
        None => print!("{}", rendered),
    }

    Ok(())
}
