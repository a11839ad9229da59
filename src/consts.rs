use std::path::{Path, PathBuf};

use eyre::Context as _;
use once_cell::sync::Lazy;
use tracing::error;

pub static ROOT_DATA_DIR: Lazy<PathBuf> = Lazy::new(data_dir_init);
pub static DATABASE_FILE: Lazy<PathBuf> = Lazy::new(|| ROOT_DATA_DIR.join("opsync.db"));

/// log filter used when `RUST_LOG` is not set
pub const DEFAULT_LOG_FILTER: &str = "info";

fn data_dir_init() -> PathBuf {
    let dir = dirs::data_dir().unwrap_or_else(std::env::temp_dir).join("opsync");

    match init_dir(&dir) {
        Ok(()) => dir,
        Err(error) => {
            error!("{error:?}, falling back to the temp dir");
            std::env::temp_dir()
        }
    }
}

fn init_dir(dir: &Path) -> eyre::Result<()> {
    if !dir.exists() {
        std::fs::create_dir_all(dir)
            .wrap_err_with(|| format!("failed to create data directory at {}", dir.display()))?;
    };

    Ok(())
}
