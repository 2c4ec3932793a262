pub mod declaration;
pub mod error;

pub use declaration::{Declarations, Ensure, NetworkDeclaration};
pub use error::*;

use std::path::{Path, PathBuf};

/// Environment variable pointing at a declaration file
pub const CONFIG_PATH_ENV: &str = "LXNET_CONFIG_PATH";

/// Environment variable enabling dry-run mode
pub const DRY_RUN_ENV: &str = "LXNET_DRY_RUN";

const CANDIDATES: [&str; 2] = ["lxnet.yaml", "lxnet.yml"];

/// Locate the declaration file
///
/// Search order:
/// 1. `explicit` (CLI argument)
/// 2. environment variable `LXNET_CONFIG_PATH`
/// 3. current directory: lxnet.yaml, lxnet.yml
/// 4. `<config dir>/lxnet/lxnet.yaml`, the config dir being the platform's
///    (`~/.config` on Linux, `~/Library/Application Support` on macOS)
pub fn find_declaration_file(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        if path.exists() {
            return Ok(path.to_path_buf());
        }
        return Err(ConfigError::FileNotFound(path.to_path_buf()));
    }

    if let Ok(config_path) = std::env::var(CONFIG_PATH_ENV) {
        let path = PathBuf::from(config_path);
        if path.exists() {
            return Ok(path);
        }
        return Err(ConfigError::FileNotFound(path));
    }

    let current_dir = std::env::current_dir()?;
    for filename in &CANDIDATES {
        let path = current_dir.join(filename);
        if path.exists() {
            return Ok(path);
        }
    }

    if let Some(config_dir) = dirs::config_dir() {
        let global = config_dir.join("lxnet").join("lxnet.yaml");
        if global.exists() {
            return Ok(global);
        }
    }

    Err(ConfigError::DeclarationNotFound)
}

/// Dry-run is on if requested on the command line or via `LXNET_DRY_RUN`
pub fn resolve_dry_run(flag: bool) -> bool {
    flag || std::env::var(DRY_RUN_ENV)
        .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(false)
}

/// Expand a leading `~/` to the home directory
pub fn expand_home(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}
