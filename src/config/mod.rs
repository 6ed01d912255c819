mod settings;
mod state;

pub use settings::{ApiSettings, Company, Config, PdfSettings};
pub use state::{FetchEntry, State};

use crate::error::{ConsoleError, Result};
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

/// Get the config directory path (~/.tradectl/)
pub fn config_dir() -> Result<PathBuf> {
    // First try XDG-style directories
    if let Some(proj_dirs) = ProjectDirs::from("", "", "tradectl") {
        return Ok(proj_dirs.config_dir().to_path_buf());
    }

    // Fallback to ~/.tradectl/
    let home = dirs_home().ok_or_else(|| {
        ConsoleError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Could not determine home directory",
        ))
    })?;

    Ok(home.join(".tradectl"))
}

fn dirs_home() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

/// Expand ~ in paths
pub fn expand_path(path: &str) -> PathBuf {
    if path.starts_with("~/") {
        if let Some(home) = dirs_home() {
            return home.join(&path[2..]);
        }
    }
    PathBuf::from(path)
}

/// Resolve the PDF output dir relative to the config dir when it is not
/// absolute.
pub fn resolve_output_dir(configured: &str, config_dir: &Path) -> PathBuf {
    let expanded = expand_path(configured);
    if expanded.is_absolute() {
        expanded
    } else {
        config_dir.join(expanded)
    }
}

/// Where fetched collections are cached.
pub fn cache_path(config_dir: &Path, report: &str) -> PathBuf {
    config_dir.join("data").join(format!("{report}.json"))
}

/// Load the main config.toml
pub fn load_config(config_dir: &Path) -> Result<Config> {
    let path = config_dir.join("config.toml");
    if !path.exists() {
        return Err(ConsoleError::ConfigFileNotFound(path));
    }
    let content = fs::read_to_string(&path)?;
    toml::from_str(&content).map_err(|e| ConsoleError::ConfigParse { path, source: e })
}

/// Load state.toml (creates default if missing)
pub fn load_state(config_dir: &Path) -> Result<State> {
    let path = config_dir.join("state.toml");
    if !path.exists() {
        return Ok(State::default());
    }
    let content = fs::read_to_string(&path)?;
    toml::from_str(&content).map_err(|e| ConsoleError::ConfigParse { path, source: e })
}

/// Save state.toml
pub fn save_state(config_dir: &Path, state: &State) -> Result<()> {
    let path = config_dir.join("state.toml");
    let content = toml::to_string_pretty(state).map_err(|e| {
        ConsoleError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            e.to_string(),
        ))
    })?;
    fs::write(path, content)?;
    Ok(())
}

/// Template content for config.toml
pub const CONFIG_TEMPLATE: &str = r#"[company]
name = "Your Trading Company"
address = "12 Harbor Road"
city = "Aden"
country = "Yemen"
email = "office@yourcompany.com"
# phone = "+967-1-234567"    # optional
# tax_id = "TAX-123456"      # optional

[api]
base_url = "https://erp.example.com/api"
# token = "paste-your-bearer-token-here"
timeout_secs = 10

[pdf]
output_dir = "output"
"#;
