use std::path::{Path, PathBuf};
use std::time::Duration;

use dermadetect_core::endpoints;
use serde::{Deserialize, Serialize};

/// Current config version. Bump this when adding fields or changing shape.
/// Each bump requires a corresponding entry in [`migrate`].
const CURRENT_VERSION: u32 = 2;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000/api";

const DEFAULT_SIMULATED_DELAY_MS: u64 = 2000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Schema version. Missing or 0 = pre-versioned config.
    #[serde(default)]
    pub config_version: u32,
    pub api_base_url: String,
    #[serde(default)]
    pub classifier: ClassifierMode,
    /// Endpoint the remote classifier posts to, relative to the base URL.
    #[serde(default = "default_analysis_path")]
    pub analysis_path: String,
    /// Pause before the local classifier answers. Zero disables it.
    #[serde(default = "default_simulated_delay_ms")]
    pub simulated_delay_ms: u64,
    #[serde(default)]
    pub log_format: LogFormat,
}

/// Which analyzer classifies a captured session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassifierMode {
    /// Image-count rule on the device.
    #[default]
    Local,
    /// Server analysis, falling back to medium on any failure.
    Remote,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config_version: CURRENT_VERSION,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            classifier: ClassifierMode::default(),
            analysis_path: default_analysis_path(),
            simulated_delay_ms: DEFAULT_SIMULATED_DELAY_MS,
            log_format: LogFormat::default(),
        }
    }
}

impl AppConfig {
    pub fn simulated_delay(&self) -> Duration {
        Duration::from_millis(self.simulated_delay_ms)
    }
}

fn default_analysis_path() -> String {
    endpoints::DEFAULT_ANALYSIS.to_string()
}

fn default_simulated_delay_ms() -> u64 {
    DEFAULT_SIMULATED_DELAY_MS
}

pub fn config_dir() -> eyre::Result<PathBuf> {
    let base = dirs::config_dir().ok_or_else(|| eyre::eyre!("no config directory found"))?;
    Ok(base.join("com.dermadetect.app"))
}

pub fn config_path() -> eyre::Result<PathBuf> {
    Ok(config_dir()?.join("config.json"))
}

pub fn has_config() -> bool {
    config_path().map(|p| p.exists()).unwrap_or(false)
}

pub fn load_config() -> eyre::Result<AppConfig> {
    load_config_from(&config_path()?)
}

/// Load the config if one exists, otherwise the defaults.
pub fn load_or_default() -> eyre::Result<AppConfig> {
    let path = config_path()?;
    if path.exists() {
        load_config_from(&path)
    } else {
        Ok(AppConfig::default())
    }
}

pub fn load_config_from(path: &Path) -> eyre::Result<AppConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("failed to read config at {}: {e}", path.display()))?;

    // Parse as raw JSON so we can run migrations before deserializing.
    let json: serde_json::Value = serde_json::from_str(&contents)?;
    let on_disk_version = json
        .get("config_version")
        .and_then(|v| v.as_u64())
        .unwrap_or(0) as u32;

    let migrated = migrate(json, on_disk_version)?;
    let config: AppConfig = serde_json::from_value(migrated)?;
    Ok(config)
}

/// Run sequential migrations from `from_version` up to [`CURRENT_VERSION`].
fn migrate(mut json: serde_json::Value, from_version: u32) -> eyre::Result<serde_json::Value> {
    if from_version > CURRENT_VERSION {
        return Err(eyre::eyre!(
            "config_version {from_version} is newer than this build supports ({CURRENT_VERSION}). \
             Please update DermaDetect."
        ));
    }

    let obj = json
        .as_object_mut()
        .ok_or_else(|| eyre::eyre!("config is not a JSON object"))?;

    // v0 → v1: the base URL was stored as `api_url`
    if from_version < 1 {
        if let Some(url) = obj.remove("api_url") {
            obj.entry("api_base_url").or_insert(url);
        }
        obj.entry("api_base_url")
            .or_insert(serde_json::Value::String(DEFAULT_API_BASE_URL.to_string()));
        tracing::info!("migrated config v0 → v1 (renamed api_url)");
    }

    // v1 → v2: classifier choice became explicit
    if from_version < 2 {
        obj.entry("classifier")
            .or_insert(serde_json::Value::String("local".to_string()));
        tracing::info!("migrated config v1 → v2 (added classifier)");
    }

    obj.insert(
        "config_version".to_string(),
        serde_json::Value::Number(CURRENT_VERSION.into()),
    );
    Ok(json)
}

pub fn save_config(config: &AppConfig) -> eyre::Result<()> {
    save_config_to(&config_path()?, config)
}

pub fn save_config_to(path: &Path, config: &AppConfig) -> eyre::Result<()> {
    // Always write the current version, regardless of what was loaded.
    let mut stamped = config.clone();
    stamped.config_version = CURRENT_VERSION;

    let json = serde_json::to_string_pretty(&stamped)?;
    write_private(path, json.as_bytes())?;

    tracing::info!(path = %path.display(), "config saved");
    Ok(())
}

pub fn delete_config() -> eyre::Result<()> {
    delete_config_at(&config_path()?)
}

pub fn delete_config_at(path: &Path) -> eyre::Result<()> {
    if path.exists() {
        std::fs::remove_file(path)?;
        tracing::info!(path = %path.display(), "config deleted");
    }
    Ok(())
}

/// Write to a sibling temp file with owner-only permissions, then rename
/// over `path`.
pub(crate) fn write_private(path: &Path, contents: &[u8]) -> eyre::Result<()> {
    let dir = path
        .parent()
        .ok_or_else(|| eyre::eyre!("{} has no parent directory", path.display()))?;
    std::fs::create_dir_all(dir)?;

    let file_name = path
        .file_name()
        .ok_or_else(|| eyre::eyre!("{} has no file name", path.display()))?;
    let mut tmp_name = file_name.to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = dir.join(tmp_name);
    std::fs::write(&tmp_path, contents)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&tmp_path, std::fs::Permissions::from_mode(0o600))?;
    }

    std::fs::rename(&tmp_path, path)?;
    Ok(())
}
