use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{LazyLock, RwLock};

use crate::render::RenderConfig;
use crate::viewer::ZoomLevel;

pub const CURRENT_VERSION: u32 = 1;
const SETTINGS_FILENAME: &str = "config.yaml";
const APP_NAME: &str = "docview";

const DEFAULT_SESSION_ENDPOINT: &str = "http://localhost:3000/api/billing/session";
const DEFAULT_FALLBACK_URL: &str = "http://localhost:3000/dashboard/billing";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillingSettings {
    #[serde(default = "default_session_endpoint")]
    pub session_endpoint: String,

    /// Where the upgrade action goes when the session has no URL
    #[serde(default = "default_fallback_url")]
    pub fallback_url: String,
}

impl Default for BillingSettings {
    fn default() -> Self {
        Self {
            session_endpoint: default_session_endpoint(),
            fallback_url: default_fallback_url(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default)]
    pub default_zoom: ZoomLevel,

    #[serde(default = "default_notification_secs")]
    pub notification_secs: u64,

    #[serde(default = "default_render_workers")]
    pub render_workers: usize,

    #[serde(default = "default_page_cache_size")]
    pub page_cache_size: usize,

    #[serde(default)]
    pub billing: BillingSettings,
}

fn default_version() -> u32 {
    CURRENT_VERSION
}

fn default_notification_secs() -> u64 {
    5
}

fn default_render_workers() -> usize {
    crate::render::DEFAULT_WORKERS
}

fn default_page_cache_size() -> usize {
    crate::render::DEFAULT_CACHE_SIZE
}

fn default_session_endpoint() -> String {
    DEFAULT_SESSION_ENDPOINT.to_string()
}

fn default_fallback_url() -> String {
    DEFAULT_FALLBACK_URL.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: CURRENT_VERSION,
            default_zoom: ZoomLevel::default(),
            notification_secs: default_notification_secs(),
            render_workers: default_render_workers(),
            page_cache_size: default_page_cache_size(),
            billing: BillingSettings::default(),
        }
    }
}

impl Settings {
    #[must_use]
    pub fn render_config(&self) -> RenderConfig {
        RenderConfig {
            workers: self.render_workers.max(1),
            cache_size: self.page_cache_size.max(1),
        }
    }
}

static SETTINGS: LazyLock<RwLock<Settings>> = LazyLock::new(|| RwLock::new(Settings::default()));

/// `<config dir>/docview/config.yaml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|config| config.join(APP_NAME).join(SETTINGS_FILENAME))
}

/// Load settings from `path`, or from the default location when `None`.
///
/// A missing file is created with defaults. A file that cannot be read or
/// parsed is logged and the defaults stay in effect.
pub fn load_settings(path: Option<&Path>) {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => {
            let Some(p) = default_config_path() else {
                warn!("Could not determine config directory, using default settings");
                return;
            };
            p
        }
    };

    if path.exists() {
        load_settings_from_path(&path);
    } else {
        info!("Settings file not found, creating with defaults at {path:?}");
        save_settings_to_file(&current(), &path);
    }
}

fn load_settings_from_path(path: &Path) {
    match fs::read_to_string(path) {
        Ok(content) => match serde_yaml::from_str::<Settings>(&content) {
            Ok(mut settings) => {
                debug!("Loaded settings from {path:?}");

                if settings.version < CURRENT_VERSION {
                    migrate_settings(&mut settings);
                    save_settings_to_file(&settings, path);
                }

                if let Ok(mut global) = SETTINGS.write() {
                    *global = settings;
                }
            }
            Err(e) => {
                error!("Failed to parse settings file {path:?}: {e}");
            }
        },
        Err(e) => {
            error!("Failed to read settings file {path:?}: {e}");
        }
    }
}

fn migrate_settings(settings: &mut Settings) {
    info!(
        "Migrating settings from v{} to v{}",
        settings.version, CURRENT_VERSION
    );

    // v0 files predate the billing section; serde defaults already filled it

    settings.version = CURRENT_VERSION;
}

fn save_settings_to_file(settings: &Settings, path: &Path) {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            if let Err(e) = fs::create_dir_all(parent) {
                error!("Failed to create config directory {parent:?}: {e}");
                return;
            }
        }
    }

    let body = match serde_yaml::to_string(settings) {
        Ok(body) => body,
        Err(e) => {
            error!("Failed to serialize settings: {e}");
            return;
        }
    };

    match fs::write(path, format!("{SETTINGS_HEADER}{body}")) {
        Ok(()) => debug!("Saved settings to {path:?}"),
        Err(e) => error!("Failed to save settings to {path:?}: {e}"),
    }
}

const SETTINGS_HEADER: &str = r#"# docview settings
#
# default_zoom: one of 100, 150, 200, 250
# render_workers / page_cache_size: read once at startup
# billing.session_endpoint: POST endpoint returning {"url": "..."}
# billing.fallback_url: opened when the session has no URL

"#;

// Public API for accessing settings

/// Snapshot of the current settings
pub fn current() -> Settings {
    SETTINGS.read().map(|s| s.clone()).unwrap_or_default()
}

pub fn get_default_zoom() -> ZoomLevel {
    SETTINGS.read().map(|s| s.default_zoom).unwrap_or_default()
}

pub fn get_notification_secs() -> u64 {
    SETTINGS
        .read()
        .map(|s| s.notification_secs)
        .unwrap_or_else(|_| default_notification_secs())
}

pub fn get_billing() -> BillingSettings {
    SETTINGS
        .read()
        .map(|s| s.billing.clone())
        .unwrap_or_default()
}

/// Override the zoom used for newly opened documents (not persisted)
pub fn set_default_zoom(zoom: ZoomLevel) {
    if let Ok(mut settings) = SETTINGS.write() {
        settings.default_zoom = zoom;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn reset() {
        if let Ok(mut settings) = SETTINGS.write() {
            *settings = Settings::default();
        }
    }

    #[test]
    #[serial]
    fn missing_file_is_created_with_defaults() {
        reset();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.yaml");

        load_settings(Some(&path));

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("# docview settings"));
        let parsed: Settings = serde_yaml::from_str(&written).unwrap();
        assert_eq!(parsed, Settings::default());
    }

    #[test]
    #[serial]
    fn partial_file_fills_defaults() {
        reset();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(
            &path,
            "version: 1\ndefault_zoom: 150\nbilling:\n  fallback_url: https://app.test/billing\n",
        )
        .unwrap();

        load_settings(Some(&path));

        assert_eq!(get_default_zoom(), ZoomLevel::OneAndHalf);
        let billing = get_billing();
        assert_eq!(billing.fallback_url, "https://app.test/billing");
        assert_eq!(billing.session_endpoint, DEFAULT_SESSION_ENDPOINT);
        assert_eq!(get_notification_secs(), 5);
    }

    #[test]
    #[serial]
    fn invalid_zoom_keeps_defaults() {
        reset();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "default_zoom: 175\n").unwrap();

        load_settings(Some(&path));

        assert_eq!(current(), Settings::default());
    }

    #[test]
    #[serial]
    fn old_version_is_migrated_and_rewritten() {
        reset();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "version: 0\nrender_workers: 4\n").unwrap();

        load_settings(Some(&path));

        assert_eq!(current().version, CURRENT_VERSION);
        assert_eq!(current().render_config().workers, 4);
        let rewritten: Settings = serde_yaml::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(rewritten.version, CURRENT_VERSION);
    }

    #[test]
    fn render_config_never_zero() {
        let settings = Settings {
            render_workers: 0,
            page_cache_size: 0,
            ..Settings::default()
        };
        assert_eq!(
            settings.render_config(),
            RenderConfig {
                workers: 1,
                cache_size: 1
            }
        );
    }
}
