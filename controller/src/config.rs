use geoscreen_location::RESOLUTION_REQUEST_CODE;
use geoscreen_permission::Permission;
use serde::{Deserialize, Serialize};

/// Errors from loading a [`ScreenConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The JSON could not be parsed.
    #[error("invalid screen config: {0}")]
    Parse(#[from] serde_json::Error),
    /// The permission batch names no location permission.
    #[error("permission batch must include a location permission")]
    NoLocationPermission,
}

/// Localized toggle button strings, keyed like the resource table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToggleLabels {
    /// Shown while idle.
    pub start_update: String,
    /// Shown while tracking.
    pub stop_update: String,
}

impl Default for ToggleLabels {
    fn default() -> Self {
        Self {
            start_update: "Start updates".into(),
            stop_update: "Stop updates".into(),
        }
    }
}

/// Settings for one location screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenConfig {
    /// Button strings.
    pub labels: ToggleLabels,
    /// Request code passed along when launching a settings resolution.
    pub resolution_request_code: i32,
    /// Permissions requested together on screen creation.
    pub permissions: Vec<Permission>,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            labels: ToggleLabels::default(),
            resolution_request_code: RESOLUTION_REQUEST_CODE,
            permissions: Permission::LOCATION.to_vec(),
        }
    }
}

impl ScreenConfig {
    /// Parse a config from JSON. Missing fields take their defaults.
    ///
    /// # Errors
    /// Returns [`ConfigError`] if the JSON is malformed or the permission
    /// batch is empty.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        if config.permissions.is_empty() {
            return Err(ConfigError::NoLocationPermission);
        }
        Ok(config)
    }
}
