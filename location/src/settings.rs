use crate::{Priority, UpdateRequestConfig};

/// Request code the location screen uses when launching a resolution flow.
pub const RESOLUTION_REQUEST_CODE: i32 = 100;

/// What the device settings must support.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettingsRequest {
    /// Accuracy class that must be satisfiable.
    pub priority: Priority,
}

impl SettingsRequest {
    /// Settings needed to serve `config`.
    #[must_use]
    pub const fn for_config(config: &UpdateRequestConfig) -> Self {
        Self {
            priority: config.priority,
        }
    }
}

/// A platform flow that can change device settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Platform identifier of the flow to launch.
    pub action: String,
}

impl Resolution {
    /// Create a resolution for the given platform action.
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
        }
    }
}

/// Result of checking device settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsOutcome {
    /// Current settings are adequate.
    Satisfied,
    /// Settings are inadequate but the user can fix them through `Resolution`.
    ResolutionRequired(Resolution),
    /// Settings are inadequate and nothing can be offered.
    Unresolvable(String),
}

/// Errors from launching a resolution flow.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolutionLaunchError {
    /// The platform has no settings flow to launch.
    #[error("settings resolution not supported on this platform")]
    Unsupported,
    /// The platform refused to start the flow.
    #[error("failed to launch settings resolution: {0}")]
    Failed(String),
}
