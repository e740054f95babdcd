use geoscreen_location::{Coordinate, LocationError, ResolutionLaunchError};

use crate::ToggleLabels;

/// Whether the screen is following location updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackingState {
    /// No updates requested.
    #[default]
    Idle,
    /// The user asked for updates.
    ///
    /// `subscribed` is `false` when the start was skipped (missing permission,
    /// settings not yet verified, provider error): the button still reads
    /// "stop" but no subscription is active.
    Tracking {
        /// Whether a provider subscription is active.
        subscribed: bool,
    },
}

impl TrackingState {
    /// Whether the user has toggled tracking on.
    #[must_use]
    pub const fn is_tracking(self) -> bool {
        matches!(self, Self::Tracking { .. })
    }

    /// Whether a provider subscription is active.
    #[must_use]
    pub const fn is_subscribed(self) -> bool {
        matches!(self, Self::Tracking { subscribed: true })
    }
}

/// Which string the toggle button shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonLabel {
    /// `start_update`.
    #[default]
    Start,
    /// `stop_update`.
    Stop,
}

/// The update toggle control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleButton {
    /// Current label.
    pub label: ButtonLabel,
    /// Whether the user can press it.
    pub enabled: bool,
}

impl Default for ToggleButton {
    fn default() -> Self {
        Self {
            label: ButtonLabel::Start,
            enabled: true,
        }
    }
}

impl ToggleButton {
    /// The localized text for the current label.
    #[must_use]
    pub fn text<'a>(&self, labels: &'a ToggleLabels) -> &'a str {
        match self.label {
            ButtonLabel::Start => &labels.start_update,
            ButtonLabel::Stop => &labels.stop_update,
        }
    }
}

/// What the settings check led to.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SettingsVerdict {
    /// No result yet.
    #[default]
    Pending,
    /// Settings were adequate; the update config and callback are bound.
    Configured,
    /// The resolution flow was launched; its result is not consumed.
    ResolutionLaunched,
    /// The resolution flow could not be launched.
    ResolutionLaunchFailed(ResolutionLaunchError),
    /// Settings are inadequate with nothing to offer the user.
    Unresolvable,
}

/// What the one-shot last-location fetch produced.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LastLocationOutcome {
    /// Not fetched yet.
    #[default]
    Pending,
    /// Permission was missing at creation.
    Skipped,
    /// A cached fix was logged.
    Logged(Coordinate),
    /// The provider had no cached fix; the missing line was logged.
    NoCachedLocation,
    /// The provider failed; nothing was logged.
    Failed(LocationError),
}

/// Result of an Idle to Tracking transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartOutcome {
    /// The provider accepted the subscription.
    Subscribed,
    /// A subscription is already active; nothing was requested.
    AlreadyTracking,
    /// No location permission; the label flipped anyway.
    PermissionMissing,
    /// Settings have not been verified, so no config or callback is bound.
    NotConfigured,
    /// The provider rejected the subscription.
    Failed(LocationError),
}

/// Result of a Tracking to Idle transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    /// `remove_updates` was issued for the bound callback.
    Removed,
    /// No callback was ever bound, so there was nothing to remove.
    NoCallback,
}

/// Result of pressing the toggle button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// The button is disabled; nothing happened.
    Disabled,
    /// Moved towards tracking.
    Started(StartOutcome),
    /// Moved back to idle.
    Stopped(StopOutcome),
}
