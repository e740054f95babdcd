//! The location screen.
//!
//! [`LocationScreenController`] drives a single screen that shows device
//! coordinates. On creation it requests coarse and fine location permission,
//! checks device settings against the update profile, and logs the last
//! known fix if access is already held. A toggle button then starts and
//! stops continuous updates; each delivered batch adds its newest fix to the
//! top of the [`DisplayLog`]. Pausing the screen always stops updates.
//!
//! [`ScreenDriver`] runs the controller as one event loop over UI commands
//! and provider batches.
//!
//! # Usage
//!
//! ```ignore
//! use geoscreen_controller::{LocationScreenController, ScreenConfig, ScreenDriver};
//! use geoscreen_location::sys::default_provider;
//! use geoscreen_permission::SystemPermissionGate;
//!
//! let controller = LocationScreenController::new(
//!     default_provider(),
//!     SystemPermissionGate,
//!     ScreenConfig::default(),
//! );
//! let (driver, handle) = ScreenDriver::new(controller);
//! handle.toggle();
//! let controller = driver.run().await;
//! print!("{}", controller.log().render());
//! ```

#![warn(missing_docs)]

mod config;
mod controller;
mod display;
mod driver;
mod state;
#[cfg(test)]
mod testing;

pub use config::{ConfigError, ScreenConfig, ToggleLabels};
pub use controller::LocationScreenController;
pub use display::{DisplayLog, MISSING_COORDINATE};
pub use driver::{ScreenDriver, ScreenEvent, ScreenHandle, UiCommand};
pub use state::{
    ButtonLabel, LastLocationOutcome, SettingsVerdict, StartOutcome, StopOutcome, ToggleButton,
    ToggleOutcome, TrackingState,
};
