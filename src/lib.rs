//! # Geoscreen
//!
//! A single-screen location display: request location permission, verify
//! device settings, show the last known fix and stream coordinate updates
//! behind a start/stop toggle.
//!
//! ## Features
//!
//! - `permission`: Location permission requests.
//! - `location`: Location provider client (last fix, settings check, updates).
//! - `controller`: The screen controller and its event loop.
//!
//! Use the `full` feature to enable everything.
//!
//! ## Example
//!
//! ```toml
//! [dependencies]
//! geoscreen = { version = "0.1", features = ["full"] }
//! ```
//!
//! ```ignore
//! use geoscreen::controller::{LocationScreenController, ScreenConfig};
//! use geoscreen::location::sys::default_provider;
//! use geoscreen::permission::SystemPermissionGate;
//!
//! async fn show() {
//!     let mut screen = LocationScreenController::new(
//!         default_provider(),
//!         SystemPermissionGate,
//!         ScreenConfig::default(),
//!     );
//!     screen.on_create().await;
//!     print!("{}", screen.log().render());
//! }
//! ```

#[cfg(feature = "controller")]
pub use geoscreen_controller as controller;

#[cfg(feature = "location")]
pub use geoscreen_location as location;

#[cfg(feature = "permission")]
pub use geoscreen_permission as permission;
