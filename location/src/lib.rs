//! Location provider client.
//!
//! This crate wraps the platform location service behind the
//! [`LocationProvider`] trait: one-shot last-known location, a settings check
//! against an accuracy profile, and a continuous update subscription that
//! delivers batches over a channel.

#![warn(missing_docs)]

mod config;
mod provider;
mod settings;
/// Platform-specific implementations.
pub mod sys;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use config::{Priority, UpdateRequestConfig};
pub use provider::{CallbackHandle, LocationBatch, LocationProvider, UpdateSink, update_channel};
pub use settings::{
    RESOLUTION_REQUEST_CODE, Resolution, ResolutionLaunchError, SettingsOutcome, SettingsRequest,
};

/// A latitude/longitude pair as reported by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

impl Coordinate {
    /// Create a coordinate.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}, {:?}", self.latitude, self.longitude)
    }
}

/// A geographic location with coordinates and metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Latitude in degrees (-90 to 90).
    pub latitude: f64,
    /// Longitude in degrees (-180 to 180).
    pub longitude: f64,
    /// Altitude in meters above sea level, if available.
    pub altitude: Option<f64>,
    /// Horizontal accuracy in meters, if available.
    pub horizontal_accuracy: Option<f64>,
    /// Vertical accuracy in meters, if available.
    pub vertical_accuracy: Option<f64>,
    /// Timestamp as Unix epoch milliseconds.
    pub timestamp: u64,
}

impl Location {
    /// A location carrying only coordinates.
    #[must_use]
    pub const fn from_coordinate(coordinate: Coordinate, timestamp: u64) -> Self {
        Self {
            latitude: coordinate.latitude,
            longitude: coordinate.longitude,
            altitude: None,
            horizontal_accuracy: None,
            vertical_accuracy: None,
            timestamp,
        }
    }

    /// The latitude/longitude of this fix.
    #[must_use]
    pub const fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}

/// Errors that can occur when accessing location.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocationError {
    /// Location services are disabled on the device.
    #[error("location services disabled")]
    ServiceDisabled,
    /// Location is not available.
    #[error("location not available")]
    NotAvailable,
    /// An unknown error occurred.
    #[error("unknown error: {0}")]
    Unknown(String),
}

/// Result alias for location operations.
pub type LocationResult<T> = Result<T, LocationError>;
