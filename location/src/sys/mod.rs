//! Platform-specific location implementations.

#[cfg(target_os = "linux")]
mod linux;

mod unsupported;

// Re-export platform implementations
#[cfg(target_os = "linux")]
pub use linux::GeoClueProvider;

pub use unsupported::UnsupportedProvider;

/// Provider used when the caller does not supply one.
#[cfg(target_os = "linux")]
pub type DefaultProvider = GeoClueProvider;

/// Provider used when the caller does not supply one.
#[cfg(not(target_os = "linux"))]
pub type DefaultProvider = UnsupportedProvider;

/// Construct the provider for the current target.
#[must_use]
pub fn default_provider() -> DefaultProvider {
    DefaultProvider::default()
}
