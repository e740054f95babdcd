//! Fallback for targets without a location backend.

use crate::{
    CallbackHandle, Location, LocationError, LocationProvider, LocationResult, Resolution,
    ResolutionLaunchError, SettingsOutcome, SettingsRequest, UpdateRequestConfig, UpdateSink,
};

/// Provider that reports location as unavailable.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedProvider;

impl LocationProvider for UnsupportedProvider {
    async fn check_settings(&self, _request: &SettingsRequest) -> SettingsOutcome {
        SettingsOutcome::Unresolvable("no location backend for this platform".into())
    }

    async fn last_location(&self) -> LocationResult<Option<Location>> {
        Err(LocationError::NotAvailable)
    }

    fn request_updates(
        &self,
        _config: &UpdateRequestConfig,
        _handle: CallbackHandle,
        _sink: UpdateSink,
    ) -> LocationResult<()> {
        Err(LocationError::NotAvailable)
    }

    async fn remove_updates(&self, _handle: CallbackHandle) {}

    fn launch_resolution(
        &self,
        _resolution: &Resolution,
        _request_code: i32,
    ) -> Result<(), ResolutionLaunchError> {
        Err(ResolutionLaunchError::Unsupported)
    }
}
