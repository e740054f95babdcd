use async_channel::Receiver;
use futures::future::LocalBoxFuture;
use futures::stream::FuturesUnordered;
use futures::{FutureExt, StreamExt};
use geoscreen_location::{
    CallbackHandle, Coordinate, Location, LocationBatch, LocationProvider, LocationResult,
    SettingsOutcome, SettingsRequest, UpdateRequestConfig, UpdateSink, update_channel,
};
use geoscreen_permission::{PermissionError, PermissionGate, PermissionGrants};
use log::{debug, info, trace, warn};

use crate::{
    ButtonLabel, DisplayLog, LastLocationOutcome, ScreenConfig, SettingsVerdict, StartOutcome,
    StopOutcome, ToggleButton, ToggleOutcome, TrackingState,
};

/// Controller behind the single location screen.
///
/// Owns the tracking state, the toggle button and the display log. Provider
/// and permission calls go through `P` and `G`; update batches arrive on an
/// internal channel whose sink is handed to the provider on each start.
#[derive(Debug)]
pub struct LocationScreenController<P, G> {
    provider: P,
    gate: G,
    config: ScreenConfig,
    state: TrackingState,
    view: ScreenView,
    sink: UpdateSink,
    updates: Receiver<LocationBatch>,
}

/// What the screen shows and what creation has bound so far.
#[derive(Debug)]
struct ScreenView {
    button: ToggleButton,
    log: DisplayLog,
    update_config: Option<UpdateRequestConfig>,
    callback: Option<CallbackHandle>,
    settings: SettingsVerdict,
    last_location: LastLocationOutcome,
}

/// One completed request of screen creation.
enum CreateStep {
    Permissions(Result<PermissionGrants, PermissionError>),
    Settings(SettingsOutcome),
    LastLocation(LocationResult<Option<Location>>),
}

impl ScreenView {
    fn new() -> Self {
        Self {
            button: ToggleButton::default(),
            log: DisplayLog::new(),
            update_config: None,
            callback: None,
            settings: SettingsVerdict::Pending,
            last_location: LastLocationOutcome::Pending,
        }
    }

    fn apply_permissions(&mut self, result: Result<PermissionGrants, PermissionError>) -> bool {
        let grants = result.unwrap_or_else(|err| {
            warn!("location permission request failed: {err}");
            PermissionGrants::new()
        });

        if !grants.any_location_granted() {
            debug!("no location permission granted, disabling update toggle");
            self.button.enabled = false;
        }
        self.button.enabled
    }

    fn apply_settings<P: LocationProvider>(
        &mut self,
        provider: &P,
        request_code: i32,
        outcome: SettingsOutcome,
    ) -> &SettingsVerdict {
        self.settings = match outcome {
            SettingsOutcome::Satisfied => {
                if self.update_config.is_none() {
                    self.update_config = Some(UpdateRequestConfig::default());
                    self.callback = Some(CallbackHandle::next());
                }
                SettingsVerdict::Configured
            }
            SettingsOutcome::ResolutionRequired(resolution) => {
                match provider.launch_resolution(&resolution, request_code) {
                    Ok(()) => SettingsVerdict::ResolutionLaunched,
                    Err(err) => {
                        debug!("settings resolution not launched: {err}");
                        SettingsVerdict::ResolutionLaunchFailed(err)
                    }
                }
            }
            SettingsOutcome::Unresolvable(reason) => {
                debug!("location settings unresolvable: {reason}");
                SettingsVerdict::Unresolvable
            }
        };
        &self.settings
    }

    fn apply_last_location(
        &mut self,
        result: Option<LocationResult<Option<Location>>>,
    ) -> &LastLocationOutcome {
        self.last_location = match result {
            None => LastLocationOutcome::Skipped,
            Some(Ok(Some(location))) => {
                let coordinate = location.coordinate();
                self.log.push_coordinate(coordinate);
                LastLocationOutcome::Logged(coordinate)
            }
            Some(Ok(None)) => {
                self.log.push_missing();
                LastLocationOutcome::NoCachedLocation
            }
            Some(Err(err)) => {
                debug!("last location unavailable: {err}");
                LastLocationOutcome::Failed(err)
            }
        };
        &self.last_location
    }
}

impl<P: LocationProvider, G: PermissionGate> LocationScreenController<P, G> {
    /// Create a controller in the idle state. Nothing is requested until
    /// [`on_create`](Self::on_create).
    pub fn new(provider: P, gate: G, config: ScreenConfig) -> Self {
        let (sink, updates) = update_channel();
        Self {
            provider,
            gate,
            config,
            state: TrackingState::Idle,
            view: ScreenView::new(),
            sink,
            updates,
        }
    }

    /// Screen entry: request permissions, check settings and, if location
    /// access is already held, fetch the last known fix.
    ///
    /// The three requests run concurrently and each result is applied as soon
    /// as it arrives, so an open permission prompt does not hold back the
    /// settings check or the cached fix.
    pub async fn on_create(&mut self) {
        let permitted = self.gate.location_granted().await;
        let request = SettingsRequest::for_config(&UpdateRequestConfig::default());

        let Self {
            provider,
            gate,
            config,
            view,
            ..
        } = self;
        let (provider, gate, config) = (&*provider, &*gate, &*config);

        let mut steps: FuturesUnordered<LocalBoxFuture<'_, CreateStep>> = FuturesUnordered::new();
        steps.push(
            gate.request_all(&config.permissions)
                .map(CreateStep::Permissions)
                .boxed_local(),
        );
        steps.push(
            provider
                .check_settings(&request)
                .map(CreateStep::Settings)
                .boxed_local(),
        );
        if permitted {
            steps.push(
                provider
                    .last_location()
                    .map(CreateStep::LastLocation)
                    .boxed_local(),
            );
        } else {
            view.apply_last_location(None);
        }

        while let Some(step) = steps.next().await {
            match step {
                CreateStep::Permissions(result) => {
                    view.apply_permissions(result);
                }
                CreateStep::Settings(outcome) => {
                    view.apply_settings(provider, config.resolution_request_code, outcome);
                }
                CreateStep::LastLocation(result) => {
                    view.apply_last_location(Some(result));
                }
            }
        }
    }

    /// Apply the batch permission result. Returns whether the toggle stays
    /// enabled.
    pub fn apply_permissions(&mut self, result: Result<PermissionGrants, PermissionError>) -> bool {
        self.view.apply_permissions(result)
    }

    /// Apply the settings check result.
    ///
    /// On success the update config and callback are bound; they are never
    /// rebuilt by a later success. A resolvable failure launches the
    /// resolution flow.
    pub fn apply_settings(&mut self, outcome: SettingsOutcome) -> &SettingsVerdict {
        self.view
            .apply_settings(&self.provider, self.config.resolution_request_code, outcome)
    }

    /// Apply the last-location fetch. `None` means the fetch was skipped.
    pub fn apply_last_location(
        &mut self,
        result: Option<LocationResult<Option<Location>>>,
    ) -> &LastLocationOutcome {
        self.view.apply_last_location(result)
    }

    /// Handle a press of the toggle button.
    pub async fn toggle(&mut self) -> ToggleOutcome {
        if !self.view.button.enabled {
            return ToggleOutcome::Disabled;
        }
        if self.state.is_tracking() {
            ToggleOutcome::Stopped(self.stop_updates().await)
        } else {
            ToggleOutcome::Started(self.start_updates().await)
        }
    }

    /// Move to tracking and subscribe the bound callback.
    ///
    /// The label flips to "stop" even when the subscription is skipped.
    /// Calling this while a subscription is active does nothing.
    pub async fn start_updates(&mut self) -> StartOutcome {
        if self.state.is_subscribed() {
            return StartOutcome::AlreadyTracking;
        }

        self.state = TrackingState::Tracking { subscribed: false };
        self.view.button.label = ButtonLabel::Stop;

        if !self.gate.location_granted().await {
            info!("location updates not started: permission missing");
            return StartOutcome::PermissionMissing;
        }

        let (Some(config), Some(handle)) = (self.view.update_config, self.view.callback) else {
            info!("location updates not started: settings not verified");
            return StartOutcome::NotConfigured;
        };

        match self
            .provider
            .request_updates(&config, handle, self.sink.clone())
        {
            Ok(()) => {
                self.state = TrackingState::Tracking { subscribed: true };
                info!("location updates started for {handle}");
                StartOutcome::Subscribed
            }
            Err(err) => {
                warn!("location updates not started: {err}");
                StartOutcome::Failed(err)
            }
        }
    }

    /// Move to idle and unsubscribe the bound callback, whether or not it is
    /// active.
    pub async fn stop_updates(&mut self) -> StopOutcome {
        self.state = TrackingState::Idle;
        self.view.button.label = ButtonLabel::Start;

        let Some(handle) = self.view.callback else {
            return StopOutcome::NoCallback;
        };
        self.provider.remove_updates(handle).await;
        info!("location updates removed for {handle}");
        StopOutcome::Removed
    }

    /// Screen pause: force-stop updates.
    pub async fn on_pause(&mut self) -> StopOutcome {
        self.stop_updates().await
    }

    /// Log the newest fix of `batch`. Empty batches and batches arriving
    /// without an active subscription are ignored.
    pub fn handle_batch(&mut self, batch: &LocationBatch) -> Option<Coordinate> {
        if !self.state.is_subscribed() {
            trace!("dropping {} late location fixes", batch.len());
            return None;
        }
        if batch.is_empty() {
            trace!("empty location batch");
            return None;
        }
        let coordinate = batch.latest()?.coordinate();
        self.view.log.push_coordinate(coordinate);
        Some(coordinate)
    }

    /// Apply every batch already waiting on the update channel. Returns how
    /// many lines were logged.
    pub fn drain_updates(&mut self) -> usize {
        let mut logged = 0;
        while let Ok(batch) = self.updates.try_recv() {
            if self.handle_batch(&batch).is_some() {
                logged += 1;
            }
        }
        logged
    }

    /// Receiver for batches pushed by the provider.
    #[must_use]
    pub fn updates(&self) -> Receiver<LocationBatch> {
        self.updates.clone()
    }

    /// Current tracking state.
    #[must_use]
    pub const fn state(&self) -> TrackingState {
        self.state
    }

    /// Current toggle button.
    #[must_use]
    pub const fn button(&self) -> ToggleButton {
        self.view.button
    }

    /// Localized text of the toggle button.
    #[must_use]
    pub fn button_text(&self) -> &str {
        self.view.button.text(&self.config.labels)
    }

    /// The coordinate log.
    #[must_use]
    pub const fn log(&self) -> &DisplayLog {
        &self.view.log
    }

    /// Update config bound by a successful settings check.
    #[must_use]
    pub const fn update_config(&self) -> Option<&UpdateRequestConfig> {
        self.view.update_config.as_ref()
    }

    /// Callback handle bound by a successful settings check.
    #[must_use]
    pub const fn callback(&self) -> Option<CallbackHandle> {
        self.view.callback
    }

    /// Outcome of the settings check.
    #[must_use]
    pub const fn settings_verdict(&self) -> &SettingsVerdict {
        &self.view.settings
    }

    /// Outcome of the last-location fetch.
    #[must_use]
    pub const fn last_location(&self) -> &LastLocationOutcome {
        &self.view.last_location
    }

    /// The screen settings.
    #[must_use]
    pub const fn config(&self) -> &ScreenConfig {
        &self.config
    }

    /// The location provider.
    #[must_use]
    pub const fn provider(&self) -> &P {
        &self.provider
    }
}
