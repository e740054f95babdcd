//! Scripted provider and permission gate for controller tests.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use async_channel::{Receiver, Sender};
use geoscreen_location::{
    CallbackHandle, Coordinate, Location, LocationBatch, LocationError, LocationProvider,
    LocationResult, Resolution, ResolutionLaunchError, SettingsOutcome, SettingsRequest,
    UpdateRequestConfig, UpdateSink,
};
use geoscreen_permission::{
    Permission, PermissionError, PermissionGate, PermissionGrants, PermissionStatus,
};

pub fn fix(latitude: f64, longitude: f64) -> Location {
    Location::from_coordinate(Coordinate::new(latitude, longitude), 0)
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProviderCall {
    CheckSettings(SettingsRequest),
    LastLocation,
    RequestUpdates(UpdateRequestConfig, CallbackHandle),
    RemoveUpdates(CallbackHandle),
    LaunchResolution(Resolution, i32),
}

#[derive(Debug)]
struct ProviderState {
    calls: Vec<ProviderCall>,
    settings: SettingsOutcome,
    last_location: LocationResult<Option<Location>>,
    updates: LocationResult<()>,
    resolution: Result<(), ResolutionLaunchError>,
    sink: Option<UpdateSink>,
}

/// Provider that answers from a script and records every call.
///
/// Clones share state, so a test keeps one clone to inspect calls and push
/// batches after handing the other to the controller.
#[derive(Debug, Clone)]
pub struct FakeProvider {
    state: Rc<RefCell<ProviderState>>,
}

impl FakeProvider {
    /// Settings satisfied, no cached fix available, subscriptions accepted.
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(ProviderState {
                calls: Vec::new(),
                settings: SettingsOutcome::Satisfied,
                last_location: Err(LocationError::NotAvailable),
                updates: Ok(()),
                resolution: Ok(()),
                sink: None,
            })),
        }
    }

    pub fn with_settings(self, outcome: SettingsOutcome) -> Self {
        self.state.borrow_mut().settings = outcome;
        self
    }

    pub fn with_last_location(self, result: LocationResult<Option<Location>>) -> Self {
        self.state.borrow_mut().last_location = result;
        self
    }

    pub fn failing_updates(self, err: LocationError) -> Self {
        self.state.borrow_mut().updates = Err(err);
        self
    }

    pub fn failing_resolution(self, err: ResolutionLaunchError) -> Self {
        self.state.borrow_mut().resolution = Err(err);
        self
    }

    pub fn calls(&self) -> Vec<ProviderCall> {
        self.state.borrow().calls.clone()
    }

    pub fn subscribe_count(&self) -> usize {
        self.count(|call| matches!(call, ProviderCall::RequestUpdates(..)))
    }

    pub fn unsubscribe_count(&self) -> usize {
        self.count(|call| matches!(call, ProviderCall::RemoveUpdates(_)))
    }

    fn count(&self, predicate: impl Fn(&ProviderCall) -> bool) -> usize {
        self.state.borrow().calls.iter().filter(|c| predicate(c)).count()
    }

    /// Push a batch through the most recent subscription's sink, even if it
    /// has been removed since. Returns `false` if nothing ever subscribed.
    pub fn deliver(&self, locations: Vec<Location>) -> bool {
        let sink = self.state.borrow().sink.clone();
        sink.is_some_and(|sink| sink.deliver(LocationBatch::new(locations)))
    }

    fn record(&self, call: ProviderCall) {
        self.state.borrow_mut().calls.push(call);
    }
}

impl LocationProvider for FakeProvider {
    async fn check_settings(&self, request: &SettingsRequest) -> SettingsOutcome {
        self.record(ProviderCall::CheckSettings(*request));
        self.state.borrow().settings.clone()
    }

    async fn last_location(&self) -> LocationResult<Option<Location>> {
        self.record(ProviderCall::LastLocation);
        self.state.borrow().last_location.clone()
    }

    fn request_updates(
        &self,
        config: &UpdateRequestConfig,
        handle: CallbackHandle,
        sink: UpdateSink,
    ) -> LocationResult<()> {
        self.record(ProviderCall::RequestUpdates(*config, handle));
        let mut state = self.state.borrow_mut();
        state.updates.clone()?;
        state.sink = Some(sink);
        Ok(())
    }

    async fn remove_updates(&self, handle: CallbackHandle) {
        self.record(ProviderCall::RemoveUpdates(handle));
    }

    fn launch_resolution(
        &self,
        resolution: &Resolution,
        request_code: i32,
    ) -> Result<(), ResolutionLaunchError> {
        self.record(ProviderCall::LaunchResolution(resolution.clone(), request_code));
        self.state.borrow().resolution.clone()
    }
}

#[derive(Debug)]
struct GateState {
    statuses: HashMap<Permission, PermissionStatus>,
    request_error: Option<PermissionError>,
    answer: Option<Receiver<()>>,
    requests: usize,
}

/// Permission gate answering from a shared status table.
#[derive(Debug, Clone)]
pub struct FakeGate {
    state: Rc<RefCell<GateState>>,
}

impl FakeGate {
    fn from_statuses(statuses: HashMap<Permission, PermissionStatus>) -> Self {
        Self {
            state: Rc::new(RefCell::new(GateState {
                statuses,
                request_error: None,
                answer: None,
                requests: 0,
            })),
        }
    }

    pub fn granting_all() -> Self {
        Self::from_statuses(
            Permission::LOCATION
                .into_iter()
                .map(|p| (p, PermissionStatus::Granted))
                .collect(),
        )
    }

    pub fn denying_all() -> Self {
        Self::from_statuses(
            Permission::LOCATION
                .into_iter()
                .map(|p| (p, PermissionStatus::Denied))
                .collect(),
        )
    }

    /// Only `permission` has `status`; the rest are denied.
    pub fn with_status(permission: Permission, status: PermissionStatus) -> Self {
        let gate = Self::denying_all();
        gate.set_status(permission, status);
        gate
    }

    pub fn failing_request(self, err: PermissionError) -> Self {
        self.state.borrow_mut().request_error = Some(err);
        self
    }

    /// Keep `request_all` pending until the returned sender fires, like a
    /// prompt the user has not answered yet.
    pub fn answering_on_signal(self) -> (Self, Sender<()>) {
        let (sender, receiver) = async_channel::bounded(1);
        self.state.borrow_mut().answer = Some(receiver);
        (self, sender)
    }

    pub fn set_status(&self, permission: Permission, status: PermissionStatus) {
        self.state.borrow_mut().statuses.insert(permission, status);
    }

    pub fn request_count(&self) -> usize {
        self.state.borrow().requests
    }
}

impl PermissionGate for FakeGate {
    async fn check(&self, permission: Permission) -> PermissionStatus {
        self.state
            .borrow()
            .statuses
            .get(&permission)
            .copied()
            .unwrap_or(PermissionStatus::NotDetermined)
    }

    async fn request_all(
        &self,
        permissions: &[Permission],
    ) -> Result<PermissionGrants, PermissionError> {
        let answer = {
            let mut state = self.state.borrow_mut();
            state.requests += 1;
            state.answer.clone()
        };
        if let Some(answer) = answer {
            answer.recv().await.ok();
        }

        let state = self.state.borrow();
        if let Some(err) = state.request_error.clone() {
            return Err(err);
        }
        Ok(permissions
            .iter()
            .map(|&p| {
                let status = state
                    .statuses
                    .get(&p)
                    .copied()
                    .unwrap_or(PermissionStatus::NotDetermined);
                (p, status)
            })
            .collect())
    }
}
