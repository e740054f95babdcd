//! Location permission request handling.
//!
//! This crate provides the permission side of the location screen: the
//! permission identifiers, a batch request that resolves to a grant map, and
//! the [`PermissionGate`] seam the screen controller talks to.

#![warn(missing_docs)]

/// Platform-specific implementations.
pub mod sys;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Types of permissions that can be requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum Permission {
    /// Approximate device location (network/cell based).
    CoarseLocation,
    /// Precise device location (satellite based).
    FineLocation,
}

impl Permission {
    /// The batch the location screen asks for on creation.
    pub const LOCATION: [Self; 2] = [Self::CoarseLocation, Self::FineLocation];
}

/// The current status of a permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PermissionStatus {
    /// Permission has been granted by the user.
    Granted,
    /// Permission has been denied by the user.
    Denied,
    /// Permission is restricted (e.g., parental controls).
    Restricted,
    /// Permission has not been requested yet.
    NotDetermined,
}

impl PermissionStatus {
    /// Whether this status allows access.
    #[must_use]
    pub const fn is_granted(self) -> bool {
        matches!(self, Self::Granted)
    }
}

/// Errors that can occur when requesting permissions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PermissionError {
    /// The permission type is not supported on this platform.
    #[error("permission not supported on this platform")]
    NotSupported,
    /// The request was dismissed before the user answered.
    #[error("permission request cancelled")]
    Cancelled,
    /// An unknown error occurred.
    #[error("unknown error: {0}")]
    Unknown(String),
}

/// Outcome of a batch permission request.
///
/// Permissions that were not part of the batch report
/// [`PermissionStatus::NotDetermined`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionGrants {
    statuses: HashMap<Permission, PermissionStatus>,
}

impl PermissionGrants {
    /// Create an empty grant map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the status of one permission.
    #[must_use]
    pub fn with(mut self, permission: Permission, status: PermissionStatus) -> Self {
        self.insert(permission, status);
        self
    }

    /// Record the status of one permission.
    pub fn insert(&mut self, permission: Permission, status: PermissionStatus) {
        self.statuses.insert(permission, status);
    }

    /// Status of `permission` in this batch.
    #[must_use]
    pub fn status(&self, permission: Permission) -> PermissionStatus {
        self.statuses
            .get(&permission)
            .copied()
            .unwrap_or(PermissionStatus::NotDetermined)
    }

    /// Whether `permission` was granted.
    #[must_use]
    pub fn is_granted(&self, permission: Permission) -> bool {
        self.status(permission).is_granted()
    }

    /// Whether either location permission was granted.
    ///
    /// Fine and coarse access are treated the same by the location screen.
    #[must_use]
    pub fn any_location_granted(&self) -> bool {
        self.is_granted(Permission::FineLocation) || self.is_granted(Permission::CoarseLocation)
    }

    /// Iterate over the recorded statuses.
    pub fn iter(&self) -> impl Iterator<Item = (Permission, PermissionStatus)> + '_ {
        self.statuses.iter().map(|(p, s)| (*p, *s))
    }
}

impl FromIterator<(Permission, PermissionStatus)> for PermissionGrants {
    fn from_iter<I: IntoIterator<Item = (Permission, PermissionStatus)>>(iter: I) -> Self {
        Self {
            statuses: iter.into_iter().collect(),
        }
    }
}

/// Check the current status of a permission without requesting it.
pub async fn check(permission: Permission) -> PermissionStatus {
    sys::check(permission).await
}

/// Request a batch of permissions from the user.
///
/// Permissions that have already been granted or denied report their
/// current status without showing a prompt.
///
/// # Errors
/// Returns a `PermissionError` if:
/// - The permission type is not supported on this platform.
/// - An underlying platform error occurs.
pub async fn request_all(permissions: &[Permission]) -> Result<PermissionGrants, PermissionError> {
    sys::request_all(permissions).await
}

/// The permission seam used by the location screen.
///
/// [`SystemPermissionGate`] forwards to the platform backend; tests script
/// their own gate.
#[allow(async_fn_in_trait)]
pub trait PermissionGate {
    /// Current status of `permission`, without prompting.
    async fn check(&self, permission: Permission) -> PermissionStatus;

    /// Request `permissions` in a single batch.
    ///
    /// # Errors
    /// Returns a `PermissionError` if the platform cannot run the request.
    async fn request_all(
        &self,
        permissions: &[Permission],
    ) -> Result<PermissionGrants, PermissionError>;

    /// Whether fine or coarse location is currently granted.
    async fn location_granted(&self) -> bool {
        self.check(Permission::FineLocation).await.is_granted()
            || self.check(Permission::CoarseLocation).await.is_granted()
    }
}

/// Gate backed by the platform permission system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemPermissionGate;

impl PermissionGate for SystemPermissionGate {
    async fn check(&self, permission: Permission) -> PermissionStatus {
        check(permission).await
    }

    async fn request_all(
        &self,
        permissions: &[Permission],
    ) -> Result<PermissionGrants, PermissionError> {
        request_all(permissions).await
    }
}
