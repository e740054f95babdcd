//! Linux permission implementation.
//!
//! Location access on Linux is mediated by GeoClue2 itself (its agent decides
//! per desktop id), so there is no runtime prompt to show here. Sandboxed
//! apps (Flatpak/Snap) go through portals, which handle this differently.

use crate::{Permission, PermissionError, PermissionGrants, PermissionStatus};

pub(crate) async fn check(_permission: Permission) -> PermissionStatus {
    PermissionStatus::Granted
}

pub(crate) async fn request_all(
    permissions: &[Permission],
) -> Result<PermissionGrants, PermissionError> {
    let mut grants = PermissionGrants::new();
    for &permission in permissions {
        grants.insert(permission, check(permission).await);
    }
    Ok(grants)
}
