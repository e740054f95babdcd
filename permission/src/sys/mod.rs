//! Platform-specific permission implementations.

#[cfg(target_os = "linux")]
mod linux;

// Re-export platform implementations
#[cfg(target_os = "linux")]
pub(crate) use linux::{check, request_all};

// Fallback for unsupported platforms (compile-time stub)
#[cfg(not(target_os = "linux"))]
pub(crate) async fn check(_permission: crate::Permission) -> crate::PermissionStatus {
    crate::PermissionStatus::NotDetermined
}

#[cfg(not(target_os = "linux"))]
pub(crate) async fn request_all(
    _permissions: &[crate::Permission],
) -> Result<crate::PermissionGrants, crate::PermissionError> {
    Err(crate::PermissionError::NotSupported)
}
