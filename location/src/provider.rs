use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use async_channel::{Receiver, Sender, unbounded};
use log::warn;

use crate::{
    Location, LocationResult, Resolution, ResolutionLaunchError, SettingsOutcome, SettingsRequest,
    UpdateRequestConfig,
};

static NEXT_HANDLE: AtomicU64 = AtomicU64::new(1);

/// Identifies one update subscription registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallbackHandle(u64);

impl CallbackHandle {
    /// Allocate a process-unique handle.
    #[must_use]
    pub fn next() -> Self {
        Self(NEXT_HANDLE.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw value, for passing across a platform bridge.
    #[must_use]
    pub const fn as_raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for CallbackHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Fixes delivered together in one update event, oldest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocationBatch {
    locations: Vec<Location>,
}

impl LocationBatch {
    /// Wrap the fixes of one delivery.
    #[must_use]
    pub const fn new(locations: Vec<Location>) -> Self {
        Self { locations }
    }

    /// The most recent fix, if the batch is not empty.
    #[must_use]
    pub fn latest(&self) -> Option<&Location> {
        self.locations.last()
    }

    /// Number of fixes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    /// Whether the delivery carried no fixes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }
}

/// Provider-side end of an update subscription.
///
/// Backends push batches here from whatever thread their platform calls back
/// on; the screen reads them from the paired receiver on its own loop.
#[derive(Clone)]
pub struct UpdateSink {
    sender: Sender<LocationBatch>,
}

impl fmt::Debug for UpdateSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpdateSink")
            .field("closed", &self.sender.is_closed())
            .finish()
    }
}

impl UpdateSink {
    /// Deliver one batch. Returns `false` once the receiving side is gone.
    pub fn deliver(&self, batch: LocationBatch) -> bool {
        match self.sender.try_send(batch) {
            Ok(()) => true,
            Err(err) => {
                warn!("dropping location batch: {err}");
                false
            }
        }
    }

    /// Whether the receiving side has been dropped.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

/// Create a linked sink/receiver pair for update batches.
#[must_use]
pub fn update_channel() -> (UpdateSink, Receiver<LocationBatch>) {
    let (sender, receiver) = unbounded();
    (UpdateSink { sender }, receiver)
}

/// Client surface of a platform location service.
///
/// Every call returns without waiting on the user; long-running work
/// (dialogs, fixes) completes through the returned future or the sink.
#[allow(async_fn_in_trait)]
pub trait LocationProvider {
    /// Check whether device settings can serve `request`.
    async fn check_settings(&self, request: &SettingsRequest) -> SettingsOutcome;

    /// The provider's cached last fix, `None` if it has none.
    ///
    /// # Errors
    /// Returns an error if the provider could not be queried.
    async fn last_location(&self) -> LocationResult<Option<Location>>;

    /// Start delivering batches to `sink` under `handle`.
    ///
    /// # Errors
    /// Returns an error if the subscription could not be registered.
    fn request_updates(
        &self,
        config: &UpdateRequestConfig,
        handle: CallbackHandle,
        sink: UpdateSink,
    ) -> LocationResult<()>;

    /// Stop deliveries for `handle`. Unknown handles are ignored.
    async fn remove_updates(&self, handle: CallbackHandle);

    /// Launch the platform flow that lets the user fix device settings.
    ///
    /// # Errors
    /// Returns an error if the flow could not be started.
    fn launch_resolution(
        &self,
        resolution: &Resolution,
        request_code: i32,
    ) -> Result<(), ResolutionLaunchError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Coordinate;

    fn fix(latitude: f64, longitude: f64) -> Location {
        Location::from_coordinate(Coordinate::new(latitude, longitude), 0)
    }

    #[test]
    fn latest_is_last_element() {
        let batch = LocationBatch::new(vec![fix(1.0, 2.0), fix(3.0, 4.0)]);
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.latest().map(Location::coordinate), Some(Coordinate::new(3.0, 4.0)));
        assert!(!batch.is_empty());
        assert!(LocationBatch::default().latest().is_none());
        assert!(LocationBatch::default().is_empty());
    }

    #[test]
    fn handles_are_unique() {
        let a = CallbackHandle::next();
        let b = CallbackHandle::next();
        assert_ne!(a, b);
        assert!(b.as_raw() > a.as_raw());
    }

    #[tokio::test]
    async fn sink_delivers_in_order_until_receiver_dropped() {
        let (sink, receiver) = update_channel();
        assert!(sink.deliver(LocationBatch::new(vec![fix(1.0, 1.0)])));
        assert!(sink.deliver(LocationBatch::new(vec![fix(2.0, 2.0)])));

        let first = receiver.recv().await.unwrap();
        let second = receiver.recv().await.unwrap();
        assert_eq!(first.latest().unwrap().latitude, 1.0);
        assert_eq!(second.latest().unwrap().latitude, 2.0);

        drop(receiver);
        assert!(sink.is_closed());
        assert!(!sink.deliver(LocationBatch::default()));
    }
}
