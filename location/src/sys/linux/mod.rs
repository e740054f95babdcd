//! Linux location implementation using GeoClue2 D-Bus service.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, error, info};
use zbus::Connection;
use zbus::zvariant::{OwnedObjectPath, OwnedValue, Value};

use crate::{
    CallbackHandle, Location, LocationBatch, LocationError, LocationProvider, LocationResult,
    Priority, Resolution, ResolutionLaunchError, SettingsOutcome, SettingsRequest,
    UpdateRequestConfig, UpdateSink,
};

const GEOCLUE_BUS: &str = "org.freedesktop.GeoClue2";
const MANAGER_PATH: &str = "/org/freedesktop/GeoClue2/Manager";
const MANAGER_IFACE: &str = "org.freedesktop.GeoClue2.Manager";
const CLIENT_IFACE: &str = "org.freedesktop.GeoClue2.Client";
const LOCATION_IFACE: &str = "org.freedesktop.GeoClue2.Location";
const PROPERTIES_IFACE: &str = "org.freedesktop.DBus.Properties";
const DESKTOP_ID: &str = "geoscreen";

/// GeoClue accuracy level needed to honour `priority`.
const fn accuracy_level(priority: Priority) -> u32 {
    match priority {
        Priority::HighAccuracy => 8,
        Priority::BalancedPowerAccuracy => 6,
        Priority::LowPower => 4,
        Priority::NoPower => 1,
    }
}

fn dbus_error(context: &str) -> impl FnOnce(zbus::Error) -> LocationError + '_ {
    move |e| LocationError::Unknown(format!("{context}: {e}"))
}

fn timestamp_now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}

async fn get_property(
    connection: &Connection,
    path: &str,
    interface: &str,
    property: &str,
) -> zbus::Result<OwnedValue> {
    connection
        .call_method(
            Some(GEOCLUE_BUS),
            path,
            Some(PROPERTIES_IFACE),
            "Get",
            &(interface, property),
        )
        .await?
        .body()
        .deserialize()
}

async fn set_property(
    connection: &Connection,
    path: &str,
    property: &str,
    value: Value<'_>,
) -> zbus::Result<()> {
    connection
        .call_method(
            Some(GEOCLUE_BUS),
            path,
            Some(PROPERTIES_IFACE),
            "Set",
            &(CLIENT_IFACE, property, value),
        )
        .await?;
    Ok(())
}

async fn get_f64(connection: &Connection, path: &str, property: &str) -> zbus::Result<f64> {
    let value = get_property(connection, path, LOCATION_IFACE, property).await?;
    match &*value {
        Value::F64(v) => Ok(*v),
        other => Err(zbus::Error::Failure(format!(
            "unexpected {property} value: {other:?}"
        ))),
    }
}

/// A started GeoClue client bound to one accuracy profile.
struct GeoClueClient {
    connection: Connection,
    path: OwnedObjectPath,
}

impl GeoClueClient {
    async fn start(priority: Priority, time_threshold: Duration) -> LocationResult<Self> {
        let connection = Connection::system()
            .await
            .map_err(dbus_error("D-Bus connection failed"))?;

        let (path,): (OwnedObjectPath,) = connection
            .call_method(
                Some(GEOCLUE_BUS),
                MANAGER_PATH,
                Some(MANAGER_IFACE),
                "GetClient",
                &(),
            )
            .await
            .map_err(dbus_error("GeoClue2 not available"))?
            .body()
            .deserialize()
            .map_err(dbus_error("failed to parse client path"))?;

        // GeoClue rejects clients without a desktop id
        set_property(&connection, path.as_str(), "DesktopId", Value::from(DESKTOP_ID))
            .await
            .map_err(dbus_error("failed to set desktop id"))?;
        set_property(
            &connection,
            path.as_str(),
            "RequestedAccuracyLevel",
            Value::from(accuracy_level(priority)),
        )
        .await
        .map_err(dbus_error("failed to set accuracy level"))?;
        let threshold = u32::try_from(time_threshold.as_secs()).unwrap_or(u32::MAX);
        set_property(&connection, path.as_str(), "TimeThreshold", Value::from(threshold))
            .await
            .map_err(dbus_error("failed to set time threshold"))?;

        connection
            .call_method(
                Some(GEOCLUE_BUS),
                path.as_str(),
                Some(CLIENT_IFACE),
                "Start",
                &(),
            )
            .await
            .map_err(dbus_error("failed to start GeoClue client"))?;

        Ok(Self { connection, path })
    }

    /// The client's current fix; `None` until GeoClue has computed one.
    async fn current(&self) -> LocationResult<Option<Location>> {
        let value = get_property(&self.connection, self.path.as_str(), CLIENT_IFACE, "Location")
            .await
            .map_err(dbus_error("failed to get location"))?;

        let location_path = match &*value {
            Value::ObjectPath(path) if path.as_str() != "/" => path.to_string(),
            Value::ObjectPath(_) => return Ok(None),
            other => {
                return Err(LocationError::Unknown(format!(
                    "unexpected location path: {other:?}"
                )));
            }
        };

        let latitude = get_f64(&self.connection, &location_path, "Latitude")
            .await
            .map_err(dbus_error("failed to get latitude"))?;
        let longitude = get_f64(&self.connection, &location_path, "Longitude")
            .await
            .map_err(dbus_error("failed to get longitude"))?;
        let altitude = get_f64(&self.connection, &location_path, "Altitude")
            .await
            .ok();
        let accuracy = get_f64(&self.connection, &location_path, "Accuracy")
            .await
            .ok();

        Ok(Some(Location {
            latitude,
            longitude,
            altitude,
            horizontal_accuracy: accuracy,
            vertical_accuracy: None,
            timestamp: timestamp_now(),
        }))
    }

    async fn stop(self) {
        let stopped = self
            .connection
            .call_method(
                Some(GEOCLUE_BUS),
                self.path.as_str(),
                Some(CLIENT_IFACE),
                "Stop",
                &(),
            )
            .await;
        if let Err(err) = stopped {
            debug!("failed to stop GeoClue client {}: {err}", self.path.as_str());
        }
    }
}

async fn available_accuracy() -> zbus::Result<u32> {
    let connection = Connection::system().await?;
    let value = get_property(&connection, MANAGER_PATH, MANAGER_IFACE, "AvailableAccuracyLevel")
        .await?;
    match &*value {
        Value::U32(level) => Ok(*level),
        other => Err(zbus::Error::Failure(format!(
            "unexpected accuracy level: {other:?}"
        ))),
    }
}

/// Whether `pending_len` buffered fixes should be sent now.
///
/// Without batching every fix goes out at once; otherwise fixes are held
/// until `max_wait_time` has passed since the previous flush.
fn flush_due(config: &UpdateRequestConfig, since_last_flush: Duration, pending_len: usize) -> bool {
    if pending_len == 0 {
        return false;
    }
    !config.allows_batching() || since_last_flush >= config.max_wait_time
}

/// Poll fixes every `interval`, flushing a batch once `max_wait_time` has passed.
async fn run_updates(config: UpdateRequestConfig, sink: UpdateSink, stop: Arc<AtomicBool>) {
    let client = match GeoClueClient::start(config.priority, config.fastest_interval).await {
        Ok(client) => client,
        Err(err) => {
            error!("failed to start GeoClue updates: {err}");
            return;
        }
    };

    let mut pending = Vec::new();
    let mut last_flush = Instant::now();

    while !stop.load(Ordering::Acquire) {
        match client.current().await {
            Ok(Some(location)) => pending.push(location),
            Ok(None) => {}
            Err(err) => error!("GeoClue update failed: {err}"),
        }

        if flush_due(&config, last_flush.elapsed(), pending.len()) {
            if stop.load(Ordering::Acquire) {
                break;
            }
            if !sink.deliver(LocationBatch::new(std::mem::take(&mut pending))) {
                break;
            }
            last_flush = Instant::now();
        }

        futures_timer::Delay::new(config.interval).await;
    }

    client.stop().await;
}

/// Location provider backed by GeoClue2.
///
/// Each subscription runs on its own worker thread that polls the GeoClue
/// client and pushes batches into the subscription's sink.
#[derive(Debug, Default)]
pub struct GeoClueProvider {
    workers: Mutex<HashMap<CallbackHandle, Arc<AtomicBool>>>,
}

impl GeoClueProvider {
    /// Create a provider with no active subscriptions.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocationProvider for GeoClueProvider {
    async fn check_settings(&self, request: &SettingsRequest) -> SettingsOutcome {
        let required = accuracy_level(request.priority);
        match available_accuracy().await {
            Ok(level) if level >= required => SettingsOutcome::Satisfied,
            Ok(level) => SettingsOutcome::Unresolvable(format!(
                "GeoClue offers accuracy level {level}, need {required}"
            )),
            Err(err) => SettingsOutcome::Unresolvable(format!("GeoClue2 not available: {err}")),
        }
    }

    async fn last_location(&self) -> LocationResult<Option<Location>> {
        let client = GeoClueClient::start(Priority::HighAccuracy, Duration::ZERO).await?;
        let location = client.current().await;
        client.stop().await;
        location
    }

    fn request_updates(
        &self,
        config: &UpdateRequestConfig,
        handle: CallbackHandle,
        sink: UpdateSink,
    ) -> LocationResult<()> {
        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);
        let config = *config;

        thread::Builder::new()
            .name(format!("geoclue-updates-{}", handle.as_raw()))
            .spawn(move || futures::executor::block_on(run_updates(config, sink, flag)))
            .map_err(|e| LocationError::Unknown(format!("failed to spawn update worker: {e}")))?;

        let previous = self
            .workers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(handle, stop);
        if let Some(previous) = previous {
            previous.store(true, Ordering::Release);
        }
        Ok(())
    }

    async fn remove_updates(&self, handle: CallbackHandle) {
        let worker = self
            .workers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&handle);
        if let Some(stop) = worker {
            stop.store(true, Ordering::Release);
            info!("stopping GeoClue updates for {handle}");
        }
    }

    fn launch_resolution(
        &self,
        _resolution: &Resolution,
        _request_code: i32,
    ) -> Result<(), ResolutionLaunchError> {
        Err(ResolutionLaunchError::Unsupported)
    }
}
