use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Accuracy/power trade-off class for location updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// Most accurate fix available, typically satellite based.
    #[default]
    HighAccuracy,
    /// Roughly block-level accuracy.
    BalancedPowerAccuracy,
    /// Roughly city-level accuracy.
    LowPower,
    /// Only fixes computed for other clients.
    NoPower,
}

/// How continuous location updates should be delivered.
///
/// Durations serialize as whole milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateRequestConfig {
    /// Desired update cadence.
    #[serde(with = "millis")]
    pub interval: Duration,
    /// Minimum spacing accepted when fixes arrive faster than `interval`.
    #[serde(with = "millis")]
    pub fastest_interval: Duration,
    /// Longest the provider may hold fixes back to deliver them as a batch.
    #[serde(with = "millis")]
    pub max_wait_time: Duration,
    /// Accuracy/power class.
    pub priority: Priority,
}

impl UpdateRequestConfig {
    /// Update cadence used by the location screen.
    pub const INTERVAL: Duration = Duration::from_secs(20);
    /// Fastest cadence used by the location screen.
    pub const FASTEST_INTERVAL: Duration = Duration::from_secs(10);
    /// Batching delay used by the location screen.
    pub const MAX_WAIT_TIME: Duration = Duration::from_secs(40);

    /// Whether the provider is allowed to batch fixes.
    #[must_use]
    pub fn allows_batching(&self) -> bool {
        self.max_wait_time > self.interval
    }
}

impl Default for UpdateRequestConfig {
    fn default() -> Self {
        Self {
            interval: Self::INTERVAL,
            fastest_interval: Self::FASTEST_INTERVAL,
            max_wait_time: Self::MAX_WAIT_TIME,
            priority: Priority::HighAccuracy,
        }
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(u64::try_from(value.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
