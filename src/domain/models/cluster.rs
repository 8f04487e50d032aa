//! Cluster parameter sets and listing records.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Region used when a cluster configures none.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Provider used for discovery and for clusters that configure none.
pub const DEFAULT_PROVIDER: &str = "ec2";

/// Sentinel instance type for clusters with no running instances.
pub const NOT_APPLICABLE: &str = "n/a";

/// Well-known option keys consumed by the resolution core.
///
/// Any other key present in a cluster section is carried through the
/// resolved spec untouched and is visible to capability implementations.
pub mod keys {
    pub const CLOUD_PROVIDER: &str = "cloud_provider";
    pub const SERVICE_TYPE: &str = "service_type";
    pub const REGION: &str = "region";
    pub const PRIVATE_KEY: &str = "private_key";
    pub const CONFIG_DIR: &str = "config_dir";
    pub const THIS_DIR: &str = "this_dir";
}

/// One cloud instance as reported by a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instance {
    /// When the instance was launched.
    pub launch_time: DateTime<Utc>,
    /// Provider-specific machine shape, e.g. `m5.large`.
    pub instance_type: String,
    /// Provider-reported lifecycle state, e.g. `running`.
    pub state: String,
}

/// Per-invocation option overrides supplied on the command line.
///
/// Values are inserted as given; the merge step decides that empty values
/// mean "not specified" rather than an explicit override to blank.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    values: BTreeMap<String, String>,
}

impl Overrides {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Insert `key` only when the caller actually supplied a value.
    pub fn set_opt(&mut self, key: impl Into<String>, value: Option<&str>) {
        if let Some(value) = value {
            self.set(key, value);
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// The resolved parameter set for one cluster name.
///
/// Built by the option merger from global defaults, the cluster's stored
/// configuration section, and non-empty command-line overrides, in that
/// precedence order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterSpec {
    name: String,
    options: BTreeMap<String, String>,
}

impl ClusterSpec {
    #[must_use]
    pub fn new(name: impl Into<String>, options: BTreeMap<String, String>) -> Self {
        Self {
            name: name.into(),
            options,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.options.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn cloud_provider(&self) -> Option<&str> {
        self.get(keys::CLOUD_PROVIDER)
    }

    #[must_use]
    pub fn service_type(&self) -> Option<&str> {
        self.get(keys::SERVICE_TYPE)
    }

    /// Configured region, falling back to [`DEFAULT_REGION`].
    #[must_use]
    pub fn region(&self) -> &str {
        self.get(keys::REGION).unwrap_or(DEFAULT_REGION)
    }

    #[must_use]
    pub fn private_key(&self) -> Option<&str> {
        self.get(keys::PRIVATE_KEY)
    }

    #[must_use]
    pub fn config_dir(&self) -> Option<&Path> {
        self.get(keys::CONFIG_DIR).map(Path::new)
    }

    #[must_use]
    pub fn this_dir(&self) -> Option<&Path> {
        self.get(keys::THIS_DIR).map(Path::new)
    }

    /// The full resolved key/value set, for capability implementations
    /// that consume keys beyond the well-known ones.
    #[must_use]
    pub fn options(&self) -> &BTreeMap<String, String> {
        &self.options
    }
}

/// One row of the reconciled cluster view.
///
/// Created fresh per listing invocation and never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterRecord {
    pub name: String,
    pub service_type: String,
    pub provider: String,
    pub instance_count: usize,
    pub running_hours: i64,
    pub instance_type: String,
    /// True when the cluster has a configuration section, whether or not
    /// it currently has running instances.
    pub owned: bool,
}

impl ClusterRecord {
    /// Build a record from a cluster's instances.
    ///
    /// Running hours are rounded up per instance and summed: partial hours
    /// count as full hours, matching hourly cloud billing granularity. The
    /// representative instance type is the first instance's, or [`NOT_APPLICABLE`]
    /// when the cluster has none running.
    #[must_use]
    pub fn from_instances(
        name: impl Into<String>,
        service_type: impl Into<String>,
        provider: impl Into<String>,
        instances: &[Instance],
        owned: bool,
        now: DateTime<Utc>,
    ) -> Self {
        let instance_type = instances
            .first()
            .map_or_else(|| NOT_APPLICABLE.to_string(), |i| i.instance_type.clone());
        Self {
            name: name.into(),
            service_type: service_type.into(),
            provider: provider.into(),
            instance_count: instances.len(),
            running_hours: running_hours(instances, now),
            instance_type,
            owned,
        }
    }
}

/// Sum of per-instance running time, each rounded up to whole hours.
#[must_use]
pub fn running_hours(instances: &[Instance], now: DateTime<Utc>) -> i64 {
    instances
        .iter()
        .map(|i| {
            let secs = u64::try_from((now - i.launch_time).num_seconds().max(0))
                .unwrap_or_default();
            i64::try_from(secs.div_ceil(3600)).unwrap_or(i64::MAX)
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn instance(minutes_ago: i64) -> Instance {
        Instance {
            launch_time: Utc::now() - Duration::minutes(minutes_ago),
            instance_type: "m5.large".to_string(),
            state: "running".to_string(),
        }
    }

    #[test]
    fn partial_hours_round_up_per_instance() {
        let now = Utc::now();
        let one = vec![instance(65)];
        assert_eq!(running_hours(&one, now), 2);

        let two = vec![instance(65), instance(65)];
        assert_eq!(running_hours(&two, now), 4, "per-instance, not fleet-total");
    }

    #[test]
    fn future_launch_time_counts_zero() {
        let now = Utc::now();
        let skewed = vec![Instance {
            launch_time: now + Duration::minutes(10),
            instance_type: "m5.large".to_string(),
            state: "pending".to_string(),
        }];
        assert_eq!(running_hours(&skewed, now), 0);
    }

    #[test]
    fn record_uses_first_instance_type_or_sentinel() {
        let now = Utc::now();
        let record =
            ClusterRecord::from_instances("web", "basic", "ec2", &[instance(30)], true, now);
        assert_eq!(record.instance_type, "m5.large");
        assert_eq!(record.instance_count, 1);
        assert_eq!(record.running_hours, 1);

        let empty = ClusterRecord::from_instances("idle", "basic", "ec2", &[], true, now);
        assert_eq!(empty.instance_type, NOT_APPLICABLE);
        assert_eq!(empty.instance_count, 0);
        assert_eq!(empty.running_hours, 0);
    }

    #[test]
    fn spec_region_defaults() {
        let spec = ClusterSpec::new("web", BTreeMap::new());
        assert_eq!(spec.region(), DEFAULT_REGION);

        let mut options = BTreeMap::new();
        options.insert(keys::REGION.to_string(), "eu-west-1".to_string());
        let spec = ClusterSpec::new("web", options);
        assert_eq!(spec.region(), "eu-west-1");
    }
}
