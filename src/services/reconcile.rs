//! Cluster reconciliation.
//!
//! Merges statically declared clusters (configuration sections) with
//! dynamically discovered ones (live role-tag scans against the default
//! provider) into a single deduplicated listing with derived metrics.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use chrono::Utc;
use tracing::warn;

use crate::domain::models::{ClusterRecord, ClusterSpec, Overrides};
use crate::domain::ports::ProviderError;
use crate::infrastructure::config::{merge, Sections};
use crate::infrastructure::registry::PluginRegistry;
use crate::infrastructure::resolver;

/// One cluster the engine could bind but not query.
#[derive(Debug)]
pub struct ClusterFailure {
    pub cluster: String,
    pub error: ProviderError,
}

/// The reconciled view plus per-cluster provider failures.
///
/// Records are unsorted; ordering, numbering and column selection belong to
/// the presentation layer.
#[derive(Debug, Default)]
pub struct ListOutcome {
    pub records: Vec<ClusterRecord>,
    pub failures: Vec<ClusterFailure>,
}

/// Stateless orchestrator over config sections, option merging, and the
/// capability registry. Each [`list`](Self::list) call is a single pass
/// over fresh lookups; nothing persists between calls.
pub struct ReconciliationEngine<'a> {
    registry: &'a PluginRegistry,
    sections: &'a Sections,
    config_dir: &'a Path,
    overrides: &'a Overrides,
}

impl<'a> ReconciliationEngine<'a> {
    #[must_use]
    pub fn new(
        registry: &'a PluginRegistry,
        sections: &'a Sections,
        config_dir: &'a Path,
        overrides: &'a Overrides,
    ) -> Self {
        Self {
            registry,
            sections,
            config_dir,
            overrides,
        }
    }

    /// Produce the unified cluster listing.
    ///
    /// With `include_all`, every installed service capability's roles are
    /// scanned against the default provider in `region`, so clusters that
    /// are running but not declared still appear. Declared clusters are
    /// then appended unless already emitted by discovery — a cluster both
    /// declared and discovered yields exactly one record, marked owned.
    ///
    /// Missing capabilities skip the affected cluster with a warning;
    /// provider call failures are collected per cluster in the outcome.
    /// Neither aborts the listing.
    pub async fn list(&self, region: &str, include_all: bool) -> ListOutcome {
        let now = Utc::now();
        let mut outcome = ListOutcome::default();
        let mut emitted: BTreeSet<String> = BTreeSet::new();

        let declared: BTreeMap<String, ClusterSpec> = self
            .sections
            .names()
            .map(|name| {
                (
                    name.to_string(),
                    merge(name, self.sections, self.overrides, self.config_dir),
                )
            })
            .collect();

        if include_all {
            self.discover(region, &declared, &mut outcome, &mut emitted, now)
                .await;
        }

        for (name, spec) in &declared {
            if emitted.contains(name) {
                continue;
            }
            let Some(service_type) = spec.service_type() else {
                warn!(cluster = %name, "no service_type configured, skipping");
                continue;
            };
            let provider = spec
                .cloud_provider()
                .unwrap_or_else(|| self.registry.default_provider());
            let config_dir = spec.config_dir().unwrap_or(self.config_dir);

            let binding = match resolver::bind(
                self.registry,
                name,
                provider,
                service_type,
                spec.region(),
                config_dir,
            ) {
                Ok(binding) => binding,
                Err(err) => {
                    warn!(cluster = %name, %err, "skipping cluster");
                    continue;
                }
            };

            emitted.insert(name.clone());
            match binding.service.instances().await {
                Ok(instances) => {
                    outcome.records.push(ClusterRecord::from_instances(
                        name.as_str(),
                        service_type,
                        provider,
                        &instances,
                        true,
                        now,
                    ));
                }
                Err(error) => {
                    warn!(cluster = %name, %error, "provider call failed");
                    outcome.failures.push(ClusterFailure {
                        cluster: name.clone(),
                        error,
                    });
                }
            }
        }

        outcome
    }

    /// Scan every installed service's roles for live clusters.
    async fn discover(
        &self,
        region: &str,
        declared: &BTreeMap<String, ClusterSpec>,
        outcome: &mut ListOutcome,
        emitted: &mut BTreeSet<String>,
        now: chrono::DateTime<Utc>,
    ) {
        let provider_name = self.registry.default_provider();
        let Some(provider) = self.registry.provider(provider_name) else {
            warn!(provider = %provider_name, "default provider not registered, skipping discovery");
            return;
        };

        for service_type in self.registry.service_names() {
            let Some(probe) = self.registry.service(&service_type) else {
                continue;
            };
            for role in probe.roles() {
                let names = match provider.clusters_with_role(&role, region).await {
                    Ok(names) => names,
                    Err(err) => {
                        warn!(%role, region, %err, "role scan failed");
                        continue;
                    }
                };
                for name in names {
                    if emitted.contains(&name) {
                        continue;
                    }
                    let binding = match resolver::bind(
                        self.registry,
                        &name,
                        provider_name,
                        &service_type,
                        region,
                        self.config_dir,
                    ) {
                        Ok(binding) => binding,
                        Err(err) => {
                            warn!(cluster = %name, %err, "skipping discovered cluster");
                            continue;
                        }
                    };

                    emitted.insert(name.clone());
                    match binding.service.instances().await {
                        Ok(instances) => {
                            outcome.records.push(ClusterRecord::from_instances(
                                name.as_str(),
                                service_type.as_str(),
                                provider_name,
                                &instances,
                                declared.contains_key(&name),
                                now,
                            ));
                        }
                        Err(error) => {
                            warn!(cluster = %name, %error, "provider call failed");
                            outcome.failures.push(ClusterFailure {
                                cluster: name.clone(),
                                error,
                            });
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Arc;

    use chrono::Duration;

    use crate::domain::models::{Instance, NOT_APPLICABLE};
    use crate::domain::ports::provider::CloudProvider;
    use crate::infrastructure::config::ConfigStore;
    use crate::infrastructure::plugins::tagged::{TaggedCli, TaggedService};
    use crate::infrastructure::providers::StaticProvider;

    fn instance(minutes_ago: i64) -> Instance {
        Instance {
            launch_time: Utc::now() - Duration::minutes(minutes_ago),
            instance_type: "m5.large".to_string(),
            state: "running".to_string(),
        }
    }

    fn registry_with(provider: StaticProvider) -> PluginRegistry {
        let mut registry = PluginRegistry::new();
        registry.register_service("basic", Box::new(|| Box::new(TaggedService::new("basic"))));
        registry.register_cli("basic", Box::new(|| Box::new(TaggedCli::new("basic"))));
        let name = provider.name().to_string();
        registry.register_provider(Arc::new(provider));
        registry.set_default_provider(name);
        registry
    }

    fn sections_from(text: &str) -> (tempfile::TempDir, Sections) {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("clusters.cfg"), text).unwrap();
        let store = ConfigStore::new(Some(dir.path().to_path_buf())).unwrap();
        let sections = store.load().unwrap();
        (dir, sections)
    }

    #[tokio::test]
    async fn declared_and_discovered_cluster_emits_one_owned_record() {
        let mut provider = StaticProvider::new("static");
        provider.add_cluster("web", "us-east-1", &["basic"], vec![instance(30)]);
        provider.add_cluster("stray", "us-east-1", &["basic"], vec![instance(30)]);
        let registry = registry_with(provider);

        let (dir, sections) = sections_from("[web]\nservice_type = basic\ncloud_provider = static\n");
        let overrides = Overrides::new();
        let engine = ReconciliationEngine::new(&registry, &sections, dir.path(), &overrides);

        let outcome = engine.list("us-east-1", true).await;
        assert!(outcome.failures.is_empty());
        assert_eq!(outcome.records.len(), 2);

        let web: Vec<_> = outcome.records.iter().filter(|r| r.name == "web").collect();
        assert_eq!(web.len(), 1, "never two records for the same name");
        assert!(web[0].owned);

        let stray = outcome.records.iter().find(|r| r.name == "stray").unwrap();
        assert!(!stray.owned, "observed-only cluster is not owned");
    }

    #[tokio::test]
    async fn declared_but_stopped_cluster_is_listed_with_sentinel() {
        let registry = registry_with(StaticProvider::new("static"));
        let (dir, sections) = sections_from("[idle]\nservice_type = basic\ncloud_provider = static\n");
        let overrides = Overrides::new();
        let engine = ReconciliationEngine::new(&registry, &sections, dir.path(), &overrides);

        let outcome = engine.list("us-east-1", false).await;
        assert_eq!(outcome.records.len(), 1);
        let record = &outcome.records[0];
        assert_eq!(record.instance_count, 0);
        assert_eq!(record.running_hours, 0);
        assert_eq!(record.instance_type, NOT_APPLICABLE);
        assert!(record.owned);
    }

    #[tokio::test]
    async fn missing_capability_skips_only_affected_clusters() {
        let mut provider = StaticProvider::new("static");
        provider.add_cluster("web", "us-east-1", &["basic"], vec![instance(30)]);
        let registry = registry_with(provider);

        let (dir, sections) = sections_from(
            "[web]\nservice_type = basic\ncloud_provider = static\n\
             [exotic]\nservice_type = foo\ncloud_provider = static\n",
        );
        let overrides = Overrides::new();
        let engine = ReconciliationEngine::new(&registry, &sections, dir.path(), &overrides);

        let outcome = engine.list("us-east-1", false).await;
        assert_eq!(outcome.records.len(), 1, "foo-typed cluster skipped, rest listed");
        assert_eq!(outcome.records[0].name, "web");
    }

    #[tokio::test]
    async fn listing_is_idempotent() {
        let mut provider = StaticProvider::new("static");
        provider.add_cluster("web", "us-east-1", &["basic"], vec![instance(125)]);
        let registry = registry_with(provider);

        let (dir, sections) = sections_from("[web]\nservice_type = basic\ncloud_provider = static\n");
        let overrides = Overrides::new();
        let engine = ReconciliationEngine::new(&registry, &sections, dir.path(), &overrides);

        let first = engine.list("us-east-1", true).await;
        let second = engine.list("us-east-1", true).await;
        assert_eq!(first.records, second.records);
    }

    #[tokio::test]
    async fn running_hours_round_up_per_instance() {
        let mut provider = StaticProvider::new("static");
        provider.add_cluster(
            "web",
            "us-east-1",
            &["basic"],
            vec![instance(65), instance(65)],
        );
        let registry = registry_with(provider);

        let (dir, sections) = sections_from("[web]\nservice_type = basic\ncloud_provider = static\n");
        let overrides = Overrides::new();
        let engine = ReconciliationEngine::new(&registry, &sections, dir.path(), &overrides);

        let outcome = engine.list("us-east-1", false).await;
        assert_eq!(outcome.records[0].running_hours, 4, "ceil per instance, then sum");
    }

    #[tokio::test]
    async fn discovery_respects_region() {
        let mut provider = StaticProvider::new("static");
        provider.add_cluster("web-eu", "eu-west-1", &["basic"], vec![instance(30)]);
        let registry = registry_with(provider);

        let (dir, sections) = sections_from("");
        let overrides = Overrides::new();
        let engine = ReconciliationEngine::new(&registry, &sections, dir.path(), &overrides);

        let us = engine.list("us-east-1", true).await;
        assert!(us.records.is_empty());

        let eu = engine.list("eu-west-1", true).await;
        assert_eq!(eu.records.len(), 1);
        assert_eq!(eu.records[0].name, "web-eu");
    }
}
