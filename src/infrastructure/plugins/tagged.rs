//! Generic role-tagged service and cli capabilities.
//!
//! The built-in capability pair for service types with no dedicated
//! integration: the service identifies its instances by a single role tag
//! equal to the service type name, and the cli exposes the instance
//! listing subcommand.

use async_trait::async_trait;

use crate::cli::display;
use crate::domain::models::{ClusterSpec, Instance};
use crate::domain::ports::{
    CapabilityError, CliCapability, ClusterHandle, ProviderError, ServiceCapability,
};

/// Service capability that tags its instances with the service type name.
#[derive(Debug)]
pub struct TaggedService {
    service_type: String,
    cluster: Option<ClusterHandle>,
}

impl TaggedService {
    #[must_use]
    pub fn new(service_type: impl Into<String>) -> Self {
        Self {
            service_type: service_type.into(),
            cluster: None,
        }
    }
}

#[async_trait]
impl ServiceCapability for TaggedService {
    fn service_type(&self) -> &str {
        &self.service_type
    }

    fn roles(&self) -> Vec<String> {
        vec![self.service_type.clone()]
    }

    fn attach(&mut self, cluster: ClusterHandle) {
        self.cluster = Some(cluster);
    }

    fn cluster(&self) -> Option<&ClusterHandle> {
        self.cluster.as_ref()
    }

    async fn instances(&self) -> Result<Vec<Instance>, ProviderError> {
        let cluster = self.cluster.as_ref().ok_or(ProviderError::NotAttached)?;
        cluster.instances().await
    }
}

/// Cli capability fronting [`TaggedService`].
#[derive(Debug)]
pub struct TaggedCli {
    service_type: String,
}

impl TaggedCli {
    #[must_use]
    pub fn new(service_type: impl Into<String>) -> Self {
        Self {
            service_type: service_type.into(),
        }
    }
}

#[async_trait]
impl CliCapability for TaggedCli {
    fn service_type(&self) -> &str {
        &self.service_type
    }

    async fn execute(
        &self,
        service: &dyn ServiceCapability,
        args: &[String],
        _spec: &ClusterSpec,
    ) -> Result<(), CapabilityError> {
        match args.first().map(String::as_str) {
            Some("instances") => self.print_instances(service).await,
            Some(other) => Err(CapabilityError::Unsupported(other.to_string())),
            None => Err(CapabilityError::Unsupported("<none>".to_string())),
        }
    }

    async fn print_instances(
        &self,
        service: &dyn ServiceCapability,
    ) -> Result<(), CapabilityError> {
        let instances = service.instances().await?;
        let mut table = display::table::list_table(&["launched", "type", "state"]);
        for instance in &instances {
            table.add_row(vec![
                instance.launch_time.to_rfc3339(),
                instance.instance_type.clone(),
                instance.state.clone(),
            ]);
        }
        println!(
            "{}",
            display::table::render_list("instance", table, instances.len())
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use chrono::Utc;

    use crate::infrastructure::providers::StaticProvider;

    fn attached_service() -> TaggedService {
        let mut provider = StaticProvider::new("test");
        provider.add_cluster(
            "web",
            "us-east-1",
            &["basic"],
            vec![Instance {
                launch_time: Utc::now(),
                instance_type: "m5.large".to_string(),
                state: "running".to_string(),
            }],
        );

        let mut service = TaggedService::new("basic");
        service.attach(ClusterHandle::new(
            Arc::new(provider),
            "web",
            "/cfg",
            "us-east-1",
        ));
        service
    }

    #[test]
    fn role_is_the_service_type() {
        let service = TaggedService::new("basic");
        assert_eq!(service.roles(), vec!["basic".to_string()]);
    }

    #[tokio::test]
    async fn instances_require_attachment() {
        let service = TaggedService::new("basic");
        let err = service.instances().await.unwrap_err();
        assert!(matches!(err, ProviderError::NotAttached));
    }

    #[tokio::test]
    async fn attached_service_fetches_instances() {
        let service = attached_service();
        let instances = service.instances().await.unwrap();
        assert_eq!(instances.len(), 1);
        assert_eq!(instances[0].instance_type, "m5.large");
    }

    #[tokio::test]
    async fn unknown_subcommand_is_rejected() {
        let service = attached_service();
        let cli = TaggedCli::new("basic");
        let spec = ClusterSpec::new("web", std::collections::BTreeMap::new());

        let err = cli
            .execute(&service, &["launch".to_string()], &spec)
            .await
            .unwrap_err();
        assert!(matches!(err, CapabilityError::Unsupported(ref s) if s == "launch"));
    }
}
