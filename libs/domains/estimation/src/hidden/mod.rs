//! Hidden dependency resolution.
//!
//! Expands a resource into the synthetic child resources its provisioning
//! implies: persisted rules are consulted first, the built-in table fills
//! in child types the store does not cover, conditions gate each rule,
//! and child descriptors are synthesized deterministically from the
//! parent id.

pub mod rules;

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use domain_pricing::ResourceType;
use observability::EstimationMetrics;

use crate::models::{metadata_keys, HiddenDependency, HiddenDependencyResource, ResourceDescriptor};
use crate::repository::HiddenDependencyRuleRepository;

pub use rules::builtin_rules;

/// A (parent type, child type) expansion edge, tracked along the
/// expansion path to guarantee termination
pub type ExpansionEdge = (ResourceType, ResourceType);

/// Resolves the hidden dependencies of a resource
pub struct HiddenDependencyResolver<S: HiddenDependencyRuleRepository> {
    store: Arc<S>,
    builtin: Vec<HiddenDependency>,
}

impl<S: HiddenDependencyRuleRepository> HiddenDependencyResolver<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            builtin: builtin_rules(),
        }
    }

    /// Resolve the hidden dependencies of a resource.
    ///
    /// `visited` carries the (parent type -> child type) edges already
    /// expanded on the current path; an edge seen twice is skipped so a
    /// future rule cycle cannot recurse forever.
    pub async fn resolve(
        &self,
        resource: &ResourceDescriptor,
        visited: &HashSet<ExpansionEdge>,
    ) -> Vec<HiddenDependencyResource> {
        let rules = self.merged_rules(resource).await;

        let mut resolved = Vec::new();
        for rule in rules {
            let edge = (rule.parent_resource_type, rule.child_resource_type);
            if visited.contains(&edge) {
                tracing::warn!(
                    parent = %edge.0,
                    child = %edge.1,
                    "Skipping hidden dependency already expanded on this path"
                );
                continue;
            }

            if !rule.applies_to(resource) {
                continue;
            }

            let quantity = rule.quantity.evaluate(resource);
            let child = synthesize_child(&rule, resource, quantity);

            resolved.push(HiddenDependencyResource {
                rule,
                resource: child,
                quantity,
            });
        }

        EstimationMetrics::record_hidden_dependencies(
            &resource.resource_type.to_string(),
            resolved.len(),
        );

        resolved
    }

    /// Persisted rules merged with the built-in table by child-type
    /// identity: a persisted rule suppresses the built-in rule for the
    /// same child type; rules for distinct child types are additive.
    async fn merged_rules(&self, resource: &ResourceDescriptor) -> Vec<HiddenDependency> {
        let persisted = match self
            .store
            .find_by_parent_type(resource.provider, resource.resource_type)
            .await
        {
            Ok(rules) => rules,
            Err(e) => {
                tracing::warn!(
                    parent = %resource.resource_type,
                    "Rule store lookup failed, using built-in rules: {}",
                    e
                );
                Vec::new()
            }
        };

        let covered: HashSet<ResourceType> = persisted
            .iter()
            .map(|r| r.child_resource_type)
            .collect();

        let mut merged = persisted;
        merged.extend(
            self.builtin
                .iter()
                .filter(|r| {
                    r.provider == resource.provider
                        && r.parent_resource_type == resource.resource_type
                        && !covered.contains(&r.child_resource_type)
                })
                .cloned(),
        );

        merged
    }
}

/// Synthesize the child descriptor for a resolved rule.
///
/// The id is deterministic (`<parent_id>-hidden-<child_type>`) so
/// repeated resolution of the same parent yields structurally identical
/// children. The child inherits provider and region and carries a
/// non-owning `parent_id` back-reference.
fn synthesize_child(
    rule: &HiddenDependency,
    parent: &ResourceDescriptor,
    quantity: f64,
) -> ResourceDescriptor {
    let mut metadata = HashMap::new();

    match rule.child_resource_type {
        ResourceType::BlockVolume => {
            metadata.insert(
                metadata_keys::SIZE_GB.to_string(),
                serde_json::json!(quantity),
            );
        }
        ResourceType::ObjectBucket => {
            metadata.insert(
                metadata_keys::STORAGE_GB.to_string(),
                serde_json::json!(quantity),
            );
        }
        ResourceType::FloatingIp | ResourceType::NetworkInterface => {
            metadata.insert(
                metadata_keys::ATTACHED.to_string(),
                serde_json::json!(rule.is_attached),
            );
        }
        _ => {}
    }

    ResourceDescriptor {
        id: format!("{}-hidden-{}", parent.id, rule.child_resource_type),
        name: format!("{}-{}", parent.name, rule.child_resource_type),
        resource_type: rule.child_resource_type,
        provider: parent.provider,
        region: parent.region.clone(),
        metadata,
        parent_id: Some(parent.id.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EstimationError;
    use crate::models::QuantityFormula;
    use crate::repository::MockHiddenDependencyRuleRepository;
    use domain_pricing::CloudProvider;
    use serde_json::json;

    fn parent(resource_type: ResourceType) -> ResourceDescriptor {
        ResourceDescriptor {
            id: "vm-1".to_string(),
            name: "web".to_string(),
            resource_type,
            provider: CloudProvider::Aws,
            region: "us-east-1".to_string(),
            metadata: HashMap::new(),
            parent_id: None,
        }
    }

    fn empty_store() -> MockHiddenDependencyRuleRepository {
        let mut store = MockHiddenDependencyRuleRepository::new();
        store
            .expect_find_by_parent_type()
            .returning(|_, _| Ok(vec![]));
        store
    }

    #[tokio::test]
    async fn test_compute_instance_expands_to_volume_and_interface() {
        let resolver = HiddenDependencyResolver::new(Arc::new(empty_store()));
        let resource = parent(ResourceType::ComputeInstance);

        let resolved = resolver.resolve(&resource, &HashSet::new()).await;

        assert_eq!(resolved.len(), 2);
        let volume = resolved
            .iter()
            .find(|r| r.resource.resource_type == ResourceType::BlockVolume)
            .unwrap();
        assert_eq!(volume.quantity, 8.0); // default root volume size
        assert_eq!(volume.resource.id, "vm-1-hidden-block_volume");
        assert_eq!(volume.resource.parent_id.as_deref(), Some("vm-1"));

        let nic = resolved
            .iter()
            .find(|r| r.resource.resource_type == ResourceType::NetworkInterface)
            .unwrap();
        assert!(nic.rule.is_attached);
        assert_eq!(nic.resource.metadata_bool("attached"), Some(true));
    }

    #[tokio::test]
    async fn test_root_volume_size_from_metadata() {
        let resolver = HiddenDependencyResolver::new(Arc::new(empty_store()));
        let mut resource = parent(ResourceType::ComputeInstance);
        resource
            .metadata
            .insert(metadata_keys::ROOT_VOLUME_GB.to_string(), json!(20));

        let resolved = resolver.resolve(&resource, &HashSet::new()).await;
        let volume = resolved
            .iter()
            .find(|r| r.resource.resource_type == ResourceType::BlockVolume)
            .unwrap();

        assert_eq!(volume.quantity, 20.0);
        assert_eq!(volume.resource.metadata_f64("size_gb"), Some(20.0));
    }

    #[tokio::test]
    async fn test_gateway_ip_suppressed_by_allocation_id() {
        let resolver = HiddenDependencyResolver::new(Arc::new(empty_store()));

        let bare = parent(ResourceType::NatGateway);
        let resolved = resolver.resolve(&bare, &HashSet::new()).await;
        assert_eq!(resolved.len(), 1);
        assert_eq!(
            resolved[0].resource.resource_type,
            ResourceType::FloatingIp
        );

        let mut with_allocation = parent(ResourceType::NatGateway);
        with_allocation
            .metadata
            .insert(metadata_keys::ALLOCATION_ID.to_string(), json!("eip-1"));
        let resolved = resolver.resolve(&with_allocation, &HashSet::new()).await;
        assert!(resolved.is_empty());
    }

    #[tokio::test]
    async fn test_database_backup_bucket_requires_positive_retention() {
        let resolver = HiddenDependencyResolver::new(Arc::new(empty_store()));

        let mut no_backup = parent(ResourceType::ManagedDatabase);
        no_backup
            .metadata
            .insert(metadata_keys::ALLOCATED_STORAGE_GB.to_string(), json!(50));
        let resolved = resolver.resolve(&no_backup, &HashSet::new()).await;
        assert_eq!(resolved.len(), 1); // only the storage volume
        assert_eq!(resolved[0].quantity, 50.0);

        let mut with_backup = no_backup.clone();
        with_backup
            .metadata
            .insert(metadata_keys::BACKUP_RETENTION_DAYS.to_string(), json!(7));
        let resolved = resolver.resolve(&with_backup, &HashSet::new()).await;
        assert_eq!(resolved.len(), 2);
        assert!(resolved
            .iter()
            .any(|r| r.resource.resource_type == ResourceType::ObjectBucket));
    }

    #[tokio::test]
    async fn test_resolution_is_deterministic() {
        let resolver = HiddenDependencyResolver::new(Arc::new(empty_store()));
        let resource = parent(ResourceType::ComputeInstance);

        let first = resolver.resolve(&resource, &HashSet::new()).await;
        let second = resolver.resolve(&resource, &HashSet::new()).await;

        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(a.resource.id, b.resource.id);
            assert_eq!(a.quantity, b.quantity);
        }
    }

    #[tokio::test]
    async fn test_persisted_rule_suppresses_builtin_for_same_child() {
        let mut store = MockHiddenDependencyRuleRepository::new();
        store.expect_find_by_parent_type().returning(|provider, _| {
            Ok(vec![HiddenDependency {
                provider,
                parent_resource_type: ResourceType::ComputeInstance,
                child_resource_type: ResourceType::BlockVolume,
                quantity: QuantityFormula::Fixed { value: 100.0 },
                condition: None,
                is_attached: false,
                description: "Tenant root volume policy".to_string(),
            }])
        });

        let resolver = HiddenDependencyResolver::new(Arc::new(store));
        let resource = parent(ResourceType::ComputeInstance);
        let resolved = resolver.resolve(&resource, &HashSet::new()).await;

        // persisted volume rule replaces the built-in one; built-in NIC
        // rule is still additive
        assert_eq!(resolved.len(), 2);
        let volume = resolved
            .iter()
            .find(|r| r.resource.resource_type == ResourceType::BlockVolume)
            .unwrap();
        assert_eq!(volume.quantity, 100.0);
    }

    #[tokio::test]
    async fn test_store_failure_falls_back_to_builtin() {
        let mut store = MockHiddenDependencyRuleRepository::new();
        store
            .expect_find_by_parent_type()
            .returning(|_, _| Err(EstimationError::Internal("store down".to_string())));

        let resolver = HiddenDependencyResolver::new(Arc::new(store));
        let resource = parent(ResourceType::ComputeInstance);
        let resolved = resolver.resolve(&resource, &HashSet::new()).await;

        assert_eq!(resolved.len(), 2);
    }

    #[tokio::test]
    async fn test_visited_edge_is_not_re_expanded() {
        let resolver = HiddenDependencyResolver::new(Arc::new(empty_store()));
        let resource = parent(ResourceType::ComputeInstance);

        let visited = HashSet::from([(
            ResourceType::ComputeInstance,
            ResourceType::BlockVolume,
        )]);
        let resolved = resolver.resolve(&resource, &visited).await;

        assert_eq!(resolved.len(), 1);
        assert_eq!(
            resolved[0].resource.resource_type,
            ResourceType::NetworkInterface
        );
    }
}
