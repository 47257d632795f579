//! Built-in hidden-dependency rule table.
//!
//! These rules describe what each provider implicitly provisions when a
//! declared resource is created. The persisted rule store can override
//! any of them per child type; the table below is the fallback.

use domain_pricing::{CloudProvider, ResourceType, SUPPORTED_PROVIDERS};

use crate::models::{metadata_keys, HiddenDependency, QuantityFormula, RuleCondition};

/// Default root volume size when the parent declares none
const DEFAULT_ROOT_VOLUME_GB: f64 = 8.0;

/// Default database storage allocation when the parent declares none
const DEFAULT_DB_STORAGE_GB: f64 = 20.0;

/// The built-in rule table, one rule set per supported provider.
pub fn builtin_rules() -> Vec<HiddenDependency> {
    let mut rules = Vec::new();

    for provider in SUPPORTED_PROVIDERS {
        rules.extend(provider_rules(provider));
    }

    rules
}

fn provider_rules(provider: CloudProvider) -> Vec<HiddenDependency> {
    vec![
        // A compute instance boots from a root volume that is billed
        // like any other block volume.
        HiddenDependency {
            provider,
            parent_resource_type: ResourceType::ComputeInstance,
            child_resource_type: ResourceType::BlockVolume,
            quantity: QuantityFormula::MetadataField {
                field: metadata_keys::ROOT_VOLUME_GB.to_string(),
                default: DEFAULT_ROOT_VOLUME_GB,
            },
            condition: None,
            is_attached: false,
            description: "Root volume provisioned with the instance".to_string(),
        },
        // The primary network interface is created implicitly and stays
        // attached, so it prices to zero but remains visible.
        HiddenDependency {
            provider,
            parent_resource_type: ResourceType::ComputeInstance,
            child_resource_type: ResourceType::NetworkInterface,
            quantity: QuantityFormula::Fixed { value: 1.0 },
            condition: None,
            is_attached: true,
            description: "Primary network interface".to_string(),
        },
        // A NAT gateway allocates a floating IP unless the caller
        // supplied an existing allocation.
        HiddenDependency {
            provider,
            parent_resource_type: ResourceType::NatGateway,
            child_resource_type: ResourceType::FloatingIp,
            quantity: QuantityFormula::Fixed { value: 1.0 },
            condition: Some(RuleCondition::MetadataAbsent {
                field: metadata_keys::ALLOCATION_ID.to_string(),
            }),
            is_attached: false,
            description: "Floating IP allocated for the gateway".to_string(),
        },
        // A managed database sits on a storage volume sized to its
        // allocated storage.
        HiddenDependency {
            provider,
            parent_resource_type: ResourceType::ManagedDatabase,
            child_resource_type: ResourceType::BlockVolume,
            quantity: QuantityFormula::MetadataField {
                field: metadata_keys::ALLOCATED_STORAGE_GB.to_string(),
                default: DEFAULT_DB_STORAGE_GB,
            },
            condition: None,
            is_attached: false,
            description: "Database storage volume".to_string(),
        },
        // Automated backups land in an object bucket sized to the
        // allocated storage, only while retention is enabled.
        HiddenDependency {
            provider,
            parent_resource_type: ResourceType::ManagedDatabase,
            child_resource_type: ResourceType::ObjectBucket,
            quantity: QuantityFormula::MetadataField {
                field: metadata_keys::ALLOCATED_STORAGE_GB.to_string(),
                default: DEFAULT_DB_STORAGE_GB,
            },
            condition: Some(RuleCondition::MetadataPositive {
                field: metadata_keys::BACKUP_RETENTION_DAYS.to_string(),
            }),
            is_attached: false,
            description: "Automated backup storage".to_string(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rules_exist_for_every_supported_provider() {
        let rules = builtin_rules();
        for provider in SUPPORTED_PROVIDERS {
            assert!(rules.iter().any(|r| r.provider == provider));
        }
    }

    #[test]
    fn test_no_duplicate_child_types_per_parent() {
        let rules = builtin_rules();
        for provider in SUPPORTED_PROVIDERS {
            for parent in [
                ResourceType::ComputeInstance,
                ResourceType::NatGateway,
                ResourceType::ManagedDatabase,
            ] {
                let mut seen = std::collections::HashSet::new();
                for rule in rules
                    .iter()
                    .filter(|r| r.provider == provider && r.parent_resource_type == parent)
                {
                    assert!(
                        seen.insert(rule.child_resource_type),
                        "duplicate child {:?} for parent {:?}",
                        rule.child_resource_type,
                        parent
                    );
                }
            }
        }
    }
}
