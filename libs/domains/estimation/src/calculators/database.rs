//! Managed relational database pricing.

use domain_pricing::{PricingModel, ResourcePricing};

use super::{component_or_zero, CostStrategy};
use crate::error::EstimationResult;
use crate::models::{
    metadata_keys, CostComponent, EstimateDuration, ResourceDescriptor, VariantSelector,
};

/// Managed databases: hourly rate by instance class, doubled for
/// multi-AZ deployments.
///
/// `instance_class` selects the variant (smallest class when absent);
/// `engine` narrows persisted-rate lookups as the variant subtype. The
/// database's storage is not priced here: hidden-dependency expansion
/// attaches a block volume sized to `allocated_storage_gb`.
pub struct ManagedDatabaseStrategy;

impl CostStrategy for ManagedDatabaseStrategy {
    fn variant(&self, resource: &ResourceDescriptor) -> Option<VariantSelector> {
        let class = resource.metadata_str(metadata_keys::INSTANCE_CLASS)?;
        Some(match resource.metadata_str(metadata_keys::ENGINE) {
            Some(engine) => VariantSelector::with_subtype(class, engine),
            None => VariantSelector::new(class),
        })
    }

    fn components(
        &self,
        resource: &ResourceDescriptor,
        pricing: &ResourcePricing,
        duration: EstimateDuration,
    ) -> EstimationResult<Vec<CostComponent>> {
        let mut hourly =
            component_or_zero(pricing, "database_hours", PricingModel::PerHour, "hour");

        // Multi-AZ runs a synchronous standby, doubling the instance rate
        if resource
            .metadata_bool(metadata_keys::MULTI_AZ)
            .unwrap_or(false)
        {
            hourly.rate *= 2.0;
        }

        Ok(vec![CostComponent::priced(&hourly, duration.hours())])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculators::test_support::{catalog_pricing, descriptor, total};
    use crate::models::COST_EPSILON;
    use domain_pricing::{CloudProvider, ResourceType};
    use serde_json::json;
    use std::collections::HashMap;

    #[test]
    fn test_variant_includes_engine_subtype() {
        let resource = descriptor(
            ResourceType::ManagedDatabase,
            HashMap::from([
                (
                    metadata_keys::INSTANCE_CLASS.to_string(),
                    json!("db.m5.large"),
                ),
                (metadata_keys::ENGINE.to_string(), json!("postgres")),
            ]),
        );

        let variant = ManagedDatabaseStrategy.variant(&resource).unwrap();
        assert_eq!(variant.variant, "db.m5.large");
        assert_eq!(variant.subtype.as_deref(), Some("postgres"));
    }

    #[test]
    fn test_default_class_monthly_cost() {
        let resource = descriptor(ResourceType::ManagedDatabase, HashMap::new());
        let pricing = catalog_pricing(
            CloudProvider::Aws,
            ResourceType::ManagedDatabase,
            "us-east-1",
            None,
        );

        let components = ManagedDatabaseStrategy
            .components(&resource, &pricing, EstimateDuration::from_hours(720.0))
            .unwrap();

        // db.t3.micro at 0.017/h
        assert!((total(&components) - 720.0 * 0.017).abs() < COST_EPSILON);
    }

    #[test]
    fn test_multi_az_doubles_rate() {
        let single = descriptor(ResourceType::ManagedDatabase, HashMap::new());
        let multi = descriptor(
            ResourceType::ManagedDatabase,
            HashMap::from([(metadata_keys::MULTI_AZ.to_string(), json!(true))]),
        );
        let pricing = catalog_pricing(
            CloudProvider::Aws,
            ResourceType::ManagedDatabase,
            "us-east-1",
            None,
        );
        let duration = EstimateDuration::from_hours(100.0);

        let single_total = total(
            &ManagedDatabaseStrategy
                .components(&single, &pricing, duration)
                .unwrap(),
        );
        let multi_total = total(
            &ManagedDatabaseStrategy
                .components(&multi, &pricing, duration)
                .unwrap(),
        );

        assert!((multi_total - 2.0 * single_total).abs() < COST_EPSILON);
    }
}
