//! Compute instance pricing.

use domain_pricing::{PricingModel, ResourcePricing};

use super::{component_or_zero, CostStrategy};
use crate::error::EstimationResult;
use crate::models::{
    metadata_keys, CostComponent, EstimateDuration, ResourceDescriptor, VariantSelector,
};

/// On-demand compute instances: hourly rate by instance size.
///
/// `instance_type` metadata selects the size; when absent, the rate tiers
/// fall back to the smallest listed size for the provider.
pub struct ComputeInstanceStrategy;

impl CostStrategy for ComputeInstanceStrategy {
    fn variant(&self, resource: &ResourceDescriptor) -> Option<VariantSelector> {
        resource
            .metadata_str(metadata_keys::INSTANCE_TYPE)
            .map(VariantSelector::new)
    }

    fn components(
        &self,
        _resource: &ResourceDescriptor,
        pricing: &ResourcePricing,
        duration: EstimateDuration,
    ) -> EstimationResult<Vec<CostComponent>> {
        let hourly = component_or_zero(pricing, "compute_hours", PricingModel::PerHour, "hour");

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
    fn test_variant_from_metadata() {
        let resource = descriptor(
            ResourceType::ComputeInstance,
            HashMap::from([(
                metadata_keys::INSTANCE_TYPE.to_string(),
                json!("m5.large"),
            )]),
        );

        let variant = ComputeInstanceStrategy.variant(&resource).unwrap();
        assert_eq!(variant.variant, "m5.large");
        assert!(variant.subtype.is_none());
    }

    #[test]
    fn test_no_variant_when_metadata_absent() {
        let resource = descriptor(ResourceType::ComputeInstance, HashMap::new());
        assert!(ComputeInstanceStrategy.variant(&resource).is_none());
    }

    #[test]
    fn test_monthly_cost_for_default_size() {
        let resource = descriptor(ResourceType::ComputeInstance, HashMap::new());
        let pricing = catalog_pricing(
            CloudProvider::Aws,
            ResourceType::ComputeInstance,
            "us-east-1",
            None,
        );

        let components = ComputeInstanceStrategy
            .components(&resource, &pricing, EstimateDuration::from_hours(720.0))
            .unwrap();

        // t3.micro at 0.0104/h for a month
        assert_eq!(components.len(), 1);
        assert!((total(&components) - 7.488).abs() < COST_EPSILON);
        assert_eq!(components[0].component_name, "compute_hours");
        assert_eq!(components[0].quantity, 720.0);
    }

    #[test]
    fn test_unknown_size_prices_at_zero() {
        let resource = descriptor(
            ResourceType::ComputeInstance,
            HashMap::from([(
                metadata_keys::INSTANCE_TYPE.to_string(),
                json!("z9.mega"),
            )]),
        );
        let pricing = catalog_pricing(
            CloudProvider::Aws,
            ResourceType::ComputeInstance,
            "us-east-1",
            Some("z9.mega"),
        );
        assert!(pricing.fallback_rate);

        let components = ComputeInstanceStrategy
            .components(&resource, &pricing, EstimateDuration::from_hours(100.0))
            .unwrap();

        assert_eq!(total(&components), 0.0);
        // still one line so callers can see the zero rate
        assert_eq!(components.len(), 1);
    }
}
