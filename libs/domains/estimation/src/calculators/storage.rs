//! Block volume and object bucket pricing.

use domain_pricing::{PricingModel, ResourcePricing};

use super::{billable_after_free, component_or_zero, CostStrategy};
use crate::error::{EstimationError, EstimationResult};
use crate::models::{
    metadata_keys, CostComponent, EstimateDuration, ResourceDescriptor, VariantSelector,
};

/// Block storage volumes: per GB-month, prorated over the duration.
///
/// `size_gb` is the one hard-required metadata field in the engine; a
/// volume without a size has no sensible default. `volume_type` selects
/// the variant (general-purpose class when absent). io-class volumes with
/// `iops` metadata are charged a provisioned-IOPS component as well.
pub struct BlockVolumeStrategy;

impl CostStrategy for BlockVolumeStrategy {
    fn variant(&self, resource: &ResourceDescriptor) -> Option<VariantSelector> {
        resource
            .metadata_str(metadata_keys::VOLUME_TYPE)
            .map(VariantSelector::new)
    }

    fn components(
        &self,
        resource: &ResourceDescriptor,
        pricing: &ResourcePricing,
        duration: EstimateDuration,
    ) -> EstimationResult<Vec<CostComponent>> {
        let size_gb = resource
            .metadata_f64(metadata_keys::SIZE_GB)
            .ok_or(EstimationError::MissingRequiredMetadata {
                resource_type: resource.resource_type,
                field: metadata_keys::SIZE_GB,
            })?;

        let storage = component_or_zero(
            pricing,
            "volume_storage",
            PricingModel::PerUnitVolume,
            "gb_month",
        );
        let mut components = vec![CostComponent::priced(
            &storage,
            size_gb * duration.months(),
        )];

        let iops = resource.metadata_f64(metadata_keys::IOPS).unwrap_or(0.0);
        if iops > 0.0 {
            if let Some(iops_component) = pricing.component("provisioned_iops") {
                components.push(CostComponent::priced(
                    iops_component,
                    iops * duration.months(),
                ));
            }
        }

        Ok(components)
    }
}

/// Object storage buckets: per GB-month storage by storage class, plus
/// request batches with a prorated monthly free tier.
///
/// `storage_gb` is hard-required; `storage_class` selects the variant
/// (standard when absent); `monthly_requests` defaults to zero.
pub struct ObjectBucketStrategy;

impl CostStrategy for ObjectBucketStrategy {
    fn variant(&self, resource: &ResourceDescriptor) -> Option<VariantSelector> {
        resource
            .metadata_str(metadata_keys::STORAGE_CLASS)
            .map(VariantSelector::new)
    }

    fn components(
        &self,
        resource: &ResourceDescriptor,
        pricing: &ResourcePricing,
        duration: EstimateDuration,
    ) -> EstimationResult<Vec<CostComponent>> {
        let storage_gb = resource
            .metadata_f64(metadata_keys::STORAGE_GB)
            .ok_or(EstimationError::MissingRequiredMetadata {
                resource_type: resource.resource_type,
                field: metadata_keys::STORAGE_GB,
            })?;

        let storage = component_or_zero(
            pricing,
            "bucket_storage",
            PricingModel::PerUnitVolume,
            "gb_month",
        );
        let mut components = vec![CostComponent::priced(
            &storage,
            storage_gb * duration.months(),
        )];

        let monthly_requests = resource
            .metadata_f64(metadata_keys::MONTHLY_REQUESTS)
            .unwrap_or(0.0);
        if monthly_requests > 0.0 {
            let raw = monthly_requests * duration.months();
            let free = pricing
                .metadata_f64("free_requests_per_month")
                .unwrap_or(0.0);
            let requests = component_or_zero(
                pricing,
                "bucket_requests",
                PricingModel::PerRequestBatch,
                "1k_requests",
            );
            components.push(CostComponent::priced(
                &requests,
                billable_after_free(raw, free, duration),
            ));
        }

        Ok(components)
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
    fn test_volume_one_month_reference_scenario() {
        // 100 GB at 0.08/GB-month over exactly one month => 8.0
        let resource = descriptor(
            ResourceType::BlockVolume,
            HashMap::from([(metadata_keys::SIZE_GB.to_string(), json!(100))]),
        );
        let pricing = catalog_pricing(
            CloudProvider::Aws,
            ResourceType::BlockVolume,
            "us-east-1",
            None,
        );

        let components = BlockVolumeStrategy
            .components(&resource, &pricing, EstimateDuration::from_hours(720.0))
            .unwrap();

        assert!((total(&components) - 8.0).abs() < COST_EPSILON);
        assert_eq!(components[0].quantity, 100.0);
    }

    #[test]
    fn test_volume_half_month_prorates() {
        let resource = descriptor(
            ResourceType::BlockVolume,
            HashMap::from([(metadata_keys::SIZE_GB.to_string(), json!(100))]),
        );
        let pricing = catalog_pricing(
            CloudProvider::Aws,
            ResourceType::BlockVolume,
            "us-east-1",
            None,
        );

        let components = BlockVolumeStrategy
            .components(&resource, &pricing, EstimateDuration::from_hours(360.0))
            .unwrap();

        assert!((total(&components) - 4.0).abs() < COST_EPSILON);
    }

    #[test]
    fn test_volume_missing_size_is_required() {
        let resource = descriptor(ResourceType::BlockVolume, HashMap::new());
        let pricing = catalog_pricing(
            CloudProvider::Aws,
            ResourceType::BlockVolume,
            "us-east-1",
            None,
        );

        let result = BlockVolumeStrategy.components(
            &resource,
            &pricing,
            EstimateDuration::from_hours(720.0),
        );
        assert!(matches!(
            result,
            Err(EstimationError::MissingRequiredMetadata {
                field: "size_gb",
                ..
            })
        ));
    }

    #[test]
    fn test_volume_io_class_charges_iops() {
        let resource = descriptor(
            ResourceType::BlockVolume,
            HashMap::from([
                (metadata_keys::SIZE_GB.to_string(), json!(100)),
                (metadata_keys::VOLUME_TYPE.to_string(), json!("io1")),
                (metadata_keys::IOPS.to_string(), json!(1000)),
            ]),
        );
        let pricing = catalog_pricing(
            CloudProvider::Aws,
            ResourceType::BlockVolume,
            "us-east-1",
            Some("io1"),
        );

        let components = BlockVolumeStrategy
            .components(&resource, &pricing, EstimateDuration::from_hours(720.0))
            .unwrap();

        assert_eq!(components.len(), 2);
        // 100 * 0.125 + 1000 * 0.065
        assert!((total(&components) - (12.5 + 65.0)).abs() < COST_EPSILON);
    }

    #[test]
    fn test_bucket_requests_free_tier_boundary() {
        let pricing = catalog_pricing(
            CloudProvider::Aws,
            ResourceType::ObjectBucket,
            "us-east-1",
            None,
        );
        let one_month = EstimateDuration::from_hours(720.0);

        // exactly the free allowance -> request component charges nothing
        let at_allowance = descriptor(
            ResourceType::ObjectBucket,
            HashMap::from([
                (metadata_keys::STORAGE_GB.to_string(), json!(10)),
                (metadata_keys::MONTHLY_REQUESTS.to_string(), json!(20_000)),
            ]),
        );
        let components = ObjectBucketStrategy
            .components(&at_allowance, &pricing, one_month)
            .unwrap();
        let requests = components
            .iter()
            .find(|c| c.component_name == "bucket_requests")
            .unwrap();
        assert_eq!(requests.subtotal, 0.0);

        // 1,000 requests above the allowance -> only the excess is billed
        let above = descriptor(
            ResourceType::ObjectBucket,
            HashMap::from([
                (metadata_keys::STORAGE_GB.to_string(), json!(10)),
                (metadata_keys::MONTHLY_REQUESTS.to_string(), json!(21_000)),
            ]),
        );
        let components = ObjectBucketStrategy
            .components(&above, &pricing, one_month)
            .unwrap();
        let requests = components
            .iter()
            .find(|c| c.component_name == "bucket_requests")
            .unwrap();
        assert!((requests.subtotal - 0.0004).abs() < COST_EPSILON);
    }

    #[test]
    fn test_bucket_missing_storage_is_required() {
        let resource = descriptor(ResourceType::ObjectBucket, HashMap::new());
        let pricing = catalog_pricing(
            CloudProvider::Aws,
            ResourceType::ObjectBucket,
            "us-east-1",
            None,
        );

        let result = ObjectBucketStrategy.components(
            &resource,
            &pricing,
            EstimateDuration::from_hours(720.0),
        );
        assert!(matches!(
            result,
            Err(EstimationError::MissingRequiredMetadata {
                field: "storage_gb",
                ..
            })
        ));
    }
}
