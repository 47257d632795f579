//! Serverless function pricing.

use domain_pricing::{PricingModel, ResourcePricing};

use super::{billable_after_free, component_or_zero, CostStrategy};
use crate::error::EstimationResult;
use crate::models::{metadata_keys, CostComponent, EstimateDuration, ResourceDescriptor};

/// Serverless functions: tiered pricing over three independent
/// components, each with its own prorated monthly free tier and each
/// appended only when its billable quantity is non-zero.
///
/// - compute time: GB-seconds = memory fraction x execution seconds x
///   invocations (`memory_mb` defaults to 128, `avg_duration_ms` to 100)
/// - invocations: per million (`monthly_invocations` defaults to 0)
/// - egress: per GB (`monthly_egress_gb` defaults to 0)
pub struct ServerlessFunctionStrategy;

impl CostStrategy for ServerlessFunctionStrategy {
    fn components(
        &self,
        resource: &ResourceDescriptor,
        pricing: &ResourcePricing,
        duration: EstimateDuration,
    ) -> EstimationResult<Vec<CostComponent>> {
        let memory_mb = resource
            .metadata_f64(metadata_keys::MEMORY_MB)
            .unwrap_or(128.0);
        let avg_duration_ms = resource
            .metadata_f64(metadata_keys::AVG_DURATION_MS)
            .unwrap_or(100.0);
        let monthly_invocations = resource
            .metadata_f64(metadata_keys::MONTHLY_INVOCATIONS)
            .unwrap_or(0.0);
        let monthly_egress_gb = resource
            .metadata_f64(metadata_keys::MONTHLY_EGRESS_GB)
            .unwrap_or(0.0);

        let invocations = monthly_invocations * duration.months();
        let mut components = Vec::new();

        // compute time in GB-seconds
        let gb_seconds = (memory_mb / 1024.0) * (avg_duration_ms / 1000.0) * invocations;
        let billable_gb_seconds = billable_after_free(
            gb_seconds,
            pricing
                .metadata_f64("free_gb_seconds_per_month")
                .unwrap_or(0.0),
            duration,
        );
        if billable_gb_seconds > 0.0 {
            let compute = component_or_zero(
                pricing,
                "compute_duration",
                PricingModel::Tiered,
                "gb_second",
            );
            components.push(CostComponent::priced(&compute, billable_gb_seconds));
        }

        // invocation count, rate per million
        let billable_invocations = billable_after_free(
            invocations,
            pricing
                .metadata_f64("free_requests_per_month")
                .unwrap_or(0.0),
            duration,
        );
        if billable_invocations > 0.0 {
            let invocation_component = component_or_zero(
                pricing,
                "invocations",
                PricingModel::PerRequestBatch,
                "1m_requests",
            );
            components.push(CostComponent::priced(
                &invocation_component,
                billable_invocations,
            ));
        }

        // egress data
        let egress_gb = monthly_egress_gb * duration.months();
        let billable_egress = billable_after_free(
            egress_gb,
            pricing.metadata_f64("free_gb_per_month").unwrap_or(0.0),
            duration,
        );
        if billable_egress > 0.0 {
            let egress =
                component_or_zero(pricing, "egress", PricingModel::PerUnitVolume, "gb");
            components.push(CostComponent::priced(&egress, billable_egress));
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

    fn pricing() -> ResourcePricing {
        catalog_pricing(
            CloudProvider::Aws,
            ResourceType::ServerlessFunction,
            "us-east-1",
            None,
        )
    }

    #[test]
    fn test_idle_function_has_no_components() {
        let resource = descriptor(ResourceType::ServerlessFunction, HashMap::new());
        let components = ServerlessFunctionStrategy
            .components(&resource, &pricing(), EstimateDuration::from_hours(720.0))
            .unwrap();

        assert!(components.is_empty());
    }

    #[test]
    fn test_within_free_tier_charges_nothing() {
        // 1M invocations x 128MB x 100ms = 12,800 GB-s, under every allowance
        let resource = descriptor(
            ResourceType::ServerlessFunction,
            HashMap::from([(
                metadata_keys::MONTHLY_INVOCATIONS.to_string(),
                json!(1_000_000),
            )]),
        );
        let components = ServerlessFunctionStrategy
            .components(&resource, &pricing(), EstimateDuration::from_hours(720.0))
            .unwrap();

        assert!(components.is_empty());
    }

    #[test]
    fn test_heavy_function_charges_three_components() {
        let resource = descriptor(
            ResourceType::ServerlessFunction,
            HashMap::from([
                (metadata_keys::MEMORY_MB.to_string(), json!(1024)),
                (metadata_keys::AVG_DURATION_MS.to_string(), json!(500)),
                (
                    metadata_keys::MONTHLY_INVOCATIONS.to_string(),
                    json!(10_000_000),
                ),
                (metadata_keys::MONTHLY_EGRESS_GB.to_string(), json!(500)),
            ]),
        );
        let components = ServerlessFunctionStrategy
            .components(&resource, &pricing(), EstimateDuration::from_hours(720.0))
            .unwrap();

        assert_eq!(components.len(), 3);

        // compute: 1GB x 0.5s x 10M = 5,000,000 GB-s, minus 400k free
        let compute = components
            .iter()
            .find(|c| c.component_name == "compute_duration")
            .unwrap();
        assert!((compute.quantity - 4_600_000.0).abs() < 1e-3);
        assert!((compute.subtotal - 4_600_000.0 * 0.000_016_666_7).abs() < 1e-2);

        // invocations: 10M minus 1M free at 0.20/1M
        let invocations = components
            .iter()
            .find(|c| c.component_name == "invocations")
            .unwrap();
        assert!((invocations.subtotal - 1.8).abs() < COST_EPSILON);

        // egress: 500 minus 100 free at 0.09/GB
        let egress = components
            .iter()
            .find(|c| c.component_name == "egress")
            .unwrap();
        assert!((egress.subtotal - 36.0).abs() < COST_EPSILON);
    }

    #[test]
    fn test_memory_defaults_to_128_mb() {
        // 20M invocations x 128MB x 100ms = 250,000 GB-s
        let resource = descriptor(
            ResourceType::ServerlessFunction,
            HashMap::from([(
                metadata_keys::MONTHLY_INVOCATIONS.to_string(),
                json!(20_000_000),
            )]),
        );
        let components = ServerlessFunctionStrategy
            .components(&resource, &pricing(), EstimateDuration::from_hours(720.0))
            .unwrap();

        // compute stays inside the 400k GB-s free tier; invocations exceed
        let compute = components
            .iter()
            .find(|c| c.component_name == "compute_duration");
        assert!(compute.is_none());

        let invocations = components
            .iter()
            .find(|c| c.component_name == "invocations")
            .unwrap();
        // 19M billable at 0.20/1M
        assert!((invocations.subtotal - 3.8).abs() < COST_EPSILON);
    }
}
