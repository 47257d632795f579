//! Network resource pricing: NAT gateways, floating IPs, network
//! interfaces, and data transfer.

use domain_pricing::{PricingModel, ResourcePricing};

use super::{billable_after_free, component_or_zero, CostStrategy};
use crate::error::EstimationResult;
use crate::models::{metadata_keys, CostComponent, EstimateDuration, ResourceDescriptor};

/// NAT-style gateways: hourly availability plus per-GB data processing.
///
/// `data_processed_gb` is the amount processed over the requested
/// duration (defaults to zero); the data component is appended only when
/// data was processed.
pub struct NatGatewayStrategy;

impl CostStrategy for NatGatewayStrategy {
    fn components(
        &self,
        resource: &ResourceDescriptor,
        pricing: &ResourcePricing,
        duration: EstimateDuration,
    ) -> EstimationResult<Vec<CostComponent>> {
        let hourly = component_or_zero(pricing, "gateway_hours", PricingModel::PerHour, "hour");
        let mut components = vec![CostComponent::priced(&hourly, duration.hours())];

        let processed_gb = resource
            .metadata_f64(metadata_keys::DATA_PROCESSED_GB)
            .unwrap_or(0.0);
        if processed_gb > 0.0 {
            let data = component_or_zero(
                pricing,
                "data_processing",
                PricingModel::PerUnitVolume,
                "gb",
            );
            components.push(CostComponent::priced(&data, processed_gb));
        }

        Ok(components)
    }
}

/// Floating IPs: hourly while unattached, free while attached.
///
/// The free-when-attached branch is a first-class pricing outcome: the
/// breakdown keeps a zero-subtotal line so an attached IP is
/// distinguishable from an unpriced one.
pub struct FloatingIpStrategy;

impl CostStrategy for FloatingIpStrategy {
    fn components(
        &self,
        resource: &ResourceDescriptor,
        pricing: &ResourcePricing,
        duration: EstimateDuration,
    ) -> EstimationResult<Vec<CostComponent>> {
        let hourly = component_or_zero(pricing, "idle_hours", PricingModel::PerHour, "hour");

        let attached = resource
            .metadata_bool(metadata_keys::ATTACHED)
            .unwrap_or(false);
        let component = if attached {
            CostComponent::free(&hourly, duration.hours())
        } else {
            CostComponent::priced(&hourly, duration.hours())
        };

        Ok(vec![component])
    }
}

/// Virtual network interfaces: same attached/unattached branch as
/// floating IPs.
pub struct NetworkInterfaceStrategy;

impl CostStrategy for NetworkInterfaceStrategy {
    fn components(
        &self,
        resource: &ResourceDescriptor,
        pricing: &ResourcePricing,
        duration: EstimateDuration,
    ) -> EstimationResult<Vec<CostComponent>> {
        let hourly = component_or_zero(pricing, "interface_hours", PricingModel::PerHour, "hour");

        let attached = resource
            .metadata_bool(metadata_keys::ATTACHED)
            .unwrap_or(false);
        let component = if attached {
            CostComponent::free(&hourly, duration.hours())
        } else {
            CostComponent::priced(&hourly, duration.hours())
        };

        Ok(vec![component])
    }
}

/// Outbound data transfer: per GB with a prorated monthly free tier.
///
/// `monthly_transfer_gb` is the monthly egress volume (defaults to zero).
pub struct DataTransferStrategy;

impl CostStrategy for DataTransferStrategy {
    fn components(
        &self,
        resource: &ResourceDescriptor,
        pricing: &ResourcePricing,
        duration: EstimateDuration,
    ) -> EstimationResult<Vec<CostComponent>> {
        let monthly_gb = resource
            .metadata_f64(metadata_keys::MONTHLY_TRANSFER_GB)
            .unwrap_or(0.0);
        let raw = monthly_gb * duration.months();
        let free = pricing.metadata_f64("free_gb_per_month").unwrap_or(0.0);

        let transfer = component_or_zero(
            pricing,
            "data_transfer_out",
            PricingModel::PerUnitVolume,
            "gb",
        );

        Ok(vec![CostComponent::priced(
            &transfer,
            billable_after_free(raw, free, duration),
        )])
    }
}
