//! Per-resource-type cost strategies.
//!
//! The [`StrategyRegistry`] is the only dispatch mechanism for cost
//! computation: every supported resource type registers a strategy, and
//! custom strategies can be registered to add or override types without
//! touching the engine.

pub mod compute;
pub mod database;
pub mod network;
pub mod serverless;
pub mod storage;

use std::collections::HashMap;
use std::sync::Arc;

use domain_pricing::{
    Currency, PriceComponent, PricingModel, ResourcePricing, ResourceType,
};

use crate::error::EstimationResult;
use crate::models::{CostComponent, EstimateDuration, ResourceDescriptor, VariantSelector};

pub use compute::ComputeInstanceStrategy;
pub use database::ManagedDatabaseStrategy;
pub use network::{
    DataTransferStrategy, FloatingIpStrategy, NatGatewayStrategy, NetworkInterfaceStrategy,
};
pub use serverless::ServerlessFunctionStrategy;
pub use storage::{BlockVolumeStrategy, ObjectBucketStrategy};

/// A per-resource-type pricing strategy.
///
/// Strategies read parameters from the resource's metadata (with
/// documented defaults), apply the pricing model from the resolved rate
/// card, and produce the component breakdown. Assembly into a
/// [`crate::models::CostEstimate`] happens in the service.
pub trait CostStrategy: Send + Sync {
    /// Variant discriminator extracted from metadata for variant-sensitive
    /// types. `None` lets the rate tiers apply their documented default.
    fn variant(&self, _resource: &ResourceDescriptor) -> Option<VariantSelector> {
        None
    }

    /// Compute the component breakdown for the resource over the duration.
    fn components(
        &self,
        resource: &ResourceDescriptor,
        pricing: &ResourcePricing,
        duration: EstimateDuration,
    ) -> EstimationResult<Vec<CostComponent>>;
}

/// Registry mapping resource types to their strategies
pub struct StrategyRegistry {
    strategies: HashMap<ResourceType, Arc<dyn CostStrategy>>,
}

impl StrategyRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self {
            strategies: HashMap::new(),
        }
    }

    /// Registry with every built-in strategy registered
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(ResourceType::ComputeInstance, Arc::new(ComputeInstanceStrategy));
        registry.register(ResourceType::BlockVolume, Arc::new(BlockVolumeStrategy));
        registry.register(ResourceType::ObjectBucket, Arc::new(ObjectBucketStrategy));
        registry.register(ResourceType::ManagedDatabase, Arc::new(ManagedDatabaseStrategy));
        registry.register(ResourceType::NatGateway, Arc::new(NatGatewayStrategy));
        registry.register(ResourceType::FloatingIp, Arc::new(FloatingIpStrategy));
        registry.register(
            ResourceType::NetworkInterface,
            Arc::new(NetworkInterfaceStrategy),
        );
        registry.register(
            ResourceType::ServerlessFunction,
            Arc::new(ServerlessFunctionStrategy),
        );
        registry.register(ResourceType::DataTransfer, Arc::new(DataTransferStrategy));
        registry
    }

    /// Register (or replace) the strategy for a resource type
    pub fn register(&mut self, resource_type: ResourceType, strategy: Arc<dyn CostStrategy>) {
        self.strategies.insert(resource_type, strategy);
    }

    /// Look up the strategy for a resource type
    pub fn get(&self, resource_type: ResourceType) -> Option<Arc<dyn CostStrategy>> {
        self.strategies.get(&resource_type).cloned()
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

/// Free-tier subtraction: the monthly allowance is prorated to the
/// requested duration and the result floored at zero.
pub(crate) fn billable_after_free(
    raw: f64,
    free_per_month: f64,
    duration: EstimateDuration,
) -> f64 {
    (raw - free_per_month * duration.months()).max(0.0)
}

/// Fetch a named component from the rate card, or a zero-rate stand-in so
/// the breakdown keeps its primary line even when a store-sourced card is
/// missing the component.
pub(crate) fn component_or_zero(
    pricing: &ResourcePricing,
    name: &str,
    model: PricingModel,
    unit: &str,
) -> PriceComponent {
    pricing.component(name).cloned().unwrap_or(PriceComponent {
        name: name.to_string(),
        pricing_model: model,
        unit: unit.to_string(),
        rate: 0.0,
        currency: Currency::Usd,
        region: None,
        description: String::new(),
    })
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use domain_pricing::{CloudProvider, PricingCatalog};
    use std::collections::HashMap;

    /// Catalog-backed rate card for strategy tests
    pub fn catalog_pricing(
        provider: CloudProvider,
        resource_type: ResourceType,
        region: &str,
        variant: Option<&str>,
    ) -> ResourcePricing {
        PricingCatalog::builtin()
            .lookup(provider, resource_type, region, variant)
            .expect("catalog entry must exist for tests")
    }

    pub fn descriptor(
        resource_type: ResourceType,
        metadata: HashMap<String, serde_json::Value>,
    ) -> ResourceDescriptor {
        ResourceDescriptor {
            id: "res-test".to_string(),
            name: "strategy-test".to_string(),
            resource_type,
            provider: CloudProvider::Aws,
            region: "us-east-1".to_string(),
            metadata,
            parent_id: None,
        }
    }

    pub fn total(components: &[CostComponent]) -> f64 {
        components.iter().map(|c| c.subtotal).sum()
    }
}
