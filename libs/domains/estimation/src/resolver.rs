//! Rate resolution chain.
//!
//! Produces the [`ResourcePricing`] rate card for a resource, trying an
//! explicit ordered list of tiers; the first tier that yields a card wins:
//!
//! 1. a registered per-type pricing override (the plugin point),
//! 2. the persisted rate store,
//! 3. the built-in static catalog.
//!
//! A store I/O failure is logged and degrades to the next tier; only when
//! every tier misses does resolution fail with `UnsupportedResourceType`.

use std::collections::HashMap;
use std::sync::Arc;

use domain_pricing::{
    PricingCatalog, RateRepository, RateSource, ResourcePricing, ResourceType,
};
use observability::EstimationMetrics;

use crate::error::{EstimationError, EstimationResult};
use crate::models::{ResourceDescriptor, VariantSelector};

/// A registered pricing function for one resource type. Returning `None`
/// passes resolution to the next tier.
pub type PricingOverrideFn =
    Arc<dyn Fn(&ResourceDescriptor) -> Option<ResourcePricing> + Send + Sync>;

/// Resource types whose rate rows are keyed by variant
const VARIANT_SENSITIVE: [ResourceType; 4] = [
    ResourceType::ComputeInstance,
    ResourceType::BlockVolume,
    ResourceType::ObjectBucket,
    ResourceType::ManagedDatabase,
];

/// Ordered fallback chain producing rate cards
pub struct RateResolver<R: RateRepository> {
    overrides: HashMap<ResourceType, PricingOverrideFn>,
    store: Arc<R>,
    catalog: Arc<PricingCatalog>,
}

impl<R: RateRepository> RateResolver<R> {
    pub fn new(store: Arc<R>, catalog: Arc<PricingCatalog>) -> Self {
        Self {
            overrides: HashMap::new(),
            store,
            catalog,
        }
    }

    /// Register a pricing override for a resource type. Overrides win over
    /// both the persisted store and the catalog, supporting new or
    /// replacement rate sources without touching the chain itself.
    pub fn register_override(&mut self, resource_type: ResourceType, f: PricingOverrideFn) {
        self.overrides.insert(resource_type, f);
    }

    /// Resolve the rate card for a resource.
    pub async fn resolve(
        &self,
        resource: &ResourceDescriptor,
        variant: Option<&VariantSelector>,
    ) -> EstimationResult<ResourcePricing> {
        if let Some(pricing) = self.try_override(resource) {
            EstimationMetrics::record_rate_resolution(
                "calculator",
                &resource.resource_type.to_string(),
            );
            return Ok(pricing);
        }

        if let Some(pricing) = self.try_store(resource, variant).await {
            EstimationMetrics::record_rate_resolution("store", &resource.resource_type.to_string());
            return Ok(pricing);
        }

        if let Some(pricing) = self.try_catalog(resource, variant) {
            EstimationMetrics::record_rate_resolution(
                "catalog",
                &resource.resource_type.to_string(),
            );
            if pricing.fallback_rate {
                EstimationMetrics::record_rate_fallback(
                    &resource.resource_type.to_string(),
                    variant.map(|v| v.variant.as_str()).unwrap_or("default"),
                );
            }
            return Ok(pricing);
        }

        Err(EstimationError::UnsupportedResourceType(
            resource.resource_type,
        ))
    }

    /// Tier 1: registered pricing function
    fn try_override(&self, resource: &ResourceDescriptor) -> Option<ResourcePricing> {
        let f = self.overrides.get(&resource.resource_type)?;
        let mut pricing = f(resource)?;
        pricing.source = RateSource::Calculator;
        Some(pricing)
    }

    /// Tier 2: persisted rate store. Store errors degrade to the catalog.
    async fn try_store(
        &self,
        resource: &ResourceDescriptor,
        variant: Option<&VariantSelector>,
    ) -> Option<ResourcePricing> {
        let variant_sensitive = VARIANT_SENSITIVE.contains(&resource.resource_type);

        let result = match (variant, variant_sensitive) {
            (Some(selector), true) => {
                self.store
                    .find_by_variant(
                        resource.provider,
                        resource.resource_type,
                        &selector.variant,
                        Some(&resource.region),
                        selector.subtype.as_deref(),
                    )
                    .await
            }
            _ => {
                self.store
                    .find_active_rates(
                        resource.provider,
                        resource.resource_type,
                        Some(&resource.region),
                    )
                    .await
            }
        };

        let rates = match result {
            Ok(rates) => rates,
            Err(e) => {
                tracing::warn!(
                    resource_type = %resource.resource_type,
                    provider = %resource.provider,
                    "Rate store lookup failed, falling back to catalog: {}",
                    e
                );
                return None;
            }
        };

        if rates.is_empty() {
            return None;
        }

        // Store rows carry the component rates; free-tier allowances stay
        // with the catalog, so merge its metadata underneath.
        let mut metadata = self
            .catalog
            .lookup(
                resource.provider,
                resource.resource_type,
                &resource.region,
                variant.map(|v| v.variant.as_str()),
            )
            .map(|p| p.metadata)
            .unwrap_or_default();
        if let Some(selector) = variant {
            metadata.insert(
                "variant".to_string(),
                serde_json::json!(selector.variant),
            );
        }

        Some(ResourcePricing {
            resource_type: resource.resource_type,
            provider: resource.provider,
            components: rates.iter().map(|r| r.to_component()).collect(),
            metadata,
            source: RateSource::Store,
            fallback_rate: false,
        })
    }

    /// Tier 3: built-in static catalog
    fn try_catalog(
        &self,
        resource: &ResourceDescriptor,
        variant: Option<&VariantSelector>,
    ) -> Option<ResourcePricing> {
        self.catalog.lookup(
            resource.provider,
            resource.resource_type,
            &resource.region,
            variant.map(|v| v.variant.as_str()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_pricing::repository::MockRateRepository;
    use domain_pricing::{
        CloudProvider, CreatePricingRate, Currency, PricingError, PricingModel,
    };
    use std::collections::HashMap as StdHashMap;

    fn resource(resource_type: ResourceType) -> ResourceDescriptor {
        ResourceDescriptor {
            id: "r-1".to_string(),
            name: "resolver-test".to_string(),
            resource_type,
            provider: CloudProvider::Aws,
            region: "us-east-1".to_string(),
            metadata: StdHashMap::new(),
            parent_id: None,
        }
    }

    fn stored_rate(rate: f64) -> domain_pricing::PricingRate {
        let input = CreatePricingRate {
            provider: CloudProvider::Aws,
            resource_type: ResourceType::NatGateway,
            component_name: "gateway_hours".to_string(),
            pricing_model: PricingModel::PerHour,
            unit: "hour".to_string(),
            rate,
            currency: Currency::Usd,
            region: None,
            variant: None,
            variant_subtype: None,
            description: String::new(),
            effective_from: chrono::Utc::now(),
            effective_until: None,
        };
        domain_pricing::PricingRate {
            id: uuid::Uuid::now_v7(),
            provider: input.provider,
            resource_type: input.resource_type,
            component_name: input.component_name,
            pricing_model: input.pricing_model,
            unit: input.unit,
            rate: input.rate,
            currency: input.currency,
            region: input.region,
            variant: input.variant,
            variant_subtype: input.variant_subtype,
            description: input.description,
            effective_from: input.effective_from,
            effective_until: input.effective_until,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_override_wins_over_store_and_catalog() {
        let mut store = MockRateRepository::new();
        store.expect_find_active_rates().never();

        let mut resolver = RateResolver::new(
            Arc::new(store),
            Arc::new(PricingCatalog::builtin()),
        );
        resolver.register_override(
            ResourceType::NatGateway,
            Arc::new(|resource: &ResourceDescriptor| {
                Some(ResourcePricing {
                    resource_type: resource.resource_type,
                    provider: resource.provider,
                    components: vec![],
                    metadata: StdHashMap::new(),
                    source: RateSource::Catalog, // overwritten by the chain
                    fallback_rate: false,
                })
            }),
        );

        let pricing = resolver
            .resolve(&resource(ResourceType::NatGateway), None)
            .await
            .unwrap();
        assert_eq!(pricing.source, RateSource::Calculator);
    }

    #[tokio::test]
    async fn test_store_wins_over_catalog() {
        let mut store = MockRateRepository::new();
        store
            .expect_find_active_rates()
            .returning(|_, _, _| Ok(vec![stored_rate(0.09)]));

        let resolver = RateResolver::new(
            Arc::new(store),
            Arc::new(PricingCatalog::builtin()),
        );

        let pricing = resolver
            .resolve(&resource(ResourceType::NatGateway), None)
            .await
            .unwrap();
        assert_eq!(pricing.source, RateSource::Store);
        assert_eq!(pricing.rate_of("gateway_hours"), 0.09);
    }

    #[tokio::test]
    async fn test_store_error_degrades_to_catalog() {
        let mut store = MockRateRepository::new();
        store
            .expect_find_active_rates()
            .returning(|_, _, _| Err(PricingError::Internal("store down".to_string())));

        let resolver = RateResolver::new(
            Arc::new(store),
            Arc::new(PricingCatalog::builtin()),
        );

        let pricing = resolver
            .resolve(&resource(ResourceType::NatGateway), None)
            .await
            .unwrap();
        assert_eq!(pricing.source, RateSource::Catalog);
        assert_eq!(pricing.rate_of("gateway_hours"), 0.045);
    }

    #[tokio::test]
    async fn test_empty_store_degrades_to_catalog() {
        let mut store = MockRateRepository::new();
        store
            .expect_find_active_rates()
            .returning(|_, _, _| Ok(vec![]));

        let resolver = RateResolver::new(
            Arc::new(store),
            Arc::new(PricingCatalog::builtin()),
        );

        let pricing = resolver
            .resolve(&resource(ResourceType::NatGateway), None)
            .await
            .unwrap();
        assert_eq!(pricing.source, RateSource::Catalog);
    }

    #[tokio::test]
    async fn test_all_tiers_miss_is_unsupported() {
        let mut store = MockRateRepository::new();
        store
            .expect_find_active_rates()
            .returning(|_, _, _| Ok(vec![]));

        let resolver = RateResolver::new(
            Arc::new(store),
            Arc::new(PricingCatalog::builtin()),
        );

        let mut unsupported = resource(ResourceType::NatGateway);
        unsupported.provider = CloudProvider::Cloudflare;

        let result = resolver.resolve(&unsupported, None).await;
        assert!(matches!(
            result,
            Err(EstimationError::UnsupportedResourceType(_))
        ));
    }

    #[tokio::test]
    async fn test_variant_sensitive_type_uses_find_by_variant() {
        let mut store = MockRateRepository::new();
        store
            .expect_find_by_variant()
            .returning(|_, _, _, _, _| Ok(vec![]));
        store.expect_find_active_rates().never();

        let resolver = RateResolver::new(
            Arc::new(store),
            Arc::new(PricingCatalog::builtin()),
        );

        let selector = VariantSelector::new("t3.medium");
        let pricing = resolver
            .resolve(&resource(ResourceType::ComputeInstance), Some(&selector))
            .await
            .unwrap();

        // store missed, catalog answers with the variant rate
        assert_eq!(pricing.source, RateSource::Catalog);
        assert_eq!(pricing.rate_of("compute_hours"), 0.0416);
    }
}
