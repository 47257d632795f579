use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use futures::future::BoxFuture;
use uuid::Uuid;

use domain_pricing::{
    CloudProvider, PricingCatalog, RateRepository, ResourcePricing, ResourceType,
};
use observability::{EstimationMetrics, EstimationTimer};

use crate::calculators::{CostStrategy, StrategyRegistry};
use crate::error::{EstimationError, EstimationResult};
use crate::hidden::{ExpansionEdge, HiddenDependencyResolver};
use crate::models::{
    CostEstimate, CreateHiddenDependencyRule, EstimateDuration, HiddenDependencyCost,
    HiddenDependencyRule, ResourceDescriptor,
};
use crate::repository::HiddenDependencyRuleRepository;
use crate::resolver::{PricingOverrideFn, RateResolver};

/// Rate lookups are cached per (provider, type, region, variant) within
/// one estimation call so architectures with many resources of the same
/// shape hit the store once.
type RateKey = (
    CloudProvider,
    ResourceType,
    String,
    Option<String>,
    Option<String>,
);
type RateCache = HashMap<RateKey, ResourcePricing>;

/// The estimation engine: orchestrates rate resolution, per-type cost
/// strategies, hidden-dependency expansion, and aggregation.
pub struct EstimationService<R: RateRepository, S: HiddenDependencyRuleRepository> {
    strategies: StrategyRegistry,
    resolver: RateResolver<R>,
    hidden: HiddenDependencyResolver<S>,
    rules: Arc<S>,
    max_expansion_depth: usize,
}

impl<R: RateRepository, S: HiddenDependencyRuleRepository> EstimationService<R, S> {
    /// Create the engine with the built-in catalog, strategies, and rules
    pub fn new(rate_repository: Arc<R>, rule_repository: Arc<S>) -> Self {
        Self::with_catalog(
            rate_repository,
            rule_repository,
            Arc::new(PricingCatalog::builtin()),
        )
    }

    /// Create the engine with a shared catalog instance
    pub fn with_catalog(
        rate_repository: Arc<R>,
        rule_repository: Arc<S>,
        catalog: Arc<PricingCatalog>,
    ) -> Self {
        Self {
            strategies: StrategyRegistry::with_builtins(),
            resolver: RateResolver::new(rate_repository, catalog),
            hidden: HiddenDependencyResolver::new(rule_repository.clone()),
            rules: rule_repository,
            max_expansion_depth: 1,
        }
    }

    /// Register (or replace) the cost strategy for a resource type
    pub fn register_strategy(
        &mut self,
        resource_type: ResourceType,
        strategy: Arc<dyn CostStrategy>,
    ) {
        self.strategies.register(resource_type, strategy);
    }

    /// Register a pricing override, the first tier of the rate chain
    pub fn register_pricing_override(
        &mut self,
        resource_type: ResourceType,
        f: PricingOverrideFn,
    ) {
        self.resolver.register_override(resource_type, f);
    }

    /// Change how deep hidden-dependency expansion recurses (default 1:
    /// a synthesized child's own hidden dependencies are not expanded)
    pub fn with_expansion_depth(mut self, depth: usize) -> Self {
        self.max_expansion_depth = depth;
        self
    }

    /// Estimate one resource: base cost plus its hidden dependencies.
    pub async fn estimate_resource(
        &self,
        resource: &ResourceDescriptor,
        duration: EstimateDuration,
    ) -> EstimationResult<CostEstimate> {
        let mut timer = EstimationTimer::new("resource", &resource.provider.to_string());
        let mut cache = RateCache::new();

        let result = self
            .estimate_recursive(resource.clone(), duration, &mut cache, 0, HashSet::new())
            .await;

        let duration_ms = timer.stop();
        match &result {
            Ok(_) => EstimationMetrics::record_resource_estimate(
                &resource.provider.to_string(),
                &resource.resource_type.to_string(),
                duration_ms,
            ),
            Err(e) => EstimationMetrics::record_estimate_failed(
                &resource.provider.to_string(),
                e.kind(),
            ),
        }

        result
    }

    /// Estimate a whole architecture.
    ///
    /// A resource that fails to price is skipped with a warning; the
    /// returned estimate reflects only the resources that succeeded.
    /// Breakdowns are concatenated in input order; no resource type or
    /// region is set since the estimate spans multiple resources.
    pub async fn estimate_architecture(
        &self,
        resources: &[ResourceDescriptor],
        duration: EstimateDuration,
    ) -> EstimationResult<CostEstimate> {
        let mut timer = EstimationTimer::new("architecture", "all");
        let mut cache = RateCache::new();

        let mut combined = CostEstimate {
            total_cost: 0.0,
            currency: domain_pricing::Currency::Usd,
            breakdown: Vec::new(),
            hidden_dependency_costs: Vec::new(),
            period: duration.period(),
            duration_hours: duration.hours(),
            calculated_at: chrono::Utc::now(),
            resource_type: None,
            region: None,
            provider: None,
        };
        let mut skipped = 0usize;

        for resource in resources {
            match self
                .estimate_recursive(resource.clone(), duration, &mut cache, 0, HashSet::new())
                .await
            {
                Ok(estimate) => {
                    combined.breakdown.extend(estimate.breakdown);
                    combined
                        .hidden_dependency_costs
                        .extend(estimate.hidden_dependency_costs);
                }
                Err(e) => {
                    skipped += 1;
                    tracing::warn!(
                        resource_id = %resource.id,
                        resource_type = %resource.resource_type,
                        "Skipping resource in architecture estimate: {}",
                        e
                    );
                }
            }
        }

        combined.recompute_total();

        let duration_ms = timer.stop();
        EstimationMetrics::record_architecture_estimate(resources.len(), skipped, duration_ms);

        Ok(combined)
    }

    /// Price one resource and, within the expansion depth, its hidden
    /// dependencies. `visited` tracks expansion edges along the current
    /// path so future rule cycles cannot recurse forever.
    fn estimate_recursive<'a>(
        &'a self,
        resource: ResourceDescriptor,
        duration: EstimateDuration,
        cache: &'a mut RateCache,
        depth: usize,
        visited: HashSet<ExpansionEdge>,
    ) -> BoxFuture<'a, EstimationResult<CostEstimate>> {
        Box::pin(async move {
            let mut estimate = self.base_estimate(&resource, duration, cache).await?;

            if depth < self.max_expansion_depth {
                let children = self.hidden.resolve(&resource, &visited).await;

                for child in children {
                    let mut child_visited = visited.clone();
                    child_visited.insert((
                        child.rule.parent_resource_type,
                        child.rule.child_resource_type,
                    ));

                    match self
                        .estimate_recursive(
                            child.resource.clone(),
                            duration,
                            cache,
                            depth + 1,
                            child_visited,
                        )
                        .await
                    {
                        Ok(child_estimate) => {
                            estimate.hidden_dependency_costs.push(HiddenDependencyCost {
                                resource_type: child.resource.resource_type,
                                name: child.resource.name.clone(),
                                total_cost: child_estimate.total_cost,
                                breakdown: child_estimate.breakdown,
                                currency: child_estimate.currency,
                                is_attached: child.rule.is_attached,
                                description: child.rule.description.clone(),
                            });
                        }
                        Err(e) => {
                            tracing::warn!(
                                child_id = %child.resource.id,
                                "Skipping unpriceable hidden dependency: {}",
                                e
                            );
                        }
                    }
                }

                estimate.recompute_total();
            }

            Ok(estimate)
        })
    }

    /// Validate the provider, resolve the rate card (through the per-call
    /// cache), and run the type's strategy.
    async fn base_estimate(
        &self,
        resource: &ResourceDescriptor,
        duration: EstimateDuration,
        cache: &mut RateCache,
    ) -> EstimationResult<CostEstimate> {
        if !resource.provider.is_supported() {
            return Err(EstimationError::UnsupportedProvider(resource.provider));
        }

        let strategy = self
            .strategies
            .get(resource.resource_type)
            .ok_or(EstimationError::UnsupportedResourceType(
                resource.resource_type,
            ))?;

        let variant = strategy.variant(resource);
        let key: RateKey = (
            resource.provider,
            resource.resource_type,
            resource.region.clone(),
            variant.as_ref().map(|v| v.variant.clone()),
            variant.as_ref().and_then(|v| v.subtype.clone()),
        );

        let pricing = match cache.get(&key) {
            Some(pricing) => pricing.clone(),
            None => {
                let pricing = self.resolver.resolve(resource, variant.as_ref()).await?;
                cache.insert(key, pricing.clone());
                pricing
            }
        };

        let components = strategy.components(resource, &pricing, duration)?;
        Ok(CostEstimate::for_resource(resource, duration, components))
    }

    // =========================================================================
    // Hidden-dependency rule administration
    // =========================================================================

    /// Persist a hidden-dependency rule
    pub async fn create_rule(
        &self,
        input: CreateHiddenDependencyRule,
    ) -> EstimationResult<HiddenDependencyRule> {
        let rule = self.rules.create(input).await?;
        tracing::info!(rule_id = %rule.id, parent = %rule.parent_resource_type, "Created hidden dependency rule");
        Ok(rule)
    }

    /// List persisted hidden-dependency rules
    pub async fn list_rules(
        &self,
        provider: Option<CloudProvider>,
    ) -> EstimationResult<Vec<HiddenDependencyRule>> {
        self.rules.list(provider).await
    }

    /// Delete a persisted hidden-dependency rule
    pub async fn delete_rule(&self, id: Uuid) -> EstimationResult<bool> {
        let deleted = self.rules.delete(id).await?;
        if deleted {
            tracing::info!(rule_id = %id, "Deleted hidden dependency rule");
        }
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{metadata_keys, COST_EPSILON};
    use crate::repository::MockHiddenDependencyRuleRepository;
    use domain_pricing::repository::MockRateRepository;
    use serde_json::json;
    use std::collections::HashMap as StdHashMap;

    fn service() -> EstimationService<MockRateRepository, MockHiddenDependencyRuleRepository> {
        // Empty store and rule store: everything resolves from the
        // built-in catalog and rule table.
        let mut rates = MockRateRepository::new();
        rates.expect_find_active_rates().returning(|_, _, _| Ok(vec![]));
        rates.expect_find_by_variant().returning(|_, _, _, _, _| Ok(vec![]));

        let mut rules = MockHiddenDependencyRuleRepository::new();
        rules.expect_find_by_parent_type().returning(|_, _| Ok(vec![]));

        EstimationService::new(Arc::new(rates), Arc::new(rules))
    }

    fn resource(
        resource_type: ResourceType,
        metadata: StdHashMap<String, serde_json::Value>,
    ) -> ResourceDescriptor {
        ResourceDescriptor {
            id: format!("res-{}", resource_type),
            name: format!("test-{}", resource_type),
            resource_type,
            provider: CloudProvider::Aws,
            region: "us-east-1".to_string(),
            metadata,
            parent_id: None,
        }
    }

    #[tokio::test]
    async fn test_compute_instance_includes_hidden_root_volume() {
        let service = service();
        let vm = resource(
            ResourceType::ComputeInstance,
            StdHashMap::from([(metadata_keys::ROOT_VOLUME_GB.to_string(), json!(20))]),
        );

        let estimate = service
            .estimate_resource(&vm, EstimateDuration::from_hours(720.0))
            .await
            .unwrap();

        // base: t3.micro month = 7.488; hidden volume: 20 GB gp3 = 1.6;
        // hidden NIC attached = 0
        let base = estimate.breakdown_total();
        assert!((base - 7.488).abs() < COST_EPSILON);
        assert_eq!(estimate.hidden_dependency_costs.len(), 2);

        let volume = estimate
            .hidden_dependency_costs
            .iter()
            .find(|h| h.resource_type == ResourceType::BlockVolume)
            .unwrap();
        assert!((volume.total_cost - 1.6).abs() < COST_EPSILON);

        let nic = estimate
            .hidden_dependency_costs
            .iter()
            .find(|h| h.resource_type == ResourceType::NetworkInterface)
            .unwrap();
        assert_eq!(nic.total_cost, 0.0);
        assert!(nic.is_attached);

        // total exceeds the base compute cost and honors the invariant
        assert!(estimate.total_cost > base);
        assert!(
            (estimate.total_cost - (estimate.breakdown_total() + estimate.hidden_total())).abs()
                < COST_EPSILON
        );
    }

    #[tokio::test]
    async fn test_unsupported_provider_is_fatal_for_resource() {
        let service = service();
        let mut vm = resource(ResourceType::ComputeInstance, StdHashMap::new());
        vm.provider = CloudProvider::Cloudflare;

        let result = service
            .estimate_resource(&vm, EstimateDuration::from_hours(1.0))
            .await;
        assert!(matches!(
            result,
            Err(EstimationError::UnsupportedProvider(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_volume_size_is_fatal_for_resource() {
        let service = service();
        let volume = resource(ResourceType::BlockVolume, StdHashMap::new());

        let result = service
            .estimate_resource(&volume, EstimateDuration::from_hours(720.0))
            .await;
        assert!(matches!(
            result,
            Err(EstimationError::MissingRequiredMetadata { .. })
        ));
    }

    #[tokio::test]
    async fn test_architecture_skips_failing_resources() {
        let service = service();

        let gateway = resource(ResourceType::NatGateway, StdHashMap::new());
        let ip = resource(ResourceType::FloatingIp, StdHashMap::new());
        // volume without size fails to price
        let broken = resource(ResourceType::BlockVolume, StdHashMap::new());

        let duration = EstimateDuration::from_hours(720.0);
        let estimate = service
            .estimate_architecture(&[gateway.clone(), broken, ip.clone()], duration)
            .await
            .unwrap();

        // gateway 32.40 + its hidden floating ip 3.60 + standalone ip 3.60
        let gateway_alone = service
            .estimate_resource(&gateway, duration)
            .await
            .unwrap()
            .total_cost;
        let ip_alone = service
            .estimate_resource(&ip, duration)
            .await
            .unwrap()
            .total_cost;

        assert!((estimate.total_cost - (gateway_alone + ip_alone)).abs() < COST_EPSILON);
        assert!(estimate.resource_type.is_none());
        assert!(estimate.region.is_none());
        assert!(estimate.provider.is_none());
    }

    #[tokio::test]
    async fn test_architecture_with_no_priceable_resources_is_empty_not_error() {
        let service = service();
        let broken = resource(ResourceType::BlockVolume, StdHashMap::new());

        let estimate = service
            .estimate_architecture(&[broken], EstimateDuration::from_hours(1.0))
            .await
            .unwrap();

        assert_eq!(estimate.total_cost, 0.0);
        assert!(estimate.breakdown.is_empty());
    }

    #[tokio::test]
    async fn test_gateway_hidden_ip_included_in_total() {
        let service = service();
        let gateway = resource(ResourceType::NatGateway, StdHashMap::new());

        let estimate = service
            .estimate_resource(&gateway, EstimateDuration::from_hours(720.0))
            .await
            .unwrap();

        // 32.40 gateway + 3.60 floating ip
        assert!((estimate.total_cost - 36.0).abs() < COST_EPSILON);
        assert_eq!(estimate.hidden_dependency_costs.len(), 1);
    }

    #[tokio::test]
    async fn test_gateway_with_allocation_id_has_no_hidden_ip() {
        let service = service();
        let gateway = resource(
            ResourceType::NatGateway,
            StdHashMap::from([(metadata_keys::ALLOCATION_ID.to_string(), json!("eip-9"))]),
        );

        let estimate = service
            .estimate_resource(&gateway, EstimateDuration::from_hours(720.0))
            .await
            .unwrap();

        assert!((estimate.total_cost - 32.40).abs() < COST_EPSILON);
        assert!(estimate.hidden_dependency_costs.is_empty());
    }

    #[tokio::test]
    async fn test_expansion_depth_zero_disables_hidden_costs() {
        let service = service().with_expansion_depth(0);
        let vm = resource(ResourceType::ComputeInstance, StdHashMap::new());

        let estimate = service
            .estimate_resource(&vm, EstimateDuration::from_hours(720.0))
            .await
            .unwrap();

        assert!(estimate.hidden_dependency_costs.is_empty());
        assert!((estimate.total_cost - 7.488).abs() < COST_EPSILON);
    }

    #[tokio::test]
    async fn test_custom_pricing_override_wins() {
        let mut service = service();
        service.register_pricing_override(
            ResourceType::FloatingIp,
            Arc::new(|resource: &ResourceDescriptor| {
                use domain_pricing::{Currency, PriceComponent, PricingModel, RateSource};
                Some(ResourcePricing {
                    resource_type: resource.resource_type,
                    provider: resource.provider,
                    components: vec![PriceComponent {
                        name: "idle_hours".to_string(),
                        pricing_model: PricingModel::PerHour,
                        unit: "hour".to_string(),
                        rate: 0.01,
                        currency: Currency::Usd,
                        region: None,
                        description: String::new(),
                    }],
                    metadata: StdHashMap::new(),
                    source: RateSource::Calculator,
                    fallback_rate: false,
                })
            }),
        );

        let ip = resource(ResourceType::FloatingIp, StdHashMap::new());
        let estimate = service
            .estimate_resource(&ip, EstimateDuration::from_hours(100.0))
            .await
            .unwrap();

        assert!((estimate.total_cost - 1.0).abs() < COST_EPSILON);
    }
}
