//! In-memory RateRepository implementation.
//!
//! Backs handler and integration tests, and embedded setups that want the
//! full resolver chain without a database.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{PricingError, PricingResult};
use crate::models::{
    CloudProvider, CreatePricingRate, PricingRate, RateFilter, ResourceType, UpdatePricingRate,
};
use crate::repository::RateRepository;

/// In-memory rate store
#[derive(Default)]
pub struct InMemoryRateRepository {
    rates: RwLock<Vec<PricingRate>>,
}

impl InMemoryRateRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with pre-built rate rows
    pub async fn seed(&self, rates: Vec<PricingRate>) {
        self.rates.write().await.extend(rates);
    }
}

fn matches_region(rate: &PricingRate, region: Option<&str>) -> bool {
    match region {
        Some(region) => rate
            .region
            .as_deref()
            .map(|r| r == region)
            .unwrap_or(true),
        None => true,
    }
}

#[async_trait]
impl RateRepository for InMemoryRateRepository {
    async fn create(&self, input: CreatePricingRate) -> PricingResult<PricingRate> {
        let now = Utc::now();
        let rate = PricingRate {
            id: Uuid::now_v7(),
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
            created_at: now,
            updated_at: now,
        };

        self.rates.write().await.push(rate.clone());
        Ok(rate)
    }

    async fn get_by_id(&self, id: Uuid) -> PricingResult<Option<PricingRate>> {
        Ok(self
            .rates
            .read()
            .await
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }

    async fn list(&self, filter: RateFilter) -> PricingResult<Vec<PricingRate>> {
        let now = Utc::now();
        let rates = self.rates.read().await;

        let results = rates
            .iter()
            .filter(|r| filter.provider.map(|p| r.provider == p).unwrap_or(true))
            .filter(|r| {
                filter
                    .resource_type
                    .map(|t| r.resource_type == t)
                    .unwrap_or(true)
            })
            .filter(|r| {
                filter
                    .region
                    .as_deref()
                    .map(|region| r.region.as_deref() == Some(region))
                    .unwrap_or(true)
            })
            .filter(|r| {
                filter
                    .variant
                    .as_deref()
                    .map(|variant| r.variant.as_deref() == Some(variant))
                    .unwrap_or(true)
            })
            .filter(|r| {
                filter
                    .component_name
                    .as_deref()
                    .map(|name| r.component_name == name)
                    .unwrap_or(true)
            })
            .filter(|r| !filter.active_only || r.is_active_at(now))
            .skip(filter.offset)
            .take(filter.limit)
            .cloned()
            .collect();

        Ok(results)
    }

    async fn update(&self, id: Uuid, input: UpdatePricingRate) -> PricingResult<PricingRate> {
        let mut rates = self.rates.write().await;
        let rate = rates
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| PricingError::NotFound(id.to_string()))?;

        if let Some(new_rate) = input.rate {
            rate.rate = new_rate;
        }
        if let Some(description) = input.description {
            rate.description = description;
        }
        if let Some(effective_until) = input.effective_until {
            rate.effective_until = effective_until;
        }
        rate.updated_at = Utc::now();

        Ok(rate.clone())
    }

    async fn delete(&self, id: Uuid) -> PricingResult<bool> {
        let mut rates = self.rates.write().await;
        let before = rates.len();
        rates.retain(|r| r.id != id);
        Ok(rates.len() < before)
    }

    async fn find_active_rates(
        &self,
        provider: CloudProvider,
        resource_type: ResourceType,
        region: Option<&str>,
    ) -> PricingResult<Vec<PricingRate>> {
        let now = Utc::now();
        let rates = self.rates.read().await;

        Ok(rates
            .iter()
            .filter(|r| r.provider == provider && r.resource_type == resource_type)
            .filter(|r| r.is_active_at(now))
            .filter(|r| matches_region(r, region))
            .cloned()
            .collect())
    }

    async fn find_by_variant(
        &self,
        provider: CloudProvider,
        resource_type: ResourceType,
        variant: &str,
        region: Option<&str>,
        variant_subtype: Option<&str>,
    ) -> PricingResult<Vec<PricingRate>> {
        let now = Utc::now();
        let rates = self.rates.read().await;

        Ok(rates
            .iter()
            .filter(|r| r.provider == provider && r.resource_type == resource_type)
            .filter(|r| r.variant.as_deref() == Some(variant))
            .filter(|r| {
                variant_subtype
                    .map(|s| r.variant_subtype.as_deref() == Some(s))
                    .unwrap_or(true)
            })
            .filter(|r| r.is_active_at(now))
            .filter(|r| matches_region(r, region))
            .cloned()
            .collect())
    }

    async fn count(&self) -> PricingResult<usize> {
        Ok(self.rates.read().await.len())
    }
}
