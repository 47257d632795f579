use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::catalog::PricingCatalog;
use crate::error::{PricingError, PricingResult};
use crate::models::{
    CloudProvider, CreatePricingRate, PricingRate, RateFilter, ResourcePricing, ResourceType,
    UpdatePricingRate,
};
use crate::repository::RateRepository;

/// Service for managing the persisted rate store and catalog lookups
#[derive(Clone)]
pub struct RateCardService<R: RateRepository> {
    repository: Arc<R>,
    catalog: Arc<PricingCatalog>,
}

impl<R: RateRepository> RateCardService<R> {
    /// Create a new rate card service with the built-in catalog
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
            catalog: Arc::new(PricingCatalog::builtin()),
        }
    }

    /// The repository handle, shared with the estimation engine
    pub fn repository(&self) -> Arc<R> {
        self.repository.clone()
    }

    /// The built-in catalog handle
    pub fn catalog(&self) -> Arc<PricingCatalog> {
        self.catalog.clone()
    }

    /// Create a new rate row with validation
    pub async fn create(&self, input: CreatePricingRate) -> PricingResult<PricingRate> {
        input
            .validate()
            .map_err(|e| PricingError::InvalidInput(e.to_string()))?;

        let rate = self.repository.create(input).await?;
        tracing::info!(rate_id = %rate.id, provider = %rate.provider, "Created pricing rate");
        Ok(rate)
    }

    /// Get a rate row by ID
    pub async fn get_by_id(&self, id: Uuid) -> PricingResult<PricingRate> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or_else(|| PricingError::NotFound(id.to_string()))
    }

    /// List rate rows with filters
    pub async fn list(&self, filter: RateFilter) -> PricingResult<Vec<PricingRate>> {
        self.repository.list(filter).await
    }

    /// Update a rate row
    pub async fn update(&self, id: Uuid, input: UpdatePricingRate) -> PricingResult<PricingRate> {
        input
            .validate()
            .map_err(|e| PricingError::InvalidInput(e.to_string()))?;

        let rate = self.repository.update(id, input).await?;
        tracing::info!(rate_id = %id, "Updated pricing rate");
        Ok(rate)
    }

    /// Delete a rate row
    pub async fn delete(&self, id: Uuid) -> PricingResult<bool> {
        let deleted = self.repository.delete(id).await?;
        if deleted {
            tracing::info!(rate_id = %id, "Deleted pricing rate");
        }
        Ok(deleted)
    }

    /// Count all rate rows
    pub async fn count(&self) -> PricingResult<usize> {
        self.repository.count().await
    }

    /// Look up the built-in catalog rate card for a resource type
    pub fn catalog_lookup(
        &self,
        provider: CloudProvider,
        resource_type: ResourceType,
        region: &str,
        variant: Option<&str>,
    ) -> PricingResult<ResourcePricing> {
        self.catalog
            .lookup(provider, resource_type, region, variant)
            .ok_or_else(|| PricingError::UnsupportedLookup {
                provider: provider.to_string(),
                resource_type: resource_type.to_string(),
            })
    }
}
