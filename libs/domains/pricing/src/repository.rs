use async_trait::async_trait;
use uuid::Uuid;

use crate::error::PricingResult;
use crate::models::{
    CloudProvider, CreatePricingRate, PricingRate, RateFilter, ResourceType, UpdatePricingRate,
};

/// Repository trait for the persisted rate store.
///
/// Defines the data access interface the rate resolver and the rates API
/// depend on. Implementations can use different storage backends
/// (PostgreSQL, in-memory).
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait RateRepository: Send + Sync {
    /// Create a new rate row
    async fn create(&self, input: CreatePricingRate) -> PricingResult<PricingRate>;

    /// Get a rate row by ID
    async fn get_by_id(&self, id: Uuid) -> PricingResult<Option<PricingRate>>;

    /// List rate rows with optional filters
    async fn list(&self, filter: RateFilter) -> PricingResult<Vec<PricingRate>>;

    /// Update an existing rate row
    async fn update(&self, id: Uuid, input: UpdatePricingRate) -> PricingResult<PricingRate>;

    /// Delete a rate row by ID
    async fn delete(&self, id: Uuid) -> PricingResult<bool>;

    /// Rates currently effective for a provider/resource type, optionally
    /// narrowed to a region. Rows without a region apply to all regions.
    async fn find_active_rates(
        &self,
        provider: CloudProvider,
        resource_type: ResourceType,
        region: Option<&str>,
    ) -> PricingResult<Vec<PricingRate>>;

    /// Rates currently effective for a specific variant of a
    /// variant-sensitive resource type.
    async fn find_by_variant(
        &self,
        provider: CloudProvider,
        resource_type: ResourceType,
        variant: &str,
        region: Option<&str>,
        variant_subtype: Option<&str>,
    ) -> PricingResult<Vec<PricingRate>>;

    /// Count all rate rows
    async fn count(&self) -> PricingResult<usize>;
}
