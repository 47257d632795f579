use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::entity::{ActiveModel, Column, Entity};
use crate::error::{PricingError, PricingResult};
use crate::models::{
    CloudProvider, CreatePricingRate, PricingRate, RateFilter, ResourceType, UpdatePricingRate,
};
use crate::repository::RateRepository;

/// PostgreSQL implementation of RateRepository
#[derive(Clone)]
pub struct PgRateRepository {
    db: DatabaseConnection,
}

impl PgRateRepository {
    /// Create a new PostgreSQL rate repository
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Condition selecting rates effective right now
    fn active_condition() -> Condition {
        let now: chrono::DateTime<chrono::FixedOffset> = chrono::Utc::now().into();
        Condition::all()
            .add(Column::EffectiveFrom.lte(now))
            .add(
                Condition::any()
                    .add(Column::EffectiveUntil.is_null())
                    .add(Column::EffectiveUntil.gt(now)),
            )
    }

    /// Condition matching a region, treating region-less rows as global
    fn region_condition(region: Option<&str>) -> Option<Condition> {
        region.map(|r| {
            Condition::any()
                .add(Column::Region.eq(r))
                .add(Column::Region.is_null())
        })
    }
}

#[async_trait]
impl RateRepository for PgRateRepository {
    async fn create(&self, input: CreatePricingRate) -> PricingResult<PricingRate> {
        let model: ActiveModel = input.into();
        let result = model.insert(&self.db).await?.into();
        Ok(result)
    }

    async fn get_by_id(&self, id: Uuid) -> PricingResult<Option<PricingRate>> {
        let result = Entity::find_by_id(id).one(&self.db).await?.map(Into::into);
        Ok(result)
    }

    async fn list(&self, filter: RateFilter) -> PricingResult<Vec<PricingRate>> {
        let mut query = Entity::find();

        if let Some(provider) = filter.provider {
            query = query.filter(Column::Provider.eq(provider));
        }

        if let Some(resource_type) = filter.resource_type {
            query = query.filter(Column::ResourceType.eq(resource_type));
        }

        if let Some(region) = filter.region {
            query = query.filter(Column::Region.eq(region));
        }

        if let Some(variant) = filter.variant {
            query = query.filter(Column::Variant.eq(variant));
        }

        if let Some(component_name) = filter.component_name {
            query = query.filter(Column::ComponentName.eq(component_name));
        }

        if filter.active_only {
            query = query.filter(Self::active_condition());
        }

        let results = query
            .order_by_desc(Column::UpdatedAt)
            .offset(filter.offset as u64)
            .limit(filter.limit as u64)
            .all(&self.db)
            .await?
            .into_iter()
            .map(Into::into)
            .collect();

        Ok(results)
    }

    async fn update(&self, id: Uuid, input: UpdatePricingRate) -> PricingResult<PricingRate> {
        let existing = Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| PricingError::NotFound(id.to_string()))?;

        let mut model: ActiveModel = existing.into();

        if let Some(rate) = input.rate {
            model.rate = Set(rate);
        }

        if let Some(description) = input.description {
            model.description = Set(description);
        }

        if let Some(effective_until) = input.effective_until {
            model.effective_until = Set(effective_until.map(Into::into));
        }

        model.updated_at = Set(chrono::Utc::now().into());

        let result = model.update(&self.db).await?.into();
        Ok(result)
    }

    async fn delete(&self, id: Uuid) -> PricingResult<bool> {
        let result = Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }

    async fn find_active_rates(
        &self,
        provider: CloudProvider,
        resource_type: ResourceType,
        region: Option<&str>,
    ) -> PricingResult<Vec<PricingRate>> {
        let mut query = Entity::find()
            .filter(Column::Provider.eq(provider))
            .filter(Column::ResourceType.eq(resource_type))
            .filter(Self::active_condition());

        if let Some(condition) = Self::region_condition(region) {
            query = query.filter(condition);
        }

        let results = query
            .order_by_desc(Column::EffectiveFrom)
            .all(&self.db)
            .await?
            .into_iter()
            .map(Into::into)
            .collect();

        Ok(results)
    }

    async fn find_by_variant(
        &self,
        provider: CloudProvider,
        resource_type: ResourceType,
        variant: &str,
        region: Option<&str>,
        variant_subtype: Option<&str>,
    ) -> PricingResult<Vec<PricingRate>> {
        let mut query = Entity::find()
            .filter(Column::Provider.eq(provider))
            .filter(Column::ResourceType.eq(resource_type))
            .filter(Column::Variant.eq(variant))
            .filter(Self::active_condition());

        if let Some(condition) = Self::region_condition(region) {
            query = query.filter(condition);
        }

        if let Some(subtype) = variant_subtype {
            query = query.filter(Column::VariantSubtype.eq(subtype));
        }

        let results = query
            .order_by_desc(Column::EffectiveFrom)
            .all(&self.db)
            .await?
            .into_iter()
            .map(Into::into)
            .collect();

        Ok(results)
    }

    async fn count(&self) -> PricingResult<usize> {
        let count = Entity::find().count(&self.db).await?;
        Ok(count as usize)
    }
}
