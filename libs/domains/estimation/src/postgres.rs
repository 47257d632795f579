use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};
use uuid::Uuid;

use domain_pricing::{CloudProvider, ResourceType};

use crate::entity::{ActiveModel, Column, Entity};
use crate::error::EstimationResult;
use crate::models::{CreateHiddenDependencyRule, HiddenDependency, HiddenDependencyRule};
use crate::repository::HiddenDependencyRuleRepository;

/// PostgreSQL implementation of HiddenDependencyRuleRepository
#[derive(Clone)]
pub struct PgHiddenDependencyRuleRepository {
    db: DatabaseConnection,
}

impl PgHiddenDependencyRuleRepository {
    /// Create a new PostgreSQL rule repository
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl HiddenDependencyRuleRepository for PgHiddenDependencyRuleRepository {
    async fn find_by_parent_type(
        &self,
        provider: CloudProvider,
        parent_resource_type: ResourceType,
    ) -> EstimationResult<Vec<HiddenDependency>> {
        let rules = Entity::find()
            .filter(Column::Provider.eq(provider))
            .filter(Column::ParentResourceType.eq(parent_resource_type))
            .order_by_asc(Column::ChildResourceType)
            .all(&self.db)
            .await?
            .into_iter()
            .map(|model| HiddenDependencyRule::from(model).to_rule())
            .collect();

        Ok(rules)
    }

    async fn create(
        &self,
        input: CreateHiddenDependencyRule,
    ) -> EstimationResult<HiddenDependencyRule> {
        let model: ActiveModel = input.into();
        let result = model.insert(&self.db).await?.into();
        Ok(result)
    }

    async fn list(
        &self,
        provider: Option<CloudProvider>,
    ) -> EstimationResult<Vec<HiddenDependencyRule>> {
        let mut query = Entity::find();

        if let Some(provider) = provider {
            query = query.filter(Column::Provider.eq(provider));
        }

        let rules = query
            .order_by_asc(Column::ParentResourceType)
            .all(&self.db)
            .await?
            .into_iter()
            .map(Into::into)
            .collect();

        Ok(rules)
    }

    async fn delete(&self, id: Uuid) -> EstimationResult<bool> {
        let result = Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }
}
