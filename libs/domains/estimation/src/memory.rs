//! In-memory HiddenDependencyRuleRepository implementation.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use domain_pricing::{CloudProvider, ResourceType};

use crate::error::EstimationResult;
use crate::models::{CreateHiddenDependencyRule, HiddenDependency, HiddenDependencyRule};
use crate::repository::HiddenDependencyRuleRepository;

/// In-memory rule store, used by tests and embedded setups
#[derive(Default)]
pub struct InMemoryHiddenDependencyRuleRepository {
    rules: RwLock<Vec<HiddenDependencyRule>>,
}

impl InMemoryHiddenDependencyRuleRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HiddenDependencyRuleRepository for InMemoryHiddenDependencyRuleRepository {
    async fn find_by_parent_type(
        &self,
        provider: CloudProvider,
        parent_resource_type: ResourceType,
    ) -> EstimationResult<Vec<HiddenDependency>> {
        Ok(self
            .rules
            .read()
            .await
            .iter()
            .filter(|r| r.provider == provider && r.parent_resource_type == parent_resource_type)
            .map(|r| r.to_rule())
            .collect())
    }

    async fn create(
        &self,
        input: CreateHiddenDependencyRule,
    ) -> EstimationResult<HiddenDependencyRule> {
        let now = Utc::now();
        let rule = HiddenDependencyRule {
            id: Uuid::now_v7(),
            provider: input.provider,
            parent_resource_type: input.parent_resource_type,
            child_resource_type: input.child_resource_type,
            quantity: input.quantity,
            condition: input.condition,
            is_attached: input.is_attached,
            description: input.description,
            created_at: now,
            updated_at: now,
        };

        self.rules.write().await.push(rule.clone());
        Ok(rule)
    }

    async fn list(
        &self,
        provider: Option<CloudProvider>,
    ) -> EstimationResult<Vec<HiddenDependencyRule>> {
        Ok(self
            .rules
            .read()
            .await
            .iter()
            .filter(|r| provider.map(|p| r.provider == p).unwrap_or(true))
            .cloned()
            .collect())
    }

    async fn delete(&self, id: Uuid) -> EstimationResult<bool> {
        let mut rules = self.rules.write().await;
        let before = rules.len();
        rules.retain(|r| r.id != id);
        Ok(rules.len() < before)
    }
}
