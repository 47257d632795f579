use async_trait::async_trait;
use uuid::Uuid;

use domain_pricing::{CloudProvider, ResourceType};

use crate::error::EstimationResult;
use crate::models::{CreateHiddenDependencyRule, HiddenDependency, HiddenDependencyRule};

/// Repository trait for the persisted hidden-dependency rule store.
///
/// The resolver consults it first; lookup failures and empty results fall
/// back to the built-in rule table.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HiddenDependencyRuleRepository: Send + Sync {
    /// Rules declared for a parent resource type
    async fn find_by_parent_type(
        &self,
        provider: CloudProvider,
        parent_resource_type: ResourceType,
    ) -> EstimationResult<Vec<HiddenDependency>>;

    /// Persist a new rule
    async fn create(
        &self,
        input: CreateHiddenDependencyRule,
    ) -> EstimationResult<HiddenDependencyRule>;

    /// List persisted rules, optionally narrowed to a provider
    async fn list(
        &self,
        provider: Option<CloudProvider>,
    ) -> EstimationResult<Vec<HiddenDependencyRule>>;

    /// Delete a persisted rule
    async fn delete(&self, id: Uuid) -> EstimationResult<bool>;
}
