use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use strum::{Display, EnumString};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use domain_pricing::{CloudProvider, Currency, PriceComponent, PricingModel, ResourceType};

/// Canonical month length used for proration (720 hours)
pub const HOURS_PER_MONTH: f64 = 720.0;

/// Rounding tolerance for monetary comparisons
pub const COST_EPSILON: f64 = 1e-6;

/// Metadata keys shared by the calculators and the hidden-dependency rules
pub mod metadata_keys {
    pub const INSTANCE_TYPE: &str = "instance_type";
    pub const SIZE_GB: &str = "size_gb";
    pub const VOLUME_TYPE: &str = "volume_type";
    pub const IOPS: &str = "iops";
    pub const STORAGE_GB: &str = "storage_gb";
    pub const STORAGE_CLASS: &str = "storage_class";
    pub const MONTHLY_REQUESTS: &str = "monthly_requests";
    pub const INSTANCE_CLASS: &str = "instance_class";
    pub const ENGINE: &str = "engine";
    pub const MULTI_AZ: &str = "multi_az";
    pub const ALLOCATED_STORAGE_GB: &str = "allocated_storage_gb";
    pub const BACKUP_RETENTION_DAYS: &str = "backup_retention_days";
    pub const DATA_PROCESSED_GB: &str = "data_processed_gb";
    pub const ALLOCATION_ID: &str = "allocation_id";
    pub const ATTACHED: &str = "attached";
    pub const MEMORY_MB: &str = "memory_mb";
    pub const AVG_DURATION_MS: &str = "avg_duration_ms";
    pub const MONTHLY_INVOCATIONS: &str = "monthly_invocations";
    pub const MONTHLY_EGRESS_GB: &str = "monthly_egress_gb";
    pub const MONTHLY_TRANSFER_GB: &str = "monthly_transfer_gb";
    pub const ROOT_VOLUME_GB: &str = "root_volume_gb";
}

/// A provisioned (or proposed) infrastructure resource, supplied by the
/// upstream architecture model. Consumed read-only; the engine never
/// mutates a descriptor it receives.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ResourceDescriptor {
    /// Stable identifier. Synthesized children derive theirs from the
    /// parent id.
    pub id: String,
    /// Display name
    pub name: String,
    /// Billable resource type
    pub resource_type: ResourceType,
    /// Cloud provider
    pub provider: CloudProvider,
    /// Region code
    pub region: String,
    /// Open string-keyed attribute map. Numeric values may arrive as
    /// integers, floats, or numeric strings; accessors coerce all three.
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
    /// Back-reference to the parent resource for synthesized hidden
    /// dependencies (a non-owning association)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

impl ResourceDescriptor {
    /// Numeric metadata accessor coercing integers, floats, and numeric
    /// strings
    pub fn metadata_f64(&self, key: &str) -> Option<f64> {
        match self.metadata.get(key)? {
            serde_json::Value::Number(n) => n.as_f64(),
            serde_json::Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Boolean metadata accessor coercing bools and "true"/"false" strings
    pub fn metadata_bool(&self, key: &str) -> Option<bool> {
        match self.metadata.get(key)? {
            serde_json::Value::Bool(b) => Some(*b),
            serde_json::Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    /// String metadata accessor
    pub fn metadata_str(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).and_then(|v| v.as_str())
    }

    /// Whether the key is present with a non-null value
    pub fn metadata_present(&self, key: &str) -> bool {
        self.metadata
            .get(key)
            .map(|v| !v.is_null())
            .unwrap_or(false)
    }
}

/// Variant discriminator extracted from a resource's metadata, used to
/// narrow rate lookups for variant-sensitive resource types
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub struct VariantSelector {
    /// Primary variant (instance size, volume type, storage class)
    pub variant: String,
    /// Secondary discriminator (e.g., database engine)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtype: Option<String>,
}

impl VariantSelector {
    pub fn new(variant: impl Into<String>) -> Self {
        Self {
            variant: variant.into(),
            subtype: None,
        }
    }

    pub fn with_subtype(variant: impl Into<String>, subtype: impl Into<String>) -> Self {
        Self {
            variant: variant.into(),
            subtype: Some(subtype.into()),
        }
    }
}

/// Billing period classification, derived from the requested duration.
/// Purely informational grouping; does not change the computed total.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum EstimatePeriod {
    Hourly,
    Monthly,
    Yearly,
}

/// Estimation window, stored with second precision
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EstimateDuration {
    seconds: i64,
}

impl EstimateDuration {
    pub fn from_seconds(seconds: i64) -> Self {
        Self {
            seconds: seconds.max(0),
        }
    }

    pub fn from_hours(hours: f64) -> Self {
        Self::from_seconds((hours * 3600.0).round() as i64)
    }

    pub fn seconds(&self) -> i64 {
        self.seconds
    }

    pub fn hours(&self) -> f64 {
        self.seconds as f64 / 3600.0
    }

    /// Duration expressed in canonical months (720 hours each), the
    /// proration factor for per-month rates and free tiers
    pub fn months(&self) -> f64 {
        self.hours() / HOURS_PER_MONTH
    }

    /// Period classification: <= 24h Hourly, <= 720h Monthly, else Yearly
    pub fn period(&self) -> EstimatePeriod {
        const DAY_SECONDS: i64 = 24 * 3600;
        const MONTH_SECONDS: i64 = 720 * 3600;

        if self.seconds <= DAY_SECONDS {
            EstimatePeriod::Hourly
        } else if self.seconds <= MONTH_SECONDS {
            EstimatePeriod::Monthly
        } else {
            EstimatePeriod::Yearly
        }
    }
}

/// One line of a computed estimate
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CostComponent {
    /// Component name, matching the rate card component it was priced from
    pub component_name: String,
    /// Pricing model applied
    pub pricing_model: PricingModel,
    /// Consumed quantity, already prorated and free-tier adjusted
    pub quantity: f64,
    /// Per-unit rate
    pub unit_rate: f64,
    /// Billing unit
    pub unit: String,
    /// quantity x unit_rate, with batch-unit normalization applied
    pub subtotal: f64,
    /// Currency
    pub currency: Currency,
}

impl CostComponent {
    /// Price a quantity against a rate-card component. Rates quoted per
    /// 1,000 / 1,000,000 requests divide the quantity before multiplying.
    pub fn priced(component: &PriceComponent, quantity: f64) -> Self {
        let quantity = quantity.max(0.0);
        let subtotal = quantity / component.batch_size() * component.rate;

        Self {
            component_name: component.name.clone(),
            pricing_model: component.pricing_model,
            quantity,
            unit_rate: component.rate,
            unit: component.unit.clone(),
            subtotal,
            currency: component.currency,
        }
    }

    /// A zero-subtotal line for a component that is free in the current
    /// configuration (e.g., an attached floating IP). Kept in the
    /// breakdown so "free" is distinguishable from "not priced".
    pub fn free(component: &PriceComponent, quantity: f64) -> Self {
        Self {
            component_name: component.name.clone(),
            pricing_model: component.pricing_model,
            quantity: quantity.max(0.0),
            unit_rate: 0.0,
            unit: component.unit.clone(),
            subtotal: 0.0,
            currency: component.currency,
        }
    }
}

/// A priced hidden dependency attached to its parent's estimate
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HiddenDependencyCost {
    /// Child resource type
    pub resource_type: ResourceType,
    /// Synthesized child name
    pub name: String,
    /// Child's total cost (its own breakdown sum)
    pub total_cost: f64,
    /// Child's component breakdown
    pub breakdown: Vec<CostComponent>,
    /// Currency
    pub currency: Currency,
    /// Whether the child is attached to its parent (affects free-when-
    /// attached pricing)
    pub is_attached: bool,
    /// Rule description
    pub description: String,
}

/// An itemized cost estimate for one resource or a whole architecture
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CostEstimate {
    /// Sum of the breakdown subtotals plus all hidden dependency totals
    pub total_cost: f64,
    /// Currency
    pub currency: Currency,
    /// Ordered component breakdown for the resource itself
    pub breakdown: Vec<CostComponent>,
    /// Costs of implicitly provisioned resources
    pub hidden_dependency_costs: Vec<HiddenDependencyCost>,
    /// Period classification derived from the duration
    pub period: EstimatePeriod,
    /// Requested duration in hours
    pub duration_hours: f64,
    /// When the estimate was computed
    pub calculated_at: DateTime<Utc>,
    /// Resource type (absent on architecture-level estimates)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<ResourceType>,
    /// Region (absent on architecture-level estimates)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Provider (absent on architecture-level estimates)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<CloudProvider>,
}

impl CostEstimate {
    /// Assemble a per-resource estimate from its breakdown. Hidden
    /// dependency costs start empty; the aggregator populates them and
    /// re-sums the total.
    pub fn for_resource(
        resource: &ResourceDescriptor,
        duration: EstimateDuration,
        breakdown: Vec<CostComponent>,
    ) -> Self {
        let total_cost = breakdown.iter().map(|c| c.subtotal).sum();

        Self {
            total_cost,
            currency: breakdown
                .first()
                .map(|c| c.currency)
                .unwrap_or(Currency::Usd),
            breakdown,
            hidden_dependency_costs: Vec::new(),
            period: duration.period(),
            duration_hours: duration.hours(),
            calculated_at: Utc::now(),
            resource_type: Some(resource.resource_type),
            region: Some(resource.region.clone()),
            provider: Some(resource.provider),
        }
    }

    /// Sum of the resource's own breakdown
    pub fn breakdown_total(&self) -> f64 {
        self.breakdown.iter().map(|c| c.subtotal).sum()
    }

    /// Sum of all hidden dependency totals
    pub fn hidden_total(&self) -> f64 {
        self.hidden_dependency_costs
            .iter()
            .map(|h| h.total_cost)
            .sum()
    }

    /// Re-establish the total invariant after mutating breakdown or
    /// hidden costs
    pub fn recompute_total(&mut self) {
        self.total_cost = self.breakdown_total() + self.hidden_total();
    }
}

/// Quantity formula of a hidden-dependency rule: a literal, or a metadata
/// field reference with a default for when the field is absent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QuantityFormula {
    /// Fixed quantity
    Fixed { value: f64 },
    /// Read a numeric metadata field from the parent, with a default
    MetadataField { field: String, default: f64 },
}

impl QuantityFormula {
    /// Evaluate against the parent's metadata; never negative
    pub fn evaluate(&self, parent: &ResourceDescriptor) -> f64 {
        let quantity = match self {
            QuantityFormula::Fixed { value } => *value,
            QuantityFormula::MetadataField { field, default } => {
                parent.metadata_f64(field).unwrap_or(*default)
            }
        };
        quantity.max(0.0)
    }
}

/// Condition predicate of a hidden-dependency rule, evaluated over the
/// parent's metadata. A closed set of named predicates rather than
/// free-form expressions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RuleCondition {
    /// Applies when the field is absent (or null)
    MetadataAbsent { field: String },
    /// Applies when the field is present
    MetadataPresent { field: String },
    /// Applies when the field is numeric and strictly positive
    MetadataPositive { field: String },
    /// Applies when the field is a truthy boolean
    MetadataTruthy { field: String },
}

impl RuleCondition {
    pub fn evaluate(&self, parent: &ResourceDescriptor) -> bool {
        match self {
            RuleCondition::MetadataAbsent { field } => !parent.metadata_present(field),
            RuleCondition::MetadataPresent { field } => parent.metadata_present(field),
            RuleCondition::MetadataPositive { field } => {
                parent.metadata_f64(field).map(|v| v > 0.0).unwrap_or(false)
            }
            RuleCondition::MetadataTruthy { field } => {
                parent.metadata_bool(field).unwrap_or(false)
            }
        }
    }
}

/// Declarative hidden-dependency rule: parent type implies a child
/// resource, conditionally, with a computed quantity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HiddenDependency {
    /// Provider the rule is scoped to
    pub provider: CloudProvider,
    /// Parent resource type that triggers the rule
    pub parent_resource_type: ResourceType,
    /// Child resource type implicitly provisioned
    pub child_resource_type: ResourceType,
    /// Quantity formula
    pub quantity: QuantityFormula,
    /// Optional condition; absent means the rule always applies
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<RuleCondition>,
    /// Whether the child is attached to the parent (free-when-attached
    /// resources charge nothing when this is set)
    pub is_attached: bool,
    /// Description
    pub description: String,
}

impl HiddenDependency {
    /// Whether the rule applies to the given parent
    pub fn applies_to(&self, parent: &ResourceDescriptor) -> bool {
        self.condition
            .as_ref()
            .map(|c| c.evaluate(parent))
            .unwrap_or(true)
    }
}

/// A resolved rule instance: the rule, the synthesized child descriptor,
/// and the computed quantity
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HiddenDependencyResource {
    pub rule: HiddenDependency,
    pub resource: ResourceDescriptor,
    pub quantity: f64,
}

/// A persisted hidden-dependency rule row
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HiddenDependencyRule {
    pub id: Uuid,
    pub provider: CloudProvider,
    pub parent_resource_type: ResourceType,
    pub child_resource_type: ResourceType,
    pub quantity: QuantityFormula,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<RuleCondition>,
    pub is_attached: bool,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl HiddenDependencyRule {
    pub fn to_rule(&self) -> HiddenDependency {
        HiddenDependency {
            provider: self.provider,
            parent_resource_type: self.parent_resource_type,
            child_resource_type: self.child_resource_type,
            quantity: self.quantity.clone(),
            condition: self.condition.clone(),
            is_attached: self.is_attached,
            description: self.description.clone(),
        }
    }
}

/// DTO for creating a persisted hidden-dependency rule
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateHiddenDependencyRule {
    pub provider: CloudProvider,
    pub parent_resource_type: ResourceType,
    pub child_resource_type: ResourceType,
    pub quantity: QuantityFormula,
    pub condition: Option<RuleCondition>,
    #[serde(default)]
    pub is_attached: bool,
    #[serde(default)]
    #[validate(length(max = 1024))]
    pub description: String,
}

/// Request to estimate a single resource
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct EstimateResourceRequest {
    pub resource: ResourceDescriptor,
    /// Estimation window in hours
    #[validate(range(min = 0.001, max = 876000.0))]
    pub duration_hours: f64,
}

/// Request to estimate a whole architecture
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct EstimateArchitectureRequest {
    #[validate(length(min = 1))]
    pub resources: Vec<ResourceDescriptor>,
    /// Estimation window in hours
    #[validate(range(min = 0.001, max = 876000.0))]
    pub duration_hours: f64,
}
