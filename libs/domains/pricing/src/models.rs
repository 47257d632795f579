use chrono::{DateTime, Utc};
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use strum::{Display, EnumString};
use ts_rs::TS;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// Cloud provider enumeration
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    Default,
    DeriveActiveEnum,
    EnumIter,
    ToSchema,
    TS,
    Hash,
)]
#[ts(export)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "cloud_provider")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CloudProvider {
    #[default]
    #[sea_orm(string_value = "aws")]
    Aws,
    #[sea_orm(string_value = "azure")]
    Azure,
    #[sea_orm(string_value = "gcp")]
    Gcp,
    /// Present in the platform's resource model but carries no rate tables;
    /// the estimation engine rejects it as unsupported.
    #[sea_orm(string_value = "cloudflare")]
    Cloudflare,
}

/// Providers the estimation engine can price
pub const SUPPORTED_PROVIDERS: [CloudProvider; 3] = [
    CloudProvider::Aws,
    CloudProvider::Azure,
    CloudProvider::Gcp,
];

impl CloudProvider {
    pub fn is_supported(&self) -> bool {
        SUPPORTED_PROVIDERS.contains(self)
    }
}

/// Billable resource type enumeration
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    Default,
    DeriveActiveEnum,
    EnumIter,
    ToSchema,
    TS,
    Hash,
)]
#[ts(export)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "resource_type")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ResourceType {
    #[default]
    #[sea_orm(string_value = "compute_instance")]
    ComputeInstance,
    #[sea_orm(string_value = "block_volume")]
    BlockVolume,
    #[sea_orm(string_value = "object_bucket")]
    ObjectBucket,
    #[sea_orm(string_value = "managed_database")]
    ManagedDatabase,
    #[sea_orm(string_value = "nat_gateway")]
    NatGateway,
    #[sea_orm(string_value = "floating_ip")]
    FloatingIp,
    #[sea_orm(string_value = "network_interface")]
    NetworkInterface,
    #[sea_orm(string_value = "serverless_function")]
    ServerlessFunction,
    #[sea_orm(string_value = "data_transfer")]
    DataTransfer,
}

/// Pricing model enumeration
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    Default,
    DeriveActiveEnum,
    EnumIter,
    ToSchema,
    TS,
    Hash,
)]
#[ts(export)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "pricing_model")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PricingModel {
    #[default]
    #[sea_orm(string_value = "per_hour")]
    PerHour,
    #[sea_orm(string_value = "per_unit_volume")]
    PerUnitVolume,
    #[sea_orm(string_value = "per_request_batch")]
    PerRequestBatch,
    #[sea_orm(string_value = "one_time")]
    OneTime,
    #[sea_orm(string_value = "tiered")]
    Tiered,
    #[sea_orm(string_value = "percentage")]
    Percentage,
}

/// Currency enumeration
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    Default,
    DeriveActiveEnum,
    EnumIter,
    ToSchema,
    TS,
    Hash,
)]
#[ts(export)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "currency")]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    #[sea_orm(string_value = "USD")]
    Usd,
    #[sea_orm(string_value = "EUR")]
    Eur,
    #[sea_orm(string_value = "GBP")]
    Gbp,
}

/// Which resolver tier produced a rate card
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema, TS,
)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RateSource {
    /// A registered per-type pricing function
    Calculator,
    /// The persisted rate store
    Store,
    /// The built-in static catalog
    Catalog,
}

/// One billable dimension of a resource type
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, TS)]
#[ts(export)]
pub struct PriceComponent {
    /// Component name (e.g., "compute_hours", "data_processing")
    pub name: String,
    /// Pricing model for this component
    pub pricing_model: PricingModel,
    /// Billing unit (e.g., "hour", "gb_month", "1k_requests", "1m_requests")
    pub unit: String,
    /// Per-unit price
    pub rate: f64,
    /// Currency
    pub currency: Currency,
    /// Region this rate applies to (None = all regions)
    pub region: Option<String>,
    /// Description
    pub description: String,
}

impl PriceComponent {
    /// Batch divisor implied by the unit: rates quoted "per 1,000 requests"
    /// or "per 1,000,000 requests" divide the raw quantity before the
    /// rate is applied.
    pub fn batch_size(&self) -> f64 {
        match self.unit.as_str() {
            "1k_requests" => 1_000.0,
            "1m_requests" => 1_000_000.0,
            _ => 1.0,
        }
    }
}

/// The full rate card for one resource type/provider/region lookup
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, TS)]
#[ts(export)]
pub struct ResourcePricing {
    /// Resource type this card prices
    pub resource_type: ResourceType,
    /// Cloud provider
    pub provider: CloudProvider,
    /// Billable components
    pub components: Vec<PriceComponent>,
    /// Free-tier allowances and lookup context (effective variant,
    /// region multiplier, ...)
    #[ts(type = "Record<string, unknown>")]
    pub metadata: HashMap<String, serde_json::Value>,
    /// Which resolver tier produced this card
    pub source: RateSource,
    /// True when an unknown variant within a known type resolved to a
    /// zero rate. Callers must not assume a zero rate means "free".
    pub fallback_rate: bool,
}

impl ResourcePricing {
    /// Find a component by name
    pub fn component(&self, name: &str) -> Option<&PriceComponent> {
        self.components.iter().find(|c| c.name == name)
    }

    /// Rate of a named component, 0.0 when absent
    pub fn rate_of(&self, name: &str) -> f64 {
        self.component(name).map(|c| c.rate).unwrap_or(0.0)
    }

    /// Numeric metadata accessor (free-tier sizes etc.)
    pub fn metadata_f64(&self, key: &str) -> Option<f64> {
        self.metadata.get(key).and_then(|v| v.as_f64())
    }
}

/// One persisted rate row in the rate store
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, TS)]
#[ts(export)]
pub struct PricingRate {
    /// Unique identifier
    #[ts(as = "String")]
    pub id: Uuid,
    /// Cloud provider
    pub provider: CloudProvider,
    /// Resource type
    pub resource_type: ResourceType,
    /// Billable component this rate prices
    pub component_name: String,
    /// Pricing model
    pub pricing_model: PricingModel,
    /// Billing unit
    pub unit: String,
    /// Per-unit price
    pub rate: f64,
    /// Currency
    pub currency: Currency,
    /// Region code (None = all regions)
    pub region: Option<String>,
    /// Variant discriminator (instance size, volume type, storage class)
    pub variant: Option<String>,
    /// Secondary variant discriminator (e.g., database engine)
    pub variant_subtype: Option<String>,
    /// Description
    pub description: String,
    /// When this rate became effective
    #[ts(as = "String")]
    pub effective_from: DateTime<Utc>,
    /// When this rate expires (None if current)
    #[ts(as = "Option<String>")]
    pub effective_until: Option<DateTime<Utc>>,
    /// Creation timestamp
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl PricingRate {
    /// Whether the rate is effective at the given instant
    pub fn is_active_at(&self, at: DateTime<Utc>) -> bool {
        self.effective_from <= at && self.effective_until.map(|until| at < until).unwrap_or(true)
    }

    /// Convert into a rate-card component
    pub fn to_component(&self) -> PriceComponent {
        PriceComponent {
            name: self.component_name.clone(),
            pricing_model: self.pricing_model,
            unit: self.unit.clone(),
            rate: self.rate,
            currency: self.currency,
            region: self.region.clone(),
            description: self.description.clone(),
        }
    }
}

/// DTO for creating a new rate row
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema, TS)]
#[ts(export)]
pub struct CreatePricingRate {
    pub provider: CloudProvider,
    pub resource_type: ResourceType,
    #[validate(length(min = 1, max = 255))]
    pub component_name: String,
    pub pricing_model: PricingModel,
    #[validate(length(min = 1, max = 50))]
    pub unit: String,
    #[validate(range(min = 0.0))]
    pub rate: f64,
    #[serde(default)]
    pub currency: Currency,
    #[validate(length(max = 100))]
    pub region: Option<String>,
    #[validate(length(max = 100))]
    pub variant: Option<String>,
    #[validate(length(max = 100))]
    pub variant_subtype: Option<String>,
    #[serde(default)]
    pub description: String,
    #[ts(as = "String")]
    pub effective_from: DateTime<Utc>,
    #[ts(as = "Option<String>")]
    pub effective_until: Option<DateTime<Utc>>,
}

/// DTO for updating an existing rate row
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema, Default, TS)]
#[ts(export)]
pub struct UpdatePricingRate {
    #[validate(range(min = 0.0))]
    pub rate: Option<f64>,
    pub description: Option<String>,
    #[ts(as = "Option<String>")]
    pub effective_until: Option<Option<DateTime<Utc>>>,
}

/// Query filters for listing rates
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, IntoParams, Default)]
pub struct RateFilter {
    pub provider: Option<CloudProvider>,
    pub resource_type: Option<ResourceType>,
    pub region: Option<String>,
    pub variant: Option<String>,
    pub component_name: Option<String>,
    /// Only rates effective now
    #[serde(default)]
    pub active_only: bool,
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub offset: usize,
}

fn default_limit() -> usize {
    50
}
