use crate::models::{CloudProvider, Currency, PricingModel, ResourceType};
use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue::Set;
use serde::{Deserialize, Serialize};

/// Sea-ORM Entity for the pricing_rates table
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "pricing_rates")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub provider: CloudProvider,
    pub resource_type: ResourceType,
    #[sea_orm(column_type = "String(StringLen::N(255))")]
    pub component_name: String,
    pub pricing_model: PricingModel,
    #[sea_orm(column_type = "String(StringLen::N(50))")]
    pub unit: String,
    #[sea_orm(column_type = "Double")]
    pub rate: f64,
    pub currency: Currency,
    #[sea_orm(column_type = "String(StringLen::N(100))", nullable)]
    pub region: Option<String>,
    #[sea_orm(column_type = "String(StringLen::N(100))", nullable)]
    pub variant: Option<String>,
    #[sea_orm(column_type = "String(StringLen::N(100))", nullable)]
    pub variant_subtype: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub effective_from: DateTimeWithTimeZone,
    pub effective_until: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

impl Model {
    /// OpenAPI tag and mount path for the rates API
    pub const TAG: &'static str = "rates";
    pub const URL: &'static str = "/rates";
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

// Conversion from Sea-ORM Model to domain PricingRate
impl From<Model> for crate::models::PricingRate {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            provider: model.provider,
            resource_type: model.resource_type,
            component_name: model.component_name,
            pricing_model: model.pricing_model,
            unit: model.unit,
            rate: model.rate,
            currency: model.currency,
            region: model.region,
            variant: model.variant,
            variant_subtype: model.variant_subtype,
            description: model.description,
            effective_from: model.effective_from.into(),
            effective_until: model.effective_until.map(Into::into),
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

// Conversion from domain CreatePricingRate to Sea-ORM ActiveModel
impl From<crate::models::CreatePricingRate> for ActiveModel {
    fn from(input: crate::models::CreatePricingRate) -> Self {
        let now = chrono::Utc::now();
        ActiveModel {
            id: Set(Uuid::now_v7()),
            provider: Set(input.provider),
            resource_type: Set(input.resource_type),
            component_name: Set(input.component_name),
            pricing_model: Set(input.pricing_model),
            unit: Set(input.unit),
            rate: Set(input.rate),
            currency: Set(input.currency),
            region: Set(input.region),
            variant: Set(input.variant),
            variant_subtype: Set(input.variant_subtype),
            description: Set(input.description),
            effective_from: Set(input.effective_from.into()),
            effective_until: Set(input.effective_until.map(Into::into)),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
    }
}
