use domain_pricing::{CloudProvider, ResourceType};
use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue::Set;
use serde::{Deserialize, Serialize};

use crate::models::{QuantityFormula, RuleCondition};

/// Sea-ORM Entity for the hidden_dependency_rules table.
///
/// Quantity formulas and conditions are stored decomposed
/// (kind + operand columns) rather than as opaque expression strings.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "hidden_dependency_rules")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub provider: CloudProvider,
    pub parent_resource_type: ResourceType,
    pub child_resource_type: ResourceType,
    #[sea_orm(column_type = "String(StringLen::N(20))")]
    pub quantity_kind: String,
    pub quantity_value: Option<f64>,
    #[sea_orm(column_type = "String(StringLen::N(100))", nullable)]
    pub quantity_field: Option<String>,
    pub quantity_default: Option<f64>,
    #[sea_orm(column_type = "String(StringLen::N(30))", nullable)]
    pub condition_kind: Option<String>,
    #[sea_orm(column_type = "String(StringLen::N(100))", nullable)]
    pub condition_field: Option<String>,
    pub is_attached: bool,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

impl Model {
    /// OpenAPI tag and mount path for the estimation API
    pub const TAG: &'static str = "estimates";
    pub const URL: &'static str = "/estimates";
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    fn decode_quantity(&self) -> QuantityFormula {
        match self.quantity_kind.as_str() {
            "fixed" => QuantityFormula::Fixed {
                value: self.quantity_value.unwrap_or(0.0),
            },
            "metadata_field" => QuantityFormula::MetadataField {
                field: self.quantity_field.clone().unwrap_or_default(),
                default: self.quantity_default.unwrap_or(0.0),
            },
            other => {
                tracing::warn!(rule_id = %self.id, kind = other, "Unknown quantity kind, treating as zero");
                QuantityFormula::Fixed { value: 0.0 }
            }
        }
    }

    fn decode_condition(&self) -> Option<RuleCondition> {
        let field = self.condition_field.clone()?;
        match self.condition_kind.as_deref() {
            Some("metadata_absent") => Some(RuleCondition::MetadataAbsent { field }),
            Some("metadata_present") => Some(RuleCondition::MetadataPresent { field }),
            Some("metadata_positive") => Some(RuleCondition::MetadataPositive { field }),
            Some("metadata_truthy") => Some(RuleCondition::MetadataTruthy { field }),
            Some(other) => {
                tracing::warn!(rule_id = %self.id, kind = other, "Unknown condition kind, ignoring rule condition");
                None
            }
            None => None,
        }
    }
}

fn encode_quantity(
    quantity: &QuantityFormula,
) -> (String, Option<f64>, Option<String>, Option<f64>) {
    match quantity {
        QuantityFormula::Fixed { value } => ("fixed".to_string(), Some(*value), None, None),
        QuantityFormula::MetadataField { field, default } => (
            "metadata_field".to_string(),
            None,
            Some(field.clone()),
            Some(*default),
        ),
    }
}

fn encode_condition(condition: &Option<RuleCondition>) -> (Option<String>, Option<String>) {
    match condition {
        None => (None, None),
        Some(RuleCondition::MetadataAbsent { field }) => {
            (Some("metadata_absent".to_string()), Some(field.clone()))
        }
        Some(RuleCondition::MetadataPresent { field }) => {
            (Some("metadata_present".to_string()), Some(field.clone()))
        }
        Some(RuleCondition::MetadataPositive { field }) => {
            (Some("metadata_positive".to_string()), Some(field.clone()))
        }
        Some(RuleCondition::MetadataTruthy { field }) => {
            (Some("metadata_truthy".to_string()), Some(field.clone()))
        }
    }
}

// Conversion from Sea-ORM Model to domain HiddenDependencyRule
impl From<Model> for crate::models::HiddenDependencyRule {
    fn from(model: Model) -> Self {
        let quantity = model.decode_quantity();
        let condition = model.decode_condition();

        Self {
            id: model.id,
            provider: model.provider,
            parent_resource_type: model.parent_resource_type,
            child_resource_type: model.child_resource_type,
            quantity,
            condition,
            is_attached: model.is_attached,
            description: model.description,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

// Conversion from domain CreateHiddenDependencyRule to Sea-ORM ActiveModel
impl From<crate::models::CreateHiddenDependencyRule> for ActiveModel {
    fn from(input: crate::models::CreateHiddenDependencyRule) -> Self {
        let now = chrono::Utc::now();
        let (quantity_kind, quantity_value, quantity_field, quantity_default) =
            encode_quantity(&input.quantity);
        let (condition_kind, condition_field) = encode_condition(&input.condition);

        ActiveModel {
            id: Set(Uuid::now_v7()),
            provider: Set(input.provider),
            parent_resource_type: Set(input.parent_resource_type),
            child_resource_type: Set(input.child_resource_type),
            quantity_kind: Set(quantity_kind),
            quantity_value: Set(quantity_value),
            quantity_field: Set(quantity_field),
            quantity_default: Set(quantity_default),
            condition_kind: Set(condition_kind),
            condition_field: Set(condition_field),
            is_attached: Set(input.is_attached),
            description: Set(input.description),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantity_round_trip() {
        let quantity = QuantityFormula::MetadataField {
            field: "root_volume_gb".to_string(),
            default: 8.0,
        };
        let (kind, value, field, default) = encode_quantity(&quantity);

        let model = Model {
            id: Uuid::now_v7(),
            provider: CloudProvider::Aws,
            parent_resource_type: ResourceType::ComputeInstance,
            child_resource_type: ResourceType::BlockVolume,
            quantity_kind: kind,
            quantity_value: value,
            quantity_field: field,
            quantity_default: default,
            condition_kind: None,
            condition_field: None,
            is_attached: false,
            description: String::new(),
            created_at: chrono::Utc::now().into(),
            updated_at: chrono::Utc::now().into(),
        };

        assert_eq!(model.decode_quantity(), quantity);
    }

    #[test]
    fn test_condition_round_trip() {
        let condition = Some(RuleCondition::MetadataPositive {
            field: "backup_retention_days".to_string(),
        });
        let (kind, field) = encode_condition(&condition);

        let model = Model {
            id: Uuid::now_v7(),
            provider: CloudProvider::Aws,
            parent_resource_type: ResourceType::ManagedDatabase,
            child_resource_type: ResourceType::ObjectBucket,
            quantity_kind: "fixed".to_string(),
            quantity_value: Some(1.0),
            quantity_field: None,
            quantity_default: None,
            condition_kind: kind,
            condition_field: field,
            is_attached: false,
            description: String::new(),
            created_at: chrono::Utc::now().into(),
            updated_at: chrono::Utc::now().into(),
        };

        assert_eq!(model.decode_condition(), condition);
    }
}
