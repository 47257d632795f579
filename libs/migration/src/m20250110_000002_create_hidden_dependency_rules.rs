use sea_orm_migration::{prelude::*, schema::*};

use crate::m20250110_000000_bootstrap::{CloudProviderEnum, ResourceTypeEnum};

#[derive(DeriveMigrationName)]
pub struct Migration;

fn resource_type_values() -> [ResourceTypeEnum; 9] {
    [
        ResourceTypeEnum::ComputeInstance,
        ResourceTypeEnum::BlockVolume,
        ResourceTypeEnum::ObjectBucket,
        ResourceTypeEnum::ManagedDatabase,
        ResourceTypeEnum::NatGateway,
        ResourceTypeEnum::FloatingIp,
        ResourceTypeEnum::NetworkInterface,
        ResourceTypeEnum::ServerlessFunction,
        ResourceTypeEnum::DataTransfer,
    ]
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(HiddenDependencyRules::Table)
                    .if_not_exists()
                    .col(pk_uuid(HiddenDependencyRules::Id))
                    .col(
                        ColumnDef::new(HiddenDependencyRules::Provider)
                            .enumeration(
                                CloudProviderEnum::Enum,
                                [
                                    CloudProviderEnum::Aws,
                                    CloudProviderEnum::Azure,
                                    CloudProviderEnum::Gcp,
                                    CloudProviderEnum::Cloudflare,
                                ],
                            )
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(HiddenDependencyRules::ParentResourceType)
                            .enumeration(ResourceTypeEnum::Enum, resource_type_values())
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(HiddenDependencyRules::ChildResourceType)
                            .enumeration(ResourceTypeEnum::Enum, resource_type_values())
                            .not_null(),
                    )
                    .col(string_len(HiddenDependencyRules::QuantityKind, 20).not_null())
                    .col(double_null(HiddenDependencyRules::QuantityValue))
                    .col(string_len_null(HiddenDependencyRules::QuantityField, 100))
                    .col(double_null(HiddenDependencyRules::QuantityDefault))
                    .col(string_len_null(HiddenDependencyRules::ConditionKind, 30))
                    .col(string_len_null(HiddenDependencyRules::ConditionField, 100))
                    .col(boolean(HiddenDependencyRules::IsAttached).default(false))
                    .col(text(HiddenDependencyRules::Description).default(""))
                    .col(
                        timestamp_with_time_zone(HiddenDependencyRules::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(HiddenDependencyRules::UpdatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // One rule per (provider, parent, child): a persisted rule
        // replaces the built-in rule for the same child type
        manager
            .create_index(
                Index::create()
                    .name("idx_hidden_rules_provider_parent_child")
                    .table(HiddenDependencyRules::Table)
                    .col(HiddenDependencyRules::Provider)
                    .col(HiddenDependencyRules::ParentResourceType)
                    .col(HiddenDependencyRules::ChildResourceType)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_hidden_rules_parent")
                    .table(HiddenDependencyRules::Table)
                    .col(HiddenDependencyRules::ParentResourceType)
                    .to_owned(),
            )
            .await?;

        // Add updated_at trigger
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                CREATE TRIGGER hidden_dependency_rules_touch_updated_at
                    BEFORE UPDATE ON hidden_dependency_rules
                    FOR EACH ROW
                    EXECUTE FUNCTION util.touch_updated_at()
                "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(
                "DROP TRIGGER IF EXISTS hidden_dependency_rules_touch_updated_at ON hidden_dependency_rules",
            )
            .await?;

        manager
            .drop_table(
                Table::drop()
                    .table(HiddenDependencyRules::Table)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum HiddenDependencyRules {
    Table,
    Id,
    Provider,
    ParentResourceType,
    ChildResourceType,
    QuantityKind,
    QuantityValue,
    QuantityField,
    QuantityDefault,
    ConditionKind,
    ConditionField,
    IsAttached,
    Description,
    CreatedAt,
    UpdatedAt,
}
