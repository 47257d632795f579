use sea_orm_migration::{prelude::*, schema::*};

use crate::m20250110_000000_bootstrap::{
    CloudProviderEnum, CurrencyEnum, PricingModelEnum, ResourceTypeEnum,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PricingRates::Table)
                    .if_not_exists()
                    .col(pk_uuid(PricingRates::Id))
                    .col(
                        ColumnDef::new(PricingRates::Provider)
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
                        ColumnDef::new(PricingRates::ResourceType)
                            .enumeration(
                                ResourceTypeEnum::Enum,
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
                                ],
                            )
                            .not_null(),
                    )
                    .col(string_len(PricingRates::ComponentName, 255).not_null())
                    .col(
                        ColumnDef::new(PricingRates::PricingModel)
                            .enumeration(
                                PricingModelEnum::Enum,
                                [
                                    PricingModelEnum::PerHour,
                                    PricingModelEnum::PerUnitVolume,
                                    PricingModelEnum::PerRequestBatch,
                                    PricingModelEnum::OneTime,
                                    PricingModelEnum::Tiered,
                                    PricingModelEnum::Percentage,
                                ],
                            )
                            .not_null(),
                    )
                    .col(string_len(PricingRates::Unit, 50).not_null())
                    .col(double(PricingRates::Rate).not_null())
                    .col(
                        ColumnDef::new(PricingRates::Currency)
                            .enumeration(
                                CurrencyEnum::Enum,
                                [CurrencyEnum::Usd, CurrencyEnum::Eur, CurrencyEnum::Gbp],
                            )
                            .not_null()
                            .default("USD"),
                    )
                    .col(string_len_null(PricingRates::Region, 100))
                    .col(string_len_null(PricingRates::Variant, 100))
                    .col(string_len_null(PricingRates::VariantSubtype, 100))
                    .col(text(PricingRates::Description).default(""))
                    .col(timestamp_with_time_zone(PricingRates::EffectiveFrom).not_null())
                    .col(timestamp_with_time_zone_null(PricingRates::EffectiveUntil))
                    .col(
                        timestamp_with_time_zone(PricingRates::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(PricingRates::UpdatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Indexes for the resolver's lookup paths
        manager
            .create_index(
                Index::create()
                    .name("idx_pricing_rates_provider_type")
                    .table(PricingRates::Table)
                    .col(PricingRates::Provider)
                    .col(PricingRates::ResourceType)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_pricing_rates_variant")
                    .table(PricingRates::Table)
                    .col(PricingRates::Provider)
                    .col(PricingRates::ResourceType)
                    .col(PricingRates::Variant)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_pricing_rates_region")
                    .table(PricingRates::Table)
                    .col(PricingRates::Region)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_pricing_rates_effective")
                    .table(PricingRates::Table)
                    .col(PricingRates::EffectiveFrom)
                    .col(PricingRates::EffectiveUntil)
                    .to_owned(),
            )
            .await?;

        // Add updated_at trigger
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                CREATE TRIGGER pricing_rates_touch_updated_at
                    BEFORE UPDATE ON pricing_rates
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
                "DROP TRIGGER IF EXISTS pricing_rates_touch_updated_at ON pricing_rates",
            )
            .await?;

        manager
            .drop_table(Table::drop().table(PricingRates::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum PricingRates {
    Table,
    Id,
    Provider,
    ResourceType,
    ComponentName,
    PricingModel,
    Unit,
    Rate,
    Currency,
    Region,
    Variant,
    VariantSubtype,
    Description,
    EffectiveFrom,
    EffectiveUntil,
    CreatedAt,
    UpdatedAt,
}
