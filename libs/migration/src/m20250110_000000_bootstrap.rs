use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_query::extension::postgres::Type;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Enable pgcrypto extension for UUID generation
        manager
            .get_connection()
            .execute_unprepared("CREATE EXTENSION IF NOT EXISTS pgcrypto")
            .await?;

        // Create util schema for utility functions
        manager
            .get_connection()
            .execute_unprepared("CREATE SCHEMA IF NOT EXISTS util")
            .await?;

        // Create touch_updated_at trigger function
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                CREATE OR REPLACE FUNCTION util.touch_updated_at()
                RETURNS TRIGGER AS $$
                BEGIN
                    NEW.updated_at = NOW();
                    RETURN NEW;
                END;
                $$ LANGUAGE plpgsql
                "#,
            )
            .await?;

        // Create cloud_provider enum
        manager
            .create_type(
                Type::create()
                    .as_enum(CloudProviderEnum::Enum)
                    .values([
                        CloudProviderEnum::Aws,
                        CloudProviderEnum::Azure,
                        CloudProviderEnum::Gcp,
                        CloudProviderEnum::Cloudflare,
                    ])
                    .to_owned(),
            )
            .await?;

        // Create resource_type enum
        manager
            .create_type(
                Type::create()
                    .as_enum(ResourceTypeEnum::Enum)
                    .values([
                        ResourceTypeEnum::ComputeInstance,
                        ResourceTypeEnum::BlockVolume,
                        ResourceTypeEnum::ObjectBucket,
                        ResourceTypeEnum::ManagedDatabase,
                        ResourceTypeEnum::NatGateway,
                        ResourceTypeEnum::FloatingIp,
                        ResourceTypeEnum::NetworkInterface,
                        ResourceTypeEnum::ServerlessFunction,
                        ResourceTypeEnum::DataTransfer,
                    ])
                    .to_owned(),
            )
            .await?;

        // Create pricing_model enum
        manager
            .create_type(
                Type::create()
                    .as_enum(PricingModelEnum::Enum)
                    .values([
                        PricingModelEnum::PerHour,
                        PricingModelEnum::PerUnitVolume,
                        PricingModelEnum::PerRequestBatch,
                        PricingModelEnum::OneTime,
                        PricingModelEnum::Tiered,
                        PricingModelEnum::Percentage,
                    ])
                    .to_owned(),
            )
            .await?;

        // Create currency enum
        manager
            .create_type(
                Type::create()
                    .as_enum(CurrencyEnum::Enum)
                    .values([CurrencyEnum::Usd, CurrencyEnum::Eur, CurrencyEnum::Gbp])
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_type(Type::drop().name(CurrencyEnum::Enum).to_owned())
            .await?;
        manager
            .drop_type(Type::drop().name(PricingModelEnum::Enum).to_owned())
            .await?;
        manager
            .drop_type(Type::drop().name(ResourceTypeEnum::Enum).to_owned())
            .await?;
        manager
            .drop_type(Type::drop().name(CloudProviderEnum::Enum).to_owned())
            .await?;

        manager
            .get_connection()
            .execute_unprepared("DROP FUNCTION IF EXISTS util.touch_updated_at")
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub(crate) enum CloudProviderEnum {
    #[sea_orm(iden = "cloud_provider")]
    Enum,
    #[sea_orm(iden = "aws")]
    Aws,
    #[sea_orm(iden = "azure")]
    Azure,
    #[sea_orm(iden = "gcp")]
    Gcp,
    #[sea_orm(iden = "cloudflare")]
    Cloudflare,
}

#[derive(DeriveIden)]
pub(crate) enum ResourceTypeEnum {
    #[sea_orm(iden = "resource_type")]
    Enum,
    #[sea_orm(iden = "compute_instance")]
    ComputeInstance,
    #[sea_orm(iden = "block_volume")]
    BlockVolume,
    #[sea_orm(iden = "object_bucket")]
    ObjectBucket,
    #[sea_orm(iden = "managed_database")]
    ManagedDatabase,
    #[sea_orm(iden = "nat_gateway")]
    NatGateway,
    #[sea_orm(iden = "floating_ip")]
    FloatingIp,
    #[sea_orm(iden = "network_interface")]
    NetworkInterface,
    #[sea_orm(iden = "serverless_function")]
    ServerlessFunction,
    #[sea_orm(iden = "data_transfer")]
    DataTransfer,
}

#[derive(DeriveIden)]
pub(crate) enum PricingModelEnum {
    #[sea_orm(iden = "pricing_model")]
    Enum,
    #[sea_orm(iden = "per_hour")]
    PerHour,
    #[sea_orm(iden = "per_unit_volume")]
    PerUnitVolume,
    #[sea_orm(iden = "per_request_batch")]
    PerRequestBatch,
    #[sea_orm(iden = "one_time")]
    OneTime,
    #[sea_orm(iden = "tiered")]
    Tiered,
    #[sea_orm(iden = "percentage")]
    Percentage,
}

#[derive(DeriveIden)]
pub(crate) enum CurrencyEnum {
    #[sea_orm(iden = "currency")]
    Enum,
    #[sea_orm(iden = "USD")]
    Usd,
    #[sea_orm(iden = "EUR")]
    Eur,
    #[sea_orm(iden = "GBP")]
    Gbp,
}
