//! Built-in static rate catalog.
//!
//! Last-resort tier of the rate resolution chain: per-provider rate tables
//! keyed by variant where the resource type has sub-variants (instance
//! size, volume type, storage class, database instance class), plus
//! regional price multipliers.
//!
//! Policy: an unknown variant within a known resource type resolves to a
//! zero rate with `fallback_rate = true` rather than failing. Callers must
//! not assume a non-zero rate implies the variant was recognized.

use std::collections::HashMap;

use crate::models::{
    CloudProvider, Currency, PriceComponent, PricingModel, RateSource, ResourcePricing,
    ResourceType,
};

/// How a catalog component derives its rate
enum ComponentRate {
    /// Same rate for every variant
    Fixed(f64),
    /// Rate read from the per-variant table
    Variant,
}

struct ComponentSpec {
    name: &'static str,
    model: PricingModel,
    unit: &'static str,
    rate: ComponentRate,
    description: &'static str,
}

/// Rates for one (provider, resource type) pair
struct RateTable {
    default_variant: Option<&'static str>,
    variant_rates: Vec<(&'static str, f64)>,
    components: Vec<ComponentSpec>,
    metadata: Vec<(&'static str, f64)>,
}

impl RateTable {
    fn variant_rate(&self, variant: &str) -> Option<f64> {
        self.variant_rates
            .iter()
            .find(|(name, _)| *name == variant)
            .map(|(_, rate)| *rate)
    }
}

/// Static pricing catalog with per-variant rate tables and regional multipliers
pub struct PricingCatalog {
    tables: HashMap<(CloudProvider, ResourceType), RateTable>,
    region_multipliers: HashMap<(CloudProvider, &'static str), f64>,
}

impl PricingCatalog {
    /// Build the built-in catalog covering every supported provider
    pub fn builtin() -> Self {
        let mut catalog = Self {
            tables: HashMap::new(),
            region_multipliers: HashMap::new(),
        };

        catalog.load_aws();
        catalog.load_azure();
        catalog.load_gcp();
        catalog.load_region_multipliers();
        catalog
    }

    /// Whether the catalog has a rate table for the pair
    pub fn supports(&self, provider: CloudProvider, resource_type: ResourceType) -> bool {
        self.tables.contains_key(&(provider, resource_type))
    }

    /// Regional price multiplier, 1.0 when the region is unlisted
    pub fn region_multiplier(&self, provider: CloudProvider, region: &str) -> f64 {
        self.region_multipliers
            .iter()
            .find(|((p, r), _)| *p == provider && *r == region)
            .map(|(_, m)| *m)
            .unwrap_or(1.0)
    }

    /// Default variant for a resource type (the smallest/most general
    /// listed entry), None when the type has no variants
    pub fn default_variant(
        &self,
        provider: CloudProvider,
        resource_type: ResourceType,
    ) -> Option<&'static str> {
        self.tables
            .get(&(provider, resource_type))
            .and_then(|t| t.default_variant)
    }

    /// Look up the rate card for a resource type.
    ///
    /// Returns None only when the (provider, resource type) pair has no
    /// table at all. A known pair with an unrecognized variant yields a
    /// zero-rate card flagged `fallback_rate`.
    pub fn lookup(
        &self,
        provider: CloudProvider,
        resource_type: ResourceType,
        region: &str,
        variant: Option<&str>,
    ) -> Option<ResourcePricing> {
        let table = self.tables.get(&(provider, resource_type))?;
        let multiplier = self.region_multiplier(provider, region);

        let effective_variant = variant.or(table.default_variant);
        let needs_variant = table
            .components
            .iter()
            .any(|c| matches!(c.rate, ComponentRate::Variant));

        let variant_rate = effective_variant.and_then(|v| table.variant_rate(v));
        let fallback_rate = needs_variant && variant_rate.is_none();

        let components = table
            .components
            .iter()
            .map(|spec| {
                let base_rate = match spec.rate {
                    ComponentRate::Fixed(rate) => rate,
                    ComponentRate::Variant => variant_rate.unwrap_or(0.0),
                };
                PriceComponent {
                    name: spec.name.to_string(),
                    pricing_model: spec.model,
                    unit: spec.unit.to_string(),
                    rate: base_rate * multiplier,
                    currency: Currency::Usd,
                    region: Some(region.to_string()),
                    description: spec.description.to_string(),
                }
            })
            .collect();

        let mut metadata: HashMap<String, serde_json::Value> = table
            .metadata
            .iter()
            .map(|(key, value)| (key.to_string(), serde_json::json!(value)))
            .collect();
        if let Some(variant) = effective_variant {
            metadata.insert("variant".to_string(), serde_json::json!(variant));
        }
        metadata.insert(
            "region_multiplier".to_string(),
            serde_json::json!(multiplier),
        );

        Some(ResourcePricing {
            resource_type,
            provider,
            components,
            metadata,
            source: RateSource::Catalog,
            fallback_rate,
        })
    }

    fn insert(&mut self, provider: CloudProvider, resource_type: ResourceType, table: RateTable) {
        self.tables.insert((provider, resource_type), table);
    }

    fn load_aws(&mut self) {
        use CloudProvider::Aws;

        self.insert(
            Aws,
            ResourceType::ComputeInstance,
            RateTable {
                default_variant: Some("t3.micro"),
                variant_rates: vec![
                    ("t3.micro", 0.0104),
                    ("t3.small", 0.0208),
                    ("t3.medium", 0.0416),
                    ("t3.large", 0.0832),
                    ("m5.large", 0.096),
                    ("m5.xlarge", 0.192),
                    ("c5.large", 0.085),
                    ("r5.large", 0.126),
                ],
                components: vec![ComponentSpec {
                    name: "compute_hours",
                    model: PricingModel::PerHour,
                    unit: "hour",
                    rate: ComponentRate::Variant,
                    description: "On-demand instance hours",
                }],
                metadata: vec![],
            },
        );

        self.insert(
            Aws,
            ResourceType::BlockVolume,
            RateTable {
                default_variant: Some("gp3"),
                variant_rates: vec![
                    ("gp3", 0.08),
                    ("gp2", 0.10),
                    ("io1", 0.125),
                    ("io2", 0.125),
                    ("st1", 0.045),
                    ("standard", 0.05),
                ],
                components: vec![
                    ComponentSpec {
                        name: "volume_storage",
                        model: PricingModel::PerUnitVolume,
                        unit: "gb_month",
                        rate: ComponentRate::Variant,
                        description: "Provisioned volume storage",
                    },
                    ComponentSpec {
                        name: "provisioned_iops",
                        model: PricingModel::PerUnitVolume,
                        unit: "iops_month",
                        rate: ComponentRate::Fixed(0.065),
                        description: "Provisioned IOPS (io-class volumes)",
                    },
                ],
                metadata: vec![],
            },
        );

        self.insert(
            Aws,
            ResourceType::ObjectBucket,
            RateTable {
                default_variant: Some("standard"),
                variant_rates: vec![
                    ("standard", 0.023),
                    ("infrequent_access", 0.0125),
                    ("glacier", 0.004),
                ],
                components: vec![
                    ComponentSpec {
                        name: "bucket_storage",
                        model: PricingModel::PerUnitVolume,
                        unit: "gb_month",
                        rate: ComponentRate::Variant,
                        description: "Object storage",
                    },
                    ComponentSpec {
                        name: "bucket_requests",
                        model: PricingModel::PerRequestBatch,
                        unit: "1k_requests",
                        rate: ComponentRate::Fixed(0.0004),
                        description: "Object requests",
                    },
                ],
                metadata: vec![("free_requests_per_month", 20_000.0)],
            },
        );

        self.insert(
            Aws,
            ResourceType::ManagedDatabase,
            RateTable {
                default_variant: Some("db.t3.micro"),
                variant_rates: vec![
                    ("db.t3.micro", 0.017),
                    ("db.t3.medium", 0.068),
                    ("db.m5.large", 0.171),
                    ("db.r5.large", 0.24),
                ],
                components: vec![ComponentSpec {
                    name: "database_hours",
                    model: PricingModel::PerHour,
                    unit: "hour",
                    rate: ComponentRate::Variant,
                    description: "Managed database instance hours",
                }],
                metadata: vec![],
            },
        );

        self.insert(
            Aws,
            ResourceType::NatGateway,
            RateTable {
                default_variant: None,
                variant_rates: vec![],
                components: vec![
                    ComponentSpec {
                        name: "gateway_hours",
                        model: PricingModel::PerHour,
                        unit: "hour",
                        rate: ComponentRate::Fixed(0.045),
                        description: "Gateway availability",
                    },
                    ComponentSpec {
                        name: "data_processing",
                        model: PricingModel::PerUnitVolume,
                        unit: "gb",
                        rate: ComponentRate::Fixed(0.045),
                        description: "Data processed through the gateway",
                    },
                ],
                metadata: vec![],
            },
        );

        self.insert(
            Aws,
            ResourceType::FloatingIp,
            RateTable {
                default_variant: None,
                variant_rates: vec![],
                components: vec![ComponentSpec {
                    name: "idle_hours",
                    model: PricingModel::PerHour,
                    unit: "hour",
                    rate: ComponentRate::Fixed(0.005),
                    description: "Floating IP hours (free while attached)",
                }],
                metadata: vec![],
            },
        );

        self.insert(
            Aws,
            ResourceType::NetworkInterface,
            RateTable {
                default_variant: None,
                variant_rates: vec![],
                components: vec![ComponentSpec {
                    name: "interface_hours",
                    model: PricingModel::PerHour,
                    unit: "hour",
                    rate: ComponentRate::Fixed(0.005),
                    description: "Network interface hours (free while attached)",
                }],
                metadata: vec![],
            },
        );

        self.insert(
            Aws,
            ResourceType::ServerlessFunction,
            RateTable {
                default_variant: None,
                variant_rates: vec![],
                components: vec![
                    ComponentSpec {
                        name: "compute_duration",
                        model: PricingModel::Tiered,
                        unit: "gb_second",
                        rate: ComponentRate::Fixed(0.000_016_666_7),
                        description: "Function compute time",
                    },
                    ComponentSpec {
                        name: "invocations",
                        model: PricingModel::PerRequestBatch,
                        unit: "1m_requests",
                        rate: ComponentRate::Fixed(0.20),
                        description: "Function invocations",
                    },
                    ComponentSpec {
                        name: "egress",
                        model: PricingModel::PerUnitVolume,
                        unit: "gb",
                        rate: ComponentRate::Fixed(0.09),
                        description: "Data transferred out",
                    },
                ],
                metadata: vec![
                    ("free_gb_seconds_per_month", 400_000.0),
                    ("free_requests_per_month", 1_000_000.0),
                    ("free_gb_per_month", 100.0),
                ],
            },
        );

        self.insert(
            Aws,
            ResourceType::DataTransfer,
            RateTable {
                default_variant: None,
                variant_rates: vec![],
                components: vec![ComponentSpec {
                    name: "data_transfer_out",
                    model: PricingModel::PerUnitVolume,
                    unit: "gb",
                    rate: ComponentRate::Fixed(0.09),
                    description: "Data transferred out to the internet",
                }],
                metadata: vec![("free_gb_per_month", 100.0)],
            },
        );
    }

    fn load_azure(&mut self) {
        use CloudProvider::Azure;

        self.insert(
            Azure,
            ResourceType::ComputeInstance,
            RateTable {
                default_variant: Some("B1s"),
                variant_rates: vec![
                    ("B1s", 0.0104),
                    ("B2s", 0.0416),
                    ("D2s_v3", 0.096),
                    ("D4s_v3", 0.192),
                    ("E2s_v3", 0.126),
                ],
                components: vec![ComponentSpec {
                    name: "compute_hours",
                    model: PricingModel::PerHour,
                    unit: "hour",
                    rate: ComponentRate::Variant,
                    description: "Pay-as-you-go VM hours",
                }],
                metadata: vec![],
            },
        );

        self.insert(
            Azure,
            ResourceType::BlockVolume,
            RateTable {
                default_variant: Some("standard_ssd"),
                variant_rates: vec![
                    ("standard_ssd", 0.075),
                    ("premium_ssd", 0.135),
                    ("standard_hdd", 0.045),
                ],
                components: vec![ComponentSpec {
                    name: "volume_storage",
                    model: PricingModel::PerUnitVolume,
                    unit: "gb_month",
                    rate: ComponentRate::Variant,
                    description: "Managed disk storage",
                }],
                metadata: vec![],
            },
        );

        self.insert(
            Azure,
            ResourceType::ObjectBucket,
            RateTable {
                default_variant: Some("hot"),
                variant_rates: vec![("hot", 0.0184), ("cool", 0.01), ("archive", 0.00099)],
                components: vec![
                    ComponentSpec {
                        name: "bucket_storage",
                        model: PricingModel::PerUnitVolume,
                        unit: "gb_month",
                        rate: ComponentRate::Variant,
                        description: "Blob storage",
                    },
                    ComponentSpec {
                        name: "bucket_requests",
                        model: PricingModel::PerRequestBatch,
                        unit: "1k_requests",
                        rate: ComponentRate::Fixed(0.00044),
                        description: "Blob operations",
                    },
                ],
                metadata: vec![("free_requests_per_month", 20_000.0)],
            },
        );

        self.insert(
            Azure,
            ResourceType::ManagedDatabase,
            RateTable {
                default_variant: Some("B_Gen5_1"),
                variant_rates: vec![
                    ("B_Gen5_1", 0.034),
                    ("GP_Gen5_2", 0.175),
                    ("MO_Gen5_2", 0.253),
                ],
                components: vec![ComponentSpec {
                    name: "database_hours",
                    model: PricingModel::PerHour,
                    unit: "hour",
                    rate: ComponentRate::Variant,
                    description: "Flexible server compute hours",
                }],
                metadata: vec![],
            },
        );

        self.insert(
            Azure,
            ResourceType::NatGateway,
            RateTable {
                default_variant: None,
                variant_rates: vec![],
                components: vec![
                    ComponentSpec {
                        name: "gateway_hours",
                        model: PricingModel::PerHour,
                        unit: "hour",
                        rate: ComponentRate::Fixed(0.045),
                        description: "Gateway availability",
                    },
                    ComponentSpec {
                        name: "data_processing",
                        model: PricingModel::PerUnitVolume,
                        unit: "gb",
                        rate: ComponentRate::Fixed(0.045),
                        description: "Data processed through the gateway",
                    },
                ],
                metadata: vec![],
            },
        );

        self.insert(
            Azure,
            ResourceType::FloatingIp,
            RateTable {
                default_variant: None,
                variant_rates: vec![],
                components: vec![ComponentSpec {
                    name: "idle_hours",
                    model: PricingModel::PerHour,
                    unit: "hour",
                    rate: ComponentRate::Fixed(0.005),
                    description: "Static public IP hours (free while attached)",
                }],
                metadata: vec![],
            },
        );

        self.insert(
            Azure,
            ResourceType::NetworkInterface,
            RateTable {
                default_variant: None,
                variant_rates: vec![],
                components: vec![ComponentSpec {
                    name: "interface_hours",
                    model: PricingModel::PerHour,
                    unit: "hour",
                    rate: ComponentRate::Fixed(0.005),
                    description: "Network interface hours (free while attached)",
                }],
                metadata: vec![],
            },
        );

        self.insert(
            Azure,
            ResourceType::ServerlessFunction,
            RateTable {
                default_variant: None,
                variant_rates: vec![],
                components: vec![
                    ComponentSpec {
                        name: "compute_duration",
                        model: PricingModel::Tiered,
                        unit: "gb_second",
                        rate: ComponentRate::Fixed(0.000_016),
                        description: "Function compute time",
                    },
                    ComponentSpec {
                        name: "invocations",
                        model: PricingModel::PerRequestBatch,
                        unit: "1m_requests",
                        rate: ComponentRate::Fixed(0.20),
                        description: "Function executions",
                    },
                    ComponentSpec {
                        name: "egress",
                        model: PricingModel::PerUnitVolume,
                        unit: "gb",
                        rate: ComponentRate::Fixed(0.087),
                        description: "Data transferred out",
                    },
                ],
                metadata: vec![
                    ("free_gb_seconds_per_month", 400_000.0),
                    ("free_requests_per_month", 1_000_000.0),
                    ("free_gb_per_month", 100.0),
                ],
            },
        );

        self.insert(
            Azure,
            ResourceType::DataTransfer,
            RateTable {
                default_variant: None,
                variant_rates: vec![],
                components: vec![ComponentSpec {
                    name: "data_transfer_out",
                    model: PricingModel::PerUnitVolume,
                    unit: "gb",
                    rate: ComponentRate::Fixed(0.087),
                    description: "Data transferred out to the internet",
                }],
                metadata: vec![("free_gb_per_month", 100.0)],
            },
        );
    }

    fn load_gcp(&mut self) {
        use CloudProvider::Gcp;

        self.insert(
            Gcp,
            ResourceType::ComputeInstance,
            RateTable {
                default_variant: Some("e2-micro"),
                variant_rates: vec![
                    ("e2-micro", 0.0084),
                    ("e2-small", 0.0168),
                    ("e2-medium", 0.0335),
                    ("n2-standard-2", 0.0971),
                    ("n2-standard-4", 0.1942),
                ],
                components: vec![ComponentSpec {
                    name: "compute_hours",
                    model: PricingModel::PerHour,
                    unit: "hour",
                    rate: ComponentRate::Variant,
                    description: "On-demand instance hours",
                }],
                metadata: vec![],
            },
        );

        self.insert(
            Gcp,
            ResourceType::BlockVolume,
            RateTable {
                default_variant: Some("pd-balanced"),
                variant_rates: vec![
                    ("pd-balanced", 0.10),
                    ("pd-ssd", 0.17),
                    ("pd-standard", 0.04),
                ],
                components: vec![ComponentSpec {
                    name: "volume_storage",
                    model: PricingModel::PerUnitVolume,
                    unit: "gb_month",
                    rate: ComponentRate::Variant,
                    description: "Persistent disk storage",
                }],
                metadata: vec![],
            },
        );

        self.insert(
            Gcp,
            ResourceType::ObjectBucket,
            RateTable {
                default_variant: Some("standard"),
                variant_rates: vec![
                    ("standard", 0.02),
                    ("nearline", 0.01),
                    ("coldline", 0.004),
                ],
                components: vec![
                    ComponentSpec {
                        name: "bucket_storage",
                        model: PricingModel::PerUnitVolume,
                        unit: "gb_month",
                        rate: ComponentRate::Variant,
                        description: "Object storage",
                    },
                    ComponentSpec {
                        name: "bucket_requests",
                        model: PricingModel::PerRequestBatch,
                        unit: "1k_requests",
                        rate: ComponentRate::Fixed(0.0005),
                        description: "Object operations",
                    },
                ],
                metadata: vec![("free_requests_per_month", 20_000.0)],
            },
        );

        self.insert(
            Gcp,
            ResourceType::ManagedDatabase,
            RateTable {
                default_variant: Some("db-f1-micro"),
                variant_rates: vec![
                    ("db-f1-micro", 0.015),
                    ("db-g1-small", 0.05),
                    ("db-n1-standard-1", 0.0965),
                ],
                components: vec![ComponentSpec {
                    name: "database_hours",
                    model: PricingModel::PerHour,
                    unit: "hour",
                    rate: ComponentRate::Variant,
                    description: "Cloud SQL instance hours",
                }],
                metadata: vec![],
            },
        );

        self.insert(
            Gcp,
            ResourceType::NatGateway,
            RateTable {
                default_variant: None,
                variant_rates: vec![],
                components: vec![
                    ComponentSpec {
                        name: "gateway_hours",
                        model: PricingModel::PerHour,
                        unit: "hour",
                        rate: ComponentRate::Fixed(0.045),
                        description: "Gateway availability",
                    },
                    ComponentSpec {
                        name: "data_processing",
                        model: PricingModel::PerUnitVolume,
                        unit: "gb",
                        rate: ComponentRate::Fixed(0.045),
                        description: "Data processed through the gateway",
                    },
                ],
                metadata: vec![],
            },
        );

        self.insert(
            Gcp,
            ResourceType::FloatingIp,
            RateTable {
                default_variant: None,
                variant_rates: vec![],
                components: vec![ComponentSpec {
                    name: "idle_hours",
                    model: PricingModel::PerHour,
                    unit: "hour",
                    rate: ComponentRate::Fixed(0.005),
                    description: "Static external IP hours (free while attached)",
                }],
                metadata: vec![],
            },
        );

        self.insert(
            Gcp,
            ResourceType::NetworkInterface,
            RateTable {
                default_variant: None,
                variant_rates: vec![],
                components: vec![ComponentSpec {
                    name: "interface_hours",
                    model: PricingModel::PerHour,
                    unit: "hour",
                    rate: ComponentRate::Fixed(0.005),
                    description: "Network interface hours (free while attached)",
                }],
                metadata: vec![],
            },
        );

        self.insert(
            Gcp,
            ResourceType::ServerlessFunction,
            RateTable {
                default_variant: None,
                variant_rates: vec![],
                components: vec![
                    ComponentSpec {
                        name: "compute_duration",
                        model: PricingModel::Tiered,
                        unit: "gb_second",
                        rate: ComponentRate::Fixed(0.000_016_5),
                        description: "Function compute time",
                    },
                    ComponentSpec {
                        name: "invocations",
                        model: PricingModel::PerRequestBatch,
                        unit: "1m_requests",
                        rate: ComponentRate::Fixed(0.40),
                        description: "Function invocations",
                    },
                    ComponentSpec {
                        name: "egress",
                        model: PricingModel::PerUnitVolume,
                        unit: "gb",
                        rate: ComponentRate::Fixed(0.12),
                        description: "Data transferred out",
                    },
                ],
                metadata: vec![
                    ("free_gb_seconds_per_month", 400_000.0),
                    ("free_requests_per_month", 2_000_000.0),
                    ("free_gb_per_month", 100.0),
                ],
            },
        );

        self.insert(
            Gcp,
            ResourceType::DataTransfer,
            RateTable {
                default_variant: None,
                variant_rates: vec![],
                components: vec![ComponentSpec {
                    name: "data_transfer_out",
                    model: PricingModel::PerUnitVolume,
                    unit: "gb",
                    rate: ComponentRate::Fixed(0.12),
                    description: "Data transferred out to the internet",
                }],
                metadata: vec![("free_gb_per_month", 100.0)],
            },
        );
    }

    fn load_region_multipliers(&mut self) {
        use CloudProvider::{Aws, Azure, Gcp};

        let multipliers: [(CloudProvider, &'static str, f64); 15] = [
            (Aws, "us-east-1", 1.0),
            (Aws, "us-west-2", 1.0),
            (Aws, "eu-west-1", 1.02),
            (Aws, "eu-central-1", 1.05),
            (Aws, "ap-southeast-1", 1.08),
            (Aws, "ap-northeast-1", 1.10),
            (Aws, "sa-east-1", 1.25),
            (Azure, "eastus", 1.0),
            (Azure, "westeurope", 1.04),
            (Azure, "southeastasia", 1.08),
            (Azure, "brazilsouth", 1.22),
            (Gcp, "us-central1", 1.0),
            (Gcp, "europe-west1", 1.03),
            (Gcp, "asia-east1", 1.06),
            (Gcp, "southamerica-east1", 1.20),
        ];

        for (provider, region, multiplier) in multipliers {
            self.region_multipliers.insert((provider, region), multiplier);
        }
    }
}

impl Default for PricingCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_known_variant() {
        let catalog = PricingCatalog::builtin();
        let pricing = catalog
            .lookup(
                CloudProvider::Aws,
                ResourceType::ComputeInstance,
                "us-east-1",
                Some("t3.medium"),
            )
            .unwrap();

        assert_eq!(pricing.rate_of("compute_hours"), 0.0416);
        assert!(!pricing.fallback_rate);
        assert_eq!(pricing.source, RateSource::Catalog);
    }

    #[test]
    fn test_lookup_default_variant_is_smallest() {
        let catalog = PricingCatalog::builtin();
        let pricing = catalog
            .lookup(
                CloudProvider::Aws,
                ResourceType::ComputeInstance,
                "us-east-1",
                None,
            )
            .unwrap();

        assert_eq!(pricing.rate_of("compute_hours"), 0.0104);
        assert_eq!(
            pricing.metadata.get("variant").and_then(|v| v.as_str()),
            Some("t3.micro")
        );
    }

    #[test]
    fn test_unknown_variant_resolves_to_zero_with_flag() {
        let catalog = PricingCatalog::builtin();
        let pricing = catalog
            .lookup(
                CloudProvider::Aws,
                ResourceType::ComputeInstance,
                "us-east-1",
                Some("z9.mega"),
            )
            .unwrap();

        assert_eq!(pricing.rate_of("compute_hours"), 0.0);
        assert!(pricing.fallback_rate);
    }

    #[test]
    fn test_unsupported_pair_returns_none() {
        let catalog = PricingCatalog::builtin();
        assert!(catalog
            .lookup(
                CloudProvider::Cloudflare,
                ResourceType::ComputeInstance,
                "us-east-1",
                None,
            )
            .is_none());
    }

    #[test]
    fn test_region_multiplier_applied() {
        let catalog = PricingCatalog::builtin();
        let pricing = catalog
            .lookup(
                CloudProvider::Aws,
                ResourceType::FloatingIp,
                "sa-east-1",
                None,
            )
            .unwrap();

        assert!((pricing.rate_of("idle_hours") - 0.005 * 1.25).abs() < 1e-9);
    }

    #[test]
    fn test_region_multiplier_defaults_to_one() {
        let catalog = PricingCatalog::builtin();
        assert_eq!(
            catalog.region_multiplier(CloudProvider::Aws, "xx-unknown-9"),
            1.0
        );
    }

    #[test]
    fn test_gateway_rates_match_reference_scenario() {
        let catalog = PricingCatalog::builtin();
        let pricing = catalog
            .lookup(CloudProvider::Aws, ResourceType::NatGateway, "us-east-1", None)
            .unwrap();

        assert_eq!(pricing.rate_of("gateway_hours"), 0.045);
        assert_eq!(pricing.rate_of("data_processing"), 0.045);
    }

    #[test]
    fn test_every_supported_provider_covers_every_type() {
        use sea_orm::Iterable;

        let catalog = PricingCatalog::builtin();
        for provider in crate::models::SUPPORTED_PROVIDERS {
            for resource_type in ResourceType::iter() {
                assert!(
                    catalog.supports(provider, resource_type),
                    "{:?} missing table for {:?}",
                    provider,
                    resource_type
                );
            }
        }
    }
}
