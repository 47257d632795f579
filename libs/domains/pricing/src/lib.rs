//! Pricing Domain
//!
//! Rate cards for billable cloud resources: the built-in static catalog,
//! the persisted rate store behind [`RateRepository`], and the rates API.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │   Service   │  ← Rate store CRUD, catalog lookups
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Data access (trait + Postgres/in-memory impls)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Rate rows, rate cards, enums
//! └─────────────┘
//! ```
//!
//! The estimation engine consumes this domain through [`RateRepository`]
//! (persisted tier) and [`PricingCatalog`] (built-in tier).

pub mod catalog;
pub mod entity;
pub mod error;
pub mod handlers;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use catalog::PricingCatalog;
pub use error::{PricingError, PricingResult};
pub use memory::InMemoryRateRepository;
pub use models::{
    CloudProvider, CreatePricingRate, Currency, PriceComponent, PricingModel, PricingRate,
    RateFilter, RateSource, ResourcePricing, ResourceType, UpdatePricingRate,
    SUPPORTED_PROVIDERS,
};
pub use postgres::PgRateRepository;
pub use repository::RateRepository;
pub use service::RateCardService;
