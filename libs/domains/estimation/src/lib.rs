//! Estimation Domain
//!
//! The cost-estimation engine: given a resource descriptor and a
//! duration, compute an itemized estimate; given a set of resources,
//! aggregate them into an architecture-wide estimate — discovering and
//! pricing the hidden dependencies each resource implicitly provisions
//! along the way.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────┐
//! │ EstimationService  │  ← orchestration + aggregation
//! └───┬──────┬──────┬──┘
//!     │      │      │
//! ┌───▼──┐ ┌─▼────┐ ┌▼──────────────┐
//! │Rate  │ │Cost  │ │Hidden         │
//! │Resolv│ │Strat.│ │Dependency     │
//! │Chain │ │Regis.│ │Resolver       │
//! └───┬──┘ └──────┘ └┬──────────────┘
//!     │              │
//!  rate store      rule store
//!  + catalog       + built-in table
//! ```
//!
//! Rate resolution walks an ordered chain (registered override →
//! persisted store → built-in catalog); per-type cost strategies are the
//! single dispatch mechanism; hidden-dependency expansion is depth- and
//! cycle-guarded.

pub mod calculators;
pub mod entity;
pub mod error;
pub mod handlers;
pub mod hidden;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod resolver;
pub mod service;

// Re-export commonly used types
pub use calculators::{CostStrategy, StrategyRegistry};
pub use error::{EstimationError, EstimationResult};
pub use hidden::{builtin_rules, HiddenDependencyResolver};
pub use memory::InMemoryHiddenDependencyRuleRepository;
pub use models::{
    metadata_keys, CostComponent, CostEstimate, CreateHiddenDependencyRule, EstimateDuration,
    EstimatePeriod, HiddenDependency, HiddenDependencyCost, HiddenDependencyResource,
    HiddenDependencyRule, QuantityFormula, ResourceDescriptor, RuleCondition, VariantSelector,
    COST_EPSILON, HOURS_PER_MONTH,
};
pub use postgres::PgHiddenDependencyRuleRepository;
pub use repository::HiddenDependencyRuleRepository;
pub use resolver::{PricingOverrideFn, RateResolver};
pub use service::EstimationService;
