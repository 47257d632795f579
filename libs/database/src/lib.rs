//! Database connectivity for the estimation platform.
//!
//! Provides the PostgreSQL connector used by every persisted repository:
//! pooled sea-orm connections, env-driven configuration, health checks,
//! retry with exponential backoff, and a generic migration runner.
//!
//! # Example
//!
//! ```rust,ignore
//! use database::postgres::{connect_from_config_with_retry, PostgresConfig};
//! use core_config::FromEnv;
//!
//! let config = PostgresConfig::from_env()?;
//! let db = connect_from_config_with_retry(config, None).await?;
//! ```

pub mod common;

#[cfg(feature = "postgres")]
pub mod postgres;

pub use common::{retry, retry_with_backoff, DatabaseError, RetryConfig};
