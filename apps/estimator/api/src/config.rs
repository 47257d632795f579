use core_config::{app_info, server::ServerConfig, AppInfo, ConfigError, FromEnv};

// Import database config from the database library
use database::postgres::PostgresConfig;

// Re-export Environment for use in other modules
pub use core_config::Environment;

/// Application-specific configuration.
/// Composes shared config components from the `core_config` library.
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub database: PostgresConfig,
    pub server: ServerConfig,
    pub environment: Environment,
    /// Run pending migrations at startup (RUN_MIGRATIONS, default true)
    pub run_migrations: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = Environment::from_env();
        let database = PostgresConfig::from_env()?; // Required - fails if DATABASE_URL unset
        let server = ServerConfig::from_env()?; // Defaults: HOST=0.0.0.0, PORT=8080

        let run_migrations = core_config::env_or_default("RUN_MIGRATIONS", "true")
            .eq_ignore_ascii_case("true");

        Ok(Self {
            app: app_info!(),
            database,
            server,
            environment,
            run_migrations,
        })
    }
}
