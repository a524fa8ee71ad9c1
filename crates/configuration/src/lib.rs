use crate::error::ConfigError;
use std::env;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use logging::init_logging;
pub use settings::{
    AuthSettings, Config, DatabaseSettings, LoggingSettings, MAX_TOKEN_TTL_MINUTES,
    ServerOverrides, ServerSettings,
};

/// The configuration file looked up in the working directory. It is optional.
pub const CONFIG_FILE: &str = "salescast.toml";

/// Development fallback for `auth.jwt_secret`, matching the historical default.
pub const DEFAULT_JWT_SECRET: &str = "mytoken";

/// Prefix for structured environment overrides, e.g. `SALESCAST__SERVER__PORT=8080`.
pub const ENV_PREFIX: &str = "SALESCAST";

/// Loads the application configuration from `salescast.toml` and the environment.
///
/// This function is the primary entry point for this crate. It loads `.env`,
/// layers defaults, the optional file and environment variables, then
/// deserializes and validates the result.
pub fn load_config() -> Result<Config, ConfigError> {
    dotenvy::dotenv().ok();
    load_config_from(Path::new(CONFIG_FILE))
}

/// Same as [`load_config`] but reads the given file and does not touch `.env`.
///
/// Priority, lowest first: built-in defaults, the file, `SALESCAST__*`
/// variables, then the plain `DATABASE_URL` and `JWT_SECRET` variables.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 5000_i64)?
        .set_default("database.max_connections", 10_i64)?
        .set_default("database.connect_timeout_secs", 5_i64)?
        .set_default("auth.jwt_secret", DEFAULT_JWT_SECRET)?
        .set_default("auth.token_ttl_minutes", 15_i64)?
        .set_default("logging.level", "info")?
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .set_override_option("database.url", env::var("DATABASE_URL").ok())?
        .set_override_option("auth.jwt_secret", env::var("JWT_SECRET").ok())?
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;

    Ok(config)
}
