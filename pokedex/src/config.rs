//! Service configuration.
//!
//! [`ResolverConfig`] is what the resolver itself needs. [`AppConfig`] is what a binary
//! reads from its environment to build one, along with the store connection settings.

use thiserror::Error;

use pokedex_core::error::DocumentStoreError;

/// Page size used by `find_all` when the caller gives none.
pub const DEFAULT_LIMIT: usize = 7;

/// Database name used when `MONGODB_DATABASE` is unset.
pub const DEFAULT_DATABASE: &str = "pokemonDb";

const MONGODB_VAR: &str = "MONGODB";
const MONGODB_FALLBACK_VAR: &str = "MONGO_URL";
const DATABASE_VAR: &str = "MONGODB_DATABASE";
const LIMIT_VAR: &str = "DEFAULT_LIMIT";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Environment variable {var} is required")]
    Missing { var: &'static str },
    #[error("Environment variable {var} has invalid value {value:?}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
    #[error("Store setup failed: {0}")]
    Store(#[from] DocumentStoreError),
}

/// Settings of a [`PokemonResolver`](crate::resolver::PokemonResolver).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Page size applied when a list request carries no limit.
    pub default_limit: usize,
}

impl ResolverConfig {
    pub fn new(default_limit: usize) -> Self {
        Self { default_limit }
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self { default_limit: DEFAULT_LIMIT }
    }
}

/// Process-level settings read from the environment.
///
/// | variable           | meaning                         | default     |
/// |--------------------|---------------------------------|-------------|
/// | `MONGODB`          | MongoDB connection string       | `MONGO_URL` |
/// | `MONGODB_DATABASE` | database holding the collection | `pokemonDb` |
/// | `DEFAULT_LIMIT`    | list page size                  | `7`         |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub mongodb_url: Option<String>,
    pub database: String,
    pub default_limit: usize,
}

impl AppConfig {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Reads the configuration through `lookup`, which maps a variable name to its value.
    ///
    /// Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |var: &str| lookup(var).filter(|value| !value.trim().is_empty());

        let default_limit = match read(LIMIT_VAR) {
            Some(value) => parse_limit(&value)?,
            None => DEFAULT_LIMIT,
        };

        Ok(Self {
            mongodb_url: read(MONGODB_VAR).or_else(|| read(MONGODB_FALLBACK_VAR)),
            database: read(DATABASE_VAR).unwrap_or_else(|| DEFAULT_DATABASE.to_string()),
            default_limit,
        })
    }

    pub fn resolver(&self) -> ResolverConfig {
        ResolverConfig::new(self.default_limit)
    }
}

fn parse_limit(value: &str) -> Result<usize, ConfigError> {
    let invalid = |reason: String| ConfigError::Invalid {
        var: LIMIT_VAR,
        value: value.to_string(),
        reason,
    };

    match value.trim().parse::<usize>() {
        Ok(0) => Err(invalid("must be greater than zero".to_string())),
        Ok(limit) => Ok(limit),
        Err(e) => Err(invalid(e.to_string())),
    }
}

/// Connects to MongoDB and returns a resolver with its unique indexes in place.
///
/// # Errors
///
/// [`ConfigError::Missing`] when no connection string is configured,
/// [`ConfigError::Store`] when the client cannot be built or the indexes cannot be
/// created.
#[cfg(feature = "mongodb")]
pub async fn connect_mongodb(
    config: &AppConfig,
) -> Result<crate::resolver::PokemonResolver<crate::mongodb::MongoDbStore>, ConfigError> {
    use pokedex_core::{backend::StoreBackendBuilder, store::DocumentStore};

    let url = config
        .mongodb_url
        .as_deref()
        .ok_or(ConfigError::Missing { var: MONGODB_VAR })?;

    let backend = crate::mongodb::MongoDbStore::builder(url, &config.database)
        .build()
        .await?;

    let resolver = crate::resolver::PokemonResolver::new(DocumentStore::new(backend), config.resolver());
    resolver.ensure_indexes().await?;

    tracing::info!(database = %config.database, "connected to MongoDB");

    Ok(resolver)
}
