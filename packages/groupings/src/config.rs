use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use typed_builder::TypedBuilder;

/// Group whose members are global admins, unless overridden.
pub const DEFAULT_ADMINS_GROUP: &str = "uh-settings:groupingAdmins";

/// Per-person store dispatches allowed in flight for one batch call.
pub const DEFAULT_BATCH_CONCURRENCY: usize = 8;

/// Groupings configuration loaded from environment variables
#[derive(Debug, Clone, TypedBuilder)]
#[builder(field_defaults(setter(into)))]
pub struct GroupingsConfig {
    #[builder(default = DEFAULT_ADMINS_GROUP.to_string())]
    pub admins_group: String,
    #[builder(default = DEFAULT_BATCH_CONCURRENCY)]
    pub batch_concurrency: usize,
}

impl GroupingsConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        let batch_concurrency: usize = env::var("GROUPINGS_BATCH_CONCURRENCY")
            .unwrap_or_else(|_| DEFAULT_BATCH_CONCURRENCY.to_string())
            .parse()
            .context("GROUPINGS_BATCH_CONCURRENCY must be a valid number")?;

        if batch_concurrency == 0 {
            anyhow::bail!("GROUPINGS_BATCH_CONCURRENCY must be at least 1");
        }

        Ok(Self {
            admins_group: env::var("GROUPINGS_ADMINS_GROUP")
                .unwrap_or_else(|_| DEFAULT_ADMINS_GROUP.to_string()),
            batch_concurrency,
        })
    }
}

impl Default for GroupingsConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}
