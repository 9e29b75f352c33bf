//! Boot-time configuration, loaded once in `main` (§6). No YAML/file loader — every value
//! comes from the environment, per the spec's explicit non-goal on config/file loading.

use core_config::{app_info, server::ServerConfig, AppInfo, Environment, FromEnv};
use database::postgres::PostgresConfig;
use database::redis::RedisConfig;

#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub database: PostgresConfig,
    pub redis: RedisConfig,
    pub server: ServerConfig,
    pub environment: Environment,
    /// Secret mixed into every API-key hash (`H(salt || secret || pepper)`, §4.2). Required;
    /// the server refuses to boot without it so a misconfigured deploy can't silently hash
    /// keys with an empty pepper.
    pub api_key_pepper: String,
    /// TTL for cached API-key lookups in Redis (§4.2's caching invariant).
    pub api_key_cache_ttl_seconds: u64,
    /// Upper bound on an ingest request body, enforced before JSON parsing (§4.4).
    pub max_ingest_payload_bytes: usize,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        Ok(Self {
            app: app_info!(),
            database: PostgresConfig::from_env()?,
            redis: RedisConfig::from_env()?,
            server: ServerConfig::from_env()?,
            environment: Environment::from_env(),
            api_key_pepper: core_config::env_required("API_KEY_PEPPER")?,
            api_key_cache_ttl_seconds: core_config::env_or_default("API_KEY_CACHE_TTL_SECONDS", "300")
                .parse()
                .unwrap_or(300),
            max_ingest_payload_bytes: core_config::env_or_default("MAX_INGEST_PAYLOAD_BYTES", "4194304")
                .parse()
                .unwrap_or(4 * 1024 * 1024),
        })
    }
}
