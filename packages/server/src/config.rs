use std::path::PathBuf;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    pub allow_origins: Vec<String>,
    pub max_age: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    /// Token lifetime in hours.
    pub token_ttl_hours: i64,
    /// Bootstrap admin credentials, seeded at startup when both are set.
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MediaConfig {
    /// Directory uploaded files are stored under.
    pub root_dir: PathBuf,
    /// Public base URL media URLs are built from (no trailing slash).
    pub public_base: String,
    /// Maximum upload size in bytes.
    pub max_file_size: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub media: MediaConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 5000)?
            .set_default("server.cors.allow_origins", Vec::<String>::new())?
            .set_default("server.cors.max_age", 3600)?
            .set_default("auth.token_ttl_hours", 128)?
            .set_default("media.root_dir", "./media")?
            .set_default("media.public_base", "http://127.0.0.1:5000")?
            .set_default("media.max_file_size", 16 * 1024 * 1024)?
            // Load from config/config.toml
            .add_source(File::with_name("config/config").required(false))
            // Override from environment (e.g., ARTCENTER__AUTH__JWT_SECRET)
            .add_source(Environment::with_prefix("ARTCENTER").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
