use serde::Deserialize;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Prefix of the environment variables read by the server
/// (`BLEND_DATABASE_URL`, `BLEND_PORT`, ...).
pub const ENV_PREFIX: &str = "BLEND";

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default)]
    pub database_url: Option<String>,
    pub host: String,
    pub port: u16,
    pub public_dir: PathBuf,
}

impl ServerConfig {
    pub fn listen_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }

    /// The database connection string. The server cannot run without one.
    pub fn require_database_url(&self) -> anyhow::Result<&str> {
        match self.database_url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => Ok(url),
            _ => anyhow::bail!("{}_DATABASE_URL environment variable not set", ENV_PREFIX),
        }
    }
}

/// Defaults, then `config/server.*` if present, then `BLEND_*` variables.
pub fn load_server_config() -> anyhow::Result<ServerConfig> {
    build_server_config(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
}

fn build_server_config(env: config::Environment) -> anyhow::Result<ServerConfig> {
    let settings = config::Config::builder()
        .set_default("host", "0.0.0.0")?
        .set_default("port", 3000)?
        .set_default("public_dir", "public")?
        .add_source(config::File::with_name("config/server").required(false))
        .add_source(env)
        .build()?;

    Ok(settings.try_deserialize()?)
}
