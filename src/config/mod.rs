//! Configuration layer: typed settings with layered precedence (file → env → CLI).

mod cli;

pub use cli::{
    CliArgs, Command, DatabaseOverride, ExportStaticArgs, ServeArgs, ServeOverrides,
    SiteOverrides,
};

use std::{net::SocketAddr, num::NonZeroU32, path::PathBuf, str::FromStr, time::Duration};

use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;
use url::Url;

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "aitoonic";
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 8;
const DEFAULT_STATIC_TTL_SECS: u64 = 3600;
const DEFAULT_DYNAMIC_TTL_SECS: u64 = 300;
const DEFAULT_PUBLIC_URL: &str = "https://aitoonic.com";
const DEFAULT_BRAND: &str = "Aitoonic";
const DEFAULT_EXPORT_DIR: &str = "dist/static";

/// Fully-resolved deployment settings after precedence resolution and validation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub logging: LoggingSettings,
    pub database: DatabaseSettings,
    pub cache: CacheSettings,
    pub site: SiteSettings,
    pub export: ExportSettings,
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub addr: SocketAddr,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    Json,
    Compact,
}

#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    pub url: Option<String>,
    pub max_connections: NonZeroU32,
}

/// Lifetimes of cached pages per route class.
#[derive(Debug, Clone, Copy)]
pub struct CacheSettings {
    pub static_ttl: Duration,
    pub dynamic_ttl: Duration,
}

#[derive(Debug, Clone)]
pub struct SiteSettings {
    pub public_url: String,
    pub brand: String,
}

#[derive(Debug, Clone)]
pub struct ExportSettings {
    pub output_dir: PathBuf,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl LoadError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Load settings using the configured precedence (file → environment → CLI).
pub fn load(cli: &CliArgs) -> Result<Settings, LoadError> {
    let mut builder = Config::builder()
        .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false))
        .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = cli.config_file.as_ref() {
        builder = builder.add_source(File::from(path.as_path()).required(true));
    }

    builder = builder.add_source(Environment::with_prefix("AITOONIC").separator("__"));

    let mut raw: RawSettings = builder.build()?.try_deserialize()?;

    match cli.command.as_ref() {
        Some(Command::Serve(args)) => raw.apply_serve_overrides(&args.overrides),
        Some(Command::ExportStatic(args)) => raw.apply_export_overrides(args),
        None => raw.apply_serve_overrides(&ServeOverrides::default()),
    }

    Settings::from_raw(raw)
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    server: RawServerSettings,
    logging: RawLoggingSettings,
    database: RawDatabaseSettings,
    cache: RawCacheSettings,
    site: RawSiteSettings,
    export: RawExportSettings,
}

impl RawSettings {
    fn apply_serve_overrides(&mut self, overrides: &ServeOverrides) {
        if let Some(host) = overrides.server_host.as_ref() {
            self.server.host = Some(host.clone());
        }
        if let Some(port) = overrides.server_port {
            self.server.port = Some(port);
        }
        if let Some(level) = overrides.log_level.as_ref() {
            self.logging.level = Some(level.clone());
        }
        if let Some(json) = overrides.log_json {
            self.logging.json = Some(json);
        }
        if let Some(max) = overrides.database_max_connections {
            self.database.max_connections = Some(max);
        }
        if let Some(seconds) = overrides.cache_static_ttl_seconds {
            self.cache.static_ttl_seconds = Some(seconds);
        }
        if let Some(seconds) = overrides.cache_dynamic_ttl_seconds {
            self.cache.dynamic_ttl_seconds = Some(seconds);
        }

        self.apply_database_override(&overrides.database);
        self.apply_site_overrides(&overrides.site);
    }

    fn apply_export_overrides(&mut self, args: &ExportStaticArgs) {
        if let Some(dir) = args.output_dir.as_ref() {
            self.export.output_dir = Some(dir.clone());
        }

        self.apply_database_override(&args.database);
        self.apply_site_overrides(&args.site);
    }

    fn apply_database_override(&mut self, overrides: &DatabaseOverride) {
        if let Some(url) = overrides.database_url.as_ref() {
            self.database.url = Some(url.clone());
        }
    }

    fn apply_site_overrides(&mut self, overrides: &SiteOverrides) {
        if let Some(url) = overrides.public_url.as_ref() {
            self.site.public_url = Some(url.clone());
        }
        if let Some(brand) = overrides.brand.as_ref() {
            self.site.brand = Some(brand.clone());
        }
    }
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let RawSettings {
            server,
            logging,
            database,
            cache,
            site,
            export,
        } = raw;

        Ok(Self {
            server: build_server_settings(server)?,
            logging: build_logging_settings(logging)?,
            database: build_database_settings(database)?,
            cache: build_cache_settings(cache)?,
            site: build_site_settings(site)?,
            export: build_export_settings(export)?,
        })
    }
}

fn build_server_settings(server: RawServerSettings) -> Result<ServerSettings, LoadError> {
    let host = server.host.unwrap_or_else(|| DEFAULT_HOST.to_string());

    let port = server.port.unwrap_or(DEFAULT_PORT);
    if port == 0 {
        return Err(LoadError::invalid(
            "server.port",
            "port must be greater than zero",
        ));
    }

    let addr = parse_socket_addr(&host, port)
        .map_err(|reason| LoadError::invalid("server.addr", reason))?;

    Ok(ServerSettings { addr })
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let level = match logging.level {
        Some(level) => LevelFilter::from_str(level.as_str()).map_err(|err| {
            LoadError::invalid("logging.level", format!("failed to parse: {err}"))
        })?,
        None => LevelFilter::INFO,
    };

    let format = if logging.json.unwrap_or(false) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };

    Ok(LoggingSettings { level, format })
}

fn build_database_settings(database: RawDatabaseSettings) -> Result<DatabaseSettings, LoadError> {
    let url = database.url.and_then(|value| {
        let trimmed = value.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    });

    let max_connections = non_zero_u32(
        database
            .max_connections
            .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
            .into(),
        "database.max_connections",
    )?;

    Ok(DatabaseSettings {
        url,
        max_connections,
    })
}

fn build_cache_settings(cache: RawCacheSettings) -> Result<CacheSettings, LoadError> {
    let static_secs = cache.static_ttl_seconds.unwrap_or(DEFAULT_STATIC_TTL_SECS);
    if static_secs == 0 {
        return Err(LoadError::invalid(
            "cache.static_ttl_seconds",
            "must be greater than zero",
        ));
    }

    let dynamic_secs = cache.dynamic_ttl_seconds.unwrap_or(DEFAULT_DYNAMIC_TTL_SECS);
    if dynamic_secs == 0 {
        return Err(LoadError::invalid(
            "cache.dynamic_ttl_seconds",
            "must be greater than zero",
        ));
    }

    Ok(CacheSettings {
        static_ttl: Duration::from_secs(static_secs),
        dynamic_ttl: Duration::from_secs(dynamic_secs),
    })
}

fn build_site_settings(site: RawSiteSettings) -> Result<SiteSettings, LoadError> {
    let public_url = site
        .public_url
        .map(|value| value.trim().to_string())
        .unwrap_or_else(|| DEFAULT_PUBLIC_URL.to_string());
    let parsed = Url::parse(&public_url)
        .map_err(|err| LoadError::invalid("site.public_url", format!("invalid url: {err}")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(LoadError::invalid(
            "site.public_url",
            "scheme must be http or https",
        ));
    }

    let brand = site
        .brand
        .map(|value| value.trim().to_string())
        .unwrap_or_else(|| DEFAULT_BRAND.to_string());
    if brand.is_empty() {
        return Err(LoadError::invalid("site.brand", "must not be empty"));
    }

    Ok(SiteSettings { public_url, brand })
}

fn build_export_settings(export: RawExportSettings) -> Result<ExportSettings, LoadError> {
    let output_dir = export
        .output_dir
        .unwrap_or_else(|| PathBuf::from(DEFAULT_EXPORT_DIR));
    if output_dir.as_os_str().is_empty() {
        return Err(LoadError::invalid(
            "export.output_dir",
            "path must not be empty",
        ));
    }

    Ok(ExportSettings { output_dir })
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawServerSettings {
    host: Option<String>,
    port: Option<u16>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawDatabaseSettings {
    url: Option<String>,
    max_connections: Option<u32>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawCacheSettings {
    static_ttl_seconds: Option<u64>,
    dynamic_ttl_seconds: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSiteSettings {
    public_url: Option<String>,
    brand: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawExportSettings {
    output_dir: Option<PathBuf>,
}

fn parse_socket_addr(host: &str, port: u16) -> Result<SocketAddr, String> {
    let candidate = format!("{host}:{port}");
    candidate
        .parse()
        .map_err(|err| format!("invalid address `{candidate}`: {err}"))
}

fn non_zero_u32(value: u64, key: &'static str) -> Result<NonZeroU32, LoadError> {
    let value_u32: u32 = value
        .try_into()
        .map_err(|_| LoadError::invalid(key, "value exceeds supported range for u32"))?;
    NonZeroU32::new(value_u32).ok_or_else(|| LoadError::invalid(key, "must be greater than zero"))
}

/// Resolve configuration using the supplied CLI arguments, returning both for downstream use.
pub fn load_with_cli() -> Result<(CliArgs, Settings), LoadError> {
    let args = CliArgs::parse();
    let settings = load(&args)?;
    Ok((args, settings))
}

#[cfg(test)]
mod tests;
