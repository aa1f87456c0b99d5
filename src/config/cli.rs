use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueHint, builder::BoolishValueParser};

/// Command-line arguments for the Aitoonic binary.
#[derive(Debug, Parser)]
#[command(name = "aitoonic", version, about = "Aitoonic AI tools directory server")]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(long = "config-file", env = "AITOONIC_CONFIG_FILE", value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Run the HTTP server.
    Serve(Box<ServeArgs>),
    /// Render the pre-renderable pages into a directory of HTML files.
    #[command(name = "export-static")]
    ExportStatic(ExportStaticArgs),
}

#[derive(Debug, Args, Default, Clone)]
pub struct DatabaseOverride {
    /// Override the database connection URL.
    #[arg(long = "database-url", value_name = "URL")]
    pub database_url: Option<String>,
}

#[derive(Debug, Args, Default, Clone)]
pub struct SiteOverrides {
    /// Override the public site URL used for canonical links and sitemaps.
    #[arg(long = "site-public-url", value_name = "URL")]
    pub public_url: Option<String>,

    /// Override the brand name shown in titles.
    #[arg(long = "site-brand", value_name = "NAME")]
    pub brand: Option<String>,
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeArgs {
    #[command(flatten)]
    pub overrides: ServeOverrides,
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeOverrides {
    #[command(flatten)]
    pub database: DatabaseOverride,

    #[command(flatten)]
    pub site: SiteOverrides,

    /// Override the listener host.
    #[arg(long = "server-host", value_name = "HOST")]
    pub server_host: Option<String>,

    /// Override the listener port.
    #[arg(long = "server-port", value_name = "PORT")]
    pub server_port: Option<u16>,

    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub log_json: Option<bool>,

    /// Override the database pool size.
    #[arg(long = "database-max-connections", value_name = "COUNT")]
    pub database_max_connections: Option<u32>,

    /// Override how long static pages stay cached.
    #[arg(long = "cache-static-ttl-seconds", value_name = "SECONDS")]
    pub cache_static_ttl_seconds: Option<u64>,

    /// Override how long detail pages stay cached.
    #[arg(long = "cache-dynamic-ttl-seconds", value_name = "SECONDS")]
    pub cache_dynamic_ttl_seconds: Option<u64>,
}

#[derive(Debug, Args, Clone)]
pub struct ExportStaticArgs {
    #[command(flatten)]
    pub database: DatabaseOverride,

    #[command(flatten)]
    pub site: SiteOverrides,

    /// Directory the HTML files are written to.
    #[arg(long = "output-dir", value_name = "DIR", value_hint = ValueHint::DirPath)]
    pub output_dir: Option<PathBuf>,
}
