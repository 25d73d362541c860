use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Parser;

use camomile::config::{DEFAULT_BIND_ADDR, DEFAULT_MAX_SIZE, DEFAULT_SERVER_NAME};
use camomile::initialization::init_logger_with;
use camomile::{CamoServer, LogFormat, LogLevel, ProxySettings};

#[derive(Debug, Parser)]
#[command(
    name = "camomile",
    about = "SSRF-safe HTTP image proxy for HMAC-signed image URLs."
)]
struct Opt {
    /// Shared HMAC secret (falls back to the CAMOMILE_SECRET environment variable)
    #[arg(long)]
    secret: Option<String>,

    /// Socket address to bind
    #[arg(long, default_value = DEFAULT_BIND_ADDR)]
    bind: SocketAddr,

    /// Maximum upstream body size in bytes
    #[arg(long, default_value_t = DEFAULT_MAX_SIZE)]
    max_size: u64,

    /// Server name emitted in the Via response header
    #[arg(long, default_value = DEFAULT_SERVER_NAME)]
    server_name: String,

    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    log_format: LogFormat,
}

#[tokio::main]
async fn main() -> Result<()> {
    let opt = Opt::parse();

    init_logger_with(opt.log_level.clone().into(), opt.log_format.clone())
        .context("Failed to initialize logger")?;

    let secret = opt
        .secret
        .or_else(|| std::env::var("CAMOMILE_SECRET").ok())
        .unwrap_or_default();

    let server = CamoServer::new(ProxySettings {
        secret,
        max_size: opt.max_size,
        server_name: opt.server_name,
    })?;

    server.listen(opt.bind).await
}
