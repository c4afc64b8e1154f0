// src/config.rs
use anyhow::{Context, Result};
use clap::Parser;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::dataset::ParsePolicy;

#[derive(Parser, Debug, Clone)]
#[command(
    author,
    version,
    about = "Read-only paginated JSON API over the warehouse and retail sales CSV"
)]
pub struct Config {
    /// CSV file loaded once at startup.
    #[arg(long, env = "DATA_PATH", default_value = "data/Warehouse_and_Retail_Sales.csv")]
    pub data_path: PathBuf,

    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// Fail startup on malformed numeric fields instead of reading them as zero.
    #[arg(long, env = "STRICT_ROWS")]
    pub strict_rows: bool,

    /// Fallback log filter when RUST_LOG is unset.
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Config {
    pub fn parse_policy(&self) -> ParsePolicy {
        if self.strict_rows {
            ParsePolicy::Strict
        } else {
            ParsePolicy::Lenient
        }
    }

    pub fn bind_addr(&self) -> Result<SocketAddr> {
        let ip: IpAddr = self
            .host
            .parse()
            .with_context(|| format!("invalid bind host {:?}", self.host))?;
        Ok(SocketAddr::new(ip, self.port))
    }
}
