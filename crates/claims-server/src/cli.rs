//! Command-line argument parsing with clap.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use claims_store::{IdStrategy, LineFormat, StoreConfig};

use crate::config::{DEFAULT_CORS_ORIGIN, ServerConfig};

/// Claims tracking HTTP server.
#[derive(Parser, Debug, Clone)]
#[command(name = "claims-server")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Address to listen on.
    #[arg(short, long, env = "CLAIMS_BIND", default_value = "0.0.0.0:3001")]
    pub bind: SocketAddr,

    /// Claims log file.
    #[arg(short, long, env = "CLAIMS_STORE_PATH", default_value = "claims.log")]
    pub store_path: PathBuf,

    /// Line format of the claims log.
    #[arg(short, long, env = "CLAIMS_FORMAT", value_enum, default_value_t = FormatArg::Legacy)]
    pub format: FormatArg,

    /// How new claim ids are chosen.
    #[arg(long, env = "CLAIMS_ID_STRATEGY", value_enum, default_value_t = IdStrategyArg::Random)]
    pub id_strategy: IdStrategyArg,

    /// Allowed CORS origins. Pass an empty value to allow any origin.
    #[arg(
        long = "cors-origin",
        env = "CLAIMS_CORS_ORIGINS",
        value_delimiter = ',',
        default_value = DEFAULT_CORS_ORIGIN
    )]
    pub cors_origins: Vec<String>,

    /// Emit logs as JSON.
    #[arg(long, env = "CLAIMS_JSON_LOGS")]
    pub json_logs: bool,
}

/// Line format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum FormatArg {
    /// `[timestamp] ID: n, Claim Date: ..., Category: ..., Description: ...`
    #[default]
    Legacy,
    /// One JSON object per line.
    JsonLines,
}

impl From<FormatArg> for LineFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Legacy => Self::Legacy,
            FormatArg::JsonLines => Self::JsonLines,
        }
    }
}

/// Id assignment options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum IdStrategyArg {
    /// Random integer below the configured range.
    #[default]
    Random,
    /// One more than the largest stored id.
    Sequential,
}

impl From<IdStrategyArg> for IdStrategy {
    fn from(arg: IdStrategyArg) -> Self {
        match arg {
            IdStrategyArg::Random => Self::Random,
            IdStrategyArg::Sequential => Self::Sequential,
        }
    }
}

impl Cli {
    /// Build the server configuration from parsed arguments.
    #[must_use]
    pub fn into_config(self) -> ServerConfig {
        let store = StoreConfig::new(self.store_path)
            .with_format(self.format.into())
            .with_id_strategy(self.id_strategy.into());

        let origins = self
            .cors_origins
            .into_iter()
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty());

        ServerConfig::new(self.bind)
            .with_store(store)
            .with_cors_origins(origins)
    }
}
