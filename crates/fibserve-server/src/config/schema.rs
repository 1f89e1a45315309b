use std::net::SocketAddr;

use serde::Deserialize;
use fibserve_core::error::{FibServeError, Result};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    pub version: u32,

    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub log: LogSection,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            version: 1,
            server: ServerSection::default(),
            log: LogSection::default(),
        }
    }
}

impl ServiceConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(FibServeError::InvalidConfig(format!(
                "unsupported config version {}",
                self.version
            )));
        }

        self.server.validate()?;
        self.log.validate()?;

        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    /// Address of the Fibonacci endpoint.
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Address of the dedicated metrics scrape endpoint.
    #[serde(default = "default_metrics_listen")]
    pub metrics_listen: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            metrics_listen: default_metrics_listen(),
        }
    }
}

impl ServerSection {
    pub fn validate(&self) -> Result<()> {
        let listen = self.listen_addr()?;
        let metrics = self.metrics_addr()?;
        if listen == metrics {
            return Err(FibServeError::InvalidConfig(
                "server.listen and server.metrics_listen must differ".into(),
            ));
        }
        Ok(())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        parse_addr("server.listen", &self.listen)
    }

    pub fn metrics_addr(&self) -> Result<SocketAddr> {
        parse_addr("server.metrics_listen", &self.metrics_listen)
    }
}

fn parse_addr(field: &str, s: &str) -> Result<SocketAddr> {
    s.parse()
        .map_err(|e| FibServeError::InvalidConfig(format!("{field} must be a valid SocketAddr ({s}): {e}")))
}

fn default_listen() -> String {
    "0.0.0.0:8000".into()
}
fn default_metrics_listen() -> String {
    "0.0.0.0:8001".into()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogSection {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    #[serde(default = "default_filter")]
    pub filter: String,

    /// Optional file that receives a copy of every log line.
    #[serde(default)]
    pub file: Option<String>,
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            filter: default_filter(),
            file: None,
        }
    }
}

impl LogSection {
    pub fn validate(&self) -> Result<()> {
        if self.filter.trim().is_empty() {
            return Err(FibServeError::InvalidConfig("log.filter must not be empty".into()));
        }
        if matches!(&self.file, Some(f) if f.trim().is_empty()) {
            return Err(FibServeError::InvalidConfig("log.file must not be empty when set".into()));
        }
        Ok(())
    }
}

fn default_filter() -> String {
    "info".into()
}
