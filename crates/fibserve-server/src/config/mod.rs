//! Service config loader (strict parsing).

pub mod schema;

use std::fs;
use std::io::ErrorKind;

use fibserve_core::error::{FibServeError, Result};

pub use schema::{LogSection, ServerSection, ServiceConfig};

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "FIBSERVE_CONFIG";
/// Config file used when `FIBSERVE_CONFIG` is unset.
pub const DEFAULT_CONFIG_PATH: &str = "fibserve.yaml";

pub fn load_from_file(path: &str) -> Result<ServiceConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| FibServeError::InvalidConfig(format!("read config failed ({path}): {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<ServiceConfig> {
    let cfg: ServiceConfig = serde_yaml::from_str(s)
        .map_err(|e| FibServeError::InvalidConfig(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Resolve the config the binary should run with.
///
/// An explicit `FIBSERVE_CONFIG` must be readable. The default path is
/// optional: when it is missing the built-in defaults apply.
pub fn load_or_default(explicit: Option<&str>) -> Result<ServiceConfig> {
    if let Some(path) = explicit {
        return load_from_file(path);
    }
    match fs::read_to_string(DEFAULT_CONFIG_PATH) {
        Ok(s) => load_from_str(&s),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(ServiceConfig::default()),
        Err(e) => Err(FibServeError::InvalidConfig(format!(
            "read config failed ({DEFAULT_CONFIG_PATH}): {e}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_ports() {
        let cfg = ServiceConfig::default();
        cfg.validate().unwrap();
        assert_eq!(cfg.server.listen_addr().unwrap().port(), 8000);
        assert_eq!(cfg.server.metrics_addr().unwrap().port(), 8001);
        assert_eq!(cfg.log.filter, "info");
        assert!(cfg.log.file.is_none());
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let err = load_or_default(Some("/nonexistent/fibserve.yaml")).unwrap_err();
        assert_eq!(err.code().as_str(), "invalid_config");
    }
}
