//! Optional TOML config file for the kitchen binary.
//!
//! Every field is optional and overridden by whichever CLI flag was
//! explicitly passed — the file only supplies defaults for flags the caller
//! left unset.

use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Default)]
pub struct KitchenFileConfig {
    pub kitchen_name: Option<String>,
    pub hub: Option<String>,
    pub interface: Option<String>,
    pub filter: Option<String>,
    pub chefs: Option<Vec<String>>,
    pub poke_interval: Option<u64>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("reading config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing config file: {0}")]
    Parse(#[from] toml::de::Error),
}

pub fn load(path: &Path) -> Result<KitchenFileConfig, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(toml::from_str(&raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_partial_config() {
        let cfg: KitchenFileConfig = toml::from_str(
            r#"
            kitchen_name = "K"
            chefs = ["ArpChef"]
            "#,
        )
        .unwrap();
        assert_eq!(cfg.kitchen_name.as_deref(), Some("K"));
        assert_eq!(cfg.chefs, Some(vec!["ArpChef".to_string()]));
        assert_eq!(cfg.hub, None);
    }

    #[test]
    fn empty_config_is_all_none() {
        let cfg: KitchenFileConfig = toml::from_str("").unwrap();
        assert!(cfg.kitchen_name.is_none());
        assert!(cfg.poke_interval.is_none());
    }
}
