//! Configuration for jurisd.
//!
//! Loads settings from /etc/juris/config.toml or uses defaults. Every field
//! has a serde default, so a partial file is fine and a missing file just
//! means stock settings.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use juris_common::KeywordLexicon;

/// Default config file path
pub const CONFIG_PATH: &str = "/etc/juris/config.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JurisConfig {
    /// Bind address for the HTTP server
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Optional lexicon override; the built-in table is used when unset
    #[serde(default)]
    pub lexicon_path: Option<PathBuf>,

    /// Hours a pending_acceptance claim may idle before the case view flags
    /// it stale for external collaborators to act on
    #[serde(default = "default_stale_claim_hours")]
    pub stale_claim_hours: u64,
}

fn default_listen_addr() -> String {
    // Localhost only; fronting proxies own external exposure
    "127.0.0.1:7870".to_string()
}

fn default_stale_claim_hours() -> u64 {
    48
}

impl Default for JurisConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            lexicon_path: None,
            stale_claim_hours: default_stale_claim_hours(),
        }
    }
}

impl JurisConfig {
    /// Load from a TOML file; a missing file falls back to defaults
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            warn!("config file {} not found, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: JurisConfig = toml::from_str(&content)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        info!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Resolve the lexicon this deployment should classify with
    pub fn load_lexicon(&self) -> Result<KeywordLexicon> {
        match &self.lexicon_path {
            Some(path) => {
                let lexicon = KeywordLexicon::load(path)?;
                info!(
                    "loaded lexicon {} from {}",
                    lexicon.version,
                    path.display()
                );
                Ok(lexicon)
            }
            None => Ok(KeywordLexicon::builtin().clone()),
        }
    }

    pub fn stale_claim_secs(&self) -> i64 {
        (self.stale_claim_hours * 3600) as i64
    }
}
