use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::clock::{SystemClock, parse_timezone};

const CONFIG_ENV_VAR: &str = "RANGEPICK_CONFIG";
const CONFIG_DIR_NAME: &str = "rangepick";
const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// IANA zone used to decide which day is "today"; machine local when unset.
    pub timezone: Option<String>,
    pub color: bool,

    #[serde(skip)]
    pub loaded_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timezone: None,
            color: true,
            loaded_file: None,
        }
    }
}

impl Config {
    #[tracing::instrument(skip(config_override))]
    pub fn load(config_override: Option<&Path>) -> anyhow::Result<Self> {
        match resolve_config_path(config_override)? {
            Some(path) => {
                info!(config = %path.display(), "loading config");
                Self::load_file(&path)
            }
            None => {
                debug!("no config file found; using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn load_file(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let mut cfg = Self::from_toml(&text)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        cfg.loaded_file = Some(path.to_path_buf());
        Ok(cfg)
    }

    pub fn from_toml(text: &str) -> anyhow::Result<Self> {
        let cfg: Config = toml::from_str(text)?;
        if let Some(tz) = cfg.timezone.as_deref() {
            parse_timezone(tz, "config")?;
        }
        Ok(cfg)
    }

    #[tracing::instrument(skip(self, overrides))]
    pub fn apply_overrides<I>(&mut self, overrides: I) -> anyhow::Result<()>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (k, v) in overrides {
            let key = k.strip_prefix("rc.").unwrap_or(&k).trim().to_string();
            let value = v.trim();
            debug!(key = %key, value = %value, "applying override");

            match key.as_str() {
                "timezone" => {
                    if value.is_empty() || value.eq_ignore_ascii_case("local") {
                        self.timezone = None;
                    } else {
                        parse_timezone(value, "override")?;
                        self.timezone = Some(value.to_string());
                    }
                }
                "color" => {
                    self.color = parse_bool(value)
                        .ok_or_else(|| anyhow!("invalid color setting: {value}"))?;
                }
                other => warn!(key = %other, "ignoring unknown config key"),
            }
        }
        Ok(())
    }

    pub fn clock(&self) -> anyhow::Result<SystemClock> {
        match self.timezone.as_deref() {
            Some(raw) => Ok(SystemClock::in_timezone(parse_timezone(raw, "config")?)),
            None => Ok(SystemClock::local()),
        }
    }
}

#[tracing::instrument(skip(override_path))]
fn resolve_config_path(override_path: Option<&Path>) -> anyhow::Result<Option<PathBuf>> {
    if let Some(path) = override_path {
        return Ok(Some(path.to_path_buf()));
    }

    if let Ok(raw) = std::env::var(CONFIG_ENV_VAR) {
        let trimmed = raw.trim();
        if trimmed == "/dev/null" {
            return Ok(None);
        }
        if !trimmed.is_empty() {
            return Ok(Some(PathBuf::from(trimmed)));
        }
    }

    let Some(dir) = dirs::config_dir() else {
        debug!("cannot determine config directory");
        return Ok(None);
    };
    let candidate = dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME);
    if candidate.exists() {
        return Ok(Some(candidate));
    }

    Ok(None)
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "y" | "yes" | "on" | "true" => Some(true),
        "0" | "n" | "no" | "off" | "false" => Some(false),
        _ => None,
    }
}
