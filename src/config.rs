use std::path::Path;

use anyhow::Context;

use crate::{
    assets::fonts::FontSettings,
    foundation::error::{ThumbkitError, ThumbkitResult},
    render::{backend::RenderSettings, export::ExportSettings},
};

/// Application settings loaded from a JSON file; every field has a default.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub render: RenderSettings,
    pub export: ExportSettings,
    pub fonts: FontSettings,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive such as `info` or `thumbkit=debug,warn`. `RUST_LOG` wins.
    pub level: String,
    /// Emit structured JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl AppConfig {
    pub fn from_json_str(s: &str) -> ThumbkitResult<Self> {
        let config: Self = serde_json::from_str(s).map_err(|e| ThumbkitError::serde(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> ThumbkitResult<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> ThumbkitResult<()> {
        self.export.validate()?;
        if self.logging.level.trim().is_empty() {
            return Err(ThumbkitError::validation("logging.level must not be empty"));
        }
        if let Some(dir) = &self.fonts.fonts_dir
            && !dir.is_dir()
        {
            return Err(ThumbkitError::validation(format!(
                "fonts.fonts_dir '{}' is not a directory",
                dir.display()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
