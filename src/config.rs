use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::length::SizeLimits;
use crate::pricing::PricingRules;

/// Environment variable naming a config file to load instead of the default.
pub const CONFIG_ENV_VAR: &str = "FRAME_DESIGNER_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "assets/designer.json";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesignerConfig {
    /// Inset around the on-screen preview, pixels.
    pub preview_padding_px: f64,
    /// Float gap used by the canvas floater designer, inches.
    pub canvas_float_gap: f64,
    pub export_ppi: f64,
    pub size_limits: SizeLimits,
    pub pricing: PricingRules,
}

impl Default for DesignerConfig {
    fn default() -> Self {
        Self {
            preview_padding_px: 12.0,
            canvas_float_gap: 0.25,
            export_ppi: 96.0,
            size_limits: SizeLimits::default(),
            pricing: PricingRules::default(),
        }
    }
}

impl DesignerConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_json(&text)?;
        log::info!("Loaded designer config from {}", path.display());
        Ok(config)
    }

    /// Loads from `$FRAME_DESIGNER_CONFIG`, then `assets/designer.json`,
    /// falling back to defaults when neither exists.
    pub fn discover() -> Result<Self> {
        let explicit = std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from);
        Self::load_or_default(explicit.as_deref(), Path::new(DEFAULT_CONFIG_PATH))
    }

    fn load_or_default(explicit: Option<&Path>, fallback: &Path) -> Result<Self> {
        match explicit {
            // An explicitly named file must exist.
            Some(path) => Self::load(path),
            None if fallback.exists() => Self::load(fallback),
            None => {
                log::debug!("No designer config found, using defaults");
                Ok(Self::default())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FrameError;
    use std::io::Write;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = DesignerConfig::from_json(
            r#"{"export_ppi": 300, "pricing": {"oversize_fee": 50}}"#,
        )
        .unwrap();
        assert_eq!(config.export_ppi, 300.0);
        assert_eq!(config.pricing.oversize_fee, 50.0);
        assert_eq!(
            config.pricing.oversize_united_inches,
            PricingRules::default().oversize_united_inches
        );
        assert_eq!(config.preview_padding_px, 12.0);
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"preview_padding_px": 4, "size_limits": {{"max_inches": 40}}}}"#
        )
        .unwrap();

        let config = DesignerConfig::load(file.path()).unwrap();
        assert_eq!(config.preview_padding_px, 4.0);
        assert_eq!(config.size_limits.max_inches, 40.0);
        assert_eq!(config.size_limits.min_inches, 1.0);
    }

    #[test]
    fn missing_fallback_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config =
            DesignerConfig::load_or_default(None, &dir.path().join("designer.json")).unwrap();
        assert_eq!(config, DesignerConfig::default());
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        assert!(matches!(
            DesignerConfig::load_or_default(Some(&missing), &missing),
            Err(FrameError::Io(_))
        ));
    }

    #[test]
    fn shipped_config_matches_defaults() {
        let shipped = DesignerConfig::from_json(include_str!("../assets/designer.json")).unwrap();
        assert_eq!(shipped, DesignerConfig::default());
    }

    #[test]
    fn bad_json_is_reported() {
        assert!(matches!(
            DesignerConfig::from_json("{\"export_ppi\": \"high\"}"),
            Err(FrameError::Json(_))
        ));
    }
}
