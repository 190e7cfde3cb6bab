//! Recognized configuration surface for the layout reconstruction pipeline.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Standard PDF page dimensions in points, used when a merge threshold is
/// configured as "absolute points" rather than page-normalized.
pub const ABSOLUTE_PAGE_WIDTH_POINTS: f32 = 612.0;
pub const ABSOLUTE_PAGE_HEIGHT_POINTS: f32 = 792.0;

/// OCR collaborator hints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrConfig {
    /// Preferred recognition languages, passed to the OCR collaborator.
    #[serde(default)]
    pub languages: Vec<String>,
    /// Domain vocabulary hints.
    #[serde(default)]
    pub custom_words: Vec<String>,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self { languages: vec!["en".to_string()], custom_words: Vec::new() }
    }
}

/// Header/footer strip filtering and merge-distance thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingConfig {
    #[serde(default = "default_true")]
    pub enable_header_footer_detection: bool,
    /// `[min_y, max_y]` normalized strip at the top of the page whose content is dropped.
    #[serde(default = "default_header_region")]
    pub page_header_region: [f32; 2],
    /// `[min_y, max_y]` normalized strip at the bottom of the page whose content is dropped.
    #[serde(default = "default_footer_region")]
    pub page_footer_region: [f32; 2],
    #[serde(default = "default_merge_distance")]
    pub merge_distance_threshold: f32,
    #[serde(default = "default_horizontal_merge_threshold")]
    pub horizontal_merge_threshold: f32,
    #[serde(default = "default_true")]
    pub is_merge_distance_normalized: bool,
    #[serde(default = "default_true")]
    pub is_horizontal_merge_threshold_normalized: bool,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            enable_header_footer_detection: true,
            page_header_region: default_header_region(),
            page_footer_region: default_footer_region(),
            merge_distance_threshold: default_merge_distance(),
            horizontal_merge_threshold: default_horizontal_merge_threshold(),
            is_merge_distance_normalized: true,
            is_horizontal_merge_threshold_normalized: true,
        }
    }
}

impl ProcessingConfig {
    /// Vertical (side-by-side) merge threshold in normalized page units.
    pub fn normalized_vertical_threshold(&self) -> f32 {
        if self.is_merge_distance_normalized {
            self.merge_distance_threshold
        } else {
            self.merge_distance_threshold / ABSOLUTE_PAGE_HEIGHT_POINTS
        }
    }

    /// Horizontal (same-line) merge threshold in normalized page units.
    pub fn normalized_horizontal_threshold(&self) -> f32 {
        if self.is_horizontal_merge_threshold_normalized {
            self.horizontal_merge_threshold
        } else {
            self.horizontal_merge_threshold / ABSOLUTE_PAGE_WIDTH_POINTS
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let [hlo, hhi] = self.page_header_region;
        if hlo > hhi {
            return Err(ConfigError::InvalidRegion { field: "page_header_region", min_y: hlo, max_y: hhi });
        }
        let [flo, fhi] = self.page_footer_region;
        if flo > fhi {
            return Err(ConfigError::InvalidRegion { field: "page_footer_region", min_y: flo, max_y: fhi });
        }
        Ok(())
    }
}

/// Output-side options consumed only by the Markdown emitter, not the core pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileManagementConfig {
    #[serde(default)]
    pub add_table_of_contents: bool,
}

/// `tracing`-backed logging configuration for the CLI edge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_log_level(), format: LogFormat::default() }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

/// The full recognized configuration surface for a pipeline run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub ocr: OcrConfig,
    #[serde(default)]
    pub processing: ProcessingConfig,
    #[serde(default)]
    pub file_management: FileManagementConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl PipelineConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: PipelineConfig = toml::from_str(input)?;
        config.processing.validate()?;
        Ok(config)
    }

    pub fn from_json_str(input: &str) -> Result<Self, ConfigError> {
        let config: PipelineConfig = serde_json::from_str(input)?;
        config.processing.validate()?;
        Ok(config)
    }
}

fn default_true() -> bool {
    true
}

fn default_header_region() -> [f32; 2] {
    [0.92, 1.0]
}

fn default_footer_region() -> [f32; 2] {
    [0.0, 0.06]
}

fn default_merge_distance() -> f32 {
    0.02
}

fn default_horizontal_merge_threshold() -> f32 {
    0.15
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        let config = PipelineConfig::default();
        assert!(config.processing.validate().is_ok());
    }

    #[test]
    fn test_invalid_region_rejected() {
        let mut config = PipelineConfig::default();
        config.processing.page_header_region = [1.0, 0.5];
        assert!(config.processing.validate().is_err());
    }

    #[test]
    fn test_normalized_threshold_passthrough() {
        let mut config = ProcessingConfig::default();
        config.is_horizontal_merge_threshold_normalized = true;
        config.horizontal_merge_threshold = 0.1;
        assert_eq!(config.normalized_horizontal_threshold(), 0.1);
    }

    #[test]
    fn test_absolute_threshold_conversion() {
        let mut config = ProcessingConfig::default();
        config.is_horizontal_merge_threshold_normalized = false;
        config.horizontal_merge_threshold = 61.2; // 0.1 * 612
        assert!((config.normalized_horizontal_threshold() - 0.1).abs() < 1e-4);
    }

    #[test]
    fn test_vertical_absolute_uses_height() {
        let mut config = ProcessingConfig::default();
        config.is_merge_distance_normalized = false;
        config.merge_distance_threshold = 79.2; // 0.1 * 792
        assert!((config.normalized_vertical_threshold() - 0.1).abs() < 1e-4);
    }

    #[test]
    fn test_from_toml_str_roundtrip() {
        let toml_str = r#"
            [ocr]
            languages = ["en", "zh-Hans"]

            [processing]
            merge_distance_threshold = 0.03
        "#;
        let config = PipelineConfig::from_toml_str(toml_str).unwrap();
        assert_eq!(config.ocr.languages, vec!["en", "zh-Hans"]);
        assert_eq!(config.processing.merge_distance_threshold, 0.03);
        // Fields absent from the TOML fall back to their defaults.
        assert!(config.processing.enable_header_footer_detection);
    }
}
