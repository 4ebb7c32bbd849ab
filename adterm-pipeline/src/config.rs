//! Analyzer configuration (TOML).
//!
//! Every section is optional. Without a file, [`AnalyzerConfig::default`]
//! supplies an auto-glass vocabulary and the default report settings.
//!
//! ```toml
//! [vocabulary]
//! competitor_brands = ["safelite", "glass doctor"]
//! high_intent_phrases = ["near me", "windshield repair"]
//!
//! [report]
//! top = 10
//! min_impressions = 10
//! ```

use std::path::Path;

use serde::Deserialize;

use adterm_core::thresholds::{DEFAULT_MIN_IMPRESSIONS, DEFAULT_TOP};
use adterm_core::{Vocabularies, Vocabulary};

use crate::error::{AdTermError, Result};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AnalyzerConfig {
    #[serde(default)]
    pub vocabulary: VocabularyConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct VocabularyConfig {
    #[serde(default = "default_competitor_brands")]
    pub competitor_brands: Vec<String>,
    #[serde(default = "default_high_intent_phrases")]
    pub high_intent_phrases: Vec<String>,
}

impl Default for VocabularyConfig {
    fn default() -> Self {
        Self {
            competitor_brands: default_competitor_brands(),
            high_intent_phrases: default_high_intent_phrases(),
        }
    }
}

fn default_competitor_brands() -> Vec<String> {
    [
        "safelite",
        "glass doctor",
        "novus glass",
        "speedy glass",
        "jiffy glass",
        "mobile glass shop",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_high_intent_phrases() -> Vec<String> {
    [
        "near me",
        "windshield repair",
        "windshield replacement",
        "auto glass repair",
        "auto glass replacement",
        "rock chip",
        "mobile windshield",
        "repair",
        "replacement",
        "cost",
        "price",
        "quote",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReportConfig {
    /// Maximum recommendations and bid rows to emit.
    #[serde(default = "default_top")]
    pub top: usize,
    #[serde(default = "default_min_impressions")]
    pub min_impressions: u64,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            top: default_top(),
            min_impressions: default_min_impressions(),
        }
    }
}

fn default_top() -> usize {
    DEFAULT_TOP
}

fn default_min_impressions() -> u64 {
    DEFAULT_MIN_IMPRESSIONS
}

impl AnalyzerConfig {
    /// Build the classifier vocabularies from this configuration.
    pub fn vocabularies(&self) -> Vocabularies {
        Vocabularies::new(
            Vocabulary::new(&self.vocabulary.competitor_brands),
            Vocabulary::new(&self.vocabulary.high_intent_phrases),
        )
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: AnalyzerConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.report.top == 0 {
            return Err(AdTermError::Config("report.top must be >= 1".into()));
        }

        let lists = [
            ("vocabulary.competitor_brands", &self.vocabulary.competitor_brands),
            ("vocabulary.high_intent_phrases", &self.vocabulary.high_intent_phrases),
        ];
        for (name, phrases) in lists {
            if let Some(pos) = phrases.iter().position(|p| p.trim().is_empty()) {
                return Err(AdTermError::Config(format!(
                    "{}[{}] must not be blank",
                    name, pos
                )));
            }
        }

        Ok(())
    }
}

/// Load configuration from `path`, or the built-in defaults when `None`.
pub fn load_config(path: Option<&Path>) -> Result<AnalyzerConfig> {
    let Some(path) = path else {
        return Ok(AnalyzerConfig::default());
    };

    let content = std::fs::read_to_string(path).map_err(|e| AdTermError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    let config = AnalyzerConfig::from_toml_str(&content)?;

    log::debug!(
        "loaded config from {}: {} competitor brands, {} high-intent phrases",
        path.display(),
        config.vocabulary.competitor_brands.len(),
        config.vocabulary.high_intent_phrases.len()
    );
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_without_file() {
        let config = load_config(None).unwrap();
        assert_eq!(config.report.top, DEFAULT_TOP);
        assert_eq!(config.report.min_impressions, DEFAULT_MIN_IMPRESSIONS);
        let vocab = config.vocabularies();
        assert!(vocab.competitor_brands.matches("safelite windshield"));
        assert!(vocab.high_intent.matches("windshield repair near me"));
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[report]\ntop = 3").unwrap();

        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.report.top, 3);
        assert_eq!(config.report.min_impressions, DEFAULT_MIN_IMPRESSIONS);
        assert!(!config.vocabulary.competitor_brands.is_empty());
    }

    #[test]
    fn custom_vocabulary_replaces_defaults() {
        let config = AnalyzerConfig::from_toml_str(
            r#"
            [vocabulary]
            competitor_brands = ["Rival Brand X"]
            high_intent_phrases = ["near me"]
            "#,
        )
        .unwrap();
        let vocab = config.vocabularies();
        assert!(vocab.competitor_brands.matches("rival brand x"));
        assert!(!vocab.competitor_brands.matches("safelite"));
        assert_eq!(vocab.high_intent.len(), 1);
    }

    #[test]
    fn zero_top_is_rejected() {
        let err = AnalyzerConfig::from_toml_str("[report]\ntop = 0\n").unwrap_err();
        assert!(matches!(err, AdTermError::Config(_)));
    }

    #[test]
    fn blank_phrase_is_rejected() {
        let err = AnalyzerConfig::from_toml_str(
            "[vocabulary]\ncompetitor_brands = [\"safelite\", \"  \"]\n",
        )
        .unwrap_err();
        match err {
            AdTermError::Config(msg) => assert!(msg.contains("competitor_brands[1]")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = AnalyzerConfig::from_toml_str("[report\ntop = 3").unwrap_err();
        assert!(matches!(err, AdTermError::Toml(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_config(Some(Path::new("/nonexistent/adterm.toml"))).unwrap_err();
        assert!(matches!(err, AdTermError::Io { .. }));
    }
}
