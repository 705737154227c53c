use crate::rules::names;
use crate::types::tags;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

// Default value functions for serde
fn default_true() -> bool {
    true
}

fn default_workers() -> usize {
    1
}

fn default_one() -> usize {
    1
}

fn default_max_marriages() -> usize {
    2
}

fn default_person_tags() -> Vec<TagLimit> {
    [tags::BIRTH, tags::DEATH, tags::NAME]
        .into_iter()
        .map(|tag| TagLimit {
            tag: tag.to_string(),
            max: 1,
        })
        .collect()
}

fn default_allowed_marriage_types() -> Vec<String> {
    vec![
        "CIVIL".to_string(),
        "RELIGIOUS".to_string(),
        "NOT GIVEN".to_string(),
    ]
}

fn default_limited_marriage_types() -> Vec<String> {
    vec!["CIVIL".to_string(), "RELIGIOUS".to_string()]
}

fn default_rules() -> Vec<RuleConfig> {
    names::ALL
        .iter()
        .map(|name| RuleConfig {
            name: name.to_string(),
            enabled: true,
        })
        .collect()
}

/// Language of the report header and descriptions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    De,
    En,
}

impl Language {
    /// Name as written in config files and on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::De => "de",
            Language::En => "en",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationConfig {
    #[serde(default)]
    pub language: Language,
    #[serde(default)]
    pub limits: LimitsConfig,
    #[serde(default)]
    pub marriage_types: MarriageTypeConfig,
    /// Which rules run, in order
    #[serde(default)]
    pub pipeline: PipelineConfig,
    /// Validation threads; 1 validates on the calling thread
    #[serde(default = "default_workers")]
    pub workers: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// Person tags that may occur only a limited number of times
    #[serde(default = "default_person_tags")]
    pub person_tags: Vec<TagLimit>,
    #[serde(default = "default_max_marriages")]
    pub max_marriages: usize,
    /// Applies to HUSB and WIFE independently
    #[serde(default = "default_one")]
    pub max_spouses_per_role: usize,
    /// DATE and PLAC per event
    #[serde(default = "default_one")]
    pub max_event_details: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagLimit {
    pub tag: String,
    pub max: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarriageTypeConfig {
    /// Accepted MARR.TYPE values, compared case-insensitively
    #[serde(default = "default_allowed_marriage_types")]
    pub allowed: Vec<String>,
    /// Types a family may record at most `max_per_type` times
    #[serde(default = "default_limited_marriage_types")]
    pub limited: Vec<String>,
    #[serde(default = "default_one")]
    pub max_per_type: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default = "default_rules")]
    pub rules: Vec<RuleConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleConfig {
    pub name: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            person_tags: default_person_tags(),
            max_marriages: default_max_marriages(),
            max_spouses_per_role: 1,
            max_event_details: 1,
        }
    }
}

impl Default for MarriageTypeConfig {
    fn default() -> Self {
        Self {
            allowed: default_allowed_marriage_types(),
            limited: default_limited_marriage_types(),
            max_per_type: 1,
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            rules: default_rules(),
        }
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            language: Language::default(),
            limits: LimitsConfig::default(),
            marriage_types: MarriageTypeConfig::default(),
            pipeline: PipelineConfig::default(),
            workers: default_workers(),
        }
    }
}

impl ValidationConfig {
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: ValidationConfig =
            serde_yaml::from_str(content).context("invalid validation config")?;
        Ok(config)
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_yaml(&content).with_context(|| format!("in config {}", path.display()))
    }

    /// Config file when given, built-in defaults otherwise
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Names of enabled rules in pipeline order
    pub fn enabled_rules(&self) -> impl Iterator<Item = &str> {
        self.pipeline
            .rules
            .iter()
            .filter(|rule| rule.enabled)
            .map(|rule| rule.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_enable_every_rule() {
        let config = ValidationConfig::default();
        let enabled: Vec<_> = config.enabled_rules().collect();
        assert_eq!(enabled, names::ALL.to_vec());
        assert_eq!(config.language, Language::De);
        assert_eq!(config.workers, 1);
        assert_eq!(config.limits.max_marriages, 2);
        assert_eq!(config.limits.person_tags.len(), 3);
    }

    #[test]
    fn partial_yaml_falls_back_to_defaults() {
        let config = ValidationConfig::from_yaml(
            "language: en\n\
             workers: 4\n\
             limits:\n  max_marriages: 3\n",
        )
        .unwrap();

        assert_eq!(config.language, Language::En);
        assert_eq!(config.workers, 4);
        assert_eq!(config.limits.max_marriages, 3);
        assert_eq!(config.limits.max_spouses_per_role, 1);
        assert_eq!(config.marriage_types, MarriageTypeConfig::default());
        assert_eq!(config.pipeline, PipelineConfig::default());
    }

    #[test]
    fn rules_can_be_disabled() {
        let config = ValidationConfig::from_yaml(
            "pipeline:\n  rules:\n    - name: Spouses\n    - name: MarriageCount\n      enabled: false\n",
        )
        .unwrap();

        let enabled: Vec<_> = config.enabled_rules().collect();
        assert_eq!(enabled, vec!["Spouses"]);
    }

    #[test]
    fn empty_pipeline_section_keeps_default_rules() {
        let config = ValidationConfig::from_yaml("pipeline:\n  {}\n").unwrap();
        assert_eq!(config.pipeline, PipelineConfig::default());

        let config = ValidationConfig::from_yaml("pipeline: {}\nmarriage_types: {}\n").unwrap();
        assert_eq!(config, ValidationConfig::default());
    }

    #[test]
    fn language_displays_its_config_name() {
        for language in [Language::De, Language::En] {
            let yaml = format!("language: {language}\n");
            assert_eq!(ValidationConfig::from_yaml(&yaml).unwrap().language, language);
        }
        assert_eq!(Language::En.to_string(), "en");
    }

    #[test]
    fn rejects_unknown_language() {
        assert!(ValidationConfig::from_yaml("language: fr\n").is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ValidationConfig::load(Some(&dir.path().join("nope.yaml"))).unwrap_err();
        assert!(err.to_string().contains("failed to read config"));
        assert_eq!(ValidationConfig::load(None).unwrap(), ValidationConfig::default());
    }
}
