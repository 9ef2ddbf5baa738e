//! Batch configuration loading and parsing

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use rstats_decoder::report::DEFAULT_USAGE_CAP;
use rstats_decoder::Format;

/// Main application configuration (loaded from config.toml)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    pub input: InputConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InputConfig {
    /// Stats files to decode
    pub files: Vec<PathBuf>,
    /// Force the input format for every file (default: detect per file)
    #[serde(default)]
    pub format: Option<Format>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
    /// Directory for per-file reports (default: print to stdout)
    #[serde(default)]
    pub dir: Option<PathBuf>,
    /// Usage cap in bytes for the recent-usage summary
    #[serde(default = "default_cap")]
    pub cap: u64,
    /// Include the 2-minute RX/TX speed tables
    #[serde(default)]
    pub include_speed: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            dir: None,
            cap: default_cap(),
            include_speed: false,
        }
    }
}

impl OutputConfig {
    /// Report destination for one input file: `<dir>/<stem>.<txt|json>`,
    /// or None for stdout
    pub fn report_path(&self, input: &Path) -> Option<PathBuf> {
        let dir = self.dir.as_ref()?;
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "report".to_string());
        let ext = match self.format {
            OutputFormat::Text => "txt",
            OutputFormat::Json => "json",
        };
        Some(dir.join(format!("{}.{}", stem, ext)))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

fn default_cap() -> u64 {
    DEFAULT_USAGE_CAP
}

/// Load and validate a batch configuration file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {:?}", path))?;
    let config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("failed to parse config file: {:?}", path))?;
    if config.input.files.is_empty() {
        bail!("config lists no input files: {:?}", path);
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_config() {
        let config: AppConfig = toml::from_str(
            r#"
            [input]
            files = ["stats/tomato_rstats.gz"]
            "#,
        )
        .unwrap();
        assert_eq!(config.input.files.len(), 1);
        assert!(config.input.format.is_none());
        assert_eq!(config.output.format, OutputFormat::Text);
        assert_eq!(config.output.cap, DEFAULT_USAGE_CAP);
        assert!(!config.output.include_speed);
    }

    #[test]
    fn test_parse_full_config_with_format_alias() {
        let config: AppConfig = toml::from_str(
            r#"
            [input]
            files = ["a.gz", "b.gz"]
            format = "cstats"

            [output]
            format = "json"
            dir = "reports"
            cap = 500000000000
            include_speed = true
            "#,
        )
        .unwrap();
        assert_eq!(config.input.format, Some(Format::Extended));
        assert_eq!(config.output.format, OutputFormat::Json);
        assert!(config.output.include_speed);
        assert_eq!(
            config.output.report_path(Path::new("stats/a.gz")),
            Some(PathBuf::from("reports/a.json"))
        );
    }

    #[test]
    fn test_empty_file_list_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[input]\nfiles = []\n").unwrap();
        assert!(load_config(&path).is_err());
    }

    #[test]
    fn test_stdout_when_no_dir() {
        let config = OutputConfig::default();
        assert_eq!(config.report_path(Path::new("a.gz")), None);
    }
}
