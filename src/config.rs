use crate::error::{PdfTabError, Result};
use crate::partition::DEFAULT_PAGES_PER_PART;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub scan: ScanConfig,
    pub extraction: ExtractionConfig,
    pub output: OutputConfig,
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ScanConfig {
    pub directory: PathBuf,
    pub exclude_patterns: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ExtractionConfig {
    pub pages_per_part: u32,
    pub min_column_gap: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    pub directory: Option<PathBuf>,
    pub pretty: bool,
    pub overwrite: bool,
    pub write_summary: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub width: usize,
    pub clear_screen: bool,
    pub title: String,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            exclude_patterns: Vec::new(),
        }
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            pages_per_part: DEFAULT_PAGES_PER_PART,
            min_column_gap: 2,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: None, // next to the input files
            pretty: true,
            overwrite: true,
            write_summary: false,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: 110,
            clear_screen: true,
            title: "FILES STATUS".to_string(),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(PdfTabError::Config {
                message: format!("Configuration file not found: {}", path.display()),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| PdfTabError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| PdfTabError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })?;

        Ok(config)
    }

    pub fn load_with_defaults<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_from_file(path),
            None => {
                let default_paths = ["pdftab.toml", ".pdftab.toml"];

                for default_path in &default_paths {
                    if Path::new(default_path).exists() {
                        return Self::load_from_file(default_path);
                    }
                }

                Ok(Self::default())
            }
        }
    }

    pub fn merge_with_cli_args(&mut self, cli_args: &CliOverrides) {
        if let Some(ref directory) = cli_args.directory {
            self.scan.directory = directory.clone();
        }

        if let Some(pages_per_part) = cli_args.pages_per_part {
            self.extraction.pages_per_part = pages_per_part;
        }

        if let Some(ref output_dir) = cli_args.output_dir {
            self.output.directory = Some(output_dir.clone());
        }

        if let Some(width) = cli_args.width {
            self.display.width = width;
        }

        if cli_args.no_clear {
            self.display.clear_screen = false;
        }
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self).map_err(|e| PdfTabError::Config {
            message: format!("Failed to serialize config: {}", e),
        })?;

        std::fs::write(path, content).map_err(|e| PdfTabError::Config {
            message: format!("Failed to write config file {}: {}", path.display(), e),
        })?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.extraction.pages_per_part == 0 {
            return Err(PdfTabError::Config {
                message: "Pages per part must be greater than 0".to_string(),
            });
        }

        if self.extraction.min_column_gap == 0 {
            return Err(PdfTabError::Config {
                message: "Minimum column gap must be greater than 0".to_string(),
            });
        }

        if self.display.width < 40 {
            return Err(PdfTabError::Config {
                message: format!(
                    "Display width must be at least 40 columns (got {})",
                    self.display.width
                ),
            });
        }

        for pattern in &self.scan.exclude_patterns {
            Regex::new(pattern).map_err(|e| PdfTabError::Config {
                message: format!("Invalid exclude pattern {:?}: {}", pattern, e),
            })?;
        }

        Ok(())
    }

    /// Directory artifacts are written to.
    pub fn output_directory(&self) -> &Path {
        self.output
            .directory
            .as_deref()
            .unwrap_or(&self.scan.directory)
    }

    pub fn create_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config).unwrap_or_else(|_| String::new())
    }
}

#[derive(Debug, Default)]
pub struct CliOverrides {
    pub directory: Option<PathBuf>,
    pub pages_per_part: Option<u32>,
    pub output_dir: Option<PathBuf>,
    pub width: Option<usize>,
    pub no_clear: bool,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_directory(mut self, directory: Option<PathBuf>) -> Self {
        self.directory = directory;
        self
    }

    pub fn with_pages_per_part(mut self, pages_per_part: Option<u32>) -> Self {
        self.pages_per_part = pages_per_part;
        self
    }

    pub fn with_output_dir(mut self, output_dir: Option<PathBuf>) -> Self {
        self.output_dir = output_dir;
        self
    }

    pub fn with_width(mut self, width: Option<usize>) -> Self {
        self.width = width;
        self
    }

    pub fn with_no_clear(mut self, no_clear: bool) -> Self {
        self.no_clear = no_clear;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.extraction.pages_per_part, 20);
        assert_eq!(config.display.width, 110);
        assert!(config.display.clear_screen);
        assert_eq!(config.output_directory(), Path::new("."));
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.extraction.pages_per_part = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.scan.exclude_patterns.push("(unclosed".to_string());
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.display.width = 10;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_file_operations() {
        let mut config = Config::default();
        config.extraction.pages_per_part = 7;
        let temp_file = NamedTempFile::new().unwrap();

        config.save_to_file(temp_file.path()).unwrap();

        let loaded_config = Config::load_from_file(temp_file.path()).unwrap();
        assert_eq!(loaded_config.extraction.pages_per_part, 7);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = toml::from_str("[extraction]\npages_per_part = 5\n").unwrap();
        assert_eq!(config.extraction.pages_per_part, 5);
        assert_eq!(config.extraction.min_column_gap, 2);
        assert_eq!(config.display.title, "FILES STATUS");
    }

    #[test]
    fn test_missing_config_file() {
        let result = Config::load_from_file("/definitely/not/here/pdftab.toml");
        assert!(matches!(result, Err(PdfTabError::Config { .. })));
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = Config::default();

        let overrides = CliOverrides::new()
            .with_pages_per_part(Some(10))
            .with_output_dir(Some(PathBuf::from("out")))
            .with_no_clear(true);

        config.merge_with_cli_args(&overrides);

        assert_eq!(config.extraction.pages_per_part, 10);
        assert_eq!(config.output_directory(), Path::new("out"));
        assert!(!config.display.clear_screen);
    }

    #[test]
    fn test_sample_config_generation() {
        let sample = Config::create_sample_config();
        assert!(sample.contains("[scan]"));
        assert!(sample.contains("[extraction]"));
        assert!(sample.contains("[display]"));
    }
}
