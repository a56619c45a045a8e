use crate::config::{CliOverrides, Config};
use crate::error::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "pdftab")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Convert the tables in a directory of PDF files, with a live status table")]
#[command(
    long_about = "pdftab converts every PDF in a directory, one file at a time and a few pages \
                  at a time, while a status table shows per-file progress, speed and the \
                  estimated finish time of every file still waiting."
)]
#[command(after_help = "EXAMPLES:\n  \
    pdftab\n  \
    pdftab ~/scans --pages-per-part 10\n  \
    pdftab ~/scans --output ~/tables --no-clear\n  \
    pdftab --dry-run --output-format json")]
pub struct Cli {
    /// Directory containing the PDF files (defaults to the current directory)
    pub directory: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, help = "Path to TOML configuration file")]
    pub config: Option<PathBuf>,

    /// Preferred number of pages per extraction part
    #[arg(short, long, value_parser = parse_positive_u32)]
    pub pages_per_part: Option<u32>,

    /// Directory the extracted tables are written to (defaults to the input directory)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Width the status table is centred on
    #[arg(long, value_name = "COLS")]
    pub width: Option<usize>,

    /// Output format for messages and the final summary
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub output_format: OutputFormat,

    /// Append each redraw instead of clearing the terminal
    #[arg(long)]
    pub no_clear: bool,

    /// Verbose output level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (no status table, no progress bars)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Dry run (list files and planned page ranges without converting)
    #[arg(long, help = "Show what would be converted without actually doing it")]
    pub dry_run: bool,

    /// Generate sample configuration file
    #[arg(long, help = "Generate a sample configuration file")]
    pub generate_config: bool,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON formatted output
    Json,
    /// Plain text output
    Plain,
}

impl Cli {
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load_with_defaults(self.config.as_ref())?;

        let overrides = self.create_cli_overrides();
        config.merge_with_cli_args(&overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn create_cli_overrides(&self) -> CliOverrides {
        CliOverrides::new()
            .with_directory(self.directory.clone())
            .with_pages_per_part(self.pages_per_part)
            .with_output_dir(self.output.clone())
            .with_width(self.width)
            .with_no_clear(self.no_clear)
    }

    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }
}

pub fn parse_positive_u32(s: &str) -> std::result::Result<u32, String> {
    let value: u32 = s
        .trim()
        .parse()
        .map_err(|_| format!("Invalid number: {}", s))?;

    if value == 0 {
        return Err("Value must be greater than 0".to_string());
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_no_arguments_is_valid() {
        let cli = Cli::try_parse_from(["pdftab"]).unwrap();
        assert!(cli.directory.is_none());
        assert!(cli.pages_per_part.is_none());
        assert!(!cli.dry_run);
        assert_eq!(cli.verbosity_level(), 0);
    }

    #[test]
    fn test_full_argument_set() {
        let cli = Cli::try_parse_from([
            "pdftab",
            "scans",
            "-p",
            "10",
            "-o",
            "tables",
            "--width",
            "90",
            "--no-clear",
            "--output-format",
            "plain",
            "-vv",
        ])
        .unwrap();

        assert_eq!(cli.directory.as_deref(), Some(Path::new("scans")));
        assert_eq!(cli.pages_per_part, Some(10));
        assert_eq!(cli.width, Some(90));
        assert!(matches!(cli.output_format, OutputFormat::Plain));
        assert_eq!(cli.verbosity_level(), 2);

        let overrides = cli.create_cli_overrides();
        assert_eq!(overrides.output_dir, Some(PathBuf::from("tables")));
        assert!(overrides.no_clear);
    }

    #[test]
    fn test_rejects_zero_pages_per_part() {
        assert!(Cli::try_parse_from(["pdftab", "-p", "0"]).is_err());
        assert!(Cli::try_parse_from(["pdftab", "-p", "many"]).is_err());
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["pdftab", "-q", "-v"]).is_err());
    }

    #[test]
    fn test_parse_positive_u32() {
        assert_eq!(parse_positive_u32("20").unwrap(), 20);
        assert_eq!(parse_positive_u32(" 5 ").unwrap(), 5);
        assert!(parse_positive_u32("0").is_err());
        assert!(parse_positive_u32("-3").is_err());
    }

    #[test]
    fn test_load_config_applies_overrides() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config_path = temp_dir.path().join("custom.toml");
        std::fs::write(&config_path, "[extraction]\npages_per_part = 7\n").unwrap();

        let cli = Cli::try_parse_from([
            "pdftab",
            "somewhere",
            "--config",
            config_path.to_str().unwrap(),
            "--width",
            "80",
        ])
        .unwrap();

        let config = cli.load_config().unwrap();
        assert_eq!(config.extraction.pages_per_part, 7);
        assert_eq!(config.display.width, 80);
        assert_eq!(config.scan.directory, PathBuf::from("somewhere"));
    }

    #[test]
    fn test_load_config_validates() {
        let cli = Cli::try_parse_from(["pdftab", "--width", "10"]).unwrap();
        assert!(cli.load_config().is_err());
    }
}
