use crate::partition::PageRange;
use crate::tracker::RecordPhase;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PdfTabError {
    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("No PDF files found in {directory}")]
    NoPdfFiles { directory: String },

    #[error("No tracked file named {name}")]
    FileNotFound { name: String },

    #[error("Cannot {operation} {name} while it is {phase}")]
    InvalidTransition {
        name: String,
        operation: &'static str,
        phase: RecordPhase,
    },

    #[error("Duplicate file name in working set: {name}")]
    DuplicateFileName { name: String },

    #[error("Failed to read PDF {path}: {message}")]
    PdfParse { path: String, message: String },

    #[error("Table extraction failed for {path} (pages {range}): {message}")]
    Extraction {
        path: String,
        range: PageRange,
        message: String,
    },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Failed to serialize results: {message}")]
    Serialization { message: String },

    #[error("Path validation failed: {path}")]
    InvalidPath { path: String },

    #[error("Output file already exists: {path}")]
    OutputExists { path: String },
}

impl PdfTabError {
    /// Errors that indicate a bug in the driver rather than bad input.
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            PdfTabError::FileNotFound { .. }
                | PdfTabError::InvalidTransition { .. }
                | PdfTabError::DuplicateFileName { .. }
        )
    }
}

pub trait UserFriendlyError {
    fn user_message(&self) -> String;
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for PdfTabError {
    fn user_message(&self) -> String {
        match self {
            PdfTabError::NoPdfFiles { directory } => {
                format!("No PDF files in directory {}", directory)
            }
            PdfTabError::PdfParse { path, message } => {
                format!("Could not read {} as a PDF: {}", path, message)
            }
            PdfTabError::Extraction {
                path,
                range,
                message,
            } => {
                format!(
                    "Extracting tables from {} (pages {}) failed: {}",
                    path, range, message
                )
            }
            PdfTabError::Config { message } => {
                format!("Configuration error: {}", message)
            }
            PdfTabError::InvalidPath { path } => {
                format!("Invalid file path: {}", path)
            }
            PdfTabError::OutputExists { path } => {
                format!("Refusing to overwrite existing output: {}", path)
            }
            PdfTabError::FileNotFound { .. }
            | PdfTabError::InvalidTransition { .. }
            | PdfTabError::DuplicateFileName { .. } => {
                format!("Internal error: {}", self)
            }
            _ => self.to_string(),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            PdfTabError::NoPdfFiles { .. } => Some(
                "Run pdftab from a directory containing .pdf files, or pass the directory as an argument.".to_string()
            ),
            PdfTabError::PdfParse { .. } => Some(
                "Check that the file is a valid, unencrypted PDF, or move it out of the working directory.".to_string()
            ),
            PdfTabError::Extraction { .. } => Some(
                "Try a smaller --pages-per-part value, or remove the failing file and run again.".to_string()
            ),
            PdfTabError::Config { .. } => Some(
                "Check your configuration file syntax. Use --generate-config to write a fresh sample.".to_string()
            ),
            PdfTabError::OutputExists { .. } => Some(
                "Remove the existing file, choose another --output directory, or set output.overwrite = true.".to_string()
            ),
            PdfTabError::Io(_) => Some(
                "Ensure you have read/write permissions for the input and output directories.".to_string()
            ),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for PdfTabError {
    fn from(error: toml::de::Error) -> Self {
        PdfTabError::Config {
            message: error.to_string(),
        }
    }
}

impl From<serde_json::Error> for PdfTabError {
    fn from(error: serde_json::Error) -> Self {
        PdfTabError::Serialization {
            message: error.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PdfTabError>;
