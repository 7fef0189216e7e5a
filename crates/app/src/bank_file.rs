use std::fmt;
use std::path::{Path, PathBuf};

use quiz_core::QuestionBank;
use quiz_core::bank::BankError;
use quiz_core::model::QuestionDraft;
use tracing::info;

#[derive(Debug)]
pub enum BankFileError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    Invalid {
        path: PathBuf,
        source: BankError,
    },
}

impl fmt::Display for BankFileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BankFileError::Io { path, source } => {
                write!(f, "cannot read {}: {source}", path.display())
            }
            BankFileError::Parse { path, source } => {
                write!(f, "{} is not a valid question list: {source}", path.display())
            }
            BankFileError::Invalid { path, source } => {
                write!(f, "{}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for BankFileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BankFileError::Io { source, .. } => Some(source),
            BankFileError::Parse { source, .. } => Some(source),
            BankFileError::Invalid { source, .. } => Some(source),
        }
    }
}

/// Read a JSON array of question drafts and validate it into a bank.
pub fn load_bank(path: &Path) -> Result<QuestionBank, BankFileError> {
    let raw = std::fs::read_to_string(path).map_err(|source| BankFileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let drafts: Vec<QuestionDraft> =
        serde_json::from_str(&raw).map_err(|source| BankFileError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    let bank = QuestionBank::from_drafts(drafts).map_err(|source| BankFileError::Invalid {
        path: path.to_path_buf(),
        source,
    })?;

    info!(path = %path.display(), questions = bank.len(), "loaded question bank");
    Ok(bank)
}
