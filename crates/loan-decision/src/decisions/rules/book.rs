use std::fs;
use std::path::{Path, PathBuf};

use tracing::{error, info};

use super::config::RuleDocument;
use crate::config::RuleFilesConfig;
use crate::decisions::domain::RuleName;

/// Read-only set of rule documents, loaded once at startup and injected into rules.
///
/// A document that failed to load is kept as a reason string; rules needing it see an
/// empty configuration and stay disabled.
#[derive(Debug, Clone)]
pub struct RuleBook {
    mortgage: DocumentSlot,
    credit: DocumentSlot,
}

#[derive(Debug, Clone)]
enum DocumentSlot {
    Loaded(RuleDocument),
    Unavailable(String),
}

impl DocumentSlot {
    fn from_result(rule: RuleName, result: Result<RuleDocument, RuleBookError>) -> Self {
        match result {
            Ok(document) => DocumentSlot::Loaded(document),
            Err(err) => {
                error!(rule = %rule, error = %err, "rule document unavailable");
                DocumentSlot::Unavailable(err.to_string())
            }
        }
    }
}

impl RuleBook {
    pub fn new(mortgage: RuleDocument, credit: RuleDocument) -> Self {
        Self {
            mortgage: DocumentSlot::Loaded(mortgage),
            credit: DocumentSlot::Loaded(credit),
        }
    }

    pub fn from_results(
        mortgage: Result<RuleDocument, RuleBookError>,
        credit: Result<RuleDocument, RuleBookError>,
    ) -> Self {
        Self {
            mortgage: DocumentSlot::from_result(RuleName::Mortgage, mortgage),
            credit: DocumentSlot::from_result(RuleName::Credit, credit),
        }
    }

    pub fn load(files: &RuleFilesConfig) -> Self {
        let book = Self::from_results(load_document(&files.mortgage), load_document(&files.credit));
        info!(
            mortgage = %files.mortgage.display(),
            credit = %files.credit.display(),
            "rule documents loaded"
        );
        book
    }

    pub fn document(&self, rule: RuleName) -> Result<&RuleDocument, RuleBookError> {
        let slot = match rule {
            RuleName::Mortgage => &self.mortgage,
            RuleName::Credit => &self.credit,
        };
        match slot {
            DocumentSlot::Loaded(document) => Ok(document),
            DocumentSlot::Unavailable(reason) => Err(RuleBookError::Unavailable {
                rule,
                reason: reason.clone(),
            }),
        }
    }
}

pub fn load_document(path: &Path) -> Result<RuleDocument, RuleBookError> {
    let raw = fs::read_to_string(path).map_err(|source| RuleBookError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    RuleDocument::from_yaml(&raw).map_err(|source| RuleBookError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[derive(Debug, thiserror::Error)]
pub enum RuleBookError {
    #[error("failed to read rule document {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid rule document {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_saphyr::Error,
    },
    #[error("{rule} configuration unavailable: {reason}")]
    Unavailable { rule: RuleName, reason: String },
}
