use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

/// Untyped payload returned by an external data source.
pub type RawFields = Map<String, Value>;

/// Credit bureau style lookup keyed by the applicant's identity value.
pub trait ApplicantDataSource: Send + Sync {
    fn lookup(&self, identity: &str) -> Result<RawFields, DataSourceError>;
}

/// Property records lookup keyed by street text.
pub trait PropertyDataSource: Send + Sync {
    fn lookup(&self, street: &str) -> Result<RawFields, DataSourceError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DataSourceError {
    #[error("no record for key '{key}'")]
    NotFound { key: String },
    #[error("lookup timed out")]
    Timeout,
    #[error("data source unavailable: {0}")]
    Unavailable(String),
}

/// Canonical form of a street used as the property lookup key.
///
/// Lowercases, then folds every run of characters outside `[a-z0-9]` into one underscore
/// and strips underscores at either end. `"212 Encounter Bay!!"` becomes
/// `"212_encounter_bay"`.
pub fn normalize_street(street: &str) -> String {
    let lowered = street.trim().to_lowercase();
    let mut normalized = String::with_capacity(lowered.len());
    for ch in lowered.chars() {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            normalized.push(ch);
        } else if !normalized.ends_with('_') {
            normalized.push('_');
        }
    }
    normalized.trim_matches('_').to_string()
}

/// JSON object of `key -> payload` loaded once and served read-only.
#[derive(Debug, Clone, Default)]
struct JsonRecords {
    records: BTreeMap<String, RawFields>,
}

impl JsonRecords {
    fn from_reader<R: Read>(reader: R, origin: &Path) -> Result<Self, DataSourceLoadError> {
        let records = serde_json::from_reader(BufReader::new(reader)).map_err(|source| {
            DataSourceLoadError::Parse {
                path: origin.to_path_buf(),
                source,
            }
        })?;
        Ok(Self { records })
    }

    fn from_path(path: &Path) -> Result<Self, DataSourceLoadError> {
        let file = File::open(path).map_err(|source| DataSourceLoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(file, path)
    }

    fn get(&self, key: &str) -> Result<RawFields, DataSourceError> {
        if key.is_empty() {
            return Err(DataSourceError::NotFound {
                key: key.to_string(),
            });
        }
        self.records
            .get(key)
            .cloned()
            .ok_or_else(|| DataSourceError::NotFound {
                key: key.to_string(),
            })
    }

    fn len(&self) -> usize {
        self.records.len()
    }
}

/// File-backed applicant lookup.
#[derive(Debug, Clone, Default)]
pub struct JsonApplicantSource {
    records: JsonRecords,
}

impl JsonApplicantSource {
    pub fn from_path(path: &Path) -> Result<Self, DataSourceLoadError> {
        Ok(Self {
            records: JsonRecords::from_path(path)?,
        })
    }

    pub fn from_records(records: BTreeMap<String, RawFields>) -> Self {
        Self {
            records: JsonRecords { records },
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ApplicantDataSource for JsonApplicantSource {
    fn lookup(&self, identity: &str) -> Result<RawFields, DataSourceError> {
        self.records.get(identity)
    }
}

/// File-backed property lookup; keys in the file are normalized street names.
#[derive(Debug, Clone, Default)]
pub struct JsonPropertySource {
    records: JsonRecords,
}

impl JsonPropertySource {
    pub fn from_path(path: &Path) -> Result<Self, DataSourceLoadError> {
        Ok(Self {
            records: JsonRecords::from_path(path)?,
        })
    }

    pub fn from_records(records: BTreeMap<String, RawFields>) -> Self {
        Self {
            records: JsonRecords { records },
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PropertyDataSource for JsonPropertySource {
    fn lookup(&self, street: &str) -> Result<RawFields, DataSourceError> {
        self.records.get(&normalize_street(street))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DataSourceLoadError {
    #[error("failed to open data file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid data file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> RawFields {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn normalizes_punctuation_and_case() {
        assert_eq!(normalize_street("212 Encounter Bay!!"), "212_encounter_bay");
        assert_eq!(normalize_street("  12-B  Main St.  "), "12_b_main_st");
        assert_eq!(normalize_street("__Elm__Street__"), "elm_street");
        assert_eq!(normalize_street("!!!"), "");
    }

    #[test]
    fn normalization_is_idempotent() {
        for street in ["212 Encounter Bay!!", "Rue de l'Église 4", "a__b", "  X  "] {
            let once = normalize_street(street);
            assert_eq!(normalize_street(&once), once);
        }
    }

    #[test]
    fn property_lookup_normalizes_the_street() {
        let mut records = BTreeMap::new();
        records.insert(
            "212_encounter_bay".to_string(),
            fields(json!({ "pending_mortgage_amount": 100 })),
        );
        let source = JsonPropertySource::from_records(records);

        assert!(source.lookup("212 Encounter Bay").is_ok());
        assert_eq!(
            source.lookup("1 Nowhere Rd"),
            Err(DataSourceError::NotFound {
                key: "1_nowhere_rd".to_string()
            })
        );
    }

    #[test]
    fn empty_identity_is_not_found() {
        let source = JsonApplicantSource::default();
        assert!(matches!(
            source.lookup(""),
            Err(DataSourceError::NotFound { .. })
        ));
    }

    #[test]
    fn reports_unreadable_files() {
        match JsonApplicantSource::from_path(Path::new("missing/applicant.json")) {
            Err(DataSourceLoadError::Read { path, .. }) => {
                assert_eq!(path, PathBuf::from("missing/applicant.json"))
            }
            other => panic!("expected read error, got {other:?}"),
        }
    }

    #[test]
    fn reports_malformed_files() {
        let result = JsonRecords::from_reader("[1, 2]".as_bytes(), Path::new("inline.json"));
        assert!(matches!(result, Err(DataSourceLoadError::Parse { .. })));
    }
}
