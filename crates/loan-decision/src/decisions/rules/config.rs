use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::RuleError;

/// One rule's configuration document: state name to state entry.
///
/// ```yaml
/// California:
///   enabled: true
///   credit_score_threshold: 600
///   counties:
///     Alameda:
///       credit_score_threshold: 650
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleDocument {
    states: Map<String, Value>,
}

impl RuleDocument {
    pub fn from_yaml(raw: &str) -> Result<Self, serde_saphyr::Error> {
        serde_saphyr::from_str(raw)
    }

    /// Effective parameters for an address.
    ///
    /// A non-empty county entry replaces the state entry wholesale; nothing is inherited
    /// from the state level in that case.
    pub fn resolve(&self, state: Option<&str>, county: Option<&str>) -> EffectiveConfig {
        let Some(state) = state else {
            return EffectiveConfig::empty();
        };
        let Some(Value::Object(state_entry)) = self.states.get(state) else {
            return EffectiveConfig::empty();
        };

        let county_entry = county.and_then(|county| match state_entry.get("counties") {
            Some(Value::Object(counties)) => match counties.get(county) {
                Some(Value::Object(entry)) if !entry.is_empty() => Some(entry),
                _ => None,
            },
            _ => None,
        });

        match county_entry {
            Some(entry) => EffectiveConfig::from_map(entry.clone()),
            None => EffectiveConfig::from_map(state_entry.clone()),
        }
    }
}

/// Resolved parameter set a rule evaluates against.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EffectiveConfig {
    params: Map<String, Value>,
}

impl EffectiveConfig {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_map(params: Map<String, Value>) -> Self {
        Self { params }
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.params.get(key)
    }

    /// Only a literal boolean `true` enables a rule.
    pub fn is_enabled(&self) -> bool {
        matches!(self.params.get("enabled"), Some(Value::Bool(true)))
    }

    /// Integer parameter, `0` when absent or null.
    pub fn integer(&self, key: &'static str) -> Result<i64, RuleError> {
        match self.params.get(key) {
            None | Some(Value::Null) => Ok(0),
            Some(Value::Number(number)) => number
                .as_i64()
                .ok_or_else(|| RuleError::InvalidParameter {
                    key,
                    found: number.to_string(),
                }),
            Some(other) => Err(RuleError::InvalidParameter {
                key,
                found: other.to_string(),
            }),
        }
    }
}
