//! Configuration for crm-selection
//!
//! Page size defaults, payload key names, and the polling policy used to
//! wait for a bulk mutation to become visible before refetching a table.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::ConfigError;
use crate::resource::{IdFieldNames, TargetResource};
use crate::selection::DEFAULT_PER_PAGE;

/// Largest page size a table may request.
pub const MAX_PER_PAGE: u32 = 1000;

/// Selection engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// Page size for a freshly mounted table
    pub default_per_page: u32,
    /// Payload keys for explicit and excluded ids
    pub id_fields: IdFieldNames,
    /// Read-your-write polling after a mutation
    pub consistency: ConsistencyPolicy,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            default_per_page: DEFAULT_PER_PAGE,
            id_fields: IdFieldNames::default(),
            consistency: ConsistencyPolicy::default(),
        }
    }
}

/// Retry-with-backoff policy for read-your-write checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsistencyPolicy {
    /// Checks to run before giving up
    pub max_attempts: u32,
    /// Delay after the first failed check
    pub initial_backoff_ms: u64,
    /// Upper bound on any single delay
    pub max_backoff_ms: u64,
    /// Growth factor between delays
    pub multiplier: f64,
}

impl Default for ConsistencyPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_backoff_ms: 250,
            max_backoff_ms: 4000,
            multiplier: 2.0,
        }
    }
}

impl ConsistencyPolicy {
    /// Delay to wait after the `attempt`-th failed check (1-based).
    pub fn backoff(&self, attempt: u32) -> Duration {
        let exp = attempt.saturating_sub(1) as i32;
        let ms = self.initial_backoff_ms as f64 * self.multiplier.powi(exp);
        let capped = ms.min(self.max_backoff_ms as f64);
        Duration::from_millis(capped as u64)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_attempts == 0 {
            return Err(ConfigError::OutOfRange(
                "max_attempts must be at least 1".to_string(),
            ));
        }
        if self.max_backoff_ms < self.initial_backoff_ms {
            return Err(ConfigError::OutOfRange(
                "max_backoff_ms must not be below initial_backoff_ms".to_string(),
            ));
        }
        if !(self.multiplier >= 1.0) {
            return Err(ConfigError::OutOfRange(
                "multiplier must be at least 1.0".to_string(),
            ));
        }
        Ok(())
    }
}

/// A config document as written; absent sections fall back to a base config.
#[derive(Debug, Deserialize)]
struct ConfigFile {
    default_per_page: Option<u32>,
    id_fields: Option<IdFieldNames>,
    consistency: Option<ConsistencyPolicy>,
}

impl ConfigFile {
    fn over(self, base: SelectionConfig) -> Result<SelectionConfig, ConfigError> {
        let config = SelectionConfig {
            default_per_page: self.default_per_page.unwrap_or(base.default_per_page),
            id_fields: self.id_fields.unwrap_or(base.id_fields),
            consistency: self.consistency.unwrap_or(base.consistency),
        };
        config.validate()?;
        Ok(config)
    }
}

impl SelectionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Default config with the payload keys of `resource`.
    pub fn for_resource(resource: TargetResource) -> Self {
        Self {
            id_fields: resource.id_fields(),
            ..Self::default()
        }
    }

    /// Load configuration from a JSON string
    pub fn from_json(json_str: &str) -> Result<Self, ConfigError> {
        Self::from_json_for(TargetResource::Customers, json_str)
    }

    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Self::from_toml_for(TargetResource::Customers, toml_str)
    }

    /// Load a JSON config for `resource`; fields the document leaves out,
    /// `id_fields` included, take the resource defaults.
    pub fn from_json_for(resource: TargetResource, json_str: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = serde_json::from_str(json_str)?;
        file.over(Self::for_resource(resource))
    }

    /// Load a TOML config for `resource`; see [`SelectionConfig::from_json_for`].
    pub fn from_toml_for(resource: TargetResource, toml_str: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(toml_str)?;
        file.over(Self::for_resource(resource))
    }

    /// Serialize configuration to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_per_page == 0 || self.default_per_page > MAX_PER_PAGE {
            return Err(ConfigError::OutOfRange(format!(
                "default_per_page must be between 1 and {}",
                MAX_PER_PAGE
            )));
        }
        if self.id_fields.include.is_empty() || self.id_fields.exclude.is_empty() {
            return Err(ConfigError::OutOfRange(
                "id field names must not be empty".to_string(),
            ));
        }
        if self.id_fields.include == self.id_fields.exclude {
            return Err(ConfigError::OutOfRange(
                "include and exclude id fields must differ".to_string(),
            ));
        }
        self.consistency.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(SelectionConfig::default().validate().is_ok());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config = SelectionConfig::from_json(r#"{"default_per_page": 50}"#).unwrap();
        assert_eq!(config.default_per_page, 50);
        assert_eq!(config.id_fields.include, "client_ids");
        assert_eq!(config.consistency.max_attempts, 5);
    }

    #[test]
    fn toml_config() {
        let config = SelectionConfig::from_toml(
            r#"
            default_per_page = 25

            [id_fields]
            include = "affiliate_ids"
            exclude = "non_affiliate_ids"

            [consistency]
            max_attempts = 3
            "#,
        )
        .unwrap();
        assert_eq!(config.id_fields, TargetResource::Affiliates.id_fields());
        assert_eq!(config.consistency.max_attempts, 3);
        assert_eq!(config.consistency.initial_backoff_ms, 250);
    }

    #[test]
    fn missing_id_fields_follow_the_resource() {
        let config =
            SelectionConfig::from_json_for(TargetResource::Agents, r#"{"default_per_page": 25}"#)
                .unwrap();
        assert_eq!(config.id_fields, TargetResource::Agents.id_fields());
        assert_eq!(config.default_per_page, 25);

        let config = SelectionConfig::from_toml_for(TargetResource::IbRequests, "").unwrap();
        assert_eq!(config.id_fields, TargetResource::IbRequests.id_fields());
    }

    #[test]
    fn explicit_id_fields_override_the_resource() {
        let config = SelectionConfig::from_json_for(
            TargetResource::Agents,
            r#"{"id_fields": {"include": "user_ids", "exclude": "non_user_ids"}}"#,
        )
        .unwrap();
        assert_eq!(config.id_fields, IdFieldNames::new("user_ids", "non_user_ids"));
    }

    #[test]
    fn rejects_zero_page_size() {
        assert!(matches!(
            SelectionConfig::from_json(r#"{"default_per_page": 0}"#),
            Err(ConfigError::OutOfRange(_))
        ));
    }

    #[test]
    fn rejects_identical_id_fields() {
        let mut config = SelectionConfig::default();
        config.id_fields.exclude = config.id_fields.include.clone();
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(
            SelectionConfig::from_json("{"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn backoff_grows_and_caps() {
        let policy = ConsistencyPolicy::default();
        assert_eq!(policy.backoff(1), Duration::from_millis(250));
        assert_eq!(policy.backoff(2), Duration::from_millis(500));
        assert_eq!(policy.backoff(3), Duration::from_millis(1000));
        assert_eq!(policy.backoff(10), Duration::from_millis(4000));
    }

    #[test]
    fn policy_validation() {
        let mut policy = ConsistencyPolicy::default();
        policy.multiplier = 0.5;
        assert!(policy.validate().is_err());
        policy.multiplier = 2.0;
        policy.max_backoff_ms = 10;
        assert!(policy.validate().is_err());
    }
}
