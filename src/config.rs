//! Application configuration.
//!
//! Loaded from TOML. Every field has a default, so an empty document is a valid
//! configuration:
//!
//! ```toml
//! trace_level = "debug"
//!
//! [schemas.sign_in]
//! email = [{ rule = "required" }, { rule = "email" }]
//! password = [{ rule = "required" }]
//!
//! [schemas.register]
//! email = [{ rule = "required" }, { rule = "email" }]
//! password = [{ rule = "required" }, { rule = "min_length", min = 8 }]
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::auth::AuthFlow;
use crate::error::ConfigError;
use crate::form::Schema;

#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// `EnvFilter` directive for the tracing subscriber. Default: `"info"`.
    pub trace_level: Option<String>,
    pub schemas: SchemaSet,
}

impl AppConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn trace_level(&self) -> &str {
        self.trace_level.as_deref().unwrap_or("info")
    }
}

/// One schema per flow. A schema section that is left out keeps its built-in rules.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(default)]
pub struct SchemaSet {
    pub sign_in: Schema,
    pub register: Schema,
}

impl Default for SchemaSet {
    fn default() -> Self {
        Self {
            sign_in: Schema::sign_in(),
            register: Schema::register(),
        }
    }
}

impl SchemaSet {
    pub fn for_flow(&self, flow: AuthFlow) -> &Schema {
        match flow {
            AuthFlow::SignIn => &self.sign_in,
            AuthFlow::Register => &self.register,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::Rule;
    use std::io::Write;

    #[test]
    fn empty_document_uses_builtin_schemas() {
        let config = AppConfig::from_toml_str("").expect("empty config parses");
        assert_eq!(config.trace_level(), "info");
        assert_eq!(config.schemas.sign_in, Schema::sign_in());
        assert_eq!(config.schemas.register, Schema::register());
    }

    #[test]
    fn each_flow_gets_its_own_schema() {
        let schemas = SchemaSet::default();
        assert_eq!(schemas.for_flow(AuthFlow::SignIn), &Schema::sign_in());
        assert_eq!(schemas.for_flow(AuthFlow::Register), &Schema::register());
        assert_ne!(
            schemas.for_flow(AuthFlow::SignIn),
            schemas.for_flow(AuthFlow::Register)
        );
    }

    #[test]
    fn partial_override_keeps_other_schema() {
        let config = AppConfig::from_toml_str(
            r#"
            trace_level = "debug"

            [schemas.register]
            password = [{ rule = "required" }, { rule = "min_length", min = 12 }]
            "#,
        )
        .expect("config parses");
        assert_eq!(config.trace_level(), "debug");
        assert_eq!(config.schemas.sign_in, Schema::sign_in());
        assert_eq!(
            config.schemas.register.rules("password"),
            &[Rule::required(), Rule::min_length(12)]
        );
        assert!(config.schemas.register.rules("email").is_empty());
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "trace_level = \"warn\"").expect("write config");
        let config = AppConfig::from_file(file.path()).expect("config loads");
        assert_eq!(config.trace_level(), "warn");
    }

    #[test]
    fn unknown_rule_is_a_parse_error() {
        let error = AppConfig::from_toml_str(
            r#"
            [schemas.sign_in]
            email = [{ rule = "telepathy" }]
            "#,
        )
        .expect_err("unknown rule must fail");
        assert!(matches!(error, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let error = AppConfig::from_file(dir.path().join("absent.toml")).expect_err("no file");
        assert!(matches!(error, ConfigError::Io(_)));
    }
}
