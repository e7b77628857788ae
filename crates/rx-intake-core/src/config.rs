//! Runtime configuration.
//!
//! Precedence: environment (`RX_INTAKE_*`) > TOML file > defaults. The file is
//! looked up at the explicit path, then `$RX_INTAKE_CONFIG`, then
//! `./rx-intake.toml`; a missing file is only an error when required.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default config file name in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "rx-intake.toml";

const ENV_PREFIX: &str = "RX_INTAKE_";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntakeConfig {
    pub database: DatabaseConfig,
    pub catalog: CatalogConfig,
    pub clinic: ClinicConfig,
    pub prescription: PrescriptionConfig,
    pub email: EmailConfig,
    pub admin: AdminConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: PathBuf,
}

/// Where the product catalog comes from; the built-in catalog when unset.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub path: Option<PathBuf>,
}

/// Letterhead printed on every prescription.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClinicConfig {
    pub name: String,
    pub address_lines: Vec<String>,
    pub email: Option<String>,
    pub prescriber: String,
    pub qualifications: Option<String>,
    pub registration_number: Option<String>,
    pub contact: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrescriptionConfig {
    /// Course length printed per line
    pub days: u32,
    /// Intake remark printed per line
    pub remark: String,
    pub advice: Vec<String>,
    pub notes: Vec<String>,
    pub guidance_url: Option<String>,
    pub validity_note: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailConfig {
    pub sender_name: String,
    pub sender_address: String,
    /// Sign-off line under the body
    pub signature: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    pub page_size: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("rx-intake.db"),
        }
    }
}

impl Default for ClinicConfig {
    fn default() -> Self {
        Self {
            name: "Health Solution Clinic".to_string(),
            address_lines: Vec::new(),
            email: None,
            prescriber: "Consulting Physician".to_string(),
            qualifications: None,
            registration_number: None,
            contact: None,
        }
    }
}

impl Default for PrescriptionConfig {
    fn default() -> Self {
        Self {
            days: 30,
            remark: "After Meal - Daily".to_string(),
            advice: vec![
                "Start with the lowest dose. If needed, increase by 1 drop every third day until the maximum dose is reached.".to_string(),
                "Stop increasing once the desired effect is achieved.".to_string(),
            ],
            notes: vec![
                "Dropper size = 1 mL".to_string(),
                "1 mL = 20 drops".to_string(),
                "1 drop = 0.02 mL".to_string(),
                "5 mL syringe = 100 drops (100 servings)".to_string(),
            ],
            guidance_url: None,
            validity_note: "THIS PRESCRIPTION IS VALID ONLY FOR THE NEXT 24 HOURS.".to_string(),
        }
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            sender_name: "Health Solution Clinic".to_string(),
            sender_address: "prescriptions@localhost".to_string(),
            signature: "Consulting Physician".to_string(),
        }
    }
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self { page_size: 10 }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Compact,
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl IntakeConfig {
    /// Load configuration from file and process environment.
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        Self::load_with_env(options, |key| std::env::var(key).ok())
    }

    /// Load configuration with an explicit environment lookup.
    pub fn load_with_env<F>(options: LoadOptions, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let explicit = options
            .config_path
            .clone()
            .or_else(|| env("RX_INTAKE_CONFIG").map(PathBuf::from));

        let mut config = match resolve_config_path(explicit.as_deref()) {
            Some(path) => Self::from_file(&path)?,
            None if options.require_file => {
                let expected = explicit.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
                return Err(ConfigError::MissingConfigFile(expected));
            }
            None => Self::default(),
        };

        config.apply_env_overrides(env)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML file; keys left out keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::ParseFile {
            path: path.to_path_buf(),
            source,
        })
    }

    fn apply_env_overrides<F>(&mut self, env: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| {
            env(&format!("{ENV_PREFIX}{name}"))
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        if let Some(value) = read("DATABASE_PATH") {
            self.database.path = PathBuf::from(value);
        }
        if let Some(value) = read("CATALOG_PATH") {
            self.catalog.path = Some(PathBuf::from(value));
        }
        if let Some(value) = read("LOG_LEVEL") {
            self.logging.level = value;
        }
        if let Some(value) = read("LOG_FORMAT") {
            self.logging.format =
                value
                    .parse()
                    .map_err(|_| ConfigError::InvalidEnvOverride {
                        key: format!("{ENV_PREFIX}LOG_FORMAT"),
                        value: value.clone(),
                    })?;
        }
        if let Some(value) = read("ADMIN_PAGE_SIZE") {
            self.admin.page_size =
                value
                    .parse()
                    .map_err(|_| ConfigError::InvalidEnvOverride {
                        key: format!("{ENV_PREFIX}ADMIN_PAGE_SIZE"),
                        value: value.clone(),
                    })?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.admin.page_size == 0 {
            return Err(ConfigError::Validation(
                "admin.page_size must be greater than zero".to_string(),
            ));
        }
        if self.prescription.days == 0 {
            return Err(ConfigError::Validation(
                "prescription.days must be greater than zero".to_string(),
            ));
        }
        if self.clinic.name.trim().is_empty() || self.clinic.prescriber.trim().is_empty() {
            return Err(ConfigError::Validation(
                "clinic.name and clinic.prescriber must not be empty".to_string(),
            ));
        }
        if !self.email.sender_address.contains('@') {
            return Err(ConfigError::Validation(format!(
                "email.sender_address `{}` is not an address",
                self.email.sender_address
            )));
        }
        let level = self.logging.level.to_ascii_lowercase();
        if !["trace", "debug", "info", "warn", "error"].contains(&level.as_str()) {
            return Err(ConfigError::Validation(format!(
                "unsupported log level `{}`",
                self.logging.level
            )));
        }
        Ok(())
    }
}

fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    match explicit {
        Some(path) if path.exists() => Some(path.to_path_buf()),
        Some(_) => None,
        None => {
            let default = PathBuf::from(DEFAULT_CONFIG_FILE);
            default.exists().then_some(default)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::fs;

    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn options(path: PathBuf) -> LoadOptions {
        LoadOptions {
            config_path: Some(path),
            require_file: true,
        }
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = IntakeConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.prescription.days, 30);
        assert_eq!(config.admin.page_size, 10);
        assert!(config.catalog.path.is_none());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rx-intake.toml");
        fs::write(
            &path,
            r#"
[database]
path = "/var/lib/rx/intake.db"

[clinic]
name = "Green Leaf Clinic"
prescriber = "Dr. A. Example"
address_lines = ["12 Main Road", "Thane 401107"]

[logging]
format = "json"
"#,
        )
        .unwrap();

        let config = IntakeConfig::load_with_env(options(path), no_env).unwrap();
        assert_eq!(config.database.path, PathBuf::from("/var/lib/rx/intake.db"));
        assert_eq!(config.clinic.name, "Green Leaf Clinic");
        assert_eq!(config.clinic.address_lines.len(), 2);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.prescription.remark, "After Meal - Daily");
    }

    #[test]
    fn test_env_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rx-intake.toml");
        fs::write(&path, "[admin]\npage_size = 25\n").unwrap();

        let env = env_from(&[
            ("RX_INTAKE_ADMIN_PAGE_SIZE", "50"),
            ("RX_INTAKE_CATALOG_PATH", "/etc/rx/products.json"),
            ("RX_INTAKE_LOG_LEVEL", "debug"),
        ]);
        let config = IntakeConfig::load_with_env(options(path), env).unwrap();
        assert_eq!(config.admin.page_size, 50);
        assert_eq!(config.catalog.path, Some(PathBuf::from("/etc/rx/products.json")));
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_invalid_env_override() {
        let env = env_from(&[("RX_INTAKE_ADMIN_PAGE_SIZE", "lots")]);
        let err = IntakeConfig::load_with_env(
            LoadOptions {
                config_path: Some(PathBuf::from("/nonexistent/rx-intake.toml")),
                require_file: false,
            },
            env,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvOverride { .. }));
    }

    #[test]
    fn test_missing_required_file() {
        let err = IntakeConfig::load_with_env(
            options(PathBuf::from("/nonexistent/rx-intake.toml")),
            no_env,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::MissingConfigFile(_)));
    }

    #[test]
    fn test_parse_error_names_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        fs::write(&path, "[admin\npage_size = ").unwrap();

        let err = IntakeConfig::load_with_env(options(path.clone()), no_env).unwrap_err();
        match err {
            ConfigError::ParseFile { path: p, .. } => assert_eq!(p, path),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_validation_rejects_zero_page_size() {
        let mut config = IntakeConfig::default();
        config.admin.page_size = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_validation_rejects_unknown_log_level() {
        let env = env_from(&[("RX_INTAKE_LOG_LEVEL", "chatty")]);
        let err = IntakeConfig::load_with_env(
            LoadOptions {
                config_path: Some(PathBuf::from("/nonexistent/rx-intake.toml")),
                require_file: false,
            },
            env,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }
}
