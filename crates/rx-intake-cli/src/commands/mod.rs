pub mod catalog;
pub mod dose;
pub mod intakes;
pub mod recommend;
pub mod submit;

use rx_intake_core::config::ConfigError;
use rx_intake_core::db::DbError;
use rx_intake_core::service::ServiceError;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}

impl CommandResult {
    pub fn success(command: &str, data: Value) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "ok".to_string(),
            error_class: None,
            message: None,
            data: Some(data),
        };
        Self { exit_code: 0, output: serialize_payload(payload) }
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: Some(message.into()),
            data: None,
        };
        Self { exit_code, output: serialize_payload(payload) }
    }

    /// Map a command outcome onto the JSON envelope and exit code.
    pub fn from_outcome(command: &str, outcome: anyhow::Result<Value>) -> Self {
        match outcome {
            Ok(data) => Self::success(command, data),
            Err(error) => {
                let (class, code) = classify(&error);
                Self::failure(command, class, format!("{error:#}"), code)
            }
        }
    }
}

fn classify(error: &anyhow::Error) -> (&'static str, u8) {
    for cause in error.chain() {
        if cause.downcast_ref::<ConfigError>().is_some() {
            return ("config_validation", 2);
        }
        if let Some(DbError::NotFound(_)) = cause.downcast_ref::<DbError>() {
            return ("not_found", 3);
        }
        if let Some(ServiceError::Db(DbError::NotFound(_))) = cause.downcast_ref::<ServiceError>() {
            return ("not_found", 3);
        }
        if cause.downcast_ref::<InvalidArgument>().is_some() {
            return ("invalid_argument", 4);
        }
    }
    ("runtime", 1)
}

/// Argument that parsed but makes no sense for the command.
#[derive(Debug)]
pub struct InvalidArgument(pub String);

impl std::fmt::Display for InvalidArgument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for InvalidArgument {}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}
