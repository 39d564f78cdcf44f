use thiserror::Error;

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("Unknown notification kind: {0} (expected success, error, warning or info)")]
    UnknownKind(String),

    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    #[error("Event send error: {0}")]
    EventSendError(String),

    #[error("Metrics server error: {0}")]
    MetricsError(String),
}
