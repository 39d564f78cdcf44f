#![doc = include_str!("../docs/rustdoc.md")]

/// Unread badge and history panel.
pub mod bell;
/// Startup system checks and demo collaborators.
pub mod checks;
/// Command-line argument definitions.
pub mod cli;
/// Runtime configuration model.
pub mod config;
/// Error types used across the crate.
pub mod error;
/// Store change feed and toast commands.
pub mod events;
/// Terminal output formatters.
pub mod formatter;
/// Metrics and status snapshot.
pub mod monitoring;
/// Notification store and the collaborator-facing notifier.
pub mod store;
/// Toast presenter state machine and timer task.
pub mod toast;
/// Tracing/logging initialization.
pub mod tracing_setup;
/// Notification record model.
pub mod types;
/// UI controller and presentation loop.
pub mod ui;

/// Primary crate error type.
pub use error::NotifyError;
pub use store::{NotificationStore, Notifier, NotifierHandle, SharedStore};
pub use types::{NotificationId, NotificationKind, NotificationRecord};
