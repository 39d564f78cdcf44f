/// file: src/config.rs
/// description: Configuration management built from CLI arguments for toasts, system checks and output
use crate::{cli::Args, error::NotifyError, formatter::OutputFormat};
use anyhow::Result;
use std::time::Duration;

pub const DEFAULT_DISPLAY_DURATION: Duration = Duration::from_secs(5);
pub const DEFAULT_EXIT_DURATION: Duration = Duration::from_millis(300);
pub const DEFAULT_MAX_VISIBLE: usize = 3;

#[derive(Debug, Clone)]
pub struct Config {
    pub toast: ToastConfig,
    pub checks: ChecksConfig,
    pub metrics: MetricsConfig,
    pub output: OutputConfig,
}

/// What happens to a record once its toast has finished exiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExpiryPolicy {
    /// Delete the record from the store, so it also leaves the history panel.
    #[default]
    Remove,
    /// Keep the record in history and only retire it from the toast stack.
    Hide,
}

#[derive(Debug, Clone)]
pub struct ToastConfig {
    pub display_duration: Duration,
    pub exit_duration: Duration,
    pub max_visible: usize,
    pub expiry_policy: ExpiryPolicy,
}

impl Default for ToastConfig {
    fn default() -> Self {
        Self {
            display_duration: DEFAULT_DISPLAY_DURATION,
            exit_duration: DEFAULT_EXIT_DURATION,
            max_visible: DEFAULT_MAX_VISIBLE,
            expiry_policy: ExpiryPolicy::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChecksConfig {
    pub renewal_reminder_days: i64,
    pub low_stock_threshold: u32,
    pub currency: String,
}

impl Default for ChecksConfig {
    fn default() -> Self {
        Self {
            renewal_reminder_days: 3,
            low_stock_threshold: 5,
            currency: "USD".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MetricsConfig {
    pub enabled: bool,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub colored: bool,
    pub quiet: bool,
}

impl Config {
    pub fn from_args(args: &Args) -> Result<Self> {
        if args.max_toasts == 0 {
            return Err(NotifyError::InvalidConfig {
                reason: "--max-toasts must be at least 1".to_string(),
            }
            .into());
        }

        if args.toast_ms == 0 {
            return Err(NotifyError::InvalidConfig {
                reason: "--toast-ms must be greater than zero".to_string(),
            }
            .into());
        }

        if args.reminder_days < 0 {
            return Err(NotifyError::InvalidConfig {
                reason: "--reminder-days cannot be negative".to_string(),
            }
            .into());
        }

        Ok(Config {
            toast: ToastConfig {
                display_duration: Duration::from_millis(args.toast_ms),
                exit_duration: Duration::from_millis(args.exit_ms),
                max_visible: args.max_toasts,
                expiry_policy: if args.keep_history {
                    ExpiryPolicy::Hide
                } else {
                    ExpiryPolicy::Remove
                },
            },
            checks: ChecksConfig {
                renewal_reminder_days: args.reminder_days,
                low_stock_threshold: args.low_stock_threshold,
                currency: args.currency.to_uppercase(),
            },
            metrics: MetricsConfig {
                enabled: args.metrics,
                port: args.metrics_port,
            },
            output: OutputConfig {
                format: OutputFormat::from(args.format.as_str()),
                colored: !args.no_color,
                quiet: args.quiet,
            },
        })
    }
}
