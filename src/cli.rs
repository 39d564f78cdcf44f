use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "rs-notify-center",
    about = "in-process notification center with auto-expiring toasts and an unread history bell",
    version
)]
pub struct Args {
    /// How long each toast stays visible, in milliseconds
    #[arg(long, default_value = "5000")]
    pub toast_ms: u64,

    /// Exit transition length before a toast is retired, in milliseconds
    #[arg(long, default_value = "300")]
    pub exit_ms: u64,

    /// Maximum number of toasts shown at once
    #[arg(long, default_value = "3")]
    pub max_toasts: usize,

    /// Keep expired toasts in the history panel instead of deleting them
    #[arg(long)]
    pub keep_history: bool,

    /// Days ahead to warn about expiring renewals
    #[arg(long, default_value = "3", allow_negative_numbers = true)]
    pub reminder_days: i64,

    /// Active products with stock below this value are reported as low
    #[arg(long, default_value = "5")]
    pub low_stock_threshold: u32,

    /// Active currency announced at startup
    #[arg(long, default_value = "USD")]
    pub currency: String,

    /// Skip the startup system checks
    #[arg(long)]
    pub no_checks: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    pub log_level: String,

    /// Output logs in JSON format
    #[arg(long)]
    pub json_logs: bool,

    /// Enable metrics server
    #[arg(long)]
    pub metrics: bool,

    /// Metrics server port
    #[arg(long, default_value = "9090")]
    pub metrics_port: u16,

    /// Output format: table, json, minimal
    #[arg(long, default_value = "table")]
    pub format: String,

    /// Disable colored output (useful for piping to files)
    #[arg(long)]
    pub no_color: bool,

    /// Quiet mode - only print what commands explicitly ask for
    #[arg(long)]
    pub quiet: bool,
}
