use crate::{error::NotifyError, store::NotificationStore};
use anyhow::Result;
use metrics::{Counter, Gauge, counter, gauge};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::{net::SocketAddr, sync::LazyLock};
use tracing::{error, info};

// Global metrics
pub static PUBLISHED_COUNTER: LazyLock<Counter> =
    LazyLock::new(|| counter!("notifications_published_total"));
pub static REMOVED_COUNTER: LazyLock<Counter> =
    LazyLock::new(|| counter!("notifications_removed_total"));
pub static TOAST_EXPIRED_COUNTER: LazyLock<Counter> =
    LazyLock::new(|| counter!("toasts_expired_total"));
pub static UNREAD_GAUGE: LazyLock<Gauge> = LazyLock::new(|| gauge!("notifications_unread"));

pub async fn setup_metrics(port: u16) -> Result<()> {
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();

    let builder = PrometheusBuilder::new()
        .with_http_listener(addr)
        .add_global_label("service", "rs-notify-center")
        .add_global_label("version", env!("CARGO_PKG_VERSION"));

    match builder.install() {
        Ok(_handle) => {
            info!(
                "Prometheus metrics server started on http://{}/metrics",
                addr
            );

            PUBLISHED_COUNTER.absolute(0);
            REMOVED_COUNTER.absolute(0);
            TOAST_EXPIRED_COUNTER.absolute(0);
            UNREAD_GAUGE.set(0.0);

            Ok(())
        }
        Err(e) => {
            error!("Failed to start metrics server: {}", e);
            Err(NotifyError::MetricsError(e.to_string()).into())
        }
    }
}

/// Point-in-time summary of the notification center.
#[derive(Debug)]
pub struct CenterStatus {
    pub total: usize,
    pub unread: usize,
    pub visible_toasts: usize,
    pub newest: Option<chrono::DateTime<chrono::Utc>>,
    pub uptime: chrono::Duration,
}

impl CenterStatus {
    pub fn capture(
        store: &NotificationStore,
        visible_toasts: usize,
        started_at: chrono::DateTime<chrono::Utc>,
    ) -> Self {
        Self {
            total: store.len(),
            unread: store.unread_count(),
            visible_toasts,
            newest: store.records().first().map(|r| r.created_at),
            uptime: chrono::Utc::now() - started_at,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "status": if self.unread > 0 { "attention" } else { "clear" },
            "total": self.total,
            "unread": self.unread,
            "visible_toasts": self.visible_toasts,
            "newest": self.newest,
            "uptime_seconds": self.uptime.num_seconds(),
            "timestamp": chrono::Utc::now()
        })
    }
}
