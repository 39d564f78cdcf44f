/// file: src/checks.rs
/// description: Startup system checks that report dashboard conditions through the notifier
use crate::{config::ChecksConfig, store::Notifier, types::NotificationKind};
use chrono::{Days, NaiveDate};
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct Renewal {
    pub client_name: String,
    pub service: String,
    pub expiry_date: NaiveDate,
}

#[derive(Debug, Clone)]
pub struct Product {
    pub name: String,
    pub stock: u32,
    pub active: bool,
}

impl Renewal {
    /// Due today or within the next `days` days. Already expired renewals are not due.
    pub fn is_due_within(&self, today: NaiveDate, days: i64) -> bool {
        let left = (self.expiry_date - today).num_days();
        (0..=days).contains(&left)
    }
}

pub fn expiring_renewals(renewals: &[Renewal], today: NaiveDate, days: i64) -> usize {
    renewals
        .iter()
        .filter(|r| r.is_due_within(today, days))
        .count()
}

pub fn low_stock_products(products: &[Product], threshold: u32) -> usize {
    products
        .iter()
        .filter(|p| p.active && p.stock < threshold)
        .count()
}

pub fn run_startup_checks(
    notifier: &mut (impl Notifier + ?Sized),
    config: &ChecksConfig,
    renewals: &[Renewal],
    products: &[Product],
    today: NaiveDate,
) {
    for renewal in renewals
        .iter()
        .filter(|r| r.is_due_within(today, config.renewal_reminder_days))
    {
        debug!(
            client = %renewal.client_name,
            service = %renewal.service,
            expires = %renewal.expiry_date,
            "Renewal due soon"
        );
    }

    let expiring = expiring_renewals(renewals, today, config.renewal_reminder_days);
    if expiring > 0 {
        notifier.publish(
            "Renovaciones Urgentes",
            &format!(
                "Tienes {} suscripciones que vencen en los próximos {} días.",
                expiring, config.renewal_reminder_days
            ),
            NotificationKind::Warning,
        );
    }

    let low_stock = low_stock_products(products, config.low_stock_threshold);
    if low_stock > 0 {
        notifier.publish(
            "Stock Bajo",
            &format!(
                "Atención: {} productos están por debajo del stock mínimo ({}).",
                low_stock, config.low_stock_threshold
            ),
            NotificationKind::Error,
        );
    }

    notifier.publish(
        "Bienvenido",
        &format!("Sistema listo. Moneda activa: {}", config.currency),
        NotificationKind::Info,
    );

    info!(expiring, low_stock, "Startup checks completed");
}

/// Logout is disabled in demo mode; the refusal is reported as an error toast.
pub fn deny_logout(notifier: &mut (impl Notifier + ?Sized)) {
    notifier.publish(
        "Acceso Denegado",
        "El cierre de sesión está desactivado en modo Demo.",
        NotificationKind::Error,
    );
}

pub fn seed_renewals(today: NaiveDate) -> Vec<Renewal> {
    let at = |offset: i64| {
        if offset >= 0 {
            today.checked_add_days(Days::new(offset as u64))
        } else {
            today.checked_sub_days(Days::new(offset.unsigned_abs()))
        }
        .unwrap_or(today)
    };

    [
        ("John Doe", "Netflix", 2),
        ("Sophie Martin", "Spotify", 5),
        ("Maria Garcia", "Disney+", 12),
        ("Carlos Ruiz", "Amazon Prime", -2),
    ]
    .into_iter()
    .map(|(client_name, service, offset)| Renewal {
        client_name: client_name.to_string(),
        service: service.to_string(),
        expiry_date: at(offset),
    })
    .collect()
}

pub fn seed_products() -> Vec<Product> {
    [
        ("Netflix 4K Privada", 45),
        ("Netflix Estándar", 120),
        ("HBO Max Anual", 10),
        ("Prime Video 6 Meses", 5),
        ("Spotify Individual", 200),
    ]
    .into_iter()
    .map(|(name, stock)| Product {
        name: name.to_string(),
        stock,
        active: true,
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::NotificationStore;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 10).unwrap()
    }

    #[test]
    fn expiring_window_is_inclusive_and_skips_expired() {
        let renewals = seed_renewals(today());
        assert_eq!(expiring_renewals(&renewals, today(), 3), 1);
        assert_eq!(expiring_renewals(&renewals, today(), 5), 2);
        assert_eq!(expiring_renewals(&renewals, today(), 0), 0);
    }

    #[test]
    fn seeded_renewal_due_soonest_is_john_doe_netflix() {
        let due: Vec<_> = seed_renewals(today())
            .into_iter()
            .filter(|r| r.is_due_within(today(), 3))
            .map(|r| (r.client_name, r.service))
            .collect();
        assert_eq!(due, vec![("John Doe".to_string(), "Netflix".to_string())]);
    }

    #[test]
    fn low_stock_ignores_inactive_products() {
        let mut products = seed_products();
        assert_eq!(low_stock_products(&products, 5), 0);
        assert_eq!(low_stock_products(&products, 11), 2);

        products[2].active = false;
        assert_eq!(low_stock_products(&products, 11), 1);
    }

    #[test]
    fn startup_checks_publish_in_call_order() {
        let mut store = NotificationStore::new();
        let config = ChecksConfig {
            low_stock_threshold: 11,
            ..ChecksConfig::default()
        };

        run_startup_checks(
            &mut store,
            &config,
            &seed_renewals(today()),
            &seed_products(),
            today(),
        );

        let records = store.records();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].title, "Bienvenido");
        assert_eq!(records[0].message, "Sistema listo. Moneda activa: USD");
        assert_eq!(records[1].title, "Stock Bajo");
        assert_eq!(records[1].kind, NotificationKind::Error);
        assert!(records[1].message.contains("2 productos"));
        assert_eq!(records[2].title, "Renovaciones Urgentes");
        assert_eq!(records[2].kind, NotificationKind::Warning);
    }

    #[test]
    fn quiet_inventory_still_gets_welcome() {
        let mut store = NotificationStore::new();
        run_startup_checks(&mut store, &ChecksConfig::default(), &[], &seed_products(), today());
        assert_eq!(store.len(), 1);
        assert_eq!(store.records()[0].kind, NotificationKind::Info);
    }

    #[test]
    fn logout_refusal_is_an_error() {
        let mut store = NotificationStore::new();
        deny_logout(&mut store);
        assert_eq!(store.records()[0].title, "Acceso Denegado");
        assert_eq!(store.records()[0].kind, NotificationKind::Error);
    }
}
