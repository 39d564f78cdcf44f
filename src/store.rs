/// file: src/store.rs
/// description: Single source of truth for notification records and the only place they change
use crate::{
    events::{EventReceiver, EventSender, StoreEvent, create_event_channel},
    monitoring,
    types::{NotificationId, NotificationKind, NotificationRecord},
};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Inbound interface for collaborators (CRUD screens, system checks).
///
/// Fire-and-forget: nothing is handed back to the caller.
pub trait Notifier {
    fn publish(&mut self, title: &str, message: &str, kind: NotificationKind);
}

#[derive(Debug)]
pub struct NotificationStore {
    // newest first
    records: Vec<NotificationRecord>,
    events: EventSender,
}

impl Default for NotificationStore {
    fn default() -> Self {
        let (events, _) = create_event_channel();
        Self {
            records: Vec::new(),
            events,
        }
    }
}

impl NotificationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to the change feed. Every effective mutation emits one event.
    pub fn subscribe(&self) -> EventReceiver {
        self.events.subscribe()
    }

    pub fn publish(
        &mut self,
        title: impl Into<String>,
        message: impl Into<String>,
        kind: NotificationKind,
    ) -> NotificationId {
        let record = NotificationRecord::new(title, message, kind);
        let id = record.id;

        info!(
            id = %id,
            kind = %kind,
            title = %record.title,
            "Notification published"
        );

        self.records.insert(0, record);
        monitoring::PUBLISHED_COUNTER.increment(1);
        self.emit(StoreEvent::Published { id, kind });
        id
    }

    pub fn mark_read(&mut self, id: NotificationId) {
        if let Some(record) = self.records.iter_mut().find(|r| r.id == id)
            && !record.read
        {
            record.read = true;
            debug!(id = %id, "Notification marked read");
            self.emit(StoreEvent::MarkedRead { id });
        }
    }

    pub fn mark_all_read(&mut self) {
        let mut count = 0;
        for record in self.records.iter_mut().filter(|r| !r.read) {
            record.read = true;
            count += 1;
        }

        if count > 0 {
            debug!(count, "All notifications marked read");
            self.emit(StoreEvent::MarkedAllRead { count });
        }
    }

    pub fn remove(&mut self, id: NotificationId) {
        let before = self.records.len();
        self.records.retain(|r| r.id != id);

        if self.records.len() < before {
            debug!(id = %id, "Notification removed");
            monitoring::REMOVED_COUNTER.increment(1);
            self.emit(StoreEvent::Removed { id });
        }
    }

    /// Retire a record from the toast stack while keeping it in history.
    pub fn hide_toast(&mut self, id: NotificationId) {
        if let Some(record) = self.records.iter_mut().find(|r| r.id == id)
            && !record.toast_hidden
        {
            record.toast_hidden = true;
            debug!(id = %id, "Toast hidden, record kept in history");
            self.emit(StoreEvent::ToastHidden { id });
        }
    }

    pub fn unread_count(&self) -> usize {
        self.records.iter().filter(|r| !r.read).count()
    }

    pub fn records(&self) -> &[NotificationRecord] {
        &self.records
    }

    pub fn get(&self, id: NotificationId) -> Option<&NotificationRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn contains(&self, id: NotificationId) -> bool {
        self.get(id).is_some()
    }

    /// Resolve an id prefix as typed on the command line. Ambiguous prefixes resolve to nothing.
    pub fn find_by_prefix(&self, prefix: &str) -> Option<NotificationId> {
        let prefix = prefix.trim().to_lowercase();
        if prefix.is_empty() {
            return None;
        }

        let mut matches = self
            .records
            .iter()
            .filter(|r| r.id.to_string().replace('-', "").starts_with(&prefix));
        match (matches.next(), matches.next()) {
            (Some(record), None) => Some(record.id),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The newest `max` records still eligible to show as toasts, in store order.
    pub fn toast_candidates(&self, max: usize) -> Vec<&NotificationRecord> {
        self.records
            .iter()
            .filter(|r| r.is_toast_candidate())
            .take(max)
            .collect()
    }

    fn emit(&self, event: StoreEvent) {
        monitoring::UNREAD_GAUGE.set(self.unread_count() as f64);
        // No subscribers is fine: the store stays authoritative.
        let _ = self.events.send(event);
    }
}

impl Notifier for NotificationStore {
    fn publish(&mut self, title: &str, message: &str, kind: NotificationKind) {
        NotificationStore::publish(self, title, message, kind);
    }
}

pub type SharedStore = Arc<Mutex<NotificationStore>>;

pub fn shared(store: NotificationStore) -> SharedStore {
    Arc::new(Mutex::new(store))
}

/// Cloneable publishing handle for collaborators running on the async side.
#[derive(Debug, Clone)]
pub struct NotifierHandle(SharedStore);

impl NotifierHandle {
    pub fn new(store: SharedStore) -> Self {
        Self(store)
    }

    pub async fn publish(&self, title: &str, message: &str, kind: NotificationKind) {
        Notifier::publish(&mut *self.0.lock().await, title, message, kind);
    }

    /// Run several publishes under one lock so nothing interleaves with them.
    pub async fn batch<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut dyn Notifier) -> R,
    {
        let mut store = self.0.lock().await;
        f(&mut *store)
    }
}
