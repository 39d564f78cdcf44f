/// file: src/bell.rs
/// description: Unread badge and the full history panel, both derived from the store
use crate::{
    store::NotificationStore,
    types::{NotificationId, NotificationKind},
};
use chrono::{DateTime, Local, Utc};
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    pub id: NotificationId,
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    pub read: bool,
    pub time: String,
}

/// Short wall-clock form used in the history panel, e.g. `14:05`.
pub fn short_time(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%H:%M").to_string()
}

/// Holds only panel visibility; everything else is read from the store on demand.
#[derive(Debug, Default)]
pub struct BellSummary {
    open: bool,
}

impl BellSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    pub fn unread_count(&self, store: &NotificationStore) -> usize {
        store.unread_count()
    }

    pub fn badge_visible(&self, store: &NotificationStore) -> bool {
        store.unread_count() > 0
    }

    pub fn history(&self, store: &NotificationStore) -> Vec<HistoryEntry> {
        store
            .records()
            .iter()
            .map(|r| HistoryEntry {
                id: r.id,
                title: r.title.clone(),
                message: r.message.clone(),
                kind: r.kind,
                read: r.read,
                time: short_time(r.created_at),
            })
            .collect()
    }

    /// Whether the "mark all read" action is on offer.
    pub fn can_mark_all_read(&self, store: &NotificationStore) -> bool {
        self.badge_visible(store)
    }

    /// Returns false when the action was not offered (nothing unread).
    pub fn mark_all_read(&self, store: &mut NotificationStore) -> bool {
        if !self.can_mark_all_read(store) {
            return false;
        }
        store.mark_all_read();
        true
    }

    pub fn mark_read(&self, store: &mut NotificationStore, id: NotificationId) {
        store.mark_read(id);
    }

    pub fn dismiss(&self, store: &mut NotificationStore, id: NotificationId) {
        debug!(id = %id, "Dismissed from history panel");
        store.remove(id);
    }
}
