/// file: src/events.rs
/// description: Change feed from the store to the views, and commands from the UI to the toast runner
use crate::types::{NotificationId, NotificationKind};
use tokio::sync::{broadcast, mpsc};

/// Change notices only. Views re-read the store to derive what they show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    Published {
        id: NotificationId,
        kind: NotificationKind,
    },
    MarkedRead {
        id: NotificationId,
    },
    MarkedAllRead {
        count: usize,
    },
    Removed {
        id: NotificationId,
    },
    ToastHidden {
        id: NotificationId,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToastCommand {
    Dismiss(NotificationId),
    Shutdown,
}

// Startup checks can publish a burst before any view has drained the feed.
// A lagging subscriber just re-derives, so dropped notices are harmless.
const EVENT_CHANNEL_CAPACITY: usize = 1_024;
const COMMAND_CHANNEL_CAPACITY: usize = 64;

pub type EventSender = broadcast::Sender<StoreEvent>;
pub type EventReceiver = broadcast::Receiver<StoreEvent>;
pub type CommandSender = mpsc::Sender<ToastCommand>;
pub type CommandReceiver = mpsc::Receiver<ToastCommand>;

pub fn create_event_channel() -> (EventSender, EventReceiver) {
    broadcast::channel(EVENT_CHANNEL_CAPACITY)
}

pub fn create_command_channel() -> (CommandSender, CommandReceiver) {
    mpsc::channel(COMMAND_CHANNEL_CAPACITY)
}
