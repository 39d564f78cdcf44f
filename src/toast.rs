/// file: src/toast.rs
/// description: Bounded, self-expiring toast stack derived from the store, plus the tokio task that drives its timers
use crate::{
    config::{ExpiryPolicy, ToastConfig},
    events::{CommandReceiver, EventReceiver, ToastCommand},
    monitoring,
    store::{NotificationStore, SharedStore},
    types::{NotificationId, NotificationKind, NotificationRecord},
};
use tokio::sync::{broadcast::error::RecvError, watch};
use tokio::time::{Instant, sleep_until};
use tracing::{debug, info, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastPhase {
    Visible { until: Instant },
    Exiting { until: Instant },
}

impl ToastPhase {
    fn deadline(&self) -> Instant {
        match self {
            ToastPhase::Visible { until } | ToastPhase::Exiting { until } => *until,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: NotificationId,
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    pub phase: ToastPhase,
}

impl Toast {
    fn show(record: &NotificationRecord, until: Instant) -> Self {
        Self {
            id: record.id,
            title: record.title.clone(),
            message: record.message.clone(),
            kind: record.kind,
            phase: ToastPhase::Visible { until },
        }
    }

    pub fn is_exiting(&self) -> bool {
        matches!(self.phase, ToastPhase::Exiting { .. })
    }
}

/// Per-toast lifecycle `Visible -> Exiting -> gone`.
///
/// The visible set is never stored independently of the store: [`sync`](Self::sync)
/// re-derives it and only carries over the timers of toasts that are still in it.
/// A visible toast that drops out of the derived set (removed from history, marked
/// read, pushed out by newer toasts) loses its timer. A toast that is already
/// exiting keeps running off-screen until its exit completes, unless its record
/// has left the store.
#[derive(Debug)]
pub struct ToastPresenter {
    config: ToastConfig,
    toasts: Vec<Toast>,
    // exiting, no longer rendered
    leaving: Vec<Toast>,
}

impl ToastPresenter {
    pub fn new(config: ToastConfig) -> Self {
        Self {
            config,
            toasts: Vec::new(),
            leaving: Vec::new(),
        }
    }

    pub fn visible(&self) -> &[Toast] {
        &self.toasts
    }

    pub fn sync(&mut self, store: &NotificationStore, now: Instant) {
        let mut previous = std::mem::take(&mut self.toasts);

        for record in store.toast_candidates(self.config.max_visible) {
            let carried = match previous.iter().position(|t| t.id == record.id) {
                Some(index) => Some(previous.swap_remove(index)),
                None => self
                    .leaving
                    .iter()
                    .position(|t| t.id == record.id)
                    .map(|index| self.leaving.swap_remove(index)),
            };
            let toast = carried.unwrap_or_else(|| {
                debug!(id = %record.id, kind = %record.kind, "Toast shown");
                Toast::show(record, now + self.config.display_duration)
            });
            self.toasts.push(toast);
        }

        for dropped in previous {
            if dropped.is_exiting() {
                trace!(id = %dropped.id, "Exiting toast moved off-screen");
                self.leaving.push(dropped);
            } else {
                trace!(id = %dropped.id, "Toast timer cancelled");
            }
        }

        self.leaving.retain(|toast| store.contains(toast.id));
    }

    /// Start the exit transition early. Returns false when the toast is not visible
    /// or is already exiting.
    pub fn dismiss(&mut self, id: NotificationId, now: Instant) -> bool {
        let exit = self.config.exit_duration;
        match self.toasts.iter_mut().find(|t| t.id == id) {
            Some(toast) if !toast.is_exiting() => {
                toast.phase = ToastPhase::Exiting { until: now + exit };
                debug!(id = %id, "Toast dismissed");
                true
            }
            _ => false,
        }
    }

    /// Move expired toasts along their lifecycle and return the ids whose exit
    /// transition has completed. Those toasts are no longer rendered.
    pub fn advance(&mut self, now: Instant) -> Vec<NotificationId> {
        let exit = self.config.exit_duration;

        for toast in self.toasts.iter_mut() {
            if let ToastPhase::Visible { until } = toast.phase
                && until <= now
            {
                trace!(id = %toast.id, "Toast display time elapsed");
                toast.phase = ToastPhase::Exiting { until: until + exit };
            }
        }

        let mut finished = Vec::new();
        let mut exit_elapsed = |toast: &Toast| match toast.phase {
            ToastPhase::Exiting { until } if until <= now => {
                finished.push(toast.id);
                false
            }
            _ => true,
        };
        self.toasts.retain(&mut exit_elapsed);
        self.leaving.retain(&mut exit_elapsed);
        finished
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.toasts
            .iter()
            .chain(&self.leaving)
            .map(|t| t.phase.deadline())
            .min()
    }

    /// Apply the terminal action for finished toasts, then promote whatever
    /// is next in line.
    pub fn tick(&mut self, store: &mut NotificationStore, now: Instant) -> Vec<NotificationId> {
        let finished = self.advance(now);

        for id in &finished {
            if !store.contains(*id) {
                trace!(id = %id, "Toast record already gone");
                continue;
            }

            monitoring::TOAST_EXPIRED_COUNTER.increment(1);
            match self.config.expiry_policy {
                ExpiryPolicy::Remove => store.remove(*id),
                ExpiryPolicy::Hide => store.hide_toast(*id),
            }
            info!(id = %id, policy = ?self.config.expiry_policy, "Toast retired");
        }

        self.sync(store, now);
        finished
    }
}

/// Owns the presenter and drives its timers from a single task.
pub struct ToastRunner {
    store: SharedStore,
    presenter: ToastPresenter,
    events: EventReceiver,
    commands: CommandReceiver,
    view: watch::Sender<Vec<Toast>>,
}

impl ToastRunner {
    pub async fn new(
        store: SharedStore,
        config: ToastConfig,
        commands: CommandReceiver,
    ) -> (Self, watch::Receiver<Vec<Toast>>) {
        let events = store.lock().await.subscribe();
        let (view, view_rx) = watch::channel(Vec::new());

        (
            Self {
                store,
                presenter: ToastPresenter::new(config),
                events,
                commands,
                view,
            },
            view_rx,
        )
    }

    pub async fn run(mut self) {
        info!("Toast runner started");
        self.resync().await;

        loop {
            let deadline = self.presenter.next_deadline();

            tokio::select! {
                event = self.events.recv() => match event {
                    Ok(event) => {
                        trace!(?event, "Store changed");
                        self.resync().await;
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        debug!(skipped, "Toast runner lagged behind store events");
                        self.resync().await;
                    }
                    Err(RecvError::Closed) => break,
                },
                command = self.commands.recv() => match command {
                    Some(ToastCommand::Dismiss(id)) => {
                        if self.presenter.dismiss(id, Instant::now()) {
                            self.publish_view();
                        }
                    }
                    Some(ToastCommand::Shutdown) | None => break,
                },
                _ = sleep_until_deadline(deadline) => {
                    let now = Instant::now();
                    {
                        let mut store = self.store.lock().await;
                        self.presenter.tick(&mut store, now);
                    }
                    self.publish_view();
                }
            }
        }

        info!("Toast runner stopped");
    }

    async fn resync(&mut self) {
        {
            let store = self.store.lock().await;
            self.presenter.sync(&store, Instant::now());
        }
        self.publish_view();
    }

    fn publish_view(&self) {
        let toasts = self.presenter.visible().to_vec();
        self.view.send_if_modified(|current| {
            if *current == toasts {
                false
            } else {
                *current = toasts;
                true
            }
        });
    }
}

async fn sleep_until_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
