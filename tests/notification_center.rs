use rs_notify_center::{
    NotifierHandle,
    bell::BellSummary,
    config::{ExpiryPolicy, ToastConfig},
    events::{ToastCommand, create_command_channel},
    formatter::{Colors, NotificationFormatter, OutputFormat},
    store::{NotificationStore, SharedStore, shared},
    toast::{Toast, ToastPresenter, ToastRunner},
    types::NotificationKind,
};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep};

struct Harness {
    store: SharedStore,
    commands: rs_notify_center::events::CommandSender,
    view: watch::Receiver<Vec<Toast>>,
    runner: JoinHandle<()>,
}

impl Harness {
    async fn start(config: ToastConfig) -> Self {
        let store = shared(NotificationStore::new());
        let (commands, receiver) = create_command_channel();
        let (runner, view) = ToastRunner::new(store.clone(), config, receiver).await;
        let runner = tokio::spawn(runner.run());
        Self {
            store,
            commands,
            view,
            runner,
        }
    }

    async fn wait_for_toasts(&mut self, count: usize) -> Vec<Toast> {
        self.view
            .wait_for(|toasts| toasts.len() == count)
            .await
            .unwrap()
            .clone()
    }

    async fn stop(self) {
        self.commands.send(ToastCommand::Shutdown).await.unwrap();
        self.runner.await.unwrap();
    }
}

fn titles(toasts: &[Toast]) -> Vec<&str> {
    toasts.iter().map(|t| t.title.as_str()).collect()
}

#[tokio::test(start_paused = true)]
async fn single_error_notification_shows_badge_and_red_toast() {
    let mut harness = Harness::start(ToastConfig::default()).await;
    harness.store.lock().await.publish(
        "Stock Bajo",
        "3 productos bajo el mínimo",
        NotificationKind::Error,
    );

    let toasts = harness.wait_for_toasts(1).await;
    {
        let store = harness.store.lock().await;
        let bell = BellSummary::new();
        assert_eq!(store.len(), 1);
        assert_eq!(store.unread_count(), 1);
        assert!(bell.badge_visible(&store));
    }

    let rendered =
        NotificationFormatter::new(OutputFormat::Table, true).render_toasts(&toasts);
    assert!(rendered.contains(Colors::BRIGHT_RED));
    assert_eq!(toasts[0].kind, NotificationKind::Error);

    harness.stop().await;
}

#[tokio::test(start_paused = true)]
async fn four_notifications_show_newest_three_and_full_history() {
    let mut harness = Harness::start(ToastConfig::default()).await;
    {
        let mut store = harness.store.lock().await;
        for title in ["A", "B", "C", "D"] {
            store.publish(title, "", NotificationKind::Info);
        }
    }

    let toasts = harness.wait_for_toasts(3).await;
    assert_eq!(titles(&toasts), vec!["D", "C", "B"]);

    let history: Vec<String> = {
        let store = harness.store.lock().await;
        BellSummary::new()
            .history(&store)
            .into_iter()
            .map(|e| e.title)
            .collect()
    };
    assert_eq!(history, vec!["D", "C", "B", "A"]);

    harness.store.lock().await.mark_all_read();
    harness.wait_for_toasts(0).await;
    {
        let store = harness.store.lock().await;
        assert_eq!(store.unread_count(), 0);
        assert_eq!(store.len(), 4);
    }

    harness.stop().await;
}

#[tokio::test(start_paused = true)]
async fn toast_expiry_removes_record_after_exit_transition() {
    let mut harness = Harness::start(ToastConfig::default()).await;
    let id = harness
        .store
        .lock()
        .await
        .publish("Bienvenido", "Sistema listo", NotificationKind::Info);
    harness.wait_for_toasts(1).await;

    sleep(Duration::from_millis(5_100)).await;
    {
        let store = harness.store.lock().await;
        assert!(store.contains(id));
        assert!(harness.view.borrow()[0].is_exiting());
    }

    sleep(Duration::from_millis(300)).await;
    {
        let store = harness.store.lock().await;
        assert!(!store.contains(id));
        assert_eq!(store.unread_count(), 0);
    }
    assert!(harness.view.borrow().is_empty());

    harness.stop().await;
}

#[tokio::test(start_paused = true)]
async fn manual_dismiss_exits_early_and_promotes_next_unread() {
    let mut harness = Harness::start(ToastConfig::default()).await;
    {
        let mut store = harness.store.lock().await;
        for title in ["A", "B", "C", "D", "E"] {
            store.publish(title, "", NotificationKind::Warning);
        }
    }
    let toasts = harness.wait_for_toasts(3).await;
    assert_eq!(titles(&toasts), vec!["E", "D", "C"]);

    let dismissed = toasts[1].id;
    harness
        .commands
        .send(ToastCommand::Dismiss(dismissed))
        .await
        .unwrap();

    sleep(Duration::from_millis(299)).await;
    assert!(harness.store.lock().await.contains(dismissed));

    sleep(Duration::from_millis(2)).await;
    assert!(!harness.store.lock().await.contains(dismissed));
    let toasts = harness.view.borrow().clone();
    assert_eq!(titles(&toasts), vec!["E", "C", "B"]);

    harness.stop().await;
}

#[tokio::test(start_paused = true)]
async fn history_removal_cancels_the_pending_toast_timer() {
    let mut harness = Harness::start(ToastConfig::default()).await;
    let id = harness
        .store
        .lock()
        .await
        .publish("Pedido Creado", "Pedido ORD-005 registrado.", NotificationKind::Success);
    harness.wait_for_toasts(1).await;

    let mut changes = harness.store.lock().await.subscribe();
    BellSummary::new().dismiss(&mut *harness.store.lock().await, id);
    harness.wait_for_toasts(0).await;

    sleep(Duration::from_secs(10)).await;
    assert_eq!(
        changes.try_recv().unwrap(),
        rs_notify_center::events::StoreEvent::Removed { id }
    );
    assert!(changes.try_recv().is_err());

    harness.stop().await;
}

#[tokio::test(start_paused = true)]
async fn dismissed_toast_pushed_out_by_a_new_publish_is_still_removed() {
    let mut harness = Harness::start(ToastConfig::default()).await;
    let a = {
        let mut store = harness.store.lock().await;
        let a = store.publish("A", "", NotificationKind::Info);
        store.publish("B", "", NotificationKind::Info);
        store.publish("C", "", NotificationKind::Info);
        a
    };
    harness.wait_for_toasts(3).await;
    harness.commands.send(ToastCommand::Dismiss(a)).await.unwrap();

    sleep(Duration::from_millis(100)).await;
    harness
        .store
        .lock()
        .await
        .publish("D", "", NotificationKind::Info);
    sleep(Duration::from_millis(50)).await;
    assert_eq!(titles(&harness.view.borrow()), vec!["D", "C", "B"]);
    assert!(harness.store.lock().await.contains(a));

    sleep(Duration::from_millis(200)).await;
    assert!(!harness.store.lock().await.contains(a));

    sleep(Duration::from_secs(6)).await;
    assert!(!harness.store.lock().await.contains(a));
    assert!(harness.view.borrow().iter().all(|t| t.id != a));

    harness.stop().await;
}

#[tokio::test(start_paused = true)]
async fn marking_read_during_exit_still_retires_the_record() {
    let mut harness = Harness::start(ToastConfig::default()).await;
    let (a, b) = {
        let mut store = harness.store.lock().await;
        let a = store.publish("A", "", NotificationKind::Warning);
        let b = store.publish("B", "", NotificationKind::Error);
        (a, b)
    };
    harness.wait_for_toasts(2).await;
    harness.commands.send(ToastCommand::Dismiss(a)).await.unwrap();
    harness.commands.send(ToastCommand::Dismiss(b)).await.unwrap();

    sleep(Duration::from_millis(100)).await;
    harness.store.lock().await.mark_read(a);
    harness.store.lock().await.mark_all_read();
    harness.wait_for_toasts(0).await;

    sleep(Duration::from_millis(250)).await;
    let store = harness.store.lock().await;
    assert!(!store.contains(a));
    assert!(!store.contains(b));
    assert!(store.is_empty());
    drop(store);

    harness.stop().await;
}

#[tokio::test(start_paused = true)]
async fn hide_policy_keeps_expired_toasts_in_history() {
    let config = ToastConfig {
        expiry_policy: ExpiryPolicy::Hide,
        ..ToastConfig::default()
    };
    let mut harness = Harness::start(config).await;
    let id = harness
        .store
        .lock()
        .await
        .publish("Configuración Guardada", "Cambios aplicados.", NotificationKind::Success);
    harness.wait_for_toasts(1).await;

    sleep(Duration::from_millis(5_400)).await;
    assert!(harness.view.borrow().is_empty());
    {
        let store = harness.store.lock().await;
        let record = store.get(id).unwrap();
        assert!(record.toast_hidden);
        assert!(!record.read);
        assert!(BellSummary::new().badge_visible(&store));
    }

    harness.stop().await;
}

#[test]
fn toast_cap_holds_for_any_number_of_unread() {
    let mut store = NotificationStore::new();
    let mut presenter = ToastPresenter::new(ToastConfig::default());
    let now = Instant::now();

    for i in 0..50 {
        store.publish(format!("N{i}"), "", NotificationKind::ALL[i % 4]);
        presenter.sync(&store, now);
        assert!(presenter.visible().len() <= 3);
    }
    assert_eq!(store.unread_count(), 50);
}

#[tokio::test(start_paused = true)]
async fn collaborator_handle_feeds_the_toast_stack() {
    let mut harness = Harness::start(ToastConfig::default()).await;
    let notifier = NotifierHandle::new(harness.store.clone());

    notifier
        .publish("Cliente Actualizado", "Datos guardados.", NotificationKind::Success)
        .await;
    let toasts = harness.wait_for_toasts(1).await;
    assert_eq!(toasts[0].title, "Cliente Actualizado");

    harness.stop().await;
}
