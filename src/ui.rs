/// file: src/ui.rs
/// description: terminal presentation loop: redraws toasts on change and applies line commands
use crate::{
    bell::BellSummary,
    checks,
    error::NotifyError,
    events::{CommandSender, ToastCommand},
    formatter::{Colors, NotificationFormatter},
    monitoring::CenterStatus,
    store::{NotifierHandle, SharedStore},
    toast::Toast,
    types::NotificationKind,
};
use anyhow::Result;
use std::str::FromStr;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::watch;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Publish {
        kind: NotificationKind,
        title: String,
        message: String,
    },
    Read(String),
    ReadAll,
    Remove(String),
    Dismiss(String),
    History,
    Close,
    Toasts,
    Bell,
    Status,
    Logout,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = NotifyError;

    /// `publish <kind> <title> | <message>`, `read <id>`, `rm <id>`, `dismiss <id>`,
    /// or one of the bare words.
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();

        let id_arg = |rest: &str| {
            if rest.is_empty() {
                Err(NotifyError::InvalidCommand(format!("{verb} needs an id")))
            } else {
                Ok(rest.to_string())
            }
        };

        match verb.to_lowercase().as_str() {
            "publish" | "pub" => {
                let (kind, text) = rest.split_once(char::is_whitespace).ok_or_else(|| {
                    NotifyError::InvalidCommand("usage: publish <kind> <title> | <message>".into())
                })?;
                let kind = kind.parse()?;
                let (title, message) = text.split_once('|').unwrap_or((text, ""));
                Ok(Command::Publish {
                    kind,
                    title: title.trim().to_string(),
                    message: message.trim().to_string(),
                })
            }
            "read" => Ok(Command::Read(id_arg(rest)?)),
            "readall" => Ok(Command::ReadAll),
            "rm" | "remove" => Ok(Command::Remove(id_arg(rest)?)),
            "dismiss" => Ok(Command::Dismiss(id_arg(rest)?)),
            "history" => Ok(Command::History),
            "close" => Ok(Command::Close),
            "toasts" => Ok(Command::Toasts),
            "bell" => Ok(Command::Bell),
            "status" => Ok(Command::Status),
            "logout" => Ok(Command::Logout),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            other => Err(NotifyError::InvalidCommand(other.to_string())),
        }
    }
}

pub struct UIOptions {
    pub quiet: bool,
}

pub struct UIController {
    store: SharedStore,
    notifier: NotifierHandle,
    toasts: watch::Receiver<Vec<Toast>>,
    commands: CommandSender,
    bell: BellSummary,
    formatter: NotificationFormatter,
    quiet_mode: bool,
    started_at: chrono::DateTime<chrono::Utc>,
}

impl UIController {
    pub fn new(
        store: SharedStore,
        toasts: watch::Receiver<Vec<Toast>>,
        commands: CommandSender,
        formatter: NotificationFormatter,
        options: UIOptions,
    ) -> Self {
        Self {
            notifier: NotifierHandle::new(store.clone()),
            store,
            toasts,
            commands,
            bell: BellSummary::new(),
            formatter,
            quiet_mode: options.quiet,
            started_at: chrono::Utc::now(),
        }
    }

    pub async fn run<R>(&mut self, input: R) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        self.print_startup_banner();
        let mut lines = input.lines();

        loop {
            tokio::select! {
                changed = self.toasts.changed() => {
                    if changed.is_err() {
                        info!("Toast view closed");
                        break;
                    }
                    if !self.quiet_mode {
                        let toasts = self.toasts.borrow_and_update().clone();
                        println!("{}", self.formatter.render_toasts(&toasts));
                    }
                }
                line = lines.next_line() => {
                    let Some(line) = line? else {
                        debug!("Input closed");
                        break;
                    };
                    if line.trim().is_empty() {
                        continue;
                    }
                    match line.parse::<Command>() {
                        Ok(command) => {
                            if !self.handle_command(command).await? {
                                break;
                            }
                        }
                        Err(e) => self.print_error(&e.to_string()),
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("Interrupted");
                    break;
                }
            }
        }

        let _ = self.commands.send(ToastCommand::Shutdown).await;
        Ok(())
    }

    /// Returns false when the loop should stop.
    pub async fn handle_command(&mut self, command: Command) -> Result<bool> {
        match command {
            Command::Publish {
                kind,
                title,
                message,
            } => {
                self.notifier.publish(&title, &message, kind).await;
            }
            Command::Read(prefix) => {
                let mut store = self.store.lock().await;
                match store.find_by_prefix(&prefix) {
                    Some(id) => self.bell.mark_read(&mut store, id),
                    None => self.print_error(&format!("no single notification matches {prefix}")),
                }
            }
            Command::ReadAll => {
                let mut store = self.store.lock().await;
                if !self.bell.mark_all_read(&mut store) {
                    self.print_info("nothing unread");
                }
            }
            Command::Remove(prefix) => {
                let mut store = self.store.lock().await;
                match store.find_by_prefix(&prefix) {
                    Some(id) => self.bell.dismiss(&mut store, id),
                    None => self.print_error(&format!("no single notification matches {prefix}")),
                }
            }
            Command::Dismiss(prefix) => {
                let id = self.store.lock().await.find_by_prefix(&prefix);
                match id {
                    Some(id) => {
                        self.commands
                            .send(ToastCommand::Dismiss(id))
                            .await
                            .map_err(|e| NotifyError::EventSendError(e.to_string()))?;
                    }
                    None => self.print_error(&format!("no single notification matches {prefix}")),
                }
            }
            Command::History => {
                self.bell.open();
                let store = self.store.lock().await;
                println!("{}", self.formatter.render_history(&self.bell.history(&store)));
            }
            Command::Close => self.bell.close(),
            Command::Toasts => {
                let toasts = self.toasts.borrow().clone();
                println!("{}", self.formatter.render_toasts(&toasts));
            }
            Command::Bell => {
                let store = self.store.lock().await;
                println!("{}", self.formatter.render_bell(self.bell.unread_count(&store)));
            }
            Command::Status => {
                let store = self.store.lock().await;
                let visible = self.toasts.borrow().len();
                let status = CenterStatus::capture(&store, visible, self.started_at);
                println!("{}", status.to_json());
            }
            Command::Logout => {
                warn!("Logout attempted in demo mode");
                self.notifier.batch(|n| checks::deny_logout(n)).await;
            }
            Command::Help => self.print_help(),
            Command::Quit => return Ok(false),
        }

        Ok(true)
    }

    fn print_startup_banner(&self) {
        if self.quiet_mode {
            return;
        }

        println!(
            "{}{}rs-notify-center v{}{} - type {}help{} for commands",
            Colors::BOLD,
            Colors::BRIGHT_CYAN,
            env!("CARGO_PKG_VERSION"),
            Colors::RESET,
            Colors::BOLD,
            Colors::RESET
        );
    }

    fn print_help(&self) {
        println!("publish <success|error|warning|info> <title> | <message>");
        println!("read <id>      mark one notification read");
        println!("readall        mark every notification read");
        println!("rm <id>        delete from history");
        println!("dismiss <id>   close a toast now");
        println!("history        open the history panel");
        println!("close          close the history panel");
        println!("toasts | bell | status | logout | quit");
    }

    fn print_info(&self, message: &str) {
        if self.quiet_mode {
            return;
        }
        println!("{}{}{}", Colors::DIM, message, Colors::RESET);
    }

    fn print_error(&self, message: &str) {
        println!(
            "{}{}[ERROR]{} {}",
            Colors::BOLD,
            Colors::BRIGHT_RED,
            Colors::RESET,
            message
        );
    }
}
