use crate::{
    bell::HistoryEntry,
    toast::Toast,
    types::{Accent, NotificationKind},
};

// ANSI color codes
pub struct Colors;

impl Colors {
    pub const RESET: &'static str = "\x1b[0m";
    pub const BOLD: &'static str = "\x1b[1m";
    pub const DIM: &'static str = "\x1b[2m";

    pub const WHITE: &'static str = "\x1b[37m";
    pub const GRAY: &'static str = "\x1b[90m";

    // Bright colors
    pub const BRIGHT_RED: &'static str = "\x1b[91m";
    pub const BRIGHT_GREEN: &'static str = "\x1b[92m";
    pub const BRIGHT_YELLOW: &'static str = "\x1b[93m";
    pub const BRIGHT_BLUE: &'static str = "\x1b[94m";
    pub const BRIGHT_CYAN: &'static str = "\x1b[96m";

    pub fn accent(accent: Accent) -> &'static str {
        match accent {
            Accent::Green => Colors::BRIGHT_GREEN,
            Accent::Red => Colors::BRIGHT_RED,
            Accent::Amber => Colors::BRIGHT_YELLOW,
            Accent::Blue => Colors::BRIGHT_BLUE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Minimal,
}

impl From<&str> for OutputFormat {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => OutputFormat::Json,
            "minimal" => OutputFormat::Minimal,
            _ => OutputFormat::Table,
        }
    }
}

pub struct NotificationFormatter {
    format: OutputFormat,
    colored: bool,
}

impl NotificationFormatter {
    pub fn new(format: OutputFormat, colored: bool) -> Self {
        Self { format, colored }
    }

    fn paint(&self, color: &str, text: &str) -> String {
        if self.colored {
            format!("{}{}{}", color, text, Colors::RESET)
        } else {
            text.to_string()
        }
    }

    fn kind_tag(&self, kind: NotificationKind) -> String {
        let tag = format!("{} {:<7}", kind.icon(), kind.as_str().to_uppercase());
        self.paint(Colors::accent(kind.accent()), &tag)
    }

    pub fn render_toasts(&self, toasts: &[Toast]) -> String {
        match self.format {
            OutputFormat::Json => serde_json::json!(
                toasts
                    .iter()
                    .map(|t| serde_json::json!({
                        "id": t.id,
                        "title": t.title,
                        "message": t.message,
                        "kind": t.kind,
                        "exiting": t.is_exiting(),
                    }))
                    .collect::<Vec<_>>()
            )
            .to_string(),
            OutputFormat::Minimal => toasts
                .iter()
                .map(|t| format!("{}|{}|{}", t.kind, t.title, t.message))
                .collect::<Vec<_>>()
                .join("\n"),
            OutputFormat::Table => {
                if toasts.is_empty() {
                    return self.paint(Colors::DIM, "(no toasts)");
                }
                toasts
                    .iter()
                    .map(|t| {
                        let body = format!("{} {} - {}", t.id.short(), t.title, t.message);
                        let body = if t.is_exiting() {
                            self.paint(Colors::DIM, &body)
                        } else {
                            self.paint(Colors::WHITE, &body)
                        };
                        format!("{} {}", self.kind_tag(t.kind), body)
                    })
                    .collect::<Vec<_>>()
                    .join("\n")
            }
        }
    }

    pub fn render_bell(&self, unread: usize) -> String {
        match self.format {
            OutputFormat::Json => serde_json::json!({
                "badge": unread > 0,
                "unread": unread,
            })
            .to_string(),
            OutputFormat::Minimal => unread.to_string(),
            OutputFormat::Table => {
                if unread > 0 {
                    let badge = format!("[bell •] {} unread", unread);
                    self.paint(&format!("{}{}", Colors::BOLD, Colors::BRIGHT_RED), &badge)
                } else {
                    self.paint(Colors::GRAY, "[bell] no unread notifications")
                }
            }
        }
    }

    pub fn render_history(&self, entries: &[HistoryEntry]) -> String {
        match self.format {
            OutputFormat::Json => {
                serde_json::to_string(entries).unwrap_or_else(|_| "[]".to_string())
            }
            OutputFormat::Minimal => entries
                .iter()
                .map(|e| {
                    format!(
                        "{}|{}|{}|{}|{}",
                        e.time,
                        e.kind,
                        if e.read { "read" } else { "unread" },
                        e.title,
                        e.message
                    )
                })
                .collect::<Vec<_>>()
                .join("\n"),
            OutputFormat::Table => {
                let mut lines = vec![self.paint(
                    &format!("{}{}", Colors::BOLD, Colors::BRIGHT_CYAN),
                    "── Notificaciones ─────────────────────────────",
                )];
                if entries.is_empty() {
                    lines.push(self.paint(Colors::DIM, "No tienes notificaciones"));
                }
                for e in entries {
                    let marker = if e.read { " " } else { "•" };
                    let title = if e.read {
                        self.paint(Colors::GRAY, &e.title)
                    } else {
                        self.paint(Colors::BOLD, &e.title)
                    };
                    lines.push(format!(
                        "{} {} {} {} {}",
                        marker,
                        self.paint(Colors::GRAY, &e.time),
                        self.kind_tag(e.kind),
                        e.id.short(),
                        title
                    ));
                    lines.push(format!("          {}", e.message));
                }
                lines.join("\n")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NotificationId;
    use tokio::time::Instant;

    fn toast(title: &str, kind: NotificationKind) -> Toast {
        Toast {
            id: NotificationId::new(),
            title: title.to_string(),
            message: "body".to_string(),
            kind,
            phase: crate::toast::ToastPhase::Visible {
                until: Instant::now(),
            },
        }
    }

    #[test]
    fn error_toast_uses_red_accent() {
        let formatter = NotificationFormatter::new(OutputFormat::Table, true);
        let out = formatter.render_toasts(&[toast("Stock Bajo", NotificationKind::Error)]);
        assert!(out.contains(Colors::BRIGHT_RED));
        assert!(out.contains("ERROR"));
        assert!(out.contains("Stock Bajo"));
    }

    #[test]
    fn plain_output_has_no_escape_codes() {
        let formatter = NotificationFormatter::new(OutputFormat::Table, false);
        let out = formatter.render_toasts(&[toast("A", NotificationKind::Success)]);
        assert!(!out.contains('\x1b'));
        assert!(formatter.render_bell(0).contains("no unread"));
    }

    #[test]
    fn minimal_format_is_pipe_separated() {
        let formatter = NotificationFormatter::new(OutputFormat::Minimal, false);
        let out = formatter.render_toasts(&[
            toast("A", NotificationKind::Info),
            toast("B", NotificationKind::Warning),
        ]);
        assert_eq!(out, "info|A|body\nwarning|B|body");
        assert_eq!(formatter.render_bell(2), "2");
    }

    #[test]
    fn json_bell_reports_badge() {
        let formatter = NotificationFormatter::new(OutputFormat::from("JSON"), false);
        let value: serde_json::Value = serde_json::from_str(&formatter.render_bell(1)).unwrap();
        assert_eq!(value["badge"], true);
        assert_eq!(value["unread"], 1);
    }
}
