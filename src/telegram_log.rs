use teloxide::prelude::*;
use teloxide::types::ChatId;
use tokio::sync::mpsc;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;

/// Telegram caps messages at 4096 characters.
const MAX_ALERT_CHARS: usize = 4000;

/// Forwards WARN and ERROR events to an operator chat.
pub struct TelegramLogLayer {
    tx: mpsc::UnboundedSender<String>,
}

impl TelegramLogLayer {
    pub fn new(bot: Bot, chat_id: ChatId) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<String>();

        tokio::spawn(async move {
            while let Some(text) = rx.recv().await {
                // Not logged through tracing, that would feed back into this layer.
                if let Err(e) = bot.send_message(chat_id, truncate(&text)).await {
                    eprintln!("Failed to send log to Telegram: {e}");
                }
            }
        });

        Self { tx }
    }
}

fn truncate(text: &str) -> String {
    if text.chars().count() > MAX_ALERT_CHARS {
        let truncated: String = text.chars().take(MAX_ALERT_CHARS).collect();
        format!("{truncated}...")
    } else {
        text.to_string()
    }
}

#[derive(Default)]
struct MessageVisitor {
    message: String,
}

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{:?}", value);
        } else if self.message.is_empty() {
            self.message = format!("{} = {:?}", field.name(), value);
        } else {
            self.message.push_str(&format!(", {} = {:?}", field.name(), value));
        }
    }
}

fn alert_text(level: Level, message: &str) -> Option<String> {
    match level {
        Level::ERROR => Some(format!("❌ {message}")),
        Level::WARN => Some(format!("⚠️ {message}")),
        _ => None,
    }
}

impl<S: Subscriber> Layer<S> for TelegramLogLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let level = *event.metadata().level();
        if level > Level::WARN {
            return;
        }

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        if let Some(text) = alert_text(level, &visitor.message)
            && self.tx.send(text).is_err()
        {
            eprintln!("Log channel closed, message dropped");
        }
    }
}
