//! Telegram client using teloxide.

use teloxide::prelude::*;
use teloxide::types::{KeyboardButton, KeyboardMarkup, KeyboardRemove, MessageId, ReplyMarkup};
use tracing::warn;

use crate::assistant::dialogue::{Keyboard, Markup, Reply};

/// Telegram API client.
pub struct TelegramClient {
    bot: Bot,
}

impl TelegramClient {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }

    /// Send a reply as plain text. Returns the sent message id.
    pub async fn send_reply(&self, chat_id: i64, reply: &Reply) -> Result<i32, String> {
        let mut request = self.bot.send_message(ChatId(chat_id), &reply.text);

        if let Some(markup) = reply_markup(&reply.markup) {
            request = request.reply_markup(markup);
        }

        request.await.map(|msg| msg.id.0).map_err(|e| {
            let msg = format!("Failed to send: {e}");
            warn!("{}", msg);
            msg
        })
    }

    /// Send replies in order, stopping at the first failure.
    pub async fn send_replies(&self, chat_id: i64, replies: &[Reply]) -> Result<(), String> {
        for reply in replies {
            self.send_reply(chat_id, reply).await?;
        }
        Ok(())
    }

    pub async fn delete_message(&self, chat_id: i64, message_id: i32) -> Result<(), String> {
        self.bot
            .delete_message(ChatId(chat_id), MessageId(message_id))
            .await
            .map_err(|e| {
                let msg = format!("Failed to delete message: {e}");
                warn!("{}", msg);
                msg
            })?;

        Ok(())
    }
}

fn keyboard_markup(keyboard: &Keyboard) -> KeyboardMarkup {
    let rows = keyboard
        .rows
        .iter()
        .map(|row| row.iter().map(|label| KeyboardButton::new(label.clone())).collect::<Vec<_>>());

    let markup = KeyboardMarkup::new(rows).resize_keyboard();
    if keyboard.one_time {
        markup.one_time_keyboard()
    } else {
        markup
    }
}

fn reply_markup(markup: &Markup) -> Option<ReplyMarkup> {
    match markup {
        Markup::Keep => None,
        Markup::Keyboard(keyboard) => Some(ReplyMarkup::Keyboard(keyboard_markup(keyboard))),
        Markup::Remove => Some(ReplyMarkup::KeyboardRemove(KeyboardRemove::new())),
    }
}
