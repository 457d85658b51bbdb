mod assistant;
mod config;
mod deepseek;
mod telegram_log;

use std::sync::Arc;
use std::time::Duration;

use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;
use tracing::{debug, info, warn};
use tracing_subscriber::prelude::*;

use assistant::{AnswerGenerator, Dialogue, SessionStore, Step, TelegramClient};
use config::Config;

/// How often idle sessions are swept.
const PRUNE_INTERVAL: Duration = Duration::from_secs(10 * 60);

#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "Anna understands these commands:")]
enum Command {
    #[command(description = "start a conversation")]
    Start,
    #[command(description = "end the conversation")]
    Cancel,
}

struct BotState {
    dialogue: Dialogue,
    sessions: SessionStore,
    telegram: TelegramClient,
}

impl BotState {
    fn new(config: &Config, bot: &Bot) -> Self {
        let client = deepseek::Client::new(config.deepseek_api_key.clone(), config.completion.clone());
        let settings = client.settings();
        info!(
            "Model: {} at {} (temperature {}, max_tokens {})",
            settings.model, settings.base_url, settings.temperature, settings.max_tokens
        );

        Self {
            dialogue: Dialogue::new(AnswerGenerator::new(Arc::new(client))),
            sessions: SessionStore::new(),
            telegram: TelegramClient::new(bot.clone()),
        }
    }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let (config_path, required) = match std::env::args().nth(1) {
        Some(path) => (path, true),
        None => ("anna.json".to_string(), false),
    };
    let config = match Config::load(&config_path, required) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {e}");
            std::process::exit(1);
        }
    };

    let bot = Bot::new(&config.bot_token);

    // Setup logging
    let log_dir = config.data_dir.join("logs");
    std::fs::create_dir_all(&log_dir).ok();
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("anna.log"))
        .expect("Failed to open log file");
    let (non_blocking, _guard) = tracing_appender::non_blocking(log_file);

    let registry = tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stdout)
                .with_filter(
                    tracing_subscriber::EnvFilter::from_default_env()
                        .add_directive(tracing::Level::INFO.into()),
                ),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_filter(
                    tracing_subscriber::EnvFilter::from_default_env()
                        .add_directive(tracing::Level::INFO.into()),
                ),
        );

    if let Some(log_chat_id) = config.log_chat_id {
        let tg_layer = telegram_log::TelegramLogLayer::new(bot.clone(), log_chat_id);
        registry.with(tg_layer).init();
    } else {
        registry.init();
    }

    info!("🤖 Starting Anna...");
    info!("Settings: {config_path}{}", if required { "" } else { " (optional)" });
    info!("DeepSeek API key: {}", config.masked_api_key());

    let state = Arc::new(BotState::new(&config, &bot));

    if config.session_idle_minutes > 0 {
        let max_idle = chrono::Duration::minutes(i64::from(config.session_idle_minutes));
        let state = state.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(PRUNE_INTERVAL);
            loop {
                interval.tick().await;
                let removed = state.sessions.prune_idle(max_idle, chrono::Utc::now()).await;
                if removed > 0 {
                    info!("🧹 Dropped {removed} idle session(s), {} active", state.sessions.len().await);
                }
            }
        });
    }

    if let Err(e) = bot.set_my_commands(Command::bot_commands()).await {
        warn!("Failed to register bot commands: {e}");
    }

    let handler = Update::filter_message()
        .branch(dptree::entry().filter_command::<Command>().endpoint(handle_command))
        .branch(dptree::endpoint(handle_text));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .error_handler(LoggingErrorHandler::with_custom_text("Error while handling an update"))
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}

async fn handle_command(msg: Message, cmd: Command, state: Arc<BotState>) -> ResponseResult<()> {
    let Some(ref user) = msg.from else {
        return Ok(());
    };
    let user_id = user.id.0 as i64;
    let chat_id = msg.chat.id.0;
    let username = user.username.as_deref().unwrap_or(&user.first_name);

    match cmd {
        Command::Start => {
            info!("👋 /start from {} ({})", username, user_id);
            state.sessions.begin(user_id).await;
            state.telegram.send_replies(chat_id, &state.dialogue.start()).await.ok();
        }
        Command::Cancel => {
            info!("/cancel from {} ({})", username, user_id);
            let language = state.sessions.end(user_id).await.and_then(|s| s.language());
            state.telegram.send_reply(chat_id, &state.dialogue.cancel(language)).await.ok();
        }
    }

    Ok(())
}

async fn handle_text(msg: Message, state: Arc<BotState>) -> ResponseResult<()> {
    let Some(ref user) = msg.from else {
        return Ok(());
    };
    let Some(text) = msg.text() else {
        return Ok(());
    };
    let user_id = user.id.0 as i64;
    let chat_id = msg.chat.id.0;

    if text.starts_with('/') {
        debug!("Ignoring unknown command from {user_id}: {text}");
        return Ok(());
    }

    let username = user.username.as_deref().unwrap_or(&user.first_name);
    let text_preview: String = text.chars().take(100).collect();
    info!("📨 {} ({}): \"{}\"", username, user_id, text_preview);

    let step = state
        .sessions
        .with_session(user_id, |session| state.dialogue.step(session, text))
        .await;

    let Some(step) = step else {
        debug!("No conversation for {user_id}, ignoring");
        return Ok(());
    };

    match step {
        Step::Replies(replies) => {
            state.telegram.send_replies(chat_id, &replies).await.ok();
        }
        Step::Answer(request) => {
            let notice = state.dialogue.pending_notice(&request);
            let pending = state.telegram.send_reply(chat_id, &notice).await.ok();

            let reply = state.dialogue.answer(&request).await;

            if let Some(message_id) = pending {
                state.telegram.delete_message(chat_id, message_id).await.ok();
            }
            state.telegram.send_reply(chat_id, &reply).await.ok();
        }
    }

    Ok(())
}
