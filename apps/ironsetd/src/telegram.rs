//! Telegram binding: update routing, reply delivery and the rest-timer
//! notifier.

use async_trait::async_trait;
use ironset_engine::ConversationEngine;
use ironset_protocol::{
    ButtonAction, ChatId, Inbound, InboundEvent, Keyboard, NotifierPort, Reply, Sender,
    TrackerError, TrackerResult, UserId,
};
use ironset_render::messages;
use teloxide::RequestError;
use teloxide::dispatching::DefaultKey;
use teloxide::error_handlers::LoggingErrorHandler;
use teloxide::payloads::SendMessageSetters;
use teloxide::prelude::*;
use teloxide::types::{
    ChatId as TelegramChatId, InlineKeyboardButton, InlineKeyboardMarkup, KeyboardButton,
    KeyboardMarkup, KeyboardRemove, ParseMode, ReplyMarkup, User,
};
use tracing::{debug, error};

pub fn dispatcher(
    bot: Bot,
    engine: ConversationEngine,
) -> Dispatcher<Bot, RequestError, DefaultKey> {
    let handler = dptree::entry()
        .branch(Update::filter_message().endpoint(on_message))
        .branch(Update::filter_callback_query().endpoint(on_callback));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![engine])
        .error_handler(LoggingErrorHandler::with_custom_text(
            "telegram request failed",
        ))
        .build()
}

async fn on_message(bot: Bot, msg: Message, engine: ConversationEngine) -> ResponseResult<()> {
    let (Some(text), Some(user)) = (msg.text(), msg.from.as_ref()) else {
        return Ok(());
    };
    let inbound = Inbound {
        sender: sender_of(user, msg.chat.id),
        event: InboundEvent::from_message(text),
    };
    run_turn(&bot, msg.chat.id, &engine, inbound).await
}

async fn on_callback(
    bot: Bot,
    query: CallbackQuery,
    engine: ConversationEngine,
) -> ResponseResult<()> {
    bot.answer_callback_query(query.id.clone()).await?;

    let Some(action) = query.data.as_deref().and_then(ButtonAction::parse) else {
        debug!(data = ?query.data, "callback data not recognised");
        return Ok(());
    };
    let chat = query
        .message
        .as_ref()
        .map(|message| message.chat().id)
        .unwrap_or_else(|| TelegramChatId::from(query.from.id));

    let inbound = Inbound {
        sender: sender_of(&query.from, chat),
        event: InboundEvent::Button { action },
    };
    run_turn(&bot, chat, &engine, inbound).await
}

async fn run_turn(
    bot: &Bot,
    chat: TelegramChatId,
    engine: &ConversationEngine,
    inbound: Inbound,
) -> ResponseResult<()> {
    let replies = match engine.handle(inbound).await {
        Ok(turn) => turn.replies,
        Err(err) => {
            error!(error = ?err, chat_id = chat.0, "turn failed");
            vec![messages::internal_error()]
        }
    };
    for reply in replies {
        send_reply(bot, chat, reply).await?;
    }
    Ok(())
}

async fn send_reply(bot: &Bot, chat: TelegramChatId, reply: Reply) -> ResponseResult<()> {
    let mut request = bot.send_message(chat, reply.text).parse_mode(ParseMode::Html);
    if let Some(keyboard) = reply.keyboard {
        request = request.reply_markup(reply_markup(keyboard));
    }
    request.await?;
    Ok(())
}

fn sender_of(user: &User, chat: TelegramChatId) -> Sender {
    Sender {
        user_id: UserId::from_string(user.id.0.to_string()),
        chat_id: ChatId::from_string(chat.0.to_string()),
        display_name: user.first_name.clone(),
    }
}

fn reply_markup(keyboard: Keyboard) -> ReplyMarkup {
    match keyboard {
        Keyboard::Inline(rows) => {
            ReplyMarkup::InlineKeyboard(InlineKeyboardMarkup::new(rows.into_iter().map(|row| {
                row.into_iter().map(|button| {
                    InlineKeyboardButton::callback(button.label, button.action.callback_data())
                })
            })))
        }
        Keyboard::Suggestions(rows) => ReplyMarkup::Keyboard(KeyboardMarkup::new(
            rows.into_iter().map(|row| row.into_iter().map(KeyboardButton::new)),
        )),
        Keyboard::Remove => ReplyMarkup::KeyboardRemove(KeyboardRemove::new()),
    }
}

/// Delivers out-of-turn replies (rest timer) through the bot handle.
#[derive(Clone)]
pub struct TelegramNotifier {
    bot: Bot,
}

impl TelegramNotifier {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl NotifierPort for TelegramNotifier {
    async fn notify(&self, chat_id: ChatId, reply: Reply) -> TrackerResult<()> {
        let chat = chat_id
            .as_str()
            .parse::<i64>()
            .map(TelegramChatId)
            .map_err(|_| TrackerError::Transport(format!("invalid chat id {chat_id}")))?;
        send_reply(&self.bot, chat, reply)
            .await
            .map_err(|error| TrackerError::Transport(error.to_string()))
    }
}
