//! Interactive terminal chat: reads user lines, drives the session store,
//! calls the remote classify/answer API and reveals replies incrementally.

use crate::api::{ApiClient, Label};
use crate::config::{Config, RevealConfig};
use crate::sessions::{ChatMessage, ChatSession, ChatSessionStore, MessageRole};
use crate::storage::FileKvStore;
use crate::ui::style;
use crate::utils::text::truncate_chars;
use anyhow::Result;
use rand::Rng;
use std::io::Write;
use std::time::Duration;
use tokio::io::AsyncBufReadExt;

/// Input cap, mirrored from the composer's `maxLength`.
pub const MAX_INPUT_CHARS: usize = 1000;

pub const GREETING_REPLY: &str = "Привет! Готов отвечать на твои вопросы.";
pub const JUNK_REPLY: &str =
    "Похоже на мусор или не по теме. Напиши вопрос чуть понятнее 🙂";

const HINTS: [&str; 10] = [
    "Как подготовиться к буксировке ВС?",
    "Какие ограничения по ветру при рулении и буксировке?",
    "Какой порядок запуска ВС: ключевые шаги и проверки?",
    "Где найти нормы по давлению/азоту в стойках шасси?",
    "Как выполняется проверка системы противообледенения?",
    "Какие действия при срабатывании FIRE WARNING?",
    "Какой порядок отключения/подключения внешнего питания (GPU)?",
    "Какие интервалы и объёмы работ по ТО (A/B/C-check) для узла?",
    "Какие допустимые утечки/подтёки указаны для гидросистемы?",
    "Какие требования к установке заглушек, чехлов и блокировок перед обслуживанием?",
];

const THINKING_PHRASES: [&str; 6] = [
    "Думаю",
    "Ищу информацию",
    "Поиск по документам",
    "Сверяюсь с бумагами",
    "Формирую ответ",
    "Уточняю детали",
];

#[derive(Debug, PartialEq, Eq)]
enum SlashCommand {
    New,
    List,
    Switch(usize),
    Delete(usize),
    Quit,
    Unknown,
}

/// Parses a `/command` line. Returns `None` for plain chat input.
fn parse_slash(line: &str) -> Option<SlashCommand> {
    let rest = line.strip_prefix('/')?;
    let mut parts = rest.split_whitespace();
    let command = match (parts.next(), parts.next()) {
        (Some("new"), None) => SlashCommand::New,
        (Some("list"), None) => SlashCommand::List,
        (Some("switch"), Some(n)) => n.parse().map_or(SlashCommand::Unknown, SlashCommand::Switch),
        (Some("delete"), Some(n)) => n.parse().map_or(SlashCommand::Unknown, SlashCommand::Delete),
        (Some("quit" | "exit"), None) => SlashCommand::Quit,
        _ => SlashCommand::Unknown,
    };
    Some(command)
}

/// Runs the interactive chat loop until `/quit` or end of input.
pub async fn run(config: &Config) -> Result<()> {
    let storage = FileKvStore::new(config.data_dir.clone())?;
    let mut store = ChatSessionStore::load(Box::new(storage));
    let api = ApiClient::new(&config.api_base_url);

    println!("{}", style::header("AeroDoc Assistant"));
    println!(
        "{}",
        style::dim("Отвечаю по документации с точными ссылками.")
    );
    println!(
        "{}",
        style::dim("Команды: /new, /list, /switch <n>, /delete <n>, /quit")
    );
    println!();
    print_transcript(store.active_session());

    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
    let mut hint_idx = 0usize;

    loop {
        print_prompt(hint_idx);
        hint_idx = (hint_idx + 1) % HINTS.len();

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim().to_string();
        if line.is_empty() {
            continue;
        }

        if let Some(command) = parse_slash(&line) {
            match command {
                SlashCommand::Quit => break,
                SlashCommand::New => {
                    store.create_session();
                    println!("{}", style::dim("Новый чат создан."));
                    print_transcript(store.active_session());
                }
                SlashCommand::List => print_session_list(&store),
                SlashCommand::Switch(n) => {
                    if let Some(id) = session_id_at(&store, n) {
                        store.select_session(&id);
                        print_transcript(store.active_session());
                    } else {
                        println!("{}", style::yellow("Нет чата с таким номером."));
                    }
                }
                SlashCommand::Delete(n) => {
                    if let Some(id) = session_id_at(&store, n) {
                        store.delete_session(&id);
                        println!("{}", style::dim("Чат удалён."));
                        print_session_list(&store);
                    } else {
                        println!("{}", style::yellow("Нет чата с таким номером."));
                    }
                }
                SlashCommand::Unknown => {
                    println!(
                        "{}",
                        style::dim("Команды: /new, /list, /switch <n>, /delete <n>, /quit")
                    );
                }
            }
            continue;
        }

        send_message(&mut store, &api, &config.reveal, &line).await?;
    }

    Ok(())
}

/// Lists persisted sessions, most recent first (`aerodoc sessions`).
pub fn list_sessions(config: &Config) -> Result<()> {
    let storage = FileKvStore::new(config.data_dir.clone())?;
    let store = ChatSessionStore::load(Box::new(storage));
    print_session_list(&store);
    Ok(())
}

/// Deletes a session by id (`aerodoc delete <id>`).
pub fn delete_session(config: &Config, id: &str) -> Result<()> {
    let storage = FileKvStore::new(config.data_dir.clone())?;
    let mut store = ChatSessionStore::load(Box::new(storage));
    if store.sessions().iter().any(|s| s.id == id) {
        store.delete_session(id);
        println!("{}", style::dim("Чат удалён."));
    } else {
        println!("{}", style::yellow("Нет чата с таким id."));
    }
    Ok(())
}

/// One turn: record the user message, classify, answer, reveal.
///
/// Remote failures become a visible assistant message in the transcript;
/// the user's message stays in history so they can retry by sending again.
async fn send_message(
    store: &mut ChatSessionStore,
    api: &ApiClient,
    reveal: &RevealConfig,
    input: &str,
) -> Result<()> {
    let text = truncate_chars(input, MAX_INPUT_CHARS).to_string();
    let session_id = store.active_id().to_string();
    store.append_message(&session_id, ChatMessage::user(&text))?;

    let phrase = THINKING_PHRASES[rand::rng().random_range(0..THINKING_PHRASES.len())];
    println!("{}", style::dim(format!("{phrase}…")));

    let outcome = match api.classify(&text).await {
        Ok(Label::Greeting) => Ok((GREETING_REPLY.to_string(), Vec::new())),
        Ok(Label::Junk) => Ok((JUNK_REPLY.to_string(), Vec::new())),
        Ok(Label::RagQuery) => api
            .chat(&text)
            .await
            .map(|answer| (answer.answer, answer.sources)),
        Err(error) => Err(error),
    };

    match outcome {
        Ok((answer, sources)) => {
            reveal_assistant(store, &session_id, &answer, reveal).await?;
            for source in sources {
                println!("{}", style::dim(format!("  · {source}")));
            }
        }
        Err(error) => {
            let message = ChatMessage::assistant(format!("Ошибка: {error}"));
            println!("{}", style::yellow(&message.text));
            store.append_message(&session_id, message)?;
        }
    }

    Ok(())
}

/// Appends an empty assistant message, then grows its text by
/// `step_chars` characters per tick until the full reply is in history.
/// The store sees every prefix, so an interrupt mid-reveal persists a
/// readable partial reply.
async fn reveal_assistant(
    store: &mut ChatSessionStore,
    session_id: &str,
    full_text: &str,
    reveal: &RevealConfig,
) -> Result<()> {
    let message = ChatMessage::assistant("");
    let message_id = message.id.clone();
    store.append_message(session_id, message)?;

    if !reveal.enabled || reveal.step_chars == 0 {
        store.update_message_text(session_id, &message_id, full_text)?;
        println!("{full_text}");
        return Ok(());
    }

    let chars: Vec<char> = full_text.chars().collect();
    let mut out = std::io::stdout();
    let mut shown = 0usize;
    while shown < chars.len() {
        let next = (shown + reveal.step_chars).min(chars.len());
        let prefix: String = chars[..next].iter().collect();
        store.update_message_text(session_id, &message_id, &prefix)?;

        let delta: String = chars[shown..next].iter().collect();
        write!(out, "{delta}")?;
        out.flush()?;

        shown = next;
        tokio::time::sleep(Duration::from_millis(reveal.tick_ms)).await;
    }
    println!();

    Ok(())
}

fn print_transcript(session: &ChatSession) {
    println!("{}", style::value(&session.title));
    for message in &session.messages {
        match message.role {
            MessageRole::User => println!("{} {}", style::accent("Вы:"), message.text),
            MessageRole::Assistant => println!("{}", message.text),
        }
    }
}

fn print_session_list(store: &ChatSessionStore) {
    for (idx, session) in store.sessions_by_recency().iter().enumerate() {
        let marker = if session.id == store.active_id() {
            "*"
        } else {
            " "
        };
        let updated = chrono::DateTime::from_timestamp_millis(session.updated_at)
            .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
        println!(
            "{marker} {} {} {} {}",
            style::accent(format!("{}.", idx + 1)),
            style::value(&session.title),
            style::dim(format!("({} сообщ.)", session.messages.len())),
            style::dim(updated),
        );
    }
}

fn print_prompt(hint_idx: usize) {
    println!("{}", style::dim(format!("Подсказка: {}", HINTS[hint_idx])));
    print!("{} ", style::accent(">"));
    let _ = std::io::stdout().flush();
}

/// Maps a 1-based sidebar index (recency order) to a session id.
fn session_id_at(store: &ChatSessionStore, index: usize) -> Option<String> {
    store
        .sessions_by_recency()
        .get(index.checked_sub(1)?)
        .map(|s| s.id.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryKvStore;

    fn test_store() -> ChatSessionStore {
        ChatSessionStore::load(Box::new(MemoryKvStore::new()))
    }

    #[test]
    fn parse_slash_recognizes_commands() {
        assert_eq!(parse_slash("/new"), Some(SlashCommand::New));
        assert_eq!(parse_slash("/list"), Some(SlashCommand::List));
        assert_eq!(parse_slash("/switch 2"), Some(SlashCommand::Switch(2)));
        assert_eq!(parse_slash("/delete 1"), Some(SlashCommand::Delete(1)));
        assert_eq!(parse_slash("/quit"), Some(SlashCommand::Quit));
        assert_eq!(parse_slash("/exit"), Some(SlashCommand::Quit));
    }

    #[test]
    fn parse_slash_rejects_garbage() {
        assert_eq!(parse_slash("/switch"), Some(SlashCommand::Unknown));
        assert_eq!(parse_slash("/switch two"), Some(SlashCommand::Unknown));
        assert_eq!(parse_slash("/frobnicate"), Some(SlashCommand::Unknown));
        assert_eq!(parse_slash("обычный вопрос"), None);
    }

    #[test]
    fn session_id_at_uses_one_based_recency_order() {
        let mut store = test_store();
        let older = store.active_id().to_string();
        let newer = store.create_session();

        assert_eq!(session_id_at(&store, 1), Some(newer));
        assert_eq!(session_id_at(&store, 2), Some(older));
        assert_eq!(session_id_at(&store, 3), None);
        assert_eq!(session_id_at(&store, 0), None);
    }

    #[tokio::test]
    async fn reveal_writes_full_text_into_history() {
        let mut store = test_store();
        let session_id = store.active_id().to_string();
        let reveal = RevealConfig {
            enabled: true,
            step_chars: 2,
            tick_ms: 0,
        };

        reveal_assistant(&mut store, &session_id, "Порядок запуска ВС", &reveal)
            .await
            .unwrap();

        let last = store.active_session().messages.last().unwrap();
        assert_eq!(last.role, MessageRole::Assistant);
        assert_eq!(last.text, "Порядок запуска ВС");
    }

    #[tokio::test]
    async fn reveal_disabled_writes_in_one_update() {
        let mut store = test_store();
        let session_id = store.active_id().to_string();
        let reveal = RevealConfig {
            enabled: false,
            step_chars: 2,
            tick_ms: 14,
        };

        reveal_assistant(&mut store, &session_id, "ответ", &reveal)
            .await
            .unwrap();

        let last = store.active_session().messages.last().unwrap();
        assert_eq!(last.text, "ответ");
    }
}
