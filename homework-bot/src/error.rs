//! Error kinds raised while loading credentials, polling the homework API
//! and delivering Telegram notifications.
//!
//! Display strings are user-facing: a failed cycle forwards them to the chat
//! as `Сбой в работе программы: <error>`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BotError {
    /// One or several required environment variables are unset or empty.
    #[error("Отсутствуют обязательные переменные окружения: {}", .0.join(", "))]
    MissingEnv(Vec<String>),

    #[error("Некорректная конфигурация: {0}")]
    Config(String),

    /// Transport-level failure (connect, timeout, body read).
    #[error("Ошибка доступа к API {endpoint}: {source}")]
    Request {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// HTTP 401 / 403.
    #[error("Невалидный токен доступа к Яндекс-Практикум (HTTP {status})")]
    InvalidToken { status: u16 },

    /// HTTP 400, the API rejected the `from_date` parameter.
    #[error("Некорректный параметр from_date={timestamp}")]
    BadTimestamp { timestamp: i64 },

    /// Any other non-200 status.
    #[error("Произошла ошибка с сервисом {endpoint}: HTTP {status}")]
    UnexpectedApiStatus { endpoint: String, status: u16 },

    #[error("Не удалось декодировать ответ API в JSON: {0}")]
    JsonDecode(#[source] serde_json::Error),

    #[error("Некорректный тип ответа API: ожидался dict, получен {found}")]
    ResponseType { found: &'static str },

    #[error("Отсутствует ключ {0} в ответе API")]
    MissingKey(&'static str),

    #[error("Тип данных поля homeworks ({found}) не соответствует ожидаемому (list)")]
    HomeworksFieldType { found: &'static str },

    #[error("Тип данных поля current_date ({found}) не соответствует ожидаемому (int)")]
    CurrentDateFieldType { found: &'static str },

    #[error("Некорректный тип домашней работы: ожидался dict, получен {found}")]
    HomeworkType { found: &'static str },

    #[error("Неожиданный статус домашней работы: {0}")]
    UnexpectedStatus(String),

    #[error("Ошибка отправки сообщения в Telegram: {0}")]
    Telegram(String),
}

impl BotError {
    /// Transient errors end the current cycle only; the next scheduled cycle
    /// retries. Everything else stops the poll loop.
    pub fn is_transient(&self) -> bool {
        !matches!(self, BotError::MissingEnv(_) | BotError::Config(_))
    }
}

pub type Result<T> = std::result::Result<T, BotError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_env_lists_all_names() {
        let err = BotError::MissingEnv(vec![
            "PRACTICUM_TOKEN".to_string(),
            "TELEGRAM_CHAT_ID".to_string(),
        ]);
        assert_eq!(
            err.to_string(),
            "Отсутствуют обязательные переменные окружения: PRACTICUM_TOKEN, TELEGRAM_CHAT_ID"
        );
    }

    #[test]
    fn test_transient_classification() {
        assert!(!BotError::MissingEnv(vec![]).is_transient());
        assert!(!BotError::Config("bad".to_string()).is_transient());
        assert!(BotError::InvalidToken { status: 401 }.is_transient());
        assert!(BotError::MissingKey("homeworks").is_transient());
        assert!(BotError::UnexpectedStatus("lost".to_string()).is_transient());
        assert!(BotError::Telegram("down".to_string()).is_transient());
    }
}
