use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Верхнеуровневый тип ошибок крейта
#[derive(Debug, Error)]
pub enum FeedError {
    /// Некорректная конфигурация
    #[error("invalid config: {0}")]
    Config(String),

    /// Не удалось загрузить часовой пояс
    #[error("unknown time zone {name:?}")]
    TimeZone {
        /// IANA-имя пояса
        name: String,
        /// Причина
        #[source]
        source: jiff::Error,
    },

    /// Не удалось подключиться к серверу
    #[error("could not connect to {endpoint}")]
    Connect {
        /// HOST:PORT
        endpoint: String,
        /// Причина
        #[source]
        source: io::Error,
    },

    /// Не удалось открыть файл резервной копии потока
    #[error("could not open backup file {path:?}")]
    Backup {
        /// Путь к файлу
        path: PathBuf,
        /// Причина
        #[source]
        source: io::Error,
    },

    /// Прочие ошибки ввода/вывода
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Ошибки разбора одной записи
#[derive(Debug, Error)]
pub enum MessageError {
    /// Обязательное поле отсутствует или пустое
    #[error("missing field: {0}")]
    MissingField(&'static str),

    /// Время в непонятном формате
    #[error("bad timestamp {raw:?}")]
    BadTimestamp {
        /// Исходная строка
        raw: String,
        /// Причина
        #[source]
        source: jiff::Error,
    },
}
