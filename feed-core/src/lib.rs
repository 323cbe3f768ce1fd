//! # feed-core
//!
//! Клиент строкового Level 1 фида котировок поверх одного TCP-соединения.
//!
//! Этот крейт содержит:
//!
//! - [`framing`] - нарезка потока на строки буфером фиксированного размера
//! - [`marker`] - тип записи по первому байту
//! - [`fields`] - динамическая схема полей `P`/`Q`
//! - [`parse`] - разбор полезной нагрузки по типам
//! - [`dispatch`] - диспетчер: классификация, разбор, раскладка по очередям
//! - [`reader`] - поток чтения сокета
//! - [`feed`] - подключение, запуск и остановка
//! - [`request`] - команды серверу
//! - [`types`] - доменные типы сообщений
//! - [`error`] - типы ошибок
//!
//! ## Пример: схема полей и котировка
//!
//! ```rust
//! use feed_core::{Dispatcher, queues};
//! use jiff::tz::TimeZone;
//!
//! let tz = TimeZone::get("America/New_York").unwrap();
//! let (tx, rx) = queues::bounded(16);
//! let mut d = Dispatcher::new(tz, tx);
//!
//! d.dispatch(b"S,UPDATE FIELDNAMES,Symbol,Last,Bid,Ask");
//! d.dispatch(b"P,AAPL,150.00,149.98,150.02");
//!
//! let q = rx.updates.try_recv().unwrap();
//! assert_eq!(q.symbol(), Some("AAPL"));
//! assert_eq!(q.get_f64("Bid"), Some(149.98));
//! assert!(rx.system.is_empty());
//! ```
//!
//! ## Пример: подключение
//!
//! ```no_run
//! use feed_core::{Feed, FeedConfig};
//!
//! let mut feed = Feed::start(FeedConfig::default()).unwrap();
//! feed.watch("AAPL").unwrap();
//!
//! while let Ok(q) = feed.receivers().updates.recv() {
//!     println!("{q}");
//! }
//! ```
//!
//! ## Дизайн
//!
//! Один поток читает сокет и сразу же разбирает записи, отдельного пула
//! нет. Очереди bounded и отправка в них блокирующая: медленный
//! потребитель одной очереди тормозит приём всех типов, зато сообщения
//! не теряются. Переподключения нет: после EOF или ошибки сокета поток
//! чтения завершается.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Фоновое зеркало сырого потока.
pub mod backup;

/// Настройки фида.
pub mod config;

/// Классификация и раскладка записей по очередям.
pub mod dispatch;

/// Ошибки `feed-core`.
pub mod error;

/// Подключение, запуск и остановка.
pub mod feed;

/// Динамическая схема полей.
pub mod fields;

/// Нарезка потока на строки.
pub mod framing;

/// Тип записи по первому байту.
pub mod marker;

/// Разбор полезной нагрузки.
pub mod parse;

/// Семь выходных очередей.
pub mod queues;

/// Поток чтения.
pub mod reader;

/// Команды серверу.
pub mod request;

/// Список символов для подписки.
pub mod symbols;

/// Доменные типы сообщений.
pub mod types;

/// Общие константы
mod constants;
pub use constants::{
    DEFAULT_ENDPOINT, DEFAULT_QUEUE_CAPACITY, DEFAULT_READ_BUFFER, DEFAULT_TIME_ZONE, READ_TICK,
    STOP_TIMEOUT, WRITE_TIMEOUT,
};

// --- Re-exports (публичный фасад API) ---

pub use crate::config::FeedConfig;
pub use crate::dispatch::{DispatchStats, Dispatcher};
pub use crate::error::{FeedError, MessageError};
pub use crate::feed::Feed;
pub use crate::fields::FieldDirectory;
pub use crate::marker::Marker;
pub use crate::queues::Receivers;
pub use crate::reader::{ReaderExit, ReaderReport};
pub use crate::request::{OptionRight, Request, RequestId};
pub use crate::types::{
    ErrorEvent, FundamentalSnapshot, NewsItem, QuoteKind, QuoteUpdate, RegionalUpdate,
    SystemEvent, TimeSync,
};
