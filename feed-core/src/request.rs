use std::fmt;
use std::io::{self, Write};

use log::debug;

/// Команды, которые клиент шлёт серверу по тому же соединению
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// Текущая схема полей `P`/`Q` (ответ: `S,CURRENT UPDATE FIELDNAMES,...`)
    CurrentFieldNames,
    /// Все поля, которые сервер умеет слать
    AllFieldNames,
    /// Выбрать набор полей для `P`/`Q`
    SelectFields(Vec<String>),
    /// Версия протокола
    SetProtocol(String),
    /// Включить поток новостей
    NewsOn,
    /// Выключить поток новостей
    NewsOff,
    /// Список бирж
    ListedMarkets,
    /// Подписка на символ
    Watch(String),
    /// Подписка только на сделки
    WatchTrades(String),
    /// Отписка
    Unwatch(String),
    /// Запросить свежий summary
    Refresh(String),
    /// Запросить текущее время сервера
    Timestamp,
}

impl fmt::Display for Request {
    /// Строка команды без `\r\n`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Request::CurrentFieldNames => f.write_str("S,REQUEST CURRENT UPDATE FIELDNAMES"),
            Request::AllFieldNames => f.write_str("S,REQUEST ALL UPDATE FIELDNAMES"),
            Request::SelectFields(names) => write!(f, "S,SELECT UPDATE FIELDS,{}", names.join(",")),
            Request::SetProtocol(version) => write!(f, "S,SET PROTOCOL,{version}"),
            Request::NewsOn => f.write_str("S,NEWSON"),
            Request::NewsOff => f.write_str("S,NEWSOFF"),
            Request::ListedMarkets => f.write_str("S,REQUEST LISTED MARKETS"),
            Request::Watch(sym) => write!(f, "w{}", sym.to_ascii_uppercase()),
            Request::WatchTrades(sym) => write!(f, "t{}", sym.to_ascii_uppercase()),
            Request::Unwatch(sym) => write!(f, "r{}", sym.to_ascii_uppercase()),
            Request::Refresh(sym) => write!(f, "f{}", sym.to_ascii_uppercase()),
            Request::Timestamp => f.write_str("T"),
        }
    }
}

/// Строка команды с `\r\n`, как её ждёт сервер
pub fn format_request_line(req: &Request) -> String {
    format!("{req}\r\n")
}

/// Идентификатор отправленного запроса
pub type RequestId = u64;

/// Пишет команды в соединение и нумерует их.
///
/// Счётчик у каждого писателя свой: два фида в одном процессе
/// не делят последовательность.
pub struct RequestWriter<W: Write> {
    out: W,
    last_id: RequestId,
}

impl<W: Write> RequestWriter<W> {
    /// Писатель с нулевым счётчиком
    pub fn new(out: W) -> Self {
        Self { out, last_id: 0 }
    }

    /// Пишет команду с `\r\n` и сбрасывает буфер; возвращает её номер
    pub fn send(&mut self, req: &Request) -> io::Result<RequestId> {
        self.out.write_all(format_request_line(req).as_bytes())?;
        self.out.flush()?;

        self.last_id += 1;
        debug!("request #{} sent: {req}", self.last_id);
        Ok(self.last_id)
    }

    /// Номер последнего отправленного запроса (0 - ещё ничего не слали)
    pub fn last_id(&self) -> RequestId {
        self.last_id
    }

    /// Нижележащий writer
    pub fn get_ref(&self) -> &W {
        &self.out
    }
}

/// Call или put
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionRight {
    /// Call
    Call,
    /// Put
    Put,
}

/// Буква месяца экспирации в символе опциона:
/// call - `A`..`L`, put - `M`..`X`. `None` для месяца вне 1..=12.
pub fn option_month_code(month: i8, right: OptionRight) -> Option<char> {
    if !(1..=12).contains(&month) {
        return None;
    }
    let base = match right {
        OptionRight::Call => b'A',
        OptionRight::Put => b'M',
    };
    Some((base + (month as u8 - 1)) as char)
}
