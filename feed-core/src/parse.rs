//! Разбор полезной нагрузки по типам записей.
//!
//! Парсеры ничего не знают про очереди и сокеты: на входе строка без
//! маркера, на выходе готовое сообщение. Сообщение получается всегда:
//! пустой символ остаётся пустой строкой, непонятное время и числа
//! превращаются в `None`.

use std::str::FromStr;

use jiff::Zoned;
use jiff::civil::{DateTime, Time};
use jiff::tz::TimeZone;

use crate::error::MessageError;
use crate::fields::FieldDirectory;
use crate::types::{
    ErrorEvent, FundamentalSnapshot, NewsItem, QuoteKind, QuoteUpdate, RegionalUpdate,
    SystemEvent, TimeSync,
};

/// Управляющие токены, после которых идёт схема полей
pub const FIELDNAMES_TOKENS: [&str; 2] = ["UPDATE FIELDNAMES", "CURRENT UPDATE FIELDNAMES"];

/// Значение третьего поля `Q`, означающее неизвестный символ
pub const NOT_FOUND_MARK: &str = "Not Found";

const TIME_FORMAT: &str = "%Y%m%d %H:%M:%S";
const NEWS_TIME_FORMAT: &str = "%Y%m%d%H%M%S";

/// Позиция названия компании в `F`
const COMPANY_NAME_POS: usize = 23;

/// Если запись - схема полей, возвращает имена полей по порядку
pub fn fieldnames<'a, 'b>(items: &'b [&'a str]) -> Option<&'b [&'a str]> {
    let (first, rest) = items.split_first()?;
    FIELDNAMES_TOKENS.contains(first).then_some(rest)
}

/// `S`-запись, кроме схемы полей: первое поле - вид события
pub fn parse_system(items: &[&str]) -> SystemEvent {
    let (kind, rest) = items.split_first().map_or(("", &[][..]), |(k, r)| (*k, r));
    SystemEvent {
        kind: kind.to_string(),
        fields: rest.iter().map(|s| s.to_string()).collect(),
    }
}

/// Значения без имени в схеме пропускаются: до прихода схемы котировка
/// получается пустой.
pub fn parse_quote(kind: QuoteKind, items: &[&str], fields: &FieldDirectory) -> QuoteUpdate {
    let fields = items
        .iter()
        .enumerate()
        .filter_map(|(i, v)| fields.lookup(i).map(|name| (name.to_string(), v.to_string())))
        .collect();
    QuoteUpdate { kind, fields }
}

/// `Q`-запись с "Not Found" на третьей позиции
pub fn is_not_found_update(items: &[&str]) -> bool {
    items.get(2).is_some_and(|v| *v == NOT_FOUND_MARK)
}

/// `T,YYYYMMDD HH:MM:SS`; непонятное время даёт `timestamp: None`
pub fn parse_time(payload: &str, tz: &TimeZone) -> TimeSync {
    let raw = payload.split(',').next().unwrap_or("").trim();
    TimeSync {
        timestamp: parse_timestamp(raw, tz).ok(),
        raw: raw.to_string(),
    }
}

/// Время `YYYYMMDD HH:MM:SS` в заданном поясе
pub fn parse_timestamp(raw: &str, tz: &TimeZone) -> Result<Zoned, MessageError> {
    if raw.is_empty() {
        return Err(MessageError::MissingField("timestamp"));
    }

    DateTime::strptime(TIME_FORMAT, raw)
        .and_then(|dt| dt.to_zoned(tz.clone()))
        .map_err(|source| MessageError::BadTimestamp {
            raw: raw.to_string(),
            source,
        })
}

/// `R,SYMBOL,BID,BIDSIZE,BIDTIME,ASK,ASKSIZE,ASKTIME,...`
pub fn parse_regional(items: &[&str]) -> RegionalUpdate {
    RegionalUpdate {
        symbol: text(items, 0).unwrap_or_default(),
        bid: num(items, 1),
        bid_size: num(items, 2),
        bid_time: time(items, 3),
        ask: num(items, 4),
        ask_size: num(items, 5),
        ask_time: time(items, 6),
        fraction_display_code: num(items, 7),
        decimal_precision: num(items, 8),
        market_center: num(items, 9),
    }
}

/// `F`-запись: типизированы первые поля и название компании
pub fn parse_fundamental(items: &[&str]) -> FundamentalSnapshot {
    FundamentalSnapshot {
        symbol: text(items, 0).unwrap_or_default(),
        exchange_id: text(items, 1).unwrap_or_default(),
        pe: num(items, 2),
        average_volume: num(items, 3),
        high_52_week: num(items, 4),
        low_52_week: num(items, 5),
        calendar_year_high: num(items, 6),
        calendar_year_low: num(items, 7),
        dividend_yield: num(items, 8),
        company_name: text(items, COMPANY_NAME_POS),
        fields: items.iter().map(|s| s.to_string()).collect(),
    }
}

/// `N,SOURCE,ID,SYM1:SYM2:,YYYYMMDDHHMMSS,HEADLINE`
///
/// Заголовок может содержать запятые, поэтому хвост склеивается обратно.
pub fn parse_news(items: &[&str], tz: &TimeZone) -> NewsItem {
    let symbols = items
        .get(2)
        .map(|raw| {
            raw.split(':')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    let timestamp = items.get(3).and_then(|raw| {
        DateTime::strptime(NEWS_TIME_FORMAT, raw.trim())
            .and_then(|dt| dt.to_zoned(tz.clone()))
            .ok()
    });

    NewsItem {
        distributor: text(items, 0).unwrap_or_default(),
        story_id: text(items, 1).unwrap_or_default(),
        symbols,
        timestamp,
        headline: items.get(4..).map(|rest| rest.join(",")).unwrap_or_default(),
    }
}

/// `n,SYMBOL`
pub fn parse_not_found(payload: &str) -> ErrorEvent {
    ErrorEvent::not_found(payload)
}

/// `E,текст ошибки`
pub fn parse_error_text(payload: &str) -> ErrorEvent {
    ErrorEvent::server_error(payload)
}

fn text(items: &[&str], i: usize) -> Option<String> {
    items
        .get(i)
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn num<T: FromStr>(items: &[&str], i: usize) -> Option<T> {
    items.get(i).and_then(|s| s.trim().parse().ok())
}

fn time(items: &[&str], i: usize) -> Option<Time> {
    items.get(i).and_then(|s| s.trim().parse().ok())
}
