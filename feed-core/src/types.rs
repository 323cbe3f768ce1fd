use std::fmt;

use jiff::Zoned;
use jiff::civil::Time;
use serde::{Deserialize, Serialize};

/// Код ошибки "символ не найден"
pub const NOT_FOUND_CODE: u16 = 404;

/// Код ошибки для текстовых ошибок сервера
pub const SERVER_ERROR_CODE: u16 = 500;

/// Системное сообщение (`S`), кроме схемы полей
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemEvent {
    /// Первое поле: `SERVER CONNECTED`, `STATS`, `KEY`, ...
    pub kind: String,
    /// Остальные поля как есть
    pub fields: Vec<String>,
}

/// Откуда пришла котировка
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuoteKind {
    /// `P` - полный снимок
    Summary,
    /// `Q` - изменение
    Update,
}

/// Котировка `P`/`Q`, поля которой названы по текущей схеме
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteUpdate {
    /// Summary или Update
    pub kind: QuoteKind,
    /// Пары (имя поля, сырое значение) в порядке на проводе
    pub fields: Vec<(String, String)>,
}

impl QuoteUpdate {
    /// Сырое значение поля по имени
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Значение поля как число с плавающей точкой; пустое -> `None`
    pub fn get_f64(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(|v| v.trim().parse().ok())
    }

    /// Значение поля как целое; пустое -> `None`
    pub fn get_i64(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(|v| v.trim().parse().ok())
    }

    /// Символ (поле `Symbol`)
    pub fn symbol(&self) -> Option<&str> {
        self.get("Symbol")
    }
}

impl fmt::Display for QuoteUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.kind {
            QuoteKind::Summary => "P",
            QuoteKind::Update => "Q",
        };
        write!(f, "{tag}")?;
        for (name, value) in &self.fields {
            write!(f, " {name}={value}")?;
        }
        Ok(())
    }
}

/// Время сервера (`T`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSync {
    /// Время в настроенном часовом поясе; `None`, если строка не разобралась
    pub timestamp: Option<Zoned>,
    /// Время как пришло
    pub raw: String,
}

/// Региональная котировка (`R`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionalUpdate {
    /// Символ; пустой, если сервер его не прислал
    pub symbol: String,
    /// Лучшая цена покупки
    pub bid: Option<f64>,
    /// Объём на bid
    pub bid_size: Option<u64>,
    /// Время последнего изменения bid
    pub bid_time: Option<Time>,
    /// Лучшая цена продажи
    pub ask: Option<f64>,
    /// Объём на ask
    pub ask_size: Option<u64>,
    /// Время последнего изменения ask
    pub ask_time: Option<Time>,
    /// Код отображения дробей
    pub fraction_display_code: Option<u8>,
    /// Знаков после запятой
    pub decimal_precision: Option<u8>,
    /// Идентификатор биржи
    pub market_center: Option<u16>,
}

/// Фундаментальные данные (`F`).
///
/// Типизированы только самые ходовые поля, остальное лежит в `fields`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundamentalSnapshot {
    /// Символ; пустой, если сервер его не прислал
    pub symbol: String,
    /// Код биржи как есть
    pub exchange_id: String,
    /// P/E
    pub pe: Option<f64>,
    /// Средний дневной объём
    pub average_volume: Option<u64>,
    /// Максимум за 52 недели
    pub high_52_week: Option<f64>,
    /// Минимум за 52 недели
    pub low_52_week: Option<f64>,
    /// Максимум с начала года
    pub calendar_year_high: Option<f64>,
    /// Минимум с начала года
    pub calendar_year_low: Option<f64>,
    /// Дивидендная доходность, %
    pub dividend_yield: Option<f64>,
    /// Название компании
    pub company_name: Option<String>,
    /// Все поля записи, включая символ
    pub fields: Vec<String>,
}

/// Новость (`N`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    /// Источник (`DTN`, `CPR`, ...)
    pub distributor: String,
    /// Идентификатор новости; пустой, если не пришёл
    pub story_id: String,
    /// Символы, к которым относится новость
    pub symbols: Vec<String>,
    /// Время публикации
    pub timestamp: Option<Zoned>,
    /// Заголовок целиком, с запятыми
    pub headline: String,
}

/// Ошибка сервера или "символ не найден" (`n`, `E`, `Q ... Not Found`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEvent {
    /// Сервер не знает такого символа
    pub not_found: bool,
    /// 404 или 500
    pub code: u16,
    /// Нагрузка записи как есть
    pub payload: String,
}

impl ErrorEvent {
    /// Символ не найден (404)
    pub fn not_found(payload: impl Into<String>) -> Self {
        Self {
            not_found: true,
            code: NOT_FOUND_CODE,
            payload: payload.into(),
        }
    }

    /// Текстовая ошибка сервера (500)
    pub fn server_error(payload: impl Into<String>) -> Self {
        Self {
            not_found: false,
            code: SERVER_ERROR_CODE,
            payload: payload.into(),
        }
    }

    /// Символ, по которому пришёл not-found
    pub fn symbol(&self) -> Option<&str> {
        if !self.not_found {
            return None;
        }
        self.payload.split(',').next().filter(|s| !s.is_empty())
    }
}

impl fmt::Display for ErrorEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.symbol() {
            Some(sym) => write!(f, "{} symbol not found: {sym}", self.code),
            None => write!(f, "{} {}", self.code, self.payload),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quote(fields: &[(&str, &str)]) -> QuoteUpdate {
        QuoteUpdate {
            kind: QuoteKind::Summary,
            fields: fields
                .iter()
                .map(|(n, v)| (n.to_string(), v.to_string()))
                .collect(),
        }
    }

    #[test]
    fn quote_accessors_parse_numbers_and_skip_empty() {
        let q = quote(&[("Symbol", "AAPL"), ("Last", "150.00"), ("Volume", ""), ("Size", "100")]);

        assert_eq!(q.symbol(), Some("AAPL"));
        assert_eq!(q.get_f64("Last"), Some(150.0));
        assert_eq!(q.get_i64("Size"), Some(100));
        assert_eq!(q.get_i64("Volume"), None);
        assert_eq!(q.get("Bid"), None);
    }

    #[test]
    fn quote_display_keeps_wire_order() {
        let q = quote(&[("Symbol", "AAPL"), ("Bid", "1.5")]);
        assert_eq!(q.to_string(), "P Symbol=AAPL Bid=1.5");
    }

    #[test]
    fn error_event_symbol_only_for_not_found() {
        let nf = ErrorEvent::not_found("MSFQQ");
        assert_eq!(nf.code, NOT_FOUND_CODE);
        assert_eq!(nf.symbol(), Some("MSFQQ"));
        assert_eq!(nf.to_string(), "404 symbol not found: MSFQQ");

        let err = ErrorEvent::server_error("bad command");
        assert_eq!(err.code, SERVER_ERROR_CODE);
        assert!(!err.not_found);
        assert_eq!(err.symbol(), None);
        assert_eq!(err.to_string(), "500 bad command");
    }
}
