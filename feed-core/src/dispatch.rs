use std::fmt;

use crossbeam_channel::Sender;
use jiff::tz::TimeZone;
use log::{debug, trace};

use crate::fields::FieldDirectory;
use crate::marker::{Marker, split_record};
use crate::parse;
use crate::queues::Senders;
use crate::types::QuoteKind;

/// Счётчики диспетчера, для логов и диагностики
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchStats {
    /// Всего записей на входе
    pub records: u64,
    /// Короче минимальной длины
    pub dropped_short: u64,
    /// С неизвестным маркером
    pub dropped_unknown: u64,
    /// Опубликованы без обязательной части (символ, id, время)
    pub parse_faults: u64,
    /// Схемы полей
    pub control: u64,
    /// Ушли в очереди
    pub published: u64,
}

impl fmt::Display for DispatchStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "records={} published={} control={} short={} unknown={} faults={}",
            self.records,
            self.published,
            self.control,
            self.dropped_short,
            self.dropped_unknown,
            self.parse_faults
        )
    }
}

/// Классифицирует записи, разбирает их и раскладывает по очередям.
///
/// Работает в одном потоке вместе с чтением сокета: схема полей меняется
/// только между записями, поэтому блокировки не нужны. Отправка в полную
/// очередь блокирует весь разбор (backpressure на все типы сразу).
pub struct Dispatcher {
    fields: FieldDirectory,
    tz: TimeZone,
    out: Senders,
    stats: DispatchStats,
}

impl Dispatcher {
    /// Диспетчер с пустой схемой полей
    pub fn new(tz: TimeZone, out: Senders) -> Self {
        Self {
            fields: FieldDirectory::new(),
            tz,
            out,
            stats: DispatchStats::default(),
        }
    }

    /// Текущая схема полей (только чтение)
    pub fn fields(&self) -> &FieldDirectory {
        &self.fields
    }

    /// Счётчики с момента создания
    pub fn stats(&self) -> &DispatchStats {
        &self.stats
    }

    /// Обрабатывает одну запись без перевода строки.
    ///
    /// Ошибки наружу не выходят: мусор отбрасывается, а каждая
    /// распознанная запись даёт ровно одно сообщение, даже неполное.
    pub fn dispatch(&mut self, record: &[u8]) {
        self.stats.records += 1;

        let Some((marker, payload)) = split_record(record) else {
            self.stats.dropped_short += 1;
            return;
        };
        let payload = String::from_utf8_lossy(payload);
        let payload = payload.as_ref();

        match marker {
            Marker::System => self.on_system(payload),
            Marker::Summary => self.on_quote(QuoteKind::Summary, payload),
            Marker::Update => self.on_quote(QuoteKind::Update, payload),
            Marker::Time => {
                let msg = parse::parse_time(payload, &self.tz);
                if msg.timestamp.is_none() {
                    self.incomplete("time", "timestamp", payload);
                }
                publish(&self.out.time, msg, "time", &mut self.stats);
            }
            Marker::Regional => {
                let msg = parse::parse_regional(&split_fields(payload));
                if msg.symbol.is_empty() {
                    self.incomplete("regional", "symbol", payload);
                }
                publish(&self.out.regional, msg, "regional", &mut self.stats);
            }
            Marker::Fundamental => {
                let msg = parse::parse_fundamental(&split_fields(payload));
                if msg.symbol.is_empty() {
                    self.incomplete("fundamental", "symbol", payload);
                }
                publish(&self.out.fundamental, msg, "fundamental", &mut self.stats);
            }
            Marker::News => {
                let msg = parse::parse_news(&split_fields(payload), &self.tz);
                if msg.story_id.is_empty() {
                    self.incomplete("news", "story id", payload);
                }
                publish(&self.out.news, msg, "news", &mut self.stats);
            }
            Marker::NotFound => {
                let msg = parse::parse_not_found(payload);
                publish(&self.out.errors, msg, "errors", &mut self.stats);
            }
            Marker::Error => {
                let msg = parse::parse_error_text(payload);
                publish(&self.out.errors, msg, "errors", &mut self.stats);
            }
            Marker::Unknown => {
                trace!("unknown marker {:?}, dropping record", record[0] as char);
                self.stats.dropped_unknown += 1;
            }
        }
    }

    fn on_system(&mut self, payload: &str) {
        let items = split_fields(payload);

        if let Some(names) = parse::fieldnames(&items) {
            debug!("field directory replaced: {} fields", names.len());
            self.fields.replace(names.iter().copied());
            self.stats.control += 1;
            return;
        }

        let msg = parse::parse_system(&items);
        publish(&self.out.system, msg, "system", &mut self.stats);
    }

    fn on_quote(&mut self, kind: QuoteKind, payload: &str) {
        let items = split_fields(payload);

        if kind == QuoteKind::Update && parse::is_not_found_update(&items) {
            let msg = parse::parse_not_found(items[0]);
            publish(&self.out.errors, msg, "errors", &mut self.stats);
            return;
        }

        let msg = parse::parse_quote(kind, &items, &self.fields);
        publish(&self.out.updates, msg, "updates", &mut self.stats);
    }

    fn incomplete(&mut self, queue: &str, what: &str, payload: &str) {
        debug!("{queue} record without {what}, published as is: {payload:?}");
        self.stats.parse_faults += 1;
    }
}

fn split_fields(payload: &str) -> Vec<&str> {
    payload.split(',').collect()
}

/// Блокирующая отправка: полная очередь держит весь разбор
fn publish<T>(tx: &Sender<T>, msg: T, queue: &str, stats: &mut DispatchStats) {
    match tx.send(msg) {
        Ok(()) => stats.published += 1,
        Err(_) => {
            // все получатели этой очереди ушли - сообщение никому не нужно
            debug!("{queue} queue has no receivers, message dropped");
        }
    }
}
