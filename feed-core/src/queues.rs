use crossbeam_channel::{Receiver, Sender};

use crate::types::{
    ErrorEvent, FundamentalSnapshot, NewsItem, QuoteUpdate, RegionalUpdate, SystemEvent, TimeSync,
};

/// Передающие концы семи очередей. Принадлежат диспетчеру.
#[derive(Debug)]
pub struct Senders {
    pub(crate) system: Sender<SystemEvent>,
    pub(crate) news: Sender<NewsItem>,
    pub(crate) errors: Sender<ErrorEvent>,
    pub(crate) fundamental: Sender<FundamentalSnapshot>,
    pub(crate) regional: Sender<RegionalUpdate>,
    pub(crate) time: Sender<TimeSync>,
    pub(crate) updates: Sender<QuoteUpdate>,
}

/// Принимающие концы - то, что видит приложение.
///
/// Порядок внутри одной очереди совпадает с порядком на проводе,
/// между очередями порядок не гарантируется.
#[derive(Debug, Clone)]
pub struct Receivers {
    /// `S`, кроме схемы полей
    pub system: Receiver<SystemEvent>,
    /// `N`
    pub news: Receiver<NewsItem>,
    /// `n`, `E` и `Q` с "Not Found"
    pub errors: Receiver<ErrorEvent>,
    /// `F`
    pub fundamental: Receiver<FundamentalSnapshot>,
    /// `R`
    pub regional: Receiver<RegionalUpdate>,
    /// `T`
    pub time: Receiver<TimeSync>,
    /// `P` и `Q` котировки
    pub updates: Receiver<QuoteUpdate>,
}

/// Создаёт семь bounded очередей одинаковой ёмкости
pub fn bounded(capacity: usize) -> (Senders, Receivers) {
    let (system_tx, system_rx) = crossbeam_channel::bounded(capacity);
    let (news_tx, news_rx) = crossbeam_channel::bounded(capacity);
    let (errors_tx, errors_rx) = crossbeam_channel::bounded(capacity);
    let (fundamental_tx, fundamental_rx) = crossbeam_channel::bounded(capacity);
    let (regional_tx, regional_rx) = crossbeam_channel::bounded(capacity);
    let (time_tx, time_rx) = crossbeam_channel::bounded(capacity);
    let (updates_tx, updates_rx) = crossbeam_channel::bounded(capacity);

    let senders = Senders {
        system: system_tx,
        news: news_tx,
        errors: errors_tx,
        fundamental: fundamental_tx,
        regional: regional_tx,
        time: time_tx,
        updates: updates_tx,
    };
    let receivers = Receivers {
        system: system_rx,
        news: news_rx,
        errors: errors_rx,
        fundamental: fundamental_rx,
        regional: regional_rx,
        time: time_rx,
        updates: updates_rx,
    };
    (senders, receivers)
}

impl Receivers {
    /// Суммарное число сообщений, ждущих во всех очередях
    pub fn pending(&self) -> usize {
        self.system.len()
            + self.news.len()
            + self.errors.len()
            + self.fundamental.len()
            + self.regional.len()
            + self.time.len()
            + self.updates.len()
    }
}
