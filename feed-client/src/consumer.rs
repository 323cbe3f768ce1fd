use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crossbeam_channel::select;
use log::{debug, info, warn};

use feed_core::Receivers;

const TICK_RATE_MS: u64 = 200;

#[derive(Debug, Default)]
pub(crate) struct ConsumerStats {
    pub(crate) system: usize,
    pub(crate) updates: usize,
    pub(crate) time: usize,
    pub(crate) regional: usize,
    pub(crate) fundamental: usize,
    pub(crate) news: usize,
    pub(crate) errors: usize,
}

impl fmt::Display for ConsumerStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "system={} updates={} time={} regional={} fundamental={} news={} errors={}",
            self.system,
            self.updates,
            self.time,
            self.regional,
            self.fundamental,
            self.news,
            self.errors
        )
    }
}

/// Разгребает все семь очередей и пишет сообщения в лог.
///
/// Выходит по shutdown или когда поток чтения завершился
/// (`feed_done`) и очереди пусты.
pub(crate) fn run_consumer(
    rx: &Receivers,
    shutdown: &AtomicBool,
    feed_done: impl Fn() -> bool,
) -> ConsumerStats {
    let mut stats = ConsumerStats::default();
    let tick = Duration::from_millis(TICK_RATE_MS);

    while !shutdown.load(Ordering::Relaxed) {
        // Err значит: очередь пуста и поток чтения ушёл
        let drained = select! {
            recv(rx.system) -> msg => msg.map(|ev| {
                stats.system += 1;
                info!("system {} {}", ev.kind, ev.fields.join(","));
            }).is_err(),
            recv(rx.updates) -> msg => msg.map(|q| {
                stats.updates += 1;
                info!("{q}");
            }).is_err(),
            recv(rx.time) -> msg => msg.map(|t| {
                stats.time += 1;
                match t.timestamp {
                    Some(ts) => debug!("server time {ts}"),
                    None => debug!("server time {:?} (unparsed)", t.raw),
                }
            }).is_err(),
            recv(rx.regional) -> msg => msg.map(|r| {
                stats.regional += 1;
                info!("regional {} bid={:?} ask={:?}", r.symbol, r.bid, r.ask);
            }).is_err(),
            recv(rx.fundamental) -> msg => msg.map(|f| {
                stats.fundamental += 1;
                info!(
                    "fundamental {} pe={:?} name={}",
                    f.symbol,
                    f.pe,
                    f.company_name.as_deref().unwrap_or("-")
                );
            }).is_err(),
            recv(rx.news) -> msg => msg.map(|n| {
                stats.news += 1;
                info!("news [{}] {} {}", n.distributor, n.symbols.join(":"), n.headline);
            }).is_err(),
            recv(rx.errors) -> msg => msg.map(|e| {
                stats.errors += 1;
                warn!("{e}");
            }).is_err(),
            default(tick) => false,
        };

        if (drained || feed_done()) && rx.pending() == 0 {
            info!("feed closed");
            break;
        }
    }

    stats
}
