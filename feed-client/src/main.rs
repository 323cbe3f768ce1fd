//! Точка входа `feed-client`.
//!
//! Жизненный цикл:
//! - парсинг CLI и загрузка списка символов
//! - подключение к Level 1 порту (фид сам запрашивает схему полей)
//! - подписка на символы и, по желанию, на новости
//! - разбор очередей до EOF сервера или `Ctrl+C`

mod cli;
mod consumer;
mod symbols;
use std::sync::{Arc, atomic::AtomicBool, atomic::Ordering};

use anyhow::Context;
use clap::Parser;
use log::info;

use feed_core::{Feed, Request};

fn main() -> anyhow::Result<()> {
    // Логи через RUST_LOG=info/trace
    env_logger::init();

    let shutdown = Arc::new(AtomicBool::new(false));

    // Ctrl+C => ставим shutdown=true
    {
        let shutdown = shutdown.clone();
        ctrlc::set_handler(move || {
            shutdown.store(true, Ordering::Relaxed);
            info!("shutting down...");
        })?;
    }

    let args = cli::Args::parse();
    args.validate()?;

    let symbols = symbols::load_symbols(&args)?;

    info!(
        "Starting feed-client: endpoint={}, time_zone={}, queue_capacity={}, symbols={}",
        args.endpoint,
        args.time_zone,
        args.queue_capacity,
        symbols.join(",")
    );

    let mut feed = Feed::start(args.to_config()).context("failed to start feed")?;

    if args.news {
        feed.request(&Request::NewsOn)?;
    }
    for sym in &symbols {
        feed.watch(sym)?;
    }

    let rx = feed.receivers().clone();
    let stats = consumer::run_consumer(&rx, &shutdown, || feed.is_finished());
    info!("consumed: {stats}");
    drop(rx);

    if let Some(report) = feed.stop() {
        info!("feed stopped ({:?}): {}", report.exit, report.stats);
    }

    Ok(())
}
