use std::io;
use std::net::{Shutdown, TcpStream};
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use std::thread;

use log::{info, warn};

use crate::backup::Backup;
use crate::constants::READ_TICK;
use crate::dispatch::{DispatchStats, Dispatcher};
use crate::framing::{Frame, LineFramer};

const BACK_TO_BACK_BACKUP_ERR_LIMIT: usize = 20;

/// Почему поток чтения остановился
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReaderExit {
    /// Выставлен флаг shutdown
    Shutdown,
    /// Сервер закрыл соединение
    Eof,
    /// Ошибка чтения из сокета
    Failed(io::ErrorKind),
}

/// Итог работы потока чтения
#[derive(Debug, Clone)]
pub struct ReaderReport {
    /// Причина остановки
    pub exit: ReaderExit,
    /// Счётчики диспетчера на момент остановки
    pub stats: DispatchStats,
}

/// Запускает поток чтения `feed-reader`
pub(crate) fn spawn_reader(
    stream: TcpStream,
    dispatcher: Dispatcher,
    backup: Option<Backup>,
    buffer_capacity: usize,
    shutdown: Arc<AtomicBool>,
) -> io::Result<thread::JoinHandle<ReaderReport>> {
    thread::Builder::new()
        .name("feed-reader".to_string())
        .spawn(move || run_reader(stream, dispatcher, backup, buffer_capacity, shutdown))
}

/// Цикл чтения: строка -> (backup) -> диспетчер.
///
/// Shutdown проверяется между записями; таймаут чтения сокета
/// ограничивает задержку реакции одним `READ_TICK`. Конец потока
/// завершает цикл, переподключения нет.
pub fn run_reader(
    stream: TcpStream,
    mut dispatcher: Dispatcher,
    mut backup: Option<Backup>,
    buffer_capacity: usize,
    shutdown: Arc<AtomicBool>,
) -> ReaderReport {
    stream.set_read_timeout(Some(READ_TICK)).ok();

    let mut framer = LineFramer::with_capacity(buffer_capacity, &stream);
    let mut backup_err_count = 0;

    let exit = loop {
        if shutdown.load(Ordering::Relaxed) {
            info!("reader shutting down");
            break ReaderExit::Shutdown;
        }

        match framer.next_frame() {
            Ok(Frame::Record(line)) => {
                mirror(&mut backup, &line, &mut backup_err_count);
                dispatcher.dispatch(&line);
            }
            Ok(Frame::Oversized(n)) => {
                warn!(
                    "record of {n} bytes does not fit read buffer ({} bytes), dropped",
                    framer.capacity()
                );
            }
            Ok(Frame::Eof) => {
                info!("server closed the stream");
                break ReaderExit::Eof;
            }
            Err(e)
                if e.kind() == io::ErrorKind::WouldBlock
                    || e.kind() == io::ErrorKind::TimedOut =>
            {
                // просто "тик" цикла, ничего не делаем
                continue;
            }
            Err(e) => {
                warn!("read error, closing connection: {e}");
                break ReaderExit::Failed(e.kind());
            }
        }
    };

    if let Some(b) = backup.as_mut() {
        if let Err(e) = b.flush() {
            warn!("backup flush failed: {e}");
        }
    }
    stream.shutdown(Shutdown::Both).ok();
    info!("reader stopped ({exit:?}): {}", dispatcher.stats());

    ReaderReport {
        exit,
        stats: dispatcher.stats().clone(),
    }
}

/// Пишет строку в backup; после серии ошибок подряд backup отключается
fn mirror(backup: &mut Option<Backup>, line: &[u8], err_count: &mut usize) {
    let Some(b) = backup.as_mut() else {
        return;
    };

    match b.write_line(line) {
        Ok(()) => *err_count = 0,
        Err(e) => {
            warn!("backup write failed: {e}");
            *err_count += 1;
            if *err_count >= BACK_TO_BACK_BACKUP_ERR_LIMIT {
                warn!("too many backup errors in a row, backup disabled");
                *backup = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queues::{self, Receivers};
    use jiff::tz::TimeZone;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::time::Duration;

    fn connect_pair() -> (TcpStream, TcpStream) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let client = TcpStream::connect(addr).unwrap();
        let (server, _) = listener.accept().unwrap();

        (client, server)
    }

    fn mk_dispatcher() -> (Dispatcher, Receivers) {
        let tz = TimeZone::get("America/New_York").unwrap();
        let (tx, rx) = queues::bounded(16);
        (Dispatcher::new(tz, tx), rx)
    }

    #[test]
    fn dispatches_records_until_eof() {
        let (client, mut server) = connect_pair();
        server
            .write_all(b"S,UPDATE FIELDNAMES,Symbol,Last\r\nP,AAPL,150.00\r\nn,MSFQQ\r\n")
            .unwrap();
        drop(server);

        let (d, rx) = mk_dispatcher();
        let shutdown = Arc::new(AtomicBool::new(false));
        let report = run_reader(client, d, None, 1024, shutdown);

        assert_eq!(report.exit, ReaderExit::Eof);
        assert_eq!(report.stats.published, 2);
        assert_eq!(rx.updates.try_recv().unwrap().get("Last"), Some("150.00"));
        assert_eq!(rx.errors.try_recv().unwrap().payload, "MSFQQ");
    }

    #[test]
    fn oversized_record_is_skipped() {
        let (client, mut server) = connect_pair();
        let long = format!("n,{}\r\n", "X".repeat(100));
        server.write_all(long.as_bytes()).unwrap();
        server.write_all(b"n,SHORT\r\n").unwrap();
        drop(server);

        let (d, rx) = mk_dispatcher();
        let report = run_reader(client, d, None, 32, Arc::new(AtomicBool::new(false)));

        assert_eq!(report.exit, ReaderExit::Eof);
        assert_eq!(rx.errors.len(), 1);
        assert_eq!(rx.errors.try_recv().unwrap().payload, "SHORT");
    }

    #[test]
    fn backup_mirrors_lines_with_crlf() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stream.txt");

        let (client, mut server) = connect_pair();
        server.write_all(b"T,20261019 09:30:00\nX,garbage\n").unwrap();
        drop(server);

        let (d, rx) = mk_dispatcher();
        let backup = Backup::open(&path).unwrap();
        run_reader(client, d, Some(backup), 1024, Arc::new(AtomicBool::new(false)));

        // backup пишет всё прочитанное, в том числе неизвестные маркеры
        let got = std::fs::read_to_string(&path).unwrap();
        assert_eq!(got, "T,20261019 09:30:00\r\nX,garbage\r\n");
        assert_eq!(rx.time.len(), 1);
    }

    #[test]
    fn preset_shutdown_closes_connection_without_reading() {
        let (client, mut server) = connect_pair();
        server.write_all(b"n,MSFQQ\n").unwrap();

        let (d, rx) = mk_dispatcher();
        let report = run_reader(client, d, None, 1024, Arc::new(AtomicBool::new(true)));

        assert_eq!(report.exit, ReaderExit::Shutdown);
        assert_eq!(rx.pending(), 0);

        // соединение закрыто нашей стороной => сервер видит EOF
        server
            .set_read_timeout(Some(Duration::from_secs(2)))
            .unwrap();
        let mut buf = [0u8; 16];
        assert_eq!(server.read(&mut buf).unwrap_or(0), 0);
    }

    #[test]
    fn shutdown_interrupts_idle_reader_within_a_tick() {
        let (client, _server) = connect_pair();

        let (d, _rx) = mk_dispatcher();
        let shutdown = Arc::new(AtomicBool::new(false));
        let h = spawn_reader(client, d, None, 1024, shutdown.clone()).unwrap();

        thread::sleep(Duration::from_millis(50));
        assert!(!h.is_finished());

        shutdown.store(true, Ordering::Relaxed);
        thread::sleep(READ_TICK * 3);
        assert!(h.is_finished(), "reader must notice shutdown after a read timeout");
        assert_eq!(h.join().unwrap().exit, ReaderExit::Shutdown);
    }
}
