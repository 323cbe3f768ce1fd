use std::net::{SocketAddr, TcpStream};
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use log::{info, warn};

use crate::backup::Backup;
use crate::config::FeedConfig;
use crate::constants::{STOP_TIMEOUT, WRITE_TIMEOUT};
use crate::dispatch::Dispatcher;
use crate::error::FeedError;
use crate::queues::{self, Receivers};
use crate::reader::{ReaderReport, spawn_reader};
use crate::request::{Request, RequestId, RequestWriter};

const STOP_POLL: Duration = Duration::from_millis(10);

/// Подключённый фид: очереди сообщений + канал для команд.
///
/// Жизненный цикл:
/// - часовой пояс и подключение (ошибка любого из них фатальна)
/// - семь очередей одной ёмкости
/// - поток `feed-reader` (чтение + разбор)
/// - запрос текущей схемы полей, чтобы `P`/`Q` было чем разбирать
///
/// При drop поток чтения получает сигнал остановки, но не ждётся;
/// дождаться можно через [`Feed::stop`].
pub struct Feed {
    receivers: Receivers,
    requests: RequestWriter<TcpStream>,
    shutdown: Arc<AtomicBool>,
    reader: Option<JoinHandle<ReaderReport>>,
    peer: SocketAddr,
}

impl Feed {
    /// Подключается и запускает поток чтения.
    ///
    /// Неизвестный часовой пояс, отказ в подключении или неоткрываемый
    /// backup-файл возвращаются ошибкой; поток при этом не запускается.
    pub fn start(config: FeedConfig) -> Result<Self, FeedError> {
        config.validate()?;
        let tz = config.resolve_time_zone()?;

        let endpoint = config.endpoint();
        let stream = TcpStream::connect(endpoint).map_err(|source| FeedError::Connect {
            endpoint: endpoint.to_string(),
            source,
        })?;
        stream.set_nodelay(true).ok();
        let peer = stream.peer_addr()?;
        info!("connected to {endpoint} ({peer}), time zone {}", config.time_zone_name());

        let (senders, receivers) = queues::bounded(config.queue_capacity);

        let backup = match &config.backup_path {
            Some(path) => {
                let b = Backup::open(path).map_err(|source| FeedError::Backup {
                    path: path.clone(),
                    source,
                })?;
                info!("mirroring raw stream to {path:?}");
                Some(b)
            }
            None => None,
        };

        let write_half = stream.try_clone()?;
        write_half.set_write_timeout(Some(WRITE_TIMEOUT)).ok();

        let shutdown = Arc::new(AtomicBool::new(false));
        let reader = spawn_reader(
            stream,
            Dispatcher::new(tz, senders),
            backup,
            config.read_buffer_capacity,
            shutdown.clone(),
        )?;

        let mut feed = Self {
            receivers,
            requests: RequestWriter::new(write_half),
            shutdown,
            reader: Some(reader),
            peer,
        };

        // схема полей нужна раньше первой котировки
        feed.request(&Request::CurrentFieldNames)?;

        Ok(feed)
    }

    /// Очереди сообщений; `Receivers` можно клонировать в другие потоки
    pub fn receivers(&self) -> &Receivers {
        &self.receivers
    }

    /// Отправляет команду; возвращает её номер
    pub fn request(&mut self, req: &Request) -> Result<RequestId, FeedError> {
        Ok(self.requests.send(req)?)
    }

    /// Подписка на символ (`w<SYMBOL>`)
    pub fn watch(&mut self, symbol: &str) -> Result<RequestId, FeedError> {
        self.request(&Request::Watch(symbol.to_string()))
    }

    /// Отписка от символа (`r<SYMBOL>`)
    pub fn unwatch(&mut self, symbol: &str) -> Result<RequestId, FeedError> {
        self.request(&Request::Unwatch(symbol.to_string()))
    }

    /// Адрес сервера
    pub fn peer_addr(&self) -> SocketAddr {
        self.peer
    }

    /// Поток чтения завершился (EOF, ошибка сокета или shutdown)
    pub fn is_finished(&self) -> bool {
        self.reader.as_ref().is_none_or(|h| h.is_finished())
    }

    /// Останавливает поток чтения и ждёт его не дольше [`STOP_TIMEOUT`].
    pub fn stop(self) -> Option<ReaderReport> {
        self.stop_within(STOP_TIMEOUT)
    }

    /// Останавливает поток чтения и ждёт его не дольше `timeout`.
    ///
    /// Свои концы очередей фид отпускает сразу, чтобы поток чтения не
    /// остался висеть на полной очереди. Если клон `Receivers` жив где-то
    /// ещё и его не разгребают, поток стоит на отправке: тогда по таймауту
    /// возвращается `None`, а поток завершится сам, когда клон разгребут
    /// или отпустят.
    ///
    /// `None` также, если поток уже забрали или он запаниковал.
    pub fn stop_within(mut self, timeout: Duration) -> Option<ReaderReport> {
        self.shutdown.store(true, Ordering::Relaxed);
        drop(std::mem::replace(&mut self.receivers, queues::bounded(1).1));

        let h = self.reader.take()?;
        let deadline = Instant::now() + timeout;
        while !h.is_finished() {
            if Instant::now() >= deadline {
                warn!("reader did not stop within {timeout:?}, detaching");
                return None;
            }
            thread::sleep(STOP_POLL);
        }

        match h.join() {
            Ok(report) => Some(report),
            Err(panic) => {
                warn!("reader thread panicked: {:?}", panic);
                None
            }
        }
    }
}

impl Drop for Feed {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }
}
