use std::time::Duration;

/// Адрес Level 1 порта по умолчанию
pub const DEFAULT_ENDPOINT: &str = "localhost:5009";

/// Часовой пояс, в котором сервер присылает время
pub const DEFAULT_TIME_ZONE: &str = "America/New_York";

/// Ёмкость каждой из семи выходных очередей
pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

/// Размер буфера строки; более длинные записи отбрасываются
pub const DEFAULT_READ_BUFFER: usize = 8192;

/// Таймаут чтения сокета = максимальная задержка реакции на shutdown
pub const READ_TICK: Duration = Duration::from_millis(200);

/// Таймаут записи команд серверу
pub const WRITE_TIMEOUT: Duration = Duration::from_secs(5);

/// Сколько [`Feed::stop`](crate::Feed::stop) ждёт поток чтения
pub const STOP_TIMEOUT: Duration = Duration::from_secs(5);
