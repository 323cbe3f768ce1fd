use std::path::PathBuf;

use jiff::tz::TimeZone;

use crate::constants::{
    DEFAULT_ENDPOINT, DEFAULT_QUEUE_CAPACITY, DEFAULT_READ_BUFFER, DEFAULT_TIME_ZONE,
};
use crate::error::FeedError;

/// Настройки подключения к фиду
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedConfig {
    /// HOST:PORT сервера; пустая строка - адрес по умолчанию
    pub endpoint: String,
    /// IANA-имя часового пояса серверного времени; пустая строка - по умолчанию
    pub time_zone: String,
    /// Ёмкость каждой выходной очереди
    pub queue_capacity: usize,
    /// Максимальная длина строки вместе с переводом строки
    pub read_buffer_capacity: usize,
    /// Куда зеркалировать сырой поток, если нужно
    pub backup_path: Option<PathBuf>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            time_zone: DEFAULT_TIME_ZONE.to_string(),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            read_buffer_capacity: DEFAULT_READ_BUFFER,
            backup_path: None,
        }
    }
}

impl FeedConfig {
    /// Проверяет ёмкость очередей и размер буфера
    pub fn validate(&self) -> Result<(), FeedError> {
        if self.queue_capacity == 0 {
            return Err(FeedError::Config("queue capacity must be positive".into()));
        }
        if self.read_buffer_capacity < 3 {
            return Err(FeedError::Config(format!(
                "read buffer of {} bytes cannot hold a record",
                self.read_buffer_capacity
            )));
        }
        Ok(())
    }

    /// HOST:PORT; пустая строка означает адрес по умолчанию
    pub fn endpoint(&self) -> &str {
        match self.endpoint.trim() {
            "" => DEFAULT_ENDPOINT,
            ep => ep,
        }
    }

    /// IANA-имя пояса; пустая строка означает пояс по умолчанию
    pub fn time_zone_name(&self) -> &str {
        match self.time_zone.trim() {
            "" => DEFAULT_TIME_ZONE,
            tz => tz,
        }
    }

    /// Загружает часовой пояс; без него время не разобрать, так что ошибка фатальна
    pub fn resolve_time_zone(&self) -> Result<TimeZone, FeedError> {
        let name = self.time_zone_name();
        TimeZone::get(name).map_err(|source| FeedError::TimeZone {
            name: name.to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_to_local_level1_port() {
        let cfg = FeedConfig::default();
        assert_eq!(cfg.endpoint(), "localhost:5009");
        assert_eq!(cfg.time_zone_name(), "America/New_York");
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn empty_values_fall_back_to_defaults() {
        let cfg = FeedConfig {
            endpoint: "  ".into(),
            time_zone: String::new(),
            ..FeedConfig::default()
        };
        assert_eq!(cfg.endpoint(), DEFAULT_ENDPOINT);
        assert_eq!(cfg.time_zone_name(), DEFAULT_TIME_ZONE);
    }

    #[test]
    fn zero_capacities_are_rejected() {
        let cfg = FeedConfig {
            queue_capacity: 0,
            ..FeedConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(FeedError::Config(_))));

        let cfg = FeedConfig {
            read_buffer_capacity: 2,
            ..FeedConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(FeedError::Config(_))));
    }

    #[test]
    fn resolves_known_zone_and_rejects_unknown() {
        let cfg = FeedConfig::default();
        let tz = cfg.resolve_time_zone().unwrap();
        assert_eq!(tz.iana_name(), Some("America/New_York"));

        let cfg = FeedConfig {
            time_zone: "Mars/Olympus_Mons".into(),
            ..FeedConfig::default()
        };
        match cfg.resolve_time_zone() {
            Err(FeedError::TimeZone { name, .. }) => assert_eq!(name, "Mars/Olympus_Mons"),
            other => panic!("expected TimeZone error, got {other:?}"),
        }
    }
}
