use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;

use feed_core::{DEFAULT_ENDPOINT, DEFAULT_QUEUE_CAPACITY, DEFAULT_READ_BUFFER, DEFAULT_TIME_ZONE, FeedConfig};

/// Feed Client - подключается к Level 1 порту, подписывается на символы
/// и пишет в лог всё, что приходит.
#[derive(Parser, Debug, Clone)]
#[command(name = "feed-client", version, about)]
pub(crate) struct Args {
    /// TCP адрес Level 1 порта, например localhost:5009
    #[arg(long, default_value = DEFAULT_ENDPOINT)]
    pub(crate) endpoint: String,

    /// Часовой пояс серверного времени (IANA)
    #[arg(long, default_value = DEFAULT_TIME_ZONE)]
    pub(crate) time_zone: String,

    /// Ёмкость каждой из очередей сообщений
    #[arg(long, default_value_t = DEFAULT_QUEUE_CAPACITY)]
    pub(crate) queue_capacity: usize,

    /// Максимальная длина строки в байтах; длиннее - отбрасывается
    #[arg(long, default_value_t = DEFAULT_READ_BUFFER)]
    pub(crate) buffer_size: usize,

    /// Писать сырой поток в файл (дозапись, строки через CRLF)
    #[arg(long)]
    pub(crate) backup_file: Option<PathBuf>,

    /// Символы строкой, например: "AAPL,MSFT". Нельзя вместе с --symbols-file
    #[arg(long, conflicts_with = "symbols_file")]
    pub(crate) symbols: Option<String>,

    /// Файл символов (через запятую или по одному на строку, # комментарии)
    #[arg(long, conflicts_with = "symbols")]
    pub(crate) symbols_file: Option<PathBuf>,

    /// Включить поток новостей
    #[arg(long)]
    pub(crate) news: bool,
}

impl Args {
    /// Валидация аргументов (файл существует, endpoint выглядит как HOST:PORT и т.д.)
    pub(crate) fn validate(&self) -> Result<()> {
        if !self.endpoint.trim().is_empty() && !self.endpoint.contains(':') {
            bail!("--endpoint must look like HOST:PORT (got: {})", self.endpoint);
        }

        if self.queue_capacity == 0 {
            bail!("--queue-capacity must be positive");
        }

        if let Some(path) = &self.symbols_file {
            let md = std::fs::metadata(path)
                .with_context(|| format!("symbols file not found: {:?}", path))?;
            if !md.is_file() {
                bail!("--symbols-file must point to a file: {:?}", path);
            }
        }

        Ok(())
    }

    pub(crate) fn to_config(&self) -> FeedConfig {
        FeedConfig {
            endpoint: self.endpoint.clone(),
            time_zone: self.time_zone.clone(),
            queue_capacity: self.queue_capacity,
            read_buffer_capacity: self.buffer_size,
            backup_path: self.backup_file.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_feed_defaults() {
        let args = Args::parse_from(["feed-client"]);
        args.validate().unwrap();
        assert_eq!(args.to_config(), FeedConfig::default());
    }

    #[test]
    fn endpoint_without_port_is_rejected() {
        let args = Args::parse_from(["feed-client", "--endpoint", "localhost"]);
        assert!(args.validate().is_err());
    }

    #[test]
    fn symbols_and_symbols_file_conflict() {
        let res = Args::try_parse_from([
            "feed-client",
            "--symbols",
            "AAPL",
            "--symbols-file",
            "symbols.txt",
        ]);
        assert!(res.is_err());
    }

    #[test]
    fn missing_symbols_file_is_rejected() {
        let args = Args::parse_from(["feed-client", "--symbols-file", "/definitely/not/here.txt"]);
        assert!(args.validate().is_err());
    }
}
