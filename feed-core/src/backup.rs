use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Зеркало сырого потока: каждая прочитанная строка + `\r\n`.
///
/// Файл открывается на дозапись, так что несколько запусков
/// складываются в один журнал для последующего проигрывания.
pub struct Backup<W: Write = BufWriter<File>> {
    out: W,
}

impl Backup {
    /// Открывает файл на дозапись, создавая при необходимости
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> Backup<W> {
    /// Зеркало в произвольный writer
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Пишет строку и `\r\n`
    pub fn write_line(&mut self, line: &[u8]) -> io::Result<()> {
        self.out.write_all(line)?;
        self.out.write_all(b"\r\n")
    }

    /// Сбрасывает буфер на диск
    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    /// Забирает writer обратно
    pub fn into_inner(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn write_line_appends_crlf() {
        let mut b = Backup::new(Vec::new());
        b.write_line(b"S,SERVER CONNECTED").unwrap();
        b.write_line(b"n,MSFQQ").unwrap();
        assert_eq!(b.into_inner(), b"S,SERVER CONNECTED\r\nn,MSFQQ\r\n");
    }

    #[test]
    fn open_appends_to_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("feed.log");
        fs::write(&path, "T,20261019 09:30:00\r\n").unwrap();

        let mut b = Backup::open(&path).unwrap();
        b.write_line(b"n,MSFQQ").unwrap();
        b.flush().unwrap();

        let got = fs::read_to_string(&path).unwrap();
        assert_eq!(got, "T,20261019 09:30:00\r\nn,MSFQQ\r\n");
    }
}
