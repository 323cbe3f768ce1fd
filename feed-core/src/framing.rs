use std::io::{self, Read};

/// Результат одного чтения из [`LineFramer`]
#[derive(Debug, PartialEq, Eq)]
pub enum Frame {
    /// Полная запись без `\n` (и без `\r` перед ним)
    Record(Vec<u8>),
    /// Строка не влезла в буфер и выброшена целиком, сколько байт потеряно
    Oversized(usize),
    /// Поток закончился
    Eof,
}

/// Нарезает поток на строки буфером фиксированного размера.
///
/// В отличие от `BufRead::read_line` не растит буфер: слишком длинная
/// строка выбрасывается вместе с хвостом, обрезок никогда не отдаётся
/// наружу. Ошибки чтения (в том числе таймауты) не теряют уже прочитанные
/// байты, после них можно просто вызвать `next_frame` снова.
pub struct LineFramer<R> {
    inner: R,
    buf: Box<[u8]>,
    start: usize,
    end: usize,
    /// Сейчас выбрасываем хвост слишком длинной строки
    discarding: bool,
    dropped: usize,
}

impl<R: Read> LineFramer<R> {
    /// Буфер на `capacity` байт (минимум один)
    pub fn with_capacity(capacity: usize, inner: R) -> Self {
        Self {
            inner,
            buf: vec![0u8; capacity.max(1)].into_boxed_slice(),
            start: 0,
            end: 0,
            discarding: false,
            dropped: 0,
        }
    }

    /// Исходный поток
    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    /// Максимальная длина строки вместе с `\n`
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Следующая запись, выброшенная строка или конец потока
    pub fn next_frame(&mut self) -> io::Result<Frame> {
        loop {
            if let Some(frame) = self.take_buffered() {
                return Ok(frame);
            }

            let n = match self.inner.read(&mut self.buf[self.end..]) {
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };

            if n == 0 {
                return Ok(self.finish());
            }
            self.end += n;
        }
    }

    /// Достаёт запись из уже прочитанных байт, попутно освобождая место
    fn take_buffered(&mut self) -> Option<Frame> {
        let window = &self.buf[self.start..self.end];

        if let Some(pos) = window.iter().position(|&b| b == b'\n') {
            let line_end = self.start + pos;
            let line_start = self.start;
            self.start = line_end + 1;

            if self.discarding {
                self.discarding = false;
                let dropped = self.dropped + pos + 1;
                self.dropped = 0;
                return Some(Frame::Oversized(dropped));
            }

            let mut line = &self.buf[line_start..line_end];
            if let Some(stripped) = line.strip_suffix(b"\r") {
                line = stripped;
            }
            return Some(Frame::Record(line.to_vec()));
        }

        if self.discarding {
            self.dropped += self.end - self.start;
            self.start = 0;
            self.end = 0;
        } else if self.start == 0 && self.end == self.buf.len() {
            // буфер полон, а конца строки нет
            self.discarding = true;
            self.dropped = self.end;
            self.start = 0;
            self.end = 0;
        } else if self.start > 0 {
            self.buf.copy_within(self.start..self.end, 0);
            self.end -= self.start;
            self.start = 0;
        }
        None
    }

    /// Конец потока: хвост без `\n` ещё отдаём как запись
    fn finish(&mut self) -> Frame {
        if self.discarding {
            self.discarding = false;
            let dropped = self.dropped + (self.end - self.start);
            self.dropped = 0;
            self.start = 0;
            self.end = 0;
            return Frame::Oversized(dropped);
        }

        if self.start < self.end {
            let mut line = &self.buf[self.start..self.end];
            if let Some(stripped) = line.strip_suffix(b"\r") {
                line = stripped;
            }
            let line = line.to_vec();
            self.start = 0;
            self.end = 0;
            return Frame::Record(line);
        }

        Frame::Eof
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn frames<R: Read>(framer: &mut LineFramer<R>) -> Vec<Frame> {
        let mut out = Vec::new();
        loop {
            match framer.next_frame().unwrap() {
                Frame::Eof => break,
                f => out.push(f),
            }
        }
        out
    }

    fn rec(s: &str) -> Frame {
        Frame::Record(s.as_bytes().to_vec())
    }

    #[test]
    fn splits_lines_and_strips_crlf() {
        let mut f = LineFramer::with_capacity(64, Cursor::new("S,SERVER CONNECTED\r\nn,MSFQQ\n"));
        assert_eq!(frames(&mut f), vec![rec("S,SERVER CONNECTED"), rec("n,MSFQQ")]);
    }

    #[test]
    fn trailing_record_without_newline_is_returned_before_eof() {
        let mut f = LineFramer::with_capacity(64, Cursor::new("n,A\nn,B"));
        assert_eq!(frames(&mut f), vec![rec("n,A"), rec("n,B")]);
    }

    #[test]
    fn empty_lines_are_records_too() {
        // короткие записи отсекает диспетчер, фреймер их не фильтрует
        let mut f = LineFramer::with_capacity(64, Cursor::new("\n\nn,A\n"));
        assert_eq!(frames(&mut f), vec![rec(""), rec(""), rec("n,A")]);
    }

    #[test]
    fn oversized_line_is_dropped_whole_and_next_line_survives() {
        let input = format!("n,A\n{}\nn,B\n", "X".repeat(40));
        let mut f = LineFramer::with_capacity(16, Cursor::new(input));

        assert_eq!(
            frames(&mut f),
            vec![rec("n,A"), Frame::Oversized(41), rec("n,B")]
        );
    }

    #[test]
    fn line_exactly_filling_buffer_without_newline_is_oversized() {
        let mut f = LineFramer::with_capacity(4, Cursor::new("ABCD\nn,B\n"));
        assert_eq!(frames(&mut f), vec![Frame::Oversized(5), rec("n,B")]);
    }

    #[test]
    fn lines_spanning_many_reads_are_reassembled() {
        // reader, отдающий по одному байту
        struct OneByte(Cursor<Vec<u8>>);
        impl Read for OneByte {
            fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
                let len = buf.len().min(1);
                self.0.read(&mut buf[..len])
            }
        }

        let mut f = LineFramer::with_capacity(8, OneByte(Cursor::new(b"n,AB\nn,CD\n".to_vec())));
        assert_eq!(frames(&mut f), vec![rec("n,AB"), rec("n,CD")]);
    }

    #[test]
    fn timeout_keeps_partial_record() {
        // первый read отдаёт половину строки, второй - таймаут, дальше остаток
        struct Stutter {
            chunks: Vec<io::Result<Vec<u8>>>,
        }
        impl Read for Stutter {
            fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
                if self.chunks.is_empty() {
                    return Ok(0);
                }
                let chunk = self.chunks.remove(0)?;
                buf[..chunk.len()].copy_from_slice(&chunk);
                Ok(chunk.len())
            }
        }

        let mut f = LineFramer::with_capacity(
            32,
            Stutter {
                chunks: vec![
                    Ok(b"P,AA".to_vec()),
                    Err(io::Error::new(io::ErrorKind::WouldBlock, "tick")),
                    Ok(b"PL,1\n".to_vec()),
                ],
            },
        );

        let err = f.next_frame().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::WouldBlock);
        assert_eq!(f.next_frame().unwrap(), rec("P,AAPL,1"));
        assert_eq!(f.next_frame().unwrap(), Frame::Eof);
    }
}
