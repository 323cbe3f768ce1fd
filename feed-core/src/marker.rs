/// Тип записи по первому байту строки
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Marker {
    /// `S` - системное сообщение или схема полей
    System,
    /// `P` - summary по символу
    Summary,
    /// `Q` - update по символу
    Update,
    /// `T` - время сервера
    Time,
    /// `R` - региональная котировка
    Regional,
    /// `F` - фундаментальные данные
    Fundamental,
    /// `N` - новость
    News,
    /// `n` - символ не найден
    NotFound,
    /// `E` - текст ошибки
    Error,
    /// всё остальное - молча отбрасываем
    Unknown,
}

impl Marker {
    /// Байт маркера -> тип записи
    pub fn from_byte(b: u8) -> Self {
        match b {
            b'S' => Marker::System,
            b'P' => Marker::Summary,
            b'Q' => Marker::Update,
            b'T' => Marker::Time,
            b'R' => Marker::Regional,
            b'F' => Marker::Fundamental,
            b'N' => Marker::News,
            b'n' => Marker::NotFound,
            b'E' => Marker::Error,
            _ => Marker::Unknown,
        }
    }
}

/// Минимальная длина записи: маркер + разделитель + хотя бы один байт
pub const MIN_RECORD_LEN: usize = 3;

/// Отделяет маркер и разделитель от полезной нагрузки.
/// `None` для слишком коротких записей.
pub fn split_record(record: &[u8]) -> Option<(Marker, &[u8])> {
    if record.len() < MIN_RECORD_LEN {
        return None;
    }
    Some((Marker::from_byte(record[0]), &record[2..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_markers_map_to_kinds() {
        let cases = [
            (b'S', Marker::System),
            (b'P', Marker::Summary),
            (b'Q', Marker::Update),
            (b'T', Marker::Time),
            (b'R', Marker::Regional),
            (b'F', Marker::Fundamental),
            (b'N', Marker::News),
            (b'n', Marker::NotFound),
            (b'E', Marker::Error),
        ];
        for (b, m) in cases {
            assert_eq!(Marker::from_byte(b), m, "marker {:?}", b as char);
        }
    }

    #[test]
    fn marker_is_case_sensitive() {
        // `n` и `N` - разные типы, а `s`/`e` вообще не существуют
        assert_eq!(Marker::from_byte(b'N'), Marker::News);
        assert_eq!(Marker::from_byte(b'n'), Marker::NotFound);
        assert_eq!(Marker::from_byte(b's'), Marker::Unknown);
        assert_eq!(Marker::from_byte(b'e'), Marker::Unknown);
        assert_eq!(Marker::from_byte(b'X'), Marker::Unknown);
    }

    #[test]
    fn split_record_rejects_short_input() {
        assert_eq!(split_record(b""), None);
        assert_eq!(split_record(b"S"), None);
        assert_eq!(split_record(b"S,"), None);
    }

    #[test]
    fn split_record_skips_marker_and_separator() {
        let (m, payload) = split_record(b"n,MSFQQ").unwrap();
        assert_eq!(m, Marker::NotFound);
        assert_eq!(payload, b"MSFQQ");
    }
}
