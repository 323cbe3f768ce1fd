/// Динамическая схема полей `P`/`Q` записей: позиция -> имя поля.
///
/// Сервер присылает схему целиком (`S,UPDATE FIELDNAMES,...`), поэтому
/// API только один - полная замена. Частичного обновления нет.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldDirectory {
    names: Vec<String>,
}

impl FieldDirectory {
    /// Пустая схема (до первого ответа сервера)
    pub fn new() -> Self {
        Self::default()
    }

    /// Выбрасывает старую схему и ставит новую, индексы с 0
    pub fn replace<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.names = names.into_iter().map(Into::into).collect();
    }

    /// Имя поля на позиции `index`
    pub fn lookup(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    /// Количество известных позиций
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Схема ещё не получена
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Пары (позиция, имя) по порядку
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.names.iter().map(String::as_str).enumerate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_directory_is_empty() {
        let fd = FieldDirectory::new();
        assert!(fd.is_empty());
        assert_eq!(fd.lookup(0), None);
    }

    #[test]
    fn replace_installs_names_from_zero() {
        let mut fd = FieldDirectory::new();
        fd.replace(["Symbol", "Last", "Bid", "Ask"]);

        assert_eq!(fd.len(), 4);
        assert_eq!(fd.lookup(0), Some("Symbol"));
        assert_eq!(fd.lookup(3), Some("Ask"));
        assert_eq!(fd.lookup(4), None);
    }

    #[test]
    fn replace_discards_previous_mapping() {
        let mut fd = FieldDirectory::new();
        fd.replace(["Symbol", "Last", "Bid", "Ask", "Volume"]);
        fd.replace(["Symbol", "Open"]);

        assert_eq!(fd.lookup(1), Some("Open"));
        // старые позиции за пределами новой схемы больше не резолвятся
        assert_eq!(fd.lookup(2), None);
        assert_eq!(fd.lookup(4), None);
    }

    #[test]
    fn iter_keeps_wire_order() {
        let mut fd = FieldDirectory::new();
        fd.replace(vec!["Symbol".to_string(), "Bid".to_string()]);

        let got: Vec<_> = fd.iter().collect();
        assert_eq!(got, vec![(0, "Symbol"), (1, "Bid")]);
    }
}
