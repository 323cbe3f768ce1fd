//! Список символов для подписки (`w<SYMBOL>`).

use std::collections::BTreeSet;
use std::io;
use std::path::Path;

/// Разбирает список символов.
///
/// Разделители - запятые и переводы строк. Комментарий - `#` в начале
/// строки или после пробела (`@ES#` - это символ, а не комментарий).
/// Символы приводятся к верхнему регистру, результат отсортирован и без
/// повторов.
pub fn parse_symbols(text: &str) -> Vec<String> {
    let mut set = BTreeSet::new();

    for line in text.lines() {
        let line = strip_comment(line);
        for part in line.split(',') {
            let sym = part.trim();
            if !sym.is_empty() {
                set.insert(sym.to_ascii_uppercase());
            }
        }
    }

    set.into_iter().collect()
}

fn strip_comment(line: &str) -> &str {
    if line.trim_start().starts_with('#') {
        return "";
    }
    match line.find(" #").or_else(|| line.find("\t#")) {
        Some(i) => &line[..i],
        None => line,
    }
}

/// Читает список символов из файла
pub fn read_symbols_from_path(path: impl AsRef<Path>) -> io::Result<Vec<String>> {
    let text = std::fs::read_to_string(path)?;
    Ok(parse_symbols(&text))
}
