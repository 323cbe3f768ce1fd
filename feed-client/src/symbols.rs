use std::path::PathBuf;
use thiserror::Error;

use crate::cli::Args;

#[derive(Debug, Error)]
pub(crate) enum SymbolsError {
    #[error("symbols list is empty (file: {path:?})")]
    EmptyFromFile { path: PathBuf },

    #[error("symbols list is empty (--symbols value: {raw:?})")]
    EmptyFromArg { raw: String },

    #[error("failed to read symbols file: {path:?}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Символы для подписки из `--symbols-file` или `--symbols`.
/// Без источника - пустой список: клиент получает только системные сообщения.
pub(crate) fn load_symbols(args: &Args) -> Result<Vec<String>, SymbolsError> {
    match (&args.symbols_file, &args.symbols) {
        (Some(path), _) => {
            let symbols = feed_core::symbols::read_symbols_from_path(path).map_err(|source| {
                SymbolsError::ReadFile {
                    path: path.clone(),
                    source,
                }
            })?;
            non_empty(symbols, || SymbolsError::EmptyFromFile { path: path.clone() })
        }
        (None, Some(raw)) => non_empty(feed_core::symbols::parse_symbols(raw), || {
            SymbolsError::EmptyFromArg { raw: raw.clone() }
        }),
        (None, None) => Ok(Vec::new()),
    }
}

fn non_empty(
    symbols: Vec<String>,
    err: impl FnOnce() -> SymbolsError,
) -> Result<Vec<String>, SymbolsError> {
    if symbols.is_empty() {
        return Err(err());
    }
    Ok(symbols)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn no_source_means_no_subscriptions() {
        let args = Args::parse_from(["feed-client"]);
        assert!(load_symbols(&args).unwrap().is_empty());
    }

    #[test]
    fn blank_symbols_arg_is_an_error() {
        let args = Args::parse_from(["feed-client", "--symbols", " , "]);
        assert!(matches!(
            load_symbols(&args),
            Err(SymbolsError::EmptyFromArg { .. })
        ));
    }

    #[test]
    fn symbols_arg_is_normalized() {
        let args = Args::parse_from(["feed-client", "--symbols", "msft, aapl"]);
        assert_eq!(load_symbols(&args).unwrap(), vec!["AAPL", "MSFT"]);
    }
}
