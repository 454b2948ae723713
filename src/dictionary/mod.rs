//! 辞書ファイルの読み込み
//!
//! 辞書フォルダからカテゴリの辞書表を読み込み、ルール表にコンパイルする。

pub mod cache;

pub use cache::RuleCache;

use crate::error::Result;
use crate::reader;
use sku_classifier_common::rules::COL_RULE_PATTERN;
use sku_classifier_common::table::is_null_or_blank;
use sku_classifier_common::{Error, Table};
use std::path::{Path, PathBuf};

/// 辞書ファイルのパスを組み立て、存在を確認する
pub fn dictionary_path(dir: &Path, file: &str) -> Result<PathBuf> {
    let path = dir.join(file);
    if !path.is_file() {
        return Err(Error::Configuration(format!(
            "辞書ファイルが見つかりません: {}",
            path.display()
        ))
        .into());
    }
    Ok(path)
}

/// 辞書表を読み込む（パターンが空の行は除外）
pub fn load_dictionary(dir: &Path, file: &str) -> Result<Table> {
    let path = dictionary_path(dir, file)?;
    read_dictionary(&path)
}

/// パス指定で辞書表を読み込む
pub fn read_dictionary(path: &Path) -> Result<Table> {
    let mut table = reader::read_table(path)?;

    if let Some(col) = table.column_index(COL_RULE_PATTERN) {
        table.retain_rows(|row| !is_null_or_blank(&row[col]));
    }

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SkuClassifierError;
    use tempfile::tempdir;

    const HEADER: &str = "Tipo de Regra;Valor da Regra;Interpretação;Grau de Associação\n";

    #[test]
    fn test_missing_dictionary_names_full_path() {
        let dir = tempdir().unwrap();
        let err = load_dictionary(dir.path(), "BOLO.xlsx").unwrap_err();

        match err {
            SkuClassifierError::Engine(Error::Configuration(msg)) => {
                assert!(msg.contains(&dir.path().join("BOLO.xlsx").display().to_string()));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_blank_pattern_rows_dropped() {
        let dir = tempdir().unwrap();
        let content = format!(
            "{HEADER}SABOR;morango;Morango;5\nSABOR;;Chocolate;3\nSABOR;   ;Baunilha;2\n"
        );
        std::fs::write(dir.path().join("BOLO.csv"), content).unwrap();

        let table = load_dictionary(dir.path(), "BOLO.csv").unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_unreadable_dictionary_is_parse_error() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("BOLO.xlsx"), b"broken").unwrap();

        let err = load_dictionary(dir.path(), "BOLO.xlsx").unwrap_err();
        assert!(matches!(err, SkuClassifierError::Parse { .. }));
    }
}
