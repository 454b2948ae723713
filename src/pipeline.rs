//! ファイル単位の処理
//!
//! 入力ファイルを読み込み、共通ライブラリの分類・統合・分割に渡す。

use crate::error::{Result, SkuClassifierError};
use crate::reader;
use sku_classifier_common::{
    classify, consolidate, fragment, Classification, Consolidation, ExtractorConfig, FragmentPlan,
    RuleTable, SourceFile, ID_COLUMN, NAME_COLUMN,
};
use std::path::{Path, PathBuf};

/// 表示用のファイル名
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// SKUファイルを読み込んで分類する
pub fn classify_file<F>(
    input: &Path,
    rules: &RuleTable,
    targets: &[String],
    progress: F,
) -> Result<Classification>
where
    F: FnMut(usize, usize, &str),
{
    let dataset = reader::read_table(input)?;
    Ok(classify(&dataset, rules, targets, progress)?)
}

/// 属性シート群を読み込んで統合する
///
/// 読み込めないファイルも統合側の拒否理由として扱い、全件まとめて返す。
pub fn consolidate_files(paths: &[PathBuf], config: &ExtractorConfig) -> Result<Consolidation> {
    let files: Vec<SourceFile> = paths
        .iter()
        .map(|path| {
            let name = display_name(path);
            match reader::try_read_table(path) {
                Ok(table) => SourceFile::parsed(name, table),
                Err(reason) => SourceFile::unreadable(name, reason),
            }
        })
        .collect();

    consolidate(&files, config).map_err(SkuClassifierError::BatchRejected)
}

/// 分割対象の属性（指定がなければ識別子・品名以外の全列）
pub fn fragment_attributes(master_columns: &[String], config: Option<&ExtractorConfig>) -> Vec<String> {
    match config {
        Some(c) => c.attributes.clone(),
        None => master_columns
            .iter()
            .filter(|c| c.as_str() != ID_COLUMN && c.as_str() != NAME_COLUMN)
            .cloned()
            .collect(),
    }
}

/// マスタファイルを読み込んで属性別に分割する
pub fn fragment_file(
    master_path: &Path,
    config: Option<&ExtractorConfig>,
    max_rows: usize,
) -> Result<FragmentPlan> {
    let master = reader::read_table(master_path)?;
    if !master.has_column(ID_COLUMN) {
        return Err(SkuClassifierError::Parse {
            file: master_path.display().to_string(),
            reason: format!("列「{}」がありません", ID_COLUMN),
        });
    }

    let attributes = fragment_attributes(master.columns(), config);
    Ok(fragment(&master, &attributes, max_rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_fragment_attributes_default() {
        let columns: Vec<String> = [ID_COLUMN, NAME_COLUMN, "SABOR", "MARCA"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(fragment_attributes(&columns, None), vec!["SABOR", "MARCA"]);
    }

    #[test]
    fn test_consolidate_unreadable_file_is_rejected() {
        let dir = tempdir().unwrap();
        let good = dir.path().join("a.csv");
        std::fs::write(&good, "Código Barras SKU;Nome SKU;SABOR\n1;Bolo;Morango\n").unwrap();
        let missing = dir.path().join("b.xlsx");

        let config = ExtractorConfig {
            source_id_column: ID_COLUMN.to_string(),
            attributes: vec!["SABOR".to_string()],
        };
        let err = consolidate_files(&[good, missing], &config).unwrap_err();

        match err {
            SkuClassifierError::BatchRejected(errors) => assert_eq!(errors.len(), 1),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_fragment_file_without_id_column() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("base.csv");
        std::fs::write(&path, "Nome SKU;SABOR\nBolo;Morango\n").unwrap();

        let err = fragment_file(&path, None, 9000).unwrap_err();
        assert!(matches!(err, SkuClassifierError::Parse { .. }));
    }
}
