//! Excel出力（CLI版）
//!
//! 共通ライブラリでxlsxバッファを生成し、ファイルに書き出す。

use super::{
    classified_file_name, comparison_file_name, conflicts_file_name, fragment_file_name,
    master_file_name,
};
use crate::error::{Result, SkuClassifierError};
use sku_classifier_common::export::excel_core;
use sku_classifier_common::{Classification, Consolidation, Fragment, Table};
use std::path::{Path, PathBuf};

/// 表1枚をxlsxとして保存
pub fn save_table(table: &Table, sheet_name: &str, output_path: &Path) -> Result<()> {
    save_workbook(&[(sheet_name, table)], output_path)
}

/// 複数シートのブックを保存
pub fn save_workbook(sheets: &[(&str, &Table)], output_path: &Path) -> Result<()> {
    let buffer =
        excel_core::generate_workbook_buffer(sheets).map_err(SkuClassifierError::ExcelGeneration)?;

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(output_path, buffer)?;
    Ok(())
}

/// 分類結果を保存（分類済みデータと変更レポート）
pub fn export_classification(
    result: &Classification,
    category: &str,
    output_dir: &Path,
    date: &str,
) -> Result<Vec<PathBuf>> {
    let dataset_path = output_dir.join(classified_file_name(category, date));
    save_table(&result.dataset, "Classificado", &dataset_path)?;

    let report_path = output_dir.join(comparison_file_name(category, date));
    save_table(&result.changes_table(), "Comparativo", &report_path)?;

    Ok(vec![dataset_path, report_path])
}

/// 統合結果を保存（競合があれば競合ファイルも）
pub fn export_consolidation(
    result: &Consolidation,
    output_dir: &Path,
    date: &str,
) -> Result<Vec<PathBuf>> {
    let master_path = output_dir.join(master_file_name(date));
    save_table(&result.master, "Base Consolidada", &master_path)?;

    let mut written = vec![master_path];
    if !result.conflicts.is_empty() {
        let conflicts_path = output_dir.join(conflicts_file_name(date));
        save_table(&result.conflicts.rows, "Conflitos", &conflicts_path)?;
        written.push(conflicts_path);
    }

    Ok(written)
}

/// 属性別分割ファイルを保存
pub fn export_fragments(fragments: &[Fragment], output_dir: &Path, date: &str) -> Result<Vec<PathBuf>> {
    fragments
        .iter()
        .map(|fragment| {
            let name = fragment_file_name(&fragment.attribute, fragment.part, fragment.parts, date);
            let path = output_dir.join(name);
            save_table(&fragment.table, &fragment.attribute, &path)?;
            Ok(path)
        })
        .collect()
}
