mod csv;
mod excel;

use crate::error::{Result, SkuClassifierError};
use sku_classifier_common::Table;
use std::path::Path;

const EXCEL_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xls", "xlsb", "ods"];
const CSV_EXTENSIONS: &[&str] = &["csv", "txt"];

/// 対応している拡張子か
pub fn is_supported(path: &Path) -> bool {
    extension(path)
        .map(|ext| EXCEL_EXTENSIONS.contains(&ext.as_str()) || CSV_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

fn extension(path: &Path) -> Option<String> {
    path.extension().map(|e| e.to_string_lossy().to_lowercase())
}

/// 読み込み失敗の理由のみを返す版（統合処理でファイル単位の拒否理由に使う）
pub fn try_read_table(path: &Path) -> std::result::Result<Table, String> {
    if !path.exists() {
        return Err("ファイルが存在しません".to_string());
    }

    match extension(path).as_deref() {
        Some(ext) if EXCEL_EXTENSIONS.contains(&ext) => excel::read_excel(path),
        Some(ext) if CSV_EXTENSIONS.contains(&ext) => {
            let (table, truncated) = self::csv::read_csv(path)?;
            if truncated > 0 {
                eprintln!(
                    "⚠ {}: {}行でヘッダーより多い列の値を切り捨てました",
                    path.display(),
                    truncated
                );
            }
            Ok(table)
        }
        Some(ext) => Err(format!("未対応の形式です: .{}", ext)),
        None => Err("拡張子がありません".to_string()),
    }
}

/// 表ファイル（Excel / CSV）を読み込む
pub fn read_table(path: &Path) -> Result<Table> {
    if !path.exists() {
        return Err(SkuClassifierError::FileNotFound(path.display().to_string()));
    }

    try_read_table(path).map_err(|reason| SkuClassifierError::Parse {
        file: path.display().to_string(),
        reason,
    })
}
