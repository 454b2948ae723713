//! Excel読み込み（xlsx / xlsm / xls / xlsb / ods）
//!
//! 先頭シートの1行目をヘッダーとして表に変換する。

use calamine::{open_workbook_auto, Data, Reader};
use sku_classifier_common::{Cell, Table, Value};
use std::path::Path;

/// セル値を変換（空文字列は空セル扱い）
fn convert_cell(cell: &Data) -> Cell {
    match cell {
        Data::Empty => None,
        Data::String(s) if s.is_empty() => None,
        Data::String(s) => Some(Value::Text(s.clone())),
        Data::Float(n) => Some(Value::Number(*n)),
        Data::Int(n) => Some(Value::Number(*n as f64)),
        Data::Bool(b) => Some(Value::Bool(*b)),
        Data::DateTime(dt) => Some(Value::Number(dt.as_f64())),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Some(Value::Text(s.clone())),
        // エラーセル（#N/A等）は空扱い
        Data::Error(_) => None,
    }
}

/// ヘッダー名を決定（空の列名は位置で補う）
fn header_name(cell: Option<&Data>, index: usize) -> String {
    match cell.and_then(convert_cell) {
        Some(value) => value.as_text().trim().to_string(),
        None => format!("Unnamed: {}", index),
    }
}

/// Excelファイルの先頭シートを表として読み込む
pub fn read_excel(path: &Path) -> Result<Table, String> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| format!("Excelファイルを開けません: {}", e))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| "シートがありません".to_string())?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| format!("シート「{}」を読み込めません: {}", sheet_name, e))?;

    let (_, width) = range.get_size();
    let mut rows = range.rows();

    let header = match rows.next() {
        Some(h) => h,
        None => return Ok(Table::default()),
    };
    let columns: Vec<String> = (0..width).map(|i| header_name(header.get(i), i)).collect();

    let mut table = Table::new(columns);
    for row in rows {
        let cells: Vec<Cell> = row.iter().map(convert_cell).collect();
        // 全セル空の行は読み飛ばす
        if cells.iter().all(|c| c.is_none()) {
            continue;
        }
        table.push_row(cells);
    }

    Ok(table)
}
