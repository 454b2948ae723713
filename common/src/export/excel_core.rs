//! Excel生成（共通ライブラリ）
//!
//! 表をヘッダー付きのシートとしてxlsxバッファに書き出す。

use crate::table::{Table, Value};
use rust_xlsxwriter::*;

/// Excelのシート名に使えない文字
const INVALID_SHEET_CHARS: &[char] = &['[', ']', ':', '*', '?', '/', '\\'];

/// シート名の最大長
const MAX_SHEET_NAME_LEN: usize = 31;

/// シート名として使える形に整える
pub fn sanitize_sheet_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if INVALID_SHEET_CHARS.contains(&c) { '_' } else { c })
        .take(MAX_SHEET_NAME_LEN)
        .collect();
    let cleaned = cleaned.trim_matches('\'').trim().to_string();
    if cleaned.is_empty() {
        "Sheet1".to_string()
    } else {
        cleaned
    }
}

fn write_sheet(worksheet: &mut Worksheet, table: &Table, header_format: &Format) -> Result<(), String> {
    for (col, name) in table.columns().iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, name, header_format)
            .map_err(|e| format!("ヘッダー書き込みエラー: {}", e))?;
    }

    for (row_idx, row) in table.rows().iter().enumerate() {
        let excel_row = row_idx as u32 + 1;
        for (col, cell) in row.iter().enumerate() {
            let col = col as u16;
            let written = match cell {
                None => continue,
                Some(Value::Text(s)) => worksheet.write_string(excel_row, col, s).map(|_| ()),
                Some(Value::Number(n)) => worksheet.write_number(excel_row, col, *n).map(|_| ()),
                Some(Value::Bool(b)) => worksheet.write_boolean(excel_row, col, *b).map(|_| ()),
            };
            written.map_err(|e| format!("セル書き込みエラー ({}行{}列): {}", excel_row + 1, col + 1, e))?;
        }
    }

    if !table.columns().is_empty() {
        worksheet
            .set_freeze_panes(1, 0)
            .map_err(|e| format!("ウィンドウ枠固定エラー: {}", e))?;
    }

    Ok(())
}

/// 複数の表を1ブックのバッファに生成
///
/// # Arguments
/// * `sheets` - (シート名, 表) の並び
pub fn generate_workbook_buffer(sheets: &[(&str, &Table)]) -> Result<Vec<u8>, String> {
    let mut workbook = Workbook::new();
    let header_format = Format::new()
        .set_bold()
        .set_background_color(Color::RGB(0xF5F5F5))
        .set_border(FormatBorder::Thin)
        .set_border_color(Color::RGB(0xAAAAAA));

    for (name, table) in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet
            .set_name(sanitize_sheet_name(name))
            .map_err(|e| format!("シート名設定エラー: {}", e))?;
        write_sheet(worksheet, table, &header_format)?;
    }

    workbook
        .save_to_buffer()
        .map_err(|e| format!("Excel保存エラー: {}", e))
}

/// 表1枚をxlsxバッファに生成
pub fn generate_table_buffer(table: &Table, sheet_name: &str) -> Result<Vec<u8>, String> {
    generate_workbook_buffer(&[(sheet_name, table)])
}
