//! CSV読み込み（csv / txt）
//!
//! 区切り文字は先頭行から推定する。UTF-8として読めないファイルは
//! Excelの既定エンコーディング（Windows-1252）として解釈する。

use sku_classifier_common::{Cell, Table, Value};
use std::path::Path;

/// 区切り文字の候補（同点なら先の候補）
const DELIMITERS: [u8; 4] = [b'\t', b';', b',', b'|'];

/// 推定に使う先頭行数
const SNIFF_LINES: usize = 10;

/// CSVファイルを表として読み込む
///
/// 戻り値の2番目は、ヘッダーより列が多く値を切り捨てた行数。
pub fn read_csv(path: &Path) -> Result<(Table, usize), String> {
    let content = read_text(path)?;
    parse_csv(&content, sniff_delimiter(&content))
}

/// 1行を区切り文字で分けたときの列数
fn field_count(line: &str, delimiter: u8) -> usize {
    csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(line.as_bytes())
        .records()
        .next()
        .and_then(|r| r.ok())
        .map_or(1, |r| r.len())
}

/// 区切り文字を推定（先頭行と同じ列数になる行が多い候補を採用）
fn sniff_delimiter(content: &str) -> u8 {
    let sample: Vec<&str> = content.lines().take(SNIFF_LINES).collect();

    DELIMITERS
        .iter()
        .copied()
        .filter_map(|delimiter| {
            let counts: Vec<usize> = sample.iter().map(|line| field_count(line, delimiter)).collect();
            let width = *counts.first()?;
            if width <= 1 {
                return None;
            }
            let consistent = counts.iter().filter(|&&c| c == width).count();
            Some((consistent * width, delimiter))
        })
        .fold(None, |best: Option<(usize, u8)>, candidate| match best {
            Some(b) if b.0 >= candidate.0 => Some(b),
            _ => Some(candidate),
        })
        .map_or(b',', |(_, delimiter)| delimiter)
}

/// ファイルを文字列として読み込む（BOMは除去）
fn read_text(path: &Path) -> Result<String, String> {
    let bytes = std::fs::read(path).map_err(|e| e.to_string())?;
    let text = match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => encoding_rs::WINDOWS_1252.decode(e.as_bytes()).0.into_owned(),
    };

    if let Some(rest) = text.strip_prefix('\u{feff}') {
        return Ok(rest.to_string());
    }
    Ok(text)
}

fn parse_csv(content: &str, delimiter: u8) -> Result<(Table, usize), String> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut records = reader.records();
    let header = match records.next() {
        Some(h) => h.map_err(|e| e.to_string())?,
        None => return Ok((Table::default(), 0)),
    };

    // 空の列名は位置で補う
    let columns: Vec<String> = header
        .iter()
        .enumerate()
        .map(|(i, name)| match name.trim() {
            "" => format!("Unnamed: {}", i),
            name => name.to_string(),
        })
        .collect();

    let mut table = Table::new(columns);
    let mut truncated = 0;
    for result in records {
        let record = result.map_err(|e| e.to_string())?;
        let row: Vec<Cell> = record
            .iter()
            .map(|field| (!field.is_empty()).then(|| Value::text(field)))
            .collect();
        if row.iter().all(|c| c.is_none()) {
            continue;
        }
        if table.push_row(row) {
            truncated += 1;
        }
    }

    Ok((table, truncated))
}
