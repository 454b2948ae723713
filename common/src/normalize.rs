//! 正規化ユーティリティ
//!
//! - 列名の表記揺れ統一（前後空白・末尾ピリオド・連続空白）
//! - SKU識別子の正規化（指数表記・小数を整数文字列へ）
//! - 属性テキストの正規化（大文字化・アクセント除去・ピリオド除去）

use crate::table::Value;
use lazy_static::lazy_static;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    static ref WHITESPACE_RE: Regex = Regex::new(r"\s+").unwrap();
}

/// 列名を正規化する
///
/// 前後の空白を除去し、両端のピリオドを除去し、連続する空白を1つにまとめる。
pub fn normalize_column_name(name: &str) -> String {
    let stripped = name.trim().trim_matches('.');
    WHITESPACE_RE.replace_all(stripped, " ").trim().to_string()
}

/// SKU識別子を正規の整数文字列に変換する
///
/// 数値として解釈できない値・空値は `None`。
/// 小数部は切り捨て（`12.7` → `"12"`）。
pub fn normalize_identifier(value: &Value) -> Option<String> {
    let number = match value {
        Value::Number(n) => *n,
        Value::Text(s) => {
            let s = s.trim();
            if s.is_empty() {
                return None;
            }
            // 整数はf64を経由せずに扱う（桁落ち防止）
            if let Ok(i) = s.parse::<i64>() {
                return Some(i.to_string());
            }
            s.parse::<f64>().ok()?
        }
        Value::Bool(_) => return None,
    };

    if !number.is_finite() || number.abs() >= 9.2e18 {
        return None;
    }
    Some((number.trunc() as i64).to_string())
}

/// アクセント記号を除去する（NFD分解後に結合文字を除く）
pub fn strip_diacritics(text: &str) -> String {
    text.nfd()
        .filter(|c| !unicode_normalization::char::is_combining_mark(*c))
        .collect()
}

/// 属性・品名テキストを正規化する
///
/// 大文字化 → アクセント除去 → ピリオド除去 → 前後空白除去
pub fn normalize_text(text: &str) -> String {
    strip_diacritics(&text.to_uppercase())
        .replace('.', "")
        .trim()
        .to_string()
}

/// 名前照合用キー（大文字小文字・アクセントを無視）
pub fn lookup_key(name: &str) -> String {
    strip_diacritics(&normalize_column_name(name)).to_lowercase()
}
