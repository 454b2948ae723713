//! 出力ファイル
//!
//! 出力名は `<種別>_<日付>.xlsx`（日付は dd-mm-YYYY）。

pub mod excel;

use chrono::Local;

/// ファイル名に使えない文字
const INVALID_FILE_CHARS: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// 出力名に付ける日付（dd-mm-YYYY）
pub fn date_stamp() -> String {
    Local::now().format("%d-%m-%Y").to_string()
}

/// ファイル名として使える形に整える
pub fn sanitize_file_stem(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| {
            if INVALID_FILE_CHARS.contains(&c) || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect();
    let cleaned = cleaned.trim_matches('.').trim().to_string();
    if cleaned.is_empty() {
        "sem_nome".to_string()
    } else {
        cleaned
    }
}

pub fn classified_file_name(category: &str, date: &str) -> String {
    format!("classificado_{}_{}.xlsx", sanitize_file_stem(category), date)
}

pub fn comparison_file_name(category: &str, date: &str) -> String {
    format!("comparativo_{}_{}.xlsx", sanitize_file_stem(category), date)
}

pub fn master_file_name(date: &str) -> String {
    format!("base_consolidada_{}.xlsx", date)
}

pub fn conflicts_file_name(date: &str) -> String {
    format!("conflitos_{}.xlsx", date)
}

/// 属性別ファイル名（1パートのみなら連番なし）
pub fn fragment_file_name(attribute: &str, part: usize, parts: usize, date: &str) -> String {
    let stem = sanitize_file_stem(attribute);
    if parts <= 1 {
        format!("{}_{}.xlsx", stem, date)
    } else {
        format!("{}_parte{}de{}_{}.xlsx", stem, part, parts, date)
    }
}
