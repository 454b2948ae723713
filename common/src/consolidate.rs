//! 属性シートの統合
//!
//! 複数ファイルをSKU識別子で縦に連結し、重複行を除去、テキストを正規化して
//! マスタ表を作る。識別子が一意でない行は競合として別途報告する（解決はしない）。
//!
//! ## 処理フロー（ファイルごと）
//! 1. 読み込み（失敗したファイルは拒否）
//! 2. 列名の正規化
//! 3. 識別子列の存在確認（なければ拒否）
//! 4. 識別子列を標準名へ改名
//! 5. 識別子の正規化（数値化できない行は除外）
//! 6. 対象列の抽出（欠落列は空で追加し診断に記録）
//!
//! 1ファイルでも拒否されたらバッチ全体が失敗する。

use crate::error::Error;
use crate::normalize::{normalize_column_name, normalize_identifier, normalize_text};
use crate::registry::ExtractorConfig;
use crate::table::{Table, Value};
use crate::{ID_COLUMN, NAME_COLUMN};
use std::collections::HashMap;

/// 統合対象ファイル（読み込み済み）
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// 表示用ファイル名
    pub name: String,
    /// 読み込み結果（失敗時は理由）
    pub table: std::result::Result<Table, String>,
}

impl SourceFile {
    pub fn parsed(name: impl Into<String>, table: Table) -> Self {
        Self {
            name: name.into(),
            table: Ok(table),
        }
    }

    pub fn unreadable(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table: Err(reason.into()),
        }
    }
}

/// ファイルごとの欠落列（診断情報、処理は継続）
#[derive(Debug, Clone, PartialEq)]
pub struct MissingColumns {
    pub file: String,
    pub columns: Vec<String>,
}

/// 識別子の競合
#[derive(Debug, Clone, PartialEq)]
pub struct Conflict {
    pub identifier: String,
    /// マスタ表での行番号
    pub rows: Vec<usize>,
}

/// 競合一覧
#[derive(Debug, Clone, Default)]
pub struct ConflictSet {
    /// 識別子ごとの競合（マスタ表での初出順）
    pub conflicts: Vec<Conflict>,
    /// 競合行（マスタ表の部分集合、元の順序）
    pub rows: Table,
}

impl ConflictSet {
    pub fn is_empty(&self) -> bool {
        self.conflicts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.conflicts.len()
    }
}

/// 統合結果
#[derive(Debug, Clone)]
pub struct Consolidation {
    pub master: Table,
    pub conflicts: ConflictSet,
    pub missing_columns: Vec<MissingColumns>,
    /// 識別子を数値化できず除外した行数
    pub dropped_identifiers: usize,
    /// 完全重複として除外した行数
    pub dropped_duplicates: usize,
}

/// 統合で扱う列（識別子・品名・属性、重複なし）
pub fn master_columns(config: &ExtractorConfig) -> Vec<String> {
    let mut columns = vec![ID_COLUMN.to_string(), NAME_COLUMN.to_string()];
    for attr in &config.attributes {
        if !columns.contains(attr) {
            columns.push(attr.clone());
        }
    }
    columns
}

/// 1ファイル分の検証と整形
fn prepare_file(
    file: &SourceFile,
    config: &ExtractorConfig,
    columns: &[String],
) -> std::result::Result<(Table, MissingColumns, usize), Error> {
    let mut table = match &file.table {
        Ok(t) => t.clone(),
        Err(reason) => {
            return Err(Error::FileRejected {
                file: file.name.clone(),
                reason: format!("読み込みに失敗しました: {}", reason),
            })
        }
    };

    table.map_columns(normalize_column_name);

    let source_id = normalize_column_name(&config.source_id_column);
    if !table.has_column(&source_id) {
        return Err(Error::FileRejected {
            file: file.name.clone(),
            reason: format!("識別子列「{}」がありません", source_id),
        });
    }
    if source_id != ID_COLUMN {
        // 標準名の列が別に存在する場合は識別子列を優先する
        if table.has_column(ID_COLUMN) {
            table.rename_column(ID_COLUMN, &format!("{} (original)", ID_COLUMN));
        }
        table.rename_column(&source_id, ID_COLUMN);
    }

    let id_col = table.column_index(ID_COLUMN).unwrap_or_default();
    let before = table.len();
    let mut normalized = table;
    let mut kept = Table::new(normalized.columns().iter().cloned());
    for row in 0..normalized.len() {
        let canonical = normalized.get(row, id_col).and_then(normalize_identifier);
        if let Some(id) = canonical {
            normalized.set(row, id_col, Some(Value::Text(id)));
            kept.push_row(normalized.row(row).to_vec());
        }
    }
    let dropped = before - kept.len();

    let missing: Vec<String> = columns
        .iter()
        .filter(|c| !kept.has_column(c))
        .cloned()
        .collect();
    let names: Vec<&str> = columns.iter().map(|c| c.as_str()).collect();

    Ok((
        kept.select(&names),
        MissingColumns {
            file: file.name.clone(),
            columns: missing,
        },
        dropped,
    ))
}

/// 識別子が重複している行を抽出
pub fn find_conflicts(master: &Table) -> ConflictSet {
    let id_col = match master.column_index(ID_COLUMN) {
        Some(c) => c,
        None => return ConflictSet::default(),
    };

    let mut positions: HashMap<String, Vec<usize>> = HashMap::new();
    let mut order: Vec<String> = Vec::new();
    for (row, cell) in master.column_cells(id_col).enumerate() {
        if let Some(value) = cell {
            let key = value.as_text().into_owned();
            let entry = positions.entry(key.clone()).or_default();
            if entry.is_empty() {
                order.push(key);
            }
            entry.push(row);
        }
    }

    let conflicts: Vec<Conflict> = order
        .into_iter()
        .filter_map(|id| {
            let rows = positions.remove(&id)?;
            (rows.len() > 1).then_some(Conflict { identifier: id, rows })
        })
        .collect();

    let mut conflict_rows: Vec<usize> = conflicts.iter().flat_map(|c| c.rows.iter().copied()).collect();
    conflict_rows.sort_unstable();

    let mut rows = Table::new(master.columns().iter().cloned());
    for row in conflict_rows {
        rows.push_row(master.row(row).to_vec());
    }

    ConflictSet { conflicts, rows }
}

/// 複数ファイルを統合する
///
/// 拒否されたファイルが1つでもあれば、全拒否理由を `Err` で返す。
pub fn consolidate(
    files: &[SourceFile],
    config: &ExtractorConfig,
) -> std::result::Result<Consolidation, Vec<Error>> {
    let columns = master_columns(config);
    let mut accepted = Vec::new();
    let mut errors = Vec::new();

    for file in files {
        match prepare_file(file, config, &columns) {
            Ok(prepared) => accepted.push(prepared),
            Err(e) => errors.push(e),
        }
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    let mut master = Table::new(columns.iter().cloned());
    let mut missing_columns = Vec::new();
    let mut dropped_identifiers = 0;
    for (table, missing, dropped) in accepted {
        master.append(&table);
        missing_columns.push(missing);
        dropped_identifiers += dropped;
    }

    master.retain_rows(|row| row[0].is_some());
    let dropped_duplicates = master.drop_duplicate_rows();

    // 品名と属性列のテキスト正規化
    for col in 1..master.width() {
        for row in 0..master.len() {
            let normalized = master
                .get(row, col)
                .map(|v| Value::Text(normalize_text(&v.as_text())));
            master.set(row, col, normalized);
        }
    }

    let conflicts = find_conflicts(&master);

    Ok(Consolidation {
        master,
        conflicts,
        missing_columns,
        dropped_identifiers,
        dropped_duplicates,
    })
}
