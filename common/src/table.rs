//! 表データモデル
//!
//! スプレッドシート1枚分を列名＋行の2次元配列として保持する。
//! セルは `Option<Value>` で、`None` が空セル（null）を表す。

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// セルの値
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Number(f64),
    Bool(bool),
    Text(String),
}

/// セル（`None` = 空）
pub type Cell = Option<Value>;

impl Value {
    pub fn text(s: impl Into<String>) -> Self {
        Value::Text(s.into())
    }

    /// 文字列表現を取得
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Value::Text(s) => Cow::Borrowed(s.as_str()),
            other => Cow::Owned(other.to_string()),
        }
    }

    /// 空白のみのテキストか
    pub fn is_blank(&self) -> bool {
        matches!(self, Value::Text(s) if s.trim().is_empty())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => write!(f, "{}", s),
            Value::Bool(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
            // 整数値は小数点なしで表示
            Value::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            Value::Number(n) => write!(f, "{}", n),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

/// セルを比較用の文字列に変換（空セルは固定の記号）
pub fn cell_to_string(cell: &Cell) -> Cow<'_, str> {
    match cell {
        Some(value) => value.as_text(),
        None => Cow::Borrowed("None"),
    }
}

/// 空セルまたは空白テキストか
pub fn is_null_or_blank(cell: &Cell) -> bool {
    match cell {
        None => true,
        Some(value) => value.is_blank(),
    }
}

/// 行の同一性判定用キー（型も区別する）
fn row_key(row: &[Cell]) -> String {
    let mut key = String::new();
    for cell in row {
        match cell {
            None => key.push('N'),
            Some(Value::Number(n)) => {
                key.push('F');
                key.push_str(&n.to_string());
            }
            Some(Value::Bool(b)) => key.push(if *b { 'T' } else { 'B' }),
            Some(Value::Text(s)) => {
                key.push('S');
                key.push_str(s);
            }
        }
        key.push('\u{1f}');
    }
    key
}

/// 表
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// 列名だけの空の表を作成
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// 列名と行から作成（行の長さは列数に揃える）
    pub fn with_rows<S: Into<String>>(
        columns: impl IntoIterator<Item = S>,
        rows: Vec<Vec<Cell>>,
    ) -> Self {
        let mut table = Self::new(columns);
        for row in rows {
            table.push_row(row);
        }
        table
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> &[Cell] {
        &self.rows[index]
    }

    /// 行数
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 列数
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// 行を追加（不足分は空セルで補い、超過分は切り捨て）
    ///
    /// 切り捨てたセルに値があった場合は `true` を返す。
    pub fn push_row(&mut self, mut row: Vec<Cell>) -> bool {
        let width = self.columns.len();
        let truncated = row.iter().skip(width).any(|c| !is_null_or_blank(c));
        row.resize(width, None);
        self.rows.push(row);
        truncated
    }

    /// 列がなければ空セルで追加し、列番号を返す
    pub fn ensure_column(&mut self, name: &str) -> usize {
        if let Some(index) = self.column_index(name) {
            return index;
        }
        self.columns.push(name.to_string());
        for row in &mut self.rows {
            row.push(None);
        }
        self.columns.len() - 1
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&Value> {
        self.rows.get(row).and_then(|r| r.get(col)).and_then(|c| c.as_ref())
    }

    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        &self.rows[row][col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: Cell) {
        self.rows[row][col] = value;
    }

    /// 列の全セルを取得
    pub fn column_cells(&self, col: usize) -> impl Iterator<Item = &Cell> + '_ {
        self.rows.iter().map(move |r| &r[col])
    }

    /// 列名を変更（見つからなければ false）
    pub fn rename_column(&mut self, from: &str, to: &str) -> bool {
        match self.column_index(from) {
            Some(index) => {
                self.columns[index] = to.to_string();
                true
            }
            None => false,
        }
    }

    /// 全列名を変換
    pub fn map_columns<F>(&mut self, f: F)
    where
        F: Fn(&str) -> String,
    {
        for column in &mut self.columns {
            *column = f(column);
        }
    }

    /// 条件を満たす行のみ残す
    pub fn retain_rows<F>(&mut self, mut f: F)
    where
        F: FnMut(&[Cell]) -> bool,
    {
        self.rows.retain(|row| f(row));
    }

    /// 列を指定順に抽出（存在しない列は空セル列になる）
    pub fn select(&self, names: &[&str]) -> Table {
        let indices: Vec<Option<usize>> = names.iter().map(|n| self.column_index(n)).collect();
        let rows = self
            .rows
            .iter()
            .map(|row| {
                indices
                    .iter()
                    .map(|i| i.and_then(|i| row[i].clone()))
                    .collect()
            })
            .collect();
        Table {
            columns: names.iter().map(|n| n.to_string()).collect(),
            rows,
        }
    }

    /// 別の表の行を末尾に連結（列名で対応付け）
    pub fn append(&mut self, other: &Table) {
        let mapping: Vec<Option<usize>> = self
            .columns
            .iter()
            .map(|c| other.column_index(c))
            .collect();
        for row in &other.rows {
            let new_row = mapping
                .iter()
                .map(|i| i.and_then(|i| row[i].clone()))
                .collect();
            self.rows.push(new_row);
        }
    }

    /// 完全に一致する重複行を削除（先頭を残す）。削除件数を返す
    pub fn drop_duplicate_rows(&mut self) -> usize {
        let before = self.rows.len();
        let mut seen = std::collections::HashSet::new();
        self.rows.retain(|row| seen.insert(row_key(row)));
        before - self.rows.len()
    }

    /// 行範囲を切り出した新しい表
    pub fn slice(&self, start: usize, end: usize) -> Table {
        Table {
            columns: self.columns.clone(),
            rows: self.rows[start..end.min(self.rows.len())].to_vec(),
        }
    }
}
