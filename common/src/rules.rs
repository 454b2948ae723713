//! ルール辞書のコンパイル
//!
//! 辞書シート（ルール種別・正規表現・解釈値・関連度）を読み、
//! 対象属性ごとのコンパイル済みルール列に変換する。

use crate::error::{Error, Result};
use crate::table::{Cell, Table, Value};
use regex::{Regex, RegexBuilder};
use std::collections::HashMap;

/// ルール種別（＝対象属性名）の列
pub const COL_RULE_TYPE: &str = "Tipo de Regra";
/// 正規表現パターンの列
pub const COL_RULE_PATTERN: &str = "Valor da Regra";
/// 出力値（解釈）の列
pub const COL_RULE_VALUE: &str = "Interpretação";
/// 関連度スコアの列
pub const COL_RULE_SCORE: &str = "Grau de Associação";

/// 必須列
pub const REQUIRED_RULE_COLUMNS: [&str; 4] =
    [COL_RULE_TYPE, COL_RULE_PATTERN, COL_RULE_VALUE, COL_RULE_SCORE];

/// コンパイル済みルール
#[derive(Debug, Clone)]
pub struct Rule {
    /// 大文字小文字を無視する正規表現
    pub pattern: Regex,
    /// 一致時の出力値（空の場合もある）
    pub value: Cell,
    /// 関連度
    pub score: i64,
}

impl Rule {
    pub fn new(pattern: &str, value: impl Into<Value>, score: i64) -> std::result::Result<Self, regex::Error> {
        Ok(Self {
            pattern: compile_pattern(pattern)?,
            value: Some(value.into()),
            score,
        })
    }
}

/// コンパイル時に除外されたルール
#[derive(Debug, Clone, PartialEq)]
pub struct RuleWarning {
    /// 辞書シート上の行番号（ヘッダー除く、0始まり）
    pub row: usize,
    pub rule_type: String,
    pub pattern: String,
    pub reason: String,
}

/// 属性名 → ルール列
#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    rules: HashMap<String, Vec<Rule>>,
    /// 属性の出現順
    order: Vec<String>,
    warnings: Vec<RuleWarning>,
}

impl RuleTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// ルールを追加（属性ごとに追加順を保持）
    pub fn push(&mut self, attribute: &str, rule: Rule) {
        if !self.rules.contains_key(attribute) {
            self.order.push(attribute.to_string());
        }
        self.rules.entry(attribute.to_string()).or_default().push(rule);
    }

    /// 属性のルール列
    pub fn get(&self, attribute: &str) -> Option<&[Rule]> {
        self.rules.get(attribute).map(|v| v.as_slice())
    }

    pub fn contains(&self, attribute: &str) -> bool {
        self.rules.contains_key(attribute)
    }

    /// 属性名一覧（辞書での出現順）
    pub fn attributes(&self) -> &[String] {
        &self.order
    }

    /// 全ルール数
    pub fn rule_count(&self) -> usize {
        self.rules.values().map(|v| v.len()).sum()
    }

    /// コンパイル時に除外されたルール
    pub fn warnings(&self) -> &[RuleWarning] {
        &self.warnings
    }
}

/// 大文字小文字を無視して正規表現をコンパイル
pub fn compile_pattern(pattern: &str) -> std::result::Result<Regex, regex::Error> {
    RegexBuilder::new(pattern).case_insensitive(true).build()
}

/// 関連度を整数に変換（空・解釈不能は0、小数は切り捨て）
pub fn parse_score(cell: &Cell) -> i64 {
    match cell {
        Some(Value::Number(n)) if n.is_finite() => n.trunc() as i64,
        Some(Value::Text(s)) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().filter(|n| n.is_finite()).map(|n| n.trunc() as i64))
                .unwrap_or(0)
        }
        _ => 0,
    }
}

/// 辞書表の必須列を確認
pub fn check_rule_columns(table: &Table) -> Result<()> {
    let missing: Vec<&str> = REQUIRED_RULE_COLUMNS
        .iter()
        .copied()
        .filter(|c| !table.has_column(c))
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(Error::Configuration(format!(
            "辞書に必須列がありません: {}",
            missing.join(", ")
        )))
    }
}

/// 辞書表をコンパイルする
///
/// 不正な正規表現の行はエラーにせず除外し、`RuleTable::warnings` に記録する。
pub fn compile_rules(table: &Table) -> Result<RuleTable> {
    check_rule_columns(table)?;

    let type_col = table.column_index(COL_RULE_TYPE).unwrap_or_default();
    let pattern_col = table.column_index(COL_RULE_PATTERN).unwrap_or_default();
    let value_col = table.column_index(COL_RULE_VALUE).unwrap_or_default();
    let score_col = table.column_index(COL_RULE_SCORE).unwrap_or_default();

    let mut rule_table = RuleTable::new();

    for (row_idx, row) in table.rows().iter().enumerate() {
        let rule_type = row[type_col]
            .as_ref()
            .map(|v| v.as_text().trim().to_string())
            .unwrap_or_default();
        let pattern = row[pattern_col]
            .as_ref()
            .map(|v| v.as_text().into_owned())
            .unwrap_or_default();

        if pattern.trim().is_empty() {
            rule_table.warnings.push(RuleWarning {
                row: row_idx,
                rule_type,
                pattern,
                reason: "パターンが空".to_string(),
            });
            continue;
        }

        if rule_type.is_empty() {
            rule_table.warnings.push(RuleWarning {
                row: row_idx,
                rule_type,
                pattern,
                reason: "ルール種別が空".to_string(),
            });
            continue;
        }

        let compiled = match compile_pattern(&pattern) {
            Ok(re) => re,
            Err(e) => {
                rule_table.warnings.push(RuleWarning {
                    row: row_idx,
                    rule_type,
                    pattern,
                    reason: e.to_string(),
                });
                continue;
            }
        };

        rule_table.push(
            &rule_type,
            Rule {
                pattern: compiled,
                value: row[value_col].clone(),
                score: parse_score(&row[score_col]),
            },
        );
    }

    Ok(rule_table)
}
