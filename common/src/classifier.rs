//! データセット一括分類
//!
//! 対象属性ごとに全行の品名をルール照合し、結果をデータセットへ反映する。
//! 既存値は照合なしの場合に保持され（空で上書きしない）、
//! 値が実際に変わった行だけが変更レポートに記録される。

use crate::error::{Error, Result};
use crate::matcher::match_text;
use crate::rules::RuleTable;
use crate::table::{cell_to_string, is_null_or_blank, Cell, Table, Value};
use crate::{ID_COLUMN, NAME_COLUMN};

/// 変更レポートの列
pub const REPORT_COLUMNS: [&str; 5] = ["SKU ID", "Descrição", "Coluna", "Antes", "Depois"];

/// 1件の変更
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeEntry {
    /// SKU識別子（識別子列がない場合は行番号）
    pub identifier: Cell,
    /// 品名
    pub description: Cell,
    /// 属性名
    pub attribute: String,
    /// 変更前の値
    pub before: Cell,
    /// 変更後の値
    pub after: Value,
}

/// 属性ごとの充足状況
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeStats {
    pub attribute: String,
    /// 辞書にルールがあったか
    pub has_rules: bool,
    pub total_rows: usize,
    pub filled_rows: usize,
    /// 今回の分類で変更された行数
    pub changed_rows: usize,
}

impl AttributeStats {
    /// 充足率（%）
    pub fn fill_rate(&self) -> f64 {
        if self.total_rows == 0 {
            return 0.0;
        }
        self.filled_rows as f64 * 100.0 / self.total_rows as f64
    }
}

/// 分類結果
#[derive(Debug, Clone)]
pub struct Classification {
    /// 分類後のデータセット（入力のコピー）
    pub dataset: Table,
    /// 変更一覧
    pub changes: Vec<ChangeEntry>,
    /// 属性ごとの統計
    pub stats: Vec<AttributeStats>,
}

impl Classification {
    /// 変更一覧を表形式に変換
    pub fn changes_table(&self) -> Table {
        changes_to_table(&self.changes)
    }
}

/// 変更一覧を表形式に変換
pub fn changes_to_table(changes: &[ChangeEntry]) -> Table {
    let rows = changes
        .iter()
        .map(|c| {
            vec![
                c.identifier.clone(),
                c.description.clone(),
                Some(Value::text(c.attribute.as_str())),
                c.before.clone(),
                Some(c.after.clone()),
            ]
        })
        .collect();
    Table::with_rows(REPORT_COLUMNS, rows)
}

/// データセットを分類する
///
/// # Arguments
/// * `dataset` - 入力データ（変更されない）
/// * `rules` - コンパイル済みルール
/// * `targets` - 対象属性（この順に処理）
/// * `progress` - 属性ごとに `(index, total, attribute)` で呼ばれる
pub fn classify<F>(
    dataset: &Table,
    rules: &RuleTable,
    targets: &[String],
    mut progress: F,
) -> Result<Classification>
where
    F: FnMut(usize, usize, &str),
{
    let name_col = dataset.column_index(NAME_COLUMN).ok_or_else(|| {
        Error::InputShape(format!("データセットに列「{}」がありません", NAME_COLUMN))
    })?;

    let mut output = dataset.clone();
    let id_col = output.column_index(ID_COLUMN);

    // 対象列を先に用意
    for target in targets {
        output.ensure_column(target);
    }

    let mut changes = Vec::new();
    let mut changed_counts = vec![0usize; targets.len()];

    for (i, target) in targets.iter().enumerate() {
        progress(i, targets.len(), target);

        let attribute_rules = match rules.get(target) {
            Some(r) => r,
            None => continue,
        };

        let col = output.ensure_column(target);
        let before: Vec<Cell> = output.column_cells(col).cloned().collect();

        for row in 0..output.len() {
            let name = output.get(row, name_col).cloned();
            if let Some(value) = match_text(name.as_ref(), attribute_rules) {
                output.set(row, col, Some(value));
            }
        }

        // 旧値と新値を比較して変更を記録
        for (row, old) in before.into_iter().enumerate() {
            let new = match output.cell(row, col) {
                Some(v) => v,
                None => continue,
            };
            let new_cell = Some(new.clone());
            if cell_to_string(&old) == cell_to_string(&new_cell) {
                continue;
            }

            let identifier = match id_col {
                Some(c) => output.cell(row, c).clone(),
                None => Some(Value::Number(row as f64)),
            };
            changes.push(ChangeEntry {
                identifier,
                description: output.cell(row, name_col).clone(),
                attribute: target.clone(),
                before: old,
                after: new.clone(),
            });
            changed_counts[i] += 1;
        }
    }

    let stats = targets
        .iter()
        .zip(changed_counts)
        .map(|(target, changed_rows)| {
            let col = output.column_index(target);
            let filled_rows = col
                .map(|c| output.column_cells(c).filter(|cell| !is_null_or_blank(cell)).count())
                .unwrap_or(0);
            AttributeStats {
                attribute: target.clone(),
                has_rules: rules.contains(target),
                total_rows: output.len(),
                filled_rows,
                changed_rows,
            }
        })
        .collect();

    Ok(Classification {
        dataset: output,
        changes,
        stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::Rule;

    fn rule_table(entries: &[(&str, &str, &str, i64)]) -> RuleTable {
        let mut table = RuleTable::new();
        for (attr, pattern, value, score) in entries {
            table.push(attr, Rule::new(pattern, *value, *score).unwrap());
        }
        table
    }

    fn targets(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn no_progress(_: usize, _: usize, _: &str) {}

    #[test]
    fn test_end_to_end_single_rule() {
        let rules = rule_table(&[("SABOR", "choc", "Chocolate", 1)]);
        let dataset = Table::with_rows(
            [NAME_COLUMN, "SABOR"],
            vec![vec![Some("Bolo de Chocolate".into()), None]],
        );

        let result = classify(&dataset, &rules, &targets(&["SABOR"]), no_progress).unwrap();

        assert_eq!(result.dataset.get(0, 1), Some(&Value::text("Chocolate")));
        assert_eq!(result.changes.len(), 1);
        let change = &result.changes[0];
        assert_eq!(change.attribute, "SABOR");
        assert_eq!(change.before, None);
        assert_eq!(change.after, Value::text("Chocolate"));
        // 識別子列がないので行番号
        assert_eq!(change.identifier, Some(Value::Number(0.0)));
        // 入力は変更されない
        assert!(dataset.get(0, 1).is_none());
    }

    #[test]
    fn test_missing_name_column() {
        let rules = RuleTable::new();
        let dataset = Table::new(["Descricao"]);
        let err = classify(&dataset, &rules, &targets(&["SABOR"]), no_progress).unwrap_err();
        assert!(matches!(err, Error::InputShape(_)));
    }

    #[test]
    fn test_fill_never_blank() {
        let rules = rule_table(&[("SABOR", "choc", "Chocolate", 1)]);
        let dataset = Table::with_rows(
            [NAME_COLUMN, "SABOR"],
            vec![vec![Some("Iogurte Natural".into()), Some("Natural".into())]],
        );

        let result = classify(&dataset, &rules, &targets(&["SABOR"]), no_progress).unwrap();
        assert_eq!(result.dataset.get(0, 1), Some(&Value::text("Natural")));
        assert!(result.changes.is_empty());
    }

    #[test]
    fn test_attribute_without_rules_untouched_but_created() {
        let rules = rule_table(&[("SABOR", "choc", "Chocolate", 1)]);
        let dataset = Table::with_rows(
            [NAME_COLUMN, "MARCA"],
            vec![vec![Some("Bolo de Chocolate".into()), Some("Betania".into())]],
        );

        let result =
            classify(&dataset, &rules, &targets(&["MARCA", "EMBALAGEM"]), no_progress).unwrap();
        assert_eq!(result.dataset.get(0, 1), Some(&Value::text("Betania")));
        let emb = result.dataset.column_index("EMBALAGEM").unwrap();
        assert!(result.dataset.get(0, emb).is_none());
        assert!(result.changes.is_empty());
    }

    #[test]
    fn test_identifier_column_used_in_report() {
        let rules = rule_table(&[("SABOR", "moran", "Morango", 1)]);
        let dataset = Table::with_rows(
            [ID_COLUMN, NAME_COLUMN],
            vec![vec![Some("7891000".into()), Some("Leite Morango".into())]],
        );
        let result = classify(&dataset, &rules, &targets(&["SABOR"]), no_progress).unwrap();
        assert_eq!(result.changes[0].identifier, Some(Value::text("7891000")));

        let report = result.changes_table();
        assert_eq!(report.columns().len(), 5);
        assert_eq!(report.get(0, 2), Some(&Value::text("SABOR")));
        assert_eq!(report.get(0, 4), Some(&Value::text("Morango")));
    }

    #[test]
    fn test_overwrite_with_different_value_is_reported() {
        let rules = rule_table(&[("SABOR", "moran", "Morango", 1)]);
        let dataset = Table::with_rows(
            [NAME_COLUMN, "SABOR"],
            vec![
                vec![Some("Leite Morango".into()), Some("Baunilha".into())],
                vec![Some("Leite Morango".into()), Some("Morango".into())],
            ],
        );
        let result = classify(&dataset, &rules, &targets(&["SABOR"]), no_progress).unwrap();
        assert_eq!(result.changes.len(), 1);
        assert_eq!(result.changes[0].before, Some(Value::text("Baunilha")));
    }

    #[test]
    fn test_second_run_is_idempotent() {
        let rules = rule_table(&[
            ("SABOR", "choc", "Chocolate", 1),
            ("SABOR", "bolo", "Bolo", 5),
            ("MARCA", "betania", "Betânia", 0),
        ]);
        let dataset = Table::with_rows(
            [NAME_COLUMN],
            vec![
                vec![Some("Bolo de Chocolate Betania".into())],
                vec![Some("Chocolate".into())],
                vec![None],
            ],
        );
        let attrs = targets(&["SABOR", "MARCA"]);

        let first = classify(&dataset, &rules, &attrs, no_progress).unwrap();
        assert_eq!(first.changes.len(), 3);

        let second = classify(&first.dataset, &rules, &attrs, no_progress).unwrap();
        assert!(second.changes.is_empty());
        assert_eq!(second.dataset, first.dataset);
    }

    #[test]
    fn test_progress_called_once_per_attribute() {
        let rules = rule_table(&[("SABOR", "choc", "Chocolate", 1)]);
        let dataset = Table::new([NAME_COLUMN]);
        let mut calls = Vec::new();

        classify(&dataset, &rules, &targets(&["MARCA", "SABOR"]), |i, total, attr| {
            calls.push((i, total, attr.to_string()))
        })
        .unwrap();

        assert_eq!(
            calls,
            vec![(0, 2, "MARCA".to_string()), (1, 2, "SABOR".to_string())]
        );
    }

    #[test]
    fn test_stats() {
        let rules = rule_table(&[("SABOR", "choc", "Chocolate", 1)]);
        let dataset = Table::with_rows(
            [NAME_COLUMN],
            vec![
                vec![Some("Bolo de Chocolate".into())],
                vec![Some("Bolo de Cenoura".into())],
            ],
        );
        let result = classify(&dataset, &rules, &targets(&["SABOR", "MARCA"]), no_progress).unwrap();

        let sabor = &result.stats[0];
        assert!(sabor.has_rules);
        assert_eq!(sabor.filled_rows, 1);
        assert_eq!(sabor.changed_rows, 1);
        assert!((sabor.fill_rate() - 50.0).abs() < 0.01);

        let marca = &result.stats[1];
        assert!(!marca.has_rules);
        assert_eq!(marca.filled_rows, 0);
    }
}
