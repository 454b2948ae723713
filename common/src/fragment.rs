//! マスタ表の属性別分割
//!
//! 属性ごとに（識別子, 値）の表を作り、上限行数を超える場合は
//! ほぼ均等な連続区間に分割する。

use crate::table::{is_null_or_blank, Table};
use crate::ID_COLUMN;

/// 1ファイルあたりの最大行数
pub const DEFAULT_MAX_ROWS: usize = 9000;

/// 属性別の出力単位
#[derive(Debug, Clone)]
pub struct Fragment {
    pub attribute: String,
    /// 1始まりのパート番号
    pub part: usize,
    /// 総パート数
    pub parts: usize,
    pub table: Table,
}

/// 分割結果
#[derive(Debug, Clone, Default)]
pub struct FragmentPlan {
    pub fragments: Vec<Fragment>,
    /// 値が1件もなく出力しなかった属性
    pub skipped: Vec<String>,
}

/// `total` 行を `parts` 個の連続区間に分ける（先頭側が1行多くなる）
pub fn split_sizes(total: usize, parts: usize) -> Vec<usize> {
    if parts == 0 {
        return Vec::new();
    }
    let base = total / parts;
    let extra = total % parts;
    (0..parts).map(|i| base + usize::from(i < extra)).collect()
}

/// 必要なパート数（切り上げ）
pub fn part_count(rows: usize, max_rows: usize) -> usize {
    if rows == 0 {
        return 0;
    }
    rows.div_ceil(max_rows.max(1))
}

/// 属性の（識別子, 値）表を作成（空・空白値は除外）
pub fn attribute_table(master: &Table, attribute: &str) -> Option<Table> {
    let id_col = master.column_index(ID_COLUMN)?;
    let attr_col = master.column_index(attribute)?;

    let mut table = Table::new([ID_COLUMN, attribute]);
    for row in master.rows() {
        if is_null_or_blank(&row[attr_col]) {
            continue;
        }
        table.push_row(vec![row[id_col].clone(), row[attr_col].clone()]);
    }
    Some(table)
}

/// マスタ表を属性ごとに分割する
///
/// # Arguments
/// * `master` - 統合済みマスタ表
/// * `attributes` - 対象属性（マスタ表にない属性は無視）
/// * `max_rows` - 1ファイルあたりの最大行数
pub fn fragment(master: &Table, attributes: &[String], max_rows: usize) -> FragmentPlan {
    let mut plan = FragmentPlan::default();

    for attribute in attributes {
        let table = match attribute_table(master, attribute) {
            Some(t) => t,
            None => continue,
        };

        if table.is_empty() {
            plan.skipped.push(attribute.clone());
            continue;
        }

        let parts = part_count(table.len(), max_rows);
        let mut start = 0;
        for (i, size) in split_sizes(table.len(), parts).into_iter().enumerate() {
            plan.fragments.push(Fragment {
                attribute: attribute.clone(),
                part: i + 1,
                parts,
                table: table.slice(start, start + size),
            });
            start += size;
        }
    }

    plan
}
