//! 品名テキストとルール列の照合

use crate::rules::Rule;
use crate::table::Value;

/// 照合の初期スコア（これ以下のスコアのルールは採用されない）
pub const NO_MATCH_SCORE: i64 = -1;

/// 品名を1属性分のルール列と照合し、採用された解釈値を返す
///
/// - 品名が空（null）なら照合しない
/// - 各ルールは部分一致で検索（大文字小文字無視）
/// - 一致したルールのうちスコア最大のものを採用。同点は先に現れたルール
/// - スコアが `NO_MATCH_SCORE` 以下のルールは一致しても採用しない
pub fn match_text(text: Option<&Value>, rules: &[Rule]) -> Option<Value> {
    let text = text?.as_text();

    let mut best: Option<&Rule> = None;
    let mut best_score = NO_MATCH_SCORE;
    for rule in rules {
        if rule.score > best_score && rule.pattern.is_match(&text) {
            best = Some(rule);
            best_score = rule.score;
        }
    }

    best.and_then(|rule| rule.value.clone())
}
