//! 処理結果のサマリー表示

use sku_classifier_common::{AttributeStats, Consolidation, Error, FragmentPlan, RuleWarning};

/// 充足率の表示行
pub fn format_stats_line(stats: &AttributeStats) -> String {
    let marker = if stats.has_rules { " " } else { "-" };
    format!(
        "  {} {:<24} {:>6}/{:<6} ({:>5.1}%)  変更 {}",
        marker,
        stats.attribute,
        stats.filled_rows,
        stats.total_rows,
        stats.fill_rate(),
        stats.changed_rows
    )
}

/// 属性ごとの充足状況を表示
pub fn print_fill_stats(stats: &[AttributeStats]) {
    println!("充足状況:");
    for s in stats {
        println!("{}", format_stats_line(s));
    }
    if stats.iter().any(|s| !s.has_rules) {
        println!("  （- は辞書にルールがない属性）");
    }
}

/// 除外されたルールを表示（詳細モードのみ個別表示）
pub fn print_rule_warnings(warnings: &[RuleWarning], verbose: bool) {
    if warnings.is_empty() {
        return;
    }
    eprintln!("⚠ {}件のルールを除外しました", warnings.len());
    if verbose {
        for w in warnings {
            eprintln!(
                "  行{}: [{}] {:?} - {}",
                w.row + 2,
                w.rule_type,
                w.pattern,
                w.reason
            );
        }
    }
}

/// 統合結果のサマリーを表示
pub fn print_consolidation(result: &Consolidation, verbose: bool) {
    println!("  マスタ: {}行", result.master.len());
    if result.dropped_identifiers > 0 {
        println!("  識別子が不正な行を除外: {}行", result.dropped_identifiers);
    }
    if result.dropped_duplicates > 0 {
        println!("  完全重複を除外: {}行", result.dropped_duplicates);
    }

    let with_missing: Vec<_> = result
        .missing_columns
        .iter()
        .filter(|m| !m.columns.is_empty())
        .collect();
    if !with_missing.is_empty() {
        eprintln!("⚠ {}件のファイルに欠落列があります", with_missing.len());
        if verbose {
            for missing in with_missing {
                eprintln!("  {}: {}", missing.file, missing.columns.join(", "));
            }
        }
    }

    if !result.conflicts.is_empty() {
        eprintln!(
            "⚠ 識別子の競合: {}件（{}行）",
            result.conflicts.len(),
            result.conflicts.rows.len()
        );
        if verbose {
            for conflict in &result.conflicts.conflicts {
                eprintln!("  {} ({}行)", conflict.identifier, conflict.rows.len());
            }
        }
    }
}

/// 拒否されたファイルを表示
pub fn print_rejections(errors: &[Error]) {
    eprintln!("✗ 統合を中止しました。以下のファイルを修正してください:");
    for e in errors {
        eprintln!("  - {}", e);
    }
}

/// 分割結果のサマリーを表示
pub fn print_fragment_plan(plan: &FragmentPlan) {
    for fragment in &plan.fragments {
        println!(
            "  {} [{}/{}] {}行",
            fragment.attribute,
            fragment.part,
            fragment.parts,
            fragment.table.len()
        );
    }
    if !plan.skipped.is_empty() {
        println!("  値がないため出力しない属性: {}", plan.skipped.join(", "));
    }
}
