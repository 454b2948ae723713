//! 分類の統合テスト
//!
//! xlsxの辞書とSKUファイルを作成し、分類・保存・読み戻しまでを検証

use sku_classifier::dictionary::RuleCache;
use sku_classifier::export::{self, excel};
use sku_classifier::{pipeline, reader};
use sku_classifier_common::{Table, Value};
use std::path::Path;
use tempfile::tempdir;

fn text(s: &str) -> Option<Value> {
    Some(Value::text(s))
}

fn num(n: f64) -> Option<Value> {
    Some(Value::Number(n))
}

fn write_dictionary(path: &Path) {
    let table = Table::with_rows(
        ["Tipo de Regra", "Valor da Regra", "Interpretação", "Grau de Associação"],
        vec![
            vec![text("SABOR"), text("morango"), text("MORANGO"), num(5.0)],
            vec![text("SABOR"), text("choc"), text("CHOCOLATE"), num(3.0)],
            vec![text("EMBALAGEM"), text(r"\d+g"), text("PACOTE"), num(1.0)],
            // 不正な正規表現は除外される
            vec![text("SABOR"), text("(abc"), text("X"), num(9.0)],
        ],
    );
    excel::save_table(&table, "Regras", path).unwrap();
}

fn write_dataset(path: &Path) {
    let table = Table::with_rows(
        ["Código Barras SKU", "Nome SKU", "SABOR"],
        vec![
            vec![num(7891.0), text("Bolo de Morango 300g"), None],
            vec![num(7892.0), text("Bolo Chocolate"), text("CHOCOLATE")],
            vec![num(7893.0), text("Água"), text("Natural")],
        ],
    );
    excel::save_table(&table, "Base", path).unwrap();
}

fn targets() -> Vec<String> {
    vec!["SABOR".to_string(), "EMBALAGEM".to_string()]
}

/// 辞書の読み込みからxlsx出力まで
#[test]
fn test_classify_end_to_end() {
    let dir = tempdir().expect("Failed to create temp dir");
    let dict_path = dir.path().join("dicionario.xlsx");
    let input_path = dir.path().join("base.xlsx");
    write_dictionary(&dict_path);
    write_dataset(&input_path);

    let mut cache = RuleCache::new();
    let rules = cache.get_or_compile(&dict_path).unwrap();
    assert_eq!(rules.rule_count(), 3);
    assert_eq!(rules.warnings().len(), 1);

    let result = pipeline::classify_file(&input_path, &rules, &targets(), |_, _, _| {}).unwrap();

    assert_eq!(result.changes.len(), 2);
    assert_eq!(result.changes[0].attribute, "SABOR");
    assert_eq!(result.changes[0].identifier, num(7891.0));
    assert_eq!(result.changes[0].after, Value::text("MORANGO"));
    assert_eq!(result.changes[1].attribute, "EMBALAGEM");

    let out_dir = dir.path().join("saida");
    let written =
        excel::export_classification(&result, "Bolo", &out_dir, "18-10-2026").unwrap();
    assert_eq!(written.len(), 2);
    assert!(out_dir.join("classificado_Bolo_18-10-2026.xlsx").exists());
    assert!(out_dir.join("comparativo_Bolo_18-10-2026.xlsx").exists());

    // 読み戻して内容を確認
    let classified = reader::read_table(&written[0]).unwrap();
    let sabor = classified.column_index("SABOR").unwrap();
    let embalagem = classified.column_index("EMBALAGEM").unwrap();
    assert_eq!(classified.get(0, sabor), Some(&Value::text("MORANGO")));
    assert_eq!(classified.get(1, sabor), Some(&Value::text("CHOCOLATE")));
    assert_eq!(classified.get(2, sabor), Some(&Value::text("Natural")));
    assert_eq!(classified.get(0, embalagem), Some(&Value::text("PACOTE")));
    assert!(classified.get(1, embalagem).is_none());

    let report = reader::read_table(&written[1]).unwrap();
    assert_eq!(
        report.columns(),
        &["SKU ID", "Descrição", "Coluna", "Antes", "Depois"].map(String::from)
    );
    assert_eq!(report.len(), 2);
}

/// 同じ辞書の2回目はキャッシュから取得
#[test]
fn test_dictionary_cache_reuse() {
    let dir = tempdir().expect("Failed to create temp dir");
    let dict_path = dir.path().join("dicionario.xlsx");
    write_dictionary(&dict_path);

    let mut cache = RuleCache::new();
    cache.get_or_compile(&dict_path).unwrap();
    cache.get_or_compile(&dict_path).unwrap();

    assert_eq!(cache.misses(), 1);
    assert_eq!(cache.hits(), 1);
}

/// CSV入力でも分類できる
#[test]
fn test_classify_csv_input() {
    let dir = tempdir().expect("Failed to create temp dir");
    let dict_path = dir.path().join("dicionario.xlsx");
    let input_path = dir.path().join("base.csv");
    write_dictionary(&dict_path);
    std::fs::write(&input_path, "Nome SKU;SABOR\nSorvete de morango;\n").unwrap();

    let mut cache = RuleCache::new();
    let rules = cache.get_or_compile(&dict_path).unwrap();
    let result = pipeline::classify_file(&input_path, &rules, &targets(), |_, _, _| {}).unwrap();

    // 識別子列がない場合は行番号
    assert_eq!(result.changes[0].identifier, num(0.0));
    assert_eq!(result.dataset.get(0, 1), Some(&Value::text("MORANGO")));
}

#[test]
fn test_output_names_use_date_stamp() {
    let date = export::date_stamp();
    assert!(export::classified_file_name("Açaí", &date).ends_with(&format!("{}.xlsx", date)));
}
