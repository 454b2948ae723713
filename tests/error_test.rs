//! エラーケーステスト
//!
//! 各種エラー条件でのエラーハンドリングを検証

use sku_classifier::dictionary::{self, RuleCache};
use sku_classifier::error::SkuClassifierError;
use sku_classifier::{pipeline, reader};
use sku_classifier_common::{Error, Registry, RuleTable};
use std::path::Path;
use tempfile::tempdir;

/// 存在しない辞書ファイル
#[test]
fn test_missing_dictionary() {
    let dir = tempdir().expect("Failed to create temp dir");
    let result = dictionary::load_dictionary(dir.path(), "dicionario_frosty_acai.xlsx");

    let err = result.unwrap_err();
    assert!(matches!(err, SkuClassifierError::Engine(Error::Configuration(_))));
    assert!(err.to_string().contains("dicionario_frosty_acai.xlsx"));
}

/// 必須列が欠けた辞書
#[test]
fn test_dictionary_missing_columns() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("dicionario.csv");
    std::fs::write(&path, "Tipo de Regra;Valor da Regra\nSABOR;morango\n").unwrap();

    let mut cache = RuleCache::new();
    let err = cache.get_or_compile(&path).unwrap_err();
    assert!(matches!(err, SkuClassifierError::Engine(Error::Configuration(_))));
    assert!(cache.is_empty());
}

/// 品名列がないSKUファイル
#[test]
fn test_dataset_without_name_column() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("base.csv");
    std::fs::write(&path, "Código Barras SKU;SABOR\n1;Uva\n").unwrap();

    let targets = vec!["SABOR".to_string()];
    let err = pipeline::classify_file(&path, &RuleTable::new(), &targets, |_, _, _| {}).unwrap_err();
    assert!(matches!(err, SkuClassifierError::Engine(Error::InputShape(_))));
}

/// 存在しないSKUファイル
#[test]
fn test_dataset_not_found() {
    let targets = vec!["SABOR".to_string()];
    let result = pipeline::classify_file(
        Path::new("/nonexistent/path/base.xlsx"),
        &RuleTable::new(),
        &targets,
        |_, _, _| {},
    );
    assert!(matches!(result, Err(SkuClassifierError::FileNotFound(_))));
}

/// 未対応の拡張子
#[test]
fn test_unsupported_extension() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("base.pdf");
    std::fs::write(&path, b"%PDF").unwrap();

    let err = reader::read_table(&path).unwrap_err();
    assert!(err.to_string().contains("base.pdf"));
}

/// 未登録の業種・カテゴリ
#[test]
fn test_unknown_industry_and_category() {
    let registry = Registry::builtin();

    let err = registry.classifier("NESTLE").unwrap_err();
    assert!(matches!(err, Error::Configuration(_)));
    assert!(err.to_string().contains("FROSTY"));

    assert!(registry.dictionary("FROSTY", "Pizza").is_err());
    assert_eq!(
        registry.dictionary("frosty", "acai").unwrap().file,
        "dicionario_frosty_acai.xlsx"
    );
}

/// 壊れたレジストリJSON
#[test]
fn test_invalid_registry_file() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("registry.json");
    std::fs::write(&path, "{ not json").unwrap();

    assert!(matches!(Registry::from_file(&path), Err(Error::Json(_))));
}
