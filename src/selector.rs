//! 業種・カテゴリの対話式選択モジュール

use crate::error::{Result, SkuClassifierError};
use crate::reader;
use dialoguer::Select;
use sku_classifier_common::{ClassifierConfig, IndustryConfig, Registry};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 辞書フォルダ直下の辞書ファイル一覧を取得（ファイル名順）
pub fn list_available_dictionaries(dir: &Path) -> Vec<(String, PathBuf)> {
    if !dir.exists() {
        return Vec::new();
    }

    let mut dictionaries: Vec<(String, PathBuf)> = WalkDir::new(dir)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && reader::is_supported(e.path()))
        .map(|e| (e.file_name().to_string_lossy().to_string(), e.path().to_path_buf()))
        .collect();

    dictionaries.sort_by(|a, b| a.0.cmp(&b.0));
    dictionaries
}

fn can_prompt() -> bool {
    std::io::stdin().is_terminal() && std::io::stdout().is_terminal()
}

/// 一覧から1つ選ばせる（キャンセルは `Cancelled`）
fn pick(prompt: &str, items: &[&str]) -> Result<usize> {
    Select::new()
        .with_prompt(prompt)
        .items(items)
        .default(0)
        .interact_opt()
        .map_err(|e| SkuClassifierError::Config(format!("選択に失敗しました: {}", e)))?
        .ok_or(SkuClassifierError::Cancelled)
}

/// 業種を決定（指定がなければ端末上で選択）
pub fn select_industry<'a>(registry: &'a Registry, wanted: Option<&str>) -> Result<&'a IndustryConfig> {
    if let Some(name) = wanted {
        return Ok(registry.industry(name)?);
    }

    let names = registry.names();
    if names.is_empty() {
        return Err(SkuClassifierError::Config("業種が登録されていません".into()));
    }
    if !can_prompt() {
        return Err(SkuClassifierError::Config(format!(
            "--industry を指定してください（{}）",
            names.join(", ")
        )));
    }

    let index = pick("業種を選択してください", &names)?;
    println!("→ {} を使用", names[index]);
    Ok(&registry.industries[index])
}

/// カテゴリを決定（指定がなければ端末上で選択）
pub fn select_category(classifier: &ClassifierConfig, wanted: Option<&str>) -> Result<String> {
    let categories = classifier.categories();

    if let Some(name) = wanted {
        return classifier
            .dictionary_for(name)
            .map(|d| d.category.clone())
            .ok_or_else(|| {
                SkuClassifierError::Config(format!(
                    "カテゴリが見つかりません: {}（{}）",
                    name,
                    categories.join(", ")
                ))
            });
    }

    if categories.is_empty() {
        return Err(SkuClassifierError::Config("カテゴリが登録されていません".into()));
    }
    if !can_prompt() {
        return Err(SkuClassifierError::Config(format!(
            "--category を指定してください（{}）",
            categories.join(", ")
        )));
    }

    let index = pick("カテゴリを選択してください", &categories)?;
    println!("→ {} を使用", categories[index]);
    Ok(categories[index].to_string())
}
