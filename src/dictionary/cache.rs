//! コンパイル済みルールのキャッシュ
//!
//! 辞書ファイルの正規化パスをキーに、更新時刻とサイズが同じ間は
//! コンパイル結果を使い回す。ファイルが変わっていれば再コンパイルする。

use super::read_dictionary;
use crate::error::Result;
use sku_classifier_common::{compile_rules, RuleTable};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

/// ファイルの同一性判定（更新時刻, サイズ）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Signature {
    modified: Option<SystemTime>,
    size: u64,
}

impl Signature {
    fn of(path: &Path) -> Result<Self> {
        let meta = std::fs::metadata(path)?;
        Ok(Self {
            modified: meta.modified().ok(),
            size: meta.len(),
        })
    }
}

/// キャッシュエントリ
#[derive(Debug, Clone)]
struct CacheEntry {
    signature: Signature,
    rules: Arc<RuleTable>,
}

/// ルールキャッシュ
#[derive(Debug, Default)]
pub struct RuleCache {
    entries: HashMap<PathBuf, CacheEntry>,
    hits: usize,
    misses: usize,
}

impl RuleCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// キャッシュから取得、なければ読み込んでコンパイル
    pub fn get_or_compile(&mut self, path: &Path) -> Result<Arc<RuleTable>> {
        let key = path.canonicalize()?;
        let signature = Signature::of(&key)?;

        if let Some(entry) = self.entries.get(&key) {
            if entry.signature == signature {
                self.hits += 1;
                return Ok(Arc::clone(&entry.rules));
            }
        }

        self.misses += 1;
        let table = read_dictionary(&key)?;
        let rules = Arc::new(compile_rules(&table)?);
        self.entries.insert(
            key,
            CacheEntry {
                signature,
                rules: Arc::clone(&rules),
            },
        );
        Ok(rules)
    }

    pub fn hits(&self) -> usize {
        self.hits
    }

    pub fn misses(&self) -> usize {
        self.misses
    }

    /// キャッシュ件数
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 全エントリと統計をクリア
    pub fn clear(&mut self) {
        self.entries.clear();
        self.hits = 0;
        self.misses = 0;
    }
}
