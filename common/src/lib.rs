//! SKU Classifier Common Library
//!
//! 分類エンジン本体（I/Oなし）:
//! - 辞書のコンパイルと品名照合
//! - データセット一括分類と変更レポート
//! - 属性シートの統合・競合検出・属性別分割

pub mod table;
pub mod error;
pub mod normalize;
pub mod rules;
pub mod matcher;
pub mod classifier;
pub mod consolidate;
pub mod fragment;
pub mod registry;
pub mod export;

/// 品名（照合入力）列
pub const NAME_COLUMN: &str = "Nome SKU";
/// SKU識別子の標準列名
pub const ID_COLUMN: &str = "Código Barras SKU";

pub use table::{Cell, Table, Value};
pub use error::{Error, Result};
pub use rules::{compile_rules, Rule, RuleTable, RuleWarning};
pub use matcher::match_text;
pub use classifier::{classify, AttributeStats, ChangeEntry, Classification};
pub use consolidate::{consolidate, Consolidation, ConflictSet, MissingColumns, SourceFile};
pub use fragment::{fragment, Fragment, FragmentPlan, DEFAULT_MAX_ROWS};
pub use registry::{ClassifierConfig, ExtractorConfig, IndustryConfig, Registry};
