use crate::error::{Result, SkuClassifierError};
use serde::{Deserialize, Serialize};
use sku_classifier_common::DEFAULT_MAX_ROWS;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 辞書ファイルのフォルダ
    pub dictionaries_dir: PathBuf,
    /// 既定の出力先（未設定なら入力ファイルのフォルダ）
    pub output_dir: Option<PathBuf>,
    /// 属性別分割の最大行数
    pub fragment_max_rows: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dictionaries_dir: PathBuf::from("dicionarios"),
            output_dir: None,
            fragment_max_rows: DEFAULT_MAX_ROWS,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| SkuClassifierError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("sku-classifier").join("config.json"))
    }

    /// 分割の最大行数を決定（指定 > 設定）。0は設定エラー
    pub fn fragment_limit(&self, explicit: Option<usize>) -> Result<usize> {
        match explicit.unwrap_or(self.fragment_max_rows) {
            0 => Err(SkuClassifierError::Config(
                "分割の最大行数は1以上を指定してください".into(),
            )),
            n => Ok(n),
        }
    }

    /// 出力先を決定（指定 > 設定 > 入力ファイルのフォルダ）
    pub fn resolve_output_dir(&self, explicit: Option<&Path>, input: &Path) -> PathBuf {
        if let Some(dir) = explicit {
            return dir.to_path_buf();
        }
        if let Some(dir) = &self.output_dir {
            return dir.clone();
        }
        input
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}
