use thiserror::Error;

#[derive(Error, Debug)]
pub enum SkuClassifierError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("ファイルを読み込めません: {file}: {reason}")]
    Parse { file: String, reason: String },

    #[error("Excel生成エラー: {0}")]
    ExcelGeneration(String),

    #[error("統合に失敗しました（{} 件のファイルが拒否されました）", .0.len())]
    BatchRejected(Vec<sku_classifier_common::Error>),

    #[error("操作がキャンセルされました")]
    Cancelled,

    #[error("{0}")]
    Engine(#[from] sku_classifier_common::Error),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SkuClassifierError>;
