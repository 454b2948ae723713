//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// ルール表の必須列欠落・未知の業種/カテゴリ・辞書ファイル不在
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// データセットに必須列（品名・識別子）がない
    #[error("Input shape error: {0}")]
    InputShape(String),

    /// 統合対象ファイルの構造チェック失敗
    #[error("File rejected: {file}: {reason}")]
    FileRejected { file: String, reason: String },
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_io() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error = Error::Io(io_error);
        let display = format!("{}", error);
        assert!(display.contains("IO error"));
        assert!(display.contains("file not found"));
    }

    #[test]
    fn test_error_display_configuration() {
        let error = Error::Configuration("必須列がありません: Tipo de Regra".to_string());
        assert_eq!(
            error.to_string(),
            "Configuration error: 必須列がありません: Tipo de Regra"
        );
    }

    #[test]
    fn test_error_display_file_rejected() {
        let error = Error::FileRejected {
            file: "frosty.xlsx".to_string(),
            reason: "識別子列がありません".to_string(),
        };
        let display = error.to_string();
        assert!(display.contains("frosty.xlsx"));
        assert!(display.contains("識別子列がありません"));
    }

    #[test]
    fn test_error_from_json() {
        let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error: Error = json_error.into();
        assert!(matches!(error, Error::Json(_)));
    }
}
