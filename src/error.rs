use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReviewError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("バックエンドURLが不正です: {0}")]
    InvalidUrl(String),

    /// バックエンドに到達できない、または非成功ステータス
    #[error("メタデータ取得エラー: {0}")]
    Fetch(String),

    /// レスポンスの形が想定と異なる
    #[error("メタデータのパースに失敗: {0}")]
    Parse(#[from] hitl_review_common::Error),

    #[error("判定の同期に失敗: {0}")]
    Sync(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("CLI実行エラー: {0}")]
    CliExecution(String),
}

impl ReviewError {
    /// 再取得で回復しうる通信系エラーか
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ReviewError::Fetch(_) | ReviewError::Parse(_) | ReviewError::Sync(_))
    }
}

pub type Result<T> = std::result::Result<T, ReviewError>;
